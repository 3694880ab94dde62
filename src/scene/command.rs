use glam::Vec3;

use crate::color::Rgba;
use crate::primitive::Drawable;

/// A change a UI layer can ask the scene to make to one named part.
///
/// Widgets never touch parts directly; they enumerate [`Scene::parts`] and send
/// commands through [`Scene::apply`].
///
/// [`Scene::parts`]: crate::Scene::parts
/// [`Scene::apply`]: crate::Scene::apply
#[derive(Clone, Debug, PartialEq)]
pub enum PartCommand {
    /// Compose a rotation onto the part's transform.
    Rotate {
        id: String,
        degrees: f32,
        axis: Vec3,
    },
    /// Replace the part's color.
    SetColor { id: String, color: Rgba },
}

impl PartCommand {
    pub fn target(&self) -> &str {
        match self {
            PartCommand::Rotate { id, .. } | PartCommand::SetColor { id, .. } => id,
        }
    }

    pub(crate) fn apply_to(self, part: &mut dyn Drawable) {
        match self {
            PartCommand::Rotate { degrees, axis, .. } => {
                part.transform_mut().rotate(degrees, axis.x, axis.y, axis.z);
            }
            PartCommand::SetColor { color, .. } => part.set_color(color),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matrix::Matrix4;
    use crate::primitive::Cuboid;

    #[test]
    fn rotate_composes_onto_the_transform() {
        let mut part = Cuboid::new(Rgba::WHITE).with_id("neck");
        part.transform_mut().translate(0.0, 1.0, 0.0);

        PartCommand::Rotate {
            id: "neck".into(),
            degrees: -25.0,
            axis: Vec3::new(2.0, 0.0, 0.0),
        }
        .apply_to(&mut part);

        let mut expected = Matrix4::identity();
        expected.translate(0.0, 1.0, 0.0).rotate(-25.0, 1.0, 0.0, 0.0);
        assert_eq!(*part.transform(), expected);
    }

    #[test]
    fn target_names_the_part() {
        let cmd = PartCommand::SetColor {
            id: "tail".into(),
            color: Rgba::BLUE,
        };
        assert_eq!(cmd.target(), "tail");
    }
}
