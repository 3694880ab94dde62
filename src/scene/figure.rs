//! The default articulated creature.
//!
//! Every part is placed by authoring transform calls in order; remember the last
//! call is applied to the geometry first, so most parts read as "tilt, stretch the
//! unit cube, then nudge it into place in scaled units".

use crate::color::Rgba;
use crate::primitive::{Cone, Cuboid, Drawable};
use crate::scene::{LEFT_THIGH, RIGHT_THIGH};

const BODY: Rgba = Rgba::rgb(235.0, 206.0, 76.0);
const NECK: Rgba = Rgba::rgb(241.0, 203.0, 65.0);
const HEAD: Rgba = Rgba::rgb(247.0, 196.0, 9.0);
const MUZZLE: Rgba = Rgba::rgb(238.0, 155.0, 77.0);
const EYE: Rgba = Rgba::rgb(255.0, 255.0, 255.0);
const LEFT_PUPIL: Rgba = Rgba::rgb(1.0, 1.0, 1.0);
const RIGHT_PUPIL: Rgba = Rgba::rgb(5.0, 5.0, 5.0);
const LEG: Rgba = Rgba::rgb(200.0, 169.0, 59.0);
const TAIL: Rgba = Rgba::rgb(107.0, 55.0, 16.0);

/// Builds the creature's parts in draw order.
pub fn creature() -> Vec<Box<dyn Drawable>> {
    let mut parts: Vec<Box<dyn Drawable>> = Vec::new();

    let mut torso = Cuboid::new(BODY).with_id("torso");
    torso
        .transform_mut()
        .scale(0.3, 0.3, 0.5)
        .translate(-0.5, -0.5, -0.5);
    parts.push(Box::new(torso));

    let mut neck = Cuboid::new(NECK).with_id("neck");
    neck.transform_mut()
        .rotate(-25.0, 1.0, 0.0, 0.0)
        .scale(0.18, 0.8, 0.18)
        .translate(-0.5, 0.0, -1.0);
    parts.push(Box::new(neck));

    let mut head = Cuboid::new(HEAD).with_id("head");
    head.transform_mut()
        .rotate(-10.0, 1.0, 0.0, 0.0)
        .scale(0.2, 0.2, 0.3)
        .translate(-0.5, 3.5, -2.0);
    parts.push(Box::new(head));

    for (id, x) in [("horn_stem_left", 0.4), ("horn_stem_right", -0.4)] {
        let mut horn = Cone::new(0.3, 1.2, HEAD).with_id(id);
        horn.transform_mut()
            .scale(0.1, 0.1, 0.1)
            .translate(x, 8.0, -4.8);
        parts.push(Box::new(horn));
    }

    let mut muzzle = Cuboid::new(MUZZLE).with_id("weird_mustache");
    muzzle
        .transform_mut()
        .rotate(-10.0, 1.0, 0.0, 0.0)
        .scale(0.21, 0.21, 0.05)
        .translate(-0.5, 3.3, -13.0);
    parts.push(Box::new(muzzle));

    // Eyes and pupils tilt with the head, applied last so it acts first.
    let eyes = [
        ("eye_left", 2.0, "pupil_left", 2.0, LEFT_PUPIL),
        ("eye_right", -3.0, "pupil_right", -2.75, RIGHT_PUPIL),
    ];
    for (eye_id, eye_x, pupil_id, pupil_x, pupil_color) in eyes {
        let mut eye = Cuboid::new(EYE).with_id(eye_id);
        eye.transform_mut()
            .scale(0.05, 0.05, 0.05)
            .translate(eye_x, 15.0, -12.0)
            .rotate(-10.0, 1.0, 0.0, 0.0);
        parts.push(Box::new(eye));

        let mut pupil = Cuboid::new(pupil_color).with_id(pupil_id);
        pupil
            .transform_mut()
            .scale(0.05, 0.05, 0.05)
            .translate(pupil_x, 15.0, -13.0)
            .scale(0.5, 0.5, 0.5)
            .translate(0.0, 0.0, 1.5)
            .rotate(-10.0, 1.0, 0.0, 0.0);
        parts.push(Box::new(pupil));
    }

    for (side, x) in [("left", -1.2), ("right", 0.2)] {
        let mut thigh = Cuboid::new(LEG).with_id(format!("front_{side}_thigh"));
        thigh
            .transform_mut()
            .rotate(10.0, 1.0, 0.0, 0.0)
            .scale(0.1, 0.4, 0.1)
            .translate(x, -1.0, -2.0);
        parts.push(Box::new(thigh));

        let mut calf = Cuboid::new(LEG).with_id(format!("front_{side}_calf"));
        calf.transform_mut()
            .rotate(-10.0, 1.0, 0.0, 0.0)
            .scale(0.1, 0.4, 0.1)
            .translate(x, -1.7, -3.2);
        parts.push(Box::new(calf));
    }

    for (id, x) in [(LEFT_THIGH, -1.2), (RIGHT_THIGH, 0.3)] {
        let mut thigh = Cuboid::new(LEG).with_id(id);
        thigh
            .transform_mut()
            .scale(0.15, 0.7, 0.2)
            .translate(x, -1.0, 0.5);
        parts.push(Box::new(thigh));
    }

    let mut tail = Cuboid::new(TAIL).with_id("tail");
    tail.transform_mut()
        .scale(0.1, 0.35, 0.1)
        .translate(-0.5, -0.6, 2.5);
    parts.push(Box::new(tail));

    parts
}
