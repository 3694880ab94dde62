use figurine::{AppConfig, Scene, creature, run_with_config};

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = AppConfig::new().title("Figurine");
    let scene = Scene::with_parts(creature());

    if let Err(err) = run_with_config(config, scene) {
        log::error!("{err}");
        std::process::exit(1);
    }
}
