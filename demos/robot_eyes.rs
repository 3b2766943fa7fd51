use std::path::PathBuf;

use robot_eyes::{app, EngineError, EngineSettings, EyeEngine, QuitSignal};

const SETTINGS_ENV: &str = "ROBOT_EYES_SETTINGS";

fn main() -> Result<(), EngineError> {
    env_logger::init();

    let settings = match std::env::var_os(SETTINGS_ENV) {
        Some(path) => {
            let path = PathBuf::from(path);
            log::info!("loading settings from {}", path.display());
            EngineSettings::load(&path)?
        }
        None => EngineSettings::default(),
    };

    let engine = EyeEngine::new(&settings);
    app::run(engine, &settings.window.title, QuitSignal::new())
}
