use crate::browser;
use log::info;
use serde::{Deserialize, Serialize};

/// Startup settings. Every field is optional in `config.json`.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct GameConfig {
    pub target_fps: u32,
    pub canvas_id: String,
    pub allow_touch_input: bool,
    pub allow_mouse_input: bool,
    pub enemy_image: String,
}

impl Default for GameConfig {
    fn default() -> Self {
        GameConfig {
            target_fps: 30,
            canvas_id: "canvas".to_string(),
            allow_touch_input: true,
            allow_mouse_input: true,
            enemy_image: "enemy.png".to_string(),
        }
    }
}

impl GameConfig {
    pub const PATH: &'static str = "config.json";

    /// Fetches `path`, falling back to the defaults when it is missing or
    /// malformed
    pub async fn load(path: &str) -> Self {
        match browser::fetch_json::<GameConfig>(path).await {
            Ok(config) => config,
            Err(err) => {
                info!("using default config, {} not loaded: {:#}", path, err);
                GameConfig::default()
            }
        }
    }
}
