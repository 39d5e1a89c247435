use wasm_bindgen::prelude::*;

mod browser;
pub mod config;
pub mod draw_view;
pub mod engine;
pub mod game;
pub mod sprite;

use crate::config::GameConfig;
use crate::draw_view::DrawView;
use crate::engine::GameLoop;
use crate::game::DemoGame;

fn init_logging() {
    // setup better panic messages for debugging
    console_error_panic_hook::set_once();
    // a second entry point finds the logger already set
    let _ = console_log::init_with_level(log::Level::Info);
}

/// Entry for the paddle-and-ball demo
/// - loads `config.json` (optional)
/// - initializes the game
/// - starts the frame loop
#[wasm_bindgen]
pub fn main_js() -> Result<(), JsValue> {
    init_logging();

    // spawns a new asynchronous task in local thread, for web assembly
    // environment, using wasm_bindgen_futures
    browser::spawn_local(async move {
        let config = GameConfig::load(GameConfig::PATH).await;
        if let Err(err) = GameLoop::start(DemoGame::new(config.clone()), config).await {
            log::error!("Could not start game loop: {:#}", err);
        }
    });

    Ok(())
}

/// Entry for the static drawing demo
#[wasm_bindgen]
pub fn draw_view_js(canvas_id: Option<String>) -> Result<(), JsValue> {
    init_logging();

    let canvas_id = canvas_id.unwrap_or_else(|| GameConfig::default().canvas_id);
    DrawView
        .show(&canvas_id)
        .map_err(|err| JsValue::from_str(&format!("{:#}", err)))
}
