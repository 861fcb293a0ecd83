//! Navinha core crate.
//!
//! A vertically scrolling arcade shooter drawn on a 2D canvas. The ship follows
//! the pointer and fires automatically; enemies, power-ups and energy cells
//! drift down from the top. `start_space_game()` is the JS entrypoint; the
//! simulation itself (`space::world`) is plain Rust and runs on the host too.

use wasm_bindgen::prelude::*;

pub mod config;
pub mod error;
pub mod logging;
pub mod space;

pub use config::ShooterConfig;
pub use error::{ConfigError, GameError};
pub use space::{start_space_game, stop_space_game};

// Optional small allocator for size (feature gated)
#[cfg(feature = "wee_alloc")]
#[global_allocator]
static ALLOC: wee_alloc::WeeAlloc = wee_alloc::WeeAlloc::INIT;

#[wasm_bindgen(start)]
pub fn wasm_start() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
    logging::init(tracing::Level::INFO);
}

/// JSON of the default tuning values, handy as a template for overrides.
#[wasm_bindgen]
pub fn default_config_json() -> String {
    serde_json::to_string_pretty(&ShooterConfig::default()).unwrap_or_default()
}
