//! Tracing subscriber setup: browser console on wasm, stdout fmt layer on native.

use std::sync::Once;

use tracing::Level;

static INIT: Once = Once::new();

/// Install the global subscriber. Safe to call more than once; only the first
/// call has an effect.
pub fn init(max_level: Level) {
    INIT.call_once(|| install(max_level));
}

#[cfg(target_arch = "wasm32")]
fn install(max_level: Level) {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let wasm_layer = tracing_wasm::WASMLayer::new(
        tracing_wasm::WASMLayerConfigBuilder::new()
            .set_max_level(max_level)
            .build(),
    );
    // Fails only when the embedding page already installed a subscriber; keep theirs.
    let _ = tracing_subscriber::registry().with(wasm_layer).try_init();
}

#[cfg(not(target_arch = "wasm32"))]
fn install(max_level: Level) {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let filter_layer = tracing_subscriber::filter::LevelFilter::from_level(max_level);
    let format_layer = tracing_subscriber::fmt::layer();
    match tracing_subscriber::registry()
        .with(filter_layer)
        .with(format_layer)
        .try_init()
    {
        Ok(_) => tracing::debug!("tracing subscriber initialized"),
        Err(err) => eprintln!("could not initialize tracing subscriber: {err}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn init_twice_is_harmless() {
        init(Level::DEBUG);
        init(Level::TRACE);
    }
}
