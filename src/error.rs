//! Error types surfaced through the wasm boundary.

use wasm_bindgen::JsValue;

/// Failures while mounting or driving the shooter in the host page.
#[derive(thiserror::Error, Debug)]
pub enum GameError {
    #[error("no window")]
    NoWindow,

    #[error("no document")]
    NoDocument,

    #[error("document has no body")]
    NoBody,

    /// Element exists but is not a `<canvas>`.
    #[error("element '{0}' is not a canvas")]
    NotACanvas(String),

    #[error("canvas has no 2d context")]
    NoContext,

    /// Exception thrown by a browser API, stringified.
    #[error("js error: {0}")]
    Js(String),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Configuration errors
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// JSON could not be parsed into a config
    #[error("parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// A value parsed but is out of range
    #[error("invalid value for '{field}': {reason}")]
    Invalid {
        field: &'static str,
        reason: String,
    },
}

impl From<JsValue> for GameError {
    fn from(value: JsValue) -> Self {
        GameError::Js(
            value
                .as_string()
                .unwrap_or_else(|| format!("{:?}", value)),
        )
    }
}

impl From<GameError> for JsValue {
    fn from(err: GameError) -> Self {
        JsValue::from_str(&err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_config_message_names_field() {
        let err = GameError::from(ConfigError::Invalid {
            field: "enemy_spawn_chance",
            reason: "must be within [0, 1]".into(),
        });
        assert_eq!(
            err.to_string(),
            "invalid value for 'enemy_spawn_chance': must be within [0, 1]"
        );
    }

    #[test]
    fn parse_error_is_wrapped() {
        let json_err = serde_json::from_str::<u32>("nope").unwrap_err();
        let err: ConfigError = json_err.into();
        assert!(err.to_string().starts_with("parse error:"));
    }
}
