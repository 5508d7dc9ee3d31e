//! Load-time configuration errors
//!
//! Nothing in the running simulation can fail; every error surfaces while a
//! level is being constructed and prevents it from starting.

/// Missing or malformed maze data or settings.
#[derive(Debug)]
pub enum ConfigError {
    /// A required layer is absent from the maze data.
    MissingLayer { layer: String },
    /// A required layer exists but holds no objects.
    MissingObject { layer: String },
    /// An object has unusable geometry.
    InvalidRegion {
        layer: String,
        index: usize,
        reason: &'static str,
    },
    /// Pixel-to-world scale must be finite and positive.
    InvalidScale(f32),
    /// A settings field is out of range.
    InvalidSetting {
        field: &'static str,
        reason: &'static str,
    },
    /// JSON deserialization error.
    Parse(serde_json::Error),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::MissingLayer { layer } => write!(f, "missing maze layer `{layer}`"),
            ConfigError::MissingObject { layer } => {
                write!(f, "maze layer `{layer}` has no objects")
            }
            ConfigError::InvalidRegion {
                layer,
                index,
                reason,
            } => write!(f, "object {index} in layer `{layer}`: {reason}"),
            ConfigError::InvalidScale(s) => write!(f, "invalid world scale: {s}"),
            ConfigError::InvalidSetting { field, reason } => {
                write!(f, "invalid setting `{field}`: {reason}")
            }
            ConfigError::Parse(e) => write!(f, "JSON error: {e}"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Parse(e) => Some(e),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(e: serde_json::Error) -> Self {
        ConfigError::Parse(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_names_layer() {
        let err = ConfigError::MissingLayer {
            layer: "startpos".to_string(),
        };
        assert_eq!(err.to_string(), "missing maze layer `startpos`");
    }

    #[test]
    fn test_parse_error_has_source() {
        use std::error::Error;
        let json_err = serde_json::from_str::<u32>("nope").unwrap_err();
        let err = ConfigError::from(json_err);
        assert!(err.source().is_some());
        assert!(err.to_string().starts_with("JSON error"));
    }
}
