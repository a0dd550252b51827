//! Domain error types.
//!
//! Strategy hooks are infallible; errors only arise while building strategies,
//! loading artifacts, reading configuration or loading price data.

/// Top-level error type for tickstrat.
#[derive(Debug, thiserror::Error)]
pub enum TickstratError {
    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("missing config key [{section}] {key}")]
    ConfigMissing { section: String, key: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error("invalid {strategy} parameter {name}: {reason}")]
    InvalidParameter {
        strategy: &'static str,
        name: &'static str,
        reason: String,
    },

    #[error("failed to load model {path}: {reason}")]
    ModelLoad { path: String, reason: String },

    #[error("data error in {source_name}: {reason}")]
    Data { source_name: String, reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<&TickstratError> for std::process::ExitCode {
    fn from(err: &TickstratError) -> Self {
        let code: u8 = match err {
            TickstratError::Io(_) => 1,
            TickstratError::ConfigParse { .. }
            | TickstratError::ConfigMissing { .. }
            | TickstratError::ConfigInvalid { .. } => 2,
            TickstratError::Data { .. } => 3,
            TickstratError::ModelLoad { .. } => 4,
            TickstratError::InvalidParameter { .. } => 5,
        };
        std::process::ExitCode::from(code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_context() {
        let err = TickstratError::ConfigInvalid {
            section: "oscillator".into(),
            key: "period".into(),
            reason: "period must be at least 1".into(),
        };
        assert_eq!(
            err.to_string(),
            "invalid config value [oscillator] period: period must be at least 1"
        );
    }

    #[test]
    fn model_load_display() {
        let err = TickstratError::ModelLoad {
            path: "nb.json".into(),
            reason: "missing field `classes`".into(),
        };
        assert!(err.to_string().starts_with("failed to load model nb.json"));
    }

    #[test]
    fn io_converts_transparently() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err: TickstratError = io.into();
        assert_eq!(err.to_string(), "gone");
    }
}
