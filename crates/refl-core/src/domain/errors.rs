use super::LayerPosition;
use std::path::PathBuf;

pub type ConvertResult<T> = Result<T, ConvertError>;

#[derive(Debug, thiserror::Error)]
pub enum ConvertError {
    #[error("failed to read '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("malformed GenX table row {row}: {reason}")]
    MalformedTable { row: usize, reason: String },
    #[error("GenX parameter '{parameter}' has no '.' between substance and feature")]
    MalformedParameter { parameter: String },
    #[error("LSFIT template has no parameter header sentinel")]
    MissingHeader,
    #[error("template line addresses '{position}' but the layer stack has no layer there")]
    UnknownPosition { position: LayerPosition },
    #[error("unrecognized parameter name '{name}' in LSFIT template")]
    UnrecognizedFeatureName { name: String },
    #[error("layer '{substance}' at '{position}' carries no feature '{feature}'")]
    MissingFeature {
        substance: String,
        position: LayerPosition,
        feature: String,
    },
}

impl ConvertError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub fn malformed_table(row: usize, reason: impl Into<String>) -> Self {
        Self::MalformedTable {
            row,
            reason: reason.into(),
        }
    }
}
