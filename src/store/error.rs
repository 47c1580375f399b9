use std::path::PathBuf;

/// Failure taxonomy for store operations.
///
/// Parse failures never appear here: the codec recovers them as absent
/// metadata, so a broken document reads as an id-0 ticket instead of an
/// error. Everything that does surface maps onto one request outcome.
#[derive(Debug)]
pub enum StoreError {
    Io(std::io::Error),
    Yaml(serde_yaml::Error),
    NotFound { path: PathBuf },
    BadRequest(&'static str),
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(err) => write!(f, "io: {err}"),
            Self::Yaml(err) => write!(f, "yaml: {err}"),
            Self::NotFound { path } => write!(f, "file not found: {}", path.display()),
            Self::BadRequest(message) => write!(f, "bad request: {message}"),
        }
    }
}

impl std::error::Error for StoreError {}

impl From<std::io::Error> for StoreError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<serde_yaml::Error> for StoreError {
    fn from(value: serde_yaml::Error) -> Self {
        Self::Yaml(value)
    }
}
