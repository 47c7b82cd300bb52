use thiserror::Error;

#[derive(Debug, Error)]
pub enum PredictError {
    #[error("invalid tle for {name}: {message}")]
    InvalidTle { name: String, message: String },
    #[error("propagation error: {0}")]
    Propagation(String),
}
