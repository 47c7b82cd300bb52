use thiserror::Error;

#[derive(Debug, Error)]
pub enum NetworkError {
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("api request for {url} failed with status {status}: {body}")]
    Api { url: String, status: u16, body: String },
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("{0} requires an API token")]
    MissingToken(&'static str),
}
