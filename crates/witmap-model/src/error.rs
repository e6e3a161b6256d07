use thiserror::Error;

#[derive(Debug, Error)]
pub enum ImportError {
    #[error(
        "no column maps to the required field System.Title (headers: {})",
        .headers.join(", ")
    )]
    RequiredFieldUnresolved { headers: Vec<String> },
    #[error("title is {length} characters long, the limit is {max}")]
    TitleTooLong { length: usize, max: usize },
    #[error("invalid mapping options: {0}")]
    InvalidOptions(String),
    #[error("failed to parse mapping options: {0}")]
    OptionsJson(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ImportError>;
