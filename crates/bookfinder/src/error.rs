#[derive(thiserror::Error, Debug, serde::Deserialize, serde::Serialize)]
pub enum Error {
    #[error("Nothing to search: provide a title and/or an author")]
    MissingTerms,

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

impl From<bookfinder_core::projection::ParseError> for Error {
    fn from(err: bookfinder_core::projection::ParseError) -> Self {
        Error::InvalidArgument(err.to_string())
    }
}
