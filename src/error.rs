use thiserror::Error;

pub type Result<T> = std::result::Result<T, ExtractError>;

#[derive(Error, Debug)]
pub enum ExtractError {
    /// No color survived the histogram and the post-filters, so there is no main color to return.
    #[error("no color was found in the image")]
    NoColorFound,

    #[error("invalid parameter: {parameter} = {value}")]
    InvalidParameter { parameter: &'static str, value: String },

    /// The extractor's worker thread went away before delivering a result.
    #[error("extraction worker disconnected")]
    WorkerDisconnected,

    #[cfg(feature = "serde")]
    #[error("failed to parse configuration")]
    ConfigParse(#[from] serde_json::Error),
}

impl ExtractError {
    pub(crate) fn invalid_parameter(parameter: &'static str, value: impl ToString) -> Self {
        Self::InvalidParameter {
            parameter,
            value: value.to_string(),
        }
    }
}
