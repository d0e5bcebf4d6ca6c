use aws_sdk_s3::error::SdkError;
use aws_sdk_s3::operation::get_object::GetObjectError;
use lambda_http::http::StatusCode;

pub const INVALID_BODY_MESSAGE: &str = "Invalid request body";
pub const FETCH_FAILED_MESSAGE: &str = "Failed to get S3 data";

/// Failure of a single object check request.
#[derive(Debug, thiserror::Error)]
pub enum CheckError {
    #[error("request body is not an S3 notification: {0}")]
    InvalidBody(#[source] serde_json::Error),
    #[error("S3 notification contains no records")]
    NoRecords,
    #[error("GetObject failed")]
    Fetch(#[source] Box<SdkError<GetObjectError>>),
    #[error("invocation deadline exceeded before GetObject completed")]
    DeadlineExceeded,
}

impl CheckError {
    /// Decode failures are the caller's fault; every storage failure collapses into a 500.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidBody(_) | Self::NoRecords => StatusCode::BAD_REQUEST,
            Self::Fetch(_) | Self::DeadlineExceeded => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn public_message(&self) -> &'static str {
        match self.status_code() {
            StatusCode::BAD_REQUEST => INVALID_BODY_MESSAGE,
            _ => FETCH_FAILED_MESSAGE,
        }
    }
}

impl From<SdkError<GetObjectError>> for CheckError {
    fn from(err: SdkError<GetObjectError>) -> Self {
        Self::Fetch(Box::new(err))
    }
}

/// Startup configuration failure. Fatal to the process.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("no AWS region configured; set AWS_REGION")]
    MissingRegion,
    #[error("invalid value {value:?} for {name}; expected true, false, 1 or 0")]
    InvalidFlag { name: &'static str, value: String },
}
