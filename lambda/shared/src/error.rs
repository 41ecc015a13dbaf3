use aws_sdk_dynamodb::error::DisplayErrorContext;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} not set")]
    Missing(&'static str),
}

/// Failure talking to the player table.
#[derive(Debug, Error)]
pub enum StoreError {
    // The SDK error's own Display drops the cause for dispatch and timeout failures.
    #[error("dynamodb request failed: {}", DisplayErrorContext(.0))]
    Dynamo(#[from] aws_sdk_dynamodb::Error),

    #[error("malformed player item: {0}")]
    Item(#[from] serde_dynamo::Error),
}

/// Failure producing a presigned avatar upload URL.
#[derive(Debug, Error)]
pub enum SignError {
    #[error("invalid presigning window: {0}")]
    Presigning(#[from] aws_sdk_s3::presigning::PresigningConfigError),

    #[error("s3 presign failed: {}", DisplayErrorContext(.0))]
    S3(#[from] aws_sdk_s3::Error),

    #[error("avatar signer unavailable: {0}")]
    Unavailable(String),
}
