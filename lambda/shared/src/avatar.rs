use std::{future::Future, time::Duration};

use aws_sdk_s3::{presigning::PresigningConfig, Client};

use crate::SignError;

/// Window an avatar upload URL stays valid for.
pub const UPLOAD_EXPIRY: Duration = Duration::from_secs(900);

/// Issues presigned URLs that let a caller upload an object directly.
pub trait AvatarSigner {
    fn presign_upload(
        &self,
        key: &str,
        content_type: Option<&str>,
    ) -> impl Future<Output = Result<String, SignError>> + Send;
}

pub struct S3AvatarSigner {
    client: Client,
    bucket: String,
}

impl S3AvatarSigner {
    pub fn new(client: Client, bucket: impl Into<String>) -> Self {
        Self {
            client,
            bucket: bucket.into(),
        }
    }
}

impl AvatarSigner for S3AvatarSigner {
    async fn presign_upload(
        &self,
        key: &str,
        content_type: Option<&str>,
    ) -> Result<String, SignError> {
        let presigning = PresigningConfig::expires_in(UPLOAD_EXPIRY)?;

        let request = self
            .client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .set_content_type(content_type.map(str::to_string))
            .presigned(presigning)
            .await
            .map_err(aws_sdk_s3::Error::from)?;

        Ok(request.uri().to_string())
    }
}
