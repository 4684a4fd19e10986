//! Résumé storage — mirrors uploads to S3 and hands back a public link.

use anyhow::{Context, Result};
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::types::ObjectCannedAcl;
use aws_sdk_s3::Client as S3Client;
use tracing::info;

/// Uploads the résumé bytes under `key` with public-read access and returns
/// the public URL.
pub async fn upload_resume(
    s3: &S3Client,
    bucket: &str,
    key: &str,
    data: Vec<u8>,
) -> Result<String> {
    s3.put_object()
        .bucket(bucket)
        .key(key)
        .acl(ObjectCannedAcl::PublicRead)
        .content_type("application/pdf")
        .body(ByteStream::from(data))
        .send()
        .await
        .with_context(|| format!("S3 upload of {key} failed"))?;

    let url = public_url(bucket, key);
    info!(%url, "résumé uploaded to S3");
    Ok(url)
}

fn public_url(bucket: &str, key: &str) -> String {
    format!("https://{bucket}.s3.amazonaws.com/{key}")
}
