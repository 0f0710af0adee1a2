//! Streaming download with SHA256 verification.
//!
//! The body is hashed as it is written, so verification never re-reads the
//! file. A single GET is issued per request; there is no retry.

use std::io::Write;
use std::path::Path;

use futures::StreamExt;
use reqwest::Client;
use sha2::{Digest, Sha256};
use thiserror::Error;
use tokio::fs::File;
use tokio::io::AsyncWriteExt;
use tracing::debug;
use vaultup_schema::{Sha256Digest, Version};

use crate::Reporter;

#[derive(Error, Debug)]
pub enum DownloadError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Server returned {status}")]
    Status { status: reqwest::StatusCode },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Hash mismatch: expected {expected}, got {actual}")]
    HashMismatch { expected: String, actual: String },
}

/// Request for a download operation
pub struct DownloadRequest<'a> {
    pub client: &'a Client,
    pub version: &'a Version,
    pub url: &'a str,
    pub dest: &'a Path,
    pub expected: Option<&'a Sha256Digest>,
    pub reporter: &'a dyn Reporter,
}

impl<'a> DownloadRequest<'a> {
    pub fn new(
        client: &'a Client,
        version: &'a Version,
        url: &'a str,
        dest: &'a Path,
        reporter: &'a dyn Reporter,
    ) -> Self {
        Self {
            client,
            version,
            url,
            dest,
            expected: None,
            reporter,
        }
    }

    /// Fail with [`DownloadError::HashMismatch`] unless the body hashes to `digest`.
    pub fn verify_against(mut self, digest: &'a Sha256Digest) -> Self {
        self.expected = Some(digest);
        self
    }

    /// Execute the download, returning the hex SHA256 of what was written.
    pub async fn execute(self) -> Result<String, DownloadError> {
        download_and_verify(self).await
    }
}

/// Stream `url` into `dest`, hashing on the way.
///
/// On a mismatch `dest` is removed before the error is returned.
pub async fn download_and_verify(req: DownloadRequest<'_>) -> Result<String, DownloadError> {
    let DownloadRequest {
        client,
        version,
        url,
        dest,
        expected,
        reporter,
    } = req;

    debug!(url, dest = %dest.display(), "GET");

    let response = client
        .get(url)
        .header(reqwest::header::USER_AGENT, crate::USER_AGENT)
        .send()
        .await?;

    if !response.status().is_success() {
        return Err(DownloadError::Status {
            status: response.status(),
        });
    }

    let total = response.content_length();
    reporter.downloading(version, 0, total);

    let mut file = File::create(dest).await?;
    let mut stream = response.bytes_stream();
    let mut hasher = Sha256::new();
    let mut downloaded: u64 = 0;

    while let Some(chunk) = stream.next().await {
        let chunk = chunk?;
        file.write_all(&chunk).await?;
        hasher.write_all(&chunk)?;
        downloaded += chunk.len() as u64;
        reporter.downloading(version, downloaded, total);
    }

    file.flush().await?;
    drop(file);
    let actual = hex::encode(hasher.finalize());

    if let Some(expected) = expected {
        if !expected.matches(&actual) {
            tokio::fs::remove_file(dest).await.ok();
            return Err(DownloadError::HashMismatch {
                expected: expected.to_string(),
                actual,
            });
        }
        debug!(sha256 = %actual, "checksum verified");
    }

    Ok(actual)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::NullReporter;

    const BODY: &[u8] = b"hello vault";

    fn body_sha() -> String {
        hex::encode(Sha256::digest(BODY))
    }

    #[tokio::test]
    async fn downloads_and_verifies() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/vault.zip")
            .with_status(200)
            .with_body(BODY)
            .expect(1)
            .create_async()
            .await;

        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("vault.zip");
        let url = format!("{}/vault.zip", server.url());
        let client = Client::new();
        let version = Version::new("0.9.1");
        let digest = Sha256Digest::new(body_sha()).unwrap();

        let sha = DownloadRequest::new(&client, &version, &url, &dest, &NullReporter)
            .verify_against(&digest)
            .execute()
            .await
            .unwrap();

        assert_eq!(sha, body_sha());
        assert_eq!(std::fs::read(&dest).unwrap(), BODY);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn sends_user_agent() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/ua")
            .match_header("user-agent", crate::USER_AGENT)
            .with_body(BODY)
            .create_async()
            .await;

        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("out");
        let url = format!("{}/ua", server.url());
        let client = Client::new();
        let version = Version::new("1.0.0");

        DownloadRequest::new(&client, &version, &url, &dest, &NullReporter)
            .execute()
            .await
            .unwrap();
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn mismatch_removes_file() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/vault.zip")
            .with_body(BODY)
            .create_async()
            .await;

        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("vault.zip");
        let url = format!("{}/vault.zip", server.url());
        let client = Client::new();
        let version = Version::new("0.9.1");
        let wrong = Sha256Digest::new("0".repeat(64)).unwrap();

        let err = DownloadRequest::new(&client, &version, &url, &dest, &NullReporter)
            .verify_against(&wrong)
            .execute()
            .await
            .unwrap_err();

        match err {
            DownloadError::HashMismatch { expected, actual } => {
                assert_eq!(expected, "0".repeat(64));
                assert_eq!(actual, body_sha());
            }
            other => panic!("unexpected error: {other}"),
        }
        assert!(!dest.exists());
    }

    #[tokio::test]
    async fn http_error_status_fails() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/missing.zip")
            .with_status(404)
            .create_async()
            .await;

        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("missing.zip");
        let url = format!("{}/missing.zip", server.url());
        let client = Client::new();
        let version = Version::new("0.9.1");

        let err = DownloadRequest::new(&client, &version, &url, &dest, &NullReporter)
            .execute()
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            DownloadError::Status { status } if status == reqwest::StatusCode::NOT_FOUND
        ));
        assert!(!dest.exists());
    }
}
