use std::time::Duration;

use tracing::{debug, info};

use crate::config::Source;
use crate::error::{LindyError, Result};

/// Bound on the blocking portion of a request. Without this a stalled
/// remote would hang the caller indefinitely.
const FETCH_TIMEOUT: Duration = Duration::from_secs(15);

/// Retrieve the raw dataset bytes from a URL or local file.
///
/// No retries and no caching: every call hits the source again. A
/// non-success HTTP status is a [`LindyError::Fetch`], same as a
/// transport failure.
pub async fn fetch_bytes(source: &Source) -> Result<Vec<u8>> {
    match source {
        Source::Url(url) => {
            info!(%url, "fetching dataset");
            let client = reqwest::Client::builder()
                .timeout(FETCH_TIMEOUT)
                .build()?;
            let response = client.get(url).send().await?;
            let status = response.status();
            if !status.is_success() {
                return Err(LindyError::Fetch(format!(
                    "{} returned HTTP {}",
                    url, status
                )));
            }
            let bytes = response.bytes().await?;
            debug!(len = bytes.len(), "dataset downloaded");
            Ok(bytes.to_vec())
        }
        Source::Path(path) => {
            info!(path = %path.display(), "reading dataset");
            tokio::fs::read(path).await.map_err(|e| {
                LindyError::Fetch(format!("failed to read {}: {}", path.display(), e))
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[tokio::test]
    async fn test_missing_local_file_is_a_fetch_error() {
        let source = Source::Path(PathBuf::from("/nonexistent/Files.zip"));
        let err = fetch_bytes(&source).await.unwrap_err();
        assert_eq!(err.code(), "FETCH_ERROR");
        assert!(err.to_string().contains("/nonexistent/Files.zip"));
    }

    #[tokio::test]
    async fn test_local_file_roundtrip() {
        let dir = std::env::temp_dir().join("lindyscore-fetch-test");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("data.csv");
        std::fs::write(&path, b"graft_type,introduced\nhamstring,1990\n").unwrap();

        let bytes = fetch_bytes(&Source::Path(path.clone())).await.unwrap();
        assert!(bytes.starts_with(b"graft_type"));
        std::fs::remove_file(path).ok();
    }
}
