/// Local candidate probing
///
/// One suspend-until-resolved load per candidate location. A candidate
/// succeeds only if its bytes decode as an image; any failure just means
/// "try the next one".
use async_trait::async_trait;
use thiserror::Error;

/// Why a single candidate probe failed. Never surfaced to the user.
#[derive(Debug, Error)]
pub enum ProbeError {
    #[error("failed to read {location}: {source}")]
    Read {
        location: String,
        source: std::io::Error,
    },
    #[error("{location} is not a decodable image: {source}")]
    Decode {
        location: String,
        source: image::ImageError,
    },
}

/// Capability: attempt to load the image resource at a location
#[async_trait]
pub trait LocalProbe: Send + Sync {
    /// Returns the raw image bytes on success
    async fn load(&self, location: &str) -> Result<Vec<u8>, ProbeError>;
}

/// Probes candidate locations on the local filesystem
#[derive(Debug, Clone, Copy, Default)]
pub struct FsProbe;

#[async_trait]
impl LocalProbe for FsProbe {
    async fn load(&self, location: &str) -> Result<Vec<u8>, ProbeError> {
        let bytes = tokio::fs::read(location)
            .await
            .map_err(|source| ProbeError::Read {
                location: location.to_string(),
                source,
            })?;

        // A readable file still has to be a real image before we show it
        image::load_from_memory(&bytes).map_err(|source| ProbeError::Decode {
            location: location.to_string(),
            source,
        })?;

        Ok(bytes)
    }
}
