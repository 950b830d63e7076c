use thiserror::Error;

/// Failures talking to the external players catalog or release listing.
///
/// Always recoverable: callers log them and keep serving previously cached data.
#[derive(Error, Debug)]
pub enum CatalogError {
    /// Endpoint answered with a non-success status code.
    #[error("{url} returned HTTP {status}")]
    Status { url: String, status: u16 },

    /// Response body is not the expected JSON document.
    #[error("Failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),

    /// Release listing contained no releases.
    #[error("The release listing is empty")]
    EmptyReleases,

    /// Latest release tag does not look like `vMAJOR.MINOR.PATCH`.
    #[error("Bad version tag format: {0}")]
    BadTag(String),
}
