//! Error types for renderer collaborators.

/// Error reported by a math or tex renderer.
///
/// Passes never propagate these: a failed render leaves the source text in place.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum RenderError {
    /// Renderer could not be reached or timed out.
    #[error("renderer unavailable: {0}")]
    Unavailable(String),

    /// Renderer refused the input.
    #[error("renderer rejected input: {0}")]
    Rejected(String),

    /// Renderer payload could not be decoded.
    #[error("invalid renderer response")]
    InvalidResponse(#[from] serde_json::Error),
}
