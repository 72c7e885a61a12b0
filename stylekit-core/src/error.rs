//! Error types for style operations.
//!
//! Read paths (resolution, composition, stylesheet generation) never fail.
//! These errors only surface at parsing boundaries and when a caller
//! addresses a node that does not exist.

use thiserror::Error;

/// Result type for style operations.
pub type StyleResult<T> = Result<T, StyleError>;

/// Errors that can occur at the edges of the style engine.
#[derive(Debug, Error)]
pub enum StyleError {
    /// Node not found in the document.
    #[error("Node not found: {0}")]
    NodeNotFound(String),

    /// Breakpoint name is not one of desktop, tablet or mobile.
    #[error("Invalid breakpoint: {0}")]
    InvalidBreakpoint(String),

    /// Box group name is not margin, padding, border_width or border_radius.
    #[error("Unknown box group: {0}")]
    UnknownBoxGroup(String),

    /// Side or corner name could not be parsed.
    #[error("Unknown side: {0}")]
    UnknownSide(String),

    /// Element state name is not normal, hover, focus or active.
    #[error("Unknown element state: {0}")]
    UnknownState(String),

    /// Shadow preset name is not known.
    #[error("Unknown shadow preset: {0}")]
    UnknownPreset(String),

    /// Node identifier is not a valid UUID.
    #[error("Invalid node id: {0}")]
    InvalidNodeId(#[from] uuid::Error),

    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
