//! Error types for planet generation

use thiserror::Error;

/// Errors that can occur during planet generation or queries
///
/// None of these are recoverable inside a single generation attempt. The caller
/// retries with different options or a different seed.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PlanetError {
    /// Configuration validation failed; nothing was generated
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Triangulation or pole stitching produced an inconsistent mesh
    #[error("topology error at index {index}: {reason}")]
    Topology {
        /// Offending side or region index
        index: usize,
        /// What went wrong at that index
        reason: String,
    },

    /// A climate value fell outside every classification zone
    #[error("no {field} zone contains value {value}")]
    Classification {
        /// Field being classified ("moisture" or "temperature")
        field: &'static str,
        /// The value that matched no zone
        value: f32,
    },

    /// Requested region ID does not exist
    #[error("region not found: {0}")]
    RegionNotFound(usize),
}

impl PlanetError {
    pub(crate) fn topology(index: usize, reason: impl Into<String>) -> Self {
        PlanetError::Topology {
            index,
            reason: reason.into(),
        }
    }
}

/// Result type alias for planet operations
pub type Result<T> = std::result::Result<T, PlanetError>;
