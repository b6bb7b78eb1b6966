//! Error types for element ingestion and orbit propagation.

/// Whole-input problems with raw element-set text.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    /// The text contained no complete name/line1/line2 group.
    #[error("no complete element-set group in input")]
    Empty,
}

/// A single object could not be turned into a position.
///
/// These are always object-local: the frame continues without the object.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PropagationError {
    /// A line failed fixed-format parsing or its checksum.
    #[error("invalid element set: {0}")]
    InvalidElements(String),

    /// Mean motion was zero or negative.
    #[error("non-positive mean motion: {0} rev/day")]
    NegativeMeanMotion(f64),

    /// Perigee or propagated radius is below the Earth's surface.
    #[error("orbit has decayed (radius {radius_km:.1} km)")]
    Decayed {
        /// Offending geocentric radius in kilometers.
        radius_km: f64,
    },

    /// The propagator model rejected the elements at initialization.
    #[error("propagator initialization failed: {0}")]
    Initialization(String),

    /// The propagator model failed at the requested instant.
    #[error("propagation failed: {0}")]
    Propagation(String),

    /// The model produced a non-finite state vector.
    #[error("numerical singularity in propagated state")]
    Singular,
}
