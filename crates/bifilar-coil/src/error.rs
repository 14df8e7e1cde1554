//! Error types for the coil builder.

use bifilar_stl::StlError;
use thiserror::Error;

/// Errors that can occur while building a coil.
#[derive(Error, Debug)]
pub enum CoilError {
    /// Dielectric sheaths on adjacent turns would overlap.
    #[error("diel_gap ({diel_gap}) must be less than half wire_gap ({wire_gap})")]
    DielectricGapTooLarge {
        /// Requested dielectric gap (mm).
        diel_gap: f64,
        /// Requested wire gap (mm).
        wire_gap: f64,
    },

    /// The spacing-angle stagger is undefined for four or fewer pairs.
    #[error("num_pairs must be greater than 4, got {0}")]
    TooFewPairs(usize),

    /// A parameter is out of range.
    #[error("invalid parameter {name}: {reason}")]
    InvalidParameter {
        /// Parameter name as used in config files.
        name: &'static str,
        /// What is wrong with it.
        reason: String,
    },

    /// The coil 3 connector tip lands on or past the coil 2 connector.
    #[error("wires cross between coils 2 and 3 ({distance:.4} mm); increase inner_radius")]
    WiresCross {
        /// Signed distance of the tip from the coil 2 connector edge.
        distance: f64,
    },

    /// The coil 2 connector edge runs parallel to the y axis, so the coil 3
    /// clearance cannot be measured against it.
    #[error("coil 2 connector edge is vertical in XY; coil 3 clearance cannot be measured")]
    VerticalReferenceEdge,

    /// Both leads fall in the same angular span of the back cap.
    #[error("lead cutouts overlap in the back cap between {start:.4} and {end:.4} rad")]
    LeadCutoutsOverlap {
        /// Start of the wedge that could not be carved.
        start: f64,
        /// End of the wedge that could not be carved.
        end: f64,
    },

    /// A lead footprint was never recorded.
    #[error("{0} lead footprint missing")]
    MissingLead(&'static str),

    /// The output sink failed.
    #[error(transparent)]
    Sink(#[from] StlError),
}

/// Result type for coil operations.
pub type Result<T> = std::result::Result<T, CoilError>;
