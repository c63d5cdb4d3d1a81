use std::error::Error as StdError;

use thiserror::Error;
use weft_core::Position;

use crate::{ConfigError, GridError, Norm};

/// Errors raised by the coupling layer.
///
/// None of these are recoverable: once the mapping or the process group is
/// inconsistent, the Picard loop has no partial state to resume from.
#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid grid: {0}")]
    Grid(#[from] GridError),

    #[error("invalid config: {0}")]
    Config(#[from] ConfigError),

    #[error(
        "sample point {point} of pin {pin}, axial level {axial}, ring {ring}, sector {sector} lies outside the transport geometry"
    )]
    Unresolved {
        pin: usize,
        axial: usize,
        ring: usize,
        sector: usize,
        point: Position,
    },

    #[error("{field} has shape {found:?}, expected {expected:?}")]
    ShapeMismatch {
        field: &'static str,
        expected: Vec<usize>,
        found: Vec<usize>,
    },

    #[error("{norm} norm of the temperature change is not finite: {value}")]
    NonFiniteNorm { norm: Norm, value: f64 },

    #[error("transport error: {0}")]
    Transport(#[source] Box<dyn StdError + Send + Sync>),

    #[error("collective operation failed: {0}")]
    Group(#[source] Box<dyn StdError + Send + Sync>),
}

impl Error {
    pub(crate) fn transport<E: StdError + Send + Sync + 'static>(err: E) -> Self {
        Self::Transport(Box::new(err))
    }

    pub(crate) fn group<E: StdError + Send + Sync + 'static>(err: E) -> Self {
        Self::Group(Box::new(err))
    }

    /// Builds a shape mismatch for a one-dimensional field.
    pub(crate) fn length(field: &'static str, expected: usize, found: usize) -> Self {
        Self::ShapeMismatch {
            field,
            expected: vec![expected],
            found: vec![found],
        }
    }
}
