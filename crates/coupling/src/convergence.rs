use tracing::{info, warn};
use uom::si::{f64::TemperatureInterval, temperature_interval::kelvin};
use weft_core::{GroupError, ProcessGroup};

use crate::{Config, ConfigError, Error, Norm, TemperatureHistory};

/// Rank that evaluates the norm and broadcasts the decision.
pub const ROOT_RANK: usize = 0;

// Verdicts broadcast by the root.
const CONTINUE: u8 = 0;
const CONVERGED: u8 = 1;
const ABORT: u8 = 2;

/// Outcome of comparing the temperature change against the tolerance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NormCheck {
    /// Norm of `current − previous`, in kelvin.
    pub norm: f64,
    /// Whether the norm is below the tolerance.
    pub converged: bool,
}

/// Decides, collectively, whether the Picard loop has converged.
///
/// Only [`ROOT_RANK`] evaluates the norm; every other rank adopts the
/// root's decision through a broadcast, so the whole group leaves the loop
/// on the same iteration. Nothing is carried over between calls.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConvergenceGate {
    norm: Norm,
    tolerance: f64,
}

impl ConvergenceGate {
    /// Creates a gate comparing `norm` against `tolerance`.
    ///
    /// # Errors
    ///
    /// Returns an error if the tolerance is negative or non-finite.
    pub fn new(norm: Norm, tolerance: TemperatureInterval) -> Result<Self, ConfigError> {
        let tolerance = tolerance.get::<kelvin>();
        if !tolerance.is_finite() || tolerance < 0.0 {
            return Err(ConfigError::Tolerance { value: tolerance });
        }
        Ok(Self { norm, tolerance })
    }

    /// Creates a gate from the norm and tolerance of `config`.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured tolerance is invalid.
    pub fn from_config(config: &Config) -> Result<Self, ConfigError> {
        Self::new(config.norm, config.tolerance)
    }

    #[must_use]
    pub fn norm(&self) -> Norm {
        self.norm
    }

    /// Returns the tolerance in kelvin.
    #[must_use]
    pub fn tolerance_kelvin(&self) -> f64 {
        self.tolerance
    }

    /// Evaluates the norm of the latest temperature change on this process.
    ///
    /// # Errors
    ///
    /// Returns an error if the norm is NaN or infinite.
    pub fn check(&self, history: &TemperatureHistory) -> Result<NormCheck, Error> {
        let value = self.norm.compute(history.current(), history.previous())?;
        if !value.is_finite() {
            return Err(Error::NonFiniteNorm {
                norm: self.norm,
                value,
            });
        }

        Ok(NormCheck {
            norm: value,
            converged: value < self.tolerance,
        })
    }

    /// Returns the group-wide convergence decision.
    ///
    /// Must be called by every rank of `group`. The root evaluates
    /// [`check`](ConvergenceGate::check) on its own history; other ranks
    /// ignore theirs.
    ///
    /// # Errors
    ///
    /// Returns an error if the root cannot evaluate the norm or the broadcast
    /// fails. A root that cannot evaluate the norm still completes the
    /// broadcast, telling the other ranks to stop, and then returns its own
    /// error. The other ranks return [`Error::Group`] with
    /// [`GroupError::Aborted`].
    pub fn is_converged<G>(&self, group: &G, history: &TemperatureHistory) -> Result<bool, Error>
    where
        G: ProcessGroup + ?Sized,
    {
        if group.rank() == ROOT_RANK {
            let outcome = self.check(history);
            let mut verdict = match &outcome {
                Ok(check) => {
                    info!(
                        norm = check.norm,
                        kind = %self.norm,
                        tolerance = self.tolerance,
                        converged = check.converged,
                        "temperature norm"
                    );
                    if check.converged { CONVERGED } else { CONTINUE }
                }
                Err(err) => {
                    warn!(%err, "aborting the convergence check on every rank");
                    ABORT
                }
            };

            let sent = group.broadcast_u8(ROOT_RANK, &mut verdict);
            let check = outcome?;
            sent.map_err(Error::group)?;
            return Ok(check.converged);
        }

        let mut verdict = ABORT;
        group
            .broadcast_u8(ROOT_RANK, &mut verdict)
            .map_err(Error::group)?;

        match verdict {
            CONVERGED => Ok(true),
            CONTINUE => Ok(false),
            _ => Err(Error::group(GroupError::Aborted { root: ROOT_RANK })),
        }
    }
}
