use thiserror::Error;
use uom::si::{
    f64::{TemperatureInterval, ThermodynamicTemperature},
    temperature_interval, thermodynamic_temperature,
};

use crate::Norm;

/// Configuration for the coupling layer.
///
/// With the `serde` feature, temperatures are (de)serialized in kelvin and
/// missing fields take their default values.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct Config {
    /// Number of azimuthal sectors sampled per radial ring.
    pub azimuthal_sectors: usize,
    /// Norm used to measure the change in temperature between iterations.
    pub norm: Norm,
    /// Convergence is reached once the norm drops below this tolerance.
    pub tolerance: TemperatureInterval,
    /// Temperature of every ring before the first thermal solve.
    pub initial_temperature: ThermodynamicTemperature,
}

/// Errors that can occur when validating a coupling config.
#[derive(Debug, Error, Clone, Copy, PartialEq)]
pub enum ConfigError {
    #[error("azimuthal_sectors must be at least 1")]
    NoSectors,

    #[error("tolerance must be finite and non-negative, got {value} K")]
    Tolerance { value: f64 },

    #[error("initial_temperature must be finite and positive, got {value} K")]
    InitialTemperature { value: f64 },
}

impl Default for Config {
    fn default() -> Self {
        Self {
            azimuthal_sectors: 4,
            norm: Norm::LInf,
            tolerance: TemperatureInterval::new::<temperature_interval::kelvin>(1e-3),
            initial_temperature: ThermodynamicTemperature::new::<thermodynamic_temperature::kelvin>(
                293.6,
            ),
        }
    }
}

impl Config {
    /// Sets the number of azimuthal sectors.
    #[must_use]
    pub fn with_azimuthal_sectors(self, azimuthal_sectors: usize) -> Self {
        Self {
            azimuthal_sectors,
            ..self
        }
    }

    /// Sets the convergence norm.
    #[must_use]
    pub fn with_norm(self, norm: Norm) -> Self {
        Self { norm, ..self }
    }

    /// Sets the convergence tolerance.
    #[must_use]
    pub fn with_tolerance(self, tolerance: TemperatureInterval) -> Self {
        Self { tolerance, ..self }
    }

    /// Sets the initial ring temperature.
    #[must_use]
    pub fn with_initial_temperature(self, initial_temperature: ThermodynamicTemperature) -> Self {
        Self {
            initial_temperature,
            ..self
        }
    }

    /// Validates the sector count and temperatures.
    ///
    /// # Errors
    ///
    /// Returns an error if there are no sectors, the tolerance is negative or
    /// non-finite, or the initial temperature is not a finite positive value.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.azimuthal_sectors == 0 {
            return Err(ConfigError::NoSectors);
        }

        let tolerance = self.tolerance_kelvin();
        if !tolerance.is_finite() || tolerance < 0.0 {
            return Err(ConfigError::Tolerance { value: tolerance });
        }

        let initial = self.initial_temperature_kelvin();
        if !initial.is_finite() || initial <= 0.0 {
            return Err(ConfigError::InitialTemperature { value: initial });
        }

        Ok(())
    }

    /// Returns the tolerance in kelvin.
    #[must_use]
    pub fn tolerance_kelvin(&self) -> f64 {
        self.tolerance.get::<temperature_interval::kelvin>()
    }

    /// Returns the initial temperature in kelvin.
    #[must_use]
    pub fn initial_temperature_kelvin(&self) -> f64 {
        self.initial_temperature
            .get::<thermodynamic_temperature::kelvin>()
    }
}
