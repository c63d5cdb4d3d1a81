//! Mesh coupling and convergence for Picard-iterated neutronics and heat
//! transfer.
//!
//! A transport solver describes the reactor as irregular geometric regions;
//! a heat-conduction solver describes each fuel pin as a structured grid of
//! axial levels, radial rings, and azimuthal sectors. This crate reconciles
//! the two:
//!
//! - [`PinGrid`]: the validated shape of the thermal grid
//! - [`sampler`]: representative sample points for grid sectors
//! - [`MeshMap`]: the bidirectional ring/region index mapping
//! - [`transfer`]: heat source pushed region → ring, temperature pulled
//!   ring → region
//! - [`TemperatureHistory`], [`Norm`], [`ConvergenceGate`]: the collective
//!   decision that ends the Picard loop
//! - [`Coupling`]: owns the collaborators and exposes the primitives a
//!   Picard driver calls each iteration
//!
//! The solvers themselves are reached through the capability traits of
//! [`weft_core`].

mod config;
mod convergence;
mod coupling;
mod error;
mod grid;
mod history;
mod mapping;
mod norm;

pub mod sampler;
pub mod transfer;

#[cfg(test)]
pub(crate) mod test_utils;

pub use config::{Config, ConfigError};
pub use convergence::{ConvergenceGate, NormCheck, ROOT_RANK};
pub use coupling::Coupling;
pub use error::Error;
pub use grid::{GridError, PinGrid};
pub use history::TemperatureHistory;
pub use mapping::MeshMap;
pub use norm::Norm;
