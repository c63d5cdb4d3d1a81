//! Core traits and types for the Weft coupling layer.
//!
//! Weft couples a neutron-transport solver to a heat-conduction solver. The
//! solvers themselves live outside this workspace; this crate defines the
//! capabilities Weft needs from them:
//!
//! - [`Transport`]: resolves points to regions, owns region temperatures,
//!   and instruments materials with tallies
//! - [`Thermal`]: exposes the pin/axial/radial grid, its source array, and
//!   its temperature field
//! - [`ProcessGroup`]: rank identity and the collective broadcast used to
//!   keep every process in lockstep
//!
//! Two process groups are always available: [`SerialGroup`] for a single
//! process and [`ChannelGroup`] for several ranks inside one OS process.
//! With the `mpi` feature, `MpiGroup` wraps an MPI communicator.

mod group;
mod position;
mod thermal;
mod transport;

#[cfg(feature = "mpi")]
pub use group::MpiGroup;
pub use group::{ChannelGroup, GroupError, ProcessGroup, SerialGroup};
pub use position::Position;
pub use thermal::Thermal;
pub use transport::{MaterialId, Transport};
