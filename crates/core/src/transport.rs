use std::{error::Error as StdError, fmt, hash::Hash};

use uom::si::f64::ThermodynamicTemperature;

use crate::Position;

/// Identifier of a material in the transport solver's geometry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MaterialId(pub i32);

impl fmt::Display for MaterialId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "material {}", self.0)
    }
}

/// The capabilities Weft needs from a neutron-transport solver.
///
/// The solver owns its geometry and the temperature of every region in it.
/// Weft never touches that state directly: it resolves sample points into
/// region handles, asks for each region's material, and pushes averaged
/// temperatures back through [`Transport::set_temperature`].
///
/// Not every process in a coupled run holds transport state. Processes that
/// only run the heat-conduction solve report `false` from
/// [`Transport::is_active`], and Weft skips region-count-dependent work on
/// them.
pub trait Transport {
    /// A handle to one region ("cell instance") of the geometry.
    ///
    /// Two handles must compare equal exactly when the solver considers them
    /// the same physical cell, regardless of which point they were resolved
    /// from.
    type Region: Clone + Eq + Hash;

    type Error: StdError + Send + Sync + 'static;

    /// Returns true if this process holds transport state.
    fn is_active(&self) -> bool;

    /// Finds the region containing `point`.
    ///
    /// Returns `Ok(None)` when the point lies outside the geometry.
    ///
    /// # Errors
    ///
    /// Returns an error if the solver fails while searching its geometry.
    fn resolve(&self, point: Position) -> Result<Option<Self::Region>, Self::Error>;

    /// Returns the material filling `region`.
    fn material(&self, region: &Self::Region) -> MaterialId;

    /// Sets the temperature used by the solver for `region`.
    ///
    /// # Errors
    ///
    /// Returns an error if the solver rejects the temperature.
    fn set_temperature(
        &mut self,
        region: &Self::Region,
        temperature: ThermodynamicTemperature,
    ) -> Result<(), Self::Error>;

    /// Creates the tallies that score heat deposition in `materials`.
    ///
    /// Materials are listed in region index order, one entry per region.
    ///
    /// # Errors
    ///
    /// Returns an error if the solver cannot create the tallies.
    fn create_tallies(&mut self, materials: &[MaterialId]) -> Result<(), Self::Error>;
}
