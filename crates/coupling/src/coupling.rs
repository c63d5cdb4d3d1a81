use ndarray::{Array1, ArrayView1};
use tracing::debug;
use weft_core::{ProcessGroup, Thermal, Transport};

use crate::{
    Config, ConvergenceGate, Error, MeshMap, PinGrid, TemperatureHistory,
    transfer::{pull_temperature, push_heat_source},
};

/// The coupling state of one process in a Picard-iterated run.
///
/// Owns the two solver collaborators, the process group, the ring/region
/// mapping, and the field histories. A Picard driver calls, once per
/// iteration:
///
/// 1. [`set_heat_source`](Coupling::set_heat_source) with the transport
///    solver's per-region power,
/// 2. [`push_heat_source`](Coupling::push_heat_source) before the thermal
///    solve,
/// 3. [`update_temperature`](Coupling::update_temperature) after it,
/// 4. [`is_converged`](Coupling::is_converged) on every rank.
pub struct Coupling<T: Transport, H: Thermal, G: ProcessGroup> {
    transport: T,
    thermal: H,
    group: G,
    map: MeshMap<T::Region>,
    gate: ConvergenceGate,
    temperatures: TemperatureHistory,
    heat_source: Array1<f64>,
    heat_source_prev: Array1<f64>,
}

impl<T: Transport, H: Thermal, G: ProcessGroup> Coupling<T, H, G> {
    /// Sets up coupling between `transport` and `thermal`.
    ///
    /// In order: validates `config`, builds the ring/region mapping from the
    /// thermal grid, creates tallies for every mapped region's material
    /// (where transport is active), fills both temperature buffers with the
    /// initial temperature, and allocates the heat-source buffers.
    ///
    /// # Errors
    ///
    /// Returns an error if the config or grid is invalid, a sample point
    /// cannot be resolved, or the transport solver fails.
    pub fn new(mut transport: T, thermal: H, group: G, config: &Config) -> Result<Self, Error> {
        config.validate()?;
        let gate = ConvergenceGate::from_config(config)?;

        let grid = PinGrid::from_thermal(&thermal)?;
        let map = MeshMap::build(grid, config.azimuthal_sectors, &transport)?;

        if transport.is_active() {
            let materials = map.materials(&transport);
            debug!(count = materials.len(), "creating heat deposition tallies");
            transport
                .create_tallies(&materials)
                .map_err(Error::transport)?;
        }

        let temperatures = TemperatureHistory::new(
            map.grid().total_rings(),
            config.initial_temperature_kelvin(),
        );

        let region_count = if transport.is_active() {
            map.region_count()
        } else {
            0
        };

        Ok(Self {
            transport,
            thermal,
            group,
            map,
            gate,
            temperatures,
            heat_source: Array1::zeros(region_count),
            heat_source_prev: Array1::zeros(region_count),
        })
    }

    /// Number of regions this process tracks: the mapped region count where
    /// transport is active, zero elsewhere.
    #[must_use]
    pub fn region_count(&self) -> usize {
        if self.transport.is_active() {
            self.map.region_count()
        } else {
            0
        }
    }

    /// Stores a new per-region heat source, keeping the old one as previous.
    ///
    /// Any process may receive the full field, including processes without
    /// transport state, so the length is checked against the mapping rather
    /// than [`region_count`](Coupling::region_count).
    ///
    /// # Errors
    ///
    /// Returns [`Error::ShapeMismatch`] if `heat_source` does not hold one
    /// value per mapped region.
    pub fn set_heat_source(&mut self, heat_source: Array1<f64>) -> Result<(), Error> {
        if heat_source.len() != self.map.region_count() {
            return Err(Error::length(
                "heat source",
                self.map.region_count(),
                heat_source.len(),
            ));
        }
        self.heat_source_prev = std::mem::replace(&mut self.heat_source, heat_source);
        Ok(())
    }

    /// Writes the stored heat source into the thermal solver's source array.
    ///
    /// # Errors
    ///
    /// Returns an error if no full heat source has been stored on this
    /// process or the thermal source array does not match its grid.
    pub fn push_heat_source(&mut self) -> Result<(), Error> {
        push_heat_source(&self.map, self.heat_source.view(), self.thermal.source_mut())
    }

    /// Pulls the thermal solver's temperature into the history and, where
    /// transport is active, into every region.
    ///
    /// # Errors
    ///
    /// Returns an error if the temperature field has the wrong length or the
    /// transport solver rejects a temperature.
    pub fn update_temperature(&mut self) -> Result<(), Error> {
        pull_temperature(
            &self.map,
            &mut self.temperatures,
            self.thermal.temperature(),
            &mut self.transport,
        )
    }

    /// Returns the group-wide convergence decision. Collective.
    ///
    /// # Errors
    ///
    /// Returns an error if the norm cannot be evaluated on the root or the
    /// broadcast fails.
    pub fn is_converged(&self) -> Result<bool, Error> {
        self.gate.is_converged(&self.group, &self.temperatures)
    }

    #[must_use]
    pub fn map(&self) -> &MeshMap<T::Region> {
        &self.map
    }

    #[must_use]
    pub fn gate(&self) -> &ConvergenceGate {
        &self.gate
    }

    #[must_use]
    pub fn temperatures(&self) -> &TemperatureHistory {
        &self.temperatures
    }

    #[must_use]
    pub fn heat_source(&self) -> ArrayView1<'_, f64> {
        self.heat_source.view()
    }

    #[must_use]
    pub fn heat_source_prev(&self) -> ArrayView1<'_, f64> {
        self.heat_source_prev.view()
    }

    #[must_use]
    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    #[must_use]
    pub fn thermal(&self) -> &H {
        &self.thermal
    }

    pub fn thermal_mut(&mut self) -> &mut H {
        &mut self.thermal
    }

    #[must_use]
    pub fn group(&self) -> &G {
        &self.group
    }

    /// Releases the collaborators.
    pub fn into_parts(self) -> (T, H, G) {
        (self.transport, self.thermal, self.group)
    }
}
