//! Field transfer between transport regions and thermal-grid rings.
//!
//! Heat source moves region → ring by averaging over the regions sampled
//! from each fuel ring. Temperature moves ring → region by averaging over the
//! rings that sampled each region, weighted by ring volume.

use ndarray::{Array1, Array3, ArrayView1};
use tracing::debug;
use uom::si::{f64::ThermodynamicTemperature, thermodynamic_temperature::kelvin};
use weft_core::Transport;

use crate::{Error, MeshMap, TemperatureHistory};

/// Writes the per-region heat source into the thermal grid's source array.
///
/// Every fuel ring receives the arithmetic mean of `heat_source` over its
/// sampled regions, repeats included. Every other ring is set to zero, so
/// the whole array is overwritten.
///
/// # Errors
///
/// Returns [`Error::ShapeMismatch`] if `heat_source` does not hold one value
/// per region or `source` does not match the grid. Nothing is written in
/// that case.
#[allow(clippy::cast_precision_loss)]
pub fn push_heat_source<R>(
    map: &MeshMap<R>,
    heat_source: ArrayView1<'_, f64>,
    source: &mut Array3<f64>,
) -> Result<(), Error> {
    if heat_source.len() != map.region_count() {
        return Err(Error::length(
            "heat source",
            map.region_count(),
            heat_source.len(),
        ));
    }

    let grid = map.grid();
    let shape = grid.source_shape();
    if source.shape() != shape.as_slice() {
        return Err(Error::ShapeMismatch {
            field: "thermal source",
            expected: shape.to_vec(),
            found: source.shape().to_vec(),
        });
    }

    source.fill(0.0);

    for pin in 0..grid.pin_count() {
        for axial in 0..grid.axial_count() {
            for ring in 0..grid.fuel_ring_count() {
                let regions = map.ring_to_regions(grid.ring_index(pin, axial, ring));
                let total: f64 = regions.iter().map(|&i| heat_source[i]).sum();
                source[[pin, axial, ring]] = total / regions.len() as f64;
            }
        }
    }

    Ok(())
}

/// Computes the volume-weighted temperature of every region.
///
/// Region `i` gets `Σ T[r]·v(r) / Σ v(r)` over `region_to_rings(i)`, where
/// `v` is [`PinGrid::volume_proxy`](crate::PinGrid::volume_proxy) of the
/// ring's radial index. Equal weights reduce this to the plain mean.
///
/// # Errors
///
/// Returns [`Error::ShapeMismatch`] if `temperature` does not hold one value
/// per ring.
pub fn region_temperatures<R>(
    map: &MeshMap<R>,
    temperature: ArrayView1<'_, f64>,
) -> Result<Array1<f64>, Error> {
    if temperature.len() != map.ring_count() {
        return Err(Error::length(
            "temperature",
            map.ring_count(),
            temperature.len(),
        ));
    }

    let grid = map.grid();
    let averages = (0..map.region_count()).map(|region| {
        let (weighted, volume) = map.region_to_rings(region).iter().fold(
            (0.0, 0.0),
            |(weighted, volume), &ring_index| {
                let v = grid.volume_proxy(grid.radial_index(ring_index));
                (weighted + temperature[ring_index] * v, volume + v)
            },
        );
        weighted / volume
    });

    Ok(Array1::from_iter(averages))
}

/// Refreshes the temperature history and pushes region temperatures into
/// the transport solver.
///
/// `history` advances on every process, so the convergence check sees the
/// new field everywhere. Region temperatures are only computed and set where
/// the transport solver is active, and the history advances only after every
/// region has accepted its temperature.
///
/// # Errors
///
/// Returns an error if `temperature` has the wrong length or the transport
/// solver rejects a temperature. In either case `history` is unchanged, but
/// regions set before a rejected one keep their new temperatures.
pub fn pull_temperature<T>(
    map: &MeshMap<T::Region>,
    history: &mut TemperatureHistory,
    temperature: ArrayView1<'_, f64>,
    transport: &mut T,
) -> Result<(), Error>
where
    T: Transport + ?Sized,
{
    if !transport.is_active() {
        debug!("transport inactive on this process, skipping region temperatures");
        return history.advance(temperature);
    }

    let averages = region_temperatures(map, temperature)?;
    for (region, &value) in map.regions().iter().zip(averages.iter()) {
        transport
            .set_temperature(region, ThermodynamicTemperature::new::<kelvin>(value))
            .map_err(Error::transport)?;
    }

    history.advance(temperature)
}
