use std::{collections::HashMap, f64::consts::PI};

use ndarray::{Array1, Array3, ArrayView1, s};
use thiserror::Error;
use uom::si::{f64::ThermodynamicTemperature, thermodynamic_temperature::kelvin};
use weft_core::{MaterialId, Position, Thermal, Transport};

/// A square lattice of identical fuel pins.
#[derive(Debug, Clone, PartialEq)]
pub struct Lattice {
    pub centers: Vec<[f64; 2]>,
    pub fuel_radii: Vec<f64>,
    pub clad_radii: Vec<f64>,
    pub axial_bounds: Vec<f64>,
}

impl Lattice {
    /// Four pins on a 1.26 cm pitch, three fuel rings, one clad ring, and four
    /// axial levels over 10 cm.
    #[must_use]
    pub fn two_by_two() -> Self {
        let half_pitch = 0.63;
        Self {
            centers: vec![
                [-half_pitch, -half_pitch],
                [half_pitch, -half_pitch],
                [-half_pitch, half_pitch],
                [half_pitch, half_pitch],
            ],
            fuel_radii: vec![0.0, 0.2, 0.3, 0.406],
            clad_radii: vec![0.414, 0.475],
            axial_bounds: vec![0.0, 2.5, 5.0, 7.5, 10.0],
        }
    }

    fn axial_count(&self) -> usize {
        self.axial_bounds.len() - 1
    }

    fn fuel_ring_count(&self) -> usize {
        self.fuel_radii.len().saturating_sub(1)
    }

    fn ring_count(&self) -> usize {
        self.fuel_ring_count() + self.clad_radii.len().saturating_sub(1)
    }

    fn level_of(&self, z: f64) -> Option<usize> {
        self.axial_bounds
            .windows(2)
            .position(|w| z >= w[0] && z < w[1])
    }
}

/// The material zone of a pin cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Zone {
    Fuel,
    Clad,
}

/// One cell of the surrogate transport geometry: a zone of one axial level
/// of one pin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PinCell {
    pub pin: usize,
    pub level: usize,
    pub zone: Zone,
}

#[derive(Debug, Error, PartialEq)]
pub enum SurrogateError {
    #[error("cannot set non-physical temperature {value} K")]
    Temperature { value: f64 },
}

/// A transport stand-in with an analytic power shape and Doppler feedback.
///
/// Fuel cells produce `peak_power · sin(πz/H) · (1 − doppler · (T − T_ref))`;
/// clad cells produce nothing.
#[derive(Debug, Clone)]
pub struct PinCellTransport {
    lattice: Lattice,
    active: bool,
    temperatures: HashMap<PinCell, f64>,
    tallies: Vec<MaterialId>,
    pub peak_power: f64,
    pub doppler: f64,
    pub reference_temperature: f64,
}

impl PinCellTransport {
    #[must_use]
    pub fn new(lattice: Lattice) -> Self {
        Self {
            lattice,
            active: true,
            temperatures: HashMap::new(),
            tallies: Vec::new(),
            peak_power: 100.0,
            doppler: 1e-3,
            reference_temperature: 900.0,
        }
    }

    /// Marks this process as holding no transport state.
    #[must_use]
    pub fn inactive(self) -> Self {
        Self {
            active: false,
            ..self
        }
    }

    /// Last temperature set on `cell`, in kelvin.
    #[must_use]
    pub fn temperature(&self, cell: &PinCell) -> Option<f64> {
        self.temperatures.get(cell).copied()
    }

    #[must_use]
    pub fn tallies(&self) -> &[MaterialId] {
        &self.tallies
    }

    /// Heat produced in `cell` at its current temperature.
    #[must_use]
    pub fn power(&self, cell: &PinCell) -> f64 {
        match cell.zone {
            Zone::Clad => 0.0,
            Zone::Fuel => {
                let bounds = &self.lattice.axial_bounds;
                let (bottom, top) = (bounds[0], bounds[bounds.len() - 1]);
                let z = 0.5 * (bounds[cell.level] + bounds[cell.level + 1]);
                let shape = (PI * (z - bottom) / (top - bottom)).sin();

                let temperature = self
                    .temperature(cell)
                    .unwrap_or(self.reference_temperature);
                let feedback = 1.0 - self.doppler * (temperature - self.reference_temperature);

                self.peak_power * shape * feedback
            }
        }
    }

    /// Heat produced in each of `cells`, in order.
    #[must_use]
    pub fn heat_source(&self, cells: &[PinCell]) -> Array1<f64> {
        cells.iter().map(|cell| self.power(cell)).collect()
    }

    fn locate(&self, point: Position) -> Option<PinCell> {
        let lattice = &self.lattice;
        let clad_outer = *lattice.clad_radii.last()?;
        let fuel_outer = *lattice.fuel_radii.last()?;
        let clad_inner = *lattice.clad_radii.first()?;

        let pin = lattice
            .centers
            .iter()
            .position(|&c| point.radial_distance(c) <= clad_outer)?;
        let level = lattice.level_of(point.z)?;

        let r = point.radial_distance(lattice.centers[pin]);
        let zone = if r <= fuel_outer {
            Zone::Fuel
        } else if r >= clad_inner {
            Zone::Clad
        } else {
            return None;
        };

        Some(PinCell { pin, level, zone })
    }
}

impl Transport for PinCellTransport {
    type Region = PinCell;
    type Error = SurrogateError;

    fn is_active(&self) -> bool {
        self.active
    }

    fn resolve(&self, point: Position) -> Result<Option<PinCell>, SurrogateError> {
        Ok(self.locate(point))
    }

    #[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
    fn material(&self, region: &PinCell) -> MaterialId {
        let zone = match region.zone {
            Zone::Fuel => 0,
            Zone::Clad => 1,
        };
        let cell = region.pin * self.lattice.axial_count() + region.level;
        MaterialId((2 * cell + zone) as i32)
    }

    fn set_temperature(
        &mut self,
        region: &PinCell,
        temperature: ThermodynamicTemperature,
    ) -> Result<(), SurrogateError> {
        let value = temperature.get::<kelvin>();
        if !value.is_finite() || value <= 0.0 {
            return Err(SurrogateError::Temperature { value });
        }
        self.temperatures.insert(*region, value);
        Ok(())
    }

    fn create_tallies(&mut self, materials: &[MaterialId]) -> Result<(), SurrogateError> {
        self.tallies = materials.to_vec();
        Ok(())
    }
}

/// A heat-conduction stand-in with lumped thermal resistances.
///
/// Each ring sits above the coolant by `clad_resistance` times the mean fuel
/// source of its axial level; fuel rings add `fuel_resistance` times their
/// own source.
#[derive(Debug, Clone)]
pub struct LumpedThermal {
    lattice: Lattice,
    fuel_radii: Array1<f64>,
    clad_radii: Array1<f64>,
    axial_bounds: Array1<f64>,
    source: Array3<f64>,
    temperature: Array1<f64>,
    pub coolant_temperature: f64,
    pub fuel_resistance: f64,
    pub clad_resistance: f64,
}

impl LumpedThermal {
    #[must_use]
    pub fn new(lattice: Lattice) -> Self {
        let shape = (
            lattice.centers.len(),
            lattice.axial_count(),
            lattice.ring_count(),
        );
        let coolant_temperature = 565.0;

        Self {
            fuel_radii: Array1::from(lattice.fuel_radii.clone()),
            clad_radii: Array1::from(lattice.clad_radii.clone()),
            axial_bounds: Array1::from(lattice.axial_bounds.clone()),
            source: Array3::zeros(shape),
            temperature: Array1::from_elem(shape.0 * shape.1 * shape.2, coolant_temperature),
            lattice,
            coolant_temperature,
            fuel_resistance: 2.0,
            clad_resistance: 1.0,
        }
    }

    /// Source array as last written by the coupling layer.
    #[must_use]
    pub fn source(&self) -> &Array3<f64> {
        &self.source
    }

    /// Recomputes the temperature field from the current source.
    #[allow(clippy::cast_precision_loss)]
    pub fn solve(&mut self) {
        let (pins, levels, rings) = self.source.dim();
        let fuel_rings = self.lattice.fuel_ring_count();

        for pin in 0..pins {
            for level in 0..levels {
                let fuel = self.source.slice(s![pin, level, ..fuel_rings]);
                let mean = fuel.sum() / fuel_rings as f64;
                let base = self.coolant_temperature + self.clad_resistance * mean;

                for ring in 0..rings {
                    let index = (pin * levels + level) * rings + ring;
                    self.temperature[index] = if ring < fuel_rings {
                        base + self.fuel_resistance * self.source[[pin, level, ring]]
                    } else {
                        base
                    };
                }
            }
        }
    }
}

impl Thermal for LumpedThermal {
    fn pin_count(&self) -> usize {
        self.lattice.centers.len()
    }

    fn axial_count(&self) -> usize {
        self.lattice.axial_count()
    }

    fn fuel_radii(&self) -> ArrayView1<'_, f64> {
        self.fuel_radii.view()
    }

    fn clad_radii(&self) -> ArrayView1<'_, f64> {
        self.clad_radii.view()
    }

    fn axial_bounds(&self) -> ArrayView1<'_, f64> {
        self.axial_bounds.view()
    }

    fn fuel_ring_count(&self) -> usize {
        self.lattice.fuel_ring_count()
    }

    fn pin_center(&self, pin: usize) -> [f64; 2] {
        self.lattice.centers[pin]
    }

    fn source_mut(&mut self) -> &mut Array3<f64> {
        &mut self.source
    }

    fn temperature(&self) -> ArrayView1<'_, f64> {
        self.temperature.view()
    }
}
