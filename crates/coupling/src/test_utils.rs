use std::collections::HashMap;

use ndarray::{Array1, Array3, ArrayView1};
use thiserror::Error;
use uom::si::{f64::ThermodynamicTemperature, thermodynamic_temperature::kelvin};
use weft_core::{MaterialId, Position, Thermal, Transport};

/// A cell identity as a fake transport solver reports it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct CellId(pub(crate) u32);

#[derive(Debug, Error)]
#[error("fake transport failure")]
pub(crate) struct FakeError;

/// A transport solver whose geometry is a closure from points to cells.
///
/// Each cell is filled with material `100 + cell`.
pub(crate) struct FakeTransport {
    resolver: Box<dyn Fn(Position) -> Option<CellId>>,
    active: bool,
    fail_resolve: bool,
    fail_set: bool,
    temperatures: HashMap<CellId, f64>,
    tallies: Option<Vec<MaterialId>>,
}

impl FakeTransport {
    pub(crate) fn new(resolver: impl Fn(Position) -> Option<CellId> + 'static) -> Self {
        Self {
            resolver: Box::new(resolver),
            active: true,
            fail_resolve: false,
            fail_set: false,
            temperatures: HashMap::new(),
            tallies: None,
        }
    }

    /// One cell per axial interval of `bounds`, spanning every radius.
    #[allow(clippy::cast_possible_truncation)]
    pub(crate) fn by_axial_level(bounds: Vec<f64>) -> Self {
        Self::new(move |p| {
            bounds
                .windows(2)
                .position(|w| p.z >= w[0] && p.z < w[1])
                .map(|level| CellId(level as u32))
        })
    }

    pub(crate) fn inactive(self) -> Self {
        Self {
            active: false,
            ..self
        }
    }

    pub(crate) fn failing_resolve(self) -> Self {
        Self {
            fail_resolve: true,
            ..self
        }
    }

    pub(crate) fn failing_set(self) -> Self {
        Self {
            fail_set: true,
            ..self
        }
    }

    /// Last temperature set on `cell`, in kelvin.
    pub(crate) fn temperature(&self, cell: CellId) -> Option<f64> {
        self.temperatures.get(&cell).copied()
    }

    pub(crate) fn tallies(&self) -> Option<&[MaterialId]> {
        self.tallies.as_deref()
    }
}

impl Transport for FakeTransport {
    type Region = CellId;
    type Error = FakeError;

    fn is_active(&self) -> bool {
        self.active
    }

    fn resolve(&self, point: Position) -> Result<Option<CellId>, FakeError> {
        if self.fail_resolve {
            return Err(FakeError);
        }
        Ok((self.resolver)(point))
    }

    #[allow(clippy::cast_possible_wrap)]
    fn material(&self, region: &CellId) -> MaterialId {
        MaterialId(100 + region.0 as i32)
    }

    fn set_temperature(
        &mut self,
        region: &CellId,
        temperature: ThermodynamicTemperature,
    ) -> Result<(), FakeError> {
        if self.fail_set {
            return Err(FakeError);
        }
        self.temperatures
            .insert(*region, temperature.get::<kelvin>());
        Ok(())
    }

    fn create_tallies(&mut self, materials: &[MaterialId]) -> Result<(), FakeError> {
        self.tallies = Some(materials.to_vec());
        Ok(())
    }
}

/// A heat-conduction solver that only stores its grid and fields.
pub(crate) struct FakeThermal {
    pin_count: usize,
    fuel_radii: Array1<f64>,
    clad_radii: Array1<f64>,
    axial_bounds: Array1<f64>,
    pub(crate) source: Array3<f64>,
    pub(crate) temperature: Array1<f64>,
}

impl FakeThermal {
    /// Creates the solver with a source array filled with `-1.0` and a zero
    /// temperature field.
    pub(crate) fn new(
        pin_count: usize,
        fuel_radii: Array1<f64>,
        clad_radii: Array1<f64>,
        axial_bounds: Array1<f64>,
    ) -> Self {
        let axial = axial_bounds.len() - 1;
        let rings = fuel_radii.len().saturating_sub(1) + clad_radii.len().saturating_sub(1);
        Self {
            pin_count,
            fuel_radii,
            clad_radii,
            axial_bounds,
            source: Array3::from_elem((pin_count, axial, rings), -1.0),
            temperature: Array1::zeros(pin_count * axial * rings),
        }
    }
}

impl Thermal for FakeThermal {
    fn pin_count(&self) -> usize {
        self.pin_count
    }

    fn axial_count(&self) -> usize {
        self.axial_bounds.len() - 1
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
        self.fuel_radii.len().saturating_sub(1)
    }

    fn source_mut(&mut self) -> &mut Array3<f64> {
        &mut self.source
    }

    fn temperature(&self) -> ArrayView1<'_, f64> {
        self.temperature.view()
    }
}
