use ndarray::{Array1, ArrayView1};
use thiserror::Error;
use weft_core::Thermal;

/// Errors describing a malformed or inconsistent thermal grid.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GridError {
    #[error("grid has no pins")]
    NoPins,

    #[error("grid has no axial levels")]
    NoAxialLevels,

    #[error("axial table has {len} boundaries, expected {expected} for {axial_count} levels")]
    AxialTable {
        axial_count: usize,
        len: usize,
        expected: usize,
    },

    #[error("fuel table has {len} boundaries, which cannot bound {fuel_ring_count} fuel rings")]
    FuelRingCount { fuel_ring_count: usize, len: usize },

    #[error("{table} boundary {index} is invalid: {value}")]
    InvalidBoundary {
        table: &'static str,
        index: usize,
        value: f64,
    },

    #[error("{table} boundaries must increase strictly, but entry {index} does not")]
    NotIncreasing { table: &'static str, index: usize },

    #[error("grid has no radial rings")]
    NoRings,

    #[error("got {len} pin centers for {pin_count} pins")]
    PinCenterCount { pin_count: usize, len: usize },

    #[error("center of pin {pin} is not finite")]
    NonFinitePinCenter { pin: usize },
}

/// The validated shape of the heat-conduction grid.
///
/// Every pin shares the same axial and radial boundaries. Radial rings are
/// numbered outward: fuel rings first, then cladding rings, so ring `j` is a
/// fuel ring exactly when `j < fuel_ring_count()`.
#[derive(Debug, Clone, PartialEq)]
pub struct PinGrid {
    pin_count: usize,
    axial_bounds: Array1<f64>,
    fuel_radii: Array1<f64>,
    clad_radii: Array1<f64>,
    pin_centers: Vec<[f64; 2]>,
}

impl PinGrid {
    /// Creates a grid with every pin centered on the origin.
    ///
    /// A radial table with fewer than two entries bounds no rings, so an
    /// empty cladding table describes a pin without cladding rings.
    ///
    /// # Errors
    ///
    /// Returns an error if the counts disagree with the tables or if any
    /// table is not finite and strictly increasing. Radii must also be
    /// non-negative.
    pub fn new(
        pin_count: usize,
        axial_count: usize,
        fuel_radii: Array1<f64>,
        clad_radii: Array1<f64>,
        axial_bounds: Array1<f64>,
        fuel_ring_count: usize,
    ) -> Result<Self, GridError> {
        if pin_count == 0 {
            return Err(GridError::NoPins);
        }
        if axial_count == 0 {
            return Err(GridError::NoAxialLevels);
        }
        if axial_bounds.len() != axial_count + 1 {
            return Err(GridError::AxialTable {
                axial_count,
                len: axial_bounds.len(),
                expected: axial_count + 1,
            });
        }
        if rings_in(fuel_radii.view()) != fuel_ring_count {
            return Err(GridError::FuelRingCount {
                fuel_ring_count,
                len: fuel_radii.len(),
            });
        }

        validate_table("axial", axial_bounds.view(), false)?;
        validate_table("fuel", fuel_radii.view(), true)?;
        validate_table("clad", clad_radii.view(), true)?;

        if rings_in(fuel_radii.view()) + rings_in(clad_radii.view()) == 0 {
            return Err(GridError::NoRings);
        }

        Ok(Self {
            pin_count,
            axial_bounds,
            fuel_radii,
            clad_radii,
            pin_centers: vec![[0.0, 0.0]; pin_count],
        })
    }

    /// Reads and validates the grid exposed by a heat-conduction solver.
    ///
    /// # Errors
    ///
    /// Returns an error if the solver's grid is malformed.
    pub fn from_thermal<H: Thermal + ?Sized>(thermal: &H) -> Result<Self, GridError> {
        let grid = Self::new(
            thermal.pin_count(),
            thermal.axial_count(),
            thermal.fuel_radii().to_owned(),
            thermal.clad_radii().to_owned(),
            thermal.axial_bounds().to_owned(),
            thermal.fuel_ring_count(),
        )?;

        let centers = (0..grid.pin_count)
            .map(|pin| thermal.pin_center(pin))
            .collect();
        grid.with_pin_centers(centers)
    }

    /// Replaces the lateral pin centers.
    ///
    /// # Errors
    ///
    /// Returns an error if there is not exactly one finite center per pin.
    pub fn with_pin_centers(mut self, centers: Vec<[f64; 2]>) -> Result<Self, GridError> {
        if centers.len() != self.pin_count {
            return Err(GridError::PinCenterCount {
                pin_count: self.pin_count,
                len: centers.len(),
            });
        }
        if let Some(pin) = centers
            .iter()
            .position(|c| !c[0].is_finite() || !c[1].is_finite())
        {
            return Err(GridError::NonFinitePinCenter { pin });
        }

        self.pin_centers = centers;
        Ok(self)
    }

    #[must_use]
    pub fn pin_count(&self) -> usize {
        self.pin_count
    }

    #[must_use]
    pub fn axial_count(&self) -> usize {
        self.axial_bounds.len() - 1
    }

    #[must_use]
    pub fn fuel_ring_count(&self) -> usize {
        rings_in(self.fuel_radii.view())
    }

    #[must_use]
    pub fn clad_ring_count(&self) -> usize {
        rings_in(self.clad_radii.view())
    }

    /// Number of radial rings in one axial level of one pin.
    #[must_use]
    pub fn ring_count(&self) -> usize {
        self.fuel_ring_count() + self.clad_ring_count()
    }

    /// Number of rings across the whole grid, which is the length of every
    /// ring-indexed field.
    #[must_use]
    pub fn total_rings(&self) -> usize {
        self.pin_count * self.axial_count() * self.ring_count()
    }

    /// Shape of the `(pin, axial, ring)` source array.
    #[must_use]
    pub fn source_shape(&self) -> [usize; 3] {
        [self.pin_count, self.axial_count(), self.ring_count()]
    }

    #[must_use]
    pub fn fuel_radii(&self) -> ArrayView1<'_, f64> {
        self.fuel_radii.view()
    }

    #[must_use]
    pub fn clad_radii(&self) -> ArrayView1<'_, f64> {
        self.clad_radii.view()
    }

    #[must_use]
    pub fn axial_bounds(&self) -> ArrayView1<'_, f64> {
        self.axial_bounds.view()
    }

    /// Lateral center of `pin`.
    ///
    /// # Panics
    ///
    /// Panics if `pin` is out of range.
    #[must_use]
    pub fn pin_center(&self, pin: usize) -> [f64; 2] {
        self.pin_centers[pin]
    }

    /// Linearizes a `(pin, axial, ring)` address, row-major.
    #[must_use]
    pub fn ring_index(&self, pin: usize, axial: usize, ring: usize) -> usize {
        (pin * self.axial_count() + axial) * self.ring_count() + ring
    }

    /// Recovers the radial component of a linear ring index.
    #[must_use]
    pub fn radial_index(&self, ring_index: usize) -> usize {
        ring_index % self.ring_count()
    }

    /// Returns true if radial ring `ring` lies in the fuel.
    #[must_use]
    pub fn is_fuel(&self, ring: usize) -> bool {
        ring < self.fuel_ring_count()
    }

    /// Inner and outer radius of radial ring `ring`.
    ///
    /// # Panics
    ///
    /// Panics if `ring` is not below [`PinGrid::ring_count`].
    #[must_use]
    pub fn radial_bounds(&self, ring: usize) -> [f64; 2] {
        if self.is_fuel(ring) {
            [self.fuel_radii[ring], self.fuel_radii[ring + 1]]
        } else {
            let m = ring - self.fuel_ring_count();
            [self.clad_radii[m], self.clad_radii[m + 1]]
        }
    }

    /// Midpoint radius of radial ring `ring`.
    #[must_use]
    pub fn radial_midpoint(&self, ring: usize) -> f64 {
        let [inner, outer] = self.radial_bounds(ring);
        0.5 * (inner + outer)
    }

    /// Midpoint height of axial level `axial`.
    #[must_use]
    pub fn axial_midpoint(&self, axial: usize) -> f64 {
        0.5 * (self.axial_bounds[axial] + self.axial_bounds[axial + 1])
    }

    /// Annular area `r_outer² − r_inner²` of radial ring `ring`, up to a
    /// factor of π.
    ///
    /// Rings of one region share their axial height and angular span, so
    /// this area is proportional to ring volume when averaging over a region.
    #[must_use]
    pub fn volume_proxy(&self, ring: usize) -> f64 {
        let [inner, outer] = self.radial_bounds(ring);
        outer * outer - inner * inner
    }
}

/// Number of intervals bounded by `table`.
fn rings_in(table: ArrayView1<'_, f64>) -> usize {
    table.len().saturating_sub(1)
}

/// Checks that `table` is finite and strictly increasing.
fn validate_table(
    table: &'static str,
    values: ArrayView1<'_, f64>,
    non_negative: bool,
) -> Result<(), GridError> {
    for (index, &value) in values.iter().enumerate() {
        if !value.is_finite() || (non_negative && value < 0.0) {
            return Err(GridError::InvalidBoundary {
                table,
                index,
                value,
            });
        }
        if index > 0 && value <= values[index - 1] {
            return Err(GridError::NotIncreasing { table, index });
        }
    }
    Ok(())
}
