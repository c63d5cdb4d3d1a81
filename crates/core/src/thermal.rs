use ndarray::{Array3, ArrayView1};

/// The capabilities Weft needs from a heat-conduction solver.
///
/// The solver discretizes each fuel pin into axial levels and radial rings.
/// Rings below [`Thermal::fuel_ring_count`] lie in the fuel and are bounded
/// by consecutive entries of [`Thermal::fuel_radii`]; the remaining rings lie
/// in the cladding and are bounded by consecutive entries of
/// [`Thermal::clad_radii`].
///
/// Fields are laid out row-major over `(pin, axial, ring)`:
///
/// ```text
///   ring_index = (pin * axial_count + axial) * ring_count + ring
/// ```
pub trait Thermal {
    /// Number of fuel pins.
    fn pin_count(&self) -> usize;

    /// Number of axial levels per pin.
    fn axial_count(&self) -> usize;

    /// Radial boundaries of the fuel rings, innermost first.
    fn fuel_radii(&self) -> ArrayView1<'_, f64>;

    /// Radial boundaries of the cladding rings, innermost first.
    fn clad_radii(&self) -> ArrayView1<'_, f64>;

    /// Axial boundaries shared by every pin, bottom first.
    fn axial_bounds(&self) -> ArrayView1<'_, f64>;

    /// Number of radial rings lying in the fuel.
    fn fuel_ring_count(&self) -> usize;

    /// Lateral center of `pin` in the transport solver's frame.
    ///
    /// Defaults to the origin for every pin.
    fn pin_center(&self, _pin: usize) -> [f64; 2] {
        [0.0, 0.0]
    }

    /// Mutable heat source addressed by `(pin, axial, ring)`.
    fn source_mut(&mut self) -> &mut Array3<f64>;

    /// Temperature field in kelvin, flattened by ring index.
    fn temperature(&self) -> ArrayView1<'_, f64>;
}
