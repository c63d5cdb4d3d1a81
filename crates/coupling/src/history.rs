use ndarray::{Array1, ArrayView1};

use crate::Error;

/// The current and previous ring-indexed temperature fields.
///
/// Each [`advance`](TemperatureHistory::advance) copies `current` into
/// `previous` before overwriting `current`, so `previous` always holds the
/// field from exactly one refresh back.
#[derive(Debug, Clone, PartialEq)]
pub struct TemperatureHistory {
    current: Array1<f64>,
    previous: Array1<f64>,
}

impl TemperatureHistory {
    /// Creates a history of `len` rings, with both fields at `initial` kelvin.
    #[must_use]
    pub fn new(len: usize, initial: f64) -> Self {
        Self {
            current: Array1::from_elem(len, initial),
            previous: Array1::from_elem(len, initial),
        }
    }

    /// Shifts `current` into `previous` and stores `next` as `current`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ShapeMismatch`] if `next` has the wrong length. The
    /// history is left untouched in that case.
    pub fn advance(&mut self, next: ArrayView1<'_, f64>) -> Result<(), Error> {
        if next.len() != self.current.len() {
            return Err(Error::length("temperature", self.current.len(), next.len()));
        }

        self.previous.assign(&self.current);
        self.current.assign(&next);
        Ok(())
    }

    #[must_use]
    pub fn current(&self) -> ArrayView1<'_, f64> {
        self.current.view()
    }

    #[must_use]
    pub fn previous(&self) -> ArrayView1<'_, f64> {
        self.previous.view()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.current.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.current.is_empty()
    }
}
