use std::fmt;

use ndarray::ArrayView1;

use crate::Error;

/// Norms available for measuring the change between two temperature fields.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[non_exhaustive]
pub enum Norm {
    /// Largest absolute difference.
    #[default]
    #[cfg_attr(feature = "serde", serde(rename = "linf"))]
    LInf,

    /// Sum of absolute differences.
    #[cfg_attr(feature = "serde", serde(rename = "l1"))]
    L1,

    /// Euclidean length of the difference.
    #[cfg_attr(feature = "serde", serde(rename = "l2"))]
    L2,
}

impl Norm {
    /// Computes the norm of `current − previous`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ShapeMismatch`] if the fields differ in length.
    pub fn compute(
        self,
        current: ArrayView1<'_, f64>,
        previous: ArrayView1<'_, f64>,
    ) -> Result<f64, Error> {
        if current.len() != previous.len() {
            return Err(Error::length(
                "previous temperature",
                current.len(),
                previous.len(),
            ));
        }

        let diffs = current.iter().zip(previous.iter()).map(|(c, p)| (c - p).abs());
        let value = match self {
            // `f64::max` would discard NaN, so keep it explicitly.
            Self::LInf => diffs.fold(0.0, |acc, d| {
                if d.is_nan() || d > acc { d } else { acc }
            }),
            Self::L1 => diffs.sum::<f64>(),
            Self::L2 => diffs.map(|d| d * d).sum::<f64>().sqrt(),
        };
        Ok(value)
    }

    /// Short lowercase name, as used in configuration and logs.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::LInf => "linf",
            Self::L1 => "l1",
            Self::L2 => "l2",
        }
    }
}

impl fmt::Display for Norm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use ndarray::array;

    use super::*;

    #[test]
    fn computes_each_norm() {
        let current = array![1.0, -2.0, 5.0];
        let previous = array![0.0, 1.0, 1.0];

        let cases = [(Norm::LInf, 4.0), (Norm::L1, 8.0), (Norm::L2, 26.0_f64.sqrt())];
        for (norm, expected) in cases {
            let value = norm.compute(current.view(), previous.view()).unwrap();
            assert_relative_eq!(value, expected);
        }
    }

    #[test]
    fn identical_fields_have_zero_norm() {
        let field = array![293.6, 600.0, 900.0];

        for norm in [Norm::LInf, Norm::L1, Norm::L2] {
            assert_eq!(norm.compute(field.view(), field.view()).unwrap(), 0.0);
        }
    }

    #[test]
    fn propagates_nan() {
        let current = array![1.0, f64::NAN];
        let previous = array![1.0, 2.0];

        assert!(Norm::LInf.compute(current.view(), previous.view()).unwrap().is_nan());
        assert!(Norm::L1.compute(current.view(), previous.view()).unwrap().is_nan());
        assert!(Norm::L2.compute(current.view(), previous.view()).unwrap().is_nan());
    }

    #[test]
    fn rejects_mismatched_lengths() {
        let result = Norm::LInf.compute(array![1.0, 2.0].view(), array![1.0].view());
        assert!(matches!(result, Err(Error::ShapeMismatch { .. })));
    }

    #[test]
    fn default_is_linf() {
        assert_eq!(Norm::default(), Norm::LInf);
        assert_eq!(Norm::LInf.to_string(), "linf");
    }
}
