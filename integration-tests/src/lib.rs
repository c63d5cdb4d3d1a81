//! Surrogate solvers for exercising the coupling layer end to end.

pub mod surrogates;
