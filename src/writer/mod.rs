//! Output writers consuming rendered paths.

pub mod eps;

pub use eps::EpsWriter;
