pub mod color;
pub mod error;
pub mod histogram;
pub mod inverse_cdf;
pub mod loader;
pub mod rng;
pub mod statistics;
