//! Core building blocks: display parameters and the stretch/assembly
//! primitives consumed by the high-level `api` module.
pub mod params;
pub mod processing;
