//! Numeric building blocks: per-band stretches, the RGB band assembler and
//! classification legends.
pub mod classes;
pub mod composite;
pub mod stretch;
