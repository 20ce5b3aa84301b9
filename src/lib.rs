//! Loading, deriving and filtering media catalog datasets.
//!
//! The desktop dashboard (`src/main.rs`) is a thin layer over [`data`].

pub mod config;
pub mod data;
