//! Planar geometry structures, algorithms and run settings shared by the
//! parcel overlap tools.

pub mod algorithms;
pub mod configs;
pub mod structures;
pub mod utils;
