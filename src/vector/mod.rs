/*
This code is part of the parcel overlap detection tools.
Created: 05/10/2026
Last Modified: 11/10/2026
License: MIT
*/

// private sub-module defined in other files
mod validity;
mod wkt_text;

// exports identifiers from private sub-modules in the current module namespace
pub use self::validity::{validate, InvalidReason};
pub use self::wkt_text::{canonical_wkt, geometry_kind, parse_wkt};
