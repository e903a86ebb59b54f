/*
This code is part of the parcel overlap detection tools.
Created: 03/10/2026
Last Modified: 09/10/2026
License: MIT
*/
// private sub-module defined in other files
mod poly_area;
mod poly_ops;
mod ring_ops;

// exports identifiers from private sub-modules in the current module namespace
pub use self::poly_area::{polygon_area, signed_ring_area};
pub use self::poly_ops::{point_in_poly, point_on_ring, winding_number};
pub use self::ring_ops::{
    is_simple_ring, remove_repeated_points, ring_contacts, ring_segments, RingContact,
};
