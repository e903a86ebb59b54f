/*
This code is part of the parcel overlap detection tools.
Created: 03/10/2026
Last Modified: 03/10/2026
License: MIT
*/

use crate::structures::Point2D;

/// Calculates the signed area of a ring using the shoelace formula. The
/// ring may be open or closed. Counter-clockwise rings have positive area.
pub fn signed_ring_area(vertices: &[Point2D]) -> f64 {
    let num_vertices = vertices.len();
    if num_vertices < 3 {
        return 0f64;
    }
    let mut area = 0f64;
    for i in 0..num_vertices {
        let j = (i + 1) % num_vertices;
        area += vertices[i].x * vertices[j].y - vertices[j].x * vertices[i].y;
    }
    area / 2f64
}

/// Calculates the unsigned area of a polygon defined by a series of vertices.
pub fn polygon_area(vertices: &[Point2D]) -> f64 {
    signed_ring_area(vertices).abs()
}
