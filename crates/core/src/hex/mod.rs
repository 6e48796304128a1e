//! This module holds basic types and math related to hexagon grids.
//!
//! ## Coordinate Systems
//!
//! Hexer uses three different coordinate systems:
//!
//! ### Axial Coordinates
//!
//! Axial coordinates identify tiles. They're the [cube coordinate system
//! defined by Amit Patel](https://www.redblobgames.com/grids/hexagons/#coordinates-cube)
//! with one component dropped: a tile is `(q, r)`, and the third cube component
//! is always `s = -q - r`. See [AxialPoint].
//!
//! **In that page's vernacular, we use "pointy topped" tiles.** A vertex points
//! straight up, and the flat sides face left and right.
//!
//! ### World Coordinates
//!
//! World coordinates are a plain 2D pixel plane that the tiles are laid out on,
//! with the center of tile `(0, 0)` at the world origin. Every tile is a
//! hexagon whose center-to-vertex distance is the grid's hex radius. Right is
//! +x, down is +y.
//!
//! ```text
//!          +-------------------+
//!          |        -y         |
//!          |         ^         |
//!          |         |         |
//!          | -x <----o----> +x |
//!          |         |         |
//!          |         v         |
//!          |        +y         |
//!          +-------------------+
//! ```
//!
//! ### Screen Coordinates
//!
//! Screen coordinates are logical pixels on the drawing surface, with the
//! origin in the top-left corner. Converting between world and screen is the
//! job of the [Camera](crate::Camera); everything in this module only deals
//! with axial and world coordinates.

mod unit;

pub use self::unit::*;

use crate::Point2;

/// √3, the ratio between a pointy-top hexagon's width and its radius
const SQRT_3: f64 = 1.732_050_807_568_877_2;

/// Get the world-space center of a tile.
///
/// `x = radius·√3·(q + r/2)`, `y = radius·1.5·r`
pub fn axial_to_pixel(point: AxialPoint, hex_radius: f64) -> Point2 {
    let q = f64::from(point.q());
    let r = f64::from(point.r());
    Point2::new(hex_radius * SQRT_3 * (q + r / 2.0), hex_radius * 1.5 * r)
}

/// Find the tile that contains a world-space point. This is the inverse of
/// [axial_to_pixel], followed by [round_to_axial] to snap onto a tile.
///
/// ## Precondition
/// `hex_radius` must be greater than zero. This isn't checked; a zero radius
/// divides by zero and the result is garbage.
pub fn pixel_to_axial(pixel: Point2, hex_radius: f64) -> AxialPoint {
    let q = (SQRT_3 / 3.0 * pixel.x - pixel.y / 3.0) / hex_radius;
    let r = (2.0 / 3.0 * pixel.y) / hex_radius;
    round_to_axial(q, r)
}

/// Snap fractional axial coordinates to the nearest tile, using cube rounding.
///
/// The fractional point is expanded to cube coordinates (`x = q`, `z = r`,
/// `y = -x - z`) and each component is rounded on its own. That can break the
/// `x + y + z = 0` constraint, so the component that moved the most while
/// rounding gets recomputed from the other two. The checks run in a fixed
/// order (`x`, then `y`, otherwise `z`) and each one needs a strict win, so a
/// tie falls through to the later branch. That order decides which tile a tap
/// exactly on a tile boundary lands in, so don't reorder the branches.
pub fn round_to_axial(frac_q: f64, frac_r: f64) -> AxialPoint {
    let x = frac_q;
    let z = frac_r;
    let y = -x - z;

    let mut rx = round_half_up(x);
    let ry = round_half_up(y);
    let mut rz = round_half_up(z);

    let x_diff = (rx - x).abs();
    let y_diff = (ry - y).abs();
    let z_diff = (rz - z).abs();

    if x_diff > y_diff && x_diff > z_diff {
        rx = -ry - rz;
    } else if y_diff > z_diff {
        // y is the one to recompute, but it's derived from q and r anyway so
        // there's nothing to store
    } else {
        rz = -rx - ry;
    }

    AxialPoint::new(rx as i32, rz as i32)
}

/// Round to the nearest integer, with halves going towards positive infinity
/// (so `-0.5` becomes `0`, not `-1`). [f64::round] rounds halves away from
/// zero, which would put boundary taps in a different tile.
fn round_half_up(value: f64) -> f64 {
    (value + 0.5).floor()
}

/// Get the six vertices of a pointy-top hexagon. Vertex `i` sits at
/// `60°·i - 30°`, so the first vertex is up and to the right of the center
/// (remember that y points down) and they go around clockwise on screen. The
/// -30° start is what lines the polygon up with [axial_to_pixel]; adjacent
/// tiles share exactly one edge.
pub fn hex_polygon_vertices(center: Point2, radius: f64) -> [Point2; 6] {
    let mut vertices = [Point2::ORIGIN; 6];
    for (i, vertex) in vertices.iter_mut().enumerate() {
        let angle = (60.0 * i as f64 - 30.0).to_radians();
        *vertex = Point2::new(
            center.x + radius * angle.cos(),
            center.y + radius * angle.sin(),
        );
    }
    vertices
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_approx_eq::assert_approx_eq;

    #[test]
    fn test_axial_to_pixel() {
        let p = axial_to_pixel(AxialPoint::ORIGIN, 25.0);
        assert_approx_eq!(p.x, 0.0);
        assert_approx_eq!(p.y, 0.0);

        let p = axial_to_pixel(AxialPoint::new(1, 0), 25.0);
        assert_approx_eq!(p.x, 25.0 * SQRT_3);
        assert_approx_eq!(p.y, 0.0);

        let p = axial_to_pixel(AxialPoint::new(0, 1), 10.0);
        assert_approx_eq!(p.x, 5.0 * SQRT_3);
        assert_approx_eq!(p.y, 15.0);

        let p = axial_to_pixel(AxialPoint::new(-2, 3), 2.0);
        assert_approx_eq!(p.x, 2.0 * SQRT_3 * -0.5);
        assert_approx_eq!(p.y, 9.0);
    }

    #[test]
    fn test_pixel_to_axial_round_trip() {
        for &radius in &[0.5, 1.0, 25.0, 97.3] {
            for q in -100..=100 {
                for r in -100..=100 {
                    let point = AxialPoint::new(q, r);
                    let pixel = axial_to_pixel(point, radius);
                    assert_eq!(
                        pixel_to_axial(pixel, radius),
                        point,
                        "round trip failed for {} at radius {}",
                        point,
                        radius
                    );
                }
            }
        }
    }

    #[test]
    fn test_pixel_to_axial_inside_tile() {
        // Anything well inside the tile's inner circle resolves to that tile
        let center = axial_to_pixel(AxialPoint::new(2, -1), 25.0);
        for vertex in hex_polygon_vertices(center, 20.0).iter() {
            assert_eq!(pixel_to_axial(*vertex, 25.0), AxialPoint::new(2, -1));
        }
    }

    #[test]
    fn test_round_to_axial_clear_winner() {
        // x moved the most
        assert_eq!(round_to_axial(0.4, 0.3), AxialPoint::new(1, 0));
        // y moved the most
        assert_eq!(round_to_axial(0.3, 0.3), AxialPoint::new(0, 0));
        // z moved the most
        assert_eq!(round_to_axial(0.3, 0.4), AxialPoint::new(0, 1));
    }

    #[test]
    fn test_round_to_axial_tie_x_and_y() {
        // x=0.5 -> 1 (diff 0.5), y=-0.5 -> 0 (diff 0.5), z=0 -> 0 (diff 0)
        // x doesn't strictly beat y, so y gets recomputed: -1 - 0 = -1
        assert_eq!(round_to_axial(0.5, 0.0), AxialPoint::new(1, 0));
        // x=0.25 -> 0, y=-0.25 -> 0, z=0 -> 0
        assert_eq!(round_to_axial(0.25, 0.0), AxialPoint::new(0, 0));
    }

    #[test]
    fn test_round_to_axial_tie_x_and_z() {
        // x=0.375 -> 0 (diff 0.375), z=0.375 -> 0 (diff 0.375),
        // y=-0.75 -> -1 (diff 0.25). Tie between x and z falls through to the
        // z branch: z = -0 - -1 = 1. Recomputing x instead would give (1, 0)
        assert_eq!(round_to_axial(0.375, 0.375), AxialPoint::new(0, 1));
    }

    #[test]
    fn test_round_to_axial_tie_y_and_z() {
        // x=0 -> 0 (diff 0), z=0.5 -> 1 (diff 0.5), y=-0.5 -> 0 (diff 0.5).
        // Tie between y and z falls through to the z branch: z = -0 - 0 = 0.
        // Recomputing y instead would give (0, 1)
        assert_eq!(round_to_axial(0.0, 0.5), AxialPoint::new(0, 0));
    }

    #[test]
    fn test_round_half_up() {
        assert_approx_eq!(round_half_up(0.5), 1.0);
        assert_approx_eq!(round_half_up(-0.5), 0.0);
        assert_approx_eq!(round_half_up(-1.5), -1.0);
        assert_approx_eq!(round_half_up(2.4), 2.0);
        assert_approx_eq!(round_half_up(-2.6), -3.0);
    }

    #[test]
    fn test_hex_polygon_vertices() {
        let center = Point2::new(10.0, 20.0);
        let vertices = hex_polygon_vertices(center, 2.0);

        // First vertex at -30 degrees
        assert_approx_eq!(vertices[0].x, 10.0 + SQRT_3);
        assert_approx_eq!(vertices[0].y, 19.0);
        // Vertex 1 at 30 degrees, vertex 2 at 90 (straight down)
        assert_approx_eq!(vertices[1].x, 10.0 + SQRT_3);
        assert_approx_eq!(vertices[1].y, 21.0);
        assert_approx_eq!(vertices[2].x, 10.0);
        assert_approx_eq!(vertices[2].y, 22.0);
        // Vertex 5 at 270 (straight up)
        assert_approx_eq!(vertices[5].x, 10.0);
        assert_approx_eq!(vertices[5].y, 18.0);

        for vertex in vertices.iter() {
            assert_approx_eq!(vertex.distance_to(center), 2.0);
        }
    }

    #[test]
    fn test_adjacent_tiles_share_vertices() {
        // The right-hand edge of the origin tile is the left-hand edge of
        // (1, 0), so the two tiles share vertices 0 and 1 with vertices 4 and
        // 3 of the neighbor
        let radius = 25.0;
        let a = hex_polygon_vertices(
            axial_to_pixel(AxialPoint::ORIGIN, radius),
            radius,
        );
        let b = hex_polygon_vertices(
            axial_to_pixel(AxialPoint::new(1, 0), radius),
            radius,
        );
        assert_approx_eq!(a[0].x, b[4].x);
        assert_approx_eq!(a[0].y, b[4].y);
        assert_approx_eq!(a[1].x, b[3].x);
        assert_approx_eq!(a[1].y, b[3].y);
    }
}
