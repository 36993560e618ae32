//! Tessellation of circular primitives into closed outlines with a bounded
//! chord error. All functions are pure: same inputs, same vertices.

use std::f64::consts::{PI, TAU};

use glam::IVec2;
use serde::{Deserialize, Serialize};

use super::{polar, rotate_point};
use crate::geometry::polygon_set::{Outline, PolygonSet};

/// Minimum segment count when approximating a full circle. Keeps very small
/// pads from degenerating into triangles even at coarse error settings.
pub const PAD_MIN_SEGMENTS_PER_CIRCLE: usize = 16;

/// Minimal number of segments needed so that the sagitta of every chord of
/// the approximated arc stays below `max_error`.
///
/// The result is monotonic in `radius / max_error`, never below 1, and never
/// below [`PAD_MIN_SEGMENTS_PER_CIRCLE`] prorated by the arc span (so a full
/// circle always gets at least 16 segments).
pub fn arc_segment_count(radius: i32, max_error: i32, arc_angle_deg: f64) -> usize {
    let radius = radius.max(1) as f64;
    let err = (max_error.max(1) as f64).min(radius);

    // sagitta = r * (1 - cos(step / 2)) <= err
    let step = 2.0 * (1.0 - err / radius).acos();
    let span = arc_angle_deg.abs().to_radians();

    let count = (span / step).ceil() as usize;
    let floor = ((PAD_MIN_SEGMENTS_PER_CIRCLE as f64) * span / TAU).ceil() as usize;
    count.max(floor).max(1)
}

/// Radius correction applied where the tessellated shape must stay outside
/// the true one (rectangle inflation, rounded-rect corner enlargement): the
/// whole approximation error is pushed outward.
pub fn circle_to_poly_correction(max_error: i32) -> i32 {
    max_error
}

/// Circle as a closed outline with vertices exactly on the circle. Returns an
/// empty outline for non-positive radii.
pub fn circle_to_polygon(center: IVec2, radius: i32, max_error: i32) -> Outline {
    if radius <= 0 {
        return Vec::new();
    }

    let count = arc_segment_count(radius, max_error, 360.0);
    (0..count)
        .map(|i| center + polar(radius, TAU * i as f64 / count as f64))
        .collect()
}

/// Stadium (capsule) outline swept by a segment from `start` to `end` with a
/// round pen of diameter `width`: two semicircular caps joined by straight
/// flanks. Collapses to a circle for zero-length segments; returns an empty
/// outline when the width is non-positive.
pub fn oval_to_polygon(start: IVec2, end: IVec2, width: i32, max_error: i32) -> Outline {
    let radius = width / 2;
    if radius <= 0 {
        return Vec::new();
    }
    if start == end {
        return circle_to_polygon(start, radius, max_error);
    }

    let dir = (end - start).as_dvec2();
    let theta = dir.y.atan2(dir.x);
    // An even per-cap count keeps a vertex exactly on the capsule tip, so
    // the swept length is represented without bias.
    let mut half = (arc_segment_count(radius, max_error, 360.0) / 2).max(2);
    if half % 2 == 1 {
        half += 1;
    }

    let mut points = Vec::with_capacity(2 * half + 2);

    // Cap around the end point, from theta - 90 deg to theta + 90 deg.
    for i in 0..=half {
        let a = theta - PI / 2.0 + PI * i as f64 / half as f64;
        points.push(end + polar(radius, a));
    }

    // Cap around the start point, from theta + 90 deg to theta + 270 deg.
    for i in 0..=half {
        let a = theta + PI / 2.0 + PI * i as f64 / half as f64;
        points.push(start + polar(radius, a));
    }

    points
}

/// Annulus: an outer outline at `radius + width / 2` with a hole at
/// `radius - width / 2`. The hole is omitted when it collapses to nothing.
pub fn ring_to_polygon(center: IVec2, radius: i32, max_error: i32, width: i32) -> PolygonSet {
    let mut set = PolygonSet::new();
    let outer = radius + width / 2;
    if outer <= 0 {
        return set;
    }

    set.add_outline(circle_to_polygon(center, outer, max_error));

    let inner = radius - width / 2;
    if inner > 0 {
        set.add_hole(circle_to_polygon(center, inner, max_error));
    }
    set
}

/// Thick arc as a closed outline: outer arc boundary, a semicircular cap at
/// the arc end, the inner boundary walked back, and a cap at the arc start.
///
/// `sweep_deg` is signed (positive = counter-clockwise). With `width == 0`
/// the result is the bare centerline polyline, not a closed ring; callers
/// must special-case it.
pub fn arc_to_polygon(
    center: IVec2,
    start: IVec2,
    sweep_deg: f64,
    max_error: i32,
    width: i32,
) -> Outline {
    let radial = (start - center).as_dvec2();
    let radius = radial.length().round() as i32;
    let a0 = radial.y.atan2(radial.x);
    let sweep = sweep_deg.to_radians();

    if width <= 0 {
        // Zero-width marker: centerline points only.
        let count = arc_segment_count(radius, max_error, sweep_deg).max(1);
        return (0..=count)
            .map(|i| center + polar(radius, a0 + sweep * i as f64 / count as f64))
            .collect();
    }

    if sweep == 0.0 {
        return circle_to_polygon(start, width / 2, max_error);
    }

    let half_width = width / 2;
    let outer_r = radius + half_width;
    let inner_r = (radius - half_width).max(0);
    let a1 = a0 + sweep;
    let end = center + polar(radius, a1);

    let count = arc_segment_count(outer_r, max_error, sweep_deg).max(1);
    let cap_count = arc_segment_count(half_width, max_error, 180.0).max(1);
    let cap_sweep = PI.copysign(sweep);

    let mut points = Vec::with_capacity(2 * count + 2 * cap_count + 4);

    // Outer boundary, start to end.
    for i in 0..=count {
        points.push(center + polar(outer_r, a0 + sweep * i as f64 / count as f64));
    }

    // End cap, bulging past the arc end in the direction of travel.
    for i in 0..=cap_count {
        points.push(end + polar(half_width, a1 + cap_sweep * i as f64 / cap_count as f64));
    }

    // Inner boundary, walked back from end to start.
    for i in 0..=count {
        points.push(center + polar(inner_r, a1 - sweep * i as f64 / count as f64));
    }

    // Start cap, closing back onto the outer boundary.
    for i in 0..=cap_count {
        points.push(start + polar(half_width, a0 + cap_sweep * (1.0 + i as f64 / cap_count as f64)));
    }

    points
}

/// Which corners of a rounded rectangle get a straight chamfer cut instead
/// of a rounded corner. "Top" is positive y before rotation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChamferCorners {
    pub top_left: bool,
    pub top_right: bool,
    pub bottom_left: bool,
    pub bottom_right: bool,
}

impl ChamferCorners {
    pub fn all() -> Self {
        Self {
            top_left: true,
            top_right: true,
            bottom_left: true,
            bottom_right: true,
        }
    }

    fn any(&self) -> bool {
        self.top_left || self.top_right || self.bottom_left || self.bottom_right
    }
}

/// Rectangle with rounded and/or chamfered corners, rotated around its center
/// and translated into board coordinates. `chamfer_ratio` scales the chamfer
/// cut against the smaller rectangle dimension.
pub fn rounded_chamfered_rect_to_polygon(
    center: IVec2,
    size: IVec2,
    rotation_deg: f64,
    corner_radius: i32,
    chamfer_ratio: f64,
    chamfer: ChamferCorners,
    max_error: i32,
) -> Outline {
    let dx = size.x / 2;
    let dy = size.y / 2;
    if dx <= 0 || dy <= 0 {
        return Vec::new();
    }

    let min_half = dx.min(dy);
    let radius = corner_radius.clamp(0, min_half);
    let chamfer_size = if chamfer.any() {
        ((chamfer_ratio * (2 * min_half) as f64).round() as i32).clamp(0, min_half)
    } else {
        0
    };

    let arc_count = if radius > 0 {
        arc_segment_count(radius, max_error, 90.0).max(1)
    } else {
        0
    };

    let mut points: Outline = Vec::new();

    // Corners walked counter-clockwise. Each entry: sign pair, chamfer flag,
    // and the start angle of the corner's quarter arc.
    let corners = [
        (1, 1, chamfer.top_right, 0.0),
        (-1, 1, chamfer.top_left, PI / 2.0),
        (-1, -1, chamfer.bottom_left, PI),
        (1, -1, chamfer.bottom_right, 3.0 * PI / 2.0),
    ];

    for (sx, sy, chamfered, start_angle) in corners {
        let corner = IVec2::new(sx * dx, sy * dy);
        if chamfered && chamfer_size > 0 {
            // Straight cut: one point on each edge meeting at the corner.
            // Entering edge first (counter-clockwise order).
            let along_x = IVec2::new(sx * (dx - chamfer_size), sy * dy);
            let along_y = IVec2::new(sx * dx, sy * (dy - chamfer_size));
            if sx == sy {
                points.push(along_y);
                points.push(along_x);
            } else {
                points.push(along_x);
                points.push(along_y);
            }
        } else if radius > 0 {
            let arc_center = IVec2::new(sx * (dx - radius), sy * (dy - radius));
            for i in 0..=arc_count {
                let a = start_angle + (PI / 2.0) * i as f64 / arc_count as f64;
                points.push(arc_center + polar(radius, a));
            }
        } else {
            points.push(corner);
        }
    }

    points
        .into_iter()
        .map(|p| rotate_point(p, IVec2::ZERO, rotation_deg) + center)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const E: i32 = 5_000;

    #[test]
    fn test_segment_count_floor_for_full_circle() {
        // Tiny radius: the error bound alone would allow very few segments.
        assert!(arc_segment_count(10, E, 360.0) >= PAD_MIN_SEGMENTS_PER_CIRCLE);
        // Huge radius: the error bound dominates.
        assert!(arc_segment_count(50_000_000, 10, 360.0) > PAD_MIN_SEGMENTS_PER_CIRCLE);
    }

    #[test]
    fn test_segment_count_monotonic_in_radius() {
        let mut last = 0;
        for radius in [100_000, 1_000_000, 10_000_000, 100_000_000] {
            let n = arc_segment_count(radius, E, 360.0);
            assert!(n >= last, "segment count must grow with radius");
            last = n;
        }
    }

    #[test]
    fn test_segment_count_monotonic_in_error() {
        let n_coarse = arc_segment_count(1_000_000, 50_000, 360.0);
        let n_fine = arc_segment_count(1_000_000, 500, 360.0);
        assert!(n_fine > n_coarse, "tighter error needs more segments");
    }

    #[test]
    fn test_segment_count_scales_with_span() {
        let full = arc_segment_count(1_000_000, 500, 360.0);
        let quarter = arc_segment_count(1_000_000, 500, 90.0);
        assert!(quarter < full);
        assert!(quarter >= 1);
    }

    #[test]
    fn test_circle_sagitta_within_error() {
        let radius = 2_000_000;
        let poly = circle_to_polygon(IVec2::ZERO, radius, E);
        assert!(poly.len() >= PAD_MIN_SEGMENTS_PER_CIRCLE);

        for i in 0..poly.len() {
            let a = poly[i].as_dvec2();
            let b = poly[(i + 1) % poly.len()].as_dvec2();
            // Vertices sit on the circle, so the worst deviation is at the
            // chord midpoint; allow 2 units of slack for integer rounding.
            let mid = (a + b) / 2.0;
            let sagitta = radius as f64 - mid.length();
            assert!(
                sagitta <= E as f64 + 2.0,
                "sagitta {} exceeds max error",
                sagitta
            );
            assert!((a.length() - radius as f64).abs() <= 1.0);
        }
    }

    #[test]
    fn test_circle_degenerate_radius() {
        assert!(circle_to_polygon(IVec2::ZERO, 0, E).is_empty());
        assert!(circle_to_polygon(IVec2::ZERO, -5, E).is_empty());
    }

    #[test]
    fn test_oval_extents() {
        let start = IVec2::new(0, 0);
        let end = IVec2::new(1_000_000, 0);
        let width = 200_000;
        let poly = oval_to_polygon(start, end, width, E);
        assert!(poly.len() >= 6);

        let min_x = poly.iter().map(|p| p.x).min().unwrap();
        let max_x = poly.iter().map(|p| p.x).max().unwrap();
        let min_y = poly.iter().map(|p| p.y).min().unwrap();
        let max_y = poly.iter().map(|p| p.y).max().unwrap();

        // Caps extend half a width past each endpoint; flanks sit at +/- w/2.
        assert_eq!(max_x, 1_100_000);
        assert_eq!(min_x, -100_000);
        assert_eq!(max_y, 100_000);
        assert_eq!(min_y, -100_000);
    }

    #[test]
    fn test_oval_zero_length_is_circle() {
        let p = IVec2::new(5_000, 5_000);
        let as_oval = oval_to_polygon(p, p, 300_000, E);
        let as_circle = circle_to_polygon(p, 150_000, E);
        assert_eq!(as_oval, as_circle);
    }

    #[test]
    fn test_oval_zero_width() {
        assert!(oval_to_polygon(IVec2::ZERO, IVec2::new(10, 0), 0, E).is_empty());
    }

    #[test]
    fn test_ring_outlines() {
        let set = ring_to_polygon(IVec2::ZERO, 1_000_000, E, 200_000);
        assert_eq!(set.outline_count(), 1);
        assert_eq!(set.hole_count(), 1);

        let outer_max = set.regions()[0]
            .outer
            .iter()
            .map(|p| p.as_dvec2().length())
            .fold(0.0_f64, f64::max);
        assert!((outer_max - 1_100_000.0).abs() <= 2.0);
    }

    #[test]
    fn test_ring_collapsed_hole() {
        // Width larger than the diameter: no hole survives.
        let set = ring_to_polygon(IVec2::ZERO, 50_000, E, 200_000);
        assert_eq!(set.outline_count(), 1);
        assert_eq!(set.hole_count(), 0);
    }

    #[test]
    fn test_arc_stadium_extents() {
        // Quarter arc of radius 1 mm starting at (1mm, 0), 90 deg CCW.
        let poly = arc_to_polygon(IVec2::ZERO, IVec2::new(1_000_000, 0), 90.0, E, 200_000);
        assert!(poly.len() >= 8);

        let max_r = poly.iter().map(|p| p.as_dvec2().length()).fold(0.0, f64::max);
        // Outer boundary plus nothing else reaches radius + w/2; the caps may
        // poke slightly past the arc ends but never past that radius bound
        // by more than the cap radius geometry allows.
        assert!(max_r <= 1_100_000.0 + 2.0, "max radius {}", max_r);
        // The cap at the start extends below y = 0.
        assert!(poly.iter().any(|p| p.y < 0));
    }

    #[test]
    fn test_arc_zero_width_centerline() {
        let poly = arc_to_polygon(IVec2::ZERO, IVec2::new(1_000_000, 0), 90.0, E, 0);
        assert!(poly.len() >= 2);
        // First point at the arc start, last at the arc end.
        assert_eq!(poly[0], IVec2::new(1_000_000, 0));
        let last = *poly.last().unwrap();
        assert!((last.as_dvec2() - glam::DVec2::new(0.0, 1_000_000.0)).length() <= 2.0);
    }

    #[test]
    fn test_rounded_rect_plain_corners() {
        // radius 0, no chamfer: exactly the 4 rectangle corners.
        let poly = rounded_chamfered_rect_to_polygon(
            IVec2::new(10, 20),
            IVec2::new(2_000, 1_000),
            0.0,
            0,
            0.0,
            ChamferCorners::default(),
            E,
        );
        assert_eq!(poly.len(), 4);
        assert!(poly.contains(&IVec2::new(1_010, 520)));
        assert!(poly.contains(&IVec2::new(-990, -480)));
    }

    #[test]
    fn test_rounded_rect_corner_arcs() {
        let poly = rounded_chamfered_rect_to_polygon(
            IVec2::ZERO,
            IVec2::new(2_000_000, 1_000_000),
            0.0,
            250_000,
            0.0,
            ChamferCorners::default(),
            E,
        );
        // Four arcs of at least 2 points each.
        assert!(poly.len() >= 8);
        let max_x = poly.iter().map(|p| p.x).max().unwrap();
        let max_y = poly.iter().map(|p| p.y).max().unwrap();
        assert_eq!(max_x, 1_000_000);
        assert_eq!(max_y, 500_000);
        // No vertex may sit outside the rectangle.
        assert!(poly.iter().all(|p| p.x.abs() <= 1_000_000 && p.y.abs() <= 500_000));
    }

    #[test]
    fn test_chamfered_rect_cut_corner() {
        let chamfer = ChamferCorners {
            top_right: true,
            ..Default::default()
        };
        let poly = rounded_chamfered_rect_to_polygon(
            IVec2::ZERO,
            IVec2::new(1_000_000, 1_000_000),
            0.0,
            0,
            0.25,
            chamfer,
            E,
        );
        // 3 plain corners + 2 chamfer points.
        assert_eq!(poly.len(), 5);
        // The top-right corner itself must be cut away.
        assert!(!poly.contains(&IVec2::new(500_000, 500_000)));
        assert!(poly.contains(&IVec2::new(500_000, 250_000)));
        assert!(poly.contains(&IVec2::new(250_000, 500_000)));
    }
}
