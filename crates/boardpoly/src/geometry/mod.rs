use glam::{DVec2, IVec2};

pub mod polygon_set;
pub mod tessellate;

pub use polygon_set::{contains_point, signed_area, Outline, PolyRegion, PolygonMode, PolygonSet};
pub use tessellate::{
    arc_segment_count, arc_to_polygon, circle_to_poly_correction, circle_to_polygon,
    oval_to_polygon, ring_to_polygon, rounded_chamfered_rect_to_polygon, ChamferCorners,
    PAD_MIN_SEGMENTS_PER_CIRCLE,
};

/// Rotate a point around a center by an angle in degrees (counter-clockwise,
/// y axis up). The rotation is computed in f64 and rounded half away from
/// zero back to integer coordinates.
pub fn rotate_point(p: IVec2, center: IVec2, angle_deg: f64) -> IVec2 {
    if angle_deg == 0.0 {
        return p;
    }

    let (sin, cos) = angle_deg.to_radians().sin_cos();
    let v = (p - center).as_dvec2();
    let rotated = DVec2::new(v.x * cos - v.y * sin, v.x * sin + v.y * cos);
    center + rotated.round().as_ivec2()
}

/// A point at `radius` internal units from the origin, at `angle` radians.
pub(crate) fn polar(radius: i32, angle: f64) -> IVec2 {
    (DVec2::new(angle.cos(), angle.sin()) * radius as f64)
        .round()
        .as_ivec2()
}
