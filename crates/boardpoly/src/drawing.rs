//! Conversion of drawn board primitives (silkscreen / edge graphics) into
//! polygon outlines.

use glam::IVec2;
use kurbo::{BezPath, Point};
use serde::{Deserialize, Serialize};

use crate::geometry::{
    arc_to_polygon, circle_to_polygon, oval_to_polygon, ring_to_polygon, rotate_point, PolygonSet,
};
use crate::types::{Layer, ARC_HIGH_DEF};

/// Geometry of a drawn primitive. The set of kinds is closed; every kind has
/// a defined polygon representation, enforced by exhaustive matching.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DrawnShape {
    Segment {
        start: IVec2,
        end: IVec2,
    },
    /// Axis-aligned rectangle spanned by two opposite corners.
    Rect {
        start: IVec2,
        end: IVec2,
    },
    Circle {
        center: IVec2,
        radius: i32,
    },
    /// Arc from `start` sweeping `sweep_deg` degrees around `center`
    /// (positive = counter-clockwise).
    Arc {
        center: IVec2,
        start: IVec2,
        sweep_deg: f64,
    },
    /// Closed polygon stored in local coordinates, rotated and translated
    /// into board coordinates at conversion time.
    Polygon {
        points: Vec<IVec2>,
        rotation_deg: f64,
        offset: IVec2,
    },
    /// Cubic Bezier, flattened at a resolution tied to the stroke width.
    Bezier {
        start: IVec2,
        ctrl1: IVec2,
        ctrl2: IVec2,
        end: IVec2,
    },
}

/// A drawn item on one board layer with its stroke width.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Drawing {
    pub shape: DrawnShape,
    pub width: i32,
    pub filled: bool,
    pub layer: Layer,
}

impl Drawing {
    pub fn is_on_layer(&self, layer: Layer) -> bool {
        self.layer == layer
    }

    /// Append this drawing's polygon contribution, grown by `clearance`.
    /// `ignore_line_width` converts stroked shapes as bare outlines (edge
    /// outline extraction); it has no effect on filled polygons.
    ///
    /// Zero-effective-width open shapes (segments, arcs, Beziers) contribute
    /// nothing: there is no area to represent.
    pub fn transform_shape_with_clearance(
        &self,
        buffer: &mut PolygonSet,
        clearance: i32,
        max_error: i32,
        ignore_line_width: bool,
    ) {
        let line_width = if ignore_line_width { 0 } else { self.width };
        let width = line_width + 2 * clearance;

        match &self.shape {
            DrawnShape::Circle { center, radius } => {
                if width <= 0 {
                    buffer.add_outline(circle_to_polygon(*center, *radius, max_error));
                } else {
                    buffer.append(&ring_to_polygon(*center, *radius, max_error, width));
                }
            }

            DrawnShape::Rect { start, end } => {
                let min = start.min(*end);
                let max = start.max(*end);
                let corners = [
                    min,
                    IVec2::new(max.x, min.y),
                    max,
                    IVec2::new(min.x, max.y),
                ];

                if width <= 0 {
                    buffer.add_outline(corners.to_vec());
                } else {
                    for i in 0..4 {
                        buffer.add_outline(oval_to_polygon(
                            corners[i],
                            corners[(i + 1) % 4],
                            width,
                            max_error,
                        ));
                    }
                }
            }

            DrawnShape::Arc {
                center,
                start,
                sweep_deg,
            } => {
                if width > 0 {
                    buffer.add_outline(arc_to_polygon(
                        *center, *start, *sweep_deg, max_error, width,
                    ));
                }
            }

            DrawnShape::Segment { start, end } => {
                if width > 0 {
                    buffer.add_outline(oval_to_polygon(*start, *end, width, max_error));
                }
            }

            DrawnShape::Polygon {
                points,
                rotation_deg,
                offset,
            } => {
                if points.len() < 3 {
                    return;
                }
                let poly: Vec<IVec2> = points
                    .iter()
                    .map(|p| rotate_point(*p, IVec2::ZERO, *rotation_deg) + *offset)
                    .collect();

                if self.filled || width <= 0 {
                    buffer.add_outline(poly.clone());
                }

                if width > 0 {
                    let mut prev = *poly.last().unwrap();
                    for p in poly {
                        if p != prev {
                            buffer.add_outline(oval_to_polygon(prev, p, width, max_error));
                        }
                        prev = p;
                    }
                }
            }

            DrawnShape::Bezier {
                start,
                ctrl1,
                ctrl2,
                end,
            } => {
                if width <= 0 {
                    return;
                }
                let poly = flatten_bezier(*start, *ctrl1, *ctrl2, *end, self.width);
                for pair in poly.windows(2) {
                    if pair[0] != pair[1] {
                        buffer.add_outline(oval_to_polygon(pair[0], pair[1], width, max_error));
                    }
                }
            }
        }
    }
}

/// Flatten a cubic Bezier into a polyline. The sampling resolution follows
/// the stroke width: a wide stroke hides coarser flattening.
fn flatten_bezier(start: IVec2, ctrl1: IVec2, ctrl2: IVec2, end: IVec2, width: i32) -> Vec<IVec2> {
    use kurbo::{ParamCurve, ParamCurveArclen, Shape};

    let tolerance = (width as f64 / 2.0).max(ARC_HIGH_DEF as f64);

    let mut path = BezPath::new();
    path.move_to(to_kurbo(start));
    path.curve_to(to_kurbo(ctrl1), to_kurbo(ctrl2), to_kurbo(end));

    let mut points: Vec<IVec2> = vec![start];
    for seg in path.path_segments(tolerance) {
        let arclen = seg.arclen(tolerance);
        let samples = (arclen / tolerance).ceil().max(2.0) as usize;
        for i in 1..=samples {
            let t = i as f64 / samples as f64;
            let p = seg.eval(t);
            let p = IVec2::new(p.x.round() as i32, p.y.round() as i32);
            if points.last() != Some(&p) {
                points.push(p);
            }
        }
    }
    points
}

fn to_kurbo(p: IVec2) -> Point {
    Point::new(p.x as f64, p.y as f64)
}
