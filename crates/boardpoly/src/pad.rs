//! Pad geometry to polygon conversion: one rule per pad shape kind, plus the
//! footprint-level driver with its layer filters and margin handling.

use glam::IVec2;
use serde::{Deserialize, Serialize};

use crate::drawing::Drawing;
use crate::geometry::{
    arc_segment_count, circle_to_poly_correction, circle_to_polygon, oval_to_polygon,
    rotate_point, rounded_chamfered_rect_to_polygon, ChamferCorners, PolygonMode, PolygonSet,
};
use crate::types::{Layer, LayerSet};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DrillShape {
    Circle,
    Oblong,
}

/// Drilled hole of a through pad.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Drill {
    pub shape: DrillShape,
    pub size: IVec2,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PadAttribute {
    /// Plated through hole.
    Pth,
    Smd,
    Connector,
    /// Non-plated through hole (mechanical).
    Npth,
}

/// Anchor shape a custom pad's primitives are merged onto.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CustomAnchor {
    Circle,
    Rect,
}

/// Pad shape kind with its per-kind parameters. Closed set: every kind has
/// a conversion rule, enforced by exhaustive matching.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PadShape {
    Circle,
    Oval,
    Rect,
    /// Rectangle with per-edge skew: `delta.y` displaces the left/right
    /// edges, `delta.x` the top/bottom ones.
    Trapezoid { delta: IVec2 },
    RoundRect { corner_radius: i32 },
    ChamferedRect {
        corner_radius: i32,
        chamfer_ratio: f64,
        corners: ChamferCorners,
    },
    /// Anchor shape plus free-form primitives in pad-local coordinates.
    Custom {
        anchor: CustomAnchor,
        primitives: Vec<Drawing>,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pad {
    pub position: IVec2,
    /// Offset of the drawn shape from the pad position, in pad-local
    /// coordinates (rotated with the pad).
    pub offset: IVec2,
    pub size: IVec2,
    /// Rotation in degrees, counter-clockwise.
    pub orientation: f64,
    pub shape: PadShape,
    pub attribute: PadAttribute,
    pub drill: Option<Drill>,
    pub layers: LayerSet,
    pub solder_mask_margin: i32,
    /// Per-axis paste margin (absolute value plus any ratio already
    /// resolved against the pad size by the caller).
    pub solder_paste_margin: IVec2,
}

impl Pad {
    pub fn is_on_layer(&self, layer: Layer) -> bool {
        self.layers.contains(layer)
    }

    /// Whether the pad flashes (produces copper/opening) on a layer. This
    /// model keeps flashing equal to layer presence.
    pub fn flashes(&self, layer: Layer) -> bool {
        self.layers.contains(layer)
    }

    /// Position of the drawn shape; for pads with a shape offset this is not
    /// the pad position.
    pub fn shape_position(&self) -> IVec2 {
        self.position + rotate_point(self.offset, IVec2::ZERO, self.orientation)
    }

    /// Append the pad outline grown by a uniform `clearance`.
    pub fn transform_shape_with_clearance(
        &self,
        buffer: &mut PolygonSet,
        clearance: i32,
        max_error: i32,
    ) {
        let dx = self.size.x / 2;
        let dy = self.size.y / 2;
        let shape_pos = self.shape_position();

        match &self.shape {
            PadShape::Circle | PadShape::Oval => {
                if dx == dy {
                    buffer.add_outline(circle_to_polygon(shape_pos, dx + clearance, max_error));
                } else {
                    // Capsule along the longer axis.
                    let half_width = dx.min(dy);
                    let delta = rotate_point(
                        IVec2::new(dx - half_width, dy - half_width),
                        IVec2::ZERO,
                        self.orientation,
                    );
                    buffer.add_outline(oval_to_polygon(
                        shape_pos - delta,
                        shape_pos + delta,
                        (half_width + clearance) * 2,
                        max_error,
                    ));
                }
            }

            PadShape::Rect | PadShape::Trapezoid { .. } => {
                let (ddx, ddy) = match &self.shape {
                    PadShape::Trapezoid { delta } => (delta.x / 2, delta.y / 2),
                    _ => (0, 0),
                };

                let corners = [
                    IVec2::new(-dx - ddy, dy + ddx),
                    IVec2::new(dx + ddy, dy - ddx),
                    IVec2::new(dx - ddy, -dy + ddx),
                    IVec2::new(-dx + ddy, -dy - ddx),
                ];

                let mut outline = PolygonSet::new();
                outline.add_outline(
                    corners
                        .iter()
                        .map(|c| rotate_point(*c, IVec2::ZERO, self.orientation) + shape_pos)
                        .collect(),
                );

                if clearance != 0 {
                    // Inflating the rectangle keeps the outward corners
                    // rounded instead of offsetting each corner naively.
                    let segments = arc_segment_count(clearance, max_error, 360.0);
                    outline.inflate(
                        clearance + circle_to_poly_correction(max_error),
                        segments,
                        PolygonMode::Fast,
                    );
                }

                buffer.append(&outline);
            }

            PadShape::RoundRect { corner_radius }
            | PadShape::ChamferedRect { corner_radius, .. } => {
                // Clearance and approximation error are folded into an
                // enlarged equivalent radius and size, then the outline is
                // generated directly.
                let correction = circle_to_poly_correction(max_error);
                let radius = corner_radius + clearance + correction;
                let grown = self.size + IVec2::splat(2 * (clearance + correction));

                let (ratio, corners) = match &self.shape {
                    PadShape::ChamferedRect {
                        chamfer_ratio,
                        corners,
                        ..
                    } => (*chamfer_ratio, *corners),
                    _ => (0.0, ChamferCorners::default()),
                };

                buffer.add_outline(rounded_chamfered_rect_to_polygon(
                    shape_pos,
                    grown,
                    self.orientation,
                    radius,
                    ratio,
                    corners,
                    max_error,
                ));
            }

            PadShape::Custom { anchor, primitives } => {
                // Merge the anchor and all primitives in pad-local
                // coordinates first; inflation may self-intersect, so the
                // merged shape is normalized before it is appended.
                let mut merged = PolygonSet::new();
                match anchor {
                    CustomAnchor::Circle => {
                        merged.add_outline(circle_to_polygon(IVec2::ZERO, dx, max_error));
                    }
                    CustomAnchor::Rect => {
                        merged.add_outline(vec![
                            IVec2::new(-dx, -dy),
                            IVec2::new(dx, -dy),
                            IVec2::new(dx, dy),
                            IVec2::new(-dx, dy),
                        ]);
                    }
                }
                for primitive in primitives {
                    primitive.transform_shape_with_clearance(&mut merged, 0, max_error, false);
                }
                merged.simplify(PolygonMode::Fast);

                merged.rotate(IVec2::ZERO, self.orientation);
                merged.translate(self.position);

                if clearance != 0 {
                    let segments = arc_segment_count(clearance, max_error, 360.0);
                    merged.inflate(
                        clearance + circle_to_poly_correction(max_error),
                        segments,
                        PolygonMode::Fast,
                    );
                    merged.simplify(PolygonMode::Fast);
                    merged.fracture(PolygonMode::Fast);
                }

                buffer.append(&merged);
            }
        }
    }

    /// Append the drilled hole as an oval grown by `inflate_value` on each
    /// side. Returns false when the pad has no usable drill.
    pub fn transform_hole_with_clearance(
        &self,
        buffer: &mut PolygonSet,
        inflate_value: i32,
        max_error: i32,
    ) -> bool {
        let Some(drill) = self.drill else {
            return false;
        };
        if drill.size.x <= 0 || drill.size.y <= 0 {
            return false;
        }

        let (start, end, width) = self.hole_segment(drill);
        buffer.add_outline(oval_to_polygon(
            start,
            end,
            width + 2 * inflate_value,
            max_error,
        ));
        true
    }

    /// Drill as a segment-with-width: a point for round drills, the slot
    /// centerline for oblong ones, rotated with the pad.
    fn hole_segment(&self, drill: Drill) -> (IVec2, IVec2, i32) {
        if drill.shape == DrillShape::Circle || drill.size.x == drill.size.y {
            return (self.position, self.position, drill.size.x);
        }

        let width = drill.size.x.min(drill.size.y);
        let half_len = (drill.size.x.max(drill.size.y) - width) / 2;
        let along = if drill.size.x > drill.size.y {
            IVec2::new(half_len, 0)
        } else {
            IVec2::new(0, half_len)
        };
        let delta = rotate_point(along, IVec2::ZERO, self.orientation);
        (self.position - delta, self.position + delta, width)
    }

    /// NPTH pads are not drawn when the drawn shape coincides exactly with
    /// the drill: no copper annulus exists.
    fn is_npth_with_no_copper(&self) -> bool {
        if self.attribute != PadAttribute::Npth {
            return false;
        }
        let Some(drill) = self.drill else {
            return false;
        };
        if drill.size != self.size || self.offset != IVec2::ZERO {
            return false;
        }
        match self.shape {
            PadShape::Circle => drill.shape == DrillShape::Circle,
            PadShape::Oval => drill.shape == DrillShape::Oblong,
            _ => false,
        }
    }
}

/// The converters handle only uniform clearances. Distinct x/y margins fake
/// a symmetrically enlarged pad and re-run the uniform path on it; this is a
/// deliberate approximation, not a general anisotropic offset.
pub fn transform_with_unequal_clearance(
    pad: &Pad,
    buffer: &mut PolygonSet,
    clearance: IVec2,
    max_error: i32,
) {
    let mut enlarged = pad.clone();
    enlarged.size = pad.size + clearance * 2;
    if enlarged.size.x <= 0 || enlarged.size.y <= 0 {
        return;
    }
    enlarged.transform_shape_with_clearance(buffer, 0, max_error);
}

/// Convert every pad of a footprint present on `layer` (all layers when
/// `None`), applying the plating filters and per-layer margins.
#[allow(clippy::too_many_arguments)]
pub fn transform_pads_with_clearance(
    pads: &[Pad],
    layer: Option<Layer>,
    buffer: &mut PolygonSet,
    inflate_value: i32,
    max_error: i32,
    skip_npth_pads_with_no_copper: bool,
    skip_plated_pads: bool,
    skip_non_plated_pads: bool,
) {
    for pad in pads {
        if let Some(layer) = layer {
            if !pad.is_on_layer(layer) {
                continue;
            }
        }

        if skip_npth_pads_with_no_copper && pad.is_npth_with_no_copper() {
            continue;
        }

        // Plated = the pad flashes on the solder-mask opening of its side.
        let is_plated = match layer {
            Some(Layer::FrontCopper) => pad.flashes(Layer::FrontMask),
            Some(Layer::BackCopper) => pad.flashes(Layer::BackMask),
            _ => false,
        };

        if skip_plated_pads && is_plated {
            continue;
        }
        if skip_non_plated_pads && !is_plated {
            continue;
        }

        let mut clearance = IVec2::splat(inflate_value);
        match layer {
            Some(l) if l.is_mask() => {
                clearance += IVec2::splat(pad.solder_mask_margin);
            }
            Some(l) if l.is_paste() => {
                clearance += pad.solder_paste_margin;
            }
            _ => {}
        }

        let is_custom = matches!(pad.shape, PadShape::Custom { .. });
        if (clearance.x < 0 || clearance.x != clearance.y) && !is_custom {
            transform_with_unequal_clearance(pad, buffer, clearance, max_error);
        } else {
            // Custom shapes fall back to the x margin alone.
            pad.transform_shape_with_clearance(buffer, clearance.x, max_error);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ARC_HIGH_DEF;

    fn base_pad(shape: PadShape, size: IVec2) -> Pad {
        Pad {
            position: IVec2::ZERO,
            offset: IVec2::ZERO,
            size,
            orientation: 0.0,
            shape,
            attribute: PadAttribute::Smd,
            drill: None,
            layers: LayerSet::of(&[Layer::FrontCopper, Layer::FrontMask, Layer::FrontPaste]),
            solder_mask_margin: 0,
            solder_paste_margin: IVec2::ZERO,
        }
    }

    #[test]
    fn test_rect_pad_zero_clearance_bit_exact() {
        let mut pad = base_pad(PadShape::Rect, IVec2::new(2_000_000, 1_000_000));
        pad.position = IVec2::new(5_000_000, 0);
        pad.orientation = 90.0;

        let mut buf = PolygonSet::new();
        pad.transform_shape_with_clearance(&mut buf, 0, ARC_HIGH_DEF);
        assert_eq!(buf.outline_count(), 1);

        let outer = &buf.regions()[0].outer;
        assert_eq!(outer.len(), 4, "no tessellation for a bare rectangle");
        // 2 x 1 mm rect rotated 90 degrees: half extents swap.
        for p in outer {
            assert_eq!((p.x - 5_000_000).abs(), 500_000);
            assert_eq!(p.y.abs(), 1_000_000);
        }
    }

    #[test]
    fn test_trapezoid_skew() {
        let pad = base_pad(
            PadShape::Trapezoid {
                delta: IVec2::new(200_000, 0),
            },
            IVec2::new(1_000_000, 1_000_000),
        );
        let mut buf = PolygonSet::new();
        pad.transform_shape_with_clearance(&mut buf, 0, ARC_HIGH_DEF);
        let outer = &buf.regions()[0].outer;
        assert_eq!(outer.len(), 4);
        // delta.x skews the left edge up and the right edge down.
        assert!(outer.contains(&IVec2::new(-500_000, 600_000)));
        assert!(outer.contains(&IVec2::new(500_000, 400_000)));
        assert!(outer.contains(&IVec2::new(500_000, -400_000)));
        assert!(outer.contains(&IVec2::new(-500_000, -600_000)));
    }

    #[test]
    fn test_circle_pad_radius() {
        let pad = base_pad(PadShape::Circle, IVec2::splat(1_000_000));
        let mut buf = PolygonSet::new();
        pad.transform_shape_with_clearance(&mut buf, 100_000, ARC_HIGH_DEF);
        assert_eq!(buf.outline_count(), 1);

        let expected = 600_000.0; // D/2 + clearance
        for p in &buf.regions()[0].outer {
            let r = p.as_dvec2().length();
            assert!((r - expected).abs() <= 1.0, "vertex radius {}", r);
        }
    }

    #[test]
    fn test_oval_pad_capsule_extents() {
        let pad = base_pad(PadShape::Oval, IVec2::new(2_000_000, 1_000_000));
        let mut buf = PolygonSet::new();
        pad.transform_shape_with_clearance(&mut buf, 0, ARC_HIGH_DEF);
        let (min, max) = buf.bounding_box().unwrap();
        assert_eq!(max.x, 1_000_000);
        assert_eq!(min.x, -1_000_000);
        assert_eq!(max.y, 500_000);
        assert_eq!(min.y, -500_000);
    }

    #[test]
    fn test_round_rect_grows_with_clearance() {
        let pad = base_pad(
            PadShape::RoundRect {
                corner_radius: 250_000,
            },
            IVec2::new(2_000_000, 1_000_000),
        );
        let mut buf = PolygonSet::new();
        pad.transform_shape_with_clearance(&mut buf, 100_000, ARC_HIGH_DEF);
        let (min, max) = buf.bounding_box().unwrap();
        // Half extent + clearance + error correction.
        assert_eq!(max.x, 1_000_000 + 100_000 + ARC_HIGH_DEF);
        assert_eq!(min.y, -(500_000 + 100_000 + ARC_HIGH_DEF));
    }

    #[test]
    fn test_shape_position_rotates_offset() {
        let mut pad = base_pad(PadShape::Circle, IVec2::splat(1_000_000));
        pad.offset = IVec2::new(100_000, 0);
        pad.orientation = 90.0;
        assert_eq!(pad.shape_position(), IVec2::new(0, 100_000));
    }

    #[test]
    fn test_hole_transform_round_drill() {
        let mut pad = base_pad(PadShape::Circle, IVec2::splat(1_600_000));
        pad.attribute = PadAttribute::Pth;
        pad.drill = Some(Drill {
            shape: DrillShape::Circle,
            size: IVec2::splat(800_000),
        });

        let mut buf = PolygonSet::new();
        assert!(pad.transform_hole_with_clearance(&mut buf, 0, ARC_HIGH_DEF));
        let (min, max) = buf.bounding_box().unwrap();
        assert_eq!(max.x - min.x, 800_000);
        assert_eq!(max.y - min.y, 800_000);
    }

    #[test]
    fn test_hole_transform_oblong_drill() {
        let mut pad = base_pad(PadShape::Oval, IVec2::new(2_000_000, 1_200_000));
        pad.attribute = PadAttribute::Pth;
        pad.drill = Some(Drill {
            shape: DrillShape::Oblong,
            size: IVec2::new(1_000_000, 600_000),
        });

        let mut buf = PolygonSet::new();
        assert!(pad.transform_hole_with_clearance(&mut buf, 0, ARC_HIGH_DEF));
        let (min, max) = buf.bounding_box().unwrap();
        assert_eq!(max.x - min.x, 1_000_000);
        assert_eq!(max.y - min.y, 600_000);
    }

    #[test]
    fn test_hole_transform_no_drill() {
        let pad = base_pad(PadShape::Circle, IVec2::splat(1_000_000));
        let mut buf = PolygonSet::new();
        assert!(!pad.transform_hole_with_clearance(&mut buf, 0, ARC_HIGH_DEF));
        assert!(buf.is_empty());
    }

    #[test]
    fn test_npth_no_copper_detection() {
        let mut pad = base_pad(PadShape::Circle, IVec2::splat(800_000));
        pad.attribute = PadAttribute::Npth;
        pad.drill = Some(Drill {
            shape: DrillShape::Circle,
            size: IVec2::splat(800_000),
        });
        assert!(pad.is_npth_with_no_copper());

        // A copper annulus exists once the drawn shape is larger.
        pad.size = IVec2::splat(1_000_000);
        assert!(!pad.is_npth_with_no_copper());
    }
}
