//! Track, arc-track and via conversion.

use glam::IVec2;
use serde::{Deserialize, Serialize};

use crate::geometry::{arc_to_polygon, circle_to_polygon, oval_to_polygon, PolygonSet};
use crate::types::{Layer, LayerSet};

/// Routed item kind. Line width always applies to tracks; there is no
/// ignore-width variant by construction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum TrackKind {
    Segment,
    /// Arc from the track start around `center`, sweeping `sweep_deg`
    /// degrees (positive = counter-clockwise).
    Arc { center: IVec2, sweep_deg: f64 },
    /// Via drilled at the track start; `end` is unused.
    Via,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Track {
    pub start: IVec2,
    pub end: IVec2,
    pub width: i32,
    pub layers: LayerSet,
    pub kind: TrackKind,
}

impl Track {
    pub fn is_on_layer(&self, layer: Layer) -> bool {
        self.layers.contains(layer)
    }

    /// Append the track's polygon contribution grown by `clearance`.
    pub fn transform_shape_with_clearance(
        &self,
        buffer: &mut PolygonSet,
        clearance: i32,
        max_error: i32,
    ) {
        match self.kind {
            TrackKind::Via => {
                let radius = self.width / 2 + clearance;
                buffer.add_outline(circle_to_polygon(self.start, radius, max_error));
            }

            TrackKind::Arc { center, sweep_deg } => {
                let width = self.width + 2 * clearance;
                if width > 0 {
                    buffer.add_outline(arc_to_polygon(
                        center, self.start, sweep_deg, max_error, width,
                    ));
                }
            }

            TrackKind::Segment => {
                let width = self.width + 2 * clearance;
                if width > 0 {
                    buffer.add_outline(oval_to_polygon(self.start, self.end, width, max_error));
                }
            }
        }
    }
}
