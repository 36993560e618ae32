//! Filled-zone conversion. Zones own a precomputed fill polygon set per
//! layer (the filler itself lives elsewhere); this module copies or inflates
//! that fill into the shared buffer.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::geometry::{arc_segment_count, PolygonMode, PolygonSet};
use crate::types::{Layer, LayerSet};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Zone {
    pub layers: LayerSet,
    /// Fill result per layer, computed by the zone filler.
    pub filled_polys: HashMap<Layer, PolygonSet>,
    /// Minimum border thickness of the fill outline.
    pub min_thickness: i32,
    /// Whether the stored fill outlines are drawn with `min_thickness` and
    /// must be grown by half of it when converted.
    pub fill_uses_thickness: bool,
}

impl Zone {
    pub fn is_on_layer(&self, layer: Layer) -> bool {
        self.layers.contains(layer)
    }

    /// Append the filled areas of one layer. When the fill outline carries
    /// thickness, the polygons are grown by half of it with holes kept
    /// linked to their boundary, so no slivers open up near holes.
    pub fn transform_solid_areas(&self, layer: Layer, buffer: &mut PolygonSet, max_error: i32) {
        let Some(polys) = self.filled_polys.get(&layer) else {
            return;
        };
        if polys.is_empty() {
            return;
        }

        if !self.fill_uses_thickness || self.min_thickness == 0 {
            buffer.append(polys);
            return;
        }

        let mut polys = polys.clone();
        let segments = arc_segment_count(self.min_thickness, max_error, 360.0);
        polys.inflate_with_linked_holes(self.min_thickness / 2, segments, PolygonMode::Fast);
        buffer.append(&polys);
    }

    /// Clearance-facing variant: grow the fill by `clearance` and normalize
    /// strictly, since rule-checking queries cannot tolerate residual
    /// self-intersections.
    pub fn transform_shape_with_clearance(
        &self,
        layer: Layer,
        buffer: &mut PolygonSet,
        clearance: i32,
        max_error: i32,
    ) {
        let Some(polys) = self.filled_polys.get(&layer) else {
            return;
        };
        if polys.is_empty() {
            return;
        }

        let mut polys = polys.clone();
        let segments = arc_segment_count(clearance, max_error, 360.0);
        polys.inflate(clearance, segments, PolygonMode::StrictlySimple);
        polys.simplify(PolygonMode::StrictlySimple);
        buffer.append(&polys);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ARC_HIGH_DEF;
    use glam::IVec2;

    fn zone_with_square_fill(layer: Layer, side: i32) -> Zone {
        let mut fill = PolygonSet::new();
        fill.add_outline(vec![
            IVec2::new(0, 0),
            IVec2::new(side, 0),
            IVec2::new(side, side),
            IVec2::new(0, side),
        ]);
        let mut filled_polys = HashMap::new();
        filled_polys.insert(layer, fill);
        Zone {
            layers: LayerSet::of(&[layer]),
            filled_polys,
            min_thickness: 0,
            fill_uses_thickness: false,
        }
    }

    #[test]
    fn test_solid_areas_copied_without_thickness() {
        let zone = zone_with_square_fill(Layer::FrontCopper, 1_000_000);
        let mut buf = PolygonSet::new();
        zone.transform_solid_areas(Layer::FrontCopper, &mut buf, ARC_HIGH_DEF);
        assert_eq!(buf.outline_count(), 1);
        assert_eq!(buf.area(), 1_000_000.0 * 1_000_000.0);
    }

    #[test]
    fn test_missing_layer_contributes_nothing() {
        let zone = zone_with_square_fill(Layer::FrontCopper, 1_000_000);
        let mut buf = PolygonSet::new();
        zone.transform_solid_areas(Layer::BackCopper, &mut buf, ARC_HIGH_DEF);
        assert!(buf.is_empty());
    }

    #[test]
    fn test_empty_fill_contributes_nothing() {
        let mut zone = zone_with_square_fill(Layer::FrontCopper, 1_000_000);
        zone.filled_polys
            .insert(Layer::FrontCopper, PolygonSet::new());
        let mut buf = PolygonSet::new();
        zone.transform_solid_areas(Layer::FrontCopper, &mut buf, ARC_HIGH_DEF);
        assert!(buf.is_empty());
    }
}
