//! The board model and the layer-to-polygon aggregation entry points.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{fs, path::Path};

use crate::drawing::Drawing;
use crate::geometry::PolygonSet;
use crate::pad::{transform_pads_with_clearance, Pad};
use crate::text::{StrokeFontRasterizer, TextItem};
use crate::track::Track;
use crate::types::{BoardDesignSettings, ClearanceSpec, Layer};
use crate::zone::Zone;

/// A placed component: its pads plus the graphics and text it carries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Footprint {
    pub pads: Vec<Pad>,
    pub graphics: Vec<Drawing>,
    pub texts: Vec<TextItem>,
}

impl Footprint {
    /// Append the copper shapes of this footprint's pads on `layer`,
    /// each grown by `clearance`.
    pub fn transform_pads_with_clearance(
        &self,
        layer: Option<Layer>,
        buffer: &mut PolygonSet,
        clearance: i32,
        max_error: i32,
        skip_npth_pads_with_no_copper: bool,
        skip_plated_pads: bool,
        skip_non_plated_pads: bool,
    ) {
        transform_pads_with_clearance(
            &self.pads,
            layer,
            buffer,
            clearance,
            max_error,
            skip_npth_pads_with_no_copper,
            skip_plated_pads,
            skip_non_plated_pads,
        );
    }

    /// Append the footprint's drawn graphics and text on `layer`.
    #[allow(clippy::too_many_arguments)]
    pub fn transform_graphics_with_clearance(
        &self,
        layer: Layer,
        buffer: &mut PolygonSet,
        font: &dyn StrokeFontRasterizer,
        inflate: i32,
        max_error: i32,
        include_text: bool,
        include_edges: bool,
    ) {
        if include_edges {
            for drawing in &self.graphics {
                if drawing.layer == layer {
                    drawing.transform_shape_with_clearance(buffer, inflate, max_error, false);
                }
            }
        }

        if include_text {
            for text in &self.texts {
                if text.visible && text.is_on_layer(layer) {
                    text.transform_to_polygons(font, buffer, inflate, max_error);
                }
            }
        }
    }
}

/// A single board item, as seen by the per-item conversion entry point.
#[derive(Debug, Clone, Copy)]
pub enum BoardItemRef<'a> {
    Track(&'a Track),
    Pad(&'a Pad),
    Drawing(&'a Drawing),
    Zone(&'a Zone),
    Text(&'a TextItem),
}

/// Convert one item's shape on `layer` into `buffer`, grown by
/// `spec.inflate` and tessellated at `spec.max_error`. Items not present
/// on the layer contribute nothing.
pub fn convert_item_to_polygons(
    item: BoardItemRef<'_>,
    layer: Layer,
    spec: ClearanceSpec,
    font: &dyn StrokeFontRasterizer,
    buffer: &mut PolygonSet,
) {
    match item {
        BoardItemRef::Track(track) => {
            if track.is_on_layer(layer) {
                track.transform_shape_with_clearance(buffer, spec.inflate, spec.max_error);
            }
        }
        BoardItemRef::Pad(pad) => {
            if pad.is_on_layer(layer) {
                pad.transform_shape_with_clearance(buffer, spec.inflate, spec.max_error);
            }
        }
        BoardItemRef::Drawing(drawing) => {
            if drawing.layer == layer {
                drawing.transform_shape_with_clearance(buffer, spec.inflate, spec.max_error, false);
            }
        }
        BoardItemRef::Zone(zone) => {
            if zone.is_on_layer(layer) {
                zone.transform_shape_with_clearance(layer, buffer, spec.inflate, spec.max_error);
            }
        }
        BoardItemRef::Text(text) => {
            if text.visible && text.is_on_layer(layer) {
                text.transform_to_polygons(font, buffer, spec.inflate, spec.max_error);
            }
        }
    }
}

/// The full board: free items plus footprints and the design settings
/// governing tessellation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Board {
    pub tracks: Vec<Track>,
    pub footprints: Vec<Footprint>,
    pub zones: Vec<Zone>,
    pub drawings: Vec<Drawing>,
    pub texts: Vec<TextItem>,
    pub settings: BoardDesignSettings,
}

impl Board {
    /// Convert every item on `layer` to polygons at zero clearance.
    pub fn convert_layer_to_polygons(
        &self,
        layer: Layer,
        font: &dyn StrokeFontRasterizer,
    ) -> PolygonSet {
        let mut buffer = PolygonSet::new();
        self.convert_layer_into(layer, font, &mut buffer);
        buffer
    }

    /// Append every item on `layer` into an existing buffer: tracks and
    /// vias, footprint pads and graphics, filled zones, then free drawings
    /// and text.
    pub fn convert_layer_into(
        &self,
        layer: Layer,
        font: &dyn StrokeFontRasterizer,
        buffer: &mut PolygonSet,
    ) {
        let max_error = self.settings.max_error;

        for track in &self.tracks {
            if track.is_on_layer(layer) {
                track.transform_shape_with_clearance(buffer, 0, max_error);
            }
        }

        for footprint in &self.footprints {
            footprint.transform_pads_with_clearance(
                Some(layer),
                buffer,
                0,
                max_error,
                true,
                false,
                false,
            );
            footprint.transform_graphics_with_clearance(
                layer, buffer, font, 0, max_error, true, true,
            );
        }

        for zone in &self.zones {
            if zone.is_on_layer(layer) {
                zone.transform_solid_areas(layer, buffer, max_error);
            }
        }

        for drawing in &self.drawings {
            if drawing.layer == layer {
                drawing.transform_shape_with_clearance(buffer, 0, max_error, false);
            }
        }

        for text in &self.texts {
            if text.visible && text.is_on_layer(layer) {
                text.transform_to_polygons(font, buffer, 0, max_error);
            }
        }
    }

    /// Persist the board to disk as prettified JSON.
    pub fn save_to_path<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let data = serde_json::to_vec_pretty(self).context("serialize board")?;
        fs::write(path, data).context("write board file")
    }

    /// Load a board from disk.
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let bytes = fs::read(&path).with_context(|| {
            format!("read board file from {}", path.as_ref().to_string_lossy())
        })?;
        let board: Board = serde_json::from_slice(&bytes).context("deserialize board file")?;
        Ok(board)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::text::StrokeTextRequest;
    use crate::track::TrackKind;
    use crate::types::{LayerSet, ARC_HIGH_DEF};
    use glam::IVec2;

    struct NullFont;

    impl StrokeFontRasterizer for NullFont {
        fn render(&self, _request: &StrokeTextRequest<'_>, _emit: &mut dyn FnMut(IVec2, IVec2)) {}

        fn extents(
            &self,
            _text: &str,
            size: IVec2,
            _pen_width: i32,
            _italic: bool,
            _bold: bool,
        ) -> IVec2 {
            size
        }
    }

    fn front_track(start: IVec2, end: IVec2) -> Track {
        Track {
            start,
            end,
            width: 200_000,
            layers: LayerSet::of(&[Layer::FrontCopper]),
            kind: TrackKind::Segment,
        }
    }

    #[test]
    fn test_layer_filtering() {
        let board = Board {
            tracks: vec![front_track(IVec2::ZERO, IVec2::new(1_000_000, 0))],
            settings: BoardDesignSettings {
                max_error: ARC_HIGH_DEF,
            },
            ..Default::default()
        };

        let front = board.convert_layer_to_polygons(Layer::FrontCopper, &NullFont);
        assert_eq!(front.outline_count(), 1);

        let back = board.convert_layer_to_polygons(Layer::BackCopper, &NullFont);
        assert!(back.is_empty());
    }

    #[test]
    fn test_item_conversion_respects_layer() {
        let track = front_track(IVec2::ZERO, IVec2::new(500_000, 0));
        let spec = ClearanceSpec {
            inflate: 0,
            max_error: ARC_HIGH_DEF,
        };

        let mut buffer = PolygonSet::new();
        convert_item_to_polygons(
            BoardItemRef::Track(&track),
            Layer::BackCopper,
            spec,
            &NullFont,
            &mut buffer,
        );
        assert!(buffer.is_empty());

        convert_item_to_polygons(
            BoardItemRef::Track(&track),
            Layer::FrontCopper,
            spec,
            &NullFont,
            &mut buffer,
        );
        assert_eq!(buffer.outline_count(), 1);
    }

    #[test]
    fn test_board_round_trips_through_json() {
        let board = Board {
            tracks: vec![front_track(IVec2::ZERO, IVec2::new(1_000_000, 0))],
            ..Default::default()
        };

        let bytes = serde_json::to_vec(&board).expect("serialize");
        let restored: Board = serde_json::from_slice(&bytes).expect("deserialize");
        assert_eq!(restored, board);
    }
}
