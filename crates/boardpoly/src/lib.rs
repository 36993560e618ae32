mod board;
mod drawing;
mod geometry;
mod pad;
mod text;
mod track;
mod types;
mod zone;

pub use board::{convert_item_to_polygons, Board, BoardItemRef, Footprint};
pub use drawing::{Drawing, DrawnShape};
pub use geometry::*;
pub use pad::{
    transform_pads_with_clearance, transform_with_unequal_clearance, CustomAnchor, Drill,
    DrillShape, Pad, PadAttribute, PadShape,
};
pub use text::{StrokeFontRasterizer, StrokeTextRequest, TextItem, INTERLINE_PITCH_RATIO};
pub use track::{Track, TrackKind};
pub use types::*;
pub use zone::Zone;
