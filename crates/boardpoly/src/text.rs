//! Stroke-text conversion. The stroke-font rasterizer is an external
//! collaborator: it renders glyphs as pen segments and reports them through
//! a callback. Each reported segment becomes one stadium outline of the
//! effective stroke width.
//!
//! The per-call context (buffer, width, error) is a call-local closure, so
//! text conversion is reentrant and needs no shared state between calls.

use glam::IVec2;
use serde::{Deserialize, Serialize};

use crate::geometry::{oval_to_polygon, rotate_point, PolygonSet};
use crate::types::{mm_to_iu, HorizJustify, Layer, VertJustify};

/// Baseline-to-baseline pitch relative to the nominal glyph height.
pub const INTERLINE_PITCH_RATIO: f64 = 1.62;

/// Everything a rasterizer needs to place one line of text.
#[derive(Debug, Clone, Copy)]
pub struct StrokeTextRequest<'a> {
    pub text: &'a str,
    pub position: IVec2,
    pub angle_deg: f64,
    /// Nominal glyph size; a negative x mirrors the text.
    pub size: IVec2,
    pub h_justify: HorizJustify,
    pub v_justify: VertJustify,
    pub pen_width: i32,
    pub italic: bool,
    pub bold: bool,
}

/// Stroke-font rasterizer abstraction. Implementations draw one line of
/// text (justification included) and report every pen stroke through
/// `emit(start, end)` in board coordinates.
pub trait StrokeFontRasterizer {
    fn render(&self, request: &StrokeTextRequest<'_>, emit: &mut dyn FnMut(IVec2, IVec2));

    /// Ink extents of one line at the given size, before rotation.
    fn extents(&self, text: &str, size: IVec2, pen_width: i32, italic: bool, bold: bool) -> IVec2;
}

/// A text item placed on the board.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextItem {
    pub text: String,
    pub position: IVec2,
    pub angle_deg: f64,
    pub size: IVec2,
    pub pen_width: i32,
    pub mirrored: bool,
    pub italic: bool,
    pub bold: bool,
    pub multiline: bool,
    pub h_justify: HorizJustify,
    pub v_justify: VertJustify,
    pub layer: Layer,
    pub visible: bool,
}

impl TextItem {
    pub fn is_on_layer(&self, layer: Layer) -> bool {
        self.layer == layer
    }

    /// Baseline-to-baseline distance between consecutive lines.
    pub fn interline(&self) -> i32 {
        (self.size.y as f64 * INTERLINE_PITCH_RATIO).round() as i32
    }

    /// Per-line anchor positions for a multi-line block of `line_count`
    /// lines. Lines stack downward from the first; vertical justification
    /// shifts the whole block.
    pub fn line_positions(&self, line_count: usize) -> Vec<IVec2> {
        let interline = self.interline();
        let block = (line_count.saturating_sub(1)) as i32 * interline;
        let first_offset = match self.v_justify {
            VertJustify::Top => 0,
            VertJustify::Center => block / 2,
            VertJustify::Bottom => block,
        };

        (0..line_count)
            .map(|i| {
                let local = IVec2::new(0, first_offset - i as i32 * interline);
                self.position + rotate_point(local, IVec2::ZERO, self.angle_deg)
            })
            .collect()
    }

    /// Append one stadium outline per rendered pen stroke, with the stroke
    /// grown by the clearance on both sides.
    pub fn transform_to_polygons(
        &self,
        font: &dyn StrokeFontRasterizer,
        buffer: &mut PolygonSet,
        clearance: i32,
        max_error: i32,
    ) {
        if self.text.is_empty() {
            return;
        }

        let mut size = self.size;
        if self.mirrored {
            size.x = -size.x;
        }
        let stroke_width = self.pen_width + 2 * clearance;

        let mut emit = |start: IVec2, end: IVec2| {
            buffer.add_outline(oval_to_polygon(start, end, stroke_width, max_error));
        };

        if self.multiline && self.text.contains('\n') {
            let lines: Vec<&str> = self.text.split('\n').collect();
            let positions = self.line_positions(lines.len());
            for (line, position) in lines.iter().zip(positions) {
                font.render(
                    &StrokeTextRequest {
                        text: line,
                        position,
                        angle_deg: self.angle_deg,
                        size,
                        h_justify: self.h_justify,
                        v_justify: self.v_justify,
                        pen_width: self.pen_width,
                        italic: self.italic,
                        bold: self.bold,
                    },
                    &mut emit,
                );
            }
        } else {
            font.render(
                &StrokeTextRequest {
                    text: &self.text,
                    position: self.position,
                    angle_deg: self.angle_deg,
                    size,
                    h_justify: self.h_justify,
                    v_justify: self.v_justify,
                    pen_width: self.pen_width,
                    italic: self.italic,
                    bold: self.bold,
                },
                &mut emit,
            );
        }
    }

    /// Append the rotated text bounding box grown by the clearance plus a
    /// fixed drawing margin. Used where a coarse text obstacle is enough.
    pub fn transform_bounding_box(
        &self,
        font: &dyn StrokeFontRasterizer,
        buffer: &mut PolygonSet,
        clearance: i32,
    ) {
        if self.text.is_empty() {
            return;
        }

        let widest = self
            .text
            .split('\n')
            .map(|line| {
                font.extents(line, self.size, self.pen_width, self.italic, self.bold)
                    .x
            })
            .max()
            .unwrap_or(0);
        let line_count = self.text.split('\n').count() as i32;
        let height = self.size.y + (line_count - 1) * self.interline();

        let (x0, x1) = match self.h_justify {
            HorizJustify::Left => (0, widest),
            HorizJustify::Center => (-widest / 2, widest / 2),
            HorizJustify::Right => (-widest, 0),
        };
        let (y0, y1) = match self.v_justify {
            VertJustify::Top => (-height, 0),
            VertJustify::Center => (-height / 2, height / 2),
            VertJustify::Bottom => (0, height),
        };

        let margin = clearance + mm_to_iu(0.15);
        let corners = [
            IVec2::new(x0 - margin, y0 - margin),
            IVec2::new(x1 + margin, y0 - margin),
            IVec2::new(x1 + margin, y1 + margin),
            IVec2::new(x0 - margin, y1 + margin),
        ];

        buffer.add_outline(
            corners
                .iter()
                .map(|c| rotate_point(self.position + *c, self.position, self.angle_deg))
                .collect(),
        );
    }
}
