//! An ordered collection of polygon outlines with offset / boolean
//! normalization operations, backed by clipper2 (the same engine the rest of
//! the geometry pipeline uses for boolean and offset work).
//!
//! Before `fracture`, regions are independent shapes that may overlap;
//! overlap resolution belongs to the boolean layer, not to the converters
//! that fill the set.

use std::f64::consts::PI;

use clipper2::{EndType, JoinType, Path, PathType, Polygon, Polygons, Vertex};
use glam::IVec2;
use serde::{Deserialize, Serialize};

use super::rotate_point;

/// A closed ring of integer-coordinate points, without a closing duplicate.
pub type Outline = Vec<IVec2>;

/// One outer boundary plus the holes attached to it (after fracture; empty
/// for freshly appended shapes unless built as an annulus).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PolyRegion {
    pub outer: Outline,
    pub holes: Vec<Outline>,
}

/// Speed/quality trade-off for boolean and offset operations. `Fast` accepts
/// the raw engine output; `StrictlySimple` re-normalizes afterwards, for
/// consumers that cannot tolerate any residual self-intersection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PolygonMode {
    Fast,
    StrictlySimple,
}

/// Shared accumulation buffer for all shape converters.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PolygonSet {
    regions: Vec<PolyRegion>,
}

/// Twice the signed area of an outline (shoelace). Positive for
/// counter-clockwise rings in y-up coordinates.
pub fn signed_area(outline: &[IVec2]) -> f64 {
    let mut sum = 0.0;
    for i in 0..outline.len() {
        let a = outline[i].as_dvec2();
        let b = outline[(i + 1) % outline.len()].as_dvec2();
        sum += a.x * b.y - b.x * a.y;
    }
    sum / 2.0
}

/// Ray-cast point-in-polygon test. Points exactly on the boundary may fall
/// on either side.
pub fn contains_point(outline: &[IVec2], p: IVec2) -> bool {
    if outline.is_empty() {
        return false;
    }
    let (x, y) = (p.x as f64, p.y as f64);
    let mut inside = false;
    let mut j = outline.len() - 1;
    for i in 0..outline.len() {
        let (xi, yi) = (outline[i].x as f64, outline[i].y as f64);
        let (xj, yj) = (outline[j].x as f64, outline[j].y as f64);
        if ((yi > y) != (yj > y)) && (x < (xj - xi) * (y - yi) / (yj - yi) + xi) {
            inside = !inside;
        }
        j = i;
    }
    inside
}

/// Drop consecutive duplicate points and a closing duplicate, keeping the
/// ring implicit.
fn clean_outline(points: Outline) -> Outline {
    let mut cleaned: Outline = Vec::with_capacity(points.len());
    for p in points {
        if cleaned.last() != Some(&p) {
            cleaned.push(p);
        }
    }
    while cleaned.len() > 1 && cleaned.first() == cleaned.last() {
        cleaned.pop();
    }
    cleaned
}

impl PolygonSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    /// Number of outer outlines.
    pub fn outline_count(&self) -> usize {
        self.regions.len()
    }

    pub fn hole_count(&self) -> usize {
        self.regions.iter().map(|r| r.holes.len()).sum()
    }

    pub fn regions(&self) -> &[PolyRegion] {
        &self.regions
    }

    /// Append one outline as a new independent region. Degenerate input
    /// (fewer than 3 distinct points after cleanup) appends nothing.
    pub fn add_outline(&mut self, points: Outline) {
        let outer = clean_outline(points);
        if outer.len() >= 3 {
            self.regions.push(PolyRegion {
                outer,
                holes: Vec::new(),
            });
        }
    }

    /// Attach a hole to the most recently added region.
    pub fn add_hole(&mut self, points: Outline) {
        let hole = clean_outline(points);
        if hole.len() >= 3 {
            if let Some(region) = self.regions.last_mut() {
                region.holes.push(hole);
            }
        }
    }

    /// Raw accumulation of another set, without any boolean resolution.
    pub fn append(&mut self, other: &PolygonSet) {
        self.regions.extend(other.regions.iter().cloned());
    }

    pub fn translate(&mut self, delta: IVec2) {
        self.for_each_point(|p| p + delta);
    }

    /// Rotate every point around a center by an angle in degrees.
    pub fn rotate(&mut self, center: IVec2, angle_deg: f64) {
        self.for_each_point(|p| rotate_point(p, center, angle_deg));
    }

    fn for_each_point(&mut self, f: impl Fn(IVec2) -> IVec2) {
        for region in &mut self.regions {
            for p in region.outer.iter_mut() {
                *p = f(*p);
            }
            for hole in &mut region.holes {
                for p in hole.iter_mut() {
                    *p = f(*p);
                }
            }
        }
    }

    /// Total enclosed area, holes subtracted. Meaningful after `simplify`
    /// (overlapping regions are counted twice before).
    pub fn area(&self) -> f64 {
        self.regions
            .iter()
            .map(|r| {
                signed_area(&r.outer).abs()
                    - r.holes.iter().map(|h| signed_area(h).abs()).sum::<f64>()
            })
            .sum()
    }

    pub fn bounding_box(&self) -> Option<(IVec2, IVec2)> {
        let mut points = self
            .regions
            .iter()
            .flat_map(|r| r.outer.iter().chain(r.holes.iter().flatten()));
        let first = *points.next()?;
        let (mut min, mut max) = (first, first);
        for p in points {
            min = min.min(*p);
            max = max.max(*p);
        }
        Some((min, max))
    }

    /// Grow (or shrink, for negative distance) every outline by `distance`,
    /// rounding convex corners with `segments_per_circle` segments per full
    /// circle.
    pub fn inflate(&mut self, distance: i32, segments_per_circle: usize, mode: PolygonMode) {
        if self.regions.is_empty() || distance == 0 {
            return;
        }

        // clipper2 takes an arc tolerance, not a segment count: the sagitta
        // of a circle of radius |distance| cut into that many segments.
        let n = segments_per_circle.max(4) as f64;
        let arc_tolerance = (distance.abs() as f64 * (1.0 - (PI / n).cos())).max(0.25);

        let result = clipper2::inflate(
            self.to_clipper(),
            distance as f64,
            JoinType::Round,
            EndType::ClosedPolygon,
            2.0,
            arc_tolerance,
        );
        *self = Self::from_clipper(&result);

        if mode == PolygonMode::StrictlySimple {
            self.simplify(mode);
        }
    }

    /// Inflate while keeping holes attached to their outer boundaries, so
    /// thin fills do not grow slivers where a hole approaches the boundary.
    pub fn inflate_with_linked_holes(
        &mut self,
        distance: i32,
        segments_per_circle: usize,
        mode: PolygonMode,
    ) {
        self.simplify(mode);
        self.inflate(distance, segments_per_circle, mode);
        self.fracture(mode);
    }

    /// Remove self-intersections and duplicate points, merge overlapping
    /// regions and normalize winding. Idempotent.
    pub fn simplify(&mut self, _mode: PolygonMode) {
        if self.regions.is_empty() {
            return;
        }
        // A difference against an empty clip runs the boolean engine over the
        // subject alone, which unions it into a normalized region set.
        let result = clipper2::difference(self.to_clipper(), Polygons::new(Vec::new()));
        *self = Self::from_clipper(&result);
    }

    /// Normalize, then merge every hole into its outer boundary through a
    /// zero-width bridge, leaving simple polygons only. Required before
    /// export formats that cannot represent holes. Idempotent.
    pub fn fracture(&mut self, mode: PolygonMode) {
        if self.regions.is_empty() {
            return;
        }
        self.simplify(mode);
        for region in &mut self.regions {
            if !region.holes.is_empty() {
                region.outer = bridge_holes(region);
                region.holes.clear();
            }
        }
    }

    fn to_clipper(&self) -> Polygons {
        let polygons: Vec<Polygon> = self
            .regions
            .iter()
            .map(|region| {
                let mut paths = vec![clipper_path(&region.outer, false)];
                for hole in &region.holes {
                    paths.push(clipper_path(hole, true));
                }
                Polygon::new(paths, PathType::Subject)
            })
            .collect();
        Polygons::new(polygons)
    }

    fn from_clipper(result: &Polygons) -> Self {
        let mut outlines: Vec<Outline> = Vec::new();
        for polygon in result.polygons().iter() {
            for path in polygon.paths().iter() {
                let points: Outline = path
                    .vertices()
                    .iter()
                    .map(|v| IVec2::new(v.x().round() as i32, v.y().round() as i32))
                    .collect();
                let points = clean_outline(points);
                if points.len() >= 3 {
                    outlines.push(points);
                }
            }
        }
        assemble_regions(outlines)
    }
}

/// Rebuild outer/hole structure from a flat list of non-intersecting
/// outlines, using nesting parity: even containment depth is an outer
/// boundary, odd depth is a hole of its tightest enclosing outer.
fn assemble_regions(outlines: Vec<Outline>) -> PolygonSet {
    let depths: Vec<usize> = (0..outlines.len())
        .map(|i| {
            outlines
                .iter()
                .enumerate()
                .filter(|(j, other)| *j != i && contains_point(other, outlines[i][0]))
                .count()
        })
        .collect();

    let mut set = PolygonSet::new();
    let mut outer_index: Vec<usize> = Vec::new();
    for (i, outline) in outlines.iter().enumerate() {
        if depths[i] % 2 == 0 {
            outer_index.push(i);
            set.regions.push(PolyRegion {
                outer: outline.clone(),
                holes: Vec::new(),
            });
        }
    }

    for (i, outline) in outlines.iter().enumerate() {
        if depths[i] % 2 == 1 {
            // Tightest enclosing outer: smallest area among those containing
            // a sample vertex of the hole.
            let parent = outer_index
                .iter()
                .enumerate()
                .filter(|(_, oi)| contains_point(&outlines[**oi], outline[0]))
                .min_by(|(_, a), (_, b)| {
                    let area_a = signed_area(&outlines[**a]).abs();
                    let area_b = signed_area(&outlines[**b]).abs();
                    area_a.total_cmp(&area_b)
                })
                .map(|(region, _)| region);
            if let Some(region) = parent {
                set.regions[region].holes.push(outline.clone());
            }
        }
    }
    set
}

/// Splice every hole of a region into its outer ring through the nearest
/// vertex pair, doubling the bridge edge.
fn bridge_holes(region: &PolyRegion) -> Outline {
    let mut outer = region.outer.clone();
    if signed_area(&outer) < 0.0 {
        outer.reverse();
    }

    for hole in &region.holes {
        let mut hole = hole.clone();
        if signed_area(&hole) > 0.0 {
            hole.reverse();
        }

        let mut best = (0usize, 0usize, f64::INFINITY);
        for (i, p) in outer.iter().enumerate() {
            for (j, q) in hole.iter().enumerate() {
                let d = (*p - *q).as_dvec2().length_squared();
                if d < best.2 {
                    best = (i, j, d);
                }
            }
        }
        let (oi, hj, _) = best;

        let mut merged: Outline = Vec::with_capacity(outer.len() + hole.len() + 2);
        merged.extend_from_slice(&outer[..=oi]);
        merged.extend_from_slice(&hole[hj..]);
        merged.extend_from_slice(&hole[..=hj]);
        merged.extend_from_slice(&outer[oi..]);
        outer = merged;
    }
    outer
}

fn clipper_path(outline: &Outline, reverse: bool) -> Path {
    // Outer rings go in counter-clockwise, holes clockwise.
    let ccw = signed_area(outline) >= 0.0;
    let flip = ccw == reverse;
    let vertices: Vec<Vertex> = if flip {
        outline
            .iter()
            .rev()
            .map(|p| Vertex::new(p.x as f64, p.y as f64))
            .collect()
    } else {
        outline
            .iter()
            .map(|p| Vertex::new(p.x as f64, p.y as f64))
            .collect()
    };
    Path::new(vertices, true)
}
