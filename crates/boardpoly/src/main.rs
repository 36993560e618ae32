use boardpoly::*;
use glam::IVec2;

struct NoFont;

impl StrokeFontRasterizer for NoFont {
    fn render(&self, _request: &StrokeTextRequest<'_>, _emit: &mut dyn FnMut(IVec2, IVec2)) {}

    fn extents(&self, _text: &str, size: IVec2, _pen_width: i32, _italic: bool, _bold: bool) -> IVec2 {
        size
    }
}

fn main() -> anyhow::Result<()> {
    let args: Vec<String> = std::env::args().collect();
    let operation = args.get(1).map(|s| s.as_str()).unwrap_or("layer");

    match operation {
        "layer" => demo_layer()?,
        "pad" => demo_pad(),
        _ => {
            println!("Usage: boardpoly [layer|pad]");
            println!("  layer  - Convert a small demo board's front copper layer (default)");
            println!("  pad    - Convert a single rounded-rect pad with clearance");
        }
    }

    Ok(())
}

/// Build a tiny board (one track, one footprint with two pads, one zone)
/// and convert its front copper layer to polygons.
fn demo_layer() -> anyhow::Result<()> {
    println!("boardpoly - layer conversion demo");
    println!("=================================\n");

    let copper = LayerSet::of(&[Layer::FrontCopper]);

    let track = Track {
        start: IVec2::new(0, 0),
        end: IVec2::new(5 * IU_PER_MM, 0),
        width: mm_to_iu(0.25),
        layers: copper,
        kind: TrackKind::Segment,
    };

    let pad = |x: i32| Pad {
        position: IVec2::new(x, 0),
        offset: IVec2::ZERO,
        size: IVec2::new(mm_to_iu(1.0), mm_to_iu(0.6)),
        orientation: 0.0,
        shape: PadShape::RoundRect {
            corner_radius: mm_to_iu(0.15),
        },
        attribute: PadAttribute::Smd,
        drill: None,
        layers: copper,
        solder_mask_margin: 0,
        solder_paste_margin: IVec2::ZERO,
    };

    let board = Board {
        tracks: vec![track],
        footprints: vec![Footprint {
            pads: vec![pad(0), pad(5 * IU_PER_MM)],
            graphics: Vec::new(),
            texts: Vec::new(),
        }],
        zones: Vec::new(),
        drawings: Vec::new(),
        texts: Vec::new(),
        settings: BoardDesignSettings::default(),
    };

    let polys = board.convert_layer_to_polygons(Layer::FrontCopper, &NoFont);
    println!(
        "Front copper: {} outline(s), {} hole(s)",
        polys.outline_count(),
        polys.hole_count()
    );
    if let Some((min, max)) = polys.bounding_box() {
        println!(
            "Bounding box: ({:.3}, {:.3}) to ({:.3}, {:.3}) mm",
            min.x as f64 / IU_PER_MM as f64,
            min.y as f64 / IU_PER_MM as f64,
            max.x as f64 / IU_PER_MM as f64,
            max.y as f64 / IU_PER_MM as f64,
        );
    }

    println!("\nBoard as JSON:\n");
    println!("{}", serde_json::to_string_pretty(&board)?);
    Ok(())
}

/// Convert one pad with a positive clearance and report the result.
fn demo_pad() {
    println!("boardpoly - pad conversion demo");
    println!("===============================\n");

    let pad = Pad {
        position: IVec2::ZERO,
        offset: IVec2::ZERO,
        size: IVec2::new(mm_to_iu(1.6), mm_to_iu(0.9)),
        orientation: 30.0,
        shape: PadShape::Oval,
        attribute: PadAttribute::Smd,
        drill: None,
        layers: LayerSet::of(&[Layer::FrontCopper]),
        solder_mask_margin: 0,
        solder_paste_margin: IVec2::ZERO,
    };

    let mut polys = PolygonSet::new();
    pad.transform_shape_with_clearance(&mut polys, mm_to_iu(0.2), ARC_HIGH_DEF);

    println!(
        "Oval pad at 30 deg with 0.2 mm clearance: {} outline(s)",
        polys.outline_count()
    );
    if let Some((min, max)) = polys.bounding_box() {
        println!(
            "Extent: {:.3} x {:.3} mm",
            (max.x - min.x) as f64 / IU_PER_MM as f64,
            (max.y - min.y) as f64 / IU_PER_MM as f64,
        );
    }
}
