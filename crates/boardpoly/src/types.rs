use serde::{Deserialize, Serialize};

/// Internal units per millimeter. All board coordinates are integer nanometers.
pub const IU_PER_MM: i32 = 1_000_000;

/// Default maximum chord error for arc approximation (0.005 mm), used when the
/// caller does not supply a tighter tolerance.
pub const ARC_HIGH_DEF: i32 = 5_000;

/// Convert a millimeter value to internal units, rounding half away from zero.
pub fn mm_to_iu(mm: f64) -> i32 {
    (mm * IU_PER_MM as f64).round() as i32
}

/// A board layer. Shapes declare which layers they are present on; the
/// aggregator converts one layer at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Layer {
    FrontCopper,
    BackCopper,
    FrontMask,
    BackMask,
    FrontPaste,
    BackPaste,
    FrontSilk,
    BackSilk,
    EdgeCuts,
}

impl Layer {
    fn bit(self) -> u16 {
        1 << match self {
            Layer::FrontCopper => 0,
            Layer::BackCopper => 1,
            Layer::FrontMask => 2,
            Layer::BackMask => 3,
            Layer::FrontPaste => 4,
            Layer::BackPaste => 5,
            Layer::FrontSilk => 6,
            Layer::BackSilk => 7,
            Layer::EdgeCuts => 8,
        }
    }

    pub fn is_copper(self) -> bool {
        matches!(self, Layer::FrontCopper | Layer::BackCopper)
    }

    pub fn is_mask(self) -> bool {
        matches!(self, Layer::FrontMask | Layer::BackMask)
    }

    pub fn is_paste(self) -> bool {
        matches!(self, Layer::FrontPaste | Layer::BackPaste)
    }

    /// The solder-mask layer on the same side as a copper layer.
    pub fn mask_for_copper(self) -> Option<Layer> {
        match self {
            Layer::FrontCopper => Some(Layer::FrontMask),
            Layer::BackCopper => Some(Layer::BackMask),
            _ => None,
        }
    }
}

/// Set of layers a board item is present on, stored as a bitmask.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayerSet(u16);

impl LayerSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a set from a list of layers.
    pub fn of(layers: &[Layer]) -> Self {
        let mut set = Self::new();
        for layer in layers {
            set.insert(*layer);
        }
        set
    }

    pub fn insert(&mut self, layer: Layer) {
        self.0 |= layer.bit();
    }

    pub fn contains(&self, layer: Layer) -> bool {
        self.0 & layer.bit() != 0
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    pub fn union(&self, other: LayerSet) -> LayerSet {
        LayerSet(self.0 | other.0)
    }
}

/// Horizontal text justification relative to the text position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HorizJustify {
    Left,
    Center,
    Right,
}

/// Vertical text justification relative to the text position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VertJustify {
    Top,
    Center,
    Bottom,
}

/// A uniform inflation distance plus the maximum chord error allowed when
/// approximating curves during the conversion. Inflation is applied per
/// outline, never per vertex.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClearanceSpec {
    pub inflate: i32,
    pub max_error: i32,
}

impl Default for ClearanceSpec {
    fn default() -> Self {
        Self {
            inflate: 0,
            max_error: ARC_HIGH_DEF,
        }
    }
}

/// Global conversion settings owned by the board.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoardDesignSettings {
    /// Maximum chord error for arc/circle approximation.
    pub max_error: i32,
}

impl Default for BoardDesignSettings {
    fn default() -> Self {
        Self {
            max_error: ARC_HIGH_DEF,
        }
    }
}
