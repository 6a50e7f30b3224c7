//! Named colour palettes for sample matrices.
//!
//! Each palette is a piecewise-linear ramp through evenly spaced colour stops
//! sampled from the well-known perceptually uniform scales (`magma`,
//! `viridis`, ...), plus a grey ramp and the `coolwarm` diverging scale.
//! Appending `_r` to a name reverses the ramp.

use std::fmt;
use std::str::FromStr;

use depth_common::DepthError;

/// Number of entries in a palette lookup table.
pub const LUT_SIZE: usize = 256;

/// Color value in RGBA format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub fn to_array(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

/// Linear color interpolation
pub fn interpolate_color(color1: Color, color2: Color, t: f32) -> Color {
    let t = t.clamp(0.0, 1.0);
    let t_inv = 1.0 - t;

    Color::new(
        ((color1.r as f32 * t_inv) + (color2.r as f32 * t)).round() as u8,
        ((color1.g as f32 * t_inv) + (color2.g as f32 * t)).round() as u8,
        ((color1.b as f32 * t_inv) + (color2.b as f32 * t)).round() as u8,
        ((color1.a as f32 * t_inv) + (color2.a as f32 * t)).round() as u8,
    )
}

/// Evenly spaced RGB stops; stop `i` of `n` sits at `i / (n - 1)`.
type Stops = &'static [[u8; 3]];

const MAGMA: Stops = &[
    [0, 0, 4], [8, 9, 34], [24, 15, 62], [46, 15, 94], [69, 16, 119],
    [91, 23, 128], [114, 31, 129], [137, 38, 131], [159, 47, 127], [183, 54, 121],
    [205, 64, 113], [225, 78, 101], [241, 96, 93], [250, 121, 95], [253, 149, 103],
    [255, 175, 119], [254, 201, 141], [250, 231, 166], [252, 253, 191],
];

const INFERNO: Stops = &[
    [0, 0, 4], [9, 7, 40], [27, 12, 66], [50, 12, 90], [75, 12, 107],
    [98, 19, 111], [120, 28, 109], [143, 35, 105], [165, 44, 96], [187, 55, 85],
    [207, 68, 70], [224, 85, 53], [237, 105, 37], [247, 128, 17], [251, 154, 6],
    [251, 181, 24], [247, 208, 60], [245, 237, 102], [252, 255, 164],
];

const PLASMA: Stops = &[
    [13, 8, 135], [43, 7, 147], [71, 3, 159], [94, 1, 166], [115, 1, 168],
    [136, 10, 165], [156, 23, 158], [173, 38, 147], [189, 55, 134], [203, 71, 121],
    [216, 87, 107], [227, 104, 95], [237, 121, 83], [245, 139, 71], [250, 158, 59],
    [253, 178, 48], [253, 201, 38], [250, 227, 31], [240, 249, 33],
];

const VIRIDIS: Stops = &[
    [68, 1, 84], [71, 21, 104], [72, 40, 120], [68, 58, 131], [62, 74, 137],
    [56, 89, 141], [49, 104, 142], [43, 117, 142], [38, 130, 142], [32, 144, 140],
    [31, 158, 137], [38, 171, 131], [53, 183, 121], [77, 195, 107], [109, 205, 89],
    [143, 214, 66], [180, 222, 44], [220, 227, 31], [253, 231, 37],
];

const CIVIDIS: Stops = &[
    [0, 32, 77], [0, 51, 111], [57, 72, 107], [87, 92, 109], [112, 113, 115],
    [138, 135, 121], [166, 157, 117], [196, 181, 108], [228, 207, 91], [255, 234, 70],
];

const GRAY: Stops = &[[0, 0, 0], [255, 255, 255]];

const COOLWARM: Stops = &[
    [59, 76, 192], [68, 90, 204], [77, 104, 215], [87, 117, 225], [98, 130, 234],
    [108, 142, 241], [119, 154, 247], [130, 165, 251], [141, 176, 254], [152, 185, 255],
    [163, 194, 255], [174, 201, 253], [184, 208, 249], [194, 213, 244], [204, 217, 238],
    [213, 219, 230], [221, 221, 221], [229, 216, 209], [236, 211, 197], [241, 204, 185],
    [245, 196, 173], [247, 187, 160], [247, 177, 148], [247, 166, 135], [244, 154, 123],
    [241, 141, 111], [236, 127, 99], [229, 112, 88], [222, 96, 77], [213, 80, 66],
    [203, 62, 56], [192, 40, 47], [180, 4, 38],
];

/// Base colour scales. Reversal is handled by [`Palette`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColorMap {
    Magma,
    Inferno,
    Plasma,
    Viridis,
    Cividis,
    Gray,
    Coolwarm,
}

impl ColorMap {
    pub const ALL: [ColorMap; 7] = [
        ColorMap::Magma,
        ColorMap::Inferno,
        ColorMap::Plasma,
        ColorMap::Viridis,
        ColorMap::Cividis,
        ColorMap::Gray,
        ColorMap::Coolwarm,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            ColorMap::Magma => "magma",
            ColorMap::Inferno => "inferno",
            ColorMap::Plasma => "plasma",
            ColorMap::Viridis => "viridis",
            ColorMap::Cividis => "cividis",
            ColorMap::Gray => "gray",
            ColorMap::Coolwarm => "coolwarm",
        }
    }

    fn from_name(name: &str) -> Option<Self> {
        if name == "grey" {
            return Some(ColorMap::Gray);
        }
        ColorMap::ALL.into_iter().find(|map| map.name() == name)
    }

    fn stops(&self) -> Stops {
        match self {
            ColorMap::Magma => MAGMA,
            ColorMap::Inferno => INFERNO,
            ColorMap::Plasma => PLASMA,
            ColorMap::Viridis => VIRIDIS,
            ColorMap::Cividis => CIVIDIS,
            ColorMap::Gray => GRAY,
            ColorMap::Coolwarm => COOLWARM,
        }
    }
}

/// A colour scale selected by name, optionally reversed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Palette {
    pub map: ColorMap,
    pub reversed: bool,
}

impl Default for Palette {
    fn default() -> Self {
        Self::new(ColorMap::Magma)
    }
}

impl Palette {
    pub fn new(map: ColorMap) -> Self {
        Self { map, reversed: false }
    }

    pub fn reversed(self) -> Self {
        Self {
            reversed: !self.reversed,
            ..self
        }
    }

    /// Colour at normalized position `t` (clamped to [0, 1]).
    pub fn sample(&self, t: f32) -> Color {
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
        let t = if self.reversed { 1.0 - t } else { t };
        lerp_stops(self.map.stops(), t)
    }

    /// 256-entry lookup table; entry `i` is the colour at `i / 255`.
    pub fn lut(&self) -> Vec<Color> {
        (0..LUT_SIZE)
            .map(|i| self.sample(i as f32 / (LUT_SIZE - 1) as f32))
            .collect()
    }
}

impl FromStr for Palette {
    type Err = DepthError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim().to_ascii_lowercase();
        let (base, reversed) = match name.strip_suffix("_r") {
            Some(base) => (base, true),
            None => (name.as_str(), false),
        };
        let map = ColorMap::from_name(base).ok_or_else(|| DepthError::UnknownPalette(s.to_string()))?;
        Ok(Self { map, reversed })
    }
}

impl fmt::Display for Palette {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.reversed {
            write!(f, "{}_r", self.map.name())
        } else {
            f.write_str(self.map.name())
        }
    }
}

fn lerp_stops(stops: Stops, t: f32) -> Color {
    // Every table has at least two stops.
    let last = stops.len() - 1;
    let x = t * last as f32;
    let i = (x.floor() as usize).min(last - 1);
    let at = |i: usize| Color::opaque(stops[i][0], stops[i][1], stops[i][2]);
    interpolate_color(at(i), at(i + 1), x - i as f32)
}
