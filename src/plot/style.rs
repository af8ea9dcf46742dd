//! Fixed chart geometry and palette.

use plotters::style::RGBColor;

/// 10x6 inch figure at 300 DPI.
pub(crate) const FIG_WIDTH: u32 = 3000;
pub(crate) const FIG_HEIGHT: u32 = 1800;

pub(crate) const LINE_WIDTH: u32 = 6;
pub(crate) const ENVELOPE_ALPHA: f64 = 0.2;

pub(crate) const AXIS_FONT: (&str, i32) = ("sans-serif", 44);
pub(crate) const LABEL_FONT: (&str, i32) = ("sans-serif", 36);

/// Qualitative colorblind-safe pair from colorbrewer2.org.
const PALETTE: [RGBColor; 2] = [RGBColor(0x75, 0x70, 0xb3), RGBColor(0xd9, 0x5f, 0x02)];

/// Color for the i-th location, cycling past the palette's end.
pub(crate) fn palette(index: usize) -> RGBColor {
    PALETTE[index % PALETTE.len()]
}
