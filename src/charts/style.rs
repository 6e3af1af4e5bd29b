//! Chart Style Module
//! Explicit style configuration shared by every figure a plotter builds.
//!
//! Sizes are stored in points (1/72 inch) and converted to pixels with the
//! configured resolution at render time.

use serde::{Deserialize, Serialize};

/// Base font size for presentation slides.
pub const PRESENTATION_FONT_SIZE: f64 = 11.0;
/// Base font size for documents.
pub const NORMAL_FONT_SIZE: f64 = 9.0;
/// Default output resolution in dots per inch.
pub const DEFAULT_RESOLUTION: u32 = 400;
/// Points per inch.
pub const POINTS_PER_INCH: f64 = 72.0;
/// Width of the axes frame in points.
pub const AXES_LINE_WIDTH: f64 = 0.8;

/// 8-bit RGB colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const BLACK: Rgb = Rgb(0, 0, 0);
    pub const WHITE: Rgb = Rgb(255, 255, 255);
    pub const BLUE: Rgb = Rgb(0, 0, 255);
    pub const RED: Rgb = Rgb(255, 0, 0);
    pub const GREEN: Rgb = Rgb(0, 128, 0);
    pub const LIGHT_SALMON: Rgb = Rgb(255, 160, 122);
}

/// How a curve's stroke is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Stroke {
    Solid,
    /// Round dots, `gap` curve widths apart along the path.
    Dotted { gap: f64 },
}

/// Line appearance of a single curve.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurveStyle {
    pub color: Rgb,
    /// Line width, or dot diameter for dotted strokes, in points.
    pub width: f64,
    pub stroke: Stroke,
    /// Contour drawn around dots.
    pub outline: Option<Rgb>,
    /// Higher values are drawn on top.
    pub z_order: i32,
}

impl CurveStyle {
    pub fn solid(color: Rgb, width: f64) -> Self {
        Self {
            color,
            width,
            stroke: Stroke::Solid,
            outline: None,
            z_order: 0,
        }
    }

    /// Preset for numerical solutions: thick salmon dots with a black contour.
    pub fn numerical() -> Self {
        Self {
            color: Rgb::LIGHT_SALMON,
            width: 7.0,
            stroke: Stroke::Dotted { gap: 2.0 },
            outline: Some(Rgb::BLACK),
            z_order: 2,
        }
    }

    /// Preset for exact solutions: thin solid black line.
    pub fn exact() -> Self {
        Self {
            z_order: 1,
            ..Self::solid(Rgb::BLACK, 1.0)
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TickDirection {
    In,
    Out,
}

/// Tick mark geometry, in points.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TickStyle {
    pub direction: TickDirection,
    pub major_size: f64,
    pub minor_size: f64,
    pub major_width: f64,
    pub minor_visible: bool,
}

impl Default for TickStyle {
    fn default() -> Self {
        Self {
            direction: TickDirection::In,
            major_size: 3.9,
            minor_size: 2.4,
            // Thin enough to stay hidden under the frame at the axis limits.
            major_width: AXES_LINE_WIDTH * 0.95,
            minor_visible: true,
        }
    }
}

/// Legend box appearance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LegendStyle {
    pub face_color: Rgb,
    /// Alpha of the face only; the edge stays opaque.
    pub face_alpha: f64,
    pub edge_color: Rgb,
    /// Edge width in points.
    pub edge_width: f64,
    /// Padding between legend and axes, in font-size units.
    pub border_pad: f64,
}

impl Default for LegendStyle {
    fn default() -> Self {
        Self {
            face_color: Rgb::WHITE,
            face_alpha: 0.6,
            edge_color: Rgb::BLACK,
            edge_width: 0.8,
            border_pad: 0.8,
        }
    }
}

/// Spacing used by the constrained layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutPads {
    /// Horizontal gap between panels, as a fraction of the panel width.
    pub wspace: f64,
    /// Vertical gap between panels, as a fraction of the panel height.
    pub hspace: f64,
    /// Padding around each panel, in inches.
    pub w_pad: f64,
    pub h_pad: f64,
}

impl Default for LayoutPads {
    fn default() -> Self {
        Self {
            wspace: 0.02,
            hspace: 0.0,
            w_pad: 0.0,
            h_pad: 0.0,
        }
    }
}

/// Style shared by all charts built from it.
///
/// Build one with [`StyleConfig::setup`] and hand it to a
/// [`ChartPlotter`](crate::charts::ChartPlotter); every figure keeps its own copy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StyleConfig {
    pub presentation: bool,
    pub constrained_layout: bool,
    /// Render axis descriptions in an italic math-style face.
    pub typeset_text: bool,
    /// Dots per inch.
    pub resolution: u32,
    /// Base font size in points.
    pub font_size: f64,
    pub text_color: Rgb,
    pub ticks: TickStyle,
    pub legend: LegendStyle,
    pub layout: LayoutPads,
    pub numerical: CurveStyle,
    pub exact: CurveStyle,
    pub numerical_label: String,
    pub exact_label: String,
}

impl Default for StyleConfig {
    fn default() -> Self {
        Self {
            presentation: false,
            constrained_layout: true,
            typeset_text: true,
            resolution: DEFAULT_RESOLUTION,
            font_size: NORMAL_FONT_SIZE,
            text_color: Rgb::BLACK,
            ticks: TickStyle::default(),
            legend: LegendStyle::default(),
            layout: LayoutPads::default(),
            numerical: CurveStyle::numerical(),
            exact: CurveStyle::exact(),
            numerical_label: "Numerical".to_string(),
            exact_label: "Exact".to_string(),
        }
    }
}

impl StyleConfig {
    /// Reset to defaults, then apply the given flags.
    ///
    /// Each call yields a complete configuration; nothing from an earlier
    /// call carries over.
    pub fn setup(
        presentation: bool,
        constrained_layout: bool,
        typeset_text: bool,
        resolution: u32,
    ) -> Self {
        let font_size = if presentation {
            PRESENTATION_FONT_SIZE
        } else {
            NORMAL_FONT_SIZE
        };

        Self {
            presentation,
            constrained_layout,
            typeset_text,
            resolution: resolution.max(1),
            font_size,
            ..Self::default()
        }
    }

    /// Presentation preset at the default resolution.
    pub fn presentation() -> Self {
        Self::setup(true, true, true, DEFAULT_RESOLUTION)
    }

    /// Convert a length in points to pixels at the configured resolution.
    pub fn points_to_px(&self, points: f64) -> f64 {
        points * self.resolution as f64 / POINTS_PER_INCH
    }

    /// Convert a length in inches to pixels at the configured resolution.
    pub fn inches_to_px(&self, inches: f64) -> f64 {
        inches * self.resolution as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn setup_picks_font_size_from_presentation_flag() {
        assert_eq!(StyleConfig::setup(true, true, true, 100).font_size, 11.0);
        assert_eq!(StyleConfig::setup(false, true, true, 100).font_size, 9.0);
    }

    #[test]
    fn setup_starts_from_defaults() {
        let mut tweaked = StyleConfig::setup(true, false, false, 72);
        tweaked.ticks.major_size = 10.0;

        // A fresh setup never inherits earlier edits.
        let fresh = StyleConfig::setup(true, false, false, 72);
        assert_eq!(fresh.ticks, TickStyle::default());
        assert_ne!(fresh, tweaked);
    }

    #[test]
    fn resolution_is_at_least_one() {
        assert_eq!(StyleConfig::setup(false, true, true, 0).resolution, 1);
    }

    #[test]
    fn point_conversion_uses_resolution() {
        let style = StyleConfig::setup(false, true, true, 144);
        assert_eq!(style.points_to_px(9.0), 18.0);
        assert_eq!(style.inches_to_px(2.0), 288.0);
    }
}
