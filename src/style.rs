//! Style bundle resolution
//!
//! [`ChartStyle`] is what the host hands over (deserialized from JSON, all
//! fields optional). [`ResolvedStyle`] is the validated, fully concrete form the
//! renderers consume: colours parsed, padding chosen, canvas checked.

use std::fmt;
use std::str::FromStr;

use plotters::style::RGBColor;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{ChartError, Result};
use crate::palette::{parse_color, ColorPalette, CATEGORY10};

/// The closed set of chart geometries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChartType {
    Pie,
    Bar,
    BarWithMarker,
    Line,
}

impl ChartType {
    pub const ALL: [ChartType; 4] = [
        ChartType::Pie,
        ChartType::Bar,
        ChartType::BarWithMarker,
        ChartType::Line,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            ChartType::Pie => "Pie",
            ChartType::Bar => "Bar",
            ChartType::BarWithMarker => "BarWithMarker",
            ChartType::Line => "Line",
        }
    }

    /// Band padding used when the style leaves `barPadding` unset.
    pub fn default_band_padding(&self) -> f64 {
        match self {
            ChartType::BarWithMarker => 0.2,
            _ => 0.1,
        }
    }
}

impl fmt::Display for ChartType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ChartType {
    type Err = ChartError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "pie" => Ok(ChartType::Pie),
            "bar" => Ok(ChartType::Bar),
            "barwithmarker" | "bar-with-marker" | "bar_with_marker" => Ok(ChartType::BarWithMarker),
            "line" => Ok(ChartType::Line),
            _ => Err(ChartError::UnknownChartType(s.to_string())),
        }
    }
}

/// Plot-area margins in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Margins {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

impl Margins {
    pub const fn new(top: f64, right: f64, bottom: f64, left: f64) -> Self {
        Self { top, right, bottom, left }
    }
}

/// Upper bound of the value axis: derived from the data, or fixed by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum ValueAxisBound {
    #[default]
    Auto,
    Fixed(f64),
}

impl Serialize for ValueAxisBound {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            ValueAxisBound::Auto => serializer.serialize_str("auto"),
            ValueAxisBound::Fixed(v) => serializer.serialize_f64(*v),
        }
    }
}

impl<'de> Deserialize<'de> for ValueAxisBound {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Number(f64),
            Text(String),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Number(v) => Ok(ValueAxisBound::Fixed(v)),
            Raw::Text(s) if s.eq_ignore_ascii_case("auto") => Ok(ValueAxisBound::Auto),
            Raw::Text(s) => Err(serde::de::Error::custom(format!(
                "valueAxisUpperBound must be a number or \"auto\", got \"{}\"",
                s
            ))),
        }
    }
}

/// Style and layout options supplied with a render call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartStyle {
    #[serde(default)]
    pub chart_type: Option<String>,
    #[serde(default = "default_canvas_size")]
    pub canvas_width: f64,
    #[serde(default = "default_canvas_size")]
    pub canvas_height: f64,
    #[serde(default)]
    pub margins: Margins,
    #[serde(default = "default_palette")]
    pub palette: Vec<String>,
    #[serde(default)]
    pub bar_padding: Option<f64>,
    #[serde(default)]
    pub value_axis_upper_bound: ValueAxisBound,
    #[serde(default)]
    pub nice: bool,
    #[serde(default)]
    pub bar_color: Option<String>,
    #[serde(default = "default_marker_color")]
    pub marker_color: String,
    #[serde(default = "default_marker_size")]
    pub marker_size: f64,
    #[serde(default = "default_line_color")]
    pub line_color: String,
    #[serde(default = "default_line_width")]
    pub line_width: f64,
    #[serde(default = "default_font_size")]
    pub font_size: f64,
}

fn default_canvas_size() -> f64 { 400.0 }
fn default_palette() -> Vec<String> { CATEGORY10.iter().map(|c| c.to_string()).collect() }
fn default_marker_color() -> String { "#ff7f0e".to_string() }
fn default_marker_size() -> f64 { 10.0 }
fn default_line_color() -> String { "steelblue".to_string() }
fn default_line_width() -> f64 { 2.0 }
fn default_font_size() -> f64 { 12.0 }

/// Largest accepted canvas width or height, in pixels.
pub const MAX_CANVAS_SIDE: f64 = 16384.0;

const BAR_COLOR: &str = "steelblue";
const MARKER_BAR_COLOR: &str = "#a2b8e9";

impl Default for ChartStyle {
    fn default() -> Self {
        Self {
            chart_type: None,
            canvas_width: default_canvas_size(),
            canvas_height: default_canvas_size(),
            margins: Margins::default(),
            palette: default_palette(),
            bar_padding: None,
            value_axis_upper_bound: ValueAxisBound::Auto,
            nice: false,
            bar_color: None,
            marker_color: default_marker_color(),
            marker_size: default_marker_size(),
            line_color: default_line_color(),
            line_width: default_line_width(),
            font_size: default_font_size(),
        }
    }
}

impl ChartStyle {
    pub fn with_canvas(mut self, width: f64, height: f64) -> Self {
        self.canvas_width = width;
        self.canvas_height = height;
        self
    }

    pub fn with_margins(mut self, margins: Margins) -> Self {
        self.margins = margins;
        self
    }

    pub fn with_upper_bound(mut self, bound: ValueAxisBound) -> Self {
        self.value_axis_upper_bound = bound;
        self
    }

    /// Validate the bundle and resolve it for one chart geometry.
    pub fn resolve(&self, chart_type: ChartType) -> Result<ResolvedStyle> {
        let (w, h) = (self.canvas_width, self.canvas_height);
        if !(w.is_finite() && h.is_finite() && w > 0.0 && h > 0.0) {
            return Err(ChartError::InvalidStyle(format!(
                "canvas must have a positive size, got {}x{}",
                w, h
            )));
        }
        if w > MAX_CANVAS_SIDE || h > MAX_CANVAS_SIDE {
            return Err(ChartError::InvalidStyle(format!(
                "canvas {}x{} exceeds the {} px limit per side",
                w, h, MAX_CANVAS_SIDE
            )));
        }

        let m = self.margins;
        let margins_ok = [m.top, m.right, m.bottom, m.left]
            .iter()
            .all(|v| v.is_finite() && *v >= 0.0);
        if !margins_ok || m.left + m.right >= w || m.top + m.bottom >= h {
            return Err(ChartError::InvalidStyle(format!(
                "margins {:?} leave no plot area on a {}x{} canvas",
                m, w, h
            )));
        }

        let band_padding = self.bar_padding.unwrap_or_else(|| chart_type.default_band_padding());
        if !(0.0..1.0).contains(&band_padding) {
            return Err(ChartError::InvalidStyle(format!(
                "barPadding must be in [0, 1), got {}",
                band_padding
            )));
        }

        if let ValueAxisBound::Fixed(v) = self.value_axis_upper_bound {
            if !(v.is_finite() && v > 0.0) {
                return Err(ChartError::InvalidStyle(format!(
                    "valueAxisUpperBound must be positive, got {}",
                    v
                )));
            }
        }

        if !(self.marker_size.is_finite() && self.marker_size >= 0.0)
            || !(self.line_width.is_finite() && self.line_width >= 0.0)
            || !(self.font_size.is_finite() && self.font_size > 0.0)
        {
            return Err(ChartError::InvalidStyle(
                "markerSize, lineWidth and fontSize must be non-negative numbers".to_string(),
            ));
        }

        let palette = ColorPalette::from_names(&self.palette).ok_or_else(|| {
            ChartError::InvalidStyle(format!("palette {:?} is empty or has unknown colours", self.palette))
        })?;

        let default_bar = match chart_type {
            ChartType::BarWithMarker => MARKER_BAR_COLOR,
            _ => BAR_COLOR,
        };
        let bar_color = color(self.bar_color.as_deref().unwrap_or(default_bar), "barColor")?;

        Ok(ResolvedStyle {
            chart_type,
            layout: Layout { width: w, height: h, margins: m },
            palette,
            band_padding,
            upper_bound: self.value_axis_upper_bound,
            nice: self.nice,
            bar_color,
            marker_color: color(&self.marker_color, "markerColor")?,
            marker_size: self.marker_size,
            line_color: color(&self.line_color, "lineColor")?,
            line_width: self.line_width,
            font_size: self.font_size,
        })
    }
}

fn color(value: &str, field: &str) -> Result<RGBColor> {
    parse_color(value)
        .ok_or_else(|| ChartError::InvalidStyle(format!("{} '{}' is not a colour", field, value)))
}

/// Canvas size plus margins. Scales work inside the plot area.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Layout {
    pub width: f64,
    pub height: f64,
    pub margins: Margins,
}

impl Layout {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height, margins: Margins::default() }
    }

    pub fn plot_width(&self) -> f64 {
        self.width - self.margins.left - self.margins.right
    }

    pub fn plot_height(&self) -> f64 {
        self.height - self.margins.top - self.margins.bottom
    }
}

/// Fully validated style for one render cycle.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedStyle {
    pub chart_type: ChartType,
    pub layout: Layout,
    pub palette: ColorPalette,
    pub band_padding: f64,
    pub upper_bound: ValueAxisBound,
    pub nice: bool,
    pub bar_color: RGBColor,
    pub marker_color: RGBColor,
    pub marker_size: f64,
    pub line_color: RGBColor,
    pub line_width: f64,
    pub font_size: f64,
}
