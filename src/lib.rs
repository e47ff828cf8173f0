// Library exports for tabchart

pub mod coerce;
pub mod csv_reader;
pub mod data;
pub mod error;
pub mod graph;
pub mod normalize;
pub mod palette;
pub mod runtime;
pub mod style;

// Pipeline stages
pub mod ir;
pub mod scale;
pub mod compiler;

use serde::Deserialize;

pub use data::CategoricalPayload;
pub use error::{ChartError, Result};
pub use graph::Canvas;
pub use runtime::{render, render_chart, RenderReport, SceneTarget, Surface};
pub use style::{ChartStyle, ChartType};

/// Encoding of the rendered canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default, clap::ValueEnum)]
pub enum OutputFormat {
    #[serde(rename = "png")]
    #[default]
    Png,
    #[serde(rename = "svg")]
    Svg,
}
