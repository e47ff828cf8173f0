// Scene compilation: typed rows + scales -> primitive drawing commands

mod axis;
pub mod bar;
pub mod line;
pub mod marker;
pub mod pie;

use tracing::debug;

use crate::error::{ChartError, Result};
use crate::ir::Scene;
use crate::normalize::DataTable;
use crate::scale::Scales;
use crate::style::{ChartType, ResolvedStyle};

/// Run the renderer for `style.chart_type`.
///
/// An empty table compiles to an empty scene whatever the geometry.
pub fn compile_scene(table: &DataTable, scales: &Scales, style: &ResolvedStyle) -> Result<Scene> {
    let layout = &style.layout;
    if table.is_empty() {
        debug!(chart = %style.chart_type, "empty table, nothing to draw");
        return Ok(Scene::new(layout.width, layout.height));
    }

    let scene = match style.chart_type {
        ChartType::Pie => pie::render(table, scales, style)?,
        ChartType::Bar => bar::render(table, scales, style)?,
        ChartType::BarWithMarker => marker::render(table, scales, style)?,
        ChartType::Line => line::render(table, scales, style)?,
    };

    debug!(chart = %style.chart_type, elements = scene.len(), "compiled scene");
    Ok(scene)
}

fn scale_mismatch(chart: ChartType, scales: &Scales) -> ChartError {
    let kind = match scales {
        Scales::Pie(_) => "angular",
        Scales::Band { .. } => "band",
        Scales::Point { .. } => "point",
    };
    ChartError::ScaleMismatch {
        chart: chart.to_string(),
        scales: kind.to_string(),
    }
}
