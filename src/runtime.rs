// Render dispatcher: payload + selector + style -> scene on a surface

use tracing::{debug, info_span, warn};

use crate::compiler;
use crate::data::CategoricalPayload;
use crate::error::{ChartError, Result};
use crate::ir::Scene;
use crate::normalize::normalize;
use crate::scale::{build_scales, ScaleOptions};
use crate::style::{ChartStyle, ChartType};

/// Something a compiled scene can be drawn onto.
pub trait Surface {
    /// Drop whatever the previous cycle drew.
    fn clear(&mut self);

    /// Take ownership of a freshly compiled scene.
    fn attach(&mut self, scene: Scene) -> Result<()>;
}

/// In-memory surface that just holds on to the last scene.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SceneTarget {
    scene: Option<Scene>,
}

impl SceneTarget {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn scene(&self) -> Option<&Scene> {
        self.scene.as_ref()
    }

    pub fn is_empty(&self) -> bool {
        self.scene.as_ref().map_or(true, Scene::is_empty)
    }
}

impl Surface for SceneTarget {
    fn clear(&mut self) {
        self.scene = None;
    }

    fn attach(&mut self, scene: Scene) -> Result<()> {
        self.scene = Some(scene);
        Ok(())
    }
}

/// Summary of one render cycle.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderReport {
    pub chart_type: ChartType,
    /// Rows that made it into the table.
    pub rows: usize,
    /// Rows dropped because a value was not numeric.
    pub rejected: usize,
    /// Primitives attached to the surface.
    pub elements: usize,
    /// Set when the payload had nothing drawable and the surface was left cleared.
    pub skipped: Option<ChartError>,
}

/// Render `payload` as the chart named by `selector`.
///
/// An unknown selector fails before anything is drawn.
pub fn render<S: Surface + ?Sized>(
    target: &mut S,
    payload: &CategoricalPayload,
    selector: &str,
    style: &ChartStyle,
) -> Result<RenderReport> {
    target.clear();
    let chart_type: ChartType = selector.parse()?;
    render_cycle(target, payload, chart_type, style)
}

/// Render `payload` as a known chart type.
pub fn render_chart<S: Surface + ?Sized>(
    target: &mut S,
    payload: &CategoricalPayload,
    chart_type: ChartType,
    style: &ChartStyle,
) -> Result<RenderReport> {
    target.clear();
    render_cycle(target, payload, chart_type, style)
}

fn render_cycle<S: Surface + ?Sized>(
    target: &mut S,
    payload: &CategoricalPayload,
    chart_type: ChartType,
    style: &ChartStyle,
) -> Result<RenderReport> {
    let span = info_span!("render", chart = %chart_type, rows = tracing::field::Empty);
    let _enter = span.enter();

    let resolved = style.resolve(chart_type)?;

    let normalized = match normalize(payload) {
        Ok(n) => n,
        Err(err @ ChartError::MissingCategoricalData(_)) => return Ok(skip(chart_type, 0, 0, err)),
        Err(err) => return Err(err),
    };
    let table = normalized.table;
    let rejected = normalized.rejected.len();
    span.record("rows", table.len());

    for diagnostic in &normalized.rejected {
        warn!(%diagnostic, "dropped row");
    }

    let options = ScaleOptions {
        band_padding: resolved.band_padding,
        upper_bound: resolved.upper_bound,
        nice: resolved.nice,
    };
    let scales = build_scales(&table, chart_type, &resolved.layout, &options)?;

    let scene = match compiler::compile_scene(&table, &scales, &resolved) {
        Ok(scene) => scene,
        Err(err @ ChartError::MissingCategoricalData(_)) => {
            return Ok(skip(chart_type, table.len(), rejected, err))
        }
        Err(err) => return Err(err),
    };

    let elements = scene.len();
    target.attach(scene)?;
    debug!(elements, "scene attached");

    Ok(RenderReport {
        chart_type,
        rows: table.len(),
        rejected,
        elements,
        skipped: None,
    })
}

fn skip(chart_type: ChartType, rows: usize, rejected: usize, reason: ChartError) -> RenderReport {
    warn!(%reason, "nothing to draw");
    RenderReport {
        chart_type,
        rows,
        rejected,
        elements: 0,
        skipped: Some(reason),
    }
}
