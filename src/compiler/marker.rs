use crate::error::{ChartError, Result};
use crate::ir::{LegendEntry, Scene, SceneElement, ShapeStyle};
use crate::normalize::{DataTable, Row};
use crate::scale::Scales;
use crate::style::{ChartType, ResolvedStyle};

use super::{axis, bar, scale_mismatch};

const LEGEND_OFFSET: f64 = 120.0;
const LEGEND_SWATCH: f64 = 12.0;
const LEGEND_PITCH: f64 = 20.0;
const VALUE_TICKS: usize = 8;

/// Bars for the first series with a square marker per row for the second,
/// both ordered by category label. Adds a two-entry legend, marker first.
pub fn render(table: &DataTable, scales: &Scales, style: &ResolvedStyle) -> Result<Scene> {
    let Scales::Band { x, y } = scales else {
        return Err(scale_mismatch(ChartType::BarWithMarker, scales));
    };

    let [bar_series, marker_series, ..] = table.series() else {
        return Err(ChartError::MissingCategoricalData(format!(
            "bar with marker needs two value series, got {}",
            table.series().len()
        )));
    };

    let layout = &style.layout;
    let rows: Vec<&Row> = table.sorted_by_category();
    let mut scene = Scene::new(layout.width, layout.height);

    bar::push_bars(&mut scene, &rows, bar_series, 0, x, y, style, style.bar_color)?;

    let size = style.marker_size;
    for row in &rows {
        let value = row.secondary().unwrap_or(0.0);
        let cx = layout.margins.left + x.center(&row.category)?;
        let cy = layout.margins.top + y.map(value);
        scene.push(SceneElement::Rect {
            category: row.category.clone(),
            series: marker_series.clone(),
            x: cx - size / 2.0,
            y: cy - size / 2.0,
            width: size,
            height: size,
            style: ShapeStyle::filled(style.marker_color),
        });
    }

    scene.push(axis::bottom_band(x, style)?);
    scene.push(axis::left_value(y, VALUE_TICKS, style));

    // Marker entry on top, bar entry below it.
    let entries = [(marker_series, style.marker_color), (bar_series, style.bar_color)];
    for (i, (label, color)) in entries.into_iter().enumerate() {
        scene.push(SceneElement::Legend(LegendEntry {
            origin: (
                layout.width - LEGEND_OFFSET,
                layout.margins.top + i as f64 * LEGEND_PITCH,
            ),
            swatch_size: LEGEND_SWATCH,
            label: label.clone(),
            color,
            font_size: style.font_size,
        }));
    }

    Ok(scene)
}
