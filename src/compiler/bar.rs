use plotters::style::RGBColor;

use crate::error::{ChartError, Result};
use crate::ir::{Scene, SceneElement, ShapeStyle};
use crate::normalize::{DataTable, Row};
use crate::scale::{BandScale, LinearScale, Scales};
use crate::style::{ChartType, ResolvedStyle};

use super::{axis, scale_mismatch};

/// One bar per row for the primary series, in row order, plus bottom and left axes.
pub fn render(table: &DataTable, scales: &Scales, style: &ResolvedStyle) -> Result<Scene> {
    let Scales::Band { x, y } = scales else {
        return Err(scale_mismatch(ChartType::Bar, scales));
    };

    let series = table.series().first().ok_or_else(|| {
        ChartError::MissingCategoricalData("bar chart needs a value series".to_string())
    })?;

    let layout = &style.layout;
    let rows: Vec<&Row> = table.rows().iter().collect();
    let mut scene = Scene::new(layout.width, layout.height);

    push_bars(&mut scene, &rows, series, 0, x, y, style, style.bar_color)?;
    scene.push(axis::bottom_band(x, style)?);
    scene.push(axis::left_value(y, 10, style));
    Ok(scene)
}

/// Emit one Rect per row for series `series_idx`, anchored at the band slot and
/// rising from the baseline. Negative values give zero-height bars.
#[allow(clippy::too_many_arguments)]
pub(super) fn push_bars(
    scene: &mut Scene,
    rows: &[&Row],
    series: &str,
    series_idx: usize,
    x: &BandScale,
    y: &LinearScale,
    style: &ResolvedStyle,
    color: RGBColor,
) -> Result<()> {
    let layout = &style.layout;
    let plot_h = layout.plot_height();

    for row in rows {
        let value = row.measure_at(series_idx);
        let top = y.map(value).min(plot_h);
        scene.push(SceneElement::Rect {
            category: row.category.clone(),
            series: series.to_string(),
            x: layout.margins.left + x.position(&row.category)?,
            y: layout.margins.top + top,
            width: x.bandwidth(),
            height: plot_h - top,
            style: ShapeStyle::filled(color),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compiler::test_support::{prepare, table};
    use crate::ir::AxisOrient;
    use crate::style::{ChartStyle, Margins};

    fn bars(scene: &Scene) -> Vec<(f64, f64, f64, f64)> {
        scene
            .rects_for("value")
            .map(|e| match e {
                SceneElement::Rect { x, y, width, height, .. } => (*x, *y, *width, *height),
                _ => unreachable!(),
            })
            .collect()
    }

    #[test]
    fn test_bar_heights_follow_linear_scale() {
        let t = table(&["A", "B", "C"], &[("value", vec![1.0, 4.0, 2.0])]);
        let (scales, style) = prepare(ChartType::Bar, &ChartStyle::default(), &t);
        let scene = render(&t, &scales, &style).unwrap();
        let Scales::Band { y, .. } = &scales else { panic!("Expected band scales") };

        assert_eq!(y.map(0.0), 400.0);
        for ((_, top, _, height), value) in bars(&scene).into_iter().zip([1.0, 4.0, 2.0]) {
            assert_eq!(height, 400.0 - y.map(value));
            assert_eq!(top, y.map(value));
        }
        // tallest bar reaches the top of the plot area
        assert_eq!(bars(&scene)[1].3, 400.0);
    }

    #[test]
    fn test_bar_positions_increase_in_row_order() {
        let t = table(&["C", "A", "B"], &[("value", vec![1.0, 2.0, 3.0])]);
        let (scales, style) = prepare(ChartType::Bar, &ChartStyle::default(), &t);
        let scene = render(&t, &scales, &style).unwrap();

        let xs: Vec<f64> = bars(&scene).iter().map(|b| b.0).collect();
        assert!(xs.windows(2).all(|w| w[1] > w[0]));
        let cats: Vec<&str> = scene
            .rects_for("value")
            .map(|e| match e {
                SceneElement::Rect { category, .. } => category.as_str(),
                _ => unreachable!(),
            })
            .collect();
        assert_eq!(cats, vec!["C", "A", "B"]);
    }

    #[test]
    fn test_bar_fill_and_axes() {
        let t = table(&["A", "B"], &[("value", vec![1.0, 2.0])]);
        let (scales, style) = prepare(ChartType::Bar, &ChartStyle::default(), &t);
        let scene = render(&t, &scales, &style).unwrap();

        for el in scene.rects_for("value") {
            if let SceneElement::Rect { style: s, .. } = el {
                assert_eq!(s.fill, Some(RGBColor(70, 130, 180)));
            }
        }

        let axes: Vec<_> = scene.axes().collect();
        assert_eq!(axes.len(), 2);
        assert_eq!(axes[0].orient, AxisOrient::Bottom);
        assert_eq!(axes[0].ticks.iter().map(|t| t.label.as_str()).collect::<Vec<_>>(), vec!["A", "B"]);
        assert_eq!(axes[1].orient, AxisOrient::Left);
        assert_eq!(axes[1].ticks.first().unwrap().position, 400.0);
        assert_eq!(scene.legend().count(), 0);
    }

    #[test]
    fn test_bar_respects_margins() {
        let t = table(&["A"], &[("value", vec![2.0])]);
        let style = ChartStyle::default()
            .with_canvas(600.0, 400.0)
            .with_margins(Margins::new(30.0, 50.0, 50.0, 50.0));
        let (scales, resolved) = prepare(ChartType::Bar, &style, &t);
        let scene = render(&t, &scales, &resolved).unwrap();

        let (x, top, width, height) = bars(&scene)[0];
        assert!(x >= 50.0 && x + width <= 550.0);
        assert_eq!(top, 30.0);
        assert_eq!(height, 320.0);
    }

    #[test]
    fn test_bar_negative_value_is_flat() {
        let t = table(&["A", "B"], &[("value", vec![-3.0, 2.0])]);
        let (scales, style) = prepare(ChartType::Bar, &ChartStyle::default(), &t);
        let scene = render(&t, &scales, &style).unwrap();
        let (_, top, _, height) = bars(&scene)[0];
        assert_eq!(height, 0.0);
        assert_eq!(top, 400.0);
    }

    #[test]
    fn test_bar_all_zero_values() {
        let t = table(&["A", "B"], &[("value", vec![0.0, 0.0])]);
        let (scales, style) = prepare(ChartType::Bar, &ChartStyle::default(), &t);
        let scene = render(&t, &scales, &style).unwrap();
        assert!(bars(&scene).iter().all(|b| b.3 == 0.0 && b.1.is_finite()));
    }
}
