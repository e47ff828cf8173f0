use crate::error::{ChartError, Result};
use crate::ir::{Scene, SceneElement, ShapeStyle};
use crate::normalize::DataTable;
use crate::scale::Scales;
use crate::style::{ChartType, ResolvedStyle};

use super::{axis, scale_mismatch};

/// A single polyline through the primary series in row order.
pub fn render(table: &DataTable, scales: &Scales, style: &ResolvedStyle) -> Result<Scene> {
    let Scales::Point { x, y } = scales else {
        return Err(scale_mismatch(ChartType::Line, scales));
    };

    let series = table.series().first().ok_or_else(|| {
        ChartError::MissingCategoricalData("line chart needs a value series".to_string())
    })?;

    let layout = &style.layout;
    let points = table
        .rows()
        .iter()
        .map(|row| {
            Ok((
                layout.margins.left + x.position(&row.category)?,
                layout.margins.top + y.map(row.primary()),
            ))
        })
        .collect::<Result<Vec<_>>>()?;

    let mut scene = Scene::new(layout.width, layout.height);
    scene.push(SceneElement::Path {
        series: series.clone(),
        points,
        style: ShapeStyle::stroked(style.line_color, style.line_width),
    });
    scene.push(axis::bottom_point(x, style)?);
    scene.push(axis::left_value(y, 10, style));
    Ok(scene)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compiler::test_support::{prepare, table};
    use crate::style::{ChartStyle, Margins};
    use plotters::style::RGBColor;

    fn path(scene: &Scene) -> (&[(f64, f64)], &ShapeStyle) {
        scene
            .elements
            .iter()
            .find_map(|e| match e {
                SceneElement::Path { points, style, .. } => Some((points.as_slice(), style)),
                _ => None,
            })
            .expect("scene has a path")
    }

    #[test]
    fn test_line_points_follow_scales() {
        let t = table(&["A", "B", "C"], &[("value", vec![1.0, 4.0, 2.0])]);
        let (scales, style) = prepare(ChartType::Line, &ChartStyle::default(), &t);
        let scene = render(&t, &scales, &style).unwrap();

        let (points, stroke) = path(&scene);
        assert_eq!(points, &[(0.0, 300.0), (200.0, 0.0), (400.0, 200.0)]);
        assert_eq!(stroke.fill, None);
        assert_eq!(stroke.stroke, Some(RGBColor(70, 130, 180)));
        assert_eq!(stroke.stroke_width, 2.0);
        assert_eq!(scene.axes().count(), 2);
        assert_eq!(scene.legend().count(), 0);
    }

    #[test]
    fn test_line_single_point() {
        let t = table(&["Only"], &[("value", vec![3.0])]);
        let style = ChartStyle::default().with_margins(Margins::new(10.0, 10.0, 10.0, 10.0));
        let (scales, resolved) = prepare(ChartType::Line, &style, &t);
        let scene = render(&t, &scales, &resolved).unwrap();

        let (points, _) = path(&scene);
        assert_eq!(points, &[(200.0, 10.0)]);
    }

    #[test]
    fn test_line_render_is_deterministic() {
        let t = table(&["A", "B"], &[("value", vec![2.0, 7.0])]);
        let (scales, style) = prepare(ChartType::Line, &ChartStyle::default(), &t);
        assert_eq!(render(&t, &scales, &style).unwrap(), render(&t, &scales, &style).unwrap());
    }
}
