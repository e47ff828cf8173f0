use crate::error::Result;
use crate::ir::{Scene, SceneElement, ShapeStyle};
use crate::normalize::DataTable;
use crate::scale::Scales;
use crate::style::{ChartType, ResolvedStyle};

use super::scale_mismatch;

/// One slice per row, centred on the canvas, coloured by row index.
pub fn render(table: &DataTable, scales: &Scales, style: &ResolvedStyle) -> Result<Scene> {
    let Scales::Pie(partition) = scales else {
        return Err(scale_mismatch(ChartType::Pie, scales));
    };

    let layout = &style.layout;
    let center = (layout.width / 2.0, layout.height / 2.0);
    let radius = layout.width.min(layout.height) / 2.0;

    let mut scene = Scene::new(layout.width, layout.height);
    for (i, (row, &(start, end))) in table.rows().iter().zip(partition.arcs()).enumerate() {
        scene.push(SceneElement::Arc {
            category: row.category.clone(),
            center,
            inner_radius: 0.0,
            outer_radius: radius,
            start_angle: start,
            end_angle: end,
            style: ShapeStyle::filled(style.palette.color(i)),
        });
    }
    Ok(scene)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compiler::test_support::{prepare, table};
    use crate::palette::ColorPalette;
    use crate::style::ChartStyle;
    use std::f64::consts::TAU;

    fn arc_angles(scene: &Scene) -> Vec<(f64, f64)> {
        scene
            .arcs()
            .map(|e| match e {
                SceneElement::Arc { start_angle, end_angle, .. } => (*start_angle, *end_angle),
                _ => unreachable!(),
            })
            .collect()
    }

    #[test]
    fn test_pie_spans_proportional() {
        let t = table(&["A", "B", "C"], &[("value", vec![1.0, 2.0, 3.0])]);
        let (scales, style) = prepare(ChartType::Pie, &ChartStyle::default(), &t);
        let scene = render(&t, &scales, &style).unwrap();

        let angles = arc_angles(&scene);
        assert_eq!(angles.len(), 3);
        assert_eq!(angles[0].0, 0.0);
        assert!((angles[0].1 - TAU / 6.0).abs() < 1e-9);
        assert!((angles[1].1 - (TAU / 6.0 + 2.0 * TAU / 6.0)).abs() < 1e-9);
        assert!((angles[2].1 - TAU).abs() < 1e-9);

        let total: f64 = angles.iter().map(|(s, e)| e - s).sum();
        assert!((total - TAU).abs() < 1e-9);
    }

    #[test]
    fn test_pie_geometry_and_colors() {
        let t = table(&["A", "B"], &[("value", vec![1.0, 1.0])]);
        let style = ChartStyle::default().with_canvas(600.0, 400.0);
        let (scales, resolved) = prepare(ChartType::Pie, &style, &t);
        let scene = render(&t, &scales, &resolved).unwrap();
        let palette = ColorPalette::default();

        for (i, el) in scene.arcs().enumerate() {
            match el {
                SceneElement::Arc { center, inner_radius, outer_radius, style, .. } => {
                    assert_eq!(*center, (300.0, 200.0));
                    assert_eq!(*inner_radius, 0.0);
                    assert_eq!(*outer_radius, 200.0);
                    assert_eq!(style.fill, Some(palette.color(i)));
                }
                _ => unreachable!(),
            }
        }
        assert_eq!(scene.axes().count(), 0);
        assert_eq!(scene.legend().count(), 0);
    }

    #[test]
    fn test_pie_single_row_is_full_circle() {
        let t = table(&["Only"], &[("value", vec![4.0])]);
        let (scales, style) = prepare(ChartType::Pie, &ChartStyle::default(), &t);
        let scene = render(&t, &scales, &style).unwrap();
        assert_eq!(arc_angles(&scene), vec![(0.0, TAU)]);
    }

    #[test]
    fn test_pie_equal_values_equal_shares() {
        let t = table(&["A", "B", "C", "D"], &[("value", vec![2.0, 2.0, 2.0, 2.0])]);
        let (scales, style) = prepare(ChartType::Pie, &ChartStyle::default(), &t);
        let scene = render(&t, &scales, &style).unwrap();
        for (s, e) in arc_angles(&scene) {
            assert!((e - s - TAU / 4.0).abs() < 1e-12);
        }
    }
}
