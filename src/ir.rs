use plotters::style::RGBColor;

// =============================================================================
// Scene graph
// =============================================================================

/// Fill and stroke of a primitive. `None` means "not painted".
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShapeStyle {
    pub fill: Option<RGBColor>,
    pub stroke: Option<RGBColor>,
    pub stroke_width: f64,
}

impl ShapeStyle {
    pub fn filled(color: RGBColor) -> Self {
        Self { fill: Some(color), stroke: None, stroke_width: 0.0 }
    }

    pub fn stroked(color: RGBColor, width: f64) -> Self {
        Self { fill: None, stroke: Some(color), stroke_width: width }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AxisOrient {
    Bottom,
    Left,
}

/// One tick: its pixel position along the axis and its label.
#[derive(Debug, Clone, PartialEq)]
pub struct Tick {
    pub position: f64,
    pub label: String,
}

/// An axis drawn as a domain line plus labelled ticks.
///
/// `origin` is the start of the domain line in canvas pixels. Tick positions
/// are absolute: x for a bottom axis, y for a left axis.
#[derive(Debug, Clone, PartialEq)]
pub struct AxisTicks {
    pub orient: AxisOrient,
    pub origin: (f64, f64),
    pub length: f64,
    pub tick_size: f64,
    pub ticks: Vec<Tick>,
    pub font_size: f64,
    pub color: RGBColor,
}

/// A coloured swatch with a label, anchored at its top-left corner.
#[derive(Debug, Clone, PartialEq)]
pub struct LegendEntry {
    pub origin: (f64, f64),
    pub swatch_size: f64,
    pub label: String,
    pub color: RGBColor,
    pub font_size: f64,
}

/// A drawable primitive. Coordinates are canvas pixels, origin top-left.
#[derive(Debug, Clone, PartialEq)]
pub enum SceneElement {
    /// Pie slice. Angles in radians from 12 o'clock, clockwise.
    Arc {
        category: String,
        center: (f64, f64),
        inner_radius: f64,
        outer_radius: f64,
        start_angle: f64,
        end_angle: f64,
        style: ShapeStyle,
    },
    Rect {
        category: String,
        series: String,
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        style: ShapeStyle,
    },
    Path {
        series: String,
        points: Vec<(f64, f64)>,
        style: ShapeStyle,
    },
    Axis(AxisTicks),
    Legend(LegendEntry),
}

/// Ordered primitives plus the canvas size they were laid out for.
#[derive(Debug, Clone, PartialEq)]
pub struct Scene {
    pub width: f64,
    pub height: f64,
    pub elements: Vec<SceneElement>,
}

impl Scene {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height, elements: Vec::new() }
    }

    pub fn push(&mut self, element: SceneElement) {
        self.elements.push(element);
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Rects belonging to `series`, in emission order.
    pub fn rects_for<'a>(&'a self, series: &'a str) -> impl Iterator<Item = &'a SceneElement> + 'a {
        self.elements
            .iter()
            .filter(move |e| matches!(e, SceneElement::Rect { series: s, .. } if s == series))
    }

    pub fn arcs(&self) -> impl Iterator<Item = &SceneElement> {
        self.elements.iter().filter(|e| matches!(e, SceneElement::Arc { .. }))
    }

    pub fn axes(&self) -> impl Iterator<Item = &AxisTicks> {
        self.elements.iter().filter_map(|e| match e {
            SceneElement::Axis(axis) => Some(axis),
            _ => None,
        })
    }

    pub fn legend(&self) -> impl Iterator<Item = &LegendEntry> {
        self.elements.iter().filter_map(|e| match e {
            SceneElement::Legend(entry) => Some(entry),
            _ => None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scene_queries() {
        let mut scene = Scene::new(100.0, 100.0);
        assert!(scene.is_empty());

        scene.push(SceneElement::Rect {
            category: "A".to_string(),
            series: "value".to_string(),
            x: 0.0,
            y: 10.0,
            width: 5.0,
            height: 90.0,
            style: ShapeStyle::filled(RGBColor(0, 0, 0)),
        });
        scene.push(SceneElement::Legend(LegendEntry {
            origin: (80.0, 0.0),
            swatch_size: 12.0,
            label: "value".to_string(),
            color: RGBColor(0, 0, 0),
            font_size: 12.0,
        }));

        assert_eq!(scene.len(), 2);
        assert_eq!(scene.rects_for("value").count(), 1);
        assert_eq!(scene.rects_for("average").count(), 0);
        assert_eq!(scene.legend().count(), 1);
        assert_eq!(scene.axes().count(), 0);
        assert_eq!(scene.arcs().count(), 0);
    }
}
