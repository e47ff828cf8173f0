use std::f64::consts::TAU;

use image::ImageEncoder;
use plotters::backend::DrawingBackend;
use plotters::coord::Shift;
use plotters::prelude::{
    BitMapBackend, Color, DrawingArea, IntoDrawingArea, IntoFont, PathElement,
    Polygon, Rectangle, SVGBackend, Text, BLACK, WHITE,
};
use plotters::style::text_anchor::{HPos, Pos, VPos};
use tracing::{debug, warn};

use crate::error::{ChartError, Result};
use crate::ir::{AxisOrient, AxisTicks, LegendEntry, Scene, SceneElement, ShapeStyle};
use crate::runtime::Surface;
use crate::OutputFormat;

const DEFAULT_SIZE: u32 = 400;
const LABEL_GAP: i32 = 3;
// Arc outlines are sampled at roughly one vertex per degree.
const ARC_STEP: f64 = TAU / 360.0;

/// Plotters-backed surface. Holds the attached scene and rasterizes it on demand.
#[derive(Debug, Clone)]
pub struct Canvas {
    width: u32,
    height: u32,
    scene: Option<Scene>,
}

impl Default for Canvas {
    fn default() -> Self {
        Self::new(DEFAULT_SIZE, DEFAULT_SIZE)
    }
}

impl Canvas {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width: width.max(1),
            height: height.max(1),
            scene: None,
        }
    }

    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn scene(&self) -> Option<&Scene> {
        self.scene.as_ref()
    }

    /// Encode the current scene. A cleared canvas encodes to a blank white image.
    pub fn encode(&self, format: OutputFormat) -> Result<Vec<u8>> {
        match format {
            OutputFormat::Png => self.encode_png(),
            OutputFormat::Svg => self.encode_svg(),
        }
    }

    fn encode_png(&self) -> Result<Vec<u8>> {
        let len = (self.width as usize)
            .checked_mul(self.height as usize)
            .and_then(|px| px.checked_mul(3))
            .ok_or_else(|| {
                ChartError::Backend(format!("canvas {}x{} is too large to rasterize", self.width, self.height))
            })?;
        let mut buffer = vec![0u8; len];
        {
            let root = BitMapBackend::with_buffer(&mut buffer, (self.width, self.height))
                .into_drawing_area();
            draw_scene(&root, self.scene.as_ref())?;
            root.present().map_err(backend_error)?;
        }

        let mut png_bytes = Vec::new();
        {
            let encoder = image::codecs::png::PngEncoder::new(&mut png_bytes);
            encoder
                .write_image(&buffer, self.width, self.height, image::ColorType::Rgb8)
                .map_err(|e| ChartError::Backend(format!("Failed to encode PNG: {}", e)))?;
        }

        Ok(png_bytes)
    }

    fn encode_svg(&self) -> Result<Vec<u8>> {
        let mut svg = String::new();
        {
            let root = SVGBackend::with_string(&mut svg, (self.width, self.height)).into_drawing_area();
            draw_scene(&root, self.scene.as_ref())?;
            root.present().map_err(backend_error)?;
        }
        Ok(svg.into_bytes())
    }
}

impl Surface for Canvas {
    fn clear(&mut self) {
        self.scene = None;
    }

    fn attach(&mut self, scene: Scene) -> Result<()> {
        self.width = (scene.width.round() as u32).max(1);
        self.height = (scene.height.round() as u32).max(1);
        self.scene = Some(scene);
        Ok(())
    }
}

fn backend_error<E: std::fmt::Debug>(err: E) -> ChartError {
    ChartError::Backend(format!("{:?}", err))
}

fn px(v: f64) -> i32 {
    v.round() as i32
}

fn draw_scene<DB: DrawingBackend>(root: &DrawingArea<DB, Shift>, scene: Option<&Scene>) -> Result<()> {
    root.fill(&WHITE).map_err(backend_error)?;

    let Some(scene) = scene else {
        return Ok(());
    };

    let mut missing_labels = 0;
    for element in &scene.elements {
        match element {
            SceneElement::Arc {
                center,
                inner_radius,
                outer_radius,
                start_angle,
                end_angle,
                style,
                ..
            } => draw_arc(root, *center, *inner_radius, *outer_radius, *start_angle, *end_angle, style)?,
            SceneElement::Rect { x, y, width, height, style, .. } => {
                draw_rect(root, *x, *y, *width, *height, style)?
            }
            SceneElement::Path { points, style, .. } => draw_path(root, points, style)?,
            SceneElement::Axis(axis) => missing_labels += draw_axis(root, axis)?,
            SceneElement::Legend(entry) => missing_labels += draw_legend(root, entry)?,
        }
    }

    if missing_labels > 0 {
        warn!(missing_labels, "some labels could not be drawn, is a font installed?");
    }
    debug!(elements = scene.len(), "scene drawn");
    Ok(())
}

fn draw_arc<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    center: (f64, f64),
    inner: f64,
    outer: f64,
    start: f64,
    end: f64,
    style: &ShapeStyle,
) -> Result<()> {
    let Some(fill) = style.fill else {
        return Ok(());
    };
    if end <= start {
        return Ok(());
    }

    let steps = ((end - start) / ARC_STEP).ceil().max(1.0) as usize;
    let at = |radius: f64, angle: f64| {
        (
            px(center.0 + radius * angle.sin()),
            px(center.1 - radius * angle.cos()),
        )
    };

    let mut outline: Vec<(i32, i32)> = (0..=steps)
        .map(|i| at(outer, start + (end - start) * i as f64 / steps as f64))
        .collect();
    if inner > 0.0 {
        outline.extend((0..=steps).rev().map(|i| at(inner, start + (end - start) * i as f64 / steps as f64)));
    } else {
        outline.push((px(center.0), px(center.1)));
    }

    root.draw(&Polygon::new(outline, fill.filled()))
        .map_err(backend_error)
}

fn draw_rect<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    x: f64,
    y: f64,
    width: f64,
    height: f64,
    style: &ShapeStyle,
) -> Result<()> {
    if width <= 0.0 || height <= 0.0 {
        return Ok(());
    }
    let corners = [(px(x), px(y)), (px(x + width), px(y + height))];
    if let Some(fill) = style.fill {
        root.draw(&Rectangle::new(corners, fill.filled()))
            .map_err(backend_error)?;
    }
    if let Some(stroke) = style.stroke {
        root.draw(&Rectangle::new(corners, stroke.stroke_width(stroke_px(style.stroke_width))))
            .map_err(backend_error)?;
    }
    Ok(())
}

fn draw_path<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    points: &[(f64, f64)],
    style: &ShapeStyle,
) -> Result<()> {
    let Some(stroke) = style.stroke else {
        return Ok(());
    };
    let points: Vec<(i32, i32)> = points.iter().map(|&(x, y)| (px(x), px(y))).collect();
    root.draw(&PathElement::new(points, stroke.stroke_width(stroke_px(style.stroke_width))))
        .map_err(backend_error)
}

/// Draws the domain line and tick marks. Returns the number of labels that
/// could not be rendered.
fn draw_axis<DB: DrawingBackend>(root: &DrawingArea<DB, Shift>, axis: &AxisTicks) -> Result<usize> {
    let (ox, oy) = axis.origin;
    let line = axis.color.stroke_width(1);
    let tick = axis.tick_size;
    let mut missing = 0;

    match axis.orient {
        AxisOrient::Bottom => {
            root.draw(&PathElement::new(vec![(px(ox), px(oy)), (px(ox + axis.length), px(oy))], line))
                .map_err(backend_error)?;
            for t in &axis.ticks {
                root.draw(&PathElement::new(
                    vec![(px(t.position), px(oy)), (px(t.position), px(oy + tick))],
                    line,
                ))
                .map_err(backend_error)?;
                let anchor = (px(t.position), px(oy + tick) + LABEL_GAP);
                missing += draw_label(root, &t.label, anchor, Pos::new(HPos::Center, VPos::Top), axis)?;
            }
        }
        AxisOrient::Left => {
            root.draw(&PathElement::new(vec![(px(ox), px(oy)), (px(ox), px(oy + axis.length))], line))
                .map_err(backend_error)?;
            for t in &axis.ticks {
                root.draw(&PathElement::new(
                    vec![(px(ox - tick), px(t.position)), (px(ox), px(t.position))],
                    line,
                ))
                .map_err(backend_error)?;
                let anchor = (px(ox - tick) - LABEL_GAP, px(t.position));
                missing += draw_label(root, &t.label, anchor, Pos::new(HPos::Right, VPos::Center), axis)?;
            }
        }
    }
    Ok(missing)
}

fn draw_label<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    label: &str,
    anchor: (i32, i32),
    pos: Pos,
    axis: &AxisTicks,
) -> Result<usize> {
    let font = ("sans-serif", axis.font_size).into_font().color(&axis.color).pos(pos);
    Ok(text(root, label, anchor, font))
}

fn draw_legend<DB: DrawingBackend>(root: &DrawingArea<DB, Shift>, entry: &LegendEntry) -> Result<usize> {
    let (x, y) = entry.origin;
    let size = entry.swatch_size;
    root.draw(&Rectangle::new(
        [(px(x), px(y)), (px(x + size), px(y + size))],
        entry.color.filled(),
    ))
    .map_err(backend_error)?;

    let font = ("sans-serif", entry.font_size)
        .into_font()
        .color(&BLACK)
        .pos(Pos::new(HPos::Left, VPos::Center));
    let anchor = (px(x + size) + 2 * LABEL_GAP, px(y + size / 2.0));
    Ok(text(root, &entry.label, anchor, font))
}

// Text needs a system font; a missing one costs the label, not the chart.
fn text<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    label: &str,
    anchor: (i32, i32),
    style: plotters::style::TextStyle<'_>,
) -> usize {
    match root.draw(&Text::new(label, anchor, style)) {
        Ok(()) => 0,
        Err(err) => {
            debug!(%label, error = ?err, "label not drawn");
            1
        }
    }
}

fn stroke_px(width: f64) -> u32 {
    width.round().max(1.0) as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::Tick;
    use plotters::prelude::RGBColor;

    fn sample_scene() -> Scene {
        let mut scene = Scene::new(200.0, 100.0);
        scene.push(SceneElement::Arc {
            category: "A".to_string(),
            center: (50.0, 50.0),
            inner_radius: 0.0,
            outer_radius: 40.0,
            start_angle: 0.0,
            end_angle: TAU / 4.0,
            style: ShapeStyle::filled(RGBColor(255, 0, 0)),
        });
        scene.push(SceneElement::Rect {
            category: "B".to_string(),
            series: "value".to_string(),
            x: 120.0,
            y: 20.0,
            width: 20.0,
            height: 60.0,
            style: ShapeStyle::filled(RGBColor(0, 0, 255)),
        });
        scene.push(SceneElement::Path {
            series: "value".to_string(),
            points: vec![(0.0, 90.0), (200.0, 90.0)],
            style: ShapeStyle::stroked(RGBColor(0, 128, 0), 2.0),
        });
        scene.push(SceneElement::Axis(AxisTicks {
            orient: AxisOrient::Bottom,
            origin: (0.0, 95.0),
            length: 200.0,
            tick_size: 6.0,
            ticks: vec![Tick { position: 130.0, label: "B".to_string() }],
            font_size: 12.0,
            color: BLACK,
        }));
        scene
    }

    #[test]
    fn test_encode_png_signature() {
        let mut canvas = Canvas::default();
        canvas.attach(sample_scene()).unwrap();
        assert_eq!(canvas.size(), (200, 100));

        let bytes = canvas.encode(OutputFormat::Png).unwrap();
        assert_eq!(&bytes[0..8], &[137, 80, 78, 71, 13, 10, 26, 10]);
    }

    #[test]
    fn test_png_pixels_follow_scene() {
        let mut canvas = Canvas::default();
        canvas.attach(sample_scene()).unwrap();
        let bytes = canvas.encode(OutputFormat::Png).unwrap();
        let img = image::load_from_memory(&bytes).unwrap().to_rgb8();

        assert_eq!(img.dimensions(), (200, 100));
        // inside the bar
        assert_eq!(img.get_pixel(130, 50).0, [0, 0, 255]);
        // inside the quarter slice (upper right of the centre)
        assert_eq!(img.get_pixel(65, 35).0, [255, 0, 0]);
        // outside every shape
        assert_eq!(img.get_pixel(30, 30).0, [255, 255, 255]);
    }

    #[test]
    fn test_cleared_canvas_is_blank() {
        let mut canvas = Canvas::default();
        canvas.attach(sample_scene()).unwrap();
        canvas.clear();
        assert!(canvas.scene().is_none());

        let bytes = canvas.encode(OutputFormat::Png).unwrap();
        let img = image::load_from_memory(&bytes).unwrap().to_rgb8();
        assert_eq!(img.dimensions(), (200, 100));
        assert!(img.pixels().all(|p| p.0 == [255, 255, 255]));
    }

    #[test]
    fn test_default_canvas_size() {
        let bytes = Canvas::default().encode(OutputFormat::Png).unwrap();
        let img = image::load_from_memory(&bytes).unwrap();
        assert_eq!((img.width(), img.height()), (400, 400));
    }

    #[test]
    fn test_encode_svg() {
        let mut canvas = Canvas::default();
        canvas.attach(sample_scene()).unwrap();
        let svg = String::from_utf8(canvas.encode(OutputFormat::Svg).unwrap()).unwrap();
        assert!(svg.starts_with("<svg"));
        assert!(svg.contains("width=\"200\""));
        assert!(svg.contains("</svg>"));
    }
}
