use plotters::style::RGBColor;

use crate::error::Result;
use crate::ir::{AxisOrient, AxisTicks, SceneElement, Tick};
use crate::scale::{BandScale, LinearScale, PointScale};
use crate::style::ResolvedStyle;

const TICK_SIZE: f64 = 6.0;
const AXIS_COLOR: RGBColor = RGBColor(0, 0, 0);

/// Bottom axis with one tick at the centre of each band.
pub(super) fn bottom_band(x: &BandScale, style: &ResolvedStyle) -> Result<SceneElement> {
    let left = style.layout.margins.left;
    let ticks = x
        .domain()
        .map(|cat| {
            Ok(Tick {
                position: left + x.center(cat)?,
                label: cat.to_string(),
            })
        })
        .collect::<Result<Vec<_>>>()?;
    Ok(bottom(ticks, style))
}

/// Bottom axis with one tick per point.
pub(super) fn bottom_point(x: &PointScale, style: &ResolvedStyle) -> Result<SceneElement> {
    let left = style.layout.margins.left;
    let ticks = x
        .domain()
        .map(|cat| {
            Ok(Tick {
                position: left + x.position(cat)?,
                label: cat.to_string(),
            })
        })
        .collect::<Result<Vec<_>>>()?;
    Ok(bottom(ticks, style))
}

/// Left value axis with about `count` round ticks.
pub(super) fn left_value(y: &LinearScale, count: usize, style: &ResolvedStyle) -> SceneElement {
    let layout = &style.layout;
    let format = y.tick_format(count);
    let ticks = y
        .ticks(count)
        .into_iter()
        .map(|v| Tick {
            position: layout.margins.top + y.map(v),
            label: format(v),
        })
        .collect();

    SceneElement::Axis(AxisTicks {
        orient: AxisOrient::Left,
        origin: (layout.margins.left, layout.margins.top),
        length: layout.plot_height(),
        tick_size: TICK_SIZE,
        ticks,
        font_size: style.font_size,
        color: AXIS_COLOR,
    })
}

fn bottom(ticks: Vec<Tick>, style: &ResolvedStyle) -> SceneElement {
    let layout = &style.layout;
    SceneElement::Axis(AxisTicks {
        orient: AxisOrient::Bottom,
        origin: (layout.margins.left, layout.margins.top + layout.plot_height()),
        length: layout.plot_width(),
        tick_size: TICK_SIZE,
        ticks,
        font_size: style.font_size,
        color: AXIS_COLOR,
    })
}
