use std::f64::consts::TAU;

use indexmap::IndexSet;
use tracing::debug;

use crate::error::{ChartError, Result};
use crate::normalize::DataTable;
use crate::style::{ChartType, Layout, ValueAxisBound};

// =============================================================================
// Categorical scales
// =============================================================================

/// Maps a category to a pixel interval of uniform width.
///
/// Inner and outer padding are both `padding` (as a fraction of the step) and
/// leftover space is split evenly on both sides.
#[derive(Debug, Clone, PartialEq)]
pub struct BandScale {
    domain: IndexSet<String>,
    range: (f64, f64),
    padding: f64,
    start: f64,
    step: f64,
    bandwidth: f64,
}

impl BandScale {
    pub fn new<'a>(domain: impl IntoIterator<Item = &'a str>, range: (f64, f64), padding: f64) -> Self {
        let domain: IndexSet<String> = domain.into_iter().map(str::to_string).collect();
        let (start, step) = band_layout(domain.len(), range, padding, padding);
        Self {
            domain,
            range,
            padding,
            start,
            step,
            bandwidth: step * (1.0 - padding),
        }
    }

    /// Left edge of the band for `category`.
    pub fn position(&self, category: &str) -> Result<f64> {
        let idx = domain_index(&self.domain, category)?;
        Ok(self.start + self.step * idx as f64)
    }

    /// Horizontal centre of the band for `category`.
    pub fn center(&self, category: &str) -> Result<f64> {
        Ok(self.position(category)? + self.bandwidth / 2.0)
    }

    pub fn bandwidth(&self) -> f64 {
        self.bandwidth
    }

    pub fn step(&self) -> f64 {
        self.step
    }

    pub fn padding(&self) -> f64 {
        self.padding
    }

    pub fn domain(&self) -> impl Iterator<Item = &str> {
        self.domain.iter().map(String::as_str)
    }

    pub fn range(&self) -> (f64, f64) {
        self.range
    }
}

/// Maps a category to a single pixel position (a band scale with no width).
#[derive(Debug, Clone, PartialEq)]
pub struct PointScale {
    domain: IndexSet<String>,
    range: (f64, f64),
    start: f64,
    step: f64,
}

impl PointScale {
    pub fn new<'a>(domain: impl IntoIterator<Item = &'a str>, range: (f64, f64)) -> Self {
        let domain: IndexSet<String> = domain.into_iter().map(str::to_string).collect();
        let (start, step) = band_layout(domain.len(), range, 1.0, 0.0);
        Self { domain, range, start, step }
    }

    pub fn position(&self, category: &str) -> Result<f64> {
        let idx = domain_index(&self.domain, category)?;
        Ok(self.start + self.step * idx as f64)
    }

    pub fn step(&self) -> f64 {
        self.step
    }

    pub fn domain(&self) -> impl Iterator<Item = &str> {
        self.domain.iter().map(String::as_str)
    }

    pub fn range(&self) -> (f64, f64) {
        self.range
    }
}

fn domain_index(domain: &IndexSet<String>, category: &str) -> Result<usize> {
    domain.get_index_of(category).ok_or_else(|| ChartError::Domain {
        category: category.to_string(),
    })
}

/// Returns (first band start, step) for `n` bands.
fn band_layout(n: usize, range: (f64, f64), padding_inner: f64, padding_outer: f64) -> (f64, f64) {
    let (r0, r1) = range;
    let n = n as f64;
    let step = (r1 - r0) / (n - padding_inner + padding_outer * 2.0).max(1.0);
    let start = r0 + (r1 - r0 - step * (n - padding_inner)) * 0.5;
    (start, step)
}

// =============================================================================
// Linear scale
// =============================================================================

const E10: f64 = 7.0710678118654755; // sqrt(50)
const E5: f64 = 3.1622776601683795; // sqrt(10)
const E2: f64 = std::f64::consts::SQRT_2;

/// Maps a numeric domain onto a pixel range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearScale {
    domain: (f64, f64),
    range: (f64, f64),
}

impl LinearScale {
    /// Build a scale. A zero-width domain is widened to `[d0, d0 + 1]`.
    pub fn new(domain: (f64, f64), range: (f64, f64)) -> Self {
        let (d0, mut d1) = domain;
        if d1 == d0 {
            d1 = d0 + 1.0;
        }
        Self { domain: (d0, d1), range }
    }

    pub fn map(&self, value: f64) -> f64 {
        let (d0, d1) = self.domain;
        let (r0, r1) = self.range;
        r0 + (value - d0) / (d1 - d0) * (r1 - r0)
    }

    pub fn domain(&self) -> (f64, f64) {
        self.domain
    }

    pub fn range(&self) -> (f64, f64) {
        self.range
    }

    /// Extend the domain outward to round values, aiming for about `count` ticks.
    pub fn nice(mut self, count: usize) -> Self {
        let (mut start, mut stop) = self.domain;
        let reversed = stop < start;
        if reversed {
            std::mem::swap(&mut start, &mut stop);
        }

        let mut prestep = None;
        for _ in 0..10 {
            let step = tick_increment(start, stop, count as f64);
            if prestep == Some(step) {
                self.domain = if reversed { (stop, start) } else { (start, stop) };
                return self;
            } else if step > 0.0 {
                start = (start / step).floor() * step;
                stop = (stop / step).ceil() * step;
            } else if step < 0.0 {
                start = (start * step).ceil() / step;
                stop = (stop * step).floor() / step;
            } else {
                break;
            }
            prestep = Some(step);
        }
        self
    }

    /// Round tick values inside the domain, about `count` of them.
    pub fn ticks(&self, count: usize) -> Vec<f64> {
        let (mut start, mut stop) = self.domain;
        if count == 0 {
            return Vec::new();
        }
        if start == stop {
            return vec![start];
        }
        let reversed = stop < start;
        if reversed {
            std::mem::swap(&mut start, &mut stop);
        }

        let (i1, i2, inc) = tick_spec(start, stop, count as f64);
        if i2 < i1 {
            return Vec::new();
        }

        let mut ticks: Vec<f64> = (i1 as i64..=i2 as i64)
            .map(|i| if inc < 0.0 { i as f64 / -inc } else { i as f64 * inc })
            .collect();
        if reversed {
            ticks.reverse();
        }
        ticks
    }

    /// Label formatter matching the precision of `ticks(count)`.
    pub fn tick_format(&self, count: usize) -> impl Fn(f64) -> String {
        let (start, stop) = self.domain;
        let step = tick_step(start.min(stop), start.max(stop), count.max(1) as f64);
        let precision = if step > 0.0 && step.is_finite() {
            (-step.log10().floor()).max(0.0) as usize
        } else {
            0
        };
        move |v| format_grouped(v, precision)
    }
}

fn tick_spec(start: f64, stop: f64, count: f64) -> (f64, f64, f64) {
    let step = (stop - start) / count.max(0.0);
    let power = step.log10().floor();
    let error = step / 10f64.powf(power);
    let factor = if error >= E10 {
        10.0
    } else if error >= E5 {
        5.0
    } else if error >= E2 {
        2.0
    } else {
        1.0
    };

    let mut i1;
    let mut i2;
    let inc;
    if power < 0.0 {
        let inv = 10f64.powf(-power) / factor;
        i1 = (start * inv).round();
        i2 = (stop * inv).round();
        if i1 / inv < start {
            i1 += 1.0;
        }
        if i2 / inv > stop {
            i2 -= 1.0;
        }
        inc = -inv;
    } else {
        inc = 10f64.powf(power) * factor;
        i1 = (start / inc).round();
        i2 = (stop / inc).round();
        if i1 * inc < start {
            i1 += 1.0;
        }
        if i2 * inc > stop {
            i2 -= 1.0;
        }
    }

    if i2 < i1 && (0.5..2.0).contains(&count) {
        return tick_spec(start, stop, count * 2.0);
    }
    (i1, i2, inc)
}

/// Signed tick increment: positive for steps >= 1, negative reciprocal otherwise.
fn tick_increment(start: f64, stop: f64, count: f64) -> f64 {
    tick_spec(start, stop, count).2
}

fn tick_step(start: f64, stop: f64, count: f64) -> f64 {
    let inc = tick_increment(start, stop, count);
    if inc < 0.0 {
        1.0 / -inc
    } else {
        inc
    }
}

fn format_grouped(value: f64, precision: usize) -> String {
    let raw = format!("{:.*}", precision, value.abs());
    let (int_part, frac_part) = match raw.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (raw.as_str(), None),
    };

    let mut grouped = String::with_capacity(raw.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    if let Some(f) = frac_part {
        grouped.push('.');
        grouped.push_str(f);
    }

    let is_zero = raw.chars().all(|c| c == '0' || c == '.');
    if value < 0.0 && !is_zero {
        format!("-{}", grouped)
    } else {
        grouped
    }
}

// =============================================================================
// Angular partition (pie)
// =============================================================================

/// Division of the full circle into one arc per row, in row order.
/// Angles start at 12 o'clock and grow clockwise.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AngularPartition {
    arcs: Vec<(f64, f64)>,
}

impl AngularPartition {
    /// Zero, negative and non-finite values get zero-length arcs.
    pub fn from_values(values: &[f64]) -> Self {
        let weight = |v: f64| if v.is_finite() && v > 0.0 { v } else { 0.0 };
        let total: f64 = values.iter().map(|&v| weight(v)).sum();

        let mut cumulative = 0.0;
        let arcs = values
            .iter()
            .map(|&v| {
                let start = if total > 0.0 { cumulative / total * TAU } else { 0.0 };
                cumulative += weight(v);
                let end = if total > 0.0 { cumulative / total * TAU } else { 0.0 };
                (start, end)
            })
            .collect();

        Self { arcs }
    }

    pub fn arcs(&self) -> &[(f64, f64)] {
        &self.arcs
    }

    pub fn spans(&self) -> impl Iterator<Item = f64> + '_ {
        self.arcs.iter().map(|(s, e)| e - s)
    }

    pub fn len(&self) -> usize {
        self.arcs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arcs.is_empty()
    }
}

// =============================================================================
// Scale building
// =============================================================================

/// Options that shape the scales, taken from the resolved style.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScaleOptions {
    pub band_padding: f64,
    pub upper_bound: ValueAxisBound,
    pub nice: bool,
}

impl Default for ScaleOptions {
    fn default() -> Self {
        Self {
            band_padding: 0.1,
            upper_bound: ValueAxisBound::Auto,
            nice: false,
        }
    }
}

/// The scales one chart geometry needs.
#[derive(Debug, Clone, PartialEq)]
pub enum Scales {
    Pie(AngularPartition),
    Band { x: BandScale, y: LinearScale },
    Point { x: PointScale, y: LinearScale },
}

/// Build the scales for `chart_type` over `table`, laid out inside the plot area.
pub fn build_scales(
    table: &DataTable,
    chart_type: ChartType,
    layout: &Layout,
    options: &ScaleOptions,
) -> Result<Scales> {
    let plot_w = layout.plot_width();
    let plot_h = layout.plot_height();

    let scales = match chart_type {
        ChartType::Pie => {
            let values: Vec<f64> = table.rows().iter().map(|r| r.primary()).collect();
            Scales::Pie(AngularPartition::from_values(&values))
        }
        ChartType::Bar => Scales::Band {
            x: BandScale::new(table.categories(), (0.0, plot_w), options.band_padding),
            y: value_scale(table, &[0], plot_h, options),
        },
        ChartType::BarWithMarker => {
            let mut sorted: Vec<&str> = table.categories().collect();
            sorted.sort();
            Scales::Band {
                x: BandScale::new(sorted, (0.0, plot_w), options.band_padding),
                y: value_scale(table, &[0, 1], plot_h, options),
            }
        }
        ChartType::Line => Scales::Point {
            x: PointScale::new(table.categories(), (0.0, plot_w)),
            y: value_scale(table, &[0], plot_h, options),
        },
    };

    debug!(chart = %chart_type, plot_w, plot_h, "built scales");
    Ok(scales)
}

fn value_scale(table: &DataTable, series: &[usize], plot_h: f64, options: &ScaleOptions) -> LinearScale {
    let upper = match options.upper_bound {
        ValueAxisBound::Fixed(cap) => cap,
        ValueAxisBound::Auto => {
            let mut min = f64::INFINITY;
            let mut max = f64::NEG_INFINITY;
            for row in table.rows() {
                for &idx in series {
                    if let Some((_, v)) = row.measures.get_index(idx) {
                        min = min.min(*v);
                        max = max.max(*v);
                    }
                }
            }
            // All values equal, or no values: the axis reaches at least 1.
            if min >= max {
                max.max(1.0)
            } else {
                max
            }
        }
    };
    // Keep a non-zero span when every value is zero or negative.
    let upper = if upper > 0.0 { upper } else { 1.0 };

    let scale = LinearScale::new((0.0, upper), (plot_h, 0.0));
    if options.nice {
        scale.nice(10)
    } else {
        scale
    }
}
