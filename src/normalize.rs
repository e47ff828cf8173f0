// Data normalization: raw categorical payload -> typed rows

use indexmap::IndexMap;
use tracing::debug;

use crate::coerce::{to_display_string, to_number};
use crate::data::CategoricalPayload;
use crate::error::{ChartError, Result};

/// One category with its measures, keyed by series name in payload order.
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    pub category: String,
    pub measures: IndexMap<String, f64>,
}

impl Row {
    /// Value of the first series.
    pub fn primary(&self) -> f64 {
        self.measure_at(0)
    }

    /// Value of the second series, if there is one.
    pub fn secondary(&self) -> Option<f64> {
        self.measures.get_index(1).map(|(_, v)| *v)
    }

    pub fn measure_at(&self, index: usize) -> f64 {
        self.measures.get_index(index).map(|(_, v)| *v).unwrap_or(0.0)
    }
}

/// Validated rows. Every row carries the same series, in the same order, and
/// every measure is finite.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DataTable {
    series: Vec<String>,
    rows: Vec<Row>,
}

impl DataTable {
    /// Build a table from already typed rows, checking the row invariant.
    pub fn new(series: Vec<String>, rows: Vec<Row>) -> Result<Self> {
        for (idx, row) in rows.iter().enumerate() {
            if !row.measures.keys().eq(series.iter()) {
                return Err(ChartError::MissingCategoricalData(format!(
                    "row {} does not carry the series {:?}",
                    idx, series
                )));
            }
            if let Some((name, value)) = row.measures.iter().find(|(_, v)| !v.is_finite()) {
                return Err(ChartError::Normalization {
                    row: idx,
                    series: name.clone(),
                    raw: value.to_string(),
                });
            }
        }
        Ok(Self { series, rows })
    }

    pub fn series(&self) -> &[String] {
        &self.series
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn categories(&self) -> impl Iterator<Item = &str> {
        self.rows.iter().map(|r| r.category.as_str())
    }

    /// Rows ordered by category label, ascending. The table itself is left as is.
    pub fn sorted_by_category(&self) -> Vec<&Row> {
        let mut rows: Vec<&Row> = self.rows.iter().collect();
        rows.sort_by(|a, b| a.category.cmp(&b.category));
        rows
    }
}

/// Result of normalization: the table plus one diagnostic per rejected row.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Normalized {
    pub table: DataTable,
    pub rejected: Vec<ChartError>,
}

/// Convert a raw payload into a [`DataTable`].
///
/// Rows holding a value that does not coerce to a finite number are dropped
/// and reported in [`Normalized::rejected`].
pub fn normalize(payload: &CategoricalPayload) -> Result<Normalized> {
    let categories = payload.categories.as_ref().ok_or_else(|| {
        ChartError::MissingCategoricalData("payload has no category column".to_string())
    })?;

    if payload.values.is_empty() {
        return Err(ChartError::MissingCategoricalData(
            "payload has no value column".to_string(),
        ));
    }

    let len = categories.values.len();
    if let Some(col) = payload.values.iter().find(|c| c.values.len() != len) {
        return Err(ChartError::MissingCategoricalData(format!(
            "value column '{}' has {} entries but there are {} categories",
            col.name,
            col.values.len(),
            len
        )));
    }

    let series = unique_series_names(payload.values.iter().map(|c| c.name.as_str()));

    let mut rows = Vec::with_capacity(len);
    let mut rejected = Vec::new();

    'rows: for (idx, raw_category) in categories.values.iter().enumerate() {
        let mut measures = IndexMap::with_capacity(series.len());
        for (name, col) in series.iter().zip(&payload.values) {
            let raw = &col.values[idx];
            let value = to_number(raw);
            if !value.is_finite() {
                rejected.push(ChartError::Normalization {
                    row: idx,
                    series: name.clone(),
                    raw: to_display_string(raw),
                });
                continue 'rows;
            }
            measures.insert(name.clone(), value);
        }
        rows.push(Row {
            category: to_display_string(raw_category),
            measures,
        });
    }

    debug!(
        rows = rows.len(),
        rejected = rejected.len(),
        series = ?series,
        "normalized categorical payload"
    );

    Ok(Normalized {
        table: DataTable { series, rows },
        rejected,
    })
}

fn unique_series_names<'a>(names: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for (idx, name) in names.enumerate() {
        let base = if name.is_empty() {
            format!("series_{}", idx + 1)
        } else {
            name.to_string()
        };
        let mut candidate = base.clone();
        let mut n = 2;
        while out.contains(&candidate) {
            candidate = format!("{}_{}", base, n);
            n += 1;
        }
        if candidate != base {
            debug!(original = %base, renamed = %candidate, "duplicate series name");
        }
        out.push(candidate);
    }
    out
}
