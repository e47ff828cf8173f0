use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::csv_reader::CsvData;

/// The category column of a categorical payload.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CategoryColumn {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub values: Vec<Value>,
}

/// One measure series of a categorical payload.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ValueColumn {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub values: Vec<Value>,
}

/// Raw categorical data as handed over by the host: one category column and
/// any number of value columns, cells still untyped.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CategoricalPayload {
    #[serde(default)]
    pub categories: Option<CategoryColumn>,
    #[serde(default)]
    pub values: Vec<ValueColumn>,
}

impl CategoricalPayload {
    pub fn new(categories: Option<CategoryColumn>, values: Vec<ValueColumn>) -> Self {
        Self { categories, values }
    }

    /// Build a payload from string categories and numeric series.
    pub fn from_columns<C, S>(categories: &[C], series: &[(S, Vec<f64>)]) -> Self
    where
        C: AsRef<str>,
        S: AsRef<str>,
    {
        let categories = CategoryColumn {
            name: "category".to_string(),
            values: categories
                .iter()
                .map(|c| Value::String(c.as_ref().to_string()))
                .collect(),
        };
        let values = series
            .iter()
            .map(|(name, vals)| ValueColumn {
                name: name.as_ref().to_string(),
                values: vals
                    .iter()
                    .map(|v| serde_json::Number::from_f64(*v).map(Value::Number).unwrap_or(Value::Null))
                    .collect(),
            })
            .collect();
        Self::new(Some(categories), values)
    }

    /// Create a payload from CSV: the first column holds the categories, every
    /// other column becomes a value series named after its header.
    pub fn from_csv(csv: &CsvData) -> Self {
        let column = |idx: usize| -> Vec<Value> {
            csv.rows
                .iter()
                .map(|row| row.get(idx).cloned().map(Value::String).unwrap_or(Value::Null))
                .collect()
        };

        let categories = csv.headers.first().map(|name| CategoryColumn {
            name: name.clone(),
            values: column(0),
        });

        let values = csv
            .headers
            .iter()
            .enumerate()
            .skip(1)
            .map(|(idx, name)| ValueColumn {
                name: name.clone(),
                values: column(idx),
            })
            .collect();

        Self::new(categories, values)
    }

    /// Create a payload from JSON.
    ///
    /// Accepts either the categorical object form
    /// (`{"categories": {...}, "values": [...]}`) or an array of objects, where
    /// the first key of the first object is the category and the remaining keys
    /// are value series.
    pub fn from_json(value: &Value) -> Result<Self> {
        if value.is_object() {
            return serde_json::from_value(value.clone())
                .map_err(|e| anyhow!("Invalid categorical payload: {}", e));
        }

        let array = value.as_array().ok_or_else(||
            anyhow!("Input data must be a categorical object or a JSON array of objects")
        )?;

        let Some(first) = array.first() else {
            return Ok(Self::new(
                Some(CategoryColumn::default()),
                vec![ValueColumn::default()],
            ));
        };

        let first_obj = first.as_object().ok_or_else(||
            anyhow!("Items in array must be objects")
        )?;
        let headers: Vec<String> = first_obj.keys().cloned().collect();

        let mut columns: Vec<Vec<Value>> = vec![Vec::with_capacity(array.len()); headers.len()];
        for item in array {
            let obj = item.as_object().ok_or_else(||
                anyhow!("Items in array must be objects")
            )?;
            for (col, header) in columns.iter_mut().zip(&headers) {
                col.push(obj.get(header).cloned().unwrap_or(Value::Null));
            }
        }

        let mut columns = headers.into_iter().zip(columns);
        let categories = columns
            .next()
            .map(|(name, values)| CategoryColumn { name, values });
        let values = columns
            .map(|(name, values)| ValueColumn { name, values })
            .collect();

        Ok(Self::new(categories, values))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_csv_splits_columns() {
        let csv = CsvData {
            headers: vec!["dest".into(), "freq".into(), "avg".into()],
            rows: vec![
                vec!["Lyon".into(), "5".into(), "4".into()],
                vec!["Nice".into(), "3".into(), "2".into()],
            ],
        };
        let payload = CategoricalPayload::from_csv(&csv);
        let cats = payload.categories.unwrap();
        assert_eq!(cats.name, "dest");
        assert_eq!(cats.values, vec![json!("Lyon"), json!("Nice")]);
        assert_eq!(payload.values.len(), 2);
        assert_eq!(payload.values[1].name, "avg");
        assert_eq!(payload.values[1].values, vec![json!("4"), json!("2")]);
    }

    #[test]
    fn test_from_csv_category_only() {
        let csv = CsvData {
            headers: vec!["dest".into()],
            rows: vec![vec!["Lyon".into()]],
        };
        let payload = CategoricalPayload::from_csv(&csv);
        assert!(payload.categories.is_some());
        assert!(payload.values.is_empty());
    }

    #[test]
    fn test_from_json_categorical_object() {
        let value = json!({
            "categories": {"name": "dest", "values": ["A", "B"]},
            "values": [{"name": "value", "values": [1, "2"]}]
        });
        let payload = CategoricalPayload::from_json(&value).unwrap();
        assert_eq!(payload.categories.unwrap().values.len(), 2);
        assert_eq!(payload.values[0].values, vec![json!(1), json!("2")]);
    }

    #[test]
    fn test_from_json_array_of_objects() {
        let value = json!([
            {"dest": "A", "value": 1, "average": 0.5},
            {"dest": "B", "value": 2}
        ]);
        let payload = CategoricalPayload::from_json(&value).unwrap();
        let cats = payload.categories.unwrap();
        assert_eq!(cats.name, "dest");
        assert_eq!(payload.values.len(), 2);
        assert_eq!(payload.values[1].values, vec![json!(0.5), Value::Null]);
    }

    #[test]
    fn test_from_json_rejects_scalars() {
        assert!(CategoricalPayload::from_json(&json!(42)).is_err());
        assert!(CategoricalPayload::from_json(&json!([1, 2])).is_err());
    }

    #[test]
    fn test_from_columns() {
        let payload = CategoricalPayload::from_columns(&["A", "B"], &[("value", vec![1.0, 2.0])]);
        assert_eq!(payload.values[0].values, vec![json!(1.0), json!(2.0)]);
    }
}
