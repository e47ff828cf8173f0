use thiserror::Error;

/// Failures of a single render cycle. None of them are fatal to the process.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ChartError {
    #[error("Missing categorical data: {0}")]
    MissingCategoricalData(String),

    #[error("Category '{category}' is not in the scale domain")]
    Domain { category: String },

    #[error("Unknown chart type: '{0}'")]
    UnknownChartType(String),

    #[error("Row {row} rejected: value '{raw}' in series '{series}' is not a finite number")]
    Normalization {
        row: usize,
        series: String,
        raw: String,
    },

    #[error("{chart} chart cannot be drawn with {scales} scales")]
    ScaleMismatch { chart: String, scales: String },

    #[error("Invalid style: {0}")]
    InvalidStyle(String),

    #[error("Drawing backend error: {0}")]
    Backend(String),
}

pub type Result<T> = std::result::Result<T, ChartError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = ChartError::UnknownChartType("Donut".to_string());
        assert_eq!(err.to_string(), "Unknown chart type: 'Donut'");

        let err = ChartError::Normalization {
            row: 2,
            series: "value".to_string(),
            raw: "abc".to_string(),
        };
        assert!(err.to_string().contains("Row 2 rejected"));
        assert!(err.to_string().contains("'abc'"));
    }

    #[test]
    fn test_domain_error_names_category() {
        let err = ChartError::Domain { category: "Z".to_string() };
        assert!(err.to_string().contains("'Z'"));
    }
}
