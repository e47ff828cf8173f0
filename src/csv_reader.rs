// CSV input for the command-line host

use anyhow::{Context, Result};
use std::io::{self, Read};

/// Raw CSV table: header row plus string cells.
#[derive(Debug, Clone, PartialEq)]
pub struct CsvData {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

/// Read CSV data from stdin
pub fn read_csv_from_stdin() -> Result<CsvData> {
    read_csv(io::stdin().lock())
}

/// Read CSV data from any reader. The first record is the header row.
pub fn read_csv<R: Read>(reader: R) -> Result<CsvData> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers: Vec<String> = rdr
        .headers()
        .context("Failed to read CSV headers")?
        .iter()
        .map(|h| h.to_string())
        .collect();

    if headers.is_empty() {
        anyhow::bail!("CSV input has no header row");
    }

    let mut rows = Vec::new();
    for (idx, record) in rdr.records().enumerate() {
        let record = record.with_context(|| format!("Failed to read CSV record {}", idx + 1))?;
        rows.push(record.iter().map(|f| f.to_string()).collect());
    }

    Ok(CsvData { headers, rows })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_csv_basic() {
        let input = "dest,freq,avg\nLyon,5,4\nNice, 3 ,2\n";
        let data = read_csv(input.as_bytes()).unwrap();
        assert_eq!(data.headers, vec!["dest", "freq", "avg"]);
        assert_eq!(data.rows.len(), 2);
        assert_eq!(data.rows[1], vec!["Nice", "3", "2"]);
    }

    #[test]
    fn test_read_csv_headers_only() {
        let data = read_csv("x,y\n".as_bytes()).unwrap();
        assert_eq!(data.headers, vec!["x", "y"]);
        assert!(data.rows.is_empty());
    }

    #[test]
    fn test_read_csv_ragged_record_fails() {
        let result = read_csv("x,y\n1,2,3\n".as_bytes());
        assert!(result.is_err());
    }
}
