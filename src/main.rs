use anyhow::{Context, Result};
use clap::Parser;
use std::fs;
use std::io::{self, Read, Write};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

use tabchart::csv_reader;
use tabchart::{render, CategoricalPayload, Canvas, ChartStyle, OutputFormat};

#[derive(Parser, Debug)]
#[command(name = "tabchart")]
#[command(about = "Render categorical CSV or JSON data from stdin as a chart", long_about = None)]
struct Args {
    /// Chart type: pie, bar, barwithmarker or line. Falls back to the style's chartType.
    #[arg(short, long)]
    chart: Option<String>,

    /// JSON style bundle (canvas size, margins, palette, axis bound, colours)
    #[arg(short, long)]
    style: Option<PathBuf>,

    /// Canvas width in pixels, overrides the style
    #[arg(long)]
    width: Option<f64>,

    /// Canvas height in pixels, overrides the style
    #[arg(long)]
    height: Option<f64>,

    /// Output encoding
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Png)]
    format: OutputFormat,

    /// Read stdin as JSON instead of CSV
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("tabchart=info")),
        )
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();

    let mut style = match &args.style {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("Failed to read style file {}", path.display()))?;
            serde_json::from_str::<ChartStyle>(&text)
                .with_context(|| format!("Failed to parse style file {}", path.display()))?
        }
        None => ChartStyle::default(),
    };
    if let Some(width) = args.width {
        style.canvas_width = width;
    }
    if let Some(height) = args.height {
        style.canvas_height = height;
    }

    let selector = args
        .chart
        .clone()
        .or_else(|| style.chart_type.clone())
        .context("No chart type given: pass --chart or set chartType in the style")?;

    let payload = if args.json {
        let mut input = String::new();
        io::stdin()
            .read_to_string(&mut input)
            .context("Failed to read JSON from stdin")?;
        let value: serde_json::Value =
            serde_json::from_str(&input).context("Failed to parse JSON from stdin")?;
        CategoricalPayload::from_json(&value)?
    } else {
        let csv_data = csv_reader::read_csv_from_stdin().context("Failed to read CSV from stdin")?;
        CategoricalPayload::from_csv(&csv_data)
    };

    let mut canvas = Canvas::new(style.canvas_width.round() as u32, style.canvas_height.round() as u32);
    let report = render(&mut canvas, &payload, &selector, &style)
        .with_context(|| format!("Failed to render '{}' chart", selector))?;
    info!(
        chart = %report.chart_type,
        rows = report.rows,
        rejected = report.rejected,
        elements = report.elements,
        "rendered"
    );

    let bytes = canvas.encode(args.format).context("Failed to encode chart")?;

    let stdout = io::stdout();
    let mut handle = stdout.lock();
    handle
        .write_all(&bytes)
        .context("Failed to write chart to stdout")?;
    handle.flush().context("Failed to flush stdout")?;

    Ok(())
}
