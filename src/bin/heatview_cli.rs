//! CLI tool for heatview - renders a chart config to SVG
//!
//! Usage:
//!   heatview_cli <chart.json>                      # SVG of the initial window to stdout
//!   heatview_cli <chart.json> -o out.svg           # Write to a file
//!   heatview_cli <chart.json> --full               # Export the whole matrix
//!   heatview_cli <chart.json> --width 1200 --height 800
//!
//! Set `RUST_LOG=heatview=debug` for redraw statistics.

#![allow(clippy::exit)]
#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::indexing_slicing)]

use std::env;
use std::fs;
use std::io::{self, Write};

use heatview::render::ApproxTextMeasure;
use heatview::{Chart, ChartConfig};

const USAGE: &str =
    "Usage: heatview_cli <chart.json> [-o output.svg] [--full] [--width W] [--height H]";

struct Args {
    input: String,
    output: Option<String>,
    full: bool,
    width: f64,
    height: f64,
}

fn parse_args(args: &[String]) -> Result<Args, String> {
    let mut input = None;
    let mut output = None;
    let mut full = false;
    let mut width = 800.0;
    let mut height = 600.0;

    let mut iter = args.iter().skip(1);
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "-o" | "--output" => output = Some(iter.next().ok_or("-o needs a path")?.clone()),
            "--full" => full = true,
            "--width" => width = parse_size(iter.next(), "--width")?,
            "--height" => height = parse_size(iter.next(), "--height")?,
            other if other.starts_with('-') => return Err(format!("unknown flag {other}")),
            other => input = Some(other.to_string()),
        }
    }

    Ok(Args {
        input: input.ok_or("missing input file")?,
        output,
        full,
        width,
        height,
    })
}

fn parse_size(value: Option<&String>, flag: &str) -> Result<f64, String> {
    value
        .and_then(|v| v.parse::<f64>().ok())
        .filter(|v| v.is_finite() && *v > 0.0)
        .ok_or_else(|| format!("{flag} needs a positive number"))
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let args: Vec<String> = env::args().collect();
    let args = match parse_args(&args) {
        Ok(a) => a,
        Err(e) => {
            eprintln!("{e}\n{USAGE}");
            std::process::exit(1);
        }
    };

    // Read input file
    let json = match fs::read_to_string(&args.input) {
        Ok(d) => d,
        Err(e) => {
            eprintln!("Error reading {}: {}", args.input, e);
            std::process::exit(1);
        }
    };

    // Validate and build the chart
    let config = match ChartConfig::from_json(&json) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error parsing config: {}", e);
            std::process::exit(1);
        }
    };
    let mut chart = match Chart::new(&config, args.width, args.height) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error building chart: {}", e);
            std::process::exit(1);
        }
    };
    for warning in chart.warnings() {
        eprintln!("warning: {warning}");
    }

    let mut measure = ApproxTextMeasure::default();
    if let Err(e) = chart.render(&mut measure) {
        eprintln!("Error rendering: {}", e);
        std::process::exit(1);
    }
    let svg = match chart.export_svg(args.full, &mut measure) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Error exporting SVG: {}", e);
            std::process::exit(1);
        }
    };

    // Output
    match args.output {
        Some(path) => {
            if let Err(e) = fs::write(&path, &svg) {
                eprintln!("Error writing {}: {}", path, e);
                std::process::exit(1);
            }
            eprintln!("Written: {}", path);
        }
        None => {
            io::stdout().write_all(svg.as_bytes()).unwrap();
            println!();
        }
    }
}
