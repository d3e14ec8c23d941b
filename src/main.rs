use std::{
  io::{self, BufRead, Write},
  path::PathBuf,
};

use anyhow::{Context, Result};
use clap::Parser;
use fitplot::{Plot, data::Dataset, regression};
use tracing::info;

/// Plots `x,y` samples from a CSV file together with their least squares line.
#[derive(Parser)]
#[command(version)]
struct Cli {
  /// The data file. Asked for on stdin when left out.
  file: Option<PathBuf>,

  /// Title drawn above the plot.
  #[arg(short, long)]
  title: Option<String>,
}

fn main() -> Result<()> {
  tracing_subscriber::fmt().with_target(false).compact().with_writer(io::stderr).init();
  let cli = Cli::parse();

  let path = match cli.file {
    Some(path) => path,
    None => prompt("Enter the name of the data file: ")?.into(),
  };

  let dataset =
    Dataset::load(&path).with_context(|| format!("failed to load {}", path.display()))?;
  info!(samples = dataset.len(), "loaded {}", path.display());

  let fit = regression::fit(dataset.samples()).context("cannot fit a line to the data")?;
  info!(slope = fit.slope, intercept = fit.intercept(), "fitted line");

  let (x, y) = dataset.columns();
  let mut plot = Plot::new();
  plot.scatter(&x, &y);
  plot.fitted_line(&fit, dataset.samples())?;

  plot.x.title(dataset.x_label());
  plot.y.title(dataset.y_label());
  if let Some(title) = &cli.title {
    plot.title(title);
  }
  plot.show().context("cannot show the plot")?;

  Ok(())
}

fn prompt(message: &str) -> Result<String> {
  let mut stdout = io::stdout();
  write!(stdout, "{message}")?;
  stdout.flush()?;

  let mut line = String::new();
  io::stdin().lock().read_line(&mut line)?;
  Ok(line.trim_end_matches(['\n', '\r']).to_string())
}
