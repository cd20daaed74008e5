// Copyright 2021 bmc::labs Gmbh. All rights reserved.
//
// Authors:
//   Florian Eich <florian@bmc-labs.com>
//   Jonas Reitemeyer <alumni@bmc-labs.com>

use clap::Parser;
use mconv::{check_resolution, open_reader, Error, ExportRequest, OutputFormat};
use std::{io::{self, BufWriter, Write},
          path::PathBuf};


/// Converts time-series measurement recordings between instrument file
/// formats, optionally restricting the time window and resampling to a
/// target rate. The converted data goes to stdout.
#[derive(Debug, Parser)]
#[command(name = "mconv", version, allow_negative_numbers = true)]
struct Args {
  /// Input file (supported: .dlog, .psi, .meta, .grim, .csv, .xml)
  #[arg(long = "file")]
  file: PathBuf,

  /// Output only data at or after this time in seconds
  #[arg(long = "begin", default_value_t = 0.0)]
  begin: f64,

  /// Output only data up to this time in seconds; end < begin means no
  /// upper bound
  #[arg(long = "end", default_value_t = -1.0)]
  end: f64,

  /// Resampling rate in Hz; values <= 0 use each sensor's declared rate
  #[arg(long = "resolution", default_value_t = -1)]
  resolution: i32,

  /// Output format (supported: csv, xml, dlog, svg)
  #[arg(long = "format", default_value = "xml")]
  format: String,
}

fn main() -> eyre::Result<()> {
  color_eyre::install()?;
  let args = Args::parse();

  // clap rejects non-numeric text, this rejects NaN and the infinities
  for (name, value) in [("begin", args.begin), ("end", args.end)] {
    if !value.is_finite() {
      return Err(Error::InvalidParameter { name,
                                           value: value.to_string() }.into());
    }
  }

  let request = ExportRequest::from_cli(args.begin, args.end, args.resolution);
  let exporter = OutputFormat::from_name(&args.format)?.exporter();

  let reader = open_reader(&args.file)?;
  check_resolution(reader.as_ref(), &request)?;

  let stdout = io::stdout();
  let mut output = BufWriter::new(stdout.lock());
  exporter.data_export(reader.as_ref(), &request, &mut output)?;
  output.flush()?;
  Ok(())
}
