// Copyright 2021 bmc::labs Gmbh. All rights reserved.
//
// Authors:
//   Florian Eich <florian@bmc-labs.com>
//   Jonas Reitemeyer <alumni@bmc-labs.com>

use super::{Error, Reader, Result, Sensor};
use getset::CopyGetters;
use std::io::Write;


/// Time window and resampling parameters governing one export invocation.
///
/// The CLI sentinels (`end < begin` for "no upper bound", `resolution <= 0`
/// for "use each sensor's declared rate") are converted to explicit
/// `Option`s here, at the boundary, so nothing downstream compares against
/// magic numbers.
#[derive(Clone, Copy, Debug, PartialEq, CopyGetters)]
#[getset(get_copy = "pub")]
pub struct ExportRequest {
  /// Inclusive lower bound of the window, in seconds.
  begin:      f64,
  /// Inclusive upper bound of the window; `None` means unbounded.
  end:        Option<f64>,
  /// Resampling rate in Hz; `None` means each sensor's declared rate.
  resolution: Option<f64>,
}

impl ExportRequest {
  pub fn new(begin: f64, end: Option<f64>, resolution: Option<f64>) -> Self {
    Self { begin,
           end,
           resolution }
  }

  /// Builds a request from the raw CLI values, mapping the sentinels.
  pub fn from_cli(begin: f64, end: f64, resolution: i32) -> Self {
    Self::new(begin,
              if end < begin { None } else { Some(end) },
              if resolution <= 0 {
                None
              } else {
                Some(f64::from(resolution))
              })
  }

  /// The sampling interval actually used for `sensor` during this export:
  /// `1/resolution` when a resolution was requested, the sensor's own
  /// declared interval otherwise.
  ///
  /// `window::check_resolution` rejects requests where neither is usable
  /// before any exporter runs.
  pub fn effective_interval(&self, sensor: &Sensor) -> Result<f64> {
    if let Some(resolution) = self.resolution {
      return Ok(1.0 / resolution);
    }
    if sensor.has_declared_rate() {
      return Ok(sensor.sampling_interval());
    }
    Err(Error::Encode(format!("sensor '{}' has no usable sampling interval",
                              sensor.name())))
  }
}

impl Default for ExportRequest {
  fn default() -> Self {
    Self::new(0.0, None, None)
  }
}


/// Common surface of every output format encoder.
///
/// An exporter borrows the reader immutably for the duration of one call,
/// writes the windowed, resampled projection of every sensor to `output`
/// and nothing else - it never mutates the reader's data.
pub trait Exporter {
  fn data_export(&self,
                 reader: &dyn Reader,
                 request: &ExportRequest,
                 output: &mut dyn Write)
                 -> Result<()>;
}
