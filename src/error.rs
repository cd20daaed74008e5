// Copyright 2021 bmc::labs Gmbh. All rights reserved.
//
// Authors:
//   Florian Eich <florian@bmc-labs.com>
//   Jonas Reitemeyer <alumni@bmc-labs.com>

use std::{io,
          path::{Path, PathBuf},
          result};


/// mconv's result type, used throughout the library.
pub type Result<T> = result::Result<T, Error>;


/// Everything that can go wrong between reading an input recording and
/// writing the converted output. Every variant carries the offending value
/// or path so the user can act on it without re-running.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum Error {
  #[error("parameter '{name}' is not usable: {value}")]
  InvalidParameter { name: &'static str, value: String },

  #[error("no reader registered for input '{0}'")]
  UnsupportedInputFormat(String),

  #[error("no exporter registered for format '{0}'")]
  UnsupportedOutputFormat(String),

  #[error("'{}' declares no sampling rate for sensor '{}', please set \
           --resolution", .path.display(), .sensor)]
  MissingResolution { path: PathBuf, sensor: String },

  #[error("cannot decode '{}': {}", .path.display(), .reason)]
  Decode { path: PathBuf, reason: String },

  #[error("export failed: {0}")]
  Encode(String),
}

impl Error {
  /// Builds a `Decode` error from anything printable. Readers funnel all of
  /// their failure modes - I/O, truncation, malformed headers - through this.
  pub fn decode<R>(path: &Path, reason: R) -> Self
    where R: ToString
  {
    Self::Decode { path:   path.to_owned(),
                   reason: reason.to_string(), }
  }
}

/// Write-side I/O failures surface through `?` in exporters; read-side I/O
/// is always mapped to `Decode` explicitly, with the path attached.
impl From<io::Error> for Error {
  fn from(error: io::Error) -> Self {
    Self::Encode(error.to_string())
  }
}

impl From<csv::Error> for Error {
  fn from(error: csv::Error) -> Self {
    Self::Encode(error.to_string())
  }
}
