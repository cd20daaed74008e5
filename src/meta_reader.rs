// Copyright 2021 bmc::labs Gmbh. All rights reserved.
//
// Author: Jonas Reitemeyer <alumni@bmc-labs.com>

use super::{Error, Reader, Result, Sensor, SensorData};
use chrono::{DateTime, FixedOffset};
use getset::Getters;
use std::{fs,
          path::{Path, PathBuf}};


/// Reader for `.meta` files: mobile telemetry dumps in a line-oriented
/// key/value layout.
///
/// ```text
/// # comment
/// device=SM-G960F
/// start=2021-03-04T08:45:00+01:00
/// column.0=battery_level
/// column.1=screen_state
/// 0;0.000;100
/// 1;0.000;1
/// 0;12.410;99
/// ```
///
/// Rows are events, not frames: every sensor is decoded with
/// `sampling_interval = 0.0` (no declared rate), so exporting a `.meta`
/// recording requires a user-supplied resolution.
#[derive(Debug, PartialEq, Getters)]
pub struct MetaReader {
  path:    PathBuf,
  sensors: Vec<Sensor>,
  /// Device identity as dumped by the telemetry agent.
  #[getset(get = "pub")]
  device:  String,
  /// Wall-clock time of the recording's zero timestamp.
  #[getset(get = "pub")]
  start:   Option<DateTime<FixedOffset>>,
}

impl MetaReader {
  pub fn load(path: &Path) -> Result<Self> {
    let text =
      fs::read_to_string(path).map_err(|err| Error::decode(path, err))?;
    Self::from_text(&text, path)
  }

  pub fn from_text(text: &str, path: &Path) -> Result<Self> {
    let malformed = |number: usize, what: String| {
      Error::decode(path, format!("line {}: {}", number + 1, what))
    };

    let mut device = String::new();
    let mut start = None;
    let mut columns: Vec<(usize, String)> = Vec::new();
    let mut data: Vec<SensorData> = Vec::new();

    for (number, line) in text.lines().enumerate() {
      let line = line.trim();
      if line.is_empty() || line.starts_with('#') {
        continue;
      }

      if let Some((key, value)) = line.split_once('=') {
        match key {
          "device" => device = value.to_string(),
          "start" => {
            start = Some(DateTime::parse_from_rfc3339(value).map_err(|_| {
                      malformed(number,
                                format!("'{}' is not an RFC3339 timestamp",
                                        value))
                    })?)
          }
          _ => {
            let index =
              key.strip_prefix("column.")
                 .and_then(|index| index.parse::<usize>().ok())
                 .ok_or_else(|| {
                   malformed(number, format!("unknown key '{}'", key))
                 })?;
            columns.push((index, value.to_string()));
            data.push(SensorData::default());
          }
        }
        continue;
      }

      let mut fields = line.split(';');
      let event = (fields.next().map(str::parse::<usize>),
                   fields.next().map(str::parse::<f64>),
                   fields.next().map(str::parse::<f64>));
      let (column, timestamp, value) = match event {
        (Some(Ok(column)), Some(Ok(timestamp)), Some(Ok(value))) => {
          (column, timestamp, value)
        }
        _ => {
          return Err(malformed(number,
                               format!("malformed event row '{}'", line)))
        }
      };

      let slot =
        columns.iter()
               .position(|(index, _)| *index == column)
               .ok_or_else(|| {
                 malformed(number, format!("undeclared column {}", column))
               })?;
      data[slot].push(timestamp, value);
    }

    let sensors = columns.into_iter()
                         .zip(data)
                         .map(|((_, name), data)| {
                           Sensor::new(name, String::new(), 0.0, data)
                         })
                         .collect();

    Ok(Self { path: path.to_owned(),
              sensors,
              device,
              start })
  }
}

impl Reader for MetaReader {
  fn path(&self) -> &Path {
    &self.path
  }

  fn sensors(&self) -> &[Sensor] {
    &self.sensors
  }
}
