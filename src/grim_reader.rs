// Copyright 2021 bmc::labs Gmbh. All rights reserved.
//
// Author: Florian Eich <florian@bmc-labs.com>

use super::{Error, Reader, Result, Sensor, SensorData};
use std::{fs,
          path::{Path, PathBuf}};


/// Reader for `.grim` files: generic recorded instrument measurements in a
/// plain text layout. A sensor block is opened by a header line
///
/// ```text
/// :<name> <interval> [unit]
/// ```
///
/// followed by one `<timestamp> <value>` line per sample. Blank lines and
/// `#` comments are ignored. An interval of `0` declares "no rate".
#[derive(Debug, PartialEq)]
pub struct GrimReader {
  path:    PathBuf,
  sensors: Vec<Sensor>,
}

/// Accumulates one sensor block while its samples are still being read.
struct Block {
  name:     String,
  unit:     String,
  interval: f64,
  data:     SensorData,
}

impl Block {
  fn into_sensor(self) -> Sensor {
    Sensor::new(self.name, self.unit, self.interval, self.data)
  }
}

impl GrimReader {
  pub fn load(path: &Path) -> Result<Self> {
    let text =
      fs::read_to_string(path).map_err(|err| Error::decode(path, err))?;
    Self::from_text(&text, path)
  }

  pub fn from_text(text: &str, path: &Path) -> Result<Self> {
    let malformed = |number: usize, what: &str| {
      Error::decode(path, format!("line {}: {}", number + 1, what))
    };

    let mut sensors = Vec::new();
    let mut block: Option<Block> = None;

    for (number, line) in text.lines().enumerate() {
      let line = line.trim();
      if line.is_empty() || line.starts_with('#') {
        continue;
      }

      if let Some(header) = line.strip_prefix(':') {
        sensors.extend(block.take().map(Block::into_sensor));

        let mut fields = header.split_whitespace();
        let name =
          fields.next()
                .ok_or_else(|| malformed(number, "sensor header without \
                                                  a name"))?;
        let interval =
          fields.next()
                .and_then(|field| field.parse::<f64>().ok())
                .ok_or_else(|| malformed(number, "sensor header without \
                                                  an interval"))?;
        let unit = fields.next().unwrap_or_default();

        block = Some(Block { name:     name.to_string(),
                             unit:     unit.to_string(),
                             interval,
                             data:     SensorData::default(), });
        continue;
      }

      let block = block.as_mut()
                       .ok_or_else(|| malformed(number, "sample before any \
                                                         sensor header"))?;

      let mut fields = line.split_whitespace();
      let (timestamp, value) =
        match (fields.next().map(str::parse::<f64>),
               fields.next().map(str::parse::<f64>))
        {
          (Some(Ok(timestamp)), Some(Ok(value))) => (timestamp, value),
          _ => {
            return Err(malformed(number,
                                 &format!("malformed sample '{}'", line)))
          }
        };

      if let Some(last) = block.data.last_timestamp() {
        if timestamp < last {
          return Err(malformed(number,
                               &format!("timestamps not in order ({} \
                                         after {})",
                                        timestamp, last)));
        }
      }
      block.data.push(timestamp, value);
    }
    sensors.extend(block.take().map(Block::into_sensor));

    Ok(Self { path: path.to_owned(),
              sensors })
  }
}

impl Reader for GrimReader {
  fn path(&self) -> &Path {
    &self.path
  }

  fn sensors(&self) -> &[Sensor] {
    &self.sensors
  }
}
