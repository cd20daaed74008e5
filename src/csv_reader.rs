// Copyright 2021 bmc::labs Gmbh. All rights reserved.
//
// Authors:
//   Florian Eich <florian@bmc-labs.com>
//   Jonas Reitemeyer <alumni@bmc-labs.com>

use super::{Error, Reader, Result, Sensor, SensorData};
use std::{fs,
          path::{Path, PathBuf}};


/// Reader for `.csv` files: a header row `time,<name>,...` followed by rows
/// of floats, the first column being the timestamp shared by all sensors.
///
/// CSV declares no rate; the nominal sampling interval is derived from the
/// spacing of the first two rows (0.0 when there are fewer than two).
#[derive(Debug, PartialEq)]
pub struct CsvReader {
  path:    PathBuf,
  sensors: Vec<Sensor>,
}

impl CsvReader {
  pub fn load(path: &Path) -> Result<Self> {
    let bytes = fs::read(path).map_err(|err| Error::decode(path, err))?;
    Self::from_bytes(&bytes, path)
  }

  pub fn from_bytes(bytes: &[u8], path: &Path) -> Result<Self> {
    let mut csv = csv::Reader::from_reader(bytes);

    let headers =
      csv.headers().map_err(|err| Error::decode(path, err))?.clone();
    if headers.is_empty() {
      return Err(Error::decode(path, "missing header row"));
    }
    let names: Vec<String> =
      headers.iter().skip(1).map(str::to_string).collect();

    let mut timestamps = Vec::new();
    let mut columns: Vec<Vec<f64>> = vec![Vec::new(); names.len()];

    for (number, record) in csv.records().enumerate() {
      let record = record.map_err(|err| Error::decode(path, err))?;
      if record.len() != names.len() + 1 {
        return Err(Error::decode(path,
                                 format!("row {}: expected {} fields, got {}",
                                         number + 2,
                                         names.len() + 1,
                                         record.len())));
      }

      let mut fields = record.iter().map(|field| {
                                      field.trim().parse::<f64>().map_err(|_| {
                                        Error::decode(path,
                                                      format!("row {}: '{}' \
                                                               is not a \
                                                               number",
                                                              number + 2,
                                                              field))
                                      })
                                    });

      timestamps.push(fields.next().unwrap()?);
      for column in columns.iter_mut() {
        column.push(fields.next().unwrap()?);
      }
    }

    // nominal rate from the first two rows; a bare CSV declares none
    let interval = if timestamps.len() >= 2 {
      timestamps[1] - timestamps[0]
    } else {
      0.0
    };

    let sensors = names.into_iter()
                       .zip(columns)
                       .map(|(name, values)| {
                         Sensor::new(name,
                                     String::new(),
                                     interval,
                                     SensorData::from_tv(timestamps.clone(),
                                                         values))
                       })
                       .collect();

    Ok(Self { path: path.to_owned(),
              sensors })
  }
}

impl Reader for CsvReader {
  fn path(&self) -> &Path {
    &self.path
  }

  fn sensors(&self) -> &[Sensor] {
    &self.sensors
  }
}
