// Copyright 2021 bmc::labs Gmbh. All rights reserved.
//
// Authors:
//   Florian Eich <florian@bmc-labs.com>
//   Jonas Reitemeyer <alumni@bmc-labs.com>

use getset::{CopyGetters, Getters, MutGetters};
use std::{iter, slice, vec};


/// One logical measurement channel decoded from an input file, with its
/// metadata and the full sample sequence.
#[derive(Clone, Debug, Default, PartialEq, CopyGetters, Getters)]
pub struct Sensor {
  #[getset(get = "pub")]
  name: String,
  #[getset(get = "pub")]
  unit: String, // TODO eventually should be kissunits (crate) (?)
  /// Seconds between consecutive samples as declared by the source format.
  /// `<= 0.0` means the format declares no rate (event-driven recordings).
  #[getset(get_copy = "pub")]
  sampling_interval: f64,
  #[getset(get = "pub")]
  data: SensorData,
}

impl Sensor {
  pub fn new(name: String,
             unit: String,
             sampling_interval: f64,
             data: SensorData)
             -> Self {
    Self { name,
           unit,
           sampling_interval,
           data }
  }

  /// Whether the source format declared a usable sampling rate.
  pub fn has_declared_rate(&self) -> bool {
    self.sampling_interval > 0.0
  }

  pub fn len(&self) -> usize {
    self.data().len()
  }

  pub fn is_empty(&self) -> bool {
    self.len() == 0
  }
}


/// Holds the sample sequence of a sensor as parallel timestamp/value
/// buffers. Timestamps are non-decreasing but need not be evenly spaced,
/// even when the sensor declares a rate.
#[derive(Clone, Debug, Default, PartialEq, Getters, MutGetters)]
#[getset(get = "pub", get_mut = "pub")]
pub struct SensorData {
  timestamps: Vec<f64>,
  values:     Vec<f64>,
}

impl SensorData {
  /// Creates a new `SensorData` object from buffers `t` (timestamps) and
  /// `v` (values), which must be of equal length.
  pub fn from_tv(timestamps: Vec<f64>, values: Vec<f64>) -> Self {
    assert_eq!(timestamps.len(),
               values.len(),
               "number of timestamps not equivalent to number of values");
    Self { timestamps, values }
  }

  pub fn push(&mut self, timestamp: f64, value: f64) {
    self.timestamps.push(timestamp);
    self.values.push(value);
  }

  pub fn first_timestamp(&self) -> Option<f64> {
    self.timestamps.first().copied()
  }

  pub fn last_timestamp(&self) -> Option<f64> {
    self.timestamps.last().copied()
  }

  /// Non-consuming sample walk in `(timestamp, value)` pairs.
  pub fn iter(&self) -> SampleIter<'_> {
    self.timestamps
        .iter()
        .copied()
        .zip(self.values.iter().copied())
  }

  pub fn len(&self) -> usize {
    assert!(self.timestamps.len() == self.values.len(),
            "number of timestamps not equivalent to number of values");
    self.timestamps.len()
  }

  pub fn is_empty(&self) -> bool {
    self.len() == 0usize
  }
}

pub type SampleIter<'a> = iter::Zip<iter::Copied<slice::Iter<'a, f64>>,
                                    iter::Copied<slice::Iter<'a, f64>>>;

impl IntoIterator for SensorData {
  type IntoIter = iter::Zip<vec::IntoIter<f64>, vec::IntoIter<f64>>;
  type Item = (f64, f64);

  fn into_iter(self) -> Self::IntoIter {
    self.timestamps.into_iter().zip(self.values)
  }
}


#[cfg(test)]
mod tests {
  use super::*;
  use pretty_assertions::{assert_eq, assert_ne};


  fn ramp(len: usize) -> SensorData {
    let timestamps: Vec<f64> = (0..len).map(|i| i as f64).collect();
    SensorData::from_tv(timestamps.clone(), timestamps)
  }

  #[test]
  fn sensor_test() {
    let sensor =
      Sensor::new("warbl".to_string(), "garbl".to_string(), 1.0, ramp(10));
    assert_eq!("warbl", sensor.name());
    assert_eq!("garbl", sensor.unit());
    assert_eq!(1.0, sensor.sampling_interval());
    assert_eq!(true, sensor.has_declared_rate());
    assert_eq!(false, sensor.is_empty());
    assert_eq!(10, sensor.len());

    let other =
      Sensor::new("foo".to_string(), "bar".to_string(), 0.0, ramp(10));
    assert_ne!(sensor, other);
    assert_eq!(false, other.has_declared_rate());
  }

  #[test]
  fn sensor_data_test() {
    let data = ramp(4);
    assert_eq!(Some(0.0), data.first_timestamp());
    assert_eq!(Some(3.0), data.last_timestamp());
    assert_eq!(vec![(0.0, 0.0), (1.0, 1.0), (2.0, 2.0), (3.0, 3.0)],
               data.iter().collect::<Vec<_>>());
    assert_eq!(data.iter().collect::<Vec<_>>(),
               data.clone().into_iter().collect::<Vec<_>>());

    let mut data = SensorData::default();
    assert_eq!(true, data.is_empty());
    assert_eq!(None, data.last_timestamp());
    data.push(0.5, 42.0);
    assert_eq!(1, data.len());
    assert_eq!(Some(0.5), data.first_timestamp());
  }

  #[test]
  #[should_panic]
  fn sensor_data_from_tv_panic_test() {
    let _panic = SensorData::from_tv(vec![0.0; 42], vec![0.0; 1337]);
  }

  #[test]
  #[should_panic]
  fn sensor_data_len_panic_test() {
    let mut data = ramp(3);

    // add a timestamp and assert that we panic when asking for len because
    // we now have more timestamps than values
    data.timestamps_mut().push(123.456);
    let _panic = data.len();
  }
}
