// Copyright 2021 bmc::labs Gmbh. All rights reserved.
//
// Authors:
//   Florian Eich <florian@bmc-labs.com>
//   Jonas Reitemeyer <alumni@bmc-labs.com>

use super::{Error, ExportRequest, Reader, Result, Sensor};


/// Slack added to the upper bound when walking the resampling grid, so that
/// accumulated floating point error in `begin + i * interval` cannot drop
/// the final grid point.
const GRID_EPS: f64 = 1e-9;


/// Gates export on sampling rate availability. Runs once, after decode and
/// before any exporter: a sensor without a declared rate is only exportable
/// when the request carries a resolution.
pub fn check_resolution(reader: &dyn Reader,
                        request: &ExportRequest)
                        -> Result<()> {
  for sensor in reader.sensors() {
    if !sensor.has_declared_rate() && request.resolution().is_none() {
      return Err(Error::MissingResolution { path:   reader.path()
                                                          .to_owned(),
                                            sensor: sensor.name().clone(), });
    }
  }
  Ok(())
}


/// How a value is derived from the stored samples at a grid timestamp.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Policy {
  /// Zero-order hold: the value of the last sample at or before `t`, or
  /// the first sample when `t` precedes the whole recording.
  Hold,
  /// Linear interpolation between the bracketing samples, clamped to the
  /// first/last sample outside the recorded range.
  Linear,
}


/// Iterator over the windowed, resampled projection of one sensor.
///
/// Yields `(timestamp, value)` pairs on the grid `t = begin + i * interval`
/// while `t <= end`; with an unbounded request the grid stops at the
/// sensor's last recorded timestamp. Every exporter consumes this iterator,
/// which is what keeps the window semantics identical across formats.
pub struct Resample<'a> {
  sensor:   &'a Sensor,
  begin:    f64,
  end:      f64,
  interval: f64,
  policy:   Policy,
  step:     usize,
}

impl<'a> Resample<'a> {
  /// Builds a resampling walk with an explicit interval. `end = None`
  /// bounds the walk by the sensor's last sample; an empty sensor yields
  /// an empty walk.
  pub fn new(sensor: &'a Sensor,
             begin: f64,
             end: Option<f64>,
             interval: f64,
             policy: Policy)
             -> Self {
    debug_assert!(interval > 0.0, "resampling interval must be positive");

    let end = match (end, sensor.data().last_timestamp()) {
      (Some(end), _) if !sensor.is_empty() => end,
      (None, Some(last)) => last,
      _ => f64::NEG_INFINITY, // no samples, yield nothing
    };

    Self { sensor,
           begin,
           end,
           interval,
           policy,
           step: 0 }
  }

  /// Builds the walk for one export request, using the request's effective
  /// sampling interval for this sensor.
  pub fn for_request(sensor: &'a Sensor,
                     request: &ExportRequest,
                     policy: Policy)
                     -> Result<Self> {
    Ok(Self::new(sensor,
                 request.begin(),
                 request.end(),
                 request.effective_interval(sensor)?,
                 policy))
  }

  fn value_at(&self, t: f64) -> f64 {
    let timestamps = self.sensor.data().timestamps();
    let values = self.sensor.data().values();

    // index of the first sample strictly after t
    let upper = timestamps.partition_point(|&stamp| stamp <= t);

    match self.policy {
      Policy::Hold => {
        if upper == 0 {
          values[0]
        } else {
          values[upper - 1]
        }
      }
      Policy::Linear => {
        if upper == 0 {
          values[0]
        } else if upper == timestamps.len() {
          values[upper - 1]
        } else {
          let (t0, t1) = (timestamps[upper - 1], timestamps[upper]);
          let (v0, v1) = (values[upper - 1], values[upper]);
          if t1 - t0 <= f64::EPSILON {
            v0
          } else {
            v0 + (v1 - v0) * (t - t0) / (t1 - t0)
          }
        }
      }
    }
  }
}

impl Iterator for Resample<'_> {
  type Item = (f64, f64);

  fn next(&mut self) -> Option<Self::Item> {
    let t = self.begin + self.step as f64 * self.interval;
    if t > self.end + GRID_EPS {
      return None;
    }
    self.step += 1;
    Some((t, self.value_at(t)))
  }
}


#[cfg(test)]
mod tests {
  use super::{super::SensorData, *};
  use pretty_assertions::assert_eq;
  use std::path::{Path, PathBuf};


  struct FakeReader {
    path:    PathBuf,
    sensors: Vec<Sensor>,
  }

  impl Reader for FakeReader {
    fn path(&self) -> &Path {
      &self.path
    }

    fn sensors(&self) -> &[Sensor] {
      &self.sensors
    }
  }

  /// One sensor, samples at integer seconds 0..10 with values 0..10.
  fn ramp_sensor(sampling_interval: f64) -> Sensor {
    let timestamps: Vec<f64> = (0..10).map(|i| i as f64).collect();
    Sensor::new("ramp".to_string(),
                "V".to_string(),
                sampling_interval,
                SensorData::from_tv(timestamps.clone(), timestamps))
  }

  #[test]
  fn resolution_gate_test() {
    let declared = FakeReader { path:    "declared.grim".into(),
                                sensors: vec![ramp_sensor(1.0)], };
    let undeclared = FakeReader { path:    "trip.meta".into(),
                                  sensors: vec![ramp_sensor(1.0),
                                                ramp_sensor(0.0)], };

    let no_resolution = ExportRequest::from_cli(0.0, -1.0, -1);
    let with_resolution = ExportRequest::from_cli(0.0, -1.0, 2);

    assert_eq!(Ok(()), check_resolution(&declared, &no_resolution));
    assert_eq!(Err(Error::MissingResolution { path:   "trip.meta".into(),
                                              sensor: "ramp".to_string(), }),
               check_resolution(&undeclared, &no_resolution));
    assert_eq!(Ok(()), check_resolution(&undeclared, &with_resolution));
  }

  #[test]
  fn window_test() {
    let sensor = ramp_sensor(1.0);
    let request = ExportRequest::from_cli(2.0, 5.0, -1);

    let samples: Vec<_> =
      Resample::for_request(&sensor, &request, Policy::Hold).unwrap()
                                                            .collect();
    assert_eq!(vec![(2.0, 2.0), (3.0, 3.0), (4.0, 4.0), (5.0, 5.0)], samples);
  }

  #[test]
  fn window_containment_test() {
    let sensor = ramp_sensor(1.0);

    for (begin, end) in [(0.0, -1.0), (2.5, 7.25), (0.3, 0.3), (8.0, 99.0)] {
      let request = ExportRequest::from_cli(begin, end, 4);
      for (t, _) in Resample::for_request(&sensor, &request, Policy::Hold)
          .unwrap()
      {
        assert!(t >= begin);
        if end >= begin {
          assert!(t <= end + GRID_EPS);
        }
      }
    }
  }

  #[test]
  fn unbounded_end_test() {
    // without an end bound the grid stops at the last recorded timestamp
    let sensor = ramp_sensor(1.0);
    let request = ExportRequest::from_cli(7.0, -1.0, -1);

    let samples: Vec<_> =
      Resample::for_request(&sensor, &request, Policy::Hold).unwrap()
                                                            .collect();
    assert_eq!(vec![(7.0, 7.0), (8.0, 8.0), (9.0, 9.0)], samples);
  }

  #[test]
  fn resolution_spacing_test() {
    // 2 Hz resampling of an undeclared-rate sensor emits 0.5s spacing
    let sensor = ramp_sensor(0.0);
    let request = ExportRequest::from_cli(0.0, 2.0, 2);

    let timestamps: Vec<f64> =
      Resample::for_request(&sensor, &request, Policy::Hold).unwrap()
                                                            .map(|(t, _)| t)
                                                            .collect();
    assert_eq!(vec![0.0, 0.5, 1.0, 1.5, 2.0], timestamps);
  }

  #[test]
  fn hold_policy_test() {
    let sensor = ramp_sensor(1.0);
    let request = ExportRequest::from_cli(0.25, 1.75, 2);

    let samples: Vec<_> =
      Resample::for_request(&sensor, &request, Policy::Hold).unwrap()
                                                            .collect();
    assert_eq!(vec![(0.25, 0.0), (0.75, 0.0), (1.25, 1.0), (1.75, 1.0)],
               samples);
  }

  #[test]
  fn linear_policy_test() {
    let sensor = ramp_sensor(1.0);
    let request = ExportRequest::from_cli(0.25, 1.75, 2);

    let samples: Vec<_> =
      Resample::for_request(&sensor, &request, Policy::Linear).unwrap()
                                                              .collect();
    assert_eq!(vec![(0.25, 0.25), (0.75, 0.75), (1.25, 1.25), (1.75, 1.75)],
               samples);
  }

  #[test]
  fn clamping_test() {
    // grid points before the first and after the last sample clamp to them
    let data = SensorData::from_tv(vec![2.0, 3.0], vec![20.0, 30.0]);
    let sensor = Sensor::new("s".to_string(), String::new(), 1.0, data);

    let samples: Vec<_> =
      Resample::new(&sensor, 0.0, Some(5.0), 1.0, Policy::Linear).collect();
    assert_eq!(vec![(0.0, 20.0),
                    (1.0, 20.0),
                    (2.0, 20.0),
                    (3.0, 30.0),
                    (4.0, 30.0),
                    (5.0, 30.0)],
               samples);
  }

  #[test]
  fn empty_sensor_test() {
    let sensor =
      Sensor::new("void".to_string(), String::new(), 1.0, SensorData::default());

    let request = ExportRequest::from_cli(0.0, 10.0, -1);
    assert_eq!(0,
               Resample::for_request(&sensor, &request, Policy::Hold).unwrap()
                                                                     .count());

    let request = ExportRequest::from_cli(0.0, -1.0, -1);
    assert_eq!(0,
               Resample::for_request(&sensor, &request, Policy::Hold).unwrap()
                                                                     .count());
  }
}
