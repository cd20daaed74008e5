// Copyright 2021 bmc::labs Gmbh. All rights reserved.
//
// Authors:
//   Florian Eich <florian@bmc-labs.com>
//   Jonas Reitemeyer <alumni@bmc-labs.com>

use super::{window::{Policy, Resample},
            Exporter,
            ExportRequest,
            Reader,
            Result};
use std::io::Write;


/// Exporter for the `csv` output format: a `sensor,time,value` header and
/// one row per emitted sample, sensors in reader order.
///
/// Sample selection is zero-order hold - a converter must not invent values
/// between instrument readings.
#[derive(Debug, Default)]
pub struct CsvExporter;

impl Exporter for CsvExporter {
  fn data_export(&self,
                 reader: &dyn Reader,
                 request: &ExportRequest,
                 output: &mut dyn Write)
                 -> Result<()> {
    let mut writer = csv::Writer::from_writer(output);
    writer.write_record(["sensor", "time", "value"])?;

    for sensor in reader.sensors() {
      for (t, v) in Resample::for_request(sensor, request, Policy::Hold)? {
        writer.write_record([sensor.name().clone(),
                             t.to_string(),
                             v.to_string()])?;
      }
    }
    writer.flush()?;
    Ok(())
  }
}
