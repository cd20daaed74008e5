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
use byteorder::{BigEndian, WriteBytesExt};
use chrono::Utc;
use quick_xml::escape::escape;
use std::io::Write;


/// Exporter for the `dlog` output format: the power-analyzer binary log the
/// dlog reader decodes, so recordings can be converted back into it.
///
/// The container declares a single frame interval, so every channel is
/// resampled onto one common grid: `1/resolution` when a resolution was
/// requested, the first sensor's declared interval otherwise. Sample
/// selection is zero-order hold. A frame is only written while every
/// channel can contribute a value.
#[derive(Debug, Default)]
pub struct DlogExporter;

impl Exporter for DlogExporter {
  fn data_export(&self,
                 reader: &dyn Reader,
                 request: &ExportRequest,
                 output: &mut dyn Write)
                 -> Result<()> {
    let sensors = reader.sensors();

    let tint = match (request.resolution(), sensors.first()) {
      (Some(resolution), _) => 1.0 / resolution,
      (None, Some(first)) => request.effective_interval(first)?,
      (None, None) => 1.0, // no channels, the value is arbitrary
    };

    // one shared upper bound so all channel walks have equal length
    let end = request.end().or_else(|| {
                             sensors.iter()
                                    .filter_map(|sensor| {
                                      sensor.data().last_timestamp()
                                    })
                                    .fold(None, |max: Option<f64>, last| {
                                      Some(max.map_or(last, |m| m.max(last)))
                                    })
                           });

    writeln!(output, "<dlog>")?;
    writeln!(output, "<frame>")?;
    writeln!(output, "<tint>{}</tint>", tint)?;
    writeln!(output, "<date>{}</date>", Utc::now().to_rfc3339())?;
    writeln!(output, "</frame>")?;
    for sensor in sensors {
      writeln!(output,
               "<channel><ident>{}</ident><unit>{}</unit></channel>",
               escape(sensor.name().as_str()),
               escape(sensor.unit().as_str()))?;
    }
    writeln!(output, "</dlog>")?;

    let mut walks: Vec<Resample> =
      sensors.iter()
             .map(|sensor| {
               Resample::new(sensor, request.begin(), end, tint, Policy::Hold)
             })
             .collect();

    if walks.is_empty() {
      return Ok(());
    }

    'frames: loop {
      let mut frame = Vec::with_capacity(walks.len());
      for walk in walks.iter_mut() {
        match walk.next() {
          Some((_, value)) => frame.push(value),
          None => break 'frames,
        }
      }
      for value in frame {
        output.write_f32::<BigEndian>(value as f32)?;
      }
    }
    Ok(())
  }
}
