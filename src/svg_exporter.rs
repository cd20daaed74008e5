// Copyright 2021 bmc::labs Gmbh. All rights reserved.
//
// Author: Jonas Reitemeyer <alumni@bmc-labs.com>

use super::{window::{Policy, Resample},
            Exporter,
            ExportRequest,
            Reader,
            Result};
use quick_xml::escape::escape;
use std::io::Write;


const WIDTH: f64 = 1000.0;
const HEIGHT: f64 = 400.0;
const MARGIN: f64 = 40.0;

const PALETTE: [&str; 6] =
  ["#1f77b4", "#ff7f0e", "#2ca02c", "#d62728", "#9467bd", "#8c564b"];


/// Exporter for the `svg` output format: a standalone line plot with one
/// polyline per sensor, all drawn into a fixed 1000x400 viewBox.
///
/// Sample selection is linear interpolation - the plot draws straight
/// segments between points anyway, so interpolating on the grid keeps the
/// drawn shape faithful at any resolution.
#[derive(Debug, Default)]
pub struct SvgExporter;

impl Exporter for SvgExporter {
  fn data_export(&self,
                 reader: &dyn Reader,
                 request: &ExportRequest,
                 output: &mut dyn Write)
                 -> Result<()> {
    let mut curves = Vec::new();
    for sensor in reader.sensors() {
      let points: Vec<(f64, f64)> =
        Resample::for_request(sensor, request, Policy::Linear)?.collect();
      curves.push((sensor.name().clone(), points));
    }

    // data ranges over all curves, with degenerate spans widened so the
    // projection below never divides by zero
    let (mut t_min, mut t_max) = (f64::INFINITY, f64::NEG_INFINITY);
    let (mut v_min, mut v_max) = (f64::INFINITY, f64::NEG_INFINITY);
    for &(t, v) in curves.iter().flat_map(|(_, points)| points.iter()) {
      t_min = t_min.min(t);
      t_max = t_max.max(t);
      v_min = v_min.min(v);
      v_max = v_max.max(v);
    }
    if t_min > t_max {
      (t_min, t_max) = (0.0, 1.0); // no data at all
    }
    if t_max - t_min <= 0.0 {
      t_max = t_min + 1.0;
    }
    if v_max - v_min <= 0.0 {
      v_max = v_min + 1.0;
    }

    let x = |t: f64| {
      MARGIN + (t - t_min) / (t_max - t_min) * (WIDTH - 2.0 * MARGIN)
    };
    let y = |v: f64| {
      HEIGHT - MARGIN - (v - v_min) / (v_max - v_min) * (HEIGHT - 2.0 * MARGIN)
    };

    writeln!(output,
             "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{w}\" \
              height=\"{h}\" viewBox=\"0 0 {w} {h}\">",
             w = WIDTH,
             h = HEIGHT)?;
    writeln!(output,
             "  <rect x=\"{m}\" y=\"{m}\" width=\"{w}\" height=\"{h}\" \
              fill=\"none\" stroke=\"#333\"/>",
             m = MARGIN,
             w = WIDTH - 2.0 * MARGIN,
             h = HEIGHT - 2.0 * MARGIN)?;

    for (index, (name, points)) in curves.iter().enumerate() {
      let stroke = PALETTE[index % PALETTE.len()];
      let path: Vec<String> =
        points.iter()
              .map(|&(t, v)| format!("{:.2},{:.2}", x(t), y(v)))
              .collect();
      writeln!(output,
               "  <polyline fill=\"none\" stroke=\"{}\" points=\"{}\">\
                <title>{}</title></polyline>",
               stroke,
               path.join(" "),
               escape(name.as_str()))?;
    }

    writeln!(output,
             "  <text x=\"{}\" y=\"{}\" font-size=\"12\">{} s</text>",
             MARGIN,
             HEIGHT - MARGIN / 2.0,
             t_min)?;
    writeln!(output,
             "  <text x=\"{}\" y=\"{}\" font-size=\"12\" \
              text-anchor=\"end\">{} s</text>",
             WIDTH - MARGIN,
             HEIGHT - MARGIN / 2.0,
             t_max)?;
    writeln!(output,
             "  <text x=\"{}\" y=\"{}\" font-size=\"12\">{}</text>",
             MARGIN / 4.0,
             HEIGHT - MARGIN,
             v_min)?;
    writeln!(output,
             "  <text x=\"{}\" y=\"{}\" font-size=\"12\">{}</text>",
             MARGIN / 4.0,
             MARGIN,
             v_max)?;
    writeln!(output, "</svg>")?;
    Ok(())
  }
}
