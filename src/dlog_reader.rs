// Copyright 2021 bmc::labs Gmbh. All rights reserved.
//
// Authors:
//   Florian Eich <florian@bmc-labs.com>
//   Jonas Reitemeyer <alumni@bmc-labs.com>

use super::{Error, Reader, Result, Sensor, SensorData};
use byteorder::{BigEndian, ReadBytesExt};
use chrono::{DateTime, FixedOffset};
use getset::{CopyGetters, Getters};
use quick_xml::events::Event;
use std::{fs,
          path::{Path, PathBuf},
          str};


/// Marks the end of the XML preamble; everything after it is sample data.
const PREAMBLE_END: &[u8] = b"</dlog>";


/// Reader for `.dlog` files, the power-analyzer binary log: an XML preamble
/// declaring the frame interval (`<tint>`), the recording date and one
/// `<channel>` element per sensor, terminated by `</dlog>`, followed by raw
/// big endian `f32` samples interleaved one value per channel per frame.
#[derive(Debug, PartialEq, CopyGetters, Getters)]
pub struct DlogReader {
  path:    PathBuf,
  sensors: Vec<Sensor>,
  /// Frame interval in seconds, as declared by the preamble.
  #[getset(get_copy = "pub")]
  tint:    f64,
  /// Recording date, when the preamble declares one.
  #[getset(get = "pub")]
  date:    Option<DateTime<FixedOffset>>,
}

/// Preamble contents before they are joined with the sample payload.
#[derive(Default)]
struct Preamble {
  tint:     Option<f64>,
  date:     Option<DateTime<FixedOffset>>,
  channels: Vec<(String, String)>, // (ident, unit)
}

impl DlogReader {
  pub fn load(path: &Path) -> Result<Self> {
    let bytes = fs::read(path).map_err(|err| Error::decode(path, err))?;
    Self::from_bytes(&bytes, path)
  }

  pub fn from_bytes(bytes: &[u8], path: &Path) -> Result<Self> {
    let split = bytes.windows(PREAMBLE_END.len())
                     .position(|window| window == PREAMBLE_END)
                     .ok_or_else(|| {
                       Error::decode(path, "no </dlog> preamble terminator")
                     })?
                + PREAMBLE_END.len();

    let preamble =
      str::from_utf8(&bytes[..split]).map_err(|_| {
                                       Error::decode(path,
                                                     "preamble is not \
                                                      valid UTF-8")
                                     })?;
    let preamble = Self::parse_preamble(preamble, path)?;

    let tint = match preamble.tint {
      Some(tint) if tint > 0.0 => tint,
      _ => {
        return Err(Error::decode(path, "missing or non-positive <tint>"))
      }
    };

    // the payload starts right after the terminator, modulo one newline
    let mut payload = &bytes[split..];
    if payload.first() == Some(&b'\n') {
      payload = &payload[1..];
    }

    let channel_count = preamble.channels.len();
    let frame_size = 4 * channel_count;
    if channel_count == 0 {
      if !payload.is_empty() {
        return Err(Error::decode(path, "sample data without channels"));
      }
    } else if payload.len() % frame_size != 0 {
      return Err(Error::decode(path, "truncated sample frame"));
    }

    let frame_count = if channel_count == 0 {
      0
    } else {
      payload.len() / frame_size
    };

    let timestamps: Vec<f64> =
      (0..frame_count).map(|frame| frame as f64 * tint).collect();
    let mut columns: Vec<Vec<f64>> =
      vec![Vec::with_capacity(frame_count); channel_count];

    let mut cursor = payload;
    for _ in 0..frame_count {
      for column in columns.iter_mut() {
        // length is already checked, the unwrap cannot fire
        let value = cursor.read_f32::<BigEndian>().unwrap();
        column.push(f64::from(value));
      }
    }

    let sensors = preamble.channels
                          .into_iter()
                          .zip(columns)
                          .map(|((ident, unit), values)| {
                            Sensor::new(ident,
                                        unit,
                                        tint,
                                        SensorData::from_tv(timestamps
                                                              .clone(),
                                                            values))
                          })
                          .collect();

    Ok(Self { path: path.to_owned(),
              sensors,
              tint,
              date: preamble.date })
  }

  fn parse_preamble(xml: &str, path: &Path) -> Result<Preamble> {
    let mut reader = quick_xml::Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut preamble = Preamble::default();
    let mut element = Vec::new();
    let mut in_channel = false;

    loop {
      match reader.read_event() {
        Ok(Event::Start(start)) => {
          element = start.name().as_ref().to_vec();
          if element == b"channel" {
            preamble.channels.push((String::new(), String::new()));
            in_channel = true;
          }
        }
        Ok(Event::End(end)) => {
          if end.name().as_ref() == b"channel" {
            in_channel = false;
          }
          element.clear();
        }
        Ok(Event::Text(text)) => {
          let text = text.unescape()
                         .map_err(|err| Error::decode(path, err))?
                         .into_owned();
          match element.as_slice() {
            b"tint" => {
              preamble.tint = Some(text.parse::<f64>().map_err(|_| {
                                     Error::decode(path,
                                                   format!("'{}' is not a \
                                                            valid <tint>",
                                                           text))
                                   })?)
            }
            b"date" => {
              preamble.date = DateTime::parse_from_rfc3339(&text).ok()
            }
            b"ident" if in_channel => {
              if let Some(channel) = preamble.channels.last_mut() {
                channel.0 = text;
              }
            }
            b"unit" if in_channel => {
              if let Some(channel) = preamble.channels.last_mut() {
                channel.1 = text;
              }
            }
            _ => {}
          }
        }
        Ok(Event::Eof) => break,
        Ok(_) => {}
        Err(err) => return Err(Error::decode(path, err)),
      }
    }

    Ok(preamble)
  }
}

impl Reader for DlogReader {
  fn path(&self) -> &Path {
    &self.path
  }

  fn sensors(&self) -> &[Sensor] {
    &self.sensors
  }
}
