// Copyright 2021 bmc::labs Gmbh. All rights reserved.
//
// Author: Florian Eich <florian@bmc-labs.com>

use super::{Error, Reader, Result, Sensor, SensorData};
use quick_xml::events::{BytesStart, Event};
use std::{fs,
          path::{Path, PathBuf}};


/// Reader for `.xml` files: the document layout the XML exporter writes,
/// so mconv output can be fed back in.
///
/// ```xml
/// <measurement>
///   <sensor name="voltage" unit="V" interval="1">
///     <sample t="0" v="4.96"/>
///   </sensor>
/// </measurement>
/// ```
#[derive(Debug, PartialEq)]
pub struct XmlReader {
  path:    PathBuf,
  sensors: Vec<Sensor>,
}

impl XmlReader {
  pub fn load(path: &Path) -> Result<Self> {
    let text =
      fs::read_to_string(path).map_err(|err| Error::decode(path, err))?;
    Self::from_text(&text, path)
  }

  pub fn from_text(text: &str, path: &Path) -> Result<Self> {
    let mut reader = quick_xml::Reader::from_str(text);
    reader.config_mut().trim_text(true);

    let mut sensors: Vec<Sensor> = Vec::new();
    let mut block: Option<(String, String, f64, SensorData)> = None;

    loop {
      match reader.read_event() {
        Ok(Event::Start(ref start)) | Ok(Event::Empty(ref start)) => {
          match start.name().as_ref() {
            b"measurement" => {}
            b"sensor" => {
              sensors.extend(block.take().map(Self::into_sensor));

              let name = Self::attribute(start, "name", path)?;
              let unit =
                Self::attribute(start, "unit", path).unwrap_or_default();
              let interval = Self::number(start, "interval", path)?;
              block = Some((name, unit, interval, SensorData::default()));
            }
            b"sample" => {
              let (_, _, _, data) =
                block.as_mut().ok_or_else(|| {
                                Error::decode(path,
                                              "<sample> outside of a \
                                               <sensor> element")
                              })?;
              data.push(Self::number(start, "t", path)?,
                        Self::number(start, "v", path)?);
            }
            other => {
              return Err(Error::decode(path,
                                       format!("unexpected element <{}>",
                                               String::from_utf8_lossy(other))))
            }
          }
        }
        Ok(Event::End(ref end)) if end.name().as_ref() == b"sensor" => {
          sensors.extend(block.take().map(Self::into_sensor));
        }
        Ok(Event::Eof) => break,
        Ok(_) => {}
        Err(err) => return Err(Error::decode(path, err)),
      }
    }
    // a self-closing <sensor/> has no end tag, flush it here
    sensors.extend(block.take().map(Self::into_sensor));

    Ok(Self { path: path.to_owned(),
              sensors })
  }

  fn into_sensor(block: (String, String, f64, SensorData)) -> Sensor {
    let (name, unit, interval, data) = block;
    Sensor::new(name, unit, interval, data)
  }

  fn attribute(start: &BytesStart, name: &str, path: &Path) -> Result<String> {
    start.try_get_attribute(name)
         .map_err(|err| Error::decode(path, err))?
         .ok_or_else(|| {
           Error::decode(path,
                         format!("<{}> without '{}' attribute",
                                 String::from_utf8_lossy(start.name()
                                                              .as_ref()),
                                 name))
         })?
         .unescape_value()
         .map_err(|err| Error::decode(path, err))
         .map(|value| value.into_owned())
  }

  fn number(start: &BytesStart, name: &str, path: &Path) -> Result<f64> {
    let value = Self::attribute(start, name, path)?;
    value.parse::<f64>().map_err(|_| {
                          Error::decode(path,
                                        format!("'{}' is not a valid '{}' \
                                                 attribute",
                                                value, name))
                        })
  }
}

impl Reader for XmlReader {
  fn path(&self) -> &Path {
    &self.path
  }

  fn sensors(&self) -> &[Sensor] {
    &self.sensors
  }
}
