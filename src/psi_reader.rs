// Copyright 2021 bmc::labs Gmbh. All rights reserved.
//
// Authors:
//   Florian Eich <florian@bmc-labs.com>
//   Jonas Reitemeyer <alumni@bmc-labs.com>

use super::{Error, Reader, Result, Sensor, SensorData};
use byteorder::{LittleEndian, ReadBytesExt};
use std::{fs,
          io::Read,
          path::{Path, PathBuf}};


const MAGIC: &[u8; 4] = b"PSI1";


/// Reader for `.psi` files: the power-scale instrument binary layout.
///
/// The file opens with the magic `PSI1` and a little endian `u16` channel
/// count. Each channel header holds a `u8`-length-prefixed name, a
/// `u8`-length-prefixed unit, an `f64` sample interval and a `u32` sample
/// count; the headers are followed by each channel's samples as contiguous
/// `f32` blocks, in header order. Timestamps are implicit: `i * interval`.
#[derive(Debug, PartialEq)]
pub struct PsiReader {
  path:    PathBuf,
  sensors: Vec<Sensor>,
}

struct ChannelHeader {
  name:     String,
  unit:     String,
  interval: f64,
  count:    usize,
}

impl PsiReader {
  pub fn load(path: &Path) -> Result<Self> {
    let bytes = fs::read(path).map_err(|err| Error::decode(path, err))?;
    Self::from_bytes(&bytes, path)
  }

  pub fn from_bytes(bytes: &[u8], path: &Path) -> Result<Self> {
    let truncated = |what: &str| {
      Error::decode(path, format!("truncated {}", what))
    };

    let mut cursor = bytes;

    let mut magic = [0u8; 4];
    cursor.read_exact(&mut magic)
          .map_err(|_| truncated("magic"))?;
    if &magic != MAGIC {
      return Err(Error::decode(path, "not a PSI file (bad magic)"));
    }

    let channel_count = cursor.read_u16::<LittleEndian>()
                              .map_err(|_| truncated("header"))?
                        as usize;

    let mut headers = Vec::with_capacity(channel_count);
    for _ in 0..channel_count {
      let name = Self::read_string(&mut cursor, path)?;
      let unit = Self::read_string(&mut cursor, path)?;
      let interval = cursor.read_f64::<LittleEndian>()
                           .map_err(|_| truncated("channel header"))?;
      let count = cursor.read_u32::<LittleEndian>()
                        .map_err(|_| truncated("channel header"))?
                  as usize;
      headers.push(ChannelHeader { name,
                                   unit,
                                   interval,
                                   count });
    }

    let mut sensors = Vec::with_capacity(channel_count);
    for header in headers {
      let mut timestamps = Vec::with_capacity(header.count);
      let mut values = Vec::with_capacity(header.count);
      for index in 0..header.count {
        let value = cursor.read_f32::<LittleEndian>()
                          .map_err(|_| truncated("sample block"))?;
        timestamps.push(index as f64 * header.interval);
        values.push(f64::from(value));
      }
      sensors.push(Sensor::new(header.name,
                               header.unit,
                               header.interval,
                               SensorData::from_tv(timestamps, values)));
    }

    Ok(Self { path: path.to_owned(),
              sensors })
  }

  fn read_string(cursor: &mut &[u8], path: &Path) -> Result<String> {
    let length = cursor.read_u8()
                       .map_err(|_| {
                         Error::decode(path, "truncated channel header")
                       })? as usize;
    let mut buffer = vec![0u8; length];
    cursor.read_exact(&mut buffer)
          .map_err(|_| Error::decode(path, "truncated channel header"))?;
    String::from_utf8(buffer).map_err(|_| {
                               Error::decode(path,
                                             "channel name is not valid \
                                              UTF-8")
                             })
  }
}

impl Reader for PsiReader {
  fn path(&self) -> &Path {
    &self.path
  }

  fn sensors(&self) -> &[Sensor] {
    &self.sensors
  }
}


#[cfg(test)]
mod tests {
  use super::*;
  use byteorder::WriteBytesExt;
  use pretty_assertions::assert_eq;


  fn psi_fixture() -> Vec<u8> {
    let mut bytes = Vec::new();
    bytes.extend_from_slice(MAGIC);
    bytes.write_u16::<LittleEndian>(2).unwrap();

    // channel 0: voltage, 10 Hz, 3 samples
    bytes.write_u8(7).unwrap();
    bytes.extend_from_slice(b"voltage");
    bytes.write_u8(1).unwrap();
    bytes.extend_from_slice(b"V");
    bytes.write_f64::<LittleEndian>(0.1).unwrap();
    bytes.write_u32::<LittleEndian>(3).unwrap();

    // channel 1: current, 10 Hz, 2 samples
    bytes.write_u8(7).unwrap();
    bytes.extend_from_slice(b"current");
    bytes.write_u8(1).unwrap();
    bytes.extend_from_slice(b"A");
    bytes.write_f64::<LittleEndian>(0.1).unwrap();
    bytes.write_u32::<LittleEndian>(2).unwrap();

    for value in [5.0f32, 5.5, 6.0] {
      bytes.write_f32::<LittleEndian>(value).unwrap();
    }
    for value in [0.25f32, 0.5] {
      bytes.write_f32::<LittleEndian>(value).unwrap();
    }
    bytes
  }

  #[test]
  fn from_bytes_test() {
    let reader =
      PsiReader::from_bytes(&psi_fixture(), Path::new("rig.psi")).unwrap();
    assert_eq!(2, reader.sensors().len());

    let voltage = &reader.sensors()[0];
    assert_eq!("voltage", voltage.name());
    assert_eq!("V", voltage.unit());
    assert_eq!(0.1, voltage.sampling_interval());
    assert_eq!(&vec![5.0, 5.5, 6.0], voltage.data().values());
    assert_eq!(0.2, voltage.data().last_timestamp().unwrap());

    let current = &reader.sensors()[1];
    assert_eq!("current", current.name());
    assert_eq!("A", current.unit());
    assert_eq!(&vec![0.25, 0.5], current.data().values());
  }

  #[test]
  fn bad_magic_test() {
    let err = PsiReader::from_bytes(b"GRIM0000", Path::new("rig.psi"))
      .unwrap_err();
    assert_eq!(Error::decode(Path::new("rig.psi"),
                             "not a PSI file (bad magic)"),
               err);
  }

  #[test]
  fn truncated_test() {
    let mut bytes = psi_fixture();
    bytes.truncate(bytes.len() - 2);

    let err =
      PsiReader::from_bytes(&bytes, Path::new("rig.psi")).unwrap_err();
    assert_eq!(Error::decode(Path::new("rig.psi"), "truncated sample block"),
               err);
  }
}
