// Copyright 2021 bmc::labs Gmbh. All rights reserved.
//
// Author: Florian Eich <florian@bmc-labs.com>

use super::{window::{Policy, Resample},
            Error,
            Exporter,
            ExportRequest,
            Reader,
            Result};
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, Event};
use std::io::Write;


/// Exporter for the `xml` output format (the default):
///
/// ```xml
/// <measurement>
///   <sensor name="voltage" unit="V" interval="1">
///     <sample t="0" v="4.96"/>
///   </sensor>
/// </measurement>
/// ```
///
/// The `interval` attribute carries the effective sampling interval used
/// for that sensor, so the document round-trips through the XML reader.
/// Sample selection is zero-order hold.
#[derive(Debug, Default)]
pub struct XmlExporter;

/// quick-xml write failures and raw I/O failures both land on `Encode`.
fn emit<T, E>(result: std::result::Result<T, E>) -> Result<T>
  where E: ToString
{
  result.map_err(|err| Error::Encode(err.to_string()))
}

impl Exporter for XmlExporter {
  fn data_export(&self,
                 reader: &dyn Reader,
                 request: &ExportRequest,
                 output: &mut dyn Write)
                 -> Result<()> {
    let mut writer = quick_xml::Writer::new_with_indent(output, b' ', 2);

    emit(writer.write_event(Event::Decl(BytesDecl::new("1.0",
                                                       Some("UTF-8"),
                                                       None))))?;
    emit(writer.write_event(Event::Start(BytesStart::new("measurement"))))?;

    for sensor in reader.sensors() {
      let interval = request.effective_interval(sensor)?;

      let mut element = BytesStart::new("sensor");
      element.push_attribute(("name", sensor.name().as_str()));
      element.push_attribute(("unit", sensor.unit().as_str()));
      element.push_attribute(("interval", interval.to_string().as_str()));
      emit(writer.write_event(Event::Start(element)))?;

      for (t, v) in Resample::for_request(sensor, request, Policy::Hold)? {
        let mut sample = BytesStart::new("sample");
        sample.push_attribute(("t", t.to_string().as_str()));
        sample.push_attribute(("v", v.to_string().as_str()));
        emit(writer.write_event(Event::Empty(sample)))?;
      }

      emit(writer.write_event(Event::End(BytesEnd::new("sensor"))))?;
    }

    emit(writer.write_event(Event::End(BytesEnd::new("measurement"))))?;
    emit(writeln!(writer.get_mut()))?;
    Ok(())
  }
}


#[cfg(test)]
mod tests {
  use super::{super::{GrimReader, XmlReader},
              *};
  use pretty_assertions::assert_eq;
  use std::path::Path;


  const GRIM: &str = ":voltage 1.0 V\n\
                      0 4.0\n\
                      1 5.0\n\
                      2 6.0\n";

  #[test]
  fn export_test() {
    let reader = GrimReader::from_text(GRIM, Path::new("in.grim")).unwrap();
    let request = ExportRequest::from_cli(0.0, -1.0, -1);

    let mut output = Vec::new();
    XmlExporter.data_export(&reader, &request, &mut output).unwrap();

    assert_eq!("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
                <measurement>\n  \
                <sensor name=\"voltage\" unit=\"V\" interval=\"1\">\n    \
                <sample t=\"0\" v=\"4\"/>\n    \
                <sample t=\"1\" v=\"5\"/>\n    \
                <sample t=\"2\" v=\"6\"/>\n  \
                </sensor>\n\
                </measurement>\n",
               String::from_utf8(output).unwrap());
  }

  #[test]
  fn round_trip_test() {
    let reader = GrimReader::from_text(GRIM, Path::new("in.grim")).unwrap();
    let request = ExportRequest::from_cli(0.0, -1.0, -1);

    let mut output = Vec::new();
    XmlExporter.data_export(&reader, &request, &mut output).unwrap();

    let text = String::from_utf8(output).unwrap();
    let round = XmlReader::from_text(&text, Path::new("out.xml")).unwrap();
    assert_eq!(reader.sensors(), round.sensors());
  }
}
