// Copyright 2021 bmc::labs Gmbh. All rights reserved.
//
// Authors:
//   Florian Eich <florian@bmc-labs.com>
//   Jonas Reitemeyer <alumni@bmc-labs.com>

use super::{CsvExporter,
            CsvReader,
            DlogExporter,
            DlogReader,
            Error,
            Exporter,
            GrimReader,
            MetaReader,
            PsiReader,
            Reader,
            Result,
            SvgExporter,
            XmlExporter,
            XmlReader};
use std::path::Path;


/// The closed set of recognized input formats. Selection is by file name
/// suffix only - no content sniffing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InputFormat {
  Dlog,
  Psi,
  Meta,
  Grim,
  Csv,
  Xml,
}

/// Suffix table for input dispatch. First match wins; the suffixes are
/// mutually exclusive by construction.
const SUFFIXES: [(&str, InputFormat); 6] = [(".dlog", InputFormat::Dlog),
                                            (".psi", InputFormat::Psi),
                                            (".meta", InputFormat::Meta),
                                            (".grim", InputFormat::Grim),
                                            (".csv", InputFormat::Csv),
                                            (".xml", InputFormat::Xml)];

impl InputFormat {
  /// Selects the format whose suffix matches `path`, case sensitively.
  pub fn from_path(path: &Path) -> Result<Self> {
    let name = path.to_string_lossy();
    SUFFIXES.iter()
            .find(|(suffix, _)| name.ends_with(suffix))
            .map(|&(_, format)| format)
            .ok_or_else(|| Error::UnsupportedInputFormat(name.into_owned()))
  }

  /// Decodes `path` with this format's reader.
  pub fn open(self, path: &Path) -> Result<Box<dyn Reader>> {
    Ok(match self {
      Self::Dlog => Box::new(DlogReader::load(path)?),
      Self::Psi => Box::new(PsiReader::load(path)?),
      Self::Meta => Box::new(MetaReader::load(path)?),
      Self::Grim => Box::new(GrimReader::load(path)?),
      Self::Csv => Box::new(CsvReader::load(path)?),
      Self::Xml => Box::new(XmlReader::load(path)?),
    })
  }
}

/// Dispatches on the suffix of `path` and decodes the file.
pub fn open_reader(path: &Path) -> Result<Box<dyn Reader>> {
  InputFormat::from_path(path)?.open(path)
}


/// The closed set of recognized output formats, selected by name.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
  Csv,
  Xml,
  Dlog,
  Svg,
}

const FORMATS: [(&str, OutputFormat); 4] = [("csv", OutputFormat::Csv),
                                            ("xml", OutputFormat::Xml),
                                            ("dlog", OutputFormat::Dlog),
                                            ("svg", OutputFormat::Svg)];

impl OutputFormat {
  /// Selects the format named `name` by exact string equality.
  pub fn from_name(name: &str) -> Result<Self> {
    FORMATS.iter()
           .find(|(known, _)| *known == name)
           .map(|&(_, format)| format)
           .ok_or_else(|| Error::UnsupportedOutputFormat(name.to_string()))
  }

  pub fn exporter(self) -> Box<dyn Exporter> {
    match self {
      Self::Csv => Box::new(CsvExporter),
      Self::Xml => Box::new(XmlExporter),
      Self::Dlog => Box::new(DlogExporter),
      Self::Svg => Box::new(SvgExporter),
    }
  }
}


#[cfg(test)]
mod tests {
  use super::*;
  use pretty_assertions::assert_eq;


  #[test]
  fn input_dispatch_test() {
    for (suffix, format) in SUFFIXES {
      let path = format!("/data/run_01{}", suffix);
      assert_eq!(format, InputFormat::from_path(Path::new(&path)).unwrap());
    }

    // exact, case-sensitive suffix match
    assert_eq!(InputFormat::Csv,
               InputFormat::from_path(Path::new("a.weird.csv")).unwrap());
    assert!(InputFormat::from_path(Path::new("data.CSV")).is_err());
  }

  #[test]
  fn unsupported_input_test() {
    let unsupported =
      Error::UnsupportedInputFormat("measurement.bin".to_string());
    assert_eq!(Err(unsupported),
               InputFormat::from_path(Path::new("measurement.bin")));
  }

  #[test]
  fn output_dispatch_test() {
    for (name, format) in FORMATS {
      assert_eq!(format, OutputFormat::from_name(name).unwrap());
    }
  }

  #[test]
  fn unsupported_output_test() {
    assert_eq!(Err(Error::UnsupportedOutputFormat("json".to_string())),
               OutputFormat::from_name("json"));
    assert!(OutputFormat::from_name("XML").is_err());
    assert!(OutputFormat::from_name("").is_err());
  }

  #[test]
  fn pipeline_test() {
    // dispatch -> decode -> validate -> export, through a real file
    let path = std::env::temp_dir().join("mconv_pipeline_test.grim");
    std::fs::write(&path, ":ramp 1.0\n0 0\n1 1\n2 2\n3 3\n4 4\n5 5\n")
      .unwrap();

    let reader = open_reader(&path).unwrap();
    let request = super::super::ExportRequest::from_cli(2.0, 4.0, -1);
    super::super::check_resolution(reader.as_ref(), &request).unwrap();

    let mut output = Vec::new();
    OutputFormat::from_name("csv").unwrap()
                                  .exporter()
                                  .data_export(reader.as_ref(),
                                               &request,
                                               &mut output)
                                  .unwrap();
    assert_eq!("sensor,time,value\nramp,2,2\nramp,3,3\nramp,4,4\n",
               String::from_utf8(output).unwrap());

    std::fs::remove_file(&path).ok();
  }
}
