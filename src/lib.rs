// Copyright 2021 bmc::labs Gmbh. All rights reserved.
//
// Authors:
//   Florian Eich <florian@bmc-labs.com>
//   Jonas Reitemeyer <alumni@bmc-labs.com>

mod csv_exporter;
mod csv_reader;
mod dispatch;
mod dlog_exporter;
mod dlog_reader;
mod error;
mod exporter;
mod grim_reader;
mod meta_reader;
mod psi_reader;
mod reader;
mod sensor;
mod svg_exporter;
mod xml_exporter;
mod xml_reader;
pub mod window;

pub use csv_exporter::CsvExporter;
pub use csv_reader::CsvReader;
pub use dispatch::{open_reader, InputFormat, OutputFormat};
pub use dlog_exporter::DlogExporter;
pub use dlog_reader::DlogReader;
pub use error::{Error, Result};
pub use exporter::{Exporter, ExportRequest};
pub use grim_reader::GrimReader;
pub use meta_reader::MetaReader;
pub use psi_reader::PsiReader;
pub use reader::Reader;
pub use sensor::{Sensor, SensorData};
pub use svg_exporter::SvgExporter;
pub use window::check_resolution;
pub use xml_exporter::XmlExporter;
pub use xml_reader::XmlReader;
