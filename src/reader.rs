// Copyright 2021 bmc::labs Gmbh. All rights reserved.
//
// Author: Florian Eich <florian@bmc-labs.com>

use super::Sensor;
use std::path::Path;


/// Common surface of every input format decoder.
///
/// A concrete reader is constructed through its `load(path)` associated
/// function, which decodes the whole file up front: construction either
/// fully succeeds with all sensors populated, or fails with a decode error.
/// A partially constructed reader is never exposed, and there is no
/// incremental read API - after `load`, a reader is read-only.
pub trait Reader {
  /// Path the recording was loaded from.
  fn path(&self) -> &Path;

  /// All sensors decoded from the file, in file order. Pure and stable
  /// across repeated calls.
  fn sensors(&self) -> &[Sensor];
}
