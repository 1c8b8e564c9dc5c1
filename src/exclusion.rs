use std::collections::HashSet;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

use crate::error::{Error, Result};
use crate::hanzi::is_hanzi_word_start;
use crate::lines::raw_lines;

/// Words already covered elsewhere, stored as the raw lines they were read as
/// (terminator included). Membership is exact string equality.
#[derive(Debug, Default, Clone)]
pub struct ExclusionSet {
  lines: HashSet<String>,
}

impl ExclusionSet {
  pub fn from_reader<R: BufRead>(reader: R) -> io::Result<ExclusionSet> {
    let mut lines = HashSet::new();
    for line in raw_lines(reader) {
      let line = line?;
      if is_hanzi_word_start(&line) {
        lines.insert(line);
      }
    }
    Ok(ExclusionSet { lines })
  }

  pub fn load(path: &Path) -> Result<ExclusionSet> {
    let file = File::open(path).map_err(|e| Error::io(path, e))?;
    ExclusionSet::from_reader(BufReader::new(file)).map_err(|e| Error::io(path, e))
  }

  pub fn contains(&self, raw_line: &str) -> bool {
    self.lines.contains(raw_line)
  }

  pub fn len(&self) -> usize {
    self.lines.len()
  }

  pub fn is_empty(&self) -> bool {
    self.lines.is_empty()
  }
}
