use std::io::{self, BufRead};

/// Iterates the lines of a reader with their terminator kept, the way a text-mode
/// file yields them: `\r\n` comes back as `\n` and the last line may have none.
pub struct RawLines<R> {
  reader: R,
}

impl<R: BufRead> RawLines<R> {
  pub fn new(reader: R) -> Self {
    RawLines { reader }
  }
}

impl<R: BufRead> Iterator for RawLines<R> {
  type Item = io::Result<String>;

  fn next(&mut self) -> Option<io::Result<String>> {
    let mut line = String::new();
    match self.reader.read_line(&mut line) {
      Ok(0) => None,
      Ok(_) => {
        if line.ends_with("\r\n") {
          line.truncate(line.len() - 2);
          line.push('\n');
        }
        Some(Ok(line))
      },
      Err(e) => Some(Err(e))
    }
  }
}

pub fn raw_lines<R: BufRead>(reader: R) -> RawLines<R> {
  RawLines::new(reader)
}
