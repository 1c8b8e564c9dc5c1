use std::fs::{self, File};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use tracing::info;

use crate::dictionary::{CedictDictionary, PronunciationLookup};
use crate::error::{Error, Result};
use crate::exclusion::ExclusionSet;
use crate::filter::{filter_and_annotate, FilterOptions, FilterSummary};
use crate::frequencies::ToneFrequencyTable;

#[derive(Debug, Clone)]
pub struct PipelinePaths {
  /// Full word list, one word per line.
  pub master: PathBuf,
  /// Words already covered, same format as `master`.
  pub covered: PathBuf,
  /// CC-CEDICT dictionary file.
  pub dictionary: PathBuf,
  pub output: PathBuf,
  pub stats: PathBuf,
  pub stats_json: Option<PathBuf>,
}

#[derive(Debug)]
pub struct PipelineReport {
  pub covered_words: usize,
  pub summary: FilterSummary,
  pub table: ToneFrequencyTable,
}

/// Writes `path` through a temporary file in the same directory, renamed into
/// place only once `write` has succeeded.
pub fn write_atomically<T, F>(path: &Path, write: F) -> Result<T>
where
  F: FnOnce(&mut BufWriter<&File>) -> Result<T>,
{
  let parent_dir = match path.parent() {
    Some(p) if !p.as_os_str().is_empty() => p,
    _ => Path::new("."),
  };
  fs::create_dir_all(parent_dir).map_err(|e| Error::io(parent_dir, e))?;

  let temp_file = NamedTempFile::new_in(parent_dir).map_err(|e| Error::io(path, e))?;
  let value = {
    let mut writer = BufWriter::new(temp_file.as_file());
    let value = write(&mut writer).map_err(|e| e.at(path))?;
    writer.flush().map_err(|e| Error::io(path, e))?;
    value
  };

  temp_file.persist(path).map_err(|e| Error::io(path, e.error))?;
  Ok(value)
}

/// Filter-and-annotate over files. Returns the tone counts for the records written.
pub fn filter_file<L>(
  master: &Path,
  exclusion: &ExclusionSet,
  lookup: &L,
  output: &Path,
  options: FilterOptions,
) -> Result<(ToneFrequencyTable, FilterSummary)>
where
  L: PronunciationLookup + ?Sized,
{
  let file = File::open(master).map_err(|e| Error::io(master, e))?;
  let mut table = ToneFrequencyTable::new();

  let summary = write_atomically(output, |out| {
    filter_stream(master, BufReader::new(file), exclusion, lookup, output, out, &mut table, options)
  })?;

  Ok((table, summary))
}

/// `filter_and_annotate` with read failures blamed on `master` and write failures on `output`.
fn filter_stream<R, W, L>(
  master: &Path,
  reader: R,
  exclusion: &ExclusionSet,
  lookup: &L,
  output: &Path,
  out: &mut W,
  table: &mut ToneFrequencyTable,
  options: FilterOptions,
) -> Result<FilterSummary>
where
  R: BufRead,
  W: Write,
  L: PronunciationLookup + ?Sized,
{
  filter_and_annotate(reader, exclusion, lookup, out, table, options)
    .map_err(|e| e.reading(master).at(output))
}

pub fn write_stats(table: &ToneFrequencyTable, stats: &Path, stats_json: Option<&Path>) -> Result<()> {
  write_atomically(stats, |out| table.write_report(out))?;
  if let Some(json_path) = stats_json {
    write_atomically(json_path, |out| table.write_json(out))?;
  }
  Ok(())
}

/// Runs the whole thing with a CC-CEDICT dictionary.
pub fn run(paths: &PipelinePaths, options: FilterOptions) -> Result<PipelineReport> {
  let dictionary = CedictDictionary::load(&paths.dictionary)?;
  info!("Loaded {} dictionary entries from {}", dictionary.len(), paths.dictionary.display());

  run_with_lookup(paths, &dictionary, options)
}

pub fn run_with_lookup<L>(paths: &PipelinePaths, lookup: &L, options: FilterOptions) -> Result<PipelineReport>
where
  L: PronunciationLookup + ?Sized,
{
  let exclusion = ExclusionSet::load(&paths.covered)?;
  info!("Collected {} covered words from {}", exclusion.len(), paths.covered.display());

  let (table, summary) = filter_file(&paths.master, &exclusion, lookup, &paths.output, options)?;
  info!(
    "Read {} lines: wrote {}, {} covered, {} not two-hanzi words, {} without pronunciation",
    summary.lines_read, summary.written, summary.excluded, summary.not_two_hanzi, summary.missing_pronunciation
  );

  write_stats(&table, &paths.stats, paths.stats_json.as_deref())?;
  info!("Counted {} tone signatures into {}", table.items.len(), paths.stats.display());

  Ok(PipelineReport {
    covered_words: exclusion.len(),
    summary,
    table,
  })
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::dictionary::{parse_entry, PronunciationEntry};
  use crate::filter::LookupMissPolicy;
  use std::collections::HashMap;
  use std::io::{self, Read};
  use tempfile::TempDir;

  const DICTIONARY: &str = "\
# test dictionary
你好 你好 [ni3 hao3] /hello/
謝謝 谢谢 [xie4 xie5] /thanks/
綠色 绿色 [lu:4 se4] /green/
";

  fn setup(dir: &TempDir, master: &str, covered: &str) -> PipelinePaths {
    let paths = PipelinePaths {
      master: dir.path().join("master.txt"),
      covered: dir.path().join("covered.txt"),
      dictionary: dir.path().join("cedict.txt"),
      output: dir.path().join("out/output.txt"),
      stats: dir.path().join("out/stats.txt"),
      stats_json: None,
    };
    fs::write(&paths.master, master).unwrap();
    fs::write(&paths.covered, covered).unwrap();
    fs::write(&paths.dictionary, DICTIONARY).unwrap();
    paths
  }

  #[test]
  fn test_end_to_end() {
    let dir = TempDir::new().unwrap();
    let paths = setup(&dir, "你好\n谢谢\n", "谢谢\n");

    let report = run(&paths, FilterOptions::default()).unwrap();

    assert_eq!(fs::read_to_string(&paths.output).unwrap(), "你好 ni3hao3 33\n");
    assert_eq!(fs::read_to_string(&paths.stats).unwrap(), "33: 1 (100.00%)\n");
    assert_eq!(report.covered_words, 1);
    assert_eq!(report.summary.written, 1);
  }

  #[test]
  fn test_reruns_are_byte_identical() {
    let dir = TempDir::new().unwrap();
    let paths = setup(&dir, "绿色\n你好\n谢谢\n再见\n", "");

    run(&paths, FilterOptions::default()).unwrap();
    let first = (fs::read(&paths.output).unwrap(), fs::read(&paths.stats).unwrap());
    run(&paths, FilterOptions::default()).unwrap();
    let second = (fs::read(&paths.output).unwrap(), fs::read(&paths.stats).unwrap());

    assert_eq!(first, second);
    assert_eq!(String::from_utf8(first.1).unwrap(), "44: 1 (33.33%)\n33: 1 (33.33%)\n4: 1 (33.33%)\n");
  }

  #[test]
  fn test_nothing_kept_gives_empty_stats() {
    let dir = TempDir::new().unwrap();
    let paths = setup(&dir, "HSK\n你好吗\n", "");

    let report = run(&paths, FilterOptions::default()).unwrap();

    assert_eq!(report.table.total(), 0);
    assert_eq!(fs::read_to_string(&paths.output).unwrap(), "");
    assert_eq!(fs::read_to_string(&paths.stats).unwrap(), "");
  }

  #[test]
  fn test_json_stats() {
    let dir = TempDir::new().unwrap();
    let mut paths = setup(&dir, "你好\n绿色\n", "");
    paths.stats_json = Some(dir.path().join("out/stats.json"));

    run(&paths, FilterOptions::default()).unwrap();

    let json: serde_json::Value =
      serde_json::from_str(&fs::read_to_string(paths.stats_json.as_ref().unwrap()).unwrap()).unwrap();
    assert_eq!(json["total"], 2);
    assert_eq!(json["tone_pairs"][0]["tones"], "33");
    assert_eq!(json["tone_pairs"][1]["count"], 1);
  }

  #[test]
  fn test_missing_input_names_path() {
    let dir = TempDir::new().unwrap();
    let mut paths = setup(&dir, "你好\n", "");
    paths.covered = dir.path().join("nope.txt");

    let err = run(&paths, FilterOptions::default()).unwrap_err();
    match &err {
      Error::Io { path, .. } => assert_eq!(path, &paths.covered),
      other => panic!("unexpected error: {}", other),
    }
    assert!(!paths.output.exists());
  }

  #[test]
  fn test_strict_miss_leaves_no_output() {
    let dir = TempDir::new().unwrap();
    let paths = setup(&dir, "你好\n再见\n", "");
    let options = FilterOptions { lookup_miss: LookupMissPolicy::Abort, ..Default::default() };

    let err = run(&paths, options).unwrap_err();

    assert!(matches!(err, Error::PronunciationNotFound { .. }));
    assert!(!paths.output.exists());
    assert!(!paths.stats.exists());
  }

  struct FullDisk;

  impl Write for FullDisk {
    fn write(&mut self, _: &[u8]) -> io::Result<usize> {
      Err(io::Error::new(io::ErrorKind::Other, "no space left on device"))
    }

    fn flush(&mut self) -> io::Result<()> {
      Ok(())
    }
  }

  struct BrokenRead;

  impl Read for BrokenRead {
    fn read(&mut self, _: &mut [u8]) -> io::Result<usize> {
      Err(io::Error::new(io::ErrorKind::Other, "device went away"))
    }
  }

  fn stream_error<R: BufRead, W: Write>(reader: R, out: &mut W) -> Error {
    let (_, e) = parse_entry("你好 你好 [ni3 hao3] /hello/").unwrap();
    let lookup: HashMap<String, Vec<PronunciationEntry>> = HashMap::from([("你好".to_owned(), vec![e])]);
    filter_stream(
      Path::new("master.txt"), reader, &ExclusionSet::default(), &lookup,
      Path::new("output.txt"), out, &mut ToneFrequencyTable::new(), FilterOptions::default()
    ).unwrap_err()
  }

  #[test]
  fn test_write_failure_names_output() {
    match stream_error("你好\n".as_bytes(), &mut FullDisk) {
      Error::Io { path, .. } => assert_eq!(path, Path::new("output.txt")),
      other => panic!("unexpected error: {}", other),
    }
  }

  #[test]
  fn test_read_failure_names_master() {
    match stream_error(BufReader::new(BrokenRead), &mut Vec::<u8>::new()) {
      Error::Io { path, .. } => assert_eq!(path, Path::new("master.txt")),
      other => panic!("unexpected error: {}", other),
    }
  }
}
