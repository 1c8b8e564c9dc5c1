use std::io::{BufRead, Write};

use tracing::{debug, warn};

use crate::dictionary::PronunciationLookup;
use crate::error::{Error, Result};
use crate::exclusion::ExclusionSet;
use crate::frequencies::ToneFrequencyTable;
use crate::hanzi::{count_wide_chars, is_hanzi_word_start};
use crate::lines::raw_lines;
use crate::tones::{annotate, pronounced_reading};

/// What to do with a kept word the dictionary doesn't know.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LookupMissPolicy {
  /// Log a warning and leave the word out.
  #[default]
  Skip,
  /// Fail the run with `Error::PronunciationNotFound`.
  Abort,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct FilterOptions {
  pub lookup_miss: LookupMissPolicy,
  /// Append the reading as spoken after tone sandhi as a fourth column.
  pub pronounced: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FilterSummary {
  pub lines_read: usize,
  pub not_two_hanzi: usize,
  pub excluded: usize,
  pub missing_pronunciation: usize,
  pub written: usize,
}

/// Streams `master`, writing a `word reading tones` line to `out` for each kept
/// word and counting its tone signature into `table`.
pub fn filter_and_annotate<R, W, L>(
  master: R,
  exclusion: &ExclusionSet,
  lookup: &L,
  out: &mut W,
  table: &mut ToneFrequencyTable,
  options: FilterOptions,
) -> Result<FilterSummary>
where
  R: BufRead,
  W: Write,
  L: PronunciationLookup + ?Sized,
{
  let mut summary = FilterSummary::default();

  for line in raw_lines(master) {
    let line = line.map_err(Error::Read)?;
    summary.lines_read += 1;

    if !is_hanzi_word_start(&line) || count_wide_chars(&line) != 2 {
      summary.not_two_hanzi += 1;
      continue;
    }
    if exclusion.contains(&line) {
      summary.excluded += 1;
      continue;
    }

    let word = line.trim_end();

    let Some(entry) = lookup.first_entry(word) else {
      match options.lookup_miss {
        LookupMissPolicy::Abort => {
          return Err(Error::PronunciationNotFound { word: word.to_owned() });
        },
        LookupMissPolicy::Skip => {
          warn!("No pronunciation found for {}, skipping it", word);
          summary.missing_pronunciation += 1;
          continue;
        }
      }
    };

    let annotation = annotate(&entry.pinyin);
    if options.pronounced {
      let spoken = pronounced_reading(word, &annotation);
      writeln!(out, "{} {} {} {}", word, annotation.reading, annotation.tones, spoken)?;
    }
    else {
      writeln!(out, "{} {} {}", word, annotation.reading, annotation.tones)?;
    }
    debug!("{} [{}] -> {} {}", word, entry.pinyin, annotation.reading, annotation.tones);

    table.record(&annotation.tones);
    summary.written += 1;
  }

  Ok(summary)
}
