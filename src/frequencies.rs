use std::io::Write;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::Result;

/// Tone signature counts, kept in the order each signature was first seen.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ToneFrequencyTable {
  pub items: IndexMap<String, usize>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToneFrequency {
  pub tones: String,
  pub count: usize,
  pub percentage: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrequencyReport {
  pub total: usize,
  pub tone_pairs: Vec<ToneFrequency>,
}

impl ToneFrequencyTable {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn record(&mut self, tones: &str) {
    *self.items.entry(tones.to_owned()).or_insert(0) += 1;
  }

  pub fn count(&self, tones: &str) -> usize {
    self.items.get(tones).copied().unwrap_or(0)
  }

  pub fn total(&self) -> usize {
    self.items.values().sum()
  }

  pub fn is_empty(&self) -> bool {
    self.items.is_empty()
  }

  /// Percentages of the total, in first-seen order. Empty when nothing was counted.
  pub fn report(&self) -> FrequencyReport {
    let total = self.total();
    let tone_pairs = if total == 0 {
      vec![]
    } else {
      self.items.iter().map(|(tones, &count)| ToneFrequency {
        tones: tones.clone(),
        count,
        percentage: 100.0 * count as f64 / total as f64
      }).collect()
    };

    FrequencyReport { total, tone_pairs }
  }

  /// Writes one `tones: count (pct%)` line per signature.
  pub fn write_report<W: Write>(&self, out: &mut W) -> Result<()> {
    let report = self.report();
    if report.total == 0 {
      warn!("No words were kept, the tone pair report is empty");
    }
    for f in &report.tone_pairs {
      writeln!(out, "{}: {} ({:.2}%)", f.tones, f.count, f.percentage)?;
    }
    Ok(())
  }

  pub fn write_json<W: Write>(&self, out: W) -> Result<()> {
    serde_json::to_writer_pretty(out, &self.report())?;
    Ok(())
  }
}
