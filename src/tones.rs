use std::fmt;

use lazy_static::lazy_static;
use regex::Regex;

pub const NEUTRAL_DIGIT: char = '5';

#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash)]
pub enum Tone {
  Tone1,
  Tone2,
  Tone3,
  Tone4,
  Neutral,
}

impl Tone {
  pub fn from_digit(d: char) -> Option<Tone> {
    use Tone::*;
    Some(match d {
      '1' => Tone1,
      '2' => Tone2,
      '3' => Tone3,
      '4' => Tone4,
      '5' => Neutral,
      _ => return None
    })
  }

  pub fn digit(&self) -> char {
    use Tone::*;
    match self {
      Tone1 => '1',
      Tone2 => '2',
      Tone3 => '3',
      Tone4 => '4',
      Neutral => NEUTRAL_DIGIT,
    }
  }
}

impl fmt::Display for Tone {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.digit())
  }
}

/// A dictionary reading turned into what gets printed for a word.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Annotation {
  /// Normalized reading with neutral-tone digits removed, e.g. `ni3hao3`.
  pub reading: String,
  /// Tone signature, e.g. `33`. Empty for an all-neutral reading.
  pub tones: String,
  /// Tones before the neutral digits were dropped. A single extracted tone is
  /// followed by `Neutral`.
  pub raw_tones: Vec<Tone>,
}

/// Lower-cases, drops spaces between syllables and writes the `u:` vowel as `v`.
pub fn normalize_reading(pinyin: &str) -> String {
  pinyin.to_lowercase().replace(' ', "").replace("u:", "v")
}

fn strip_neutral(s: &str) -> String {
  s.replace(NEUTRAL_DIGIT, "")
}

pub fn annotate(pinyin: &str) -> Annotation {
  lazy_static! {
    static ref LETTER_RE: Regex = Regex::new(r"\p{Alphabetic}").unwrap();
  }

  let normalized = normalize_reading(pinyin);

  let mut digits = LETTER_RE.replace_all(&normalized, "").into_owned();
  // dictionaries often leave the final neutral syllable unmarked
  if digits.chars().count() == 1 {
    digits.push(NEUTRAL_DIGIT);
  }

  let raw_tones = digits.chars().filter_map(Tone::from_digit).collect();

  Annotation {
    reading: strip_neutral(&normalized),
    tones: strip_neutral(&digits),
    raw_tones,
  }
}

/// The reading as spoken once the two-syllable sandhi rules have applied:
/// 不 before a fourth tone, 一 before any tone, and third tone before third tone.
/// Readings that are not exactly two tones come back unchanged.
pub fn pronounced_reading(word: &str, annotation: &Annotation) -> String {
  use Tone::*;

  let reading = &annotation.reading;
  let [first, second] = annotation.raw_tones[..] else {
    return reading.clone();
  };

  match (first, second) {
    (Tone4, Tone4) if word.starts_with('不') => reading.replacen('4', "2", 1),
    (Tone1, Tone4) if word.starts_with('一') => reading.replacen('1', "2", 1),
    (Tone1, _) if word.starts_with('一') => reading.replacen('1', "4", 1),
    (Tone3, Tone3) => reading.replacen('3', "2", 1),
    _ => reading.clone()
  }
}
