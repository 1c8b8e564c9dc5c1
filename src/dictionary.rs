use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use nom::bytes::complete::{is_not, take_till1};
use nom::character::complete::{char, space0, space1};
use nom::multi::many0;
use nom::sequence::{delimited, terminated};
use nom::IResult;

use crate::error::{Error, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PronunciationEntry {
  pub traditional: String,
  pub simplified: String,
  /// Space-separated syllables with tone numbers, `u:` standing for ü.
  pub pinyin: String,
  pub definitions: Vec<String>,
}

/// Anything that can tell how a word is read.
pub trait PronunciationLookup {
  /// Every entry for `word`, in dictionary order. Empty when unknown.
  fn lookup(&self, word: &str) -> &[PronunciationEntry];

  fn first_entry(&self, word: &str) -> Option<&PronunciationEntry> {
    self.lookup(word).first()
  }
}

impl PronunciationLookup for HashMap<String, Vec<PronunciationEntry>> {
  fn lookup(&self, word: &str) -> &[PronunciationEntry] {
    self.get(word).map(|entries| entries.as_slice()).unwrap_or(&[])
  }
}

/// A CC-CEDICT dictionary indexed by both simplified and traditional forms.
#[derive(Debug, Default)]
pub struct CedictDictionary {
  index: HashMap<String, Vec<PronunciationEntry>>,
  entry_count: usize,
}

fn parse_headword(i: &str) -> IResult<&str, &str> {
  take_till1(|c: char| c == ' ' || c == '\t')(i)
}

fn parse_definitions(i: &str) -> IResult<&str, Vec<&str>> {
  let (i, _) = char('/')(i)?;
  many0(terminated(is_not("/"), char('/')))(i)
}

/// `傳統 传统 [chuan2 tong3] /tradition/traditional/`
pub fn parse_entry(i: &str) -> IResult<&str, PronunciationEntry> {
  let (i, traditional) = parse_headword(i)?;
  let (i, _) = space1(i)?;
  let (i, simplified) = parse_headword(i)?;
  let (i, _) = space1(i)?;
  let (i, pinyin) = delimited(char('['), is_not("]"), char(']'))(i)?;
  let (i, _) = space0(i)?;
  let (i, definitions) = parse_definitions(i)?;
  Ok((i, PronunciationEntry {
    traditional: traditional.to_owned(),
    simplified: simplified.to_owned(),
    pinyin: pinyin.trim().to_owned(),
    definitions: definitions.into_iter().map(|d| d.to_owned()).collect()
  }))
}

impl CedictDictionary {
  pub fn from_reader<R: BufRead>(reader: R) -> Result<CedictDictionary> {
    let mut dictionary = CedictDictionary::default();

    for (n, line) in reader.lines().enumerate() {
      let line = line?;
      let line = line.trim_end();
      if line.trim_start().is_empty() || line.starts_with('#') {
        continue;
      }

      let (_, entry) = parse_entry(line).map_err(|e| Error::Dictionary {
        line: n + 1,
        message: e.to_string()
      })?;
      dictionary.insert(entry);
    }

    Ok(dictionary)
  }

  pub fn load(path: &Path) -> Result<CedictDictionary> {
    let file = File::open(path).map_err(|e| Error::io(path, e))?;
    CedictDictionary::from_reader(BufReader::new(file)).map_err(|e| e.at(path))
  }

  pub fn insert(&mut self, entry: PronunciationEntry) {
    self.entry_count += 1;
    if entry.traditional != entry.simplified {
      self.index.entry(entry.traditional.clone()).or_default().push(entry.clone());
    }
    self.index.entry(entry.simplified.clone()).or_default().push(entry);
  }

  pub fn len(&self) -> usize {
    self.entry_count
  }

  pub fn is_empty(&self) -> bool {
    self.entry_count == 0
  }
}

impl PronunciationLookup for CedictDictionary {
  fn lookup(&self, word: &str) -> &[PronunciationEntry] {
    self.index.lookup(word)
  }
}
