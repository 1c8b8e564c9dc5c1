use unicode_width::UnicodeWidthChar;

/// CJK Unified Ideographs block.
pub fn is_hanzi(c: char) -> bool {
  ('\u{4E00}'..='\u{9FFF}').contains(&c)
}

/// True iff the first character of `text` is Hanzi. Empty text is not a Hanzi word.
pub fn is_hanzi_word_start(text: &str) -> bool {
  text.chars().next().map_or(false, is_hanzi)
}

pub fn contains_hanzi(text: &str) -> bool {
  text.chars().any(is_hanzi)
}

/// East Asian Width W characters that don't render two columns wide: combining
/// marks (ideographic tone marks, kana voicing marks, Khitan filler, Vietnamese
/// reading marks) and the emoji skin tone modifiers.
fn is_wide_without_width(c: char) -> bool {
  matches!(c,
    '\u{302A}'..='\u{302D}'
    | '\u{3099}'..='\u{309A}'
    | '\u{16FE4}'
    | '\u{16FF0}'..='\u{16FF1}'
    | '\u{1F3FB}'..='\u{1F3FF}'
  )
}

/// East Asian Width is Wide or Fullwidth.
pub fn is_wide(c: char) -> bool {
  c.width() == Some(2) || is_wide_without_width(c)
}

/// Counts characters whose East Asian Width is Wide or Fullwidth.
pub fn count_wide_chars(text: &str) -> usize {
  text.chars().filter(|&c| is_wide(c)).count()
}
