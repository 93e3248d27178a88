// Escalating-precision match cascade: exact, normalized, word-pattern, fuzzy.
// Precision drops and recall rises down the list; first success wins.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::normalize::{normalize, normalized_to_raw};
use crate::segment::SegmentIndex;

/// Which cascade tier produced a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    Exact,
    Normalized,
    WordPattern,
    Fuzzy,
}

/// A located quote in concatenated-buffer byte coordinates.
///
/// `end > start`, both on char boundaries. Ephemeral: consumed immediately by
/// the span mapper.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchResult {
    pub start: usize,
    pub end: usize,
    pub strategy: Strategy,
}

/// Byte range of one whitespace-delimited token in the buffer.
#[derive(Debug, Clone, Copy)]
struct Token {
    start: usize,
    end: usize,
}

/// Quote locator over one document snapshot.
///
/// Precomputes the normalized buffer and the token table once so a whole
/// claim batch reuses them; construction is the only O(document) setup cost
/// shared across claims.
pub struct QuoteLocator<'a> {
    full_text: &'a str,
    normalized: String,
    tokens: Vec<Token>,
}

impl<'a> QuoteLocator<'a> {
    pub fn new(index: &'a SegmentIndex) -> Self {
        let full_text = index.full_text();
        Self {
            full_text,
            normalized: normalize(full_text),
            tokens: tokenize(full_text),
        }
    }

    /// Run the cascade for one quote. `None` means all four strategies
    /// missed; the claim is unlocalized, which is an expected outcome rather
    /// than an error.
    pub fn locate(&self, quote: &str) -> Option<MatchResult> {
        let quote = quote.trim();
        if quote.is_empty() || self.full_text.is_empty() {
            return None;
        }

        let result = self
            .find_exact(quote)
            .or_else(|| self.find_normalized(quote))
            .or_else(|| self.find_word_pattern(quote))
            .or_else(|| self.find_fuzzy(quote));

        if let Some(m) = result {
            debug!(strategy = ?m.strategy, start = m.start, end = m.end, "quote located");
        }
        result
    }

    /// Strategy 1: verbatim substring, earliest occurrence.
    fn find_exact(&self, quote: &str) -> Option<MatchResult> {
        self.full_text.find(quote).map(|start| MatchResult {
            start,
            end: start + quote.len(),
            strategy: Strategy::Exact,
        })
    }

    /// Strategy 2: match in normalized space, then walk both endpoints back
    /// to raw offsets. The backmapping is approximate when normalization was
    /// lossy; a span a few characters off the true boundary is accepted.
    fn find_normalized(&self, quote: &str) -> Option<MatchResult> {
        let norm_quote = normalize(quote);
        if norm_quote.is_empty() {
            return None;
        }
        let norm_start = self.normalized.find(&norm_quote)?;
        let norm_end = norm_start + norm_quote.len();

        let start = normalized_to_raw(norm_start, &self.normalized, self.full_text)?;
        let end = normalized_to_raw(norm_end, &self.normalized, self.full_text)?;
        (end > start).then_some(MatchResult {
            start,
            end,
            strategy: Strategy::Normalized,
        })
    }

    /// Strategy 3: anchor on the first few quote words landing in consecutive
    /// tokens, then extend the end by chasing the remaining words in order.
    ///
    /// Explicit token-lockstep scan; words are matched as case-insensitive
    /// literals, so no pattern escaping is involved.
    fn find_word_pattern(&self, quote: &str) -> Option<MatchResult> {
        let words: Vec<&str> = quote.split_whitespace().collect();
        if words.len() < 3 {
            return None;
        }

        let anchor_words = &words[..words.len().min(8)];
        let start = self.find_token_run(anchor_words)?;

        // Extend from the anchor: every quote word (from the first again, as
        // a cheap self-check of the anchor) is chased forward; the first miss
        // stops the extension.
        let mut end = start;
        let mut matched = 0usize;
        for word in &words {
            match find_ci(&self.full_text[end..], word) {
                Some((_, word_end)) => {
                    end += word_end;
                    matched += 1;
                }
                None => break,
            }
        }

        (matched >= words.len().min(3)).then_some(MatchResult {
            start,
            end,
            strategy: Strategy::WordPattern,
        })
    }

    /// Earliest buffer position where `words[k]` is a case-insensitive
    /// substring of the k-th token of a consecutive token run. Returns the
    /// byte offset of the first word's occurrence inside its token.
    fn find_token_run(&self, words: &[&str]) -> Option<usize> {
        if words.is_empty() || self.tokens.len() < words.len() {
            return None;
        }

        'candidates: for i in 0..=self.tokens.len() - words.len() {
            let mut anchor = 0;
            for (k, word) in words.iter().enumerate() {
                let token = self.tokens[i + k];
                match find_ci(&self.full_text[token.start..token.end], word) {
                    Some((off, _)) => {
                        if k == 0 {
                            anchor = token.start + off;
                        }
                    }
                    None => continue 'candidates,
                }
            }
            return Some(anchor);
        }
        None
    }

    /// Strategy 4: last resort. Search the leading long words as one literal,
    /// fall back to the middle words, and estimate the end from the quote
    /// length. The end is deliberately loose.
    fn find_fuzzy(&self, quote: &str) -> Option<MatchResult> {
        let words: Vec<&str> = quote
            .split_whitespace()
            .filter(|w| w.chars().count() > 2)
            .collect();
        if words.len() < 3 {
            return None;
        }

        let lead = words[..words.len().min(10)].join(" ");
        let mut start = find_ci(self.full_text, &lead).map(|(s, _)| s);

        if start.is_none() && words.len() > 4 {
            // Boundary words are the likeliest to have been paraphrased.
            let middle = words[1..words.len() - 1].join(" ");
            start = find_ci(self.full_text, &middle).map(|(s, _)| s);
        }
        let start = start?;

        let estimated = (quote.len() as f64 * 1.2) as usize;
        let end = start + estimated.min(self.full_text.len() - start);
        let end = floor_char_boundary(self.full_text, end);
        (end > start).then_some(MatchResult {
            start,
            end,
            strategy: Strategy::Fuzzy,
        })
    }
}

/// Byte ranges of the whitespace-delimited tokens of `text`.
fn tokenize(text: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut run_start: Option<usize> = None;

    for (i, ch) in text.char_indices() {
        if ch.is_whitespace() {
            if let Some(start) = run_start.take() {
                tokens.push(Token { start, end: i });
            }
        } else if run_start.is_none() {
            run_start = Some(i);
        }
    }
    if let Some(start) = run_start {
        tokens.push(Token {
            start,
            end: text.len(),
        });
    }
    tokens
}

/// Case-insensitive substring search returning the byte range of the first
/// occurrence. Character-by-character lowercase comparison, so offsets are
/// always valid for the original haystack (no lowercased copy whose byte
/// layout could drift).
fn find_ci(haystack: &str, needle: &str) -> Option<(usize, usize)> {
    if needle.is_empty() {
        return Some((0, 0));
    }
    for (start, _) in haystack.char_indices() {
        if let Some(len) = match_ci_prefix(&haystack[start..], needle) {
            return Some((start, start + len));
        }
    }
    None
}

/// Byte length of the haystack prefix matching `needle` case-insensitively,
/// if it does.
fn match_ci_prefix(haystack: &str, needle: &str) -> Option<usize> {
    let mut hay = haystack.chars();
    let mut len = 0usize;
    for needle_ch in needle.chars() {
        let hay_ch = hay.next()?;
        if !hay_ch.to_lowercase().eq(needle_ch.to_lowercase()) {
            return None;
        }
        len += hay_ch.len_utf8();
    }
    Some(len)
}

/// Largest char boundary at or below `index`.
fn floor_char_boundary(text: &str, index: usize) -> usize {
    if index >= text.len() {
        return text.len();
    }
    let mut index = index;
    while !text.is_char_boundary(index) {
        index -= 1;
    }
    index
}
