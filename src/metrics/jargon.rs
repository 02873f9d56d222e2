//! Compiled jargon dictionary
//!
//! Every term becomes a case-insensitive, word-bounded regex. When terms
//! overlap ("highly scalable" vs "scalable") the earliest match wins, then
//! the longest, then the term declared first.

use crate::error::{SlopError, SlopResult};
use indexmap::IndexMap;
use regex::Regex;

struct Term {
    word: String,
    category: String,
    regex: Regex,
}

/// A jargon term found in a piece of text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TermMatch {
    pub word: String,
    pub category: String,
    /// Byte offset within the searched text
    pub offset: usize,
}

pub struct JargonMatcher {
    terms: Vec<Term>,
}

fn term_pattern(term: &str) -> String {
    let words: Vec<String> = term.split_whitespace().map(regex::escape).collect();
    format!(r"(?i)\b{}\b", words.join(r"\s+"))
}

impl JargonMatcher {
    pub fn new(dictionary: &IndexMap<String, Vec<String>>) -> SlopResult<Self> {
        let mut terms = Vec::new();
        for (category, words) in dictionary {
            for word in words {
                let regex = Regex::new(&term_pattern(word)).map_err(|source| SlopError::Pattern {
                    term: word.clone(),
                    source,
                })?;
                terms.push(Term {
                    word: word.to_lowercase(),
                    category: category.clone(),
                    regex,
                });
            }
        }
        Ok(Self { terms })
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Non-overlapping term matches in `text`, in order of appearance
    pub fn find(&self, text: &str) -> Vec<TermMatch> {
        // (start, end, term index)
        let mut candidates: Vec<(usize, usize, usize)> = self
            .terms
            .iter()
            .enumerate()
            .flat_map(|(idx, term)| {
                term.regex
                    .find_iter(text)
                    .map(move |m| (m.start(), m.end(), idx))
            })
            .collect();
        candidates.sort_by(|a, b| a.0.cmp(&b.0).then(b.1.cmp(&a.1)).then(a.2.cmp(&b.2)));

        let mut matches = Vec::new();
        let mut covered_until = 0;
        for (start, end, idx) in candidates {
            if start < covered_until {
                continue;
            }
            covered_until = end;
            let term = &self.terms[idx];
            matches.push(TermMatch {
                word: term.word.clone(),
                category: term.category.clone(),
                offset: start,
            });
        }
        matches
    }

    pub fn count(&self, text: &str) -> usize {
        self.find(text).len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::defaults;

    fn matcher() -> JargonMatcher {
        JargonMatcher::new(&defaults::jargon()).unwrap()
    }

    #[test]
    fn test_case_insensitive_word_bounded() {
        let m = matcher();
        let hits = m.find("A Robust and SCALABLE design, not robustness");
        let words: Vec<_> = hits.iter().map(|h| h.word.as_str()).collect();
        assert_eq!(words, vec!["robust", "scalable"]);
        assert_eq!(hits[0].category, "quality");
        assert_eq!(hits[0].offset, 2);
    }

    #[test]
    fn test_longest_overlap_wins() {
        let m = matcher();
        let hits = m.find("a highly scalable service");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].word, "highly scalable");
    }

    #[test]
    fn test_multi_word_terms_span_whitespace() {
        let m = matcher();
        let hits = m.find("uses deep\n    learning throughout");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].word, "deep learning");
    }

    #[test]
    fn test_hyphenated_terms() {
        let m = matcher();
        assert_eq!(m.count("an enterprise-grade, production-ready tool"), 2);
        assert_eq!(m.count("plain words only"), 0);
    }
}
