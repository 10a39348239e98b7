//! Overlapping sentence windows over a corpus.
//!
//! The corpus is split on the literal delimiter `". "` into "sentences".
//! Sentences are packed into a window while the window's word count stays
//! within `max_words`. When the next sentence does not fit, the window is
//! closed and a new one is seeded with the last `overlap` sentences of the
//! closed window, followed by the sentence that did not fit.
//!
//! Notes:
//! - The delimiter is dropped by the split and re-inserted only between
//!   sentences of the same window, so windows do not end with the `.` that
//!   originally followed their last sentence.
//! - `overlap` counts sentences, not words.
//! - The sentence that opens a new window is always appended, even if the
//!   seed plus that sentence exceeds `max_words`. A single sentence larger
//!   than the budget therefore forms a window on its own.

use std::{iter::FusedIterator, str::Split};

use tracing::trace;

use crate::cfg::{DEFAULT_MAX_WORDS, DEFAULT_OVERLAP_SENTENCES};

/// Literal sentence delimiter.
pub const SENTENCE_DELIMITER: &str = ". ";

/// A contiguous run of sentences borrowed from the corpus.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment<'a> {
    sentences: Vec<&'a str>,
    word_count: usize,
}

impl<'a> Segment<'a> {
    pub fn sentences(&self) -> &[&'a str] {
        &self.sentences
    }

    /// Whitespace-delimited tokens across all sentences.
    pub fn word_count(&self) -> usize {
        self.word_count
    }

    /// Sentences re-joined with the delimiter; this is the backend context.
    pub fn text(&self) -> String {
        self.sentences.join(SENTENCE_DELIMITER)
    }
}

/// Window parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Segmenter {
    max_words: usize,
    overlap: usize,
}

impl Default for Segmenter {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_WORDS, DEFAULT_OVERLAP_SENTENCES)
    }
}

impl Segmenter {
    /// `max_words` is the per-window word budget, `overlap` the number of
    /// trailing sentences carried into the next window.
    pub fn new(max_words: usize, overlap: usize) -> Self {
        Self { max_words, overlap }
    }

    pub fn max_words(&self) -> usize {
        self.max_words
    }

    pub fn overlap(&self) -> usize {
        self.overlap
    }

    /// Lazily windows `corpus`. A corpus with no visible text yields nothing.
    pub fn segments<'a>(&self, corpus: &'a str) -> Segments<'a> {
        let sentences = if corpus.trim().is_empty() {
            trace!("segments: blank corpus; nothing to do");
            None
        } else {
            Some(corpus.split(SENTENCE_DELIMITER))
        };
        Segments {
            sentences,
            buffer: Vec::new(),
            word_count: 0,
            max_words: self.max_words,
            overlap: self.overlap,
        }
    }
}

/// Iterator returned by [`Segmenter::segments`]. Single pass, not restartable.
#[derive(Debug)]
pub struct Segments<'a> {
    sentences: Option<Split<'a, &'static str>>,
    buffer: Vec<&'a str>,
    word_count: usize,
    max_words: usize,
    overlap: usize,
}

impl<'a> Iterator for Segments<'a> {
    type Item = Segment<'a>;

    fn next(&mut self) -> Option<Segment<'a>> {
        let sentences = self.sentences.as_mut()?;

        for sentence in sentences.by_ref() {
            let words = count_words(sentence);

            if self.word_count + words <= self.max_words {
                self.buffer.push(sentence);
                self.word_count += words;
                continue;
            }

            // Nothing to close yet: an oversized leading sentence starts the first window.
            if self.buffer.is_empty() {
                self.buffer.push(sentence);
                self.word_count = words;
                continue;
            }

            let seed_from = self.buffer.len().saturating_sub(self.overlap);
            let seed = self.buffer[seed_from..].to_vec();
            let closed = Segment {
                sentences: std::mem::replace(&mut self.buffer, seed),
                word_count: self.word_count,
            };

            self.word_count = self.buffer.iter().map(|s| count_words(s)).sum::<usize>() + words;
            self.buffer.push(sentence);
            return Some(closed);
        }

        self.sentences = None;
        if self.buffer.is_empty() {
            return None;
        }
        Some(Segment {
            sentences: std::mem::take(&mut self.buffer),
            word_count: std::mem::take(&mut self.word_count),
        })
    }
}

impl FusedIterator for Segments<'_> {}

fn count_words(s: &str) -> usize {
    s.split_whitespace().count()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(seg: Segmenter, corpus: &str) -> Vec<String> {
        seg.segments(corpus).map(|s| s.text()).collect()
    }

    #[test]
    fn short_corpus_is_one_window() {
        let corpus = "Cats are mammals. Dogs are mammals.\n";
        let out: Vec<_> = Segmenter::default().segments(corpus).collect();
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].sentences(), &["Cats are mammals", "Dogs are mammals.\n"]);
        assert_eq!(out[0].word_count(), 6);
        assert_eq!(out[0].text(), corpus);
    }

    #[test]
    fn blank_corpus_yields_nothing() {
        assert_eq!(Segmenter::default().segments("").count(), 0);
        assert_eq!(Segmenter::default().segments(" \n\n").count(), 0);
    }

    #[test]
    fn overflow_closes_window_and_carries_overlap() {
        let seg = Segmenter::new(4, 1);
        assert_eq!(
            texts(seg, "a b. c d. e f. g h"),
            vec!["a b. c d", "c d. e f", "e f. g h"]
        );
    }

    #[test]
    fn zero_overlap_starts_fresh() {
        let seg = Segmenter::new(4, 0);
        assert_eq!(texts(seg, "a b. c d. e f. g h"), vec!["a b. c d", "e f. g h"]);
    }

    #[test]
    fn overlap_larger_than_window_carries_everything() {
        let out: Vec<_> = Segmenter::new(3, 10).segments("one two three. four").collect();
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].sentences(), &["one two three"]);
        // seed is the whole previous window, and the triggering sentence is still appended
        assert_eq!(out[1].sentences(), &["one two three", "four"]);
        assert_eq!(out[1].word_count(), 4);
    }

    #[test]
    fn oversized_sentence_forms_its_own_window() {
        let out: Vec<_> = Segmenter::new(2, 0).segments("a b c d. e. f g h").collect();
        let sentences: Vec<_> = out.iter().map(|s| s.sentences().to_vec()).collect();
        assert_eq!(sentences, vec![vec!["a b c d"], vec!["e"], vec!["f g h"]]);
        assert_eq!(out[0].word_count(), 4);
    }

    #[test]
    fn iterator_is_fused() {
        let mut it = Segmenter::new(4, 1).segments("a b. c d");
        assert!(it.next().is_some());
        assert!(it.next().is_none());
        assert!(it.next().is_none());
    }

    /// Unique sentences of 1..=5 words so every window property can be checked.
    fn synthetic_corpus(n: usize) -> (String, Vec<String>) {
        let sentences: Vec<String> = (0..n)
            .map(|i| {
                (0..(i * 7 % 5) + 1)
                    .map(|w| format!("s{i}w{w}"))
                    .collect::<Vec<_>>()
                    .join(" ")
            })
            .collect();
        (sentences.join(SENTENCE_DELIMITER), sentences)
    }

    #[test]
    fn windows_cover_every_sentence_in_order() {
        let (corpus, expected) = synthetic_corpus(200);
        let mut seen: Vec<&str> = Vec::new();
        for segment in Segmenter::new(20, 2).segments(&corpus) {
            for s in segment.sentences() {
                if !seen.contains(s) {
                    seen.push(*s);
                }
            }
        }
        assert_eq!(seen, expected);
    }

    #[test]
    fn windows_respect_budget_and_report_exact_counts() {
        let (corpus, _) = synthetic_corpus(200);
        for segment in Segmenter::new(20, 2).segments(&corpus) {
            let recount: usize = segment.sentences().iter().map(|s| count_words(s)).sum();
            assert_eq!(segment.word_count(), recount);
            assert!(segment.word_count() <= 20 || segment.sentences().len() == 1);
        }
    }

    #[test]
    fn consecutive_windows_share_trailing_sentences() {
        let (corpus, _) = synthetic_corpus(200);
        let overlap = 2;
        let out: Vec<_> = Segmenter::new(20, overlap).segments(&corpus).collect();
        assert!(out.len() > 2);
        for pair in out.windows(2) {
            let (first, second) = (pair[0].sentences(), pair[1].sentences());
            let k = overlap.min(first.len());
            assert_eq!(&second[..k], &first[first.len() - k..]);
        }
    }
}
