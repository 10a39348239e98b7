//! Per-window answer collection and selection of the final answer.

use tracing::{debug, warn};

use crate::{
    error::QaError,
    inference::{AnswerScoring, Inference},
    segment::Segment,
};

/// Answer produced for one window.
#[derive(Debug, Clone, PartialEq)]
pub struct AnswerCandidate {
    pub text: String,
    /// Confidence, present for scored backends.
    pub score: Option<f32>,
    pub start: Option<usize>,
    pub end: Option<usize>,
}

impl AnswerCandidate {
    /// Candidate from a backend that reports no confidence.
    pub fn unscored(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            score: None,
            start: None,
            end: None,
        }
    }

    pub fn scored(text: impl Into<String>, score: f32) -> Self {
        Self {
            score: Some(score),
            ..Self::unscored(text)
        }
    }
}

/// Runs the backend over every window, in order, one at a time.
///
/// Any backend failure aborts the whole request; the index of the failing
/// window is kept in the error.
pub async fn collect_answers(
    backend: &dyn Inference,
    question: &str,
    segments: &[Segment<'_>],
) -> Result<Vec<AnswerCandidate>, QaError> {
    let mut out = Vec::with_capacity(segments.len());
    for (idx, segment) in segments.iter().enumerate() {
        let context = segment.text();
        let candidate = backend
            .infer(question, &context)
            .await
            .map_err(|source| {
                warn!(segment = idx, error = %source, "inference failed");
                QaError::Inference { segment: idx, source }
            })?;
        debug!(segment = idx, words = segment.word_count(), score = ?candidate.score, "window answered");
        out.push(candidate);
    }
    Ok(out)
}

/// Picks the best candidate.
///
/// - [`AnswerScoring::Confidence`]: highest score; a missing or NaN score
///   ranks lowest.
/// - [`AnswerScoring::TextLength`]: most characters in the answer text.
///
/// Ties keep the earliest candidate.
///
/// # Errors
/// [`QaError::EmptyInput`] when `candidates` is empty.
pub fn reduce(candidates: Vec<AnswerCandidate>, scoring: AnswerScoring) -> Result<AnswerCandidate, QaError> {
    let mut best: Option<(AnswerCandidate, Rank)> = None;
    for candidate in candidates {
        let rank = Rank::of(&candidate, scoring);
        if best.as_ref().is_none_or(|(_, top)| rank.beats(top)) {
            best = Some((candidate, rank));
        }
    }
    best.map(|(c, _)| c).ok_or(QaError::EmptyInput)
}

#[derive(Debug, Clone, Copy)]
enum Rank {
    Score(f32),
    Length(usize),
}

impl Rank {
    fn of(c: &AnswerCandidate, scoring: AnswerScoring) -> Self {
        match scoring {
            AnswerScoring::Confidence => Rank::Score(
                c.score.filter(|s| !s.is_nan()).unwrap_or(f32::NEG_INFINITY),
            ),
            AnswerScoring::TextLength => Rank::Length(c.text.chars().count()),
        }
    }

    /// Strictly greater.
    fn beats(&self, other: &Rank) -> bool {
        match (self, other) {
            (Rank::Score(a), Rank::Score(b)) => a > b,
            (Rank::Length(a), Rank::Length(b)) => a > b,
            _ => false,
        }
    }
}
