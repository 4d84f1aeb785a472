//! Sentiment aggregation and prediction scoring.
//!
//! Each text is scored independently by a [`TextScorer`] and the components
//! are averaged. An empty batch yields [`SentimentVector::NEUTRAL`].

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use vader_sentiment::SentimentIntensityAnalyzer;

// ============================================================================
// Scores
// ============================================================================

/// Polarity of a single text.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PolarityScores {
    /// Normalized overall polarity in [-1, 1]
    pub compound: f64,
    pub positive: f64,
    pub neutral: f64,
    pub negative: f64,
}

/// Averaged polarity over a batch of texts.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SentimentVector {
    pub compound: f64,
    pub positive: f64,
    pub neutral: f64,
    pub negative: f64,
    /// Number of texts the average is taken over
    pub sample_count: usize,
}

impl SentimentVector {
    /// Result for a batch with nothing to score.
    pub const NEUTRAL: Self = Self {
        compound: 0.0,
        positive: 0.0,
        neutral: 0.5,
        negative: 0.0,
        sample_count: 0,
    };
}

impl Default for SentimentVector {
    fn default() -> Self {
        Self::NEUTRAL
    }
}

/// Map a sentiment vector to a prediction score, roughly in [-100, 100].
///
/// Only the compound component contributes; the positive and negative
/// ratios are carried for reporting.
pub fn prediction_score(sentiment: &SentimentVector) -> f64 {
    sentiment.compound * 100.0
}

// ============================================================================
// Scorer
// ============================================================================

/// Scoring failed for a single text.
#[derive(Debug, Clone, thiserror::Error)]
#[error("Scoring failed: {0}")]
pub struct ScoreError(pub String);

/// Scores one text.
pub trait TextScorer: Send + Sync {
    fn polarity(&self, text: &str) -> Result<PolarityScores, ScoreError>;
}

/// Lexicon scorer backed by VADER.
pub struct VaderScorer {
    analyzer: SentimentIntensityAnalyzer<'static>,
}

impl VaderScorer {
    pub fn new() -> Self {
        Self {
            analyzer: SentimentIntensityAnalyzer::new(),
        }
    }
}

impl Default for VaderScorer {
    fn default() -> Self {
        Self::new()
    }
}

impl TextScorer for VaderScorer {
    fn polarity(&self, text: &str) -> Result<PolarityScores, ScoreError> {
        let scores = self.analyzer.polarity_scores(text);
        let get = |key: &str| {
            scores
                .get(key)
                .copied()
                .ok_or_else(|| ScoreError(format!("missing '{}' component", key)))
        };

        Ok(PolarityScores {
            compound: get("compound")?,
            positive: get("pos")?,
            neutral: get("neu")?,
            negative: get("neg")?,
        })
    }
}

// ============================================================================
// Aggregator
// ============================================================================

/// Averages per-text scores into a [`SentimentVector`].
#[derive(Clone)]
pub struct SentimentAggregator {
    scorer: Arc<dyn TextScorer>,
}

impl Default for SentimentAggregator {
    fn default() -> Self {
        Self::new(Arc::new(VaderScorer::new()))
    }
}

impl SentimentAggregator {
    pub fn new(scorer: Arc<dyn TextScorer>) -> Self {
        Self { scorer }
    }

    /// Score a batch. Texts the scorer rejects are skipped.
    pub fn score<S: AsRef<str>>(&self, texts: &[S]) -> SentimentVector {
        let mut total = PolarityScores {
            compound: 0.0,
            positive: 0.0,
            neutral: 0.0,
            negative: 0.0,
        };
        let mut count = 0usize;

        for text in texts {
            match self.scorer.polarity(text.as_ref()) {
                Ok(s) => {
                    total.compound += s.compound;
                    total.positive += s.positive;
                    total.neutral += s.neutral;
                    total.negative += s.negative;
                    count += 1;
                }
                Err(e) => {
                    tracing::debug!(error = %e, "Skipping unscorable text");
                }
            }
        }

        if count == 0 {
            return SentimentVector::NEUTRAL;
        }

        let n = count as f64;
        SentimentVector {
            compound: total.compound / n,
            positive: total.positive / n,
            neutral: total.neutral / n,
            negative: total.negative / n,
            sample_count: count,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    /// Scorer with fixed answers per text; unknown texts fail.
    struct TableScorer(HashMap<&'static str, f64>);

    impl TextScorer for TableScorer {
        fn polarity(&self, text: &str) -> Result<PolarityScores, ScoreError> {
            let compound = *self
                .0
                .get(text)
                .ok_or_else(|| ScoreError(format!("unknown text {text}")))?;
            Ok(PolarityScores {
                compound,
                positive: compound.max(0.0),
                neutral: 1.0 - compound.abs(),
                negative: (-compound).max(0.0),
            })
        }
    }

    fn table(entries: &[(&'static str, f64)]) -> SentimentAggregator {
        SentimentAggregator::new(Arc::new(TableScorer(entries.iter().copied().collect())))
    }

    #[test]
    fn test_empty_batch_is_neutral() {
        let aggregator = SentimentAggregator::default();
        let empty: [&str; 0] = [];
        let v = aggregator.score(&empty);
        assert_eq!(v, SentimentVector::NEUTRAL);
        assert_eq!(v.compound, 0.0);
        assert_eq!(v.positive, 0.0);
        assert_eq!(v.neutral, 0.5);
        assert_eq!(v.negative, 0.0);
        assert_eq!(v.sample_count, 0);
    }

    #[test]
    fn test_components_are_averaged() {
        let aggregator = table(&[("up", 0.8), ("down", -0.4)]);
        let v = aggregator.score(&["up", "down"]);
        assert!((v.compound - 0.2).abs() < 1e-9);
        assert!((v.positive - 0.4).abs() < 1e-9);
        assert!((v.negative - 0.2).abs() < 1e-9);
        assert!((v.neutral - 0.4).abs() < 1e-9);
        assert_eq!(v.sample_count, 2);
    }

    #[test]
    fn test_failed_texts_are_skipped() {
        let aggregator = table(&[("up", 0.6)]);
        let v = aggregator.score(&["up", "unknown"]);
        assert!((v.compound - 0.6).abs() < 1e-9);
        assert_eq!(v.sample_count, 1);

        let v = aggregator.score(&["unknown"]);
        assert_eq!(v, SentimentVector::NEUTRAL);
    }

    #[test]
    fn test_prediction_score() {
        let mut v = SentimentVector::NEUTRAL;
        v.compound = 0.8;
        assert!((prediction_score(&v) - 80.0).abs() < 1e-9);
        v.compound = -0.7;
        assert!((prediction_score(&v) + 70.0).abs() < 1e-9);
        assert_eq!(prediction_score(&SentimentVector::NEUTRAL), 0.0);
    }

    #[test]
    fn test_vader_polarity_direction() {
        let scorer = VaderScorer::new();
        let good = scorer
            .polarity("Investors optimistic about Apple Inc. future")
            .unwrap();
        let bad = scorer
            .polarity("Analysts downgrade Boeing Company outlook amid terrible losses")
            .unwrap();

        assert!(good.compound > 0.0);
        assert!(bad.compound < 0.0);
        assert!((-1.0..=1.0).contains(&good.compound));
        let sum = good.positive + good.neutral + good.negative;
        assert!((sum - 1.0).abs() < 0.01);
    }
}
