//! Ranking engine: source chain, aggregation and scoring over a set of
//! entities, then top/bottom extraction.

use futures::stream::{self, StreamExt};
use rand::Rng;
use serde::Serialize;
use std::cmp::Ordering as CmpOrdering;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use crate::sentiment::{prediction_score, SentimentAggregator, SentimentVector};
use crate::sources::SourceChain;
use crate::universe::Entity;

/// Headlines kept per entity for display and export.
pub const SAMPLE_TEXTS: usize = 3;

// ============================================================================
// Results
// ============================================================================

/// Outcome for one entity in a pass.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EntityResult {
    pub entity: Entity,
    pub sentiment: SentimentVector,
    pub prediction_score: f64,
    /// First few acquired texts
    pub sample_texts: Vec<String>,
    /// Strategy that produced the texts
    pub source: String,
}

/// One row of the rises or falls list.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedEntry {
    /// 1-based position in its list
    pub rank: usize,
    pub symbol: String,
    pub display_name: String,
    pub prediction_score: f64,
    pub compound_sentiment: f64,
    pub sample_headline: Option<String>,
}

impl RankedEntry {
    fn from_result(rank: usize, result: &EntityResult) -> Self {
        Self {
            rank,
            symbol: result.entity.symbol.clone(),
            display_name: result.entity.display_name.clone(),
            prediction_score: result.prediction_score,
            compound_sentiment: result.sentiment.compound,
            sample_headline: result.sample_texts.first().cloned(),
        }
    }
}

fn by_score_desc(a: &EntityResult, b: &EntityResult) -> CmpOrdering {
    b.prediction_score
        .partial_cmp(&a.prediction_score)
        .unwrap_or(CmpOrdering::Equal)
}

/// Extract the top `k` rises and top `k` falls.
///
/// Results are stable-sorted by score descending, so ties keep input order.
/// Rises are the first `k` of that ordering. Falls are the last `k`,
/// re-sorted ascending so the most negative entry comes first. Ranks are
/// positional, starting at 1.
pub fn rank_results(results: &[EntityResult], k: usize) -> (Vec<RankedEntry>, Vec<RankedEntry>) {
    let mut ordered: Vec<&EntityResult> = results.iter().collect();
    ordered.sort_by(|a, b| by_score_desc(a, b));

    let rises = ordered
        .iter()
        .take(k)
        .enumerate()
        .map(|(i, r)| RankedEntry::from_result(i + 1, r))
        .collect();

    let mut tail: Vec<&EntityResult> = ordered[ordered.len().saturating_sub(k)..].to_vec();
    tail.sort_by(|a, b| by_score_desc(b, a));

    let falls = tail
        .iter()
        .enumerate()
        .map(|(i, r)| RankedEntry::from_result(i + 1, r))
        .collect();

    (rises, falls)
}

// ============================================================================
// Progress
// ============================================================================

/// Processed/total counters for the pass in flight.
#[derive(Debug, Default)]
pub struct PassProgress {
    processed: AtomicUsize,
    total: AtomicUsize,
}

impl PassProgress {
    pub fn reset(&self, total: usize) {
        self.total.store(total, Ordering::SeqCst);
        self.processed.store(0, Ordering::SeqCst);
    }

    pub fn record(&self) {
        self.processed.fetch_add(1, Ordering::SeqCst);
    }

    pub fn processed(&self) -> usize {
        self.processed.load(Ordering::SeqCst)
    }

    pub fn total(&self) -> usize {
        self.total.load(Ordering::SeqCst)
    }

    /// Integer percentage, 0 when nothing is scheduled.
    pub fn percent(&self) -> u8 {
        let total = self.total();
        if total == 0 {
            return 0;
        }
        ((self.processed().min(total) * 100) / total) as u8
    }
}

// ============================================================================
// Engine
// ============================================================================

/// Ranking engine configuration.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Entities processed concurrently
    pub concurrency: usize,
    /// Delay range in milliseconds after a network-served entity
    pub politeness_delay_ms: [u64; 2],
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            concurrency: 4,
            politeness_delay_ms: [500, 1500],
        }
    }
}

/// Runs acquisition, aggregation and scoring for a set of entities.
pub struct RankingEngine {
    chain: Arc<SourceChain>,
    aggregator: SentimentAggregator,
    config: EngineConfig,
}

impl RankingEngine {
    pub fn new(chain: Arc<SourceChain>, aggregator: SentimentAggregator, config: EngineConfig) -> Self {
        Self {
            chain,
            aggregator,
            config,
        }
    }

    pub fn chain(&self) -> &Arc<SourceChain> {
        &self.chain
    }

    /// One result per entity, in input order.
    pub async fn run(&self, entities: &[Entity], progress: &PassProgress) -> Vec<EntityResult> {
        let concurrency = self.config.concurrency.max(1);

        stream::iter(entities.iter().cloned())
            .map(|entity| async move {
                let result = self.process(&entity).await;
                progress.record();
                result
            })
            .buffered(concurrency)
            .collect()
            .await
    }

    async fn process(&self, entity: &Entity) -> EntityResult {
        let batch = self.chain.acquire(entity).await;
        let sentiment = self.aggregator.score(&batch.texts);
        let score = prediction_score(&sentiment);

        tracing::debug!(
            symbol = %entity.symbol,
            source = batch.source,
            texts = batch.texts.len(),
            score,
            "Entity scored"
        );

        if batch.network {
            self.politeness_pause().await;
        }

        EntityResult {
            entity: entity.clone(),
            sentiment,
            prediction_score: score,
            sample_texts: batch.texts.into_iter().take(SAMPLE_TEXTS).collect(),
            source: batch.source.to_string(),
        }
    }

    async fn politeness_pause(&self) {
        let [min, max] = self.config.politeness_delay_ms;
        if max == 0 {
            return;
        }
        let millis = rand::thread_rng().gen_range(min.min(max)..=max);
        tokio::time::sleep(Duration::from_millis(millis)).await;
    }
}
