//! Request orchestration: locate, load (or hit the cache), window, infer, reduce.

use std::{
    collections::HashMap,
    path::Path,
    sync::{Arc, Mutex, PoisonError},
    time::{Duration, Instant},
};

use tracing::{debug, info, instrument};

use crate::{
    answer::{AnswerCandidate, collect_answers, reduce},
    cache::{Clock, SystemClock, TtlCache},
    cfg::QaConfig,
    corpus::{Corpus, CorpusLoader, FsCorpusLoader},
    error::QaError,
    inference::{AnswerScoring, Inference},
    segment::Segmenter,
};

/// Result of a successful request.
#[derive(Debug, Clone, PartialEq)]
pub enum AskOutcome {
    /// Best answer across all windows.
    Answered(AnswerCandidate),
    /// The product exists but its documents contain no text to search.
    NoContent,
}

/// Question answering over one product's documents.
///
/// Construct once at startup; the corpus cache lives as long as the pipeline.
pub struct QaPipeline<C: Clock = SystemClock> {
    segmenter: Segmenter,
    cache_ttl: Duration,
    loader: Arc<dyn CorpusLoader>,
    cache: Arc<TtlCache<Corpus, C>>,
    backend: Arc<dyn Inference>,
    /// One gate per product currently being loaded.
    load_gates: Mutex<HashMap<String, Arc<tokio::sync::Mutex<()>>>>,
}

impl QaPipeline<SystemClock> {
    /// Filesystem loader rooted at `cfg.assets_root` and a fresh cache.
    pub fn from_config(cfg: &QaConfig, backend: Arc<dyn Inference>) -> Self {
        let loader = Arc::new(FsCorpusLoader::new(&cfg.assets_root));
        Self::with_parts(cfg, loader, Arc::new(TtlCache::new()), backend)
    }
}

impl<C: Clock> QaPipeline<C> {
    pub fn with_parts(
        cfg: &QaConfig,
        loader: Arc<dyn CorpusLoader>,
        cache: Arc<TtlCache<Corpus, C>>,
        backend: Arc<dyn Inference>,
    ) -> Self {
        Self {
            segmenter: Segmenter::new(cfg.max_words, cfg.overlap_sentences),
            cache_ttl: cfg.cache_ttl,
            loader,
            cache,
            backend,
            load_gates: Mutex::new(HashMap::new()),
        }
    }

    pub fn scoring(&self) -> AnswerScoring {
        self.backend.scoring()
    }

    pub fn cache(&self) -> &TtlCache<Corpus, C> {
        &self.cache
    }

    /// Answers `question` from the documents of `product_id`.
    ///
    /// The product directory is checked on every call, before the cache.
    ///
    /// # Errors
    /// [`QaError::ProductNotFound`] for unknown products; every other
    /// variant is a processing failure.
    #[instrument(name = "ask", skip(self, question))]
    pub async fn ask(&self, question: &str, product_id: &str) -> Result<AskOutcome, QaError> {
        let started = Instant::now();

        let dir = self.loader.locate(product_id).await?;
        let corpus = self.corpus_for(product_id, &dir).await?;

        let segments: Vec<_> = self.segmenter.segments(corpus.text()).collect();
        if segments.is_empty() {
            info!(files = corpus.files(), "no text to search");
            return Ok(AskOutcome::NoContent);
        }

        let candidates = collect_answers(self.backend.as_ref(), question, &segments).await?;
        let best = reduce(candidates, self.backend.scoring())?;

        info!(
            segments = segments.len(),
            score = ?best.score,
            latency_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX),
            "question answered"
        );
        Ok(AskOutcome::Answered(best))
    }

    /// Cached corpus, or a fresh load. Concurrent misses for the same product
    /// wait for a single load instead of each reading the files.
    async fn corpus_for(&self, product_id: &str, dir: &Path) -> Result<Corpus, QaError> {
        if let Some(corpus) = self.cache.get(product_id).await {
            debug!("corpus cache hit");
            return Ok(corpus);
        }

        let gate = self.load_gate(product_id);
        let _loading = gate.lock().await;

        if let Some(corpus) = self.cache.get(product_id).await {
            debug!("corpus loaded by a concurrent request");
            return Ok(corpus);
        }

        debug!(dir = %dir.display(), "corpus cache miss");
        let corpus = self.loader.load(dir).await?;
        self.cache.set(product_id, corpus.clone(), self.cache_ttl).await;
        Ok(corpus)
    }

    fn load_gate(&self, product_id: &str) -> Arc<tokio::sync::Mutex<()>> {
        let mut gates = self.load_gates.lock().unwrap_or_else(PoisonError::into_inner);
        // gates held only by the map have no waiter left
        gates.retain(|_, gate| Arc::strong_count(gate) > 1);
        gates.entry(product_id.to_string()).or_default().clone()
    }
}
