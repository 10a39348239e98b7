//! Question answering over a product's plain-text documents.
//!
//! The documents of a product are concatenated, cut into overlapping
//! sentence windows, answered window by window and reduced to one answer.
//!
//! # Example
//! ```no_run
//! use std::sync::Arc;
//! use ai_llm_service::{QaBackend, config::default_config::config_from_env};
//! use doc_qa::{AskOutcome, QaConfig, QaPipeline};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let cfg = QaConfig::from_env()?;
//!     let backend = Arc::new(QaBackend::new(config_from_env()?)?);
//!     let pipeline = QaPipeline::from_config(&cfg, backend);
//!     if let AskOutcome::Answered(a) = pipeline.ask("What are cats?", "p1").await? {
//!         println!("{}", a.text);
//!     }
//!     Ok(())
//! }
//! ```

pub mod answer;
pub mod cache;
pub mod cfg;
pub mod corpus;
pub mod error;
pub mod inference;
pub mod pipeline;
pub mod segment;

pub use answer::{AnswerCandidate, collect_answers, reduce};
pub use cache::{Clock, CorpusCache, ManualClock, SystemClock, TtlCache};
pub use cfg::QaConfig;
pub use corpus::{Corpus, CorpusLoader, FsCorpusLoader};
pub use error::{ErrorKind, InferenceError, QaError};
pub use inference::{AnswerScoring, Inference};
pub use pipeline::{AskOutcome, QaPipeline};
pub use segment::{Segment, Segmenter, Segments};
