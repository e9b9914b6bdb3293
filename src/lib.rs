//! Latent Dirichlet Allocation trained with collapsed Gibbs sampling.
//!
//! The engine takes a corpus already encoded as vocabulary ids, keeps one
//! topic label per token together with the document-topic, topic-word and
//! topic-total counts, and resamples every label once per [`Lda::step`].
//!
//! ```
//! use gibbslda::{Lda, LdaConfig};
//!
//! let documents = vec![vec![0, 1, 1, 2], vec![3, 4, 3, 4]];
//! let config = LdaConfig::new(2).alpha(0.1).beta(0.1).seed(7);
//! let mut lda = Lda::from_documents(config, documents, 5)?;
//! lda.train(50)?;
//!
//! let phi = lda.topic_word_distribution()?;
//! assert_eq!(phi.len(), 2);
//! let topic = lda.dominant_topic(0)?;
//! assert!(topic < 2);
//! # Ok::<(), gibbslda::LdaError>(())
//! ```

extern crate log;

pub mod config;
pub mod error;
pub mod model;
pub mod report;
pub mod sampler;
mod state;

pub use config::LdaConfig;
pub use error::{LdaError, Result};
pub use model::Lda;
pub use report::{argmax, ranked_words, TopicSummary, TopicWord};

/// Dense word identifier in `0..vocabulary_size`, assigned by the encoder.
pub type VocabId = usize;
/// Topic label in `0..n_topics`.
pub type TopicId = usize;

/// Three topics, α = 0.1, β = 0.01, seed 42, initialized on `documents`.
pub fn default(documents: Vec<Vec<VocabId>>, vocabulary_size: usize) -> Result<Lda> {
    Lda::from_documents(LdaConfig::default().seed(42), documents, vocabulary_size)
}
