use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::config::LdaConfig;
use crate::error::{LdaError, Result};
use crate::report;
use crate::state::GibbsState;
use crate::{TopicId, VocabId};

/// LDA trained with collapsed Gibbs sampling.
///
/// The model owns its count statistics and topic assignments. Accessors hand
/// out copies or shared slices, never mutable views into live state.
#[derive(Debug)]
pub struct Lda<R = StdRng> {
    config: LdaConfig,
    rng: R,
    state: Option<GibbsState>,
    sweeps: usize,
    degenerate_draws: usize,
}

impl Lda<StdRng> {
    /// Create an uninitialized model with a `StdRng` seeded from
    /// `config.seed`, or from OS entropy when no seed is set.
    pub fn new(config: LdaConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self::with_rng(config, rng)
    }

    /// Create and initialize a model in one call.
    pub fn from_documents(
        config: LdaConfig,
        documents: Vec<Vec<VocabId>>,
        vocabulary_size: usize,
    ) -> Result<Self> {
        let mut lda = Self::new(config);
        lda.initialize(documents, vocabulary_size)?;
        Ok(lda)
    }
}

impl<R: Rng> Lda<R> {
    /// Create an uninitialized model drawing randomness from `rng`.
    pub fn with_rng(config: LdaConfig, rng: R) -> Self {
        Self {
            config,
            rng,
            state: None,
            sweeps: 0,
            degenerate_draws: 0,
        }
    }

    /// Build fresh count statistics for `documents` with a random topic per
    /// token. Any previous state is discarded, even if this call fails.
    pub fn initialize(&mut self, documents: Vec<Vec<VocabId>>, vocabulary_size: usize) -> Result<()> {
        self.state = None;
        self.sweeps = 0;
        self.degenerate_draws = 0;
        self.config.validate()?;

        let state = GibbsState::new(
            documents,
            vocabulary_size,
            self.config.n_topics,
            self.config.alpha,
            self.config.beta,
            &mut self.rng,
        )?;
        log::info!(
            "LDA initialized: {} documents, {} tokens, vocabulary {}, K={}",
            state.documents().len(),
            state.token_count(),
            vocabulary_size,
            self.config.n_topics
        );
        self.state = Some(state);
        Ok(())
    }

    /// One Gibbs sweep: resample every token once, documents in order and
    /// tokens left to right.
    pub fn step(&mut self) -> Result<()> {
        let state = self.state.as_mut().ok_or(LdaError::UninitializedModel)?;

        let mut degenerate = 0;
        for m in 0..state.documents().len() {
            for n in 0..state.document_len(m) {
                if state.resample_token(m, n, &mut self.rng) {
                    degenerate += 1;
                }
            }
        }

        self.sweeps += 1;
        if degenerate > 0 {
            log::warn!(
                "sweep {}: {} tokens had degenerate conditional weights, drawn uniformly",
                self.sweeps,
                degenerate
            );
            self.degenerate_draws += degenerate;
        }
        Ok(())
    }

    /// Run `sweeps` successive calls to [`step`](Self::step).
    pub fn train(&mut self, sweeps: usize) -> Result<()> {
        for it in 0..sweeps {
            self.step()?;
            if (it + 1) % 50 == 0 {
                log::debug!("Training LDA: sweep {}/{}", it + 1, sweeps);
            }
        }
        Ok(())
    }
}

impl<R> Lda<R> {
    fn state(&self) -> Result<&GibbsState> {
        self.state.as_ref().ok_or(LdaError::UninitializedModel)
    }

    fn check_document(&self, m: usize) -> Result<&GibbsState> {
        let state = self.state()?;
        let len = state.documents().len();
        if m >= len {
            return Err(LdaError::DocumentOutOfRange { index: m, len });
        }
        Ok(state)
    }

    pub fn config(&self) -> &LdaConfig {
        &self.config
    }

    pub fn is_initialized(&self) -> bool {
        self.state.is_some()
    }

    /// Sweeps run since the last `initialize`.
    pub fn sweeps(&self) -> usize {
        self.sweeps
    }

    /// Tokens whose conditional weights could not be normalized and were
    /// reassigned uniformly, since the last `initialize`.
    pub fn degenerate_draws(&self) -> usize {
        self.degenerate_draws
    }

    pub fn n_topics(&self) -> usize {
        self.config.n_topics
    }

    pub fn document_count(&self) -> Result<usize> {
        Ok(self.state()?.documents().len())
    }

    pub fn vocabulary_size(&self) -> Result<usize> {
        Ok(self.state()?.vocabulary_size())
    }

    pub fn token_count(&self) -> Result<usize> {
        Ok(self.state()?.token_count())
    }

    pub fn documents(&self) -> Result<&[Vec<VocabId>]> {
        Ok(self.state()?.documents())
    }

    /// Current topic of every token, `[doc][position]`.
    pub fn assignments(&self) -> Result<&[Vec<TopicId>]> {
        Ok(self.state()?.assignments())
    }

    /// `nZ`: tokens per topic plus `V * beta`.
    pub fn topic_totals(&self) -> Result<Vec<f64>> {
        let state = self.state()?;
        Ok((0..state.n_topics()).map(|k| state.topic_total(k)).collect())
    }

    /// `nZT`: word pseudo-counts per topic, `[topic][word]`.
    pub fn topic_word_counts(&self) -> Result<Vec<Vec<f64>>> {
        let state = self.state()?;
        let v = state.vocabulary_size();
        Ok((0..state.n_topics())
            .map(|k| (0..v).map(|t| state.topic_word(k, t)).collect())
            .collect())
    }

    /// `nMZ[m]`: unnormalized topic pseudo-counts of document `m`.
    pub fn document_topic_counts(&self, m: usize) -> Result<Vec<f64>> {
        let state = self.check_document(m)?;
        Ok((0..state.n_topics()).map(|k| state.doc_topic(m, k)).collect())
    }

    /// θ[m][k] = nMZ[m][k] / (N_m + K*α)
    pub fn document_topic_distribution(&self, m: usize) -> Result<Vec<f64>> {
        let state = self.check_document(m)?;
        let k = state.n_topics();
        let denom = state.document_len(m) as f64 + k as f64 * state.alpha();
        Ok((0..k).map(|z| state.doc_topic(m, z) / denom).collect())
    }

    /// θ for every document.
    pub fn theta(&self) -> Result<Vec<Vec<f64>>> {
        let d = self.document_count()?;
        (0..d).map(|m| self.document_topic_distribution(m)).collect()
    }

    /// φ[k][t] = nZT[k][t] / nZ[k]
    pub fn topic_word_distribution(&self) -> Result<Vec<Vec<f64>>> {
        let state = self.state()?;
        let v = state.vocabulary_size();
        Ok((0..state.n_topics())
            .map(|k| {
                let denom = state.topic_total(k);
                (0..v).map(|t| state.topic_word(k, t) / denom).collect()
            })
            .collect())
    }

    /// Alias of [`topic_word_distribution`](Self::topic_word_distribution).
    pub fn phi(&self) -> Result<Vec<Vec<f64>>> {
        self.topic_word_distribution()
    }

    /// Most probable topic of document `m`; the lowest index wins ties.
    pub fn dominant_topic(&self, m: usize) -> Result<TopicId> {
        let counts = self.document_topic_counts(m)?;
        // n_topics >= 1 once initialized
        Ok(report::argmax(&counts).unwrap_or(0))
    }

    pub fn dominant_topics(&self) -> Result<Vec<TopicId>> {
        let d = self.document_count()?;
        (0..d).map(|m| self.dominant_topic(m)).collect()
    }

    /// exp(-Σ ln p(w|d) / N) over the training tokens. `None` for a corpus
    /// without tokens.
    pub fn perplexity(&self) -> Result<Option<f64>> {
        let state = self.state()?;
        let n = state.token_count();
        if n == 0 {
            return Ok(None);
        }
        let theta = self.theta()?;
        let phi = self.phi()?;

        let mut log_likelihood = 0.0;
        for (m, doc) in state.documents().iter().enumerate() {
            for &t in doc {
                let p: f64 = (0..state.n_topics()).map(|k| theta[m][k] * phi[k][t]).sum();
                log_likelihood += p.ln();
            }
        }
        Ok(Some((-log_likelihood / n as f64).exp()))
    }

    /// Recompute every aggregate from the assignments and compare it with the
    /// cached counts.
    pub fn verify_counts(&self) -> Result<()> {
        self.state()?.verify()
    }

    pub(crate) fn topic_tokens(&self) -> Result<Vec<usize>> {
        let state = self.state()?;
        Ok((0..state.n_topics()).map(|k| state.topic_tokens(k)).collect())
    }

    pub(crate) fn topic_word_tokens(&self) -> Result<Vec<Vec<usize>>> {
        let state = self.state()?;
        let v = state.vocabulary_size();
        Ok((0..state.n_topics())
            .map(|k| (0..v).map(|t| state.topic_word_tokens(k, t)).collect())
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn corpus() -> Vec<Vec<VocabId>> {
        vec![
            vec![0, 1, 2, 0, 1],
            vec![1, 2, 0, 2],
            vec![3, 4, 5, 3],
            vec![4, 5, 3, 5, 4],
        ]
    }

    fn model(k: usize, seed: u64) -> Lda {
        Lda::from_documents(LdaConfig::new(k).alpha(0.1).beta(0.1).seed(seed), corpus(), 6).unwrap()
    }

    #[test]
    fn uninitialized_model_reports_error() {
        let mut lda = Lda::new(LdaConfig::new(2).seed(1));
        assert!(!lda.is_initialized());
        assert_eq!(lda.step(), Err(LdaError::UninitializedModel));
        assert_eq!(lda.train(3), Err(LdaError::UninitializedModel));
        assert!(matches!(lda.phi(), Err(LdaError::UninitializedModel)));
        assert!(matches!(lda.theta(), Err(LdaError::UninitializedModel)));
        assert!(matches!(lda.document_topic_counts(0), Err(LdaError::UninitializedModel)));
        assert!(matches!(lda.assignments(), Err(LdaError::UninitializedModel)));
    }

    #[test]
    fn invalid_config_fails_initialize() {
        let mut lda = Lda::new(LdaConfig::new(0).seed(1));
        assert!(matches!(
            lda.initialize(corpus(), 6),
            Err(LdaError::InvalidParameter(_))
        ));
        let mut lda = Lda::new(LdaConfig::new(2).alpha(-0.5).seed(1));
        assert!(lda.initialize(corpus(), 6).is_err());
        assert!(!lda.is_initialized());
    }

    #[test]
    fn out_of_range_vocabulary_fails_initialize() {
        let mut lda = Lda::new(LdaConfig::new(2).seed(1));
        assert!(matches!(
            lda.initialize(corpus(), 5),
            Err(LdaError::InvalidParameter(_))
        ));
    }

    #[test]
    fn failed_reinitialize_discards_previous_model() {
        let mut lda = model(2, 3);
        lda.train(2).unwrap();
        assert!(lda.initialize(vec![vec![9]], 2).is_err());
        assert!(!lda.is_initialized());
        assert_eq!(lda.sweeps(), 0);
    }

    #[test]
    fn step_counts_sweeps_and_keeps_counts() {
        let mut lda = model(3, 4);
        lda.train(5).unwrap();
        assert_eq!(lda.sweeps(), 5);
        assert_eq!(lda.degenerate_draws(), 0);
        lda.verify_counts().unwrap();
        assert_eq!(lda.token_count().unwrap(), 18);
    }

    #[test]
    fn distributions_are_normalized() {
        let mut lda = model(3, 5);
        lda.train(10).unwrap();
        for row in lda.phi().unwrap() {
            assert!(row.iter().all(|&p| (0.0..=1.0).contains(&p)));
            assert!((row.iter().sum::<f64>() - 1.0).abs() < 1e-9);
        }
        for row in lda.theta().unwrap() {
            assert!((row.iter().sum::<f64>() - 1.0).abs() < 1e-9);
        }
    }

    #[test]
    fn document_topic_counts_include_alpha() {
        let lda = model(2, 6);
        for m in 0..4 {
            let counts = lda.document_topic_counts(m).unwrap();
            assert!(counts.iter().all(|&c| c >= 0.1));
            let tokens: f64 = counts.iter().map(|c| c - 0.1).sum();
            assert!((tokens - corpus()[m].len() as f64).abs() < 1e-9);
        }
        assert_eq!(
            lda.document_topic_counts(4),
            Err(LdaError::DocumentOutOfRange { index: 4, len: 4 })
        );
    }

    #[test]
    fn separated_corpus_splits_documents() {
        let documents = corpus()
            .into_iter()
            .map(|doc| doc.repeat(4))
            .collect();
        let config = LdaConfig::new(2).alpha(0.1).beta(0.1).seed(42);
        let mut lda = Lda::from_documents(config, documents, 6).unwrap();
        lda.train(200).unwrap();
        let dominant = lda.dominant_topics().unwrap();
        assert_eq!(dominant[0], dominant[1]);
        assert_eq!(dominant[2], dominant[3]);
        assert_ne!(dominant[0], dominant[2]);
    }

    #[test]
    fn perplexity_is_bounded_by_vocabulary() {
        let mut lda = model(2, 8);
        lda.train(50).unwrap();
        let p = lda.perplexity().unwrap().unwrap();
        assert!(p >= 1.0 && p <= 6.0, "perplexity {p}");

        let empty = Lda::from_documents(LdaConfig::new(2).seed(1), vec![], 3).unwrap();
        assert_eq!(empty.perplexity().unwrap(), None);
    }
}
