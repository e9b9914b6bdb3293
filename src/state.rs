//! Sufficient statistics of the collapsed Gibbs sampler.
//!
//! Counts are kept as exact integers. The Dirichlet priors are added when a
//! value is read, so `doc_topic(m, k)` is `nMZ[m][k]`, `topic_word(k, t)` is
//! `nZT[k][t]` and `topic_total(k)` is `nZ[k]` including their smoothing mass.

use rand::Rng;

use crate::error::{LdaError, Result};
use crate::sampler;
use crate::{TopicId, VocabId};

#[derive(Debug, Clone)]
pub(crate) struct GibbsState {
    alpha: f64,
    beta: f64,
    n_topics: usize,
    vocabulary_size: usize,

    docs: Vec<Vec<VocabId>>,

    z: Vec<Vec<TopicId>>,   // [doc][position]: topic of each token
    ndk: Vec<Vec<usize>>,   // [doc][topic]: # tokens in doc assigned to topic
    nkw: Vec<Vec<usize>>,   // [topic][word]: # occurrences of word in topic
    nk: Vec<usize>,         // [topic]: total tokens assigned to topic

    weights: Vec<f64>, // scratch buffer for the conditional distribution
}

impl GibbsState {
    /// Validate the corpus and draw a uniformly random topic for every token.
    pub(crate) fn new<R: Rng + ?Sized>(
        docs: Vec<Vec<VocabId>>,
        vocabulary_size: usize,
        n_topics: usize,
        alpha: f64,
        beta: f64,
        rng: &mut R,
    ) -> Result<Self> {
        for (m, doc) in docs.iter().enumerate() {
            if let Some((n, &t)) = doc.iter().enumerate().find(|&(_, &t)| t >= vocabulary_size) {
                return Err(LdaError::InvalidParameter(format!(
                    "vocabulary id {t} at document {m}, position {n} is outside 0..{vocabulary_size}"
                )));
            }
        }

        let d = docs.len();
        let mut state = Self {
            alpha,
            beta,
            n_topics,
            vocabulary_size,
            z: Vec::with_capacity(d),
            ndk: vec![vec![0; n_topics]; d],
            nkw: vec![vec![0; vocabulary_size]; n_topics],
            nk: vec![0; n_topics],
            weights: vec![0.0; n_topics],
            docs,
        };

        for (m, doc) in state.docs.iter().enumerate() {
            let mut zn = Vec::with_capacity(doc.len());
            for &t in doc {
                let k = sampler::sample_uniform(n_topics, rng);
                zn.push(k);
                state.ndk[m][k] += 1;
                state.nkw[k][t] += 1;
                state.nk[k] += 1;
            }
            state.z.push(zn);
        }

        Ok(state)
    }

    /// Resample the topic of token `n` in document `m`.
    ///
    /// Returns `true` when the conditional weights were degenerate and the
    /// new topic was drawn uniformly instead.
    pub(crate) fn resample_token<R: Rng + ?Sized>(&mut self, m: usize, n: usize, rng: &mut R) -> bool {
        let t = self.retract(m, n);
        self.conditional(m, t);

        let (new, degenerate) = match sampler::normalize(&mut self.weights)
            .and_then(|_| sampler::sample_categorical(&self.weights, rng))
        {
            Ok(k) => (k, false),
            Err(_) => (sampler::sample_uniform(self.n_topics, rng), true),
        };

        self.assign(m, n, new);
        degenerate
    }

    /// Remove token `n` of document `m` from every count and return its word.
    fn retract(&mut self, m: usize, n: usize) -> VocabId {
        let t = self.docs[m][n];
        let old = self.z[m][n];
        self.ndk[m][old] -= 1;
        self.nkw[old][t] -= 1;
        self.nk[old] -= 1;
        t
    }

    /// Fill `weights` with the unnormalized conditional of word `t` in
    /// document `m`: `p(k) ∝ nZT[k][t] * nMZ[m][k] / nZ[k]`.
    fn conditional(&mut self, m: usize, t: VocabId) {
        let vb = self.vocabulary_size as f64 * self.beta;
        for k in 0..self.n_topics {
            let word = self.nkw[k][t] as f64 + self.beta;
            let doc = self.ndk[m][k] as f64 + self.alpha;
            let total = self.nk[k] as f64 + vb;
            self.weights[k] = word * doc / total;
        }
    }

    fn assign(&mut self, m: usize, n: usize, k: TopicId) {
        let t = self.docs[m][n];
        self.z[m][n] = k;
        self.ndk[m][k] += 1;
        self.nkw[k][t] += 1;
        self.nk[k] += 1;
    }

    pub(crate) fn n_topics(&self) -> usize {
        self.n_topics
    }

    pub(crate) fn vocabulary_size(&self) -> usize {
        self.vocabulary_size
    }

    pub(crate) fn alpha(&self) -> f64 {
        self.alpha
    }

    pub(crate) fn documents(&self) -> &[Vec<VocabId>] {
        &self.docs
    }

    pub(crate) fn document_len(&self, m: usize) -> usize {
        self.docs[m].len()
    }

    pub(crate) fn assignments(&self) -> &[Vec<TopicId>] {
        &self.z
    }

    pub(crate) fn token_count(&self) -> usize {
        self.docs.iter().map(Vec::len).sum()
    }

    /// `nMZ[m][k]`
    pub(crate) fn doc_topic(&self, m: usize, k: TopicId) -> f64 {
        self.ndk[m][k] as f64 + self.alpha
    }

    /// `nZT[k][t]`
    pub(crate) fn topic_word(&self, k: TopicId, t: VocabId) -> f64 {
        self.nkw[k][t] as f64 + self.beta
    }

    /// `nZ[k]`
    pub(crate) fn topic_total(&self, k: TopicId) -> f64 {
        self.nk[k] as f64 + self.vocabulary_size as f64 * self.beta
    }

    /// Occurrences of word `t` assigned to topic `k`, priors excluded.
    pub(crate) fn topic_word_tokens(&self, k: TopicId, t: VocabId) -> usize {
        self.nkw[k][t]
    }

    /// Tokens currently assigned to topic `k`, priors excluded.
    pub(crate) fn topic_tokens(&self, k: TopicId) -> usize {
        self.nk[k]
    }

    /// Rebuild every aggregate from `z` and compare with the cached counts.
    pub(crate) fn verify(&self) -> Result<()> {
        let mut ndk = vec![vec![0usize; self.n_topics]; self.docs.len()];
        let mut nkw = vec![vec![0usize; self.vocabulary_size]; self.n_topics];
        let mut nk = vec![0usize; self.n_topics];

        for (m, (doc, zn)) in self.docs.iter().zip(&self.z).enumerate() {
            if doc.len() != zn.len() {
                return Err(LdaError::InconsistentState(format!(
                    "document {m} has {} tokens but {} assignments",
                    doc.len(),
                    zn.len()
                )));
            }
            for (&t, &k) in doc.iter().zip(zn) {
                if k >= self.n_topics {
                    return Err(LdaError::InconsistentState(format!(
                        "document {m} holds topic {k} outside 0..{}",
                        self.n_topics
                    )));
                }
                ndk[m][k] += 1;
                nkw[k][t] += 1;
                nk[k] += 1;
            }
        }

        if let Some(m) = (0..self.docs.len()).find(|&m| ndk[m] != self.ndk[m]) {
            return Err(LdaError::InconsistentState(format!(
                "document-topic counts of document {m} disagree"
            )));
        }
        if let Some(k) = (0..self.n_topics).find(|&k| nkw[k] != self.nkw[k]) {
            return Err(LdaError::InconsistentState(format!(
                "topic-word counts of topic {k} disagree"
            )));
        }
        if nk != self.nk {
            return Err(LdaError::InconsistentState("topic totals disagree".into()));
        }
        Ok(())
    }
}
