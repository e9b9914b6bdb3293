use crate::error::{LdaError, Result};

/// Hyper-parameters of an LDA model.
#[derive(Debug, Clone, PartialEq)]
pub struct LdaConfig {
    /// Number of latent topics.
    pub n_topics: usize,
    /// Dirichlet prior for document-topic distributions.
    pub alpha: f64,
    /// Dirichlet prior for topic-word distributions.
    pub beta: f64,
    /// Seed for the default random source; `None` draws from OS entropy.
    pub seed: Option<u64>,
}

impl Default for LdaConfig {
    fn default() -> Self {
        Self {
            n_topics: 3,
            alpha: 0.1,
            beta: 0.01,
            seed: None,
        }
    }
}

impl LdaConfig {
    pub fn new(n_topics: usize) -> Self {
        Self {
            n_topics,
            ..Default::default()
        }
    }

    pub fn n_topics(mut self, n_topics: usize) -> Self {
        self.n_topics = n_topics;
        self
    }

    pub fn alpha(mut self, alpha: f64) -> Self {
        self.alpha = alpha;
        self
    }

    pub fn beta(mut self, beta: f64) -> Self {
        self.beta = beta;
        self
    }

    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Check the hyper-parameters before any state is built from them.
    pub fn validate(&self) -> Result<()> {
        if self.n_topics < 1 {
            return Err(LdaError::InvalidParameter(
                "number of topics must be at least 1".into(),
            ));
        }
        if !(self.alpha.is_finite() && self.alpha > 0.0) {
            return Err(LdaError::InvalidParameter(format!(
                "alpha must be positive, got {}",
                self.alpha
            )));
        }
        if !(self.beta.is_finite() && self.beta > 0.0) {
            return Err(LdaError::InvalidParameter(format!(
                "beta must be positive, got {}",
                self.beta
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_sets_fields() {
        let config = LdaConfig::new(7).alpha(0.5).beta(0.2).seed(9);
        assert_eq!(config.n_topics, 7);
        assert_eq!(config.alpha, 0.5);
        assert_eq!(config.beta, 0.2);
        assert_eq!(config.seed, Some(9));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn rejects_bad_hyperparameters() {
        assert!(matches!(
            LdaConfig::new(0).validate(),
            Err(LdaError::InvalidParameter(_))
        ));
        assert!(LdaConfig::default().alpha(0.0).validate().is_err());
        assert!(LdaConfig::default().alpha(-1.0).validate().is_err());
        assert!(LdaConfig::default().beta(0.0).validate().is_err());
        assert!(LdaConfig::default().beta(f64::NAN).validate().is_err());
        assert!(LdaConfig::default().alpha(f64::INFINITY).validate().is_err());
    }
}
