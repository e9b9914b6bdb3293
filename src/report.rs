//! Read-only views over a trained model: dominant topics and top words.

use std::collections::HashMap;
use std::fmt;

use crate::error::Result;
use crate::model::Lda;
use crate::VocabId;

type TopicWords = HashMap<usize, HashMap<String, f64>>;

/// Index of the largest value, first one on ties. `None` for an empty slice.
pub fn argmax(values: &[f64]) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (i, &v) in values.iter().enumerate() {
        match best {
            Some((_, b)) if v <= b => {}
            _ => best = Some((i, v)),
        }
    }
    best.map(|(i, _)| i)
}

/// The `n` highest-scoring ids of `row`, descending. Equal scores keep
/// vocabulary-id order.
pub fn ranked_words(row: &[f64], n: usize) -> Vec<(VocabId, f64)> {
    let mut pairs: Vec<(VocabId, f64)> = row.iter().copied().enumerate().collect();
    // sort_by is stable
    pairs.sort_by(|a, b| b.1.total_cmp(&a.1));
    pairs.truncate(n);
    pairs
}

/// A ranked word within a topic.
#[derive(Debug, Clone, PartialEq)]
pub struct TopicWord {
    pub word: String,
    /// φ[k][t]
    pub probability: f64,
    /// Occurrences of the word currently assigned to the topic.
    pub count: usize,
}

/// A topic labelled with words.
#[derive(Debug, Clone, PartialEq)]
pub struct TopicSummary {
    pub index: usize,
    pub words: Vec<TopicWord>,
    /// Tokens assigned to the topic.
    pub tokens: usize,
    /// Share of corpus tokens assigned to the topic.
    pub prevalence: f64,
}

impl fmt::Display for TopicSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Topic {} ({} words, {:.2}%): ",
            self.index,
            self.tokens,
            self.prevalence * 100.0
        )?;
        for (i, w) in self.words.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}: {:.3} ({})", w.word, w.probability, w.count)?;
        }
        Ok(())
    }
}

impl<R> Lda<R> {
    /// Top `n` vocabulary ids for each topic by φ[k][t].
    pub fn top_words(&self, n: usize) -> Result<Vec<Vec<(VocabId, f64)>>> {
        Ok(self
            .phi()?
            .iter()
            .map(|row| ranked_words(row, n))
            .collect())
    }

    /// Top `n` words per topic labelled through `vocabulary` (id -> word).
    /// Ids without a label are skipped.
    pub fn topic_summaries<S: AsRef<str>>(&self, vocabulary: &[S], n: usize) -> Result<Vec<TopicSummary>> {
        let tokens = self.topic_tokens()?;
        let word_tokens = self.topic_word_tokens()?;
        let total: usize = tokens.iter().sum();
        let tops = self.top_words(n)?;

        Ok(tops
            .into_iter()
            .enumerate()
            .map(|(index, ranked)| TopicSummary {
                index,
                words: ranked
                    .into_iter()
                    .filter_map(|(t, probability)| {
                        vocabulary.get(t).map(|w| TopicWord {
                            word: w.as_ref().to_string(),
                            probability,
                            count: word_tokens[index][t],
                        })
                    })
                    .collect(),
                tokens: tokens[index],
                prevalence: if total == 0 {
                    0.0
                } else {
                    tokens[index] as f64 / total as f64
                },
            })
            .collect())
    }

    /// Top words keyed by topic index.
    pub fn topics<S: AsRef<str>>(&self, vocabulary: &[S], n: usize) -> Result<TopicWords> {
        Ok(self
            .topic_summaries(vocabulary, n)?
            .into_iter()
            .map(|s| {
                let words = s.words.into_iter().map(|w| (w.word, w.probability)).collect();
                (s.index, words)
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::LdaConfig;

    #[test]
    fn argmax_takes_first_maximum() {
        assert_eq!(argmax(&[]), None);
        assert_eq!(argmax(&[0.3]), Some(0));
        assert_eq!(argmax(&[0.1, 0.5, 0.5, 0.2]), Some(1));
        assert_eq!(argmax(&[2.0, 2.0]), Some(0));
    }

    #[test]
    fn ranked_words_is_stable() {
        let row = [0.1, 0.3, 0.1, 0.3, 0.2];
        assert_eq!(
            ranked_words(&row, 4),
            vec![(1, 0.3), (3, 0.3), (4, 0.2), (0, 0.1)]
        );
        assert_eq!(ranked_words(&row, 10).len(), 5);
        assert!(ranked_words(&row, 0).is_empty());
    }

    #[test]
    fn summaries_label_words() {
        let vocab = ["apple", "banana", "cherry"];
        let config = LdaConfig::new(1).alpha(0.1).beta(0.1).seed(1);
        let lda = Lda::from_documents(config, vec![vec![0, 0, 0, 1], vec![2, 0]], 3).unwrap();

        let summaries = lda.topic_summaries(&vocab, 2).unwrap();
        assert_eq!(summaries.len(), 1);
        let top = &summaries[0];
        assert_eq!(top.prevalence, 1.0);
        assert_eq!(top.tokens, 6);
        assert_eq!(top.words[0].word, "apple");
        assert_eq!(top.words[0].count, 4);
        assert_eq!(top.words[1].word, "banana");
        assert_eq!(top.words[1].count, 1);
        assert!(top.to_string().starts_with("Topic 0 (6 words, 100.00%): apple: 0.651 (4), banana"));

        let topics = lda.topics(&vocab, 3).unwrap();
        assert_eq!(topics[&0].len(), 3);
    }

    #[test]
    fn word_counts_follow_assignments() {
        let config = LdaConfig::new(3).seed(4);
        let mut lda = Lda::from_documents(config, vec![vec![0, 1, 1, 2], vec![2, 2, 0]], 3).unwrap();
        lda.train(2).unwrap();

        let summaries = lda.topic_summaries(&["a", "b", "c"], 3).unwrap();
        let mut per_word = [0usize; 3];
        for s in &summaries {
            assert_eq!(s.words.iter().map(|w| w.count).sum::<usize>(), s.tokens);
            for w in &s.words {
                per_word[["a", "b", "c"].iter().position(|&x| x == w.word).unwrap()] += w.count;
            }
        }
        assert_eq!(per_word, [2, 2, 3]);
        assert_eq!(summaries.iter().map(|s| s.tokens).sum::<usize>(), 7);
    }

    #[test]
    fn unlabelled_ids_are_skipped() {
        let config = LdaConfig::new(2).seed(1);
        let lda = Lda::from_documents(config, vec![vec![0, 1, 2]], 3).unwrap();
        let summaries = lda.topic_summaries(&["only"], 3).unwrap();
        assert!(summaries.iter().all(|s| s.words.len() == 1));
    }
}
