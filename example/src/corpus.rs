use std::collections::{HashMap, HashSet};

use gibbslda::VocabId;

fn default_stopwords() -> HashSet<&'static str> {
    [
        "a", "an", "and", "are", "as", "at", "be", "by", "for", "from", "has", "in", "is", "it",
        "its", "of", "on", "or", "that", "the", "this", "to", "was", "were", "will", "with",
    ]
    .into_iter()
    .collect()
}

/// Lowercase, keep alphabetic runs, drop stop words and one-letter tokens.
pub struct Tokenizer {
    stopwords: HashSet<&'static str>,
}

impl Default for Tokenizer {
    fn default() -> Self {
        Self {
            stopwords: default_stopwords(),
        }
    }
}

impl Tokenizer {
    pub fn tokenize(&self, text: &str) -> Vec<String> {
        text.to_lowercase()
            .chars()
            .map(|c| if c.is_alphabetic() { c } else { ' ' })
            .collect::<String>()
            .split_whitespace()
            .filter(|tok| tok.chars().count() >= 2 && !self.stopwords.contains(*tok))
            .map(str::to_string)
            .collect()
    }
}

/// Word <-> id mapping; ids are dense and assigned in first-seen order.
#[derive(Debug, Default)]
pub struct Vocabulary {
    words: Vec<String>,
    ids: HashMap<String, VocabId>,
}

impl Vocabulary {
    /// Encode tokenized documents, growing the vocabulary as needed.
    pub fn encode(&mut self, documents: &[Vec<String>]) -> Vec<Vec<VocabId>> {
        documents
            .iter()
            .map(|doc| doc.iter().map(|w| self.id_or_insert(w)).collect())
            .collect()
    }

    fn id_or_insert(&mut self, word: &str) -> VocabId {
        if let Some(&id) = self.ids.get(word) {
            return id;
        }
        let id = self.words.len();
        self.words.push(word.to_string());
        self.ids.insert(word.to_string(), id);
        id
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn words(&self) -> &[String] {
        &self.words
    }
}
