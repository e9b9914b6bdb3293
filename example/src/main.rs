extern crate log;

mod corpus;

use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL;
use comfy_table::*;

use corpus::{Tokenizer, Vocabulary};
use gibbslda::{Lda, LdaConfig};

// Short notes on three themes: gardening, astronomy and baking.
const DOCUMENTS: &[&str] = &[
    "Tomato seedlings need rich soil, steady watering and plenty of sunlight before they are moved into the garden beds",
    "The telescope revealed the rings of Saturn and several moons drifting across the dark night sky",
    "Knead the bread dough until smooth, let it rise in a warm kitchen, then bake the loaf until the crust turns golden",
    "Compost enriches garden soil, and mulch keeps moisture around the roots of young seedlings during dry summer weeks",
    "Astronomers track distant galaxies and faint stars, measuring light that left them long before our planet formed",
    "Butter, flour and sugar form the base of most cake recipes; bake the batter in a hot oven until a golden crust appears",
    "A clear night away from city lights is best for watching meteors, planets and the bright band of stars overhead",
    "Pruning roses in early spring and watering the beds at dawn keeps the garden healthy through the summer",
];

const TOPICS: usize = 3;
const ALPHA: f64 = 0.1;
const BETA: f64 = 0.01;
const SEED: u64 = 42;
const SWEEPS: usize = 200;
const TOP_WORDS: usize = 8;

fn main() -> gibbslda::Result<()> {
    env_logger::init();

    let tokenizer = Tokenizer::default();
    let tokenized: Vec<Vec<String>> = DOCUMENTS.iter().map(|d| tokenizer.tokenize(d)).collect();
    let mut vocabulary = Vocabulary::default();
    let documents = vocabulary.encode(&tokenized);
    log::info!(
        "encoded {} documents over {} distinct words",
        documents.len(),
        vocabulary.len()
    );

    let config = LdaConfig::new(TOPICS).alpha(ALPHA).beta(BETA).seed(SEED);
    let mut lda = Lda::from_documents(config, documents, vocabulary.len())?;
    println!("Training LDA (K={TOPICS}, sweeps={SWEEPS})...");
    lda.train(SWEEPS)?;

    let mut topics_table = Table::new();
    topics_table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            Cell::new("Topic ID").fg(Color::Red),
            Cell::new("Tokens").fg(Color::Red),
            Cell::new("Share").fg(Color::Red),
            Cell::new("Words").fg(Color::White),
        ]);
    for summary in lda.topic_summaries(vocabulary.words(), TOP_WORDS)? {
        let words = summary
            .words
            .iter()
            .map(|w| format!("{}: {:.3} ({})", w.word, w.probability, w.count))
            .collect::<Vec<_>>()
            .join("\n");
        topics_table.add_row(vec![
            Cell::new(summary.index),
            Cell::new(summary.tokens),
            Cell::new(format!("{:.1}%", summary.prevalence * 100.0)),
            Cell::new(words),
        ]);
    }
    println!("{topics_table}");

    let mut docs_table = Table::new();
    docs_table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            Cell::new("Document").fg(Color::Red),
            Cell::new("Topic").fg(Color::Red),
            Cell::new("Text").fg(Color::White),
        ]);
    for (m, topic) in lda.dominant_topics()?.into_iter().enumerate() {
        let preview: String = DOCUMENTS[m].chars().take(60).collect();
        docs_table.add_row(vec![
            Cell::new(m),
            Cell::new(topic),
            Cell::new(format!("{preview}...")),
        ]);
    }
    println!("{docs_table}");

    if let Some(perplexity) = lda.perplexity()? {
        println!("Perplexity after {} sweeps: {perplexity:.3}", lda.sweeps());
    }
    Ok(())
}
