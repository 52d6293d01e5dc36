use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use causeway_core::ekb::{DocumentContext, DocumentTree, PatternMatcher};

pub fn run(file: &Path) -> Result<()> {
    let xml =
        fs::read_to_string(file).with_context(|| format!("reading {}", file.display()))?;

    let tree = DocumentTree::parse(&xml)
        .with_context(|| format!("parsing {}", file.display()))?;
    let context = DocumentContext::from_tree(&tree);
    let matcher = PatternMatcher::new(&tree);

    println!(
        "document: {}",
        context.document_id().unwrap_or("<unidentified>")
    );
    println!("paragraphs: {}", context.paragraph_count());
    println!("sentences: {}", context.sentence_count());
    println!("causal connectives: {}", matcher.causal_connectives().len());
    println!("affect events: {}", matcher.affect_events().len());
    println!(
        "influence connectives: {}",
        matcher.influence_connectives().len()
    );

    Ok(())
}
