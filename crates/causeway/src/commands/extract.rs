use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use causeway_core::{CausalExtractor, ExtractionOutput};
use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Serialize)]
struct Envelope {
    source_path: String,
    extracted_at: DateTime<Utc>,
    #[serde(flatten)]
    output: ExtractionOutput,
}

pub fn run(files: &[PathBuf], pretty: bool, destination: Option<&Path>) -> Result<()> {
    let extractor = CausalExtractor::new();
    let mut envelopes = Vec::new();

    for file in files {
        let xml = fs::read_to_string(file)
            .with_context(|| format!("reading {}", file.display()))?;
        let output = extractor.extract(&xml);

        tracing::info!(
            path = %file.display(),
            statements = output.statements.len(),
            dropped = output.stats.dropped_candidates,
            "extracted document"
        );

        envelopes.push(Envelope {
            source_path: file.display().to_string(),
            extracted_at: Utc::now(),
            output,
        });
    }

    // A single input reads better as a single object.
    let json = if envelopes.len() == 1 {
        render(&envelopes[0], pretty)?
    } else {
        render(&envelopes, pretty)?
    };

    match destination {
        Some(path) => {
            fs::write(path, format!("{json}\n"))
                .with_context(|| format!("writing {}", path.display()))?;
        }
        None => println!("{json}"),
    }

    Ok(())
}

fn render<T: Serialize>(value: &T, pretty: bool) -> Result<String> {
    let json = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    Ok(json)
}
