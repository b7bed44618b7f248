//! Citation-id allocation and style-templated citation text, grounded
//! in the templated human-readable string helpers used elsewhere for
//! summary rendering.

use crate::chunk::Chunk;
use crate::search::types::{Citation, CitationStyle};

/// `0 -> "A"`, `25 -> "Z"`, `26 -> "AA"`, following spreadsheet-column
/// numbering so the id space never runs out.
#[must_use]
pub fn alphabetic_id(mut index: usize) -> String {
    let mut letters = Vec::new();
    loop {
        let remainder = index % 26;
        letters.push((b'A' + remainder as u8) as char);
        if index < 26 {
            break;
        }
        index = index / 26 - 1;
    }
    letters.iter().rev().collect()
}

/// Render one citation for `chunk` in the requested style.
#[must_use]
pub fn render_citation(
    id: &str,
    chunk: &Chunk,
    relevance: f32,
    style: CitationStyle,
    custom_template: Option<&str>,
) -> Citation {
    let summary = chunk
        .summary
        .clone()
        .unwrap_or_else(|| truncate(&chunk.content, 80));
    let confidence = chunk
        .confidence
        .as_ref()
        .and_then(|c| c.score)
        .unwrap_or(0.5);

    let text = match style {
        CitationStyle::Simple => format!("[{id}] {} ({})", summary, chunk.repository),
        CitationStyle::Apa => format!(
            "{} ({}). {}. {}.",
            chunk.repository,
            chunk.timestamp.format("%Y"),
            summary,
            format!("{:?}", chunk.kind).to_lowercase()
        ),
        CitationStyle::Chicago => format!(
            "\"{}\", {}, {}.",
            summary,
            chunk.repository,
            chunk.timestamp.format("%B %d, %Y")
        ),
        CitationStyle::Mla => format!(
            "\"{}.\" {}, {}.",
            summary,
            chunk.repository,
            chunk.timestamp.format("%d %b. %Y")
        ),
        CitationStyle::Custom => {
            let template = custom_template.unwrap_or("[{id}] {summary} ({repository})");
            substitute(template, id, chunk, relevance, &summary, confidence)
        }
    };

    Citation {
        id: id.to_string(),
        chunk_id: chunk.id.clone(),
        text,
    }
}

fn substitute(
    template: &str,
    id: &str,
    chunk: &Chunk,
    relevance: f32,
    summary: &str,
    confidence: f32,
) -> String {
    template
        .replace("{id}", id)
        .replace("{type}", &format!("{:?}", chunk.kind).to_lowercase())
        .replace("{repository}", &chunk.repository)
        .replace("{timestamp}", &chunk.timestamp.to_rfc3339())
        .replace("{summary}", summary)
        .replace("{confidence}", &format!("{confidence:.2}"))
        .replace("{relevance}", &format!("{relevance:.2}"))
        .replace("{context}", &chunk.session_id)
}

fn truncate(text: &str, max: usize) -> String {
    if text.len() <= max {
        text.to_string()
    } else {
        format!("{}...", &text[..max])
    }
}
