//! Final report rendering
//!
//! Turns a corpus snapshot into the human-readable report written at the
//! end of a run: unique page total, longest page, highest-frequency words,
//! and per-subdomain page counts.

use crate::stats::CorpusSnapshot;
use std::fmt::Write as _;
use std::path::Path;

/// Renders the report as plain text
///
/// # Arguments
///
/// * `snapshot` - The corpus aggregates captured at shutdown
/// * `top_words` - How many of the highest-frequency words to list
pub fn render_report(snapshot: &CorpusSnapshot, top_words: usize) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "=== Lexiscope Crawl Report ===");
    let _ = writeln!(out);
    let _ = writeln!(out, "Unique pages: {}", snapshot.total_unique_pages);
    let _ = writeln!(out);

    match &snapshot.longest {
        Some(longest) => {
            let _ = writeln!(
                out,
                "Longest page: {} ({} tokens)",
                longest.url, longest.token_count
            );
        }
        None => {
            let _ = writeln!(out, "Longest page: none recorded");
        }
    }
    let _ = writeln!(out);

    let words = snapshot.top_words(top_words);
    let _ = writeln!(out, "Top {} words:", words.len());
    for (word, count) in &words {
        let _ = writeln!(out, "  {}, {}", word, count);
    }
    let _ = writeln!(out);

    let _ = writeln!(out, "Subdomains ({}):", snapshot.subdomain_pages.len());
    for (host, pages) in &snapshot.subdomain_pages {
        let _ = writeln!(out, "  {}, {}", host, pages.len());
    }

    out
}

/// Writes the rendered report to a file
pub fn write_report(
    snapshot: &CorpusSnapshot,
    top_words: usize,
    path: &Path,
) -> std::io::Result<()> {
    let report = render_report(snapshot, top_words);
    std::fs::write(path, report)?;
    tracing::info!("Report written to {}", path.display());
    Ok(())
}
