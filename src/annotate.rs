// Batch driver: runs the cascade per claim and assembles annotation results

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::locator::{QuoteLocator, Strategy};
use crate::segment::SegmentIndex;
use crate::span_map::{map_to_segments, HighlightSpan};

/// One extracted claim from the upstream generator. Everything except
/// `quote` is opaque metadata carried through to the output untouched;
/// matching never inspects it. Missing optional fields deserialize to empty.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Claim {
    pub quote: String,
    #[serde(default)]
    pub stance: String,
    #[serde(default, alias = "whyPolarising")]
    pub why_polarising: String,
    #[serde(default)]
    pub counterpoint: String,
    #[serde(default)]
    pub citations: Vec<String>,
}

impl Claim {
    pub fn from_quote(quote: impl Into<String>) -> Self {
        Self {
            quote: quote.into(),
            ..Self::default()
        }
    }
}

/// Outcome for one claim. A failed claim carries only the flag; a successful
/// one carries the span, the cascade tier that found it, and the claim
/// metadata for the rendering layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnnotationResult {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub span: Option<HighlightSpan>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub strategy: Option<Strategy>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub claim: Option<Claim>,
}

impl AnnotationResult {
    fn failure() -> Self {
        Self {
            success: false,
            span: None,
            strategy: None,
            claim: None,
        }
    }
}

/// Results for one claim batch, input order preserved, plus the
/// matched-of-total counts for the status line.
#[derive(Debug, Serialize, Deserialize)]
pub struct AnnotationReport {
    pub results: Vec<AnnotationResult>,
    pub matched: usize,
    pub total: usize,
}

impl AnnotationReport {
    /// Human status summary, e.g. `3/5`.
    pub fn summary(&self) -> String {
        format!("{}/{}", self.matched, self.total)
    }
}

/// Bundle a mapped span with its claim's metadata. Pure data assembly: a
/// missing or degenerate span yields a failure result, never a panic, so one
/// bad claim cannot abort the rest of the batch.
pub fn emit(claim: &Claim, span: Option<HighlightSpan>, strategy: Option<Strategy>) -> AnnotationResult {
    match span {
        Some(span) if span.end > span.start => AnnotationResult {
            success: true,
            span: Some(span),
            strategy,
            claim: Some(claim.clone()),
        },
        _ => AnnotationResult::failure(),
    }
}

/// Localize every claim against one document snapshot, strictly in input
/// order. The locator's derived state (normalized buffer, token table) is
/// built once and reused across the batch.
pub fn annotate(index: &SegmentIndex, claims: &[Claim]) -> AnnotationReport {
    let locator = QuoteLocator::new(index);
    let mut results = Vec::with_capacity(claims.len());
    let mut matched = 0usize;

    for claim in claims {
        let quote = claim.quote.trim();
        if quote.is_empty() {
            // Malformed input, not an error: skipped without a match attempt.
            debug!("skipping claim with empty quote");
            results.push(AnnotationResult::failure());
            continue;
        }

        let located = locator.locate(quote);
        let span = located.and_then(|m| map_to_segments(m, index));
        let result = emit(claim, span, located.map(|m| m.strategy));

        if result.success {
            matched += 1;
        } else {
            warn!(quote = quote_preview(quote), "could not localize quote");
        }
        results.push(result);
    }

    info!(matched, total = claims.len(), "annotation batch complete");
    AnnotationReport {
        results,
        matched,
        total: claims.len(),
    }
}

/// First 60 chars of the quote for diagnostics.
fn quote_preview(quote: &str) -> &str {
    match quote.char_indices().nth(60) {
        Some((idx, _)) => &quote[..idx],
        None => quote,
    }
}
