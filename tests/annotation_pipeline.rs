// End-to-end tests for the public localization API
// Exercises the full pipeline: segment index, cascade, span mapping, emission

use quotemark::{
    annotate, Claim, QuoteLocator, Segment, SegmentId, SegmentIndex, Strategy,
};

/// Segments shaped like the text nodes of a small rendered article.
fn article_segments() -> Vec<Segment> {
    vec![
        Segment::new(1, "Polarising Headline"),
        Segment::new(2, "The sky is blue and the grass is green. "),
        Segment::new(3, "Critics argue that budget increases hurt working families, "),
        Segment::new(4, "while supporters point to rising service quality. "),
        Segment::new(5, "Hello,   world! Nice day."),
    ]
}

#[test]
fn test_full_pipeline_mixed_batch() {
    let index = SegmentIndex::build(article_segments());
    let claims = vec![
        // Exact hit inside one segment.
        Claim::from_quote("sky is blue"),
        // Case/punctuation drift: normalized tier.
        Claim::from_quote("hello world"),
        // Hallucinated by the generator: must fail without affecting others.
        Claim::from_quote("the moon is made of cheese"),
        // Whitespace-only quote: skipped silently.
        Claim::from_quote("  "),
    ];

    let report = annotate(&index, &claims);
    assert_eq!(report.results.len(), 4, "one result per claim, in order");
    assert_eq!(report.matched, 2);
    assert_eq!(report.summary(), "2/4");

    let exact = &report.results[0];
    assert!(exact.success);
    assert_eq!(exact.strategy, Some(Strategy::Exact));
    let span = exact.span.expect("exact span");
    assert_eq!(span.segment, SegmentId(2));
    assert_eq!((span.start, span.end), (4, 15));

    let normalized = &report.results[1];
    assert!(normalized.success);
    assert_eq!(normalized.strategy, Some(Strategy::Normalized));
    assert_eq!(normalized.span.expect("normalized span").segment, SegmentId(5));

    assert!(!report.results[2].success);
    assert!(!report.results[3].success);
}

#[test]
fn test_boundary_spanning_quote_clips_to_first_segment() {
    let index = SegmentIndex::build(vec![
        Segment::new(0, "The minister said the "),
        Segment::new(1, "economy is recovering faster than expected."),
    ]);
    let claims = vec![Claim::from_quote("said the economy is recovering")];

    let report = annotate(&index, &claims);
    let span = report.results[0].span.expect("clipped span");

    // The quote crosses the node boundary; the highlight covers only the
    // start segment's remainder.
    assert_eq!(span.segment, SegmentId(0));
    let segment_text = &index.segments()[0].text;
    assert_eq!(span.end, segment_text.len());
    assert_eq!(&segment_text[span.start..span.end], "said the ");
}

#[test]
fn test_locator_reuse_across_claims_matches_one_shot_results() {
    let index = SegmentIndex::build(article_segments());
    let locator = QuoteLocator::new(&index);

    // Same locator answers repeated and overlapping queries consistently.
    let a = locator.locate("grass is green").expect("first lookup");
    let b = locator.locate("grass is green").expect("repeat lookup");
    assert_eq!(a, b);

    let wide = locator.locate("the grass is green").expect("overlap lookup");
    assert!(wide.start < a.start && a.end <= wide.end);
}

#[test]
fn test_report_round_trips_through_json() {
    let index = SegmentIndex::build(article_segments());
    let claims = vec![
        Claim {
            quote: "sky is blue".into(),
            stance: "color realism".into(),
            why_polarising: "disputes perception".into(),
            counterpoint: "depends on weather".into(),
            citations: vec!["https://example.org/a".into()],
        },
        Claim::from_quote("not present anywhere in the article"),
    ];

    let report = annotate(&index, &claims);
    let json = serde_json::to_string(&report).expect("serialize report");
    let parsed: quotemark::AnnotationReport =
        serde_json::from_str(&json).expect("deserialize report");

    assert_eq!(parsed.matched, report.matched);
    assert_eq!(parsed.total, report.total);
    assert_eq!(parsed.results.len(), report.results.len());
    let claim = parsed.results[0].claim.as_ref().expect("carried claim");
    assert_eq!(claim.stance, "color realism");

    // Failed results serialize without span/strategy/claim noise.
    assert!(json.contains(r#"{"success":false}"#));
}

#[tokio::test]
async fn test_cli_data_formats_load_from_disk() {
    use tempfile::TempDir;

    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let document_path = temp_dir.path().join("document.json");
    let claims_path = temp_dir.path().join("claims.json");

    let document = serde_json::to_string(&article_segments()).expect("serialize segments");
    tokio::fs::write(&document_path, document)
        .await
        .expect("write document file");

    // Claims as the upstream generator emits them, camelCase variant included.
    let claims_json = r#"[
        {"quote": "sky is blue", "stance": "s", "whyPolarising": "w", "citations": []},
        {"quote": "hello world"}
    ]"#;
    tokio::fs::write(&claims_path, claims_json)
        .await
        .expect("write claims file");

    let segments: Vec<Segment> = serde_json::from_str(
        &tokio::fs::read_to_string(&document_path)
            .await
            .expect("read document"),
    )
    .expect("parse segments");
    let claims: Vec<Claim> = serde_json::from_str(
        &tokio::fs::read_to_string(&claims_path)
            .await
            .expect("read claims"),
    )
    .expect("parse claims");

    assert_eq!(claims[0].why_polarising, "w");

    let index = SegmentIndex::build(segments);
    let report = annotate(&index, &claims);
    assert_eq!(report.matched, 2);
    assert_eq!(report.total, 2);
}
