pub mod annotate;
pub mod locator;
pub mod normalize;
pub mod segment;
pub mod span_map;

// Re-export main types for convenient access
pub use annotate::{annotate, emit, AnnotationReport, AnnotationResult, Claim};
pub use locator::{MatchResult, QuoteLocator, Strategy};
pub use normalize::{normalize, normalize_into, normalized_to_raw};
pub use segment::{Location, Segment, SegmentId, SegmentIndex};
pub use span_map::{map_to_segments, HighlightSpan};
