// Converts a buffer-level match into segment-local highlight coordinates

use serde::{Deserialize, Serialize};

use crate::locator::MatchResult;
use crate::segment::{SegmentId, SegmentIndex};

/// Caller-consumable location of a matched quote, in byte offsets local to
/// one segment's text. Carries no ownership of the text itself; applying the
/// visual markup is the caller's job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HighlightSpan {
    pub segment: SegmentId,
    pub start: usize,
    pub end: usize,
}

/// Map a buffer match to the segment holding its start.
///
/// When the match crosses a segment boundary the span is clipped to the
/// start segment: `end = min(segment_len, start + match_len)`. Partial
/// highlighting of boundary-spanning quotes is intentional behavior, kept
/// for parity with the annotator this engine serves.
pub fn map_to_segments(result: MatchResult, index: &SegmentIndex) -> Option<HighlightSpan> {
    let start_loc = index.locate_offset(result.start)?;
    let match_len = result.end - result.start;

    // `end` may equal the buffer length, or land in a later segment; both
    // take the clipping path.
    let same_segment = index
        .locate_offset(result.end)
        .is_some_and(|end_loc| end_loc.segment_index == start_loc.segment_index);

    let end = if same_segment {
        start_loc.local_offset + match_len
    } else {
        index
            .segment_len(start_loc.segment_index)
            .min(start_loc.local_offset + match_len)
    };

    Some(HighlightSpan {
        segment: start_loc.segment_id,
        start: start_loc.local_offset,
        end,
    })
}
