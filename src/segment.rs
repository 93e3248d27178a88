// Segment snapshot and cumulative-offset index over the concatenated document text

use serde::{Deserialize, Serialize};

/// Opaque handle for one document text segment.
///
/// The engine never interprets the value beyond equality; callers use it to
/// find their own document node when applying a highlight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SegmentId(pub usize);

/// One contiguous, ordered leaf unit of document text.
///
/// Segments are produced by an external document walker (one per text-bearing
/// node, in reading order) and are never mutated here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Segment {
    pub id: SegmentId,
    pub text: String,
}

impl Segment {
    pub fn new(id: usize, text: impl Into<String>) -> Self {
        Self {
            id: SegmentId(id),
            text: text.into(),
        }
    }
}

/// Resolved position of a buffer offset: which segment holds it and where.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Location {
    /// Index into the segment list handed to `SegmentIndex::build`.
    pub segment_index: usize,
    pub segment_id: SegmentId,
    /// Byte offset local to that segment's text.
    pub local_offset: usize,
}

/// Read-only index over a fixed segment snapshot: the concatenated buffer plus
/// a cumulative byte-start table for offset-to-segment resolution.
///
/// Rebuilt from scratch whenever the caller's segment list changes; the index
/// treats its input as a snapshot and never observes mutation.
#[derive(Debug)]
pub struct SegmentIndex {
    segments: Vec<Segment>,
    starts: Vec<usize>,
    full_text: String,
}

impl SegmentIndex {
    /// Build the index from an ordered segment list. An empty list yields an
    /// empty buffer on which every lookup fails cleanly.
    pub fn build(segments: Vec<Segment>) -> Self {
        let total: usize = segments.iter().map(|s| s.text.len()).sum();
        let mut full_text = String::with_capacity(total);
        let mut starts = Vec::with_capacity(segments.len());

        for segment in &segments {
            starts.push(full_text.len());
            full_text.push_str(&segment.text);
        }

        Self {
            segments,
            starts,
            full_text,
        }
    }

    /// The concatenated document text, in segment order.
    pub fn full_text(&self) -> &str {
        &self.full_text
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Byte length of the segment at `segment_index`.
    pub fn segment_len(&self, segment_index: usize) -> usize {
        self.segments[segment_index].text.len()
    }

    /// Resolve a byte offset in the concatenated buffer to the segment whose
    /// half-open range contains it. Offsets at or past the end resolve to
    /// `None`.
    pub fn locate_offset(&self, offset: usize) -> Option<Location> {
        if offset >= self.full_text.len() {
            return None;
        }

        // partition_point yields the first segment starting past `offset`;
        // the one before it owns the offset. Zero-length segments share a
        // start with their successor and can never win this search.
        let idx = self.starts.partition_point(|&start| start <= offset) - 1;
        let start = self.starts[idx];
        debug_assert!(offset >= start && offset - start < self.segments[idx].text.len());

        Some(Location {
            segment_index: idx,
            segment_id: self.segments[idx].id,
            local_offset: offset - start,
        })
    }
}
