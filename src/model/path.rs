//! Path result type

use crate::model::primitives::{ConnectionRef, SegmentRef};

/// An ordered sequence of real road segments, together with the
/// connection where the path enters the graph and the connection it
/// currently ends at.
pub struct RoadPath {
    start: ConnectionRef,
    end: ConnectionRef,
    segments: Vec<SegmentRef>,
}

impl RoadPath {
    pub(crate) fn new(start: ConnectionRef, segment: SegmentRef) -> RoadPath {
        debug_assert!(segment.other_side_point(start.as_ref()).is_some());
        let end = segment
            .other_side_point(start.as_ref())
            .unwrap_or_else(|| segment.end_point());
        RoadPath {
            start,
            end,
            segments: vec![segment],
        }
    }

    /// Append a segment when it touches the current exit connection.
    /// Replies whether the path changed.
    pub(crate) fn add(&mut self, segment: SegmentRef) -> bool {
        match segment.other_side_point(self.end.as_ref()) {
            Some(next_end) => {
                self.end = next_end;
                self.segments.push(segment);
                true
            }
            None => false,
        }
    }

    pub fn segments(&self) -> &[SegmentRef] {
        &self.segments
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Total geometric length of the path
    pub fn length(&self) -> f64 {
        self.segments.iter().map(|s| s.length()).sum()
    }

    pub fn start_point(&self) -> ConnectionRef {
        self.start.clone()
    }

    pub fn end_point(&self) -> ConnectionRef {
        self.end.clone()
    }

    pub fn last_segment(&self) -> Option<&SegmentRef> {
        self.segments.last()
    }

    /// The ordered connection sequence along the path, entry to exit
    pub fn connections(&self) -> Vec<ConnectionRef> {
        let mut points = Vec::with_capacity(self.segments.len() + 1);
        let mut current = self.start.clone();
        points.push(current.clone());
        for segment in &self.segments {
            match segment.other_side_point(current.as_ref()) {
                Some(next) => {
                    current = next;
                    points.push(current.clone());
                }
                None => break,
            }
        }
        points
    }
}
