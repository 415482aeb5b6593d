//! Path assembly strategies
//!
//! The engine reconstructs the winning predecessor chain from the
//! connection nearest the start to the one nearest the goal and feeds it
//! through a path factory, which decides how each discovered segment
//! contributes to the caller-facing path.

use crate::model::path::RoadPath;
use crate::model::primitives::{ConnectionRef, SegmentRef};

/// Builds the result path as the engine replays the discovered segment
/// chain in order.
pub trait AStarPathFactory {
    /// Begin a path at `start_point`, traversing `segment` first.
    fn new_path(&self, start_point: &ConnectionRef, segment: &SegmentRef) -> RoadPath;

    /// Append `segment` to `path`. Replies whether the path changed.
    fn add_to_path(&self, path: &mut RoadPath, segment: &SegmentRef) -> bool;
}

/// Default factory translating virtual segments back into the real
/// segments they virtualize.
#[derive(Debug, Clone, Copy, Default)]
pub struct RoadPathFactory;

impl AStarPathFactory for RoadPathFactory {
    fn new_path(&self, start_point: &ConnectionRef, segment: &SegmentRef) -> RoadPath {
        match segment.virtualized_segment() {
            Some(real) => {
                // The search left the snapped point through the real
                // endpoint at the far end of the virtual segment; the
                // real path starts where the real segment naturally
                // begins, on the other side of that junction.
                let junction = segment.end_point();
                let start = real
                    .other_side_point(junction.as_ref())
                    .unwrap_or(junction);
                RoadPath::new(start, real)
            }
            None => RoadPath::new(start_point.clone(), segment.clone()),
        }
    }

    fn add_to_path(&self, path: &mut RoadPath, segment: &SegmentRef) -> bool {
        match segment.virtualized_segment() {
            Some(real) => {
                // The virtual hop at the goal end may be a zero-length
                // continuation of a segment already in the path.
                if path.last_segment().map(|s| s.id()) == Some(real.id()) {
                    return false;
                }
                path.add(real)
            }
            None => path.add(segment.clone()),
        }
    }
}
