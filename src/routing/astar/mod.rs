//! Generic A* engine
//!
//! The engine is independent of how its endpoints came to be: it walks
//! whatever graph the supplied connection handles expose. Road-specific
//! behavior (virtual query points, virtual-segment filtering) is layered
//! on through [`AStarHooks`] by the adapter in
//! [`road_astar`](crate::routing::road_astar).

pub mod heuristic;
pub mod path_factory;

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use hashbrown::HashMap;
use hashbrown::hash_map::Entry;
use ordered_float::OrderedFloat;

use crate::model::path::RoadPath;
use crate::model::primitives::{ConnectionRef, PointId, RoadConnection, RoadSegment, SegmentRef};

pub use heuristic::{AStarHeuristic, EuclideanHeuristic};
pub use path_factory::{AStarPathFactory, RoadPathFactory};

/// A node of the search frontier
pub trait AStarNode {
    fn graph_point(&self) -> ConnectionRef;

    /// Segment through which this node was reached; `None` for the start
    fn arrival_segment(&self) -> Option<SegmentRef>;

    /// Cost accumulated from the start
    fn cost(&self) -> f64;

    /// Estimated remaining cost to the target
    fn estimated_cost(&self) -> f64;

    fn path_cost(&self) -> f64 {
        self.cost() + self.estimated_cost()
    }

    /// Segments the search may leave this node through
    fn graph_segments(&self) -> Vec<SegmentRef>;
}

/// Regular frontier node created by the engine during expansion
pub(crate) struct Candidate {
    point: ConnectionRef,
    arrival: Option<SegmentRef>,
    cost: f64,
    estimate: f64,
}

impl Candidate {
    pub(crate) fn new(
        point: ConnectionRef,
        arrival: Option<SegmentRef>,
        cost: f64,
        estimate: f64,
    ) -> Candidate {
        Candidate {
            point,
            arrival,
            cost,
            estimate,
        }
    }
}

impl AStarNode for Candidate {
    fn graph_point(&self) -> ConnectionRef {
        self.point.clone()
    }

    fn arrival_segment(&self) -> Option<SegmentRef> {
        self.arrival.clone()
    }

    fn cost(&self) -> f64 {
        self.cost
    }

    fn estimated_cost(&self) -> f64 {
        self.estimate
    }

    fn graph_segments(&self) -> Vec<SegmentRef> {
        // One-way semantics: only keep segments that may legally be
        // entered from this point.
        self.point
            .connections()
            .into_iter()
            .filter(|c| c.segment.is_traversable_from(self.point.as_ref()))
            .map(|c| c.segment)
            .collect()
    }
}

/// Outcome of [`AStarHooks::translate_candidate`]
pub enum Translation {
    /// The node is the target; the search terminates on it
    Target(Box<dyn AStarNode>),
    /// The node to expand, possibly rewrapped by the hook
    Node(Box<dyn AStarNode>),
}

/// Adapter seam of the engine
pub trait AStarHooks {
    /// Invoked on every node popped from the open list, before any
    /// treatment. Replies [`Translation::Target`] when the node
    /// corresponds to the end point of the search.
    fn translate_candidate(&self, end_point: &ConnectionRef, node: Box<dyn AStarNode>) -> Translation {
        if node.graph_point().id() == end_point.id() {
            Translation::Target(node)
        } else {
            Translation::Node(node)
        }
    }

    /// Invoked when a segment of the winning chain could not be appended
    /// to the path. Replies `true` when path building should continue
    /// regardless, `false` when the search result is no path.
    fn invalid_path_segment_found(
        &self,
        _index: usize,
        _segment: &SegmentRef,
        _path: &RoadPath,
    ) -> bool {
        false
    }
}

/// Hooks of the plain algorithm: exact-match termination, no tolerated
/// path rejections.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainHooks;

impl AStarHooks for PlainHooks {}

/// Cost model of the search. The default charges each segment its
/// geometric length and traverses connections for free.
///
/// When a custom implementation inflates or deflates costs, the caller
/// is responsible for keeping the configured heuristic admissible with
/// respect to it.
pub trait AStarCostComputer {
    fn segment_cost(&self, segment: &dyn RoadSegment) -> f64 {
        segment.length()
    }

    fn connection_cost(&self, _point: &dyn RoadConnection) -> f64 {
        0.0
    }
}

struct ClosedNode {
    point: ConnectionRef,
    arrival: Option<SegmentRef>,
    cost: f64,
}

struct OpenEntry {
    node: Box<dyn AStarNode>,
}

impl OpenEntry {
    fn key(&self) -> (OrderedFloat<f64>, PointId) {
        (
            OrderedFloat(self.node.path_cost()),
            self.node.graph_point().id(),
        )
    }
}

impl Ord for OpenEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Min-heap by path cost (reversed from standard Rust BinaryHeap),
        // ties broken on point identity for determinism
        other.key().cmp(&self.key())
    }
}

impl PartialOrd for OpenEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for OpenEntry {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for OpenEntry {}

/// The A* algorithm, parameterized over its heuristic and path factory
pub struct AStar<H = EuclideanHeuristic, F = RoadPathFactory> {
    heuristic: H,
    path_factory: F,
    cost_computer: Option<Box<dyn AStarCostComputer>>,
}

impl Default for AStar {
    fn default() -> Self {
        AStar::new(EuclideanHeuristic, RoadPathFactory)
    }
}

impl<H: AStarHeuristic, F: AStarPathFactory> AStar<H, F> {
    pub fn new(heuristic: H, path_factory: F) -> AStar<H, F> {
        AStar {
            heuristic,
            path_factory,
            cost_computer: None,
        }
    }

    pub fn set_cost_computer(&mut self, cost_computer: Box<dyn AStarCostComputer>) {
        self.cost_computer = Some(cost_computer);
    }

    fn segment_cost(&self, segment: &dyn RoadSegment) -> f64 {
        match &self.cost_computer {
            Some(computer) => computer.segment_cost(segment),
            None => segment.length(),
        }
    }

    fn connection_cost(&self, point: &dyn RoadConnection) -> f64 {
        match &self.cost_computer {
            Some(computer) => computer.connection_cost(point),
            None => 0.0,
        }
    }

    /// Run the search between two resolved connection points. Replies
    /// `None` when the frontier exhausts without reaching `end`.
    pub fn solve(
        &self,
        start: &ConnectionRef,
        end: &ConnectionRef,
        hooks: &dyn AStarHooks,
    ) -> Option<RoadPath> {
        let mut closed = self.find_path(start, end, hooks)?;
        self.create_path(start, end, &mut closed, hooks)
    }

    fn find_path(
        &self,
        start: &ConnectionRef,
        end: &ConnectionRef,
        hooks: &dyn AStarHooks,
    ) -> Option<HashMap<PointId, ClosedNode>> {
        let mut open = BinaryHeap::new();
        let mut best: HashMap<PointId, f64> = HashMap::new();
        let mut closed: HashMap<PointId, ClosedNode> = HashMap::new();

        let estimate = self.heuristic.evaluate(start.as_ref(), end.as_ref());
        best.insert(start.id(), 0.0);
        open.push(OpenEntry {
            node: Box::new(Candidate::new(start.clone(), None, 0.0, estimate)),
        });

        while let Some(OpenEntry { node }) = open.pop() {
            let point_id = node.graph_point().id();

            // Skip entries superseded by a cheaper rediscovery
            if best.get(&point_id).is_some_and(|&g| node.cost() > g) {
                continue;
            }

            let node = match hooks.translate_candidate(end, node) {
                Translation::Target(node) => {
                    closed.insert(
                        point_id,
                        ClosedNode {
                            point: node.graph_point(),
                            arrival: node.arrival_segment(),
                            cost: node.cost(),
                        },
                    );
                    return Some(closed);
                }
                Translation::Node(node) => node,
            };

            let point = node.graph_point();
            for segment in node.graph_segments() {
                let Some(reachable) = segment.other_side_point(point.as_ref()) else {
                    continue;
                };
                if reachable.id() == point_id {
                    continue;
                }
                let g = node.cost()
                    + self.connection_cost(point.as_ref())
                    + self.segment_cost(segment.as_ref());

                // Open the reached node, or reopen it on a strictly
                // better cost
                let improved = match best.entry(reachable.id()) {
                    Entry::Vacant(entry) => {
                        entry.insert(g);
                        true
                    }
                    Entry::Occupied(mut entry) => {
                        if g < *entry.get() {
                            *entry.get_mut() = g;
                            true
                        } else {
                            false
                        }
                    }
                };
                if improved {
                    let h = self.heuristic.evaluate(reachable.as_ref(), end.as_ref());
                    open.push(OpenEntry {
                        node: Box::new(Candidate::new(reachable, Some(segment), g, h)),
                    });
                }
            }

            closed.insert(
                point_id,
                ClosedNode {
                    point: node.graph_point(),
                    arrival: node.arrival_segment(),
                    cost: node.cost(),
                },
            );
        }

        log::debug!("search frontier exhausted without reaching the end point");
        None
    }

    fn create_path(
        &self,
        start: &ConnectionRef,
        end: &ConnectionRef,
        closed: &mut HashMap<PointId, ClosedNode>,
        hooks: &dyn AStarHooks,
    ) -> Option<RoadPath> {
        let goal = closed.remove(&end.id())?;
        log::debug!("end point reached with cost {:.3}", goal.cost);
        let mut point = goal.point;
        let mut segment = goal.arrival?;
        let mut chain = vec![segment.clone()];

        // Walk the arrival segments backward toward the start. Entries
        // are removed as they are consumed so a malformed chain cannot
        // loop.
        loop {
            let Some(previous) = segment.other_side_point(point.as_ref()) else {
                break;
            };
            point = previous;
            let Some(entry) = closed.remove(&point.id()) else {
                break;
            };
            match entry.arrival {
                Some(arrival) => {
                    chain.push(arrival.clone());
                    segment = arrival;
                }
                // Reached the start node
                None => break,
            }
        }

        // Replay the chain from the start side through the path factory
        let mut segments = chain.iter().rev();
        let first = segments.next()?;
        if !start.is_connected_segment(first.as_ref()) {
            return None;
        }
        let mut path = self.path_factory.new_path(start, first);
        for (index, segment) in segments.enumerate() {
            if !self.path_factory.add_to_path(&mut path, segment)
                && !hooks.invalid_path_segment_found(index + 1, segment, &path)
            {
                log::debug!("path reconstruction rejected a segment of the winning chain");
                return None;
            }
        }
        Some(path)
    }
}
