//! Road-aware A* planner
//!
//! Wraps the generic engine with the virtualization layer: query
//! coordinates are snapped onto the network and searched as virtual
//! points. When the search reaches a real endpoint of the goal's
//! snapped segment, the hooks graft the approach segment onto the node
//! so the goal itself enters the open list; the search ends only when
//! the goal is popped.

use std::rc::Rc;

use geo::Point;
use log::{debug, warn};

use crate::model::network::RoadNetwork;
use crate::model::path::RoadPath;
use crate::model::primitives::{ConnectionRef, RoadConnection, SegmentRef};
use crate::routing::astar::{
    AStar, AStarCostComputer, AStarHeuristic, AStarHooks, AStarNode, AStarPathFactory,
    EuclideanHeuristic, RoadPathFactory, Translation,
};
use crate::routing::virtualization::{VirtualCandidate, VirtualPoint};

/// Route planner between arbitrary coordinates on a road network
pub struct RoadAStar<H = EuclideanHeuristic, F = RoadPathFactory> {
    engine: AStar<H, F>,
}

impl Default for RoadAStar {
    fn default() -> Self {
        RoadAStar::new()
    }
}

impl RoadAStar {
    pub fn new() -> RoadAStar {
        RoadAStar {
            engine: AStar::default(),
        }
    }
}

impl<H: AStarHeuristic> RoadAStar<H> {
    pub fn with_heuristic(heuristic: H) -> RoadAStar<H> {
        RoadAStar {
            engine: AStar::new(heuristic, RoadPathFactory),
        }
    }
}

impl<F: AStarPathFactory> RoadAStar<EuclideanHeuristic, F> {
    pub fn with_path_factory(path_factory: F) -> RoadAStar<EuclideanHeuristic, F> {
        RoadAStar {
            engine: AStar::new(EuclideanHeuristic, path_factory),
        }
    }
}

impl<H: AStarHeuristic, F: AStarPathFactory> RoadAStar<H, F> {
    /// Build a planner with both strategies supplied by the caller.
    pub fn with_strategies(heuristic: H, path_factory: F) -> RoadAStar<H, F> {
        RoadAStar {
            engine: AStar::new(heuristic, path_factory),
        }
    }

    pub fn set_cost_computer(&mut self, cost_computer: Box<dyn AStarCostComputer>) {
        self.engine.set_cost_computer(cost_computer);
    }

    /// Plan a route between two raw coordinates. Both endpoints are
    /// snapped onto the network; `None` when either snap fails or no
    /// route exists.
    pub fn solve(
        &self,
        network: &dyn RoadNetwork,
        start: Point<f64>,
        end: Point<f64>,
    ) -> Option<RoadPath> {
        let start = virtualize(network, start)?;
        let end = virtualize(network, end)?;
        self.solve_between(&start, &end)
    }

    /// Plan a route from a raw coordinate to an existing connection.
    pub fn solve_from_position(
        &self,
        network: &dyn RoadNetwork,
        start: Point<f64>,
        end: &ConnectionRef,
    ) -> Option<RoadPath> {
        let start = virtualize(network, start)?;
        self.solve_between(&start, end)
    }

    /// Plan a route from an existing connection to a raw coordinate.
    pub fn solve_to_position(
        &self,
        network: &dyn RoadNetwork,
        start: &ConnectionRef,
        end: Point<f64>,
    ) -> Option<RoadPath> {
        let end = virtualize(network, end)?;
        self.solve_between(start, &end)
    }

    /// Plan a route between two resolved connection points, virtual or
    /// real.
    pub fn solve_between(&self, start: &ConnectionRef, end: &ConnectionRef) -> Option<RoadPath> {
        let hooks = RoadSearchHooks::for_goal(end);
        self.engine.solve(start, end, &hooks)
    }
}

fn virtualize(network: &dyn RoadNetwork, position: Point<f64>) -> Option<ConnectionRef> {
    match network.nearest_segment(&position) {
        Some(segment) => {
            let point = VirtualPoint::new(position, segment);
            debug!(
                "virtualized ({}, {}) onto ({}, {})",
                position.x(),
                position.y(),
                point.position().x(),
                point.position().y()
            );
            Some(Rc::new(point))
        }
        None => {
            warn!(
                "no road segment to snap ({}, {}) onto",
                position.x(),
                position.y()
            );
            None
        }
    }
}

/// Hooks teaching the engine about virtual goals
struct RoadSearchHooks {
    /// Outgoing segments of a virtual goal point; empty for real goals
    goal_approaches: Vec<SegmentRef>,
}

impl RoadSearchHooks {
    fn for_goal(end: &ConnectionRef) -> RoadSearchHooks {
        let goal_approaches = if end.virtualized_segment().is_some() {
            end.connected_segments()
        } else {
            Vec::new()
        };
        RoadSearchHooks { goal_approaches }
    }
}

impl AStarHooks for RoadSearchHooks {
    fn translate_candidate(
        &self,
        end_point: &ConnectionRef,
        node: Box<dyn AStarNode>,
    ) -> Translation {
        let point_id = node.graph_point().id();
        if point_id == end_point.id() {
            return Translation::Target(node);
        }
        // When the popped node is a real endpoint of the virtual goal's
        // snapped segment, graft the approach segments onto it so the
        // goal point enters the open list with the approach arc charged.
        // Termination stays on the exact goal pop, which keeps the
        // search optimal when the two approach arcs differ in length.
        let approaches: Vec<SegmentRef> = self
            .goal_approaches
            .iter()
            .filter(|a| a.end_point().id() == point_id)
            .cloned()
            .collect();
        if approaches.is_empty() {
            Translation::Node(node)
        } else {
            Translation::Node(Box::new(VirtualCandidate::new(approaches, node)))
        }
    }

    fn invalid_path_segment_found(
        &self,
        _index: usize,
        segment: &SegmentRef,
        _path: &RoadPath,
    ) -> bool {
        // A virtual terminal hop duplicating the last real segment is
        // dropped without invalidating the path.
        segment.virtualized_segment().is_some()
    }
}
