//! Route planning algorithms

pub mod astar;
pub mod road_astar;
pub mod virtualization;

pub use astar::{
    AStar, AStarCostComputer, AStarHeuristic, AStarHooks, AStarNode, AStarPathFactory,
    EuclideanHeuristic, PlainHooks, RoadPathFactory, Translation,
};
pub use road_astar::RoadAStar;
pub use virtualization::{VirtualPoint, VirtualSegment};
