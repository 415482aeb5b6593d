//! Remaining-cost estimation for the A* engine

use geo::{Distance, Euclidean};

use crate::model::primitives::RoadConnection;

/// Estimates the remaining cost between two connection points.
///
/// Implementations must be admissible for the search to stay optimal:
/// `evaluate(p, q)` must never exceed the true shortest-path cost from
/// `p` to `q`, and `evaluate(p, p)` must be zero.
pub trait AStarHeuristic {
    fn evaluate(&self, from: &dyn RoadConnection, to: &dyn RoadConnection) -> f64;
}

/// Straight-line Euclidean distance between the resolved positions of
/// the two points. Stateless; admissible whenever segment costs are
/// geometric lengths.
#[derive(Debug, Clone, Copy, Default)]
pub struct EuclideanHeuristic;

impl AStarHeuristic for EuclideanHeuristic {
    fn evaluate(&self, from: &dyn RoadConnection, to: &dyn RoadConnection) -> f64 {
        Euclidean.distance(from.position(), to.position())
    }
}

#[cfg(test)]
mod tests {
    use geo::Point;

    use super::*;
    use crate::model::attributes::RoadAttributes;
    use crate::model::network::StandardRoadNetwork;

    #[test]
    fn zero_on_identical_point_and_symmetric() {
        let mut builder = StandardRoadNetwork::builder();
        let a = builder.add_connection(Point::new(0.0, 0.0));
        let b = builder.add_connection(Point::new(30.0, 40.0));
        builder.add_segment(a, b, RoadAttributes::default()).unwrap();
        let network = builder.build();

        let pa = network.connection(a).unwrap();
        let pb = network.connection(b).unwrap();
        let heuristic = EuclideanHeuristic;
        assert_eq!(heuristic.evaluate(pa.as_ref(), pa.as_ref()), 0.0);
        assert!((heuristic.evaluate(pa.as_ref(), pb.as_ref()) - 50.0).abs() < 1e-9);
        assert_eq!(
            heuristic.evaluate(pa.as_ref(), pb.as_ref()),
            heuristic.evaluate(pb.as_ref(), pa.as_ref())
        );
    }
}
