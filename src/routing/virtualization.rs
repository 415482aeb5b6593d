//! Virtualization of off-graph query points
//!
//! A raw coordinate is snapped onto the closest real segment and wrapped
//! in a [`VirtualPoint`]. The point exposes exactly two synthetic
//! [`VirtualSegment`]s, one toward each endpoint of the snapped segment,
//! so the search can enter the graph anywhere along a road. Virtual
//! elements exist only for the duration of a query and never appear in
//! result paths.

use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};

use geo::{Coord, Distance, Euclidean, LineString, Point};

use crate::model::attributes::{AttributeValue, RoadType, TrafficDirection};
use crate::model::primitives::{
    ConnectionRef, EdgeId, EndpointSide, PointConnection, PointId, RoadConnection, RoadSegment,
    SegmentRef,
};
use crate::routing::astar::AStarNode;

static NEXT_VIRTUAL_ID: AtomicU64 = AtomicU64::new(0);

/// Result of projecting a coordinate onto a segment polyline
struct Projection {
    point: Point<f64>,
    /// Index of the polyline sub-line carrying the projection
    line_index: usize,
    /// Arc length from the segment begin to the projection
    before: f64,
    /// Arc length from the projection to the segment end
    after: f64,
}

fn project_onto(geometry: &LineString<f64>, position: Point<f64>) -> Projection {
    let mut best: Option<(f64, Projection)> = None;
    let mut walked = 0.0;
    let mut total = 0.0;
    for (line_index, line) in geometry.lines().enumerate() {
        let start = Point::from(line.start);
        let end = Point::from(line.end);
        let len = Euclidean.distance(start, end);
        let t = if len > 0.0 {
            let dx = end.x() - start.x();
            let dy = end.y() - start.y();
            let along = (position.x() - start.x()) * dx + (position.y() - start.y()) * dy;
            (along / (len * len)).clamp(0.0, 1.0)
        } else {
            0.0
        };
        let projected = Point::new(
            start.x() + t * (end.x() - start.x()),
            start.y() + t * (end.y() - start.y()),
        );
        let distance = Euclidean.distance(position, projected);
        if best.as_ref().is_none_or(|(d, _)| distance < *d) {
            best = Some((
                distance,
                Projection {
                    point: projected,
                    line_index,
                    before: walked + t * len,
                    after: 0.0,
                },
            ));
        }
        walked += len;
        total = walked;
    }
    match best {
        Some((_, mut projection)) => {
            projection.after = total - projection.before;
            projection
        }
        // Degenerate geometry with fewer than two points
        None => Projection {
            point: position,
            line_index: 0,
            before: 0.0,
            after: 0.0,
        },
    }
}

/// A per-query connection point grafted onto a real segment.
///
/// The stored position is the projection of the query coordinate onto
/// the segment geometry. Clones share the same identity, so a clone is
/// interchangeable with the original in visited sets.
#[derive(Clone)]
pub struct VirtualPoint {
    id: u64,
    position: Point<f64>,
    real: SegmentRef,
    line_index: usize,
    before: f64,
    after: f64,
}

impl VirtualPoint {
    /// Snap `position` onto `segment` and wrap the result.
    pub fn new(position: Point<f64>, segment: SegmentRef) -> VirtualPoint {
        let projection = project_onto(&segment.geometry(), position);
        VirtualPoint {
            id: NEXT_VIRTUAL_ID.fetch_add(1, Ordering::Relaxed),
            position: projection.point,
            real: segment,
            line_index: projection.line_index,
            before: projection.before,
            after: projection.after,
        }
    }

    /// The real segment this point was snapped onto
    pub fn real_segment(&self) -> SegmentRef {
        self.real.clone()
    }

    fn segment_toward(&self, side: EndpointSide) -> VirtualSegment {
        VirtualSegment {
            point: self.clone(),
            side,
        }
    }
}

impl RoadConnection for VirtualPoint {
    fn id(&self) -> PointId {
        PointId::Virtual(self.id)
    }

    fn position(&self) -> Point<f64> {
        self.position
    }

    fn connected_segment_count(&self) -> usize {
        2
    }

    fn connected_segment(&self, index: usize) -> Option<SegmentRef> {
        match index {
            0 => Some(Rc::new(self.segment_toward(EndpointSide::Begin))),
            1 => Some(Rc::new(self.segment_toward(EndpointSide::End))),
            _ => None,
        }
    }

    fn connected_segments(&self) -> Vec<SegmentRef> {
        vec![
            Rc::new(self.segment_toward(EndpointSide::Begin)),
            Rc::new(self.segment_toward(EndpointSide::End)),
        ]
    }

    fn connections(&self) -> Vec<PointConnection> {
        // Virtual segments always begin at their owning point
        self.connected_segments()
            .into_iter()
            .map(|segment| PointConnection {
                segment,
                start_connected: true,
            })
            .collect()
    }

    fn virtualized_segment(&self) -> Option<SegmentRef> {
        Some(self.real.clone())
    }
}

/// A synthetic segment from a [`VirtualPoint`] to one endpoint of the
/// segment the point was snapped onto.
///
/// Attributes delegate to the real segment; length and geometry cover
/// the portion of the real polyline between the snap position and the
/// endpoint. The two segments of a point together reproduce the real
/// segment's length exactly.
pub struct VirtualSegment {
    point: VirtualPoint,
    side: EndpointSide,
}

impl VirtualSegment {
    fn real_endpoint(&self) -> ConnectionRef {
        match self.side {
            EndpointSide::Begin => self.point.real.begin_point(),
            EndpointSide::End => self.point.real.end_point(),
        }
    }

    fn opposite_endpoint(&self) -> ConnectionRef {
        match self.side {
            EndpointSide::Begin => self.point.real.end_point(),
            EndpointSide::End => self.point.real.begin_point(),
        }
    }
}

impl RoadSegment for VirtualSegment {
    fn id(&self) -> EdgeId {
        EdgeId::Virtual(self.point.id, self.side)
    }

    fn begin_point(&self) -> ConnectionRef {
        Rc::new(self.point.clone())
    }

    fn end_point(&self) -> ConnectionRef {
        self.real_endpoint()
    }

    fn length(&self) -> f64 {
        match self.side {
            EndpointSide::Begin => self.point.before,
            EndpointSide::End => self.point.after,
        }
    }

    fn geometry(&self) -> LineString<f64> {
        let real = self.point.real.geometry();
        let snapped: Coord<f64> = self.point.position.into();
        let mut coords = vec![snapped];
        match self.side {
            EndpointSide::Begin => {
                coords.extend(real.0[..=self.point.line_index].iter().rev().copied());
            }
            EndpointSide::End => {
                coords.extend(real.0[self.point.line_index + 1..].iter().copied());
            }
        }
        LineString::from(coords)
    }

    fn is_traversable_from(&self, point: &dyn RoadConnection) -> bool {
        if point.id() == self.point.id() {
            // Leaving the virtual point toward this side continues the
            // real segment in the direction coming from the opposite
            // endpoint.
            self.point
                .real
                .is_traversable_from(self.opposite_endpoint().as_ref())
        } else if point.id() == self.real_endpoint().id() {
            self.point.real.is_traversable_from(point)
        } else {
            false
        }
    }

    fn lane_count(&self) -> u32 {
        self.point.real.lane_count()
    }

    fn road_type(&self) -> RoadType {
        self.point.real.road_type()
    }

    fn traffic_direction(&self) -> TrafficDirection {
        self.point.real.traffic_direction()
    }

    fn name(&self) -> Option<String> {
        self.point.real.name()
    }

    fn attribute(&self, key: &str) -> Option<AttributeValue> {
        self.point.real.attribute(key)
    }

    fn virtualized_segment(&self) -> Option<SegmentRef> {
        Some(self.point.real.clone())
    }
}

/// Search node standing for a real endpoint of a virtual goal's snapped
/// segment. The goal's approach segments are prepended to the node's
/// outgoing segments, so the goal point itself enters the open list
/// through regular expansion, charged with the approach arc cost; the
/// search still terminates only when the goal is popped.
pub(crate) struct VirtualCandidate {
    approaches: Vec<SegmentRef>,
    inner: Box<dyn AStarNode>,
}

impl VirtualCandidate {
    pub(crate) fn new(approaches: Vec<SegmentRef>, inner: Box<dyn AStarNode>) -> VirtualCandidate {
        debug_assert!(
            approaches
                .iter()
                .all(|a| a.end_point().id() == inner.graph_point().id())
        );
        VirtualCandidate { approaches, inner }
    }
}

impl AStarNode for VirtualCandidate {
    fn graph_point(&self) -> ConnectionRef {
        self.inner.graph_point()
    }

    fn arrival_segment(&self) -> Option<SegmentRef> {
        self.inner.arrival_segment()
    }

    fn cost(&self) -> f64 {
        self.inner.cost()
    }

    fn estimated_cost(&self) -> f64 {
        self.inner.estimated_cost()
    }

    fn graph_segments(&self) -> Vec<SegmentRef> {
        let mut segments = self.approaches.clone();
        segments.extend(self.inner.graph_segments());
        segments
    }
}

#[cfg(test)]
mod tests {
    use geo::line_string;

    use super::*;
    use crate::model::attributes::RoadAttributes;
    use crate::model::network::StandardRoadNetwork;

    fn snapped_point() -> (VirtualPoint, SegmentRef) {
        let mut builder = StandardRoadNetwork::builder();
        let a = builder.add_connection(Point::new(0.0, 0.0));
        let b = builder.add_connection(Point::new(100.0, 0.0));
        let id = builder.add_segment(a, b, RoadAttributes::default()).unwrap();
        let network = builder.build();
        let segment = network.segment(id).unwrap();
        let point = VirtualPoint::new(Point::new(30.0, 25.0), segment.clone());
        (point, segment)
    }

    #[test]
    fn snaps_onto_the_segment() {
        let (point, segment) = snapped_point();
        assert_eq!(point.position(), Point::new(30.0, 0.0));
        assert_eq!(
            point.virtualized_segment().map(|s| s.id()),
            Some(segment.id())
        );
    }

    #[test]
    fn exposes_two_outgoing_segments_splitting_the_length() {
        let (point, segment) = snapped_point();
        assert_eq!(point.connected_segment_count(), 2);
        let segments = point.connected_segments();
        let total: f64 = segments.iter().map(|s| s.length()).sum();
        assert!((total - segment.length()).abs() < 1e-9);
        assert!((segments[0].length() - 30.0).abs() < 1e-9);
        assert!((segments[1].length() - 70.0).abs() < 1e-9);
        for connection in point.connections() {
            assert!(connection.start_connected);
            assert_eq!(connection.segment.begin_point().id(), point.id());
        }
        // the far ends are the real segment's endpoints
        assert_eq!(segments[0].end_point().id(), segment.begin_point().id());
        assert_eq!(segments[1].end_point().id(), segment.end_point().id());
    }

    #[test]
    fn snap_follows_polyline_geometry() {
        let mut builder = StandardRoadNetwork::builder();
        let a = builder.add_connection(Point::new(0.0, 0.0));
        let b = builder.add_connection(Point::new(100.0, 100.0));
        let geometry = line_string![
            (x: 0.0, y: 0.0),
            (x: 100.0, y: 0.0),
            (x: 100.0, y: 100.0)
        ];
        let id = builder
            .add_segment_with_geometry(a, b, geometry, RoadAttributes::default())
            .unwrap();
        let network = builder.build();

        // closest to the vertical leg of the polyline
        let point = VirtualPoint::new(Point::new(120.0, 60.0), network.segment(id).unwrap());
        assert_eq!(point.position(), Point::new(100.0, 60.0));
        let segments = point.connected_segments();
        assert!((segments[0].length() - 160.0).abs() < 1e-9);
        assert!((segments[1].length() - 40.0).abs() < 1e-9);
        // the begin-side geometry walks back over the polyline corner
        assert_eq!(segments[0].geometry().0.len(), 3);
    }

    #[test]
    fn one_way_constrains_the_leaving_direction() {
        let mut builder = StandardRoadNetwork::builder();
        let a = builder.add_connection(Point::new(0.0, 0.0));
        let b = builder.add_connection(Point::new(100.0, 0.0));
        let id = builder.add_segment(a, b, RoadAttributes::one_way()).unwrap();
        let network = builder.build();

        let point = VirtualPoint::new(Point::new(50.0, 10.0), network.segment(id).unwrap());
        let segments = point.connected_segments();
        // traffic flows begin to end, so only the end side may be taken
        assert!(!segments[0].is_traversable_from(&point));
        assert!(segments[1].is_traversable_from(&point));
    }

    #[test]
    fn virtual_segments_delegate_attributes() {
        let mut builder = StandardRoadNetwork::builder();
        let a = builder.add_connection(Point::new(0.0, 0.0));
        let b = builder.add_connection(Point::new(100.0, 0.0));
        let attributes = RoadAttributes {
            lane_count: 4,
            name: Some("rue de la paix".to_string()),
            ..RoadAttributes::default()
        };
        let id = builder.add_segment(a, b, attributes).unwrap();
        let network = builder.build();

        let point = VirtualPoint::new(Point::new(10.0, 1.0), network.segment(id).unwrap());
        let segment = point.connected_segment(0).unwrap();
        assert_eq!(segment.lane_count(), 4);
        assert_eq!(segment.name().as_deref(), Some("rue de la paix"));
        assert_eq!(segment.road_type(), RoadType::Residential);
    }

    #[test]
    fn clones_share_identity_and_points_differ() {
        let (point, segment) = snapped_point();
        let clone = point.clone();
        assert_eq!(point.id(), clone.id());
        let other = VirtualPoint::new(Point::new(30.0, 25.0), segment);
        assert_ne!(point.id(), other.id());
    }
}
