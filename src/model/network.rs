//! Standard road network implementation
//!
//! Connections and segments live in arenas owned by the network; handles
//! handed out to callers are lightweight `Rc`-backed views. A spatial
//! R-tree over the segment geometry answers nearest-segment queries used
//! to snap off-graph coordinates.

use std::rc::Rc;

use geo::{Distance, Euclidean, LineString, Point, line_string};
use log::info;
use rstar::RTree;
use rstar::primitives::{GeomWithData, Line};

use crate::DISTANCE_EPSILON;
use crate::error::Error;
use crate::model::attributes::{AttributeValue, RoadAttributes, RoadType, TrafficDirection};
use crate::model::primitives::{
    ConnectionRef, EdgeId, PointConnection, PointId, RoadConnection, RoadSegment, SegmentRef,
};

/// Handle of a persistent connection inside a [`StandardRoadNetwork`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConnectionId(pub(crate) usize);

/// Handle of a persistent segment inside a [`StandardRoadNetwork`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SegmentId(pub(crate) usize);

/// The capability the planner requires from a road network
pub trait RoadNetwork {
    /// Snap a raw coordinate onto the closest segment, or `None` when the
    /// network has no segment at all.
    fn nearest_segment(&self, point: &Point<f64>) -> Option<SegmentRef>;
}

struct ConnectionData {
    position: Point<f64>,
    segments: Vec<usize>,
}

struct SegmentData {
    begin: usize,
    end: usize,
    geometry: LineString<f64>,
    length: f64,
    attributes: RoadAttributes,
}

type IndexedLine = GeomWithData<Line<[f64; 2]>, usize>;

struct NetworkInner {
    connections: Vec<ConnectionData>,
    segments: Vec<SegmentData>,
    index: RTree<IndexedLine>,
}

/// Immutable road network built by [`RoadNetworkBuilder`]
#[derive(Clone)]
pub struct StandardRoadNetwork {
    inner: Rc<NetworkInner>,
}

impl StandardRoadNetwork {
    pub fn builder() -> RoadNetworkBuilder {
        RoadNetworkBuilder::new()
    }

    pub fn connection(&self, id: ConnectionId) -> Option<ConnectionRef> {
        if id.0 >= self.inner.connections.len() {
            return None;
        }
        Some(Rc::new(RealConnection {
            net: Rc::clone(&self.inner),
            index: id.0,
        }))
    }

    pub fn segment(&self, id: SegmentId) -> Option<SegmentRef> {
        if id.0 >= self.inner.segments.len() {
            return None;
        }
        Some(Rc::new(RealSegment {
            net: Rc::clone(&self.inner),
            index: id.0,
        }))
    }

    pub fn connection_count(&self) -> usize {
        self.inner.connections.len()
    }

    pub fn segment_count(&self) -> usize {
        self.inner.segments.len()
    }
}

impl RoadNetwork for StandardRoadNetwork {
    fn nearest_segment(&self, point: &Point<f64>) -> Option<SegmentRef> {
        let hit = self.inner.index.nearest_neighbor(&[point.x(), point.y()])?;
        Some(Rc::new(RealSegment {
            net: Rc::clone(&self.inner),
            index: hit.data,
        }))
    }
}

struct RealConnection {
    net: Rc<NetworkInner>,
    index: usize,
}

impl RealConnection {
    fn data(&self) -> &ConnectionData {
        &self.net.connections[self.index]
    }

    fn segment_ref(&self, segment_index: usize) -> SegmentRef {
        Rc::new(RealSegment {
            net: Rc::clone(&self.net),
            index: segment_index,
        })
    }
}

impl RoadConnection for RealConnection {
    fn id(&self) -> PointId {
        PointId::Real(ConnectionId(self.index))
    }

    fn position(&self) -> Point<f64> {
        self.data().position
    }

    fn connected_segment_count(&self) -> usize {
        self.data().segments.len()
    }

    fn connected_segment(&self, index: usize) -> Option<SegmentRef> {
        let segment_index = *self.data().segments.get(index)?;
        Some(self.segment_ref(segment_index))
    }

    fn connected_segments(&self) -> Vec<SegmentRef> {
        self.data()
            .segments
            .iter()
            .map(|&s| self.segment_ref(s))
            .collect()
    }

    fn connections(&self) -> Vec<PointConnection> {
        self.data()
            .segments
            .iter()
            .map(|&s| PointConnection {
                start_connected: self.net.segments[s].begin == self.index,
                segment: self.segment_ref(s),
            })
            .collect()
    }
}

struct RealSegment {
    net: Rc<NetworkInner>,
    index: usize,
}

impl RealSegment {
    fn data(&self) -> &SegmentData {
        &self.net.segments[self.index]
    }

    fn connection_ref(&self, connection_index: usize) -> ConnectionRef {
        Rc::new(RealConnection {
            net: Rc::clone(&self.net),
            index: connection_index,
        })
    }
}

impl RoadSegment for RealSegment {
    fn id(&self) -> EdgeId {
        EdgeId::Real(SegmentId(self.index))
    }

    fn begin_point(&self) -> ConnectionRef {
        self.connection_ref(self.data().begin)
    }

    fn end_point(&self) -> ConnectionRef {
        self.connection_ref(self.data().end)
    }

    fn length(&self) -> f64 {
        self.data().length
    }

    fn geometry(&self) -> LineString<f64> {
        self.data().geometry.clone()
    }

    fn is_traversable_from(&self, point: &dyn RoadConnection) -> bool {
        let direction = self.data().attributes.traffic_direction;
        if point.id() == PointId::Real(ConnectionId(self.data().begin)) {
            direction.traversable_from_begin()
        } else if point.id() == PointId::Real(ConnectionId(self.data().end)) {
            direction.traversable_from_end()
        } else {
            false
        }
    }

    fn lane_count(&self) -> u32 {
        self.data().attributes.lane_count
    }

    fn road_type(&self) -> RoadType {
        self.data().attributes.road_type
    }

    fn traffic_direction(&self) -> TrafficDirection {
        self.data().attributes.traffic_direction
    }

    fn name(&self) -> Option<String> {
        self.data().attributes.name.clone()
    }

    fn attribute(&self, key: &str) -> Option<AttributeValue> {
        self.data().attributes.extra.get(key).cloned()
    }
}

/// Builder for [`StandardRoadNetwork`]
#[derive(Default)]
pub struct RoadNetworkBuilder {
    connections: Vec<ConnectionData>,
    segments: Vec<SegmentData>,
}

impl RoadNetworkBuilder {
    pub fn new() -> Self {
        RoadNetworkBuilder::default()
    }

    pub fn add_connection(&mut self, position: Point<f64>) -> ConnectionId {
        self.connections.push(ConnectionData {
            position,
            segments: Vec::new(),
        });
        ConnectionId(self.connections.len() - 1)
    }

    /// Add a straight segment between two connections.
    pub fn add_segment(
        &mut self,
        begin: ConnectionId,
        end: ConnectionId,
        attributes: RoadAttributes,
    ) -> Result<SegmentId, Error> {
        if begin.0 >= self.connections.len() || end.0 >= self.connections.len() {
            return Err(Error::InvalidConnectionIndex);
        }
        let p1 = self.connections[begin.0].position;
        let p2 = self.connections[end.0].position;
        let geometry = line_string![(x: p1.x(), y: p1.y()), (x: p2.x(), y: p2.y())];
        self.push_segment(begin, end, geometry, attributes)
    }

    /// Add a segment whose geometry follows the given polyline. The
    /// polyline must begin and end at the declared connections.
    pub fn add_segment_with_geometry(
        &mut self,
        begin: ConnectionId,
        end: ConnectionId,
        geometry: LineString<f64>,
        attributes: RoadAttributes,
    ) -> Result<SegmentId, Error> {
        if begin.0 >= self.connections.len() || end.0 >= self.connections.len() {
            return Err(Error::InvalidConnectionIndex);
        }
        if geometry.0.len() < 2 {
            return Err(Error::InvalidData(
                "segment geometry needs at least two points".to_string(),
            ));
        }
        let first = Point::from(geometry.0[0]);
        let last = Point::from(geometry.0[geometry.0.len() - 1]);
        if Euclidean.distance(first, self.connections[begin.0].position) > DISTANCE_EPSILON
            || Euclidean.distance(last, self.connections[end.0].position) > DISTANCE_EPSILON
        {
            return Err(Error::InvalidData(
                "segment geometry does not meet its endpoint connections".to_string(),
            ));
        }
        self.push_segment(begin, end, geometry, attributes)
    }

    fn push_segment(
        &mut self,
        begin: ConnectionId,
        end: ConnectionId,
        geometry: LineString<f64>,
        attributes: RoadAttributes,
    ) -> Result<SegmentId, Error> {
        let length = geometry
            .lines()
            .map(|line| Euclidean.distance(Point::from(line.start), Point::from(line.end)))
            .sum();
        let index = self.segments.len();
        self.segments.push(SegmentData {
            begin: begin.0,
            end: end.0,
            geometry,
            length,
            attributes,
        });
        self.connections[begin.0].segments.push(index);
        if begin != end {
            self.connections[end.0].segments.push(index);
        }
        Ok(SegmentId(index))
    }

    pub fn build(self) -> StandardRoadNetwork {
        let mut indexed = Vec::new();
        for (segment_index, segment) in self.segments.iter().enumerate() {
            for line in segment.geometry.lines() {
                indexed.push(IndexedLine::new(
                    Line::new([line.start.x, line.start.y], [line.end.x, line.end.y]),
                    segment_index,
                ));
            }
        }
        info!(
            "Indexed road network with {} connections and {} segments",
            self.connections.len(),
            self.segments.len()
        );
        StandardRoadNetwork {
            inner: Rc::new(NetworkInner {
                connections: self.connections,
                segments: self.segments,
                index: RTree::bulk_load(indexed),
            }),
        }
    }
}
