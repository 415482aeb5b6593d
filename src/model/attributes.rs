//! Road-domain attributes carried by segments

use hashbrown::HashMap;
use serde::{Deserialize, Serialize};

/// Coarse road classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum RoadType {
    Motorway,
    Trunk,
    Primary,
    Secondary,
    Tertiary,
    #[default]
    Residential,
    Service,
    Track,
    Other,
}

/// Legal driving direction of a segment, relative to its begin point
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum TrafficDirection {
    /// Traversable in both directions
    #[default]
    DoubleWay,
    /// Traversable from the begin point to the end point only
    OneWay,
    /// Traversable from the end point to the begin point only
    ReverseOneWay,
    /// Closed to traffic
    NoWay,
}

impl TrafficDirection {
    pub fn traversable_from_begin(self) -> bool {
        matches!(self, TrafficDirection::DoubleWay | TrafficDirection::OneWay)
    }

    pub fn traversable_from_end(self) -> bool {
        matches!(
            self,
            TrafficDirection::DoubleWay | TrafficDirection::ReverseOneWay
        )
    }
}

/// Value of a named segment attribute
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum AttributeValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

/// Road attributes attached to a real segment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoadAttributes {
    pub lane_count: u32,
    pub road_type: RoadType,
    pub traffic_direction: TrafficDirection,
    pub name: Option<String>,
    /// Arbitrary named attributes
    pub extra: HashMap<String, AttributeValue>,
}

impl Default for RoadAttributes {
    fn default() -> Self {
        RoadAttributes {
            lane_count: 2,
            road_type: RoadType::default(),
            traffic_direction: TrafficDirection::default(),
            name: None,
            extra: HashMap::new(),
        }
    }
}

impl RoadAttributes {
    pub fn one_way() -> Self {
        RoadAttributes {
            traffic_direction: TrafficDirection::OneWay,
            ..RoadAttributes::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn traffic_direction_predicates() {
        assert!(TrafficDirection::DoubleWay.traversable_from_begin());
        assert!(TrafficDirection::DoubleWay.traversable_from_end());
        assert!(TrafficDirection::OneWay.traversable_from_begin());
        assert!(!TrafficDirection::OneWay.traversable_from_end());
        assert!(!TrafficDirection::ReverseOneWay.traversable_from_begin());
        assert!(TrafficDirection::ReverseOneWay.traversable_from_end());
        assert!(!TrafficDirection::NoWay.traversable_from_begin());
        assert!(!TrafficDirection::NoWay.traversable_from_end());
    }
}
