use geo::Point;
use roadstar::prelude::*;

/// a --- b --- c --- d along the x axis, 100 apart
fn linear_network() -> (StandardRoadNetwork, Vec<ConnectionId>, Vec<SegmentId>) {
    let mut builder = StandardRoadNetwork::builder();
    let connections: Vec<_> = (0..4)
        .map(|i| builder.add_connection(Point::new(i as f64 * 100.0, 0.0)))
        .collect();
    let segments: Vec<_> = connections
        .windows(2)
        .map(|w| {
            builder
                .add_segment(w[0], w[1], RoadAttributes::default())
                .unwrap()
        })
        .collect();
    (builder.build(), connections, segments)
}

#[test]
fn linear_route_covers_every_real_segment_once() {
    let (network, connections, segments) = linear_network();
    let planner = RoadAStar::new();

    // start snaps onto a-b, goal snaps onto c-d
    let path = planner
        .solve(&network, Point::new(40.0, 10.0), Point::new(260.0, -10.0))
        .expect("route should exist");

    let ids: Vec<_> = path.segments().iter().map(|s| s.id()).collect();
    let expected: Vec<_> = segments.iter().map(|&s| EdgeId::Real(s)).collect();
    assert_eq!(ids, expected);
    assert_eq!(path.start_point().id(), PointId::Real(connections[0]));
    assert_eq!(path.end_point().id(), PointId::Real(connections[3]));
    assert!((path.length() - 300.0).abs() < 1e-9);
}

#[test]
fn reversed_query_reverses_the_segment_sequence() {
    let (network, _, _) = linear_network();
    let planner = RoadAStar::new();

    let forward = planner
        .solve(&network, Point::new(40.0, 10.0), Point::new(260.0, -10.0))
        .unwrap();
    let backward = planner
        .solve(&network, Point::new(260.0, -10.0), Point::new(40.0, 10.0))
        .unwrap();

    let mut forward_ids: Vec<_> = forward.segments().iter().map(|s| s.id()).collect();
    let backward_ids: Vec<_> = backward.segments().iter().map(|s| s.id()).collect();
    forward_ids.reverse();
    assert_eq!(forward_ids, backward_ids);
    assert_eq!(forward.start_point().id(), backward.end_point().id());
}

#[test]
fn both_points_on_the_same_segment_bound_the_route_to_it() {
    let (network, _, segments) = linear_network();
    let planner = RoadAStar::new();

    let path = planner
        .solve(&network, Point::new(120.0, 5.0), Point::new(180.0, -5.0))
        .unwrap();
    assert_eq!(path.len(), 1);
    assert_eq!(path.segments()[0].id(), EdgeId::Real(segments[1]));
}

#[test]
fn disconnected_components_yield_no_route() {
    let mut builder = StandardRoadNetwork::builder();
    let a = builder.add_connection(Point::new(0.0, 0.0));
    let b = builder.add_connection(Point::new(100.0, 0.0));
    let c = builder.add_connection(Point::new(1000.0, 0.0));
    let d = builder.add_connection(Point::new(1100.0, 0.0));
    builder.add_segment(a, b, RoadAttributes::default()).unwrap();
    builder.add_segment(c, d, RoadAttributes::default()).unwrap();
    let network = builder.build();

    let planner = RoadAStar::new();
    assert!(
        planner
            .solve(&network, Point::new(50.0, 5.0), Point::new(1050.0, 5.0))
            .is_none()
    );
}

#[test]
fn grid_route_is_shortest() {
    // two rows of three connections, fully laddered
    //   d --- e --- f
    //   |     |     |
    //   a --- b --- c
    let mut builder = StandardRoadNetwork::builder();
    let a = builder.add_connection(Point::new(0.0, 0.0));
    let b = builder.add_connection(Point::new(100.0, 0.0));
    let c = builder.add_connection(Point::new(200.0, 0.0));
    let d = builder.add_connection(Point::new(0.0, 100.0));
    let e = builder.add_connection(Point::new(100.0, 100.0));
    let f = builder.add_connection(Point::new(200.0, 100.0));
    let ab = builder.add_segment(a, b, RoadAttributes::default()).unwrap();
    builder.add_segment(b, c, RoadAttributes::default()).unwrap();
    builder.add_segment(d, e, RoadAttributes::default()).unwrap();
    let ef = builder.add_segment(e, f, RoadAttributes::default()).unwrap();
    builder.add_segment(a, d, RoadAttributes::default()).unwrap();
    let be = builder.add_segment(b, e, RoadAttributes::default()).unwrap();
    builder.add_segment(c, f, RoadAttributes::default()).unwrap();
    let network = builder.build();

    let planner = RoadAStar::new();
    // start near a on the bottom row, goal near f on the top row
    let path = planner
        .solve(&network, Point::new(10.0, -5.0), Point::new(180.0, 105.0))
        .unwrap();

    let ids: Vec<_> = path.segments().iter().map(|s| s.id()).collect();
    assert_eq!(
        ids,
        vec![EdgeId::Real(ab), EdgeId::Real(be), EdgeId::Real(ef)]
    );
    assert!((path.length() - 300.0).abs() < 1e-9);
}

#[test]
fn one_way_road_forces_a_cycle_back_to_its_origin() {
    // a -> b is one way; returning to a requires the detour through c
    let mut builder = StandardRoadNetwork::builder();
    let a = builder.add_connection(Point::new(0.0, 0.0));
    let b = builder.add_connection(Point::new(100.0, 0.0));
    let c = builder.add_connection(Point::new(50.0, 80.0));
    let ab = builder.add_segment(a, b, RoadAttributes::one_way()).unwrap();
    let bc = builder.add_segment(b, c, RoadAttributes::default()).unwrap();
    let ca = builder.add_segment(c, a, RoadAttributes::default()).unwrap();
    let network = builder.build();

    let planner = RoadAStar::new();
    let goal = network.connection(a).unwrap();
    let path = planner
        .solve_from_position(&network, Point::new(50.0, 5.0), &goal)
        .unwrap();

    let ids: Vec<_> = path.segments().iter().map(|s| s.id()).collect();
    assert_eq!(
        ids,
        vec![EdgeId::Real(ab), EdgeId::Real(bc), EdgeId::Real(ca)]
    );
    assert_eq!(path.end_point().id(), goal.id());
}

#[test]
fn mixed_endpoint_queries() {
    let (network, connections, _) = linear_network();
    let planner = RoadAStar::new();

    let start = network.connection(connections[0]).unwrap();
    let to_coordinate = planner
        .solve_to_position(&network, &start, Point::new(260.0, 10.0))
        .unwrap();
    assert_eq!(to_coordinate.start_point().id(), start.id());
    assert_eq!(to_coordinate.len(), 3);

    let end = network.connection(connections[3]).unwrap();
    let from_coordinate = planner
        .solve_from_position(&network, Point::new(40.0, 10.0), &end)
        .unwrap();
    assert_eq!(from_coordinate.end_point().id(), end.id());
    assert_eq!(from_coordinate.len(), 3);
}

#[test]
fn returned_paths_never_contain_virtual_segments() {
    let (network, _, _) = linear_network();
    let planner = RoadAStar::new();
    let path = planner
        .solve(&network, Point::new(40.0, 10.0), Point::new(260.0, -10.0))
        .unwrap();
    assert!(
        path.segments()
            .iter()
            .all(|s| matches!(s.id(), EdgeId::Real(_)))
    );
    // and no segment twice
    let mut ids: Vec<_> = path.segments().iter().map(|s| s.id()).collect();
    ids.sort();
    ids.dedup();
    assert_eq!(ids.len(), path.len());
}

#[test]
fn heuristic_never_exceeds_the_found_path_length() {
    let (network, connections, _) = linear_network();
    let planner = RoadAStar::new();

    let start = network.connection(connections[0]).unwrap();
    let end = network.connection(connections[3]).unwrap();
    let path = planner.solve_between(&start, &end).unwrap();

    let heuristic = EuclideanHeuristic;
    assert!(heuristic.evaluate(start.as_ref(), end.as_ref()) <= path.length() + 1e-9);
}
