// topo2d: planar topology graph and distance engine
// Splitting edges at noded intersection points.

mod helpers;

use topo2d::edge::Edge;
use topo2d::intersector::LineIntersector;
use topo2d::{Coord, Label, Location};

fn edge(pts: &[(f64, f64)]) -> Edge {
    Edge::new(
        pts.iter().map(|&(x, y)| Coord::new(x, y)).collect(),
        Some(Label::new_on(0, Location::Interior)),
    )
}

#[test]
fn single_interior_intersection_splits_in_two() {
    let mut e = edge(&[(0.0, 0.0), (10.0, 0.0)]);
    e.intersections.add(Coord::new(5.0, 0.0), 0, 5.0);

    let mut out = Vec::new();
    e.add_split_edges(&mut out);
    assert_eq!(out.len(), 2);
    assert_eq!(out[0].coords(), &[Coord::new(0.0, 0.0), Coord::new(5.0, 0.0)][..]);
    assert_eq!(out[1].coords(), &[Coord::new(5.0, 0.0), Coord::new(10.0, 0.0)][..]);
}

#[test]
fn split_edges_cover_the_parent() {
    let mut e = edge(&[(0.0, 0.0), (10.0, 0.0), (10.0, 10.0)]);
    e.intersections.add(Coord::new(3.0, 0.0), 0, 3.0);
    e.intersections.add(Coord::new(10.0, 4.0), 1, 4.0);

    let mut out = Vec::new();
    e.add_split_edges(&mut out);
    assert_eq!(out.len(), 3);

    // consecutive pieces share an endpoint, and concatenating them
    // reproduces the parent's path
    let mut path: Vec<Coord> = out[0].coords().to_vec();
    for piece in &out[1..] {
        assert!(path.last().unwrap().equals_2d(piece.coord(0)));
        path.extend_from_slice(&piece.coords()[1..]);
    }
    assert!(path.first().unwrap().equals_2d(e.coord(0)));
    assert!(path.last().unwrap().equals_2d(e.coord(e.num_points() - 1)));
}

#[test]
fn intersection_at_vertex_does_not_duplicate_points() {
    let mut e = edge(&[(0.0, 0.0), (10.0, 0.0), (20.0, 0.0)]);
    // a hit landing exactly on the middle vertex, in normalized form
    e.intersections.add(Coord::new(10.0, 0.0), 1, 0.0);

    let mut out = Vec::new();
    e.add_split_edges(&mut out);
    assert_eq!(out.len(), 2);
    for piece in &out {
        assert_eq!(piece.num_points(), 2);
    }
}

#[test]
fn repeated_intersection_is_recorded_once() {
    let mut e = edge(&[(0.0, 0.0), (10.0, 0.0)]);
    e.intersections.add(Coord::new(5.0, 0.0), 0, 5.0);
    e.intersections.add(Coord::new(5.0, 0.0), 0, 5.0);

    let mut out = Vec::new();
    e.add_split_edges(&mut out);
    assert_eq!(out.len(), 2);
}

#[test]
fn crossing_computed_by_intersector_splits_both_ways() {
    let mut li = LineIntersector::new();
    li.compute_intersection(
        &Coord::new(0.0, 0.0),
        &Coord::new(10.0, 0.0),
        &Coord::new(5.0, -5.0),
        &Coord::new(5.0, 5.0),
    );
    assert!(li.has_intersection());
    assert!(li.is_proper());

    let mut e = edge(&[(0.0, 0.0), (10.0, 0.0)]);
    e.add_intersections(&li, 0, 0).unwrap();
    let mut out = Vec::new();
    e.add_split_edges(&mut out);
    assert_eq!(out.len(), 2);
    assert!(out[0].coord(1).equals_2d(&Coord::new(5.0, 0.0)));
}
