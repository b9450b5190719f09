//! Integration test: structural properties of the joiner over a range of
//! topologies (grids, fans, loops, shuffled and reversed chains).

#![allow(clippy::unwrap_used, clippy::cast_precision_loss)]

use std::collections::HashSet;

use segjoin_core::{JoinConfig, JoinedChain, Point, PointKey, Segment, join_segments_with};

fn seg(a: (f64, f64), b: (f64, f64)) -> Segment {
    Segment::from((a, b))
}

/// All unit edges of an `n` x `n` lattice of points.
fn grid(n: usize) -> Vec<Segment> {
    let mut segments = Vec::new();
    for i in 0..n {
        for j in 0..n {
            let (x, y) = (i as f64, j as f64);
            if i + 1 < n {
                segments.push(seg((x, y), (x + 1.0, y)));
            }
            if j + 1 < n {
                segments.push(seg((x, y + 1.0), (x, y)));
            }
        }
    }
    segments
}

/// `arms` spokes around the origin, alternating orientation.
fn fan(arms: usize) -> Vec<Segment> {
    (0..arms)
        .map(|k| {
            let angle = k as f64 * std::f64::consts::TAU / arms as f64;
            let tip = (angle.cos(), angle.sin());
            if k % 2 == 0 {
                seg((0.0, 0.0), tip)
            } else {
                seg(tip, (0.0, 0.0))
            }
        })
        .collect()
}

/// A polyline through `n + 1` points cut into segments, listed in a
/// scrambled order with every third segment reversed.
fn scrambled_path(n: usize) -> Vec<Segment> {
    let mut segments: Vec<Segment> = (0..n)
        .map(|i| {
            let a = (i as f64, (i % 3) as f64);
            let b = ((i + 1) as f64, ((i + 1) % 3) as f64);
            if i % 3 == 0 { seg(b, a) } else { seg(a, b) }
        })
        .collect();
    // Deterministic permutation: stride through the list.
    let stride = 7;
    let mut order: Vec<usize> = (0..n).map(|i| (i * stride) % n).collect();
    order.dedup();
    if order.len() == n {
        segments = order.into_iter().map(|i| segments[i]).collect();
    }
    segments
}

/// A closed square ring of `4 * side` unit segments.
fn ring(side: usize) -> Vec<Segment> {
    let s = side as f64;
    let mut corners = Vec::new();
    for i in 0..side {
        corners.push((i as f64, 0.0));
    }
    for i in 0..side {
        corners.push((s, i as f64));
    }
    for i in 0..side {
        corners.push((s - i as f64, s));
    }
    for i in 0..side {
        corners.push((0.0, s - i as f64));
    }
    (0..corners.len())
        .map(|i| seg(corners[i], corners[(i + 1) % corners.len()]))
        .collect()
}

fn cases() -> Vec<(&'static str, Vec<Segment>)> {
    let mut mixed = grid(3);
    mixed.extend(fan(5));
    mixed.push(seg((9.0, 9.0), (9.0, 9.0)));
    mixed.push(seg((0.0, 0.0), (1.0, 0.0)));

    vec![
        ("empty", Vec::new()),
        ("grid", grid(5)),
        ("fan", fan(6)),
        ("odd fan", fan(7)),
        ("scrambled path", scrambled_path(30)),
        ("ring", ring(4)),
        ("mixed", mixed),
    ]
}

fn assert_covers_every_segment(name: &str, segments: &[Segment], chains: &[JoinedChain]) {
    let mut seen = vec![0usize; segments.len()];
    for chain in chains {
        let points = chain.polyline.points();
        assert!(points.len() >= 2, "{name}: polyline shorter than 2 points");
        assert_eq!(
            points.len(),
            chain.segments.len() + 1,
            "{name}: one point per consumed segment plus one",
        );
        for (k, &s) in chain.segments.iter().enumerate() {
            seen[s] += 1;
            let (a, b) = (points[k].key(), points[k + 1].key());
            let (begin, end) = (segments[s].begin.key(), segments[s].end.key());
            assert!(
                (a == begin && b == end) || (a == end && b == begin),
                "{name}: segment {s} is not adjacent at position {k}",
            );
        }
    }
    assert!(
        seen.iter().all(|&count| count == 1),
        "{name}: segment usage counts {seen:?}",
    );
}

fn assert_no_repeated_points(name: &str, chains: &[JoinedChain]) {
    for chain in chains {
        let points = chain.polyline.points();
        let zero_length = points.len() == 2 && points[0].key() == points[1].key();
        let body: &[Point] = if chain.closed || zero_length {
            &points[..points.len() - 1]
        } else {
            points
        };
        let distinct: HashSet<PointKey> = body.iter().map(|p| p.key()).collect();
        assert_eq!(
            distinct.len(),
            body.len(),
            "{name}: repeated point in {points:?}",
        );
    }
}

#[test]
fn every_segment_appears_exactly_once() {
    for config in [JoinConfig::default(), JoinConfig { close_loops: false }] {
        for (name, segments) in cases() {
            let chains = join_segments_with(&segments, &config).unwrap();
            assert_covers_every_segment(name, &segments, &chains);
        }
    }
}

#[test]
fn points_repeat_only_to_close_a_loop() {
    for config in [JoinConfig::default(), JoinConfig { close_loops: false }] {
        for (name, segments) in cases() {
            let chains = join_segments_with(&segments, &config).unwrap();
            assert_no_repeated_points(name, &chains);
        }
    }
}

#[test]
fn output_is_deterministic() {
    for (name, segments) in cases() {
        let first = join_segments_with(&segments, &JoinConfig::default()).unwrap();
        let second = join_segments_with(&segments, &JoinConfig::default()).unwrap();
        assert_eq!(first, second, "{name}: output changed between runs");
    }
}

#[test]
fn scrambled_path_rejoins_into_one_polyline() {
    let segments = scrambled_path(30);
    let chains = join_segments_with(&segments, &JoinConfig::default()).unwrap();
    assert_eq!(chains.len(), 1);
    assert_eq!(chains[0].polyline.len(), 31);
}

#[test]
fn ring_closes() {
    let chains = join_segments_with(&ring(4), &JoinConfig::default()).unwrap();
    assert_eq!(chains.len(), 1);
    assert!(chains[0].closed);
    assert!(chains[0].polyline.is_closed());
    assert_eq!(chains[0].polyline.len(), 17);
}

#[test]
fn fan_pairs_up_arms_through_the_hub() {
    // Each chain through the hub takes two arms; an odd arm is left alone.
    let chains = join_segments_with(&fan(7), &JoinConfig::default()).unwrap();
    assert_eq!(chains.len(), 4);
    assert_eq!(chains.iter().filter(|c| c.polyline.len() == 3).count(), 3);
}
