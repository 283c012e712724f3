// topo2d: planar topology graph and distance engine
// License: MIT
//
// Monotone-chain index over an edge's vertex sequence. A monotone chain is a
// maximal run of segments whose direction stays in one quadrant, so the
// bounding box of a chain is simply the box of its two end vertices. Chain
// pairs whose boxes are disjoint can skip every segment pair they cover,
// which is the pruning used by the pairwise intersection pass.

use crate::geom::{BoundingBox, Coord};

/// Quadrant of a direction vector: 0 = NE, 1 = NW, 2 = SW, 3 = SE.
/// A zero-length step counts as NE; it cannot start a new chain anyway.
#[inline]
fn quadrant(p0: &Coord, p1: &Coord) -> u8 {
    let dx = p1.x - p0.x;
    let dy = p1.y - p0.y;
    if dx >= 0.0 {
        if dy >= 0.0 {
            0
        } else {
            3
        }
    } else if dy >= 0.0 {
        1
    } else {
        2
    }
}

fn chain_starts(pts: &[Coord]) -> Vec<usize> {
    let mut starts = vec![0];
    let mut start = 0;
    while start < pts.len() - 1 {
        let end = find_chain_end(pts, start);
        starts.push(end);
        start = end;
    }
    starts
}

/// Index of the last vertex of the chain beginning at `start`.
fn find_chain_end(pts: &[Coord], start: usize) -> usize {
    let chain_quad = quadrant(&pts[start], &pts[start + 1]);
    let mut last = start + 1;
    while last < pts.len() - 1 {
        if quadrant(&pts[last], &pts[last + 1]) != chain_quad {
            break;
        }
        last += 1;
    }
    last
}

/// The chain decomposition of one edge. Holds only vertex indices; the
/// coordinates stay with the owning edge.
#[derive(Clone, Debug)]
pub struct MonotoneChainEdge {
    starts: Vec<usize>,
}

impl MonotoneChainEdge {
    pub fn new(pts: &[Coord]) -> Self {
        debug_assert!(pts.len() >= 2);
        MonotoneChainEdge {
            starts: chain_starts(pts),
        }
    }

    #[inline]
    pub fn chain_count(&self) -> usize {
        self.starts.len() - 1
    }

    /// Envelope of chain `i`; monotonicity makes the end vertices enough.
    pub fn chain_envelope(&self, pts: &[Coord], i: usize) -> BoundingBox {
        BoundingBox::from_segment(&pts[self.starts[i]], &pts[self.starts[i + 1]])
    }

    /// Invokes `action(i, j)` for every candidate segment pair (i a segment
    /// start index in `pts`, j in `other_pts`) whose chain envelopes
    /// overlap. Pairs in disjoint chains are never reported.
    pub fn compute_overlaps(
        &self,
        pts: &[Coord],
        other: &MonotoneChainEdge,
        other_pts: &[Coord],
        action: &mut impl FnMut(usize, usize),
    ) {
        for i in 0..self.chain_count() {
            let env_i = self.chain_envelope(pts, i);
            for j in 0..other.chain_count() {
                let env_j = other.chain_envelope(other_pts, j);
                if env_i.intersects(&env_j) {
                    intersect_chains(
                        pts,
                        self.starts[i],
                        self.starts[i + 1],
                        other_pts,
                        other.starts[j],
                        other.starts[j + 1],
                        action,
                    );
                }
            }
        }
    }
}

/// Recursive binary subdivision of two overlapping chain spans. Terminates
/// at single-segment spans, reporting the pair.
#[allow(clippy::too_many_arguments)]
fn intersect_chains(
    pts0: &[Coord],
    start0: usize,
    end0: usize,
    pts1: &[Coord],
    start1: usize,
    end1: usize,
    action: &mut impl FnMut(usize, usize),
) {
    if end0 - start0 == 1 && end1 - start1 == 1 {
        action(start0, start1);
        return;
    }
    let env0 = BoundingBox::from_segment(&pts0[start0], &pts0[end0]);
    let env1 = BoundingBox::from_segment(&pts1[start1], &pts1[end1]);
    if !env0.intersects(&env1) {
        return;
    }
    let mid0 = (start0 + end0) / 2;
    let mid1 = (start1 + end1) / 2;
    if start0 < mid0 {
        if start1 < mid1 {
            intersect_chains(pts0, start0, mid0, pts1, start1, mid1, action);
        }
        if mid1 < end1 {
            intersect_chains(pts0, start0, mid0, pts1, mid1, end1, action);
        }
    }
    if mid0 < end0 {
        if start1 < mid1 {
            intersect_chains(pts0, mid0, end0, pts1, start1, mid1, action);
        }
        if mid1 < end1 {
            intersect_chains(pts0, mid0, end0, pts1, mid1, end1, action);
        }
    }
}
