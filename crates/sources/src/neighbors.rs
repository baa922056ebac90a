//! Brute-force k-nearest-neighbour search under Euclidean distance.
//!
//! Every query is compared against every indexed point. Queries are
//! independent, so they run on the rayon pool; results come back in query
//! order regardless.

use ndarray::{Array2, ArrayView1, Axis};
use rayon::prelude::*;
use std::cmp::Ordering;

/// One search hit
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Neighbor {
    /// Row of the point in the fitted matrix
    pub index: usize,
    pub distance: f64,
}

/// Exhaustive neighbour index over a fixed point set, one point per row
#[derive(Debug, Clone, Default)]
pub struct NearestNeighbors {
    points: Array2<f64>,
}

impl NearestNeighbors {
    pub fn fit(points: Array2<f64>) -> Self {
        Self { points }
    }

    pub fn len(&self) -> usize {
        self.points.nrows()
    }

    pub fn is_empty(&self) -> bool {
        self.points.nrows() == 0
    }

    /// The `k` closest points to each query row, closest first.
    ///
    /// `k` is clamped to the number of indexed points. Equal distances are
    /// ordered by point position.
    pub fn kneighbors(&self, queries: &Array2<f64>, k: usize) -> Vec<Vec<Neighbor>> {
        let k = k.min(self.points.nrows());
        queries
            .axis_iter(Axis(0))
            .into_par_iter()
            .map(|query| self.query_one(query, k))
            .collect()
    }

    fn query_one(&self, query: ArrayView1<f64>, k: usize) -> Vec<Neighbor> {
        if k == 0 {
            return Vec::new();
        }

        let mut all: Vec<Neighbor> = self
            .points
            .axis_iter(Axis(0))
            .enumerate()
            .map(|(index, point)| Neighbor {
                index,
                distance: euclidean(query, point),
            })
            .collect();

        if k < all.len() {
            all.select_nth_unstable_by(k - 1, compare);
            all.truncate(k);
        }
        all.sort_unstable_by(compare);
        all
    }
}

fn compare(a: &Neighbor, b: &Neighbor) -> Ordering {
    a.distance
        .total_cmp(&b.distance)
        .then_with(|| a.index.cmp(&b.index))
}

/// Euclidean distance over the shared prefix of two vectors
pub fn euclidean(a: ArrayView1<f64>, b: ArrayView1<f64>) -> f64 {
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| (x - y) * (x - y))
        .sum::<f64>()
        .sqrt()
}
