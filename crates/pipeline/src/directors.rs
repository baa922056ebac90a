//! Smoothed director quality score.
//!
//! ## Algorithm
//! For each distinct "Directors" value with `count` rows and mean IMDb rating
//! `mean`, over a batch whose overall mean IMDb rating is `global`:
//!
//! ```text
//! score = (mean * count + global * alpha) / (count + alpha)
//! ```
//!
//! Directors with few rows are pulled toward the global mean. The whole cell
//! is the key, so "Joel Coen, Ethan Coen" is one director value.

use std::collections::HashMap;

/// Shrinkage strength used for uploads
pub const DEFAULT_DIRECTOR_ALPHA: f64 = 10.0;

/// Smoothed score for every director in `rows` (director, IMDb rating).
///
/// An empty batch gives an empty map.
pub fn smoothed_director_scores<'a>(
    rows: impl IntoIterator<Item = (&'a str, f64)>,
    alpha: f64,
) -> HashMap<String, f64> {
    let mut stats: HashMap<&str, (f64, usize)> = HashMap::new();
    let mut total = 0.0;
    let mut n = 0usize;

    for (director, rating) in rows {
        let entry = stats.entry(director).or_insert((0.0, 0));
        entry.0 += rating;
        entry.1 += 1;
        total += rating;
        n += 1;
    }
    if n == 0 {
        return HashMap::new();
    }

    let global_mean = total / n as f64;
    stats
        .into_iter()
        .map(|(director, (sum, count))| {
            let mean = sum / count as f64;
            (
                director.to_string(),
                smoothed_score(mean, count, global_mean, alpha),
            )
        })
        .collect()
}

pub fn smoothed_score(mean: f64, count: usize, global_mean: f64, alpha: f64) -> f64 {
    let count = count as f64;
    (mean * count + global_mean * alpha) / (count + alpha)
}
