//! Implementations of the supported string metrics.
//!
//! All metrics compare signatures at `char` granularity, since every
//! symbol the encoder emits is a single Unicode scalar value.

use std::collections::HashMap;

use crate::error::DistanceError;

/// Unit-cost Levenshtein edit distance (insert, delete, substitute).
///
/// Two-row dynamic program, O(|a|·|b|) time and O(|b|) space.
pub fn levenshtein(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    if a.is_empty() {
        return b.len();
    }
    if b.is_empty() {
        return a.len();
    }

    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr = vec![0usize; b.len() + 1];

    for (i, &ca) in a.iter().enumerate() {
        curr[0] = i + 1;
        for (j, &cb) in b.iter().enumerate() {
            let cost = usize::from(ca != cb);
            curr[j + 1] = (prev[j + 1] + 1).min(curr[j] + 1).min(prev[j] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[b.len()]
}

/// Damerau-Levenshtein edit distance: Levenshtein plus adjacent
/// transposition as a unit-cost operation.
///
/// This is the unrestricted variant (a transposed pair may be edited
/// again later), not optimal string alignment.
pub fn damerau_levenshtein(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let (la, lb) = (a.len(), b.len());
    if la == 0 {
        return lb;
    }
    if lb == 0 {
        return la;
    }

    let max_dist = la + lb;
    // Last row index (1-based) at which each char of `a` was seen.
    let mut last_row: HashMap<char, usize> = HashMap::new();

    // Matrix indexed from -1 in the textbook formulation; stored with a
    // +1 offset.
    let mut d = vec![vec![0usize; lb + 2]; la + 2];
    d[0][0] = max_dist;
    for i in 0..=la {
        d[i + 1][0] = max_dist;
        d[i + 1][1] = i;
    }
    for j in 0..=lb {
        d[0][j + 1] = max_dist;
        d[1][j + 1] = j;
    }

    for i in 1..=la {
        let mut last_col = 0usize;
        for j in 1..=lb {
            let k = *last_row.get(&b[j - 1]).unwrap_or(&0);
            let l = last_col;
            let cost = if a[i - 1] == b[j - 1] {
                last_col = j;
                0
            } else {
                1
            };

            d[i + 1][j + 1] = (d[i][j] + cost)
                .min(d[i + 1][j] + 1)
                .min(d[i][j + 1] + 1)
                .min(d[k][l] + (i - k - 1) + 1 + (j - l - 1));
        }
        last_row.insert(a[i - 1], i);
    }

    d[la + 1][lb + 1]
}

/// Jaro similarity in `[0, 1]`; 1 means identical.
pub fn jaro(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    if a.is_empty() && b.is_empty() {
        return 1.0;
    }
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }

    let window = (a.len().max(b.len()) / 2).saturating_sub(1);
    let mut a_matched = vec![false; a.len()];
    let mut b_matched = vec![false; b.len()];
    let mut matches = 0usize;

    for i in 0..a.len() {
        let lo = i.saturating_sub(window);
        let hi = (i + window + 1).min(b.len());
        for j in lo..hi {
            if !b_matched[j] && a[i] == b[j] {
                a_matched[i] = true;
                b_matched[j] = true;
                matches += 1;
                break;
            }
        }
    }

    if matches == 0 {
        return 0.0;
    }

    let mut mismatched = 0usize;
    let mut j = 0usize;
    for i in 0..a.len() {
        if a_matched[i] {
            while !b_matched[j] {
                j += 1;
            }
            if a[i] != b[j] {
                mismatched += 1;
            }
            j += 1;
        }
    }
    let transpositions = mismatched / 2;

    let m = matches as f64;
    (m / a.len() as f64 + m / b.len() as f64 + (m - transpositions as f64) / m) / 3.0
}

/// Winkler common-prefix bonus: length capped at 4, scaling factor 0.1,
/// applied only above the customary 0.7 boost threshold.
const WINKLER_PREFIX_CAP: usize = 4;
const WINKLER_SCALING: f64 = 0.1;
const WINKLER_BOOST_THRESHOLD: f64 = 0.7;

/// Jaro-Winkler similarity in `[0, 1]`; 1 means identical.
pub fn jaro_winkler(a: &str, b: &str) -> f64 {
    let similarity = jaro(a, b);
    if similarity <= WINKLER_BOOST_THRESHOLD {
        return similarity;
    }

    let prefix = a
        .chars()
        .zip(b.chars())
        .take(WINKLER_PREFIX_CAP)
        .take_while(|(x, y)| x == y)
        .count();

    similarity + prefix as f64 * WINKLER_SCALING * (1.0 - similarity)
}

/// Hamming distance: position-wise mismatch count.
///
/// Only defined for equal-length signatures; unequal lengths are a
/// [`DistanceError::LengthMismatch`], never padded or truncated.
pub fn hamming(a: &str, b: &str) -> Result<usize, DistanceError> {
    let left = a.chars().count();
    let right = b.chars().count();
    if left != right {
        return Err(DistanceError::LengthMismatch { left, right });
    }

    Ok(a.chars().zip(b.chars()).filter(|(x, y)| x != y).count())
}
