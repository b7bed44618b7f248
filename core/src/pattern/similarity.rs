//! Pure similarity helpers shared by the Pattern Engine.

use std::collections::HashSet;

/// Overlap ratio between two keyword sets: `|intersection| / |union|`.
/// Returns `0.0` when both sets are empty.
#[must_use]
pub fn keyword_overlap(a: &[String], b: &[String]) -> f32 {
    let set_a: HashSet<&str> = a.iter().map(String::as_str).collect();
    let set_b: HashSet<&str> = b.iter().map(String::as_str).collect();
    if set_a.is_empty() && set_b.is_empty() {
        return 0.0;
    }
    let intersection = set_a.intersection(&set_b).count();
    let union = set_a.union(&set_b).count();
    if union == 0 {
        0.0
    } else {
        intersection as f32 / union as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_sets_overlap_fully() {
        let a = vec!["a".to_string(), "b".to_string()];
        assert!((keyword_overlap(&a, &a) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn disjoint_sets_have_zero_overlap() {
        let a = vec!["a".to_string()];
        let b = vec!["b".to_string()];
        assert_eq!(keyword_overlap(&a, &b), 0.0);
    }
}
