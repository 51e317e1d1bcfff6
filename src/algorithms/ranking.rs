use std::collections::HashSet;

/// Select the `n` highest-scoring indices from a dense score vector, skipping
/// the given set. Ties keep the sort's ordering; NaN scores compare equal and
/// sink naturally.
pub fn top_n_scored(scores: &[f32], n: usize, skip: &HashSet<usize>) -> Vec<(usize, f32)> {
    let mut ranked: Vec<(usize, f32)> = scores
        .iter()
        .enumerate()
        .filter(|(index, _)| !skip.contains(index))
        .map(|(index, &score)| (index, score))
        .collect();

    ranked.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
    ranked.truncate(n);
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_top_n_scored() {
        let scores = vec![0.1, 0.5, 0.3, 0.9, 0.2];
        let top = top_n_scored(&scores, 2, &HashSet::new());
        assert_eq!(top, vec![(3, 0.9), (1, 0.5)]);
    }

    #[test]
    fn test_skip_set_excluded() {
        let scores = vec![0.1, 0.5, 0.3, 0.9, 0.2];
        let skip = HashSet::from([3, 1]);
        let top = top_n_scored(&scores, 2, &skip);
        assert_eq!(top, vec![(2, 0.3), (4, 0.2)]);
    }

    #[test]
    fn test_n_larger_than_candidates() {
        let scores = vec![0.4, 0.6];
        let top = top_n_scored(&scores, 10, &HashSet::new());
        assert_eq!(top.len(), 2);
    }

    #[test]
    fn test_no_duplicate_indices() {
        let scores = vec![0.5; 6];
        let top = top_n_scored(&scores, 6, &HashSet::new());
        let unique: HashSet<usize> = top.iter().map(|&(index, _)| index).collect();
        assert_eq!(unique.len(), top.len());
    }
}
