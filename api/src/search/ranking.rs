/// Dot product over the product of magnitudes. Mismatched or degenerate
/// vectors score 0 so they never pass the threshold.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let mut dot = 0.0f32;
    let mut norm_a = 0.0f32;
    let mut norm_b = 0.0f32;
    for (x, y) in a.iter().zip(b.iter()) {
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    dot / (norm_a.sqrt() * norm_b.sqrt())
}

#[derive(Debug, Clone, PartialEq)]
pub struct Ranked {
    pub index: usize,
    pub similarity: f32,
}

/// Single linear scan: score every candidate, drop the ones below the
/// threshold, best first, truncated to `limit`.
pub fn rank(query: &[f32], candidates: &[Vec<f32>], threshold: f32, limit: usize) -> Vec<Ranked> {
    let mut scored: Vec<Ranked> = candidates
        .iter()
        .enumerate()
        .map(|(index, candidate)| Ranked {
            index,
            similarity: cosine_similarity(query, candidate),
        })
        .filter(|r| r.similarity >= threshold)
        .collect();

    scored.sort_by(|a, b| {
        b.similarity
            .partial_cmp(&a.similarity)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    scored.truncate(limit);
    scored
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_cosine_of_a_vector_with_itself_is_one() {
        let v = vec![0.3f32, -1.2, 0.05, 2.4];
        let sim = cosine_similarity(&v, &v);
        assert!((sim - 1.0).abs() < 1e-6, "got {sim}");
    }

    #[test]
    fn test_cosine_of_orthogonal_vectors_is_zero() {
        let a = vec![1.0f32, 0.0];
        let b = vec![0.0f32, 1.0];
        assert_eq!(cosine_similarity(&a, &b), 0.0);
    }

    #[test]
    fn test_degenerate_vectors_score_zero() {
        assert_eq!(cosine_similarity(&[], &[]), 0.0);
        assert_eq!(cosine_similarity(&[1.0, 2.0], &[1.0]), 0.0);
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 2.0]), 0.0);
    }

    #[test]
    fn test_rank_sorts_descending_and_filters() {
        let query = vec![1.0f32, 0.0];
        let candidates = vec![
            vec![0.0f32, 1.0],  // orthogonal, filtered out
            vec![1.0f32, 0.1],  // close
            vec![1.0f32, 0.0],  // identical
            vec![1.0f32, 0.5],  // further
        ];

        let ranked = rank(&query, &candidates, 0.5, 10);
        let indices: Vec<usize> = ranked.iter().map(|r| r.index).collect();
        assert_eq!(indices, vec![2, 1, 3]);

        for pair in ranked.windows(2) {
            assert!(pair[0].similarity >= pair[1].similarity);
        }
    }

    #[test]
    fn test_rank_truncates_to_limit() {
        let query = vec![1.0f32];
        let candidates = vec![vec![1.0f32]; 20];
        assert_eq!(rank(&query, &candidates, 0.0, 5).len(), 5);
    }
}
