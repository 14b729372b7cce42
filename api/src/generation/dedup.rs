use std::collections::HashSet;

/// A candidate title this close to an existing one is considered a rerun.
pub const TITLE_SIMILARITY_THRESHOLD: f64 = 0.82;

#[derive(Debug, PartialEq, Eq)]
pub enum RejectReason {
    UrlAlreadyProcessed,
    TitleTooSimilar,
}

pub fn normalize_title(title: &str) -> String {
    title.split_whitespace().collect::<Vec<_>>().join(" ").to_lowercase()
}

/// Percentage-based similarity over normalized titles.
pub fn title_similarity(a: &str, b: &str) -> f64 {
    strsim::normalized_levenshtein(&normalize_title(a), &normalize_title(b))
}

pub fn is_duplicate_title(title: &str, existing: &[String], threshold: f64) -> bool {
    existing
        .iter()
        .any(|known| title_similarity(title, known) >= threshold)
}

/// The gate every discovered result passes before it becomes a pending
/// candidate: exact-URL rejection first, then title similarity.
pub fn should_reject(
    url: &str,
    title: &str,
    known_urls: &HashSet<String>,
    known_titles: &[String],
) -> Option<RejectReason> {
    if known_urls.contains(url) {
        return Some(RejectReason::UrlAlreadyProcessed);
    }

    if is_duplicate_title(title, known_titles, TITLE_SIMILARITY_THRESHOLD) {
        return Some(RejectReason::TitleTooSimilar);
    }

    None
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_identical_titles_are_duplicates() {
        assert_eq!(title_similarity("El futuro del olivar", "El futuro del olivar"), 1.0);
        assert!(is_duplicate_title(
            "El futuro del olivar",
            &["el futuro  del Olivar".into()],
            TITLE_SIMILARITY_THRESHOLD,
        ));
    }

    #[test]
    fn test_unrelated_titles_pass() {
        assert!(!is_duplicate_title(
            "Rutas de senderismo en los Andes",
            &["Gastronomía urbana en Madrid".into()],
            TITLE_SIMILARITY_THRESHOLD,
        ));
    }

    #[test]
    fn test_processed_url_is_never_promoted() {
        let known_urls: HashSet<String> =
            HashSet::from(["https://example.com/nota".to_string()]);

        assert_eq!(
            should_reject("https://example.com/nota", "Una nota nueva", &known_urls, &[]),
            Some(RejectReason::UrlAlreadyProcessed)
        );
        assert_eq!(
            should_reject("https://example.com/otra", "Una nota nueva", &known_urls, &[]),
            None
        );
    }

    #[test]
    fn test_url_rejection_wins_over_title_rejection() {
        let known_urls: HashSet<String> =
            HashSet::from(["https://example.com/nota".to_string()]);
        let known_titles = vec!["Una nota nueva".to_string()];

        assert_eq!(
            should_reject("https://example.com/nota", "Una nota nueva", &known_urls, &known_titles),
            Some(RejectReason::UrlAlreadyProcessed)
        );
    }
}
