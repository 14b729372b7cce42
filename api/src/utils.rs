/// URL slug from an article title. Spanish diacritics fold to their ASCII
/// base letter so slugs stay plain-ASCII.
pub fn slugify(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    let mut prev_dash = true;

    for c in title.chars() {
        let folded = match c {
            'á' | 'à' | 'ä' | 'â' | 'Á' | 'À' | 'Ä' | 'Â' => 'a',
            'é' | 'è' | 'ë' | 'ê' | 'É' | 'È' | 'Ë' | 'Ê' => 'e',
            'í' | 'ì' | 'ï' | 'î' | 'Í' | 'Ì' | 'Ï' | 'Î' => 'i',
            'ó' | 'ò' | 'ö' | 'ô' | 'Ó' | 'Ò' | 'Ö' | 'Ô' => 'o',
            'ú' | 'ù' | 'ü' | 'û' | 'Ú' | 'Ù' | 'Ü' | 'Û' => 'u',
            'ñ' | 'Ñ' => 'n',
            'ç' | 'Ç' => 'c',
            c => c,
        };

        if folded.is_ascii_alphanumeric() {
            slug.push(folded.to_ascii_lowercase());
            prev_dash = false;
        } else if !prev_dash {
            slug.push('-');
            prev_dash = true;
        }
    }

    while slug.ends_with('-') {
        slug.pop();
    }

    slug
}

/// First `max_chars` of a text on a word boundary, for candidate snippets.
pub fn excerpt(text: &str, max_chars: usize) -> String {
    let trimmed = text.trim();
    if trimmed.chars().count() <= max_chars {
        return trimmed.to_string();
    }

    let cut: String = trimmed.chars().take(max_chars).collect();
    match cut.rfind(' ') {
        Some(pos) => format!("{}…", &cut[..pos]),
        None => format!("{cut}…"),
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_slugify_folds_spanish_diacritics() {
        assert_eq!(
            slugify("Montañas de España: guía rápida"),
            "montanas-de-espana-guia-rapida"
        );
    }

    #[test]
    fn test_slugify_collapses_separators() {
        assert_eq!(slugify("  ¿Qué   pasa? "), "que-pasa");
        assert_eq!(slugify("---"), "");
    }

    #[test]
    fn test_excerpt_cuts_on_word_boundary() {
        assert_eq!(excerpt("uno dos tres cuatro", 11), "uno dos…");
        assert_eq!(excerpt("corto", 10), "corto");
    }
}
