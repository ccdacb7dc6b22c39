//! Accent- and case-folding for Turkish search terms.

/// Lowercase `input`, map the Turkish letters `ç ğ ı İ ö ş ü` (either case)
/// to their ASCII base letter, collapse whitespace runs to one space and
/// trim both ends.
///
/// ```text
/// "BALIK  ÇEŞİTLERİ " -> "balik cesitleri"
/// ```
pub fn normalize(input: &str) -> String {
    let mut folded = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            'ç' | 'Ç' => folded.push('c'),
            'ğ' | 'Ğ' => folded.push('g'),
            'ı' | 'İ' => folded.push('i'),
            'ö' | 'Ö' => folded.push('o'),
            'ş' | 'Ş' => folded.push('s'),
            'ü' | 'Ü' => folded.push('u'),
            other => folded.extend(other.to_lowercase()),
        }
    }

    let mut out = String::with_capacity(folded.len());
    for word in folded.split_whitespace() {
        if !out.is_empty() {
            out.push(' ');
        }
        out.push_str(word);
    }
    out
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn folds_upper_case_turkish_phrase() {
        let out = normalize("BALIK ÇEŞİTLERİ");
        assert_eq!(out, "balik cesitleri");
        assert!(!out.chars().any(|c| "öüşçğıİ".contains(c)));
    }

    #[test]
    fn folds_lower_case_diacritics() {
        assert_eq!(normalize("çöğüşı"), "cogusi");
        assert_eq!(normalize("Alabalık"), "alabalik");
    }

    #[test]
    fn collapses_and_trims_whitespace() {
        assert_eq!(normalize("  somon \t  fileto\n"), "somon fileto");
        assert_eq!(normalize("   "), "");
    }

    #[test]
    fn leaves_ascii_digits_and_symbols() {
        assert_eq!(normalize("FISH001 - 2kg"), "fish001 - 2kg");
    }
}
