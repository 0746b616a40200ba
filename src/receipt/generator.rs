use chrono::Datelike;

/// Fallback class code when normalization strips the name down to nothing
const EMPTY_CLASS_CODE: &str = "GEN";

/// Derive the 6-character year code from an academic year like "2025-2026":
/// the last 3 digits of each half, concatenated ("025026"). Malformed input
/// falls back to the current/next calendar year pair.
pub fn year_code(academic_year: &str) -> String {
    let parts: Vec<&str> = academic_year.split('-').collect();
    if parts.len() == 2 {
        if let (Some(a), Some(b)) = (short_year(parts[0]), short_year(parts[1])) {
            return format!("{a}{b}");
        }
    }

    let year = chrono::Local::now().year();
    format!("{:03}{:03}", year % 1000, (year + 1) % 1000)
}

fn short_year(half: &str) -> Option<String> {
    let half = half.trim();
    if half.is_empty() || !half.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    let start = half.len().saturating_sub(3);
    Some(format!("{:0>3}", &half[start..]))
}

/// Normalize a class name into the receipt class code: uppercased, French
/// ordinal spellings flattened to ASCII, everything non-alphanumeric
/// stripped, capped at 10 characters. "Maternelle 2" collapses to "MAT2".
pub fn class_code(class_name: &str) -> String {
    let upper = class_name.trim().to_uppercase();

    if let Some(rest) = upper.split("MATERNELLE").nth(1) {
        if let Some(digit) = rest.chars().find(|c| c.is_ascii_digit()) {
            return format!("MAT{digit}");
        }
    }

    let replaced = upper.replace("1ÈRE", "1ERE").replace("ÈME", "EME");

    let code: String = replaced
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .take(10)
        .collect();

    if code.is_empty() {
        EMPTY_CLASS_CODE.to_string()
    } else {
        code
    }
}

/// Format a receipt identifier: REC-<yearCode>-<seq:03>-<classCode>.
/// Pure; the caller supplies a non-colliding sequence number.
pub fn format_receipt_number(academic_year: &str, class_name: &str, seq: u32) -> String {
    format!(
        "REC-{}-{:03}-{}",
        year_code(academic_year),
        seq,
        class_code(class_name)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn year_code_takes_last_three_digits_of_each_half() {
        assert_eq!(year_code("2025-2026"), "025026");
        assert_eq!(year_code("1999-2000"), "999000");
    }

    #[test]
    fn year_code_pads_short_halves() {
        assert_eq!(year_code("25-26"), "025026");
    }

    #[test]
    fn year_code_falls_back_on_malformed_input() {
        let now = chrono::Local::now().year();
        let expected = format!("{:03}{:03}", now % 1000, (now + 1) % 1000);
        assert_eq!(year_code("garbage"), expected);
        assert_eq!(year_code(""), expected);
        assert_eq!(year_code("2025/2026"), expected);
    }

    #[test]
    fn class_code_maternelle_special_case() {
        assert_eq!(class_code("Maternelle 2"), "MAT2");
        assert_eq!(class_code("maternelle 1"), "MAT1");
        assert_eq!(class_code("Petite Maternelle 3"), "MAT3");
    }

    #[test]
    fn class_code_french_ordinals() {
        assert_eq!(class_code("1ère A"), "1EREA");
        assert_eq!(class_code("6ème B"), "6EMEB");
        assert_eq!(class_code("2nde C"), "2NDEC");
        assert_eq!(class_code("Tle D"), "TLED");
    }

    #[test]
    fn class_code_strips_and_truncates() {
        assert_eq!(class_code("CM2"), "CM2");
        assert_eq!(class_code("CM2 - Groupe B!"), "CM2GROUPEB");
        assert_eq!(class_code("Terminale Scientifique"), "TERMINALES");
    }

    #[test]
    fn class_code_empty_collapses_to_placeholder() {
        assert_eq!(class_code(""), "GEN");
        assert_eq!(class_code("---"), "GEN");
    }

    #[test]
    fn receipt_number_shape() {
        let receipt = format_receipt_number("2025-2026", "CM2", 5);
        assert_eq!(receipt, "REC-025026-005-CM2");
    }

    #[test]
    fn receipt_number_is_deterministic() {
        let a = format_receipt_number("2025-2026", "Maternelle 2", 42);
        let b = format_receipt_number("2025-2026", "Maternelle 2", 42);
        assert_eq!(a, b);
        assert_eq!(a, "REC-025026-042-MAT2");
    }

    #[test]
    fn receipt_number_matches_documented_pattern() {
        for (year, class, seq) in [
            ("2025-2026", "CM2", 1),
            ("2024-2025", "Maternelle 1", 999),
            ("2023-2024", "Tle C", 73),
        ] {
            let receipt = format_receipt_number(year, class, seq);
            let parts: Vec<&str> = receipt.split('-').collect();
            assert_eq!(parts.len(), 4, "{receipt}");
            assert_eq!(parts[0], "REC");
            assert_eq!(parts[1].len(), 6);
            assert!(parts[1].chars().all(|c| c.is_ascii_digit()));
            assert_eq!(parts[2].len(), 3);
            assert!(parts[2].chars().all(|c| c.is_ascii_digit()));
            assert!(parts[3].len() <= 10);
            assert!(parts[3].chars().all(|c| c.is_ascii_alphanumeric()));
        }
    }
}
