//! Utility functions and helpers

/// Format a number with thousands separators
pub fn format_number<T: ToString>(n: T) -> String {
    let s = n.to_string();
    let (sign, digits) = match s.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", s.as_str()),
    };
    let (int_part, frac_part) = match digits.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (digits, None),
    };
    let mut result = String::new();
    let mut count = 0;
    for c in int_part.chars().rev() {
        if count == 3 {
            result.push(',');
            count = 0;
        }
        result.push(c);
        count += 1;
    }
    let mut formatted: String = result.chars().rev().collect();
    if let Some(f) = frac_part {
        formatted.push('.');
        formatted.push_str(f);
    }
    format!("{}{}", sign, formatted)
}

/// Generate a short hash (8 characters) from content
pub fn short_hash(content: &str) -> String {
    use std::collections::hash_map::DefaultHasher;
    use std::hash::{Hash, Hasher};

    let mut hasher = DefaultHasher::new();
    content.hash(&mut hasher);
    let hash = hasher.finish();

    // Zero-pad so small hash values still yield 8 characters
    let hex = format!("{:016x}", hash);
    hex[..8].to_string()
}

/// Generate a synthetic record ID from batch position and row content
pub fn synthetic_record_id(index: usize, content: &str) -> String {
    format!("txn-{}-{}", index, short_hash(content))
}

/// Format a ratio as a percentage string with two decimals
pub fn format_percent(value: f64) -> String {
    format!("{:.2}%", value * 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(1000), "1,000");
        assert_eq!(format_number(1234567), "1,234,567");
        assert_eq!(format_number(12), "12");
        assert_eq!(format_number(-45000), "-45,000");
        assert_eq!(format_number("1234.56"), "1,234.56");
    }

    #[test]
    fn test_short_hash_stable() {
        assert_eq!(short_hash("abc"), short_hash("abc"));
        assert_eq!(short_hash("abc").len(), 8);
        assert_ne!(short_hash("abc"), short_hash("abd"));
    }

    #[test]
    fn test_synthetic_record_id() {
        let id = synthetic_record_id(3, "row-content");
        assert!(id.starts_with("txn-3-"));
        assert_eq!(id, synthetic_record_id(3, "row-content"));
        assert_ne!(id, synthetic_record_id(4, "row-content"));
    }

    #[test]
    fn test_format_percent() {
        assert_eq!(format_percent(0.0512), "5.12%");
        assert_eq!(format_percent(0.0), "0.00%");
    }
}
