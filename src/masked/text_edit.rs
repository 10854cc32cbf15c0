use unicode_width::UnicodeWidthChar;

pub fn char_count(value: &str) -> usize {
    value.chars().count()
}

pub fn char_at(value: &str, pos: usize) -> Option<char> {
    value.chars().nth(pos)
}

/// Terminal column of the cursor sitting before char position `pos`.
/// Hosts use this to restore a display cursor after an edit.
pub fn display_col(value: &str, pos: usize) -> usize {
    value
        .chars()
        .take(pos)
        .map(|ch| ch.width().unwrap_or(0))
        .sum()
}

#[cfg(test)]
mod tests {
    use super::{char_at, char_count, display_col};

    #[test]
    fn char_lookup_is_position_based() {
        assert_eq!(char_count("aéb"), 3);
        assert_eq!(char_at("aéb", 1), Some('é'));
        assert_eq!(char_at("aéb", 3), None);
    }

    #[test]
    fn display_col_accounts_for_wide_chars() {
        assert_eq!(display_col("ab", 1), 1);
        assert_eq!(display_col("日本x", 2), 4);
        assert_eq!(display_col("abc", 10), 3);
    }
}
