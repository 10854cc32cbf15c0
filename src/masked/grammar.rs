use indexmap::IndexMap;

/// Pattern flag characters, each selecting a per-position validation rule.
pub const FLAGS: [char; 9] = ['C', '&', 'a', 'A', '?', 'L', '0', '9', '#'];

/// Flags whose positions must hold a valid, non-prompt character for the
/// mask to count as complete.
pub const REQUIRED_FLAGS: [char; 5] = ['0', '#', 'L', 'A', '&'];

pub fn is_flag(ch: char) -> bool {
    FLAGS.contains(&ch)
}

pub fn is_required_flag(ch: char) -> bool {
    REQUIRED_FLAGS.contains(&ch)
}

// The whitespace-tolerant flags accept `char::is_whitespace`: the Unicode
// separator class plus ASCII control whitespace (tab, newline).
fn is_separator(ch: char) -> bool {
    ch.is_whitespace()
}

/// Folds full-width (IME) digits into their ASCII equivalents.
pub fn fold_ime_digit(ch: char) -> char {
    match ch {
        '\u{ff10}'..='\u{ff19}' => {
            char::from_u32(ch as u32 - 0xff10 + '0' as u32).unwrap_or(ch)
        }
        _ => ch,
    }
}

/// Whether `ch` satisfies the validation rule selected by `flag`.
pub fn validate(flag: char, ch: char) -> bool {
    match flag {
        'C' => true,
        '&' => !is_separator(ch),
        'a' => ch.is_alphanumeric() || is_separator(ch),
        'A' => ch.is_alphanumeric(),
        '?' => ch.is_alphabetic() || is_separator(ch),
        'L' => ch.is_alphabetic(),
        '0' => ch.is_ascii_digit(),
        '9' => ch.is_ascii_digit() || is_separator(ch),
        '#' => ch.is_ascii_digit() || ch == '-' || ch == '+',
        _ => false,
    }
}

pub struct CompiledMask {
    /// The pattern with escape backslashes removed; same length as every
    /// masked string the parser produces.
    pub escaped: String,
    /// Output position -> fixed literal character, in position order.
    pub literals: IndexMap<usize, char>,
}

/// Expands a raw pattern into its escaped form and literal map. An escape
/// consumes two source characters but yields one output position, so this
/// is an explicit two-pointer scan.
pub fn compile(mask: &str) -> CompiledMask {
    let chars: Vec<char> = mask.chars().collect();
    let mut escaped = String::with_capacity(chars.len());
    let mut literals = IndexMap::new();
    let mut src = 0usize;
    let mut out = 0usize;

    while src < chars.len() {
        let ch = chars[src];
        if ch == '\\'
            && let Some(&next) = chars.get(src + 1)
            && is_flag(next)
        {
            escaped.push(next);
            literals.insert(out, next);
            src += 2;
            out += 1;
            continue;
        }

        escaped.push(ch);
        if !is_flag(ch) {
            literals.insert(out, ch);
        }
        src += 1;
        out += 1;
    }

    CompiledMask { escaped, literals }
}

#[cfg(test)]
mod tests {
    use super::{compile, fold_ime_digit, is_required_flag, validate};

    #[test]
    fn compile_builds_literal_map_in_position_order() {
        let compiled = compile("(000) 0000-000");
        assert_eq!(compiled.escaped, "(000) 0000-000");
        let positions: Vec<usize> = compiled.literals.keys().copied().collect();
        assert_eq!(positions, vec![0, 4, 5, 10]);
        assert_eq!(compiled.literals.get(&10), Some(&'-'));
    }

    #[test]
    fn escaped_flag_becomes_literal_at_one_position() {
        let compiled = compile("CCCC-\\C-CCC");
        assert_eq!(compiled.escaped, "CCCC-C-CCC");
        let positions: Vec<usize> = compiled.literals.keys().copied().collect();
        assert_eq!(positions, vec![4, 5, 6]);
        assert_eq!(compiled.literals.get(&5), Some(&'C'));
    }

    #[test]
    fn trailing_backslash_stays_a_literal() {
        let compiled = compile("00\\");
        assert_eq!(compiled.escaped, "00\\");
        assert_eq!(compiled.literals.get(&2), Some(&'\\'));
    }

    #[test]
    fn digit_flags_accept_ascii_digits_only() {
        assert!(validate('0', '7'));
        assert!(!validate('0', 'x'));
        assert!(!validate('0', ' '));
        assert!(validate('9', ' '));
        assert!(validate('#', '-'));
        assert!(validate('#', '+'));
        assert!(!validate('#', 'a'));
    }

    #[test]
    fn letter_flags_are_unicode_aware() {
        assert!(validate('L', 'ß'));
        assert!(!validate('L', '5'));
        assert!(validate('A', 'ß'));
        assert!(validate('A', '5'));
        assert!(validate('?', ' '));
        assert!(validate('a', '5'));
        assert!(!validate('&', ' '));
        assert!(validate('&', '!'));
        assert!(validate('C', '!'));
    }

    #[test]
    fn separator_flags_accept_control_whitespace() {
        assert!(validate('9', '\t'));
        assert!(validate('a', '\n'));
        assert!(validate('?', '\u{00a0}'));
        assert!(!validate('&', '\t'));
        assert!(!validate('0', '\t'));
    }

    #[test]
    fn fullwidth_digits_fold_to_ascii() {
        assert_eq!(fold_ime_digit('\u{ff15}'), '5');
        assert_eq!(fold_ime_digit('5'), '5');
        assert_eq!(fold_ime_digit('x'), 'x');
    }

    #[test]
    fn required_flag_set() {
        for flag in ['0', '#', 'L', 'A', '&'] {
            assert!(is_required_flag(flag));
        }
        for flag in ['C', '?', 'a', '9'] {
            assert!(!is_required_flag(flag));
        }
    }
}
