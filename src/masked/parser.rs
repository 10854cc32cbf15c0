use indexmap::IndexMap;

use super::grammar;
use super::text_edit;

pub const DEFAULT_MASK: &str = "CCCCCCCCCC";
pub const DEFAULT_PROMPT: char = '_';

/// Result of a [`MaskParser::replace`] edit: the edited masked string and
/// the char position to restore the text cursor to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Replaced {
    pub value: String,
    pub end: usize,
}

/// Compiles a pattern of flag characters and literals into a literal map
/// and edits masked strings against it.
#[derive(Debug, Clone)]
pub struct MaskParser {
    mask: String,
    prompt: char,
    escaped: String,
    literals: IndexMap<usize, char>,
}

impl Default for MaskParser {
    fn default() -> Self {
        Self::new(DEFAULT_MASK, "_")
    }
}

impl MaskParser {
    pub fn new(mask: impl Into<String>, prompt: impl Into<String>) -> Self {
        let compiled = grammar::compile(DEFAULT_MASK);
        let mut parser = Self {
            mask: DEFAULT_MASK.to_string(),
            prompt: DEFAULT_PROMPT,
            escaped: compiled.escaped,
            literals: compiled.literals,
        };
        parser.set_mask(mask);
        parser.set_prompt(prompt);
        parser
    }

    pub fn mask(&self) -> &str {
        &self.mask
    }

    /// Rebuilds the literal map; empty patterns are ignored.
    pub fn set_mask(&mut self, mask: impl Into<String>) {
        let mask = mask.into();
        if mask.is_empty() {
            return;
        }
        let compiled = grammar::compile(&mask);
        self.mask = mask;
        self.escaped = compiled.escaped;
        self.literals = compiled.literals;
    }

    pub fn prompt(&self) -> char {
        self.prompt
    }

    /// Keeps the first character; empty assignments are ignored.
    pub fn set_prompt(&mut self, prompt: impl Into<String>) {
        if let Some(ch) = prompt.into().chars().next() {
            self.prompt = ch;
        }
    }

    /// The pattern with escape backslashes removed; same length as every
    /// masked string this parser produces.
    pub fn escaped_mask(&self) -> &str {
        &self.escaped
    }

    pub fn literal_positions(&self) -> Vec<usize> {
        self.literals.keys().copied().collect()
    }

    fn flag_at(&self, pos: usize) -> Option<char> {
        text_edit::char_at(&self.escaped, pos)
    }

    fn validate_at(&self, pos: usize, ch: char) -> bool {
        self.flag_at(pos)
            .is_some_and(|flag| grammar::validate(flag, ch))
    }

    /// Produces a fully-sized masked string; free positions consume input
    /// left-to-right, one character per position, with rejects resolving
    /// to the prompt in place (no realignment against later input).
    pub fn apply(&self, input: &str) -> String {
        let input_chars: Vec<char> = input.chars().collect();
        let mut out = String::with_capacity(text_edit::char_count(&self.escaped));
        let mut taken = 0usize;

        for (pos, flag) in self.escaped.chars().enumerate() {
            if let Some(&literal) = self.literals.get(&pos) {
                out.push(literal);
                continue;
            }
            match input_chars.get(taken) {
                Some(&raw) => {
                    let ch = grammar::fold_ime_digit(raw);
                    if grammar::validate(flag, ch) {
                        out.push(ch);
                    } else {
                        out.push(self.prompt);
                    }
                    taken += 1;
                }
                None => out.push(self.prompt),
            }
        }
        out
    }

    /// Strips literals and prompt characters, keeping user-entered
    /// characters in position order.
    pub fn parse(&self, masked: &str) -> String {
        masked
            .chars()
            .enumerate()
            .filter(|(pos, ch)| !self.literals.contains_key(pos) && *ch != self.prompt)
            .map(|(_, ch)| ch)
            .collect()
    }

    /// Whether every required free position holds a valid, non-prompt
    /// character. The probe is indexed in the masked coordinate space;
    /// it is not re-masked first.
    pub fn is_valid_string(&self, input: &str) -> bool {
        let chars: Vec<char> = input.chars().collect();
        Self::required_non_literal_positions(&self.escaped)
            .into_iter()
            .all(|pos| match chars.get(pos) {
                Some(&ch) => ch != self.prompt && self.validate_at(pos, ch),
                None => false,
            })
    }

    /// Writes `value` into `masked` from `start`, clearing the rest of
    /// `start..end` when input runs out. Literals are never overwritten
    /// (a matching input char is consumed); an invalid input char halts
    /// the walk, while the prompt is always accepted as clearing a slot.
    pub fn replace(&self, masked: &str, value: &str, start: usize, end: usize) -> Replaced {
        let mut chars: Vec<char> = masked.chars().collect();
        let end = end.min(chars.len());
        let input: Vec<char> = value.chars().collect();
        let mut taken = 0usize;
        let mut cursor = start;
        let mut pos = start;

        while pos < end || (taken < input.len() && pos < chars.len()) {
            if self.literals.contains_key(&pos) {
                if input.get(taken) == chars.get(pos) {
                    taken += 1;
                    cursor = pos + 1;
                }
                pos += 1;
                continue;
            }
            match input.get(taken) {
                Some(&raw) => {
                    let ch = grammar::fold_ime_digit(raw);
                    if ch != self.prompt && !self.validate_at(pos, ch) {
                        break;
                    }
                    chars[pos] = ch;
                    taken += 1;
                    cursor = pos + 1;
                }
                None => chars[pos] = self.prompt,
            }
            pos += 1;
        }

        Replaced {
            value: chars.into_iter().collect(),
            end: cursor,
        }
    }

    /// Nearest free position at or before `start`; `start` when none exists.
    pub fn previous_non_literal_position(&self, start: usize) -> usize {
        let len = text_edit::char_count(&self.escaped);
        if len == 0 {
            return start;
        }
        (0..=start.min(len - 1))
            .rev()
            .find(|pos| !self.literals.contains_key(pos))
            .unwrap_or(start)
    }

    /// Nearest free position at or after `start`; `start` when none exists.
    pub fn next_non_literal_position(&self, start: usize) -> usize {
        let len = text_edit::char_count(&self.escaped);
        (start..len)
            .find(|pos| !self.literals.contains_key(pos))
            .unwrap_or(start)
    }

    pub fn non_literal_positions(mask: &str) -> Vec<usize> {
        mask.chars()
            .enumerate()
            .filter(|(_, ch)| grammar::is_flag(*ch))
            .map(|(pos, _)| pos)
            .collect()
    }

    pub fn required_non_literal_positions(mask: &str) -> Vec<usize> {
        mask.chars()
            .enumerate()
            .filter(|(_, ch)| grammar::is_required_flag(*ch))
            .map(|(pos, _)| pos)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::{DEFAULT_MASK, MaskParser, Replaced};

    fn phone() -> MaskParser {
        MaskParser::new("(000) 0000-000", "_")
    }

    #[test]
    fn defaults_apply_on_empty_configuration() {
        let parser = MaskParser::new("", "");
        assert_eq!(parser.mask(), DEFAULT_MASK);
        assert_eq!(parser.prompt(), '_');
        assert_eq!(parser.apply(""), "__________");
    }

    #[test]
    fn empty_mask_assignment_keeps_previous() {
        let mut parser = phone();
        parser.set_mask("");
        assert_eq!(parser.mask(), "(000) 0000-000");
        parser.set_mask("00/00");
        assert_eq!(parser.escaped_mask(), "00/00");
        assert_eq!(parser.literal_positions(), vec![2]);
    }

    #[test]
    fn prompt_assignment_truncates_and_rejects_empty() {
        let mut parser = phone();
        parser.set_prompt("*!");
        assert_eq!(parser.prompt(), '*');
        parser.set_prompt("");
        assert_eq!(parser.prompt(), '*');
    }

    #[test]
    fn apply_fills_positionally() {
        let mut parser = phone();
        parser.set_prompt("*");
        assert_eq!(parser.apply("1234"), "(123) 4***-***");
    }

    #[test]
    fn apply_without_input_is_literals_and_prompts() {
        let parser = phone();
        assert_eq!(parser.apply(""), "(___) ____-___");
        let applied = parser.apply("");
        assert_eq!(applied.chars().count(), parser.escaped_mask().chars().count());
    }

    #[test]
    fn apply_rejects_in_place_without_shifting() {
        let parser = MaskParser::new("000", "_");
        assert_eq!(parser.apply("1a3"), "1_3");
    }

    #[test]
    fn apply_discards_excess_input() {
        let parser = MaskParser::new("00", "_");
        assert_eq!(parser.apply("123456"), "12");
    }

    #[test]
    fn apply_folds_fullwidth_digits() {
        let parser = MaskParser::new("000", "_");
        assert_eq!(parser.apply("\u{ff11}\u{ff12}3"), "123");
    }

    #[test]
    fn escaped_flag_renders_as_literal() {
        let parser = MaskParser::new("CCCC-\\C-CCC", "_");
        assert_eq!(parser.apply(""), "____-C-___");
        assert_eq!(parser.literal_positions(), vec![4, 5, 6]);
    }

    #[test]
    fn parse_strips_literals_and_prompts() {
        let parser = phone();
        assert_eq!(parser.parse(&parser.apply("1234")), "1234");
        assert_eq!(parser.parse(&parser.apply("")), "");
        assert_eq!(parser.parse("(123) 4___-__9"), "12349");
    }

    #[test]
    fn replace_types_into_selection() {
        let parser = phone();
        let masked = parser.apply("");
        let Replaced { value, end } = parser.replace(&masked, "1", 1, 2);
        assert_eq!(value, "(1__) ____-___");
        assert_eq!(end, 2);
    }

    #[test]
    fn replace_continues_past_selection_while_input_remains() {
        let parser = phone();
        let masked = parser.apply("");
        let Replaced { value, end } = parser.replace(&masked, "1234", 1, 2);
        assert_eq!(value, "(123) 4___-___");
        assert_eq!(end, 7);
    }

    #[test]
    fn replace_consumes_typed_literals() {
        let parser = phone();
        let masked = parser.apply("");
        let replaced = parser.replace(&masked, "(12", 0, 1);
        assert_eq!(replaced.value, "(12_) ____-___");
        assert_eq!(replaced.end, 3);
    }

    #[test]
    fn replace_skips_untyped_literals() {
        let parser = phone();
        let masked = parser.apply("123");
        // Insertion at the end of the first group walks over ") ".
        let replaced = parser.replace(&masked, "4", 4, 4);
        assert_eq!(replaced.value, "(123) 4___-___");
        assert_eq!(replaced.end, 7);
    }

    #[test]
    fn replace_halts_on_invalid_character() {
        let parser = phone();
        let masked = parser.apply("");
        let replaced = parser.replace(&masked, "x", 1, 2);
        assert_eq!(replaced.value, masked);
        assert_eq!(replaced.end, 1);
    }

    #[test]
    fn replace_halts_midway_and_keeps_earlier_writes() {
        let parser = phone();
        let masked = parser.apply("");
        let replaced = parser.replace(&masked, "12x4", 1, 2);
        assert_eq!(replaced.value, "(12_) ____-___");
        assert_eq!(replaced.end, 3);
    }

    #[test]
    fn replace_clears_selection_when_input_runs_out() {
        let parser = phone();
        let masked = parser.apply("123456");
        let replaced = parser.replace(&masked, "", 1, 4);
        assert_eq!(replaced.value, "(___) 456_-___");
        assert_eq!(replaced.end, 1);
    }

    #[test]
    fn replace_accepts_prompt_as_clearing_input() {
        let parser = phone();
        let masked = parser.apply("123");
        let replaced = parser.replace(&masked, "_", 2, 3);
        assert_eq!(replaced.value, "(1_3) ____-___");
        assert_eq!(replaced.end, 3);
    }

    #[test]
    fn replace_preserves_length_and_clamps_end() {
        let parser = phone();
        let masked = parser.apply("");
        let replaced = parser.replace(&masked, "99", 12, 500);
        assert_eq!(replaced.value.chars().count(), masked.chars().count());
        assert_eq!(replaced.value, "(___) ____-_99");
        assert_eq!(replaced.end, 14);
    }

    #[test]
    fn is_valid_string_requires_every_required_position() {
        let parser = MaskParser::new("00-00", "_");
        assert!(parser.is_valid_string("12-34"));
        assert!(!parser.is_valid_string("12-_4"));
        assert!(!parser.is_valid_string("12-3"));
        assert!(!parser.is_valid_string(""));
    }

    #[test]
    fn is_valid_string_compares_in_masked_coordinate_space() {
        // Pins the documented behavior: the probe is indexed as if it were
        // already masked, so a correctly positioned string passes even with
        // a foreign character on the literal slot, and an unmasked digit
        // string fails because its tail lands short of the last required
        // position.
        let parser = MaskParser::new("00-00", "_");
        assert!(parser.is_valid_string("12x34"));
        assert!(!parser.is_valid_string("1234"));
    }

    #[test]
    fn is_valid_string_true_for_all_optional_mask() {
        let parser = MaskParser::new("99-99", "_");
        assert!(parser.is_valid_string(""));
        let required = MaskParser::required_non_literal_positions(parser.escaped_mask());
        assert!(required.is_empty());
    }

    #[test]
    fn non_literal_navigation_clamps_without_wrapping() {
        let parser = phone();
        assert_eq!(parser.next_non_literal_position(0), 1);
        assert_eq!(parser.next_non_literal_position(4), 6);
        assert_eq!(parser.previous_non_literal_position(5), 3);
        assert_eq!(parser.previous_non_literal_position(0), 0);
        assert_eq!(parser.next_non_literal_position(99), 99);

        let all_literal = MaskParser::new("--", "_");
        assert_eq!(all_literal.next_non_literal_position(0), 0);
        assert_eq!(all_literal.previous_non_literal_position(1), 1);
    }

    #[test]
    fn operations_are_total_over_arbitrary_unicode() {
        let parser = MaskParser::new("LL-00", "_");
        // Combining marks and astral-plane input degrade to prompts or a
        // halted walk; nothing panics and lengths stay mask-sized.
        let weird = "e\u{301}\u{0301}🦀9";
        let applied = parser.apply(weird);
        assert_eq!(applied.chars().count(), 5);
        let replaced = parser.replace(&applied, weird, 0, 5);
        assert_eq!(replaced.value.chars().count(), 5);
        let _ = parser.parse(weird);
        let _ = parser.is_valid_string(weird);
        let _ = parser.replace("", weird, 3, 1);
    }

    #[test]
    fn position_enumeration() {
        assert_eq!(
            MaskParser::non_literal_positions("(000) 09"),
            vec![1, 2, 3, 6, 7]
        );
        assert_eq!(
            MaskParser::required_non_literal_positions("(000) 09"),
            vec![1, 2, 3, 6]
        );
    }
}
