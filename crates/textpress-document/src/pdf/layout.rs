// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Greedy line-filling word wrap.
//
// Input newlines always break. Within a line, words are appended while the
// measured width of "current + space + word" stays strictly below the limit;
// otherwise the current line is flushed and the word starts a new one.

/// Anything that can report the rendered width of a string.
pub trait TextMeasure {
    /// Rendered width of `text`, in the same unit as the wrap limit.
    fn width(&self, text: &str) -> f32;
}

/// Wrap `text` into lines no wider than `max_width`.
///
/// Runs of whitespace inside a line collapse to a single space. An input
/// line with no words yields exactly one empty output line. A single word
/// wider than `max_width` is placed on a line of its own, unbroken.
pub fn wrap_lines(text: &str, max_width: f32, measure: &impl TextMeasure) -> Vec<String> {
    let mut lines = Vec::new();

    for paragraph in text.split('\n') {
        let mut words = paragraph.split_whitespace();

        let Some(first) = words.next() else {
            lines.push(String::new());
            continue;
        };

        let mut current = first.to_string();
        for word in words {
            let candidate = format!("{current} {word}");
            if measure.width(&candidate) < max_width {
                current = candidate;
            } else {
                lines.push(std::mem::replace(&mut current, word.to_string()));
            }
        }
        lines.push(current);
    }

    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pdf::metrics::Helvetica;

    /// Every character is one unit wide.
    struct Monospace;

    impl TextMeasure for Monospace {
        fn width(&self, text: &str) -> f32 {
            text.chars().count() as f32
        }
    }

    #[test]
    fn short_line_is_unchanged() {
        assert_eq!(wrap_lines("hello world", 80.0, &Monospace), vec!["hello world"]);
    }

    #[test]
    fn limit_is_strict() {
        // "ab cd" is exactly 5 wide, which is not under the limit.
        assert_eq!(wrap_lines("ab cd", 5.0, &Monospace), vec!["ab", "cd"]);
        assert_eq!(wrap_lines("ab c", 5.0, &Monospace), vec!["ab c"]);
    }

    #[test]
    fn whitespace_collapses_within_line() {
        assert_eq!(
            wrap_lines("  one \t two   three  ", 80.0, &Monospace),
            vec!["one two three"]
        );
    }

    #[test]
    fn blank_lines_are_preserved_exactly() {
        assert_eq!(
            wrap_lines("first\n\nsecond\n   \nthird", 80.0, &Monospace),
            vec!["first", "", "second", "", "third"]
        );
    }

    #[test]
    fn empty_input_is_one_blank_line() {
        assert_eq!(wrap_lines("", 80.0, &Monospace), vec![String::new()]);
    }

    #[test]
    fn trailing_newline_adds_blank_line() {
        assert_eq!(wrap_lines("end\n", 80.0, &Monospace), vec!["end", ""]);
    }

    #[test]
    fn crlf_input_wraps_like_lf() {
        assert_eq!(
            wrap_lines("a b\r\nc", 80.0, &Monospace),
            vec!["a b", "c"]
        );
    }

    #[test]
    fn oversized_word_gets_its_own_line() {
        assert_eq!(
            wrap_lines("tiny enormousword tail", 8.0, &Monospace),
            vec!["tiny", "enormousword", "tail"]
        );
        // No spurious blank line when the first word is too wide.
        assert_eq!(wrap_lines("enormousword", 8.0, &Monospace), vec!["enormousword"]);
    }

    #[test]
    fn helvetica_wrap_respects_width_and_order() {
        let measure = Helvetica::new(12.0);
        let max_width = 612.0 - 144.0;
        let text = "The quick brown fox jumps over the lazy dog while the \
                    committee deliberates at considerable length about \
                    whether foxes, dogs, or indeed any quadrupeds should be \
                    permitted within the municipal gardens after sunset. "
            .repeat(6);

        let lines = wrap_lines(&text, max_width, &measure);
        assert!(lines.len() > 1);

        for line in &lines {
            assert!(measure.width(line) < max_width, "line too wide: {line}");
        }

        let original: Vec<&str> = text.split_whitespace().collect();
        let rejoined = lines.join(" ");
        let wrapped: Vec<&str> = rejoined.split_whitespace().collect();
        assert_eq!(original, wrapped);
    }

    #[test]
    fn forced_breaks_survive_wrapping() {
        let measure = Helvetica::new(12.0);
        let text = "alpha beta\n\ngamma";
        let lines = wrap_lines(text, 468.0, &measure);
        assert_eq!(lines, vec!["alpha beta", "", "gamma"]);
    }
}
