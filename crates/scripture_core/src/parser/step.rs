//! STEP Bible plain-text chapter parsing.

use crate::model::content::ParsedVerse;
use crate::parser::clean_verse_text;
use once_cell::sync::Lazy;
use regex::Regex;

static NUMBERED_LINE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d+)\s*(.*)$").expect("valid step verse regex"));
static TAG_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]*>").expect("valid html tag regex"));

/// Parses lines of the form `N verse text`; other lines are ignored.
pub fn parse_step_text(text: &str) -> Vec<ParsedVerse> {
    text.lines()
        .filter_map(|line| {
            let line = TAG_RE.replace_all(line.trim(), " ");
            let captures = NUMBERED_LINE_RE.captures(line.trim())?;
            let text = clean_verse_text(&captures[2])?;
            Some(ParsedVerse::new(captures[1].to_string(), text))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::parse_step_text;

    #[test]
    fn numbered_lines_become_verses() {
        let text = "Genesis 1\n1 In the <b>beginning</b>\n\n2And the earth\n3 \n";
        let verses = parse_step_text(text);
        assert_eq!(verses.len(), 2);
        assert_eq!(verses[0].number, "1");
        assert_eq!(verses[0].text, "In the beginning");
        assert_eq!(verses[1].number, "2");
        assert_eq!(verses[1].text, "And the earth");
    }
}
