//! Section body outline
//!
//! Section bodies are Markdown with embedded MDX components. The outline gives the
//! view layer headings and a reading-time estimate without rendering anything.

use once_cell::sync::Lazy;
use pulldown_cmark::{Event, HeadingLevel, Options, Parser, Tag, TagEnd};
use regex::Regex;
use serde::Serialize;

/// Self-closing or paired MDX component tags, e.g. `<AudioPlayer src="x" />`
static COMPONENT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"</?[A-Z][A-Za-z0-9]*\b[^>]*>").unwrap());

/// Words per minute used for reading-time estimates
const WORDS_PER_MINUTE: usize = 200;

/// A heading found in a section body
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Heading {
    pub level: u8,
    pub text: String,
}

/// Summary of a section body
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Outline {
    pub headings: Vec<Heading>,
    pub word_count: usize,
    pub reading_minutes: u32,
}

/// Remove MDX component tags, keeping any text they wrap
pub fn strip_components(body: &str) -> String {
    COMPONENT_RE.replace_all(body, "").into_owned()
}

/// Build an outline of a section body
pub fn outline(body: &str) -> Outline {
    let cleaned = strip_components(body);
    let options = Options::ENABLE_TABLES | Options::ENABLE_STRIKETHROUGH;
    let parser = Parser::new_ext(&cleaned, options);

    let mut headings = Vec::new();
    let mut word_count = 0;
    let mut current_heading: Option<(u8, String)> = None;

    for event in parser {
        match event {
            Event::Start(Tag::Heading { level, .. }) => {
                current_heading = Some((heading_level_to_u8(level), String::new()));
            }
            Event::End(TagEnd::Heading(_)) => {
                if let Some((level, text)) = current_heading.take() {
                    let text = text.trim().to_string();
                    if !text.is_empty() {
                        headings.push(Heading { level, text });
                    }
                }
            }
            Event::Text(text) | Event::Code(text) => {
                word_count += text.split_whitespace().count();
                if let Some((_, heading)) = current_heading.as_mut() {
                    heading.push_str(&text);
                }
            }
            Event::SoftBreak | Event::HardBreak => {
                if let Some((_, heading)) = current_heading.as_mut() {
                    heading.push(' ');
                }
            }
            _ => {}
        }
    }

    let reading_minutes = word_count.div_ceil(WORDS_PER_MINUTE).max(1) as u32;
    Outline { headings, word_count, reading_minutes }
}

fn heading_level_to_u8(level: HeadingLevel) -> u8 {
    match level {
        HeadingLevel::H1 => 1,
        HeadingLevel::H2 => 2,
        HeadingLevel::H3 => 3,
        HeadingLevel::H4 => 4,
        HeadingLevel::H5 => 5,
        HeadingLevel::H6 => 6,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collects_headings_in_order() {
        let out = outline("# Passage A\n\nText.\n\n## Questions 1-5\n\nMore text.");
        assert_eq!(
            out.headings,
            vec![
                Heading { level: 1, text: "Passage A".into() },
                Heading { level: 2, text: "Questions 1-5".into() },
            ]
        );
    }

    #[test]
    fn counts_words_including_inline_code() {
        let out = outline("One two `three` four.");
        assert_eq!(out.word_count, 4);
    }

    #[test]
    fn reading_time_is_at_least_one_minute() {
        assert_eq!(outline("").reading_minutes, 1);
        let long = "word ".repeat(450);
        assert_eq!(outline(&long).reading_minutes, 3);
    }

    #[test]
    fn strips_mdx_components() {
        let body =
            "<AudioPlayer src=\"/audio/s1.mp3\" />\n\n<Callout type=\"tip\">Keep going</Callout>";
        let cleaned = strip_components(body);
        assert!(!cleaned.contains("AudioPlayer"));
        assert!(!cleaned.contains("Callout"));
        assert!(cleaned.contains("Keep going"));
    }

    #[test]
    fn lowercase_html_is_left_alone() {
        let cleaned = strip_components("a <em>b</em> c");
        assert_eq!(cleaned, "a <em>b</em> c");
    }
}
