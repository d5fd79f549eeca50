//! Front matter splitting
//!
//! Section files open with a YAML block fenced by `---` lines, followed by the body.

use serde::de::DeserializeOwned;

use super::error::CatalogError;

const FENCE: &str = "---";

/// Split a document into its front matter and body
///
/// Returns `None` when the document does not open with a fence or the block is never
/// closed.
pub fn split(document: &str) -> Option<(&str, &str)> {
    let document = document.strip_prefix('\u{feff}').unwrap_or(document);
    let rest = strip_fence_line(document)?;

    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        if line.trim_end() == FENCE {
            let front = &rest[..offset];
            let body = &rest[offset + line.len()..];
            return Some((front, body));
        }
        offset += line.len();
    }

    None
}

/// Parse the front matter of `document` into `T` and return it with the body
pub fn parse<T: DeserializeOwned>(document: &str) -> Result<(T, &str), CatalogError> {
    let (front, body) = split(document).ok_or(CatalogError::MissingFrontMatter)?;
    let meta = serde_yaml::from_str(front)?;
    Ok((meta, body))
}

fn strip_fence_line(document: &str) -> Option<&str> {
    let (first, rest) = match document.find('\n') {
        Some(pos) => (&document[..pos], &document[pos + 1..]),
        None => (document, ""),
    };
    (first.trim_end() == FENCE).then_some(rest)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde::Deserialize;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Meta {
        title: String,
    }

    #[test]
    fn splits_front_matter_from_body() {
        let doc = "---\ntitle: Passage 1\n---\n# Heading\n\nBody text.\n";
        let (front, body) = split(doc).unwrap();
        assert_eq!(front, "title: Passage 1\n");
        assert_eq!(body, "# Heading\n\nBody text.\n");
    }

    #[test]
    fn handles_crlf_and_bom() {
        let doc = "\u{feff}---\r\ntitle: X\r\n---\r\nbody";
        let (front, body) = split(doc).unwrap();
        assert_eq!(front, "title: X\r\n");
        assert_eq!(body, "body");
    }

    #[test]
    fn closing_fence_at_end_of_file() {
        let (front, body) = split("---\ntitle: X\n---").unwrap();
        assert_eq!(front, "title: X\n");
        assert_eq!(body, "");
    }

    #[test]
    fn no_opening_fence() {
        assert!(split("# Just markdown\n---\n").is_none());
    }

    #[test]
    fn unterminated_block() {
        assert!(split("---\ntitle: X\nbody").is_none());
    }

    #[test]
    fn horizontal_rule_in_body_is_kept() {
        let (_, body) = split("---\ntitle: X\n---\nabove\n---\nbelow\n").unwrap();
        assert_eq!(body, "above\n---\nbelow\n");
    }

    #[test]
    fn parse_reports_missing_front_matter() {
        let err = parse::<Meta>("plain").unwrap_err();
        assert!(matches!(err, CatalogError::MissingFrontMatter));
    }

    #[test]
    fn parse_reports_bad_yaml() {
        let err = parse::<Meta>("---\ntitle: [unclosed\n---\n").unwrap_err();
        assert!(matches!(err, CatalogError::FrontMatter(_)));
    }

    #[test]
    fn parse_returns_meta_and_body() {
        let (meta, body) = parse::<Meta>("---\ntitle: Hello\n---\nworld").unwrap();
        assert_eq!(meta, Meta { title: "Hello".into() });
        assert_eq!(body, "world");
    }
}
