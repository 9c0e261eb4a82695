//! Minimal selector matching for the memory host.
//!
//! Supports the subset the controllers actually bind with: `tag`, `#id`,
//! `.class`, `[attr]`, `[attr=value]` (value optionally quoted), compounds
//! of those (`img.hero[data-src]`), and comma-separated lists. Combinators
//! are not supported; a selector containing whitespace is ignored.

use std::iter::Peekable;
use std::str::Chars;

use ahash::AHashMap;

#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct SimpleSelector {
    tag: Option<String>,
    id: Option<String>,
    classes: Vec<String>,
    attrs: Vec<(String, Option<String>)>,
}

/// Parse a comma-separated selector list, dropping unsupported entries.
pub(crate) fn parse_list(input: &str) -> Vec<SimpleSelector> {
    input
        .split(',')
        .filter_map(|part| parse_one(part.trim()))
        .collect()
}

fn parse_one(input: &str) -> Option<SimpleSelector> {
    if input.is_empty() {
        return None;
    }
    let mut sel = SimpleSelector::default();
    let mut chars = input.chars().peekable();

    let tag = take_name(&mut chars);
    if !tag.is_empty() {
        sel.tag = Some(tag);
    }

    while let Some(c) = chars.next() {
        match c {
            '#' => {
                let name = take_name(&mut chars);
                if name.is_empty() {
                    return None;
                }
                sel.id = Some(name);
            }
            '.' => {
                let name = take_name(&mut chars);
                if name.is_empty() {
                    return None;
                }
                sel.classes.push(name);
            }
            '[' => {
                let mut body = String::new();
                let mut closed = false;
                for inner in chars.by_ref() {
                    if inner == ']' {
                        closed = true;
                        break;
                    }
                    body.push(inner);
                }
                if !closed {
                    return None;
                }
                let (name, value) = match body.split_once('=') {
                    Some((n, v)) => (
                        n.trim().to_string(),
                        Some(v.trim().trim_matches(['"', '\'']).to_string()),
                    ),
                    None => (body.trim().to_string(), None),
                };
                if name.is_empty() {
                    return None;
                }
                sel.attrs.push((name, value));
            }
            _ => return None,
        }
    }

    if sel.tag.is_none() && sel.id.is_none() && sel.classes.is_empty() && sel.attrs.is_empty() {
        return None;
    }
    Some(sel)
}

fn take_name(chars: &mut Peekable<Chars<'_>>) -> String {
    let mut name = String::new();
    while let Some(&c) = chars.peek() {
        if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
            name.push(c);
            chars.next();
        } else {
            break;
        }
    }
    name
}

impl SimpleSelector {
    pub(crate) fn matches(
        &self,
        tag: &str,
        classes: &[String],
        attrs: &AHashMap<String, String>,
    ) -> bool {
        if let Some(want) = &self.tag
            && want != tag
        {
            return false;
        }
        if let Some(want) = &self.id
            && attrs.get("id") != Some(want)
        {
            return false;
        }
        if !self.classes.iter().all(|c| classes.contains(c)) {
            return false;
        }
        self.attrs.iter().all(|(name, value)| match value {
            Some(v) => attrs.get(name) == Some(v),
            None => attrs.contains_key(name),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn attrs(pairs: &[(&str, &str)]) -> AHashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn tag_selector() {
        let sels = parse_list("button");
        assert_eq!(sels.len(), 1);
        assert!(sels[0].matches("button", &[], &attrs(&[])));
        assert!(!sels[0].matches("a", &[], &attrs(&[])));
    }

    #[test]
    fn id_selector() {
        let sels = parse_list("#about");
        assert!(sels[0].matches("section", &[], &attrs(&[("id", "about")])));
        assert!(!sels[0].matches("section", &[], &attrs(&[("id", "contact")])));
        assert!(!sels[0].matches("section", &[], &attrs(&[])));
    }

    #[test]
    fn class_selector_and_compound() {
        let sels = parse_list("img.hero");
        let classes = vec!["hero".to_string(), "wide".to_string()];
        assert!(sels[0].matches("img", &classes, &attrs(&[])));
        assert!(!sels[0].matches("div", &classes, &attrs(&[])));
        assert!(!sels[0].matches("img", &[], &attrs(&[])));
    }

    #[test]
    fn attr_presence_and_value() {
        let present = parse_list("[data-src]");
        assert!(present[0].matches("img", &[], &attrs(&[("data-src", "/a.jpg")])));
        assert!(!present[0].matches("img", &[], &attrs(&[])));

        let exact = parse_list("[type=\"submit\"]");
        assert!(exact[0].matches("button", &[], &attrs(&[("type", "submit")])));
        assert!(!exact[0].matches("button", &[], &attrs(&[("type", "button")])));
    }

    #[test]
    fn comma_list_matches_any() {
        let sels = parse_list("a, button");
        assert!(sels.iter().any(|s| s.matches("a", &[], &attrs(&[]))));
        assert!(sels.iter().any(|s| s.matches("button", &[], &attrs(&[]))));
        assert!(!sels.iter().any(|s| s.matches("div", &[], &attrs(&[]))));
    }

    #[test]
    fn unsupported_combinators_are_dropped() {
        assert!(parse_list("nav a").is_empty());
        assert!(parse_list("").is_empty());
        assert!(parse_list(">").is_empty());
    }

    #[test]
    fn unterminated_attr_is_dropped() {
        assert!(parse_list("[data-src").is_empty());
    }
}
