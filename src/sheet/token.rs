//! Bracket and whitespace helpers shared by the session and upgrade parsers.

/// Why a bracket could not be read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum BracketFault {
    /// Opened without closing, or closed without opening.
    Unbalanced,
    /// Balanced but somewhere a bracket is not allowed.
    Misplaced,
}

/// A bracket group split off one end of a text span.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Bracketed<'a> {
    pub content: &'a str,
    /// The remaining text, trimmed on the side facing the bracket.
    pub rest: &'a str,
    /// No whitespace between the bracket and the remaining text.
    pub glued: bool,
}

/// Split `[content] rest` off the start of `text`.
pub(crate) fn leading(text: &str) -> Result<Option<Bracketed<'_>>, BracketFault> {
    let Some(inner) = text.strip_prefix('[') else {
        return Ok(None);
    };
    let close = inner.find(']').ok_or(BracketFault::Unbalanced)?;
    let content = &inner[..close];
    if content.contains('[') {
        return Err(BracketFault::Unbalanced);
    }
    let rest = &inner[close + 1..];
    Ok(Some(Bracketed {
        content,
        rest: rest.trim_start(),
        glued: !rest.is_empty() && !rest.starts_with(char::is_whitespace),
    }))
}

/// Split `rest [content]` off the end of `text`.
pub(crate) fn trailing(text: &str) -> Result<Option<Bracketed<'_>>, BracketFault> {
    let Some(inner) = text.strip_suffix(']') else {
        return Ok(None);
    };
    let open = inner.rfind('[').ok_or(BracketFault::Unbalanced)?;
    let content = &inner[open + 1..];
    if content.contains(']') {
        return Err(BracketFault::Unbalanced);
    }
    let rest = &inner[..open];
    Ok(Some(Bracketed {
        content,
        rest: rest.trim_end(),
        glued: !rest.is_empty() && !rest.ends_with(char::is_whitespace),
    }))
}

/// Classify a bracket left in the middle of a span, if any.
pub(crate) fn stray(text: &str) -> Option<BracketFault> {
    let open = text.find('[');
    let close = text.rfind(']');
    match (open, close) {
        (None, None) => None,
        (Some(open), Some(close)) if open < close => Some(BracketFault::Misplaced),
        _ => Some(BracketFault::Unbalanced),
    }
}

/// Parse the integer inside a bracket, tolerating inner padding.
pub(crate) fn integer(content: &str) -> Option<i64> {
    content.trim().parse().ok()
}

/// Collapse whitespace runs to single spaces and trim.
pub(crate) fn collapse(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn leading_and_trailing_groups() {
        assert_eq!(
            leading("[250] success"),
            Ok(Some(Bracketed {
                content: "250",
                rest: "success",
                glued: false
            }))
        );
        assert_eq!(
            trailing("success\t[250]"),
            Ok(Some(Bracketed {
                content: "250",
                rest: "success",
                glued: false
            }))
        );
        assert_eq!(leading("success"), Ok(None));
        assert_eq!(leading("[250"), Err(BracketFault::Unbalanced));
        assert_eq!(trailing("250]"), Err(BracketFault::Unbalanced));
        assert!(trailing("success[250]").unwrap().unwrap().glued);
    }

    #[test]
    fn stray_brackets_are_classified() {
        assert_eq!(stray("plain title"), None);
        assert_eq!(stray("suc[250]cess"), Some(BracketFault::Misplaced));
        assert_eq!(stray("suc[250"), Some(BracketFault::Unbalanced));
        assert_eq!(stray("suc]250["), Some(BracketFault::Unbalanced));
    }

    #[test]
    fn collapse_normalizes_whitespace() {
        assert_eq!(collapse("  Common \t Lore  "), "Common Lore");
        assert_eq!(integer(" 42 "), Some(42));
        assert_eq!(integer(""), None);
    }
}
