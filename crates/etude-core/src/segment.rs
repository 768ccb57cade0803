//! Path segmentation shared by route patterns and concrete request paths.
//!
//! A pattern such as `/user/:id` or `/assets/*filepath` and a request path
//! such as `/user/42` are both split by [`split`]. Empty segments are dropped,
//! so leading, trailing and duplicate slashes carry no meaning, and nothing
//! after the first `*` segment is kept.

/// One slash-delimited token of a pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Segment<'a> {
    /// Matches a concrete segment with identical text.
    Literal(&'a str),
    /// `:name`, matches exactly one concrete segment.
    Param(&'a str),
    /// `*name`, matches every remaining concrete segment.
    Wildcard(&'a str),
}

impl<'a> Segment<'a> {
    /// Classify a raw token by its leading character.
    pub fn parse(raw: &'a str) -> Self {
        if let Some(name) = raw.strip_prefix(':') {
            Segment::Param(name)
        } else if let Some(name) = raw.strip_prefix('*') {
            Segment::Wildcard(name)
        } else {
            Segment::Literal(raw)
        }
    }

    /// `true` for param and wildcard segments.
    #[inline]
    pub fn is_dynamic(&self) -> bool {
        !matches!(self, Segment::Literal(_))
    }

    #[inline]
    pub fn is_wildcard(&self) -> bool {
        matches!(self, Segment::Wildcard(_))
    }
}

/// Split a pattern or a path into its segments.
///
/// ```
/// use etude_core::segment::split;
///
/// assert_eq!(split("//p/:lang//doc/"), vec!["p", ":lang", "doc"]);
/// assert_eq!(split("/assets/*filepath/ignored"), vec!["assets", "*filepath"]);
/// ```
pub fn split(path: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    for item in path.split('/').filter(|s| !s.is_empty()) {
        parts.push(item);
        if item.starts_with('*') {
            break;
        }
    }
    parts
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_discards_empty_segments() {
        assert!(split("/").is_empty());
        assert!(split("").is_empty());
        assert_eq!(split("/a//b/"), vec!["a", "b"]);
        assert_eq!(split("a/b"), vec!["a", "b"]);
    }

    #[test]
    fn test_split_stops_after_first_wildcard() {
        assert_eq!(split("/static/*path/x/*y"), vec!["static", "*path"]);
        assert_eq!(split("/*"), vec!["*"]);
    }

    #[test]
    fn test_concrete_path_with_star_is_truncated_too() {
        // Concrete paths go through the same algorithm.
        assert_eq!(split("/files/*weird/name"), vec!["files", "*weird"]);
    }

    #[test]
    fn test_segment_parse() {
        assert_eq!(Segment::parse("user"), Segment::Literal("user"));
        assert_eq!(Segment::parse(":id"), Segment::Param("id"));
        assert_eq!(Segment::parse("*filepath"), Segment::Wildcard("filepath"));
        assert!(Segment::parse(":id").is_dynamic());
        assert!(Segment::parse("*").is_wildcard());
        assert!(!Segment::parse("doc").is_dynamic());
    }
}
