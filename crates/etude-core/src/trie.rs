// Per-method segment trie.
//
// Every node stands for one segment position. Literal children are unique by
// text; a position holds at most one dynamic (`:param` or `*wildcard`) child,
// and the first one registered there owns the slot for every later pattern.
// Search tries the matching literal child first and the dynamic child after
// it, backtracking between them, so `/p/go` beats `/p/:lang` for "go"
// whichever was registered first.

use crate::segment::Segment;

#[derive(Debug, Default)]
pub(crate) struct Node {
    /// Raw template of this position, e.g. `doc`, `:lang` or `*filepath`.
    /// Empty for the root.
    part: String,
    /// Set only when a registration ends exactly here.
    pattern: Option<String>,
    children: Vec<Node>,
}

impl Node {
    fn with_part(part: &str) -> Self {
        Self {
            part: part.to_string(),
            pattern: None,
            children: Vec::new(),
        }
    }

    #[inline]
    fn segment(&self) -> Segment<'_> {
        Segment::parse(&self.part)
    }

    pub(crate) fn pattern(&self) -> Option<&str> {
        self.pattern.as_deref()
    }

    /// Child to descend into while inserting `part`.
    fn child_for_insert(&mut self, part: &str) -> Option<usize> {
        let wanted = Segment::parse(part);
        self.children.iter().position(|child| {
            child.part == part || (wanted.is_dynamic() && child.segment().is_dynamic())
        })
    }

    pub(crate) fn insert(&mut self, pattern: &str, parts: &[&str], height: usize) {
        if parts.len() == height {
            self.pattern = Some(pattern.to_string());
            return;
        }

        let part = parts[height];
        let idx = match self.child_for_insert(part) {
            Some(idx) => idx,
            None => {
                self.children.push(Node::with_part(part));
                self.children.len() - 1
            }
        };
        self.children[idx].insert(pattern, parts, height + 1);
    }

    /// First terminal node reachable for the concrete `parts`: literal
    /// children in insertion order, then the dynamic child.
    pub(crate) fn search(&self, parts: &[&str], height: usize) -> Option<&Node> {
        if parts.len() == height || self.segment().is_wildcard() {
            return self.pattern.is_some().then_some(self);
        }

        let part = parts[height];
        let literals = self
            .children
            .iter()
            .filter(|child| !child.segment().is_dynamic() && child.part == part);
        let dynamic = self
            .children
            .iter()
            .filter(|child| child.segment().is_dynamic());
        literals
            .chain(dynamic)
            .find_map(|child| child.search(parts, height + 1))
    }

    /// Every terminal pattern under this node, in insertion order.
    pub(crate) fn patterns(&self) -> Vec<&str> {
        let mut out = Vec::new();
        self.collect_patterns(&mut out);
        out
    }

    fn collect_patterns<'a>(&'a self, out: &mut Vec<&'a str>) {
        if let Some(pattern) = self.pattern.as_deref() {
            out.push(pattern);
        }
        for child in &self.children {
            child.collect_patterns(out);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::segment::split;

    fn trie(patterns: &[&str]) -> Node {
        let mut root = Node::default();
        for pattern in patterns {
            root.insert(pattern, &split(pattern), 0);
        }
        root
    }

    fn lookup<'a>(root: &'a Node, path: &str) -> Option<&'a str> {
        root.search(&split(path), 0).and_then(Node::pattern)
    }

    #[test]
    fn test_prefixes_are_shared() {
        let root = trie(&["/p/:lang/doc", "/p/:lang/intro"]);
        assert_eq!(root.children.len(), 1);
        assert_eq!(root.children[0].children.len(), 1);
        assert_eq!(root.children[0].children[0].children.len(), 2);
    }

    #[test]
    fn test_only_terminal_nodes_carry_pattern() {
        let root = trie(&["/a/b/c"]);
        assert_eq!(lookup(&root, "/a/b/c"), Some("/a/b/c"));
        assert_eq!(lookup(&root, "/a/b"), None);
        assert_eq!(lookup(&root, "/a"), None);
    }

    #[test]
    fn test_root_pattern() {
        let root = trie(&["/"]);
        assert_eq!(lookup(&root, "/"), Some("/"));
        assert_eq!(lookup(&root, "//"), Some("/"));
        assert_eq!(lookup(&root, "/x"), None);
    }

    #[test]
    fn test_backtracks_from_dead_param_branch_to_literal() {
        // `:lang` comes first but has no terminal for a two-segment path.
        let root = trie(&["/p/:lang/doc", "/p/go"]);
        assert_eq!(lookup(&root, "/p/go"), Some("/p/go"));
        assert_eq!(lookup(&root, "/p/go/doc"), Some("/p/:lang/doc"));
    }

    #[test]
    fn test_wildcard_matches_remaining_depth() {
        let root = trie(&["/assets/*filepath"]);
        assert_eq!(lookup(&root, "/assets/a"), Some("/assets/*filepath"));
        assert_eq!(lookup(&root, "/assets/css/a.css"), Some("/assets/*filepath"));
        assert_eq!(lookup(&root, "/assets"), None);
    }

    #[test]
    fn test_single_dynamic_slot_per_position() {
        let root = trie(&["/a/:x/b", "/a/:y/c", "/a/*rest"]);
        assert_eq!(root.children[0].children.len(), 1);
        assert_eq!(root.children[0].children[0].part, ":x");
    }

    #[test]
    fn test_literal_tried_before_earlier_param() {
        let root = trie(&["/p/:lang", "/p/go"]);
        assert_eq!(lookup(&root, "/p/go"), Some("/p/go"));
        assert_eq!(lookup(&root, "/p/rust"), Some("/p/:lang"));
    }

    #[test]
    fn test_dead_literal_branch_falls_back_to_param() {
        let root = trie(&["/p/:lang/doc", "/p/go/intro"]);
        assert_eq!(lookup(&root, "/p/go/doc"), Some("/p/:lang/doc"));
        assert_eq!(lookup(&root, "/p/go/intro"), Some("/p/go/intro"));
    }

    #[test]
    fn test_literal_does_not_reuse_dynamic_slot() {
        let root = trie(&["/p/:lang", "/p/go"]);
        assert_eq!(root.children[0].children.len(), 2);
        assert_eq!(root.patterns(), vec!["/p/:lang", "/p/go"]);
    }
}
