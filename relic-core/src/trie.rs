//! A path trie indexing literal segments, named parameters (`:name`),
//! single-segment wildcards (`*`) and tail wildcards (`**`), resolving a
//! concrete request path to a stored value.
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::path::NormalizedPath;

/// A generic value transform applied to a stored `V` at lookup time.
/// `Middleware` (a function `Handler -> Handler`) is the instantiation of
/// this used by the router.
pub type Transform<V> = Rc<dyn Fn(V) -> V>;

type NodeRef<V> = Rc<RefCell<PathNode<V>>>;

#[derive(Debug, thiserror::Error)]
pub enum TrieError {
    #[error("a value is already registered for this pattern")]
    DuplicateValue,
    #[error("conflicting parameter name at this position: expected `{existing}`, got `{new}`")]
    ConflictingParameterName { existing: String, new: String },
    #[error("conflicting children at join point")]
    ConflictingChildren,
    #[error("conflicting values at join point")]
    ConflictingValues,
    #[error("malformed pattern: {0}")]
    MalformedPattern(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Param(String),
    Wildcard,
    Tail,
}

fn parse_segment(raw: &str) -> Result<Segment, TrieError> {
    if raw == "*" {
        return Ok(Segment::Wildcard);
    }
    if raw == "**" {
        return Ok(Segment::Tail);
    }
    if raw.starts_with('*') {
        return Err(TrieError::MalformedPattern(format!(
            "stray wildcard segment `{raw}`"
        )));
    }
    if let Some(name) = raw.strip_prefix(':') {
        if name.is_empty() {
            return Err(TrieError::MalformedPattern(
                "empty parameter name (`:` alone is not a valid segment)".into(),
            ));
        }
        return Ok(Segment::Param(name.to_string()));
    }
    Ok(Segment::Literal(raw.to_string()))
}

struct PathNode<V> {
    value: Option<V>,
    literal_children: HashMap<String, NodeRef<V>>,
    param_child: Option<(String, NodeRef<V>)>,
    wildcard_child: Option<NodeRef<V>>,
    tail: Option<V>,
    transforms: Vec<Transform<V>>,
}

impl<V> Default for PathNode<V> {
    fn default() -> Self {
        Self {
            value: None,
            literal_children: HashMap::new(),
            param_child: None,
            wildcard_child: None,
            tail: None,
            transforms: Vec::new(),
        }
    }
}

fn new_node<V>() -> NodeRef<V> {
    Rc::new(RefCell::new(PathNode::default()))
}

/// The outcome of a successful [`PathTrie::lookup`].
#[derive(Debug, Clone)]
pub struct LookupResult<V> {
    pub value: V,
    pub parameters: HashMap<String, String>,
    pub matched: NormalizedPath,
    pub remaining: NormalizedPath,
}

/// A trie of [`PathNode`]s keyed by the segment pattern alphabet: literal
/// segments, `:name` parameters, `*` single-segment wildcards and a
/// trailing `**` tail wildcard.
///
/// Cloning a `PathTrie` is cheap and shares the underlying nodes (it is a
/// handle around an `Rc`), which is how [`PathTrie::attach`] and router
/// groups produce subtrees that stay mutually visible after mutation.
pub struct PathTrie<V> {
    root: NodeRef<V>,
}

impl<V> Clone for PathTrie<V> {
    fn clone(&self) -> Self {
        Self {
            root: self.root.clone(),
        }
    }
}

impl<V> Default for PathTrie<V> {
    fn default() -> Self {
        Self { root: new_node() }
    }
}

impl<V: Clone> PathTrie<V> {
    pub fn new() -> Self {
        Self::default()
    }

    fn child_literal(node: &NodeRef<V>, literal: &str) -> NodeRef<V> {
        let mut n = node.borrow_mut();
        if let Some(child) = n.literal_children.get(literal) {
            return child.clone();
        }
        let child = new_node();
        n.literal_children.insert(literal.to_string(), child.clone());
        child
    }

    fn child_param(node: &NodeRef<V>, name: &str) -> Result<NodeRef<V>, TrieError> {
        let mut n = node.borrow_mut();
        if n.wildcard_child.is_some() || n.tail.is_some() {
            return Err(TrieError::ConflictingChildren);
        }
        if let Some((existing, child)) = &n.param_child {
            return if existing == name {
                Ok(child.clone())
            } else {
                Err(TrieError::ConflictingParameterName {
                    existing: existing.clone(),
                    new: name.to_string(),
                })
            };
        }
        let child = new_node();
        n.param_child = Some((name.to_string(), child.clone()));
        Ok(child)
    }

    fn child_wildcard(node: &NodeRef<V>) -> Result<NodeRef<V>, TrieError> {
        let mut n = node.borrow_mut();
        if n.param_child.is_some() || n.tail.is_some() {
            return Err(TrieError::ConflictingChildren);
        }
        if let Some(child) = &n.wildcard_child {
            return Ok(child.clone());
        }
        let child = new_node();
        n.wildcard_child = Some(child.clone());
        Ok(child)
    }

    /// Walk (creating intermediate nodes as needed) to the node reached by
    /// `pattern`, without touching `value`/`tail`. Used by `use` and
    /// `attach`'s join-point resolution. A trailing `**` does not create a
    /// node of its own; it resolves to the node it is attached to.
    fn walk_create(&self, pattern: &str) -> Result<NodeRef<V>, TrieError> {
        let path = NormalizedPath::new(pattern);
        let segments = path.segments();
        let mut current = self.root.clone();
        let last = segments.len().saturating_sub(1);
        for (i, raw) in segments.iter().enumerate() {
            match parse_segment(raw)? {
                Segment::Literal(lit) => current = Self::child_literal(&current, &lit),
                Segment::Param(name) => current = Self::child_param(&current, &name)?,
                Segment::Wildcard => current = Self::child_wildcard(&current)?,
                Segment::Tail => {
                    if i != last {
                        return Err(TrieError::MalformedPattern(
                            "`**` must be the final segment".into(),
                        ));
                    }
                }
            }
        }
        Ok(current)
    }

    /// Insert `value` at `pattern`. Fails if `pattern` is malformed, its
    /// segments conflict with previously registered parameter names or
    /// children, or a value is already registered at the exact terminal
    /// node.
    pub fn add(&mut self, pattern: &str, value: V) -> Result<(), TrieError> {
        match self.add_inner(pattern, value) {
            Ok(()) => Ok(()),
            Err(err) => {
                tracing::warn!("route registration rejected for {pattern:?}: {err}");
                Err(err)
            }
        }
    }

    fn add_inner(&mut self, pattern: &str, value: V) -> Result<(), TrieError> {
        let path = NormalizedPath::new(pattern);
        let segments = path.segments();
        let mut current = self.root.clone();
        let last = segments.len().saturating_sub(1);
        for (i, raw) in segments.iter().enumerate() {
            match parse_segment(raw)? {
                Segment::Literal(lit) => current = Self::child_literal(&current, &lit),
                Segment::Param(name) => current = Self::child_param(&current, &name)?,
                Segment::Wildcard => current = Self::child_wildcard(&current)?,
                Segment::Tail => {
                    if i != last {
                        return Err(TrieError::MalformedPattern(
                            "`**` must be the final segment".into(),
                        ));
                    }
                    let mut node = current.borrow_mut();
                    if node.param_child.is_some() || node.wildcard_child.is_some() {
                        return Err(TrieError::ConflictingChildren);
                    }
                    if node.tail.is_some() {
                        return Err(TrieError::DuplicateValue);
                    }
                    node.tail = Some(value);
                    return Ok(());
                }
            }
        }
        let mut node = current.borrow_mut();
        if node.value.is_some() {
            return Err(TrieError::DuplicateValue);
        }
        node.value = Some(value);
        Ok(())
    }

    /// Append `transform` to the transform list of the node reached by
    /// `pattern`, creating intermediate nodes as needed. Transforms
    /// registered after a value is added still apply to later lookups,
    /// since they are collected at lookup time, not at registration time.
    pub fn use_transform(&mut self, pattern: &str, transform: Transform<V>) -> Result<(), TrieError> {
        let node = self.walk_create(pattern)?;
        node.borrow_mut().transforms.push(transform);
        Ok(())
    }

    /// Walks to (creating as needed) the node at `pattern` and runs `f` on
    /// its `value` slot. Unlike `add`, this does not enforce write-once:
    /// it is the primitive layers built on top of `PathTrie` (such as a
    /// method-aware router storing one value per HTTP method at a single
    /// node) use to implement their own, looser insertion semantics.
    pub fn with_value_mut<R>(
        &mut self,
        pattern: &str,
        f: impl FnOnce(&mut Option<V>) -> R,
    ) -> Result<R, TrieError> {
        let node = self.walk_create(pattern)?;
        let mut n = node.borrow_mut();
        Ok(f(&mut n.value))
    }

    /// Graft `other`'s root into this trie at `prefix`, so the position at
    /// `prefix` in `self` *is* `other`'s root node (the same `Rc`
    /// allocation), not a copy of its contents. Registrations made on
    /// `other` after `attach` are therefore visible through `self`, and
    /// vice versa. If a node already exists at `prefix` (e.g. from earlier
    /// registrations on `self`), its contents are merged into `other`'s
    /// root first: values, tails and parameter names that collide raise
    /// an error; literal children that collide by key merge recursively;
    /// `self`'s slot is then repointed at the (now-merged) `other`
    /// root.
    pub fn attach(&mut self, prefix: &str, other: &PathTrie<V>) -> Result<(), TrieError> {
        match self.attach_inner(prefix, other) {
            Ok(()) => {
                tracing::debug!("attached subtree at {prefix:?}");
                Ok(())
            }
            Err(err) => {
                tracing::warn!("attach at {prefix:?} rejected: {err}");
                Err(err)
            }
        }
    }

    fn attach_inner(&mut self, prefix: &str, other: &PathTrie<V>) -> Result<(), TrieError> {
        let path = NormalizedPath::new(prefix);
        let segments = path.segments();

        if segments.is_empty() {
            Self::merge_into(&other.root, &self.root)?;
            self.root = other.root.clone();
            return Ok(());
        }

        let last = segments.len() - 1;
        let mut current = self.root.clone();
        for (i, raw) in segments.iter().enumerate() {
            let segment = parse_segment(raw)?;
            if i != last {
                current = match segment {
                    Segment::Literal(lit) => Self::child_literal(&current, &lit),
                    Segment::Param(name) => Self::child_param(&current, &name)?,
                    Segment::Wildcard => Self::child_wildcard(&current)?,
                    Segment::Tail => {
                        return Err(TrieError::MalformedPattern(
                            "`**` must be the final segment".into(),
                        ))
                    }
                };
                continue;
            }

            match segment {
                Segment::Literal(lit) => {
                    let existing = current.borrow().literal_children.get(&lit).cloned();
                    if let Some(existing) = &existing {
                        if Rc::ptr_eq(existing, &other.root) {
                            return Ok(());
                        }
                        Self::merge_into(&other.root, existing)?;
                    }
                    current
                        .borrow_mut()
                        .literal_children
                        .insert(lit, other.root.clone());
                }
                Segment::Param(name) => {
                    let existing = current.borrow().param_child.clone();
                    if let Some((existing_name, existing_node)) = &existing {
                        if existing_name != &name {
                            return Err(TrieError::ConflictingParameterName {
                                existing: existing_name.clone(),
                                new: name,
                            });
                        }
                        if Rc::ptr_eq(existing_node, &other.root) {
                            return Ok(());
                        }
                        Self::merge_into(&other.root, existing_node)?;
                    } else if current.borrow().wildcard_child.is_some()
                        || current.borrow().tail.is_some()
                    {
                        return Err(TrieError::ConflictingChildren);
                    }
                    current.borrow_mut().param_child = Some((name, other.root.clone()));
                }
                Segment::Wildcard => {
                    let existing = current.borrow().wildcard_child.clone();
                    if let Some(existing) = &existing {
                        if Rc::ptr_eq(existing, &other.root) {
                            return Ok(());
                        }
                        Self::merge_into(&other.root, existing)?;
                    } else if current.borrow().param_child.is_some()
                        || current.borrow().tail.is_some()
                    {
                        return Err(TrieError::ConflictingChildren);
                    }
                    current.borrow_mut().wildcard_child = Some(other.root.clone());
                }
                Segment::Tail => {
                    return Err(TrieError::MalformedPattern(
                        "cannot attach at a `**` segment".into(),
                    ))
                }
            }
        }
        Ok(())
    }

    /// Returns a handle to the subtree rooted at the node reached by
    /// `pattern`, creating intermediate nodes as literal/parameter/wildcard
    /// segments dictate. The returned trie shares the same underlying node
    /// as `self`: mutations through either handle are visible through the
    /// other. Calling this twice with the same pattern returns two distinct
    /// handles over the identical node, which is how [`crate`] callers
    /// (e.g. router groups) get two independent handles onto one shared
    /// subtree.
    pub fn subtree(&mut self, pattern: &str) -> Result<PathTrie<V>, TrieError> {
        let root = self.walk_create(pattern)?;
        Ok(PathTrie { root })
    }

    /// Merges `incoming`'s contents into `target`, recursively. `incoming`
    /// is left untouched; `target` ends up holding the union.
    fn merge_into(target: &NodeRef<V>, incoming: &NodeRef<V>) -> Result<(), TrieError> {
        if Rc::ptr_eq(target, incoming) {
            return Ok(());
        }

        let (incoming_value, incoming_tail, incoming_param, incoming_wildcard, incoming_transforms, incoming_literals) = {
            let n = incoming.borrow();
            (
                n.value.clone(),
                n.tail.clone(),
                n.param_child.clone(),
                n.wildcard_child.clone(),
                n.transforms.clone(),
                n.literal_children
                    .iter()
                    .map(|(k, v)| (k.clone(), v.clone()))
                    .collect::<Vec<_>>(),
            )
        };

        {
            let mut t = target.borrow_mut();
            if t.value.is_some() && incoming_value.is_some() {
                return Err(TrieError::ConflictingValues);
            }
            if t.value.is_none() {
                t.value = incoming_value;
            }
            if t.tail.is_some() && incoming_tail.is_some() {
                return Err(TrieError::ConflictingValues);
            }
            if t.tail.is_none() {
                t.tail = incoming_tail;
            }
            if let (Some((existing, _)), Some((new, _))) = (&t.param_child, &incoming_param) {
                if existing != new {
                    return Err(TrieError::ConflictingParameterName {
                        existing: existing.clone(),
                        new: new.clone(),
                    });
                }
            }
            if t.param_child.is_none() {
                t.param_child = incoming_param.clone();
            }
            if t.wildcard_child.is_none() {
                t.wildcard_child = incoming_wildcard.clone();
            }
            t.transforms.extend(incoming_transforms);
        }

        if let (Some((_, tchild)), Some((_, ichild))) =
            (target.borrow().param_child.clone(), incoming_param)
        {
            if !Rc::ptr_eq(&tchild, &ichild) {
                Self::merge_into(&tchild, &ichild)?;
            }
        }
        if let (Some(tchild), Some(ichild)) =
            (target.borrow().wildcard_child.clone(), incoming_wildcard)
        {
            if !Rc::ptr_eq(&tchild, &ichild) {
                Self::merge_into(&tchild, &ichild)?;
            }
        }
        for (key, ichild) in incoming_literals {
            let existing = target.borrow().literal_children.get(&key).cloned();
            match existing {
                Some(tchild) => {
                    if !Rc::ptr_eq(&tchild, &ichild) {
                        Self::merge_into(&tchild, &ichild)?;
                    }
                }
                None => {
                    target.borrow_mut().literal_children.insert(key, ichild);
                }
            }
        }
        Ok(())
    }

    /// Resolve `path` to a stored value. Picks children at each step by
    /// literal > parameter > wildcard priority, without backtracking to
    /// sibling branches; if the walk dead-ends (no matching child) or
    /// completes at a node with no `value`, falls back to the nearest
    /// visited ancestor (including the dead-end node itself) whose `tail`
    /// is set. Transforms along the path from the matched node up to the
    /// root are applied innermost (leaf) first.
    pub fn lookup(&self, path: &NormalizedPath) -> Option<LookupResult<V>> {
        let segments = path.segments();
        let total = segments.len();

        let mut visited: Vec<NodeRef<V>> = vec![self.root.clone()];
        // Each binding remembers the `visited` depth it was captured at, so a
        // tail fallback to a shallower ancestor can drop bindings made below
        // that depth instead of leaking a parameter the matched `**` route
        // never declares.
        let mut bindings: Vec<(usize, String, String)> = Vec::new();
        let mut current = self.root.clone();
        let mut consumed = 0usize;

        while consumed < total {
            let seg = &segments[consumed];
            let next = {
                let node = current.borrow();
                if let Some(child) = node.literal_children.get(seg) {
                    Some(child.clone())
                } else if let Some((name, child)) = &node.param_child {
                    bindings.push((consumed + 1, name.clone(), seg.clone()));
                    Some(child.clone())
                } else {
                    node.wildcard_child.clone()
                }
            };
            match next {
                Some(child) => {
                    current = child;
                    consumed += 1;
                    visited.push(current.clone());
                }
                None => break,
            }
        }

        if consumed == total {
            let value = current.borrow().value.clone();
            if let Some(value) = value {
                let value = Self::apply_transforms(&visited, value);
                let parameters = bindings
                    .into_iter()
                    .map(|(_, name, val)| (name, val))
                    .collect();
                return Some(LookupResult {
                    value,
                    parameters,
                    matched: path.clone(),
                    remaining: NormalizedPath::root(),
                });
            }
        }

        // Tail fallback: search visited nodes from the dead end back to the root.
        for depth in (0..visited.len()).rev() {
            let tail_value = visited[depth].borrow().tail.clone();
            if let Some(tail_value) = tail_value {
                let value = Self::apply_transforms(&visited[..=depth], tail_value);
                let parameters = bindings
                    .iter()
                    .filter(|(bound_depth, _, _)| *bound_depth <= depth)
                    .map(|(_, name, val)| (name.clone(), val.clone()))
                    .collect();
                return Some(LookupResult {
                    value,
                    parameters,
                    matched: NormalizedPath::from_segments(segments[..depth].to_vec()),
                    remaining: NormalizedPath::from_segments(segments[depth..].to_vec()),
                });
            }
        }
        tracing::debug!("no route matched for {path}");
        None
    }

    fn apply_transforms(path_nodes: &[NodeRef<V>], value: V) -> V {
        let mut v = value;
        for node in path_nodes.iter().rev() {
            let transforms = node.borrow().transforms.clone();
            for t in transforms.iter().rev() {
                v = t(v);
            }
        }
        v
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(s: &str) -> NormalizedPath {
        NormalizedPath::new(s)
    }

    #[test]
    fn literal_roundtrip() {
        let mut trie: PathTrie<&'static str> = PathTrie::new();
        trie.add("/users/list", "h1").unwrap();
        let r = trie.lookup(&p("/users/list")).unwrap();
        assert_eq!(r.value, "h1");
        assert!(r.parameters.is_empty());
        assert!(trie.lookup(&p("/users/other")).is_none());
    }

    #[test]
    fn param_capture() {
        let mut trie: PathTrie<&'static str> = PathTrie::new();
        trie.add("/users/:id", "h1").unwrap();
        let r = trie.lookup(&p("/users/42")).unwrap();
        assert_eq!(r.value, "h1");
        assert_eq!(r.parameters.get("id"), Some(&"42".to_string()));
    }

    #[test]
    fn literal_beats_param() {
        let mut trie: PathTrie<&'static str> = PathTrie::new();
        trie.add("/users/me", "literal").unwrap();
        trie.add("/users/:id", "param").unwrap();
        let r1 = trie.lookup(&p("/users/me")).unwrap();
        assert_eq!(r1.value, "literal");
        assert!(r1.parameters.is_empty());
        let r2 = trie.lookup(&p("/users/42")).unwrap();
        assert_eq!(r2.value, "param");
        assert_eq!(r2.parameters.get("id"), Some(&"42".to_string()));
    }

    #[test]
    fn tail_wildcard_captures_suffix() {
        let mut trie: PathTrie<&'static str> = PathTrie::new();
        trie.add("/static/**", "files").unwrap();
        let r = trie.lookup(&p("/static/css/app.css")).unwrap();
        assert_eq!(r.value, "files");
        assert_eq!(r.matched.to_string(), "/static");
        assert_eq!(r.remaining.to_string(), "/css/app.css");
    }

    #[test]
    fn no_sibling_backtracking_except_tail() {
        let mut trie: PathTrie<&'static str> = PathTrie::new();
        trie.add("/a/:id/x", "param-branch").unwrap();
        trie.add("/a/**", "tail-branch").unwrap();
        // "/a/lit/y" descends into the param branch (":id" matches "lit"),
        // then dead-ends at "y" since param-branch only has child "x". It
        // must NOT retry via the wildcard/tail sibling at "/a" itself by
        // rewinding the param step, but "/a"'s own tail is still a valid
        // ancestor fallback.
        let r = trie.lookup(&p("/a/lit/y")).unwrap();
        assert_eq!(r.value, "tail-branch");
        assert_eq!(r.matched.to_string(), "/a");
        assert_eq!(r.remaining.to_string(), "/lit/y");
        // the abandoned param branch's "id" binding must not leak into a
        // route the matched "/a/**" pattern never declares.
        assert!(r.parameters.is_empty());
    }

    #[test]
    fn duplicate_value_rejected() {
        let mut trie: PathTrie<&'static str> = PathTrie::new();
        trie.add("/x", "first").unwrap();
        let err = trie.add("/x", "second").unwrap_err();
        assert!(matches!(err, TrieError::DuplicateValue));
        assert_eq!(trie.lookup(&p("/x")).unwrap().value, "first");
    }

    #[test]
    fn conflicting_parameter_name_rejected() {
        let mut trie: PathTrie<&'static str> = PathTrie::new();
        trie.add("/a/:id", "one").unwrap();
        let err = trie.add("/a/:slug", "two").unwrap_err();
        assert!(matches!(err, TrieError::ConflictingParameterName { .. }));
    }

    #[test]
    fn malformed_patterns_rejected() {
        let mut trie: PathTrie<&'static str> = PathTrie::new();
        assert!(matches!(
            trie.add("/:", "x"),
            Err(TrieError::MalformedPattern(_))
        ));
        assert!(matches!(
            trie.add("/*foo", "x"),
            Err(TrieError::MalformedPattern(_))
        ));
        assert!(matches!(
            trie.add("/**/more", "x"),
            Err(TrieError::MalformedPattern(_))
        ));
    }

    #[test]
    fn use_transform_applies_leaf_to_root() {
        let mut trie: PathTrie<Vec<&'static str>> = PathTrie::new();
        trie.add("/api/u", vec!["handler"]).unwrap();
        trie.use_transform(
            "/",
            Rc::new(|mut v: Vec<&'static str>| {
                v.push("outer");
                v
            }),
        )
        .unwrap();
        trie.use_transform(
            "/api",
            Rc::new(|mut v: Vec<&'static str>| {
                v.push("inner");
                v
            }),
        )
        .unwrap();
        let r = trie.lookup(&p("/api/u")).unwrap();
        // inner (closer to the handler) applies before outer.
        assert_eq!(r.value, vec!["handler", "inner", "outer"]);
    }

    #[test]
    fn attach_shares_subtree_for_later_mutation() {
        let mut parent: PathTrie<&'static str> = PathTrie::new();
        let mut child: PathTrie<&'static str> = PathTrie::new();
        child.add("/users", "users-handler").unwrap();
        parent.attach("/api", &child).unwrap();

        // registering on `child` after attach is visible through `parent`.
        child.add("/posts", "posts-handler").unwrap();
        let r = parent.lookup(&p("/api/posts")).unwrap();
        assert_eq!(r.value, "posts-handler");
    }

    #[test]
    fn attach_detects_conflicting_values() {
        let mut parent: PathTrie<&'static str> = PathTrie::new();
        parent.add("/api", "existing").unwrap();
        let mut child: PathTrie<&'static str> = PathTrie::new();
        child.add("/", "incoming").unwrap();
        let err = parent.attach("/api", &child).unwrap_err();
        assert!(matches!(err, TrieError::ConflictingValues));
    }

    #[test]
    fn subtree_called_twice_returns_handles_on_the_identical_node() {
        let mut trie: PathTrie<&'static str> = PathTrie::new();
        let mut first = trie.subtree("/api").unwrap();
        let mut second = trie.subtree("/api").unwrap();
        first.add("/users", "users-handler").unwrap();
        // `second` shares the same node as `first`: its registration is
        // visible without re-fetching the subtree.
        let r = second.lookup(&p("/users")).unwrap();
        assert_eq!(r.value, "users-handler");
        second.add("/posts", "posts-handler").unwrap();
        assert_eq!(
            trie.lookup(&p("/api/posts")).unwrap().value,
            "posts-handler"
        );
    }
}
