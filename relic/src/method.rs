//! `MethodMap<V>`: the per-node value a [`crate::router::Router`] stores in
//! its trie: one `V` per HTTP method, plus the `ANY` sentinel.
use std::collections::HashMap;

use http::Method;

/// The canonical method enumeration substituted for `ANY` when reporting
/// an allowed-methods set (`Allow` header, `Router::methods`).
pub const ALL_METHODS: [Method; 9] = [
    Method::GET,
    Method::HEAD,
    Method::POST,
    Method::PUT,
    Method::DELETE,
    Method::CONNECT,
    Method::OPTIONS,
    Method::TRACE,
    Method::PATCH,
];

#[derive(Debug, thiserror::Error)]
pub enum MethodMapError {
    #[error("method `{0}` is already registered at this path")]
    MethodAlreadyRegistered(Method),
    #[error("`ANY` is already registered at this path")]
    AnyAlreadyRegistered,
    #[error("path already has specific method registrations; cannot also register `ANY`")]
    AnyConflictsWithSpecificMethods,
    #[error("path already has an `ANY` registration; cannot also register method `{0}`")]
    SpecificConflictsWithAny(Method),
}

#[derive(Clone, PartialEq, Eq, Hash)]
enum MethodKey {
    Specific(Method),
    Any,
}

/// Per-path method table. `ANY` is exclusive with every specific method:
/// a path registers either a fixed set of methods, or `ANY`, never both.
pub struct MethodMap<V> {
    entries: HashMap<MethodKey, V>,
}

impl<V> Default for MethodMap<V> {
    fn default() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }
}

impl<V> Clone for MethodMap<V>
where
    V: Clone,
{
    fn clone(&self) -> Self {
        Self {
            entries: self.entries.clone(),
        }
    }
}

impl<V> MethodMap<V> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, method: Method, value: V) -> Result<(), MethodMapError> {
        if self.entries.contains_key(&MethodKey::Any) {
            return Err(MethodMapError::SpecificConflictsWithAny(method));
        }
        if self.entries.contains_key(&MethodKey::Specific(method.clone())) {
            return Err(MethodMapError::MethodAlreadyRegistered(method));
        }
        self.entries.insert(MethodKey::Specific(method), value);
        Ok(())
    }

    pub fn insert_any(&mut self, value: V) -> Result<(), MethodMapError> {
        if self
            .entries
            .keys()
            .any(|k| matches!(k, MethodKey::Specific(_)))
        {
            return Err(MethodMapError::AnyConflictsWithSpecificMethods);
        }
        if self.entries.contains_key(&MethodKey::Any) {
            return Err(MethodMapError::AnyAlreadyRegistered);
        }
        self.entries.insert(MethodKey::Any, value);
        Ok(())
    }

    pub fn get(&self, method: &Method) -> Option<&V> {
        self.entries
            .get(&MethodKey::Specific(method.clone()))
            .or_else(|| self.entries.get(&MethodKey::Any))
    }

    /// The methods this map answers for, with `ANY` expanded to
    /// [`ALL_METHODS`] (spec.md §4.4: "substituting the concrete
    /// enumeration when `ANY` is present").
    pub fn allowed_methods(&self) -> Vec<Method> {
        if self.entries.contains_key(&MethodKey::Any) {
            ALL_METHODS.to_vec()
        } else {
            self.entries
                .keys()
                .filter_map(|k| match k {
                    MethodKey::Specific(m) => Some(m.clone()),
                    MethodKey::Any => None,
                })
                .collect()
        }
    }

    /// Applies `f` to every stored value, preserving keys. Used to lift a
    /// `Handler -> Handler` middleware into a transform over the whole map.
    pub fn map_values(self, f: impl Fn(V) -> V) -> MethodMap<V> {
        MethodMap {
            entries: self
                .entries
                .into_iter()
                .map(|(k, v)| (k, f(v)))
                .collect(),
        }
    }
}
