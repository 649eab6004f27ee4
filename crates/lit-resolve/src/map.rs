//! Insertion-ordered map with duplicate-definition tracking.
//!
//! Backs every scope and class-member table in the resolver: `IndexMap`
//! gives deterministic iteration order (classes copy their fields/methods
//! from their superclass in declaration order) and [`DeclMap::declare`]
//! turns a duplicate key into a [`ResolveError::Redeclaration`] carrying
//! both source positions instead of silently overwriting.

use std::hash::Hash;

use indexmap::{Equivalent, IndexMap};

use crate::error::ResolveError;

/// Trait for values that can report the span where they were declared.
pub trait Spanned {
    fn span(&self) -> crate::nom_tools::Span<'_>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeclMap<K: Hash + Eq, V> {
    map: IndexMap<K, V>,
}

impl<K: Hash + Eq, V> Default for DeclMap<K, V> {
    fn default() -> Self {
        Self { map: IndexMap::new() }
    }
}

impl<K, V> DeclMap<K, V>
where
    K: Hash + Eq + Clone,
{
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts without checking for a previous definition, returning the
    /// old value if any. Used for the shallow-copy-from-super step, where
    /// overwriting is the whole point.
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        self.map.insert(key, value)
    }

    /// Inserts, erroring if `key` is already present.
    pub fn declare(&mut self, key: K, value: V) -> Result<(), ResolveError>
    where
        V: Spanned,
        K: std::fmt::Display,
    {
        if let Some(existing) = self.map.get(&key) {
            let old = existing.span();
            let new = value.span();
            return Err(ResolveError::redeclaration(key.to_string(), old.clone(), new));
        }
        self.map.insert(key, value);
        Ok(())
    }

    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        Q: ?Sized + Hash + Equivalent<K>,
    {
        self.map.get(key)
    }

    pub fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        Q: ?Sized + Hash + Equivalent<K>,
    {
        self.map.get_mut(key)
    }

    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        Q: ?Sized + Hash + Equivalent<K>,
    {
        self.map.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.map.keys()
    }

    pub fn values(&self) -> impl Iterator<Item = &V> {
        self.map.values()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&K, &V)> {
        self.map.iter()
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

impl<K, V> IntoIterator for DeclMap<K, V>
where
    K: Hash + Eq,
{
    type Item = (K, V);
    type IntoIter = indexmap::map::IntoIter<K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.map.into_iter()
    }
}

impl<K, V> FromIterator<(K, V)> for DeclMap<K, V>
where
    K: Hash + Eq,
{
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Self {
            map: IndexMap::from_iter(iter),
        }
    }
}
