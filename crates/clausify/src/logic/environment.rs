//! Persistent key/value bindings
//!
//! An [`Environment`] is an immutable singly linked chain of bindings. Adding a
//! binding returns a new environment that shares the old chain as its tail, so
//! snapshots are cheap to keep and roll back to. Newer bindings shadow older
//! ones for the same key.
//!
//! The same type serves as the renaming scope during quantifier elimination
//! and as the substitution built by unification.

use std::fmt;
use std::sync::Arc;

use super::term::Term;

/// A substitution from terms (in practice, variables) to terms
pub type Substitution = Environment<Term, Term>;

#[derive(PartialEq)]
struct Binding<K, V> {
    key: K,
    value: V,
    next: Option<Arc<Binding<K, V>>>,
}

/// Immutable, structurally shared association list
#[derive(PartialEq)]
pub struct Environment<K, V> {
    head: Option<Arc<Binding<K, V>>>,
    len: usize,
}

impl<K, V> Environment<K, V> {
    /// The empty environment
    pub fn new() -> Self {
        Environment { head: None, len: 0 }
    }

    /// Number of bindings in the chain, shadowed ones included
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.head.is_none()
    }

    /// A new environment with `key` bound to `value` in front of this one
    pub fn add(&self, key: K, value: V) -> Self {
        Environment {
            head: Some(Arc::new(Binding {
                key,
                value,
                next: self.head.clone(),
            })),
            len: self.len + 1,
        }
    }

    /// Walk the chain from the newest binding to the oldest
    fn chain(&self) -> ChainIter<'_, K, V> {
        ChainIter {
            next: self.head.as_deref(),
        }
    }

    /// Bindings in the order they were added, oldest first
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = (&K, &V)> {
        let mut bindings: Vec<_> = self.chain().collect();
        bindings.reverse();
        bindings.into_iter()
    }

    /// Keys in binding order
    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.iter().map(|(k, _)| k)
    }

    /// Values in binding order
    pub fn values(&self) -> impl Iterator<Item = &V> {
        self.iter().map(|(_, v)| v)
    }
}

impl<K: PartialEq, V> Environment<K, V> {
    /// The newest binding for `key`
    pub fn get(&self, key: &K) -> Option<&V> {
        self.chain().find(|(k, _)| *k == key).map(|(_, v)| v)
    }

    pub fn contains(&self, key: &K) -> bool {
        self.get(key).is_some()
    }
}

impl<K: PartialEq + Clone, V: Clone> Environment<K, V> {
    /// A new environment without any binding for `key`.
    ///
    /// Only the prefix up to the oldest binding for `key` is copied; the tail
    /// behind it is shared.
    pub fn remove(&self, key: &K) -> Self {
        let mut prefix = Vec::new();
        let mut shared = self.head.clone();
        let mut pending = Vec::new();
        let mut cursor = self.head.as_deref();

        while let Some(binding) = cursor {
            if binding.key == *key {
                prefix.append(&mut pending);
                shared = binding.next.clone();
            } else {
                pending.push(binding);
            }
            cursor = binding.next.as_deref();
        }
        if shared.as_ref().map(Arc::as_ptr) == self.head.as_ref().map(Arc::as_ptr) {
            return self.clone();
        }

        let mut result = Environment {
            len: shared_len(&shared),
            head: shared,
        };
        for binding in prefix.into_iter().rev() {
            result = result.add(binding.key.clone(), binding.value.clone());
        }
        result
    }
}

fn shared_len<K, V>(head: &Option<Arc<Binding<K, V>>>) -> usize {
    ChainIter {
        next: head.as_deref(),
    }
    .count()
}

struct ChainIter<'a, K, V> {
    next: Option<&'a Binding<K, V>>,
}

impl<'a, K, V> Iterator for ChainIter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let binding = self.next?;
        self.next = binding.next.as_deref();
        Some((&binding.key, &binding.value))
    }
}

impl<K, V> Clone for Environment<K, V> {
    fn clone(&self) -> Self {
        Environment {
            head: self.head.clone(),
            len: self.len,
        }
    }
}

impl<K, V> Default for Environment<K, V> {
    fn default() -> Self {
        Environment::new()
    }
}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for Environment<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<K, V> Drop for Environment<K, V> {
    // Unlink iteratively so long chains do not overflow the stack
    fn drop(&mut self) {
        let mut next = self.head.take();
        while let Some(binding) = next {
            match Arc::try_unwrap(binding) {
                Ok(mut owned) => next = owned.next.take(),
                Err(_) => break,
            }
        }
    }
}

impl<K, V> FromIterator<(K, V)> for Environment<K, V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        iter.into_iter()
            .fold(Environment::new(), |env, (k, v)| env.add(k, v))
    }
}
