//! Ordered child lists.

use std::fmt;

/// Ordered, insertion-order-preserving list of child nodes.
///
/// Used for parameter lists, field and method lists, statement sequences,
/// for-loop assignment lists and call arguments. Dumps as the
/// comma-joined rendering of its children, or `None` when empty.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StmtList<T> {
    items: Vec<T>,
}

impl<T> StmtList<T> {
    pub fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Append a child (left-recursive grammar rules).
    pub fn push_back(&mut self, item: T) {
        self.items.push(item);
    }

    /// Prepend a child (right-recursive grammar rules).
    pub fn push_front(&mut self, item: T) {
        self.items.insert(0, item);
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    pub fn as_slice(&self) -> &[T] {
        &self.items
    }
}

impl<T> Default for StmtList<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> From<Vec<T>> for StmtList<T> {
    fn from(items: Vec<T>) -> Self {
        Self { items }
    }
}

impl<T> FromIterator<T> for StmtList<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self {
            items: iter.into_iter().collect(),
        }
    }
}

impl<'a, T> IntoIterator for &'a StmtList<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

impl<T> IntoIterator for StmtList<T> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl<T: fmt::Display> fmt::Display for StmtList<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.items.is_empty() {
            return f.write_str("None");
        }
        for (i, item) in self.items.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "{item}")?;
        }
        Ok(())
    }
}
