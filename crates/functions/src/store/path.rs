//! Slash-separated document and collection paths.
//!
//! Paths alternate collection and document segments, e.g.
//! `stores/S1/orders/O1/items/I1`. Segments are never empty and never
//! contain `/`, so a path built from caller input cannot escape its parent.

use std::fmt;

use super::StoreError;

/// Path to a collection (odd number of segments).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CollectionPath(String);

/// Path to a single document (even number of segments).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DocPath {
    parent: CollectionPath,
    id: String,
}

fn check_segment(segment: &str) -> Result<(), StoreError> {
    if segment.is_empty() || segment.contains('/') {
        return Err(StoreError::InvalidPath(format!(
            "invalid path segment {segment:?}"
        )));
    }
    Ok(())
}

impl CollectionPath {
    /// A top-level collection such as `stores` or `users`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::InvalidPath`] if `name` is empty or contains `/`.
    pub fn root(name: &str) -> Result<Self, StoreError> {
        check_segment(name)?;
        Ok(Self(name.to_owned()))
    }

    /// The document `id` inside this collection.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::InvalidPath`] if `id` is empty or contains `/`.
    pub fn doc(&self, id: &str) -> Result<DocPath, StoreError> {
        check_segment(id)?;
        Ok(DocPath {
            parent: self.clone(),
            id: id.to_owned(),
        })
    }

    /// Full path as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl DocPath {
    /// A sub-collection of this document.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::InvalidPath`] if `name` is empty or contains `/`.
    pub fn collection(&self, name: &str) -> Result<CollectionPath, StoreError> {
        check_segment(name)?;
        Ok(CollectionPath(format!("{self}/{name}")))
    }

    /// The collection containing this document.
    #[must_use]
    pub const fn parent(&self) -> &CollectionPath {
        &self.parent
    }

    /// The document's own identifier (last segment).
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }
}

impl fmt::Display for CollectionPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Display for DocPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.parent, self.id)
    }
}
