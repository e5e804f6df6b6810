//! Per-statement alias registry.

use std::collections::BTreeMap;
use std::sync::Arc;

use tracing::debug;

use super::EntityDef;
use crate::error::{Error, Result};

/// Upper bound on numeric-suffix attempts once every name prefix is taken.
pub const MAX_SUFFIX_ATTEMPTS: usize = 100;

/// Maps aliases to the entity templates they are bound to.
///
/// At most one entity is bound to an alias. The map holds shared references
/// to templates; the owning clause keeps the [`EntityRef`](super::EntityRef).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AliasMap {
    bindings: BTreeMap<String, Arc<EntityDef>>,
}

impl AliasMap {
    /// Creates an empty map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds `alias` to `entity`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DuplicateAlias`] if the alias is already bound. The map
    /// is left unchanged.
    pub fn put(&mut self, alias: impl Into<String>, entity: Arc<EntityDef>) -> Result<()> {
        let alias = alias.into();
        if self.bindings.contains_key(&alias) {
            return Err(Error::DuplicateAlias { alias });
        }
        self.bindings.insert(alias, entity);
        Ok(())
    }

    /// Unbinds `alias`, returning the entity it was bound to.
    pub fn remove(&mut self, alias: &str) -> Option<Arc<EntityDef>> {
        self.bindings.remove(alias)
    }

    /// Returns true if `alias` is bound.
    #[must_use]
    pub fn contains(&self, alias: &str) -> bool {
        self.bindings.contains_key(alias)
    }

    /// Returns the entity bound to `alias`.
    #[must_use]
    pub fn entity(&self, alias: &str) -> Option<&Arc<EntityDef>> {
        self.bindings.get(alias)
    }

    /// Number of live bindings.
    #[must_use]
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    /// Returns true if nothing is bound.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// Iterates over bindings in alias order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Arc<EntityDef>)> {
        self.bindings.iter().map(|(alias, entity)| (alias.as_str(), entity))
    }

    /// Generates an unused alias for an entity written as `name`.
    ///
    /// Candidates are the prefixes of the lower-cased name, shortest first,
    /// then the lower-cased name followed by `0`, `1`, ... up to
    /// [`MAX_SUFFIX_ATTEMPTS`]. The alias is not bound; callers bind it with
    /// [`put`](Self::put).
    ///
    /// # Errors
    ///
    /// Returns [`Error::AliasSpaceExhausted`] if every candidate is taken.
    pub fn create_alias(&self, name: &str) -> Result<String> {
        let lower = name.to_lowercase();
        let prefixes = lower
            .char_indices()
            .map(|(i, c)| lower[..i + c.len_utf8()].to_string());
        let suffixed = (0..MAX_SUFFIX_ATTEMPTS).map(|i| format!("{lower}{i}"));

        let alias = prefixes
            .chain(suffixed)
            .find(|candidate| !self.contains(candidate))
            .ok_or_else(|| Error::AliasSpaceExhausted {
                entity: name.to_string(),
            })?;
        debug!(entity = %name, alias = %alias, "Generated alias");
        Ok(alias)
    }
}
