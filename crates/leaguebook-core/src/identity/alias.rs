// Owner alias map: resolution of raw manager names to canonical owners.

use std::collections::{BTreeMap, BTreeSet, HashSet};

use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

/// Why an alias rule was refused.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuleError {
    #[error("alias name is empty")]
    EmptyAlias,

    #[error("canonical name is empty")]
    EmptyCanonical,

    #[error("`{name}` cannot be an alias of itself")]
    SelfAlias { name: String },

    #[error("`{alias}` -> `{canonical}` would create a cycle")]
    Cycle { alias: String, canonical: String },
}

/// Mapping from a raw owner name to its canonical owner, or to another alias.
///
/// Keys and values are trimmed on construction and blank keys are dropped,
/// including maps read from JSON. Serializes as a flat JSON object. Maps
/// produced by [`AliasMap::flatten`], [`AliasMap::add_rule`] and
/// [`AliasMap::remove_rule`] are chain-free: every key points straight at a
/// name that is not itself a key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct AliasMap(BTreeMap<String, String>);

/// Outcome of following a name through the map.
enum Resolution<'a> {
    Resolved(&'a str),
    Cycle,
}

impl AliasMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, alias: &str) -> Option<&str> {
        self.0.get(alias).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> + '_ {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// The canonical owner for a raw name.
    ///
    /// Follows the chain of mappings until a name with no further mapping is
    /// reached. Blank input returns the empty string. If the chain loops back
    /// on itself the trimmed input is returned unchanged.
    pub fn canonicalize(&self, name: &str) -> String {
        let name = name.trim();
        if name.is_empty() {
            return String::new();
        }
        match self.resolve(name) {
            Resolution::Resolved(canonical) => canonical.to_string(),
            Resolution::Cycle => {
                warn!("alias map has a cycle through {:?}; leaving name unchanged", name);
                name.to_string()
            }
        }
    }

    /// A chain-free copy: every multi-hop chain becomes a direct edge, and
    /// entries that resolve to themselves, to nothing, or into a cycle are
    /// dropped.
    pub fn flatten(&self) -> AliasMap {
        let mut flat = BTreeMap::new();

        for key in self.0.keys() {
            match self.resolve(key) {
                Resolution::Resolved(target) => {
                    if !target.is_empty() && target != key {
                        flat.insert(key.clone(), target.to_string());
                    }
                }
                Resolution::Cycle => {
                    warn!("dropping alias {:?}: its chain forms a cycle", key);
                }
            }
        }

        AliasMap(flat)
    }

    /// Check whether `alias -> canonical` may be added to this map.
    ///
    /// Only a cycle the new rule itself closes is refused. Cycles already in
    /// the map are dropped by `flatten` before the check.
    pub fn check_rule(&self, alias: &str, canonical: &str) -> Result<(), RuleError> {
        let alias = alias.trim();
        let canonical = canonical.trim();

        if alias.is_empty() {
            return Err(RuleError::EmptyAlias);
        }
        if canonical.is_empty() {
            return Err(RuleError::EmptyCanonical);
        }
        if alias == canonical {
            return Err(RuleError::SelfAlias {
                name: alias.to_string(),
            });
        }

        let mut candidate = self.flatten();
        candidate.0.insert(alias.to_string(), canonical.to_string());
        if let Resolution::Cycle = candidate.resolve(alias) {
            return Err(RuleError::Cycle {
                alias: alias.to_string(),
                canonical: canonical.to_string(),
            });
        }

        Ok(())
    }

    /// Add or overwrite `alias -> canonical` and return the flattened result.
    ///
    /// A rule refused by [`AliasMap::check_rule`] is logged and not applied;
    /// the flattened current map is returned instead.
    pub fn add_rule(&self, alias: &str, canonical: &str) -> AliasMap {
        if let Err(e) = self.check_rule(alias, canonical) {
            warn!("alias rule not applied: {}", e);
            return self.flatten();
        }

        let mut next = self.flatten();
        next.0
            .insert(alias.trim().to_string(), canonical.trim().to_string());
        debug!("alias rule added: {:?} -> {:?}", alias.trim(), canonical.trim());
        next.flatten()
    }

    /// Remove the rule for `alias` (if any) and return the flattened result.
    pub fn remove_rule(&self, alias: &str) -> AliasMap {
        let mut next = self.clone();
        if next.0.remove(alias.trim()).is_some() {
            debug!("alias rule removed: {:?}", alias.trim());
        }
        next.flatten()
    }

    /// Every alias key that resolves to `canonical`, in key order.
    ///
    /// Keys caught in a cycle resolve to themselves and are never listed.
    pub fn aliases_of(&self, canonical: &str) -> Vec<&str> {
        let canonical = canonical.trim();
        self.0
            .keys()
            .filter(|k| k.as_str() != canonical && self.canonical_of(k) == Some(canonical))
            .map(String::as_str)
            .collect()
    }

    /// Distinct canonical names that at least one alias resolves to.
    pub fn canonical_names(&self) -> BTreeSet<&str> {
        self.0.keys().filter_map(|k| self.canonical_of(k)).collect()
    }

    // -----------------------------------------------------------------------
    // Helpers
    // -----------------------------------------------------------------------

    /// Where a key resolves, if somewhere other than itself.
    fn canonical_of<'a>(&'a self, key: &'a str) -> Option<&'a str> {
        match self.resolve(key) {
            Resolution::Resolved(target) if target != key => Some(target),
            _ => None,
        }
    }

    /// Walk the mapping chain from `start`. A blank target or a self-mapping
    /// ends the walk.
    fn resolve<'a>(&'a self, start: &'a str) -> Resolution<'a> {
        let mut visited: HashSet<&str> = HashSet::new();
        visited.insert(start);
        let mut current = start;

        loop {
            match self.0.get(current).map(|s| s.trim()) {
                Some(next) if !next.is_empty() && next != current => {
                    if !visited.insert(next) {
                        return Resolution::Cycle;
                    }
                    current = next;
                }
                _ => return Resolution::Resolved(current),
            }
        }
    }
}

impl From<BTreeMap<String, String>> for AliasMap {
    fn from(map: BTreeMap<String, String>) -> Self {
        map.into_iter().collect()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for AliasMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        AliasMap(
            iter.into_iter()
                .filter_map(|(k, v)| {
                    let (k, v): (String, String) = (k.into(), v.into());
                    let k = k.trim();
                    (!k.is_empty()).then(|| (k.to_string(), v.trim().to_string()))
                })
                .collect(),
        )
    }
}

impl<'de> Deserialize<'de> for AliasMap {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        BTreeMap::<String, String>::deserialize(deserializer).map(AliasMap::from)
    }
}
