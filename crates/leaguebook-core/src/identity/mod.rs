// Owner identity: resolve the many names a manager shows up under to one
// canonical owner.

pub mod alias;

pub use alias::{AliasMap, RuleError};
