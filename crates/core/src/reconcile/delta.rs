//! Delta computation between recorded and desired dependency sets

use mantle_domain::{Dependency, DependencySet};

/// The minimal set of add/remove operations turning `current` into `desired`.
///
/// Membership is exact `(name, version)` pair equality, so bumping only the
/// version of an existing dependency lands in both lists: the new pair is
/// added and the old pair, no longer desired, is removed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DependencyDelta {
    /// Desired entries absent from the current set.
    pub to_add: Vec<Dependency>,
    /// Current entries absent from the desired set.
    pub to_remove: Vec<Dependency>,
}

impl DependencyDelta {
    /// Compute `to_add = desired \ current` and `to_remove = current \
    /// desired`.
    pub fn between(current: &DependencySet, desired: &DependencySet) -> Self {
        let to_add = desired.iter().filter(|dependency| !current.contains(dependency)).collect();
        let to_remove = current.iter().filter(|dependency| !desired.contains(dependency)).collect();
        Self { to_add, to_remove }
    }

    /// Whether the two sets already agree.
    pub fn is_empty(&self) -> bool {
        self.to_add.is_empty() && self.to_remove.is_empty()
    }
}
