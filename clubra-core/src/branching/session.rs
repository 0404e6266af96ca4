//! State that outlives a single ranking call.

use std::collections::HashMap;

/// Search-scoped branching state owned by the driver.
///
/// Holds the append-only cutset ordinal table and the one-shot root flag.
/// Create one per search and pass it to every ranking call.
///
/// # Examples
/// ```
/// use clubra_core::BranchingSession;
///
/// let mut session = BranchingSession::new();
/// assert!(session.first_root_visit());
/// assert!(!session.first_root_visit());
/// assert_eq!(session.cutset_ordinal("cutset_1-2"), 0);
/// assert_eq!(session.cutset_ordinal("cutset_3"), 1);
/// assert_eq!(session.cutset_ordinal("cutset_1-2"), 0);
/// ```
#[derive(Clone, Debug, Default)]
pub struct BranchingSession {
    cutset_ordinals: HashMap<String, usize>,
    root_processed: bool,
}

impl BranchingSession {
    /// Creates an empty session.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the ordinal of the cutset named `name`, assigning the next one
    /// on first sight.
    pub fn cutset_ordinal(&mut self, name: &str) -> usize {
        if let Some(&ordinal) = self.cutset_ordinals.get(name) {
            return ordinal;
        }
        let ordinal = self.cutset_ordinals.len();
        self.cutset_ordinals.insert(name.to_owned(), ordinal);
        ordinal
    }

    /// Returns how many distinct cutsets have been seen.
    #[must_use]
    pub fn known_cutsets(&self) -> usize {
        self.cutset_ordinals.len()
    }

    /// Returns `true` exactly once: on the first call of the search.
    pub fn first_root_visit(&mut self) -> bool {
        !std::mem::replace(&mut self.root_processed, true)
    }

    /// Returns `true` once the root has been visited.
    #[must_use]
    pub const fn root_processed(&self) -> bool {
        self.root_processed
    }
}
