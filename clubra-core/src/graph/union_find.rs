//! Union-find (disjoint set union) over dense node ids.
//!
//! Every clustering and cut computation builds a fresh instance, so the
//! structure has no deletion and is scoped to one computation. Path
//! compression is iterative to keep the stack flat on large instances.

/// Disjoint-set forest with union by rank and path compression.
///
/// # Examples
/// ```
/// use clubra_core::UnionFind;
///
/// let mut sets = UnionFind::new(4);
/// assert!(sets.union(1, 2));
/// assert!(!sets.union(2, 1));
/// assert_eq!(sets.find(1), sets.find(2));
/// assert_ne!(sets.find(0), sets.find(3));
/// ```
#[derive(Clone, Debug)]
pub struct UnionFind {
    parent: Vec<usize>,
    rank: Vec<u8>,
}

impl UnionFind {
    /// Creates `len` singleton sets labelled `0..len`.
    #[must_use]
    pub fn new(len: usize) -> Self {
        Self {
            parent: (0..len).collect(),
            rank: vec![0; len],
        }
    }

    /// Returns the number of elements tracked.
    #[must_use]
    pub fn len(&self) -> usize {
        self.parent.len()
    }

    /// Returns `true` when no elements are tracked.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.parent.is_empty()
    }

    /// Returns the representative of `node`'s set.
    ///
    /// # Panics
    /// Panics when `node >= self.len()`.
    pub fn find(&mut self, mut node: usize) -> usize {
        let mut root = node;
        while self.parent[root] != root {
            root = self.parent[root];
        }

        while self.parent[node] != node {
            let parent = self.parent[node];
            self.parent[node] = root;
            node = parent;
        }

        root
    }

    /// Merges the sets holding `left` and `right`.
    ///
    /// The lower-rank root is linked under the higher-rank one; on equal ranks
    /// `left`'s root survives and its rank grows. Returns `false` when both
    /// already share a root.
    ///
    /// # Panics
    /// Panics when either id is out of range.
    pub fn union(&mut self, left: usize, right: usize) -> bool {
        let mut left = self.find(left);
        let mut right = self.find(right);
        if left == right {
            return false;
        }
        let left_rank = self.rank[left];
        let right_rank = self.rank[right];
        if left_rank < right_rank {
            std::mem::swap(&mut left, &mut right);
        }
        self.parent[right] = left;
        if left_rank == right_rank {
            self.rank[left] = left_rank.saturating_add(1);
        }
        true
    }

    /// Returns `true` when `left` and `right` share a set.
    ///
    /// # Panics
    /// Panics when either id is out of range.
    pub fn connected(&mut self, left: usize, right: usize) -> bool {
        self.find(left) == self.find(right)
    }

    /// Groups `nodes` by set.
    ///
    /// Groups appear in the order their first member is met and keep the
    /// member order of `nodes`, so an ascending input yields groups numbered
    /// by smallest member with ascending members.
    ///
    /// # Panics
    /// Panics when a node id is out of range.
    pub fn components(&mut self, nodes: impl IntoIterator<Item = usize>) -> Vec<Vec<usize>> {
        let mut slot_of_root = vec![usize::MAX; self.parent.len()];
        let mut groups: Vec<Vec<usize>> = Vec::new();
        for node in nodes {
            let root = self.find(node);
            let slot = slot_of_root[root];
            if slot == usize::MAX {
                slot_of_root[root] = groups.len();
                groups.push(vec![node]);
            } else {
                groups[slot].push(node);
            }
        }
        groups
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;
    use rstest::rstest;

    use super::UnionFind;

    #[test]
    fn singletons_report_distinct_roots() {
        let mut sets = UnionFind::new(6);
        let mut roots: Vec<usize> = (0..6).map(|node| sets.find(node)).collect();
        roots.sort_unstable();
        roots.dedup();
        assert_eq!(roots.len(), 6);
    }

    #[rstest]
    #[case::chain(&[(0, 1), (1, 2), (2, 3)], vec![vec![0, 1, 2, 3], vec![4]])]
    #[case::two_pairs(&[(3, 4), (0, 2)], vec![vec![0, 2], vec![1], vec![3, 4]])]
    #[case::none(&[], vec![vec![0], vec![1], vec![2], vec![3], vec![4]])]
    fn components_follow_first_member_order(
        #[case] unions: &[(usize, usize)],
        #[case] expected: Vec<Vec<usize>>,
    ) {
        let mut sets = UnionFind::new(5);
        for &(left, right) in unions {
            sets.union(left, right);
        }
        assert_eq!(sets.components(0..5), expected);
    }

    #[test]
    fn equal_ranks_keep_left_root() {
        let mut sets = UnionFind::new(2);
        sets.union(1, 0);
        assert_eq!(sets.find(0), 1);
    }

    proptest! {
        #[test]
        fn union_joins_and_find_is_idempotent(
            pairs in proptest::collection::vec((0usize..32, 0usize..32), 0..64),
        ) {
            let mut sets = UnionFind::new(32);
            for (left, right) in pairs {
                sets.union(left, right);
                prop_assert_eq!(sets.find(left), sets.find(right));
            }
            for node in 0..32 {
                let root = sets.find(node);
                prop_assert_eq!(sets.find(root), root);
                prop_assert_eq!(sets.find(node), root);
            }
        }
    }
}
