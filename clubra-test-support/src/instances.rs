//! Hand-checked routing instances.
//!
//! Coordinates list the depot first. Solutions are `(i, j, value)` triples
//! with `i < j`; absent pairs are zero.

/// Depot between two well separated customer groups: `{1, 2}` close to the
/// origin and `{3, 4, 5}` around `(100, 100)`.
///
/// Single linkage with the default parameters cuts the tree at `127` and
/// yields exactly those two clusters.
///
/// # Examples
/// ```
/// use clubra_test_support::instances::two_groups;
///
/// assert_eq!(two_groups().len(), 6);
/// ```
#[must_use]
pub fn two_groups() -> Vec<(f64, f64)> {
    vec![
        (50.0, 50.0),
        (0.0, 0.0),
        (1.0, 0.0),
        (100.0, 100.0),
        (101.0, 100.0),
        (100.0, 101.0),
    ]
}

/// Demands matching [`two_groups`], depot first.
#[must_use]
pub fn two_group_demands() -> Vec<f64> {
    vec![0.0, 3.0, 4.0, 2.0, 2.0, 3.0]
}

/// Unit-weight cycle `1-2-3-4-1` over five nodes with an isolated depot.
///
/// Every phase of Stoer–Wagner ties at the minimum value `2`.
#[must_use]
pub fn four_cycle() -> Vec<(usize, usize, f64)> {
    vec![(1, 2, 1.0), (2, 3, 1.0), (3, 4, 1.0), (1, 4, 1.0)]
}

/// Two heavy triangles `{1, 2, 3}` and `{4, 5, 6}` joined by the light
/// bridge `3-4`, the unique minimum cut of value `0.1`.
#[must_use]
pub fn bridge() -> Vec<(usize, usize, f64)> {
    vec![
        (1, 2, 10.0),
        (2, 3, 10.0),
        (1, 3, 10.0),
        (4, 5, 10.0),
        (5, 6, 10.0),
        (4, 6, 10.0),
        (3, 4, 0.1),
    ]
}

/// A fractional solution over [`two_groups`] whose second group draws
/// fractional flow from the depot.
///
/// Customer clusters `{1, 2}` and `{3, 4, 5}` have boundary flows `2` and
/// `3`, so the cluster-degree candidate of `{3, 4, 5}` has value `1.5`.
#[must_use]
pub fn two_group_relaxation() -> Vec<(usize, usize, f64)> {
    vec![
        (0, 1, 1.0),
        (1, 2, 1.0),
        (0, 2, 1.0),
        (0, 3, 1.5),
        (3, 4, 1.0),
        (4, 5, 1.0),
        (0, 5, 1.5),
        (3, 5, 0.25),
    ]
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::{bridge, four_cycle, two_group_relaxation};

    #[rstest]
    #[case::four_cycle(four_cycle())]
    #[case::bridge(bridge())]
    #[case::relaxation(two_group_relaxation())]
    fn edges_are_listed_once_in_ascending_order(#[case] edges: Vec<(usize, usize, f64)>) {
        assert!(edges.iter().all(|&(i, j, value)| i < j && value > 0.0));
        let mut pairs: Vec<(usize, usize)> = edges.iter().map(|&(i, j, _)| (i, j)).collect();
        pairs.sort_unstable();
        pairs.dedup();
        assert_eq!(pairs.len(), edges.len());
    }
}
