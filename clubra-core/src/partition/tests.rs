//! Unit tests for cluster partitions.

use proptest::prelude::*;
use rstest::rstest;

use super::{ClusterId, ClusterPartition, PartitionError};

fn id(value: usize) -> ClusterId {
    ClusterId::new(value)
}

#[test]
fn depot_cluster_comes_first() {
    let partition =
        ClusterPartition::with_depot(3, vec![vec![3, 1], vec![2]]).expect("valid clusters");
    let members: Vec<&[usize]> = partition
        .clusters()
        .iter()
        .map(|cluster| cluster.members())
        .collect();
    assert_eq!(members, vec![&[0][..], &[1, 3][..], &[2][..]]);
    assert_eq!(partition.cluster(id(1)).map(|c| c.id()), Some(id(1)));
    assert!(partition.is_complete());
}

#[test]
fn overlapping_clusters_are_not_disjoint() {
    let partition = ClusterPartition::from_clusters(5, vec![vec![1, 2], vec![2, 3], vec![4]])
        .expect("valid clusters");
    assert!(!partition.is_disjoint(id(1), id(2)));
    assert!(!partition.is_disjoint(id(2), id(1)));
    assert!(partition.is_disjoint(id(1), id(3)));
    assert!(partition.is_disjoint(id(3), id(2)));
}

#[rstest]
#[case(1)]
#[case(2)]
#[case(9)]
fn cluster_is_never_disjoint_from_itself(#[case] raw: usize) {
    let partition =
        ClusterPartition::with_depot(2, vec![vec![1], vec![2]]).expect("valid clusters");
    assert!(!partition.is_disjoint(id(raw), id(raw)));
}

#[test]
fn cluster_of_prefers_the_last_cluster() {
    let partition = ClusterPartition::from_clusters(4, vec![vec![0], vec![1, 2], vec![2, 3]])
        .expect("valid clusters");
    assert_eq!(partition.cluster_of(1), Ok(id(2)));
    assert_eq!(partition.cluster_of(2), Ok(id(3)));
}

#[rstest]
#[case::empty(ClusterPartition::new(3), 1, PartitionError::NoClusters)]
#[case::out_of_range(
    ClusterPartition::from_clusters(3, vec![vec![0]]).expect("valid"),
    7,
    PartitionError::NodeOutOfRange { node: 7, node_count: 3 }
)]
#[case::unassigned(
    ClusterPartition::from_clusters(3, vec![vec![0]]).expect("valid"),
    2,
    PartitionError::NodeUnassigned { node: 2 }
)]
fn cluster_of_reports_lookup_failures(
    #[case] partition: ClusterPartition,
    #[case] node: usize,
    #[case] expected: PartitionError,
) {
    assert_eq!(partition.cluster_of(node), Err(expected));
}

#[test]
fn rejects_empty_and_out_of_range_clusters() {
    let empty = ClusterPartition::from_clusters(3, vec![vec![0], Vec::new()])
        .expect_err("empty cluster");
    assert_eq!(empty, PartitionError::EmptyCluster { position: 1 });
    assert_eq!(empty.code().as_str(), "PARTITION_EMPTY_CLUSTER");

    let outside = ClusterPartition::from_clusters(3, vec![vec![3]]).expect_err("node outside");
    assert_eq!(outside.code().as_str(), "PARTITION_NODE_OUT_OF_RANGE");
}

#[test]
fn append_unique_skips_known_member_sets() {
    let mut partition =
        ClusterPartition::with_depot(4, vec![vec![1, 2]]).expect("valid clusters");
    let added = partition
        .append_unique(vec![vec![2, 1], vec![3, 4], vec![4, 3]])
        .expect("valid candidates");
    assert_eq!(added, 1);
    assert_eq!(partition.len(), 3);
    assert_eq!(partition.to_string(), "C1 0\nC2 1 2\nC3 3 4\n");
}

#[rstest]
#[case::late_out_of_range(
    vec![vec![3, 4], vec![2, 9]],
    PartitionError::NodeOutOfRange { node: 9, node_count: 5 },
)]
#[case::late_empty(vec![vec![3], vec![4], Vec::new()], PartitionError::EmptyCluster { position: 2 })]
fn failed_append_leaves_the_partition_unchanged(
    #[case] candidates: Vec<Vec<usize>>,
    #[case] expected: PartitionError,
) {
    let mut partition =
        ClusterPartition::with_depot(4, vec![vec![1, 2]]).expect("valid clusters");
    let before = partition.clone();
    assert_eq!(partition.append_unique(candidates), Err(expected));
    assert_eq!(partition, before);
    assert_eq!(partition.to_string(), "C1 0\nC2 1 2\n");
}

#[test]
fn incomplete_partition_is_detected() {
    let partition = ClusterPartition::with_depot(3, vec![vec![1, 2]]).expect("valid clusters");
    assert!(!partition.is_complete());
}

proptest! {
    #[test]
    fn disjointness_matches_member_intersection(
        clusters in proptest::collection::vec(
            proptest::collection::btree_set(0_usize..8, 1..4),
            1..6,
        ),
    ) {
        let lists: Vec<Vec<usize>> = clusters.iter().map(|set| set.iter().copied().collect()).collect();
        let partition = ClusterPartition::from_clusters(8, lists).expect("valid clusters");
        for (a, left) in clusters.iter().enumerate() {
            for (b, right) in clusters.iter().enumerate() {
                let expected = a != b && left.is_disjoint(right);
                prop_assert_eq!(partition.is_disjoint(id(a + 1), id(b + 1)), expected);
            }
            for node in 0..8 {
                prop_assert_eq!(partition.contains(id(a + 1), node), left.contains(&node));
            }
        }
    }
}
