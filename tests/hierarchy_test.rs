//! Tests for HierarchyBuilder and MemberTree structure

use rstest::{fixture, rstest};

use clubtree::domain::{DomainError, HierarchyBuilder, MemberId, MemberRecord};

fn id(raw: &str) -> MemberId {
    MemberId::from(raw)
}

#[fixture]
fn club() -> Vec<MemberRecord> {
    vec![
        MemberRecord::new("l1", "Big Al").as_lord(),
        MemberRecord::new("l2", "Old Pete").as_lord(),
        MemberRecord::new("m1", "Ali Hassan").sponsored_by("l1"),
        MemberRecord::new("m2", "Joe Miller").sponsored_by("l1"),
        MemberRecord::new("m3", "Sam Stone").sponsored_by("m1"),
        MemberRecord::new("m4", "Ray Fox").sponsored_by("l2"),
    ]
}

#[rstest]
fn given_acyclic_records_when_building_then_every_record_visible_once(club: Vec<MemberRecord>) {
    // Arrange
    let mut builder = HierarchyBuilder::new();

    // Act
    let mut tree = builder.build(&club).unwrap();
    tree.expand_all();
    let visible = tree.visible_ids();

    // Assert
    assert_eq!(visible.len(), club.len());
    let mut sorted = visible.clone();
    sorted.sort();
    sorted.dedup();
    assert_eq!(sorted.len(), club.len(), "no duplicates");
    for record in &club {
        assert!(visible.contains(&record.id), "{} missing", record.id);
    }
}

#[rstest]
fn given_records_when_building_then_visible_order_is_preorder(club: Vec<MemberRecord>) {
    // Act
    let tree = HierarchyBuilder::new().build(&club).unwrap();

    // Assert
    let expected: Vec<MemberId> = ["l1", "m1", "m3", "m2", "l2", "m4"]
        .into_iter()
        .map(id)
        .collect();
    assert_eq!(tree.visible_ids(), expected);
}

#[test]
fn given_unknown_sponsor_when_building_then_dangling_reference() {
    // Arrange
    let records = vec![
        MemberRecord::new("l1", "Big Al").as_lord(),
        MemberRecord::new("m1", "Lost Soul").sponsored_by("ghost"),
    ];

    // Act
    let result = HierarchyBuilder::new().build(&records);

    // Assert
    assert_eq!(
        result.unwrap_err(),
        DomainError::DanglingReference {
            member: id("m1"),
            sponsor: id("ghost"),
        }
    );
}

#[test]
fn given_two_lords_when_building_then_both_hang_off_synthetic_root() {
    // Arrange
    let records = vec![
        MemberRecord::new("l1", "Big Al").as_lord(),
        MemberRecord::new("l2", "Old Pete").as_lord(),
    ];

    // Act
    let tree = HierarchyBuilder::new().build(&records).unwrap();

    // Assert
    let root = tree.get_node(tree.root()).unwrap();
    assert!(root.is_synthetic_root());
    assert_eq!(root.children.len(), 2);
    assert_eq!(tree.lords(), vec![&id("l1"), &id("l2")]);
    assert!(tree.visible_nodes().all(|(_, node)| !node.is_synthetic_root()));
    assert_eq!(tree.parent_id(&id("l1")), None);
}

#[test]
fn given_sponsor_cycle_when_building_then_cycle_detected() {
    // Arrange
    let records = vec![
        MemberRecord::new("l1", "Big Al").as_lord(),
        MemberRecord::new("a", "A").sponsored_by("c"),
        MemberRecord::new("b", "B").sponsored_by("a"),
        MemberRecord::new("c", "C").sponsored_by("b"),
    ];

    // Act
    let result = HierarchyBuilder::new().build(&records);

    // Assert
    assert!(matches!(result, Err(DomainError::CycleDetected(_))));
}

#[test]
fn given_duplicate_ids_when_building_then_duplicate_member() {
    // Arrange
    let records = vec![
        MemberRecord::new("l1", "Big Al").as_lord(),
        MemberRecord::new("l1", "Other Al").as_lord(),
    ];

    // Act
    let result = HierarchyBuilder::new().build(&records);

    // Assert
    assert_eq!(result.unwrap_err(), DomainError::DuplicateMember(id("l1")));
}

#[rstest]
fn given_builder_reused_when_building_twice_then_state_is_reset(club: Vec<MemberRecord>) {
    // Arrange
    let mut builder = HierarchyBuilder::new();
    builder.build(&club).unwrap();

    // Act
    let tree = builder
        .build(&[MemberRecord::new("solo", "Solo").as_lord()])
        .unwrap();

    // Assert
    assert_eq!(tree.len(), 1);
    assert_eq!(tree.lords(), vec![&id("solo")]);
}

#[rstest]
#[case("l1", 0)]
#[case("m1", 1)]
#[case("m3", 2)]
fn given_tree_when_asking_depth_then_lords_are_zero(
    club: Vec<MemberRecord>,
    #[case] member: &str,
    #[case] expected: usize,
) {
    let tree = HierarchyBuilder::new().build(&club).unwrap();
    assert_eq!(tree.depth(&id(member)), Some(expected));
}
