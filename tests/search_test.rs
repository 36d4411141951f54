//! Tests for search and year classification

use rstest::{fixture, rstest};

use clubtree::application::{ApplicationError, TreeSession};
use clubtree::config::Settings;
use clubtree::domain::{
    classify, DomainError, Highlight, MemberId, MemberRecord, RecordStore, ViewportSize,
};
use clubtree::util::testing;

fn id(raw: &str) -> MemberId {
    MemberId::from(raw)
}

fn records() -> Vec<MemberRecord> {
    vec![
        MemberRecord::new("l1", "Big Al").as_lord().with_years([2022, 2023, 2024]),
        MemberRecord::new("m1", "Ali Hassan")
            .sponsored_by("l1")
            .with_hometown("Detroit")
            .with_years([2023, 2024]),
        MemberRecord::new("m2", "Joe Miller")
            .sponsored_by("l1")
            .with_nickname("Walleye")
            .with_years([2024]),
        MemberRecord::new("m3", "Ray Fox").sponsored_by("m2"),
    ]
}

#[fixture]
fn session() -> TreeSession {
    testing::init_test_setup();
    let mut session =
        TreeSession::new(records(), &Settings::default(), ViewportSize::new(800.0, 600.0)).unwrap();
    session.render();
    session
}

#[test]
fn given_query_when_classifying_then_substring_matches_case_insensitively() {
    // Arrange
    let store = RecordStore::new(records()).unwrap();
    let visible = [id("m1"), id("m2")];

    // Act
    let highlights = classify("ali", &visible, &store);

    // Assert
    assert_eq!(highlights[&id("m1")], Highlight::Match);
    assert_eq!(highlights[&id("m2")], Highlight::Dimmed);
}

#[rstest]
#[case("")]
#[case("   ")]
fn given_blank_query_when_searching_then_all_neutral(
    mut session: TreeSession,
    #[case] query: &str,
) {
    // Act
    let highlights = session.search(query);

    // Assert
    assert_eq!(highlights.len(), 4);
    assert!(highlights.values().all(|h| *h == Highlight::Neutral));
}

#[rstest]
#[case("walleye", "m2")]
#[case("DETROIT", "m1")]
#[case("fox", "m3")]
fn given_query_when_searching_then_nickname_and_hometown_count(
    mut session: TreeSession,
    #[case] query: &str,
    #[case] expected: &str,
) {
    // Act
    let highlights = session.search(query);

    // Assert
    let matched: Vec<_> = highlights
        .iter()
        .filter(|(_, h)| **h == Highlight::Match)
        .map(|(id, _)| id.clone())
        .collect();
    assert_eq!(matched, vec![id(expected)]);
}

#[rstest]
fn given_collapsed_subtree_when_searching_then_hidden_members_unclassified(
    mut session: TreeSession,
) {
    // Arrange
    session.toggle(&id("m2")).unwrap();

    // Act
    let highlights = session.search("fox");

    // Assert
    assert!(!highlights.contains_key(&id("m3")));
    assert!(session.tree().contains(&id("m3")), "search never alters the tree");
}

#[rstest]
fn given_year_filter_when_classifying_then_attendees_match(mut session: TreeSession) {
    // Act
    let highlights = session.filter_year(Some(2023));

    // Assert
    assert_eq!(highlights[&id("l1")], Highlight::Match);
    assert_eq!(highlights[&id("m1")], Highlight::Match);
    assert_eq!(highlights[&id("m2")], Highlight::Dimmed);
    assert_eq!(highlights[&id("m3")], Highlight::Dimmed);
}

#[rstest]
fn given_query_and_year_when_merging_then_dimmed_wins(mut session: TreeSession) {
    // Arrange
    session.search("ali");

    // Act
    let highlights = session.filter_year(Some(2024));

    // Assert
    assert_eq!(highlights[&id("m1")], Highlight::Match, "matches both");
    assert_eq!(highlights[&id("l1")], Highlight::Dimmed, "attended but no query match");
    assert_eq!(highlights[&id("m3")], Highlight::Dimmed);
}

#[rstest]
fn given_member_when_activating_then_detail_has_sponsor_name(session: TreeSession) {
    // Act
    let detail = session.activate(&id("m3")).unwrap();

    // Assert
    assert_eq!(detail.record.name, "Ray Fox");
    assert_eq!(detail.sponsor_name, Some("Joe Miller"));
    assert_eq!(detail.tenure(), 0);
}

#[rstest]
fn given_unknown_id_when_activating_then_unknown_member(session: TreeSession) {
    // Act
    let result = session.activate(&id("ghost"));

    // Assert
    assert!(matches!(
        result,
        Err(ApplicationError::Domain(DomainError::UnknownMember(_)))
    ));
}
