//! Tests for auto-fit and the fit scheduling around transitions

use rstest::{fixture, rstest};

use clubtree::application::{ApplicationError, TreeSession};
use clubtree::config::Settings;
use clubtree::domain::{fit_to_view, MemberId, MemberRecord, Point, ViewportConfig, ViewportSize};
use clubtree::util::testing;

fn id(raw: &str) -> MemberId {
    MemberId::from(raw)
}

fn records() -> Vec<MemberRecord> {
    vec![
        MemberRecord::new("l1", "Big Al").as_lord(),
        MemberRecord::new("l2", "Old Pete").as_lord(),
        MemberRecord::new("m1", "Ali Hassan").sponsored_by("l1").with_years(2015..2022),
        MemberRecord::new("m2", "Joe Miller").sponsored_by("l1"),
        MemberRecord::new("m3", "Ray Fox").sponsored_by("l2"),
        MemberRecord::new("m4", "Sam Stone").sponsored_by("m3"),
    ]
}

#[fixture]
fn session() -> TreeSession {
    testing::init_test_setup();
    let mut session =
        TreeSession::new(records(), &Settings::default(), ViewportSize::new(1280.0, 800.0))
            .unwrap();
    session.render();
    session
}

#[rstest]
fn given_unchanged_state_when_fitting_twice_then_same_transform(mut session: TreeSession) {
    // Act
    let first = session.fit();
    let second = session.fit();

    // Assert
    assert_eq!(first, second);
}

#[rstest]
fn given_fit_when_mapping_footprints_then_all_inside_padded_viewport(mut session: TreeSession) {
    // Arrange
    let padding = ViewportConfig::default().padding;

    // Act
    let t = session.fit();

    // Assert
    assert!(t.scale <= 0.85);
    for node in session.layout().nodes() {
        let b = node.placement.bounds();
        let lo = t.apply(Point::new(b.min_x, b.min_y));
        let hi = t.apply(Point::new(b.max_x, b.max_y));
        assert!(lo.x >= padding - 1e-6 && lo.y >= padding - 1e-6, "{}", node.id);
        assert!(hi.x <= 1280.0 - padding + 1e-6, "{}", node.id);
        assert!(hi.y <= 800.0 - padding + 1e-6, "{}", node.id);
    }
}

#[test]
fn given_small_tree_when_fitting_then_scale_capped() {
    // Arrange
    let mut session = TreeSession::new(
        vec![MemberRecord::new("l1", "Big Al").as_lord()],
        &Settings::default(),
        ViewportSize::new(1280.0, 800.0),
    )
    .unwrap();
    session.render();

    // Act
    let t = session.fit();

    // Assert
    assert_eq!(t.scale, 0.85);
    let center = t.apply(session.layout().placement(&id("l1")).unwrap().position);
    assert!((center.x - 640.0).abs() < 1e-9);
    assert!((center.y - 400.0).abs() < 1e-9);
}

#[rstest]
fn given_visible_change_when_transitions_settle_then_owed_fit_runs_once(mut session: TreeSession) {
    // Arrange
    session.transitions_settled();
    session.zoom_in();
    assert!(session.viewport().is_user_override());

    // Act
    let frame = session.toggle(&id("l2")).unwrap().unwrap();
    let zoomed = session.transform();
    let fitted = session.transitions_settled();

    // Assert
    assert!(frame.fit_pending);
    assert_eq!(frame.transform, zoomed, "no fit before transitions settle");
    assert_eq!(frame.transition_ms, 400);
    let fitted = fitted.expect("fit owed");
    assert!(!session.viewport().is_user_override());
    assert_eq!(session.transitions_settled(), None);
    assert_eq!(fitted, session.transform());
}

#[rstest]
fn given_no_visible_change_when_rendering_then_no_fit_owed(mut session: TreeSession) {
    // Arrange
    session.transitions_settled();

    // Act
    let frame = session.render();

    // Assert
    assert!(!frame.fit_pending);
    assert!(!session.is_fit_pending());
}

#[test]
fn given_fit_immediately_when_toggling_then_frame_carries_fitted_transform() {
    // Arrange
    let mut settings = Settings::default();
    settings.viewport.fit_immediately = true;
    let mut session =
        TreeSession::new(records(), &settings, ViewportSize::new(1280.0, 800.0)).unwrap();
    session.render();

    // Act
    let frame = session.toggle(&id("l1")).unwrap().unwrap();

    // Assert
    assert!(!frame.fit_pending);
    let expected = fit_to_view(
        session.layout(),
        ViewportSize::new(1280.0, 800.0),
        &settings.viewport,
    );
    assert_eq!(Some(frame.transform), expected);
}

#[rstest]
fn given_user_zoom_when_resizing_then_refits(mut session: TreeSession) {
    // Arrange
    session.fit();
    session.zoom_out();
    session.pan_by(25.0, -10.0);

    // Act
    let t = session.resize(ViewportSize::new(640.0, 480.0));

    // Assert
    assert!(!session.viewport().is_user_override());
    let expected = fit_to_view(
        session.layout(),
        ViewportSize::new(640.0, 480.0),
        &ViewportConfig::default(),
    );
    assert_eq!(Some(t), expected);
}

#[rstest]
fn given_fitted_view_when_zooming_in_then_scale_grows_by_factor(mut session: TreeSession) {
    // Arrange
    let fitted = session.fit();

    // Act
    let zoomed = session.zoom_in();

    // Assert
    assert!((zoomed.scale - fitted.scale * 1.3).abs() < 1e-9);
    assert!(session.viewport().is_user_override());
}

#[test]
fn given_nan_zoom_setting_when_creating_session_then_rejected_instead_of_panicking_on_fit() {
    // Arrange
    let mut settings = Settings::default();
    settings.viewport.min_zoom = f64::NAN;

    // Act
    let result = TreeSession::new(records(), &settings, ViewportSize::new(1280.0, 800.0));

    // Assert
    assert!(matches!(result, Err(ApplicationError::Config { .. })));
}
