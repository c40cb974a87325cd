use delve_core::Stage;

#[test]
fn test_stage_progression() {
    assert_eq!(Stage::New.next(), Some(Stage::Planned));
    assert_eq!(Stage::Planned.next(), Some(Stage::Searched));
    assert_eq!(Stage::Searched.next(), Some(Stage::Reported));
    assert_eq!(Stage::Reported.next(), None);
}

#[test]
fn test_can_advance() {
    // Every stage except Reported has a successor
    assert!(Stage::New.can_advance());
    assert!(Stage::Planned.can_advance());
    assert!(Stage::Searched.can_advance());
    assert!(!Stage::Reported.can_advance());
}

#[test]
fn test_default_is_new() {
    assert_eq!(Stage::default(), Stage::New);
}

#[test]
fn test_display_names() {
    assert_eq!(Stage::New.display_name(), "New");
    assert_eq!(Stage::Reported.display_name(), "Reported");
}
