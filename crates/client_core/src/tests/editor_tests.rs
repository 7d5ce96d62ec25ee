use super::*;

fn jane() -> ProfileRecord {
    let mut record = ProfileRecord::default();
    record.first_name = "Jane".to_string();
    record.email = "j@x.com".to_string();
    record
}

#[test]
fn cancel_discards_every_staged_write() {
    let mut editor = ProfileEditor::new(jane());
    editor.enter_edit(SectionId::BasicInfo).expect("enter");
    editor
        .set_field(ProfileField::FirstName, "Janet")
        .expect("set");
    editor
        .set_field(ProfileField::Phone, "555-1234")
        .expect("set");
    editor
        .set_field(ProfileField::Address, "12 Elm St")
        .expect("set");

    editor.cancel_edit(SectionId::BasicInfo).expect("cancel");

    assert_eq!(editor.committed(), &jane());
    assert_eq!(
        editor.visible_for(SectionId::BasicInfo),
        editor.committed(),
        "draft must resync to committed after cancel"
    );
    assert!(!editor.is_editing(SectionId::BasicInfo));
}

#[test]
fn commit_applies_staged_writes_field_by_field() {
    let mut editor = ProfileEditor::new(jane());
    editor.enter_edit(SectionId::BasicInfo).expect("enter");
    editor
        .set_field(ProfileField::FirstName, "Janet")
        .expect("set");
    editor
        .set_field(ProfileField::Phone, "555-1234")
        .expect("set");

    editor.commit(SectionId::BasicInfo).expect("commit");

    let mut expected = jane();
    expected.first_name = "Janet".to_string();
    expected.phone = "555-1234".to_string();
    assert_eq!(editor.committed(), &expected);
    assert!(!editor.is_editing(SectionId::BasicInfo));
}

#[test]
fn enter_then_commit_without_writes_is_a_noop() {
    let mut editor = ProfileEditor::new(jane());
    editor.enter_edit(SectionId::BasicInfo).expect("enter");
    editor.commit(SectionId::BasicInfo).expect("commit");
    assert_eq!(editor.committed(), &jane());
}

#[test]
fn email_survives_any_number_of_commits() {
    let mut editor = ProfileEditor::new(jane());
    for name in ["Janet", "June", "Joan"] {
        editor.enter_edit(SectionId::BasicInfo).expect("enter");
        editor.set_field(ProfileField::FirstName, name).expect("set");
        editor.commit(SectionId::BasicInfo).expect("commit");
        assert_eq!(editor.committed().email, "j@x.com");
    }
}

#[test]
fn cancel_is_idempotent() {
    let mut editor = ProfileEditor::new(jane());
    editor.enter_edit(SectionId::BasicInfo).expect("enter");
    editor
        .set_field(ProfileField::FirstName, "Janet")
        .expect("set");
    editor.cancel_edit(SectionId::BasicInfo).expect("cancel");
    let after_first = editor.committed().clone();

    editor
        .cancel_edit(SectionId::BasicInfo)
        .expect("second cancel is a no-op");
    assert_eq!(editor.committed(), &after_first);
    assert!(!editor.is_editing(SectionId::BasicInfo));
}

#[test]
fn email_is_rejected_regardless_of_edit_state() {
    let mut editor = ProfileEditor::new(jane());
    let err = editor
        .set_field(ProfileField::Email, "new@x.com")
        .expect_err("not editing");
    assert!(matches!(
        err,
        EditError::Validation(ValidationError {
            kind: shared::error::ValidationErrorKind::ImmutableField,
            ..
        })
    ));

    editor.enter_edit(SectionId::BasicInfo).expect("enter");
    editor
        .set_field(ProfileField::Email, "new@x.com")
        .expect_err("editing does not unlock email");
    assert_eq!(editor.committed().email, "j@x.com");
}

#[test]
fn writes_outside_edit_mode_are_rejected() {
    let mut editor = ProfileEditor::new(jane());
    let err = editor
        .set_field(ProfileField::FirstName, "Janet")
        .expect_err("no session active");
    assert_eq!(err, EditError::NotEditing);
    assert_eq!(editor.committed(), &jane());
}

#[test]
fn unknown_external_identifiers_are_rejected() {
    let mut editor = ProfileEditor::new(jane());
    editor.enter_edit(SectionId::BasicInfo).expect("enter");
    let err = editor
        .set_field_external("favouriteColour", "teal")
        .expect_err("unknown field");
    assert!(matches!(
        err,
        EditError::Validation(ValidationError {
            kind: shared::error::ValidationErrorKind::UnknownField,
            ..
        })
    ));

    editor
        .set_field_external("firstName", "Janet")
        .expect("known external id");
    assert_eq!(editor.visible().first_name, "Janet");
}

#[test]
fn resume_field_keeps_only_the_file_name() {
    let mut editor = ProfileEditor::new(jane());
    editor.enter_edit(SectionId::BasicInfo).expect("enter");
    editor
        .set_field(ProfileField::Resume, "/home/jane/docs/resume-final.pdf")
        .expect("set");
    assert_eq!(editor.visible().resume_file_name, "resume-final.pdf");

    editor
        .set_field(ProfileField::Resume, r"C:\Users\jane\resume.pdf")
        .expect("set");
    assert_eq!(editor.visible().resume_file_name, "resume.pdf");
}

#[test]
fn only_one_section_may_edit_at_a_time() {
    let mut editor = ProfileEditor::new(jane());
    editor.enter_edit(SectionId::BasicInfo).expect("enter");

    assert_eq!(
        editor.enter_edit(SectionId::Experience),
        Err(EditError::SectionLocked {
            active: SectionId::BasicInfo
        })
    );
    assert_eq!(
        editor.enter_edit(SectionId::BasicInfo),
        Err(EditError::AlreadyEditing)
    );

    editor.cancel_edit(SectionId::BasicInfo).expect("cancel");
    editor.enter_edit(SectionId::Experience).expect("unlocked");
}

#[test]
fn tab_switching_is_locked_while_editing() {
    let mut editor = ProfileEditor::new(jane());
    editor
        .select_tab(SectionId::EducationSkills)
        .expect("switch");
    editor.select_tab(SectionId::BasicInfo).expect("switch");

    editor.enter_edit(SectionId::BasicInfo).expect("enter");
    assert_eq!(
        editor.select_tab(SectionId::Experience),
        Err(EditError::SectionLocked {
            active: SectionId::BasicInfo
        })
    );

    editor.commit(SectionId::BasicInfo).expect("commit");
    editor.select_tab(SectionId::Experience).expect("unlocked");
    assert_eq!(editor.active_tab(), SectionId::Experience);
}

#[test]
fn view_renders_committed_and_edit_renders_draft() {
    let mut editor = ProfileEditor::new(jane());
    assert_eq!(editor.visible().first_name, "Jane");

    editor.enter_edit(SectionId::BasicInfo).expect("enter");
    editor
        .set_field(ProfileField::FirstName, "Janet")
        .expect("set");
    assert_eq!(editor.visible().first_name, "Janet");
    assert_eq!(
        editor.committed().first_name,
        "Jane",
        "committed is untouched while drafting"
    );

    editor.cancel_edit(SectionId::BasicInfo).expect("cancel");
    assert_eq!(editor.visible().first_name, "Jane");
}

#[test]
fn external_update_resyncs_inactive_drafts() {
    let mut editor = ProfileEditor::new(jane());

    let mut external = jane();
    external.first_name = "June".to_string();
    editor.resync(external.clone());

    assert_eq!(editor.committed(), &external);
    editor.enter_edit(SectionId::BasicInfo).expect("enter");
    assert_eq!(
        editor.visible().first_name,
        "June",
        "stale draft must not leak into a later edit session"
    );
}

#[test]
fn resync_preserves_an_active_draft() {
    let mut editor = ProfileEditor::new(jane());
    editor.enter_edit(SectionId::BasicInfo).expect("enter");
    editor
        .set_field(ProfileField::FirstName, "Janet")
        .expect("set");

    let mut external = jane();
    external.pincode = "560001".to_string();
    editor.resync(external.clone());

    assert_eq!(editor.committed(), &external);
    assert_eq!(
        editor.visible().first_name,
        "Janet",
        "in-progress draft survives an external update"
    );
}

#[test]
fn commit_without_entering_edit_is_rejected() {
    let mut editor = ProfileEditor::new(jane());
    assert_eq!(
        editor.commit(SectionId::BasicInfo),
        Err(EditError::NotEditing)
    );
    assert_eq!(
        editor.commit(SectionId::Experience),
        Err(EditError::NotEditing)
    );
}
