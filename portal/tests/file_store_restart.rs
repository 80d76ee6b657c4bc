//! Sessions and accounts persisted through the file store survive restarts.

use std::path::Path;
use std::sync::Arc;

use mockable::DefaultClock;
use portal::PortalContext;
use portal::config::PortalSettings;
use portal::domain::{CourseRef, LoginCredentials, RegistrationForm};
use portal::outbound::FileKeyValueStore;
use rstest::{fixture, rstest};
use tempfile::TempDir;

#[fixture]
fn root() -> TempDir {
    tempfile::tempdir().expect("temporary directory")
}

fn settings(dir: &Path) -> PortalSettings {
    PortalSettings {
        storage_dir: Some(dir.to_path_buf()),
        ephemeral: false,
    }
}

fn boot(dir: &Path) -> PortalContext<FileKeyValueStore> {
    PortalContext::from_settings(&settings(dir), Arc::new(DefaultClock)).expect("open portal")
}

fn ann() -> RegistrationForm {
    RegistrationForm {
        full_name: "Ann".to_owned(),
        email: "a@x.com".to_owned(),
        password: "pw123456".to_owned(),
        confirm_password: "pw123456".to_owned(),
        gender: "Female".to_owned(),
        date_of_birth: "2001-04-30".to_owned(),
        ..RegistrationForm::default()
    }
}

#[rstest]
fn signed_in_session_is_restored_from_disk(root: TempDir) {
    let dir = root.path().join("portal");
    let mut first = boot(&dir);
    first
        .session_mut()
        .register(ann().validate().expect("valid form"))
        .expect("register");
    let public = first
        .session_mut()
        .login(&LoginCredentials::try_from_parts("A@x.com", "pw123456").expect("credentials"))
        .expect("login");
    drop(first);

    let second = boot(&dir);
    assert_eq!(second.session().current(), Some(&public));
    assert_eq!(
        second
            .session()
            .current()
            .and_then(|identity| identity.date_of_birth())
            .map(|date| date.to_string()),
        Some("2001-04-30".to_owned())
    );
}

#[rstest]
fn accounts_survive_but_logout_sticks(root: TempDir) {
    let dir = root.path().join("portal");
    let mut first = boot(&dir);
    first
        .session_mut()
        .register(ann().validate().expect("valid form"))
        .expect("register");
    first
        .session_mut()
        .login(&LoginCredentials::try_from_parts("a@x.com", "pw123456").expect("credentials"))
        .expect("login");
    first.session_mut().logout();
    drop(first);

    let mut second = boot(&dir);
    assert!(!second.session().is_authenticated());
    assert_eq!(second.session().identities().expect("identities").len(), 1);
    second
        .session_mut()
        .login(&LoginCredentials::try_from_parts("a@x.com", "pw123456").expect("credentials"))
        .expect("login after restart");
}

#[rstest]
fn selection_is_not_persisted(root: TempDir) {
    let dir = root.path().join("portal");
    let mut first = boot(&dir);
    let course = CourseRef::try_from_parts("CSE201", "Data Structures", 3)
        .expect("valid course");
    first.selection_mut().toggle_selection(course);
    first.selection_mut().commit_enrollment();
    drop(first);

    let second = boot(&dir);
    assert!(second.selection().selected().is_empty());
    assert!(second.selection().enrolled().is_empty());
}
