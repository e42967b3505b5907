use std::cell::RefCell;
use std::rc::Rc;

use futures::executor::block_on;

use super::*;
use crate::util::storage::MemoryStorage;

fn service_with(backend: &Rc<MemoryStorage>) -> AuthService {
    AuthService::new(ClientConfig::instant(), StorageAdapter::new(backend.clone()))
}

fn service() -> AuthService {
    service_with(&Rc::new(MemoryStorage::new()))
}

fn record(service: &AuthService) -> Rc<RefCell<Vec<AuthState>>> {
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = seen.clone();
    let _subscription = service.subscribe(move |state| sink.borrow_mut().push(state.clone()));
    seen
}

// =============================================================
// sign-in / sign-up
// =============================================================

#[test]
fn email_sign_in_rejects_short_password() {
    let auth = service();
    let err = block_on(auth.sign_in_with_email("a@b.com", "short")).unwrap_err();
    assert!(matches!(err, ClientError::Validation(_)));
    assert!(!auth.is_authenticated());
    assert!(!auth.is_loading());
}

#[test]
fn email_sign_in_rejects_blank_email() {
    let auth = service();
    assert!(matches!(block_on(auth.sign_in_with_email("  ", "longenough")), Err(ClientError::Validation(_))));
}

#[test]
fn email_sign_in_builds_session_from_email() {
    let auth = service();
    let session = block_on(auth.sign_in_with_email("a@b.com", "longenough")).unwrap();
    assert_eq!(session.email, "a@b.com");
    assert_eq!(session.name, "a");
    assert_eq!(session.id, DEMO_USER_ID);
    assert!(auth.is_authenticated());
    assert_eq!(auth.current_user(), Some(session));
}

#[test]
fn email_without_local_part_gets_default_name() {
    let auth = service();
    let session = block_on(auth.sign_in_with_email("@b.com", "longenough")).unwrap();
    assert_eq!(session.name, "User");
}

#[test]
fn google_sign_in_yields_demo_session() {
    let auth = service();
    let session = block_on(auth.sign_in_with_google()).unwrap();
    assert_eq!(session, Session::demo());
}

#[test]
fn google_sign_in_without_stub_flag_still_resolves_once() {
    let config = ClientConfig { auth_stub: false, ..ClientConfig::instant() };
    let auth = AuthService::new(config, StorageAdapter::memory());
    let seen = record(&auth);
    let session = block_on(auth.sign_in_with_google()).unwrap();
    assert_eq!(session.id, DEMO_USER_ID);
    assert_eq!(seen.borrow().len(), 2);
}

#[test]
fn sign_up_requires_name() {
    let auth = service();
    assert!(matches!(block_on(auth.sign_up_with_email("a@b.com", "longenough", " ")), Err(ClientError::Validation(_))));
    assert!(matches!(block_on(auth.sign_up_with_email("a@b.com", "12345", "Ann")), Err(ClientError::Validation(_))));
}

#[test]
fn sign_up_generates_fresh_ids() {
    let auth = service();
    let first = block_on(auth.sign_up_with_email("a@b.com", "longenough", "Ann")).unwrap();
    let second = block_on(auth.sign_up_with_email("c@d.com", "longenough", "Cid")).unwrap();
    assert!(first.id.starts_with("user_"));
    assert_ne!(first.id, second.id);
    assert_eq!(second.name, "Cid");
    assert_eq!(second.email, "c@d.com");
}

#[test]
fn failed_sign_in_keeps_previous_session() {
    let auth = service();
    let session = block_on(auth.sign_in_with_email("a@b.com", "longenough")).unwrap();
    assert!(block_on(auth.sign_in_with_email("x@y.com", "bad")).is_err());
    assert_eq!(auth.current_user(), Some(session));
}

// =============================================================
// notifications
// =============================================================

#[test]
fn each_operation_notifies_loading_then_result() {
    let auth = service();
    let seen = record(&auth);
    block_on(auth.sign_in_with_email("a@b.com", "longenough")).unwrap();

    let seen = seen.borrow();
    assert_eq!(seen.len(), 2);
    assert!(seen[0].is_loading);
    assert!(!seen[0].is_authenticated);
    assert!(!seen[1].is_loading);
    assert!(seen[1].is_authenticated);
}

#[test]
fn failures_also_clear_loading() {
    let auth = service();
    let seen = record(&auth);
    let _ = block_on(auth.sign_in_with_email("a@b.com", "x"));
    let seen = seen.borrow();
    assert_eq!(seen.len(), 2);
    assert!(!seen[1].is_loading);
    assert!(!seen[1].is_authenticated);
}

#[test]
fn sign_out_notifies_loading_then_signed_out() {
    let auth = service();
    block_on(auth.sign_in_with_google()).unwrap();
    let seen = record(&auth);
    block_on(auth.sign_out());

    let seen = seen.borrow();
    assert_eq!(seen.len(), 2);
    assert!(seen[0].is_loading);
    assert!(seen[0].is_authenticated);
    assert!(!seen[1].is_loading);
    assert!(!seen[1].is_authenticated);
    assert_eq!(seen[1].user, None);
}

#[test]
fn unsubscribed_listener_is_not_called() {
    let auth = service();
    let count = Rc::new(RefCell::new(0));
    let c = count.clone();
    let subscription = auth.subscribe(move |_| *c.borrow_mut() += 1);
    subscription.unsubscribe();
    block_on(auth.sign_in_with_google()).unwrap();
    assert_eq!(*count.borrow(), 0);
}

// =============================================================
// persistence
// =============================================================

#[test]
fn session_survives_reload_without_loading_flag() {
    let backend = Rc::new(MemoryStorage::new());
    let auth = service_with(&backend);
    block_on(auth.sign_in_with_email("a@b.com", "longenough")).unwrap();

    let reloaded = service_with(&backend);
    let state = reloaded.state();
    assert!(state.is_authenticated);
    assert!(!state.is_loading);
    assert_eq!(state.user.unwrap().email, "a@b.com");
}

#[test]
fn persisted_snapshot_has_user_and_flag_only() {
    let backend = Rc::new(MemoryStorage::new());
    let auth = service_with(&backend);
    block_on(auth.sign_in_with_google()).unwrap();

    let raw = StorageAdapter::new(backend).read(keys::AUTH_STATE).unwrap();
    let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(value["isAuthenticated"], true);
    assert_eq!(value["user"]["email"], DEMO_USER_EMAIL);
    assert!(value.get("isLoading").is_none());
}

#[test]
fn sign_out_clears_memory_and_storage() {
    let backend = Rc::new(MemoryStorage::new());
    let auth = service_with(&backend);
    block_on(auth.sign_in_with_google()).unwrap();
    block_on(auth.sign_out());

    assert!(!auth.is_authenticated());
    assert_eq!(auth.current_user(), None);
    assert!(!backend.contains_key(keys::AUTH_STATE));
}

#[test]
fn corrupt_persisted_state_starts_signed_out() {
    let backend = Rc::new(MemoryStorage::new());
    StorageAdapter::new(backend.clone()).write(keys::AUTH_STATE, "{broken");
    assert!(!service_with(&backend).is_authenticated());
}

#[test]
fn snapshot_flagged_signed_out_restores_signed_out() {
    let backend = Rc::new(MemoryStorage::new());
    let snapshot = serde_json::json!({ "user": Session::demo(), "isAuthenticated": false });
    StorageAdapter::new(backend.clone()).write(keys::AUTH_STATE, &snapshot.to_string());

    let auth = service_with(&backend);
    assert!(!auth.is_authenticated());
    assert_eq!(auth.current_user(), None);
}

#[test]
fn snapshot_without_flag_restores_signed_out() {
    let backend = Rc::new(MemoryStorage::new());
    let snapshot = serde_json::json!({ "user": Session::demo() });
    StorageAdapter::new(backend.clone()).write(keys::AUTH_STATE, &snapshot.to_string());
    assert!(!service_with(&backend).is_authenticated());
}

// =============================================================
// profile / preferences / favorites
// =============================================================

#[test]
fn updates_require_a_session() {
    let auth = service();
    assert_eq!(block_on(auth.update_profile(ProfileUpdate::default())), Err(ClientError::NotAuthenticated));
    assert_eq!(block_on(auth.update_preferences(PreferencesUpdate::default())), Err(ClientError::NotAuthenticated));
    assert_eq!(block_on(auth.add_to_favorites(Category::Jobs, "j")), Err(ClientError::NotAuthenticated));
    assert_eq!(block_on(auth.remove_from_favorites(Category::Jobs, "j")), Err(ClientError::NotAuthenticated));
}

#[test]
fn update_profile_merges_only_given_fields() {
    let auth = service();
    block_on(auth.sign_in_with_google()).unwrap();
    let update = ProfileUpdate { name: Some("Renamed".to_owned()), ..ProfileUpdate::default() };
    let session = block_on(auth.update_profile(update)).unwrap();

    assert_eq!(session.name, "Renamed");
    assert_eq!(session.email, DEMO_USER_EMAIL);
    assert_eq!(auth.current_user(), Some(session));
}

#[test]
fn update_preferences_merges_and_persists() {
    let backend = Rc::new(MemoryStorage::new());
    let auth = service_with(&backend);
    block_on(auth.sign_in_with_google()).unwrap();
    let update = PreferencesUpdate { theme: Some(Theme::Dark), ..PreferencesUpdate::default() };
    let session = block_on(auth.update_preferences(update)).unwrap();

    assert_eq!(session.preferences.theme, Theme::Dark);
    assert_eq!(session.preferences.language, "en");
    assert!(session.preferences.notifications);
    assert_eq!(service_with(&backend).current_user().unwrap().preferences.theme, Theme::Dark);
}

#[test]
fn favorites_stay_unique_and_ordered() {
    let auth = service();
    block_on(auth.sign_in_with_google()).unwrap();
    block_on(auth.add_to_favorites(Category::Jobs, "j1")).unwrap();
    block_on(auth.add_to_favorites(Category::Jobs, "j2")).unwrap();
    block_on(auth.add_to_favorites(Category::Jobs, "j1")).unwrap();

    assert_eq!(auth.current_user().unwrap().favorites.jobs, vec!["j1", "j2"]);
    assert!(auth.is_favorited(Category::Jobs, "j2"));
    assert!(!auth.is_favorited(Category::Careers, "j2"));

    block_on(auth.remove_from_favorites(Category::Jobs, "j1")).unwrap();
    assert!(!auth.is_favorited(Category::Jobs, "j1"));
}

#[test]
fn is_favorited_is_false_when_signed_out() {
    let auth = service();
    assert!(!auth.is_favorited(Category::Business, "anything"));
}

#[test]
fn theme_round_trips_through_dark_flag() {
    assert_eq!(Theme::from_dark(true), Theme::Dark);
    assert!(!Theme::Light.is_dark());
    assert_eq!(Theme::Dark.as_str(), "dark");
}
