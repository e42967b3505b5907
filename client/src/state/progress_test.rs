use super::*;

#[test]
fn prompt_shows_until_marked_seen() {
    let storage = StorageAdapter::memory();
    assert!(should_show_save_prompt(&storage));
    mark_save_prompt_seen(&storage);
    assert!(!should_show_save_prompt(&storage));
}

#[test]
fn snapshot_round_trips_with_wire_names() {
    let storage = StorageAdapter::memory();
    let snapshot = ProgressSnapshot { current_language: "hi".to_owned(), dark_mode: true, current_user: Some(Session::demo()) };
    save_progress_snapshot(&storage, &snapshot);

    let raw: serde_json::Value = serde_json::from_str(&storage.read(keys::PROGRESS_SNAPSHOT).unwrap()).unwrap();
    assert_eq!(raw["currentLanguage"], "hi");
    assert_eq!(raw["darkMode"], true);
    assert_eq!(load_progress_snapshot(&storage), Some(snapshot));
}

#[test]
fn missing_snapshot_loads_as_none() {
    assert_eq!(load_progress_snapshot(&StorageAdapter::memory()), None);
}
