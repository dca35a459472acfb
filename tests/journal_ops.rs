//! Journal operations against a disk-backed journal

use chrono::Datelike;
use keepsake::prelude::*;
use keepsake::{MediaKind, EXPORTS_DIR, RECORDS_FILE};
use proptest::prelude::*;
use std::fs;
use tempfile::tempdir;

fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[test]
fn test_records_persist_across_reopen() {
    let dir = tempdir().unwrap();
    let root = dir.path().join("journal");

    let (memory_id, user_id) = {
        let journal = Journal::open(&root).unwrap();
        let memory = journal
            .add_memory(NewMemory::new("Hike", ymd(2023, 9, 9), "Foggy summit"))
            .unwrap();
        journal
            .add_anniversary(NewAnniversary::new("Adopted the cat", ymd(2021, 6, 1)))
            .unwrap();
        let user = journal.ensure_default_user().unwrap();
        (memory.id, user.id)
    };
    assert!(root.join(RECORDS_FILE).exists());

    let journal = Journal::open(&root).unwrap();
    assert_eq!(journal.memory(memory_id).unwrap().unwrap().title, "Hike");
    assert_eq!(journal.anniversaries().unwrap().len(), 1);
    assert_eq!(journal.current_user().unwrap().unwrap().id, user_id);
    assert_eq!(journal.ensure_default_user().unwrap().id, user_id);
}

#[test]
fn test_ids_not_reused_after_delete() {
    let dir = tempdir().unwrap();
    let journal = Journal::open(dir.path()).unwrap();
    let first = journal
        .add_memory(NewMemory::new("a", ymd(2024, 1, 1), "m"))
        .unwrap();
    journal.delete_memory(first.id).unwrap();
    let second = journal
        .add_memory(NewMemory::new("b", ymd(2024, 1, 1), "m"))
        .unwrap();
    assert!(second.id > first.id);
}

#[test]
fn test_memories_listed_newest_first() {
    let dir = tempdir().unwrap();
    let journal = Journal::open(dir.path()).unwrap();
    for (title, day) in [("mid", 15), ("early", 1), ("late", 28)] {
        journal
            .add_memory(NewMemory::new(title, ymd(2024, 2, day), "m"))
            .unwrap();
    }
    let titles: Vec<_> = journal.memories().unwrap().into_iter().map(|m| m.title).collect();
    assert_eq!(titles, vec!["late", "mid", "early"]);
}

#[test]
fn test_export_dir_override() {
    let dir = tempdir().unwrap();
    let backups = dir.path().join("backups");
    let journal = Journal::builder()
        .path(dir.path().join("journal"))
        .export_dir(&backups)
        .compression_level(19)
        .open()
        .unwrap();
    journal
        .add_memory(NewMemory::new("t", ymd(2024, 1, 1), "m"))
        .unwrap();

    let info = journal.export_archive().unwrap();
    assert!(info.path.unwrap().starts_with(&backups));
    assert!(!dir.path().join("journal").join(EXPORTS_DIR).exists());
}

#[test]
fn test_text_export_contents() {
    let dir = tempdir().unwrap();
    let journal = Journal::open(dir.path()).unwrap();
    let photo = journal.save_photo(b"jpeg").unwrap();
    journal
        .add_memory(
            NewMemory::new("Museum", ymd(2024, 4, 2), "Dinosaurs")
                .with_photos([photo.to_string_lossy()])
                .with_audio("/gone/audio_1.3gp"),
        )
        .unwrap();
    journal
        .add_anniversary(NewAnniversary::new("Met", ymd(2019, 5, 20)).with_description("Library"))
        .unwrap();

    let path = journal.export_text().unwrap();
    let text = fs::read_to_string(path).unwrap();
    assert!(text.starts_with("=== Our Memories ===\n"));
    assert!(text.contains(
        "=== Anniversaries ===\nMet\nDate: 2019-05-20\nDescription: Library\n"
    ));
    assert!(text.contains(
        "Museum\nDate: 2024-04-02\nMessage: Dinosaurs\nPhotos: 1\nVoice note: yes\n---\n"
    ));
}

#[test]
fn test_clear_memories_removes_media() {
    let dir = tempdir().unwrap();
    let journal = Journal::open(dir.path()).unwrap();
    for _ in 0..3 {
        let photo = journal.save_photo(b"jpeg").unwrap();
        journal
            .add_memory(
                NewMemory::new("t", ymd(2024, 1, 1), "m").with_photos([photo.to_string_lossy()]),
            )
            .unwrap();
    }
    assert_eq!(journal.media().list(MediaKind::Image).unwrap().len(), 3);

    assert_eq!(journal.clear_memories().unwrap(), 3);
    assert!(journal.media().list(MediaKind::Image).unwrap().is_empty());
}

#[test]
fn test_random_memory_is_one_of_stored() {
    let dir = tempdir().unwrap();
    let journal = Journal::open(dir.path()).unwrap();
    assert!(journal.random_memory().unwrap().is_none());

    let ids: Vec<_> = (1..=5)
        .map(|d| {
            journal
                .add_memory(NewMemory::new("t", ymd(2024, 1, d), "m"))
                .unwrap()
                .id
        })
        .collect();
    for _ in 0..10 {
        let picked = journal.random_memory().unwrap().unwrap();
        assert!(ids.contains(&picked.id));
    }
}

#[test]
fn test_failed_edit_leaves_record_untouched() {
    let dir = tempdir().unwrap();
    let journal = Journal::open(dir.path()).unwrap();
    let memory = journal
        .add_memory(NewMemory::new("Keep", ymd(2024, 1, 1), "me"))
        .unwrap();

    let err = journal
        .edit_memory(memory.id, NewMemory::new("Keep", ymd(2024, 1, 1), "   "))
        .unwrap_err();
    assert!(err.is_invalid_input());
    assert_eq!(journal.memory(memory.id).unwrap().unwrap().message, "me");
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_days_until_next_occurrence_within_a_year(
        y in 1990i32..2030, m in 1u32..=12, d in 1u32..=28,
        ty in 2024i32..2040, tm in 1u32..=12, td in 1u32..=28,
    ) {
        let date = ymd(y, m, d);
        let today = ymd(ty, tm, td);
        let next = Journal::next_occurrence(date, today).unwrap();
        let days = Journal::days_until(next, today);
        prop_assert!((0..=366).contains(&days));
        prop_assert_eq!(Journal::days_since(today, next), days);
        prop_assert_eq!((next.month(), next.day()), (m, d));
    }
}
