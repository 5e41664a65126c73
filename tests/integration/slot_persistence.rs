//! Integration tests for slot files on disk
//!
//! Covers replacement, erasure, encoding modes and the write/read property.

use std::fs;

use proptest::prelude::*;

use super::common::determinism::{pin, DeterministicUuidGenerator};
use super::common::world::{story_interpreter, temp_save_dir, World};
use storysave::runtime::mock::MockSceneLoader;
use storysave::save::{SaveFileNaming, SaveReader, SaveWriter, FLOWCHART_ITEM_KEY};
use storysave::snapshot::{EncodedVariable, VariableKind, VariableSnapshot};
use storysave::{
    ExecutionPosition, MenuOption, Presentation, SaveEncoding, SaveItem, SaveRecord,
};

fn record(scene: &str, block: &str) -> SaveRecord {
    SaveRecord::new(scene, "story")
        .with_position(ExecutionPosition::new(block, 0))
        .with_item(SaveItem::new(FLOWCHART_ITEM_KEY, "story"))
}

#[test]
fn test_replaced_slot_is_gone_after_restart() {
    let dir = temp_save_dir();
    let ids = DeterministicUuidGenerator::new();
    let mut world = World::new(dir.path(), MockSceneLoader::auto(Some("Game")));

    let first = pin(record("Game", "Start").with_slot(1), &ids);
    let second = pin(record("Cellar", "Hall").with_slot(1), &ids);
    world.saves.add_save(first.clone()).unwrap();
    world.saves.add_save(second.clone()).unwrap();

    let reopened = World::new(dir.path(), MockSceneLoader::auto(Some("Game")));
    assert_eq!(reopened.saves.get_save(1), Some(second));
    assert_eq!(reopened.saves.slots().find_record(first.id), None);

    let files: Vec<String> = fs::read_dir(dir.path())
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    assert_eq!(files, vec!["save_01.json".to_string()]);
}

#[test]
fn test_identical_records_produce_identical_files() {
    let dir_a = temp_save_dir();
    let dir_b = temp_save_dir();

    for dir in [&dir_a, &dir_b] {
        let ids = DeterministicUuidGenerator::new();
        let mut world = World::new(dir.path(), MockSceneLoader::auto(Some("Game")));
        world
            .saves
            .add_save(pin(record("Game", "Gost").with_slot(2), &ids))
            .unwrap();
    }

    assert_eq!(
        fs::read(dir_a.path().join("save_02.json")).unwrap(),
        fs::read(dir_b.path().join("save_02.json")).unwrap()
    );
}

#[test]
fn test_erase_then_restart_leaves_slot_empty() {
    let dir = temp_save_dir();
    let mut world = World::new(dir.path(), MockSceneLoader::auto(Some("Game")));
    world
        .saves
        .add_save(record("Game", "Start").with_slot(3))
        .unwrap();

    world.saves.erase_save(3).unwrap();
    world.saves.erase_save(3).unwrap();

    let reopened = World::new(dir.path(), MockSceneLoader::auto(Some("Game")));
    assert!(!reopened.saves.has_any_save());
}

#[test]
fn test_obfuscated_files_need_obfuscated_reader() {
    let dir = temp_save_dir();
    let mut world = World::with_interpreter(
        dir.path(),
        MockSceneLoader::auto(Some("Game")),
        story_interpreter(),
        SaveEncoding::Obfuscated,
    );
    let rec = record("Game", "Gost").with_slot(1);
    world.saves.add_save(rec.clone()).unwrap();

    let raw = fs::read_to_string(dir.path().join("save_01.json")).unwrap();
    assert!(!raw.contains("\"scene_id\""));

    let obfuscated = World::with_interpreter(
        dir.path(),
        MockSceneLoader::auto(Some("Game")),
        story_interpreter(),
        SaveEncoding::Obfuscated,
    );
    assert_eq!(obfuscated.saves.get_save(1), Some(rec));

    let mut plain = World::new(dir.path(), MockSceneLoader::auto(Some("Game")));
    assert!(!plain.saves.has_any_save());
    let failures = plain.saves.refresh_from_disk().unwrap();
    assert_eq!(failures.len(), 1);
}

#[test]
fn test_file_name_decides_slot() {
    let dir = temp_save_dir();
    let writer = SaveWriter::new(SaveEncoding::Plain, 1 << 20);
    writer
        .write(&record("Game", "Start").with_slot(1), &dir.path().join("save_02.json"))
        .unwrap();

    let world = World::new(dir.path(), MockSceneLoader::auto(Some("Game")));

    assert_eq!(world.saves.get_save(1), None);
    assert_eq!(world.saves.get_save(2).map(|r| r.slot_number), Some(2));
}

fn variable_kind() -> impl Strategy<Value = VariableKind> {
    prop_oneof![
        Just(VariableKind::Boolean),
        Just(VariableKind::Integer),
        Just(VariableKind::Float),
        Just(VariableKind::String),
    ]
}

fn variables() -> impl Strategy<Value = VariableSnapshot> {
    prop::collection::btree_map(
        "[a-z][a-z0-9_]{0,11}",
        (variable_kind(), any::<String>()).prop_map(|(kind, value)| EncodedVariable::new(kind, value)),
        0..6,
    )
}

fn presentation() -> impl Strategy<Value = Option<Presentation>> {
    prop::option::of(prop_oneof![
        any::<String>().prop_map(|text| Presentation::Dialog { text }),
        prop::collection::vec(("[ -~]{0,20}", "[A-Za-z]{1,8}"), 0..4).prop_map(|options| {
            Presentation::Menu {
                options: options
                    .into_iter()
                    .map(|(text, target)| MenuOption::new(text, target))
                    .collect(),
            }
        }),
    ])
}

prop_compose! {
    fn save_record()(
        scene in "[A-Za-z][A-Za-z0-9_]{0,15}",
        position in prop::option::of(("[A-Za-z]{1,10}", 0usize..64)),
        variables in variables(),
        presentation in presentation(),
        payloads in prop::collection::vec(("[a-z]{1,8}", any::<String>()), 0..4),
        description in any::<String>(),
    ) -> SaveRecord {
        let mut record = SaveRecord::new(scene, "story")
            .with_slot(1)
            .with_description(description)
            .with_variables(variables)
            .with_item(SaveItem::new(FLOWCHART_ITEM_KEY, "story"));
        record.position = position.map(|(block, index)| ExecutionPosition::new(block, index));
        record.presentation = presentation;
        for (key, payload) in payloads {
            record = record.with_item(SaveItem::new(key, payload));
        }
        record
    }
}

fn encoding() -> impl Strategy<Value = SaveEncoding> {
    prop_oneof![Just(SaveEncoding::Plain), Just(SaveEncoding::Obfuscated)]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_read_of_write_is_identity(record in save_record(), encoding in encoding()) {
        let dir = temp_save_dir();
        let path = dir.path().join("save_01.json");

        SaveWriter::new(encoding, 1 << 20).write(&record, &path).unwrap();
        let naming = SaveFileNaming::new("save", "json").unwrap();
        let read = SaveReader::new(encoding, 1 << 20, naming).read(&path).unwrap();

        prop_assert_eq!(read, record);
    }
}
