//! Integration tests for the save-then-resume flow
//!
//! Each test saves in one world, then loads in a second world sharing only
//! the save directory, the way a restarted process would.

use std::sync::Arc;
use std::time::Duration;

use super::common::world::{story_interpreter, temp_save_dir, World};
use storysave::runtime::mock::{MockInterpreter, MockSceneLoader, RecordingSubloader};
use storysave::snapshot::{VariableRestoreIssue, VariableValue};
use storysave::{
    ExecutionPosition, Interpreter, LoadError, LoadEvent, LoaderState, MenuOption, Presentation,
    Presenter, ResumeError, SaveEncoding, SceneLoader,
};

/// Play to Gost#3 with score=5, seen=true and save into slot `slot`
fn play_and_save(world: &mut World, slot: u32) {
    world.interpreter.execute_from("Start", 0);
    world.interpreter.assign_variable("score", VariableValue::Integer(5));
    world.interpreter.assign_variable("seen", VariableValue::Boolean(true));
    world.interpreter.halt_all();
    world.interpreter.execute_from("Gost", 3);

    let saver = world.saver();
    world.saves.select(slot).unwrap();
    world.saves.save_to_selected_slot(&saver).unwrap();
}

#[tokio::test]
async fn test_resume_fidelity_after_restart() {
    let dir = temp_save_dir();
    let mut first = World::new(dir.path(), MockSceneLoader::auto(Some("Game")));
    play_and_save(&mut first, 1);
    drop(first);

    let second = World::new(dir.path(), MockSceneLoader::auto(Some("Game")));
    assert!(second.saves.has_any_save());

    let mut loader = second.loader();
    let report = loader.load_latest(&second.saves).await.unwrap();

    assert!(report.resumed);
    assert!(report.variables.is_clean());
    assert_eq!(
        second.interpreter.current_position(),
        Some(ExecutionPosition::new("Gost", 3))
    );
    assert_eq!(second.interpreter.running_cursors(), 1);
    assert_eq!(
        second.interpreter.variable("score"),
        Some(VariableValue::Integer(5))
    );
    assert_eq!(
        second.interpreter.variable("seen"),
        Some(VariableValue::Boolean(true))
    );
}

#[tokio::test]
async fn test_scene_mismatch_loads_scene_once_and_restores_once() {
    let dir = temp_save_dir();
    let mut first = World::new(dir.path(), MockSceneLoader::auto(Some("Game")));
    play_and_save(&mut first, 2);

    let second = World::new(dir.path(), MockSceneLoader::deferred(Some("MainMenu")));
    second.scenes.ready_first_for("Loading");
    let inventory = Arc::new(RecordingSubloader::new("inventory", 0, "inventory"));
    second.registry.register(&inventory);

    let mut loader = second.loader();
    let mut events = loader.subscribe();
    let report = loader.load_slot(&second.saves, 2).await.unwrap();

    assert!(report.scene_changed);
    assert_eq!(second.scenes.requests(), vec!["Game".to_string()]);
    assert_eq!(second.scenes.active_scene().as_deref(), Some("Game"));
    assert_eq!(second.scenes.subscriber_count(), 0);
    assert_eq!(inventory.load_calls(), 1);
    assert_eq!(
        second.interpreter.execution_log(),
        vec![ExecutionPosition::new("Gost", 3)]
    );

    let mut restoring = 0;
    let mut completed = 0;
    while let Ok(event) = events.try_recv() {
        match event {
            LoadEvent::StateChanged(LoaderState::RestoringState) => restoring += 1,
            LoadEvent::Completed(_) => completed += 1,
            _ => {}
        }
    }
    assert_eq!(restoring, 1);
    assert_eq!(completed, 1);
}

#[tokio::test]
async fn test_bad_block_leaves_world_idle() {
    let dir = temp_save_dir();
    let mut first = World::new(dir.path(), MockSceneLoader::auto(Some("Game")));
    play_and_save(&mut first, 1);

    // A later build renamed Gost.
    let rewritten = MockInterpreter::new("story")
        .with_block("Start", 2)
        .with_block("Ghost", 5)
        .with_variable("score", VariableValue::Integer(0))
        .with_variable("seen", VariableValue::Boolean(false));
    let second = World::with_interpreter(
        dir.path(),
        MockSceneLoader::auto(Some("Game")),
        rewritten,
        SaveEncoding::Plain,
    );
    second.interpreter.execute_from("Start", 0);
    second.presenter.show_dialog("Title screen");

    let mut loader = second.loader();
    let err = loader.load_slot(&second.saves, 1).await.unwrap_err();

    assert_eq!(
        err,
        LoadError::Resume(ResumeError::PositionNotFound {
            block_id: "Gost".into()
        })
    );
    assert_eq!(loader.state(), &LoaderState::Idle);
    assert_eq!(second.interpreter.current_position(), None);
    assert_eq!(
        second.interpreter.variable("score"),
        Some(VariableValue::Integer(0))
    );
    assert_eq!(
        second.presenter.active_dialog_text().as_deref(),
        Some("Title screen")
    );
}

#[tokio::test]
async fn test_removed_variable_does_not_abort_restore() {
    let dir = temp_save_dir();
    let mut first = World::new(dir.path(), MockSceneLoader::auto(Some("Game")));
    play_and_save(&mut first, 1);

    let trimmed = MockInterpreter::new("story")
        .with_block("Gost", 5)
        .with_variable("score", VariableValue::Integer(0));
    let second = World::with_interpreter(
        dir.path(),
        MockSceneLoader::auto(Some("Game")),
        trimmed,
        SaveEncoding::Plain,
    );

    let mut loader = second.loader();
    let report = loader.load_latest(&second.saves).await.unwrap();

    assert_eq!(report.variables.restored, 1);
    assert_eq!(
        report.variables.issues,
        vec![VariableRestoreIssue::Missing { key: "seen".into() }]
    );
    assert_eq!(
        second.interpreter.variable("score"),
        Some(VariableValue::Integer(5))
    );
    assert!(report.resumed);
}

#[tokio::test]
async fn test_dialog_is_restored_alone() {
    let dir = temp_save_dir();
    let mut first = World::new(dir.path(), MockSceneLoader::auto(Some("Game")));
    first.presenter.show_dialog("The ghost whispers your name.");
    play_and_save(&mut first, 3);

    let saved = first.saves.get_save(3).unwrap();
    assert_eq!(
        saved.presentation,
        Some(Presentation::Dialog {
            text: "The ghost whispers your name.".into()
        })
    );

    let second = World::new(dir.path(), MockSceneLoader::auto(Some("Game")));
    second
        .presenter
        .show_menu(&[MenuOption::new("New game", "Start")]);
    let mut loader = second.loader();
    let report = loader.load_slot(&second.saves, 3).await.unwrap();

    assert!(report.presentation_restored);
    assert_eq!(second.ticker.frames(), 1);
    assert_eq!(
        second.presenter.active_dialog_text().as_deref(),
        Some("The ghost whispers your name.")
    );
    assert_eq!(second.presenter.active_menu_options(), None);
}

#[tokio::test]
async fn test_menu_is_recreated_with_surviving_targets() {
    let dir = temp_save_dir();
    let mut first = World::new(dir.path(), MockSceneLoader::auto(Some("Game")));
    first.presenter.show_menu(&[
        MenuOption::new("Follow the ghost", "Hall"),
        MenuOption::new("Run", "Exit"),
    ]);
    play_and_save(&mut first, 1);

    let without_exit = MockInterpreter::new("story")
        .with_block("Gost", 5)
        .with_block("Hall", 4);
    let second = World::with_interpreter(
        dir.path(),
        MockSceneLoader::auto(Some("Game")),
        without_exit,
        SaveEncoding::Plain,
    );
    let mut loader = second.loader();
    loader.load_latest(&second.saves).await.unwrap();

    assert_eq!(
        second.presenter.active_menu_options(),
        Some(vec![MenuOption::new("Follow the ghost", "Hall")])
    );
    assert_eq!(second.presenter.active_dialog_text(), None);
}

#[tokio::test]
async fn test_subloader_items_round_trip_through_disk() {
    let dir = temp_save_dir();
    let mut first = World::new(dir.path(), MockSceneLoader::auto(Some("Game")));
    let inventory =
        Arc::new(RecordingSubloader::new("inventory", 10, "inventory").capturing("lantern"));
    let journal = Arc::new(RecordingSubloader::new("journal", 1, "journal").capturing("page-4"));
    first.registry.register(&journal);
    first.registry.register(&inventory);
    play_and_save(&mut first, 1);

    let second = World::new(dir.path(), MockSceneLoader::auto(Some("Game")));
    let order = Arc::new(parking_lot::Mutex::new(Vec::new()));
    let inventory = Arc::new(
        RecordingSubloader::new("inventory", 10, "inventory").with_log(order.clone()),
    );
    let journal =
        Arc::new(RecordingSubloader::new("journal", 1, "journal").with_log(order.clone()));
    second.registry.register(&journal);
    second.registry.register(&inventory);

    let mut loader = second.loader();
    loader.load_latest(&second.saves).await.unwrap();

    assert_eq!(
        *order.lock(),
        vec!["inventory".to_string(), "journal".to_string()]
    );
    assert_eq!(inventory.last_items()[0].payload, "lantern");
    assert_eq!(journal.last_items()[0].payload, "page-4");
}

#[tokio::test]
async fn test_progress_marker_restored_before_resume() {
    let dir = temp_save_dir();
    let mut first = World::new(dir.path(), MockSceneLoader::auto(Some("Game")));
    assert!(first.interpreter.set_latest_progress_marker("chapter-1"));
    play_and_save(&mut first, 1);

    let second = World::new(dir.path(), MockSceneLoader::auto(Some("Game")));
    let mut loader = second.loader();
    loader.load_latest(&second.saves).await.unwrap();

    assert_eq!(
        second.interpreter.latest_progress_marker().as_deref(),
        Some("chapter-1")
    );
}

#[tokio::test]
async fn test_load_latest_without_saves() {
    let dir = temp_save_dir();
    let world = World::new(dir.path(), MockSceneLoader::auto(Some("Game")));

    let mut loader = world.loader();
    assert_eq!(
        loader.load_latest(&world.saves).await.unwrap_err(),
        LoadError::NoSaves
    );
    assert_eq!(
        loader.load_slot(&world.saves, 2).await.unwrap_err(),
        LoadError::EmptySlot(2)
    );
}

#[tokio::test(start_paused = true)]
async fn test_scene_that_never_loads_times_out_and_unregisters() {
    let dir = temp_save_dir();
    let mut first = World::new(dir.path(), MockSceneLoader::auto(Some("Game")));
    play_and_save(&mut first, 1);

    let second = World::with_interpreter(
        dir.path(),
        MockSceneLoader::manual(Some("MainMenu")),
        story_interpreter(),
        SaveEncoding::Plain,
    );
    let mut loader = second
        .loader()
        .with_scene_ready_timeout(Some(Duration::from_millis(500)));

    let err = loader.load_latest(&second.saves).await.unwrap_err();

    assert_eq!(
        err,
        LoadError::SceneTimeout {
            scene_id: "Game".into(),
            waited_ms: 500
        }
    );
    assert_eq!(second.scenes.subscriber_count(), 0);
    assert!(second.interpreter.execution_log().is_empty());
}
