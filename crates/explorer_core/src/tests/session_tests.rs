use std::time::Duration;

use super::*;
use shared::domain::{LevelId, DESKTOP_ID, DOCUMENTS_ID, PROJECTS_ID, TRASH_ID};
use shared::protocol::TutorialPhase;

fn instant_settings() -> Settings {
    Settings {
        step_advance_delay_ms: 0,
        ..Settings::default()
    }
}

fn session() -> (ExplorerSession, Receiver<Notification>) {
    ExplorerSession::new(instant_settings()).expect("session")
}

fn desktop_id_named(session: &ExplorerSession, name: &str) -> NodeId {
    session
        .children(DESKTOP_ID)
        .into_iter()
        .find(|node| node.name == name)
        .map(|node| node.id)
        .expect("node on desktop")
}

#[test]
fn create_folder_selects_and_marks_for_rename() {
    let (mut session, _rx) = session();
    session.execute(Command::CreateFolder).expect("create");
    let id = desktop_id_named(&session, "New Folder");
    assert_eq!(session.renaming(), Some(id));
    assert_eq!(session.selection(), &[id]);

    session
        .execute(Command::Rename {
            id,
            name: "Photos".into(),
        })
        .expect("rename");
    assert_eq!(session.renaming(), None);
}

#[test]
fn create_is_rejected_in_trash_and_during_search() {
    let (mut session, _rx) = session();
    session
        .execute(Command::SetWorkingFolder { id: TRASH_ID })
        .expect("navigate");
    assert_eq!(
        session.execute(Command::CreateFile),
        Err(SessionError::Fs(FsError::ReadOnlyLocation(TRASH_ID)))
    );

    session.execute(Command::NavigateUp).expect("up from root is a no-op");
    session
        .execute(Command::SetWorkingFolder { id: DESKTOP_ID })
        .expect("navigate");
    session
        .execute(Command::SetSearchQuery {
            query: "notes".into(),
        })
        .expect("search");
    assert!(session.execute(Command::CreateFolder).is_err());
    assert!(session.children(DESKTOP_ID).is_empty());
}

#[test]
fn unknown_extension_rename_notifies_and_succeeds() {
    let (mut session, rx) = session();
    session.execute(Command::CreateFile).expect("create");
    let id = desktop_id_named(&session, "New Text Document.txt");

    session
        .execute(Command::Rename {
            id,
            name: "a.xyz".into(),
        })
        .expect("rename");
    let note = rx.try_recv().expect("advisory");
    assert_eq!(note.title, "Unknown File Type");
    assert!(note.message.contains("\".xyz\""));
    assert_eq!(note.severity, Severity::Info);
    assert_eq!(
        session.node(id).expect("node").file_type,
        FileType::Unknown
    );
}

#[test]
fn protected_delete_notifies_and_changes_nothing() {
    let (mut session, rx) = session();
    session
        .execute(Command::SetWorkingFolder { id: shared::domain::LEARNER_ID })
        .expect("navigate");
    session
        .execute(Command::SelectExclusive { id: DOCUMENTS_ID })
        .expect("select");

    let err = session.execute(Command::Delete).expect_err("protected");
    assert_eq!(err.code(), shared::error::ErrorCode::PermissionDenied);
    assert!(!session.store().is_in_trash(DOCUMENTS_ID));
    assert_eq!(session.selection(), &[DOCUMENTS_ID]);

    let note = rx.try_recv().expect("notification");
    assert_eq!(note.title, "Permission Denied");
    assert!(note.message.contains("\"Documents\""));
}

#[test]
fn delete_inside_trash_is_permanent() {
    let (mut session, _rx) = session();
    session.execute(Command::CreateFile).expect("create");
    let id = desktop_id_named(&session, "New Text Document.txt");
    session.execute(Command::Delete).expect("soft delete");
    assert!(session.store().is_in_trash(id));

    session
        .execute(Command::SetWorkingFolder { id: TRASH_ID })
        .expect("navigate");
    session
        .execute(Command::SelectExclusive { id })
        .expect("select");
    session.execute(Command::Delete).expect("hard delete");
    assert!(session.node(id).is_none());
    assert!(session.selection().is_empty());
}

#[test]
fn purged_level_seed_stays_gone() {
    let settings = Settings {
        start_level: 3,
        ..instant_settings()
    };
    let (mut session, _rx) = ExplorerSession::new(settings).expect("session");
    let secret = NodeId(301);
    assert!(session.store().contains(secret));

    session
        .execute(Command::SelectExclusive { id: secret })
        .expect("select");
    session.execute(Command::Delete).expect("soft delete");
    session
        .execute(Command::SelectExclusive { id: secret })
        .expect("select");
    session.execute(Command::HardDelete).expect("purge");
    assert!(!session.store().contains(secret));

    session.execute(Command::ClearSelection).expect("clear");
    session
        .execute(Command::SetWorkingFolder { id: PROJECTS_ID })
        .expect("navigate");
    assert!(!session.store().contains(secret));
    assert!(session.children(PROJECTS_ID).is_empty());
    assert_eq!(session.level_state().current_step, 0);
}

#[test]
fn empty_paste_is_ignored_in_trash_and_during_search() {
    let (mut session, _rx) = session();
    session
        .execute(Command::SetWorkingFolder { id: TRASH_ID })
        .expect("navigate");
    assert_eq!(session.execute(Command::Paste), Ok(()));

    session
        .execute(Command::SetWorkingFolder { id: DESKTOP_ID })
        .expect("navigate");
    session
        .execute(Command::SetSearchQuery {
            query: "notes".into(),
        })
        .expect("search");
    assert_eq!(session.execute(Command::Paste), Ok(()));
    assert!(session.children(DESKTOP_ID).is_empty());
}

#[test]
fn paste_into_trashed_folder_is_rejected() {
    let (mut session, _rx) = session();
    session.execute(Command::CreateFolder).expect("create");
    let bin = desktop_id_named(&session, "New Folder");
    session.execute(Command::Delete).expect("soft delete");
    session
        .execute(Command::SelectExclusive { id: DOCUMENTS_ID })
        .expect("select");
    session.execute(Command::Copy).expect("copy");

    session
        .execute(Command::SetWorkingFolder { id: bin })
        .expect("navigate");
    assert_eq!(
        session.execute(Command::Paste),
        Err(SessionError::Fs(FsError::ReadOnlyLocation(bin)))
    );
    assert!(session.children(bin).is_empty());
}

#[test]
fn restore_outside_trash_view_is_rejected() {
    let (mut session, _rx) = session();
    session.execute(Command::CreateFile).expect("create");
    let id = desktop_id_named(&session, "New Text Document.txt");
    session.execute(Command::Delete).expect("soft delete");
    session
        .execute(Command::SelectExclusive { id })
        .expect("select");

    assert_eq!(
        session.execute(Command::Restore),
        Err(SessionError::Fs(FsError::NotInTrash(DESKTOP_ID)))
    );
    assert!(session.store().is_in_trash(id));

    session
        .execute(Command::SetWorkingFolder { id: TRASH_ID })
        .expect("navigate");
    session
        .execute(Command::SelectExclusive { id })
        .expect("select");
    session.execute(Command::Restore).expect("restore");
    assert_eq!(session.node(id).and_then(|node| node.parent_id), Some(DESKTOP_ID));
}

#[test]
fn invalid_drop_is_reported_without_notification() {
    let (mut session, rx) = session();
    session.execute(Command::CreateFolder).expect("create");
    let folder = desktop_id_named(&session, "New Folder");
    session.execute(Command::DragStart { id: folder }).expect("drag");

    let err = session
        .execute(Command::Drop { target: folder })
        .expect_err("self drop");
    assert_eq!(err.code(), shared::error::ErrorCode::InvalidDrop);
    assert!(rx.try_recv().is_err());
    assert_eq!(
        session.node(folder).expect("folder").parent_id,
        Some(DESKTOP_ID)
    );
}

#[test]
fn search_replaces_visible_items() {
    let (mut session, _rx) = session();
    assert!(session.visible_items().is_empty());
    session
        .execute(Command::SetSearchQuery {
            query: "proj".into(),
        })
        .expect("search");
    let names: Vec<&str> = session
        .visible_items()
        .iter()
        .map(|node| node.name.as_str())
        .collect();
    assert_eq!(names, vec!["Projects"]);

    session
        .execute(Command::Open { id: PROJECTS_ID })
        .expect("open");
    assert_eq!(session.current_folder(), PROJECTS_ID);
    assert_eq!(session.search_query(), "");
}

#[test]
fn opening_system_file_notifies() {
    let settings = Settings {
        start_level: 4,
        ..instant_settings()
    };
    let (mut session, rx) = ExplorerSession::new(settings).expect("session");
    let system = desktop_id_named(&session, "System.sys");

    session.execute(Command::Tap { id: system }).expect("tap opens");
    let note = rx.try_recv().expect("notification");
    assert_eq!(note.title, "System File");
}

#[test]
fn touch_multi_select_feeds_clipboard() {
    let (mut session, _rx) = session();
    session.execute(Command::CreateFile).expect("a");
    session.execute(Command::CreateFile).expect("b");
    let ids: Vec<NodeId> = session
        .children(DESKTOP_ID)
        .iter()
        .map(|node| node.id)
        .collect();

    session
        .execute(Command::LongPress { id: ids[0] })
        .expect("long press");
    session.execute(Command::Tap { id: ids[1] }).expect("tap");
    assert_eq!(session.selection(), ids.as_slice());
    assert_eq!(session.current_folder(), DESKTOP_ID);

    session.execute(Command::Copy).expect("copy");
    assert_eq!(session.clipboard().expect("clipboard").item_ids, ids);
    session.execute(Command::ExitMultiSelect).expect("exit");
    assert!(!session.in_multi_select());
    assert!(session.selection().is_empty());
}

#[test]
fn notification_overflow_is_dropped() {
    let settings = Settings {
        notification_capacity: 1,
        ..instant_settings()
    };
    let (mut session, rx) = ExplorerSession::new(settings).expect("session");
    session
        .execute(Command::SelectExclusive { id: DESKTOP_ID })
        .expect("select");
    assert!(session.execute(Command::Delete).is_err());
    assert!(session.execute(Command::Delete).is_err());

    assert_eq!(rx.len(), 1);
}

#[test]
fn pacing_delay_holds_progress_until_tick() {
    let (mut session, _rx) = ExplorerSession::new(Settings::default()).expect("session");
    let start = Instant::now();
    session
        .execute_at(Command::CreateFolder, start)
        .expect("create");
    assert_eq!(session.level_state().current_step, 0);
    let deadline = session.pending_advance().expect("scheduled");
    assert_eq!(deadline, start + Duration::from_millis(500));

    session.tick(start + Duration::from_millis(200));
    assert_eq!(session.level_state().current_step, 0);
    session.tick(deadline);
    assert_eq!(session.level_state().current_step, 1);
    assert_eq!(
        session.progress().phase,
        TutorialPhase::InStep {
            level: LevelId(1),
            step: 1
        }
    );
}

#[test]
fn acknowledgement_out_of_turn_is_rejected() {
    let (mut session, _rx) = session();
    assert!(matches!(
        session.execute(Command::AcknowledgeLevelComplete),
        Err(SessionError::Tutorial(_))
    ));
}

#[test]
fn status_snapshot_serializes() {
    let (mut session, _rx) = session();
    session.execute(Command::CreateFolder).expect("create");
    let status = session.status();
    assert_eq!(status.breadcrumbs, vec!["C:", "Users", "Learner", "Desktop"]);
    assert_eq!(status.items.len(), 1);

    let json = serde_json::to_value(&status).expect("json");
    assert_eq!(json["progress"]["phase"]["state"], "in_step");
    assert!(json.get("search_query").is_none());
}
