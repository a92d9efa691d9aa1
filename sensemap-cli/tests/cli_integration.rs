//! Integration tests for the batch commands (sensemap-cli).
//!
//! Each test runs replay on a small OBJ mesh in a temp directory and then
//! feeds the persisted session to the other commands.

use std::path::{Path, PathBuf};

use sensemap_cli::{export_table, replay, snapshot};
use sensemap_core::{SessionConfig, SessionDocument, SessionStatus};

/// Two triangles forming a square, seen head-on by the default camera.
const SQUARE_OBJ: &str = "\
v -1 -1 0
v 1 -1 0
v 1 1 0
v -1 1 0
f 1 2 3
f 1 3 4
";

/// Select pressure, paint the lower-right triangle, then quit. The final
/// press comes after quit and must be ignored.
const EVENTS: &str = r#"[
    {"type": "command", "command": "select-sensation:pressure"},
    {"type": "pointer_down", "x": 240.0, "y": 170.0},
    {"type": "pointer_up", "x": 240.0, "y": 170.0},
    {"type": "command", "command": "quit"},
    {"type": "pointer_down", "x": 100.0, "y": 100.0}
]"#;

fn setup(dir: &Path) -> (SessionConfig, PathBuf, PathBuf) {
    let mesh = dir.join("square.obj");
    let events = dir.join("events.json");
    std::fs::write(&mesh, SQUARE_OBJ).expect("write mesh");
    std::fs::write(&events, EVENTS).expect("write events");

    let mut config = SessionConfig::new().with_output_dir(dir.join("Foot Maps"));
    config.viewport_width = 400;
    config.viewport_height = 300;
    (config, mesh, events)
}

#[test]
fn test_replay_paints_and_stops_at_quit() {
    let dir = tempfile::tempdir().expect("tempdir");
    let (config, mesh, events) = setup(dir.path());
    let session = dir.path().join("session.json");

    let summary = replay(&config, &mesh, &events, Some(&session)).expect("replay");
    assert_eq!(summary.events, 5);
    assert_eq!(summary.dispatched, 4);
    assert_eq!(summary.painted_faces, 1);
    assert_eq!(summary.status, SessionStatus::Closed);

    let doc = SessionDocument::load(&session).expect("load");
    let (_, store) = doc.into_parts().expect("parts");
    assert_eq!(store.get(0), Some(sensemap_core::Sensation::Pressure.color()));
    assert!(store.get(1).is_some_and(|c| c.is_unpainted()));
}

#[test]
fn test_export_table_from_replayed_session() {
    let dir = tempfile::tempdir().expect("tempdir");
    let (config, mesh, events) = setup(dir.path());
    let session = dir.path().join("session.json");
    replay(&config, &mesh, &events, Some(&session)).expect("replay");

    let csv = dir.path().join("faces.csv");
    let rows = export_table(&session, &csv).expect("export");
    assert_eq!(rows, 2);

    let text = std::fs::read_to_string(&csv).expect("read");
    let lines: Vec<_> = text.lines().collect();
    assert_eq!(lines[0], "Face_Index,Vertex_Coordinates,Red,Green,Blue");
    assert_eq!(
        lines[1],
        "0,\"(-1.0, -1.0, 0.0); (1.0, -1.0, 0.0); (1.0, 1.0, 0.0)\",1.0,0.5,0.0"
    );
    assert!(lines[2].ends_with(",0.8,0.8,0.8"));
}

#[test]
fn test_snapshot_writes_png() {
    let dir = tempfile::tempdir().expect("tempdir");
    let (config, mesh, events) = setup(dir.path());
    let session = dir.path().join("session.json");
    replay(&config, &mesh, &events, Some(&session)).expect("replay");

    let path = snapshot(&config, &session).expect("snapshot");
    assert!(path.starts_with(dir.path().join("Foot Maps")));
    let bytes = std::fs::read(&path).expect("read png");
    assert_eq!(&bytes[..8], b"\x89PNG\r\n\x1a\n");
}

#[test]
fn test_replay_without_output_keeps_nothing() {
    let dir = tempfile::tempdir().expect("tempdir");
    let (config, mesh, events) = setup(dir.path());
    let summary = replay(&config, &mesh, &events, None).expect("replay");
    assert_eq!(summary.painted_faces, 1);
    assert!(!dir.path().join("Foot Maps").exists());
}

#[test]
fn test_missing_mesh_reports_path() {
    let dir = tempfile::tempdir().expect("tempdir");
    let (config, _, events) = setup(dir.path());
    let err = replay(&config, &dir.path().join("nope.obj"), &events, None).expect_err("missing");
    assert!(format!("{err:#}").contains("nope.obj"));
}

#[test]
fn test_bad_events_file() {
    let dir = tempfile::tempdir().expect("tempdir");
    let (config, mesh, _) = setup(dir.path());
    let events = dir.path().join("bad.json");
    std::fs::write(&events, r#"[{"type": "teleport"}]"#).expect("write");
    assert!(replay(&config, &mesh, &events, None).is_err());
}
