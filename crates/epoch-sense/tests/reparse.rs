//! Integration tests for full reparse cycles over on-disk workspaces.
//!
//! Covers the staleness gate, per-file failure isolation, snapshot swapping
//! and the end-to-end path from files on disk to symbol queries.

use std::cell::RefCell;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use epoch_sense::clock::ManualClock;
use epoch_sense::{
    FileErrorKind, FileOutcome, ItemId, NavigationError, Navigator, NodeTree, Project,
    STALENESS_THRESHOLD,
};
use tempfile::TempDir;

/// Create a temporary workspace with the given files and a project over it.
fn workspace_with_files(files: &[(&str, &str)]) -> (TempDir, Project, Arc<ManualClock>) {
    let dir = tempfile::tempdir().expect("should create temp dir");

    for (path, content) in files {
        let full_path = dir.path().join(path);
        if let Some(parent) = full_path.parent() {
            fs::create_dir_all(parent).expect("should create parent dirs");
        }
        fs::write(&full_path, content).expect("should write file");
    }

    let clock = Arc::new(ManualClock::new());
    let project = Project::open(dir.path())
        .expect("should open project")
        .with_clock(Arc::clone(&clock));
    (dir, project, clock)
}

fn canonical(dir: &TempDir, rel: &str) -> PathBuf {
    dir.path()
        .join(rel)
        .canonicalize()
        .expect("file should exist")
}

// === End to end ===

#[test]
fn good_and_bad_files_end_to_end() {
    let (dir, mut project, _clock) = workspace_with_files(&[
        ("a.epoch", "sumtype Shape = Circle | Square"),
        ("b.epoch", "###invalid###"),
    ]);

    let stats = project
        .parse_if_outdated()
        .expect("first call should reparse");

    assert!(project.is_recognized_type("Shape"));
    let diagnostics = project.diagnostics();
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].document, canonical(&dir, "b.epoch"));
    assert_eq!((diagnostics[0].line, diagnostics[0].column), (0, 0));

    assert_eq!(stats.files_parsed, 2);
    assert_eq!(stats.files_failed, 1);
    assert_eq!(stats.declarations, 1);
    assert_eq!(stats.diagnostics, 1);
}

#[test]
fn bad_file_before_good_file_does_not_stop_walk() {
    let (dir, mut project, _clock) = workspace_with_files(&[
        ("a.epoch", "sumtype Broken Circle"),
        ("z.epoch", "sumtype Answer = yes | no"),
    ]);

    project.reparse();

    assert!(project.is_recognized_type("Answer"));
    assert!(!project.is_recognized_type("Broken"));
    assert_eq!(project.diagnostics().len(), 1);
    assert_eq!(project.diagnostics()[0].document, canonical(&dir, "a.epoch"));

    let snapshot = project.snapshot();
    let record = snapshot
        .source_file(&canonical(&dir, "z.epoch"))
        .expect("good file should have a record");
    assert_eq!(record.outcome, FileOutcome::Success);
    assert_eq!(record.declarations, 1);
}

#[test]
fn non_source_files_are_ignored() {
    let (_dir, mut project, _clock) = workspace_with_files(&[
        ("notes.txt", "###invalid###"),
        ("lib/Shapes.EPOCH", "sumtype Shape = Circle"),
    ]);

    let stats = project.reparse();

    assert_eq!(stats.files_parsed, 1);
    assert!(project.is_recognized_type("Shape"));
    assert!(project.diagnostics().is_empty());
}

#[test]
fn sub_project_sources_are_parsed() {
    let (_dir, mut project, _clock) = workspace_with_files(&[
        ("main.epoch", "sumtype Outer = A"),
        ("shared/project.epochproj", ""),
        ("shared/inner.epoch", "sumtype Inner = B"),
    ]);

    project.reparse();

    assert_eq!(project.available_type_names(), ["Inner", "Outer"]);
}

#[test]
fn leading_block_comment_does_not_hide_declarations() {
    let (_dir, mut project, _clock) = workspace_with_files(&[(
        "a.epoch",
        "/* shapes\n * used by the renderer **/\nsumtype Shape = Circle | Square // two\n",
    )]);

    let stats = project.reparse();

    assert!(project.is_recognized_type("Shape"));
    assert!(project.diagnostics().is_empty());
    assert_eq!(stats.files_failed, 0);
}

// === Staleness gate ===

#[test]
fn two_calls_within_threshold_walk_once() {
    let (dir, mut project, clock) =
        workspace_with_files(&[("a.epoch", "sumtype Shape = Circle")]);

    assert!(project.parse_if_outdated().is_some());
    let first = project.snapshot();

    // A change on disk is invisible until the gate reopens.
    fs::write(dir.path().join("a.epoch"), "sumtype Color = Red").expect("should rewrite file");
    clock.advance(Duration::from_secs(14));

    assert!(project.parse_if_outdated().is_none());
    assert_eq!(*project.snapshot(), *first);
    assert!(project.is_recognized_type("Shape"));

    clock.advance(Duration::from_secs(1));
    assert!(project.parse_if_outdated().is_some());
    assert!(project.is_recognized_type("Color"));
    assert!(!project.is_recognized_type("Shape"));
}

#[test]
fn threshold_is_fifteen_seconds() {
    assert_eq!(STALENESS_THRESHOLD, Duration::from_secs(15));
}

// === Rebuild semantics ===

#[test]
fn consecutive_reparses_of_unchanged_tree_are_identical() {
    let (_dir, mut project, _clock) = workspace_with_files(&[
        ("a.epoch", "sumtype Shape = Circle | Square"),
        ("b.epoch", "sumtype Maybe<type T> = some<T> | nothing"),
        ("c.epoch", "###invalid###"),
    ]);

    project.reparse();
    let first = project.snapshot();
    project.reparse();
    let second = project.snapshot();

    assert!(!Arc::ptr_eq(&first, &second), "each reparse builds a new table");
    assert_eq!(*first, *second);
}

#[test]
fn diagnostics_do_not_accumulate_across_cycles() {
    let (_dir, mut project, clock) = workspace_with_files(&[("bad.epoch", "###invalid###")]);

    for _ in 0..3 {
        clock.advance(STALENESS_THRESHOLD);
        project.parse_if_outdated().expect("gate should be open");
        assert_eq!(project.diagnostics().len(), 1);
    }
}

#[test]
fn fixed_file_clears_its_diagnostic() {
    let (dir, mut project, _clock) = workspace_with_files(&[("a.epoch", "###invalid###")]);
    project.reparse();
    assert_eq!(project.diagnostics().len(), 1);

    fs::write(dir.path().join("a.epoch"), "sumtype Fixed = Yes").expect("should rewrite file");
    project.reparse();

    assert!(project.diagnostics().is_empty());
    assert!(project.is_recognized_type("Fixed"));
}

#[test]
fn held_snapshot_survives_reparse() {
    let (dir, mut project, _clock) =
        workspace_with_files(&[("a.epoch", "sumtype Shape = Circle")]);
    project.reparse();
    let held = project.snapshot();

    fs::remove_file(dir.path().join("a.epoch")).expect("should delete file");
    project.reparse();

    assert!(held.is_recognized_type("Shape"));
    assert!(!project.is_recognized_type("Shape"));
}

#[test]
fn duplicate_sum_types_across_files_keep_first_in_walk_order() {
    let (_dir, mut project, _clock) = workspace_with_files(&[
        ("a.epoch", "sumtype Shape = Circle"),
        ("b.epoch", "sumtype Shape = Square | Triangle"),
    ]);

    project.reparse();

    let snapshot = project.snapshot();
    let shape = snapshot.sum_type("Shape").expect("Shape should be registered");
    assert_eq!(shape.case_names().collect::<Vec<_>>(), ["Circle"]);
    assert!(project.diagnostics().is_empty());
}

// === I/O failures ===

#[test]
fn unreadable_file_is_isolated() {
    let mut tree = NodeTree::new(None);
    let dir = tempfile::tempdir().expect("should create temp dir");
    let good = dir.path().join("good.epoch");
    fs::write(&good, "sumtype Shape = Circle").expect("should write file");

    tree.add_item(ItemId::ROOT, Some(dir.path().join("missing.epoch")))
        .expect("root exists");
    tree.add_item(ItemId::ROOT, Some(good)).expect("root exists");

    let mut project = Project::new(Arc::new(tree));
    let stats = project.reparse();

    assert_eq!(stats.errors.len(), 1);
    assert_eq!(stats.errors[0].kind, FileErrorKind::IoError);
    assert_eq!(stats.files_parsed, 1);
    assert!(project.is_recognized_type("Shape"));
    assert!(project.diagnostics().is_empty());
    assert_eq!(project.snapshot().file_errors().len(), 1);
}

#[test]
fn non_utf8_file_is_encoding_error() {
    let dir = tempfile::tempdir().expect("should create temp dir");
    fs::write(dir.path().join("latin1.epoch"), [0x73, 0xE9, 0xFF, 0x0A]).expect("should write file");
    let mut project = Project::open(dir.path()).expect("should open project");

    let stats = project.reparse();

    assert_eq!(stats.errors.len(), 1);
    assert_eq!(stats.errors[0].kind, FileErrorKind::EncodingError);
}

// === Navigation ===

#[derive(Default)]
struct RecordingNavigator {
    visits: RefCell<Vec<(PathBuf, u32, u32)>>,
}

impl Navigator for RecordingNavigator {
    fn open_and_navigate(&self, document: &Path, line: u32, column: u32) -> Result<(), NavigationError> {
        self.visits
            .borrow_mut()
            .push((document.to_path_buf(), line, column));
        Ok(())
    }
}

#[test]
fn diagnostic_navigates_to_offending_token() {
    let (dir, mut project, _clock) =
        workspace_with_files(&[("a.epoch", "sumtype A = B\n\n    function main")]);
    project.reparse();
    let navigator = RecordingNavigator::default();

    project.diagnostics()[0]
        .navigate(&navigator)
        .expect("navigation should succeed");

    assert_eq!(
        navigator.visits.into_inner(),
        vec![(canonical(&dir, "a.epoch"), 2, 4)]
    );
}
