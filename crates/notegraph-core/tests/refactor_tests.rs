//! Rename and delete with vault-wide link rewriting

mod common;

use common::TestVault;
use notegraph_core::{ErrorKind, VaultError};

fn linked_vault() -> TestVault {
    TestVault::with_notes(&[
        ("Plan", "# Plan\n## Budget\n"),
        ("A", "See [[Plan]] and [[Plan#Budget|money]]"),
        ("B", "---\nrelated: \"[[Plan]]\"\n---\nNothing in body"),
        ("C", "unrelated [[Planning]]"),
    ])
}

// ============================================================================
// Rename
// ============================================================================

#[test]
fn test_rename_dry_run_changes_nothing() {
    let vault = linked_vault();
    let result = vault.ops.rename_note("Plan", "Roadmap", true).unwrap();

    assert!(result.dry_run);
    assert_eq!(result.files_updated, vec!["A", "B"]);
    assert!(vault.path("Plan").exists());
    assert!(!vault.path("Roadmap").exists());
    assert_eq!(vault.raw("A"), "See [[Plan]] and [[Plan#Budget|money]]");
}

#[test]
fn test_rename_dry_run_matches_real_run() {
    let preview = linked_vault().ops.rename_note("Plan", "Roadmap", true).unwrap();
    let real = linked_vault().ops.rename_note("Plan", "Roadmap", false).unwrap();
    assert_eq!(preview.files_updated, real.files_updated);
    assert!(!real.dry_run);
}

#[test]
fn test_rename_rewrites_every_link_form() {
    let vault = linked_vault();
    vault.ops.rename_note("Plan", "Roadmap", false).unwrap();

    assert!(!vault.path("Plan").exists());
    assert_eq!(vault.raw("Roadmap"), "# Plan\n## Budget\n");
    assert_eq!(vault.raw("A"), "See [[Roadmap]] and [[Roadmap#Budget|money]]");
    assert_eq!(vault.raw("B"), "---\nrelated: \"[[Roadmap]]\"\n---\nNothing in body");
    assert_eq!(vault.raw("C"), "unrelated [[Planning]]");
}

#[test]
fn test_rename_refreshes_index() {
    let vault = linked_vault();
    vault.ops.rename_note("Plan", "Roadmap", false).unwrap();

    let index = vault.ops.vault();
    assert!(index.get("Roadmap").is_ok());
    assert_eq!(index.get("Plan").unwrap_err().kind(), ErrorKind::NotFound);
    assert_eq!(index.incoming_links("Roadmap").unwrap(), vec!["A"]);
    assert!(index.incoming_links("Plan").unwrap().is_empty());
}

#[test]
fn test_rename_rewrites_self_links() {
    let vault = TestVault::with_notes(&[("Loop", "back to [[Loop]]")]);
    let result = vault.ops.rename_note("Loop", "Cycle", false).unwrap();
    assert_eq!(result.files_updated, vec!["Loop"]);
    assert_eq!(vault.raw("Cycle"), "back to [[Cycle]]");
}

#[test]
fn test_rename_onto_existing_note_fails() {
    let vault = linked_vault();
    let err = vault.ops.rename_note("Plan", "C", false).unwrap_err();
    assert_eq!(err.to_string(), "Note 'C' already exists");
    assert_eq!(vault.raw("A"), "See [[Plan]] and [[Plan#Budget|money]]");
}

#[test]
fn test_rename_validates_new_name() {
    let vault = linked_vault();
    let err = vault.ops.rename_note("Plan", "Plan: v2", false).unwrap_err();
    assert!(matches!(err, VaultError::InvalidName(_)));
    assert!(vault.path("Plan").exists());
}

#[test]
fn test_rename_missing_note() {
    let vault = linked_vault();
    let err = vault.ops.rename_note("Ghost", "Spirit", true).unwrap_err();
    assert_eq!(err.to_string(), "Note 'Ghost' not found");
}

// ============================================================================
// Delete
// ============================================================================

#[test]
fn test_delete_dry_run_changes_nothing() {
    let vault = linked_vault();
    let result = vault.ops.delete_note("Plan", true).unwrap();

    assert!(result.dry_run);
    assert_eq!(result.files_updated, vec!["A", "B"]);
    assert_eq!(result.trash_path, vault.trash().join("Plan.md"));
    assert!(vault.path("Plan").exists());
    assert!(!vault.trash().exists());
}

#[test]
fn test_delete_marks_links_and_trashes_file() {
    let vault = linked_vault();
    let result = vault.ops.delete_note("Plan", false).unwrap();

    assert!(!vault.path("Plan").exists());
    assert!(result.trash_path.exists());
    assert_eq!(std::fs::read_to_string(&result.trash_path).unwrap(), "# Plan\n## Budget\n");
    assert_eq!(
        vault.raw("A"),
        "See [[Plan (deleted)]] and [[Plan (deleted)#Budget|money]]"
    );
    assert_eq!(vault.raw("B"), "---\nrelated: \"[[Plan (deleted)]]\"\n---\nNothing in body");
}

#[test]
fn test_deleted_note_drops_out_of_index() {
    let vault = linked_vault();
    vault.ops.delete_note("Plan", false).unwrap();

    let names: Vec<_> = vault.ops.list_notes(None, 0).unwrap().notes;
    assert_eq!(names, vec!["A", "B", "C"]);
    assert_eq!(vault.ops.vault().incoming_links("Plan (deleted)").unwrap(), vec!["A"]);
}

#[test]
fn test_delete_twice_keeps_both_trash_copies() {
    let vault = TestVault::with_notes(&[("Temp", "first")]);
    let first = vault.ops.delete_note("Temp", false).unwrap();

    vault.write_external("Temp", "second");
    let second = vault.ops.delete_note("Temp", false).unwrap();

    assert_ne!(first.trash_path, second.trash_path);
    assert_eq!(std::fs::read_to_string(&first.trash_path).unwrap(), "first");
    assert_eq!(std::fs::read_to_string(&second.trash_path).unwrap(), "second");
}

// ============================================================================
// Batches
// ============================================================================

#[test]
fn test_batch_rename_stops_at_first_failure() {
    let vault = linked_vault();
    let pairs = vec![
        ("A".to_string(), "A2".to_string()),
        ("Missing".to_string(), "X".to_string()),
        ("C".to_string(), "C2".to_string()),
    ];
    let result = vault.ops.batch_rename(&pairs, false);

    assert!(!result.is_complete());
    assert_eq!(result.completed.len(), 1);
    let failed = result.failed.unwrap();
    assert_eq!(failed.item, "Missing -> X");
    assert_eq!(failed.error, "Note 'Missing' not found");

    assert!(vault.path("A2").exists());
    assert!(vault.path("C").exists());
    assert!(!vault.path("C2").exists());
}

#[test]
fn test_batch_delete_dry_run() {
    let vault = linked_vault();
    let names = vec!["A".to_string(), "C".to_string()];
    let result = vault.ops.batch_delete(&names, true);

    assert!(result.is_complete());
    assert_eq!(result.completed.len(), 2);
    assert!(vault.path("A").exists());
    assert!(vault.path("C").exists());
}
