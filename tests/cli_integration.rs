//! CLI Integration Tests
//!
//! Tests the command-line interface end-to-end against temporary vaults.

use assert_cmd::Command;
use assert_fs::prelude::*;
use predicates::prelude::*;

/// Get the binary to test.
fn vaultcmd() -> Command {
    Command::cargo_bin("vaultcmd").unwrap()
}

/// A vault with a config file, so user configuration never leaks in.
fn vault_with_config(config: &str) -> assert_fs::TempDir {
    let temp = assert_fs::TempDir::new().unwrap();
    temp.child("vaultcmd.toml").write_str(config).unwrap();
    temp
}

/// Run `vaultcmd` against `vault` with its config file.
fn in_vault(vault: &assert_fs::TempDir) -> Command {
    let mut cmd = vaultcmd();
    cmd.env_remove("VAULTCMD_VAULT")
        .arg("--vault")
        .arg(vault.path())
        .arg("--config")
        .arg(vault.path().join("vaultcmd.toml"));
    cmd
}

// ============================================================================
// Help & Version Tests
// ============================================================================

#[test]
fn test_help_flag() {
    vaultcmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Run note-vault commands"));
}

#[test]
fn test_version_flag() {
    vaultcmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

// ============================================================================
// List Command Tests
// ============================================================================

#[test]
fn test_list_shows_builtins() {
    let vault = vault_with_config("");

    in_vault(&vault)
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("vaultcmd:new-note"))
        .stdout(predicate::str::contains("vaultcmd:archive-note"))
        .stdout(predicate::str::contains("Total: 5 commands (1 available)"));
}

#[test]
fn test_list_availability_follows_active_file() {
    let vault = vault_with_config("");
    vault.child("today.md").write_str("# Today").unwrap();

    in_vault(&vault)
        .args(["--active", "today.md", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("* vaultcmd:archive-note"));
}

#[test]
fn test_list_json_output() {
    let vault = vault_with_config("");

    in_vault(&vault)
        .args(["list", "--format", "json"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("["))
        .stdout(predicate::str::contains("\"full_id\": \"vaultcmd:move-to-trash\""));
}

#[test]
fn test_list_with_query() {
    let vault = vault_with_config("");

    in_vault(&vault)
        .args(["list", "--query", "trash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Move to trash"))
        .stdout(predicate::str::contains("Uppercase").not());
}

#[test]
fn test_disabled_command_is_not_listed() {
    let vault = vault_with_config("[commands]\ndisabled = [\"archive-note\"]\n");

    in_vault(&vault)
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("archive-note").not())
        .stdout(predicate::str::contains("Total: 4 commands"));
}

#[test]
fn test_plugin_id_from_config() {
    let vault = vault_with_config("[general]\nplugin_id = \"notes\"\n");

    in_vault(&vault).arg("list").assert().success().stdout(predicate::str::contains("notes:new-note"));
}

// ============================================================================
// Run Command Tests
// ============================================================================

#[test]
fn test_run_new_note() {
    let vault = vault_with_config("");

    in_vault(&vault).args(["run", "new-note"]).assert().success().stdout(predicate::str::contains("Ran"));
    vault.child("Untitled.md").assert(predicate::path::exists());

    in_vault(&vault).args(["run", "vaultcmd:new-note"]).assert().success();
    vault.child("Untitled 1.md").assert(predicate::path::exists());
}

#[test]
fn test_run_archive_note() {
    let vault = vault_with_config("");
    vault.child("today.md").write_str("# Today").unwrap();

    in_vault(&vault).args(["--active", "today.md", "run", "archive-note"]).assert().success();

    vault.child("today.md").assert(predicate::path::missing());
    vault.child("Archive/today.md").assert("# Today");
}

#[test]
fn test_run_infeasible_command_fails() {
    let vault = vault_with_config("");

    in_vault(&vault)
        .args(["run", "archive-note"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot run right now"));
}

#[test]
fn test_run_unknown_command_fails() {
    let vault = vault_with_config("");

    in_vault(&vault)
        .args(["run", "does-not-exist"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Command not found"));
}

#[test]
fn test_missing_active_file_fails() {
    let vault = vault_with_config("");

    in_vault(&vault)
        .args(["--active", "nope.md", "list"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Active file not found"));
}

// ============================================================================
// Menu & Click Tests
// ============================================================================

#[test]
fn test_file_menu() {
    let vault = vault_with_config("");
    vault.child("note.md").write_str("").unwrap();

    in_vault(&vault)
        .args(["menu", "note.md"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[action] Archive Note"))
        .stdout(predicate::str::contains("[action] Move to trash"))
        .stdout(predicate::str::contains("New note in folder").not());
}

#[test]
fn test_folder_menu() {
    let vault = vault_with_config("");
    vault.child("Projects/plan.md").write_str("").unwrap();

    in_vault(&vault)
        .args(["menu", "Projects"])
        .assert()
        .success()
        .stdout(predicate::str::contains("New note in folder"))
        .stdout(predicate::str::contains("Archive Note").not());
}

#[test]
fn test_menu_sections_from_config() {
    let vault = vault_with_config("[menus]\nfile_section = \"danger\"\nhidden = [\"archive-note\"]\n");
    vault.child("note.md").write_str("").unwrap();

    in_vault(&vault)
        .args(["menu", "note.md"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[danger] Move to trash"))
        .stdout(predicate::str::contains("Archive Note").not());
}

#[test]
fn test_files_menu_needs_every_entry() {
    let vault = vault_with_config("");
    vault.child("image.png").write_str("").unwrap();
    vault.child("Archive/old.md").write_str("").unwrap();

    in_vault(&vault)
        .args(["menu", "image.png", "Archive/old.md"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Move to trash"))
        .stdout(predicate::str::contains("Archive Note").not());
}

#[test]
fn test_menu_unknown_path_fails() {
    let vault = vault_with_config("");

    in_vault(&vault)
        .args(["menu", "ghost.md"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No such file or folder"));
}

#[test]
fn test_click_archives_selection() {
    let vault = vault_with_config("");
    vault.child("a.md").write_str("a").unwrap();
    vault.child("b.md").write_str("b").unwrap();

    in_vault(&vault).args(["click", "Archive Note", "a.md", "b.md"]).assert().success();

    vault.child("Archive/a.md").assert("a");
    vault.child("Archive/b.md").assert("b");
}

#[test]
fn test_click_move_to_trash() {
    let vault = vault_with_config("");
    vault.child("Projects/plan.md").write_str("plan").unwrap();

    in_vault(&vault).args(["click", "Move to trash", "Projects"]).assert().success();

    vault.child(".trash/Projects/plan.md").assert("plan");
    vault.child("Projects").assert(predicate::path::missing());
}

#[test]
fn test_click_missing_item_fails() {
    let vault = vault_with_config("");
    vault.child("image.png").write_str("").unwrap();

    in_vault(&vault)
        .args(["click", "Archive Note", "image.png"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No menu item titled"));
}

// ============================================================================
// Config Command Tests
// ============================================================================

#[test]
fn test_config_shows_loaded_file() {
    let vault = vault_with_config("[general]\nplugin_id = \"notes\"\n");

    in_vault(&vault)
        .arg("config")
        .assert()
        .success()
        .stdout(predicate::str::contains("plugin_id = \"notes\""))
        .stdout(predicate::str::contains("[menus]"));
}

#[test]
fn test_config_path_succeeds() {
    let vault = vault_with_config("");

    in_vault(&vault).args(["config", "--path"]).assert().success();
}

#[test]
fn test_invalid_config_fails() {
    let vault = vault_with_config("[general\n");

    in_vault(&vault)
        .arg("list")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to load config"));
}
