//! Invocation Protocol Tests
//!
//! Exercises the check-then-execute contract through the public API.

use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;

use vaultcmd::core::{CommandError, ContractViolation};
use vaultcmd::host::{MemoryVault, Vault};
use vaultcmd::invocation::{FileAction, FileInvocation, SequentialInvocation};
use vaultcmd::{
    Command, CommandInvocation, CommandRegistry, FileCommand, FileRef, Invocation,
    InvocationState, PluginContext,
};

type Log = Arc<Mutex<Vec<String>>>;

/// Invocation that records every check and execution.
struct Recorder {
    name: &'static str,
    feasible: bool,
    fails: bool,
    log: Log,
}

impl Recorder {
    fn new(name: &'static str, log: &Log) -> Self {
        Self { name, feasible: true, fails: false, log: Arc::clone(log) }
    }

    fn infeasible(mut self) -> Self {
        self.feasible = false;
        self
    }

    fn failing(mut self) -> Self {
        self.fails = true;
        self
    }
}

#[async_trait]
impl Invocation for Recorder {
    fn can_execute(&mut self) -> bool {
        self.log.lock().push(format!("check {}", self.name));
        self.feasible
    }

    async fn execute(&mut self) -> anyhow::Result<()> {
        self.log.lock().push(format!("start {}", self.name));
        tokio::task::yield_now().await;
        if self.fails {
            anyhow::bail!("{} failed", self.name);
        }
        self.log.lock().push(format!("end {}", self.name));
        Ok(())
    }
}

fn log() -> Log {
    Arc::new(Mutex::new(Vec::new()))
}

fn entries(log: &Log) -> Vec<String> {
    log.lock().clone()
}

fn executions(log: &Log) -> usize {
    log.lock().iter().filter(|entry| entry.starts_with("start")).count()
}

// ============================================================================
// Contract Tests
// ============================================================================

#[tokio::test]
async fn test_execute_before_check_is_violation() {
    let log = log();
    let mut invocation = CommandInvocation::new("rec", Recorder::new("a", &log));

    let err = invocation.execute().await.unwrap_err();
    assert_eq!(err.contract_violation(), Some(ContractViolation::NotChecked));
    assert_eq!(executions(&log), 0);
}

#[tokio::test]
async fn test_execute_after_failed_check_is_violation() {
    let log = log();
    let mut invocation = CommandInvocation::new("rec", Recorder::new("a", &log).infeasible());

    assert!(!invocation.can_execute());
    let err = invocation.execute().await.unwrap_err();
    assert!(matches!(
        err,
        CommandError::ContractViolation { violation: ContractViolation::CheckFailed, .. }
    ));
    assert_eq!(executions(&log), 0);
}

#[tokio::test]
async fn test_execute_twice_is_violation() {
    let log = log();
    let mut invocation = CommandInvocation::new("rec", Recorder::new("a", &log));

    assert!(invocation.can_execute());
    invocation.execute().await.unwrap();
    assert_eq!(invocation.state(), InvocationState::Executed);

    let err = invocation.execute().await.unwrap_err();
    assert_eq!(err.contract_violation(), Some(ContractViolation::AlreadyExecuted));
    assert_eq!(executions(&log), 1);
}

#[test]
fn test_check_is_memoized() {
    let log = log();
    let mut invocation = CommandInvocation::new("rec", Recorder::new("a", &log));

    assert!(invocation.can_execute());
    assert!(invocation.can_execute());
    assert_eq!(entries(&log), vec!["check a"]);
}

#[tokio::test]
async fn test_invoke_checking_never_executes() {
    for feasible in [true, false] {
        let log = log();
        let mut recorder = Recorder::new("a", &log);
        recorder.feasible = feasible;

        let invoked = CommandInvocation::new("rec", recorder).invoke(true);
        assert_eq!(invoked.feasible(), feasible);
        assert!(!invoked.is_executing());
        assert_eq!(invoked.wait().await.unwrap(), feasible);
        assert_eq!(executions(&log), 0);
    }
}

#[tokio::test]
async fn test_invoke_executes_iff_feasible() {
    let log = log();
    let invoked = CommandInvocation::new("rec", Recorder::new("a", &log)).invoke(false);
    assert!(invoked.feasible());
    assert!(invoked.wait().await.unwrap());
    assert_eq!(executions(&log), 1);

    let log = self::log();
    let invoked = CommandInvocation::new("rec", Recorder::new("a", &log).infeasible()).invoke(false);
    assert!(!invoked.feasible());
    assert!(!invoked.is_executing());
    assert!(!invoked.wait().await.unwrap());
    assert_eq!(executions(&log), 0);
}

#[tokio::test]
async fn test_execution_failure_reaches_handle() {
    let log = log();
    let invoked = CommandInvocation::new("rec", Recorder::new("a", &log).failing()).invoke(false);

    let handle = invoked.into_execution().unwrap();
    assert_eq!(handle.command(), "rec");
    let err = handle.wait().await.unwrap_err();
    assert!(matches!(err, CommandError::Execution(_)));
    assert_eq!(err.to_string(), "a failed");
}

// ============================================================================
// Subject Resolution Tests
// ============================================================================

#[derive(Default)]
struct Seen {
    files: Mutex<Vec<String>>,
}

struct SeenAction(Arc<Seen>);

#[async_trait]
impl FileAction for SeenAction {
    async fn execute(&self, file: &FileRef, _vault: &dyn Vault) -> anyhow::Result<()> {
        self.0.files.lock().push(file.path().to_string());
        Ok(())
    }
}

/// Vault that counts active-file lookups.
#[derive(Default)]
struct CountingVault {
    inner: MemoryVault,
    lookups: Mutex<usize>,
}

impl Vault for CountingVault {
    fn active_file(&self) -> Option<FileRef> {
        *self.lookups.lock() += 1;
        self.inner.active_file()
    }

    fn get_abstract_file_by_path(&self, path: &str) -> Option<vaultcmd::AbstractFile> {
        self.inner.get_abstract_file_by_path(path)
    }

    fn files(&self) -> Vec<FileRef> {
        self.inner.files()
    }

    fn read(&self, file: &FileRef) -> vaultcmd::CommandResult<String> {
        self.inner.read(file)
    }

    fn create(&self, path: &str, contents: &str) -> vaultcmd::CommandResult<FileRef> {
        self.inner.create(path, contents)
    }

    fn create_folder(&self, path: &str) -> vaultcmd::CommandResult<vaultcmd::FolderRef> {
        self.inner.create_folder(path)
    }

    fn rename(
        &self,
        entry: &vaultcmd::AbstractFile,
        new_path: &str,
    ) -> vaultcmd::CommandResult<vaultcmd::AbstractFile> {
        self.inner.rename(entry, new_path)
    }
}

#[test]
fn test_explicit_file_ignores_active_file() {
    let vault = Arc::new(CountingVault::default());
    vault.inner.set_active_file(Some(FileRef::new("active.md")));
    let action = Arc::new(SeenAction(Arc::new(Seen::default())));

    let body = FileInvocation::new(action, vault.clone()).with_file(FileRef::new("explicit.md"));
    let mut invocation = CommandInvocation::new("seen", body);

    assert!(invocation.can_execute());
    assert_eq!(invocation.inner().file(), Some(&FileRef::new("explicit.md")));
    assert_eq!(*vault.lookups.lock(), 0);
}

#[test]
fn test_implicit_file_uses_active_file() {
    let vault = Arc::new(CountingVault::default());
    let action: Arc<dyn FileAction> = Arc::new(SeenAction(Arc::new(Seen::default())));

    let mut none = CommandInvocation::new("seen", FileInvocation::new(Arc::clone(&action), vault.clone()));
    assert!(!none.can_execute());

    vault.inner.set_active_file(Some(FileRef::new("active.md")));
    let mut some = CommandInvocation::new("seen", FileInvocation::new(action, vault.clone()));
    assert!(some.can_execute());
    assert_eq!(some.inner().file(), Some(&FileRef::new("active.md")));
    assert_eq!(*vault.lookups.lock(), 2);
}

#[tokio::test]
async fn test_subject_is_fixed_after_check() {
    let vault = Arc::new(MemoryVault::new().with_active("first.md"));
    let seen = Arc::new(Seen::default());
    let action = Arc::new(SeenAction(Arc::clone(&seen)));

    let mut invocation = CommandInvocation::new("seen", FileInvocation::new(action, vault.clone()));
    assert!(invocation.can_execute());
    vault.set_active_file(Some(FileRef::new("second.md")));
    invocation.execute().await.unwrap();

    assert_eq!(*seen.files.lock(), vec!["first.md".to_string()]);
}

// ============================================================================
// Batch Tests
// ============================================================================

#[test]
fn test_batch_check_short_circuits() {
    let log = log();
    let batch = SequentialInvocation::new(vec![
        CommandInvocation::new("rec", Recorder::new("A", &log)),
        CommandInvocation::new("rec", Recorder::new("B", &log).infeasible()),
        CommandInvocation::new("rec", Recorder::new("C", &log)),
    ]);
    let mut invocation = CommandInvocation::new("rec", batch);

    assert!(!invocation.can_execute());
    assert_eq!(entries(&log), vec!["check A", "check B"]);
}

#[tokio::test]
async fn test_batch_executes_in_order() {
    let log = log();
    let batch = SequentialInvocation::new(vec![
        CommandInvocation::new("rec", Recorder::new("A", &log)),
        CommandInvocation::new("rec", Recorder::new("B", &log)),
        CommandInvocation::new("rec", Recorder::new("C", &log)),
    ]);

    assert!(CommandInvocation::new("rec", batch).run().await.unwrap());
    assert_eq!(entries(&log), vec![
        "check A", "check B", "check C", "start A", "end A", "start B", "end B", "start C",
        "end C",
    ]);
}

#[tokio::test]
async fn test_batch_stops_at_first_failure() {
    let log = log();
    let batch = SequentialInvocation::new(vec![
        CommandInvocation::new("rec", Recorder::new("A", &log)),
        CommandInvocation::new("rec", Recorder::new("B", &log).failing()),
        CommandInvocation::new("rec", Recorder::new("C", &log)),
    ]);

    let err = CommandInvocation::new("rec", batch).run().await.unwrap_err();
    assert_eq!(err.to_string(), "B failed");

    let log = entries(&log);
    assert!(log.contains(&"end A".to_string()));
    assert!(log.contains(&"start B".to_string()));
    assert!(!log.iter().any(|entry| entry.ends_with(" C") && !entry.starts_with("check")));
}

#[test]
fn test_empty_batch_is_infeasible() {
    let batch: SequentialInvocation<Recorder> = SequentialInvocation::new(Vec::new());
    assert!(!CommandInvocation::new("rec", batch).can_execute());
}

// ============================================================================
// Archive Note Scenario
// ============================================================================

#[tokio::test]
async fn test_archive_note_scenario() {
    let vault = Arc::new(MemoryVault::new().with_file("Notes/today.md", "# Today"));
    let seen = Arc::new(Seen::default());
    let context = PluginContext::new("notes", vault.clone());
    let command = FileCommand::new(
        &context,
        Command::new("archive-note", "Archive Note"),
        SeenAction(Arc::clone(&seen)),
    );

    let mut registry = CommandRegistry::new();
    registry.register(Arc::new(command)).unwrap();

    let invoked = registry.check("archive-note", true).unwrap();
    assert!(!invoked.feasible());
    assert!(!registry.check("archive-note", false).unwrap().wait().await.unwrap());
    assert!(seen.files.lock().is_empty());

    vault.set_active_file(Some(FileRef::new("Notes/today.md")));
    assert!(registry.check("archive-note", true).unwrap().feasible());
    assert!(seen.files.lock().is_empty());

    let invoked = registry.check("notes:archive-note", false).unwrap();
    assert!(invoked.feasible());
    assert!(invoked.wait().await.unwrap());
    assert_eq!(*seen.files.lock(), vec!["Notes/today.md".to_string()]);
}

#[tokio::test]
async fn test_builtin_archive_note_moves_file() {
    let vault = Arc::new(MemoryVault::new().with_file("Notes/today.md", "# Today"));
    let context = PluginContext::new("vaultcmd", vault.clone());
    let mut registry = CommandRegistry::new();
    registry.register_all(vaultcmd::builtin::builtin_commands(&context)).unwrap();

    assert!(!registry.check("archive-note", true).unwrap().feasible());

    vault.set_active_file(Some(FileRef::new("Notes/today.md")));
    assert!(registry.check("archive-note", false).unwrap().wait().await.unwrap());
    assert!(vault.contains_file("Archive/today.md"));
    assert_eq!(vault.read(&FileRef::new("Archive/today.md")).unwrap(), "# Today");
}
