//! The check-then-execute invocation protocol.

use std::thread;

use async_trait::async_trait;
use tokio::runtime::{Builder, Handle};
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

use crate::core::{CommandError, CommandResult, ContractViolation};

/// Body of a single command invocation.
///
/// Implementors resolve their subject in `can_execute` and act on the
/// cached subject in `execute`. `CommandInvocation` enforces the ordering.
#[async_trait]
pub trait Invocation: Send + 'static {
    /// Feasibility check. Must not have side effects beyond caching the subject.
    fn can_execute(&mut self) -> bool {
        true
    }

    /// Perform the command's effect.
    async fn execute(&mut self) -> anyhow::Result<()> {
        Ok(())
    }
}

#[async_trait]
impl Invocation for Box<dyn Invocation> {
    fn can_execute(&mut self) -> bool {
        (**self).can_execute()
    }

    async fn execute(&mut self) -> anyhow::Result<()> {
        (**self).execute().await
    }
}

/// Where an invocation is in its single-use lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvocationState {
    /// No feasibility check has run
    Unchecked,
    /// The check passed; `execute` may run once
    Feasible,
    /// The check failed; `execute` is a contract violation
    Infeasible,
    /// `execute` has run
    Executed,
}

impl InvocationState {
    /// Get the state name for display.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Unchecked => "unchecked",
            Self::Feasible => "feasible",
            Self::Infeasible => "infeasible",
            Self::Executed => "executed",
        }
    }
}

/// One attempt to run a command for one subject.
///
/// Constructed fresh per trigger and discarded afterwards. The feasibility
/// result is memoized; `execute` is only allowed after a passing check.
#[derive(Debug)]
pub struct CommandInvocation<I> {
    command_id: String,
    inner: I,
    state: InvocationState,
}

impl<I: Invocation> CommandInvocation<I> {
    /// Wrap an invocation body for the command `command_id`.
    pub fn new(command_id: impl Into<String>, inner: I) -> Self {
        Self { command_id: command_id.into(), inner, state: InvocationState::Unchecked }
    }

    /// Id of the command being invoked.
    pub fn command_id(&self) -> &str {
        &self.command_id
    }

    /// Current lifecycle state.
    pub fn state(&self) -> InvocationState {
        self.state
    }

    /// The invocation body.
    pub fn inner(&self) -> &I {
        &self.inner
    }

    /// Change the body's subject before execution and discard the memoized check.
    pub fn rebind(&mut self, update: impl FnOnce(&mut I)) -> CommandResult<()> {
        if self.state == InvocationState::Executed {
            return Err(self.violation(ContractViolation::AlreadyExecuted));
        }
        update(&mut self.inner);
        self.state = InvocationState::Unchecked;
        Ok(())
    }

    /// Run the feasibility check once and memoize the result.
    pub fn can_execute(&mut self) -> bool {
        match self.state {
            InvocationState::Unchecked => {
                let feasible = self.inner.can_execute();
                self.state =
                    if feasible { InvocationState::Feasible } else { InvocationState::Infeasible };
                tracing::trace!(command = %self.command_id, feasible, "Checked command");
                feasible
            }
            InvocationState::Feasible | InvocationState::Executed => true,
            InvocationState::Infeasible => false,
        }
    }

    /// Perform the command's effect. Requires a prior passing check.
    pub async fn execute(&mut self) -> CommandResult<()> {
        match self.state {
            InvocationState::Feasible => {}
            InvocationState::Unchecked => {
                return Err(self.violation(ContractViolation::NotChecked));
            }
            InvocationState::Infeasible => {
                return Err(self.violation(ContractViolation::CheckFailed));
            }
            InvocationState::Executed => {
                return Err(self.violation(ContractViolation::AlreadyExecuted));
            }
        }

        self.state = InvocationState::Executed;
        tracing::debug!(command = %self.command_id, "Executing command");
        // Nested invocations already report a CommandError
        self.inner.execute().await.map_err(|e| match e.downcast::<CommandError>() {
            Ok(inner) => inner,
            Err(e) => CommandError::Execution(e),
        })
    }

    /// Check the invocation and, unless `checking`, start executing it.
    ///
    /// The check result is returned immediately. Execution runs on the current
    /// Tokio runtime, or on a worker thread with its own runtime when the caller
    /// is not inside one. The returned handle may be awaited or dropped.
    pub fn invoke(mut self, checking: bool) -> Invoked {
        let feasible = self.can_execute();
        if checking || !feasible {
            return Invoked { feasible, execution: None };
        }

        let command = self.command_id.clone();
        let task = match Handle::try_current() {
            Ok(runtime) => Task::Runtime(runtime.spawn(self.execute_logged())),
            Err(_) => self.spawn_worker(),
        };

        Invoked { feasible, execution: Some(ExecutionHandle { command, task }) }
    }

    async fn execute_logged(mut self) -> CommandResult<()> {
        let result = self.execute().await;
        if let Err(e) = &result {
            tracing::error!(command = %self.command_id, error = %e, "Command failed");
        }
        result
    }

    fn spawn_worker(self) -> Task {
        let (done_tx, done_rx) = oneshot::channel();
        let command = self.command_id.clone();
        tracing::debug!(command = %command, "No runtime, executing on a worker thread");

        let worker = thread::spawn(move || {
            let result = match Builder::new_current_thread().enable_all().build() {
                Ok(runtime) => runtime.block_on(self.execute_logged()),
                Err(e) => {
                    tracing::error!(command = %command, error = %e, "Failed to start runtime");
                    Err(CommandError::Aborted { command, reason: e.to_string() })
                }
            };
            // The handle may have been dropped
            let _ = done_tx.send(result);
        });

        Task::Worker { worker, done: done_rx }
    }

    /// Check and execute in place, waiting for the effect to finish.
    ///
    /// Returns `Ok(false)` without executing when the check fails.
    pub async fn run(mut self) -> CommandResult<bool> {
        if !self.can_execute() {
            return Ok(false);
        }
        self.execute().await?;
        Ok(true)
    }

    fn violation(&self, violation: ContractViolation) -> CommandError {
        tracing::error!(
            command = %self.command_id,
            state = self.state.as_str(),
            %violation,
            "Invocation contract violated"
        );
        CommandError::violation(self.command_id.clone(), violation)
    }
}

/// Result of `CommandInvocation::invoke`.
#[derive(Debug)]
#[must_use]
pub struct Invoked {
    feasible: bool,
    execution: Option<ExecutionHandle>,
}

impl Invoked {
    /// An invocation whose check failed without running anything.
    pub fn rejected() -> Self {
        Self { feasible: false, execution: None }
    }

    /// Whether the feasibility check passed.
    pub fn feasible(&self) -> bool {
        self.feasible
    }

    /// Whether execution was started.
    pub fn is_executing(&self) -> bool {
        self.execution.is_some()
    }

    /// Take the execution handle, if execution was started.
    pub fn into_execution(self) -> Option<ExecutionHandle> {
        self.execution
    }

    /// Wait for execution, if any, and return the check result.
    pub async fn wait(self) -> CommandResult<bool> {
        if let Some(execution) = self.execution {
            execution.wait().await?;
        }
        Ok(self.feasible)
    }
}

/// Handle to a running command execution.
#[derive(Debug)]
pub struct ExecutionHandle {
    command: String,
    task: Task,
}

#[derive(Debug)]
enum Task {
    /// Spawned on the caller's runtime
    Runtime(JoinHandle<CommandResult<()>>),
    /// Running on a dedicated thread
    Worker { worker: thread::JoinHandle<()>, done: oneshot::Receiver<CommandResult<()>> },
}

impl ExecutionHandle {
    /// Id of the executing command.
    pub fn command(&self) -> &str {
        &self.command
    }

    /// Check whether execution has settled.
    pub fn is_finished(&self) -> bool {
        match &self.task {
            Task::Runtime(task) => task.is_finished(),
            Task::Worker { worker, .. } => worker.is_finished(),
        }
    }

    /// Wait for execution to settle and return its outcome.
    pub async fn wait(self) -> CommandResult<()> {
        match self.task {
            Task::Runtime(task) => match task.await {
                Ok(result) => result,
                Err(e) => Err(CommandError::Aborted { command: self.command, reason: e.to_string() }),
            },
            Task::Worker { done, .. } => match done.await {
                Ok(result) => result,
                Err(_) => Err(CommandError::Aborted {
                    command: self.command,
                    reason: "worker thread exited without a result".to_string(),
                }),
            },
        }
    }
}
