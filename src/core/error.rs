//! Command system error types.

use thiserror::Error;

/// Result type for command operations.
pub type CommandResult<T> = Result<T, CommandError>;

/// Errors that can occur while registering or running commands.
#[derive(Debug, Error)]
pub enum CommandError {
    /// The invocation protocol was misused. This is a programming error.
    #[error("Contract violation in command '{command}': {violation}")]
    ContractViolation { command: String, violation: ContractViolation },

    /// Command not registered.
    #[error("Command not found: {0}")]
    NotFound(String),

    /// A command with the same full id is already registered.
    #[error("Command '{0}' is already registered")]
    AlreadyRegistered(String),

    /// Vault lookup or mutation failed.
    #[error("Vault error: {0}")]
    Vault(String),

    /// The background execution task panicked or was cancelled.
    #[error("Execution of '{command}' did not complete: {reason}")]
    Aborted { command: String, reason: String },

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Error raised by a command's own execute body.
    #[error(transparent)]
    Execution(#[from] anyhow::Error),
}

impl CommandError {
    /// Create a contract violation error for the given command.
    pub fn violation(command: impl Into<String>, violation: ContractViolation) -> Self {
        Self::ContractViolation { command: command.into(), violation }
    }

    /// Check whether this error is a protocol misuse rather than a runtime failure.
    pub fn is_contract_violation(&self) -> bool {
        matches!(self, Self::ContractViolation { .. })
    }

    /// Get the violation kind, if this is a contract violation.
    pub fn contract_violation(&self) -> Option<ContractViolation> {
        match self {
            Self::ContractViolation { violation, .. } => Some(*violation),
            _ => None,
        }
    }
}

/// Ways an invocation can be driven out of order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ContractViolation {
    /// `execute` ran before any feasibility check.
    #[error("execute() called before can_execute()")]
    NotChecked,

    /// `execute` ran after the feasibility check returned false.
    #[error("execute() called after can_execute() returned false")]
    CheckFailed,

    /// `execute` ran twice on the same invocation.
    #[error("execute() called on an invocation that already executed")]
    AlreadyExecuted,
}
