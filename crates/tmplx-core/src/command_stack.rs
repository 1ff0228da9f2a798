//! Undoable command log
//!
//! `CommandStack` is the in-process realisation of the command log the
//! template engine writes through. Commands are grouped into labelled
//! transactions; a transaction is undone and redone as one unit and is
//! rolled back if the work inside it fails.

use chrono::{DateTime, Utc};

use crate::apply::apply;
use crate::commands::Command;
use crate::errors::{Result, TmplxError};
use crate::ops::Document;
use crate::session::Session;

/// Sink for document mutations
///
/// Implementations apply the command to `doc` before returning, so callers
/// can read the effect back within the same run.
pub trait CommandLog {
    /// Apply `command` to `doc` and record it
    ///
    /// # Errors
    ///
    /// Returns the error from `apply()` if the command is invalid.
    fn execute(&mut self, doc: &mut Document, command: Command) -> Result<()>;
}

/// An executed command together with the command that reverts it
#[derive(Debug, Clone, PartialEq)]
pub struct Step {
    pub command: Command,
    pub inverse: Command,
}

/// A labelled group of steps that is undone and redone as a whole
#[derive(Debug, Clone)]
pub struct Transaction {
    pub label: String,
    pub executed_at: DateTime<Utc>,
    pub steps: Vec<Step>,
}

impl Transaction {
    fn new(label: &str) -> Self {
        Self {
            label: label.to_string(),
            executed_at: Utc::now(),
            steps: Vec::new(),
        }
    }

    /// Commands in execution order, for inspection or replay
    pub fn commands(&self) -> impl Iterator<Item = &Command> {
        self.steps.iter().map(|s| &s.command)
    }
}

/// Command stack with transactions, undo and redo
#[derive(Debug, Default)]
pub struct CommandStack {
    done: Vec<Transaction>,
    undone: Vec<Transaction>,
    open: Option<Transaction>,
}

impl CommandStack {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `f` as one transaction
    ///
    /// Every command `f` issues through the session joins the transaction.
    /// If `f` fails, the commands already applied are reverted and the error
    /// is returned. A transaction that issued no command is not recorded.
    /// Calls nested inside an open transaction join the outer one.
    ///
    /// # Errors
    ///
    /// Returns the error produced by `f`, or a rollback failure.
    pub fn transact<T, F>(&mut self, doc: &mut Document, label: &str, f: F) -> Result<T>
    where
        F: FnOnce(&mut Session<'_>) -> Result<T>,
    {
        if self.open.is_some() {
            let mut session = Session::new(doc, self);
            return f(&mut session);
        }

        self.open = Some(Transaction::new(label));
        let result = {
            let mut session = Session::new(doc, self);
            f(&mut session)
        };
        let transaction = self.open.take().ok_or_else(|| TmplxError::Internal {
            message: format!("transaction '{}' closed while running", label),
        })?;

        match result {
            Ok(value) => {
                if !transaction.steps.is_empty() {
                    tracing::debug!(
                        label = %transaction.label,
                        command_count = transaction.steps.len(),
                        "transaction committed"
                    );
                    self.done.push(transaction);
                    self.undone.clear();
                }
                Ok(value)
            }
            Err(err) => {
                tracing::warn!(
                    label = %transaction.label,
                    command_count = transaction.steps.len(),
                    error = %err,
                    "transaction rolled back"
                );
                revert(doc, &transaction)?;
                Err(err)
            }
        }
    }

    /// Undo the most recent transaction; `false` if there is none
    ///
    /// # Errors
    ///
    /// Returns an error if the document no longer accepts an inverse command.
    pub fn undo(&mut self, doc: &mut Document) -> Result<bool> {
        let Some(transaction) = self.done.pop() else {
            return Ok(false);
        };
        revert(doc, &transaction)?;
        self.undone.push(transaction);
        Ok(true)
    }

    /// Redo the most recently undone transaction; `false` if there is none
    ///
    /// # Errors
    ///
    /// Returns an error if a recorded command no longer applies.
    pub fn redo(&mut self, doc: &mut Document) -> Result<bool> {
        let Some(transaction) = self.undone.pop() else {
            return Ok(false);
        };
        for step in &transaction.steps {
            apply(doc, &step.command)?;
        }
        self.done.push(transaction);
        Ok(true)
    }

    pub fn can_undo(&self) -> bool {
        !self.done.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.undone.is_empty()
    }

    /// Committed transactions, oldest first
    pub fn transactions(&self) -> &[Transaction] {
        &self.done
    }

    /// Total number of commands across committed transactions
    pub fn command_count(&self) -> usize {
        self.done.iter().map(|t| t.steps.len()).sum()
    }
}

impl CommandLog for CommandStack {
    fn execute(&mut self, doc: &mut Document, command: Command) -> Result<()> {
        let inverse = apply(doc, &command)?;
        let step = Step { command, inverse };

        match self.open.as_mut() {
            Some(transaction) => transaction.steps.push(step),
            None => {
                let mut transaction = Transaction::new("command");
                transaction.steps.push(step);
                self.done.push(transaction);
                self.undone.clear();
            }
        }
        Ok(())
    }
}

fn revert(doc: &mut Document, transaction: &Transaction) -> Result<()> {
    for step in transaction.steps.iter().rev() {
        apply(doc, &step.inverse)?;
    }
    Ok(())
}
