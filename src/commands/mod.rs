//! Command handlers for the budget CLI.
//!
//! Each handler drives the same flow a screen would drive, and turns its `Outcome` into a
//! `Result`. Failures are reported with the message the flow shows to the user.

mod auth;
mod categories;
mod init;
mod transactions;

use crate::mutation::{MutationState, Outcome};
use crate::Result;
use anyhow::{bail, Context};
use serde::Serialize;
use std::fmt::Debug;
use std::io::{BufRead, Write};
use tracing::{debug, info};

pub use auth::{login, logout, register, whoami};
pub use categories::{add_category, delete_category, list_categories};
pub use init::init;
pub use transactions::{
    add_transaction, delete_transaction, edit_transaction, list_transactions, TransactionPage,
};

/// The output type for a command. This allows the command to return a consistent message and,
/// optionally, structured data.
#[derive(Debug, Clone, Serialize)]
pub struct Out<T>
where
    T: Serialize + Clone + Debug,
{
    /// A message that can be printed to the user regarding the outcome of the command execution.
    message: String,

    /// Any structured data that needs to be output from the call.
    structure: Option<T>,
}

impl<T, S> From<S> for Out<T>
where
    T: Debug + Clone + Serialize,
    S: Into<String>,
{
    fn from(value: S) -> Self {
        Out::new_message(value)
    }
}

impl<T> Out<T>
where
    T: Serialize + Clone + Debug,
{
    /// Create a new `Out` object that has `Some(structure)`.
    pub fn new<S>(message: S, structure: T) -> Self
    where
        S: Into<String>,
    {
        Self {
            message: message.into(),
            structure: Some(structure),
        }
    }

    /// Create a new `Out` object that has `None` for `structure`.
    pub fn new_message<S>(message: S) -> Self
    where
        S: Into<String>,
    {
        Self {
            message: message.into(),
            structure: None,
        }
    }

    /// Get the `message`.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Get the structured data stored in `structure`.
    pub fn structure(&self) -> Option<&T> {
        self.structure.as_ref()
    }

    /// Print the message to `info!` and the structured data (if it exists) as JSON to `debug!`.
    pub fn print(&self) {
        info!("{}", self.message);
        if let Some(structure) = self.structure() {
            if let Ok(json) = serde_json::to_string_pretty(structure) {
                debug!("Command output:\n\n{json}\n\n");
            }
        }
    }
}

/// Asks the user to confirm a destructive action.
pub trait Confirm {
    fn confirm(&mut self, question: &str) -> Result<bool>;
}

/// Asks on stderr and reads the answer from stdin. Anything but `y`, `yes`, `o` or `oui` is a no.
#[derive(Debug, Default, Clone, Copy)]
pub struct Prompt;

impl Confirm for Prompt {
    fn confirm(&mut self, question: &str) -> Result<bool> {
        let mut stderr = std::io::stderr();
        write!(stderr, "{question} [y/N] ").context("Unable to write the prompt")?;
        stderr.flush().context("Unable to write the prompt")?;
        let mut answer = String::new();
        let _ = std::io::stdin()
            .lock()
            .read_line(&mut answer)
            .context("Unable to read the answer")?;
        Ok(is_yes(&answer))
    }
}

impl<F> Confirm for F
where
    F: FnMut(&str) -> bool,
{
    fn confirm(&mut self, question: &str) -> Result<bool> {
        Ok(self(question))
    }
}

fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes" | "o" | "oui")
}

/// Turns the outcome of a flow into a `Result`. `state` is the state of the mutation that
/// produced `outcome`.
fn finish(outcome: Outcome, state: &MutationState) -> Result<()> {
    match outcome {
        Outcome::Succeeded => Ok(()),
        Outcome::Invalid(errors) => bail!("{}", errors.summary()),
        Outcome::Failed => bail!("{}", state.error().unwrap_or("The request failed")),
        Outcome::Busy => bail!("Another request is still running"),
        Outcome::Skipped => bail!("Nothing to do"),
        Outcome::Discarded => bail!("The request was cancelled"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form::{Field, FieldErrors};

    #[test]
    fn test_is_yes() {
        assert!(is_yes("y\n"));
        assert!(is_yes(" YES "));
        assert!(is_yes("oui"));
        assert!(!is_yes("\n"));
        assert!(!is_yes("nope"));
    }

    #[test]
    fn test_finish_invalid_uses_summary() {
        let errors: FieldErrors = [(Field::Amount, "bad")].into_iter().collect();
        let err = finish(Outcome::Invalid(errors), &MutationState::default()).unwrap_err();
        assert_eq!(err.to_string(), "amount: bad");
    }

    #[test]
    fn test_closure_confirm() {
        let mut asked = Vec::new();
        let mut confirm = |q: &str| {
            asked.push(q.to_string());
            false
        };
        assert!(!confirm.confirm("sure?").unwrap());
        assert_eq!(asked, vec!["sure?"]);
    }
}
