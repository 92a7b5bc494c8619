//! The lifecycle of one user-triggered write: create, edit or delete.
//!
//! A [`Mutation`] coordinates a single kind of write for one control. It validates the payload
//! before anything is sent, holds the busy flag while the collaborator works, turns a rejection
//! into a static message, and refuses to start a second write while one is outstanding.
//!
//! ```text
//! Idle    --(submit, invalid)--> Idle (field errors set)
//! Idle    --(submit, valid)----> Pending
//! Pending --(resolves)---------> Idle (Outcome::Succeeded)
//! Pending --(rejects)----------> Idle (error set, Outcome::Failed)
//! Pending --(submit)-----------> Pending (ignored, Outcome::Busy)
//! Pending --(cancel)-----------> Idle (late result ignored, Outcome::Discarded)
//! Pending --(future dropped)---> Idle (generation bumped)
//! ```
//!
//! State is published on a `tokio::sync::watch` channel so that a view can re-render whenever it
//! changes.

mod confirm;

pub use confirm::ConfirmGate;

use crate::form::{Field, FieldErrors};
use crate::Result;
use std::future::Future;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{debug, trace};

/// A snapshot of a mutation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MutationState {
    busy: bool,
    error: Option<String>,
    field_errors: FieldErrors,
    /// Bumped by `cancel`. A write only applies its result if the generation it started under is
    /// still current.
    generation: u64,
}

impl MutationState {
    pub fn is_busy(&self) -> bool {
        self.busy
    }

    /// The message of the last failed write, if any.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn field_errors(&self) -> &FieldErrors {
        &self.field_errors
    }

    pub fn field_error(&self, field: Field) -> Option<&str> {
        self.field_errors.get(field)
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// How a call to [`Mutation::submit`] ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The collaborator accepted the write.
    Succeeded,
    /// Local validation failed; nothing was sent.
    Invalid(FieldErrors),
    /// The collaborator rejected the write; the state now carries the failure message.
    Failed,
    /// Another write was already in flight; nothing was sent.
    Busy,
    /// There was nothing to send, e.g. a confirmation with no pending target.
    Skipped,
    /// The mutation was cancelled while the write was in flight and its result was dropped.
    Discarded,
}

impl Outcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Succeeded)
    }
}

/// Coordinates one kind of asynchronous write. Cloning yields a handle to the same state.
#[derive(Debug, Clone)]
pub struct Mutation {
    inner: Arc<Inner>,
}

#[derive(Debug)]
struct Inner {
    name: &'static str,
    failure_message: &'static str,
    state: watch::Sender<MutationState>,
}

impl Mutation {
    /// Creates an idle mutation. `name` is used in logs; `failure_message` is what the user sees
    /// when the collaborator rejects the write.
    pub fn new(name: &'static str, failure_message: &'static str) -> Self {
        let (state, _) = watch::channel(MutationState::default());
        Self {
            inner: Arc::new(Inner {
                name,
                failure_message,
                state,
            }),
        }
    }

    pub fn name(&self) -> &'static str {
        self.inner.name
    }

    /// A receiver that is notified every time the state changes.
    pub fn subscribe(&self) -> watch::Receiver<MutationState> {
        self.inner.state.subscribe()
    }

    pub fn state(&self) -> MutationState {
        self.inner.state.borrow().clone()
    }

    pub fn is_busy(&self) -> bool {
        self.inner.state.borrow().busy
    }

    pub fn error(&self) -> Option<String> {
        self.inner.state.borrow().error.clone()
    }

    pub fn field_error(&self, field: Field) -> Option<String> {
        self.inner
            .state
            .borrow()
            .field_errors
            .get(field)
            .map(str::to_string)
    }

    pub fn field_errors(&self) -> FieldErrors {
        self.inner.state.borrow().field_errors.clone()
    }

    /// Picks the button label for the current state.
    pub fn label(&self, idle: &'static str, busy: &'static str) -> &'static str {
        if self.is_busy() {
            busy
        } else {
            idle
        }
    }

    /// Forgets the error for `field`, as when the user edits it.
    pub fn clear_field_error(&self, field: Field) {
        self.inner
            .state
            .send_if_modified(|s| s.field_errors.remove(field));
    }

    /// Forgets the failure message.
    pub fn clear_error(&self) {
        self.inner.state.send_if_modified(|s| s.error.take().is_some());
    }

    /// Forgets every error, field-scoped or not.
    pub fn clear_errors(&self) {
        self.inner.state.send_if_modified(|s| {
            let changed = s.error.is_some() || !s.field_errors.is_empty();
            s.error = None;
            s.field_errors.clear();
            changed
        });
    }

    /// Abandons the write in flight, if any. The mutation becomes idle immediately and the
    /// result of the abandoned write, whenever it arrives, leaves the state untouched.
    pub fn cancel(&self) {
        self.inner.state.send_if_modified(|s| {
            s.generation = s.generation.wrapping_add(1);
            let was_busy = s.busy;
            s.busy = false;
            was_busy
        });
    }

    /// Runs one write.
    ///
    /// - If a write is already in flight, returns `Outcome::Busy` without calling anything.
    /// - `validate` runs first; if it reports any error, those errors become the field errors of
    ///   the state and `perform` is never called.
    /// - Otherwise the state turns busy before `perform` is polled, and turns idle exactly once
    ///   when its future settles. A rejection is replaced by the failure message of this
    ///   mutation; the error itself is dropped.
    /// - If the returned future is dropped before `perform` settles, the mutation goes back to
    ///   idle as if `cancel` had been called.
    pub async fn submit<P, V, F, Fut>(&self, payload: P, validate: V, perform: F) -> Outcome
    where
        V: FnOnce(&P) -> FieldErrors,
        F: FnOnce(P) -> Fut,
        Fut: Future<Output = Result<()>>,
    {
        if self.is_busy() {
            trace!(mutation = self.name(), "ignoring submit while busy");
            return Outcome::Busy;
        }

        let errors = validate(&payload);
        if !errors.is_empty() {
            debug!(
                mutation = self.name(),
                "validation failed: {}",
                errors.summary()
            );
            let field_errors = errors.clone();
            self.inner.state.send_modify(|s| {
                s.error = None;
                s.field_errors = field_errors;
            });
            return Outcome::Invalid(errors);
        }

        let generation = match self.begin() {
            Some(generation) => generation,
            None => return Outcome::Busy,
        };
        let pending = Pending {
            mutation: self,
            generation: Some(generation),
        };
        trace!(mutation = self.name(), generation, "dispatching");
        let result = perform(payload).await;
        pending.settle(result)
    }

    /// Runs a confirmed write for the target held by `gate`. The gate is closed only when the
    /// write succeeds, so that after a failure the user can retry or cancel.
    pub async fn submit_confirmed<T, F, Fut>(
        &self,
        gate: &mut ConfirmGate<T>,
        perform: F,
    ) -> Outcome
    where
        T: Clone,
        F: FnOnce(T) -> Fut,
        Fut: Future<Output = Result<()>>,
    {
        let target = match gate.target() {
            Some(target) => target.clone(),
            None => return Outcome::Skipped,
        };
        let outcome = self.submit(target, |_| FieldErrors::new(), perform).await;
        if outcome.is_success() {
            gate.close();
        }
        outcome
    }

    /// Marks the mutation busy and returns the generation the write runs under, or `None` if
    /// another write got there first.
    fn begin(&self) -> Option<u64> {
        let mut generation = None;
        self.inner.state.send_if_modified(|s| {
            if s.busy {
                return false;
            }
            s.busy = true;
            s.error = None;
            s.field_errors.clear();
            generation = Some(s.generation);
            true
        });
        generation
    }

    /// Resets a write whose future was dropped before it settled. Same effect as `cancel`, but
    /// only if `generation` is still current.
    fn abandon(&self, generation: u64) {
        let abandoned = self.inner.state.send_if_modified(|s| {
            if s.generation != generation {
                return false;
            }
            s.generation = s.generation.wrapping_add(1);
            s.busy = false;
            true
        });
        if abandoned {
            debug!(mutation = self.name(), generation, "abandoned in flight");
        }
    }

    fn settle(&self, generation: u64, result: Result<()>) -> Outcome {
        let failure_message = self.inner.failure_message;
        let mut outcome = Outcome::Discarded;
        self.inner.state.send_if_modified(|s| {
            if s.generation != generation {
                return false;
            }
            s.busy = false;
            if result.is_ok() {
                outcome = Outcome::Succeeded;
            } else {
                s.error = Some(failure_message.to_string());
                outcome = Outcome::Failed;
            }
            true
        });
        debug!(mutation = self.name(), "settled: {outcome:?}");
        outcome
    }
}

/// Held by `submit` while `perform` runs. If the submit future is dropped first, dropping this
/// puts the mutation back to idle.
struct Pending<'a> {
    mutation: &'a Mutation,
    generation: Option<u64>,
}

impl Pending<'_> {
    fn settle(mut self, result: Result<()>) -> Outcome {
        match self.generation.take() {
            Some(generation) => self.mutation.settle(generation, result),
            None => Outcome::Discarded,
        }
    }
}

impl Drop for Pending<'_> {
    fn drop(&mut self) {
        if let Some(generation) = self.generation.take() {
            self.mutation.abandon(generation);
        }
    }
}
