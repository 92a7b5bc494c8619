//! Client-side behavior of a personal budget tracker.
//!
//! The screens of the application (login, register, transaction list and form, category picker)
//! are modelled as flows in [`flows`]. Each flow keeps its draft state in [`form`] types and runs
//! its create, edit and delete operations through a [`mutation::Mutation`], which owns the busy
//! flag, error surfacing, re-entrancy guard and cancellation. Persistence goes through the
//! [`BudgetApi`] collaborator.

mod api;
pub mod args;
pub mod commands;
mod config;
mod error;
pub mod flows;
pub mod form;
pub mod messages;
pub mod model;
pub mod mutation;
mod session;
mod utils;

pub use api::{connect, BudgetApi, HttpApi, Mode, Page, TestApi};
pub use config::Config;
pub use error::{Error, Result};
pub use session::{SessionStore, Token};
