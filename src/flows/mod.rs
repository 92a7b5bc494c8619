//! The interactive controls of the application.
//!
//! Each flow owns the draft state of one control and one `Mutation` per kind of write it can
//! trigger. Data shown by a flow, such as the list of categories, belongs to the caller and is
//! handed in with a setter; after a successful write the flow updates its own copy so that the
//! caller can re-fetch at leisure. Dropping a flow cancels whatever it still has in flight.

mod auth;
mod category_picker;
mod transaction_form;
mod transaction_list;

pub use auth::{LoginForm, RegisterForm};
pub use category_picker::CategoryPicker;
pub use transaction_form::TransactionForm;
pub use transaction_list::{format_amount, format_date, TransactionList, TransactionRow};
