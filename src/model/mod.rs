//! Types that represent the data model, such as `Transaction` and `Category`.
mod amount;
mod budget;
mod category;
mod transaction;
mod user;

pub use amount::{Amount, AmountError};
pub use budget::Budget;
pub use category::{Category, NewCategory};
pub use transaction::{NewTransaction, Transaction, TransactionType};
pub use user::{AuthResponse, Credentials, Registration, User};
