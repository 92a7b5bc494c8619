use crate::model::Amount;
use serde::{Deserialize, Serialize};

/// A monthly spending limit for one category.
///
/// The API exposes budgets, but no flow reads or writes them yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Budget {
    pub(crate) id: String,
    pub(crate) category_id: String,
    pub(crate) amount: Amount,
    pub(crate) month: u32,
    pub(crate) year: i32,
}

impl Budget {
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn category_id(&self) -> &str {
        &self.category_id
    }

    pub fn amount(&self) -> Amount {
        self.amount
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    pub fn year(&self) -> i32 {
        self.year
    }
}
