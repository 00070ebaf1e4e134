//! Plain data records exchanged with the persistence and routing layers.
//!
//! Amounts that enter or leave the engine are integer minor units ([`Amount`]).
//! Everything computed in between (owed shares, balances) is a [`Share`], an exact
//! decimal that is rounded only at the output boundary.

use std::collections::BTreeMap;

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

pub type Amount = i64;
pub type Share = Decimal;

pub type ParticipantId = String;
pub type ExpenseId = String;
pub type CategoryId = String;

/// Owed share of each involved participant for a single expense.
pub type OwedShares = BTreeMap<ParticipantId, Share>;

/// Signed net position of each participant: positive means they must receive money.
pub type Balances = BTreeMap<ParticipantId, Share>;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Participant {
    pub id: ParticipantId,
    pub name: String,
    #[serde(default)]
    pub order_index: i64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SplitMethod {
    Equally,
    Amount,
    Percentage,
    /// Any method name the engine does not know. Such expenses contribute nothing.
    #[serde(other)]
    Unknown,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Expense {
    pub id: ExpenseId,
    #[serde(default)]
    pub desc: String,
    pub amount: Amount,
    #[serde(default)]
    pub payer_id: Option<ParticipantId>,
    pub split_method: SplitMethod,
    /// Meaning depends on `split_method`: fixed amounts or percentages.
    #[serde(default)]
    pub split_details: BTreeMap<ParticipantId, Decimal>,
    /// Only meaningful for [`SplitMethod::Equally`].
    #[serde(default)]
    pub split_participants: Vec<ParticipantId>,
    /// Entries that were fixed by hand while building `split_details`. Informational only.
    #[serde(default)]
    pub locked_participant_ids: Vec<ParticipantId>,
    /// Only meaningful for [`SplitMethod::Equally`].
    #[serde(default)]
    pub penny_rounding_target_id: Option<ParticipantId>,
    #[serde(default)]
    pub category_id: Option<CategoryId>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    #[serde(default)]
    pub emoji: String,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub participants: Vec<Participant>,
    #[serde(default)]
    pub expenses: Vec<Expense>,
    #[serde(default)]
    pub categories: Vec<Category>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transfer {
    pub from: String,
    pub to: String,
    pub amount: Amount,
}

impl Participant {
    pub fn new(id: &str, name: &str, order_index: i64) -> Participant {
        Participant {
            id: id.to_string(),
            name: name.to_string(),
            order_index,
        }
    }
}

impl Expense {
    pub fn new(id: &str, desc: &str, amount: Amount, payer_id: &str, method: SplitMethod) -> Expense {
        Expense {
            id: id.to_string(),
            desc: desc.to_string(),
            amount,
            payer_id: Some(payer_id.to_string()),
            split_method: method,
            split_details: BTreeMap::new(),
            split_participants: vec![],
            locked_participant_ids: vec![],
            penny_rounding_target_id: None,
            category_id: None,
        }
    }

    pub fn with_split_details<T: Into<Decimal> + Copy>(mut self, details: &[(&str, T)]) -> Expense {
        self.split_details = details
            .iter()
            .map(|(id, value)| (id.to_string(), (*value).into()))
            .collect();
        self
    }

    pub fn with_split_participants(mut self, participants: &[&str]) -> Expense {
        self.split_participants = participants.iter().map(|p| p.to_string()).collect();
        self
    }

    pub fn with_penny_rounding_target(mut self, target: &str) -> Expense {
        self.penny_rounding_target_id = Some(target.to_string());
        self
    }

    pub fn with_category(mut self, category_id: &str) -> Expense {
        self.category_id = Some(category_id.to_string());
        self
    }

    /// The payer id, if one is set and non-blank.
    pub fn payer(&self) -> Option<&str> {
        self.payer_id
            .as_deref()
            .filter(|payer| !payer.trim().is_empty())
    }
}

impl Category {
    pub fn new(id: &str, name: &str, emoji: &str) -> Category {
        Category {
            id: id.to_string(),
            name: name.to_string(),
            emoji: emoji.to_string(),
        }
    }
}

impl Project {
    pub fn new(participants: Vec<Participant>, expenses: Vec<Expense>) -> Project {
        Project {
            participants,
            expenses,
            ..Default::default()
        }
    }

    pub fn with_categories(mut self, categories: Vec<Category>) -> Project {
        self.categories = categories;
        self
    }

    /// Sum of all expense amounts.
    pub fn total_amount(&self) -> Amount {
        self.expenses
            .iter()
            .fold(0, |total, e| total.saturating_add(e.amount))
    }
}

impl Transfer {
    pub fn new(from: &str, to: &str, amount: Amount) -> Transfer {
        Transfer {
            from: from.to_string(),
            to: to.to_string(),
            amount,
        }
    }
}

/// Participants sorted by `order_index`, keeping input order among equal indices.
pub fn ordered_participants(participants: &[Participant]) -> Vec<&Participant> {
    let mut ordered: Vec<_> = participants.iter().collect();
    ordered.sort_by_key(|p| p.order_index);
    ordered
}

/// Round a share to whole minor units, half away from zero.
///
/// Values that do not fit an [`Amount`] saturate.
pub fn round_to_amount(share: Share) -> Amount {
    let rounded = share.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);
    rounded.to_i64().unwrap_or(if rounded.is_sign_negative() {
        Amount::MIN
    } else {
        Amount::MAX
    })
}
