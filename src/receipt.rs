//! Per-participant itemized breakdown of owed shares, grouped by category.

use std::collections::HashMap;

use log::warn;
use rust_decimal::Decimal;

use crate::split::compute_owed_shares;
use crate::types::{
    ordered_participants, Category, CategoryId, Expense, ExpenseId, OwedShares, Participant,
    ParticipantId, Share,
};

pub const UNCATEGORIZED_NAME: &str = "Uncategorized";
pub const UNCATEGORIZED_EMOJI: &str = "🧾";
pub const UNKNOWN_PAYER_NAME: &str = "Unknown";

#[derive(Clone, Debug, PartialEq)]
pub struct ExpenseDetail {
    pub expense_id: ExpenseId,
    pub expense_desc: String,
    pub payer_name: String,
    pub your_share: Share,
}

#[derive(Clone, Debug, PartialEq)]
pub struct CategorySpending {
    /// `None` for expenses without a (known) category.
    pub category_id: Option<CategoryId>,
    pub category_emoji: String,
    pub category_name: String,
    pub total_amount: Share,
    pub expense_details: Vec<ExpenseDetail>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Receipt {
    pub participant_id: ParticipantId,
    pub participant_name: String,
    pub total_spent: Share,
    pub spent_by_category: Vec<CategorySpending>,
}

/// Build one receipt per participant, in participant order.
///
/// Category groups appear in the order in which their first expense appears.
/// Expenses with no category, or with a category that does not exist, end up in a
/// single uncategorized group.
pub fn build_receipts(
    participants: &[Participant],
    expenses: &[Expense],
    categories: &[Category],
) -> Vec<Receipt> {
    let shares: Vec<OwedShares> = expenses
        .iter()
        .map(|e| compute_owed_shares(e, participants))
        .collect();
    let categories: HashMap<_, _> = categories.iter().map(|c| (c.id.as_str(), c)).collect();
    let names: HashMap<_, _> = participants
        .iter()
        .map(|p| (p.id.as_str(), p.name.as_str()))
        .collect();

    ordered_participants(participants)
        .into_iter()
        .map(|participant| {
            let mut groups: Vec<CategorySpending> = vec![];
            let mut total_spent = Decimal::ZERO;

            for (expense, expense_shares) in expenses.iter().zip(&shares) {
                let share = match expense_shares.get(&participant.id) {
                    Some(share) if *share > Decimal::ZERO => *share,
                    _ => continue,
                };
                let Some(total) = total_spent.checked_add(share) else {
                    warn!(
                        "Share {share} of {} in expense {} is out of range, ignoring it",
                        participant.id, expense.id
                    );
                    continue;
                };
                total_spent = total;
                let category = expense
                    .category_id
                    .as_deref()
                    .and_then(|id| categories.get(id).copied());
                let category_id = category.map(|c| c.id.clone());

                let position = match groups.iter().position(|g| g.category_id == category_id) {
                    Some(position) => position,
                    None => {
                        groups.push(new_group(category));
                        groups.len() - 1
                    }
                };
                // The group total never exceeds `total_spent`, which did not overflow.
                let group = &mut groups[position];
                group.total_amount += share;
                group.expense_details.push(ExpenseDetail {
                    expense_id: expense.id.clone(),
                    expense_desc: expense.desc.clone(),
                    payer_name: expense
                        .payer()
                        .and_then(|payer| names.get(payer).copied())
                        .unwrap_or(UNKNOWN_PAYER_NAME)
                        .to_string(),
                    your_share: share,
                });
            }

            Receipt {
                participant_id: participant.id.clone(),
                participant_name: participant.name.clone(),
                total_spent,
                spent_by_category: groups,
            }
        })
        .collect()
}

fn new_group(category: Option<&Category>) -> CategorySpending {
    let (category_id, category_emoji, category_name) = match category {
        Some(c) => (Some(c.id.clone()), c.emoji.clone(), c.name.clone()),
        None => (
            None,
            UNCATEGORIZED_EMOJI.to_string(),
            UNCATEGORIZED_NAME.to_string(),
        ),
    };
    CategorySpending {
        category_id,
        category_emoji,
        category_name,
        total_amount: Decimal::ZERO,
        expense_details: vec![],
    }
}
