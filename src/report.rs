//! The presentation boundary of the engine.
//!
//! Everything computed internally is keyed by participant id and kept as exact
//! decimals. The shapes in this module are what request handlers serialize: participant
//! ids are translated to labels and every amount is rounded to whole units.

use std::collections::HashMap;

use rust_decimal::Decimal;
use serde::Serialize;

use crate::balance::compute_balances;
use crate::receipt::{build_receipts, CategorySpending, ExpenseDetail, Receipt};
use crate::transfers::{enumerate_gross_transfers, plan_transfers};
use crate::types::{round_to_amount, Amount, CategoryId, Participant, Project, Transfer};

/// How participants are named in transfer lists.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Label {
    Id,
    #[default]
    Name,
}

/// Participant labels, unique within a project.
///
/// Display names are not unique: participants sharing a name are rendered as
/// `name (id)`. If that still clashes with another label (someone may be called
/// `Anna (1)`), the clashing participants are rendered by id. Ids that do not belong to
/// any participant are rendered as they are.
pub struct Labels<'a> {
    labels: HashMap<&'a str, String>,
}

impl<'a> Labels<'a> {
    pub fn new(participants: &'a [Participant], label: Label) -> Labels<'a> {
        let name_count = count(participants.iter().map(|p| p.name.as_str()));

        let composed: Vec<(&str, String)> = participants
            .iter()
            .map(|p| {
                let text = match label {
                    Label::Id => p.id.clone(),
                    Label::Name if name_count[p.name.as_str()] > 1 => {
                        format!("{} ({})", p.name, p.id)
                    }
                    Label::Name => p.name.clone(),
                };
                (p.id.as_str(), text)
            })
            .collect();

        let label_count = count(composed.iter().map(|(_, text)| text.as_str()));
        let clashing: Vec<bool> = composed
            .iter()
            .map(|(_, text)| label_count[text.as_str()] > 1)
            .collect();

        let labels = composed
            .into_iter()
            .zip(clashing)
            .map(|((id, text), clash)| if clash { (id, id.to_string()) } else { (id, text) })
            .collect();

        Labels { labels }
    }

    pub fn of(&self, id: &str) -> String {
        self.labels
            .get(id)
            .cloned()
            .unwrap_or_else(|| id.to_string())
    }

    fn relabel(&self, transfers: Vec<Transfer>) -> Vec<Transfer> {
        transfers
            .into_iter()
            .map(|t| Transfer {
                from: self.of(&t.from),
                to: self.of(&t.to),
                amount: t.amount,
            })
            .collect()
    }
}

fn count<'a>(texts: impl Iterator<Item = &'a str>) -> HashMap<&'a str, usize> {
    let mut counts = HashMap::new();
    for text in texts {
        *counts.entry(text).or_insert(0) += 1;
    }
    counts
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SettlementSummary {
    pub total_amount: Amount,
    pub participant_count: usize,
    pub per_person_amount: Amount,
    pub transfers: Vec<Transfer>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NetGrossSettlement {
    pub net_transfers: Vec<Transfer>,
    pub gross_transfers: Vec<Transfer>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpenseDetailView {
    pub expense_id: String,
    pub expense_desc: String,
    pub payer_name: String,
    pub your_share: Amount,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryView {
    pub category_id: Option<CategoryId>,
    pub category_emoji: String,
    pub category_name: String,
    pub total_amount: Amount,
    pub expense_details: Vec<ExpenseDetailView>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReceiptView {
    pub participant_name: String,
    pub total_spent: Amount,
    pub spent_by_category: Vec<CategoryView>,
}

/// Total spent, average per participant and the netted transfers that settle the project.
///
/// With no participants there is nothing to settle: only `total_amount` is filled in.
pub fn settlement_summary(project: &Project, label: Label) -> SettlementSummary {
    let total_amount = project.total_amount();
    let participant_count = project.participants.len();

    if participant_count == 0 {
        return SettlementSummary {
            total_amount,
            participant_count,
            per_person_amount: 0,
            transfers: vec![],
        };
    }

    let per_person = Decimal::from(total_amount) / Decimal::from(participant_count);
    let balances = compute_balances(&project.participants, &project.expenses);
    let labels = Labels::new(&project.participants, label);

    SettlementSummary {
        total_amount,
        participant_count,
        per_person_amount: round_to_amount(per_person),
        transfers: labels.relabel(plan_transfers(&balances)),
    }
}

/// Netted and un-netted transfer lists side by side.
pub fn net_and_gross(project: &Project, label: Label) -> NetGrossSettlement {
    let balances = compute_balances(&project.participants, &project.expenses);
    let labels = Labels::new(&project.participants, label);

    NetGrossSettlement {
        net_transfers: labels.relabel(plan_transfers(&balances)),
        gross_transfers: labels.relabel(enumerate_gross_transfers(
            &project.participants,
            &project.expenses,
        )),
    }
}

/// One rounded receipt per participant.
pub fn receipt_list(project: &Project) -> Vec<ReceiptView> {
    build_receipts(&project.participants, &project.expenses, &project.categories)
        .iter()
        .map(ReceiptView::from)
        .collect()
}

impl From<&ExpenseDetail> for ExpenseDetailView {
    fn from(detail: &ExpenseDetail) -> Self {
        ExpenseDetailView {
            expense_id: detail.expense_id.clone(),
            expense_desc: detail.expense_desc.clone(),
            payer_name: detail.payer_name.clone(),
            your_share: round_to_amount(detail.your_share),
        }
    }
}

impl From<&CategorySpending> for CategoryView {
    fn from(group: &CategorySpending) -> Self {
        CategoryView {
            category_id: group.category_id.clone(),
            category_emoji: group.category_emoji.clone(),
            category_name: group.category_name.clone(),
            total_amount: round_to_amount(group.total_amount),
            expense_details: group
                .expense_details
                .iter()
                .map(ExpenseDetailView::from)
                .collect(),
        }
    }
}

impl From<&Receipt> for ReceiptView {
    fn from(receipt: &Receipt) -> Self {
        ReceiptView {
            participant_name: receipt.participant_name.clone(),
            total_spent: round_to_amount(receipt.total_spent),
            spent_by_category: receipt
                .spent_by_category
                .iter()
                .map(CategoryView::from)
                .collect(),
        }
    }
}
