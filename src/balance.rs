//! Folding of all expenses into one net balance per participant.

use std::collections::BTreeMap;

use log::Level::Debug;
use log::{debug, log_enabled, warn};
use rust_decimal::Decimal;

use crate::split::compute_owed_shares;
use crate::transfers::EPSILON;
use crate::types::{Balances, Expense, Participant, ParticipantId, Share};

/// How much each participant paid and how much they owe, over all expenses.
///
/// Both maps hold an entry for every live participant, zero included. Shares and
/// payments referring to ids that are not live participants are dropped.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Totals {
    pub paid: BTreeMap<ParticipantId, Share>,
    pub owed: BTreeMap<ParticipantId, Share>,
}

impl Totals {
    /// `paid - owed` for every participant.
    pub fn balances(&self) -> Balances {
        self.paid
            .iter()
            .map(|(p, paid)| {
                let owed = self.owed.get(p).copied().unwrap_or(Decimal::ZERO);
                (p.clone(), *paid - owed)
            })
            .collect()
    }
}

pub fn compute_totals(participants: &[Participant], expenses: &[Expense]) -> Totals {
    let mut totals = Totals::default();
    for p in participants {
        totals.paid.insert(p.id.clone(), Decimal::ZERO);
        totals.owed.insert(p.id.clone(), Decimal::ZERO);
    }

    for expense in expenses {
        for (p, share) in compute_owed_shares(expense, participants) {
            let Some(owed) = totals.owed.get_mut(&p) else {
                continue;
            };
            match owed.checked_add(share) {
                Some(sum) => *owed = sum,
                None => warn!(
                    "Share {share} of {p} in expense {} is out of range, ignoring it",
                    expense.id
                ),
            }
        }
        if let Some(paid) = expense.payer().and_then(|payer| totals.paid.get_mut(payer)) {
            *paid += Decimal::from(expense.amount);
        }
    }

    totals
}

/// Get the net balance of every participant: positive balances must be received,
/// negative ones must be paid.
///
/// Balances add up to zero as long as every expense has a live payer and its shares
/// add up to its amount.
pub fn compute_balances(participants: &[Participant], expenses: &[Expense]) -> Balances {
    let balances = compute_totals(participants, expenses).balances();

    if log_enabled!(Debug) {
        let sum = balances
            .values()
            .try_fold(Decimal::ZERO, |sum, b| sum.checked_add(*b));
        if !matches!(sum, Some(sum) if sum.abs() <= EPSILON) {
            debug!("Total sum of balances should be 0. In reality it is {sum:?}");
            debug!("{:?}", &balances);
        }
    }

    balances
}
