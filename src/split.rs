//! Computation of the share that each participant owes for a single expense.
//!
//! The calculation never fails: malformed input (no involved participants, unknown
//! split method, entries for participants that no longer exist) degrades to smaller
//! or empty share maps.

use std::collections::HashSet;

use log::{debug, warn};
use rust_decimal::{Decimal, RoundingStrategy};

use crate::types::{
    ordered_participants, Amount, Expense, OwedShares, Participant, Share, SplitMethod,
};

/// Non-target shares of an equal split with a rounding target are multiples of this.
pub const ROUNDING_STEP: Amount = 10;

/// Decimal places kept by an even split. Shares with a bounded scale add up exactly.
pub const SHARE_SCALE: u32 = 12;

const HUNDRED: Decimal = Decimal::ONE_HUNDRED;

/// Get the owed share of every participant involved in `expense`.
///
/// Only live participants (those in `participants`) can be involved. The one exception
/// is the percentage rounding remainder, which is always credited to the payer.
pub fn compute_owed_shares(expense: &Expense, participants: &[Participant]) -> OwedShares {
    let shares = match expense.split_method {
        SplitMethod::Equally => split_equally(expense, participants),
        SplitMethod::Amount => split_by_amount(expense, participants),
        SplitMethod::Percentage => split_by_percentage(expense, participants),
        SplitMethod::Unknown => {
            warn!(
                "Expense {} has an unknown split method, it contributes nothing",
                expense.id
            );
            OwedShares::new()
        }
    };
    debug!("Owed shares for expense {}: {:?}", expense.id, shares);
    shares
}

/// Participants sharing an `equally` expense, in participant order.
///
/// When the expense does not select anyone explicitly, everybody is involved.
fn involved_equally<'a>(expense: &Expense, participants: &'a [Participant]) -> Vec<&'a str> {
    let selected: HashSet<_> = expense
        .split_participants
        .iter()
        .map(String::as_str)
        .collect();
    let mut seen = HashSet::new();

    ordered_participants(participants)
        .into_iter()
        .map(|p| p.id.as_str())
        .filter(|id| selected.is_empty() || selected.contains(id))
        .filter(|id| seen.insert(*id))
        .collect()
}

fn split_equally(expense: &Expense, participants: &[Participant]) -> OwedShares {
    let involved = involved_equally(expense, participants);
    if involved.is_empty() {
        return OwedShares::new();
    }

    match expense.penny_rounding_target_id.as_deref() {
        Some(target) if involved.contains(&target) => {
            split_with_rounding_target(expense.amount, &involved, target)
        }
        Some(target) if !target.trim().is_empty() => {
            warn!(
                "Rounding target {target} of expense {} is not involved, ignoring it",
                expense.id
            );
            split_evenly(expense.amount, &involved)
        }
        _ => split_evenly(expense.amount, &involved),
    }
}

/// Every share is `amount / n`, truncated to [`SHARE_SCALE`] decimal places. The last
/// participant takes what the truncation left out, so that the shares always add up
/// to `amount`.
fn split_evenly(amount: Amount, involved: &[&str]) -> OwedShares {
    let mut shares = OwedShares::new();
    let Some((last, others)) = involved.split_last() else {
        return shares;
    };

    let amount = Decimal::from(amount);
    let quota = (amount / Decimal::from(involved.len()))
        .round_dp_with_strategy(SHARE_SCALE, RoundingStrategy::ToZero);
    let mut assigned = Decimal::ZERO;
    for p in others {
        shares.insert(p.to_string(), quota);
        assigned += quota;
    }
    shares.insert(last.to_string(), amount - assigned);

    shares
}

/// Everybody but `target` pays the ideal share rounded down to a multiple of
/// [`ROUNDING_STEP`]; `target` absorbs the whole remainder.
fn split_with_rounding_target(amount: Amount, involved: &[&str], target: &str) -> OwedShares {
    let count = involved.len() as Amount;
    let rounded = amount.div_euclid(ROUNDING_STEP * count) * ROUNDING_STEP;

    let mut shares = OwedShares::new();
    for p in involved.iter().filter(|p| **p != target) {
        shares.insert(p.to_string(), Share::from(rounded));
    }
    shares.insert(
        target.to_string(),
        Share::from(amount - rounded * (count - 1)),
    );

    shares
}

/// Strictly positive `split_details` entries of live participants, by ascending id.
fn positive_entries<'a>(
    expense: &'a Expense,
    participants: &[Participant],
) -> Vec<(&'a str, Decimal)> {
    let live: HashSet<_> = participants.iter().map(|p| p.id.as_str()).collect();

    expense
        .split_details
        .iter()
        .filter(|(id, value)| live.contains(id.as_str()) && **value > Decimal::ZERO)
        .map(|(id, value)| (id.as_str(), *value))
        .collect()
}

/// Fixed amounts are taken as they are, once per participant.
fn split_by_amount(expense: &Expense, participants: &[Participant]) -> OwedShares {
    positive_entries(expense, participants)
        .into_iter()
        .map(|(id, value)| (id.to_string(), value))
        .collect()
}

/// Each share is rounded down to whole units; the payer absorbs the remainder.
fn split_by_percentage(expense: &Expense, participants: &[Participant]) -> OwedShares {
    let amount = Decimal::from(expense.amount);
    let mut shares = OwedShares::new();
    let mut assigned = Decimal::ZERO;

    for (id, percentage) in positive_entries(expense, participants) {
        let Some((share, total)) = amount
            .checked_mul(percentage)
            .map(|product| (product / HUNDRED).floor())
            .and_then(|share| Some((share, assigned.checked_add(share)?)))
        else {
            warn!(
                "Percentage {percentage} of {id} in expense {} is out of range, ignoring it",
                expense.id
            );
            continue;
        };
        shares.insert(id.to_string(), share);
        assigned = total;
    }

    let remainder = amount - assigned;
    if remainder > Decimal::ZERO {
        if let Some(payer) = expense.payer() {
            *shares.entry(payer.to_string()).or_insert(Decimal::ZERO) += remainder;
        }
    }

    shares
}
