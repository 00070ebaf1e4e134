//! The algorithms that turn balances and expenses into lists of money transfers.
//!
//! - [`plan_transfers`] nets everything and settles with as few transfers as a greedy
//!   matching finds.
//! - [`enumerate_gross_transfers`] lists every ower→payer obligation without netting.

use std::collections::{BTreeMap, HashMap, HashSet};

use log::{debug, warn};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::split::compute_owed_shares;
use crate::types::{
    round_to_amount, Amount, Balances, Expense, Participant, ParticipantId, Share, Transfer,
};

/// Balances closer than this to zero are rounding dust.
pub const EPSILON: Decimal = dec!(0.01);

/// Get a list of transfers which settle the given balances.
///
/// The algorithm works as follows:
/// - split participants into creditors (positive balance), sorted from the largest
///   credit, and debtors (negative balance), sorted from the largest debt
/// - take the first creditor *c* and the first debtor *d* and let *d* give
///   `min(c, |d|)` to *c*
/// - drop whoever has been settled (within [`EPSILON`]) and repeat
/// - stop when there are no more creditors or no more debtors
///
/// The solution is correct but not necessarily optimal, in the sense that it may
/// require more transfers than needed. Finding the minimum is NP-complete and this
/// approximation is normally good enough.
///
/// Amounts are rounded to whole units only when a transfer is emitted. Rounding is done
/// on the running total received by each creditor, so a creditor always receives its
/// balance within one unit. A transfer that rounds to zero is dropped, and its
/// fraction is carried over to the next transfer towards the same creditor.
pub fn plan_transfers(balances: &Balances) -> Vec<Transfer> {
    // Ties are broken by id, since the map iterates in id order and the sort is stable.
    let mut creditors: Vec<(&ParticipantId, Share)> = balances
        .iter()
        .filter(|(_, b)| **b > Decimal::ZERO)
        .map(|(p, b)| (p, *b))
        .collect();
    let mut debtors: Vec<(&ParticipantId, Share)> = balances
        .iter()
        .filter(|(_, b)| **b < Decimal::ZERO)
        .map(|(p, b)| (p, *b))
        .collect();
    creditors.sort_by(|x, y| y.1.cmp(&x.1));
    debtors.sort_by(|x, y| x.1.cmp(&y.1));

    let mut received = vec![RunningTotal::default(); creditors.len()];
    let mut result = vec![];
    let (mut c, mut d) = (0, 0);

    while c < creditors.len() && d < debtors.len() {
        let (creditor, credit) = creditors[c];
        let (debtor, debt) = debtors[d];
        let amount = credit.min(-debt);

        if amount > EPSILON {
            let rounded = received[c].add(amount);
            if rounded > 0 {
                result.push(Transfer::new(debtor, creditor, rounded));
            } else {
                debug!("Dropping transfer {debtor} -> {creditor} of {amount}: rounds to zero");
            }
        }

        creditors[c].1 -= amount;
        debtors[d].1 += amount;

        if creditors[c].1 < EPSILON {
            c += 1;
        }
        if debtors[d].1.abs() < EPSILON {
            d += 1;
        }
    }

    let creditors = &creditors[c..];
    let debtors = &debtors[d..];
    if creditors.iter().any(|(_, b)| *b >= Decimal::ONE) {
        warn!("We run out of debtors but we still have creditors: {creditors:?}");
    } else if debtors.iter().any(|(_, b)| *b <= Decimal::NEGATIVE_ONE) {
        warn!("We run out of creditors but we still have debtors: {debtors:?}");
    }

    result
}

/// Get every obligation `ower → payer`, summed per pair of participants.
///
/// For each expense, every live participant with a positive share who is not the
/// payer owes that share to the payer. Obligations in opposite directions are kept
/// apart. Expenses whose payer is not a live participant are skipped.
pub fn gross_obligations(
    participants: &[Participant],
    expenses: &[Expense],
) -> BTreeMap<(ParticipantId, ParticipantId), Share> {
    let live: HashSet<_> = participants.iter().map(|p| p.id.as_str()).collect();
    let mut obligations: BTreeMap<(ParticipantId, ParticipantId), Share> = BTreeMap::new();

    for expense in expenses {
        let Some(payer) = expense.payer().filter(|payer| live.contains(payer)) else {
            debug!("Expense {} has no live payer, no obligations", expense.id);
            continue;
        };
        for (p, share) in compute_owed_shares(expense, participants) {
            if share <= Decimal::ZERO || p == payer || !live.contains(p.as_str()) {
                continue;
            }
            let total = obligations
                .entry((p, payer.to_string()))
                .or_insert(Decimal::ZERO);
            match total.checked_add(share) {
                Some(sum) => *total = sum,
                None => warn!(
                    "Share {share} of expense {} is out of range, ignoring it",
                    expense.id
                ),
            }
        }
    }

    obligations
}

/// Un-netted transfer list: one transfer per pair of participants, in order of
/// debtor first and creditor second.
///
/// As in [`plan_transfers`], rounding is done on the running total received by each
/// payer, so that what a payer receives is within one unit of what they are owed.
pub fn enumerate_gross_transfers(
    participants: &[Participant],
    expenses: &[Expense],
) -> Vec<Transfer> {
    let mut received: HashMap<ParticipantId, RunningTotal> = HashMap::new();

    gross_obligations(participants, expenses)
        .into_iter()
        .filter_map(|((from, to), amount)| {
            let rounded = received.entry(to.clone()).or_default().add(amount);
            (rounded > 0).then(|| Transfer::new(&from, &to, rounded))
        })
        .collect()
}

/// Exact running total of the money sent to one participant, paid out in whole units.
#[derive(Clone, Debug, Default)]
struct RunningTotal {
    exact: Share,
    paid: Amount,
}

impl RunningTotal {
    /// Add `amount` to the total and get how many whole units are now due.
    fn add(&mut self, amount: Share) -> Amount {
        self.exact = self.exact.saturating_add(amount);
        let due = round_to_amount(self.exact).saturating_sub(self.paid);
        self.paid += due;
        due
    }
}
