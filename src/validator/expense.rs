use std::collections::HashSet;

use rust_decimal::Decimal;

use crate::error::ValidationError;
use crate::types::{Expense, Participant, SplitMethod};

/// Some sanity checks on an expense, mirroring the ones made by the client.
///
/// List of checks:
/// - the amount is positive
/// - the payer is a participant of the project
/// - `equally`: selected participants exist, at least one participant is involved and
///   the rounding target (if any) is one of them
/// - `amount`: entries refer to participants, none is negative, at least one is positive
///   and they add up to the expense amount (without overflowing)
/// - `percentage`: entries refer to participants, each is between 0 and 100, at least
///   one is positive and they add up to 100
pub fn validate_expense(
    expense: &Expense,
    participants: &[Participant],
) -> Result<(), ValidationError> {
    if expense.amount <= 0 {
        return Err(ValidationError::NonPositiveAmount(expense.amount));
    }

    let live: HashSet<_> = participants.iter().map(|p| p.id.as_str()).collect();

    let payer = expense.payer().ok_or(ValidationError::MissingPayer)?;
    if !live.contains(payer) {
        return Err(ValidationError::unknown_payer(payer));
    }

    match expense.split_method {
        SplitMethod::Equally => validate_equally(expense, &live),
        SplitMethod::Amount => validate_amounts(expense, &live),
        SplitMethod::Percentage => validate_percentages(expense, &live),
        SplitMethod::Unknown => Err(ValidationError::UnknownSplitMethod),
    }
}

fn validate_equally(expense: &Expense, live: &HashSet<&str>) -> Result<(), ValidationError> {
    if let Some(p) = expense
        .split_participants
        .iter()
        .find(|p| !live.contains(p.as_str()))
    {
        return Err(ValidationError::unknown_participant(p));
    }

    // Selected participants are all live here, so only an empty project involves nobody.
    if live.is_empty() {
        return Err(ValidationError::NobodyInvolved);
    }

    let is_involved = |id: &str| {
        live.contains(id)
            && (expense.split_participants.is_empty()
                || expense.split_participants.iter().any(|p| p == id))
    };

    match expense.penny_rounding_target_id.as_deref() {
        Some(target) if !target.trim().is_empty() && !is_involved(target) => {
            Err(ValidationError::rounding_target_not_involved(target))
        }
        _ => Ok(()),
    }
}

/// All `split_details` entries must refer to participants, and at least one must be positive.
fn validate_details_refer_to_participants(
    expense: &Expense,
    live: &HashSet<&str>,
) -> Result<(), ValidationError> {
    if let Some(p) = expense
        .split_details
        .keys()
        .find(|p| !live.contains(p.as_str()))
    {
        return Err(ValidationError::unknown_participant(p));
    }
    if !expense.split_details.values().any(|v| *v > Decimal::ZERO) {
        return Err(ValidationError::NobodyInvolved);
    }
    Ok(())
}

fn details_total(expense: &Expense) -> Result<Decimal, ValidationError> {
    expense
        .split_details
        .values()
        .try_fold(Decimal::ZERO, |total, value| total.checked_add(*value))
        .ok_or(ValidationError::DetailsOutOfRange)
}

fn validate_amounts(expense: &Expense, live: &HashSet<&str>) -> Result<(), ValidationError> {
    if let Some((p, value)) = expense
        .split_details
        .iter()
        .find(|(_, v)| **v < Decimal::ZERO)
    {
        return Err(ValidationError::negative_amount(p, *value));
    }
    validate_details_refer_to_participants(expense, live)?;

    let total = details_total(expense)?;
    if total != Decimal::from(expense.amount) {
        return Err(ValidationError::AmountMismatch {
            expected: expense.amount,
            actual: total,
        });
    }
    Ok(())
}

fn validate_percentages(expense: &Expense, live: &HashSet<&str>) -> Result<(), ValidationError> {
    if let Some((p, value)) = expense
        .split_details
        .iter()
        .find(|(_, v)| **v < Decimal::ZERO || **v > Decimal::ONE_HUNDRED)
    {
        return Err(ValidationError::percentage_out_of_range(p, *value));
    }
    validate_details_refer_to_participants(expense, live)?;

    let total = details_total(expense)?;
    if total != Decimal::ONE_HUNDRED {
        return Err(ValidationError::PercentageMismatch(total));
    }
    Ok(())
}
