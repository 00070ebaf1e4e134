use rust_decimal::Decimal;
use thiserror::Error;

use crate::types::Amount;

/// Reasons an expense is rejected before it reaches the settlement engine.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("the expense amount must be positive, got {0}")]
    NonPositiveAmount(Amount),

    #[error("the participant id `{0}` is used more than once")]
    DuplicateParticipant(String),

    #[error("the expense has no payer")]
    MissingPayer,

    #[error("the payer `{0}` is not a participant of this project")]
    UnknownPayer(String),

    #[error("`{0}` is not a participant of this project")]
    UnknownParticipant(String),

    #[error("nobody takes part in this expense")]
    NobodyInvolved,

    #[error("the rounding target `{0}` does not take part in this expense")]
    RoundingTargetNotInvolved(String),

    #[error("the amount owed by `{0}` cannot be negative: {1}")]
    NegativeAmount(String, Decimal),

    #[error("the amounts owed add up to {actual}, but the expense amount is {expected}")]
    AmountMismatch { expected: Amount, actual: Decimal },

    #[error("the percentage of `{0}` must be between 0 and 100: {1}")]
    PercentageOutOfRange(String, Decimal),

    #[error("the percentages add up to {0}, but they must add up to 100")]
    PercentageMismatch(Decimal),

    #[error("the split details are too large to add up")]
    DetailsOutOfRange,

    #[error("unknown split method; expected one of: equally, amount, percentage")]
    UnknownSplitMethod,
}

/// Problems with the input of the `settle` binary.
#[derive(Error, Debug)]
pub enum InputError {
    #[error("usage: settle <snapshot.json> [summary|transfers|receipts|text] [--by-id]")]
    MissingSnapshotPath,

    #[error("unknown report `{0}`: expected one of summary, transfers, receipts, text")]
    UnknownReport(String),

    #[error("cannot read the project snapshot `{0}`")]
    UnreadableSnapshot(String),

    #[error("invalid project snapshot `{0}`")]
    InvalidSnapshot(String),
}

impl ValidationError {
    pub fn duplicate_participant(participant: &str) -> Self {
        ValidationError::DuplicateParticipant(participant.to_string())
    }

    pub fn unknown_payer(payer: &str) -> Self {
        ValidationError::UnknownPayer(payer.to_string())
    }

    pub fn unknown_participant(participant: &str) -> Self {
        ValidationError::UnknownParticipant(participant.to_string())
    }

    pub fn rounding_target_not_involved(target: &str) -> Self {
        ValidationError::RoundingTargetNotInvolved(target.to_string())
    }

    pub fn negative_amount(participant: &str, value: Decimal) -> Self {
        ValidationError::NegativeAmount(participant.to_string(), value)
    }

    pub fn percentage_out_of_range(participant: &str, value: Decimal) -> Self {
        ValidationError::PercentageOutOfRange(participant.to_string(), value)
    }
}

impl InputError {
    pub fn unknown_report(report: &str) -> Self {
        InputError::UnknownReport(report.to_string())
    }

    pub fn unreadable_snapshot(path: &str) -> Self {
        InputError::UnreadableSnapshot(path.to_string())
    }

    pub fn invalid_snapshot(path: &str) -> Self {
        InputError::InvalidSnapshot(path.to_string())
    }
}
