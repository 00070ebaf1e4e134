//! Settlement engine for shared expenses.
//!
//! Given the participants and expenses of a project, compute what each participant
//! owes for every expense, their net balances, the transfers that settle everything
//! (netted and un-netted) and an itemized receipt per participant.
//!
//! All functions are pure and work on an in-memory snapshot of the project: nothing
//! here performs I/O or keeps state between calls.

pub mod balance;
pub mod error;
pub mod formatter;
pub mod receipt;
pub mod report;
pub mod split;
pub mod transfers;
pub mod types;
pub mod validator;

pub use balance::{compute_balances, compute_totals, Totals};
pub use error::{InputError, ValidationError};
pub use receipt::{build_receipts, CategorySpending, ExpenseDetail, Receipt};
pub use report::{
    net_and_gross, receipt_list, settlement_summary, Label, NetGrossSettlement, ReceiptView,
    SettlementSummary,
};
pub use split::compute_owed_shares;
pub use transfers::{enumerate_gross_transfers, gross_obligations, plan_transfers};
pub use types::{
    Amount, Balances, Category, Expense, OwedShares, Participant, Project, Share, SplitMethod,
    Transfer,
};
pub use validator::{validate_expense, validate_project};
