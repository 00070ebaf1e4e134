//! Produce the human-readable text printed by the `settle` binary.
//! The formatting consists in aligning columns, adding emojis and composing the
//! actual output string.

use crate::report::{NetGrossSettlement, ReceiptView, SettlementSummary};
use crate::types::Transfer;

pub fn format_summary(summary: &SettlementSummary) -> String {
    format!(
        "Total: {}\nParticipants: {}\nPer person: {}\n\n{}",
        summary.total_amount,
        summary.participant_count,
        summary.per_person_amount,
        format_transfers(&summary.transfers)
    )
}

pub fn format_net_and_gross(settlement: &NetGrossSettlement) -> String {
    format!(
        "Net transfers:\n{}\nEvery transaction:\n{}",
        format_transfers(&settlement.net_transfers),
        format_transfers(&settlement.gross_transfers)
    )
}

pub fn format_transfers(transfers: &[Transfer]) -> String {
    let Some(max_debtor_length) = transfers.iter().map(|t| t.from.chars().count()).max() else {
        return "All clean!\n".to_string();
    };
    transfers
        .iter()
        .map(|t| format_transfer(t, max_debtor_length))
        .fold(String::new(), |a, b| a + &b + "\n")
}

fn format_transfer(transfer: &Transfer, target_length: usize) -> String {
    // We make sure that the amounts are always aligned, by padding the debtors where needed:
    format!(
        "💰  {:<width$} 💸  {}  {} 🤑",
        transfer.from,
        transfer.amount,
        transfer.to,
        width = target_length
    )
}

pub fn format_receipts(receipts: &[ReceiptView]) -> String {
    if receipts.is_empty() {
        "Nothing to show!\n".to_string()
    } else {
        receipts
            .iter()
            .map(format_receipt)
            .fold(String::new(), |a, b| a + &b + "\n")
    }
}

fn format_receipt(receipt: &ReceiptView) -> String {
    let mut result = format!("🧑  {}: {}\n", receipt.participant_name, receipt.total_spent);
    for category in &receipt.spent_by_category {
        result += &format!(
            "  {} {}: {}\n",
            category.category_emoji, category.category_name, category.total_amount
        );
        for detail in &category.expense_details {
            result += &format!(
                "    - {} ({}): {}\n",
                detail.expense_desc, detail.payer_name, detail.your_share
            );
        }
    }
    result
}
