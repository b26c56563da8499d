//! Record assembly.

use super::rules::{BlockAmounts, BlockFields, RecordBlock};
use crate::models::record::{AmountSlot, DebtRecord};

/// Merge the outputs of the pipeline stages for one block into a record.
///
/// A record with only the date filled in is still valid output: the date was
/// found but nothing else was recognized.
pub fn assemble_record(
    block: &RecordBlock<'_>,
    fields: BlockFields,
    amounts: &BlockAmounts,
    source: &str,
) -> DebtRecord {
    DebtRecord {
        source: source.to_string(),
        product_type: fields.product_type,
        creditor_name: fields.creditor_name,
        contract_date: block.date().to_string(),
        original_amount: amounts.get(AmountSlot::OriginalAmount),
        remaining_balance: amounts.get(AmountSlot::RemainingBalance),
        installment_amount: amounts.get(AmountSlot::InstallmentAmount),
        overdue_total: amounts.get(AmountSlot::OverdueTotal),
    }
}
