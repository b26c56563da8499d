//! Output formatting shared by the parse and batch commands.

use std::path::Path;

use rust_decimal::Decimal;

use bik_core::{AmountSlot, DebtRecord, ParseReport};

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output
    Json,
    /// CSV output with spreadsheet column headers
    Csv,
    /// Plain text summary
    Text,
}

impl OutputFormat {
    /// File extension used when writing to a directory.
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Json => "json",
            OutputFormat::Csv => "csv",
            OutputFormat::Text => "txt",
        }
    }
}

/// Render a report. With `diagnostics` the JSON output is the whole report
/// and the text output gets the counters appended; CSV ignores it.
pub fn format_report(report: &ParseReport, format: OutputFormat, diagnostics: bool) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json if diagnostics => Ok(serde_json::to_string_pretty(report)?),
        OutputFormat::Json => Ok(serde_json::to_string_pretty(&report.records)?),
        OutputFormat::Csv => format_csv(&report.records),
        OutputFormat::Text => Ok(format_text(report, diagnostics)),
    }
}

/// Records as CSV with a header row.
pub fn format_csv(records: &[DebtRecord]) -> anyhow::Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    write_records(&mut wtr, records)?;
    let data = String::from_utf8(wtr.into_inner()?)?;
    Ok(data)
}

/// Write records as CSV straight to a file.
pub fn write_csv_file(path: &Path, records: &[DebtRecord]) -> anyhow::Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;
    write_records(&mut wtr, records)?;
    wtr.flush()?;
    Ok(())
}

fn write_records<W: std::io::Write>(wtr: &mut csv::Writer<W>, records: &[DebtRecord]) -> anyhow::Result<()> {
    wtr.write_record(DebtRecord::COLUMNS)?;
    for record in records {
        wtr.write_record(record.to_row())?;
    }
    Ok(())
}

fn format_amount(amount: Option<Decimal>) -> String {
    amount.map(|a| format!("{} PLN", a)).unwrap_or_else(|| "-".to_string())
}

fn format_text(report: &ParseReport, diagnostics: bool) -> String {
    let mut output = String::new();

    output.push_str(&format!("Active obligations: {}\n", report.records.len()));

    for (i, record) in report.records.iter().enumerate() {
        output.push('\n');
        let product = if record.product_type.is_empty() {
            "(unknown product)"
        } else {
            record.product_type.as_str()
        };
        output.push_str(&format!("{}. {}\n", i + 1, product));
        output.push_str(&format!("   Creditor:      {}\n", record.creditor_name));
        output.push_str(&format!("   Contract date: {}\n", record.contract_date));
        output.push_str(&format!("   Original:      {}\n", format_amount(record.original_amount)));
        output.push_str(&format!("   Remaining:     {}\n", format_amount(record.remaining_balance)));
        output.push_str(&format!("   Installment:   {}\n", format_amount(record.installment_amount)));
        output.push_str(&format!("   Overdue:       {}\n", format_amount(record.overdue_total)));
    }

    if !report.records.is_empty() {
        output.push('\n');
        for (label, slot) in [
            ("Total remaining:   ", AmountSlot::RemainingBalance),
            ("Total installments:", AmountSlot::InstallmentAmount),
            ("Total overdue:     ", AmountSlot::OverdueTotal),
        ] {
            let total: Decimal = report.records.iter().filter_map(|r| r.amount(slot)).sum();
            output.push_str(&format!("{} {} PLN\n", label, total));
        }
    }

    if diagnostics {
        let d = &report.diagnostics;
        output.push_str("\nDiagnostics:\n");
        output.push_str(&format!("  Lines read:          {}\n", d.lines_read));
        output.push_str(&format!("  Section found:       {}\n", d.section_found));
        output.push_str(&format!("  Section lines:       {}\n", d.section_lines));
        output.push_str(&format!("  Anchors found:       {}\n", d.anchors_found));
        output.push_str(&format!("  Trailing lines:      {}\n", d.trailing_lines));
        output.push_str(&format!("  Without creditor:    {}\n", d.records_without_creditor));
        output.push_str(&format!("  Unparsed amounts:    {}\n", d.unparsed_amounts));
    }

    output
}
