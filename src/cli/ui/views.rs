//! Pure text renderers for the budget screens. Nothing here touches state.

use crate::budget::{FlowGraph, LineItem, RentCheck, RentCheckStatus, Table, Totals};
use crate::cli::output::{MessageKind, OutputPreferences};
use crate::currency::{format_currency, format_currency_spoken};

use super::table_renderer::{Alignment, TableColumn, TextTable};

pub const FLOW_PLACEHOLDER: &str = "Enter a salary to see how it is allocated.";
const BAR_WIDTH: usize = 24;
const LABEL_WIDTH: usize = 32;

/// Amount formatter bound to the configured currency and output mode.
#[derive(Debug, Clone)]
pub struct Money {
    currency: String,
    spoken: bool,
}

impl Money {
    pub fn new(currency: impl Into<String>, spoken: bool) -> Self {
        Self {
            currency: currency.into(),
            spoken,
        }
    }

    pub fn format(&self, amount: f64) -> String {
        if self.spoken {
            format_currency_spoken(amount, &self.currency)
        } else {
            format_currency(amount, &self.currency)
        }
    }
}

pub fn render_line_table(table: Table, rows: &[LineItem], money: &Money) -> String {
    let mut text_table = TextTable::new(vec![
        TableColumn::new("#", Alignment::Right),
        TableColumn::new("Label", Alignment::Left).max_width(LABEL_WIDTH),
        TableColumn::new("Amount", Alignment::Right),
    ]);
    for (index, row) in rows.iter().enumerate() {
        let mut label = if row.label.is_empty() {
            "(no label)".to_string()
        } else {
            row.label.clone()
        };
        if table.is_mandatory_row(index) {
            label.push_str(" *");
        }
        text_table.push_row(vec![(index + 1).to_string(), label, money.format(row.amount)]);
    }
    let total: f64 = rows.iter().map(|row| row.amount).sum();
    text_table.set_footer(vec![String::new(), "Total".into(), money.format(total)]);

    let mut out = text_table.render();
    if rows.is_empty() {
        out.push_str(&format!("\n(no {} yet)", table.label()));
    }
    if table == Table::RentDetails {
        out.push_str("\n* required row");
    }
    out
}

pub fn render_totals(totals: &Totals, money: &Money) -> String {
    let lines = [
        ("Salary", totals.salary),
        ("Rent", totals.total_rent),
        ("Charges", totals.total_charges),
        ("Total charges", totals.total_charges_global),
        ("Disposable income", totals.disposable_income),
    ];
    let amounts: Vec<String> = lines.iter().map(|(_, amount)| money.format(*amount)).collect();
    let width = amounts.iter().map(|a| a.chars().count()).max().unwrap_or(0);

    let mut out: Vec<String> = lines
        .iter()
        .zip(&amounts)
        .map(|((label, _), amount)| format!("{label:<18} {amount:>width$}"))
        .collect();
    out.push(String::new());
    out.push(render_formula(totals, money));
    out.join("\n")
}

/// `Salary − (Rent + Charges) = Disposable income` with the figures filled in.
pub fn render_formula(totals: &Totals, money: &Money) -> String {
    format!(
        "Salary − (Rent + Charges) = Disposable income : {} − ({} + {}) = {}",
        money.format(totals.salary),
        money.format(totals.total_rent),
        money.format(totals.total_charges),
        money.format(totals.disposable_income),
    )
}

pub fn rent_check_kind(status: RentCheckStatus) -> MessageKind {
    match status {
        RentCheckStatus::NoBill => MessageKind::Info,
        RentCheckStatus::Match => MessageKind::Success,
        RentCheckStatus::Mismatch => MessageKind::Warning,
    }
}

/// Figures behind the reconciliation message; `None` until a bill is entered.
pub fn render_rent_check_details(check: &RentCheck, money: &Money) -> Option<String> {
    if check.status == RentCheckStatus::NoBill {
        return None;
    }
    let mut details = format!(
        "Expected share (bill / 2): {}\nLoyer + Provision pour charges: {}",
        money.format(check.expected_share),
        money.format(check.actual),
    );
    if check.status == RentCheckStatus::Mismatch {
        details.push_str(&format!("\nDifference: {}", money.format(check.difference())));
    }
    Some(details)
}

pub fn render_flow(flow: &FlowGraph, money: &Money, prefs: &OutputPreferences) -> String {
    if flow.is_empty() {
        return FLOW_PLACEHOLDER.to_string();
    }
    let arrow = if prefs.plain_mode { "->" } else { "→" };
    let mut table = TextTable::new(vec![
        TableColumn::new("Flow", Alignment::Left).max_width(LABEL_WIDTH * 2),
        TableColumn::new("Amount", Alignment::Right),
        TableColumn::new("Share", Alignment::Left),
    ]);
    for edge in &flow.edges {
        let ratio = edge.amount / flow.salary;
        let percent = format!("{:.0}%", ratio * 100.0);
        let share = if prefs.screen_reader_mode {
            percent
        } else {
            format!("{} {percent}", bar(ratio, prefs.plain_mode))
        };
        table.push_row(vec![
            format!("{} {arrow} {}", edge.source, edge.target),
            money.format(edge.amount),
            share,
        ]);
    }
    table.render()
}

fn bar(ratio: f64, plain: bool) -> String {
    let cells = (ratio.clamp(0.0, 1.0) * BAR_WIDTH as f64).round() as usize;
    let glyph = if plain { "#" } else { "█" };
    glyph.repeat(cells.max(1))
}
