use chrono::{DateTime, Utc};
use chrono_humanize::Humanize;
use comfy_table::{Attribute, Cell, Color, Row, Table};
use tally_core::models::{RecurrenceRule, Transaction, TransactionType};
use uuid::Uuid;

use crate::parser::format_amount;

#[derive(Debug, Clone)]
pub struct ViewTransaction {
    pub id: Uuid,
    pub description: String,
    pub amount_cents: i64,
    pub transaction_type: TransactionType,
    pub date: DateTime<Utc>,
    pub paid: bool,
    pub is_template: bool,
    pub rule: Option<RecurrenceRule>,
    pub installment: Option<(u32, u32)>,
}

impl From<&Transaction> for ViewTransaction {
    fn from(t: &Transaction) -> Self {
        let installment = match (t.current_installment, t.installment_count) {
            (Some(current), Some(count)) => Some((current, count)),
            _ => None,
        };
        Self {
            id: t.id,
            description: t.description.clone(),
            amount_cents: t.amount_cents,
            transaction_type: t.transaction_type,
            date: t.date,
            paid: t.paid,
            is_template: t.is_template(),
            rule: t.recurrence_rule(),
            installment,
        }
    }
}

pub fn display_transactions(transactions: &[ViewTransaction]) {
    if transactions.is_empty() {
        println!("No transactions found.");
        return;
    }

    let mut table = Table::new();
    table.set_header(vec!["ID", "Description", "Amount", "Date", "Paid", "Recurrence"]);

    let now = Utc::now();
    for tx in transactions {
        let mut row = Row::new();
        row.add_cell(Cell::new(&tx.id.to_string()[..8]));

        let mut description = String::new();
        if tx.rule.is_some() {
            description.push('↻');
            description.push(' ');
        }
        description.push_str(&tx.description);
        if tx.is_template {
            description.push_str(" (Template)");
        }
        let mut description_cell = Cell::new(description);
        if tx.paid {
            description_cell = description_cell.fg(Color::DarkGrey);
        } else if tx.is_template {
            description_cell = description_cell.add_attribute(Attribute::Bold);
        }
        row.add_cell(description_cell);

        let amount_cell = match tx.transaction_type {
            TransactionType::Income => {
                Cell::new(format!("+{}", format_amount(tx.amount_cents))).fg(Color::Green)
            }
            TransactionType::Expense => Cell::new(format!("-{}", format_amount(tx.amount_cents))),
        };
        row.add_cell(amount_cell);

        let date_text = format!("{} ({})", tx.date.format("%Y-%m-%d"), tx.date.humanize());
        let date_cell = if !tx.paid && !tx.is_template && tx.date < now {
            Cell::new(date_text).fg(Color::Red) // Overdue
        } else if tx.date.date_naive() == now.date_naive() {
            Cell::new(date_text).fg(Color::Yellow)
        } else {
            Cell::new(date_text)
        };
        row.add_cell(date_cell);

        row.add_cell(if tx.paid {
            Cell::new("yes").fg(Color::Green)
        } else {
            Cell::new("no")
        });

        let recurrence = match (tx.rule, tx.installment) {
            (Some(RecurrenceRule::Fixed(frequency)), _) => frequency.to_string(),
            (_, Some((current, count))) => format!("{}/{}", current, count),
            _ => "None".to_string(),
        };
        row.add_cell(Cell::new(recurrence));
        table.add_row(row);
    }

    println!("{table}");
}
