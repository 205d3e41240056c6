use super::ui;
use crate::core::engine::FeeConfigurationEngine;
use crate::core::fee::FeeCalculation;
use anyhow::Result;
use comfy_table::{Attribute, Cell, CellAlignment, Table};

pub fn run(engine: &mut FeeConfigurationEngine, currency: &str, amount: f64) -> Result<()> {
    let calculation = engine.calculate_fees(currency, amount)?;

    println!(
        "\nCurrency: {}  Amount: {}",
        ui::style_text(currency, ui::StyleType::Title),
        ui::format_amount(amount)
    );
    println!(
        "{} {}",
        ui::style_text("Transaction fee:", ui::StyleType::TotalLabel),
        ui::style_text(
            &ui::format_amount(calculation.transaction_fee),
            ui::StyleType::TotalValue
        )
    );

    if calculation.distribution.is_empty() {
        println!(
            "{}",
            ui::style_text("No supplier sharing configured", ui::StyleType::Subtle)
        );
    } else {
        println!("{}", distribution_table(&calculation));
    }

    Ok(())
}

/// Amount still held back after every supplier's share is paid out.
pub fn unallocated(calculation: &FeeCalculation) -> f64 {
    calculation.transaction_fee - calculation.distribution.values().sum::<f64>()
}

pub fn distribution_table(calculation: &FeeCalculation) -> Table {
    let mut table = ui::new_styled_table();
    table.set_header(vec![ui::header_cell("Supplier"), ui::header_cell("Amount")]);

    for (name, amount) in &calculation.distribution {
        table.add_row(vec![Cell::new(name), ui::amount_cell(*amount)]);
    }

    let rest = unallocated(calculation);
    if rest.abs() > 1e-9 {
        table.add_row(vec![
            Cell::new("Unallocated").add_attribute(Attribute::Italic),
            ui::amount_cell(rest),
        ]);
    }

    table.add_row(vec![
        Cell::new("Transaction fee").add_attribute(Attribute::Bold),
        Cell::new(ui::format_amount(calculation.transaction_fee))
            .add_attribute(Attribute::Bold)
            .set_alignment(CellAlignment::Right),
    ]);
    table
}
