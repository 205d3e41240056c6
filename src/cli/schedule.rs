use super::ui;
use crate::core::engine::FeeConfigurationEngine;
use crate::core::fee::{FeeConfig, FeeType, TransactionFeeRow};
use anyhow::Result;
use comfy_table::{Cell, CellAlignment, Table};

/// Prints the fee rows and supplier table of one currency, or of all of them.
pub fn run(engine: &mut FeeConfigurationEngine, currency: Option<&str>) -> Result<()> {
    let configs = match currency {
        Some(currency) => vec![engine.currency_fees(currency)?.clone()],
        None => engine.all_config_fees()?.to_vec(),
    };

    for (i, config) in configs.iter().enumerate() {
        println!(
            "\nCurrency: {}",
            ui::style_text(&config.currency, ui::StyleType::Title)
        );
        println!("{}", fee_table(config));
        println!("{}", supplier_table(config));

        if i < configs.len() - 1 {
            ui::print_separator();
        }
    }

    Ok(())
}

fn fee_cell(row: &TransactionFeeRow) -> Cell {
    let text = match row.fee_type {
        FeeType::Percentage => format!("{}%", ui::format_amount(row.fee_amount)),
        FeeType::Fixed => ui::format_amount(row.fee_amount),
    };
    Cell::new(text).set_alignment(CellAlignment::Right)
}

/// One line per fee row with a share column per supplier.
pub fn fee_table(config: &FeeConfig) -> Table {
    let mut table = ui::new_styled_table();

    let mut header = vec![
        ui::header_cell("#"),
        ui::header_cell("From"),
        ui::header_cell("To"),
        ui::header_cell("Fee"),
        ui::header_cell("Type"),
        ui::header_cell("Unlimited"),
    ];
    header.extend(
        config
            .allocate_details
            .iter()
            .map(|s| ui::header_cell(&s.name)),
    );
    header.push(ui::header_cell("Total share"));
    table.set_header(header);

    for (index, row) in config.transaction_fees.iter().enumerate() {
        let mut cells = vec![
            Cell::new(index),
            ui::amount_cell(row.start_amount),
            ui::end_amount_cell(row.end_amount),
            fee_cell(row),
            Cell::new(row.fee_type),
            Cell::new(if row.unlimited { "yes" } else { "no" }),
        ];
        cells.extend(config.allocate_details.iter().map(|supplier| {
            match row.sharing(&supplier.id) {
                Some(sharing) => Cell::new(format!("{}%", ui::format_amount(sharing.value)))
                    .set_alignment(CellAlignment::Right),
                None => Cell::new("-").set_alignment(CellAlignment::Right),
            }
        }));
        cells.push(ui::total_share_cell(row.total_share()));
        table.add_row(cells);
    }

    table
}

pub fn supplier_table(config: &FeeConfig) -> Table {
    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Supplier ID"),
        ui::header_cell("Name"),
        ui::header_cell("Default"),
    ]);
    for supplier in &config.allocate_details {
        table.add_row(vec![
            Cell::new(&supplier.id),
            Cell::new(&supplier.name),
            Cell::new(if supplier.is_disabled { "yes" } else { "" }),
        ]);
    }
    table
}
