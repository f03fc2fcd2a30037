//! Summary and prompt preview commands

use std::path::Path;

use anyhow::Result;

use spendsight_core::summary::{format_amount, format_grouped};
use spendsight_core::Dashboard;

use super::{build_dashboard, load_config, load_prompt};

/// Render the stat cards and the expense summary as plain text
pub fn format_summary(dashboard: &Dashboard) -> String {
    let config = dashboard.config();
    let ledger = dashboard.ledger();
    let symbol = &config.currency_symbol;

    let mut out = String::new();
    out.push_str(&format!(
        "{:<16} {}{}\n",
        "Total Spent:",
        symbol,
        format_amount(ledger.total_spent())
    ));
    out.push_str(&format!("{:<16} {}\n", "Categories:", ledger.summary().len()));
    out.push_str(&format!(
        "{:<16} {}{}\n",
        "Monthly Income:",
        symbol,
        format_grouped(config.monthly_income)
    ));
    out.push('\n');
    out.push_str("Expense Summary\n");
    out.push_str(&format!("{}\n", "-".repeat(32)));

    if ledger.is_empty() {
        out.push_str("  (no expenses)\n");
    }
    for (category, amount) in ledger.summary().iter() {
        out.push_str(&format!(
            "  {:<20} {}{}\n",
            category,
            symbol,
            format_amount(amount)
        ));
    }
    out
}

pub fn cmd_summary(config_path: Option<&Path>, expenses: &[String]) -> Result<()> {
    let dashboard = build_dashboard(load_config(config_path)?, expenses)?;
    print!("{}", format_summary(&dashboard));
    Ok(())
}

/// Print the prompt exactly as it would be sent
pub fn cmd_prompt(config_path: Option<&Path>, expenses: &[String]) -> Result<()> {
    let dashboard = build_dashboard(load_config(config_path)?, expenses)?;
    let prompt = load_prompt()?;
    let ledger = dashboard.ledger();

    println!(
        "{}",
        prompt.render_insight(
            dashboard.config().monthly_income,
            ledger.total_spent(),
            ledger.summary()
        )
    );
    Ok(())
}
