use std::fmt::Write;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::constants::{
    DISPLAY_DECIMAL_PRECISION, ISO_DATE_FORMAT, MOVEMENT_DISPLAY_FORMAT, PERIOD_DATE_FORMAT,
};
use crate::errors::{Error, Result, ValidationError};
use crate::movements::{Movement, MovementKind};

/// Totals for the movements recorded between two dates, both inclusive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PeriodSummary {
    pub from: NaiveDate,
    pub to: NaiveDate,
    pub movement_count: usize,
    pub total_inflows: Decimal,
    pub total_outflows: Decimal,
    /// `total_inflows - total_outflows`
    pub net_change: Decimal,
    /// Movements in the period, in ledger order.
    pub movements: Vec<Movement>,
}

/// Builds the summary for movements whose timestamp falls on a day in
/// `from..=to`.
pub fn summarize_period(
    movements: &[Movement],
    from: NaiveDate,
    to: NaiveDate,
) -> Result<PeriodSummary> {
    if from > to {
        return Err(Error::Validation(ValidationError::InvalidInput(format!(
            "period start {} is after period end {}",
            from, to
        ))));
    }

    let mut in_period: Vec<Movement> = movements
        .iter()
        .filter(|m| {
            let day = m.timestamp.date();
            day >= from && day <= to
        })
        .cloned()
        .collect();
    in_period.sort_by_key(|m| m.id);

    let total_for = |kind: MovementKind| -> Decimal {
        in_period
            .iter()
            .filter(|m| m.kind == kind)
            .map(|m| m.amount)
            .sum()
    };
    let total_inflows = total_for(MovementKind::Inflow);
    let total_outflows = total_for(MovementKind::Outflow);

    Ok(PeriodSummary {
        from,
        to,
        movement_count: in_period.len(),
        total_inflows,
        total_outflows,
        net_change: total_inflows - total_outflows,
        movements: in_period,
    })
}

/// Parses a period boundary given as `dd/mm/yyyy` or `yyyy-mm-dd`.
pub fn parse_period_date(input: &str) -> Result<NaiveDate> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(Error::Validation(ValidationError::MissingField(
            "date".to_string(),
        )));
    }
    match NaiveDate::parse_from_str(trimmed, PERIOD_DATE_FORMAT) {
        Ok(date) => Ok(date),
        Err(_) => Ok(NaiveDate::parse_from_str(trimmed, ISO_DATE_FORMAT)?),
    }
}

impl PeriodSummary {
    /// Plain-text rendering of the summary.
    pub fn render_text(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(
            out,
            "SUMMARY FROM {} TO {}",
            self.from.format(PERIOD_DATE_FORMAT),
            self.to.format(PERIOD_DATE_FORMAT)
        );
        out.push('\n');
        let _ = writeln!(out, "Movements:      {}", self.movement_count);
        let _ = writeln!(out, "Total inflows:  {}", money(self.total_inflows));
        let _ = writeln!(out, "Total outflows: {}", money(self.total_outflows));
        let _ = writeln!(out, "Net change:     {}", money(self.net_change));

        if self.movements.is_empty() {
            return out;
        }

        out.push_str("\nMOVEMENTS:\n\n");
        for m in &self.movements {
            let _ = writeln!(
                out,
                "- {} | {} | {} | {} | {}",
                m.timestamp.format(MOVEMENT_DISPLAY_FORMAT),
                m.kind,
                money(m.amount),
                m.responsible.as_deref().unwrap_or(""),
                m.description.as_deref().unwrap_or("")
            );
        }
        out
    }
}

fn money(value: Decimal) -> String {
    format!(
        "{:.*}",
        DISPLAY_DECIMAL_PRECISION as usize,
        value.round_dp(DISPLAY_DECIMAL_PRECISION)
    )
}
