//! Reports over the movement ledger.

mod period_summary;


pub use period_summary::{parse_period_date, summarize_period, PeriodSummary};
