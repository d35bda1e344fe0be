//! Fixed-fund reconciliation engine.
//!
//! Pure functions over a [`FundConfig`] value. Nothing here touches storage
//! or shared state: every function receives the current config by reference,
//! works on a copy and returns the result, so a rejected call leaves the
//! caller's config exactly as it was.
//!
//! The update disciplines are intentionally asymmetric:
//! - an inflow *accumulates* any excess over the target into `pending_deposit`
//!   and *overwrites* `pending_replenishment`;
//! - an outflow drains `pending_deposit` first and *overwrites*
//!   `pending_replenishment` only when the balance ends below target;
//! - a reconfiguration *adds* to `pending_deposit` but *overwrites*
//!   `pending_replenishment`.
//!
//! All arithmetic is checked. A result outside the `Decimal` range rejects
//! the whole call with `InvalidAmount` (`InvalidTarget` for a reconfiguration).

use log::{debug, trace};
use rust_decimal::Decimal;

use super::fund_model::{FundConfig, MovementOutcome, Replay};
use super::FundError;
use crate::errors::{Error, Result};
use crate::movements::{ensure_positive_amount, Movement, MovementKind};

/// Applies cash entering the drawer.
///
/// 1. `current_balance += amount`
/// 2. `pending_replenishment` becomes the gap below target, or zero
/// 3. any excess over target is added to `pending_deposit`
pub fn apply_inflow(config: &FundConfig, amount: Decimal) -> Result<MovementOutcome> {
    ensure_positive_amount(amount)?;
    let mut next = *config;

    let reject = FundError::InvalidAmount;

    next.current_balance = add(next.current_balance, amount, reject)?;

    next.pending_replenishment = if next.current_balance < next.target_value {
        sub(next.target_value, next.current_balance, reject)?
    } else {
        Decimal::ZERO
    };

    if next.current_balance > next.target_value {
        let excess = sub(next.current_balance, next.target_value, reject)?;
        next.pending_deposit = add(next.pending_deposit, excess, reject)?;
    }

    trace!(
        "inflow {}: balance {} -> {}, deposit {}, replenishment {}",
        amount,
        config.current_balance,
        next.current_balance,
        next.pending_deposit,
        next.pending_replenishment
    );

    Ok(MovementOutcome {
        config: next,
        resulting_balance: next.current_balance,
    })
}

/// Applies cash leaving the drawer.
///
/// Money already earmarked for deposit is spent first. Only the remainder
/// reduces `current_balance`, and a balance left below target overwrites
/// `pending_replenishment` with the gap.
pub fn apply_outflow(config: &FundConfig, amount: Decimal) -> Result<MovementOutcome> {
    ensure_positive_amount(amount)?;
    let mut next = *config;
    let mut remaining = amount;
    let reject = FundError::InvalidAmount;

    if next.pending_deposit > Decimal::ZERO {
        if remaining <= next.pending_deposit {
            next.pending_deposit = sub(next.pending_deposit, remaining, reject)?;
            trace!(
                "outflow {} covered by pending deposit, {} left earmarked",
                amount,
                next.pending_deposit
            );
            return Ok(MovementOutcome {
                config: next,
                resulting_balance: next.current_balance,
            });
        }
        remaining = sub(remaining, next.pending_deposit, reject)?;
        next.pending_deposit = Decimal::ZERO;
    }

    next.current_balance = sub(next.current_balance, remaining, reject)?;

    if next.current_balance < next.target_value {
        next.pending_replenishment = sub(next.target_value, next.current_balance, reject)?;
    }

    trace!(
        "outflow {} ({} from float): balance {} -> {}, replenishment {}",
        amount,
        remaining,
        config.current_balance,
        next.current_balance,
        next.pending_replenishment
    );

    Ok(MovementOutcome {
        config: next,
        resulting_balance: next.current_balance,
    })
}

/// Dispatches to [`apply_inflow`] or [`apply_outflow`].
pub fn apply_movement(
    config: &FundConfig,
    kind: MovementKind,
    amount: Decimal,
) -> Result<MovementOutcome> {
    match kind {
        MovementKind::Inflow => apply_inflow(config, amount),
        MovementKind::Outflow => apply_outflow(config, amount),
    }
}

/// Changes the fixed target without replaying history.
///
/// The gap between the current balance and the new target is reclassified:
/// a surplus is added to `pending_deposit`, a shortfall overwrites
/// `pending_replenishment`.
pub fn reconfigure(config: &FundConfig, new_target_value: Decimal) -> Result<FundConfig> {
    ensure_positive_target(new_target_value)?;
    let mut next = *config;
    let reject = FundError::InvalidTarget;

    if next.current_balance > new_target_value {
        let surplus = sub(next.current_balance, new_target_value, reject)?;
        next.pending_deposit = add(next.pending_deposit, surplus, reject)?;
    } else if next.current_balance < new_target_value {
        next.pending_replenishment = sub(new_target_value, next.current_balance, reject)?;
    }
    next.target_value = new_target_value;

    debug!(
        "reconfigured target {} -> {} (balance {}, deposit {}, replenishment {})",
        config.target_value,
        next.target_value,
        next.current_balance,
        next.pending_deposit,
        next.pending_replenishment
    );
    Ok(next)
}

/// Rebuilds the fund state from scratch by replaying every movement.
///
/// Starts from a full drawer at `target_value` with nothing pending, then
/// applies each movement in ascending id order, rewriting its
/// `resulting_balance`. Running it twice on the same input gives the same
/// output.
pub fn recompute_from_history(target_value: Decimal, movements: &[Movement]) -> Result<Replay> {
    ensure_positive_target(target_value)?;

    let mut ordered = movements.to_vec();
    ordered.sort_by_key(|m| m.id);

    let mut config = FundConfig::new(target_value);
    for movement in ordered.iter_mut() {
        let outcome = apply_movement(&config, movement.kind, movement.amount)?;
        config = outcome.config;
        movement.resulting_balance = outcome.resulting_balance;
    }

    debug!(
        "replayed {} movements against target {}: balance {}, deposit {}, replenishment {}",
        ordered.len(),
        target_value,
        config.current_balance,
        config.pending_deposit,
        config.pending_replenishment
    );

    Ok(Replay {
        config,
        movements: ordered,
    })
}

fn add(lhs: Decimal, rhs: Decimal, reject: fn(String) -> FundError) -> Result<Decimal> {
    lhs.checked_add(rhs).ok_or_else(|| out_of_range(lhs, '+', rhs, reject))
}

fn sub(lhs: Decimal, rhs: Decimal, reject: fn(String) -> FundError) -> Result<Decimal> {
    lhs.checked_sub(rhs).ok_or_else(|| out_of_range(lhs, '-', rhs, reject))
}

fn out_of_range(
    lhs: Decimal,
    op: char,
    rhs: Decimal,
    reject: fn(String) -> FundError,
) -> Error {
    reject(format!("{} {} {} is out of range", lhs, op, rhs)).into()
}

fn ensure_positive_target(target_value: Decimal) -> Result<()> {
    if target_value <= Decimal::ZERO {
        return Err(FundError::InvalidTarget(format!(
            "target value must be greater than zero, got {}",
            target_value
        ))
        .into());
    }
    Ok(())
}
