//! Movements module - cash movement records and input parsing.

mod movements_model;


pub use movements_model::{
    ensure_positive_amount, normalize_text, parse_amount, Movement, MovementKind, NewMovement,
    NewMovementRecord,
};
