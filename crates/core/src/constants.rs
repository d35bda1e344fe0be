/// Target value assigned to a fund the first time it is opened
pub const DEFAULT_TARGET_VALUE: &str = "1000.00";

/// Decimal precision for display
pub const DISPLAY_DECIMAL_PRECISION: u32 = 2;

/// Timestamp format used when movements are listed or reported
pub const MOVEMENT_DISPLAY_FORMAT: &str = "%d/%m/%Y %H:%M";

/// Day format accepted by period filters
pub const PERIOD_DATE_FORMAT: &str = "%d/%m/%Y";

/// ISO day format, also accepted by period filters
pub const ISO_DATE_FORMAT: &str = "%Y-%m-%d";
