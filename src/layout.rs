//! Character-display geometry and field positions.
//!
//! Rows and columns are 1-based, matching the LCD's own addressing.

// =============================================================================
// Display Geometry
// =============================================================================

/// Number of text rows on the LCD.
pub const ROWS: u8 = 2;

/// Number of character columns per row.
pub const COLS: u8 = 16;

/// A fixed text or numeric field on the display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    pub row: u8,
    pub col: u8,
}

const fn cell(row: u8, col: u8) -> Cell {
    Cell { row, col }
}

// =============================================================================
// Row 1: title and warning
// =============================================================================

pub const TITLE: Cell = cell(1, 1);
pub const TITLE_TEXT: &str = "TERMINAL";

pub const LOW_FUEL: Cell = cell(1, 10);
pub const LOW_FUEL_TEXT: &str = "LowFuel";

// =============================================================================
// Row 2: speed, fuel and temperature readouts
// =============================================================================

/// Minimum digits for every numeric readout.
pub const NUMBER_WIDTH: u8 = 2;

pub const SPEED_LABEL: Cell = cell(2, 1);
pub const SPEED_SEPARATOR: Cell = cell(2, 2);
pub const SPEED_VALUE: Cell = cell(2, 3);

pub const FUEL_LABEL: Cell = cell(2, 6);
pub const FUEL_SEPARATOR: Cell = cell(2, 7);
pub const FUEL_VALUE: Cell = cell(2, 8);
/// Drawn after the value, so a three-digit fuel level loses its last digit.
pub const FUEL_UNIT: Cell = cell(2, 10);

pub const TEMP_LABEL: Cell = cell(2, 12);
pub const TEMP_SEPARATOR: Cell = cell(2, 13);
pub const TEMP_VALUE: Cell = cell(2, 14);
pub const TEMP_UNIT: Cell = cell(2, 16);
