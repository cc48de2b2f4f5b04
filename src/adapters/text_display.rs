//! In-memory 2x16 frame buffer implementing [`DisplayPort`].
//!
//! Used as the display on host builds and by tests that assert on what
//! the cluster shows.  Clipping and number formatting match the HD44780
//! driver exactly.

use crate::app::ports::DisplayPort;
use crate::drivers::lcd::{ddram_address, format_number};
use crate::layout::{COLS, ROWS};

const BLANK_ROW: [u8; COLS as usize] = [b' '; COLS as usize];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextDisplay {
    rows: [[u8; COLS as usize]; ROWS as usize],
    initialised: bool,
}

impl Default for TextDisplay {
    fn default() -> Self {
        Self::new()
    }
}

impl TextDisplay {
    pub fn new() -> Self {
        Self {
            rows: [BLANK_ROW; ROWS as usize],
            initialised: false,
        }
    }

    /// Contents of `row` (1-based), or `""` when off-screen.
    pub fn row(&self, row: u8) -> &str {
        if !(1..=ROWS).contains(&row) {
            return "";
        }
        core::str::from_utf8(&self.rows[usize::from(row - 1)]).unwrap_or("")
    }

    pub fn is_initialised(&self) -> bool {
        self.initialised
    }
}

impl DisplayPort for TextDisplay {
    fn init(&mut self) {
        self.rows = [BLANK_ROW; ROWS as usize];
        self.initialised = true;
    }

    fn write_text(&mut self, row: u8, col: u8, text: &str) {
        if ddram_address(row, col).is_none() {
            return;
        }
        let line = &mut self.rows[usize::from(row - 1)];
        let start = usize::from(col - 1);
        for (cell, byte) in line[start..].iter_mut().zip(text.bytes()) {
            *cell = if byte.is_ascii() { byte } else { b'?' };
        }
    }

    fn write_number(&mut self, row: u8, col: u8, value: u32, min_width: u8) {
        let digits = format_number(value, min_width);
        self.write_text(row, col, &digits);
    }
}
