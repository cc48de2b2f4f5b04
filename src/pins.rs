//! GPIO / peripheral pin assignments for the cluster main board.
//!
//! Single source of truth: every driver references this module rather than
//! hard-coding pin numbers.

// ---------------------------------------------------------------------------
// ADC0804 converter (LM35 engine-temperature sensor)
// ---------------------------------------------------------------------------

/// Digital output: WR strobe. A low-to-high edge starts a conversion.
pub const ADC_WR_GPIO: i32 = 1;
/// Digital output: RD strobe. Low enables the converter's output latch.
pub const ADC_RD_GPIO: i32 = 2;
/// Digital input: INTR. Pulled high, driven LOW when a conversion is done.
pub const ADC_INTR_GPIO: i32 = 3;
/// Data bus DB0..DB7, least significant bit first.
pub const ADC_DATA_GPIOS: [i32; 8] = [4, 5, 6, 7, 8, 9, 10, 11];

// ---------------------------------------------------------------------------
// Speed sensor
// ---------------------------------------------------------------------------

/// Hall-effect speed sensor: one pulse per magnet pass, counted by PCNT.
pub const SPEED_PULSE_GPIO: i32 = 12;

// ---------------------------------------------------------------------------
// Indicators and inputs
// ---------------------------------------------------------------------------

/// Over-temperature warning LED (active HIGH).
pub const OVER_TEMP_LED_GPIO: i32 = 13;

/// System on/off switch: active-low with pull-up, falling edge toggles.
pub const TOGGLE_GPIO: i32 = 14;

// ---------------------------------------------------------------------------
// 16x2 character LCD (HD44780, 4-bit bus)
// ---------------------------------------------------------------------------

pub const LCD_RS_GPIO: i32 = 15;
pub const LCD_EN_GPIO: i32 = 16;
/// Upper data nibble D4..D7.
pub const LCD_DATA_GPIOS: [i32; 4] = [17, 18, 21, 38];
