//! ADC0804 start/read protocol for the LM35 engine-temperature sensor.
//!
//! ```text
//!   WR  ‾‾\__/‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾
//!  INTR ‾‾‾‾‾‾‾‾‾‾‾‾‾‾\____________________________
//!   RD  ‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾\__<sample>__<settle>__/‾‾
//! ```
//!
//! There is no timeout on the INTR poll: a converter that never finishes
//! blocks the caller forever.

use embedded_hal::delay::DelayNs;

use crate::app::ports::ConverterLines;

pub struct AnalogReader {
    settle_ms: u32,
}

impl AnalogReader {
    pub fn new(settle_ms: u32) -> Self {
        Self { settle_ms }
    }

    /// Run one full conversion and return the raw 8-bit sample.
    pub fn convert(&self, lines: &mut impl ConverterLines, delay: &mut impl DelayNs) -> u8 {
        self.start(lines);
        while lines.conversion_busy() {}
        self.read(lines, delay)
    }

    fn start(&self, lines: &mut impl ConverterLines) {
        lines.set_write(false);
        lines.set_write(true);
    }

    fn read(&self, lines: &mut impl ConverterLines, delay: &mut impl DelayNs) -> u8 {
        lines.set_read(true);
        lines.set_read(false);
        let sample = lines.read_data_bus();
        delay.delay_ms(self.settle_ms);
        lines.set_read(true);
        sample
    }
}
