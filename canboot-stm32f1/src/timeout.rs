//! Session-timeout countdown over the SysTick timer.

use cortex_m::peripheral::SYST;
use cortex_m::peripheral::syst::SystClkSource;
use embassy_stm32::time::Hertz;

/// Countdown tick rate; one SysTick wrap per millisecond.
const TICK_HZ: u32 = 1_000;

/// Millisecond countdown armed once during bring-up.
///
/// Arming starts the hardware timer; polling, rewinding and acting on
/// expiry are the command loop's business. [`expired`](Self::expired) must
/// be polled at least once per millisecond, which a loop spinning on the
/// receive FIFO does by construction.
pub struct SessionTimeout {
    syst: SYST,
    window_ms: u32,
    remaining_ms: u32,
}

impl SessionTimeout {
    /// Arms the countdown: one SysTick wrap per millisecond of `clock`,
    /// `timeout_ms` wraps until expiry.
    pub fn init(mut syst: SYST, clock: Hertz, timeout_ms: u32) -> Self {
        assert!(clock.0 % TICK_HZ == 0);
        let ticks_per_ms = clock.0 / TICK_HZ;
        // The reload register is 24 bits wide.
        assert!(ticks_per_ms > 0 && ticks_per_ms <= 1 << 24);

        syst.set_clock_source(SystClkSource::Core);
        syst.set_reload(ticks_per_ms - 1);
        syst.clear_current();
        syst.enable_counter();

        Self {
            syst,
            window_ms: timeout_ms,
            remaining_ms: timeout_ms,
        }
    }

    /// Counts elapsed wraps; true once the window has run out.
    pub fn expired(&mut self) -> bool {
        if self.syst.has_wrapped() {
            self.remaining_ms = self.remaining_ms.saturating_sub(1);
        }
        self.remaining_ms == 0
    }

    /// Rewinds the countdown to a full window.
    pub fn restart(&mut self) {
        self.remaining_ms = self.window_ms;
    }
}
