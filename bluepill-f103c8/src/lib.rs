//! Canboot platform bring-up for the "blue pill" STM32F103C8 board.
//!
//! CAN is remapped to PB8 (RX) / PB9 (TX), the indicator LED sits on PC13
//! (active low), and the session timeout runs on SysTick. The binaries
//! under `src/bin/` cycle through the reset-mediated handshake and log it
//! over RTT; no hardware beyond a CAN transceiver is required to observe
//! the boot arguments changing across cycles.

#![no_std]

use core::panic::PanicInfo;

use cortex_m_rt::{ExceptionFrame, exception};
use defmt_rtt as _;
use static_cell::StaticCell;

pub mod board;
pub mod layout;

/// Name this platform announces to peers on the bus.
pub const DEVICE_CLASS: &str = "bluepill-f103c8";

/// Hands out the page staging buffer used by the configuration read/write
/// commands. Never interpreted by the bring-up layer. Panics on a second
/// call.
pub fn take_page_buffer() -> &'static mut [u8; layout::FLASH_PAGE_SIZE as usize] {
    static PAGE_BUFFER: StaticCell<[u8; layout::FLASH_PAGE_SIZE as usize]> = StaticCell::new();
    PAGE_BUFFER.init([0; layout::FLASH_PAGE_SIZE as usize])
}

/// Unrecoverable conditions never fall through to the application: both
/// handlers end in the fault path, which persists its argument and resets.
#[panic_handler]
fn panic(info: &PanicInfo) -> ! {
    defmt::error!("panic: {}", defmt::Display2Format(info));
    canboot_stm32f1::reboot::fault()
}

#[exception]
unsafe fn HardFault(_frame: &ExceptionFrame) -> ! {
    canboot_stm32f1::reboot::fault()
}
