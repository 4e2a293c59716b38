//! Full bring-up and one pass of the reset-mediated handshake.
//!
//! Stands in for the bootloader command loop: consumes the boot argument
//! left by the previous cycle, brings the platform up in order, waits out
//! the session window and leaves through the planned-exit path. Flash the
//! board and watch the argument change across cycles on the RTT log.

#![no_std]
#![no_main]

use bluepill_f103c8::{board, layout, take_page_buffer};
use canboot_core::BootArg;
use canboot_stm32f1::timeout::SessionTimeout;
use canboot_stm32f1::{CanInterface, boot_arg, reboot};
use cortex_m_rt::entry;
use defmt::*;
use embassy_stm32::gpio::{Level, Output, Speed};

#[entry]
fn main() -> ! {
    let p = embassy_stm32::init(board::make_peripheral_config());
    let cp = unwrap!(cortex_m::Peripherals::take());

    // The previous cycle's verdict; consumed exactly once per cycle.
    let argument = boot_arg::take();
    info!("boot argument: {}", argument);

    // LED on while the session runs.
    let _led = Output::new(p.PC13, Level::Low, Speed::Low);

    canboot_stm32f1::remap_can_to_pb8_pb9();
    let _can = CanInterface::new(p.CAN, p.PB8, p.PB9, board::make_can_config());

    let mut session = SessionTimeout::init(cp.SYST, board::CORE_CLOCK, board::SESSION_TIMEOUT_MS);

    let page_buffer = take_page_buffer();
    debug!("staging buffer ready: {} bytes", page_buffer.len());

    match argument {
        BootArg::StartApplication => {
            // A real stage selector would chain-load once the window
            // passes quietly.
            info!(
                "application region: {=u32:#x}, {} bytes",
                layout::APPLICATION.base,
                layout::APPLICATION.size
            );
        }
        BootArg::StartBootloader => info!("running the standard session window"),
        BootArg::StartBootloaderNoTimeout => {
            info!("session has no deadline; ending it by design")
        }
    }

    if argument != BootArg::StartBootloaderNoTimeout {
        while !session.expired() {}
        info!("session window expired");
    }

    reboot::planned_exit()
}
