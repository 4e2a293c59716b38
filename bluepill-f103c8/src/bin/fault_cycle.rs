//! Bring-up followed by a deliberate fault.
//!
//! Demonstrates the recovery half of the handshake: the panic routes
//! through the fault path, so the next cycle enters with
//! `StartBootloaderNoTimeout` and ends cleanly instead of faulting again.

#![no_std]
#![no_main]

use bluepill_f103c8::board;
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

    let argument = boot_arg::take();
    info!("boot argument: {}", argument);

    let _led = Output::new(p.PC13, Level::Low, Speed::Low);

    canboot_stm32f1::remap_can_to_pb8_pb9();
    let _can = CanInterface::new(p.CAN, p.PB8, p.PB9, board::make_can_config());

    let _session =
        SessionTimeout::init(cp.SYST, board::CORE_CLOCK, board::SESSION_TIMEOUT_MS);

    if argument == BootArg::StartBootloaderNoTimeout {
        info!("recovered from the previous fault; ending the cycle cleanly");
        reboot::planned_exit()
    }

    warn!("faulting on purpose");
    panic!("deliberate fault");
}
