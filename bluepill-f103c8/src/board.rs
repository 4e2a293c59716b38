use canboot_core::{AcceptanceFilter, NominalBitTiming};
use canboot_stm32f1::config::{self, Config};
use embassy_stm32::time::Hertz;

/// Core and AHB clock after PLL bring-up.
pub const CORE_CLOCK: Hertz = Hertz(72_000_000);
/// APB1 clock feeding the CAN peripheral.
pub const CAN_CLOCK: Hertz = Hertz(36_000_000);
/// Wire bit rate.
pub const CAN_BIT_RATE: u32 = 1_000_000;
/// Session window before the stage selector falls through to the
/// application.
pub const SESSION_TIMEOUT_MS: u32 = 10_000;

/// Resolved at build time, so an unrealizable bit rate fails the build
/// instead of the bus.
const BIT_TIMING: NominalBitTiming =
    NominalBitTiming::exact_for(CAN_CLOCK.0, CAN_BIT_RATE).unwrap();

pub fn make_peripheral_config() -> embassy_stm32::Config {
    use embassy_stm32::rcc;

    let mut config = embassy_stm32::Config::default();
    config.rcc.hse = Some(rcc::Hse {
        freq: Hertz::mhz(8),
        mode: rcc::HseMode::Oscillator,
    });
    config.rcc.pll = Some(rcc::Pll {
        src: rcc::PllSource::HSE,
        prediv: rcc::PllPreDiv::DIV1,
        mul: rcc::PllMul::MUL9, // 72 MHz
    });
    config.rcc.sys = rcc::Sysclk::PLL1_P;
    config.rcc.ahb_pre = rcc::AHBPrescaler::DIV1;
    config.rcc.apb1_pre = rcc::APBPrescaler::DIV2; // 36 MHz for CAN
    config.rcc.apb2_pre = rcc::APBPrescaler::DIV1;
    config
}

pub fn make_can_config() -> Config {
    let mut config = Config::default();
    // 1 Mbit/s: 36 MHz / 2 -> 18 tq per bit, sample point at 11/18
    config.bit_timing = BIT_TIMING;
    config.filter = AcceptanceFilter::std_id_class(config::BOOTLOADER_ID_CLASS);
    config
}
