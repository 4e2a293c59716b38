use embassy_stm32::can::{RxPin, TxPin};
use embassy_stm32::can::Instance as EmbassyInstance;
use embassy_stm32::{Peri, gpio, pac, rcc};

use crate::config;
use crate::raw;

pub trait SealedInstance: EmbassyInstance {
    fn registers() -> pac::can::Can;
}

#[allow(private_bounds)]
pub trait Instance: SealedInstance {}

/// Routes the CAN transport to its PB8 (RX) / PB9 (TX) pin set.
///
/// Call before [`CanInterface::new`] claims the pins. Idempotent; touches
/// only the AFIO remap register (and its clock enable).
pub fn remap_can_to_pb8_pb9() {
    pac::RCC.apb2enr().modify(|w| w.set_afioen(true));
    pac::AFIO.mapr().modify(|w| w.set_can1_remap(0b10));
}

/// One-shot configurator for the bxcan transport.
///
/// Holds the claimed pins for its lifetime; the register state it leaves
/// behind is never mutated again by this layer.
pub struct CanInterface<'a> {
    _pins: [gpio::Flex<'a>; 2],
}

impl<'a> CanInterface<'a> {
    /// Creates the interface and configures the periphery.
    ///
    /// Initializes the pins, applies bit timing and behavior flags, waits
    /// for bus synchronization, then installs the single acceptance filter.
    /// The peripheral is ready for frame exchange when this returns.
    pub fn new<T: Instance>(
        _instance: Peri<'a, T>,
        rx: Peri<'a, impl RxPin<T>>,
        tx: Peri<'a, impl TxPin<T>>,
        config: config::Config,
    ) -> Self {
        let rx_af_num = rx.af_num();
        let mut rx_pin = gpio::Flex::new(rx);
        // Pulled up so the input does not float before the transceiver
        // drives it.
        rx_pin.set_as_af_unchecked(rx_af_num, gpio::AfType::input(gpio::Pull::Up));

        let tx_af_num = tx.af_num();
        let mut tx_pin = gpio::Flex::new(tx);
        tx_pin.set_as_af_unchecked(
            tx_af_num,
            gpio::AfType::output(gpio::OutputType::PushPull, gpio::Speed::VeryHigh),
        );

        rcc::enable_and_reset::<T>();

        let regs = raw::Registers::new(T::registers());
        regs.configure(&config);
        regs.install_filter(&config.filter);

        debug!(
            "CAN configured: {} tq per bit, filter class {}",
            config.bit_timing.quanta_per_bit(),
            config::BOOTLOADER_ID_CLASS
        );

        Self {
            _pins: [rx_pin, tx_pin],
        }
    }
}
