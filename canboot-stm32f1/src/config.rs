use canboot_core::{AcceptanceFilter, NominalBitTiming};

/// Identifier class reserved for bootloader traffic: standard identifiers
/// whose bits \[10:8\] are zero.
pub const BOOTLOADER_ID_CLASS: u8 = 0;

/// bxcan configuration, applied once during bring-up.
///
/// There is no reconfiguration path; [`CanInterface::new`](crate::CanInterface::new)
/// consumes this before any frame exchange.
#[non_exhaustive]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Config {
    /// Bit timing for the arbitration/data phase. Must realize the target
    /// bit rate on the APB1 clock with zero remainder.
    pub bit_timing: NominalBitTiming,
    /// The single acceptance filter, installed in bank 0 and routed to
    /// receive FIFO 0.
    pub filter: AcceptanceFilter,
    /// Leave bus-off automatically once 128 sequences of 11 recessive bits
    /// have been monitored.
    pub automatic_bus_off_recovery: bool,
    /// Drain transmit mailboxes in request order instead of identifier
    /// order.
    pub transmit_fifo_priority: bool,
    /// Let the hardware retry failed transmissions on its own.
    pub automatic_retransmission: bool,
    /// Lock the receive FIFO when full, discarding new frames instead of
    /// overwriting the oldest pending one.
    pub receive_fifo_locked: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            // 1 Mbit/s on a 36 MHz APB1 clock, 18 tq per bit.
            bit_timing: unwrap!(NominalBitTiming::exact_for(36_000_000, 1_000_000)),
            filter: AcceptanceFilter::std_id_class(BOOTLOADER_ID_CLASS),
            automatic_bus_off_recovery: true,
            transmit_fifo_priority: true,
            automatic_retransmission: false,
            receive_fifo_locked: false,
        }
    }
}
