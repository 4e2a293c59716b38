use canboot_core::{AcceptanceFilter, NominalBitTiming};
use embassy_stm32::pac::can::Can;

use crate::config;

pub struct Registers {
    regs: Can,
}

impl Registers {
    pub fn new(regs: Can) -> Self {
        Self { regs }
    }

    /// Applies bit timing and behavior flags, then returns to active mode.
    pub fn configure(&self, config: &config::Config) {
        self.enter_init();
        self.set_bit_timing(&config.bit_timing);
        self.set_behavior_flags(config);
        self.leave_init();
    }

    fn enter_init(&self) {
        self.regs.mcr().modify(|w| {
            w.set_sleep(false);
            w.set_inrq(true);
        });
        while !self.regs.msr().read().inak() {}
    }

    fn leave_init(&self) {
        self.regs.mcr().modify(|w| w.set_inrq(false));
        // Hardware clears INAK after monitoring 11 consecutive recessive
        // bits on the bus.
        while self.regs.msr().read().inak() {}
    }

    // Could be written in initialization mode only
    fn set_bit_timing(&self, bt: &NominalBitTiming) {
        self.regs.btr().modify(|w| {
            w.set_brp(bt.prescaler.get() - 1);
            w.set_ts(0, bt.seg1.get() - 1);
            w.set_ts(1, bt.seg2.get() - 1);
            w.set_sjw(bt.sync_jump_width.get() - 1);
        });
    }

    // Could be written in initialization mode only
    fn set_behavior_flags(&self, config: &config::Config) {
        self.regs.mcr().modify(|w| {
            w.set_ttcm(false);
            w.set_abom(config.automatic_bus_off_recovery);
            w.set_awum(false);
            w.set_nart(!config.automatic_retransmission);
            w.set_rflm(config.receive_fifo_locked);
            w.set_txfp(config.transmit_fifo_priority);
        });
    }

    /// Installs the single acceptance filter: bank 0, 32-bit scale, mask
    /// mode, routed to receive FIFO 0.
    pub fn install_filter(&self, filter: &AcceptanceFilter) {
        self.regs.fmr().modify(|w| w.set_finit(true));
        self.regs.fa1r().modify(|w| w.set_fact(0, false));
        self.regs.fs1r().modify(|w| w.set_fsc(0, true));
        self.regs.fm1r().modify(|w| w.set_fbm(0, false));
        self.regs.ffa1r().modify(|w| w.set_ffa(0, false));
        self.regs.fb(0).fr1().write(|w| w.0 = filter.id_word());
        self.regs.fb(0).fr2().write(|w| w.0 = filter.mask_word());
        self.regs.fa1r().modify(|w| w.set_fact(0, true));
        self.regs.fmr().modify(|w| w.set_finit(false));
    }
}
