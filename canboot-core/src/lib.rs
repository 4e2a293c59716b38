//! Core data types for the canboot bootloader platform
//!
//! This crate provides the hardware-independent pieces of the platform
//! bring-up layer: the boot argument passed across a warm reset, exact CAN
//! bit-timing selection, the acceptance-filter identifier/mask encoding, and
//! flash region descriptions. Everything here is pure and host-testable; the
//! register-level application of these values lives in the platform crates.
#![no_std]

use core::num::NonZeroU8;
use core::num::NonZeroU16;

#[derive(Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct InvalidValue;

/// Startup argument carried across a warm reset.
///
/// The reboot controller persists one of these immediately before forcing a
/// reset; the stage selector of the next cycle consumes it to decide whether
/// to stay in the bootloader or chain-load the application.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum BootArg {
    /// Hand control to the application. This is also what an empty or
    /// corrupted store decodes to, so a cold boot takes the normal
    /// timeout-gated path without anyone having to write it.
    #[default]
    StartApplication = 0,
    /// Re-enter the bootloader and run the usual session timeout window
    /// before falling through to the application. Persisted when a session
    /// ends by design, e.g. on an exit command.
    StartBootloader = 1,
    /// Re-enter the bootloader and keep the session open with no deadline.
    /// Persisted on the fault path so a broken flash image cannot lock the
    /// device out of recovery.
    StartBootloaderNoTimeout = 2,
}

/// Stored-word tag. RAM content after power-up is unpredictable, so only
/// words carrying this tag in the upper 24 bits decode to a real argument.
const STORE_TAG: u32 = 0xb007_0a00;
const STORE_TAG_MASK: u32 = 0xffff_ff00;

impl BootArg {
    /// Word that clears the store; decodes to `StartApplication`.
    pub const CLEARED: u32 = 0;

    pub const fn into_u8(self) -> u8 {
        self as u8
    }

    pub const fn try_from_u8(code: u8) -> Option<BootArg> {
        match code {
            0 => Some(BootArg::StartApplication),
            1 => Some(BootArg::StartBootloader),
            2 => Some(BootArg::StartBootloaderNoTimeout),
            _ => None,
        }
    }

    /// Encodes the argument for the persistent store.
    pub const fn into_word(self) -> u32 {
        STORE_TAG | self.into_u8() as u32
    }

    /// Decodes a stored word. Untagged words decode to `StartApplication`.
    pub const fn from_word(word: u32) -> BootArg {
        if word & STORE_TAG_MASK != STORE_TAG {
            return BootArg::StartApplication;
        }
        match Self::try_from_u8((word & !STORE_TAG_MASK) as u8) {
            Some(arg) => arg,
            None => BootArg::StartApplication,
        }
    }
}

impl From<BootArg> for u8 {
    fn from(value: BootArg) -> Self {
        value.into_u8()
    }
}

impl TryFrom<u8> for BootArg {
    type Error = InvalidValue;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::try_from_u8(value).ok_or(InvalidValue)
    }
}

/// Bit timing for the classic CAN arbitration/data phase.
///
/// The bit period is `(1 + seg1 + seg2)` time quanta, each quantum being
/// `prescaler` peripheral clock ticks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct NominalBitTiming {
    /// Prescaler for the peripheral clock. Valid range: 1 to 1024.
    pub prescaler: NonZeroU16,
    /// Time segment 1 (propagation plus phase segment 1).
    /// Valid range: 1 to 16.
    pub seg1: NonZeroU8,
    /// Time segment 2 (phase segment 2). Valid range: 1 to 8.
    pub seg2: NonZeroU8,
    /// Synchronization jump width for clock tolerance. Valid range: 1 to 4.
    pub sync_jump_width: NonZeroU8,
}

const MAX_PRESCALER: u32 = 1024;
const MAX_SEG2: u32 = 8;
/// Practical quanta-per-bit window; see CiA bit-timing recommendations.
const MIN_QUANTA: u32 = 8;
const MAX_QUANTA: u32 = 25;

impl NominalBitTiming {
    /// Selects a timing that realizes `bit_rate` on `pclk_hz` with zero
    /// remainder, or `None` when no exact realization exists.
    ///
    /// The smallest workable prescaler wins, maximizing quanta per bit; the
    /// sample point is placed near 5/8 of the bit. Usable in `const` context
    /// so boards can fail the build instead of the bus.
    pub const fn exact_for(pclk_hz: u32, bit_rate: u32) -> Option<Self> {
        if bit_rate == 0 || pclk_hz % bit_rate != 0 {
            return None;
        }
        let ticks_per_bit = pclk_hz / bit_rate;

        let mut prescaler = 1u32;
        while prescaler <= MAX_PRESCALER && prescaler <= ticks_per_bit {
            if ticks_per_bit % prescaler == 0 {
                let quanta = ticks_per_bit / prescaler;
                if quanta >= MIN_QUANTA && quanta <= MAX_QUANTA {
                    let mut seg1 = quanta * 5 / 8 - 1;
                    if quanta - 1 - seg1 > MAX_SEG2 {
                        seg1 = quanta - 1 - MAX_SEG2;
                    }
                    let seg2 = quanta - 1 - seg1;
                    return Some(Self {
                        prescaler: NonZeroU16::new(prescaler as u16).unwrap(),
                        seg1: NonZeroU8::new(seg1 as u8).unwrap(),
                        seg2: NonZeroU8::new(seg2 as u8).unwrap(),
                        sync_jump_width: NonZeroU8::new(1).unwrap(),
                    });
                }
            }
            prescaler += 1;
        }
        None
    }

    /// Time quanta per bit, including the sync segment.
    pub const fn quanta_per_bit(&self) -> u32 {
        1 + self.seg1.get() as u32 + self.seg2.get() as u32
    }

    /// The exact bit rate this timing produces on `pclk_hz`, or `None` when
    /// the division leaves a remainder.
    pub const fn bit_rate(&self, pclk_hz: u32) -> Option<u32> {
        let ticks_per_bit = self.prescaler.get() as u32 * self.quanta_per_bit();
        if pclk_hz % ticks_per_bit != 0 {
            return None;
        }
        Some(pclk_hz / ticks_per_bit)
    }

    /// True when this timing realizes `bit_rate` on `pclk_hz` exactly.
    pub const fn realizes(&self, pclk_hz: u32, bit_rate: u32) -> bool {
        match self.bit_rate(pclk_hz) {
            Some(rate) => rate == bit_rate,
            None => false,
        }
    }

    /// Sample point location in permille of the bit period.
    pub const fn sample_point_permille(&self) -> u32 {
        (1 + self.seg1.get() as u32) * 1000 / self.quanta_per_bit()
    }
}

/// One 32-bit identifier/mask acceptance filter in the bxcan filter-bank
/// register layout.
///
/// Bank register layout (identifier and mask words alike):
/// STID\[10:0\] at bits 31:21, EXID\[17:0\] at bits 20:3, IDE at bit 2,
/// RTR at bit 1, bit 0 unused. A mask bit of 1 means the corresponding
/// identifier bit must match; 0 means don't-care.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AcceptanceFilter {
    id: u32,
    mask: u32,
}

const FILTER_STD_SHIFT: u32 = 21;
const FILTER_EXT_SHIFT: u32 = 3;
const FILTER_IDE: u32 = 1 << 2;
const FILTER_RTR: u32 = 1 << 1;

impl AcceptanceFilter {
    /// Matches standard-identifier data frames whose identifier bits
    /// \[10:8\] equal `class`, leaving the low eight identifier bits
    /// don't-care. Remote and extended frames never match.
    pub const fn std_id_class(class: u8) -> Self {
        Self {
            id: ((class as u32 & 0x7) << 8) << FILTER_STD_SHIFT,
            mask: (0x700 << FILTER_STD_SHIFT) | FILTER_IDE | FILTER_RTR,
        }
    }

    /// Identifier word as written to the bank's first register.
    pub const fn id_word(&self) -> u32 {
        self.id
    }

    /// Mask word as written to the bank's second register.
    pub const fn mask_word(&self) -> u32 {
        self.mask
    }

    const fn matches(&self, frame_word: u32) -> bool {
        (frame_word ^ self.id) & self.mask == 0
    }

    /// Would the filter route a standard-identifier frame to its FIFO?
    pub const fn admits_standard(&self, id: u16, remote: bool) -> bool {
        let mut word = ((id as u32) & 0x7ff) << FILTER_STD_SHIFT;
        if remote {
            word |= FILTER_RTR;
        }
        self.matches(word)
    }

    /// Would the filter route an extended-identifier frame to its FIFO?
    pub const fn admits_extended(&self, id: u32, remote: bool) -> bool {
        let mut word = ((id & 0x1fff_ffff) << FILTER_EXT_SHIFT) | FILTER_IDE;
        if remote {
            word |= FILTER_RTR;
        }
        self.matches(word)
    }
}

/// A flash region described by link-time layout, never by its content.
///
/// The address itself is the configuration; nothing in the bring-up layer
/// dereferences these.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MemoryRegion {
    pub base: u32,
    pub size: u32,
}

impl MemoryRegion {
    pub const fn new(base: u32, size: u32) -> Self {
        Self { base, size }
    }

    /// First address past the region. Widened so regions ending at the top
    /// of the address space stay representable.
    pub const fn end(&self) -> u64 {
        self.base as u64 + self.size as u64
    }

    pub const fn contains(&self, addr: u32) -> bool {
        addr >= self.base && (addr as u64) < self.end()
    }

    pub const fn overlaps(&self, other: &MemoryRegion) -> bool {
        (self.base as u64) < other.end() && (other.base as u64) < self.end()
    }

    /// True when base and size both fall on `page` boundaries and the
    /// region is non-empty.
    pub const fn is_page_aligned(&self, page: u32) -> bool {
        if page == 0 || self.size == 0 {
            return false;
        }
        self.base % page == 0 && self.size % page == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_boot_arg_words_round_trip() {
        for arg in [
            BootArg::StartApplication,
            BootArg::StartBootloader,
            BootArg::StartBootloaderNoTimeout,
        ] {
            assert_eq!(BootArg::from_word(arg.into_word()), arg);
        }
    }

    #[test]
    fn test_boot_arg_words_distinct() {
        assert_ne!(
            BootArg::StartBootloader.into_word(),
            BootArg::StartBootloaderNoTimeout.into_word()
        );
        assert_ne!(
            BootArg::StartApplication.into_word(),
            BootArg::StartBootloader.into_word()
        );
    }

    #[test]
    fn test_boot_arg_untagged_words_default_to_application() {
        assert_eq!(BootArg::from_word(BootArg::CLEARED), BootArg::StartApplication);
        assert_eq!(BootArg::from_word(0xffff_ffff), BootArg::StartApplication);
        assert_eq!(BootArg::from_word(0xdead_beef), BootArg::StartApplication);
        // Tagged but out-of-range code.
        assert_eq!(BootArg::from_word(STORE_TAG | 0x7f), BootArg::StartApplication);
    }

    #[test]
    fn test_bit_timing_bluepill_1mbit() {
        // APB1 at 36 MHz, prescaler 2: 18 tq per bit.
        let bt = NominalBitTiming::exact_for(36_000_000, 1_000_000).unwrap();
        assert_eq!(bt.prescaler.get(), 2);
        assert_eq!(bt.seg1.get(), 10);
        assert_eq!(bt.seg2.get(), 7);
        assert_eq!(bt.sync_jump_width.get(), 1);
        assert_eq!(bt.quanta_per_bit(), 18);
        assert_eq!(bt.bit_rate(36_000_000), Some(1_000_000));
    }

    #[test]
    fn test_bit_timing_exactness_invariant() {
        let cases = [
            (36_000_000, 1_000_000),
            (36_000_000, 500_000),
            (36_000_000, 250_000),
            (36_000_000, 125_000),
            (8_000_000, 1_000_000),
            (8_000_000, 500_000),
            (48_000_000, 1_000_000),
            (16_000_000, 125_000),
        ];
        for (pclk, rate) in cases {
            let bt = NominalBitTiming::exact_for(pclk, rate)
                .unwrap_or_else(|| panic!("no timing for {pclk}/{rate}"));
            let ticks = (1 + bt.seg1.get() as u32 + bt.seg2.get() as u32)
                * bt.prescaler.get() as u32;
            assert_eq!(ticks * rate, pclk, "inexact timing for {pclk}/{rate}");
            assert!(bt.realizes(pclk, rate));
            assert!(bt.seg1.get() <= 16);
            assert!(bt.seg2.get() <= 8);
        }
    }

    #[test]
    fn test_bit_timing_rejects_inexact_rates() {
        // 36 MHz / 640 kbit leaves a remainder.
        assert!(NominalBitTiming::exact_for(36_000_000, 640_000).is_none());
        assert!(NominalBitTiming::exact_for(36_000_000, 0).is_none());
        // Divides evenly, but six ticks per bit cannot reach the minimum
        // quanta count on any prescaler.
        assert!(NominalBitTiming::exact_for(36_000_000, 6_000_000).is_none());
    }

    #[test]
    fn test_bit_timing_seg2_stays_in_hardware_range() {
        // 25 quanta forces the seg2 clamp.
        let bt = NominalBitTiming::exact_for(25_000_000, 1_000_000).unwrap();
        assert_eq!(bt.quanta_per_bit(), 25);
        assert!(bt.seg2.get() <= 8);
        assert!(bt.seg1.get() <= 16);
        assert!(bt.realizes(25_000_000, 1_000_000));
    }

    #[test]
    fn test_filter_register_words() {
        let filter = AcceptanceFilter::std_id_class(0);
        assert_eq!(filter.id_word(), 0x0000_0000);
        assert_eq!(filter.mask_word(), 0xe000_0006);
    }

    #[test]
    fn test_filter_admits_exactly_class_zero() {
        let filter = AcceptanceFilter::std_id_class(0);
        for id in 0u16..0x800 {
            let admitted = filter.admits_standard(id, false);
            assert_eq!(admitted, id < 0x100, "id {id:#05x}");
        }
    }

    #[test]
    fn test_filter_rejects_remote_and_extended() {
        let filter = AcceptanceFilter::std_id_class(0);
        assert!(!filter.admits_standard(0x042, true));
        assert!(!filter.admits_extended(0x042, false));
        // Extended identifier whose upper bits alias a class-0 standard id.
        assert!(!filter.admits_extended(0x042 << 18, false));
    }

    #[test]
    fn test_filter_nonzero_class() {
        let filter = AcceptanceFilter::std_id_class(0x7);
        assert!(filter.admits_standard(0x700, false));
        assert!(filter.admits_standard(0x7ff, false));
        assert!(!filter.admits_standard(0x6ff, false));
        assert!(!filter.admits_standard(0x000, false));
    }

    #[test]
    fn test_memory_region_predicates() {
        let page = 1024;
        let a = MemoryRegion::new(0x0800_0000, 16 * 1024);
        let b = MemoryRegion::new(0x0800_4000, 1024);
        assert!(a.is_page_aligned(page));
        assert!(b.is_page_aligned(page));
        assert!(!a.overlaps(&b));
        assert!(a.overlaps(&MemoryRegion::new(0x0800_3c00, 2048)));
        assert!(a.contains(0x0800_0000));
        assert!(!a.contains(0x0800_4000));
        assert!(!MemoryRegion::new(0x0800_0001, 1024).is_page_aligned(page));
        assert!(!MemoryRegion::new(0x0800_0000, 0).is_page_aligned(page));
    }

    #[test]
    fn test_memory_region_at_address_space_top() {
        let top = MemoryRegion::new(0xffff_fc00, 1024);
        assert_eq!(top.end(), 0x1_0000_0000);
        assert!(top.contains(0xffff_ffff));
        assert!(!top.overlaps(&MemoryRegion::new(0xffff_f800, 1024)));
    }
}
