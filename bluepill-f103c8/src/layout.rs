//! Flash layout of the 64K medium-density part.
//!
//! Single source of truth for region boundaries; the values mirror
//! `memory.x`. The addresses themselves are the configuration; nothing
//! here is ever dereferenced by the bring-up layer.

use canboot_core::MemoryRegion;

/// Smallest erasable flash unit on medium-density parts.
pub const FLASH_PAGE_SIZE: u32 = 1024;

/// Bootloader image, from the base of flash up to the config pages.
pub const BOOTLOADER: MemoryRegion = MemoryRegion::new(0x0800_0000, 16 * 1024);
/// First of the two redundant configuration pages.
pub const CONFIG_PAGE1: MemoryRegion = MemoryRegion::new(0x0800_4000, FLASH_PAGE_SIZE);
/// Second configuration page.
pub const CONFIG_PAGE2: MemoryRegion = MemoryRegion::new(0x0800_4400, FLASH_PAGE_SIZE);
/// Application code region, up to the end of the part.
pub const APPLICATION: MemoryRegion = MemoryRegion::new(0x0800_4800, 46 * 1024);

const _: () = {
    assert!(BOOTLOADER.is_page_aligned(FLASH_PAGE_SIZE));
    assert!(CONFIG_PAGE1.is_page_aligned(FLASH_PAGE_SIZE));
    assert!(CONFIG_PAGE2.is_page_aligned(FLASH_PAGE_SIZE));
    assert!(APPLICATION.is_page_aligned(FLASH_PAGE_SIZE));

    assert!(!BOOTLOADER.overlaps(&CONFIG_PAGE1));
    assert!(!BOOTLOADER.overlaps(&CONFIG_PAGE2));
    assert!(!BOOTLOADER.overlaps(&APPLICATION));
    assert!(!CONFIG_PAGE1.overlaps(&CONFIG_PAGE2));
    assert!(!CONFIG_PAGE1.overlaps(&APPLICATION));
    assert!(!CONFIG_PAGE2.overlaps(&APPLICATION));

    // Everything together fills the 64K part exactly.
    assert!(APPLICATION.end() == 0x0801_0000);
};
