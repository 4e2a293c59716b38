//! Boot-argument store surviving a warm reset.
//!
//! One RAM word, reserved in the board's `memory.x` so neither runtime init
//! nor the application's data sections ever touch it. SRAM keeps its content
//! across a system reset, which is all the persistence the handshake needs;
//! a power cycle leaves garbage, and garbage decodes to
//! [`BootArg::StartApplication`].

use canboot_core::BootArg;

unsafe extern "C" {
    /// Reserved by the linker script at the top of RAM.
    static mut _boot_arg: u32;
}

fn store() -> *mut u32 {
    unsafe { &raw mut _boot_arg }
}

/// Persists `arg` for the next boot stage.
///
/// The reboot controller is the only caller, so the store sees at most one
/// write per reset cycle.
pub fn persist(arg: BootArg) {
    unsafe { store().write_volatile(arg.into_word()) }
}

/// Consumes the stored argument.
///
/// The store is cleared on the way out so a stale argument cannot leak into
/// a later cycle.
pub fn take() -> BootArg {
    let word = unsafe { store().read_volatile() };
    unsafe { store().write_volatile(BootArg::CLEARED) };
    BootArg::from_word(word)
}
