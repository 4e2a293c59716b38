//! Terminal reboot/fault controller.
//!
//! Every path out of the bootloader funnels through [`reboot_into`]: the
//! argument is persisted, then the core is reset. Nothing here allocates or
//! blocks, and the return types are divergent, so a caller cannot mistake
//! either path for one that comes back.

use canboot_core::BootArg;
use cortex_m::peripheral::SCB;

use crate::boot_arg;

/// Persists `arg` and forces a system reset.
pub fn reboot_into(arg: BootArg) -> ! {
    cortex_m::interrupt::disable();
    boot_arg::persist(arg);
    SCB::sys_reset()
}

/// Terminal handler for any unrecoverable condition.
///
/// Callable from exception context. The next cycle re-enters the bootloader
/// with no session deadline, so a broken image cannot lock the device out
/// of recovery.
pub fn fault() -> ! {
    reboot_into(BootArg::StartBootloaderNoTimeout)
}

/// Ends a session that concluded by design, e.g. on an exit command.
///
/// The next cycle runs the normal timeout-gated stage selection.
pub fn planned_exit() -> ! {
    reboot_into(BootArg::StartBootloader)
}
