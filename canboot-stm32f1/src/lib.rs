//! STM32F1 platform bring-up for a CAN firmware-update bootloader
//!
//! This crate owns everything between reset and the bootloader command loop
//! on bxcan-equipped STM32F1 parts:
//!
//! * one-shot CAN transport configuration with direct register access
//!   (bit timing, behavior flags, a single acceptance filter)
//! * the boot-argument store that carries the bootloader/application
//!   decision across a warm reset
//! * the terminal reboot/fault controller
//! * the SysTick session-timeout countdown
//!
//! Bring-up order matters: clocks first (`embassy_stm32::init` with the
//! board's RCC config), then pin routing ([`remap_can_to_pb8_pb9`]), then
//! [`CanInterface::new`], then [`timeout::SessionTimeout::init`]. After that
//! the command loop runs, and every way out goes through [`reboot`].
//!
//! # Feature flags
//!
//! * Pick a target chip: `stm32f103c8` or `stm32f103cb`.
//! * `defmt` or `log` select the logging sink; both default to off.
#![no_std]

#[cfg(not(any(feature = "stm32f103c8", feature = "stm32f103cb")))]
compile_error!("At least one target chip should be chosen");

// This mod MUST go first, so that the others see its macros.
pub(crate) mod fmt;

pub mod boot_arg;
pub mod config;
mod driver;
mod periphery;
mod raw;
pub mod reboot;
pub mod timeout;

pub use driver::{CanInterface, Instance, remap_can_to_pb8_pb9};
