// -*- coding: utf-8 -*-
// Copyright (C) 2025 Michael Büsch <m@bues.ch>
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Watchdog timer.
//!
//! In normal operation the watchdog is the single shot debounce timer
//! in interrupt mode. It is switched to reset mode only to reset the system.

use crate::hw::mcu;
use blinkencat::hal::WdtTimeout;

const MCUSR: u8 = 0x34;
const WDTCSR: u8 = 0x21;

const WDIF: u8 = 1 << 7;
const WDIE: u8 = 1 << 6;
const WDCE: u8 = 1 << 4;
const WDE: u8 = 1 << 3;

/// Write `value` to WDTCSR with the timed change enable sequence.
///
/// Interrupts must be disabled.
#[inline(always)]
fn wdtcsr_timed_write(_wdt: &mcu::WDT, value: u8) {
    // SAFETY: The asm code only accesses the WDT registers
    //         which are not accessed from anywhere else in the program.
    unsafe {
        core::arch::asm!(
            "wdr",
            "ldi {tmp}, {CE}",
            "out {WDTCSR}, {tmp}",
            "out {WDTCSR}, {value}",
            tmp = out(reg_upper) _,
            value = in(reg) value,
            CE = const WDCE | WDE,
            WDTCSR = const WDTCSR,
            options(nostack, preserves_flags)
        );
    }
}

/// Stop the watchdog after reset.
///
/// Interrupts must be disabled.
pub fn wdt_init(wdt: &mcu::WDT) {
    // SAFETY: WDRF must be cleared before WDE can be cleared.
    //         MCUSR is not accessed from anywhere else in the program.
    unsafe {
        core::arch::asm!(
            "out {MCUSR}, __zero_reg__",
            MCUSR = const MCUSR,
            options(nostack, preserves_flags)
        );
    }
    wdtcsr_timed_write(wdt, WDIF);
}

/// Start the watchdog in interrupt mode.
///
/// Interrupts must be disabled.
pub fn wdt_arm(wdt: &mcu::WDT, timeout: WdtTimeout) {
    // All used timeouts fit into WDP2..0.
    wdtcsr_timed_write(wdt, WDIF | WDIE | timeout as u8);
}

/// Stop the watchdog.
///
/// Interrupts must be disabled.
pub fn wdt_disarm(wdt: &mcu::WDT) {
    wdtcsr_timed_write(wdt, WDIF);
}

/// Cheaper Option::unwrap() alternative.
///
/// This is cheaper, because it doesn't call into the panic unwind path.
/// Therefore, it does not impose caller-saves overhead onto the calling function.
#[inline(always)]
pub fn unwrap_option<T>(value: Option<T>) -> T {
    match value {
        Some(value) => value,
        None => reset_system(),
    }
}

/// Reset the system.
#[inline(never)]
#[allow(clippy::empty_loop)]
pub fn reset_system() -> ! {
    // SAFETY: We never return. Nothing else touches the watchdog any more.
    unsafe {
        core::arch::asm!(
            "cli",
            "wdr",
            "ldi {tmp}, {CE}",
            "out {WDTCSR}, {tmp}",
            "ldi {tmp}, {RESET}",
            "out {WDTCSR}, {tmp}",
            tmp = out(reg_upper) _,
            CE = const WDCE | WDE,
            RESET = const WDE, // 16 ms
            WDTCSR = const WDTCSR,
            options(nostack)
        );
    }
    loop {
        // Wait for the watchdog timer to trigger and reset the system.
    }
}

#[inline(always)]
#[panic_handler]
fn panic(_: &core::panic::PanicInfo) -> ! {
    reset_system();
}

// vim: ts=4 sw=4 expandtab
