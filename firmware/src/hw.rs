// -*- coding: utf-8 -*-
// Copyright (C) 2025 Michael Büsch <m@bues.ch>
// SPDX-License-Identifier: Apache-2.0 OR MIT

pub use attiny::{self as mcu, Peripherals};
pub use avr_device::attiny2313a as attiny;
pub use avr_device::interrupt;

/// CPU clock. Internal RC oscillator, CKDIV8 fuse unprogrammed.
pub const FCPU: u32 = 8_000_000;

/// Busy wait for `ms` milliseconds.
#[inline(never)]
pub fn delay_ms(ms: u8) {
    for _ in 0..ms {
        avr_device::asm::delay_cycles(FCPU / 1000);
    }
}

/// Enable interrupts and enter sleep mode.
///
/// The instruction following `sei` is always executed before
/// a pending interrupt is serviced.
/// Therefore, an interrupt that became pending before this call
/// wakes us up immediately instead of being missed.
#[inline(always)]
pub fn sei_sleep() {
    // SAFETY: Enabling interrupts is fine here.
    //         The caller does not hold a critical section.
    unsafe {
        core::arch::asm!("sei", "sleep", options(nostack));
    }
}

// vim: ts=4 sw=4 expandtab
