// -*- coding: utf-8 -*-
// Copyright (C) 2025 Michael Büsch <m@bues.ch>
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Compile time configuration.

use crate::hal::WdtTimeout;

/// Feature set of the firmware build.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct Config {
    /// Track the battery energy and turn off on exhaustion.
    pub energy_tracking: bool,
    /// Button still held at the end of the debounce window turns the light off.
    pub long_press_off: bool,
    /// Debounce window length.
    pub debounce: WdtTimeout,
}

impl Config {
    pub const fn new(energy_tracking: bool, long_press_off: bool) -> Self {
        Self {
            energy_tracking,
            long_press_off,
            debounce: if energy_tracking {
                WdtTimeout::Ms250
            } else {
                WdtTimeout::Ms125
            },
        }
    }
}

/// The configuration selected by the crate features.
pub const CONFIG: Config = Config::new(cfg!(feature = "energy"), cfg!(feature = "long-press"));

/// Battery energy when fully charged: 3.7 V * 2600 mAh.
pub const ENERGY_FULL_J: i32 = 34_632;

/// Periodic timer interrupts per animation step.
/// 31.25 kHz timer overflow / 10 = 3.125 kHz animation step rate.
pub const TICK_DIV_ANIM: u8 = 10;
/// Animation steps per slow tick. 3.125 kHz / 255 = 12.25 Hz.
pub const TICK_DIV_SLOW: u8 = 255;
/// Slow ticks per macro-tick. 12.25 Hz / 221 = 1/18 Hz.
pub const TICK_DIV_MACRO: u8 = 221;

/// Duration of the low energy warning flash.
pub const WARNING_FLASH_MS: u8 = 50;

// vim: ts=4 sw=4 expandtab
