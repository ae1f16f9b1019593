// -*- coding: utf-8 -*-
// Copyright (C) 2025 Michael Büsch <m@bues.ch>
// SPDX-License-Identifier: Apache-2.0 OR MIT

use crate::mode::Mode;

/// CPU sleep depth.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum SleepDepth {
    /// CPU halted. Timers, PWM and watchdog keep running.
    Idle,
    /// All clocks halted. Only pin change and watchdog wake up.
    PowerDown,
}

/// Select the sleep depth for the current state.
///
/// Power-down would stop the animation timer and the PWM generators.
/// It is only allowed if the light is off and no debounce is pending.
pub fn sleep_depth(mode: Mode, debouncing: bool) -> SleepDepth {
    if mode == Mode::Off && !debouncing {
        SleepDepth::PowerDown
    } else {
        SleepDepth::Idle
    }
}


// vim: ts=4 sw=4 expandtab
