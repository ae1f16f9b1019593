// -*- coding: utf-8 -*-
// Copyright (C) 2025 Michael Büsch <m@bues.ch>
// SPDX-License-Identifier: Apache-2.0 OR MIT

use crate::{
    ctx::{AvrAtomic, IrqCtx},
    hal::{Hal, WdtTimeout},
};

#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum DebounceState {
    Idle,
    Debouncing,
}

/// Refractory window after a pin change.
///
/// The window is started by the pin change interrupt and
/// ends only by the watchdog timeout interrupt.
/// Further edges never restart or end a running window.
pub struct Debounce {
    /// Set by the pin change ISR. Cleared by the watchdog ISR.
    active: AvrAtomic<bool>,
}

impl Debounce {
    pub const fn new() -> Self {
        Self {
            active: AvrAtomic::new(),
        }
    }

    pub fn state(&self) -> DebounceState {
        if self.active.load() {
            DebounceState::Debouncing
        } else {
            DebounceState::Idle
        }
    }

    pub fn is_active(&self) -> bool {
        self.state() == DebounceState::Debouncing
    }

    /// Start a debounce window, unless one is running already.
    ///
    /// Returns true, if a new window has been started.
    pub fn start(&self, _c: &IrqCtx<'_>, hal: &mut impl Hal, timeout: WdtTimeout) -> bool {
        if self.active.load() {
            false
        } else {
            self.active.store(true);
            hal.arm_debounce_timer(timeout);
            true
        }
    }

    /// The debounce timer fired.
    pub fn expire(&self, _c: &IrqCtx<'_>, hal: &mut impl Hal) {
        hal.disarm_debounce_timer();
        self.active.store(false);
    }
}

impl Default for Debounce {
    fn default() -> Self {
        Self::new()
    }
}


// vim: ts=4 sw=4 expandtab
