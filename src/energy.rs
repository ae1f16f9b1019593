// -*- coding: utf-8 -*-
// Copyright (C) 2025 Michael Büsch <m@bues.ch>
// SPDX-License-Identifier: Apache-2.0 OR MIT

use crate::config::ENERGY_FULL_J;
use avr_int24::Int24;

/// Remaining battery energy in Joules.
///
/// Negative means exhausted.
/// Once exhausted, the value is pinned to -1 until the next charge.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct Energy(Int24);

impl Energy {
    pub const FULL: Energy = Energy::from_joules(ENERGY_FULL_J);
    pub const EXHAUSTED: Energy = Energy::from_joules(-1);

    pub const fn from_joules(joules: i32) -> Self {
        Self(Int24::from_i32(joules))
    }

    pub const fn joules(self) -> i32 {
        self.0.to_i32()
    }

    pub fn is_exhausted(self) -> bool {
        self.0 < Int24::zero()
    }

    /// Subtract the energy used during one macro-tick.
    ///
    /// An exhausted budget is not decremented any further.
    pub fn consume(self, cost: u8) -> Self {
        if self.is_exhausted() {
            self
        } else {
            Self(self.0 - Int24::from_i16(cost.into()))
        }
    }

    /// Remaining energy in percent of a full charge.
    pub fn percent(self) -> u8 {
        if self.is_exhausted() {
            0
        } else {
            let pct = (self.joules() * 100) / ENERGY_FULL_J;
            pct.min(100) as u8
        }
    }
}


// vim: ts=4 sw=4 expandtab
