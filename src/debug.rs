// -*- coding: utf-8 -*-
// Copyright (C) 2025 Michael Büsch <m@bues.ch>
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Debug value stream.
//!
//! The main loop logs values. A transmitter in interrupt context
//! fetches the stream byte by byte:
//! `[id, value]` for each value, followed by a `[0xFF, 0xFF]` sync frame.

use crate::ctx::{AvrAtomic, IrqCtx, IrqCtxCell};

#[derive(Copy, Clone, PartialEq, Eq, Debug)]
#[repr(u8)]
pub enum Debug {
    Mode,
    EnergyPct,
    Charging,
    Debouncing,
    PhaseCoarse,
}
const NRVALUES: usize = 5;

const SYNC: u8 = 0xFF;

pub struct DebugLog {
    /// Written by the main loop only.
    values: [AvrAtomic<u8>; NRVALUES],
    /// Transmit cursor: `id << 1 | byte`.
    index: IrqCtxCell<u8>,
}

impl DebugLog {
    pub const fn new() -> Self {
        Self {
            values: [const { AvrAtomic::new() }; NRVALUES],
            index: IrqCtxCell::new(0),
        }
    }

    pub fn get(&self, id: Debug) -> u8 {
        self.values[id as usize].load()
    }

    /// Get the next byte of the stream.
    pub fn next_tx_byte(&self, c: &IrqCtx<'_>) -> u8 {
        let index = self.index.get(c);
        let id = index >> 1;
        let second = index & 1 != 0;
        let valid = (id as usize) < NRVALUES;

        let data = match (valid, second) {
            (true, false) => id,
            (true, true) => self.values[id as usize].load(),
            (false, _) => SYNC,
        };

        let next = if !second {
            index + 1
        } else if valid {
            (id + 1) << 1
        } else {
            0
        };
        self.index.set(c, next);

        data
    }
}

impl Default for DebugLog {
    fn default() -> Self {
        Self::new()
    }
}

impl Debug {
    pub fn log(self, log: &DebugLog, value: u8) {
        log.values[self as usize].store(value);
    }

    pub fn log_bool(self, log: &DebugLog, value: bool) {
        self.log(log, value.into());
    }
}


// vim: ts=4 sw=4 expandtab
