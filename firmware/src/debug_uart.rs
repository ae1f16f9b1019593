// -*- coding: utf-8 -*-
// Copyright (C) 2025 Michael Büsch <m@bues.ch>
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Bit banged 8N1 transmitter for the debug value stream.
//!
//! One bit is shifted out on each timer 0 overflow.
//! That gives 31250 baud.

use crate::{SYSTEM, board::DP};
use avr_context::IrqCtx;
use blinkencat::ctx::IrqCtxCell;

const START_BIT: u8 = 0;
const STOP_BIT: u8 = 9;

static TXDATA: IrqCtxCell<u8> = IrqCtxCell::new(0);
static TXBIT: IrqCtxCell<u8> = IrqCtxCell::new(START_BIT);

pub fn irq_handler_tx(c: &IrqCtx<'_>) {
    let bit = TXBIT.get(c);
    let level = match bit {
        START_BIT => {
            TXDATA.set(c, SYSTEM.debug().next_tx_byte(c));
            false
        }
        STOP_BIT => true,
        _ => {
            let data = TXDATA.get(c);
            TXDATA.set(c, data >> 1);
            data & 1 != 0
        }
    };
    TXBIT.set(c, if bit == STOP_BIT { START_BIT } else { bit + 1 });

    DP.as_ref_with_irqctx(c)
        .PORTB
        .portb()
        .modify(|_, w| w.pb0().bit(level));
}

// vim: ts=4 sw=4 expandtab
