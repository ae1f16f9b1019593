// -*- coding: utf-8 -*-
// Copyright (C) 2025 Michael Büsch <m@bues.ch>
// SPDX-License-Identifier: Apache-2.0 OR MIT

#![no_std]
#![no_main]
#![feature(abi_avr_interrupt)]
#![feature(asm_experimental_arch)]

mod board;
#[cfg(feature = "debug")]
mod debug_uart;
mod hw;
mod ports;
mod wdt;

use crate::{
    board::{Board, DP, Dp},
    hw::{Peripherals, mcu},
    ports::{setup_porta, setup_portb, setup_portd},
    wdt::{unwrap_option, wdt_init},
};
use avr_context::{InitCtx, MainCtx};
use blinkencat::{CONFIG, System};

static SYSTEM: System = System::new(CONFIG);

/// Pin change interrupt enables in GIMSK, starting at PCIE1.
const PCIE_PORTD: u8 = 0b010;
/// Button and charge status pins in PCMSK2.
const PCINT_BUTTON: u8 = 1 << 2; // PCINT13, PD2
const PCINT_CHARGE: u8 = 1 << 3; // PCINT14, PD3

fn periph_init(ac: &mcu::AC, exint: &mcu::EXINT, cpu: &mcu::CPU) {
    ac.acsr().write(|w| w.acd().set_bit());
    cpu.prr().write(|w| w.prusi().set_bit().prusart().set_bit());
    // These also wake us up from power-down.
    exint.pcmsk2().write(|w| w.set(PCINT_BUTTON | PCINT_CHARGE));
    exint.gimsk().write(|w| w.pcie().set(PCIE_PORTD));
}

fn init_static_vars(c: &InitCtx<'_>, dp: Peripherals) {
    wdt_init(&dp.WDT);
    periph_init(&dp.AC, &dp.EXINT, &dp.CPU);
    setup_porta(&dp.PORTA, c);
    setup_portb(&dp.PORTB, c);
    setup_portd(&dp.PORTD, c);
    DP.init(
        c,
        Dp {
            CPU: dp.CPU,
            PORTB: dp.PORTB,
            PORTD: dp.PORTD,
            TC0: dp.TC0,
            TC1: dp.TC1,
            WDT: dp.WDT,
        },
    );
}

#[avr_device::entry]
fn main() -> ! {
    let dp = unwrap_option(Peripherals::take());

    // SAFETY:
    // This is the context handle for the main() function.
    // Holding a reference to this object proves that the holder
    // is running in main() context.
    // Interrupts are still disabled here.
    let (m, ()) = unsafe { MainCtx::new_with_init(init_static_vars, dp) };

    let mut board = Board;

    // This enables interrupts.
    SYSTEM.init(&m, &mut board);

    loop {
        SYSTEM.run(&m, &mut board);
    }
}

// vim: ts=4 sw=4 expandtab
