// -*- coding: utf-8 -*-
// Copyright (C) 2025 Michael Büsch <m@bues.ch>
// SPDX-License-Identifier: Apache-2.0 OR MIT

use crate::hw::mcu;
use avr_context::InitCtx;

const PB_DEBUG: u8 = 0;
const PB_BLUE: u8 = 2;
const PB_RED: u8 = 3;
const PB_GREEN: u8 = 4;

const PD_CHARGE_LED: u8 = 1;
const PD_BUTTON: u8 = 2;
const PD_CHARGE_STATUS: u8 = 3;
const PD_WARMWHITE: u8 = 5;

fn pin_input(_bit: u8) -> u8 {
    0
}
fn pin_output(bit: u8) -> u8 {
    1 << bit
}
fn pin_low(_bit: u8) -> u8 {
    0
}
fn pin_high(bit: u8) -> u8 {
    1 << bit
}
fn pin_floating(_bit: u8) -> u8 {
    0
}
fn pin_pullup(bit: u8) -> u8 {
    1 << bit
}

#[cfg(feature = "debug")]
fn pin_debug(bit: u8) -> (u8, u8) {
    // UART idle level.
    (pin_high(bit), pin_output(bit))
}
#[cfg(not(feature = "debug"))]
fn pin_debug(bit: u8) -> (u8, u8) {
    (pin_floating(bit), pin_input(bit))
}

pub fn setup_porta(porta: &mcu::PORTA, _: &InitCtx<'_>) {
    // SAFETY: Called with interrupts disabled. Ensured by &InitCtx.
    unsafe {
        porta.porta().write(|w| {
            w.bits(
                pin_floating(0) | // XTAL1, DNC
                pin_floating(1) | // XTAL2, DNC
                pin_floating(2), // RESET
            )
        });
        porta.ddra().write(|w| {
            w.bits(
                pin_input(0) | // XTAL1, DNC
                pin_input(1) | // XTAL2, DNC
                pin_input(2), // RESET
            )
        });
    }
}

pub fn setup_portb(portb: &mcu::PORTB, _: &InitCtx<'_>) {
    let (debug_port, debug_ddr) = pin_debug(PB_DEBUG);
    // SAFETY: Called with interrupts disabled. Ensured by &InitCtx.
    unsafe {
        portb.portb().write(|w| {
            w.bits(
                debug_port | // debug TX
                pin_floating(1) | // DNC
                pin_low(PB_BLUE) | // blue, OC0A
                pin_low(PB_RED) | // red, OC1A
                pin_low(PB_GREEN) | // green, OC1B
                pin_floating(5) | // ISP MOSI
                pin_floating(6) | // ISP MISO
                pin_floating(7), // ISP SCK
            )
        });
        portb.ddrb().write(|w| {
            w.bits(
                debug_ddr | // debug TX
                pin_input(1) | // DNC
                pin_output(PB_BLUE) | // blue, OC0A
                pin_output(PB_RED) | // red, OC1A
                pin_output(PB_GREEN) | // green, OC1B
                pin_input(5) | // ISP MOSI
                pin_input(6) | // ISP MISO
                pin_input(7), // ISP SCK
            )
        });
    }
}

pub fn setup_portd(portd: &mcu::PORTD, _: &InitCtx<'_>) {
    // SAFETY: Called with interrupts disabled. Ensured by &InitCtx.
    unsafe {
        portd.portd().write(|w| {
            w.bits(
                pin_floating(0) | // DNC
                pin_low(PD_CHARGE_LED) | // charge status LED
                pin_pullup(PD_BUTTON) | // button, active low, PCINT13
                pin_floating(PD_CHARGE_STATUS) | // charge status, PCINT14
                pin_floating(4) | // DNC, piezo
                pin_low(PD_WARMWHITE) | // warm white, OC0B
                pin_floating(6), // DNC
            )
        });
        portd.ddrd().write(|w| {
            w.bits(
                pin_input(0) | // DNC
                pin_output(PD_CHARGE_LED) | // charge status LED
                pin_input(PD_BUTTON) | // button, active low, PCINT13
                pin_input(PD_CHARGE_STATUS) | // charge status, PCINT14
                pin_input(4) | // DNC, piezo
                pin_output(PD_WARMWHITE) | // warm white, OC0B
                pin_input(6), // DNC
            )
        });
    }
}

// vim: ts=4 sw=4 expandtab
