// -*- coding: utf-8 -*-
// Copyright (C) 2025 Michael Büsch <m@bues.ch>
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Mode, animation and power state machine of a battery powered
//! multicolor light with one button.
//!
//! The board is abstracted by [hal::Hal].
//! The firmware calls [system::System::run] forever from the main loop
//! and forwards its interrupts to the `System::on_*` handlers.

#![cfg_attr(not(test), no_std)]

pub mod anim;
pub mod config;
pub mod ctx;
pub mod debounce;
pub mod debug;
pub mod energy;
pub mod hal;
pub mod mode;
pub mod power;
pub mod system;
pub mod tables;

#[cfg(test)]
mod test_hal;

pub use crate::{
    config::CONFIG,
    hal::Hal,
    mode::Mode,
    system::System,
};

// vim: ts=4 sw=4 expandtab
