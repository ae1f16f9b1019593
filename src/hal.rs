// -*- coding: utf-8 -*-
// Copyright (C) 2025 Michael Büsch <m@bues.ch>
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Hardware capabilities required by the state machine.

use crate::power::SleepDepth;

/// PWM capable color channel.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
#[repr(u8)]
pub enum Channel {
    Red,
    Green,
    Blue,
}

impl Channel {
    pub const ALL: [Channel; 3] = [Channel::Red, Channel::Green, Channel::Blue];
}

/// Static output levels.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Default)]
pub struct Levels {
    pub warmwhite: bool,
    pub red: bool,
    pub green: bool,
    pub blue: bool,
}

impl Levels {
    pub const OFF: Levels = Levels::new(false, false, false, false);

    pub const fn new(warmwhite: bool, red: bool, green: bool, blue: bool) -> Self {
        Self {
            warmwhite,
            red,
            green,
            blue,
        }
    }
}

/// Timer and PWM generator configuration.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum TimerSetup {
    /// All timers stopped. No periodic interrupt.
    Halted,
    /// Timer running with periodic interrupt.
    /// Outputs are plain GPIOs.
    Ticking,
    /// Timer running with periodic interrupt.
    /// Color outputs are driven by the PWM generators.
    Pwm,
}

/// Watchdog timeout, encoded as WDP prescaler value.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
#[repr(u8)]
pub enum WdtTimeout {
    Ms125 = 3,
    Ms250 = 4,
}

/// The board.
///
/// Methods that are called from interrupt handlers must not
/// enable interrupts.
pub trait Hal {
    /// Reconfigure the timers and PWM generators.
    /// All PWM outputs are disconnected afterwards.
    fn setup_timers(&mut self, setup: TimerSetup);

    /// Drive the GPIO levels of all light outputs.
    fn set_levels(&mut self, levels: Levels);

    /// Set the PWM compare value of a channel.
    fn set_duty(&mut self, channel: Channel, duty: u8);

    /// Connect or disconnect the PWM generator from the channel pin.
    /// A disconnected channel is driven low.
    fn connect_pwm(&mut self, channel: Channel, connect: bool);

    /// Drive the charge indicator output.
    fn set_charge_led(&mut self, on: bool);

    /// Current button level. Active low on the pin.
    fn button_pressed(&self) -> bool;

    /// Current charge status level.
    fn charging(&self) -> bool;

    /// Arm the single shot debounce timer.
    fn arm_debounce_timer(&mut self, timeout: WdtTimeout);

    /// Disarm the debounce timer.
    fn disarm_debounce_timer(&mut self);

    /// Busy wait.
    fn delay_ms(&mut self, ms: u8);

    fn disable_interrupts(&mut self);

    fn enable_interrupts(&mut self);

    /// Enable interrupts and enter the sleep mode atomically.
    /// Returns after the next interrupt has been handled.
    fn sleep(&mut self, depth: SleepDepth);
}

// vim: ts=4 sw=4 expandtab
