// -*- coding: utf-8 -*-
// Copyright (C) 2025 Michael Büsch <m@bues.ch>
// SPDX-License-Identifier: Apache-2.0 OR MIT

use crate::{
    anim::{Animation, Pattern, Speed},
    config::Config,
    ctx::AvrAtomicConvert,
    hal::{Levels, TimerSetup},
    tables::ENERGY_COST,
};

/// Illumination mode.
///
/// The button cycles through the modes in declaration order.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
#[repr(u8)]
pub enum Mode {
    Off = 0,
    WarmWhite,
    SlowRgb,
    Sun,
    Red,
    Green,
    Blue,
    Yellow,
    Magenta,
    Cyan,
    FastRgb,
    SlowRgb2,
    FastRgb2,
}

impl Mode {
    pub const COUNT: usize = 13;

    #[rustfmt::skip]
    pub const ALL: [Mode; Mode::COUNT] = [
        Mode::Off,
        Mode::WarmWhite,
        Mode::SlowRgb,
        Mode::Sun,
        Mode::Red,
        Mode::Green,
        Mode::Blue,
        Mode::Yellow,
        Mode::Magenta,
        Mode::Cyan,
        Mode::FastRgb,
        Mode::SlowRgb2,
        Mode::FastRgb2,
    ];

    /// The next mode in the button cycle.
    pub const fn next(self) -> Mode {
        Mode::ALL[(self as usize + 1) % Mode::COUNT]
    }

    /// The animation of this mode, if it is an animated mode.
    pub const fn animation(self) -> Option<Animation> {
        let (pattern, speed) = match self {
            Mode::SlowRgb => (Pattern::Hue, Speed::Slow),
            Mode::FastRgb => (Pattern::Hue, Speed::Fast),
            Mode::SlowRgb2 => (Pattern::Crossfade, Speed::Slow),
            Mode::FastRgb2 => (Pattern::Crossfade, Speed::Fast),
            _ => return None,
        };
        Some(Animation { pattern, speed })
    }

    pub const fn is_animated(self) -> bool {
        self.animation().is_some()
    }

    /// Output levels of the static modes.
    ///
    /// Animated modes and Off have all GPIO levels low.
    #[rustfmt::skip]
    pub const fn levels(self) -> Levels {
        //                                ww     red    green  blue
        match self {
            Mode::WarmWhite => Levels::new(true,  false, false, false),
            Mode::Sun       => Levels::new(true,  true,  true,  true),
            Mode::Red       => Levels::new(false, true,  false, false),
            Mode::Green     => Levels::new(false, false, true,  false),
            Mode::Blue      => Levels::new(false, false, false, true),
            Mode::Yellow    => Levels::new(false, true,  true,  false),
            Mode::Magenta   => Levels::new(false, true,  false, true),
            Mode::Cyan      => Levels::new(false, false, true,  true),
            Mode::Off |
            Mode::SlowRgb |
            Mode::FastRgb |
            Mode::SlowRgb2 |
            Mode::FastRgb2  => Levels::OFF,
        }
    }

    /// Energy in Joules consumed per macro-tick.
    pub const fn energy_cost(self) -> u8 {
        match self {
            Mode::Off => 0,
            _ => ENERGY_COST[self as usize - 1],
        }
    }

    /// Timer configuration required by this mode.
    ///
    /// Static modes only need the timer for energy accounting.
    pub const fn timer_setup(self, config: &Config) -> TimerSetup {
        match self {
            Mode::Off => TimerSetup::Halted,
            _ if self.is_animated() => TimerSetup::Pwm,
            _ if config.energy_tracking => TimerSetup::Ticking,
            _ => TimerSetup::Halted,
        }
    }
}

impl AvrAtomicConvert for Mode {
    fn from_u8(value: u8) -> Self {
        match Mode::ALL.get(value as usize) {
            Some(mode) => *mode,
            None => Mode::Off,
        }
    }

    fn to_u8(self) -> u8 {
        self as u8
    }
}


// vim: ts=4 sw=4 expandtab
