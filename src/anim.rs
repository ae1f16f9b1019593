// -*- coding: utf-8 -*-
// Copyright (C) 2025 Michael Büsch <m@bues.ch>
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Table driven color animation.
//!
//! A fade table holds one falling brightness ramp.
//! A [Schedule] chains segments of table length.
//! In each segment every channel either holds a level or
//! reads the table forwards (falling) or backwards (rising).
//! A channel that is handed over to the next segment ends on
//! the level the next segment starts with.

use crate::{
    hal::Channel,
    tables::{FADE_CROSSFADE, FADE_HUE},
};

/// Number of animation steps in one full color cycle.
pub const PHASE_SPAN: u8 = 252;

/// Brightness course of one channel within a segment.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum Ramp {
    /// Hold the lowest table level.
    Low,
    /// Hold the highest table level.
    High,
    /// Read the table backwards.
    Rise,
    /// Read the table forwards.
    Fall,
}

impl Ramp {
    #[inline]
    fn level(self, table: &[u8], index: usize) -> u8 {
        let last = table.len() - 1;
        match self {
            Ramp::Low => table[last],
            Ramp::High => table[0],
            Ramp::Rise => table[last - index],
            Ramp::Fall => table[index],
        }
    }
}

#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct Segment {
    pub red: Ramp,
    pub green: Ramp,
    pub blue: Ramp,
}

impl Segment {
    const fn new(red: Ramp, green: Ramp, blue: Ramp) -> Self {
        Self { red, green, blue }
    }
}

/// PWM duty cycles of the color channels.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Default)]
pub struct Duty {
    pub red: u8,
    pub green: u8,
    pub blue: u8,
}

impl Duty {
    pub const OFF: Duty = Duty {
        red: 0,
        green: 0,
        blue: 0,
    };

    pub fn get(&self, channel: Channel) -> u8 {
        match channel {
            Channel::Red => self.red,
            Channel::Green => self.green,
            Channel::Blue => self.blue,
        }
    }
}

pub struct Schedule {
    pub table: &'static [u8],
    pub segments: &'static [Segment],
}

impl Schedule {
    /// Number of phase steps of one cycle.
    pub const fn span(&self) -> usize {
        self.table.len() * self.segments.len()
    }

    /// Calculate the channel duty cycles at an animation phase.
    pub fn duty(&self, phase: u8) -> Duty {
        let len = self.table.len();
        let mut index = phase as usize;
        if index >= self.span() {
            index = 0;
        }
        for segment in self.segments {
            if index < len {
                return Duty {
                    red: segment.red.level(self.table, index),
                    green: segment.green.level(self.table, index),
                    blue: segment.blue.level(self.table, index),
                };
            }
            index -= len;
        }
        Duty::OFF
    }
}

/// Full hue circle. One channel moves at a time.
///
/// red -> yellow -> green -> cyan -> blue -> magenta -> red
#[rustfmt::skip]
pub const HUE: Schedule = Schedule {
    table: &FADE_HUE,
    segments: &[
        //           red         green       blue
        Segment::new(Ramp::High, Ramp::Rise, Ramp::Low),
        Segment::new(Ramp::Fall, Ramp::High, Ramp::Low),
        Segment::new(Ramp::Low,  Ramp::High, Ramp::Rise),
        Segment::new(Ramp::Low,  Ramp::Fall, Ramp::High),
        Segment::new(Ramp::Rise, Ramp::Low,  Ramp::High),
        Segment::new(Ramp::High, Ramp::Low,  Ramp::Fall),
    ],
};

/// Primary color crossfade. At most two channels are lit.
///
/// red -> green -> blue -> red
#[rustfmt::skip]
pub const CROSSFADE: Schedule = Schedule {
    table: &FADE_CROSSFADE,
    segments: &[
        //           red         green       blue
        Segment::new(Ramp::Fall, Ramp::Rise, Ramp::Low),
        Segment::new(Ramp::Low,  Ramp::Fall, Ramp::Rise),
        Segment::new(Ramp::Rise, Ramp::Low,  Ramp::Fall),
    ],
};

const _: () = assert!(HUE.span() == PHASE_SPAN as usize);
const _: () = assert!(CROSSFADE.span() == PHASE_SPAN as usize);

#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum Pattern {
    Hue,
    Crossfade,
}

impl Pattern {
    pub const fn schedule(self) -> &'static Schedule {
        match self {
            Pattern::Hue => &HUE,
            Pattern::Crossfade => &CROSSFADE,
        }
    }
}

/// Selects the phase counter that drives an animation.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum Speed {
    Fast,
    Slow,
}

#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct Animation {
    pub pattern: Pattern,
    pub speed: Speed,
}

impl Animation {
    pub fn duty(&self, phase: Phase) -> Duty {
        self.pattern.schedule().duty(phase.get(self.speed))
    }
}

/// Animation phase counters.
///
/// `coarse` advances by one each time `fine` wraps around.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Default)]
pub struct Phase {
    pub fine: u8,
    pub coarse: u8,
}

impl Phase {
    pub const fn new() -> Self {
        Self { fine: 0, coarse: 0 }
    }

    /// Advance by one animation step.
    pub const fn step(self) -> Self {
        let mut fine = self.fine + 1;
        let mut coarse = self.coarse;
        if fine >= PHASE_SPAN {
            fine = 0;
            coarse += 1;
            if coarse >= PHASE_SPAN {
                coarse = 0;
            }
        }
        Self { fine, coarse }
    }

    pub const fn get(&self, speed: Speed) -> u8 {
        match speed {
            Speed::Fast => self.fine,
            Speed::Slow => self.coarse,
        }
    }
}


// vim: ts=4 sw=4 expandtab
