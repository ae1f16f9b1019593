// -*- coding: utf-8 -*-
// Copyright (C) 2025 Michael Büsch <m@bues.ch>
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Recording board model for the unit tests.

use crate::{
    hal::{Channel, Hal, Levels, TimerSetup, WdtTimeout},
    power::SleepDepth,
};

#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum Event {
    SetupTimers(TimerSetup),
    Levels(Levels),
    Duty(Channel, u8),
    ConnectPwm(Channel, bool),
    ChargeLed(bool),
    ArmDebounce(WdtTimeout),
    DisarmDebounce,
    Delay(u8),
    Sleep(SleepDepth),
}

pub struct TestHal {
    pub events: Vec<Event>,
    pub button: bool,
    pub charging: bool,
    pub timers: TimerSetup,
    pub levels: Levels,
    pub duty: [u8; 3],
    pub connected: [bool; 3],
    pub charge_led: bool,
    pub debounce_armed: Option<WdtTimeout>,
    pub irq_enabled: bool,
}

impl TestHal {
    pub fn new() -> Self {
        Self {
            events: Vec::new(),
            button: false,
            charging: false,
            timers: TimerSetup::Halted,
            levels: Levels::OFF,
            duty: [0; 3],
            connected: [false; 3],
            charge_led: false,
            debounce_armed: None,
            irq_enabled: false,
        }
    }

    pub fn count(&self, f: impl Fn(&Event) -> bool) -> usize {
        self.events.iter().filter(|e| f(e)).count()
    }

    pub fn last_sleep(&self) -> Option<SleepDepth> {
        self.events.iter().rev().find_map(|e| match e {
            Event::Sleep(depth) => Some(*depth),
            _ => None,
        })
    }

    /// Effective brightness of a color channel.
    pub fn output(&self, channel: Channel) -> u8 {
        let i = channel as usize;
        if self.timers == TimerSetup::Pwm && self.connected[i] {
            self.duty[i]
        } else {
            let on = match channel {
                Channel::Red => self.levels.red,
                Channel::Green => self.levels.green,
                Channel::Blue => self.levels.blue,
            };
            if on { 255 } else { 0 }
        }
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }
}

impl Hal for TestHal {
    fn setup_timers(&mut self, setup: TimerSetup) {
        self.events.push(Event::SetupTimers(setup));
        self.timers = setup;
        self.connected = [false; 3];
    }

    fn set_levels(&mut self, levels: Levels) {
        self.events.push(Event::Levels(levels));
        self.levels = levels;
    }

    fn set_duty(&mut self, channel: Channel, duty: u8) {
        self.events.push(Event::Duty(channel, duty));
        self.duty[channel as usize] = duty;
    }

    fn connect_pwm(&mut self, channel: Channel, connect: bool) {
        self.events.push(Event::ConnectPwm(channel, connect));
        self.connected[channel as usize] = connect;
    }

    fn set_charge_led(&mut self, on: bool) {
        self.events.push(Event::ChargeLed(on));
        self.charge_led = on;
    }

    fn button_pressed(&self) -> bool {
        self.button
    }

    fn charging(&self) -> bool {
        self.charging
    }

    fn arm_debounce_timer(&mut self, timeout: WdtTimeout) {
        self.events.push(Event::ArmDebounce(timeout));
        self.debounce_armed = Some(timeout);
    }

    fn disarm_debounce_timer(&mut self) {
        self.events.push(Event::DisarmDebounce);
        self.debounce_armed = None;
    }

    fn delay_ms(&mut self, ms: u8) {
        self.events.push(Event::Delay(ms));
    }

    fn disable_interrupts(&mut self) {
        self.irq_enabled = false;
    }

    fn enable_interrupts(&mut self) {
        self.irq_enabled = true;
    }

    fn sleep(&mut self, depth: SleepDepth) {
        self.events.push(Event::Sleep(depth));
        self.irq_enabled = true;
    }
}

// vim: ts=4 sw=4 expandtab
