// -*- coding: utf-8 -*-
// Copyright (C) 2025 Michael Büsch <m@bues.ch>
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The ATtiny2313A board.
//!
//! Timer 0 runs in 8 bit fast PWM mode without prescaler.
//! Its overflow at 31.25 kHz is the periodic tick.
//! OC0A drives blue, OC1A drives red and OC1B drives green.
//! Warm white is a plain GPIO.

use crate::{
    SYSTEM,
    hw::{delay_ms, interrupt, mcu, sei_sleep},
    wdt::{wdt_arm, wdt_disarm},
};
use avr_context::{InitCtxCell, IrqCtx};
use blinkencat::{
    hal::{Channel, Hal, Levels, TimerSetup, WdtTimeout},
    power::SleepDepth,
};

/// Timer 1 8 bit fast PWM: WGM13..10 = 0101.
const TC1_WGM_LOW: u8 = 0b01;
const TC1_WGM_HIGH: u8 = 0b01;

#[allow(non_snake_case)]
pub struct Dp {
    pub CPU: mcu::CPU,
    pub PORTB: mcu::PORTB,
    pub PORTD: mcu::PORTD,
    pub TC0: mcu::TC0,
    pub TC1: mcu::TC1,
    pub WDT: mcu::WDT,
}

// SAFETY: Is initialized when constructing the MainCtx.
pub static DP: InitCtxCell<Dp> = unsafe { InitCtxCell::uninit() };

/// Register level [Hal].
///
/// Works from the main loop and from the interrupt handlers.
/// Every register access runs in a critical section,
/// because PORTB and PORTD are shared with the interrupt handlers.
pub struct Board;

impl Board {
    #[inline(always)]
    fn with_dp<R>(&self, f: impl FnOnce(&Dp) -> R) -> R {
        interrupt::free(|cs| f(DP.as_ref_with_cs(cs)))
    }
}

impl Hal for Board {
    fn setup_timers(&mut self, setup: TimerSetup) {
        self.with_dp(|dp| {
            // Stop and reset both timers.
            dp.TC0.timsk().write(|w| w);
            dp.TC0.tccr0b().write(|w| w);
            dp.TC1.tccr1b().write(|w| w);
            dp.TC0.tcnt0().write(|w| w);
            dp.TC1.tcnt1().write(|w| w);
            dp.TC0.tccr0a().write(|w| w);
            dp.TC1.tccr1a().write(|w| w);

            if setup == TimerSetup::Halted {
                return;
            }
            dp.TC0.tccr0a().write(|w| w.wgm0().pwm_fast());
            if setup == TimerSetup::Pwm {
                dp.TC1.tccr1a().write(|w| w.wgm1().set(TC1_WGM_LOW));
                dp.TC1
                    .tccr1b()
                    .write(|w| w.wgm1().set(TC1_WGM_HIGH).cs1().direct());
            }
            dp.TC0.tccr0b().write(|w| w.cs0().direct());
            dp.TC0.timsk().write(|w| w.toie0().set_bit());
        });
    }

    fn set_levels(&mut self, levels: Levels) {
        self.with_dp(|dp| {
            dp.PORTD
                .portd()
                .modify(|_, w| w.pd5().bit(levels.warmwhite));
            dp.PORTB.portb().modify(|_, w| {
                w.pb2()
                    .bit(levels.blue)
                    .pb3()
                    .bit(levels.red)
                    .pb4()
                    .bit(levels.green)
            });
        });
    }

    fn set_duty(&mut self, channel: Channel, duty: u8) {
        self.with_dp(|dp| match channel {
            Channel::Red => {
                dp.TC1.ocr1a().write(|w| w.set(duty.into()));
            }
            Channel::Green => {
                dp.TC1.ocr1b().write(|w| w.set(duty.into()));
            }
            Channel::Blue => {
                dp.TC0.ocr0a().write(|w| w.set(duty));
            }
        });
    }

    fn connect_pwm(&mut self, channel: Channel, connect: bool) {
        self.with_dp(|dp| {
            match channel {
                Channel::Red => dp.TC1.tccr1a().modify(|_, w| {
                    if connect {
                        w.com1a().match_clear()
                    } else {
                        w.com1a().disconnected()
                    }
                }),
                Channel::Green => dp.TC1.tccr1a().modify(|_, w| {
                    if connect {
                        w.com1b().match_clear()
                    } else {
                        w.com1b().disconnected()
                    }
                }),
                Channel::Blue => dp.TC0.tccr0a().modify(|_, w| {
                    if connect {
                        w.com0a().match_clear()
                    } else {
                        w.com0a().disconnected()
                    }
                }),
            };
            // A disconnected channel falls back to its GPIO level.
            if !connect {
                dp.PORTB.portb().modify(|_, w| match channel {
                    Channel::Red => w.pb3().clear_bit(),
                    Channel::Green => w.pb4().clear_bit(),
                    Channel::Blue => w.pb2().clear_bit(),
                });
            }
        });
    }

    fn set_charge_led(&mut self, on: bool) {
        self.with_dp(|dp| dp.PORTD.portd().modify(|_, w| w.pd1().bit(on)));
    }

    fn button_pressed(&self) -> bool {
        // Active low.
        self.with_dp(|dp| dp.PORTD.pind().read().pd2().bit_is_clear())
    }

    fn charging(&self) -> bool {
        self.with_dp(|dp| dp.PORTD.pind().read().pd3().bit_is_set())
    }

    fn arm_debounce_timer(&mut self, timeout: WdtTimeout) {
        self.with_dp(|dp| wdt_arm(&dp.WDT, timeout));
    }

    fn disarm_debounce_timer(&mut self) {
        self.with_dp(|dp| wdt_disarm(&dp.WDT));
    }

    fn delay_ms(&mut self, ms: u8) {
        delay_ms(ms);
    }

    fn disable_interrupts(&mut self) {
        interrupt::disable();
    }

    fn enable_interrupts(&mut self) {
        // SAFETY: The main loop does not hold a critical section here.
        unsafe { interrupt::enable() };
    }

    fn sleep(&mut self, depth: SleepDepth) {
        let power_down = depth == SleepDepth::PowerDown;
        self.with_dp(|dp| {
            dp.CPU
                .mcucr()
                .modify(|_, w| w.sm1().clear_bit().sm0().bit(power_down).se().set_bit());
        });
        sei_sleep();
        self.with_dp(|dp| dp.CPU.mcucr().modify(|_, w| w.se().clear_bit()));
    }
}

pub fn irq_handler_timer0_ovf(c: &IrqCtx<'_>) {
    SYSTEM.on_tick(c);
    #[cfg(feature = "debug")]
    crate::debug_uart::irq_handler_tx(c);
}

pub fn irq_handler_pcint_d(c: &IrqCtx<'_>) {
    SYSTEM.on_pin_change(c, &mut Board);
}

pub fn irq_handler_wdt(c: &IrqCtx<'_>) {
    SYSTEM.on_debounce_timeout(c, &mut Board);
}

avr_context::define_isr! {
    device: attiny2313a,
    interrupt: TIMER0_OVF,
    isr: irq_handler_timer0_ovf,
}

avr_context::define_isr! {
    device: attiny2313a,
    interrupt: PCINT_D,
    isr: irq_handler_pcint_d,
}

avr_context::define_isr! {
    device: attiny2313a,
    interrupt: WDT_OVERFLOW,
    isr: irq_handler_wdt,
}

// vim: ts=4 sw=4 expandtab
