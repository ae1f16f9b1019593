// -*- coding: utf-8 -*-
// Copyright (C) 2025 Michael Büsch <m@bues.ch>
// SPDX-License-Identifier: Apache-2.0 OR MIT

use crate::{
    anim::Phase,
    config::{Config, TICK_DIV_ANIM, TICK_DIV_MACRO, TICK_DIV_SLOW, WARNING_FLASH_MS},
    ctx::{AvrAtomic, IrqCtx, IrqCtxCell, MainCtx, MainCtxCell, take},
    debounce::Debounce,
    debug::{Debug, DebugLog},
    energy::Energy,
    hal::{Channel, Hal, Levels, TimerSetup},
    mode::Mode,
    power::sleep_depth,
};

/// Output pattern of the low energy warning flash.
const WARNING_LEVELS: Levels = Levels::new(false, true, false, false);

pub struct System {
    config: Config,
    /// Advanced by the pin change ISR.
    /// Forced to Off by the watchdog ISR (long press) and by the main loop (exhaustion).
    mode: AvrAtomic<Mode>,
    /// Set together with every `mode` write. Cleared by the main loop.
    mode_changed: AvrAtomic<bool>,
    /// Written by the timer ISR.
    phase_fine: AvrAtomic<u8>,
    /// Written by the timer ISR.
    phase_coarse: AvrAtomic<u8>,
    /// Set by the timer ISR. Cleared by the main loop.
    macro_tick: AvrAtomic<bool>,
    div_anim: IrqCtxCell<u8>,
    div_slow: IrqCtxCell<u8>,
    div_macro: IrqCtxCell<u8>,
    /// Written by the pin change ISR.
    charging: AvrAtomic<bool>,
    /// Set by the pin change ISR on charge start. Cleared by the main loop.
    refill: AvrAtomic<bool>,
    energy: MainCtxCell<Energy>,
    debounce: Debounce,
    debug: DebugLog,
}

impl System {
    pub const fn new(config: Config) -> Self {
        Self {
            config,
            mode: AvrAtomic::new(),
            mode_changed: AvrAtomic::new(),
            phase_fine: AvrAtomic::new(),
            phase_coarse: AvrAtomic::new(),
            macro_tick: AvrAtomic::new(),
            div_anim: IrqCtxCell::new(0),
            div_slow: IrqCtxCell::new(0),
            div_macro: IrqCtxCell::new(0),
            charging: AvrAtomic::new(),
            refill: AvrAtomic::new(),
            energy: MainCtxCell::new(Energy::FULL),
            debounce: Debounce::new(),
            debug: DebugLog::new(),
        }
    }

    /// Bring all outputs into the Off state and enable interrupts.
    ///
    /// Must be called with interrupts disabled.
    pub fn init(&self, m: &MainCtx<'_>, hal: &mut impl Hal) {
        let charging = hal.charging();
        self.charging.store(charging);
        hal.set_charge_led(charging);

        self.set_energy(m, Energy::FULL);
        self.mode.store(Mode::Off);
        self.mode_changed.store(false);
        self.apply_mode(m, hal, Mode::Off);

        hal.enable_interrupts();
    }

    /// One iteration of the main loop.
    ///
    /// Returns after the next wake up.
    pub fn run(&self, m: &MainCtx<'_>, hal: &mut impl Hal) {
        // Charge start has priority over depletion.
        if take(&self.refill) {
            self.set_energy(m, Energy::FULL);
        }

        // Clear the flag before reading the mode.
        // A change after this point is picked up by the next iteration.
        let changed = take(&self.mode_changed);
        let mode = self.mode.load();
        if changed {
            self.apply_mode(m, hal, mode);
        }

        if let Some(animation) = mode.animation() {
            let phase = Phase {
                fine: self.phase_fine.load(),
                coarse: self.phase_coarse.load(),
            };
            let duty = animation.duty(phase);
            for channel in Channel::ALL {
                let value = duty.get(channel);
                hal.set_duty(channel, value);
                // A zero compare value would still emit a glitch pulse.
                hal.connect_pwm(channel, value != 0);
            }
        }

        let tick = take(&self.macro_tick);
        if self.config.energy_tracking && mode != Mode::Off {
            if tick {
                self.set_energy(m, self.energy.get(m).consume(mode.energy_cost()));
            }
            if self.energy.get(m).is_exhausted() {
                self.exhausted(m, hal);
            }
        }

        Debug::Charging.log_bool(&self.debug, self.charging.load());
        Debug::Debouncing.log_bool(&self.debug, self.debounce.is_active());
        Debug::PhaseCoarse.log(&self.debug, self.phase_coarse.load());

        self.wait(m, hal);
    }

    fn apply_mode(&self, _m: &MainCtx<'_>, hal: &mut impl Hal, mode: Mode) {
        hal.setup_timers(mode.timer_setup(&self.config));
        hal.set_levels(mode.levels());
        Debug::Mode.log(&self.debug, mode as u8);
    }

    fn exhausted(&self, m: &MainCtx<'_>, hal: &mut impl Hal) {
        self.set_energy(m, Energy::EXHAUSTED);

        hal.setup_timers(TimerSetup::Halted);
        hal.set_levels(WARNING_LEVELS);
        hal.delay_ms(WARNING_FLASH_MS);

        self.mode.store(Mode::Off);
        self.mode_changed.store(true);
    }

    fn wait(&self, _m: &MainCtx<'_>, hal: &mut impl Hal) {
        hal.disable_interrupts();
        if self.mode_changed.load() || self.refill.load() {
            hal.enable_interrupts();
        } else {
            let depth = sleep_depth(self.mode.load(), self.debounce.is_active());
            hal.sleep(depth);
        }
    }

    fn set_energy(&self, m: &MainCtx<'_>, energy: Energy) {
        self.energy.set(m, energy);
        Debug::EnergyPct.log(&self.debug, energy.percent());
    }

    /// Pin change interrupt: button edge and then charge status edge.
    pub fn on_pin_change(&self, c: &IrqCtx<'_>, hal: &mut impl Hal) {
        self.on_button_edge(c, hal);
        self.on_charge_edge(c, hal);
    }

    pub fn on_button_edge(&self, c: &IrqCtx<'_>, hal: &mut impl Hal) {
        if hal.button_pressed() && !self.debounce.is_active() {
            self.mode.store(self.mode.load().next());
            self.mode_changed.store(true);
        }
        self.debounce.start(c, hal, self.config.debounce);
    }

    pub fn on_charge_edge(&self, c: &IrqCtx<'_>, hal: &mut impl Hal) {
        let charging = hal.charging();
        let was_charging = self.charging.load();
        self.charging.store(charging);
        hal.set_charge_led(charging);
        if charging && !was_charging && self.config.energy_tracking {
            self.refill.store(true);
        }
        self.debounce.start(c, hal, self.config.debounce);
    }

    /// Watchdog interrupt: end of the debounce window.
    pub fn on_debounce_timeout(&self, c: &IrqCtx<'_>, hal: &mut impl Hal) {
        self.debounce.expire(c, hal);
        if self.config.long_press_off && hal.button_pressed() {
            self.mode.store(Mode::Off);
            self.mode_changed.store(true);
        }
    }

    /// Periodic timer interrupt.
    pub fn on_tick(&self, c: &IrqCtx<'_>) {
        let div = self.div_anim.get(c) + 1;
        if div < TICK_DIV_ANIM {
            self.div_anim.set(c, div);
            return;
        }
        self.div_anim.set(c, 0);

        let phase = Phase {
            fine: self.phase_fine.load(),
            coarse: self.phase_coarse.load(),
        }
        .step();
        self.phase_fine.store(phase.fine);
        self.phase_coarse.store(phase.coarse);

        let div = self.div_slow.get(c) + 1;
        if div < TICK_DIV_SLOW {
            self.div_slow.set(c, div);
            return;
        }
        self.div_slow.set(c, 0);

        let div = self.div_macro.get(c) + 1;
        if div < TICK_DIV_MACRO {
            self.div_macro.set(c, div);
            return;
        }
        self.div_macro.set(c, 0);

        self.macro_tick.store(true);
    }

    pub fn mode(&self) -> Mode {
        self.mode.load()
    }

    pub fn energy(&self, m: &MainCtx<'_>) -> Energy {
        self.energy.get(m)
    }

    pub fn is_charging(&self) -> bool {
        self.charging.load()
    }

    pub fn is_debouncing(&self) -> bool {
        self.debounce.is_active()
    }

    pub fn phase(&self) -> Phase {
        Phase {
            fine: self.phase_fine.load(),
            coarse: self.phase_coarse.load(),
        }
    }

    pub fn debug(&self) -> &DebugLog {
        &self.debug
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{
        anim::{CROSSFADE, HUE, PHASE_SPAN},
        config::ENERGY_FULL_J,
        hal::WdtTimeout,
        power::SleepDepth,
        test_hal::{Event, TestHal},
    };

    /// Timer overflows per energy accounting step.
    const MACRO_TICK_PERIOD: u32 =
        TICK_DIV_ANIM as u32 * TICK_DIV_SLOW as u32 * TICK_DIV_MACRO as u32;

    struct Fixture {
        sys: System,
        hal: TestHal,
        m: MainCtx<'static>,
        c: IrqCtx<'static>,
    }

    impl Fixture {
        fn new(config: Config) -> Self {
            // SAFETY: The test is the only context.
            let m = unsafe { MainCtx::new() };
            // SAFETY: The test is the only context.
            let c = unsafe { IrqCtx::new() };
            let f = Self {
                sys: System::new(config),
                hal: TestHal::new(),
                m,
                c,
            };
            f.sys.init(&f.m, &mut TestHal::new());
            f
        }

        fn default() -> Self {
            Self::new(Config::new(true, true))
        }

        fn run(&mut self) {
            self.sys.run(&self.m, &mut self.hal);
        }

        fn press(&mut self) {
            self.hal.button = true;
            self.sys.on_pin_change(&self.c, &mut self.hal);
        }

        fn release(&mut self) {
            self.hal.button = false;
            self.sys.on_pin_change(&self.c, &mut self.hal);
        }

        fn expire(&mut self) {
            self.sys.on_debounce_timeout(&self.c, &mut self.hal);
        }

        fn click(&mut self) {
            self.press();
            self.release();
            self.expire();
        }

        fn set_charging(&mut self, charging: bool) {
            self.hal.charging = charging;
            self.sys.on_pin_change(&self.c, &mut self.hal);
        }

        fn force_mode(&mut self, mode: Mode) {
            self.sys.mode.store(mode);
            self.sys.mode_changed.store(true);
            self.run();
        }

        fn set_energy(&mut self, joules: i32) {
            self.sys.energy.set(&self.m, Energy::from_joules(joules));
        }

        fn macro_tick(&mut self) {
            self.sys.macro_tick.store(true);
            self.run();
        }

        fn ticks(&mut self, count: u32) {
            for _ in 0..count {
                self.sys.on_tick(&self.c);
            }
        }
    }

    #[test]
    fn test_init() {
        // SAFETY: The test is the only context.
        let m = unsafe { MainCtx::new() };
        let sys = System::new(Config::new(true, true));
        let mut hal = TestHal::new();
        hal.charging = true;
        sys.init(&m, &mut hal);

        assert_eq!(sys.mode(), Mode::Off);
        assert_eq!(sys.energy(&m), Energy::FULL);
        assert!(sys.is_charging());
        assert!(hal.charge_led);
        assert_eq!(hal.timers, TimerSetup::Halted);
        assert_eq!(hal.levels, Levels::OFF);
        assert!(hal.irq_enabled);

        sys.run(&m, &mut hal);
        assert_eq!(hal.last_sleep(), Some(SleepDepth::PowerDown));
    }

    #[test]
    fn test_power_on_scenario() {
        let mut f = Fixture::default();

        f.press();
        assert_eq!(f.sys.mode(), Mode::WarmWhite);
        f.run();
        assert_eq!(f.hal.levels, Levels::new(true, false, false, false));
        assert_eq!(f.hal.timers, TimerSetup::Ticking);
        for ch in Channel::ALL {
            assert_eq!(f.hal.output(ch), 0);
        }
        // Debounce pending: Only shallow sleep.
        assert_eq!(f.hal.last_sleep(), Some(SleepDepth::Idle));

        f.release();
        f.expire();
        f.run();

        f.press();
        assert_eq!(f.sys.mode(), Mode::SlowRgb);
        f.run();
        assert_eq!(f.hal.timers, TimerSetup::Pwm);
        assert_eq!(f.hal.levels, Levels::OFF);
        let coarse = f.sys.phase().coarse;
        assert_eq!(f.hal.output(Channel::Red), HUE.duty(coarse).red);

        // The slow animation advances once per fine cycle.
        f.ticks(5 * TICK_DIV_ANIM as u32 * PHASE_SPAN as u32);
        f.run();
        let coarse2 = f.sys.phase().coarse;
        assert_eq!(coarse2, coarse + 5);
        let duty = HUE.duty(coarse2);
        assert_eq!(f.hal.duty, [duty.red, duty.green, duty.blue]);
        assert_ne!(duty, HUE.duty(coarse));
    }

    #[test]
    fn test_fast_animation_follows_fine_phase() {
        let mut f = Fixture::default();
        f.force_mode(Mode::FastRgb2);
        for _ in 0..20 {
            f.ticks(TICK_DIV_ANIM as u32 * 7);
            f.run();
            let duty = CROSSFADE.duty(f.sys.phase().fine);
            assert_eq!(f.hal.output(Channel::Red), duty.red);
            assert_eq!(f.hal.output(Channel::Green), duty.green);
            assert_eq!(f.hal.output(Channel::Blue), duty.blue);
        }
    }

    #[test]
    fn test_zero_duty_disconnects_pwm() {
        let mut f = Fixture::default();
        f.force_mode(Mode::FastRgb2);
        // Phase 0: only red is lit.
        assert_eq!(f.sys.phase().fine, 0);
        assert_eq!(f.hal.duty, [254, 0, 0]);
        assert_eq!(f.hal.connected, [true, false, false]);

        // Halfway into the first segment red and green are lit.
        f.ticks(TICK_DIV_ANIM as u32 * 42);
        f.run();
        assert_eq!(f.hal.connected, [true, true, false]);
    }

    #[test]
    fn test_mode_applied_once() {
        let mut f = Fixture::default();
        f.click();
        f.hal.clear();
        f.run();
        f.run();
        f.run();
        assert_eq!(f.hal.count(|e| matches!(e, Event::SetupTimers(_))), 1);
        assert_eq!(f.hal.count(|e| matches!(e, Event::Levels(_))), 1);
    }

    #[test]
    fn test_debounce_blocks_second_press() {
        let mut f = Fixture::default();
        f.press();
        assert_eq!(f.sys.mode(), Mode::WarmWhite);
        assert!(f.sys.is_debouncing());

        // Bounces within the window.
        f.release();
        f.press();
        f.release();
        assert_eq!(f.sys.mode(), Mode::WarmWhite);
        assert_eq!(f.hal.count(|e| matches!(e, Event::ArmDebounce(_))), 1);

        f.expire();
        assert!(!f.sys.is_debouncing());
        assert_eq!(f.sys.mode(), Mode::WarmWhite);

        f.press();
        assert_eq!(f.sys.mode(), Mode::SlowRgb);
    }

    #[test]
    fn test_release_edge_does_not_advance() {
        let mut f = Fixture::default();
        f.click();
        assert_eq!(f.sys.mode(), Mode::WarmWhite);

        // Edge with the button up.
        f.release();
        assert!(f.sys.is_debouncing());
        f.expire();
        assert_eq!(f.sys.mode(), Mode::WarmWhite);
        assert!(!f.sys.is_debouncing());
    }

    #[test]
    fn test_long_press_off() {
        let mut f = Fixture::default();
        f.click();
        f.click();
        assert_eq!(f.sys.mode(), Mode::SlowRgb);
        f.run();

        // Still held when the window ends.
        f.press();
        assert_eq!(f.sys.mode(), Mode::Sun);
        f.expire();
        assert_eq!(f.sys.mode(), Mode::Off);
        f.run();
        assert_eq!(f.hal.timers, TimerSetup::Halted);
        assert_eq!(f.hal.levels, Levels::OFF);
    }

    #[test]
    fn test_long_press_disabled() {
        let mut f = Fixture::new(Config::new(true, false));
        f.press();
        f.expire();
        assert_eq!(f.sys.mode(), Mode::WarmWhite);
    }

    #[test]
    fn test_debounce_timeout_config() {
        let mut f = Fixture::new(Config::new(false, true));
        f.press();
        assert_eq!(f.hal.debounce_armed, Some(WdtTimeout::Ms125));
        let mut f = Fixture::default();
        f.press();
        assert_eq!(f.hal.debounce_armed, Some(WdtTimeout::Ms250));
        f.expire();
        assert_eq!(f.hal.debounce_armed, None);
    }

    #[test]
    fn test_charge_edge_while_debouncing() {
        let mut f = Fixture::default();
        f.press();
        assert!(f.sys.is_debouncing());

        f.set_charging(true);
        assert!(f.sys.is_charging());
        assert!(f.hal.charge_led);
        // The button is still down, but this is no new press.
        assert_eq!(f.sys.mode(), Mode::WarmWhite);

        f.set_charging(false);
        assert!(!f.sys.is_charging());
        assert!(!f.hal.charge_led);
    }

    #[test]
    fn test_exhaustion_one_tick() {
        let mut f = Fixture::default();
        f.force_mode(Mode::Red);
        f.set_energy(1);
        f.hal.clear();

        f.macro_tick();
        assert_eq!(f.sys.mode(), Mode::Off);
        assert_eq!(f.sys.energy(&f.m), Energy::EXHAUSTED);
        assert!(f.hal.events.contains(&Event::Levels(WARNING_LEVELS)));
        assert!(f.hal.events.contains(&Event::Delay(WARNING_FLASH_MS)));
        // The pending mode change prevents sleeping.
        assert_eq!(f.hal.last_sleep(), None);
        assert!(f.hal.irq_enabled);

        f.run();
        assert_eq!(f.hal.timers, TimerSetup::Halted);
        assert_eq!(f.hal.levels, Levels::OFF);

        // No further decrement.
        f.macro_tick();
        assert_eq!(f.sys.energy(&f.m), Energy::EXHAUSTED);
        assert_eq!(f.sys.mode(), Mode::Off);
    }

    #[test]
    fn test_exhaustion_scenario() {
        let mut f = Fixture::default();
        f.force_mode(Mode::Red);
        f.set_energy(3);

        f.macro_tick();
        assert_eq!(f.sys.energy(&f.m).joules(), 0);
        assert_eq!(f.sys.mode(), Mode::Red);

        f.macro_tick();
        assert_eq!(f.sys.mode(), Mode::Off);
        assert!(f.sys.energy(&f.m).is_exhausted());
        assert_eq!(f.sys.energy(&f.m), Energy::EXHAUSTED);
    }

    #[test]
    fn test_macro_tick_from_timer() {
        let mut f = Fixture::default();
        f.force_mode(Mode::Sun);
        f.ticks(MACRO_TICK_PERIOD - 1);
        f.run();
        assert_eq!(f.sys.energy(&f.m), Energy::FULL);
        f.ticks(1);
        f.run();
        assert_eq!(f.sys.energy(&f.m).joules(), ENERGY_FULL_J - 9);
        f.ticks(MACRO_TICK_PERIOD);
        f.run();
        assert_eq!(f.sys.energy(&f.m).joules(), ENERGY_FULL_J - 18);
    }

    #[test]
    fn test_off_consumes_nothing() {
        let mut f = Fixture::default();
        f.macro_tick();
        assert_eq!(f.sys.energy(&f.m), Energy::FULL);
        // A tick that happened in Off is not charged later.
        f.sys.macro_tick.store(true);
        f.run();
        f.force_mode(Mode::Red);
        assert_eq!(f.sys.energy(&f.m), Energy::FULL);
    }

    #[test]
    fn test_exhausted_cannot_turn_on() {
        let mut f = Fixture::default();
        f.sys.energy.set(&f.m, Energy::EXHAUSTED);
        f.click();
        assert_eq!(f.sys.mode(), Mode::WarmWhite);
        f.run();
        assert_eq!(f.sys.mode(), Mode::Off);
        assert_eq!(f.sys.energy(&f.m), Energy::EXHAUSTED);
    }

    #[test]
    fn test_charge_refills_exhausted() {
        for mode in [Mode::Off, Mode::Red, Mode::FastRgb] {
            let mut f = Fixture::default();
            f.force_mode(mode);
            f.sys.energy.set(&f.m, Energy::EXHAUSTED);
            f.set_charging(true);
            f.run();
            assert_eq!(f.sys.energy(&f.m), Energy::FULL, "{mode:?}");
        }
    }

    #[test]
    fn test_charge_beats_depletion() {
        let mut f = Fixture::default();
        f.force_mode(Mode::Red);
        f.set_energy(1);
        f.sys.macro_tick.store(true);
        f.set_charging(true);
        f.run();
        assert_eq!(f.sys.mode(), Mode::Red);
        assert_eq!(f.sys.energy(&f.m).joules(), ENERGY_FULL_J - 3);
    }

    #[test]
    fn test_charge_only_on_rising_edge() {
        let mut f = Fixture::default();
        f.set_charging(true);
        f.run();
        f.force_mode(Mode::Red);
        f.set_energy(100);

        // Further pin changes while charging do not refill.
        f.expire();
        f.click();
        f.run();
        assert_eq!(f.sys.energy(&f.m).joules(), 100);

        f.expire();
        f.set_charging(false);
        f.run();
        assert_eq!(f.sys.energy(&f.m).joules(), 100);
    }

    #[test]
    fn test_pending_refill_skips_sleep() {
        let mut f = Fixture::default();
        f.sys.energy.set(&f.m, Energy::EXHAUSTED);
        f.sys.refill.store(true);
        f.hal.clear();

        // The charge edge came in after the refill check of this iteration.
        f.sys.wait(&f.m, &mut f.hal);
        assert_eq!(f.hal.last_sleep(), None);
        assert!(f.hal.irq_enabled);
        assert_eq!(f.sys.energy(&f.m), Energy::EXHAUSTED);

        // The next iteration applies it and only then sleeps.
        f.run();
        assert_eq!(f.sys.energy(&f.m), Energy::FULL);
        assert!(!f.sys.refill.load());
        assert_eq!(f.hal.count(|e| matches!(e, Event::Sleep(_))), 1);
        assert_eq!(f.hal.last_sleep(), Some(SleepDepth::PowerDown));
    }

    #[test]
    fn test_without_energy_tracking() {
        let mut f = Fixture::new(Config::new(false, true));
        f.force_mode(Mode::Red);
        assert_eq!(f.hal.timers, TimerSetup::Halted);
        assert!(f.hal.levels.red);
        f.set_energy(1);
        f.macro_tick();
        f.macro_tick();
        assert_eq!(f.sys.mode(), Mode::Red);

        f.force_mode(Mode::SlowRgb2);
        assert_eq!(f.hal.timers, TimerSetup::Pwm);
    }

    #[test]
    fn test_sleep_policy() {
        let mut f = Fixture::default();
        f.run();
        assert_eq!(f.hal.last_sleep(), Some(SleepDepth::PowerDown));

        // Pin change while off: stay awake for the watchdog.
        f.set_charging(true);
        f.run();
        assert_eq!(f.hal.last_sleep(), Some(SleepDepth::Idle));
        f.expire();
        f.run();
        assert_eq!(f.hal.last_sleep(), Some(SleepDepth::PowerDown));

        f.click();
        f.run();
        assert_eq!(f.hal.last_sleep(), Some(SleepDepth::Idle));
    }

    #[test]
    fn test_full_mode_cycle() {
        let mut f = Fixture::default();
        for expect in Mode::ALL.iter().skip(1).chain([Mode::Off].iter()) {
            f.click();
            f.run();
            assert_eq!(f.sys.mode(), *expect);
            assert_eq!(f.hal.timers, expect.timer_setup(&Config::new(true, true)));
            if !expect.is_animated() {
                assert_eq!(f.hal.levels, expect.levels());
            }
        }
    }

    #[test]
    fn test_debug_values() {
        let mut f = Fixture::default();
        f.force_mode(Mode::Cyan);
        f.set_charging(true);
        f.run();
        let log = f.sys.debug();
        assert_eq!(log.get(Debug::Mode), Mode::Cyan as u8);
        assert_eq!(log.get(Debug::EnergyPct), 100);
        assert_eq!(log.get(Debug::Charging), 1);
        assert_eq!(log.get(Debug::Debouncing), 1);
    }
}

// vim: ts=4 sw=4 expandtab
