// -*- coding: utf-8 -*-
// Copyright (C) 2025 Michael Büsch <m@bues.ch>
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Execution context tokens and the cells that are guarded by them.
//!
//! There is exactly one main loop and there are interrupt handlers.
//! Interrupt handlers never nest.
//! A function that takes a `&MainCtx` can only be called from the main loop
//! and a function that takes a `&IrqCtx` can only be called from an ISR.
//!
//! Every piece of state lives in one of these cells:
//!
//! - [MainCtxCell]: owned by the main loop.
//! - [IrqCtxCell]: owned by the interrupt handlers.
//! - [AvrAtomic]: a single byte that is accessed from both sides.
//!   Each direction of a transition has exactly one writer.

pub use avr_atomic::{AvrAtomic, AvrAtomicConvert};
pub use avr_context::{CriticalSection, Mutex};

#[cfg(target_arch = "avr")]
pub use avr_context::{IrqCtx, MainCtx, MainCtxCell};

#[cfg(not(target_arch = "avr"))]
pub use host::{IrqCtx, MainCtx, MainCtxCell};

use core::cell::Cell;

/// State that is only ever touched by interrupt handlers.
#[repr(transparent)]
pub struct IrqCtxCell<T>(Mutex<Cell<T>>);

impl<T> IrqCtxCell<T> {
    #[inline(always)]
    pub const fn new(value: T) -> Self {
        Self(Mutex::new(Cell::new(value)))
    }
}

impl<T: Copy> IrqCtxCell<T> {
    #[inline(always)]
    pub fn get(&self, c: &IrqCtx<'_>) -> T {
        self.0.borrow(c.cs()).get()
    }

    #[inline(always)]
    pub fn set(&self, c: &IrqCtx<'_>, value: T) {
        self.0.borrow(c.cs()).set(value);
    }
}

/// Read a shared flag and clear it, if it was set.
///
/// Only the context that owns the clearing direction may call this.
/// A set from the other side between load and store is merged
/// into the one that is returned here.
#[inline(always)]
pub fn take(flag: &AvrAtomic<bool>) -> bool {
    let value = flag.load();
    if value {
        flag.store(false);
    }
    value
}

/// Context tokens for host builds.
///
/// `avr_context` only hands out its tokens on AVR.
/// These have the same interface, so that the state machine
/// can be driven by the unit tests.
#[cfg(not(target_arch = "avr"))]
mod host {
    use super::{CriticalSection, Mutex};
    use core::cell::Cell;

    pub struct MainCtx<'cs>(CriticalSection<'cs>);

    impl MainCtx<'_> {
        /// # Safety
        ///
        /// Same contract as `avr_context::MainCtx::new`.
        #[inline(always)]
        pub unsafe fn new() -> Self {
            // SAFETY: Our caller upholds the single main context rule.
            Self(unsafe { CriticalSection::new() })
        }
    }

    pub struct IrqCtx<'cs>(CriticalSection<'cs>);

    impl<'cs> IrqCtx<'cs> {
        /// # Safety
        ///
        /// Same contract as `avr_context::IrqCtx::new`.
        #[inline(always)]
        pub unsafe fn new() -> Self {
            // SAFETY: Our caller guarantees interrupt context.
            Self(unsafe { CriticalSection::new() })
        }

        #[inline(always)]
        pub fn cs(&self) -> CriticalSection<'cs> {
            self.0
        }
    }

    #[repr(transparent)]
    pub struct MainCtxCell<T>(Mutex<Cell<T>>);

    impl<T> MainCtxCell<T> {
        #[inline(always)]
        pub const fn new(value: T) -> Self {
            Self(Mutex::new(Cell::new(value)))
        }
    }

    impl<T: Copy> MainCtxCell<T> {
        #[inline(always)]
        pub fn get(&self, m: &MainCtx<'_>) -> T {
            self.0.borrow(m.0).get()
        }

        #[inline(always)]
        pub fn set(&self, m: &MainCtx<'_>, value: T) {
            self.0.borrow(m.0).set(value);
        }
    }
}


// vim: ts=4 sw=4 expandtab
