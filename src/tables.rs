// -*- coding: utf-8 -*-
// Copyright (C) 2025 Michael Büsch <m@bues.ch>
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Constant lookup data.

/// Exponential fade curve for the single-channel hue cycle.
///
/// `round(2 ** (8 * (42 - x) / 42) - 1)` for x in 0..42
#[rustfmt::skip]
pub const FADE_HUE: [u8; 42] = [
    254, 223, 196, 171, 150, 131, 115, 101, 88, 77, 67, 59, 52, 45, 39, 34, 30,
    26, 23, 20, 17, 15, 13, 11, 10, 8, 7, 6, 5, 5, 4, 3, 3, 2, 2, 2, 1, 1, 1, 0,
    0, 0,
];

/// Exponential fade curve for the power saving two-channel crossfade.
///
/// `round(2 ** (8 * (84 - x) / 84) - 1)` for x in 0..84
#[rustfmt::skip]
pub const FADE_CROSSFADE: [u8; 84] = [
    254, 239, 223, 209, 196, 183, 171, 160, 150, 140, 131, 123, 115, 108, 101,
    94, 88, 82, 77, 72, 67, 63, 59, 55, 52, 48, 45, 42, 39, 37, 34, 32, 30, 28,
    26, 24, 23, 21, 20, 19, 17, 16, 15, 14, 13, 12, 11, 11, 10, 9, 8, 8, 7, 7,
    6, 6, 5, 5, 5, 4, 4, 4, 3, 3, 3, 3, 2, 2, 2, 2, 2, 1, 1, 1, 1, 1, 1, 1, 0,
    0, 0, 0, 0, 0,
];

/// Energy consumption in Joules per macro-tick.
///
/// Indexed by `Mode as usize - 1`. Off does not consume energy.
#[rustfmt::skip]
pub const ENERGY_COST: [u8; 12] = [
    2, // WarmWhite
    3, // SlowRgb
    9, // Sun
    3, // Red
    2, // Green
    2, // Blue
    5, // Yellow
    5, // Magenta
    4, // Cyan
    3, // FastRgb
    1, // SlowRgb2
    1, // FastRgb2
];


// vim: ts=4 sw=4 expandtab
