// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Test harness for simulated contact form abuse.
//!
//! Bot and visitor profiles are replayed against a guard on a manual clock,
//! so every simulation is deterministic and runs instantly.

pub mod attacks;
pub mod generators;
pub mod metrics;
