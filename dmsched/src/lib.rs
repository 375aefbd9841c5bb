/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! dmsched – Deadline-Monotonic schedulability simulator
//!
//! Module layout:
//!
//! ```text
//! lib.rs
//! ├── time          – fixed-point ticks, exact decimal parsing
//! ├── task          – immutable task definitions
//! ├── parser        – task-file parser
//! ├── config/       – YAML run configuration
//! ├── hyperperiod/  – LCM / GCD helpers, simulation horizon
//! ├── scheduler/    – priorities, releases, simulation, verdict
//! └── report        – two-line result printer
//! ```

pub mod config;
pub mod hyperperiod;
pub mod parser;
pub mod report;
pub mod scheduler;
pub mod task;
pub mod time;
