/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Two-line result printer.
//!
//! ```text
//! 1            0
//! 0,2,1        (empty)
//! ```
//!
//! Line 1 is the verdict, line 2 the comma-joined preemption counts in task
//! id order (empty when not schedulable or when there are no tasks).

use std::io::{self, Write};

use crate::scheduler::SimOutcome;

/// Render `outcome` as the two result lines, each newline-terminated.
pub fn render(outcome: &SimOutcome) -> String {
    match outcome.preemptions() {
        Some(counts) => {
            let joined = counts
                .iter()
                .map(u64::to_string)
                .collect::<Vec<_>>()
                .join(",");
            format!("1\n{joined}\n")
        }
        None => String::from("0\n\n"),
    }
}

/// Write the rendered result to `out` and flush it.
pub fn write_report<W: Write>(out: &mut W, outcome: &SimOutcome) -> io::Result<()> {
    out.write_all(render(outcome).as_bytes())?;
    out.flush()
}

// ── Tests ─────────────────────────────────────────────────────────────────────
