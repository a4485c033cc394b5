// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[yare::parameterized(
    zero      = { 0, "00:00:00" },
    seconds   = { 59, "00:00:59" },
    minute    = { 60, "00:01:00" },
    mixed     = { 3 * 3600 + 25 * 60 + 7, "03:25:07" },
    hour_wrap = { 100 * 3600, "100:00:00" },
)]
fn formats_hms(secs: u64, expected: &str) {
    assert_eq!(format_hms(secs), expected);
}
