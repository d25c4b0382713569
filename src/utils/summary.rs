// Copyright (c) 2025-2026 the packfs contributors
// SPDX-License-Identifier: Apache-2.0

//! End-of-run statistics.

use std::fmt;

use crate::packer::PackedEntry;
use crate::utils::formatting::{format_bytes, format_number};

/// Totals over the entries of one generated artifact.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PackSummary {
    /// Number of directory rows, sentinel excluded
    pub entries: usize,
    /// Rows whose bytes came through a filter command
    pub filtered: usize,
    /// Sum of the reported sizes (terminators excluded)
    pub total_bytes: u64,
}

impl PackSummary {
    pub fn from_entries(entries: &[PackedEntry]) -> Self {
        Self {
            entries: entries.len(),
            filtered: entries.iter().filter(|e| e.filtered).count(),
            total_bytes: entries.iter().map(|e| e.size).sum(),
        }
    }
}

impl fmt::Display for PackSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "packed {} file{} ({} filtered), {} ({} bytes)",
            format_number(self.entries as u64),
            if self.entries == 1 { "" } else { "s" },
            format_number(self.filtered as u64),
            format_bytes(self.total_bytes),
            format_number(self.total_bytes),
        )
    }
}
