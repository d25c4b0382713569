// Copyright (c) 2025-2026 the packfs contributors
// SPDX-License-Identifier: Apache-2.0

use console::Term;
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};

/// Creates the per-input progress bar.
///
/// Progress is drawn on stderr because stdout may be carrying the artifact.
/// When stderr is not a terminal, or `visible` is false, the bar is hidden and
/// every update is a no-op.
#[must_use]
pub fn create_progress_bar(len: u64, visible: bool) -> ProgressBar {
    if !visible || !Term::stderr().is_term() {
        return ProgressBar::hidden();
    }

    let pb = ProgressBar::with_draw_target(Some(len), ProgressDrawTarget::stderr());
    let style = ProgressStyle::default_bar()
        .template("{spinner:.green} [{elapsed_precise}] [{wide_bar:.cyan/blue}] {pos}/{len} {msg}")
        .unwrap_or_else(|e| {
            tracing::warn!("Failed to parse progress bar template: {e}");
            ProgressStyle::default_bar()
        })
        .progress_chars("#>-");
    pb.set_style(style);
    pb
}
