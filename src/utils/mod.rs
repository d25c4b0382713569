// Copyright (c) 2025-2026 the packfs contributors
// SPDX-License-Identifier: Apache-2.0

pub mod error;
pub mod formatting;
pub mod progress;
pub mod summary;
