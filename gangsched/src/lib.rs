/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! gangsched – gang-aware admission control and memory-based node scoring
//!
//! Module layout:
//!
//! ```text
//! lib.rs
//! ├── config/         – scoring mode + scheduler args (YAML)
//! ├── pod             – schedulable unit and its group labels
//! ├── inventory/      – node inventory / pod group index traits,
//! │                     YAML-backed cluster snapshot
//! ├── scheduler/      – pre-filter gate, node scorer, score normalizer
//! └── cycle           – cancellation context and timeout-bounded runner
//! ```

pub mod config;
pub mod cycle;
pub mod inventory;
pub mod pod;
pub mod scheduler;
