// Copyright 2025 Dotanuki Labs
// SPDX-License-Identifier: MIT

pub mod aggregator;
pub mod errors;
pub mod interfaces;
pub mod maintainers;
pub mod models;
pub mod releases;
pub mod sourcehost;
pub mod sources;
pub mod versions;
