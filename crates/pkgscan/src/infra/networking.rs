// Copyright 2025 Dotanuki Labs
// SPDX-License-Identifier: MIT

pub mod github;
pub mod http;
pub mod pypi;
pub mod pypistats;
