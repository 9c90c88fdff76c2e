// Copyright 2025 Dotanuki Labs
// SPDX-License-Identifier: MIT

use env_logger::Env;

pub static LOG_FILTER_VARIABLE: &str = "PKGSCAN_LOG";

pub fn setup_troubleshooting() {
    better_panic::install();
    human_panic::setup_panic!();

    // Degraded sources log at warn level, which stays hidden unless asked for
    let log_settings = Env::default().filter_or(LOG_FILTER_VARIABLE, "error");

    env_logger::Builder::from_env(log_settings)
        .format_timestamp(None)
        .format_module_path(false)
        .format_level(false)
        .format_file(false)
        .format_target(false)
        .init();
}
