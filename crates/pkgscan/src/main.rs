// Copyright 2025 Dotanuki Labs
// SPDX-License-Identifier: MIT

mod core;
mod infra;
mod ioc;
mod pkgscan;

use crate::infra::cli;
use tikv_jemallocator::Jemalloc;

#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    cli::troubleshooting::setup_troubleshooting();
    let request = cli::parsing::parse_arguments()?;

    let pkgscan = ioc::create_pkgscan(&request);
    pkgscan.execute(&request.package, request.verbose).await?;

    Ok(())
}
