use std::process;
use clap::Parser;

#[macro_use]
extern crate log;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

/// Log the full error chain and exit with a non-zero status.
fn bail(e: &anyhow::Error) -> ! {
    error!("{e:?}");
    process::exit(1)
}

fn main() {
    let cli = parser::Cli::parse();

    // Warnings are on by default. '--quiet' leaves errors only.
    let verbosity = if cli.quiet {0} else {cli.verbose.saturating_add(1)};
    if let Err(e) = logger::Logger::init(verbosity) {
        eprintln!("{e}");
        process::exit(1);
    }

    // Keep a replayable copy of the arguments of every cross.
    if let Err(e) = cli.serialize() {
        bail(&e);
    }

    if let Err(e) = mendel_rs::run(cli) {
        bail(&e);
    }
}
