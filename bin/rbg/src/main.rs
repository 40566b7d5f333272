//! `rbg`, the command-line client for the `RngBinaryGame` contract.

use std::process::ExitCode;

use clap::Parser;
use rbg::MainCmd;

#[tokio::main]
async fn main() -> ExitCode {
    set_thread_panic_hook();
    match MainCmd::parse().run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

/// Sets thread panic hook, useful for having tests that panic.
fn set_thread_panic_hook() {
    use std::{
        backtrace::Backtrace,
        panic::{set_hook, take_hook},
        process::exit,
    };
    let orig_hook = take_hook();
    set_hook(Box::new(move |panic_info| {
        eprintln!("Custom backtrace: {}", Backtrace::capture());
        orig_hook(panic_info);
        exit(1);
    }));
}
