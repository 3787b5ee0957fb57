//! Hooky CLI application entry point
//!
//! This is the minimal main entry point that delegates to the library.

use clap::Parser;
use hooky_engine::RunMode;
use std::path::PathBuf;

fn main() {
    // Configure miette for beautiful error reporting
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(false)
                .unicode(true)
                .context_lines(2)
                .tab_width(4)
                .build(),
        )
    }))
    .ok();

    // Installed as `<hooks>/<hook>.d/hooky`: act as that hook's driver
    let mut args = std::env::args_os();
    let invocation = args.next().map(PathBuf::from).unwrap_or_default();
    let result = match RunMode::resolve(&invocation) {
        RunMode::Hook(signature) => {
            let hook_args = args.map(|a| a.to_string_lossy().into_owned()).collect();
            hooky::run_as_hook(signature, hook_args)
        }
        RunMode::Standalone => hooky::run(hooky::Cli::parse()),
    };

    match result {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            let miette_error = miette::Report::msg(format!("{e:#}"));
            eprintln!("{miette_error:?}");
            if e.is_usage() {
                eprintln!("See `hooky --help` and `hooky status`.");
            }
            std::process::exit(1);
        }
    }
}
