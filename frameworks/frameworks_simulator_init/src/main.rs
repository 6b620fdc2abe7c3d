//! Memory Simulator Binary Entry Point
//!
//! Parses the startup configuration, builds one simulator session and
//! runs the interactive command loop until the operator exits. Each
//! command runs to completion before the next line is read; there is no
//! background work.

use std::io::{self, BufRead, Write};
use std::process;

mod args;
mod commands;

use adapters_cache_hierarchy::FixedCostCache;
use api_facades::SimulatorSession;
use args::SimulatorArgs;
use clap::Parser;
use commands::{execute, parse_command};
use infrastructure_debugging::DebugUtils;

fn main() {
    let args = SimulatorArgs::parse();

    if let Err(e) = args.validate() {
        eprintln!("Error: {}", e);
        process::exit(1);
    }

    if args.debug {
        DebugUtils::enable();
    }

    let mut session = match SimulatorSession::new(
        args.to_config(),
        Box::new(FixedCostCache::new(args.miss_cycles)),
    ) {
        Ok(session) => session,
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    };

    if args.buddy {
        // Geometry already validated; switch the starting backend
        if let Err(e) = session.init_buddy(args.total_size, args.min_block_size) {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    }

    println!("Memory Management Simulator");
    println!("Type 'help' for commands, 'exit' to quit");

    let stdin = io::stdin();
    let mut stdout = io::stdout();
    loop {
        print!("> ");
        if stdout.flush().is_err() {
            break;
        }

        let mut line = String::new();
        match stdin.lock().read_line(&mut line) {
            Ok(0) | Err(_) => break,
            Ok(_) => {}
        }

        match parse_command(&line) {
            Ok(Some(command)) => {
                if !execute(&mut session, command) {
                    break;
                }
            }
            Ok(None) => {}
            Err(e) => println!("{}", e),
        }
    }
}
