//! Command-Line Argument Parsing Module
//!
//! Provides the simulator's startup configuration.
//! Uses clap for type-safe argument parsing.

use api_facades::SessionConfig;
use clap::Parser;

/// Memory simulator command-line arguments
#[derive(Parser, Debug)]
#[command(name = "memsim")]
#[command(about = "Memory Management Simulator")]
pub struct SimulatorArgs {
    /// Simulated physical range managed by the allocator backends
    #[arg(long, default_value_t = 1024)]
    pub total_size: usize,

    /// Smallest buddy block size (must be a power of two)
    #[arg(long, default_value_t = 128)]
    pub min_block_size: usize,

    /// Physical memory available to the paging manager
    #[arg(long, default_value_t = 512)]
    pub physical_size: usize,

    /// Page and frame size
    #[arg(long, default_value_t = 256)]
    pub page_size: usize,

    /// Cycles charged per page fault
    #[arg(long, default_value_t = 100)]
    pub fault_penalty: u64,

    /// Cycles charged per probe by the cache stand-in
    #[arg(long, default_value_t = 100)]
    pub miss_cycles: u64,

    /// Start on the buddy backend instead of the contiguous one
    #[arg(long)]
    pub buddy: bool,

    /// Print page-fault and eviction narration
    #[arg(long)]
    pub debug: bool,
}

impl SimulatorArgs {
    /// Validate argument combinations
    pub fn validate(&self) -> Result<(), String> {
        if self.total_size == 0 {
            return Err("--total-size must be positive".to_string());
        }
        if self.page_size == 0 || self.physical_size % self.page_size != 0 {
            return Err(
                "--physical-size must be a positive multiple of --page-size".to_string(),
            );
        }
        if self.buddy {
            if !self.min_block_size.is_power_of_two() {
                return Err("--min-block-size must be a power of two".to_string());
            }
            if self.total_size % self.min_block_size != 0
                || !(self.total_size / self.min_block_size).is_power_of_two()
            {
                return Err(
                    "--total-size must be --min-block-size times a power of two".to_string(),
                );
            }
        }
        Ok(())
    }

    /// Session geometry from the parsed flags
    pub fn to_config(&self) -> SessionConfig {
        SessionConfig {
            total_size: self.total_size,
            min_block_size: self.min_block_size,
            physical_size: self.physical_size,
            page_size: self.page_size,
            fault_penalty: self.fault_penalty,
        }
    }
}
