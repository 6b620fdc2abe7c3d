//! Interactive Command Loop
//!
//! Parses operator commands, drives the session facade and formats all
//! human-readable output. Everything textual lives here; the core
//! surfaces only values and errors.

use api_facades::{PhysicalBackend, SimulatorSession, StatsSnapshot};
use entities_memory_model::FitPolicy;
use usecases_virtual_memory::ProcessId;
use usecases_workload_replay::{ReplayBackend, ReplayMetrics};

/// One parsed operator command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Re-initialize the contiguous backend.
    Init { total: usize },
    /// Re-initialize the buddy backend.
    InitBuddy { total: usize, min_block_size: usize },
    /// Allocate; policy applies to the contiguous backend.
    Alloc {
        policy: Option<FitPolicy>,
        size: usize,
    },
    /// Free a previously allocated address.
    Free { address: usize },
    /// Install a page table for a process.
    VmInit { pid: ProcessId, virtual_size: usize },
    /// Translate a virtual address.
    Access { pid: ProcessId, vaddr: usize },
    /// Dump the backend's allocation state.
    Dump,
    /// Dump the backend's free space.
    FreeLists,
    /// Dump one process's page table.
    PageTable { pid: ProcessId },
    /// Print aggregate statistics.
    Stats,
    /// Replay the workload against every policy.
    Compare,
    /// Discard the recorded workload.
    Clear,
    /// Print the command summary.
    Help,
    /// Leave the loop.
    Exit,
}

/// Parse one input line; `None` for a blank line.
pub fn parse_command(line: &str) -> Result<Option<Command>, String> {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    let (&name, rest) = match tokens.split_first() {
        Some(split) => split,
        None => return Ok(None),
    };

    let command = match (name, rest) {
        ("init", [total]) => Command::Init {
            total: parse_number(total, "total size")?,
        },
        ("initbuddy", [total, min]) => Command::InitBuddy {
            total: parse_number(total, "total size")?,
            min_block_size: parse_number(min, "minimum block size")?,
        },
        ("alloc", [policy, size]) => Command::Alloc {
            policy: Some(parse_policy(policy)?),
            size: parse_number(size, "size")?,
        },
        ("alloc", [size]) => Command::Alloc {
            policy: None,
            size: parse_number(size, "size")?,
        },
        ("free", [address]) => Command::Free {
            address: parse_number(address, "address")?,
        },
        ("vminit", [pid, virtual_size]) => Command::VmInit {
            pid: parse_pid(pid)?,
            virtual_size: parse_number(virtual_size, "virtual size")?,
        },
        ("access", [pid, vaddr]) => Command::Access {
            pid: parse_pid(pid)?,
            vaddr: parse_number(vaddr, "virtual address")?,
        },
        ("dump", []) => Command::Dump,
        ("freelists", []) => Command::FreeLists,
        ("pagetable", [pid]) => Command::PageTable {
            pid: parse_pid(pid)?,
        },
        ("stats", []) => Command::Stats,
        ("compare", []) => Command::Compare,
        ("clear", []) => Command::Clear,
        ("help", []) => Command::Help,
        ("exit", []) | ("quit", []) => Command::Exit,
        _ => return Err(format!("Unknown command: {}", line.trim())),
    };
    Ok(Some(command))
}

/// Run one command against the session; `false` means leave the loop.
pub fn execute(session: &mut SimulatorSession, command: Command) -> bool {
    match command {
        Command::Init { total } => match session.init_contiguous(total) {
            Ok(()) => println!("Memory initialized"),
            Err(e) => println!("{}", e),
        },
        Command::InitBuddy {
            total,
            min_block_size,
        } => match session.init_buddy(total, min_block_size) {
            Ok(()) => println!("Buddy memory initialized"),
            Err(e) => println!("{}", e),
        },
        Command::Alloc { policy, size } => {
            let policy = policy.unwrap_or(FitPolicy::FirstFit);
            match session.allocate(size, policy) {
                Ok(address) => println!("Allocated at address {}", address),
                Err(e) => println!("Allocation failed: {}", e),
            }
        }
        Command::Free { address } => match session.free(address) {
            Ok(()) => println!("Block freed"),
            Err(e) => println!("Free failed: {}", e),
        },
        Command::VmInit { pid, virtual_size } => {
            match session.vm_init_process(pid, virtual_size) {
                Ok(()) => println!(
                    "Process {} initialized with {} pages",
                    pid,
                    virtual_size / session.config().page_size
                ),
                Err(e) => println!("{}", e),
            }
        }
        Command::Access { pid, vaddr } => match session.vm_access(pid, vaddr) {
            Ok(paddr) => println!("Physical address {}", paddr),
            Err(e) => println!("Access failed: {}", e),
        },
        Command::Dump => print!("{}", format_dump(session)),
        Command::FreeLists => print!("{}", format_free_lists(session)),
        Command::PageTable { pid } => match format_page_table(session, pid) {
            Ok(text) => print!("{}", text),
            Err(e) => println!("{}", e),
        },
        Command::Stats => print!("{}", format_stats(&session.stats())),
        Command::Compare => match session.compare() {
            Ok(reports) => print!("{}", format_compare(&reports)),
            Err(e) => println!("{}", e),
        },
        Command::Clear => {
            session.clear_workload();
            println!("Workload cleared");
        }
        Command::Help => print!("{}", help_text()),
        Command::Exit => return false,
    }
    true
}

/// Allocation state of the active backend.
pub fn format_dump(session: &SimulatorSession) -> String {
    let mut out = String::from("----- Memory Dump -----\n");
    match session.backend() {
        PhysicalBackend::Contiguous(space) => {
            for block in space.blocks() {
                let end = block.start + block.size - 1;
                match block.id {
                    Some(id) => {
                        out.push_str(&format!("[{} - {}] ALLOCATED (id {})\n", block.start, end, id));
                    }
                    None => out.push_str(&format!("[{} - {}] FREE\n", block.start, end)),
                }
            }
        }
        PhysicalBackend::Buddy(buddy) => {
            if buddy.allocations().is_empty() {
                out.push_str("(no allocations)\n");
            }
            for (&address, allocation) in buddy.allocations() {
                let granted = buddy.block_size(allocation.order);
                out.push_str(&format!(
                    "[{} - {}] order {} requested {} granted {}\n",
                    address,
                    address + granted - 1,
                    allocation.order,
                    allocation.requested,
                    granted
                ));
            }
        }
    }
    out
}

/// Free space of the active backend.
pub fn format_free_lists(session: &SimulatorSession) -> String {
    let mut out = String::new();
    match session.backend() {
        PhysicalBackend::Contiguous(space) => {
            out.push_str("----- Free Blocks -----\n");
            for block in space.blocks().iter().filter(|b| b.free) {
                out.push_str(&format!(
                    "[{} - {}] size {}\n",
                    block.start,
                    block.start + block.size - 1,
                    block.size
                ));
            }
        }
        PhysicalBackend::Buddy(buddy) => {
            out.push_str("----- Free Lists -----\n");
            for (order, list) in buddy.free_lists().iter().enumerate() {
                let addresses: Vec<String> =
                    list.iter().map(|address| address.to_string()).collect();
                out.push_str(&format!(
                    "order {} (block size {}): {}\n",
                    order,
                    buddy.block_size(order),
                    if addresses.is_empty() {
                        "(empty)".to_string()
                    } else {
                        addresses.join(" ")
                    }
                ));
            }
        }
    }
    out
}

/// One process's page table, original layout.
pub fn format_page_table(
    session: &SimulatorSession,
    pid: ProcessId,
) -> Result<String, String> {
    let table = session
        .paging()
        .page_table(pid)
        .map_err(|e| e.to_string())?;
    let mut out = String::from("Page\tValid\tFrame\n");
    for (page, entry) in table.iter().enumerate() {
        if entry.valid {
            out.push_str(&format!("{}\t1\t{}\n", page, entry.frame));
        } else {
            out.push_str(&format!("{}\t0\t-\n", page));
        }
    }
    Ok(out)
}

/// Aggregate statistics across all subsystems.
pub fn format_stats(stats: &StatsSnapshot) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "Internal Fragmentation: {}\n",
        stats.internal_fragmentation
    ));
    out.push_str(&format!(
        "External Fragmentation: {}\n",
        stats.external_fragmentation
    ));
    out.push_str(&format!("Memory Utilization: {:.2}%\n", stats.utilization));
    out.push_str(&format!(
        "Allocations: {} ({} succeeded, {} failed)\n",
        stats.allocation.requests, stats.allocation.successes, stats.allocation.failures
    ));
    out.push_str(&format!("Page Hits: {}\n", stats.page_hits));
    out.push_str(&format!("Page Faults: {}\n", stats.page_faults));
    out.push_str(&format!("Fault Penalty Cycles: {}\n", stats.penalty_cycles));
    out.push_str(&format!("Cache Cycles: {}\n", stats.cache_cycles));
    out.push_str(&format!("Total Frames: {}\n", stats.total_frames));
    out.push_str(&format!("Recorded Events: {}\n", stats.recorded_events));
    out
}

/// Per-policy comparison report.
pub fn format_compare(reports: &[ReplayMetrics]) -> String {
    let mut out = String::from("----- Policy Comparison -----\n");
    for report in reports {
        out.push_str(&format!(
            "{}: success {}/{} ({:.1}%), external fragmentation {}, utilization {:.2}%\n",
            backend_label(report.backend),
            report.successful,
            report.attempted,
            100.0 * report.success_rate,
            report.external_fragmentation,
            report.utilization
        ));
    }
    out
}

fn backend_label(backend: ReplayBackend) -> &'static str {
    match backend {
        ReplayBackend::FirstFit => "first fit",
        ReplayBackend::BestFit => "best fit",
        ReplayBackend::WorstFit => "worst fit",
        ReplayBackend::Buddy => "buddy",
    }
}

fn help_text() -> String {
    let mut out = String::new();
    out.push_str("init <total>              re-initialize the contiguous backend\n");
    out.push_str("initbuddy <total> <min>   re-initialize the buddy backend\n");
    out.push_str("alloc <ff|bf|wf> <size>   allocate with a fit policy\n");
    out.push_str("alloc <size>              allocate (buddy, or first fit)\n");
    out.push_str("free <address>            free an allocated address\n");
    out.push_str("vminit <pid> <vsize>      install a page table\n");
    out.push_str("access <pid> <vaddr>      translate a virtual address\n");
    out.push_str("dump                      show allocations\n");
    out.push_str("freelists                 show free space\n");
    out.push_str("pagetable <pid>           show a page table\n");
    out.push_str("stats                     show aggregate statistics\n");
    out.push_str("compare                   replay the workload per policy\n");
    out.push_str("clear                     clear the recorded workload\n");
    out.push_str("exit                      quit\n");
    out
}

fn parse_number(token: &str, what: &str) -> Result<usize, String> {
    token
        .parse()
        .map_err(|_| format!("{} must be a non-negative integer, got '{}'", what, token))
}

fn parse_pid(token: &str) -> Result<ProcessId, String> {
    token
        .parse()
        .map_err(|_| format!("process id must be a non-negative integer, got '{}'", token))
}

fn parse_policy(token: &str) -> Result<FitPolicy, String> {
    match token {
        "ff" => Ok(FitPolicy::FirstFit),
        "bf" => Ok(FitPolicy::BestFit),
        "wf" => Ok(FitPolicy::WorstFit),
        other => Err(format!(
            "unknown allocator '{}' (expected ff, bf or wf)",
            other
        )),
    }
}
