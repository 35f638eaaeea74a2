use colored::Colorize;
use memsim_core::{AllocationStrategy, MemError, MemoryManager};

use crate::session::Outcome;

#[derive(Debug, Clone)]
pub struct DisplayConfig {
	pub use_colors: bool,
	pub show_map_after_change: bool,
}

impl Default for DisplayConfig {
	fn default() -> Self {
		Self {
			use_colors: true,
			show_map_after_change: true,
		}
	}
}

pub fn print_welcome(total_memory: usize, strategy: AllocationStrategy) {
	println!(
		"\n{}",
		"╔═══════════════════════════════════════╗".bright_cyan()
	);
	println!(
		"{}",
		"║    Memory Management Simulator        ║"
			.bright_cyan()
			.bold()
	);
	println!(
		"{}",
		"╚═══════════════════════════════════════╝".bright_cyan()
	);
	println!();
	println!(
		"Total memory: {} units, strategy: {}",
		total_memory.to_string().bright_white(),
		strategy.title().bright_white()
	);
	println!(
		"Type {} for commands, {} to exit",
		"help".bright_green(),
		"quit".bright_green()
	);
	println!();
}

pub fn print_goodbye(command_count: usize, live_processes: usize) {
	println!();
	println!("{}", "─".repeat(40).bright_black());
	if live_processes > 0 {
		println!("{} process(es) still held memory", live_processes);
	}
	println!("Exiting simulator after {} command(s). Goodbye!", command_count);
}

pub fn print_error(msg: &str) {
	println!("{} {}", "✗".bright_red().bold(), msg.bright_red());
}

pub fn print_warning(msg: &str) {
	println!("{} {}", "⚠".bright_yellow(), msg.bright_yellow());
}

pub fn print_info(msg: &str) {
	println!("{} {}", "ℹ".bright_blue(), msg.bright_white());
}

pub fn print_success(msg: &str) {
	println!("{} {}", "✓".bright_green().bold(), msg.bright_green());
}

pub fn print_hint(msg: &str) {
	println!("{} {}", "💡".bright_white(), msg.bright_white().dimmed());
}

/// Message line for a finished command, if it has one.
pub fn print_outcome(outcome: &Outcome) {
	match outcome {
		Outcome::Allocated(process) => print_success(&format!("Allocated memory for {}.", process)),
		Outcome::AllocationFailed { pid, size, error } => {
			print_error(&format!(
				"Failed to allocate memory for P{} (size {}): {}",
				pid, size, error
			));
			if let MemError::OutOfMemory { .. } = error {
				print_hint("Free some memory with 'deallocate <pid>' or try 'strategy best_fit'");
			}
		}
		Outcome::PidsExhausted => {
			print_error("Cannot start a new process: all process identifiers are in use.")
		}
		Outcome::Deallocated(pid) => print_success(&format!("Deallocated memory for P{}.", pid)),
		Outcome::DeallocationFailed { pid, error } => match error {
			MemError::UnknownOwner(_) => {
				print_warning(&format!("P{} not found or not currently allocated memory.", pid))
			}
			other => print_error(&format!("Failed to deallocate memory for P{}: {}", pid, other)),
		},
		Outcome::StrategyChanged(strategy) => print_info(&format!(
			"Memory allocation strategy changed to: {}",
			strategy.title()
		)),
		Outcome::ShowMap | Outcome::ShowHelp | Outcome::Exit => {}
	}
}

/// Render the memory map followed by the utilization summary.
pub fn format_memory_map(manager: &MemoryManager, config: &DisplayConfig) -> String {
	let mut out = String::new();
	out.push_str(&heading("--- Memory Map ---", config));
	out.push('\n');

	for block in manager.snapshot() {
		let status = match block.owner {
			Some(pid) => {
				let s = format!("Occupied by P{}", pid);
				if config.use_colors { s.bright_yellow().to_string() } else { s }
			}
			None => {
				if config.use_colors { "FREE".bright_green().to_string() } else { "FREE".to_string() }
			}
		};
		out.push_str(&format!(
			"  Addr: {}-{} | Size: {} | Status: {}\n",
			block.start, block.end, block.size, status
		));
	}

	let util = manager.utilization();
	let free = manager.free_block_info();

	out.push('\n');
	out.push_str(&heading("--- Memory Utilization ---", config));
	out.push('\n');
	out.push_str(&format!("  Total: {} units\n", util.total));
	out.push_str(&format!(
		"  Occupied: {} units ({:.2}%)\n",
		util.occupied, util.occupied_percent
	));
	out.push_str(&format!("  Free: {} units ({:.2}%)\n", util.free, util.free_percent));
	out.push_str(&format!(
		"  Free Blocks: {} (Largest: {}, Smallest: {})\n",
		free.count, free.largest, free.smallest
	));
	out
}

fn heading(text: &str, config: &DisplayConfig) -> String {
	if config.use_colors {
		text.bright_cyan().bold().to_string()
	} else {
		text.to_string()
	}
}

pub fn print_memory_map(manager: &MemoryManager, config: &DisplayConfig) {
	println!("\n{}", format_memory_map(manager, config));
}

#[cfg(test)]
mod tests {
	use super::*;
	use pretty_assertions::assert_eq;

	fn plain() -> DisplayConfig {
		DisplayConfig {
			use_colors: false,
			show_map_after_change: true,
		}
	}

	#[test]
	fn test_format_memory_map() {
		let mut manager = MemoryManager::new(1000).unwrap();
		manager.allocate(1, 100, AllocationStrategy::FirstFit).unwrap();

		let expected = "\
--- Memory Map ---
  Addr: 0-99 | Size: 100 | Status: Occupied by P1
  Addr: 100-999 | Size: 900 | Status: FREE

--- Memory Utilization ---
  Total: 1000 units
  Occupied: 100 units (10.00%)
  Free: 900 units (90.00%)
  Free Blocks: 1 (Largest: 900, Smallest: 900)
";
		assert_eq!(format_memory_map(&manager, &plain()), expected);
	}

	#[test]
	fn test_format_full_memory() {
		let mut manager = MemoryManager::new(300).unwrap();
		manager.allocate(1, 300, AllocationStrategy::BestFit).unwrap();

		let map = format_memory_map(&manager, &plain());
		assert!(map.contains("Free: 0 units (0.00%)"));
		assert!(map.contains("Free Blocks: 0 (Largest: 0, Smallest: 0)"));
	}
}
