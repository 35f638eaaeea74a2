//! Interactive shell for the memory allocation simulator

mod commands;
mod completer;
mod config;
mod display;
mod history;
mod process;
mod prompt;
mod session;

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, bail};
use clap::Parser;
use memsim_core::AllocationStrategy;
use rustyline::error::ReadlineError;
use rustyline::history::DefaultHistory;
use rustyline::{CompletionType, Config, EditMode, Editor};
use tracing::{debug, error};
use tracing_subscriber::{EnvFilter, fmt};

use commands::Command;
use config::SimulatorConfig;
use display::DisplayConfig;
use session::{Outcome, Session};

/// Used when no size is configured and there is nobody to ask.
const DEFAULT_TOTAL_MEMORY: usize = 1000;

#[derive(Debug, Parser)]
#[command(name = "memsim", version, about = "Main memory allocation simulator")]
struct Args {
	/// Total memory size in units
	#[arg(short, long)]
	memory: Option<usize>,

	/// Initial allocation strategy (first_fit, best_fit)
	#[arg(short, long)]
	strategy: Option<AllocationStrategy>,

	/// Path to a TOML config file [default: $MEMSIM_CONFIG or memsim.toml]
	#[arg(short, long)]
	config: Option<PathBuf>,

	/// Run commands from a file instead of the interactive shell
	#[arg(short = 'f', long, conflicts_with = "execute")]
	script: Option<PathBuf>,

	/// Run the given command(s) and exit
	#[arg(short, long)]
	execute: Vec<String>,

	/// Stop at the first failing command in batch mode
	#[arg(long)]
	exit_on_error: bool,

	/// Only print memory maps requested with `map`
	#[arg(short, long)]
	quiet: bool,

	#[arg(long)]
	no_color: bool,

	#[arg(long)]
	no_history: bool,

	/// Log filter used when RUST_LOG is not set
	#[arg(long, default_value = "warn")]
	log_level: String,
}

#[derive(Debug, Clone)]
enum InputSource {
	Interactive,
	File(PathBuf),
	CommandLine(Vec<String>),
}

struct Repl {
	session: Session,
	display_config: DisplayConfig,
	quiet: bool,
	exit_on_error: bool,
	command_count: usize,
}

impl Repl {
	/// Execute one line. Returns `Ok(false)` when the shell should exit.
	fn handle_line(&mut self, line: &str) -> anyhow::Result<bool> {
		let command = match Command::parse(line) {
			Ok(Some(command)) => command,
			Ok(None) => return Ok(true),
			Err(e) => {
				display::print_error(&e.to_string());
				if self.exit_on_error {
					bail!("{}", e);
				}
				return Ok(true);
			}
		};

		self.command_count += 1;
		let outcome = self.session.execute(command);

		if !self.quiet {
			display::print_outcome(&outcome);
		}

		match &outcome {
			Outcome::Exit => return Ok(false),
			Outcome::ShowHelp => commands::show_help(),
			Outcome::ShowMap => {
				display::print_memory_map(self.session.manager(), &self.display_config)
			}
			o if o.mutated() && !self.quiet && self.display_config.show_map_after_change => {
				display::print_memory_map(self.session.manager(), &self.display_config)
			}
			Outcome::PidsExhausted => {
				if self.exit_on_error {
					bail!("process identifiers exhausted");
				}
			}
			Outcome::AllocationFailed { error, .. } | Outcome::DeallocationFailed { error, .. } => {
				if !error.is_user_error() {
					error!(%error, "Block list invariant violated");
					bail!("internal error: {}", error);
				}
				if self.exit_on_error {
					bail!("{}", error);
				}
			}
			_ => {}
		}

		Ok(true)
	}

	fn run_interactive(
		&mut self,
		editor: &mut Editor<completer::CommandCompleter, DefaultHistory>,
	) -> anyhow::Result<()> {
		if !self.quiet {
			display::print_welcome(
				self.session.manager().total_memory_size(),
				self.session.strategy(),
			);
		}

		loop {
			let prompt_str = prompt::generate_prompt(self.session.strategy(), &self.display_config);

			match editor.readline(&prompt_str) {
				Ok(line) => {
					if !line.trim().is_empty() {
						editor.add_history_entry(&line)?;
					}
					if !self.handle_line(&line)? {
						break;
					}
				}
				Err(ReadlineError::Interrupted) => {
					display::print_hint("Use quit or Ctrl+D to exit");
				}
				Err(ReadlineError::Eof) => {
					println!();
					break;
				}
				Err(err) => {
					display::print_error(&format!("Readline error: {:?}", err));
					break;
				}
			}
		}

		display::print_goodbye(self.command_count, self.session.processes().count());
		Ok(())
	}

	fn run_batch<'a>(&mut self, lines: impl IntoIterator<Item = &'a str>) -> anyhow::Result<()> {
		for (line_num, line) in lines.into_iter().enumerate() {
			debug!(line = line_num + 1, command = line, "Executing");
			let keep_going = self
				.handle_line(line)
				.with_context(|| format!("line {}: {}", line_num + 1, line.trim()))?;
			if !keep_going {
				break;
			}
		}
		Ok(())
	}
}

fn build_editor() -> anyhow::Result<Editor<completer::CommandCompleter, DefaultHistory>> {
	let config = Config::builder()
		.history_ignore_space(true)
		.completion_type(CompletionType::List)
		.edit_mode(EditMode::Emacs)
		.build();

	let mut editor = Editor::with_config(config)?;
	editor.set_helper(Some(completer::CommandCompleter::new()));
	Ok(editor)
}

/// A configured size the shell can start with without asking; zero means ask.
fn usable_total_memory(configured: Option<usize>) -> Option<usize> {
	configured.filter(|&size| size > 0)
}

/// Ask for the memory size until a positive integer is entered.
fn prompt_total_memory(
	editor: &mut Editor<completer::CommandCompleter, DefaultHistory>,
) -> anyhow::Result<usize> {
	loop {
		let line = editor.readline("Enter total memory size (e.g., 1000 units): ")?;
		match line.trim().parse::<usize>() {
			Ok(size) if size > 0 => return Ok(size),
			Ok(_) => display::print_error("Memory size must be a positive integer. Please try again."),
			Err(_) => display::print_error("Invalid input. Please enter an integer for memory size."),
		}
	}
}

/// Ask for the initial strategy until a valid choice is entered.
fn prompt_strategy(
	editor: &mut Editor<completer::CommandCompleter, DefaultHistory>,
) -> anyhow::Result<AllocationStrategy> {
	loop {
		println!("\nSelect initial allocation strategy:");
		println!("  1. First-Fit");
		println!("  2. Best-Fit");
		let line = editor.readline("Enter choice (1 or 2): ")?;
		match line.trim().parse::<AllocationStrategy>() {
			Ok(strategy) => return Ok(strategy),
			Err(_) => display::print_error("Invalid choice. Please enter 1 or 2."),
		}
	}
}

fn main() -> anyhow::Result<()> {
	let args = Args::parse();

	fmt()
		.with_env_filter(
			EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level)),
		)
		.with_writer(std::io::stderr)
		.init();

	let mut cfg = SimulatorConfig::load(args.config.as_deref()).context("failed to load config")?;
	if let Some(memory) = args.memory {
		cfg.total_memory = Some(memory);
	}
	if let Some(strategy) = args.strategy {
		cfg.strategy = strategy;
	}
	if args.no_color {
		cfg.use_colors = false;
	}
	colored::control::set_override(cfg.use_colors);
	debug!(?cfg, "Configuration resolved");

	let source = if let Some(path) = &args.script {
		InputSource::File(path.clone())
	} else if !args.execute.is_empty() {
		InputSource::CommandLine(args.execute.clone())
	} else {
		InputSource::Interactive
	};

	let display_config = DisplayConfig {
		use_colors: cfg.use_colors,
		..DisplayConfig::default()
	};

	match source {
		InputSource::Interactive => {
			let mut editor = build_editor()?;
			let total_memory = match usable_total_memory(cfg.total_memory) {
				Some(size) => size,
				None => {
					if cfg.total_memory.is_some() {
						display::print_error("Configured memory size must be a positive integer.");
					}
					let size = prompt_total_memory(&mut editor)?;
					if args.strategy.is_none() {
						cfg.strategy = prompt_strategy(&mut editor)?;
					}
					size
				}
			};

			let history = history::HistoryManager::new(&cfg.history_file.to_string_lossy());
			if !args.no_history {
				history.load(&mut editor)?;
			}

			let mut repl = Repl {
				session: Session::new(total_memory, cfg.strategy)?,
				display_config,
				quiet: args.quiet,
				exit_on_error: false,
				command_count: 0,
			};
			repl.run_interactive(&mut editor)?;

			if !args.no_history {
				history.save(&mut editor)?;
			}
		}
		InputSource::File(path) => {
			let content = fs::read_to_string(&path)
				.with_context(|| format!("failed to read script {}", path.display()))?;
			let mut repl = Repl {
				session: Session::new(cfg.total_memory.unwrap_or(DEFAULT_TOTAL_MEMORY), cfg.strategy)?,
				display_config,
				quiet: args.quiet,
				exit_on_error: args.exit_on_error,
				command_count: 0,
			};
			repl.run_batch(content.lines())?;
		}
		InputSource::CommandLine(commands) => {
			let mut repl = Repl {
				session: Session::new(cfg.total_memory.unwrap_or(DEFAULT_TOTAL_MEMORY), cfg.strategy)?,
				display_config,
				quiet: args.quiet,
				exit_on_error: args.exit_on_error,
				command_count: 0,
			};
			repl.run_batch(commands.iter().map(String::as_str))?;
		}
	}

	Ok(())
}

#[cfg(test)]
mod tests {
	use super::*;

	fn batch_repl(total: usize) -> Repl {
		Repl {
			session: Session::new(total, AllocationStrategy::FirstFit).unwrap(),
			display_config: DisplayConfig {
				use_colors: false,
				show_map_after_change: false,
			},
			quiet: true,
			exit_on_error: true,
			command_count: 0,
		}
	}

	#[test]
	fn test_args_parse() {
		let args = Args::try_parse_from(["memsim", "-m", "500", "-s", "best_fit", "-e", "map"]).unwrap();
		assert_eq!(args.memory, Some(500));
		assert_eq!(args.strategy, Some(AllocationStrategy::BestFit));
		assert_eq!(args.execute, vec!["map".to_string()]);
	}

	#[test]
	fn test_zero_configured_memory_falls_back_to_prompt() {
		assert_eq!(usable_total_memory(Some(0)), None);
		assert_eq!(usable_total_memory(None), None);
		assert_eq!(usable_total_memory(Some(256)), Some(256));
	}

	#[test]
	fn test_args_config_is_optional() {
		let args = Args::try_parse_from(["memsim"]).unwrap();
		assert_eq!(args.config, None);

		let args = Args::try_parse_from(["memsim", "--config", "custom.toml"]).unwrap();
		assert_eq!(args.config, Some(PathBuf::from("custom.toml")));
	}

	#[test]
	fn test_args_reject_unknown_strategy() {
		assert!(Args::try_parse_from(["memsim", "--strategy", "worst_fit"]).is_err());
	}

	#[test]
	fn test_batch_script() {
		let mut repl = batch_repl(500);
		let script = "# two processes\nallocate 200\nallocate 100\ndeallocate 1\ndeallocate 2\nquit\nallocate 1";
		repl.run_batch(script.lines()).unwrap();

		assert_eq!(repl.command_count, 5);
		assert_eq!(repl.session.manager().blocks().len(), 1);
		assert_eq!(repl.session.manager().free_block_info().largest, 500);
	}

	#[test]
	fn test_batch_stops_on_error() {
		let mut repl = batch_repl(300);
		let result = repl.run_batch(["allocate 310", "allocate 10"]);

		assert!(result.is_err());
		assert_eq!(repl.session.manager().utilization().occupied, 0);
	}

	#[test]
	fn test_batch_continues_without_exit_on_error() {
		let mut repl = batch_repl(300);
		repl.exit_on_error = false;
		repl.run_batch(["bogus", "allocate 310", "allocate 10"]).unwrap();

		assert_eq!(repl.session.manager().utilization().occupied, 10);
	}
}
