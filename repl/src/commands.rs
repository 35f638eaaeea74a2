use colored::Colorize;
use memsim_core::{AllocationStrategy, OwnerId};

pub const COMMAND_NAMES: [&str; 7] = [
    "allocate",
    "deallocate",
    "strategy",
    "map",
    "help",
    "quit",
    "exit",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Allocate(usize),
    Deallocate(OwnerId),
    Strategy(AllocationStrategy),
    Map,
    Help,
    Quit,
}

/// Why a line could not be turned into a [`Command`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    Usage(&'static str),
    InvalidSize(String),
    InvalidPid(String),
    InvalidStrategy(String),
    Unknown(String),
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParseError::Usage(usage) => write!(f, "Usage: {}", usage),
            ParseError::InvalidSize(s) => {
                write!(f, "Invalid size '{}'. Please enter a positive integer.", s)
            }
            ParseError::InvalidPid(s) => write!(f, "Invalid PID '{}'. Please enter an integer.", s),
            ParseError::InvalidStrategy(s) => write!(
                f,
                "Invalid strategy name '{}'. Choose from: first_fit, best_fit.",
                s
            ),
            ParseError::Unknown(cmd) => {
                write!(f, "Unknown command: {}. Type help for commands.", cmd)
            }
        }
    }
}

impl Command {
    /// Parse one input line. Blank lines and `#` comments yield `Ok(None)`.
    pub fn parse(line: &str) -> Result<Option<Command>, ParseError> {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            return Ok(None);
        }

        let parts: Vec<&str> = line.split_whitespace().collect();
        let command = parts[0].to_lowercase();
        // Commands take at most one argument
        let arg = if parts.len() == 2 { Some(parts[1]) } else { None };

        let parsed = match command.as_str() {
            "allocate" | "alloc" => match arg {
                Some(s) => s
                    .parse::<usize>()
                    .map(Command::Allocate)
                    .map_err(|_| ParseError::InvalidSize(s.to_string()))?,
                _ => return Err(ParseError::Usage("allocate <size>")),
            },
            "deallocate" | "free" => match arg {
                Some(s) => s
                    .trim_start_matches(['P', 'p'])
                    .parse::<OwnerId>()
                    .map(Command::Deallocate)
                    .map_err(|_| ParseError::InvalidPid(s.to_string()))?,
                _ => return Err(ParseError::Usage("deallocate <pid>")),
            },
            "strategy" => match arg {
                Some(s) => s
                    .parse::<AllocationStrategy>()
                    .map(Command::Strategy)
                    .map_err(|_| ParseError::InvalidStrategy(s.to_string()))?,
                _ => return Err(ParseError::Usage("strategy <name> (e.g., strategy best_fit)")),
            },
            "map" => Command::Map,
            "help" | "?" => Command::Help,
            "quit" | "exit" | "q" => Command::Quit,
            other => return Err(ParseError::Unknown(other.to_string())),
        };

        Ok(Some(parsed))
    }
}

pub fn show_help() {
    println!("\n{}", "Commands".bright_cyan().bold());
    println!("{}", "─".repeat(50).bright_black());

    let commands = [
        ("allocate <size>", "Allocate memory for a new process"),
        ("deallocate <pid>", "Free the memory held by a process"),
        ("strategy <name>", "Change allocation strategy (first_fit, best_fit)"),
        ("map", "Display memory map and utilization"),
        ("help", "Show this help message"),
        ("quit", "Exit the simulator"),
    ];

    for (cmd, desc) in commands {
        println!("  {:20} {}", cmd.bright_green(), desc.bright_white());
    }
    println!();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_commands() {
        assert_eq!(Command::parse("allocate 100"), Ok(Some(Command::Allocate(100))));
        assert_eq!(Command::parse("  DEALLOCATE 3 "), Ok(Some(Command::Deallocate(3))));
        assert_eq!(Command::parse("deallocate P4"), Ok(Some(Command::Deallocate(4))));
        assert_eq!(
            Command::parse("strategy best_fit"),
            Ok(Some(Command::Strategy(AllocationStrategy::BestFit)))
        );
        assert_eq!(Command::parse("map"), Ok(Some(Command::Map)));
        assert_eq!(Command::parse("quit"), Ok(Some(Command::Quit)));
    }

    #[test]
    fn test_blank_and_comment_lines() {
        assert_eq!(Command::parse(""), Ok(None));
        assert_eq!(Command::parse("# setup"), Ok(None));
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(
            Command::parse("allocate"),
            Err(ParseError::Usage("allocate <size>"))
        );
        assert_eq!(
            Command::parse("allocate ten"),
            Err(ParseError::InvalidSize("ten".to_string()))
        );
        assert_eq!(
            Command::parse("allocate -5"),
            Err(ParseError::InvalidSize("-5".to_string()))
        );
        assert_eq!(
            Command::parse("strategy worst_fit"),
            Err(ParseError::InvalidStrategy("worst_fit".to_string()))
        );
        assert_eq!(
            Command::parse("compact"),
            Err(ParseError::Unknown("compact".to_string()))
        );
    }
}
