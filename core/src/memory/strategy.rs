//! Placement policies

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{MemError, MemResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AllocationStrategy {
	/// First free block, in address order, that is large enough
	#[default]
	FirstFit,
	/// Free block leaving the smallest remainder; leftmost wins ties
	BestFit,
}

impl AllocationStrategy {
	pub const ALL: [AllocationStrategy; 2] = [AllocationStrategy::FirstFit, AllocationStrategy::BestFit];

	/// Canonical identifier, as accepted by `strategy <name>`.
	pub fn as_str(&self) -> &'static str {
		match self {
			AllocationStrategy::FirstFit => "first_fit",
			AllocationStrategy::BestFit => "best_fit",
		}
	}

	/// Human-readable title, e.g. `First-Fit`.
	pub fn title(&self) -> &'static str {
		match self {
			AllocationStrategy::FirstFit => "First-Fit",
			AllocationStrategy::BestFit => "Best-Fit",
		}
	}
}

impl fmt::Display for AllocationStrategy {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			AllocationStrategy::FirstFit => write!(f, "first-fit"),
			AllocationStrategy::BestFit => write!(f, "best-fit"),
		}
	}
}

impl FromStr for AllocationStrategy {
	type Err = MemError;

	fn from_str(s: &str) -> MemResult<Self> {
		match s.trim().to_ascii_lowercase().as_str() {
			"first_fit" | "first-fit" | "firstfit" | "first" | "1" => Ok(AllocationStrategy::FirstFit),
			"best_fit" | "best-fit" | "bestfit" | "best" | "2" => Ok(AllocationStrategy::BestFit),
			_ => Err(MemError::UnknownStrategy(s.trim().to_string())),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_parse_strategy_names() {
		assert_eq!("first_fit".parse::<AllocationStrategy>().unwrap(), AllocationStrategy::FirstFit);
		assert_eq!("First-Fit".parse::<AllocationStrategy>().unwrap(), AllocationStrategy::FirstFit);
		assert_eq!("BEST_FIT".parse::<AllocationStrategy>().unwrap(), AllocationStrategy::BestFit);
		assert_eq!("2".parse::<AllocationStrategy>().unwrap(), AllocationStrategy::BestFit);
	}

	#[test]
	fn test_unknown_strategy() {
		let result = "worst_fit".parse::<AllocationStrategy>();
		assert_eq!(result, Err(MemError::UnknownStrategy("worst_fit".to_string())));
	}

	#[test]
	fn test_display_roundtrips_through_parse() {
		for strategy in AllocationStrategy::ALL {
			assert_eq!(strategy.to_string().parse::<AllocationStrategy>().unwrap(), strategy);
			assert_eq!(strategy.as_str().parse::<AllocationStrategy>().unwrap(), strategy);
		}
	}
}
