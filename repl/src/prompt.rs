use super::display::DisplayConfig;
use colored::Colorize;
use memsim_core::AllocationStrategy;

pub fn generate_prompt(strategy: AllocationStrategy, config: &DisplayConfig) -> String {
    let base = format!("[{}]", strategy);

    if config.use_colors {
        format!("{} {} ", base.bright_cyan().bold(), ">".bright_black())
    } else {
        format!("{} > ", base)
    }
}
