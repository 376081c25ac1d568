use hls_resolver::VariantSelectionPolicy;

use crate::error::AppError;

/// How the CLI picks a variant from a master playlist.
#[derive(Debug, Clone, PartialEq)]
pub enum Selection {
    Interactive,
    Policy(VariantSelectionPolicy),
}

/// Parse the `--select` argument.
pub fn parse_selection_arg(arg: &str) -> Result<Selection, AppError> {
    let arg = arg.trim();
    let policy = match arg.to_ascii_lowercase().as_str() {
        "interactive" | "ask" => return Ok(Selection::Interactive),
        "highest" | "best" => VariantSelectionPolicy::HighestBandwidth,
        "lowest" | "worst" => VariantSelectionPolicy::LowestBandwidth,
        "best-resolution" => VariantSelectionPolicy::HighestResolution,
        other => {
            if let Ok(position) = other.parse::<usize>() {
                VariantSelectionPolicy::Position(position)
            } else if let Some((width, height)) = other.split_once('x') {
                match (width.parse(), height.parse()) {
                    (Ok(width), Ok(height)) => {
                        VariantSelectionPolicy::MatchingResolution { width, height }
                    }
                    _ => return Err(invalid(arg)),
                }
            } else {
                return Err(invalid(arg));
            }
        }
    };
    Ok(Selection::Policy(policy))
}

fn invalid(arg: &str) -> AppError {
    AppError::InvalidInput(format!("Invalid --select value: '{arg}'"))
}
