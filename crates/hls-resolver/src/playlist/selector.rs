// Variant selection: an operator prompt or a headless policy.

use std::io::{self, BufRead, BufReader, Stderr, Stdin, Write};
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::debug;

use crate::ResolveError;
use crate::playlist::model::Variant;

/// Picks one variant out of an index playlist.
pub trait VariantSelector: Send + Sync {
    /// Returns the zero-based position of the chosen variant.
    fn select(&self, variants: &[Variant]) -> Result<usize, ResolveError>;
}

impl<T: VariantSelector + ?Sized> VariantSelector for Arc<T> {
    fn select(&self, variants: &[Variant]) -> Result<usize, ResolveError> {
        (**self).select(variants)
    }
}

/// Parse a 1-based option number for a list of `count` options.
///
/// Returns the zero-based position.
pub fn parse_selection(input: &str, count: usize) -> Result<usize, ResolveError> {
    let input = input.trim();
    match input.parse::<usize>() {
        Ok(n) if (1..=count).contains(&n) => Ok(n - 1),
        _ => Err(ResolveError::InvalidSelection {
            input: input.to_string(),
        }),
    }
}

/// Lists the variants on `output` and reads one option number from `input`.
pub struct ConsoleSelector<R, W> {
    io: Mutex<(R, W)>,
}

impl<R: BufRead, W: Write> ConsoleSelector<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self {
            io: Mutex::new((input, output)),
        }
    }

    pub fn into_inner(self) -> (R, W) {
        self.io.into_inner()
    }
}

impl ConsoleSelector<BufReader<Stdin>, Stderr> {
    /// Reads the choice from stdin and prompts on stderr, leaving stdout to
    /// the caller's results.
    pub fn stdio() -> Self {
        Self::new(BufReader::new(io::stdin()), io::stderr())
    }
}

impl<R, W> VariantSelector for ConsoleSelector<R, W>
where
    R: BufRead + Send,
    W: Write + Send,
{
    fn select(&self, variants: &[Variant]) -> Result<usize, ResolveError> {
        let mut guard = self.io.lock();
        let (input, output) = &mut *guard;

        writeln!(output, "Choose an option resolution:")?;
        for (idx, variant) in variants.iter().enumerate() {
            if let Some(label) = variant.resolution.as_deref().filter(|l| !l.is_empty()) {
                writeln!(output, "{}. {label}", idx + 1)?;
            }
        }
        write!(output, "Enter option number: ")?;
        output.flush()?;

        let mut line = String::new();
        input.read_line(&mut line)?;

        let choice = parse_selection(&line, variants.len())?;
        debug!("Operator selected option {}", choice + 1);
        Ok(choice)
    }
}

/// Non-interactive selection rules.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum VariantSelectionPolicy {
    #[default]
    HighestBandwidth,
    LowestBandwidth,
    ClosestToBandwidth(u64),
    /// Largest pixel count; variants without a resolution rank last
    HighestResolution,
    MatchingResolution {
        width: u64,
        height: u64,
    },
    /// 1-based option number, validated like console input
    Position(usize),
}

#[derive(Debug, Clone, Default)]
pub struct PolicySelector {
    policy: VariantSelectionPolicy,
}

impl PolicySelector {
    pub fn new(policy: VariantSelectionPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &VariantSelectionPolicy {
        &self.policy
    }
}

impl VariantSelector for PolicySelector {
    fn select(&self, variants: &[Variant]) -> Result<usize, ResolveError> {
        let indexed = variants.iter().enumerate();
        let choice = match &self.policy {
            VariantSelectionPolicy::HighestBandwidth => {
                indexed.max_by_key(|(_, v)| v.bandwidth).map(|(i, _)| i)
            }
            VariantSelectionPolicy::LowestBandwidth => {
                indexed.min_by_key(|(_, v)| v.bandwidth).map(|(i, _)| i)
            }
            VariantSelectionPolicy::ClosestToBandwidth(target) => indexed
                .min_by_key(|(_, v)| v.bandwidth.abs_diff(*target))
                .map(|(i, _)| i),
            VariantSelectionPolicy::HighestResolution => indexed
                .max_by_key(|(_, v)| (v.pixels().unwrap_or(0), v.bandwidth))
                .map(|(i, _)| i),
            VariantSelectionPolicy::MatchingResolution { width, height } => indexed
                .filter(|(_, v)| v.dimensions() == Some((*width, *height)))
                .max_by_key(|(_, v)| v.bandwidth)
                .map(|(i, _)| i),
            VariantSelectionPolicy::Position(n) => {
                return parse_selection(&n.to_string(), variants.len());
            }
        };

        let choice = choice.ok_or_else(|| ResolveError::InvalidSelection {
            input: format!("{:?}", self.policy),
        })?;
        debug!(
            "Policy {:?} selected variant {} ({})",
            self.policy,
            choice + 1,
            variants[choice].uri
        );
        Ok(choice)
    }
}
