use crate::ForkSchedule;
use alloy_primitives::B256;

/// A container to pretty-print a fork.
///
/// The fork is formatted as: `{name} @{block} <(checkpoint {hash})>`
/// followed by one line per feature.
#[derive(Debug)]
struct DisplayFork {
    /// The name of the fork (e.g. Homestead)
    name: String,
    /// The activation block
    block: u64,
    /// An optional checkpoint hash
    required_hash: Option<B256>,
    /// Feature ids with their effective blocks
    features: Vec<(String, u64)>,
}

impl core::fmt::Display for DisplayFork {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{:32} @{}", self.name, self.block)?;
        if let Some(hash) = &self.required_hash {
            write!(f, " (checkpoint {hash:#})")?;
        }
        for (id, block) in &self.features {
            write!(f, "\n    {id:28} @{block}")?;
        }
        Ok(())
    }
}

/// A container for pretty-printing a fork schedule.
///
/// An example of the output:
///
/// ```text
/// Forks (block based):
/// - Homestead                        @1150000
///     homestead                    @1150000
/// - ETF                              @1920000 (checkpoint 0x9436…de7f)
/// ```
#[derive(Debug)]
pub struct DisplayForks {
    /// A list of forks
    forks: Vec<DisplayFork>,
}

impl core::fmt::Display for DisplayForks {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        writeln!(f, "Forks (block based):")?;
        for fork in &self.forks {
            writeln!(f, "- {fork}")?;
        }
        Ok(())
    }
}

impl DisplayForks {
    /// Creates a new [`DisplayForks`] from a schedule.
    pub fn new(schedule: &ForkSchedule) -> Self {
        let forks = schedule
            .forks()
            .iter()
            .map(|fork| DisplayFork {
                name: fork.name().to_string(),
                block: fork.block(),
                required_hash: fork.required_hash(),
                features: fork
                    .features()
                    .iter()
                    .map(|feature| {
                        (
                            feature.id().to_string(),
                            feature.effective_block(fork.block()),
                        )
                    })
                    .collect(),
            })
            .collect();

        Self { forks }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{FeatureSpec, ForkSpec};

    #[test]
    fn test_display_forks() {
        let schedule = ForkSchedule::new(&[
            ForkSpec::new("Homestead", 10).with_feature(FeatureSpec::new("homestead")),
            ForkSpec::new("ETF", 20).with_required_hash(B256::repeat_byte(0xab)),
            ForkSpec::new("Diehard", 30).with_feature(FeatureSpec::new("bomb").at_block(50)),
        ])
        .unwrap();

        let output = DisplayForks::new(&schedule).to_string();
        let lines: Vec<_> = output.lines().collect();

        assert_eq!(lines.first(), Some(&"Forks (block based):"));
        assert_eq!(lines.len(), 6);
        assert!(output.contains(&format!("- {:32} @10", "Homestead")));
        assert!(output.contains(&format!("    {:28} @10", "homestead")));
        assert!(output.contains("(checkpoint 0xabab"));
        assert!(output.contains(&format!("    {:28} @50", "bomb")));
    }
}
