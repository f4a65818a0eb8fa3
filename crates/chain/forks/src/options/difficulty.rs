use std::{collections::BTreeMap, fmt, str::FromStr};

use serde::Deserialize;
use serde_json::{Value, json};
use serde_with::{MapPreventDuplicates, serde_as};
use strum::{Display, EnumString, IntoStaticStr};

use crate::OptionDecodeError;

/// Selector names accepted in the `difficulty` option.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, IntoStaticStr)]
#[strum(serialize_all = "lowercase")]
enum Selector {
    Frontier,
    Homestead,
    Diehard,
    Explosion,
}

/// The rule computing the difficulty target of the next block.
///
/// Decoded from the `difficulty` option, `{"name": <selector>, "options": {..}}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DifficultyAlgorithm {
    /// Original Frontier adjustment.
    #[default]
    Frontier,
    /// EIP-2 adjustment.
    Homestead,
    /// ECIP-1010: Homestead adjustment with the difficulty bomb paused.
    Diehard,
    /// ECIP-1010 bomb resumed, offset by `delay` blocks.
    Explosion {
        /// Number of blocks the bomb was paused for.
        delay: u64,
    },
}

#[serde_as]
#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct Encoded {
    name: String,
    #[serde_as(as = "MapPreventDuplicates<_, _>")]
    #[serde(default)]
    options: BTreeMap<String, Value>,
}

impl DifficultyAlgorithm {
    /// Decodes an encoded `difficulty` payload.
    pub fn decode(encoded: &str) -> Result<Self, OptionDecodeError> {
        let Encoded { name, mut options } = serde_json::from_str(encoded)?;
        let selector =
            Selector::from_str(&name).map_err(|_| OptionDecodeError::UnknownAlgorithm(name))?;

        let algorithm = match selector {
            Selector::Frontier => Self::Frontier,
            Selector::Homestead => Self::Homestead,
            Selector::Diehard => Self::Diehard,
            Selector::Explosion => {
                let delay = options
                    .remove("delay")
                    .ok_or(OptionDecodeError::MissingParameter {
                        algorithm: selector.into(),
                        parameter: "delay",
                    })?
                    .as_u64()
                    .ok_or(OptionDecodeError::InvalidParameter { parameter: "delay" })?;
                Self::Explosion { delay }
            }
        };

        if let Some(parameter) = options.into_keys().next() {
            return Err(OptionDecodeError::UnexpectedParameter {
                algorithm: selector.into(),
                parameter,
            });
        }

        Ok(algorithm)
    }

    /// Encodes the algorithm in its `difficulty` wire form.
    pub fn encode(&self) -> String {
        let options = match self {
            Self::Explosion { delay } => json!({ "delay": delay }),
            _ => json!({}),
        };
        json!({ "name": self.name(), "options": options }).to_string()
    }

    /// The selector name of this algorithm.
    pub fn name(&self) -> &'static str {
        self.selector().into()
    }

    /// Bomb delay in blocks, if this algorithm applies one.
    pub const fn delay(&self) -> Option<u64> {
        match self {
            Self::Explosion { delay } => Some(*delay),
            _ => None,
        }
    }

    const fn selector(&self) -> Selector {
        match self {
            Self::Frontier => Selector::Frontier,
            Self::Homestead => Selector::Homestead,
            Self::Diehard => Selector::Diehard,
            Self::Explosion { .. } => Selector::Explosion,
        }
    }
}

impl fmt::Display for DifficultyAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Explosion { delay } => write!(f, "{} (delay {delay})", self.name()),
            _ => f.write_str(self.name()),
        }
    }
}
