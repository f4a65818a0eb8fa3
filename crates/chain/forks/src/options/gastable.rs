use std::{collections::BTreeMap, str::FromStr, sync::LazyLock};

use serde::Deserialize;
use serde_with::{MapPreventDuplicates, serde_as};
use strum::{Display, EnumIter, EnumString, IntoStaticStr};

use crate::OptionDecodeError;

/// An execution operation whose gas cost is set per fork.
///
/// The string forms are the keys of the encoded `gastable` option and must not
/// change: historical schedules are written against them.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Display,
    EnumString,
    EnumIter,
    IntoStaticStr,
)]
pub enum GasOperation {
    /// `EXTCODESIZE`
    #[strum(serialize = "extcodesize")]
    ExtCodeSize,
    /// `EXTCODECOPY`
    #[strum(serialize = "extcodecopy")]
    ExtCodeCopy,
    /// `BALANCE`
    #[strum(serialize = "balance")]
    Balance,
    /// `SLOAD`
    #[strum(serialize = "sload")]
    SLoad,
    /// The `CALL` family.
    #[strum(serialize = "calls")]
    Calls,
    /// `SUICIDE` / `SELFDESTRUCT`
    #[strum(serialize = "suicide")]
    Suicide,
    /// Per-byte cost of the `EXP` exponent.
    #[strum(serialize = "expbyte")]
    ExpByte,
    /// Account creation triggered by `SUICIDE`.
    #[strum(serialize = "createBySuicide")]
    CreateBySuicide,
}

static FRONTIER: LazyLock<GasTable> = LazyLock::new(|| {
    GasTable::from_costs([
        (GasOperation::ExtCodeSize, 20),
        (GasOperation::ExtCodeCopy, 20),
        (GasOperation::Balance, 20),
        (GasOperation::SLoad, 50),
        (GasOperation::Calls, 40),
        (GasOperation::Suicide, 0),
        (GasOperation::ExpByte, 10),
    ])
});

/// Encoded `gastable` payload. Naming an operation twice is an error.
#[serde_as]
#[derive(Deserialize)]
#[serde(transparent)]
struct Encoded(#[serde_as(as = "MapPreventDuplicates<_, _>")] BTreeMap<String, u64>);

/// Gas costs of the repriceable operations.
///
/// Decoded from the `gastable` option, a JSON object mapping operation name to
/// an unsigned integer cost, e.g. `{"sload": 50, "calls": 40}`. A table only
/// holds the operations it was declared with.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct GasTable {
    costs: BTreeMap<GasOperation, u64>,
}

impl GasTable {
    /// Creates a table from `(operation, cost)` pairs.
    pub fn from_costs(costs: impl IntoIterator<Item = (GasOperation, u64)>) -> Self {
        Self {
            costs: costs.into_iter().collect(),
        }
    }

    /// The pre-Homestead table, in effect until a fork declares another one.
    pub fn frontier() -> &'static Self {
        &FRONTIER
    }

    /// Decodes an encoded `gastable` payload.
    pub fn decode(encoded: &str) -> Result<Self, OptionDecodeError> {
        let Encoded(raw) = serde_json::from_str(encoded)?;
        let costs = raw
            .into_iter()
            .map(|(name, cost)| {
                GasOperation::from_str(&name)
                    .map(|op| (op, cost))
                    .map_err(|_| OptionDecodeError::UnknownOperation(name))
            })
            .collect::<Result<_, _>>()?;
        Ok(Self { costs })
    }

    /// Encodes the table in its `gastable` wire form.
    pub fn encode(&self) -> String {
        let raw: serde_json::Map<String, serde_json::Value> = self
            .costs
            .iter()
            .map(|(op, cost)| (op.to_string(), (*cost).into()))
            .collect();
        serde_json::Value::Object(raw).to_string()
    }

    /// Returns the cost of `op`, if this table declares it.
    pub fn cost(&self, op: GasOperation) -> Option<u64> {
        self.costs.get(&op).copied()
    }

    /// Iterates over declared operations in a stable order.
    pub fn iter(&self) -> impl Iterator<Item = (GasOperation, u64)> + '_ {
        self.costs.iter().map(|(op, cost)| (*op, *cost))
    }

    /// Number of declared operations.
    pub fn len(&self) -> usize {
        self.costs.len()
    }

    /// Returns true if the table declares no operation.
    pub fn is_empty(&self) -> bool {
        self.costs.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use strum::IntoEnumIterator;

    const HOMESTEAD: &str = r#"{
        "extcodesize":     20,
        "extcodecopy":     20,
        "balance":         20,
        "sload":           50,
        "calls":           40,
        "suicide":         0,
        "expbyte":         10
    }"#;

    #[test]
    fn test_decode_homestead_table() {
        let table = GasTable::decode(HOMESTEAD).unwrap();
        assert_eq!(table.len(), 7);
        assert_eq!(table.cost(GasOperation::SLoad), Some(50));
        assert_eq!(table.cost(GasOperation::Calls), Some(40));
        assert_eq!(table.cost(GasOperation::CreateBySuicide), None);
    }

    #[test]
    fn test_decode_rejects_unknown_operation() {
        assert_matches!(
            GasTable::decode(r#"{"sstore": 5000}"#),
            Err(OptionDecodeError::UnknownOperation(name)) if name == "sstore"
        );
    }

    #[test]
    fn test_decode_rejects_non_integer_costs() {
        assert_matches!(
            GasTable::decode(r#"{"sload": -1}"#),
            Err(OptionDecodeError::Json(_))
        );
        assert_matches!(
            GasTable::decode(r#"{"sload": "200"}"#),
            Err(OptionDecodeError::Json(_))
        );
        assert_matches!(GasTable::decode("[50]"), Err(OptionDecodeError::Json(_)));
    }

    #[test]
    fn test_encode_uses_wire_names() {
        let table = GasTable::from_costs([
            (GasOperation::SLoad, 200),
            (GasOperation::CreateBySuicide, 25000),
        ]);
        let encoded = table.encode();
        assert!(encoded.contains(r#""sload":200"#));
        assert!(encoded.contains(r#""createBySuicide":25000"#));
        assert_eq!(GasTable::decode(&encoded).unwrap(), table);
    }

    #[test]
    fn test_decode_rejects_duplicate_operation() {
        assert_matches!(
            GasTable::decode(r#"{"sload": 50, "sload": 200}"#),
            Err(OptionDecodeError::Json(err)) if err.to_string().contains("duplicate")
        );
    }

    #[test]
    fn test_frontier_matches_homestead_costs() {
        let frontier = GasTable::frontier();
        assert_eq!(frontier, &GasTable::decode(HOMESTEAD).unwrap());
        for op in GasOperation::iter().filter(|op| *op != GasOperation::CreateBySuicide) {
            assert!(frontier.cost(op).is_some(), "{op} missing from frontier table");
        }
        assert_eq!(frontier.cost(GasOperation::CreateBySuicide), None);
        assert_eq!(frontier.cost(GasOperation::SLoad), Some(50));
    }
}
