//! Card identifiers accepted by the collection endpoint.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{Error, Result};

/// Most identifiers a single collection request may carry.
pub const MAX_COLLECTION_IDENTIFIERS: usize = 75;

/// One way of naming a card in a `cards/collection` request.
///
/// Serializes to the object shape the API expects, e.g.
/// `{"name": "Opt", "set": "xln"}`.
///
/// # Example
///
/// ```
/// use scryfall_rs::CardIdentifier;
///
/// let ids = [
///     CardIdentifier::name("Ancient Tomb"),
///     CardIdentifier::collector_number("xln", "96"),
///     CardIdentifier::multiverse_id(409574),
/// ];
/// let json = serde_json::to_value(&ids[1]).unwrap();
/// assert_eq!(json, serde_json::json!({"collector_number": "96", "set": "xln"}));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CardIdentifier {
    /// Scryfall id
    Id {
        /// Card UUID
        id: String,
    },
    /// Magic Online id
    MtgoId {
        /// MTGO catalog id
        mtgo_id: u64,
    },
    /// Gatherer multiverse id
    MultiverseId {
        /// Multiverse id
        multiverse_id: u64,
    },
    /// Oracle id, matching any printing
    OracleId {
        /// Oracle UUID
        oracle_id: String,
    },
    /// Illustration id, matching any printing with that art
    IllustrationId {
        /// Illustration UUID
        illustration_id: String,
    },
    /// Exact name within a set
    NameSet {
        /// Card name
        name: String,
        /// Set code
        set: String,
    },
    /// Collector number within a set
    CollectorNumberSet {
        /// Collector number
        collector_number: String,
        /// Set code
        set: String,
    },
    /// Exact card name
    Name {
        /// Card name
        name: String,
    },
}

impl CardIdentifier {
    /// Identifier by Scryfall id.
    pub fn id(id: impl Into<String>) -> Self {
        Self::Id { id: id.into() }
    }

    /// Identifier by exact name.
    pub fn name(name: impl Into<String>) -> Self {
        Self::Name { name: name.into() }
    }

    /// Identifier by name within a set.
    pub fn name_in_set(name: impl Into<String>, set: impl Into<String>) -> Self {
        Self::NameSet {
            name: name.into(),
            set: set.into(),
        }
    }

    /// Identifier by set code and collector number.
    pub fn collector_number(set: impl Into<String>, number: impl Into<String>) -> Self {
        Self::CollectorNumberSet {
            collector_number: number.into(),
            set: set.into(),
        }
    }

    /// Identifier by Magic Online id.
    pub fn mtgo_id(mtgo_id: u64) -> Self {
        Self::MtgoId { mtgo_id }
    }

    /// Identifier by multiverse id.
    pub fn multiverse_id(multiverse_id: u64) -> Self {
        Self::MultiverseId { multiverse_id }
    }

    /// Identifier by oracle id.
    pub fn oracle_id(oracle_id: impl Into<String>) -> Self {
        Self::OracleId {
            oracle_id: oracle_id.into(),
        }
    }

    /// Identifier by illustration id.
    pub fn illustration_id(illustration_id: impl Into<String>) -> Self {
        Self::IllustrationId {
            illustration_id: illustration_id.into(),
        }
    }

    fn validate(&self) -> Result<()> {
        let blank = |field: &str, value: &str| {
            if value.trim().is_empty() {
                Err(Error::InvalidIdentifier(format!("'{field}' must not be empty")))
            } else {
                Ok(())
            }
        };
        match self {
            Self::Id { id } => blank("id", id),
            Self::OracleId { oracle_id } => blank("oracle_id", oracle_id),
            Self::IllustrationId { illustration_id } => blank("illustration_id", illustration_id),
            Self::Name { name } => blank("name", name),
            Self::NameSet { name, set } => {
                blank("name", name)?;
                blank("set", set)
            }
            Self::CollectorNumberSet {
                collector_number,
                set,
            } => {
                blank("collector_number", collector_number)?;
                blank("set", set)
            }
            Self::MtgoId { .. } | Self::MultiverseId { .. } => Ok(()),
        }
    }
}

/// Check the identifier count and build the `{"identifiers": [...]}` body.
pub fn collection_body(identifiers: &[CardIdentifier]) -> Result<Value> {
    if identifiers.is_empty() {
        return Err(Error::TooFewIdentifiers);
    }
    if identifiers.len() > MAX_COLLECTION_IDENTIFIERS {
        return Err(Error::TooManyIdentifiers {
            max: MAX_COLLECTION_IDENTIFIERS,
            given: identifiers.len(),
        });
    }
    for identifier in identifiers {
        identifier.validate()?;
    }
    Ok(serde_json::json!({ "identifiers": identifiers }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_identifier_shapes() {
        assert_eq!(
            serde_json::to_value(CardIdentifier::id("abc")).unwrap(),
            json!({"id": "abc"})
        );
        assert_eq!(
            serde_json::to_value(CardIdentifier::mtgo_id(123)).unwrap(),
            json!({"mtgo_id": 123})
        );
        assert_eq!(
            serde_json::to_value(CardIdentifier::name_in_set("Opt", "xln")).unwrap(),
            json!({"name": "Opt", "set": "xln"})
        );
    }

    #[test]
    fn test_untagged_deserialize_prefers_pairs() {
        let parsed: CardIdentifier =
            serde_json::from_value(json!({"name": "Opt", "set": "xln"})).unwrap();
        assert_eq!(parsed, CardIdentifier::name_in_set("Opt", "xln"));

        let parsed: CardIdentifier = serde_json::from_value(json!({"name": "Opt"})).unwrap();
        assert_eq!(parsed, CardIdentifier::name("Opt"));
    }

    #[test]
    fn test_collection_bounds() {
        assert!(matches!(collection_body(&[]), Err(Error::TooFewIdentifiers)));

        let many = vec![CardIdentifier::multiverse_id(1); 76];
        assert!(matches!(
            collection_body(&many),
            Err(Error::TooManyIdentifiers { max: 75, given: 76 })
        ));

        let max = vec![CardIdentifier::multiverse_id(1); 75];
        let body = collection_body(&max).unwrap();
        assert_eq!(body["identifiers"].as_array().unwrap().len(), 75);
    }

    #[test]
    fn test_blank_values_rejected() {
        let err = collection_body(&[CardIdentifier::name("  ")]).unwrap_err();
        assert!(matches!(err, Error::InvalidIdentifier(_)));
    }
}
