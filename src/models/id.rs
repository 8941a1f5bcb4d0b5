use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

use serde::de::{self, Deserializer, Visitor};
use serde::{Deserialize, Serialize, Serializer};

/// Server-assigned record identifier.
///
/// The API hands out numeric ids, but string ids decode too. The JSON kind
/// the id arrived as is kept so it serializes back unchanged; equality and
/// ordering only look at the text.
#[derive(Debug, Clone)]
pub struct EntityId {
    text: String,
    numeric: bool,
}

impl EntityId {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            text: id.into(),
            numeric: false,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn is_numeric(&self) -> bool {
        self.numeric
    }
}

impl PartialEq for EntityId {
    fn eq(&self, other: &Self) -> bool {
        self.text == other.text
    }
}

impl Eq for EntityId {}

impl Hash for EntityId {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.text.hash(state);
    }
}

impl PartialOrd for EntityId {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for EntityId {
    fn cmp(&self, other: &Self) -> Ordering {
        self.text.cmp(&other.text)
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

impl From<u64> for EntityId {
    fn from(id: u64) -> Self {
        Self {
            text: id.to_string(),
            numeric: true,
        }
    }
}

impl From<&str> for EntityId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl Serialize for EntityId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if self.numeric {
            if let Ok(n) = self.text.parse::<i64>() {
                return serializer.serialize_i64(n);
            }
            if let Ok(n) = self.text.parse::<u64>() {
                return serializer.serialize_u64(n);
            }
        }
        serializer.serialize_str(&self.text)
    }
}

struct IdVisitor;

impl<'de> Visitor<'de> for IdVisitor {
    type Value = EntityId;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a numeric or string id")
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
        Ok(EntityId {
            text: v.to_string(),
            numeric: true,
        })
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
        Ok(EntityId::from(v))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
        if v.is_empty() {
            return Err(E::custom("empty id"));
        }
        Ok(EntityId::new(v))
    }
}

impl<'de> Deserialize<'de> for EntityId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(IdVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_numbers_and_strings() {
        let n: EntityId = serde_json::from_str("42").unwrap();
        let s: EntityId = serde_json::from_str("\"a1b2\"").unwrap();
        assert_eq!(n.as_str(), "42");
        assert_eq!(s.as_str(), "a1b2");
    }

    #[test]
    fn rejects_empty_and_non_scalar_ids() {
        assert!(serde_json::from_str::<EntityId>("\"\"").is_err());
        assert!(serde_json::from_str::<EntityId>("null").is_err());
        assert!(serde_json::from_str::<EntityId>("[1]").is_err());
    }

    #[test]
    fn ids_serialize_as_the_kind_they_arrived_as() {
        assert_eq!(serde_json::to_string(&EntityId::from(7)).unwrap(), "7");
        assert_eq!(serde_json::to_string(&EntityId::from("x")).unwrap(), "\"x\"");

        let padded: EntityId = serde_json::from_str("\"007\"").unwrap();
        assert!(!padded.is_numeric());
        assert_eq!(serde_json::to_string(&padded).unwrap(), "\"007\"");

        let number: EntityId = serde_json::from_str("-3").unwrap();
        assert_eq!(serde_json::to_string(&number).unwrap(), "-3");
    }

    #[test]
    fn equality_ignores_json_kind() {
        assert_eq!(EntityId::from(12), EntityId::new("12"));
    }
}
