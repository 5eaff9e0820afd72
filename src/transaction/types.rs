use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// A single transfer from an account's history, as supplied by a block explorer.
///
/// Amount fields stay as decimal strings; see [`super::amount`] for checked parsing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub hash: String,
    pub from: String,
    pub to: String,
    pub value: String,
    #[serde(alias = "timeStamp", deserialize_with = "deserialize_timestamp")]
    pub timestamp: i64,
    pub gas_price: String,
    pub gas_used: String,
}

/// Explorer APIs return timestamps as strings; hand-written files use integers.
fn deserialize_timestamp<'de, D>(d: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    struct TimestampVisitor;

    impl<'de> Visitor<'de> for TimestampVisitor {
        type Value = i64;

        fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
            f.write_str("unix timestamp in seconds, as an integer or a decimal string")
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> Result<i64, E> {
            Ok(v)
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> Result<i64, E> {
            i64::try_from(v).map_err(|_| E::custom(format!("timestamp {} out of range", v)))
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<i64, E> {
            v.trim()
                .parse::<i64>()
                .map_err(|_| E::custom(format!("invalid timestamp '{}'", v)))
        }
    }

    d.deserialize_any(TimestampVisitor)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_integer_timestamp() {
        let json = r#"{
            "hash": "0x01", "from": "0xa", "to": "0xb", "value": "1000",
            "timestamp": 1700000000, "gasPrice": "20000000000", "gasUsed": "21000"
        }"#;
        let tx: Transaction = serde_json::from_str(json).unwrap();
        assert_eq!(tx.timestamp, 1_700_000_000);
        assert_eq!(tx.gas_price, "20000000000");
        assert_eq!(tx.gas_used, "21000");
    }

    #[test]
    fn test_deserialize_explorer_record() {
        // Explorer records carry extra fields and a string `timeStamp`.
        let json = r#"{
            "blockNumber": "19000000", "timeStamp": "1700000123", "hash": "0x02",
            "nonce": "7", "from": "0xa", "to": "0xb", "value": "0",
            "gas": "21000", "gasPrice": "15", "isError": "0", "gasUsed": "21000"
        }"#;
        let tx: Transaction = serde_json::from_str(json).unwrap();
        assert_eq!(tx.timestamp, 1_700_000_123);
        assert_eq!(tx.hash, "0x02");
    }

    #[test]
    fn test_reject_bad_timestamp() {
        let json = r#"{
            "hash": "0x03", "from": "0xa", "to": "0xb", "value": "1",
            "timestamp": "yesterday", "gasPrice": "1", "gasUsed": "1"
        }"#;
        assert!(serde_json::from_str::<Transaction>(json).is_err());
    }

    #[test]
    fn test_serialize_camel_case() {
        let tx = Transaction {
            hash: "0x04".to_string(),
            from: "0xa".to_string(),
            to: "0xb".to_string(),
            value: "5".to_string(),
            timestamp: 42,
            gas_price: "1".to_string(),
            gas_used: "2".to_string(),
        };
        let value = serde_json::to_value(&tx).unwrap();
        assert_eq!(value["gasPrice"], "1");
        assert_eq!(value["timestamp"], 42);
    }
}
