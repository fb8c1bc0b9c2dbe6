use std::{fmt, time::Duration};

use alloy::primitives::Address;
use serde::{Deserialize, Deserializer, Serializer, de};
use url::Url;

/// Custom deserializer for Duration from milliseconds
pub fn deserialize_duration_from_ms<'de, D>(deserializer: D) -> Result<Duration, D::Error>
where
    D: Deserializer<'de>,
{
    let ms = u64::deserialize(deserializer)?;
    Ok(Duration::from_millis(ms))
}

/// Custom deserializer for Duration from seconds
pub fn deserialize_duration_from_seconds<'de, D>(deserializer: D) -> Result<Duration, D::Error>
where
    D: Deserializer<'de>,
{
    let secs = u64::deserialize(deserializer)?;
    Ok(Duration::from_secs(secs))
}

/// Custom serializer for Duration to milliseconds
pub fn serialize_duration_to_ms<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_u64(duration.as_millis() as u64)
}

/// Custom serializer for Duration to seconds
pub fn serialize_duration_to_seconds<S>(
    duration: &Duration,
    serializer: S,
) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_u64(duration.as_secs())
}

/// Custom deserializer for a list of RPC URLs.
///
/// Accepts either a YAML/JSON sequence or a single comma-separated string,
/// which is what an environment variable override produces.
pub fn deserialize_urls<'de, D>(deserializer: D) -> Result<Vec<Url>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum UrlList {
        Many(Vec<String>),
        One(String),
    }

    let raw = match UrlList::deserialize(deserializer)? {
        UrlList::Many(urls) => urls,
        UrlList::One(joined) => joined.split(',').map(|s| s.trim().to_string()).collect(),
    };
    raw.into_iter()
        .filter(|s| !s.is_empty())
        .map(|url_str| Url::parse(&url_str).map_err(de::Error::custom))
        .collect()
}

/// Custom deserializer for an optional contract address.
///
/// An empty string is treated as "not configured" so that deployments can
/// blank out an address through the environment.
pub fn deserialize_optional_address<'de, D>(deserializer: D) -> Result<Option<Address>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(s) => s.parse::<Address>().map(Some).map_err(de::Error::custom),
    }
}

/// A configuration value that must never appear in logs or debug output
/// (API keys, signing keys).
#[derive(Clone, Deserialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct SecretString(String);

impl SecretString {
    /// Wraps a raw secret.
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Returns the raw secret. Callers must not log the returned value.
    pub fn expose(&self) -> &str {
        &self.0
    }

    /// Whether the secret holds anything besides whitespace.
    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Debug for SecretString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SecretString(<redacted>)")
    }
}

#[cfg(test)]
mod tests {
    use alloy::primitives::address;
    use serde::Serialize;

    use super::*;

    #[derive(Debug, Deserialize, Serialize, PartialEq)]
    struct PollSettings {
        #[serde(
            deserialize_with = "deserialize_duration_from_ms",
            serialize_with = "serialize_duration_to_ms"
        )]
        interval: Duration,
        #[serde(
            deserialize_with = "deserialize_duration_from_seconds",
            serialize_with = "serialize_duration_to_seconds"
        )]
        timeout: Duration,
    }

    #[derive(Debug, Deserialize)]
    struct Endpoints {
        #[serde(deserialize_with = "deserialize_urls")]
        rpc_urls: Vec<Url>,
    }

    #[derive(Debug, Deserialize)]
    struct Contract {
        #[serde(default, deserialize_with = "deserialize_optional_address")]
        address: Option<Address>,
    }

    #[test]
    fn test_durations_use_their_declared_units() {
        let parsed: PollSettings =
            serde_json::from_str(r#"{"interval": 5000, "timeout": 10}"#).unwrap();
        assert_eq!(parsed.interval, Duration::from_millis(5000));
        assert_eq!(parsed.timeout, Duration::from_secs(10));

        let serialized = serde_json::to_string(&parsed).unwrap();
        assert_eq!(serialized, r#"{"interval":5000,"timeout":10}"#);
    }

    #[test]
    fn test_deserialize_urls_from_sequence_and_comma_list() {
        let seq: Endpoints =
            serde_json::from_str(r#"{"rpc_urls": ["http://127.0.0.1:8545", "http://backup:8545"]}"#)
                .unwrap();
        assert_eq!(seq.rpc_urls.len(), 2);

        let joined: Endpoints =
            serde_json::from_str(r#"{"rpc_urls": "http://127.0.0.1:8546, http://backup:8546"}"#)
                .unwrap();
        assert_eq!(joined.rpc_urls.len(), 2);
        assert_eq!(joined.rpc_urls[1].as_str(), "http://backup:8546/");
    }

    #[test]
    fn test_deserialize_invalid_url() {
        let result: Result<Endpoints, _> = serde_json::from_str(r#"{"rpc_urls": ["not a url"]}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_optional_address_blank_is_absent() {
        let blank: Contract = serde_json::from_str(r#"{"address": ""}"#).unwrap();
        assert!(blank.address.is_none());

        let missing: Contract = serde_json::from_str("{}").unwrap();
        assert!(missing.address.is_none());

        let set: Contract =
            serde_json::from_str(r#"{"address": "0x5FbDB2315678afecb367f032d93F642f64180aa3"}"#)
                .unwrap();
        assert_eq!(set.address, Some(address!("5FbDB2315678afecb367f032d93F642f64180aa3")));
    }

    #[test]
    fn test_optional_address_rejects_garbage() {
        let result: Result<Contract, _> = serde_json::from_str(r#"{"address": "0xnothex"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_secret_string_is_redacted_in_debug() {
        let secret = SecretString::new("gsk_live_value");
        assert_eq!(format!("{secret:?}"), "SecretString(<redacted>)");
        assert_eq!(secret.expose(), "gsk_live_value");
        assert!(SecretString::new("   ").is_blank());
    }
}
