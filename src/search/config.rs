//! Decodes the comma-separated `key=value` configuration strings (§6.1) into typed
//! settings for the two engines. The registry-level discriminators `ab` and `mcts`
//! select which engine a string configures.
//!
//! This tokenizer is hand-rolled rather than pulled from a crate: the `ab,key=val,...`
//! shape is specific to this search core and doesn't appear anywhere in the retrieval
//! pack this crate was built against.

use crate::error::SearchError;
use std::collections::HashMap;
use std::time::Duration;

use super::alpha_beta::AlphaBetaSettings;
use super::mcts::MctsSettings;

/// Either engine's decoded settings, selected by the `ab`/`mcts` discriminator key.
pub enum EngineConfig {
    AlphaBeta(AlphaBetaSettings),
    Mcts(MctsSettings),
}

/// Raw `key -> value` pairs from a configuration string, with bare keys (no `=`)
/// normalized to `"true"`.
pub struct RawConfig {
    pairs: HashMap<String, String>,
    consulted: std::cell::RefCell<std::collections::HashSet<String>>,
}

impl RawConfig {
    pub fn parse(s: &str) -> Result<Self, SearchError> {
        let mut pairs = HashMap::new();
        for token in s.split(',') {
            let token = token.trim();
            if token.is_empty() {
                continue;
            }
            match token.split_once('=') {
                Some((k, v)) => {
                    pairs.insert(k.trim().to_string(), v.trim().to_string());
                }
                None => {
                    pairs.insert(token.to_string(), "true".to_string());
                }
            }
        }
        Ok(RawConfig {
            pairs,
            consulted: std::cell::RefCell::new(std::collections::HashSet::new()),
        })
    }

    fn mark(&self, key: &str) {
        self.consulted.borrow_mut().insert(key.to_string());
    }

    pub fn contains(&self, key: &str) -> bool {
        self.mark(key);
        self.pairs.contains_key(key)
    }

    pub fn get_int(&self, key: &str) -> Result<Option<i64>, SearchError> {
        self.mark(key);
        self.pairs
            .get(key)
            .map(|v| {
                v.parse::<i64>().map_err(|_| {
                    SearchError::Config(format!("key `{key}`: `{v}` is not a valid integer"))
                })
            })
            .transpose()
    }

    pub fn get_f32(&self, key: &str) -> Result<Option<f32>, SearchError> {
        self.mark(key);
        self.pairs
            .get(key)
            .map(|v| {
                v.parse::<f32>()
                    .map_err(|_| SearchError::Config(format!("key `{key}`: `{v}` is not a valid float")))
            })
            .transpose()
    }

    pub fn get_bool(&self, key: &str) -> Result<Option<bool>, SearchError> {
        self.mark(key);
        self.pairs
            .get(key)
            .map(|v| match v.to_ascii_lowercase().as_str() {
                "true" | "1" => Ok(true),
                "false" | "0" => Ok(false),
                _ => Err(SearchError::Config(format!(
                    "key `{key}`: `{v}` is not a valid boolean"
                ))),
            })
            .transpose()
    }

    pub fn get_duration(&self, key: &str) -> Result<Option<Duration>, SearchError> {
        self.mark(key);
        self.pairs
            .get(key)
            .map(|v| parse_duration(v).map_err(|e| SearchError::Config(format!("key `{key}`: {e}"))))
            .transpose()
    }

    /// Every key the caller never consulted via one of the `get_*`/`contains` methods.
    /// Discriminator keys (`ab`, `mcts`) should be marked consulted by the caller even
    /// though they carry no typed value, since they select the engine rather than
    /// configuring it.
    pub fn mark_consulted(&self, key: &str) {
        self.mark(key);
    }

    pub fn unknown_keys(&self) -> Vec<String> {
        let consulted = self.consulted.borrow();
        self.pairs
            .keys()
            .filter(|k| !consulted.contains(*k))
            .cloned()
            .collect()
    }
}

/// Parses a human-readable duration with a unit suffix: `ms`, `s`, or `m`.
fn parse_duration(s: &str) -> Result<Duration, String> {
    let s = s.trim();
    let (number, unit) = s
        .find(|c: char| !c.is_ascii_digit() && c != '.')
        .map(|i| s.split_at(i))
        .ok_or_else(|| format!("`{s}` is missing a unit suffix (ms/s/m)"))?;
    let value: f64 = number
        .parse()
        .map_err(|_| format!("`{number}` is not a valid duration magnitude"))?;
    let seconds = match unit {
        "ms" => value / 1000.0,
        "s" => value,
        "m" => value * 60.0,
        other => return Err(format!("unrecognized duration unit `{other}`")),
    };
    Ok(Duration::from_secs_f64(seconds))
}

/// Decodes a configuration string into the selected engine's settings. Unknown keys
/// (anything not consulted by the target engine's settings builder) are a configuration
/// error, per §6.1.
pub fn decode(s: &str) -> Result<EngineConfig, SearchError> {
    let raw = RawConfig::parse(s)?;
    let is_ab = raw.contains("ab");
    let is_mcts = raw.contains("mcts");
    raw.mark_consulted("ab");
    raw.mark_consulted("mcts");

    let config = match (is_ab, is_mcts) {
        (true, false) => EngineConfig::AlphaBeta(AlphaBetaSettings::from_raw(&raw)?),
        (false, true) => EngineConfig::Mcts(MctsSettings::from_raw(&raw)?),
        (true, true) => {
            return Err(SearchError::Config(
                "both `ab` and `mcts` discriminators present; exactly one engine must be selected"
                    .to_string(),
            ))
        }
        (false, false) => {
            return Err(SearchError::Config(
                "no engine discriminator (`ab` or `mcts`) present".to_string(),
            ))
        }
    };

    let unknown = raw.unknown_keys();
    if !unknown.is_empty() {
        return Err(SearchError::Config(format!(
            "unknown configuration key(s): {}",
            unknown.join(", ")
        )));
    }

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_bare_key_as_true() {
        let raw = RawConfig::parse("ab,max_depth=3").unwrap();
        assert_eq!(raw.get_bool("ab").unwrap(), Some(true));
        assert_eq!(raw.get_int("max_depth").unwrap(), Some(3));
    }

    #[test]
    fn duration_suffixes() {
        assert_eq!(parse_duration("200ms").unwrap(), Duration::from_millis(200));
        assert_eq!(parse_duration("2s").unwrap(), Duration::from_secs(2));
        assert_eq!(parse_duration("1m").unwrap(), Duration::from_secs(60));
    }

    #[test]
    fn unknown_key_is_an_error() {
        let err = decode("ab,max_depth=3,bogus=1").unwrap_err();
        assert!(matches!(err, SearchError::Config(_)));
    }

    #[test]
    fn both_discriminators_is_an_error() {
        let err = decode("ab,mcts,max_depth=3").unwrap_err();
        assert!(matches!(err, SearchError::Config(_)));
    }
}
