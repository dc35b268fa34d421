//! Alternation Policy: the subject → cadence mapping driving the Constraint
//! Model Builder's C3 (subject cadence) and C4 (teacher alternation)
//! constraints, and the analyzer's matching per-group checks.

#[cfg(test)]
mod tests;

use std::collections::BTreeMap;
use std::io::Read;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("alternation rule for '{0}' has invalid frequency {1}, expected one of 1, 2, 4, 8")]
    InvalidFrequency(String, u32),
    #[error("malformed rules JSON: {0}")]
    Json(String),
    #[error("I/O error: {0}")]
    Io(String),
}

pub type Result<T> = std::result::Result<T, Error>;

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Json(e.to_string())
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error::Io(e.to_string())
    }
}

pub const VALID_FREQUENCIES: [u32; 4] = [1, 2, 4, 8];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rule {
    pub active: bool,
    pub frequency: u32,
}

impl Rule {
    pub fn new(active: bool, frequency: u32) -> Result<Self> {
        if !VALID_FREQUENCIES.contains(&frequency) {
            return Err(Error::InvalidFrequency(String::new(), frequency));
        }
        Ok(Rule { active, frequency })
    }
}

/// The subject → cadence mapping. Built from the default table unless a
/// custom set of rules is supplied, in which case it replaces the defaults
/// wholesale rather than merging with them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlternationPolicy {
    rules: BTreeMap<String, Rule>,
}

impl Default for AlternationPolicy {
    fn default() -> Self {
        let rules = [
            ("Mathematics", 2),
            ("Physics", 2),
            ("English", 2),
            ("Chemistry", 4),
            ("EngineeringSci", 4),
            ("French", 8),
        ]
        .into_iter()
        .map(|(subject, frequency)| (subject.to_string(), Rule { active: true, frequency }))
        .collect();

        AlternationPolicy { rules }
    }
}

impl AlternationPolicy {
    pub fn from_rules<T: IntoIterator<Item = (String, Rule)>>(rules: T) -> Result<Self> {
        let mut map = BTreeMap::new();
        for (subject, rule) in rules {
            if !VALID_FREQUENCIES.contains(&rule.frequency) {
                return Err(Error::InvalidFrequency(subject, rule.frequency));
            }
            map.insert(subject, rule);
        }
        Ok(AlternationPolicy { rules: map })
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let raw: BTreeMap<String, Rule> = serde_json::from_reader(reader)?;
        Self::from_rules(raw)
    }

    /// The active rule for `subject`, or `None` if the subject is absent or
    /// explicitly marked inactive — either way it contributes no cadence
    /// constraint.
    pub fn rule_for(&self, subject: &str) -> Option<&Rule> {
        self.rules.get(subject).filter(|rule| rule.active)
    }

    pub fn active_rules(&self) -> impl Iterator<Item = (&str, &Rule)> {
        self.rules
            .iter()
            .filter(|(_, rule)| rule.active)
            .map(|(subject, rule)| (subject.as_str(), rule))
    }
}
