use crate::error::{Error, Result};
use crate::group::{Group, Strategy};
use std::env;

const REMOTES_VAR: &str = "SIGNER_REMOTES";
const STRATEGY_VAR: &str = "SIGNER_STRATEGY";

/// Remote signer group configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupConfig {
    pub remotes: Vec<String>,
    pub strategy: Strategy,
}

impl GroupConfig {
    /// Parse a configuration from raw values.
    ///
    /// `remotes` is a comma-separated address list; entries are trimmed
    /// and empty entries dropped. `strategy` is a strategy name,
    /// defaulting to `ordered_list` when absent.
    ///
    /// An empty remote list is rejected here: a group with zero
    /// endpoints is legal when constructed explicitly, but as deployed
    /// configuration it is always a mistake.
    pub fn from_parts(remotes: &str, strategy: Option<&str>) -> Result<Self> {
        let remotes: Vec<String> = remotes
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(String::from)
            .collect();
        if remotes.is_empty() {
            return Err(Error::Config(format!(
                "{REMOTES_VAR} must list at least one remote address"
            )));
        }

        let strategy = match strategy {
            Some(name) => name.parse()?,
            None => Strategy::OrderedList,
        };

        Ok(Self { remotes, strategy })
    }

    /// Read configuration from the environment.
    ///
    /// `SIGNER_REMOTES` is required; `SIGNER_STRATEGY` is optional and
    /// defaults to `ordered_list`.
    pub fn from_env() -> Result<Self> {
        let remotes = env::var(REMOTES_VAR).map_err(|_| {
            Error::Config(format!(
                "{REMOTES_VAR} must be set (comma-separated remote addresses)"
            ))
        })?;
        let strategy = env::var(STRATEGY_VAR).ok();
        Self::from_parts(&remotes, strategy.as_deref())
    }

    /// Build the dispatch group for this configuration.
    pub fn build(&self) -> Result<Group> {
        Group::new(&self.remotes, self.strategy)
    }
}
