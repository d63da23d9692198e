#![forbid(unsafe_code)]

use crate::Error;
use config::{Config, ProcSelector, UserSpec};
use procstat::Introspector;

/// Detection parameters, resolved once from a [`Config`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Settings {
    pub binary_only: bool,
    pub jail: Option<u64>,
    pub uid: Option<u32>,
    pub selectors: Vec<ProcSelector>,
}

impl Settings {
    /// Resolve user names through `facility`. An unknown name is an error.
    pub fn from_config(config: &Config, facility: &dyn Introspector) -> Result<Self, Error> {
        let uid = match &config.filter.user {
            None => None,
            Some(UserSpec::Id(uid)) => Some(*uid),
            Some(UserSpec::Name(name)) => Some(
                facility
                    .user_id(name)?
                    .ok_or_else(|| Error::UnknownUser(name.clone()))?,
            ),
        };

        Ok(Self {
            binary_only: config.detect.binary_only,
            jail: config.filter.jail.map(|jid| jid.0),
            uid,
            selectors: config.filter.procs.clone(),
        })
    }

    /// Pids to look up directly, if the selection consists of pids only.
    pub(crate) fn pid_list(&self) -> Option<Vec<u32>> {
        if self.selectors.is_empty() {
            return None;
        }
        self.selectors.iter().map(ProcSelector::as_pid).collect()
    }
}
