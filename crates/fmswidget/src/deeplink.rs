//! Deep-link targets emitted by widget taps.
//!
//! Each tile carries one link for the whole tile. The application's router
//! maps the link to a screen; this crate only guarantees the URI is well formed.

use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// URI scheme registered by the application.
pub const SCHEME: &str = "fms";

/// In-app screens reachable from a widget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeepLink {
    /// Job overview screen (`fms://job`).
    Job,
    /// Fleet map screen (`fms://map`).
    Map,
}

impl DeepLink {
    /// Every link a widget can emit.
    pub const ALL: [Self; 2] = [Self::Job, Self::Map];

    /// The URI scheme.
    #[must_use]
    pub fn scheme(self) -> &'static str {
        SCHEME
    }

    /// The URI path (the host component, in URI terms).
    #[must_use]
    pub fn path(self) -> &'static str {
        match self {
            Self::Job => "job",
            Self::Map => "map",
        }
    }

    /// The full URI, e.g. `fms://job`.
    #[must_use]
    pub fn uri(self) -> String {
        format!("{}://{}", self.scheme(), self.path())
    }
}

impl fmt::Display for DeepLink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}://{}", self.scheme(), self.path())
    }
}

fn uri_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^(?P<scheme>[A-Za-z][A-Za-z0-9+.\-]*)://(?P<path>[A-Za-z0-9_\-]+)/?$")
            .expect("Invalid deep-link pattern")
    })
}

impl FromStr for DeepLink {
    type Err = Error;

    /// Parse a widget URI. Scheme and path compare case-insensitively; query
    /// strings and fragments are not part of the contract and are rejected.
    fn from_str(uri: &str) -> Result<Self> {
        let captures = uri_pattern()
            .captures(uri.trim())
            .ok_or_else(|| Error::deep_link(uri))?;

        if !captures["scheme"].eq_ignore_ascii_case(SCHEME) {
            return Err(Error::deep_link(uri));
        }

        let path = &captures["path"];
        Self::ALL
            .into_iter()
            .find(|link| link.path().eq_ignore_ascii_case(path))
            .ok_or_else(|| Error::deep_link(uri))
    }
}
