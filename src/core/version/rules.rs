// ─── Platform Rules ───
// Evaluates the `rules` list attached to manifest libraries.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::core::error::LauncherError;

/// Operating system tags understood by version manifests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HostOs {
    Windows,
    Osx,
    Linux,
}

impl HostOs {
    /// The manifest tag for the platform this binary was built for.
    pub fn current() -> Self {
        if cfg!(target_os = "windows") {
            HostOs::Windows
        } else if cfg!(target_os = "macos") {
            HostOs::Osx
        } else {
            HostOs::Linux
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            HostOs::Windows => "windows",
            HostOs::Osx => "osx",
            HostOs::Linux => "linux",
        }
    }
}

impl fmt::Display for HostOs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HostOs {
    type Err = LauncherError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "windows" => Ok(HostOs::Windows),
            "osx" | "macos" => Ok(HostOs::Osx),
            "linux" => Ok(HostOs::Linux),
            other => Err(LauncherError::Other(format!("Unknown OS tag: {other}"))),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LibraryRule {
    pub action: RuleAction,
    #[serde(default)]
    pub os: Option<OsRule>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum RuleAction {
    Allow,
    Disallow,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OsRule {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub arch: Option<String>,
    #[serde(default)]
    pub version: Option<String>,
}

impl LibraryRule {
    pub fn allow(os: Option<&str>) -> Self {
        Self::with_action(RuleAction::Allow, os)
    }

    pub fn disallow(os: Option<&str>) -> Self {
        Self::with_action(RuleAction::Disallow, os)
    }

    fn with_action(action: RuleAction, os: Option<&str>) -> Self {
        Self {
            action,
            os: os.map(|name| OsRule {
                name: Some(name.to_string()),
                ..OsRule::default()
            }),
        }
    }

    /// A rule without an OS name applies everywhere.
    fn applies_to(&self, host: HostOs) -> bool {
        match self.os.as_ref().and_then(|os| os.name.as_deref()) {
            None => true,
            Some(name) => name == host.as_str(),
        }
    }
}

/// Evaluate a library's rule list for `host`.
///
/// - No rules (absent or empty) → allowed.
/// - Otherwise start disallowed and walk the rules top-to-bottom; every rule
///   that applies to the host overwrites the state with its own action.
/// - Rules for another OS leave the state untouched.
pub fn is_allowed(rules: Option<&[LibraryRule]>, host: HostOs) -> bool {
    let rules = match rules {
        Some(r) if !r.is_empty() => r,
        _ => return true,
    };

    rules.iter().fold(false, |allowed, rule| {
        if rule.applies_to(host) {
            rule.action == RuleAction::Allow
        } else {
            allowed
        }
    })
}
