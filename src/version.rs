//! Build provenance stamped by `build.rs`.
//!
//! The same record backs `--version` and the `tool` field of an export
//! manifest, so every artifact directory names the build that produced it.

use std::fmt;

use serde::{Deserialize, Serialize};

const UNKNOWN: &str = "unknown";

/// Which tapegraph build produced a result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildInfo {
    pub package_version: String,
    pub commit: String,
    pub build_date: String,
    pub rustc: String,
}

impl BuildInfo {
    /// Metadata of the running binary; fields `build.rs` could not resolve
    /// read `unknown`.
    pub fn current() -> Self {
        BuildInfo {
            package_version: env!("CARGO_PKG_VERSION").to_string(),
            commit: stamped(option_env!("TAPEGRAPH_COMMIT_SHA")),
            build_date: stamped(option_env!("TAPEGRAPH_BUILD_DATE")),
            rustc: stamped(option_env!("TAPEGRAPH_RUSTC_VERSION")),
        }
    }

    pub fn is_release_stamped(&self) -> bool {
        self.commit != UNKNOWN && self.build_date != UNKNOWN
    }
}

fn stamped(value: Option<&str>) -> String {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .unwrap_or(UNKNOWN)
        .to_string()
}

/// `tapegraph 0.1.0 (abc1234 2026-01-01) rustc 1.80.0`
impl fmt::Display for BuildInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "tapegraph {} ({} {}) rustc {}",
            self.package_version, self.commit, self.build_date, self.rustc
        )
    }
}

/// One-line version banner
pub fn version() -> String {
    BuildInfo::current().to_string()
}
