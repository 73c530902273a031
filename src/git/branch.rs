//! Branch reference parsing and normalization.
//!
//! Branch names arrive in three surface forms: plain local names (`fix/login`),
//! remote-tracking names as printed by `git branch -a` (`remotes/origin/fix/login`),
//! and the short remote-tracking form (`origin/fix/login`). Parsing happens once,
//! here; comparisons and command arguments are derived from the tagged form
//! instead of repeated string surgery at call sites.

/// A branch name in parsed form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BranchRef {
    /// A local branch (`fix/login`).
    Local(String),
    /// A remote-tracking branch (`origin/fix/login`).
    RemoteTracking { remote: String, name: String },
}

impl BranchRef {
    /// Parse a raw branch name as supplied by the caller.
    ///
    /// A leading `remotes/` prefix marks a remote-tracking ref for any remote.
    /// Without it, only the conventional `origin/` prefix is recognized as
    /// remote-tracking; anything else is a local name, slashes included.
    /// `feature/x` stays local even though it contains a slash.
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();

        if let Some(rest) = trimmed.strip_prefix("remotes/") {
            if let Some((remote, name)) = rest.split_once('/') {
                return BranchRef::RemoteTracking {
                    remote: remote.to_string(),
                    name: name.to_string(),
                };
            }
            // "remotes/" with nothing to split is garbage input; treat the
            // remainder as a local name rather than failing
            return BranchRef::Local(rest.to_string());
        }

        if let Some(name) = trimmed.strip_prefix("origin/") {
            return BranchRef::RemoteTracking {
                remote: "origin".to_string(),
                name: name.to_string(),
            };
        }

        BranchRef::Local(trimmed.to_string())
    }

    /// The normalized branch name with any remote prefix stripped.
    ///
    /// Normalization is idempotent: `BranchRef::parse(r.short_name())` yields
    /// a ref with the same short name.
    pub fn short_name(&self) -> &str {
        match self {
            BranchRef::Local(name) => name,
            BranchRef::RemoteTracking { name, .. } => name,
        }
    }

    /// The form used as a revision argument to git commands.
    ///
    /// Local branches pass through unchanged; remote-tracking branches use the
    /// `<remote>/<name>` form, which git resolves against `refs/remotes/`.
    pub fn rev(&self) -> String {
        match self {
            BranchRef::Local(name) => name.clone(),
            BranchRef::RemoteTracking { remote, name } => format!("{}/{}", remote, name),
        }
    }

    /// Whether this is a remote-tracking reference.
    ///
    /// Remote branches cannot be the currently checked-out branch in the sense
    /// the modification scanner cares about.
    pub fn is_remote(&self) -> bool {
        matches!(self, BranchRef::RemoteTracking { .. })
    }

    /// Compare against another raw branch name after normalizing both sides.
    pub fn names_match(&self, other: &str) -> bool {
        self.short_name() == BranchRef::parse(other).short_name()
    }
}

impl std::fmt::Display for BranchRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.rev())
    }
}
