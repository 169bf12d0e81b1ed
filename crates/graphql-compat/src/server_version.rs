use libgraphql_compat::CompatibilityPredicate;
use libgraphql_compat::VersionRequirement;
use std::cmp::Ordering;
use std::str::FromStr;

/// A dotted server version such as `24.03.1`.
///
/// Versions compare numerically, component by component, with missing
/// trailing components treated as `0` (so `24.03` == `24.03.0`). Anything
/// after the leading digits of a component is ignored (`9rc1` reads as `9`).
#[derive(Clone, Debug)]
pub(crate) struct ServerVersion {
    components: Vec<u64>,
    raw: String,
}
impl ServerVersion {
    /// The `(major, minor)` pair that names this version's release line.
    fn release_line(&self) -> (u64, u64) {
        (self.component(0), self.component(1))
    }

    fn component(&self, idx: usize) -> u64 {
        self.components.get(idx).copied().unwrap_or(0)
    }

    fn parse_requirement(version: &str) -> Option<ServerVersion> {
        match version.parse() {
            Ok(version) => Some(version),
            Err(err) => {
                log::warn!("Treating `{version}` as incompatible: {err}");
                None
            },
        }
    }

    /// Backport semantics: each entry names the first release on its
    /// release line that has the feature. On a listed line the server must
    /// be at least that entry; otherwise it must be newer than every entry.
    fn satisfies_any_of(&self, versions: &[&str]) -> bool {
        let versions: Vec<ServerVersion> =
            versions.iter()
                .filter_map(|version| Self::parse_requirement(version))
                .collect();

        if let Some(same_line) =
            versions.iter().find(|version| version.release_line() == self.release_line()) {
            return self >= same_line;
        }

        match versions.iter().max() {
            Some(newest) => self > newest,
            None => false,
        }
    }
}
impl CompatibilityPredicate for ServerVersion {
    fn is_compatible_with(&self, requirement: &VersionRequirement<'_>) -> bool {
        match requirement {
            VersionRequirement::Absent => {
                log::warn!(
                    "No version requirement was bound; treating it as incompatible with \
                    server version `{}`.",
                    self.raw,
                );
                false
            },

            VersionRequirement::Version(version) =>
                Self::parse_requirement(version).is_some_and(|version| *self >= version),

            VersionRequirement::Versions(versions) => self.satisfies_any_of(versions),
        }
    }
}
impl FromStr for ServerVersion {
    type Err = anyhow::Error;

    fn from_str(raw: &str) -> anyhow::Result<Self> {
        let trimmed = raw.trim();
        let trimmed = trimmed.strip_prefix(['v', 'V']).unwrap_or(trimmed);
        if trimmed.is_empty() {
            anyhow::bail!("`{raw}` is not a version");
        }

        let mut components = vec![];
        for part in trimmed.split('.') {
            let digits_end =
                part.find(|c: char| !c.is_ascii_digit())
                    .unwrap_or(part.len());
            if digits_end == 0 {
                anyhow::bail!("`{raw}` is not a dotted numeric version");
            }
            components.push(part[..digits_end].parse::<u64>()?);
        }

        Ok(Self {
            components,
            raw: raw.to_string(),
        })
    }
}
impl std::fmt::Display for ServerVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.raw)
    }
}
impl Ord for ServerVersion {
    fn cmp(&self, other: &Self) -> Ordering {
        let len = self.components.len().max(other.components.len());
        (0..len)
            .map(|idx| self.component(idx).cmp(&other.component(idx)))
            .find(|ordering| ordering.is_ne())
            .unwrap_or(Ordering::Equal)
    }
}
impl PartialOrd for ServerVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
impl PartialEq for ServerVersion {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}
impl Eq for ServerVersion {}
