/// The version requirement a version-gating directive hands to a
/// [`CompatibilityPredicate`].
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum VersionRequirement<'a> {
    /// The directive's argument referenced a variable that has no binding
    /// (or is bound to `null`). The predicate decides what that means.
    Absent,

    /// A single version string, as given to `@since` or `@deprecatedSince`.
    Version(&'a str),

    /// A list of version strings, as given to `@sinceMultiple` or
    /// `@deprecatedSinceMultiple`. How a list is matched ("any", "all",
    /// per release line, ...) is up to the predicate.
    Versions(Vec<&'a str>),
}

/// Answers whether the connected server satisfies a
/// [`VersionRequirement`].
///
/// Implementations are expected to be pure: transforming the same document
/// against the same server must always produce the same output.
pub trait CompatibilityPredicate {
    fn is_compatible_with(&self, requirement: &VersionRequirement<'_>) -> bool;
}

impl<F> CompatibilityPredicate for F
where
    F: Fn(&VersionRequirement<'_>) -> bool,
{
    fn is_compatible_with(&self, requirement: &VersionRequirement<'_>) -> bool {
        self(requirement)
    }
}
