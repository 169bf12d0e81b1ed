use crate::ast;
use crate::BindingValue;
use crate::CompatDirective;
use crate::CompatDirectiveKind;
use crate::CompatibilityPredicate;
use crate::QueryCompatError;
use crate::VariableBindings;
use crate::VersionRequirement;

type Result<T> = std::result::Result<T, QueryCompatError>;

/// Whether a node survives directive evaluation.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Verdict {
    Keep,
    Drop,
}

/// A directive argument after variable references have been looked up.
enum Resolved<'v> {
    Literal(&'v ast::Value),
    Bound(&'v BindingValue),
    Unbound,
}

/// Decides whether a field (or fragment) should be kept, based solely on
/// the client-only directives attached to it.
pub struct DirectiveEvaluator<'a, P: ?Sized> {
    bindings: &'a VariableBindings,
    predicate: &'a P,
}
impl<'a, P: CompatibilityPredicate + ?Sized> DirectiveEvaluator<'a, P> {
    pub fn new(bindings: &'a VariableBindings, predicate: &'a P) -> Self {
        Self {
            bindings,
            predicate,
        }
    }

    /// Returns [`Verdict::Drop`] as soon as any recognized directive in
    /// `directives` fails its condition. Directives this crate doesn't own
    /// are ignored.
    pub fn evaluate(&self, directives: &[ast::Directive]) -> Result<Verdict> {
        for directive in directives {
            let classified = CompatDirective::classify(directive);
            if !self.keeps(classified)? {
                log::debug!(
                    "`@{}` rejected a selection for the connected server.",
                    directive.name,
                );
                return Ok(Verdict::Drop);
            }
        }
        Ok(Verdict::Keep)
    }

    fn keeps(&self, directive: CompatDirective<'_>) -> Result<bool> {
        use CompatDirective as D;
        Ok(match directive {
            D::SkipOnClient { condition } => !self.resolve_condition(condition),

            D::Since { version } => match self.resolve_version(version) {
                Some(requirement) => self.predicate.is_compatible_with(&requirement),
                None => true,
            },

            D::DeprecatedSince { version } => match self.resolve_version(version) {
                Some(requirement) => !self.predicate.is_compatible_with(&requirement),
                None => true,
            },

            D::SinceMultiple { versions } => {
                let requirement = self.resolve_versions(
                    CompatDirectiveKind::SinceMultiple,
                    versions,
                )?;
                self.predicate.is_compatible_with(&requirement)
            },

            D::DeprecatedSinceMultiple { versions } => {
                let requirement = self.resolve_versions(
                    CompatDirectiveKind::DeprecatedSinceMultiple,
                    versions,
                )?;
                !self.predicate.is_compatible_with(&requirement)
            },

            D::Malformed(kind) => {
                log::trace!(
                    "Ignoring `@{}` whose first argument is not `{}`.",
                    kind.directive_name(),
                    kind.argument_name(),
                );
                true
            },

            D::Other => true,
        })
    }

    fn resolve<'v>(&self, value: &'v ast::Value) -> Resolved<'v>
    where
        'a: 'v,
    {
        match value {
            ast::Value::Variable(name) => match self.bindings.get(name) {
                Some(bound) if bound.is_null() => {
                    log::trace!("`${name}` is bound to null; treating it as absent.");
                    Resolved::Unbound
                },
                Some(bound) => Resolved::Bound(bound),
                None => {
                    log::trace!("No binding for `${name}`; treating it as absent.");
                    Resolved::Unbound
                },
            },
            literal => Resolved::Literal(literal),
        }
    }

    /// Whether a `@skipOnClient` condition asks for the node to be skipped.
    ///
    /// The check is strict: only a boolean `true`, written literally or
    /// bound to the referenced variable, skips. Truthy non-booleans such as
    /// `"yes"`, `1` or a non-empty list keep the node, as do `false`, `null`
    /// and an unbound variable.
    fn resolve_condition(&self, value: &ast::Value) -> bool {
        match self.resolve(value) {
            Resolved::Literal(ast::Value::Boolean(condition)) => *condition,
            Resolved::Bound(bound) => bound.as_bool().unwrap_or(false),
            Resolved::Literal(_) | Resolved::Unbound => false,
        }
    }

    /// `None` means the argument has a shape no predicate could interpret,
    /// in which case the directive doesn't decide anything.
    fn resolve_version<'v>(&self, value: &'v ast::Value) -> Option<VersionRequirement<'v>>
    where
        'a: 'v,
    {
        match self.resolve(value) {
            Resolved::Literal(ast::Value::String(version)) =>
                Some(VersionRequirement::Version(version.as_str())),
            Resolved::Bound(BindingValue::String(version)) =>
                Some(VersionRequirement::Version(version.as_str())),
            Resolved::Literal(ast::Value::Null)
                | Resolved::Unbound =>
                Some(VersionRequirement::Absent),
            Resolved::Literal(_) | Resolved::Bound(_) => {
                log::trace!("Ignoring a version argument that is not a string: {value:?}");
                None
            },
        }
    }

    fn resolve_versions<'v>(
        &self,
        kind: CompatDirectiveKind,
        value: &'v ast::Value,
    ) -> Result<VersionRequirement<'v>>
    where
        'a: 'v,
    {
        let invalid = |found: String| QueryCompatError::InvalidVersionList {
            directive_name: kind.directive_name(),
            found,
        };

        match self.resolve(value) {
            Resolved::Literal(ast::Value::Null)
                | Resolved::Unbound =>
                Ok(VersionRequirement::Absent),

            Resolved::Literal(ast::Value::List(items)) => {
                let mut versions = Vec::with_capacity(items.len());
                for item in items {
                    match self.resolve(item) {
                        Resolved::Literal(ast::Value::String(version)) =>
                            versions.push(version.as_str()),
                        Resolved::Bound(BindingValue::String(version)) =>
                            versions.push(version.as_str()),
                        _ => return Err(invalid(format!("a list containing `{item:?}`"))),
                    }
                }
                Ok(VersionRequirement::Versions(versions))
            },

            Resolved::Bound(BindingValue::List(items)) => {
                let mut versions = Vec::with_capacity(items.len());
                for item in items {
                    match item.as_str() {
                        Some(version) => versions.push(version),
                        None => return Err(invalid(format!(
                            "a list containing a {} value",
                            item.kind_name(),
                        ))),
                    }
                }
                Ok(VersionRequirement::Versions(versions))
            },

            Resolved::Literal(literal) => Err(invalid(format!("`{literal:?}`"))),

            Resolved::Bound(bound) => Err(invalid(format!("a {} value", bound.kind_name()))),
        }
    }
}
