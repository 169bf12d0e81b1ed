use crate::ast;

/// The client-only directives this crate understands. Every directive with
/// one of these names is removed from the document before it is sent to a
/// server.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum CompatDirectiveKind {
    SkipOnClient,
    Since,
    SinceMultiple,
    DeprecatedSince,
    DeprecatedSinceMultiple,
}
impl CompatDirectiveKind {
    pub const ALL: [CompatDirectiveKind; 5] = [
        Self::SkipOnClient,
        Self::Since,
        Self::SinceMultiple,
        Self::DeprecatedSince,
        Self::DeprecatedSinceMultiple,
    ];

    pub fn from_directive_name(name: &str) -> Option<Self> {
        Some(match name {
            "skipOnClient" => Self::SkipOnClient,
            "since" => Self::Since,
            "sinceMultiple" => Self::SinceMultiple,
            "deprecatedSince" => Self::DeprecatedSince,
            "deprecatedSinceMultiple" => Self::DeprecatedSinceMultiple,
            _ => return None,
        })
    }

    pub fn directive_name(&self) -> &'static str {
        match self {
            Self::SkipOnClient => "skipOnClient",
            Self::Since => "since",
            Self::SinceMultiple => "sinceMultiple",
            Self::DeprecatedSince => "deprecatedSince",
            Self::DeprecatedSinceMultiple => "deprecatedSinceMultiple",
        }
    }

    /// Name of the argument that must be passed first to a directive of
    /// this kind for it to be evaluated.
    pub fn argument_name(&self) -> &'static str {
        match self {
            Self::SkipOnClient => "if",
            Self::Since | Self::DeprecatedSince => "version",
            Self::SinceMultiple | Self::DeprecatedSinceMultiple => "versions",
        }
    }
}

/// A directive annotation classified by what it means to the transformer.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum CompatDirective<'a> {
    SkipOnClient { condition: &'a ast::Value },
    Since { version: &'a ast::Value },
    SinceMultiple { versions: &'a ast::Value },
    DeprecatedSince { version: &'a ast::Value },
    DeprecatedSinceMultiple { versions: &'a ast::Value },

    /// A recognized directive whose first argument isn't the one its kind
    /// expects (e.g. `@since` with no `version:`). It never causes a node
    /// to be dropped, but it is still stripped.
    Malformed(CompatDirectiveKind),

    /// Any directive this crate doesn't own, e.g. `@include` or `@required`.
    Other,
}
impl<'a> CompatDirective<'a> {
    pub fn classify(directive: &'a ast::Directive) -> Self {
        let Some(kind) = CompatDirectiveKind::from_directive_name(&directive.name) else {
            return Self::Other;
        };

        let value = match directive.arguments.first() {
            Some((arg_name, value)) if arg_name == kind.argument_name() => value,
            _ => return Self::Malformed(kind),
        };

        match kind {
            CompatDirectiveKind::SkipOnClient => Self::SkipOnClient { condition: value },
            CompatDirectiveKind::Since => Self::Since { version: value },
            CompatDirectiveKind::SinceMultiple => Self::SinceMultiple { versions: value },
            CompatDirectiveKind::DeprecatedSince => Self::DeprecatedSince { version: value },
            CompatDirectiveKind::DeprecatedSinceMultiple => {
                Self::DeprecatedSinceMultiple { versions: value }
            },
        }
    }
}

/// True if `directive` is one of the client-only directives that must never
/// reach a server.
pub fn is_client_only_directive(directive: &ast::Directive) -> bool {
    CompatDirectiveKind::from_directive_name(&directive.name).is_some()
}
