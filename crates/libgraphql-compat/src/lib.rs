//! Rewrites client-authored GraphQL documents so they only ask a server for
//! what it supports.
//!
//! A client that talks to many server versions can annotate a single
//! document with client-only directives:
//!
//! | Directive | Field is kept when |
//! |---|---|
//! | `@skipOnClient(if: X)` | `X` is not `true` |
//! | `@since(version: V)` | the server is compatible with `V` |
//! | `@sinceMultiple(versions: X)` | the server is compatible with the list `X` |
//! | `@deprecatedSince(version: V)` | the server is *not* compatible with `V` |
//! | `@deprecatedSinceMultiple(versions: X)` | the server is *not* compatible with the list `X` |
//!
//! [`QueryCompatTransformer`] removes the fields these directives reject,
//! removes anything left with an empty selection set, strips the directives
//! themselves, drops variable declarations that are no longer referenced,
//! and prints the result. What "compatible" means is entirely up to the
//! caller's [`CompatibilityPredicate`].

pub mod ast;
mod compat_directive;
mod compat_rewriter;
mod compatibility_predicate;
mod directive_evaluator;
pub mod file_reader;
pub mod printer;
mod query_compat_error;
mod query_compat_transformer;
pub mod rewriter;
mod variable_bindings;
pub mod variable_usage;

pub use compat_directive::CompatDirective;
pub use compat_directive::CompatDirectiveKind;
pub use compat_directive::is_client_only_directive;
pub use compat_rewriter::CompatRewriter;
pub use compatibility_predicate::CompatibilityPredicate;
pub use compatibility_predicate::VersionRequirement;
pub use directive_evaluator::DirectiveEvaluator;
pub use directive_evaluator::Verdict;
pub use query_compat_error::QueryCompatError;
pub use query_compat_transformer::QueryCompatTransformer;
pub use query_compat_transformer::make_query_compatible;
pub use variable_bindings::BindingValue;
pub use variable_bindings::VariableBindings;

#[cfg(test)]
mod tests;
