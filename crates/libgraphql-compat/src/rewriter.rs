//! A generic, non-mutating rewrite over GraphQL selection sets.
//!
//! Each node kind gets an `enter_*` hook, called before its children are
//! rewritten, and (where it has children) a `leave_*` hook, called with the
//! already-rewritten node. Any hook can delete its node. The input tree is
//! only ever read; a fresh tree is built on the way back up.

use crate::ast;

/// Result of a `leave_*` hook.
#[derive(Clone, Debug, PartialEq)]
pub enum Transformed<T> {
    Keep(T),
    Delete,
}
impl<T> Transformed<T> {
    pub fn into_option(self) -> Option<T> {
        match self {
            Self::Keep(node) => Some(node),
            Self::Delete => None,
        }
    }
}

/// Result of an `enter_*` hook.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Visit {
    /// Rewrite the node's directives and children, then call its `leave_*`
    /// hook.
    Descend,

    /// Remove the node and its whole subtree without visiting it.
    Delete,
}

pub trait Rewriter {
    type Error;

    fn enter_field(&mut self, _field: &ast::Field) -> Result<Visit, Self::Error> {
        Ok(Visit::Descend)
    }

    fn leave_field(
        &mut self,
        _source: &ast::Field,
        rewritten: ast::Field,
    ) -> Result<Transformed<ast::Field>, Self::Error> {
        Ok(Transformed::Keep(rewritten))
    }

    fn enter_inline_fragment(
        &mut self,
        _inline_fragment: &ast::InlineFragment,
    ) -> Result<Visit, Self::Error> {
        Ok(Visit::Descend)
    }

    fn leave_inline_fragment(
        &mut self,
        _source: &ast::InlineFragment,
        rewritten: ast::InlineFragment,
    ) -> Result<Transformed<ast::InlineFragment>, Self::Error> {
        Ok(Transformed::Keep(rewritten))
    }

    fn enter_fragment_spread(
        &mut self,
        _fragment_spread: &ast::FragmentSpread,
    ) -> Result<Visit, Self::Error> {
        Ok(Visit::Descend)
    }

    fn leave_directive(&mut self, directive: &ast::Directive) -> Transformed<ast::Directive> {
        Transformed::Keep(directive.clone())
    }
}

pub fn rewrite_directives<R: Rewriter + ?Sized>(
    rewriter: &mut R,
    directives: &[ast::Directive],
) -> Vec<ast::Directive> {
    directives.iter()
        .filter_map(|directive| rewriter.leave_directive(directive).into_option())
        .collect()
}

pub fn rewrite_selection_set<R: Rewriter + ?Sized>(
    rewriter: &mut R,
    selection_set: &ast::SelectionSet,
) -> Result<ast::SelectionSet, R::Error> {
    let mut items = Vec::with_capacity(selection_set.items.len());
    for selection in &selection_set.items {
        if let Transformed::Keep(selection) = rewrite_selection(rewriter, selection)? {
            items.push(selection);
        }
    }

    Ok(ast::SelectionSet {
        span: selection_set.span,
        items,
    })
}

pub fn rewrite_selection<R: Rewriter + ?Sized>(
    rewriter: &mut R,
    selection: &ast::Selection,
) -> Result<Transformed<ast::Selection>, R::Error> {
    use graphql_parser::query::Selection as Sel;
    Ok(match selection {
        Sel::Field(field) => {
            if rewriter.enter_field(field)? == Visit::Delete {
                return Ok(Transformed::Delete);
            }

            let rewritten = ast::Field {
                position: field.position,
                alias: field.alias.clone(),
                name: field.name.clone(),
                arguments: field.arguments.clone(),
                directives: rewrite_directives(rewriter, &field.directives),
                selection_set: rewrite_selection_set(rewriter, &field.selection_set)?,
            };

            match rewriter.leave_field(field, rewritten)? {
                Transformed::Keep(field) => Transformed::Keep(Sel::Field(field)),
                Transformed::Delete => Transformed::Delete,
            }
        },

        Sel::InlineFragment(inline_fragment) => {
            if rewriter.enter_inline_fragment(inline_fragment)? == Visit::Delete {
                return Ok(Transformed::Delete);
            }

            let rewritten = ast::InlineFragment {
                position: inline_fragment.position,
                type_condition: inline_fragment.type_condition.clone(),
                directives: rewrite_directives(rewriter, &inline_fragment.directives),
                selection_set: rewrite_selection_set(
                    rewriter,
                    &inline_fragment.selection_set,
                )?,
            };

            match rewriter.leave_inline_fragment(inline_fragment, rewritten)? {
                Transformed::Keep(inline_fragment) =>
                    Transformed::Keep(Sel::InlineFragment(inline_fragment)),
                Transformed::Delete => Transformed::Delete,
            }
        },

        Sel::FragmentSpread(fragment_spread) => {
            if rewriter.enter_fragment_spread(fragment_spread)? == Visit::Delete {
                return Ok(Transformed::Delete);
            }

            Transformed::Keep(Sel::FragmentSpread(ast::FragmentSpread {
                position: fragment_spread.position,
                fragment_name: fragment_spread.fragment_name.clone(),
                directives: rewrite_directives(rewriter, &fragment_spread.directives),
            }))
        },
    })
}
