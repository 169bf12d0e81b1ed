use crate::ast;
use crate::compat_directive;
use crate::directive_evaluator::DirectiveEvaluator;
use crate::directive_evaluator::Verdict;
use crate::rewriter;
use crate::rewriter::Rewriter;
use crate::rewriter::Transformed;
use crate::rewriter::Visit;
use crate::CompatibilityPredicate;
use crate::QueryCompatError;
use crate::VariableBindings;
use std::collections::HashMap;
use std::collections::HashSet;

type Result<T> = std::result::Result<T, QueryCompatError>;

/// Prunes a document for the connected server:
///
/// * Nodes whose client-only directives reject the server are removed along
///   with their subtrees.
/// * Fields and inline fragments whose selections were all removed are
///   removed too.
/// * Fragment definitions that end up empty are removed, together with every
///   spread of them. Fragments left with no spreads are removed too.
/// * Client-only directives are stripped from everything that survives.
pub struct CompatRewriter<'a, P: ?Sized> {
    evaluator: DirectiveEvaluator<'a, P>,
    removed_fragments: HashSet<String>,
}
impl<'a, P: CompatibilityPredicate + ?Sized> CompatRewriter<'a, P> {
    pub fn new(bindings: &'a VariableBindings, predicate: &'a P) -> Self {
        Self {
            evaluator: DirectiveEvaluator::new(bindings, predicate),
            removed_fragments: HashSet::new(),
        }
    }

    pub fn rewrite_document(&mut self, document: &ast::Document) -> Result<ast::Document> {
        use graphql_parser::query::Definition as Def;

        // Removing one fragment removes its spreads, which can empty out
        // other fragments. Repeat until no more fragments are removed.
        let mut rewritten_fragments;
        loop {
            let removed_before = self.removed_fragments.len();
            rewritten_fragments = Vec::with_capacity(document.definitions.len());
            for def in &document.definitions {
                rewritten_fragments.push(match def {
                    Def::Fragment(fragment) => self.rewrite_fragment(fragment)?,
                    Def::Operation(_) => None,
                });
            }
            if self.removed_fragments.len() == removed_before {
                break;
            }
        }

        let mut definitions = Vec::with_capacity(document.definitions.len());
        for (def, rewritten_fragment) in document.definitions.iter().zip(rewritten_fragments) {
            match def {
                Def::Fragment(_) => {
                    if let Some(fragment) = rewritten_fragment {
                        definitions.push(Def::Fragment(fragment));
                    }
                },

                Def::Operation(op) => {
                    definitions.push(Def::Operation(self.rewrite_operation(op)?));
                },
            }
        }

        // A fragment whose every spread was dropped is no longer used by any
        // operation. Fragments no operation used to begin with are kept.
        let used_before = fragments_used_by_operations(document);
        let mut rewritten = ast::Document { definitions };
        let used_after: HashSet<String> =
            fragments_used_by_operations(&rewritten)
                .into_iter()
                .map(str::to_string)
                .collect();
        rewritten.definitions.retain(|def| match def {
            Def::Fragment(fragment) => {
                let orphaned = used_before.contains(fragment.name.as_str())
                    && !used_after.contains(&fragment.name);
                if orphaned {
                    log::debug!(
                        "Removing fragment `{}`, which no operation spreads anymore.",
                        fragment.name,
                    );
                }
                !orphaned
            },
            Def::Operation(_) => true,
        });

        Ok(rewritten)
    }

    fn rewrite_fragment(
        &mut self,
        fragment: &ast::FragmentDefinition,
    ) -> Result<Option<ast::FragmentDefinition>> {
        if self.removed_fragments.contains(&fragment.name) {
            return Ok(None);
        }

        let keep = self.evaluator.evaluate(&fragment.directives)? == Verdict::Keep;
        let selection_set = if keep {
            rewriter::rewrite_selection_set(self, &fragment.selection_set)?
        } else {
            ast::SelectionSet {
                span: fragment.selection_set.span,
                items: vec![],
            }
        };

        if selection_set.items.is_empty() {
            log::debug!(
                "Removing fragment `{}` and every spread of it.",
                fragment.name,
            );
            self.removed_fragments.insert(fragment.name.clone());
            return Ok(None);
        }

        Ok(Some(ast::FragmentDefinition {
            position: fragment.position,
            name: fragment.name.clone(),
            type_condition: fragment.type_condition.clone(),
            directives: rewriter::rewrite_directives(self, &fragment.directives),
            selection_set,
        }))
    }

    fn rewrite_operation(
        &mut self,
        op: &ast::OperationDefinition,
    ) -> Result<ast::OperationDefinition> {
        use graphql_parser::query::OperationDefinition as Op;

        let rewritten = match op {
            Op::SelectionSet(selection_set) => Op::SelectionSet(
                rewriter::rewrite_selection_set(self, selection_set)?,
            ),

            Op::Query(query) => Op::Query(graphql_parser::query::Query {
                position: query.position,
                name: query.name.clone(),
                variable_definitions: query.variable_definitions.clone(),
                directives: rewriter::rewrite_directives(self, &query.directives),
                selection_set: rewriter::rewrite_selection_set(self, &query.selection_set)?,
            }),

            Op::Mutation(mutation) => Op::Mutation(graphql_parser::query::Mutation {
                position: mutation.position,
                name: mutation.name.clone(),
                variable_definitions: mutation.variable_definitions.clone(),
                directives: rewriter::rewrite_directives(self, &mutation.directives),
                selection_set: rewriter::rewrite_selection_set(self, &mutation.selection_set)?,
            }),

            Op::Subscription(subscription) => Op::Subscription(
                graphql_parser::query::Subscription {
                    position: subscription.position,
                    name: subscription.name.clone(),
                    variable_definitions: subscription.variable_definitions.clone(),
                    directives: rewriter::rewrite_directives(self, &subscription.directives),
                    selection_set: rewriter::rewrite_selection_set(
                        self,
                        &subscription.selection_set,
                    )?,
                },
            ),
        };

        if ast::OperationParts::of(&rewritten).selection_set.items.is_empty() {
            log::warn!(
                "Every selection of operation `{}` was pruned for the connected server.",
                ast::OperationParts::of(op).name.unwrap_or("<anonymous>"),
            );
        }

        Ok(rewritten)
    }

    fn verdict_to_visit(&self, directives: &[ast::Directive]) -> Result<Visit> {
        Ok(match self.evaluator.evaluate(directives)? {
            Verdict::Keep => Visit::Descend,
            Verdict::Drop => Visit::Delete,
        })
    }
}

impl<'a, P: CompatibilityPredicate + ?Sized> Rewriter for CompatRewriter<'a, P> {
    type Error = QueryCompatError;

    fn enter_field(&mut self, field: &ast::Field) -> Result<Visit> {
        self.verdict_to_visit(&field.directives)
    }

    fn leave_field(
        &mut self,
        source: &ast::Field,
        rewritten: ast::Field,
    ) -> Result<Transformed<ast::Field>> {
        if !source.selection_set.items.is_empty() && rewritten.selection_set.items.is_empty() {
            log::debug!(
                "Removing field `{}` because none of its selections remain.",
                source.name,
            );
            return Ok(Transformed::Delete);
        }
        Ok(Transformed::Keep(rewritten))
    }

    fn enter_inline_fragment(&mut self, inline_fragment: &ast::InlineFragment) -> Result<Visit> {
        self.verdict_to_visit(&inline_fragment.directives)
    }

    fn leave_inline_fragment(
        &mut self,
        _source: &ast::InlineFragment,
        rewritten: ast::InlineFragment,
    ) -> Result<Transformed<ast::InlineFragment>> {
        if rewritten.selection_set.items.is_empty() {
            log::debug!("Removing an inline fragment because none of its selections remain.");
            return Ok(Transformed::Delete);
        }
        Ok(Transformed::Keep(rewritten))
    }

    fn enter_fragment_spread(&mut self, fragment_spread: &ast::FragmentSpread) -> Result<Visit> {
        if self.removed_fragments.contains(&fragment_spread.fragment_name) {
            return Ok(Visit::Delete);
        }
        self.verdict_to_visit(&fragment_spread.directives)
    }

    fn leave_directive(&mut self, directive: &ast::Directive) -> Transformed<ast::Directive> {
        if compat_directive::is_client_only_directive(directive) {
            log::trace!("Stripping client-only directive `@{}`.", directive.name);
            Transformed::Delete
        } else {
            Transformed::Keep(directive.clone())
        }
    }
}

/// Names of the fragments reachable from the operations of `document`,
/// directly or through other fragments.
fn fragments_used_by_operations(document: &ast::Document) -> HashSet<&str> {
    use graphql_parser::query::Definition as Def;
    use graphql_parser::query::Selection as Sel;

    let fragments: HashMap<&str, &ast::FragmentDefinition> =
        document.definitions.iter()
            .filter_map(|def| match def {
                Def::Fragment(fragment) => Some((fragment.name.as_str(), fragment)),
                Def::Operation(_) => None,
            })
            .collect();

    let mut pending: Vec<&ast::SelectionSet> =
        document.definitions.iter()
            .filter_map(|def| match def {
                Def::Operation(op) => Some(ast::OperationParts::of(op).selection_set),
                Def::Fragment(_) => None,
            })
            .collect();

    let mut used = HashSet::new();
    while let Some(selection_set) = pending.pop() {
        for selection in &selection_set.items {
            match selection {
                Sel::Field(field) => pending.push(&field.selection_set),
                Sel::InlineFragment(inline_fragment) => {
                    pending.push(&inline_fragment.selection_set);
                },
                Sel::FragmentSpread(fragment_spread) => {
                    let name = fragment_spread.fragment_name.as_str();
                    if used.insert(name)
                        && let Some(fragment) = fragments.get(name).copied() {
                        pending.push(&fragment.selection_set);
                    }
                },
            }
        }
    }
    used
}
