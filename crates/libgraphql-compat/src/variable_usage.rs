use crate::ast;
use indexmap::IndexMap;
use std::collections::HashMap;
use std::collections::HashSet;

/// The count a variable has when its declaration is its only appearance.
///
/// [`count_variable_references`] counts a declaration's own `$name` token
/// as one reference, so any declaration whose count is at or below this
/// value is referenced nowhere else in its operation.
pub const DECLARATION_ONLY_REFERENCE_COUNT: usize = 1;

/// How often each variable name appears within one operation, including
/// the operation's own declarations and every fragment it spreads.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct VariableReferenceCounts {
    counts: IndexMap<String, usize>,
    operation_name: Option<String>,
}
impl VariableReferenceCounts {
    pub fn count_of(&self, variable_name: &str) -> usize {
        self.counts.get(variable_name).copied().unwrap_or(0)
    }

    pub fn operation_name(&self) -> Option<&str> {
        self.operation_name.as_deref()
    }
}

/// Count every appearance of every variable name, once per operation in
/// `document` (in document order).
pub fn count_variable_references(document: &ast::Document) -> Vec<VariableReferenceCounts> {
    use graphql_parser::query::Definition as Def;

    let fragments: HashMap<&str, &ast::FragmentDefinition> =
        document.definitions.iter()
            .filter_map(|def| match def {
                Def::Fragment(fragment) => Some((fragment.name.as_str(), fragment)),
                Def::Operation(_) => None,
            })
            .collect();

    document.definitions.iter()
        .filter_map(|def| match def {
            Def::Operation(op) => Some(op),
            Def::Fragment(_) => None,
        })
        .map(|op| {
            let op = ast::OperationParts::of(op);
            let mut counter = VariableReferenceCounter {
                counts: IndexMap::new(),
                fragments: &fragments,
                visited_fragments: HashSet::new(),
            };
            for var_def in op.variable_definitions {
                counter.record(&var_def.name);
            }
            counter.count_directives(op.directives);
            counter.count_selection_set(op.selection_set);

            VariableReferenceCounts {
                counts: counter.counts,
                operation_name: op.name.map(str::to_string),
            }
        })
        .collect()
}

/// Produce a copy of `document` without the variable declarations that
/// `counts` shows are referenced nowhere but in the declaration itself.
///
/// `counts` must come from [`count_variable_references`] on the same
/// document. An operation with no matching entry keeps all of its
/// declarations.
pub fn prune_unreferenced_declarations(
    document: &ast::Document,
    counts: &[VariableReferenceCounts],
) -> ast::Document {
    use graphql_parser::query::Definition as Def;

    let mut counts = counts.iter();
    let definitions = document.definitions.iter()
        .map(|def| match def {
            Def::Fragment(fragment) => Def::Fragment(fragment.clone()),
            Def::Operation(op) => {
                let mut op = op.clone();
                if let Some(op_counts) = counts.next()
                    && let Some(var_defs) = ast::variable_definitions_mut(&mut op) {
                    var_defs.retain(|var_def| {
                        let referenced =
                            op_counts.count_of(&var_def.name) > DECLARATION_ONLY_REFERENCE_COUNT;
                        if !referenced {
                            log::debug!(
                                "Removing the declaration of `${}`, which is no longer \
                                referenced.",
                                var_def.name,
                            );
                        }
                        referenced
                    });
                }
                Def::Operation(op)
            },
        })
        .collect();

    ast::Document { definitions }
}

struct VariableReferenceCounter<'doc> {
    counts: IndexMap<String, usize>,
    fragments: &'doc HashMap<&'doc str, &'doc ast::FragmentDefinition>,
    visited_fragments: HashSet<&'doc str>,
}
impl<'doc> VariableReferenceCounter<'doc> {
    fn record(&mut self, variable_name: &str) {
        *self.counts.entry(variable_name.to_string()).or_insert(0) += 1;
    }

    fn count_value(&mut self, value: &ast::Value) {
        match value {
            ast::Value::Variable(name) => self.record(name),
            ast::Value::List(items) => {
                for item in items {
                    self.count_value(item);
                }
            },
            ast::Value::Object(fields) => {
                for item in fields.values() {
                    self.count_value(item);
                }
            },
            _ => (),
        }
    }

    fn count_arguments(&mut self, arguments: &[(String, ast::Value)]) {
        for (_, value) in arguments {
            self.count_value(value);
        }
    }

    fn count_directives(&mut self, directives: &[ast::Directive]) {
        for directive in directives {
            self.count_arguments(&directive.arguments);
        }
    }

    fn count_selection_set(&mut self, selection_set: &'doc ast::SelectionSet) {
        use graphql_parser::query::Selection as Sel;
        for selection in &selection_set.items {
            match selection {
                Sel::Field(field) => {
                    self.count_arguments(&field.arguments);
                    self.count_directives(&field.directives);
                    self.count_selection_set(&field.selection_set);
                },

                Sel::InlineFragment(inline_fragment) => {
                    self.count_directives(&inline_fragment.directives);
                    self.count_selection_set(&inline_fragment.selection_set);
                },

                Sel::FragmentSpread(fragment_spread) => {
                    self.count_directives(&fragment_spread.directives);
                    let fragment_name = fragment_spread.fragment_name.as_str();
                    if self.visited_fragments.insert(fragment_name)
                        && let Some(fragment) = self.fragments.get(fragment_name).copied() {
                        self.count_directives(&fragment.directives);
                        self.count_selection_set(&fragment.selection_set);
                    }
                },
            }
        }
    }
}
