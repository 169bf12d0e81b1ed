use crate::printer;
use crate::printer::ObjectKeyOrder;

pub type Definition = graphql_parser::query::Definition<'static, String>;
pub type Directive = graphql_parser::query::Directive<'static, String>;
pub type Document = graphql_parser::query::Document<'static, String>;
pub type Field = graphql_parser::query::Field<'static, String>;
pub type FragmentDefinition = graphql_parser::query::FragmentDefinition<'static, String>;
pub type FragmentSpread = graphql_parser::query::FragmentSpread<'static, String>;
pub type InlineFragment = graphql_parser::query::InlineFragment<'static, String>;
pub type OperationDefinition = graphql_parser::query::OperationDefinition<'static, String>;
pub type Selection = graphql_parser::query::Selection<'static, String>;
pub type SelectionSet = graphql_parser::query::SelectionSet<'static, String>;
pub type Type = graphql_parser::query::Type<'static, String>;
pub type TypeCondition = graphql_parser::query::TypeCondition<'static, String>;
pub type Value = graphql_parser::query::Value<'static, String>;
pub type VariableDefinition = graphql_parser::query::VariableDefinition<'static, String>;

pub type ParseError = graphql_parser::query::ParseError;

pub fn parse(query_src: &str) -> Result<Document, ParseError> {
    Ok(graphql_parser::query::parse_query::<String>(query_src)?.into_static())
}

/// Serializes a [`Document`] back to query text in `graphql-parser`'s
/// pretty-printing style. With no source text to consult, object literal
/// keys come out sorted; see [`crate::printer`] to keep their source order.
pub fn print(document: &Document) -> String {
    printer::print_document(document, &ObjectKeyOrder::default())
}

/// The pieces of an [`OperationDefinition`] that are shared by every
/// operation kind, borrowed so that passes which only read an operation
/// don't need to match on all four variants.
pub(crate) struct OperationParts<'a> {
    pub(crate) directives: &'a [Directive],
    pub(crate) name: Option<&'a str>,
    pub(crate) selection_set: &'a SelectionSet,
    pub(crate) variable_definitions: &'a [VariableDefinition],
}
impl<'a> OperationParts<'a> {
    pub(crate) fn of(op: &'a OperationDefinition) -> Self {
        use graphql_parser::query::OperationDefinition as Op;
        match op {
            Op::SelectionSet(selection_set) => Self {
                directives: &[],
                name: None,
                selection_set,
                variable_definitions: &[],
            },

            Op::Query(query) => Self {
                directives: &query.directives,
                name: query.name.as_deref(),
                selection_set: &query.selection_set,
                variable_definitions: &query.variable_definitions,
            },

            Op::Mutation(mutation) => Self {
                directives: &mutation.directives,
                name: mutation.name.as_deref(),
                selection_set: &mutation.selection_set,
                variable_definitions: &mutation.variable_definitions,
            },

            Op::Subscription(subscription) => Self {
                directives: &subscription.directives,
                name: subscription.name.as_deref(),
                selection_set: &subscription.selection_set,
                variable_definitions: &subscription.variable_definitions,
            },
        }
    }
}

/// The variable declarations of `op`, or `None` for the `{ ... }` shorthand
/// form, which cannot declare variables.
pub(crate) fn variable_definitions_mut(
    op: &mut OperationDefinition,
) -> Option<&mut Vec<VariableDefinition>> {
    use graphql_parser::query::OperationDefinition as Op;
    match op {
        Op::SelectionSet(_) => None,
        Op::Query(query) => Some(&mut query.variable_definitions),
        Op::Mutation(mutation) => Some(&mut mutation.variable_definitions),
        Op::Subscription(subscription) => Some(&mut subscription.variable_definitions),
    }
}
