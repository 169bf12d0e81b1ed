use crate::ast;
use crate::compat_rewriter::CompatRewriter;
use crate::file_reader;
use crate::printer;
use crate::printer::ObjectKeyOrder;
use crate::variable_usage;
use crate::CompatibilityPredicate;
use crate::QueryCompatError;
use crate::VariableBindings;
use std::path::Path;

type Result<T> = std::result::Result<T, QueryCompatError>;

/// Rewrites client-authored GraphQL documents for one connected server.
///
/// A transformer borrows the caller's variable bindings and compatibility
/// predicate and is otherwise stateless: every call parses (or reads) its own
/// tree, so a single transformer can be reused across documents.
///
/// ```
/// use libgraphql_compat::QueryCompatTransformer;
/// use libgraphql_compat::VariableBindings;
/// use libgraphql_compat::VersionRequirement;
///
/// fn is_compatible_with(requirement: &VersionRequirement<'_>) -> bool {
///     matches!(requirement, VersionRequirement::Version("1.0"))
/// }
///
/// let bindings = VariableBindings::new();
/// let transformer = QueryCompatTransformer::new(&bindings, &is_compatible_with);
///
/// let output = transformer.transform_str(
///     "query Q { a @since(version: \"1.0\") b @since(version: \"2.0\") }",
/// ).unwrap();
/// assert_eq!(output.trim_end(), "query Q {\n  a\n}");
/// ```
pub struct QueryCompatTransformer<'a, P: ?Sized> {
    bindings: &'a VariableBindings,
    predicate: &'a P,
}
impl<'a, P: CompatibilityPredicate + ?Sized> QueryCompatTransformer<'a, P> {
    pub fn new(bindings: &'a VariableBindings, predicate: &'a P) -> Self {
        Self {
            bindings,
            predicate,
        }
    }

    /// Run the AST stages of the pipeline: prune and strip, count variable
    /// references, then drop unreferenced declarations. Each stage builds a
    /// new document; `document` is left untouched.
    pub fn transform_document(&self, document: &ast::Document) -> Result<ast::Document> {
        let rewritten =
            CompatRewriter::new(self.bindings, self.predicate)
                .rewrite_document(document)?;

        // Counts include each declaration's own `$name`, so
        // `prune_unreferenced_declarations` removes declarations whose count
        // is at most `DECLARATION_ONLY_REFERENCE_COUNT` (i.e. 1).
        let reference_counts = variable_usage::count_variable_references(&rewritten);
        Ok(variable_usage::prune_unreferenced_declarations(
            &rewritten,
            &reference_counts,
        ))
    }

    pub fn transform_file(&self, file_path: impl AsRef<Path>) -> Result<String> {
        let content = file_reader::read_content(file_path)?;
        self.transform_str(content)
    }

    /// Parse `content`, transform it, and print the result. Object literals
    /// are printed with their keys in the order `content` wrote them.
    pub fn transform_str(&self, content: impl AsRef<str>) -> Result<String> {
        let content = content.as_ref();
        let document = ast::parse(content)?;
        let key_order = ObjectKeyOrder::collect(&document, content);
        let transformed = self.transform_document(&document)?;
        Ok(printer::print_document(&transformed, &key_order))
    }
}

/// Shorthand for
/// `QueryCompatTransformer::new(bindings, predicate).transform_str(content)`.
pub fn make_query_compatible<P: CompatibilityPredicate + ?Sized>(
    content: impl AsRef<str>,
    bindings: &VariableBindings,
    predicate: &P,
) -> Result<String> {
    QueryCompatTransformer::new(bindings, predicate).transform_str(content)
}
