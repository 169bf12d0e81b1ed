use crate::ast;
use crate::file_reader;
use std::sync::Arc;
use thiserror::Error;

#[derive(Clone, Debug, Error)]
pub enum QueryCompatError {
    #[error("Failure while trying to read a GraphQL document file from disk: {0}")]
    DocumentFileReadError(Box<file_reader::ReadContentError>),

    #[error(
        "The `@{directive_name}` directive expects a list of version strings, \
        but its argument resolved to {found}."
    )]
    InvalidVersionList {
        directive_name: &'static str,
        found: String,
    },

    #[error("Error parsing GraphQL document: {0}")]
    ParseError(Arc<ast::ParseError>),
}
impl std::convert::From<ast::ParseError> for QueryCompatError {
    fn from(value: ast::ParseError) -> Self {
        Self::ParseError(Arc::new(value))
    }
}
impl std::convert::From<file_reader::ReadContentError> for QueryCompatError {
    fn from(value: file_reader::ReadContentError) -> Self {
        Self::DocumentFileReadError(Box::new(value))
    }
}
