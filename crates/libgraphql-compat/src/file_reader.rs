use std::path::Path;
use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;

type Result<T> = std::result::Result<T, ReadContentError>;

const UTF8_BOM: char = '\u{FEFF}';

/// Read a UTF-8 text file, such as a GraphQL document or a JSON bindings
/// file. A leading byte-order mark is dropped so it never reaches a parser.
pub fn read_content<P: AsRef<Path>>(file_path: P) -> Result<String> {
    let file_path = file_path.as_ref();
    let fail = |kind| ReadContentError {
        file_path: file_path.to_path_buf(),
        kind,
    };

    if !file_path.is_file() {
        return Err(fail(ReadContentErrorKind::NotAFile));
    }

    let bytes = std::fs::read(file_path)
        .map_err(|err| fail(ReadContentErrorKind::Io(Arc::new(err))))?;
    let content = std::str::from_utf8(&bytes)
        .map_err(|err| fail(ReadContentErrorKind::NotUtf8(err)))?;

    log::trace!("Read {} bytes from {file_path:#?}.", bytes.len());
    Ok(content.strip_prefix(UTF8_BOM).unwrap_or(content).to_string())
}

#[derive(Clone, Debug, Error, PartialEq)]
#[error("Could not read {file_path:?}: {kind}")]
pub struct ReadContentError {
    pub file_path: PathBuf,
    pub kind: ReadContentErrorKind,
}

#[derive(Clone, Debug, Error)]
pub enum ReadContentErrorKind {
    #[error("{0}")]
    Io(Arc<std::io::Error>),

    #[error("the path does not point to a file")]
    NotAFile,

    #[error("the contents are not valid UTF-8 ({0})")]
    NotUtf8(std::str::Utf8Error),
}
impl std::cmp::PartialEq for ReadContentErrorKind {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Io(self_err), Self::Io(other_err)) => self_err.kind() == other_err.kind(),
            (Self::NotAFile, Self::NotAFile) => true,
            (Self::NotUtf8(self_err), Self::NotUtf8(other_err)) => self_err == other_err,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::ReadContentError;
    use super::ReadContentErrorKind;
    use super::read_content;

    fn temp_file(name: &str, bytes: &[u8]) -> std::path::PathBuf {
        let path = std::env::temp_dir().join(format!(
            "libgraphql-compat-file-reader-{}-{name}",
            std::process::id(),
        ));
        std::fs::write(&path, bytes).unwrap();
        path
    }

    #[test]
    fn strips_a_leading_byte_order_mark() {
        let path = temp_file("bom.graphql", b"\xEF\xBB\xBFquery Q { a }");
        let content = read_content(&path);
        std::fs::remove_file(&path).unwrap();

        assert_eq!(content.unwrap(), "query Q { a }");
    }

    #[test]
    fn rejects_files_that_are_not_utf8() {
        let path = temp_file("latin1.graphql", b"query Q { caf\xE9 }");
        let result = read_content(&path);
        std::fs::remove_file(&path).unwrap();

        let err = result.unwrap_err();
        assert_eq!(err.file_path, path);
        assert!(matches!(err.kind, ReadContentErrorKind::NotUtf8(_)));
    }

    #[test]
    fn rejects_directories() {
        let dir = std::env::temp_dir();
        assert_eq!(
            read_content(&dir),
            Err(ReadContentError {
                file_path: dir.clone(),
                kind: ReadContentErrorKind::NotAFile,
            }),
        );
    }
}
