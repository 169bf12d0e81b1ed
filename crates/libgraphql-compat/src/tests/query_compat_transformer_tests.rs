use crate::ast;
use crate::tests::test_utils::ServerSupportsUpTo;
use crate::tests::test_utils::assert_transforms_to;
use crate::tests::test_utils::normalize;
use crate::QueryCompatError;
use crate::QueryCompatTransformer;
use crate::VariableBindings;
use crate::VersionRequirement;
use crate::file_reader::ReadContentError;
use crate::file_reader::ReadContentErrorKind;
use crate::make_query_compatible;

const MY_QUERY: &str = r#"
query MyQuery($yesSkip: Boolean!, $noSkip: Boolean!, $oldVersion: String) {
  testQuery(props: {name: "asdf", age: 32}) {
    field10 @skipOnClient(if: $yesSkip)
    filed11 @skipOnClient(if: $noSkip)
    field20 @since(version: "99") @required(ACTION: NONE)
    filed21 @since(version: "99")
    field22 @since(version: "100")
    field30 @deprecatedSince(version: "99")
    field31 @deprecatedSince(version: "101")
    fieldWithSelectionSet @since(version: "99") {
      insideSelectionSet {
        newField @since(version: "101")
        oldField @since(version: "99")
      }
      insideSelectionSet1 {
        newField @since(version: "101")
        newField2 @since(version: "101")
      }
      insideSelectionSet2 @since(version: "101") {
        whatever
      }
    }
  }
  oldQuery @deprecatedSince(version: $oldVersion) {
    whatever
  }
}
"#;

fn my_query_bindings() -> VariableBindings {
    VariableBindings::new()
        .with("yesSkip", true)
        .with("noSkip", false)
        .with("oldVersion", "99")
}

#[test]
fn rewrites_the_reference_document() {
    let actual = make_query_compatible(
        MY_QUERY,
        &my_query_bindings(),
        &ServerSupportsUpTo(99),
    ).unwrap();

    assert_eq!(actual, concat!(
        "query MyQuery {\n",
        "  testQuery(props: {name: \"asdf\", age: 32}) {\n",
        "    filed11\n",
        "    field20 @required(ACTION: NONE)\n",
        "    filed21\n",
        "    field31\n",
        "    fieldWithSelectionSet {\n",
        "      insideSelectionSet {\n",
        "        oldField\n",
        "      }\n",
        "    }\n",
        "  }\n",
        "}\n",
    ));
}

#[test]
fn output_contains_no_client_only_directives() {
    let actual = make_query_compatible(
        MY_QUERY,
        &my_query_bindings(),
        &ServerSupportsUpTo(1000),
    ).unwrap();

    for name in ["@skipOnClient", "@since", "@deprecatedSince"] {
        assert!(!actual.contains(name), "`{name}` survived in:\n{actual}");
    }
    assert!(actual.contains("@required(ACTION: NONE)"));
}

fn never_compatible(_requirement: &VersionRequirement<'_>) -> bool {
    false
}

#[test]
fn rewrites_list_valued_directives() {
    let bindings = VariableBindings::new()
        .with("versions1", vec!["23.09.9"])
        .with("versions2", vec!["23.09.9", "24.03.1"]);

    assert_transforms_to(
        r#"
        query MyQuery($versions1: [String], $versions2: [String]) {
          testQuery {
            field10
            field20 @sinceMultiple(versions: $versions1)
            filed21 @sinceMultiple(versions: $versions2)
            field30 @deprecatedSinceMultiple(versions: $versions2)
            field31 @since(version: "101")
          }
        }
        "#,
        &bindings,
        &never_compatible,
        r#"
        query MyQuery {
          testQuery {
            field10
            field30
          }
        }
        "#,
    );
}

#[test]
fn keeps_declarations_still_referenced_by_surviving_fields() {
    let bindings = VariableBindings::new().with("skip", false);
    assert_transforms_to(
        r#"
        query Q($id: ID!, $skip: Boolean!, $limit: Int, $format: String) {
          user(id: $id) {
            name @skipOnClient(if: $skip)
            posts(first: $limit) @since(version: "5") { id }
            bio(format: $format) @include(if: true)
          }
        }
        "#,
        &bindings,
        &ServerSupportsUpTo(1),
        r#"
        query Q($id: ID!, $format: String) {
          user(id: $id) {
            name
            bio(format: $format) @include(if: true)
          }
        }
        "#,
    );
}

#[test]
fn keeps_declarations_referenced_only_from_surviving_fragments() {
    assert_transforms_to(
        r#"
        query Q($size: Int, $old: Int) {
          user {
            ...Avatar
            ...Legacy
          }
        }

        fragment Avatar on User { avatar(size: $size) }
        fragment Legacy on User { legacy(x: $old) @deprecatedSince(version: "1") }
        "#,
        &VariableBindings::new(),
        &ServerSupportsUpTo(1),
        r#"
        query Q($size: Int) {
          user {
            ...Avatar
          }
        }

        fragment Avatar on User { avatar(size: $size) }
        "#,
    );
}

#[test]
fn transforming_twice_changes_nothing() {
    let bindings = my_query_bindings();
    let predicate = ServerSupportsUpTo(99);
    let transformer = QueryCompatTransformer::new(&bindings, &predicate);

    let once = transformer.transform_str(MY_QUERY).unwrap();
    let twice = transformer.transform_str(&once).unwrap();
    assert_eq!(once, twice);
}

#[test]
fn transform_document_leaves_the_input_untouched() {
    let bindings = my_query_bindings();
    let predicate = ServerSupportsUpTo(99);
    let document = ast::parse(MY_QUERY).unwrap();
    let before = document.clone();

    let transformed =
        QueryCompatTransformer::new(&bindings, &predicate)
            .transform_document(&document)
            .unwrap();

    assert_eq!(document, before);
    assert_ne!(transformed, document);
}

#[test]
fn documents_without_client_directives_round_trip() {
    let src = r#"
        query Plain($id: ID!) {
          user(id: $id) @include(if: true) {
            id
            ... on Admin { level }
          }
        }
    "#;
    assert_transforms_to(src, &VariableBindings::new(), &ServerSupportsUpTo(1), src);
}

#[test]
fn fragments_orphaned_by_a_dropped_spread_are_removed() {
    let actual = make_query_compatible(
        r#"
        query Q($v: Int) {
          user {
            id
            ...Details @since(version: "5")
          }
        }

        fragment Details on User { name(x: $v) }
        "#,
        &VariableBindings::new(),
        &ServerSupportsUpTo(1),
    ).unwrap();

    assert_eq!(actual, "query Q {\n  user {\n    id\n  }\n}\n");
}

#[test]
fn fragments_still_spread_elsewhere_survive() {
    assert_transforms_to(
        r#"
        query A { user { id ...Details @since(version: "5") } }
        query B { user { ...Details } }
        fragment Details on User { name }
        "#,
        &VariableBindings::new(),
        &ServerSupportsUpTo(1),
        r#"
        query A { user { id } }
        query B { user { ...Details } }
        fragment Details on User { name }
        "#,
    );
}

#[test]
fn documents_of_only_fragments_keep_them() {
    let src = r#"
        fragment Details on User { name }
        fragment Avatar on User { avatar }
    "#;
    assert_transforms_to(src, &VariableBindings::new(), &ServerSupportsUpTo(1), src);
}

#[test]
fn object_literal_keys_keep_their_source_order() {
    let actual = make_query_compatible(
        r#"
        query Q($where: Filter = {zeta: 1, alpha: {y: 2, x: 3}}) {
          search(where: $where, sort: [{name: ASC, age: DESC}]) @include(if: true) {
            id @since(version: "1")
          }
        }
        "#,
        &VariableBindings::new(),
        &ServerSupportsUpTo(1),
    ).unwrap();

    assert_eq!(actual, concat!(
        "query Q($where: Filter = {zeta: 1, alpha: {y: 2, x: 3}}) {\n",
        "  search(where: $where, sort: [{name: ASC, age: DESC}]) @include(if: true) {\n",
        "    id\n",
        "  }\n",
        "}\n",
    ));
}

// =============================================================================
// Errors
// =============================================================================

#[test]
fn malformed_documents_fail_to_parse() {
    let result = make_query_compatible(
        "query Broken { field(",
        &VariableBindings::new(),
        &ServerSupportsUpTo(1),
    );
    assert!(matches!(result, Err(QueryCompatError::ParseError(_))));
}

#[test]
fn operation_with_every_root_field_pruned_is_emitted_empty() {
    let actual = make_query_compatible(
        r#"query Future($v: Int) { a(x: $v) @since(version: "2") }"#,
        &VariableBindings::new(),
        &ServerSupportsUpTo(1),
    ).unwrap();
    assert_eq!(actual, "query Future {\n}\n");
}

#[test]
fn authoring_errors_are_surfaced() {
    let bindings = VariableBindings::new().with("versions", true);
    let result = make_query_compatible(
        "query Q($versions: [String]) { a b @sinceMultiple(versions: $versions) }",
        &bindings,
        &ServerSupportsUpTo(1),
    );
    assert!(matches!(result, Err(QueryCompatError::InvalidVersionList { .. })));
}

#[test]
fn transform_file_reports_missing_files() {
    let bindings = VariableBindings::new();
    let predicate = ServerSupportsUpTo(1);
    let missing = std::env::temp_dir().join("libgraphql-compat-does-not-exist.graphql");
    let result = QueryCompatTransformer::new(&bindings, &predicate).transform_file(&missing);

    match result {
        Err(QueryCompatError::DocumentFileReadError(err)) => {
            assert_eq!(*err, ReadContentError {
                file_path: missing,
                kind: ReadContentErrorKind::NotAFile,
            });
        },
        other => panic!("Expected DocumentFileReadError, got {other:?}"),
    }
}

#[test]
fn transform_file_reads_and_rewrites() {
    let path = std::env::temp_dir().join(format!(
        "libgraphql-compat-transform-file-{}.graphql",
        std::process::id(),
    ));
    std::fs::write(&path, r#"query Q { a b @since(version: "2") }"#).unwrap();

    let bindings = VariableBindings::new();
    let predicate = ServerSupportsUpTo(1);
    let result = QueryCompatTransformer::new(&bindings, &predicate).transform_file(&path);
    std::fs::remove_file(&path).unwrap();

    assert_eq!(result.unwrap(), normalize("query Q { a }"));
}
