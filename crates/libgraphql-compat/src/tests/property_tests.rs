use crate::tests::test_utils::ServerSupportsUpTo;
use crate::tests::test_utils::declared_and_referenced_variables;
use crate::tests::test_utils::field_names_under_root_field;
use crate::QueryCompatTransformer;
use crate::VariableBindings;
use proptest::prelude::*;

#[derive(Clone, Debug)]
enum Gate {
    Since(u32),
    DeprecatedSince(u32),
    SkipOnClient(bool),
    SkipOnClientVar(Option<bool>),
}
impl Gate {
    fn directive(&self, field_idx: usize) -> String {
        match self {
            Self::Since(version) => format!(r#"@since(version: "{version}")"#),
            Self::DeprecatedSince(version) => format!(r#"@deprecatedSince(version: "{version}")"#),
            Self::SkipOnClient(condition) => format!("@skipOnClient(if: {condition})"),
            Self::SkipOnClientVar(_) => format!("@skipOnClient(if: $skip{field_idx})"),
        }
    }

    fn keeps(&self, server_version: u32) -> bool {
        match self {
            Self::Since(version) => *version <= server_version,
            Self::DeprecatedSince(version) => *version > server_version,
            Self::SkipOnClient(condition) => !condition,
            Self::SkipOnClientVar(binding) => binding != &Some(true),
        }
    }
}

fn gate_strategy() -> impl Strategy<Value = Gate> {
    prop_oneof![
        (0u32..20).prop_map(Gate::Since),
        (0u32..20).prop_map(Gate::DeprecatedSince),
        any::<bool>().prop_map(Gate::SkipOnClient),
        proptest::option::of(any::<bool>()).prop_map(Gate::SkipOnClientVar),
    ]
}

/// A query whose root field always keeps `anchor`, followed by one gated
/// field per entry in `gates`.
fn build_query(gates: &[Gate]) -> (String, VariableBindings) {
    let mut bindings = VariableBindings::new();
    let mut declarations = vec![];
    let mut fields = vec!["anchor".to_string()];
    for (idx, gate) in gates.iter().enumerate() {
        if let Gate::SkipOnClientVar(binding) = gate {
            declarations.push(format!("$skip{idx}: Boolean"));
            if let Some(value) = binding {
                bindings.insert(format!("skip{idx}"), *value);
            }
        }
        fields.push(format!("f{idx} {}", gate.directive(idx)));
    }

    let signature =
        if declarations.is_empty() {
            String::new()
        } else {
            format!("({})", declarations.join(", "))
        };
    let query = format!("query Generated{signature} {{ root {{ {} }} }}", fields.join(" "));
    (query, bindings)
}

fn literal_gate_strategy() -> impl Strategy<Value = Gate> {
    prop_oneof![
        (0u32..20).prop_map(Gate::Since),
        (0u32..20).prop_map(Gate::DeprecatedSince),
        any::<bool>().prop_map(Gate::SkipOnClient),
    ]
}

const VARIABLE_COUNT: u8 = 4;

/// A selection in a generated document. Fields may pass one of the
/// `$vN` variables as an argument; a spread gets a fragment of its own.
#[derive(Clone, Debug)]
enum Node {
    Leaf { gate: Option<Gate>, var: Option<u8> },
    Parent { gate: Option<Gate>, var: Option<u8>, children: Vec<Node> },
    Spread { gate: Option<Gate>, children: Vec<Node> },
}

fn node_strategy() -> impl Strategy<Value = Node> {
    let gate = || proptest::option::of(literal_gate_strategy());
    let var = || proptest::option::of(0..VARIABLE_COUNT);

    let leaf = (gate(), var()).prop_map(|(gate, var)| Node::Leaf { gate, var });
    leaf.prop_recursive(3, 32, 4, move |inner| {
        let children = proptest::collection::vec(inner, 1..4);
        prop_oneof![
            (gate(), var(), children.clone())
                .prop_map(|(gate, var, children)| Node::Parent { gate, var, children }),
            (gate(), children)
                .prop_map(|(gate, children)| Node::Spread { gate, children }),
        ]
    })
}

#[derive(Default)]
struct DocumentBuilder {
    fragments: Vec<String>,
    next_id: usize,
}
impl DocumentBuilder {
    /// An operation declaring every `$vN`, selecting `anchor` plus `nodes`,
    /// followed by the fragments the spreads in `nodes` refer to.
    fn build(mut self, nodes: &[Node]) -> String {
        let declarations: Vec<String> =
            (0..VARIABLE_COUNT).map(|idx| format!("$v{idx}: Int")).collect();
        let selections = self.render_all(nodes);
        let mut document = format!(
            "query Generated({}) {{ anchor {selections} }}",
            declarations.join(", "),
        );
        for fragment in &self.fragments {
            document.push('\n');
            document.push_str(fragment);
        }
        document
    }

    fn render_all(&mut self, nodes: &[Node]) -> String {
        nodes.iter().map(|node| self.render(node)).collect::<Vec<_>>().join(" ")
    }

    fn render(&mut self, node: &Node) -> String {
        let id = self.next_id;
        self.next_id += 1;

        let directive = |gate: &Option<Gate>| match gate {
            Some(gate) => format!(" {}", gate.directive(id)),
            None => String::new(),
        };
        let argument = |var: &Option<u8>| match var {
            Some(var) => format!("(x: $v{var})"),
            None => String::new(),
        };

        match node {
            Node::Leaf { gate, var } => format!("n{id}{}{}", argument(var), directive(gate)),
            Node::Parent { gate, var, children } => {
                let body = self.render_all(children);
                format!("n{id}{}{} {{ {body} }}", argument(var), directive(gate))
            },
            Node::Spread { gate, children } => {
                let body = self.render_all(children);
                self.fragments.push(format!("fragment F{id} on T {{ {body} }}"));
                format!("...F{id}{}", directive(gate))
            },
        }
    }
}

proptest! {
    #[test]
    fn gated_fields_survive_exactly_when_their_directive_allows(
        gates in proptest::collection::vec(gate_strategy(), 0..12),
        server_version in 0u32..20,
    ) {
        let (query, bindings) = build_query(&gates);
        let predicate = ServerSupportsUpTo(server_version);
        let output =
            QueryCompatTransformer::new(&bindings, &predicate)
                .transform_str(&query)
                .unwrap();

        let expected: Vec<String> =
            std::iter::once("anchor".to_string())
                .chain(
                    gates.iter()
                        .enumerate()
                        .filter(|(_, gate)| gate.keeps(server_version))
                        .map(|(idx, _)| format!("f{idx}")),
                )
                .collect();
        prop_assert_eq!(field_names_under_root_field(&output), expected);

        // Every `$skipN` is only ever used by a stripped directive.
        prop_assert!(!output.contains('$'));
        prop_assert!(!output.contains('@'));
    }

    #[test]
    fn transforming_is_idempotent(
        gates in proptest::collection::vec(gate_strategy(), 0..12),
        server_version in 0u32..20,
    ) {
        let (query, bindings) = build_query(&gates);
        let predicate = ServerSupportsUpTo(server_version);
        let transformer = QueryCompatTransformer::new(&bindings, &predicate);

        let once = transformer.transform_str(&query).unwrap();
        let twice = transformer.transform_str(&once).unwrap();
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn declared_variables_are_exactly_those_still_referenced(
        nodes in proptest::collection::vec(node_strategy(), 0..6),
        server_version in 0u32..20,
    ) {
        let query = DocumentBuilder::default().build(&nodes);
        let bindings = VariableBindings::new();
        let predicate = ServerSupportsUpTo(server_version);
        let output =
            QueryCompatTransformer::new(&bindings, &predicate)
                .transform_str(&query)
                .unwrap();

        let (declared, referenced) = declared_and_referenced_variables(&output);
        prop_assert_eq!(declared, referenced, "output:\n{}", output);
    }
}
