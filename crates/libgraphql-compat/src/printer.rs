//! Prints documents in `graphql-parser`'s layout, except that object literals
//! keep the key order they were written in.
//!
//! `graphql-parser` stores object literals in a `BTreeMap`, so key order is
//! lost during parsing. [`ObjectKeyOrder::collect`] recovers it from the
//! source text and keys it by the position of the node that owns the value
//! (a field, directive or variable definition) plus the path to the object
//! within that node's arguments. Positions survive rewriting, so the same
//! order can be applied when printing a rewritten copy of the document.

use crate::ast;
use graphql_parser::Pos;
use std::collections::BTreeMap;
use std::collections::HashMap;
use std::fmt::Write;
use std::iter::Peekable;
use std::str::CharIndices;

const INDENT_WIDTH: usize = 2;

#[derive(Clone, Debug, Eq, Hash, PartialEq)]
enum PathSegment {
    Argument(String),
    DefaultValue,
    Index(usize),
    Key(String),
}

type ObjectFields = BTreeMap<String, ast::Value>;

/// Source-order keys of every object literal in a document.
#[derive(Clone, Debug, Default)]
pub struct ObjectKeyOrder {
    orders: HashMap<(Pos, Vec<PathSegment>), Vec<String>>,
}
impl ObjectKeyOrder {
    /// Pair each object literal in `source` with its node in `document`,
    /// which must have been parsed from `source`.
    pub fn collect(document: &ast::Document, source: &str) -> Self {
        let mut collector = KeyOrderCollector {
            literals: scan_object_literals(source).into_iter(),
            orders: HashMap::new(),
            path: vec![],
        };
        collector.document(document);
        Self {
            orders: collector.orders,
        }
    }

    /// The fields of `object` in source order, or in sorted order if the
    /// recorded keys don't describe this object.
    fn ordered_fields<'v>(
        &self,
        owner: Pos,
        path: &[PathSegment],
        object: &'v ObjectFields,
    ) -> Vec<(&'v String, &'v ast::Value)> {
        match self.orders.get(&(owner, path.to_vec())) {
            Some(keys) if keys.len() == object.len()
                && keys.iter().all(|key| object.contains_key(key)) =>
                keys.iter().filter_map(|key| object.get_key_value(key)).collect(),
            _ => object.iter().collect(),
        }
    }
}

/// Print `document`, writing object literals in the order recorded in
/// `key_order`.
pub fn print_document(document: &ast::Document, key_order: &ObjectKeyOrder) -> String {
    let mut printer = Printer {
        buf: String::with_capacity(1024),
        indent: 0,
        key_order,
        path: vec![],
    };
    for def in &document.definitions {
        printer.definition(def);
    }
    printer.buf
}

struct Printer<'a> {
    buf: String,
    indent: usize,
    key_order: &'a ObjectKeyOrder,
    path: Vec<PathSegment>,
}
impl Printer<'_> {
    fn write(&mut self, text: &str) {
        self.buf.push_str(text);
    }

    fn write_indent(&mut self) {
        for _ in 0..self.indent {
            self.buf.push(' ');
        }
    }

    /// A blank line between top-level definitions.
    fn margin(&mut self) {
        if !self.buf.is_empty() {
            self.buf.push('\n');
        }
    }

    fn selection_block(&mut self, items: &[ast::Selection]) {
        self.buf.push_str("{\n");
        self.indent += INDENT_WIDTH;
        for item in items {
            self.selection(item);
        }
        self.indent -= INDENT_WIDTH;
        self.write_indent();
        self.buf.push_str("}\n");
    }

    fn definition(&mut self, def: &ast::Definition) {
        use graphql_parser::query::Definition as Def;
        use graphql_parser::query::OperationDefinition as Op;

        self.margin();
        self.write_indent();
        match def {
            Def::Fragment(fragment) => {
                self.write("fragment ");
                self.write(&fragment.name);
                self.write(" ");
                self.type_condition(&fragment.type_condition);
                self.directives(&fragment.directives);
                self.write(" ");
                self.selection_block(&fragment.selection_set.items);
            },

            Def::Operation(Op::SelectionSet(selection_set)) =>
                self.selection_block(&selection_set.items),

            Def::Operation(op) => {
                let keyword = match op {
                    Op::Mutation(_) => "mutation",
                    Op::Subscription(_) => "subscription",
                    Op::Query(_) | Op::SelectionSet(_) => "query",
                };
                let parts = ast::OperationParts::of(op);
                self.write(keyword);
                if let Some(name) = parts.name {
                    self.write(" ");
                    self.write(name);
                }
                if !parts.variable_definitions.is_empty() {
                    self.write("(");
                    for (idx, var_def) in parts.variable_definitions.iter().enumerate() {
                        if idx > 0 {
                            self.write(", ");
                        }
                        self.variable_definition(var_def);
                    }
                    self.write(")");
                }
                self.directives(parts.directives);
                self.write(" ");
                self.selection_block(&parts.selection_set.items);
            },
        }
    }

    fn variable_definition(&mut self, var_def: &ast::VariableDefinition) {
        self.write("$");
        self.write(&var_def.name);
        self.write(": ");
        self.type_ref(&var_def.var_type);
        if let Some(default_value) = &var_def.default_value {
            self.write(" = ");
            self.path.push(PathSegment::DefaultValue);
            self.value(var_def.position, default_value);
            self.path.pop();
        }
    }

    fn type_ref(&mut self, type_ref: &ast::Type) {
        use graphql_parser::query::Type;
        match type_ref {
            Type::NamedType(name) => self.write(name),
            Type::ListType(inner) => {
                self.write("[");
                self.type_ref(inner);
                self.write("]");
            },
            Type::NonNullType(inner) => {
                self.type_ref(inner);
                self.write("!");
            },
        }
    }

    fn type_condition(&mut self, type_condition: &ast::TypeCondition) {
        let graphql_parser::query::TypeCondition::On(type_name) = type_condition;
        self.write("on ");
        self.write(type_name);
    }

    fn selection(&mut self, selection: &ast::Selection) {
        use graphql_parser::query::Selection as Sel;

        self.write_indent();
        match selection {
            Sel::Field(field) => {
                if let Some(alias) = &field.alias {
                    self.write(alias);
                    self.write(": ");
                }
                self.write(&field.name);
                self.arguments(field.position, &field.arguments);
                self.directives(&field.directives);
                if field.selection_set.items.is_empty() {
                    self.write("\n");
                } else {
                    self.write(" ");
                    self.selection_block(&field.selection_set.items);
                }
            },

            Sel::InlineFragment(inline_fragment) => {
                self.write("...");
                if let Some(type_condition) = &inline_fragment.type_condition {
                    self.write(" ");
                    self.type_condition(type_condition);
                }
                self.directives(&inline_fragment.directives);
                self.write(" ");
                self.selection_block(&inline_fragment.selection_set.items);
            },

            Sel::FragmentSpread(fragment_spread) => {
                self.write("...");
                self.write(&fragment_spread.fragment_name);
                self.directives(&fragment_spread.directives);
                self.write("\n");
            },
        }
    }

    fn directives(&mut self, directives: &[ast::Directive]) {
        for directive in directives {
            self.write(" @");
            self.write(&directive.name);
            self.arguments(directive.position, &directive.arguments);
        }
    }

    fn arguments(&mut self, owner: Pos, arguments: &[(String, ast::Value)]) {
        if arguments.is_empty() {
            return;
        }
        self.write("(");
        for (idx, (name, value)) in arguments.iter().enumerate() {
            if idx > 0 {
                self.write(", ");
            }
            self.write(name);
            self.write(": ");
            self.path.push(PathSegment::Argument(name.clone()));
            self.value(owner, value);
            self.path.pop();
        }
        self.write(")");
    }

    fn value(&mut self, owner: Pos, value: &ast::Value) {
        match value {
            ast::Value::Variable(name) => {
                self.write("$");
                self.write(name);
            },
            ast::Value::Int(number) => {
                if let Some(number) = number.as_i64() {
                    let _ = write!(self.buf, "{number}");
                }
            },
            ast::Value::Float(number) => {
                let _ = write!(self.buf, "{number}");
            },
            ast::Value::String(text) => self.quoted(text),
            ast::Value::Boolean(true) => self.write("true"),
            ast::Value::Boolean(false) => self.write("false"),
            ast::Value::Null => self.write("null"),
            ast::Value::Enum(name) => self.write(name),
            ast::Value::List(items) => {
                self.write("[");
                for (idx, item) in items.iter().enumerate() {
                    if idx > 0 {
                        self.write(", ");
                    }
                    self.path.push(PathSegment::Index(idx));
                    self.value(owner, item);
                    self.path.pop();
                }
                self.write("]");
            },
            ast::Value::Object(object) => {
                let fields = self.key_order.ordered_fields(owner, &self.path, object);
                self.write("{");
                for (idx, (key, field_value)) in fields.into_iter().enumerate() {
                    if idx > 0 {
                        self.write(", ");
                    }
                    self.write(key);
                    self.write(": ");
                    self.path.push(PathSegment::Key(key.clone()));
                    self.value(owner, field_value);
                    self.path.pop();
                }
                self.write("}");
            },
        }
    }

    /// Multi-line strings print as block strings; everything else is
    /// escaped onto one line.
    fn quoted(&mut self, text: &str) {
        let mut has_newline = false;
        let mut has_nonprintable = false;
        for c in text.chars() {
            match c {
                '\n' => has_newline = true,
                '\r' | '\t' | '\u{0020}'..='\u{FFFF}' => (),
                _ => has_nonprintable = true,
            }
        }

        if has_newline && !has_nonprintable {
            self.write("\"\"\"\n");
            self.indent += INDENT_WIDTH;
            for line in text.lines() {
                if !line.trim().is_empty() {
                    self.write_indent();
                    self.write(&line.replace("\"\"\"", "\\\"\"\""));
                }
                self.write("\n");
            }
            self.indent -= INDENT_WIDTH;
            self.write_indent();
            self.write("\"\"\"");
            return;
        }

        self.buf.push('"');
        for c in text.chars() {
            match c {
                '\r' => self.write("\\r"),
                '\n' => self.write("\\n"),
                '\t' => self.write("\\t"),
                '"' => self.write("\\\""),
                '\\' => self.write("\\\\"),
                '\u{0020}'..='\u{FFFF}' => self.buf.push(c),
                _ => {
                    let _ = write!(self.buf, "\\u{:04X}", c as u32);
                },
            }
        }
        self.buf.push('"');
    }
}

/// Walks a freshly parsed document in source order, handing out the key
/// lists found by [`scan_object_literals`] to each object literal it meets.
struct KeyOrderCollector {
    literals: std::vec::IntoIter<Vec<String>>,
    orders: HashMap<(Pos, Vec<PathSegment>), Vec<String>>,
    path: Vec<PathSegment>,
}
impl KeyOrderCollector {
    fn document(&mut self, document: &ast::Document) {
        use graphql_parser::query::Definition as Def;
        for def in &document.definitions {
            match def {
                Def::Operation(op) => {
                    let parts = ast::OperationParts::of(op);
                    for var_def in parts.variable_definitions {
                        if let Some(default_value) = &var_def.default_value {
                            self.path.push(PathSegment::DefaultValue);
                            self.value(var_def.position, default_value);
                            self.path.pop();
                        }
                    }
                    self.directives(parts.directives);
                    self.selection_set(parts.selection_set);
                },
                Def::Fragment(fragment) => {
                    self.directives(&fragment.directives);
                    self.selection_set(&fragment.selection_set);
                },
            }
        }
    }

    fn selection_set(&mut self, selection_set: &ast::SelectionSet) {
        use graphql_parser::query::Selection as Sel;
        for selection in &selection_set.items {
            match selection {
                Sel::Field(field) => {
                    self.arguments(field.position, &field.arguments);
                    self.directives(&field.directives);
                    self.selection_set(&field.selection_set);
                },
                Sel::InlineFragment(inline_fragment) => {
                    self.directives(&inline_fragment.directives);
                    self.selection_set(&inline_fragment.selection_set);
                },
                Sel::FragmentSpread(fragment_spread) => {
                    self.directives(&fragment_spread.directives);
                },
            }
        }
    }

    fn directives(&mut self, directives: &[ast::Directive]) {
        for directive in directives {
            self.arguments(directive.position, &directive.arguments);
        }
    }

    fn arguments(&mut self, owner: Pos, arguments: &[(String, ast::Value)]) {
        for (name, value) in arguments {
            self.path.push(PathSegment::Argument(name.clone()));
            self.value(owner, value);
            self.path.pop();
        }
    }

    fn value(&mut self, owner: Pos, value: &ast::Value) {
        match value {
            ast::Value::List(items) => {
                for (idx, item) in items.iter().enumerate() {
                    self.path.push(PathSegment::Index(idx));
                    self.value(owner, item);
                    self.path.pop();
                }
            },
            ast::Value::Object(object) => {
                let Some(keys) = self.literals.next() else {
                    return;
                };
                // Nested literals follow this one in the source, in key order.
                for key in &keys {
                    if let Some(field_value) = object.get(key) {
                        self.path.push(PathSegment::Key(key.clone()));
                        self.value(owner, field_value);
                        self.path.pop();
                    }
                }
                self.orders.insert((owner, self.path.clone()), keys);
            },
            _ => (),
        }
    }
}

/// The keys of every object literal in `source`, ordered by where each
/// literal's opening brace appears. Inside parentheses a `{` can only open
/// an object literal, and a name followed by `:` directly inside one is
/// one of its keys.
fn scan_object_literals(source: &str) -> Vec<Vec<String>> {
    let mut literals: Vec<Vec<String>> = vec![];
    let mut open_literals: Vec<usize> = vec![];
    let mut paren_depth = 0usize;
    let mut chars = source.char_indices().peekable();

    while let Some((idx, c)) = chars.next() {
        match c {
            '#' => {
                for (_, c) in chars.by_ref() {
                    if c == '\n' || c == '\r' {
                        break;
                    }
                }
            },
            '"' => skip_string(source, idx, &mut chars),
            '(' => paren_depth += 1,
            ')' => paren_depth = paren_depth.saturating_sub(1),
            '{' if paren_depth > 0 => {
                open_literals.push(literals.len());
                literals.push(vec![]);
            },
            '}' if paren_depth > 0 => {
                open_literals.pop();
            },
            c if c == '_' || c.is_ascii_alphabetic() => {
                let mut end = idx + 1;
                while let Some(&(next_idx, next)) = chars.peek() {
                    if next != '_' && !next.is_ascii_alphanumeric() {
                        break;
                    }
                    end = next_idx + 1;
                    chars.next();
                }
                let followed_by_colon =
                    source[end..].chars().find(|c| !c.is_whitespace()) == Some(':');
                if followed_by_colon && let Some(&literal_idx) = open_literals.last() {
                    literals[literal_idx].push(source[idx..end].to_string());
                }
            },
            _ => (),
        }
    }

    literals
}

/// Advance `chars` past the string literal whose opening quote is at
/// `start`.
fn skip_string(source: &str, start: usize, chars: &mut Peekable<CharIndices<'_>>) {
    if source[start..].starts_with("\"\"\"") {
        chars.next();
        chars.next();
        while let Some((idx, c)) = chars.next() {
            if c == '\\' && source[idx + 1..].starts_with("\"\"\"") {
                chars.nth(2);
            } else if c == '"' && source[idx..].starts_with("\"\"\"") {
                chars.nth(1);
                return;
            }
        }
        return;
    }

    while let Some((_, c)) = chars.next() {
        match c {
            '\\' => {
                chars.next();
            },
            '"' | '\n' => return,
            _ => (),
        }
    }
}
