use indexmap::IndexMap;

/// A runtime value bound to a GraphQL variable by the caller of the
/// transformer.
///
/// Only directive arguments that reference a variable ever consult these
/// values; field arguments are forwarded to the server untouched.
#[derive(Clone, Debug, PartialEq, serde::Deserialize, serde::Serialize)]
#[serde(untagged)]
pub enum BindingValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    List(Vec<BindingValue>),
}
impl BindingValue {
    pub fn as_bool(&self) -> Option<bool> {
        if let Self::Bool(value) = self {
            Some(*value)
        } else {
            None
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        if let Self::String(value) = self {
            Some(value.as_str())
        } else {
            None
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// A short, human-readable name for the kind of this value. Used in
    /// error messages.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "boolean",
            Self::Int(_) => "int",
            Self::Float(_) => "float",
            Self::String(_) => "string",
            Self::List(_) => "list",
        }
    }
}
impl std::convert::From<bool> for BindingValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}
impl std::convert::From<i64> for BindingValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}
impl std::convert::From<&str> for BindingValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}
impl std::convert::From<String> for BindingValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}
impl<T: Into<BindingValue>> std::convert::From<Vec<T>> for BindingValue {
    fn from(values: Vec<T>) -> Self {
        Self::List(values.into_iter().map(Into::into).collect())
    }
}

/// Maps variable names (without the leading `$`) to the values the caller
/// has bound to them for one transformation.
#[derive(Clone, Debug, Default, PartialEq, serde::Deserialize, serde::Serialize)]
#[serde(transparent)]
pub struct VariableBindings {
    values: IndexMap<String, BindingValue>,
}
impl VariableBindings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&BindingValue> {
        self.values.get(name)
    }

    /// Bind `value` to `name`, replacing (and returning) any previous
    /// binding.
    pub fn insert(
        &mut self,
        name: impl Into<String>,
        value: impl Into<BindingValue>,
    ) -> Option<BindingValue> {
        self.values.insert(name.into(), value.into())
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Copy every binding from `other` into `self`. Entries in `other` win.
    pub fn merge(&mut self, other: VariableBindings) {
        self.values.extend(other.values);
    }

    /// Builder-style variant of [`VariableBindings::insert`].
    pub fn with(
        mut self,
        name: impl Into<String>,
        value: impl Into<BindingValue>,
    ) -> Self {
        self.insert(name, value);
        self
    }
}
impl<K: Into<String>, V: Into<BindingValue>> std::iter::FromIterator<(K, V)> for VariableBindings {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            values: iter.into_iter()
                .map(|(name, value)| (name.into(), value.into()))
                .collect(),
        }
    }
}
