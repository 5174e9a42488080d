use std::collections::BTreeMap;
use std::fmt::{Debug, Display, Formatter};

/// One call of a remote method: its name, positional arguments and keyword arguments.
///
/// Keyword arguments are kept sorted by name, so two invocations built with the
/// same keywords in a different order are equal and hash the same.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Invocation<V> {
    method: String,
    args: Vec<V>,
    kwargs: BTreeMap<String, V>,
}

impl<V> Invocation<V> {
    pub fn new(method: impl Into<String>) -> Self {
        Invocation {
            method: method.into(),
            args: Vec::new(),
            kwargs: BTreeMap::new(),
        }
    }

    pub fn with_args(method: impl Into<String>, args: impl IntoIterator<Item = V>) -> Self {
        Invocation {
            method: method.into(),
            args: args.into_iter().collect(),
            kwargs: BTreeMap::new(),
        }
    }

    /// append a positional argument
    pub fn arg(mut self, value: V) -> Self {
        self.args.push(value);
        self
    }

    /// set a keyword argument, replacing any previous value for `name`
    pub fn kwarg(mut self, name: impl Into<String>, value: V) -> Self {
        self.kwargs.insert(name.into(), value);
        self
    }

    pub fn method(&self) -> &str {
        &self.method
    }

    pub fn args(&self) -> &[V] {
        &self.args
    }

    pub fn kwargs(&self) -> &BTreeMap<String, V> {
        &self.kwargs
    }

    pub fn kwarg_value(&self, name: &str) -> Option<&V> {
        self.kwargs.get(name)
    }
}

impl<V> Display for Invocation<V>
where
    V: Debug,
{
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}(", self.method)?;
        let mut first = true;
        for arg in self.args.iter() {
            if !first {
                write!(f, ", ")?;
            }
            first = false;
            write!(f, "{:?}", arg)?;
        }
        for (name, value) in self.kwargs.iter() {
            if !first {
                write!(f, ", ")?;
            }
            first = false;
            write!(f, "{}={:?}", name, value)?;
        }
        write!(f, ")")
    }
}
