// Mon Oct 19 2026 - Alex

use itertools::Itertools;

pub const SCOPE_SEPARATOR: &str = "::";

/// The namespaces (and record/typedef names) open at the current point of the
/// walk. `current` is rebuilt after every push and pop.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScopeStack {
    names: Vec<String>,
    current: String,
}

impl ScopeStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, name: impl Into<String>) {
        self.names.push(name.into());
        self.refresh();
    }

    pub fn pop(&mut self) -> Option<String> {
        let name = self.names.pop();
        self.refresh();
        name
    }

    pub fn current(&self) -> &str {
        &self.current
    }

    pub fn depth(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// `name` prefixed with the current scope.
    pub fn qualify(&self, name: &str) -> String {
        if self.current.is_empty() || name.is_empty() {
            name.to_string()
        } else {
            format!("{}{}{}", self.current, SCOPE_SEPARATOR, name)
        }
    }

    fn refresh(&mut self) {
        self.current = self.names.iter().join(SCOPE_SEPARATOR);
    }
}
