use std::fmt;

use serde_json::Value;

use crate::runner::capture::EntryContext;

/// A declared requirement that another named entry complete first.
///
/// When `with_return` is set, the dependency's return value is forwarded to
/// the dependent entry as a positional argument, in declared order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dependency {
    pub name: String,
    pub with_return: bool,
}

/// The callable body of an entry.
pub type EntryFn = Box<dyn Fn(&mut EntryContext<'_>) -> Result<Value, EntryError>>;

/// One named test unit-of-work with its declared dependency edges.
pub struct Entry {
    pub name: String,
    pub dependencies: Vec<Dependency>,
    callable: EntryFn,
}

impl Entry {
    /// Create an entry with no dependencies.
    pub fn new(
        name: impl Into<String>,
        callable: impl Fn(&mut EntryContext<'_>) -> Result<Value, EntryError> + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            dependencies: Vec::new(),
            callable: Box::new(callable),
        }
    }

    /// Declare a dependency on another entry by name.
    ///
    /// With `with_return`, the dependency's return value is passed to this
    /// entry as a positional argument when it runs.
    ///
    /// # Errors
    ///
    /// Returns [`DeclarationError`] for a self-dependency or a duplicate
    /// target; both are rejected here, before any dispatch.
    pub fn depend_on(mut self, name: &str, with_return: bool) -> Result<Self, DeclarationError> {
        if name == self.name {
            return Err(DeclarationError {
                kind: DeclarationErrorKind::SelfDependency,
                entry: self.name,
                dependency: name.to_owned(),
            });
        }
        if self.dependencies.iter().any(|d| d.name == name) {
            return Err(DeclarationError {
                kind: DeclarationErrorKind::DuplicateDependency,
                entry: self.name,
                dependency: name.to_owned(),
            });
        }
        self.dependencies.push(Dependency {
            name: name.to_owned(),
            with_return,
        });
        Ok(self)
    }

    /// Invoke the entry's callable.
    pub fn call(&self, cx: &mut EntryContext<'_>) -> Result<Value, EntryError> {
        (self.callable)(cx)
    }
}

impl fmt::Debug for Entry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Entry")
            .field("name", &self.name)
            .field("dependencies", &self.dependencies)
            .finish_non_exhaustive()
    }
}

/// A malformed dependency declaration, rejected at declaration time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeclarationError {
    pub kind: DeclarationErrorKind,
    pub entry: String,
    pub dependency: String,
}

/// Classification of declaration errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeclarationErrorKind {
    /// An entry declared a dependency on itself.
    SelfDependency,
    /// An entry declared the same dependency target twice.
    DuplicateDependency,
}

impl fmt::Display for DeclarationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            DeclarationErrorKind::SelfDependency => {
                write!(f, "entry '{}' may not depend on itself", self.entry)
            }
            DeclarationErrorKind::DuplicateDependency => {
                write!(
                    f,
                    "entry '{}' already depends on '{}'",
                    self.entry, self.dependency
                )
            }
        }
    }
}

impl std::error::Error for DeclarationError {}

/// Error detail for a failed entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryError {
    pub kind: EntryErrorKind,
    pub message: String,
    pub detail: Option<String>,
}

impl EntryError {
    /// An assertion inside the entry did not hold.
    pub fn assertion(message: impl Into<String>) -> Self {
        Self {
            kind: EntryErrorKind::AssertionFailed,
            message: message.into(),
            detail: None,
        }
    }

    /// The entry returned an error value.
    pub fn execution(message: impl Into<String>) -> Self {
        Self {
            kind: EntryErrorKind::ExecutionFailed,
            message: message.into(),
            detail: None,
        }
    }

    /// The entry panicked; `message` is the panic payload.
    pub fn panicked(message: impl Into<String>) -> Self {
        Self {
            kind: EntryErrorKind::Panicked,
            message: message.into(),
            detail: None,
        }
    }

    /// Attach supporting detail to the error.
    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }
}

impl fmt::Display for EntryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)
    }
}

impl std::error::Error for EntryError {}

/// Classification of entry failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryErrorKind {
    /// An assertion helper reported a mismatch.
    AssertionFailed,
    /// The entry body returned an error.
    ExecutionFailed,
    /// The entry body panicked.
    Panicked,
}

impl fmt::Display for EntryErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AssertionFailed => write!(f, "assertion failed"),
            Self::ExecutionFailed => write!(f, "execution failed"),
            Self::Panicked => write!(f, "panicked"),
        }
    }
}
