use std::fmt;

use crate::suite::builder::Suite;
use crate::suite::entry::Entry;

/// A structural defect in a suite's dependency declarations, fatal to the
/// whole suite before any entry runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolveError {
    pub kind: ResolveErrorKind,
    /// The entry whose dependency list triggered the error.
    pub entry: String,
    /// The offending dependency target.
    pub dependency: String,
}

/// Classification of resolver errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolveErrorKind {
    /// A dependency names an entry that does not exist in the suite.
    UnknownDependency,
    /// Following dependency edges returned to an entry already on the
    /// current walk path.
    CycleDetected,
}

impl fmt::Display for ResolveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            ResolveErrorKind::UnknownDependency => write!(
                f,
                "entry '{}' depends on unknown entry '{}'",
                self.entry, self.dependency
            ),
            ResolveErrorKind::CycleDetected => write!(
                f,
                "recursive dependency detected: '{}' depends on '{}'",
                self.entry, self.dependency
            ),
        }
    }
}

impl std::error::Error for ResolveError {}

/// Compute the full transitive set of entries `entry` depends on, in
/// flattened dependency-first order.
///
/// Each dependency appears once, at the position of its first discovery;
/// recursive results merge with append-only-if-absent semantics, so ties are
/// broken first-declared-first-merged.
///
/// # Errors
///
/// Returns [`ResolveError`] when an edge targets an unknown entry or when
/// the walk returns to an entry already on the current path (a cycle).
pub fn resolve<'a>(suite: &'a Suite, entry: &'a Entry) -> Result<Vec<&'a str>, ResolveError> {
    let mut path = vec![entry.name.as_str()];
    let mut deps = Vec::new();
    walk(suite, entry, &mut path, &mut deps)?;
    Ok(deps)
}

fn walk<'a>(
    suite: &'a Suite,
    entry: &'a Entry,
    path: &mut Vec<&'a str>,
    deps: &mut Vec<&'a str>,
) -> Result<(), ResolveError> {
    for edge in &entry.dependencies {
        let dep = suite.entry(&edge.name).ok_or_else(|| ResolveError {
            kind: ResolveErrorKind::UnknownDependency,
            entry: entry.name.clone(),
            dependency: edge.name.clone(),
        })?;
        if path.contains(&dep.name.as_str()) {
            return Err(ResolveError {
                kind: ResolveErrorKind::CycleDetected,
                entry: entry.name.clone(),
                dependency: dep.name.clone(),
            });
        }
        if !deps.contains(&dep.name.as_str()) {
            deps.push(&dep.name);
        }
        path.push(&dep.name);
        walk(suite, dep, path, deps)?;
        path.pop();
    }
    Ok(())
}

/// Resolve every entry in the suite, surfacing the first structural error.
///
/// The dispatcher calls this before running anything so that a defective
/// suite aborts with zero entries executed.
///
/// # Errors
///
/// Returns the first [`ResolveError`] found, in registry order.
pub fn validate(suite: &Suite) -> Result<(), ResolveError> {
    for entry in suite.entries() {
        resolve(suite, entry)?;
    }
    Ok(())
}
