use crate::suite::entry::Entry;

/// Reserved name for the suite-level setup routine.
pub const SETUP_NAME: &str = "global_setup";

/// Reserved name for the suite-level teardown routine.
pub const TEARDOWN_NAME: &str = "global_teardown";

/// A registered collection of test entries plus the optional suite-level
/// setup and teardown routines.
///
/// Entries keep their registration order; the dispatcher attempts them in
/// that order within each pass.
pub struct Suite {
    pub name: String,
    entries: Vec<Entry>,
    setup: Option<Entry>,
    teardown: Option<Entry>,
}

impl Suite {
    /// Start building a suite with the given name.
    pub fn builder(name: impl Into<String>) -> SuiteBuilder {
        SuiteBuilder {
            name: name.into(),
            entries: Vec::new(),
            setup: None,
            teardown: None,
        }
    }

    /// All test entries, in registration order.
    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    /// Look up a test entry by name.
    pub fn entry(&self, name: &str) -> Option<&Entry> {
        self.entries.iter().find(|e| e.name == name)
    }

    /// The suite-level setup routine, if one was registered.
    pub fn setup(&self) -> Option<&Entry> {
        self.setup.as_ref()
    }

    /// The suite-level teardown routine, if one was registered.
    pub fn teardown(&self) -> Option<&Entry> {
        self.teardown.as_ref()
    }

    /// Total number of declared dependency edges across all entries.
    pub fn dependency_count(&self) -> usize {
        self.entries.iter().map(|e| e.dependencies.len()).sum()
    }
}

impl std::fmt::Debug for Suite {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Suite")
            .field("name", &self.name)
            .field("entries", &self.entries)
            .field("setup", &self.setup.is_some())
            .field("teardown", &self.teardown.is_some())
            .finish()
    }
}

/// Builder that classifies registered members by naming convention.
///
/// Members named `test_*` become entries; the exact names `global_setup` and
/// `global_teardown` become the suite routines. Anything else is ignored.
pub struct SuiteBuilder {
    name: String,
    entries: Vec<Entry>,
    setup: Option<Entry>,
    teardown: Option<Entry>,
}

impl SuiteBuilder {
    /// Register a member. Classification happens by the member's name;
    /// registering an entry name a second time replaces the earlier body in
    /// place (names are unique within a suite).
    pub fn member(mut self, member: Entry) -> Self {
        if member.name == SETUP_NAME {
            self.setup = Some(member);
        } else if member.name == TEARDOWN_NAME {
            self.teardown = Some(member);
        } else if is_entry_name(&member.name) {
            if let Some(existing) = self.entries.iter_mut().find(|e| e.name == member.name) {
                *existing = member;
            } else {
                self.entries.push(member);
            }
        }
        self
    }

    /// Finish the build. Never fails; malformed dependency declarations are
    /// caught by the resolver before dispatch.
    pub fn build(self) -> Suite {
        Suite {
            name: self.name,
            entries: self.entries,
            setup: self.setup,
            teardown: self.teardown,
        }
    }
}

/// Whether a member name matches the test-entry convention (`test_` followed
/// by at least one word character).
fn is_entry_name(name: &str) -> bool {
    name.strip_prefix("test_")
        .is_some_and(|rest| !rest.is_empty())
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_')
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{Value, json};

    fn noop(name: &str) -> Entry {
        Entry::new(name, |_| Ok(Value::Null))
    }

    #[test]
    fn builder_collects_entries_in_registration_order() {
        let suite = Suite::builder("simple")
            .member(noop("test_d"))
            .member(noop("test_c"))
            .member(noop("test_b"))
            .build();
        let names: Vec<&str> = suite.entries().iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["test_d", "test_c", "test_b"]);
    }

    #[test]
    fn builder_classifies_setup_and_teardown_by_exact_name() {
        let suite = Suite::builder("simple")
            .member(noop("global_setup"))
            .member(noop("test_a"))
            .member(noop("global_teardown"))
            .build();
        assert!(suite.setup().is_some());
        assert!(suite.teardown().is_some());
        assert_eq!(suite.entries().len(), 1);
    }

    #[test]
    fn builder_ignores_non_matching_names() {
        let suite = Suite::builder("simple")
            .member(noop("helper"))
            .member(noop("test"))
            .member(noop("test_"))
            .member(noop("setup"))
            .build();
        assert!(suite.entries().is_empty());
        assert!(suite.setup().is_none());
        assert!(suite.teardown().is_none());
    }

    #[test]
    fn builder_replaces_duplicate_entry_name_in_place() {
        let suite = Suite::builder("simple")
            .member(noop("test_a"))
            .member(noop("test_b"))
            .member(Entry::new("test_a", |_| Ok(json!("second"))))
            .build();
        assert_eq!(suite.entries().len(), 2);
        assert_eq!(suite.entries()[0].name, "test_a");
        assert_eq!(suite.entries()[1].name, "test_b");
    }

    #[test]
    fn entry_lookup_by_name() {
        let suite = Suite::builder("simple")
            .member(noop("test_a"))
            .build();
        assert!(suite.entry("test_a").is_some());
        assert!(suite.entry("test_b").is_none());
    }

    #[test]
    fn dependency_count_sums_all_edges() {
        let suite = Suite::builder("simple")
            .member(noop("test_c"))
            .member(
                Entry::new("test_b", |_| Ok(Value::Null))
                    .depend_on("test_c", false)
                    .unwrap(),
            )
            .member(
                Entry::new("test_a", |_| Ok(Value::Null))
                    .depend_on("test_b", true)
                    .unwrap()
                    .depend_on("test_c", false)
                    .unwrap(),
            )
            .build();
        assert_eq!(suite.dependency_count(), 3);
    }

    #[test]
    fn entry_name_convention() {
        assert!(is_entry_name("test_a"));
        assert!(is_entry_name("test_login_flow"));
        assert!(is_entry_name("test_1"));
        assert!(!is_entry_name("test_"));
        assert!(!is_entry_name("test"));
        assert!(!is_entry_name("mytest_a"));
        assert!(!is_entry_name("test_a-b"));
    }
}
