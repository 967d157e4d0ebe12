//! Unique identifiers for IR entities.
//!
//! Every entity in the document carries a string id of the form
//! `"{type}_{counter}_{millis}"`. Counters are per-type and monotonic for the
//! lifetime of a [`crate::store::Store`]; they live outside the document so
//! undo cannot rewind them and recycle an id.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

macro_rules! id_type {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl $name {
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// The monotonic counter segment of the id, used for stable
            /// holder names in generated code.
            pub fn numeric_segment(&self) -> Option<u64> {
                self.0.split('_').nth(1)?.parse().ok()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_string())
            }
        }
    };
}

id_type!(
    /// Identifier for an element node in the UI tree.
    ElementId
);
id_type!(
    /// Identifier for a variable record. Variables are *referenced* by name;
    /// the id only distinguishes the record itself.
    VarId
);
id_type!(
    /// Identifier for a binding record.
    BindingId
);
id_type!(
    /// Identifier for an event registration.
    EventId
);
id_type!(
    /// Identifier for a conditional group.
    GroupId
);

/// Milliseconds since the Unix epoch.
pub(crate) fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

/// Per-type id counters.
///
/// Minting never reuses a counter value, even across undo/redo, so ids stay
/// unique for the store's lifetime.
#[derive(Debug, Default)]
pub(crate) struct IdGen {
    element: u64,
    variable: u64,
    binding: u64,
    event: u64,
    group: u64,
}

fn mint(prefix: &str, counter: &mut u64) -> String {
    *counter += 1;
    format!("{}_{}_{}", prefix, *counter, now_millis())
}

impl IdGen {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn element(&mut self) -> ElementId {
        ElementId(mint("element", &mut self.element))
    }

    pub fn variable(&mut self) -> VarId {
        VarId(mint("variable", &mut self.variable))
    }

    pub fn binding(&mut self) -> BindingId {
        BindingId(mint("binding", &mut self.binding))
    }

    pub fn event(&mut self) -> EventId {
        EventId(mint("event", &mut self.event))
    }

    pub fn group(&mut self) -> GroupId {
        GroupId(mint("group", &mut self.group))
    }

    /// Advance every counter past the ids already present in `doc`, so a
    /// store rebuilt from a persisted snapshot never mints a colliding id.
    pub fn resume_from(&mut self, doc: &crate::ir::IrDocument) {
        fn seg(id: &str) -> u64 {
            id.split('_').nth(1).and_then(|s| s.parse().ok()).unwrap_or(0)
        }

        for id in doc.elements.nodes.keys() {
            self.element = self.element.max(seg(id.as_str()));
        }
        for var in doc.variables.all() {
            self.variable = self.variable.max(seg(var.id.as_str()));
        }
        for binding in &doc.bindings {
            self.binding = self.binding.max(seg(binding.id.as_str()));
        }
        for entries in doc.events.values() {
            for event in entries {
                self.event = self.event.max(seg(event.id.as_str()));
            }
        }
        for id in doc.conditional_groups.keys() {
            self.group = self.group.max(seg(id.as_str()));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mint_shape() {
        let mut gen = IdGen::new();
        let id = gen.element();
        let parts: Vec<&str> = id.as_str().split('_').collect();
        assert_eq!(parts[0], "element");
        assert_eq!(parts[1], "1");
        assert!(parts[2].parse::<u64>().is_ok());
    }

    #[test]
    fn test_counters_are_per_type() {
        let mut gen = IdGen::new();
        gen.element();
        let e2 = gen.element();
        let v1 = gen.variable();
        assert_eq!(e2.numeric_segment(), Some(2));
        assert_eq!(v1.numeric_segment(), Some(1));
    }

    #[test]
    fn test_numeric_segment() {
        let id = ElementId::from("element_42_1700000000000");
        assert_eq!(id.numeric_segment(), Some(42));
    }
}
