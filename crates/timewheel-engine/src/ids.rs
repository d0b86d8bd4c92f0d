//! Task id generation.
//!
//! Every operation that creates tasks takes an [`IdGenerator`] so callers can
//! swap random ids for a predictable sequence in tests.

/// Source of fresh, unique task ids.
pub trait IdGenerator {
    fn next_id(&mut self) -> String;
}

/// Random v4 UUIDs behind a fixed prefix, e.g. `template-6f1c…`.
#[derive(Debug, Clone)]
pub struct UuidIds {
    prefix: String,
}

impl UuidIds {
    pub fn new(prefix: &str) -> Self {
        Self {
            prefix: prefix.to_string(),
        }
    }
}

impl Default for UuidIds {
    fn default() -> Self {
        Self::new("task")
    }
}

impl IdGenerator for UuidIds {
    fn next_id(&mut self) -> String {
        format!("{}-{}", self.prefix, uuid::Uuid::new_v4())
    }
}

/// Counter-based ids: `prefix-1`, `prefix-2`, …
#[derive(Debug, Clone)]
pub struct SequentialIds {
    prefix: String,
    next: u64,
}

impl SequentialIds {
    pub fn new(prefix: &str) -> Self {
        Self {
            prefix: prefix.to_string(),
            next: 1,
        }
    }
}

impl IdGenerator for SequentialIds {
    fn next_id(&mut self) -> String {
        let id = format!("{}-{}", self.prefix, self.next);
        self.next += 1;
        id
    }
}

impl<F> IdGenerator for F
where
    F: FnMut() -> String,
{
    fn next_id(&mut self) -> String {
        self()
    }
}
