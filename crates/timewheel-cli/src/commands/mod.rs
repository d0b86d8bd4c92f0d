pub mod day;
pub mod task;
pub mod template;

use timewheel_engine::{IdGenerator, SequentialIds, UuidIds};

/// Id source picked by `--sequential-ids`.
pub enum CliIds {
    Random(UuidIds),
    Sequential(SequentialIds),
}

impl CliIds {
    pub fn new(sequential: bool) -> Self {
        if sequential {
            CliIds::Sequential(SequentialIds::new("task"))
        } else {
            CliIds::Random(UuidIds::new("task"))
        }
    }
}

impl IdGenerator for CliIds {
    fn next_id(&mut self) -> String {
        match self {
            CliIds::Random(ids) => ids.next_id(),
            CliIds::Sequential(ids) => ids.next_id(),
        }
    }
}
