use serde::{Deserialize, Serialize};
use std::sync::mpsc::Sender;

/// Operation announced by a mind map instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "name", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum Operation {
    BeginEdit {
        node_id: String,
    },
    FinishEdit {
        node_id: String,
        topic: String,
        origin: String,
    },
}

impl Operation {
    pub fn name(&self) -> &'static str {
        match self {
            Operation::BeginEdit { .. } => "beginEdit",
            Operation::FinishEdit { .. } => "finishEdit",
        }
    }

    pub fn node_id(&self) -> &str {
        match self {
            Operation::BeginEdit { node_id } | Operation::FinishEdit { node_id, .. } => node_id,
        }
    }
}

/// Fire-and-forget receiver of [`Operation`]s.
pub trait OperationSink {
    fn fire(&self, op: Operation);
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NoopSink;

impl OperationSink for NoopSink {
    fn fire(&self, _op: Operation) {}
}

impl OperationSink for Sender<Operation> {
    fn fire(&self, op: Operation) {
        // A dropped receiver just means nobody is listening.
        let _ = self.send(op);
    }
}
