use std::sync::Arc;

use parking_lot::RwLock;

use crate::command::Call;

use super::{Execution, LedgerProcessor, Receipt, in_memory_processor::InMemoryLedgerProcessor};

/// Thread-safe handle to a processor.
///
/// State-changing calls take the write lock and are therefore applied one at a
/// time, in lock acquisition order. Queries share the read lock, so any number
/// of them run together and each sees the state between two writes.
#[derive(Debug, Default)]
pub struct SharedLedgerProcessor<P = InMemoryLedgerProcessor> {
    inner: Arc<RwLock<P>>,
}

impl<P> Clone for SharedLedgerProcessor<P> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<P> SharedLedgerProcessor<P>
where
    P: LedgerProcessor,
{
    pub fn new(processor: P) -> Self {
        Self {
            inner: Arc::new(RwLock::new(processor)),
        }
    }

    pub fn process(&self, call: Call) -> Receipt {
        if call.operation.is_query() {
            let processor = self.inner.read();
            let result = processor.query(&call.operation).map(|output| Execution {
                output,
                events: Vec::new(),
            });
            return Receipt::from_result(result);
        }
        self.inner.write().process(call)
    }

    /// Runs `f` against a consistent snapshot of the processor.
    pub fn read<R>(&self, f: impl FnOnce(&P) -> R) -> R {
        f(&*self.inner.read())
    }
}
