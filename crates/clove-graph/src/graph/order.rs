//! Topological ordering of the require graph.

use tracing::debug;

use super::ModuleGraph;
use crate::error::CycleError;
use crate::index::RecordId;
use crate::record::SourceRecord;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mark {
    New,
    Active,
    Done,
}

/// One record being expanded by the depth-first walk.
struct Frame {
    id: RecordId,
    /// `(target, index into requires)` in require order
    edges: Vec<(RecordId, usize)>,
    next: usize,
}

impl ModuleGraph {
    /// Records in dependency order (dependencies first).
    ///
    /// The result is cached until the next mutation. Fails as a whole when the
    /// require graph contains a cycle.
    pub fn compute_order(&self) -> Result<Vec<&SourceRecord>, CycleError> {
        match self.order.get_or_init(|| self.topological_sort()) {
            Ok(ids) => Ok(ids.iter().filter_map(|&id| self.record(id)).collect()),
            Err(cycle) => Err(cycle.clone()),
        }
    }

    /// The cycle found by ordering, if any.
    pub fn cycle(&self) -> Option<CycleError> {
        self.cycle_ref().cloned()
    }

    pub(super) fn cycle_ref(&self) -> Option<&CycleError> {
        self.order.get_or_init(|| self.topological_sort()).as_ref().err()
    }

    /// Ordering edges of a record: resolved, non type-only requires to
    /// another record. Self-references and missing requires add nothing.
    fn edges(&self, id: RecordId) -> Vec<(RecordId, usize)> {
        let Some(record) = self.record(id) else {
            return Vec::new();
        };
        record
            .requires
            .iter()
            .enumerate()
            .filter(|(_, require)| !require.is_type_only())
            .filter_map(|(idx, require)| {
                self.resolve_require(record, &require.namespace)
                    .target()
                    .filter(|&target| target != id)
                    .map(|target| (target, idx))
            })
            .collect()
    }

    fn topological_sort(&self) -> Result<Vec<RecordId>, CycleError> {
        let count = self.records.len();
        let mut marks = vec![Mark::New; count];
        let mut order = Vec::with_capacity(count);
        let mut stack: Vec<Frame> = Vec::new();

        for root in 0..count {
            if marks[root] != Mark::New {
                continue;
            }
            marks[root] = Mark::Active;
            stack.push(Frame {
                id: root,
                edges: self.edges(root),
                next: 0,
            });

            while let Some(frame) = stack.last_mut() {
                let Some(&(target, _)) = frame.edges.get(frame.next) else {
                    marks[frame.id] = Mark::Done;
                    order.push(frame.id);
                    stack.pop();
                    continue;
                };
                frame.next += 1;

                match marks[target] {
                    Mark::Done => {}
                    Mark::Active => return Err(self.extract_cycle(&stack, target)),
                    Mark::New => {
                        marks[target] = Mark::Active;
                        stack.push(Frame {
                            id: target,
                            edges: self.edges(target),
                            next: 0,
                        });
                    }
                }
            }
        }

        debug!(modules = order.len(), "computed module order");
        Ok(order)
    }

    /// Cycle from the active frame of `target` to the top of the stack.
    fn extract_cycle(&self, stack: &[Frame], target: RecordId) -> CycleError {
        let start = stack
            .iter()
            .position(|frame| frame.id == target)
            .unwrap_or(0);

        let mut files = Vec::new();
        let mut namespaces = Vec::new();
        for frame in &stack[start..] {
            let Some(record) = self.record(frame.id) else {
                continue;
            };
            files.push(record.request.clone());
            let via = frame
                .next
                .checked_sub(1)
                .and_then(|edge| frame.edges.get(edge))
                .and_then(|&(_, require)| record.requires.get(require))
                .map(|require| require.namespace.clone())
                .unwrap_or_default();
            namespaces.push(via);
        }

        CycleError { files, namespaces }
    }
}
