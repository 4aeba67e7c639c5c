/// Thread-/task-safe completion counter for one stage (spec.md §4.2).
///
/// An explicitly owned value handed to each stage, not a singleton
/// (spec.md §9 Design Notes).
pub trait ProgressSink: Send + Sync {
    fn reset(&self, total: usize);
    fn done(&self);
}
