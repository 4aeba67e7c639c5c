mod tracker;

pub use tracker::MutexProgressTracker;
