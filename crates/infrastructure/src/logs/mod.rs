mod finding_logger;

pub use finding_logger::FileFindingLogger;
