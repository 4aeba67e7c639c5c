mod results_sink;

pub use results_sink::FileResultsSink;
