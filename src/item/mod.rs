/// CSV item reader and writer.
pub mod csv;

/// Processor wrapping record fields in a quote string.
pub mod encapsulate;
