// Scan pipeline — batch classification with audit bracketing.

pub mod scan;
