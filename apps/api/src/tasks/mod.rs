// Long-running dashboard actions (resume screening, skill matching, AI drafts).
// Work is delegated to a `TaskRunner`; the default runner only simulates latency.

pub mod handlers;
pub mod registry;
