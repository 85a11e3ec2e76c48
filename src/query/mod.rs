//! Query subsystem
//!
//! Parses query records (values, operator, range directive) and
//! resolves them against a forward index. Validation errors are raised
//! before any lookup; resolution itself cannot fail.

mod engine;
mod errors;
mod request;

pub use engine::{QueryEngine, QueryHits, QueryOutcome};
pub use errors::{QueryError, QueryResult};
pub use request::{Operator, QueryRecord, RangeDirective};
