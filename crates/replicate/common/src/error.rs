//! Library-facing error types.
//!
//! Per the error handling design (§7), almost nothing here surfaces as a
//! `Result`: malformed frames, unknown ids, scope violations, and type
//! mismatches are all silent no-ops by design, observable only through
//! tracing. Local id exhaustion is the sole condition that is fatal to
//! the calling operation.

use thiserror::Error;

/// The client's negative-id counter could not produce an unused local id.
/// Fatal to the create-entity call that triggered it; the caller gets
/// this back synchronously rather than the entity silently failing to
/// appear.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("exhausted the range of available client-local entity ids")]
pub struct LocalIdExhausted;
