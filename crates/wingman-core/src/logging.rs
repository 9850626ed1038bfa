//! Structured logging field name constants for the Wingman pipeline.
//!
//! All crates use these constants for consistent structured logging
//! fields, so log aggregation tools can query by standardized names
//! across every subsystem.
//!
//! ## Log Level Contract
//!
//! | Level | Usage |
//! |-------|-------|
//! | ERROR | Invocation failed, requires operator attention |
//! | WARN  | Recoverable issue, degraded result produced |
//! | INFO  | Lifecycle events, pipeline state transitions |
//! | DEBUG | Decision points, intermediate values |
//! | TRACE | Per-poll iteration, raw payload sizes |

/// Subsystem originating the log event.
/// Values: "api", "db", "video"
pub const SUBSYSTEM: &str = "subsystem";

/// Component within a subsystem.
/// Examples: "pipeline", "annotation_client", "analysis_records"
pub const COMPONENT: &str = "component";

/// Logical operation name.
/// Examples: "analyze", "submit", "poll", "upsert"
pub const OPERATION: &str = "op";

/// Interview session UUID being operated on.
pub const SESSION_ID: &str = "session_id";

/// User UUID the invocation resolved to.
pub const USER_ID: &str = "user_id";

/// External operation name assigned by the annotation service.
pub const OPERATION_NAME: &str = "operation_name";

/// Pipeline state at the time of the event.
pub const PIPELINE_STATE: &str = "state";

/// Wall-clock duration in milliseconds.
pub const DURATION_MS: &str = "duration_ms";

/// Boolean success/failure indicator.
pub const SUCCESS: &str = "success";

/// Error message when an operation fails.
pub const ERROR_MSG: &str = "error";
