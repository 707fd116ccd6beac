//! State is organized through [routine_store::RoutineStore].
//! The basic idea is:
//!  - The catalog of tasks is static and compiled in.
//!  - Completion state lives in memory for the session and is mirrored into a
//!    [local_store::LocalStore] after every mutation.
//!  - The durable layout is two JSON values: today's completions and the per-day history.

pub mod local_store;
pub mod routine_store;
