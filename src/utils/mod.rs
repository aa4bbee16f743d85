//! Internal, backend-agnostic helpers. Not part of the public API.

#[macro_use]
pub(crate) mod log;
