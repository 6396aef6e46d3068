//! Pure update-policy and statistics engine. Every function here is a
//! function of its arguments only: no store access, no clock, no ambient
//! state. The transport layer fetches data, calls in, and ships the result.

pub mod event;
pub mod policy;
pub mod record;
pub mod stats;
