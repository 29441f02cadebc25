//! upcheck - a minimal status page service
//!
//! Reports its own liveness/readiness and probes a statically-configured
//! list of downstream services on demand, mapping each probe to a binary
//! "up"/"down" verdict. No history, no thresholds, no retries: every
//! `/status/{serviceId}` request performs one fresh probe.

pub mod checker;
pub mod config;
pub mod server;
