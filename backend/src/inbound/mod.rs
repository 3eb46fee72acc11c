//! Inbound adapters translating external requests into domain calls.
//!
//! Framework details stay here; handlers depend on driving ports only.

pub mod http;
