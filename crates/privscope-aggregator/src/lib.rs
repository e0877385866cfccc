//! Privscope Aggregator - long-lived owner of per-tab observation state
//!
//! Ingests the network feed, the tab lifecycle feed and sensor messages, and
//! answers domain queries for the reporter.

pub mod aggregator;
pub mod domains;
pub mod event_loop;

pub use aggregator::{Aggregator, AggregatorConfig};
pub use domains::DomainTable;
pub use event_loop::EventLoopStats;
pub use privscope_core::SessionKey;
