//! Privscope host: trace replay against a simulated browser, plus terminal
//! rendering of the resulting report.

pub mod render;
pub mod replay;
pub mod sim;
pub mod trace;
