//! Privscope Reporter - on-demand privacy score for the active tab
//!
//! Pulls the aggregator's domain snapshot, the durable observation records
//! and a live cookie enumeration, reduces them to a 0–10 score, and hands a
//! finished `ReportBundle` to whatever renders it.

pub mod cookies;
pub mod format;
pub mod reporter;
pub mod score;

pub use cookies::{summarize_cookies, CookieSummary};
pub use format::{escape_html, format_item};
pub use reporter::{DetailList, ReportBundle, ScoreReporter};
pub use score::{calculate_privacy_score, Deduction, PrivacyScore, ScoreInputs, Signal};
