//! Scoring policy
//!
//! Start at 10, apply every deduction whose condition holds, floor at 0.
//!
//! | Signal               | Condition | Deduction |
//! |----------------------|-----------|-----------|
//! | third-party domains  | > 5       | 2         |
//! | cookies              | > 10      | 1         |
//! | local-storage items  | > 5       | 1         |
//! | canvas access        | present   | 2         |
//! | hijack attempt       | present   | 4         |

use serde::Serialize;
use tracing::debug;

pub const MAX_SCORE: u8 = 10;

const DOMAIN_THRESHOLD: usize = 5;
const COOKIE_THRESHOLD: usize = 10;
const LOCAL_STORAGE_THRESHOLD: usize = 5;

/// The signals the score is computed from.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ScoreInputs {
    pub third_party_domains: usize,
    pub cookies: usize,
    pub local_storage_items: usize,
    /// Reported alongside the others; carries no deduction.
    pub session_storage_items: usize,
    pub canvas_access: bool,
    pub hijacking_attempt: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Signal {
    ThirdPartyDomains,
    Cookies,
    LocalStorage,
    CanvasAccess,
    Hijacking,
}

impl Signal {
    pub fn describe(self) -> &'static str {
        match self {
            Self::ThirdPartyDomains => "third-party domains",
            Self::Cookies => "number of cookies",
            Self::LocalStorage => "local storage items",
            Self::CanvasAccess => "canvas access",
            Self::Hijacking => "potential hijacking",
        }
    }
}

/// One applied deduction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct Deduction {
    pub signal: Signal,
    pub points: u8,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct PrivacyScore {
    pub value: u8,
    pub deductions: Vec<Deduction>,
}

impl PrivacyScore {
    pub fn total_deducted(&self) -> u32 {
        self.deductions.iter().map(|d| u32::from(d.points)).sum()
    }
}

impl std::fmt::Display for PrivacyScore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.value, MAX_SCORE)
    }
}

pub fn calculate_privacy_score(inputs: &ScoreInputs) -> PrivacyScore {
    let rules = [
        (inputs.third_party_domains > DOMAIN_THRESHOLD, Signal::ThirdPartyDomains, 2),
        (inputs.cookies > COOKIE_THRESHOLD, Signal::Cookies, 1),
        (inputs.local_storage_items > LOCAL_STORAGE_THRESHOLD, Signal::LocalStorage, 1),
        (inputs.canvas_access, Signal::CanvasAccess, 2),
        (inputs.hijacking_attempt, Signal::Hijacking, 4),
    ];

    let deductions: Vec<Deduction> = rules
        .into_iter()
        .filter(|(applies, _, _)| *applies)
        .map(|(_, signal, points)| {
            debug!("Privacy score decreased by {} due to {}.", points, signal.describe());
            Deduction { signal, points }
        })
        .collect();

    let deducted: u32 = deductions.iter().map(|d| u32::from(d.points)).sum();
    let value = u32::from(MAX_SCORE).saturating_sub(deducted) as u8;
    PrivacyScore { value, deductions }
}
