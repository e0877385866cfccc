//! Simulated browser host
//!
//! Stands in for the platform during trace replay: open tabs and their URLs,
//! the focused tab, the cookie jar and per-tab badges. Page-side APIs for the
//! sensors are the `Sim*` types at the bottom.

use dashmap::DashMap;
use privscope_core::{
    ActiveTab, ActiveTabInfo, Badge, BadgeSink, Cookie, CookieJar, Error, Result, SessionKey,
    TabLookup,
};
use privscope_sensors::{CanvasContext2d, CanvasElement, ImageData, Location};
use tokio::sync::RwLock;
use tracing::debug;

#[derive(Default)]
pub struct SimulatedBrowser {
    tabs: DashMap<SessionKey, String>,
    active: RwLock<Option<SessionKey>>,
    cookies: DashMap<String, Vec<Cookie>>,
    badges: DashMap<SessionKey, Badge>,
}

impl SimulatedBrowser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open or navigate a tab. A newly opened tab takes focus.
    pub async fn open_tab(&self, session: SessionKey, url: &str) {
        let previous = self.tabs.insert(session, url.to_string());
        if previous.is_none() {
            *self.active.write().await = Some(session);
        }
        debug!("Tab {} at {}", session, url);
    }

    /// Returns false if the tab was not open.
    pub fn update_tab(&self, session: SessionKey, url: &str) -> bool {
        match self.tabs.get_mut(&session) {
            Some(mut current) => {
                *current = url.to_string();
                true
            }
            None => false,
        }
    }

    pub async fn close_tab(&self, session: SessionKey) -> bool {
        let removed = self.tabs.remove(&session).is_some();
        self.badges.remove(&session);
        let mut active = self.active.write().await;
        if *active == Some(session) {
            *active = None;
        }
        removed
    }

    pub async fn activate(&self, session: SessionKey) -> Result<()> {
        if !self.tabs.contains_key(&session) {
            return Err(Error::TabNotFound(session.to_string()));
        }
        *self.active.write().await = Some(session);
        Ok(())
    }

    pub fn add_cookie(&self, url: &str, cookie: Cookie) {
        self.cookies.entry(url.to_string()).or_default().push(cookie);
    }

    pub fn badge(&self, session: &SessionKey) -> Option<Badge> {
        self.badges.get(session).map(|badge| badge.clone())
    }
}

#[async_trait::async_trait]
impl TabLookup for SimulatedBrowser {
    async fn tab_url(&self, session: SessionKey) -> Result<String> {
        self.tabs
            .get(&session)
            .map(|url| url.clone())
            .ok_or_else(|| Error::tab_lookup(session, "No tab with id"))
    }
}

#[async_trait::async_trait]
impl BadgeSink for SimulatedBrowser {
    async fn set_badge(&self, session: SessionKey, badge: &Badge) -> Result<()> {
        if !self.tabs.contains_key(&session) {
            return Err(Error::Badge(format!("tab {} is not open", session)));
        }
        self.badges.insert(session, badge.clone());
        Ok(())
    }
}

#[async_trait::async_trait]
impl CookieJar for SimulatedBrowser {
    async fn cookies_for_url(&self, url: &str) -> Result<Vec<Cookie>> {
        Ok(self
            .cookies
            .get(url)
            .map(|cookies| cookies.clone())
            .unwrap_or_default())
    }
}

#[async_trait::async_trait]
impl ActiveTab for SimulatedBrowser {
    async fn active_tab(&self) -> Result<ActiveTabInfo> {
        let session = (*self.active.read().await).ok_or(Error::NoActiveTab)?;
        let url = self.tab_url(session).await?;
        Ok(ActiveTabInfo { session, url })
    }
}

// ---------------------------------------------------------------------------
// Page-side APIs
// ---------------------------------------------------------------------------

/// Blank canvas.
pub struct SimCanvas;

impl CanvasElement for SimCanvas {
    type Error = std::convert::Infallible;

    fn to_data_url(&self, mime_type: Option<&str>, _quality: Option<f64>) -> std::result::Result<String, Self::Error> {
        Ok(format!("data:{};base64,", mime_type.unwrap_or("image/png")))
    }
}

pub struct SimContext;

impl CanvasContext2d for SimContext {
    type Error = std::convert::Infallible;

    fn get_image_data(&self, _sx: i32, _sy: i32, sw: u32, sh: u32) -> std::result::Result<ImageData, Self::Error> {
        Ok(ImageData {
            width: sw,
            height: sh,
            data: vec![0; (sw as usize) * (sh as usize) * 4],
        })
    }
}

/// Accepts every navigation. The tab URL only changes on `tabUpdated`.
pub struct SimLocation;

impl Location for SimLocation {
    type Error = std::convert::Infallible;

    fn assign(&self, url: &str) -> std::result::Result<(), Self::Error> {
        debug!("Simulated navigation to {}", url);
        Ok(())
    }
}
