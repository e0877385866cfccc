//! One-shot sensor injection into a page

use crate::canvas::{InstrumentedCanvas, InstrumentedContext2d};
use crate::navigation::{HijackMonitor, InstrumentedLocation};
use crate::sink::MessageSink;
use crate::storage::{capture_storage, StorageArea};
use std::sync::Arc;

/// The page APIs a sensor set instruments.
pub struct PageApis<Local, Session, Canvas, Context, Loc> {
    pub local_storage: Local,
    pub session_storage: Session,
    pub canvas: Canvas,
    pub context_2d: Context,
    pub location: Loc,
}

/// The page as seen after injection: every instrumented entry point goes
/// through its wrapper.
pub struct InjectedPage<Canvas, Context, Loc> {
    pub canvas: InstrumentedCanvas<Canvas>,
    pub context_2d: InstrumentedContext2d<Context>,
    pub location: InstrumentedLocation<Loc>,
    pub unload: HijackMonitor,
}

pub struct SensorInjection;

impl SensorInjection {
    /// Capture storage once, then register the canvas, navigation and unload
    /// wrappers. All sensors share `sink`.
    pub fn inject<Local, Session, Canvas, Context, Loc>(
        page: PageApis<Local, Session, Canvas, Context, Loc>,
        sink: Arc<dyn MessageSink>,
    ) -> InjectedPage<Canvas, Context, Loc>
    where
        Local: StorageArea,
        Session: StorageArea,
    {
        capture_storage(&page.local_storage, &page.session_storage, sink.as_ref());

        InjectedPage {
            canvas: InstrumentedCanvas::new(page.canvas, sink.clone()),
            context_2d: InstrumentedContext2d::new(page.context_2d, sink.clone()),
            location: InstrumentedLocation::new(page.location, sink.clone()),
            unload: HijackMonitor::new(sink),
        }
    }
}
