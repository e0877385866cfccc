//! Privscope Sensors - in-page instrumentation
//!
//! Each sensor observes one page API and forwards a `SensorMessage` through
//! a `MessageSink`, fire-and-forget. Interposition is done with explicit
//! wrapper types registered at injection time; a wrapper emits its message
//! and then delegates, returning the original result untouched.

pub mod canvas;
pub mod inject;
pub mod navigation;
pub mod sink;
pub mod storage;

pub use canvas::{CanvasContext2d, CanvasElement, ImageData, InstrumentedCanvas, InstrumentedContext2d};
pub use inject::{InjectedPage, PageApis, SensorInjection};
pub use navigation::{HijackMonitor, InstrumentedLocation, Location, UNLOAD_MESSAGE};
pub use sink::{MessageSink, RecordingSink, RuntimeSender};
pub use storage::{capture_storage, StorageArea};
