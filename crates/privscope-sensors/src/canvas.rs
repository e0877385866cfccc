//! Canvas readback interposition

use crate::sink::MessageSink;
use privscope_core::{CanvasMethod, SensorMessage};
use std::sync::Arc;
use tracing::debug;

/// Pixel buffer returned by a 2D context readback.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ImageData {
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
}

/// The canvas element's data-URL export.
pub trait CanvasElement {
    type Error;

    fn to_data_url(&self, mime_type: Option<&str>, quality: Option<f64>) -> Result<String, Self::Error>;
}

/// The 2D context's pixel-buffer readback.
pub trait CanvasContext2d {
    type Error;

    fn get_image_data(&self, sx: i32, sy: i32, sw: u32, sh: u32) -> Result<ImageData, Self::Error>;
}

/// Wraps a canvas element; reports every `toDataURL` call, then delegates.
pub struct InstrumentedCanvas<C> {
    inner: C,
    sink: Arc<dyn MessageSink>,
}

impl<C> InstrumentedCanvas<C> {
    pub fn new(inner: C, sink: Arc<dyn MessageSink>) -> Self {
        Self { inner, sink }
    }

    pub fn inner(&self) -> &C {
        &self.inner
    }

    pub fn into_inner(self) -> C {
        self.inner
    }
}

impl<C: CanvasElement> CanvasElement for InstrumentedCanvas<C> {
    type Error = C::Error;

    fn to_data_url(&self, mime_type: Option<&str>, quality: Option<f64>) -> Result<String, Self::Error> {
        debug!("Canvas toDataURL method called.");
        self.sink.send(SensorMessage::canvas_access(CanvasMethod::ToDataUrl));
        self.inner.to_data_url(mime_type, quality)
    }
}

/// Wraps a 2D context; reports every `getImageData` call, then delegates.
pub struct InstrumentedContext2d<C> {
    inner: C,
    sink: Arc<dyn MessageSink>,
}

impl<C> InstrumentedContext2d<C> {
    pub fn new(inner: C, sink: Arc<dyn MessageSink>) -> Self {
        Self { inner, sink }
    }

    pub fn inner(&self) -> &C {
        &self.inner
    }

    pub fn into_inner(self) -> C {
        self.inner
    }
}

impl<C: CanvasContext2d> CanvasContext2d for InstrumentedContext2d<C> {
    type Error = C::Error;

    fn get_image_data(&self, sx: i32, sy: i32, sw: u32, sh: u32) -> Result<ImageData, Self::Error> {
        debug!("Canvas getImageData method called.");
        self.sink.send(SensorMessage::canvas_access(CanvasMethod::GetImageData));
        self.inner.get_image_data(sx, sy, sw, sh)
    }
}
