use crate::assets::raster::RasterImage;
use crate::foundation::core::{Canvas, Fps, Rgb8};
use crate::timeline::window::{Fade, TimeWindow};

/// What a layer shows.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LayerKind {
    /// Full-frame background color.
    Background,
    /// Persistent header line.
    Header,
    /// One wrapped caption line.
    Caption {
        /// Slide index.
        slide: usize,
        /// Source line index within the slide.
        line: usize,
        /// Wrapped part index within the source line.
        part: usize,
    },
    /// One image item.
    Image {
        /// Index in the manifest's image list.
        index: usize,
    },
}

/// Pixels a layer paints.
#[derive(Clone, Debug, PartialEq)]
pub enum Paint {
    /// Opaque color covering the layer rectangle.
    Solid {
        /// Fill color.
        color: Rgb8,
        /// Rectangle width.
        width: u32,
        /// Rectangle height.
        height: u32,
    },
    /// Premultiplied raster.
    Raster(RasterImage),
}

impl Paint {
    /// Painted size in pixels.
    pub fn size(&self) -> (u32, u32) {
        match self {
            Self::Solid { width, height, .. } => (*width, *height),
            Self::Raster(img) => (img.width, img.height),
        }
    }
}

/// Positioned, timed element of the composite.
#[derive(Clone, Debug, PartialEq)]
pub struct Layer {
    /// What the layer shows.
    pub kind: LayerKind,
    /// Pixels.
    pub paint: Paint,
    /// Source text for text layers.
    pub text: Option<String>,
    /// Left edge on the canvas.
    pub x: i32,
    /// Top edge on the canvas.
    pub y: i32,
    /// Visibility window.
    pub window: TimeWindow,
    /// Opacity ramps.
    pub fade: Fade,
}

impl Layer {
    /// Opacity at time `t`.
    pub fn opacity_at(&self, t: f64) -> f32 {
        self.fade.opacity_at(self.window, t)
    }

    /// Plan entry for this layer.
    pub fn summary(&self) -> LayerSummary {
        let (width, height) = self.paint.size();
        LayerSummary {
            kind: self.kind,
            text: self.text.clone(),
            x: self.x,
            y: self.y,
            width,
            height,
            window: self.window,
            fade: self.fade,
        }
    }
}

/// Content item dropped while building the composite.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct SkippedItem {
    /// Manifest location, e.g. `images[3]`.
    pub item: String,
    /// Why it was dropped.
    pub reason: String,
}

/// Layer as shown by the `plan` surface.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct LayerSummary {
    /// What the layer shows.
    #[serde(flatten)]
    pub kind: LayerKind,
    /// Caption text, when the layer is text.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    /// Left edge.
    pub x: i32,
    /// Top edge.
    pub y: i32,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Visibility window.
    pub window: TimeWindow,
    /// Opacity ramps.
    pub fade: Fade,
}

/// Serializable description of a built composite.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct LayerPlan {
    /// Output canvas.
    pub canvas: Canvas,
    /// Output frame rate.
    pub fps: Fps,
    /// Duration in seconds.
    pub duration: f64,
    /// Frames that will be rendered.
    pub frame_count: u64,
    /// Layers in paint order.
    pub layers: Vec<LayerSummary>,
    /// Dropped content.
    pub skipped: Vec<SkippedItem>,
}
