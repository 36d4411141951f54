//! Viewport controller: fits the visible bounding box into the canvas and
//! tracks user zoom/pan between fits.

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::domain::geometry::Point;
use crate::domain::layout::Layout;

/// Canvas size in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewportSize {
    pub width: f64,
    pub height: f64,
}

impl ViewportSize {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    pub fn center(&self) -> Point {
        Point::new(self.width / 2.0, self.height / 2.0)
    }
}

/// Camera transform: `screen = tree * scale + translate`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub translate_x: f64,
    pub translate_y: f64,
    pub scale: f64,
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Transform {
    pub const IDENTITY: Transform = Transform {
        translate_x: 0.0,
        translate_y: 0.0,
        scale: 1.0,
    };

    pub fn apply(&self, p: Point) -> Point {
        Point::new(
            p.x * self.scale + self.translate_x,
            p.y * self.scale + self.translate_y,
        )
    }

    pub fn invert(&self, screen: Point) -> Point {
        Point::new(
            (screen.x - self.translate_x) / self.scale,
            (screen.y - self.translate_y) / self.scale,
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewportConfig {
    /// Margin kept free on every side when fitting
    pub padding: f64,
    /// Upper bound for a fitted scale, so tiny trees are not blown up
    pub max_fit_scale: f64,
    pub min_zoom: f64,
    pub max_zoom: f64,
    pub zoom_in_factor: f64,
    pub zoom_out_factor: f64,
    /// Fit right after each visible-set change instead of waiting for
    /// the renderer to report settled transitions
    pub fit_immediately: bool,
    /// Duration the renderer should use for node/edge transitions
    pub transition_ms: u64,
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self {
            padding: 40.0,
            max_fit_scale: 0.85,
            min_zoom: 0.2,
            max_zoom: 3.0,
            zoom_in_factor: 1.3,
            zoom_out_factor: 0.7,
            fit_immediately: false,
            transition_ms: 400,
        }
    }
}

impl ViewportConfig {
    pub fn clamp_scale(&self, scale: f64) -> f64 {
        scale.clamp(self.min_zoom, self.max_zoom.max(self.min_zoom))
    }
}

/// Transform that centers every visible footprint in the viewport.
///
/// Returns None when nothing is visible or the viewport has no usable area;
/// callers treat that as a no-op.
pub fn fit_to_view(
    layout: &Layout,
    viewport: ViewportSize,
    config: &ViewportConfig,
) -> Option<Transform> {
    let bounds = layout.bounds()?;
    let avail_w = viewport.width - 2.0 * config.padding;
    let avail_h = viewport.height - 2.0 * config.padding;
    if avail_w <= 0.0 || avail_h <= 0.0 {
        return None;
    }

    let sx = avail_w / bounds.width().max(1.0);
    let sy = avail_h / bounds.height().max(1.0);
    let scale = config.clamp_scale(sx.min(sy).min(config.max_fit_scale));

    let center = bounds.center();
    let screen = viewport.center();
    Some(Transform {
        translate_x: screen.x - center.x * scale,
        translate_y: screen.y - center.y * scale,
        scale,
    })
}

/// Current camera state: either the last fit, or a user override of it.
#[derive(Debug, Clone)]
pub struct ViewportController {
    config: ViewportConfig,
    size: ViewportSize,
    transform: Transform,
    user_override: bool,
}

impl ViewportController {
    pub fn new(config: ViewportConfig, size: ViewportSize) -> Self {
        Self {
            config,
            size,
            transform: Transform::IDENTITY,
            user_override: false,
        }
    }

    pub fn config(&self) -> &ViewportConfig {
        &self.config
    }

    pub fn size(&self) -> ViewportSize {
        self.size
    }

    pub fn transform(&self) -> Transform {
        self.transform
    }

    pub fn is_user_override(&self) -> bool {
        self.user_override
    }

    /// Fit to `layout`, discarding any user zoom/pan. Empty layouts leave
    /// the transform untouched.
    #[instrument(level = "debug", skip(self, layout))]
    pub fn fit(&mut self, layout: &Layout) -> Transform {
        if let Some(fitted) = fit_to_view(layout, self.size, &self.config) {
            debug!(?fitted, "fit to view");
            self.transform = fitted;
            self.user_override = false;
        }
        self.transform
    }

    pub fn resize(&mut self, size: ViewportSize, layout: &Layout) -> Transform {
        self.size = size;
        self.fit(layout)
    }

    /// Scale by `factor` about the viewport center, within the zoom extent.
    pub fn zoom_by(&mut self, factor: f64) -> Transform {
        let anchor = self.size.center();
        let world = self.transform.invert(anchor);
        let scale = self.config.clamp_scale(self.transform.scale * factor);
        self.transform = Transform {
            translate_x: anchor.x - world.x * scale,
            translate_y: anchor.y - world.y * scale,
            scale,
        };
        self.user_override = true;
        self.transform
    }

    pub fn zoom_in(&mut self) -> Transform {
        self.zoom_by(self.config.zoom_in_factor)
    }

    pub fn zoom_out(&mut self) -> Transform {
        self.zoom_by(self.config.zoom_out_factor)
    }

    pub fn pan_by(&mut self, dx: f64, dy: f64) -> Transform {
        self.transform.translate_x += dx;
        self.transform.translate_y += dy;
        self.user_override = true;
        self.transform
    }

    /// Adopt a transform produced by an external gesture handler.
    pub fn set_transform(&mut self, transform: Transform) {
        self.transform = Transform {
            scale: self.config.clamp_scale(transform.scale),
            ..transform
        };
        self.user_override = true;
    }
}
