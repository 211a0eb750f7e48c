//! The 2-D color field widget.
//!
//! Wraps [`FieldState`](crate::field::FieldState) in a floem view: paints
//! the rasterized field (disc or square) scaled to the widget, draws the
//! selection marker, and maps pointer/keyboard input back into color picks.
//! The raster is cached and only re-generated when the field state reports
//! the bitmap stale (mode change, or fixed-axis change).

use std::sync::Arc;

use floem::kurbo::{Circle, Point, Rect};
use floem::peniko::{self, Blob, Color};

use floem::keyboard::{Key, NamedKey};
use floem::reactive::{create_effect, RwSignal, SignalGet};
use floem::views::Decorators;
use floem::{
    context::{ComputeLayoutCx, EventCx, PaintCx, UpdateCx},
    event::{Event, EventPropagation},
    View, ViewId,
};
use floem_renderer::Renderer;

use crate::constants;
use crate::field::{FieldState, FIELD_RASTER_SIZE};
use crate::mode::PickerMode;

enum FieldUpdate {
    Rgb(u8, u8, u8),
    Mode(PickerMode),
}

pub(crate) struct ColorFieldView {
    id: ViewId,
    held: bool,
    focused: bool,
    state: FieldState,
    size: floem::taffy::prelude::Size<f32>,
    on_change: Option<Box<dyn Fn(u8, u8, u8)>>,
    raster: Vec<u8>,
    img: Option<peniko::Image>,
    img_hash: Vec<u8>,
    img_stale: bool,
}

/// Creates the 2-D color field.
///
/// - `rgb`: the selection, written from the shared color model.
/// - `mode`: the active display mode.
/// - `on_change`: invoked with the new RGB bytes after a successful pick.
pub(crate) fn color_field(
    rgb: RwSignal<(u8, u8, u8)>,
    mode: RwSignal<PickerMode>,
    on_change: impl Fn(u8, u8, u8) + 'static,
) -> ColorFieldView {
    let id = ViewId::new();

    create_effect(move |_| {
        let (r, g, b) = rgb.get();
        id.update_state(FieldUpdate::Rgb(r, g, b));
    });

    create_effect(move |_| {
        let m = mode.get();
        id.update_state(FieldUpdate::Mode(m));
    });

    ColorFieldView {
        id,
        held: false,
        focused: false,
        state: FieldState::new(PickerMode::Brightness, FIELD_RASTER_SIZE),
        size: Default::default(),
        on_change: Some(Box::new(on_change)),
        raster: Vec::new(),
        img: None,
        img_hash: Vec::new(),
        img_stale: true,
    }
    .style(|s| {
        s.flex_grow(1.0)
            .aspect_ratio(1.0)
            .min_height(100.0)
            .cursor(floem::style::CursorStyle::Default)
    })
    .keyboard_navigable()
}

impl ColorFieldView {
    /// Side length of the square content region.
    fn side(&self) -> f64 {
        let w = self.size.width as f64;
        let h = self.size.height as f64;
        w.min(h)
    }

    /// The square rect centered within the widget where the field is drawn.
    fn content_rect(&self) -> Rect {
        let w = self.size.width as f64;
        let h = self.size.height as f64;
        let side = self.side();
        let x0 = (w - side) / 2.0;
        let y0 = (h - side) / 2.0;
        Rect::new(x0, y0, x0 + side, y0 + side)
    }

    /// Map a widget-space position into raster coordinates.
    fn to_raster(&self, pos: Point) -> (f64, f64) {
        let rect = self.content_rect();
        let scale = self.state.size() as f64 / self.side().max(1.0);
        ((pos.x - rect.x0) * scale, (pos.y - rect.y0) * scale)
    }

    /// Marker position in widget space.
    fn marker_position(&self) -> Point {
        let rect = self.content_rect();
        let scale = self.side() / self.state.size() as f64;
        let (px, py) = self.state.marker_point();
        Point::new(rect.x0 + px as f64 * scale, rect.y0 + py as f64 * scale)
    }

    /// Apply a pick at raster coordinates; fires the change callback when
    /// the selection actually moved.
    fn pick_raster(&mut self, x: f64, y: f64) {
        let update = self.state.pick(x, y);
        if update.image_stale {
            self.img_stale = true;
        }
        if update.changed {
            let (r, g, b) = self.state.rgb();
            if let Some(cb) = &self.on_change {
                cb(r, g, b);
            }
            self.id.request_paint();
        }
    }

    fn nudge(&mut self, dx: i32, dy: i32, multiplier: i32) {
        let (px, py) = self.state.marker_point();
        self.pick_raster(
            (px + dx * multiplier) as f64,
            (py + dy * multiplier) as f64,
        );
    }

    fn ensure_image(&mut self) {
        if self.img.is_some() && !self.img_stale {
            return;
        }
        let size = self.state.size();
        self.state.rasterize(&mut self.raster);
        let blob = Blob::new(Arc::new(self.raster.clone()));
        let id = blob.id();
        self.img = Some(peniko::Image::new(blob, peniko::Format::Rgba8, size, size));
        self.img_hash = id.to_le_bytes().to_vec();
        self.img_stale = false;
    }
}

impl View for ColorFieldView {
    fn id(&self) -> ViewId {
        self.id
    }

    fn update(&mut self, _cx: &mut UpdateCx, state: Box<dyn std::any::Any>) {
        if let Ok(update) = state.downcast::<FieldUpdate>() {
            match *update {
                FieldUpdate::Rgb(r, g, b) => {
                    let up = self.state.set_rgb(r, g, b);
                    if up.image_stale {
                        self.img_stale = true;
                    }
                }
                FieldUpdate::Mode(m) => {
                    if self.state.set_mode(m) {
                        self.img_stale = true;
                    }
                }
            }
            self.id.request_paint();
        }
    }

    fn event_before_children(&mut self, cx: &mut EventCx, event: &Event) -> EventPropagation {
        match event {
            Event::PointerDown(e) => {
                cx.update_active(self.id());
                self.id.request_focus();
                self.held = true;
                let (x, y) = self.to_raster(e.pos);
                self.pick_raster(x, y);
                EventPropagation::Stop
            }
            Event::PointerMove(e) => {
                if self.held {
                    let (x, y) = self.to_raster(e.pos);
                    self.pick_raster(x, y);
                    EventPropagation::Stop
                } else {
                    EventPropagation::Continue
                }
            }
            Event::PointerUp(_) => {
                self.held = false;
                EventPropagation::Continue
            }
            Event::KeyDown(ke) => {
                let (dx, dy) = match ke.key.logical_key {
                    Key::Named(NamedKey::ArrowLeft) => (-1, 0),
                    Key::Named(NamedKey::ArrowRight) => (1, 0),
                    Key::Named(NamedKey::ArrowUp) => (0, -1),
                    Key::Named(NamedKey::ArrowDown) => (0, 1),
                    _ => (0, 0),
                };
                if (dx, dy) == (0, 0) {
                    return EventPropagation::Continue;
                }
                let shift = ke.modifiers.shift();
                let alt = ke.modifiers.alt();
                let multiplier = if shift && alt {
                    10
                } else if shift || alt {
                    5
                } else {
                    1
                };
                self.nudge(dx, dy, multiplier);
                EventPropagation::Stop
            }
            Event::FocusGained => {
                self.focused = true;
                self.id.request_paint();
                EventPropagation::Continue
            }
            Event::FocusLost => {
                self.held = false;
                self.focused = false;
                self.id.request_paint();
                EventPropagation::Continue
            }
            _ => EventPropagation::Continue,
        }
    }

    fn compute_layout(&mut self, _cx: &mut ComputeLayoutCx) -> Option<Rect> {
        let layout = self.id.get_layout().unwrap_or_default();
        self.size = layout.size;
        None
    }

    fn paint(&mut self, cx: &mut PaintCx) {
        let side = self.side();
        if side <= 0.0 {
            return;
        }
        let rect = self.content_rect();
        let is_disc = self.state.mode().is_disc();

        if self.focused {
            let ring = rect.inflate(2.0, 2.0);
            if is_disc {
                let c = Circle::new(ring.center(), ring.width() / 2.0);
                cx.stroke(&c, constants::FOCUS_RING, &floem::kurbo::Stroke::new(2.0));
            } else {
                cx.stroke(&ring, constants::FOCUS_RING, &floem::kurbo::Stroke::new(2.0));
            }
        }

        self.ensure_image();
        cx.save();
        if is_disc {
            let clip = Circle::new(rect.center(), side / 2.0);
            cx.clip(&clip);
        } else {
            cx.clip(&rect);
        }
        if let Some(ref img) = self.img {
            cx.draw_img(
                floem_renderer::Img {
                    img: img.clone(),
                    hash: &self.img_hash,
                },
                rect,
            );
        }
        cx.restore();

        // Field outline
        if is_disc {
            let outline = Circle::new(rect.center(), side / 2.0);
            cx.stroke(
                &outline,
                Color::rgba8(0, 0, 0, 120),
                &floem::kurbo::Stroke::new(1.0),
            );
        } else {
            cx.stroke(
                &rect,
                Color::rgba8(0, 0, 0, 120),
                &floem::kurbo::Stroke::new(1.0),
            );
        }

        // Selection marker: white ring inside a black ring, readable on
        // both light and dark field regions.
        let marker = self.marker_position();
        cx.stroke(
            &Circle::new(marker, 3.0),
            Color::WHITE,
            &floem::kurbo::Stroke::new(1.0),
        );
        cx.stroke(
            &Circle::new(marker, 4.0),
            Color::BLACK,
            &floem::kurbo::Stroke::new(1.0),
        );
    }
}
