//! Opacity slider with checkerboard background + transparent-to-opaque gradient.

use floem::kurbo::{Rect, Shape};
use floem::peniko::{Color, Gradient};

use floem::reactive::{create_effect, RwSignal, SignalGet};
use floem::views::Decorators;
use floem::{
    context::{ComputeLayoutCx, EventCx, PaintCx, UpdateCx},
    event::{Event, EventPropagation},
    View, ViewId,
};
use floem_renderer::Renderer;

use crate::checkerboard;
use crate::constants;

enum OpacityUpdate {
    Alpha(u8),
    BaseColor(u8, u8, u8),
}

pub(crate) struct OpacitySlider {
    id: ViewId,
    held: bool,
    alpha: u8,
    base: (u8, u8, u8),
    size: floem::taffy::prelude::Size<f32>,
    on_change: Option<Box<dyn Fn(u8)>>,
}

/// Creates the opacity slider.
///
/// - `alpha`: 0 (transparent, left) to 255 (opaque, right).
/// - `rgb`: the current selection for the gradient overlay.
/// - `on_change`: invoked with the new alpha byte on pointer edits.
pub(crate) fn opacity_slider(
    alpha: RwSignal<u8>,
    rgb: RwSignal<(u8, u8, u8)>,
    on_change: impl Fn(u8) + 'static,
) -> OpacitySlider {
    let id = ViewId::new();

    create_effect(move |_| {
        let a = alpha.get();
        id.update_state(OpacityUpdate::Alpha(a));
    });

    create_effect(move |_| {
        let (r, g, b) = rgb.get();
        id.update_state(OpacityUpdate::BaseColor(r, g, b));
    });

    OpacitySlider {
        id,
        held: false,
        alpha: 255,
        base: (0, 0, 0),
        size: Default::default(),
        on_change: Some(Box::new(on_change)),
    }
    .style(|s| {
        s.height(constants::SLIDER_HEIGHT)
            .border_radius(constants::THUMB_RADIUS as f32)
            .cursor(floem::style::CursorStyle::Pointer)
    })
}

impl OpacitySlider {
    fn update_from_pointer(&mut self, x: f64) {
        let w = self.size.width as f64;
        let r = constants::THUMB_RADIUS;
        let usable = w - 2.0 * r;
        if usable > 0.0 {
            let t = ((x - r) / usable).clamp(0.0, 1.0);
            self.alpha = (t * 255.0 + 0.5) as u8;
            if let Some(cb) = &self.on_change {
                cb(self.alpha);
            }
        }
    }
}

impl View for OpacitySlider {
    fn id(&self) -> ViewId {
        self.id
    }

    fn update(&mut self, _cx: &mut UpdateCx, state: Box<dyn std::any::Any>) {
        if let Ok(update) = state.downcast::<OpacityUpdate>() {
            match *update {
                OpacityUpdate::Alpha(a) => self.alpha = a,
                OpacityUpdate::BaseColor(r, g, b) => self.base = (r, g, b),
            }
            self.id.request_paint();
        }
    }

    fn event_before_children(&mut self, cx: &mut EventCx, event: &Event) -> EventPropagation {
        match event {
            Event::PointerDown(e) => {
                cx.update_active(self.id());
                self.held = true;
                self.update_from_pointer(e.pos.x);
                self.id.request_paint();
                EventPropagation::Stop
            }
            Event::PointerMove(e) => {
                if self.held {
                    self.update_from_pointer(e.pos.x);
                    self.id.request_paint();
                    EventPropagation::Stop
                } else {
                    EventPropagation::Continue
                }
            }
            Event::PointerUp(_) => {
                self.held = false;
                EventPropagation::Continue
            }
            Event::FocusLost => {
                self.held = false;
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
        let w = self.size.width as f64;
        let h = self.size.height as f64;
        if w == 0.0 || h == 0.0 {
            return;
        }
        let rect = Rect::new(0.0, 0.0, w, h);
        let rrect = rect.to_rounded_rect(constants::THUMB_RADIUS);

        // Checkerboard background
        cx.save();
        cx.clip(&rrect);
        checkerboard::paint_checkerboard(cx, rect);

        // Transparent (left) → opaque (right)
        let (r, g, b) = self.base;
        let transparent = Color::rgba8(r, g, b, 0);
        let solid = Color::rgba8(r, g, b, 255);
        let gradient =
            Gradient::new_linear((0.0, h / 2.0), (w, h / 2.0)).with_stops([transparent, solid]);
        // Convert to BezPath so the vello renderer uses the general path
        // handler (its Rect fast-path only supports solid colors).
        let path = rect.to_path(0.1);
        cx.fill(&path, &gradient, 0.0);
        cx.restore();

        // Slider outline
        cx.stroke(
            &rrect,
            Color::rgba8(0, 0, 0, 40),
            &floem::kurbo::Stroke::new(1.0),
        );

        // Thumb (circular ring; left = 0, right = 255)
        let radius = constants::THUMB_RADIUS;
        let t = self.alpha as f64 / 255.0;
        let thumb_x = radius + t * (w - 2.0 * radius);
        let thumb_cy = h / 2.0;
        let circle = floem::kurbo::Circle::new((thumb_x, thumb_cy), radius);
        cx.stroke(
            &circle,
            Color::rgba8(0, 0, 0, 80),
            &floem::kurbo::Stroke::new(1.0),
        );
        let inner = floem::kurbo::Circle::new((thumb_x, thumb_cy), radius - 1.5);
        cx.stroke(&inner, Color::WHITE, &floem::kurbo::Stroke::new(2.0));
    }
}
