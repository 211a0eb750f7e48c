//! Preview swatch showing the current selection.
//!
//! Translucent colors are drawn over a checkerboard. Clicking the swatch
//! copies the hex string of the selection to the clipboard.

use floem::kurbo::Rect;
use floem::peniko::Color;

use floem::reactive::{create_effect, RwSignal, SignalGet};
use floem::views::Decorators;
use floem::{
    context::{ComputeLayoutCx, EventCx, PaintCx, UpdateCx},
    event::{Event, EventPropagation},
    View, ViewId,
};
use floem_renderer::Renderer;

use crate::checkerboard;
use crate::color::ChromaColor;
use crate::constants;

pub(crate) struct ColorSwatch {
    id: ViewId,
    color: ChromaColor,
    size: floem::taffy::prelude::Size<f32>,
}

pub(crate) fn color_swatch(color: RwSignal<ChromaColor>) -> ColorSwatch {
    let id = ViewId::new();

    create_effect(move |_| {
        let c = color.get();
        id.update_state(c);
    });

    ColorSwatch {
        id,
        color: ChromaColor::BLACK,
        size: Default::default(),
    }
    .style(|s| {
        s.size(constants::SWATCH_SIZE, constants::SWATCH_SIZE)
            .cursor(floem::style::CursorStyle::Pointer)
    })
}

impl View for ColorSwatch {
    fn id(&self) -> ViewId {
        self.id
    }

    fn update(&mut self, _cx: &mut UpdateCx, state: Box<dyn std::any::Any>) {
        if let Ok(color) = state.downcast::<ChromaColor>() {
            self.color = *color;
            self.id.request_paint();
        }
    }

    fn event_before_children(&mut self, _cx: &mut EventCx, event: &Event) -> EventPropagation {
        if let Event::PointerUp(_) = event {
            match arboard::Clipboard::new() {
                Ok(mut clipboard) => {
                    if let Err(err) = clipboard.set_text(self.color.to_hex()) {
                        log::warn!("clipboard write failed: {err}");
                    }
                }
                Err(err) => log::warn!("clipboard unavailable: {err}"),
            }
            return EventPropagation::Stop;
        }
        EventPropagation::Continue
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
        let rrect = rect.to_rounded_rect(constants::RADIUS as f64);

        cx.save();
        cx.clip(&rrect);
        if self.color.alpha() < 255 {
            checkerboard::paint_checkerboard(cx, rect);
        }
        let fill = Color::rgba8(
            self.color.red(),
            self.color.green(),
            self.color.blue(),
            self.color.alpha(),
        );
        cx.fill(&rect, fill, 0.0);
        cx.restore();

        cx.stroke(
            &rrect,
            Color::rgba8(0, 0, 0, 60),
            &floem::kurbo::Stroke::new(1.0),
        );
    }
}
