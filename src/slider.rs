//! 1-D channel slider for the active mode.
//!
//! Renders a horizontal gradient sweeping the active channel across its full
//! range while the other channels stay at their current values, rasterized
//! to a fixed-width strip and scaled to the track (the same
//! raster-then-scale approach as the 2-D field).

use std::sync::Arc;

use floem::kurbo::Rect;
use floem::peniko::{self, Blob, Color};

use floem::reactive::{create_effect, RwSignal, SignalGet};
use floem::views::Decorators;
use floem::{
    context::{ComputeLayoutCx, EventCx, PaintCx, UpdateCx},
    event::{Event, EventPropagation},
    View, ViewId,
};
use floem_renderer::Renderer;

use crate::constants;
use crate::math;
use crate::mode::PickerMode;

/// Gradient strip resolution. The track scales this horizontally.
const STRIP_WIDTH: u32 = 256;

/// The gradient color at `t` in [0,1]: the active channel swept, the rest
/// held at the current selection.
fn gradient_rgb(
    mode: PickerMode,
    t: f32,
    rgb: (u8, u8, u8),
    hsb: (f32, f32, f32),
) -> (u8, u8, u8) {
    let to_bytes = |h: f32, s: f32, b: f32| {
        let (r, g, bl) = math::hsb_to_rgb(h, s, b);
        (
            (r * 255.0 + 0.5) as u8,
            (g * 255.0 + 0.5) as u8,
            (bl * 255.0 + 0.5) as u8,
        )
    };
    let (h, s, b) = hsb;
    match mode {
        PickerMode::Hue => to_bytes(t, s, b),
        PickerMode::Saturation => to_bytes(h, t, b),
        PickerMode::Brightness => to_bytes(h, s, t),
        PickerMode::Red => ((t * 255.0 + 0.5) as u8, rgb.1, rgb.2),
        PickerMode::Green => (rgb.0, (t * 255.0 + 0.5) as u8, rgb.2),
        PickerMode::Blue | PickerMode::Alpha => (rgb.0, rgb.1, (t * 255.0 + 0.5) as u8),
    }
}

fn rasterize_strip(mode: PickerMode, rgb: (u8, u8, u8), hsb: (f32, f32, f32)) -> Vec<u8> {
    let mut buf = vec![0u8; (STRIP_WIDTH * 4) as usize];
    for px in 0..STRIP_WIDTH {
        let t = px as f32 / (STRIP_WIDTH - 1) as f32;
        let (r, g, b) = gradient_rgb(mode, t, rgb, hsb);
        let offset = (px * 4) as usize;
        buf[offset] = r;
        buf[offset + 1] = g;
        buf[offset + 2] = b;
        buf[offset + 3] = 255;
    }
    buf
}

enum SliderUpdate {
    Value(f64),
    Context(PickerMode, (u8, u8, u8), (f32, f32, f32)),
}

pub(crate) struct ChannelSlider {
    id: ViewId,
    held: bool,
    value: f64,
    mode: PickerMode,
    rgb: (u8, u8, u8),
    hsb: (f32, f32, f32),
    size: floem::taffy::prelude::Size<f32>,
    on_change: Option<Box<dyn Fn(f64)>>,
    grad_img: Option<peniko::Image>,
    grad_hash: Vec<u8>,
    cached_key: Option<(PickerMode, (u8, u8, u8), (u16, u16, u16))>,
}

/// Creates the channel slider for the active mode.
///
/// - `value`: current channel value normalized to 0.0–1.0 (left = 0).
/// - `mode`, `rgb`, `hsb`: context for the gradient track.
/// - `on_change`: invoked with the new normalized value on pointer edits.
pub(crate) fn channel_slider(
    value: RwSignal<f64>,
    mode: RwSignal<PickerMode>,
    rgb: RwSignal<(u8, u8, u8)>,
    hsb: RwSignal<(f32, f32, f32)>,
    on_change: impl Fn(f64) + 'static,
) -> ChannelSlider {
    let id = ViewId::new();

    create_effect(move |_| {
        let v = value.get();
        id.update_state(SliderUpdate::Value(v));
    });

    create_effect(move |_| {
        let m = mode.get();
        let c = rgb.get();
        let f = hsb.get();
        id.update_state(SliderUpdate::Context(m, c, f));
    });

    ChannelSlider {
        id,
        held: false,
        value: 0.0,
        mode: PickerMode::Brightness,
        rgb: (0, 0, 0),
        hsb: (0.0, 0.0, 0.0),
        size: Default::default(),
        on_change: Some(Box::new(on_change)),
        grad_img: None,
        grad_hash: Vec::new(),
        cached_key: None,
    }
    .style(|s| {
        s.height(constants::SLIDER_HEIGHT)
            .border_radius(constants::THUMB_RADIUS as f32)
            .cursor(floem::style::CursorStyle::Pointer)
    })
}

impl ChannelSlider {
    fn update_from_pointer(&mut self, x: f64) {
        let w = self.size.width as f64;
        let r = constants::THUMB_RADIUS;
        let usable = w - 2.0 * r;
        if usable > 0.0 {
            self.value = ((x - r) / usable).clamp(0.0, 1.0);
            if let Some(cb) = &self.on_change {
                cb(self.value);
            }
        }
    }

    fn ensure_gradient_image(&mut self) {
        let key = (
            self.mode,
            self.rgb,
            (
                (self.hsb.0 * 1000.0) as u16,
                (self.hsb.1 * 1000.0) as u16,
                (self.hsb.2 * 1000.0) as u16,
            ),
        );
        if self.cached_key == Some(key) {
            return;
        }
        let pixels = rasterize_strip(self.mode, self.rgb, self.hsb);
        let blob = Blob::new(Arc::new(pixels));
        let id = blob.id();
        self.grad_img = Some(peniko::Image::new(
            blob,
            peniko::Format::Rgba8,
            STRIP_WIDTH,
            1,
        ));
        self.grad_hash = id.to_le_bytes().to_vec();
        self.cached_key = Some(key);
    }
}

impl View for ChannelSlider {
    fn id(&self) -> ViewId {
        self.id
    }

    fn update(&mut self, _cx: &mut UpdateCx, state: Box<dyn std::any::Any>) {
        if let Ok(update) = state.downcast::<SliderUpdate>() {
            match *update {
                SliderUpdate::Value(v) => self.value = v,
                SliderUpdate::Context(m, rgb, hsb) => {
                    self.mode = m;
                    self.rgb = rgb;
                    self.hsb = hsb;
                }
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

        cx.save();
        cx.clip(&rrect);
        self.ensure_gradient_image();
        if let Some(ref img) = self.grad_img {
            cx.draw_img(
                floem_renderer::Img {
                    img: img.clone(),
                    hash: &self.grad_hash,
                },
                rect,
            );
        }
        cx.restore();

        // Slider outline
        cx.stroke(
            &rrect,
            Color::rgba8(0, 0, 0, 40),
            &floem::kurbo::Stroke::new(1.0),
        );

        // Thumb (circular ring; left = 0.0, right = 1.0)
        let radius = constants::THUMB_RADIUS;
        let thumb_x = radius + self.value * (w - 2.0 * radius);
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hue_gradient_sweeps_the_spectrum() {
        let hsb = (0.0, 1.0, 1.0);
        let rgb = (255, 0, 0);
        assert_eq!(gradient_rgb(PickerMode::Hue, 0.0, rgb, hsb), (255, 0, 0));
        let (r, g, b) = gradient_rgb(PickerMode::Hue, 1.0 / 3.0, rgb, hsb);
        assert_eq!((r, g, b), (0, 255, 0));
    }

    #[test]
    fn rgb_gradient_holds_other_channels() {
        let rgb = (10, 20, 30);
        let hsb = (0.0, 0.0, 0.0);
        assert_eq!(gradient_rgb(PickerMode::Red, 0.0, rgb, hsb), (0, 20, 30));
        assert_eq!(gradient_rgb(PickerMode::Red, 1.0, rgb, hsb), (255, 20, 30));
        assert_eq!(gradient_rgb(PickerMode::Green, 0.5, rgb, hsb).0, 10);
    }

    #[test]
    fn strip_has_expected_resolution() {
        let buf = rasterize_strip(PickerMode::Brightness, (0, 0, 0), (0.5, 1.0, 0.0));
        assert_eq!(buf.len(), STRIP_WIDTH as usize * 4);
        // Brightness sweep on a saturated hue: left edge black, right edge lit.
        assert_eq!(&buf[0..3], &[0, 0, 0]);
        assert_ne!(&buf[buf.len() - 4..buf.len() - 1], &[0, 0, 0]);
    }
}
