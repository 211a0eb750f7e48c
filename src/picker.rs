//! The assembled picker panel and its public handle.
//!
//! [`ColorPicker`] owns the shared color and mode models and exposes the
//! programmatic API; [`ColorPicker::view`] builds the widget tree and wires
//! every widget to the models. Widgets never talk to each other: edits go
//! into a model, and the model's fan-out refreshes every display signal.

use std::rc::Rc;
use std::sync::Once;

use floem::prelude::*;
use floem::reactive::{create_effect, RwSignal, SignalGet, SignalUpdate};
use floem::text::FONT_SYSTEM;

use crate::color::ChromaColor;
use crate::constants;
use crate::error::ChromaError;
use crate::field_view::color_field;
use crate::inputs::{channel_row, copy_button, hex_input, ChannelSpec};
use crate::mode::PickerMode;
use crate::model::{ColorModel, EditGuard, ModeModel};
use crate::opacity_slider::opacity_slider;
use crate::slider::channel_slider;
use crate::swatch::color_swatch;

static LOAD_LUCIDE_FONT: Once = Once::new();

/// The current value of `mode`'s channel, normalized to 0.0–1.0.
fn channel_fraction(model: &ColorModel, mode: PickerMode) -> f64 {
    match mode {
        PickerMode::Hue => model.hue() as f64,
        PickerMode::Saturation => model.saturation() as f64,
        PickerMode::Brightness => model.brightness() as f64,
        PickerMode::Red => model.red() as f64 / 255.0,
        PickerMode::Green => model.green() as f64 / 255.0,
        PickerMode::Blue => model.blue() as f64 / 255.0,
        PickerMode::Alpha => model.alpha() as f64 / 255.0,
    }
}

/// Write a normalized 0.0–1.0 value into `mode`'s channel.
fn apply_channel(model: &ColorModel, mode: PickerMode, fraction: f64) -> Result<(), ChromaError> {
    let byte = (fraction.clamp(0.0, 1.0) * 255.0).round() as i32;
    match mode {
        PickerMode::Hue => model.set_hue(fraction as f32),
        PickerMode::Saturation => model.set_saturation(fraction as f32),
        PickerMode::Brightness => model.set_brightness(fraction as f32),
        PickerMode::Red => model.set_red(byte),
        PickerMode::Green => model.set_green(byte),
        PickerMode::Blue => model.set_blue(byte),
        PickerMode::Alpha => model.set_alpha(byte),
    }
}

/// Forward a field pick into the model. The guard is marked only when the
/// write will actually notify: `set_color` is a silent no-op when the bytes
/// match, and a mark left behind by one would swallow the next external
/// change.
fn forward_field_pick(model: &ColorModel, guard: &EditGuard, r: u8, g: u8, b: u8) {
    if model.is_broadcasting() {
        return;
    }
    let next = ChromaColor::from_rgba(r, g, b, model.alpha());
    if next == model.color() {
        return;
    }
    guard.mark();
    model.set_color(next);
}

fn set_if_changed(signal: RwSignal<f64>, value: f64) {
    if (signal.get_untracked() - value).abs() > 1e-9 {
        signal.set(value);
    }
}

/// A color picker panel: 2-D field, channel slider, opacity slider, and an
/// expert area with per-channel inputs, hex field, and preview swatch.
///
/// Construct one, configure it, then place [`ColorPicker::view`] in a view
/// tree:
///
/// ```rust,no_run
/// use floem_chroma::{ChromaColor, ColorPicker};
///
/// let picker = ColorPicker::new();
/// picker.set_color(ChromaColor::from_rgb(250, 202, 222));
/// picker.on_color_change(|c| println!("{}", c.to_hex()));
/// // Use `picker.view()` in your Floem view tree.
/// ```
pub struct ColorPicker {
    color_model: Rc<ColorModel>,
    mode_model: Rc<ModeModel>,
    show_expert: RwSignal<bool>,
    show_hsb: RwSignal<bool>,
    show_rgb: RwSignal<bool>,
    show_radios: RwSignal<bool>,
    show_hex: RwSignal<bool>,
    show_swatch: RwSignal<bool>,
    show_opacity: RwSignal<bool>,
}

impl Default for ColorPicker {
    fn default() -> Self {
        Self::new()
    }
}

impl ColorPicker {
    pub fn new() -> Self {
        Self::with_color(ChromaColor::BLACK)
    }

    pub fn with_color(color: ChromaColor) -> Self {
        Self {
            color_model: Rc::new(ColorModel::new(color)),
            mode_model: Rc::new(ModeModel::new()),
            show_expert: RwSignal::new(true),
            show_hsb: RwSignal::new(true),
            show_rgb: RwSignal::new(true),
            show_radios: RwSignal::new(true),
            show_hex: RwSignal::new(true),
            show_swatch: RwSignal::new(true),
            show_opacity: RwSignal::new(false),
        }
    }

    pub fn color(&self) -> ChromaColor {
        self.color_model.color()
    }

    pub fn set_color(&self, color: ChromaColor) {
        self.color_model.set_color(color);
    }

    /// Set the color from RGB bytes. The result is fully opaque.
    pub fn set_rgb(&self, red: u8, green: u8, blue: u8) {
        self.color_model
            .set_color(ChromaColor::from_rgb(red, green, blue));
    }

    /// Set the color from HSB components. Hue is cyclic and normalized;
    /// saturation and brightness must lie in 0.0–1.0. Validation happens
    /// before any component is applied, and the replacement fires at most
    /// one change notification.
    pub fn set_hsb(&self, hue: f32, saturation: f32, brightness: f32) -> Result<(), ChromaError> {
        self.color_model.set_hsb(hue, saturation, brightness)
    }

    pub fn set_opacity(&self, alpha: u8) {
        // Cannot fail for a u8 input.
        let _ = self.color_model.set_alpha(alpha as i32);
    }

    pub fn mode(&self) -> PickerMode {
        self.mode_model.mode()
    }

    /// Switch the active field mode. `PickerMode::Alpha` is rejected.
    pub fn set_mode(&self, mode: PickerMode) -> Result<(), ChromaError> {
        self.mode_model.set_mode(mode)
    }

    /// Register a callback invoked whenever the resolved RGBA bytes change.
    pub fn on_color_change(&self, callback: impl Fn(ChromaColor) + 'static) {
        self.color_model.add_listener(move |m| callback(m.color()));
    }

    /// The shared color model, for wiring beyond the built-in widgets.
    pub fn color_model(&self) -> Rc<ColorModel> {
        self.color_model.clone()
    }

    pub fn mode_model(&self) -> Rc<ModeModel> {
        self.mode_model.clone()
    }

    pub fn set_expert_controls_visible(&self, visible: bool) {
        self.show_expert.set(visible);
    }

    pub fn set_hsb_controls_visible(&self, visible: bool) {
        self.show_hsb.set(visible);
    }

    pub fn set_rgb_controls_visible(&self, visible: bool) {
        self.show_rgb.set(visible);
    }

    pub fn set_mode_controls_visible(&self, visible: bool) {
        self.show_radios.set(visible);
    }

    pub fn set_hex_field_visible(&self, visible: bool) {
        self.show_hex.set(visible);
    }

    pub fn set_preview_swatch_visible(&self, visible: bool) {
        self.show_swatch.set(visible);
    }

    pub fn set_opacity_visible(&self, visible: bool) {
        self.show_opacity.set(visible);
    }

    /// Builds the picker's widget tree.
    pub fn view(&self) -> impl IntoView {
        LOAD_LUCIDE_FONT.call_once(|| {
            FONT_SYSTEM
                .lock()
                .db_mut()
                .load_font_data(lucide_icons::LUCIDE_FONT_BYTES.to_vec());
        });

        let color_model = self.color_model.clone();
        let mode_model = self.mode_model.clone();

        let initial = color_model.color();
        let initial_mode = mode_model.mode();

        // Display signals, refreshed only from the models.
        let field_rgb = RwSignal::new(initial.to_rgb());
        let rgb = RwSignal::new(initial.to_rgb());
        let hsb = RwSignal::new((
            color_model.hue(),
            color_model.saturation(),
            color_model.brightness(),
        ));
        let alpha_sig = RwSignal::new(initial.alpha());
        let swatch_sig = RwSignal::new(initial);
        let hex_sig = RwSignal::new(initial.to_hex());
        let slider_value = RwSignal::new(channel_fraction(&color_model, initial_mode));
        let mode_sig = RwSignal::new(initial_mode);

        let hue_val = RwSignal::new(color_model.hue() as f64 * 360.0);
        let sat_val = RwSignal::new(color_model.saturation() as f64 * 100.0);
        let bri_val = RwSignal::new(color_model.brightness() as f64 * 100.0);
        let red_val = RwSignal::new(initial.red() as f64);
        let green_val = RwSignal::new(initial.green() as f64);
        let blue_val = RwSignal::new(initial.blue() as f64);

        // The field keeps sub-byte float precision while dragging; echoing
        // its own pick back through the quantized bytes would make the
        // marker jitter near the disc rim, so its signal is guarded.
        let field_guard = EditGuard::new();

        let sync: Rc<dyn Fn(&ColorModel)> = {
            let field_guard = field_guard.clone();
            let mode_model = mode_model.clone();
            Rc::new(move |m: &ColorModel| {
                let c = m.color();
                let bytes = c.to_rgb();
                if !field_guard.take() && field_rgb.get_untracked() != bytes {
                    field_rgb.set(bytes);
                }
                if rgb.get_untracked() != bytes {
                    rgb.set(bytes);
                }
                let floats = (m.hue(), m.saturation(), m.brightness());
                if hsb.get_untracked() != floats {
                    hsb.set(floats);
                }
                if alpha_sig.get_untracked() != c.alpha() {
                    alpha_sig.set(c.alpha());
                }
                if swatch_sig.get_untracked() != c {
                    swatch_sig.set(c);
                }
                let hx = c.to_hex();
                if hex_sig.get_untracked() != hx {
                    hex_sig.set(hx);
                }
                set_if_changed(slider_value, channel_fraction(m, mode_model.mode()));
                set_if_changed(hue_val, m.hue() as f64 * 360.0);
                set_if_changed(sat_val, m.saturation() as f64 * 100.0);
                set_if_changed(bri_val, m.brightness() as f64 * 100.0);
                set_if_changed(red_val, c.red() as f64);
                set_if_changed(green_val, c.green() as f64);
                set_if_changed(blue_val, c.blue() as f64);
            })
        };

        {
            let sync = sync.clone();
            color_model.add_listener(move |m| sync(m));
        }
        {
            let sync = sync.clone();
            let cm = color_model.clone();
            mode_model.add_listener(move |mm| {
                let m = mm.mode();
                if mode_sig.get_untracked() != m {
                    mode_sig.set(m);
                }
                sync(&cm);
            });
        }

        // Radio clicks land on the signal; forward them into the model.
        {
            let mm = mode_model.clone();
            create_effect(move |_| {
                let m = mode_sig.get();
                if mm.mode() != m {
                    if let Err(err) = mm.set_mode(m) {
                        log::warn!("mode change rejected: {err}");
                    }
                }
            });
        }

        let on_field = {
            let cm = color_model.clone();
            let guard = field_guard;
            move |r: u8, g: u8, b: u8| forward_field_pick(&cm, &guard, r, g, b)
        };

        let on_slider = {
            let cm = color_model.clone();
            let mm = mode_model.clone();
            move |v: f64| {
                if let Err(err) = apply_channel(&cm, mm.mode(), v) {
                    log::warn!("slider edit rejected: {err}");
                }
            }
        };

        let on_opacity = {
            let cm = color_model.clone();
            move |a: u8| {
                // set_alpha does not respect the broadcast guard, so the
                // suppression has to happen here.
                if cm.is_broadcasting() {
                    return;
                }
                let _ = cm.set_alpha(a as i32);
            }
        };

        let on_hex = {
            let cm = color_model.clone();
            move |hx: &str| {
                if let Some(c) = ChromaColor::from_hex(hx) {
                    cm.set_color(c.with_alpha(cm.alpha()));
                }
            }
        };

        let show_radios = self.show_radios;
        let rows = [
            (ChannelSpec { label: "H", mode: PickerMode::Hue }, hue_val),
            (ChannelSpec { label: "S", mode: PickerMode::Saturation }, sat_val),
            (ChannelSpec { label: "B", mode: PickerMode::Brightness }, bri_val),
            (ChannelSpec { label: "R", mode: PickerMode::Red }, red_val),
            (ChannelSpec { label: "G", mode: PickerMode::Green }, green_val),
            (ChannelSpec { label: "B", mode: PickerMode::Blue }, blue_val),
        ];
        let mut row_views = rows
            .into_iter()
            .map(|(spec, value)| {
                let cm = color_model.clone();
                let commit = move |v: f64| {
                    let result = match spec.mode {
                        PickerMode::Hue => cm.set_hue((v / 360.0) as f32),
                        PickerMode::Saturation => cm.set_saturation((v / 100.0) as f32),
                        PickerMode::Brightness => cm.set_brightness((v / 100.0) as f32),
                        PickerMode::Red => cm.set_red(v.round() as i32),
                        PickerMode::Green => cm.set_green(v.round() as i32),
                        PickerMode::Blue => cm.set_blue(v.round() as i32),
                        PickerMode::Alpha => Ok(()),
                    };
                    if let Err(err) = result {
                        log::warn!("channel edit rejected: {err}");
                    }
                };
                channel_row(spec, value, mode_sig, show_radios, commit).into_any()
            })
            .collect::<Vec<_>>();
        let rgb_rows = row_views.split_off(3);
        let hsb_rows = row_views;

        let show_opacity = self.show_opacity;
        let left = v_stack((
            color_field(field_rgb, mode_sig, on_field),
            channel_slider(slider_value, mode_sig, rgb, hsb, on_slider),
            opacity_slider(alpha_sig, rgb, on_opacity)
                .style(move |s| s.apply_if(!show_opacity.get(), |st| st.hide())),
        ))
        .style(|s| s.flex_grow(1.0).gap(constants::GAP));

        let show_hsb = self.show_hsb;
        let show_rgb = self.show_rgb;
        let show_hex = self.show_hex;
        let show_swatch = self.show_swatch;
        let show_expert = self.show_expert;

        let hsb_col = v_stack_from_iter(hsb_rows)
            .style(move |s| s.gap(4.0).apply_if(!show_hsb.get(), |st| st.hide()));
        let rgb_col = v_stack_from_iter(rgb_rows)
            .style(move |s| s.gap(4.0).apply_if(!show_rgb.get(), |st| st.hide()));
        let hex_row = h_stack((
            hex_input(hex_sig, on_hex),
            copy_button(move || format!("#{}", hex_sig.get())),
        ))
        .style(move |s| {
            s.gap(constants::GAP)
                .items_center()
                .apply_if(!show_hex.get(), |st| st.hide())
        });
        let swatch = color_swatch(swatch_sig)
            .style(move |s| s.apply_if(!show_swatch.get(), |st| st.hide()));

        let spinners = h_stack((hsb_col, rgb_col)).style(move |s| {
            s.gap(constants::GAP)
                .apply_if(!show_expert.get(), |st| st.hide())
        });
        let right = v_stack((swatch, spinners, hex_row))
            .style(|s| s.gap(constants::GAP).items_center());

        h_stack((left, right)).style(|s| {
            s.gap(constants::GAP)
                .padding(constants::PADDING)
                .background(Color::rgb8(242, 242, 242))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    /// A stand-in for the field's display signal: a listener that skips the
    /// echo of the field's own pick via the guard.
    fn guarded_field(model: &ColorModel, guard: &EditGuard) -> Rc<Cell<(u8, u8, u8)>> {
        let seen = Rc::new(Cell::new(model.color().to_rgb()));
        let g = guard.clone();
        let s = seen.clone();
        model.add_listener(move |m| {
            if !g.take() {
                s.set(m.color().to_rgb());
            }
        });
        seen
    }

    #[test]
    fn noop_field_pick_does_not_swallow_the_next_external_change() {
        // Dragging on black in a disc mode keeps producing black bytes.
        let model = Rc::new(ColorModel::default());
        let guard = EditGuard::new();
        let field = guarded_field(&model, &guard);

        forward_field_pick(&model, &guard, 0, 0, 0);
        model.set_color(ChromaColor::from_rgb(200, 100, 50));
        assert_eq!(
            field.get(),
            (200, 100, 50),
            "the external change must reach the field"
        );
    }

    #[test]
    fn real_field_pick_skips_its_own_echo() {
        let model = Rc::new(ColorModel::default());
        let guard = EditGuard::new();
        let field = guarded_field(&model, &guard);

        forward_field_pick(&model, &guard, 10, 20, 30);
        assert_eq!(model.color().to_rgb(), (10, 20, 30));
        assert_eq!(field.get(), (0, 0, 0), "own pick must not echo back");

        model.set_color(ChromaColor::from_rgb(4, 5, 6));
        assert_eq!(field.get(), (4, 5, 6));
    }

    #[test]
    fn channel_fraction_tracks_each_mode() {
        let model = ColorModel::new(ChromaColor::from_rgba(51, 102, 255, 128));
        assert!((channel_fraction(&model, PickerMode::Red) - 0.2).abs() < 0.01);
        assert!((channel_fraction(&model, PickerMode::Blue) - 1.0).abs() < 1e-9);
        assert!((channel_fraction(&model, PickerMode::Alpha) - 128.0 / 255.0).abs() < 1e-9);
        assert!((channel_fraction(&model, PickerMode::Brightness) - 1.0).abs() < 0.01);
    }

    #[test]
    fn apply_channel_routes_to_the_right_setter() {
        let model = ColorModel::default();
        apply_channel(&model, PickerMode::Red, 1.0).unwrap();
        assert_eq!(model.red(), 255);
        apply_channel(&model, PickerMode::Alpha, 0.0).unwrap();
        assert_eq!(model.alpha(), 0);
        apply_channel(&model, PickerMode::Brightness, 0.5).unwrap();
        assert!((model.brightness() - 0.5).abs() < 1e-6);
    }

    #[test]
    fn apply_channel_clamps_byte_rounding() {
        let model = ColorModel::default();
        apply_channel(&model, PickerMode::Green, 0.999).unwrap();
        assert_eq!(model.green(), 255);
    }
}
