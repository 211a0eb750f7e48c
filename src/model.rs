//! Shared models: the single source of truth for the selected color and for
//! the active display mode, plus the re-entrancy discipline that keeps the
//! observing widgets from feeding back into each other.
//!
//! Both models fan out synchronously, in registration order, on the UI
//! thread. The color model holds a `broadcasting` flag for the duration of a
//! fan-out; channel setters invoked while it is set are silently ignored,
//! which is the sole mechanism preventing update cycles between widgets that
//! both display and edit the same value.

use std::cell::{Cell, RefCell};
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::rc::Rc;

use crate::color::ChromaColor;
use crate::error::{check_channel, check_unit, ChromaError};
use crate::math;
use crate::mode::PickerMode;

/// Below this, saturation/brightness count as zero and hue is indeterminate.
const ACHROMATIC_EPSILON: f32 = 0.001;

/// Marks a widget's own writes so the echo of the resulting model
/// notification can be skipped exactly once.
///
/// Call [`EditGuard::mark`] immediately before writing to a shared model in
/// response to a local user edit; in the widget's model listener, skip the
/// update when [`EditGuard::take`] returns true.
#[derive(Clone, Default)]
pub struct EditGuard(Rc<Cell<bool>>);

impl EditGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Flag the next incoming notification as self-originated.
    pub fn mark(&self) {
        self.0.set(true);
    }

    /// Consume the flag. Returns true at most once per `mark`.
    pub fn take(&self) -> bool {
        self.0.replace(false)
    }
}

type ColorListener = Rc<dyn Fn(&ColorModel)>;

/// Holds the selected color and fans out change notifications.
///
/// The HSB floats are stored separately from the RGBA bytes: converting
/// HSB(0.5, 0, 0) to RGB and back would reset hue to zero, so the last
/// explicitly set hue (and saturation) survive while the color is
/// achromatic.
pub struct ColorModel {
    color: Cell<ChromaColor>,
    hue: Cell<f32>,
    sat: Cell<f32>,
    bri: Cell<f32>,
    broadcasting: Cell<bool>,
    listeners: RefCell<Vec<ColorListener>>,
}

impl Default for ColorModel {
    fn default() -> Self {
        Self::new(ChromaColor::BLACK)
    }
}

impl ColorModel {
    pub fn new(color: ChromaColor) -> Self {
        let (h, s, b) = color.to_hsb();
        Self {
            color: Cell::new(color),
            hue: Cell::new(h),
            sat: Cell::new(s),
            bri: Cell::new(b),
            broadcasting: Cell::new(false),
            listeners: RefCell::new(Vec::new()),
        }
    }

    pub fn add_listener(&self, listener: impl Fn(&ColorModel) + 'static) {
        self.listeners.borrow_mut().push(Rc::new(listener));
    }

    /// True while a change notification is being fanned out.
    pub fn is_broadcasting(&self) -> bool {
        self.broadcasting.get()
    }

    pub fn color(&self) -> ChromaColor {
        self.color.get()
    }

    pub fn hue(&self) -> f32 {
        self.hue.get()
    }

    pub fn saturation(&self) -> f32 {
        self.sat.get()
    }

    pub fn brightness(&self) -> f32 {
        self.bri.get()
    }

    pub fn red(&self) -> u8 {
        self.color.get().red()
    }

    pub fn green(&self) -> u8 {
        self.color.get().green()
    }

    pub fn blue(&self) -> u8 {
        self.color.get().blue()
    }

    pub fn alpha(&self) -> u8 {
        self.color.get().alpha()
    }

    /// Replace the whole color. Stored hue (and saturation) are preserved
    /// when the incoming color is achromatic. Ignored during a broadcast.
    pub fn set_color(&self, color: ChromaColor) {
        if self.broadcasting.get() {
            return;
        }
        let (h, s, b) = color.to_hsb();
        if s > ACHROMATIC_EPSILON && b > ACHROMATIC_EPSILON {
            self.hue.set(h);
        }
        self.sat.set(s);
        self.bri.set(b);
        self.replace(color);
    }

    /// Set hue. Hue is cyclic: any finite value is normalized modulo 1.0.
    pub fn set_hue(&self, hue: f32) -> Result<(), ChromaError> {
        if !hue.is_finite() {
            return Err(ChromaError::UnitOutOfRange {
                channel: "hue",
                value: hue,
            });
        }
        if self.broadcasting.get() {
            return Ok(());
        }
        self.hue.set(math::wrap_hue(hue));
        self.replace(self.color_from_stored_hsb());
        Ok(())
    }

    pub fn set_saturation(&self, saturation: f32) -> Result<(), ChromaError> {
        let saturation = check_unit("saturation", saturation)?;
        if self.broadcasting.get() {
            return Ok(());
        }
        self.sat.set(saturation);
        self.replace(self.color_from_stored_hsb());
        Ok(())
    }

    pub fn set_brightness(&self, brightness: f32) -> Result<(), ChromaError> {
        let brightness = check_unit("brightness", brightness)?;
        if self.broadcasting.get() {
            return Ok(());
        }
        self.bri.set(brightness);
        self.replace(self.color_from_stored_hsb());
        Ok(())
    }

    /// Set all three HSB components with a single notification.
    /// Validation happens before any component is applied, so a failure
    /// leaves the model untouched.
    pub fn set_hsb(&self, hue: f32, saturation: f32, brightness: f32) -> Result<(), ChromaError> {
        if !hue.is_finite() {
            return Err(ChromaError::UnitOutOfRange {
                channel: "hue",
                value: hue,
            });
        }
        let saturation = check_unit("saturation", saturation)?;
        let brightness = check_unit("brightness", brightness)?;
        if self.broadcasting.get() {
            return Ok(());
        }
        self.hue.set(math::wrap_hue(hue));
        self.sat.set(saturation);
        self.bri.set(brightness);
        self.replace(self.color_from_stored_hsb());
        Ok(())
    }

    pub fn set_red(&self, red: i32) -> Result<(), ChromaError> {
        let red = check_channel("red", red)?;
        if self.broadcasting.get() {
            return Ok(());
        }
        let c = self.color.get();
        self.set_color(ChromaColor::from_rgba(red, c.green(), c.blue(), c.alpha()));
        Ok(())
    }

    pub fn set_green(&self, green: i32) -> Result<(), ChromaError> {
        let green = check_channel("green", green)?;
        if self.broadcasting.get() {
            return Ok(());
        }
        let c = self.color.get();
        self.set_color(ChromaColor::from_rgba(c.red(), green, c.blue(), c.alpha()));
        Ok(())
    }

    pub fn set_blue(&self, blue: i32) -> Result<(), ChromaError> {
        let blue = check_channel("blue", blue)?;
        if self.broadcasting.get() {
            return Ok(());
        }
        let c = self.color.get();
        self.set_color(ChromaColor::from_rgba(c.red(), c.green(), blue, c.alpha()));
        Ok(())
    }

    /// Set the alpha channel.
    ///
    /// Unlike every other channel setter this does NOT respect the
    /// re-entrancy guard. A listener that unconditionally writes alpha back
    /// will loop; see the module tests.
    pub fn set_alpha(&self, alpha: i32) -> Result<(), ChromaError> {
        let alpha = check_channel("alpha", alpha)?;
        self.replace(self.color.get().with_alpha(alpha));
        Ok(())
    }

    fn color_from_stored_hsb(&self) -> ChromaColor {
        ChromaColor::from_hsb(self.hue.get(), self.sat.get(), self.bri.get())
            .with_alpha(self.color.get().alpha())
    }

    /// Store `color` and notify listeners, but only when the resolved RGBA
    /// bytes actually changed. A hue edit on black updates the stored floats
    /// without producing an event.
    fn replace(&self, color: ChromaColor) {
        let previous = self.color.replace(color);
        if previous != color {
            self.fire();
        }
    }

    fn fire(&self) {
        self.broadcasting.set(true);
        let listeners = self.listeners.borrow().clone();
        for listener in &listeners {
            if catch_unwind(AssertUnwindSafe(|| listener(self))).is_err() {
                log::error!("color listener panicked; continuing fan-out");
            }
        }
        self.broadcasting.set(false);
    }
}

type ModeListener = Rc<dyn Fn(&ModeModel)>;

/// Tracks which of the six field modes is active.
///
/// Mode changes are rarer than color changes and not mutually recursive with
/// them, so there is no re-entrancy guard here: `set_mode` is an
/// unconditional replace plus fan-out.
pub struct ModeModel {
    mode: Cell<PickerMode>,
    listeners: RefCell<Vec<ModeListener>>,
}

impl Default for ModeModel {
    fn default() -> Self {
        Self {
            mode: Cell::new(PickerMode::Brightness),
            listeners: RefCell::new(Vec::new()),
        }
    }
}

impl ModeModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_listener(&self, listener: impl Fn(&ModeModel) + 'static) {
        self.listeners.borrow_mut().push(Rc::new(listener));
    }

    pub fn mode(&self) -> PickerMode {
        self.mode.get()
    }

    pub fn set_mode(&self, mode: PickerMode) -> Result<(), ChromaError> {
        if !mode.is_field_mode() {
            return Err(ChromaError::NotAFieldMode(mode));
        }
        self.mode.set(mode);
        let listeners = self.listeners.borrow().clone();
        for listener in &listeners {
            if catch_unwind(AssertUnwindSafe(|| listener(self))).is_err() {
                log::error!("mode listener panicked; continuing fan-out");
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn counting_model() -> (Rc<ColorModel>, Rc<Cell<u32>>) {
        let model = Rc::new(ColorModel::default());
        let count = Rc::new(Cell::new(0));
        let c = count.clone();
        model.add_listener(move |_| c.set(c.get() + 1));
        (model, count)
    }

    #[test]
    fn set_color_notifies_once() {
        let (model, count) = counting_model();
        model.set_color(ChromaColor::from_rgb(10, 20, 30));
        assert_eq!(count.get(), 1);
        assert_eq!(model.color().to_rgb(), (10, 20, 30));
    }

    #[test]
    fn unchanged_color_does_not_notify() {
        let (model, count) = counting_model();
        model.set_color(ChromaColor::BLACK);
        assert_eq!(count.get(), 0);
    }

    #[test]
    fn listeners_run_in_registration_order() {
        let model = ColorModel::default();
        let order = Rc::new(RefCell::new(Vec::new()));
        for tag in ["first", "second", "third"] {
            let order = order.clone();
            model.add_listener(move |_| order.borrow_mut().push(tag));
        }
        model.set_color(ChromaColor::from_rgb(1, 2, 3));
        assert_eq!(*order.borrow(), vec!["first", "second", "third"]);
    }

    #[test]
    fn channel_setters_are_suppressed_during_broadcast() {
        let model = Rc::new(ColorModel::default());
        let inner = model.clone();
        model.add_listener(move |_| {
            // A write-back during fan-out must be silently ignored.
            inner.set_red(200).unwrap();
        });
        model.set_color(ChromaColor::from_rgb(10, 0, 0));
        assert_eq!(model.red(), 10);
    }

    #[test]
    fn set_color_is_suppressed_during_broadcast() {
        let model = Rc::new(ColorModel::default());
        let inner = model.clone();
        model.add_listener(move |_| inner.set_color(ChromaColor::from_rgb(9, 9, 9)));
        model.set_color(ChromaColor::from_rgb(10, 0, 0));
        assert_eq!(model.color().to_rgb(), (10, 0, 0));
    }

    #[test]
    fn alpha_setter_bypasses_the_guard() {
        // Alpha writes are applied even mid-broadcast, where a red write
        // would be dropped.
        let model = Rc::new(ColorModel::default());
        let inner = model.clone();
        model.add_listener(move |m| {
            if m.alpha() == 255 {
                inner.set_red(77).unwrap();
                inner.set_alpha(128).unwrap();
            }
        });
        model.set_color(ChromaColor::from_rgb(10, 0, 0));
        assert_eq!(model.alpha(), 128, "alpha write must land mid-broadcast");
        assert_eq!(model.red(), 10, "red write must be suppressed");
    }

    #[test]
    fn edit_guard_skips_self_echo_once() {
        let model = Rc::new(ColorModel::default());
        let guard = EditGuard::new();
        let self_calls = Rc::new(Cell::new(0));
        let other_calls = Rc::new(Cell::new(0));

        // "Widget A": ignores the echo of its own edit.
        let g = guard.clone();
        let sc = self_calls.clone();
        model.add_listener(move |_| {
            if g.take() {
                return;
            }
            sc.set(sc.get() + 1);
        });

        // "Widget B": sees every change.
        let oc = other_calls.clone();
        model.add_listener(move |_| oc.set(oc.get() + 1));

        // A edits the shared model.
        guard.mark();
        model.set_color(ChromaColor::from_rgb(1, 2, 3));
        assert_eq!(self_calls.get(), 0);
        assert_eq!(other_calls.get(), 1);

        // An external change reaches A again.
        model.set_color(ChromaColor::from_rgb(4, 5, 6));
        assert_eq!(self_calls.get(), 1);
        assert_eq!(other_calls.get(), 2);
    }

    #[test]
    fn set_hsb_replaces_all_components_in_one_event() {
        let (model, count) = counting_model();
        model.set_hsb(0.5, 1.0, 1.0).unwrap();
        assert_eq!(count.get(), 1, "a full HSB replacement fires exactly once");
        assert_eq!(model.color().to_rgb(), (0, 255, 255));
        assert!((model.hue() - 0.5).abs() < 1e-6);
    }

    #[test]
    fn set_hsb_rejects_without_partial_application() {
        let (model, count) = counting_model();
        model.set_hsb(0.25, 0.5, 0.5).unwrap();
        assert!(model.set_hsb(0.9, 1.5, 0.1).is_err());
        assert!((model.hue() - 0.25).abs() < 1e-6);
        assert!((model.saturation() - 0.5).abs() < 1e-6);
        assert!((model.brightness() - 0.5).abs() < 1e-6);
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn rgb_boundaries() {
        let model = ColorModel::default();
        model.set_red(0).unwrap();
        model.set_red(255).unwrap();
        assert!(model.set_red(256).is_err());
        assert!(model.set_red(-1).is_err());
        assert!(model.set_green(256).is_err());
        assert!(model.set_blue(-1).is_err());
        assert!(model.set_alpha(300).is_err());
    }

    #[test]
    fn hue_normalizes_instead_of_rejecting() {
        let model = ColorModel::default();
        model.set_brightness(1.0).unwrap();
        model.set_saturation(1.0).unwrap();
        model.set_hue(1.3).unwrap();
        assert!((model.hue() - 0.3).abs() < 1e-6);
        model.set_hue(-0.2).unwrap();
        assert!((model.hue() - 0.8).abs() < 1e-6);
        assert!(model.set_hue(f32::INFINITY).is_err());
    }

    #[test]
    fn saturation_and_brightness_reject_out_of_range() {
        let model = ColorModel::default();
        assert!(model.set_saturation(1.5).is_err());
        assert!(model.set_brightness(-0.1).is_err());
    }

    #[test]
    fn hue_edits_on_black_keep_rgb_and_fire_nothing() {
        let (model, count) = counting_model();
        model.set_hue(0.5).unwrap();
        model.set_saturation(0.5).unwrap();
        assert_eq!(model.color().to_rgb(), (0, 0, 0));
        assert!((model.hue() - 0.5).abs() < 1e-6);
        assert!((model.saturation() - 0.5).abs() < 1e-6);
        assert_eq!(model.brightness(), 0.0);
        assert_eq!(count.get(), 0, "RGB did not change, so no event fires");
    }

    #[test]
    fn set_color_preserves_hue_for_achromatic_input() {
        let model = ColorModel::default();
        model.set_brightness(1.0).unwrap();
        model.set_saturation(1.0).unwrap();
        model.set_hue(0.25).unwrap();
        model.set_color(ChromaColor::BLACK);
        assert!((model.hue() - 0.25).abs() < 1e-6);
        assert_eq!(model.saturation(), 0.0);
    }

    #[test]
    fn panicking_listener_does_not_break_fan_out() {
        let model = Rc::new(ColorModel::default());
        model.add_listener(|_| panic!("misbehaving observer"));
        let reached = Rc::new(Cell::new(false));
        let r = reached.clone();
        model.add_listener(move |_| r.set(true));
        model.set_color(ChromaColor::from_rgb(5, 5, 5));
        assert!(reached.get());
        assert!(!model.is_broadcasting());
    }

    #[test]
    fn mode_model_notifies_and_rejects_alpha() {
        let model = Rc::new(ModeModel::new());
        assert_eq!(model.mode(), PickerMode::Brightness);
        let seen = Rc::new(Cell::new(None));
        let s = seen.clone();
        model.add_listener(move |m| s.set(Some(m.mode())));
        model.set_mode(PickerMode::Red).unwrap();
        assert_eq!(seen.get(), Some(PickerMode::Red));
        assert!(model.set_mode(PickerMode::Alpha).is_err());
        assert_eq!(model.mode(), PickerMode::Red);
    }
}
