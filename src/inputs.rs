//! Numeric, hex, and clipboard input components for the expert area.

use floem::event::EventPropagation;
use floem::prelude::*;
use floem::reactive::{create_effect, RwSignal, SignalGet, SignalUpdate};

use crate::constants;
use crate::mode::PickerMode;

/// Describes one channel row in the expert area: its label and the field
/// mode its radio selects.
#[derive(Clone, Copy)]
pub(crate) struct ChannelSpec {
    pub label: &'static str,
    pub mode: PickerMode,
}

/// A channel row: mode radio, label, and a numeric field in display units
/// (degrees for hue, percent for saturation/brightness, bytes for RGB).
///
/// `value` carries the display-unit value; `on_commit` receives the parsed
/// and clamped value when the user commits an edit. Invalid text reverts to
/// the current value.
pub(crate) fn channel_row(
    spec: ChannelSpec,
    value: RwSignal<f64>,
    active_mode: RwSignal<PickerMode>,
    radios_visible: RwSignal<bool>,
    on_commit: impl Fn(f64) + Clone + 'static,
) -> impl IntoView {
    let max = spec.mode.max() as f64;
    let text = RwSignal::new(format!("{}", value.get_untracked().round() as i64));

    // Value → text (external updates)
    create_effect(move |_| {
        let display = value.get().round() as i64;
        let expected = format!("{}", display);
        if text.get_untracked() != expected {
            text.set(expected);
        }
    });

    let commit = move || {
        let raw = text.get_untracked();
        if let Ok(num) = raw.trim().parse::<f64>() {
            let clamped = num.clamp(0.0, max);
            let new_display = clamped.round() as i64;
            if new_display != value.get_untracked().round() as i64 {
                on_commit(clamped);
            }
            let formatted = format!("{}", new_display);
            if raw != formatted {
                text.set(formatted);
            }
        } else {
            let formatted = format!("{}", value.get_untracked().round() as i64);
            if raw != formatted {
                text.set(formatted);
            }
        }
    };

    h_stack((
        mode_radio(spec.mode, active_mode, radios_visible),
        label(move || spec.label).style(|s| {
            s.width(14.0)
                .font_size(constants::LABEL_FONT)
                .color(Color::rgb8(120, 120, 120))
        }),
        text_input(text)
            .style(|s| {
                s.width(constants::INPUT_WIDTH)
                    .padding(2.0)
                    .font_size(constants::INPUT_FONT)
                    .font_family("monospace".to_string())
                    .background(Color::WHITE)
                    .border(1.0)
                    .border_color(Color::rgb8(200, 200, 200))
                    .border_radius(3.0)
            })
            .on_event_stop(floem::event::EventListener::FocusLost, {
                let commit = commit.clone();
                move |_| commit()
            })
            .on_event(floem::event::EventListener::KeyDown, move |e| {
                if let floem::event::Event::KeyDown(ke) = e {
                    if ke.key.logical_key
                        == floem::keyboard::Key::Named(floem::keyboard::NamedKey::Enter)
                    {
                        commit();
                        return EventPropagation::Stop;
                    }
                }
                EventPropagation::Continue
            }),
    ))
    .style(|s| s.items_center().gap(4.0))
}

/// The radio dot that selects `mode` as the active field mode.
fn mode_radio(
    mode: PickerMode,
    active_mode: RwSignal<PickerMode>,
    visible: RwSignal<bool>,
) -> impl IntoView {
    container(
        label(move || {
            let icon = if active_mode.get() == mode {
                lucide_icons::Icon::CircleDot
            } else {
                lucide_icons::Icon::Circle
            };
            icon.unicode().to_string()
        })
        .style(|s| {
            s.font_size(12.0)
                .font_family("lucide".to_string())
                .color(Color::rgb8(100, 100, 100))
        }),
    )
    .style(move |s| {
        s.size(16.0, 16.0)
            .items_center()
            .justify_center()
            .cursor(floem::style::CursorStyle::Pointer)
            .apply_if(!visible.get(), |s| s.hide())
    })
    .on_event_stop(floem::event::EventListener::PointerDown, move |_| {
        active_mode.set(mode);
    })
}

/// The hex field: six lowercase hex digits, committed on Enter or focus
/// loss. Text that does not parse as a six-digit hex color is silently
/// replaced with the current value.
pub(crate) fn hex_input(
    hex: RwSignal<String>,
    on_commit: impl Fn(&str) + Clone + 'static,
) -> impl IntoView {
    let text = RwSignal::new(hex.get_untracked());

    // External hex → text
    create_effect(move |_| {
        let val = hex.get();
        let current = text.get_untracked();
        if current.trim_start_matches('#').to_lowercase() != val {
            text.set(val);
        }
    });

    let commit = move || {
        let raw = text.get_untracked();
        let trimmed = raw.trim().trim_start_matches('#');
        if trimmed.len() == 6 && trimmed.chars().all(|c| c.is_ascii_hexdigit()) {
            on_commit(&trimmed.to_lowercase());
        }
        // Re-display the accepted value; invalid input reverts here.
        let current = hex.get_untracked();
        if text.get_untracked() != current {
            text.set(current);
        }
    };

    h_stack((
        label(|| "#").style(|s| {
            s.font_size(constants::INPUT_FONT)
                .font_family("monospace".to_string())
                .color(Color::rgb8(120, 120, 120))
        }),
        text_input(text)
            .style(|s| {
                s.width(constants::HEX_INPUT_WIDTH)
                    .padding(2.0)
                    .font_size(constants::INPUT_FONT)
                    .font_family("monospace".to_string())
                    .background(Color::WHITE)
                    .border(1.0)
                    .border_color(Color::rgb8(200, 200, 200))
                    .border_radius(3.0)
            })
            .on_event_stop(floem::event::EventListener::FocusLost, {
                let commit = commit.clone();
                move |_| commit()
            })
            .on_event(floem::event::EventListener::KeyDown, move |e| {
                if let floem::event::Event::KeyDown(ke) = e {
                    if ke.key.logical_key
                        == floem::keyboard::Key::Named(floem::keyboard::NamedKey::Enter)
                    {
                        commit();
                        return EventPropagation::Stop;
                    }
                }
                EventPropagation::Continue
            }),
    ))
    .style(|s| s.items_center().gap(1.0))
}

/// A small copy button that copies the result of `get_text` to the clipboard.
pub(crate) fn copy_button(get_text: impl Fn() -> String + 'static) -> impl IntoView {
    let pressed = RwSignal::new(false);
    container(
        label(|| lucide_icons::Icon::Copy.unicode().to_string()).style(move |s| {
            let c = if pressed.get() {
                Color::rgb8(80, 80, 80)
            } else {
                Color::rgb8(120, 120, 120)
            };
            s.font_size(14.0).font_family("lucide".to_string()).color(c)
        }),
    )
    .style(|s| {
        s.size(20.0, 20.0)
            .items_center()
            .justify_center()
            .border_radius(3.0)
            .cursor(floem::style::CursorStyle::Pointer)
            .hover(|s| s.background(Color::rgb8(230, 230, 230)))
    })
    .on_event_stop(floem::event::EventListener::PointerDown, move |_| {
        pressed.set(true);
    })
    .on_event_stop(floem::event::EventListener::PointerUp, move |_| {
        pressed.set(false);
        copy_to_clipboard(&get_text());
    })
}

fn copy_to_clipboard(text: &str) {
    match arboard::Clipboard::new() {
        Ok(mut clipboard) => {
            if let Err(err) = clipboard.set_text(text) {
                log::warn!("clipboard write failed: {err}");
            }
        }
        Err(err) => log::warn!("clipboard unavailable: {err}"),
    }
}
