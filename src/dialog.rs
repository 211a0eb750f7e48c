//! Modal picker dialog: a picker panel with an OK/Cancel footer.
//!
//! The footer follows platform convention for button order (see
//! [`PlatformConfig`]). OK completes with the current selection, Cancel and
//! Escape complete with `None`.

use floem::event::EventPropagation;
use floem::prelude::*;
use floem::window::WindowConfig;

use crate::color::ChromaColor;
use crate::picker::ColorPicker;
use crate::platform::PlatformConfig;

/// Builds a dialog view around `picker`.
///
/// `on_close` runs exactly once per activation: with `Some(color)` when OK
/// is pressed, with `None` on Cancel or Escape. The caller is responsible
/// for tearing down whatever hosts the view.
pub fn picker_dialog(
    picker: ColorPicker,
    config: PlatformConfig,
    on_close: impl Fn(Option<ChromaColor>) + Clone + 'static,
) -> impl IntoView {
    let color_model = picker.color_model();

    let ok = {
        let on_close = on_close.clone();
        let color_model = color_model.clone();
        dialog_button("OK", move || on_close(Some(color_model.color())))
    };
    let cancel = {
        let on_close = on_close.clone();
        dialog_button("Cancel", move || on_close(None))
    };

    let footer = if config.affirmative_on_right() {
        h_stack((cancel.into_any(), ok.into_any()))
    } else {
        h_stack((ok.into_any(), cancel.into_any()))
    }
    .style(|s| {
        s.gap(crate::constants::GAP)
            .justify_end()
            .padding(crate::constants::PADDING)
    });

    v_stack((picker.view(), footer))
        .style(|s| s.background(Color::rgb8(242, 242, 242)))
        .keyboard_navigable()
        .on_event(floem::event::EventListener::KeyDown, move |e| {
            if let floem::event::Event::KeyDown(ke) = e {
                if ke.key.logical_key
                    == floem::keyboard::Key::Named(floem::keyboard::NamedKey::Escape)
                {
                    on_close(None);
                    return EventPropagation::Stop;
                }
            }
            EventPropagation::Continue
        })
}

/// Opens the dialog in its own window and closes it on completion.
pub fn open_picker_dialog(
    initial: ChromaColor,
    config: PlatformConfig,
    on_done: impl Fn(Option<ChromaColor>) + Clone + 'static,
) {
    floem::new_window(
        move |window_id| {
            let picker = ColorPicker::with_color(initial);
            let on_close = move |result| {
                on_done(result);
                floem::close_window(window_id);
            };
            picker_dialog(picker, config, on_close)
        },
        Some(WindowConfig::default().title("Choose a color")),
    );
}

fn dialog_button(text: &'static str, on_press: impl Fn() + 'static) -> impl IntoView {
    container(label(move || text).style(|s| s.font_size(12.0)))
        .style(|s| {
            s.padding_horiz(14.0)
                .padding_vert(5.0)
                .border(1.0)
                .border_color(Color::rgb8(180, 180, 180))
                .border_radius(4.0)
                .background(Color::WHITE)
                .cursor(floem::style::CursorStyle::Pointer)
                .hover(|s| s.background(Color::rgb8(235, 235, 235)))
        })
        .on_event_stop(floem::event::EventListener::PointerUp, move |_| on_press())
}
