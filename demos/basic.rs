//! Standalone demo: opens a window with the color picker.

use floem::prelude::*;
use floem::window::WindowConfig;
use floem_chroma::{ChromaColor, ColorPicker};

fn main() {
    env_logger::init();

    let picker = ColorPicker::with_color(ChromaColor::from_rgb(250, 202, 222));
    picker.on_color_change(|c| log::info!("selected #{}", c.to_hex()));

    floem::Application::new()
        .window(
            move |_| {
                picker
                    .view()
                    .on_event_stop(floem::event::EventListener::WindowClosed, |_| {
                        floem::quit_app()
                    })
            },
            Some(
                WindowConfig::default()
                    .size((520.0, 420.0))
                    .title("floem-chroma"),
            ),
        )
        .run();
}
