//! # floem-chroma
//!
//! A color picker widget for [Floem](https://github.com/lapce/floem).
//!
//! Provides a multi-mode picker panel: a 2-D color field (disc or square
//! depending on the active mode), a channel slider, an opacity slider,
//! per-channel numeric inputs with mode radios, hex editing, and a preview
//! swatch. A dialog wrapper with an OK/Cancel footer is included.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use floem_chroma::{ChromaColor, ColorPicker};
//!
//! let picker = ColorPicker::new();
//! picker.set_color(ChromaColor::from_rgb(59, 130, 246));
//! picker.on_color_change(|c| println!("#{}", c.to_hex()));
//! // Use `picker.view()` in your Floem view tree.
//! ```

mod checkerboard;
mod color;
mod constants;
mod dialog;
mod error;
mod field;
mod field_view;
mod inputs;
mod math;
mod mode;
mod model;
mod opacity_slider;
mod picker;
mod platform;
mod slider;
mod swatch;

pub use color::ChromaColor;
pub use dialog::{open_picker_dialog, picker_dialog};
pub use error::ChromaError;
pub use mode::{PickerMode, FIELD_MODES};
pub use model::{ColorModel, EditGuard, ModeModel};
pub use picker::ColorPicker;
pub use platform::PlatformConfig;
