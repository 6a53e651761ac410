pub mod commands;
pub mod keyboard;
pub mod locations;
pub mod logger;
pub mod midi;

pub use keyboard::{VirtualKeyboard, DEFAULT_PORT_NAME};
