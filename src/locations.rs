//! Default locations stored in `~/.vikey`
//!
//! .
//! └── log
//!    └── vikey.log
//!
use std::path::PathBuf;

pub fn vikey() -> Option<PathBuf> {
    Some(dirs::home_dir()?.join(".vikey"))
}

pub fn log() -> Option<PathBuf> {
    Some(vikey()?.join("log"))
}

pub fn log_file() -> Option<PathBuf> {
    Some(log()?.join("vikey.log"))
}
