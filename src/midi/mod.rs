mod message;
mod port;

pub use message::*;
pub use port::*;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum PortError {
    #[error("failed to create MIDI client : {0}")]
    Init(String),
    #[error("failed to open virtual port {name} : {reason}")]
    Open { name: String, reason: String },
    #[error("virtual MIDI ports are not supported on this platform")]
    Unsupported,
    #[error("port is not open")]
    NotOpen,
    #[error("failed to send MIDI message : {0}")]
    Send(String),
}

/// Platform side of a MIDI output endpoint.
#[cfg_attr(test, mockall::automock)]
pub trait MidiSending {
    /// Create a system-visible virtual output port other applications can connect to.
    fn open_virtual_port(&mut self, port_name: &str) -> Result<(), PortError>;
    /// Close the port. Closing a port that is not open does nothing.
    fn close_port(&mut self) -> Result<(), PortError>;
    ///
    fn is_port_open(&self) -> bool;
    /// Transmit one complete MIDI message.
    fn send_message(&mut self, bytes: &[u8]) -> Result<(), PortError>;
}
