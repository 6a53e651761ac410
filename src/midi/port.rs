use super::*;
use midir::{MidiOutput, MidiOutputConnection};

const CLIENT_NAME: &str = "vikey-midi-out";

/// `MidiSending` backed by a `midir` virtual output port.
pub struct VirtualMidiPort {
    client_name: String,
    port_name: Option<String>,
    connection: Option<MidiOutputConnection>,
}

impl Default for VirtualMidiPort {
    fn default() -> Self {
        Self::with_client_name(CLIENT_NAME)
    }
}

impl VirtualMidiPort {
    pub fn with_client_name(client_name: &str) -> Self {
        Self {
            client_name: client_name.to_owned(),
            port_name: None,
            connection: None,
        }
    }

    pub fn port_name(&self) -> Option<&str> {
        self.port_name.as_deref()
    }

    #[cfg(unix)]
    fn create_virtual(&self, port_name: &str) -> Result<MidiOutputConnection, PortError> {
        use midir::os::unix::VirtualOutput;

        MidiOutput::new(&self.client_name)
            .map_err(|e| PortError::Init(e.to_string()))?
            .create_virtual(port_name)
            .map_err(|e| PortError::Open {
                name: port_name.to_owned(),
                reason: e.to_string(),
            })
    }

    #[cfg(not(unix))]
    fn create_virtual(&self, _port_name: &str) -> Result<MidiOutputConnection, PortError> {
        Err(PortError::Unsupported)
    }
}

impl MidiSending for VirtualMidiPort {
    fn open_virtual_port(&mut self, port_name: &str) -> Result<(), PortError> {
        if let Some(ref open) = self.port_name {
            log::warn!("[ MIDI ] : virtual port {open} already exists, not opening {port_name}");
            return Ok(());
        }

        self.connection = Some(self.create_virtual(port_name)?);
        self.port_name = Some(port_name.to_owned());

        log::trace!("[ MIDI ] : opened virtual port {port_name}");
        Ok(())
    }

    fn close_port(&mut self) -> Result<(), PortError> {
        if let Some(connection) = self.connection.take() {
            let _: MidiOutput = connection.close();
        }

        if let Some(port_name) = self.port_name.take() {
            log::trace!("[ MIDI ] : closed virtual port {port_name}");
        }

        Ok(())
    }

    fn is_port_open(&self) -> bool {
        self.connection.is_some()
    }

    fn send_message(&mut self, bytes: &[u8]) -> Result<(), PortError> {
        let Some(ref mut connection) = self.connection else {
            return Err(PortError::NotOpen);
        };

        connection
            .send(bytes)
            .map_err(|e| PortError::Send(e.to_string()))
    }
}
