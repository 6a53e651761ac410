use crate::midi::{ChannelMessage, MidiSending, VirtualMidiPort, MAX_CHANNEL};
use midly::live::LiveEvent;

pub const DEFAULT_PORT_NAME: &str = "VirtualKeyboard";

/// A virtual MIDI keyboard.
///
/// Simulates a keyboard sending channel voice messages on a virtual MIDI
/// output port. Every message is stamped with the keyboard's channel.
///
/// Operations report success as a `bool`; the reason for a failure is
/// logged, never returned. The port is closed when the keyboard is dropped.
///
/// See <http://www.midi.org/techspecs/midimessages.php>
pub struct VirtualKeyboard {
    channel: u8,
    port: Box<dyn MidiSending>,
}

impl Default for VirtualKeyboard {
    fn default() -> Self {
        Self::new(0)
    }
}

impl VirtualKeyboard {
    /// Keyboard on a `midir` virtual port, not yet connected.
    pub fn new(channel: u8) -> Self {
        Self::with_port(Box::<VirtualMidiPort>::default(), channel)
    }

    /// An invalid `channel` leaves the keyboard on channel 0.
    pub fn with_port(port: Box<dyn MidiSending>, channel: u8) -> Self {
        let mut keyboard = Self { channel: 0, port };
        keyboard.set_channel(channel);
        keyboard
    }

    pub fn channel(&self) -> u8 {
        self.channel
    }

    /// Set the MIDI channel, between 0 and 15.
    ///
    /// An out of range value resets the channel to 0 and returns `false`.
    pub fn set_channel(&mut self, channel: u8) -> bool {
        if channel > MAX_CHANNEL {
            log::warn!("channel {channel} is out of range, falling back to 0");
            self.channel = 0;
            return false;
        }

        self.channel = channel;
        true
    }

    /// Open a virtual MIDI port named `port_name`.
    pub fn connect(&mut self, port_name: &str) -> bool {
        if let Err(e) = self.port.open_virtual_port(port_name) {
            log::error!("{e}");
            return false;
        }

        log::info!("connected as {port_name} on channel {}", self.channel);
        true
    }

    pub fn disconnect(&mut self) -> bool {
        if let Err(e) = self.port.close_port() {
            log::error!("{e}");
            return false;
        }

        log::info!("disconnected");
        true
    }

    pub fn is_connected(&self) -> bool {
        self.port.is_port_open()
    }

    /// Sent when a note is released.
    pub fn note_off(&mut self, note: u8) -> bool {
        self.send(ChannelMessage::NoteOff { note })
    }

    /// Sent when a note is depressed.
    pub fn note_on(&mut self, note: u8, velocity: u8) -> bool {
        self.send(ChannelMessage::NoteOn { note, velocity })
    }

    /// Controller numbers 120-127 are channel mode messages and are refused.
    pub fn control_change(&mut self, number: u8, value: u8) -> bool {
        self.send(ChannelMessage::ControlChange { number, value })
    }

    pub fn program_change(&mut self, number: u8) -> bool {
        self.send(ChannelMessage::ProgramChange { number })
    }

    /// `value` is 14 bits wide, 8192 is the center (no pitch change).
    pub fn pitch_bend_change(&mut self, value: u16) -> bool {
        self.send(ChannelMessage::PitchBendChange { value })
    }

    /// Per-key after-touch.
    pub fn polyphonic_key_pressure(&mut self, note: u8, pressure: u8) -> bool {
        self.send(ChannelMessage::PolyphonicKeyPressure { note, pressure })
    }

    /// Single greatest after-touch value of all depressed keys.
    pub fn channel_pressure(&mut self, pressure: u8) -> bool {
        self.send(ChannelMessage::ChannelPressure { pressure })
    }

    /// Validate and send `message` on the current channel.
    pub fn send(&mut self, message: ChannelMessage) -> bool {
        match message.encode(self.channel) {
            Ok(bytes) => self.send_raw(&bytes),
            Err(e) => {
                log::warn!("not sending {message:?} : {e}");
                false
            }
        }
    }

    fn send_raw(&mut self, bytes: &[u8]) -> bool {
        if !self.port.is_port_open() {
            log::error!("cannot send {bytes:02X?}, port is not open");
            return false;
        }

        if let Err(e) = self.port.send_message(bytes) {
            log::error!("{e}");
            return false;
        }

        if log::log_enabled!(log::Level::Trace) {
            match LiveEvent::parse(bytes) {
                Ok(event) => log::trace!("sent {event:?}"),
                Err(_) => log::trace!("sent {bytes:02X?}"),
            }
        }

        true
    }
}

impl Drop for VirtualKeyboard {
    fn drop(&mut self) {
        if self.port.is_port_open() {
            let _ = self.port.close_port();
        }
    }
}
