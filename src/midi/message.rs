use thiserror::Error;

pub const NOTE_OFF: u8 = 0x80;
pub const NOTE_ON: u8 = 0x90;
pub const POLYPHONIC_KEY_PRESSURE: u8 = 0xA0;
pub const CONTROL_CHANGE: u8 = 0xB0;
pub const PROGRAM_CHANGE: u8 = 0xC0;
pub const CHANNEL_PRESSURE: u8 = 0xD0;
pub const PITCH_BEND_CHANGE: u8 = 0xE0;

pub const MAX_CHANNEL: u8 = 0x0F;
pub const MAX_DATA: u8 = 0x7F;
/// Controllers 120-127 are reserved for channel mode messages.
pub const MAX_CONTROLLER: u8 = 0x77;
pub const MAX_PITCH_BEND: u16 = 0x3FFF;
pub const PITCH_BEND_CENTER: u16 = 0x2000;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum MessageError {
    #[error("{name} {value} is out of range (0..={max})")]
    OutOfRange {
        name: &'static str,
        value: u16,
        max: u16,
    },
    #[error("channel {0} is out of range (0..=15)")]
    InvalidChannel(u8),
}

/// A MIDI channel voice message, without its channel.
///
/// The channel is supplied at encoding time and folded into the low
/// nibble of the status byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelMessage {
    NoteOff { note: u8 },
    NoteOn { note: u8, velocity: u8 },
    ControlChange { number: u8, value: u8 },
    ProgramChange { number: u8 },
    PitchBendChange { value: u16 },
    PolyphonicKeyPressure { note: u8, pressure: u8 },
    ChannelPressure { pressure: u8 },
}

impl ChannelMessage {
    /// High nibble of the status byte.
    pub fn status(&self) -> u8 {
        match self {
            Self::NoteOff { .. } => NOTE_OFF,
            Self::NoteOn { .. } => NOTE_ON,
            Self::ControlChange { .. } => CONTROL_CHANGE,
            Self::ProgramChange { .. } => PROGRAM_CHANGE,
            Self::PitchBendChange { .. } => PITCH_BEND_CHANGE,
            Self::PolyphonicKeyPressure { .. } => POLYPHONIC_KEY_PRESSURE,
            Self::ChannelPressure { .. } => CHANNEL_PRESSURE,
        }
    }

    pub fn validate(&self) -> Result<(), MessageError> {
        match *self {
            Self::NoteOff { note } => data("note", note),
            Self::NoteOn { note, velocity } => {
                data("note", note)?;
                data("velocity", velocity)
            }
            Self::ControlChange { number, value } => {
                in_range("controller", number.into(), MAX_CONTROLLER.into())?;
                data("value", value)
            }
            Self::ProgramChange { number } => data("program", number),
            Self::PitchBendChange { value } => in_range("pitch bend", value, MAX_PITCH_BEND),
            Self::PolyphonicKeyPressure { note, pressure } => {
                data("note", note)?;
                data("pressure", pressure)
            }
            Self::ChannelPressure { pressure } => data("pressure", pressure),
        }
    }

    /// Serialize the message for `channel`, validating every field first.
    pub fn encode(&self, channel: u8) -> Result<Vec<u8>, MessageError> {
        if channel > MAX_CHANNEL {
            return Err(MessageError::InvalidChannel(channel));
        }

        self.validate()?;

        let status = self.status() | channel;

        Ok(match *self {
            Self::NoteOff { note } => vec![status, note, 0],
            Self::NoteOn { note, velocity } => vec![status, note, velocity],
            Self::ControlChange { number, value } => vec![status, number, value],
            Self::ProgramChange { number } => vec![status, number],
            Self::PitchBendChange { value } => {
                let (lsb, msb) = split_14bit(value);
                vec![status, lsb, msb]
            }
            Self::PolyphonicKeyPressure { note, pressure } => vec![status, note, pressure],
            Self::ChannelPressure { pressure } => vec![status, pressure],
        })
    }
}

/// Split a 14-bit value into its (lsb, msb) 7-bit halves.
#[inline]
pub fn split_14bit(value: u16) -> (u8, u8) {
    ((value & 0x7F) as u8, ((value >> 7) & 0x7F) as u8)
}

fn data(name: &'static str, value: u8) -> Result<(), MessageError> {
    in_range(name, value.into(), MAX_DATA.into())
}

fn in_range(name: &'static str, value: u16, max: u16) -> Result<(), MessageError> {
    if value > max {
        return Err(MessageError::OutOfRange { name, value, max });
    }
    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn status_byte_carries_the_channel_in_its_low_nibble() {
        for channel in 0..=MAX_CHANNEL {
            let bytes = ChannelMessage::NoteOn {
                note: 60,
                velocity: 100,
            }
            .encode(channel)
            .unwrap();
            assert_eq!(bytes, [0x90 | channel, 60, 100]);
        }
    }

    #[test]
    fn encodes_every_kind_with_its_layout() {
        let cases: &[(ChannelMessage, &[u8])] = &[
            (ChannelMessage::NoteOff { note: 64 }, &[0x82, 64, 0]),
            (
                ChannelMessage::NoteOn {
                    note: 64,
                    velocity: 101,
                },
                &[0x92, 64, 101],
            ),
            (
                ChannelMessage::ControlChange {
                    number: 119,
                    value: 67,
                },
                &[0xB2, 119, 67],
            ),
            (ChannelMessage::ProgramChange { number: 88 }, &[0xC2, 88]),
            (
                ChannelMessage::PitchBendChange { value: 200 },
                &[0xE2, 72, 1],
            ),
            (
                ChannelMessage::PolyphonicKeyPressure {
                    note: 67,
                    pressure: 108,
                },
                &[0xA2, 67, 108],
            ),
            (ChannelMessage::ChannelPressure { pressure: 109 }, &[0xD2, 109]),
        ];

        for (message, expected) in cases {
            assert_eq!(message.encode(2).unwrap(), *expected, "{message:?}");
        }
    }

    #[test]
    fn pitch_bend_is_split_into_shifted_7bit_halves() {
        assert_eq!(split_14bit(0), (0, 0));
        assert_eq!(split_14bit(PITCH_BEND_CENTER), (0x00, 0x40));
        assert_eq!(split_14bit(MAX_PITCH_BEND), (0x7F, 0x7F));

        let bytes = ChannelMessage::PitchBendChange {
            value: PITCH_BEND_CENTER,
        }
        .encode(0)
        .unwrap();
        assert_eq!(bytes, [0xE0, 0x00, 0x40]);
    }

    #[test]
    fn rejects_out_of_range_fields() {
        assert_eq!(
            ChannelMessage::NoteOff { note: 128 }.validate(),
            Err(MessageError::OutOfRange {
                name: "note",
                value: 128,
                max: 127
            })
        );
        assert!(ChannelMessage::NoteOn {
            note: 60,
            velocity: 128
        }
        .validate()
        .is_err());
        assert!(ChannelMessage::ControlChange {
            number: 120,
            value: 0
        }
        .validate()
        .is_err());
        assert!(ChannelMessage::ControlChange {
            number: 0,
            value: 128
        }
        .validate()
        .is_err());
        assert!(ChannelMessage::ProgramChange { number: 255 }
            .validate()
            .is_err());
        assert!(ChannelMessage::PitchBendChange { value: 0x4000 }
            .validate()
            .is_err());
        assert!(ChannelMessage::PolyphonicKeyPressure {
            note: 0,
            pressure: 200
        }
        .validate()
        .is_err());
        assert!(ChannelMessage::ChannelPressure { pressure: 128 }
            .validate()
            .is_err());
    }

    #[test]
    fn rejects_channels_above_15() {
        assert_eq!(
            ChannelMessage::ProgramChange { number: 1 }.encode(16),
            Err(MessageError::InvalidChannel(16))
        );
    }

    #[test]
    fn error_names_the_offending_field() {
        let err = ChannelMessage::ControlChange {
            number: 121,
            value: 0,
        }
        .encode(0)
        .unwrap_err();
        assert_eq!(err.to_string(), "controller 121 is out of range (0..=119)");
    }
}
