use crate::{keyboard::VirtualKeyboard, midi::ChannelMessage};
use std::num::ParseIntError;
use thiserror::Error;

pub const USAGE: &str = r#"
   <enter>, demo : play the demo sequence
        on N V   : note on, note N with velocity V
        off N    : note off
        cc N V   : control change, controller N to value V
        pc N     : program change
        bend V   : pitch bend, 0 to 16383 (8192 is center)
        poly N P : polyphonic key pressure
        press P  : channel pressure
        ch N     : set the channel, 0 to 15
        ?, help  : display help
 q, stop, exit  : quit
"#;

pub enum Flow {
    Continue,
    Exit,
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum CommandError {
    #[error("unknown command : {0}")]
    Unknown(String),
    #[error("{command} expects {expected} argument(s)")]
    Arity {
        command: &'static str,
        expected: usize,
    },
    #[error("invalid number {value} : {source}")]
    Number {
        value: String,
        source: ParseIntError,
    },
}

#[derive(Debug, PartialEq, Eq)]
pub enum Command {
    Quit,
    Help,
    Demo,
    SetChannel(u8),
    Send(ChannelMessage),
}

impl std::str::FromStr for Command {
    type Err = CommandError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut words = line.split_whitespace();
        let Some(name) = words.next() else {
            return Ok(Self::Demo);
        };
        let args = words.collect::<Vec<_>>();

        let command = match name {
            "q" | "stop" | "exit" => Self::Quit,
            "?" | "help" => Self::Help,
            "demo" => Self::Demo,
            "ch" => {
                let [channel] = arguments::<1>("ch", &args)?;
                Self::SetChannel(number(channel)?)
            }
            "on" => {
                let [note, velocity] = arguments::<2>("on", &args)?;
                Self::Send(ChannelMessage::NoteOn {
                    note: number(note)?,
                    velocity: number(velocity)?,
                })
            }
            "off" => {
                let [note] = arguments::<1>("off", &args)?;
                Self::Send(ChannelMessage::NoteOff {
                    note: number(note)?,
                })
            }
            "cc" => {
                let [controller, value] = arguments::<2>("cc", &args)?;
                Self::Send(ChannelMessage::ControlChange {
                    number: number(controller)?,
                    value: number(value)?,
                })
            }
            "pc" => {
                let [program] = arguments::<1>("pc", &args)?;
                Self::Send(ChannelMessage::ProgramChange {
                    number: number(program)?,
                })
            }
            "bend" => {
                let [value] = arguments::<1>("bend", &args)?;
                Self::Send(ChannelMessage::PitchBendChange {
                    value: number(value)?,
                })
            }
            "poly" => {
                let [note, pressure] = arguments::<2>("poly", &args)?;
                Self::Send(ChannelMessage::PolyphonicKeyPressure {
                    note: number(note)?,
                    pressure: number(pressure)?,
                })
            }
            "press" => {
                let [pressure] = arguments::<1>("press", &args)?;
                Self::Send(ChannelMessage::ChannelPressure {
                    pressure: number(pressure)?,
                })
            }
            unknown => return Err(CommandError::Unknown(unknown.to_owned())),
        };

        Ok(command)
    }
}

impl Command {
    /// Run the command against `keyboard`, returning whether it succeeded.
    pub fn apply(self, keyboard: &mut VirtualKeyboard) -> (Flow, bool) {
        match self {
            Self::Quit => (Flow::Exit, true),
            Self::Help => {
                println!("{USAGE}");
                (Flow::Continue, true)
            }
            Self::Demo => (Flow::Continue, play_demo(keyboard)),
            Self::SetChannel(channel) => (Flow::Continue, keyboard.set_channel(channel)),
            Self::Send(message) => (Flow::Continue, keyboard.send(message)),
        }
    }
}

/// One message of every kind, in a fixed order.
pub const DEMO: &[ChannelMessage] = &[
    ChannelMessage::NoteOn {
        note: 64,
        velocity: 101,
    },
    ChannelMessage::NoteOff { note: 64 },
    ChannelMessage::ControlChange {
        number: 0,
        value: 67,
    },
    ChannelMessage::ProgramChange { number: 88 },
    ChannelMessage::PitchBendChange { value: 200 },
    ChannelMessage::PolyphonicKeyPressure {
        note: 67,
        pressure: 108,
    },
    ChannelMessage::ChannelPressure { pressure: 109 },
];

/// Send every demo message, even after a failure.
pub fn play_demo(keyboard: &mut VirtualKeyboard) -> bool {
    DEMO.iter()
        .fold(true, |all_sent, message| keyboard.send(*message) && all_sent)
}

fn arguments<'a, const N: usize>(
    command: &'static str,
    args: &[&'a str],
) -> Result<[&'a str; N], CommandError> {
    <[&'a str; N]>::try_from(args).map_err(|_| CommandError::Arity {
        command,
        expected: N,
    })
}

fn number<T>(value: &str) -> Result<T, CommandError>
where
    T: std::str::FromStr<Err = ParseIntError>,
{
    value.parse().map_err(|source| CommandError::Number {
        value: value.to_owned(),
        source,
    })
}

#[cfg(test)]
mod test {
    use super::*;

    fn parse(line: &str) -> Result<Command, CommandError> {
        line.parse()
    }

    #[test]
    fn quit_words() {
        for word in ["q", "stop", "exit", "  exit  "] {
            assert_eq!(parse(word).unwrap(), Command::Quit);
        }
    }

    #[test]
    fn empty_line_plays_the_demo() {
        assert_eq!(parse("").unwrap(), Command::Demo);
        assert_eq!(parse("   ").unwrap(), Command::Demo);
        assert_eq!(parse("demo").unwrap(), Command::Demo);
    }

    #[test]
    fn message_commands() {
        assert_eq!(
            parse("on 60 100").unwrap(),
            Command::Send(ChannelMessage::NoteOn {
                note: 60,
                velocity: 100
            })
        );
        assert_eq!(
            parse("off 60").unwrap(),
            Command::Send(ChannelMessage::NoteOff { note: 60 })
        );
        assert_eq!(
            parse("cc 7 127").unwrap(),
            Command::Send(ChannelMessage::ControlChange {
                number: 7,
                value: 127
            })
        );
        assert_eq!(
            parse("pc 88").unwrap(),
            Command::Send(ChannelMessage::ProgramChange { number: 88 })
        );
        assert_eq!(
            parse("bend 16383").unwrap(),
            Command::Send(ChannelMessage::PitchBendChange { value: 16383 })
        );
        assert_eq!(
            parse("poly 67 108").unwrap(),
            Command::Send(ChannelMessage::PolyphonicKeyPressure {
                note: 67,
                pressure: 108
            })
        );
        assert_eq!(
            parse("press 109").unwrap(),
            Command::Send(ChannelMessage::ChannelPressure { pressure: 109 })
        );
        assert_eq!(parse("ch 9").unwrap(), Command::SetChannel(9));
    }

    #[test]
    fn range_checks_are_left_to_the_keyboard() {
        assert_eq!(
            parse("on 200 0").unwrap(),
            Command::Send(ChannelMessage::NoteOn {
                note: 200,
                velocity: 0
            })
        );
        assert_eq!(parse("ch 16").unwrap(), Command::SetChannel(16));
    }

    #[test]
    fn rejects_unknown_commands() {
        assert_eq!(
            parse("strum 1").unwrap_err(),
            CommandError::Unknown("strum".to_owned())
        );
    }

    #[test]
    fn rejects_wrong_argument_counts() {
        assert_eq!(
            parse("on 60").unwrap_err(),
            CommandError::Arity {
                command: "on",
                expected: 2
            }
        );
        assert!(parse("pc 1 2").is_err());
    }

    #[test]
    fn rejects_numbers_that_do_not_fit_the_field() {
        assert!(matches!(
            parse("on 300 10").unwrap_err(),
            CommandError::Number { .. }
        ));
        assert!(matches!(
            parse("bend -1").unwrap_err(),
            CommandError::Number { .. }
        ));
        assert!(matches!(
            parse("press loud").unwrap_err(),
            CommandError::Number { .. }
        ));
    }

    #[test]
    fn demo_has_one_message_of_each_kind() {
        let mut statuses = DEMO.iter().map(|m| m.status()).collect::<Vec<_>>();
        statuses.sort();
        statuses.dedup();
        assert_eq!(statuses.len(), 7);
    }
}
