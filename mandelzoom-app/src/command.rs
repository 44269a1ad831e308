use std::str::FromStr;

use thiserror::Error;

/// A decoded user gesture.
///
/// The windowed front end produces these from mouse and key events; the
/// headless driver reads them as text, one per line.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    BeginSelection { x: f64, y: f64 },
    UpdateSelection { x: f64, y: f64 },
    CommitSelection,
    CancelSelection,
    Reset,
    Preset(String),
    ToggleMonochrome,
    Resize { width: u32, height: u32 },
    MaxIterations(u32),
    Show,
    ListPresets,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum CommandError {
    #[error("unknown command: {0:?}")]
    Unknown(String),

    #[error("{command}: missing argument <{argument}>")]
    MissingArgument {
        command: &'static str,
        argument: &'static str,
    },

    #[error("{command}: invalid value {value:?} for <{argument}>")]
    InvalidArgument {
        command: &'static str,
        argument: &'static str,
        value: String,
    },

    #[error("{command}: unexpected extra input {extra:?}")]
    TrailingInput { command: &'static str, extra: String },
}

/// One-line help for every command.
pub const HELP: &str = "\
commands:
  begin X Y      start a zoom selection at pixel (X, Y)
  update X Y     drag the selection corner to pixel (X, Y)
  commit         zoom into the selection
  cancel         drop the selection
  reset          back to the default view
  preset NAME    jump to a named view
  presets        list named views
  mono           toggle monochrome mode
  resize W H     change the image size
  iter N         change the iteration cap
  show           print a text preview of the current frame
  quit           exit";

/// Parse one input line.  Blank lines and `#` comments yield `Ok(None)`.
pub fn parse_line(line: &str) -> Result<Option<Command>, CommandError> {
    let line = line.split('#').next().unwrap_or("").trim();
    if line.is_empty() {
        return Ok(None);
    }
    line.parse().map(Some)
}

const NAMES: &[&str] = &[
    "begin", "update", "commit", "cancel", "reset", "preset", "presets", "mono", "resize",
    "iter", "show", "quit", "exit",
];

impl FromStr for Command {
    type Err = CommandError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut words = s.split_whitespace();
        let word = words.next().unwrap_or("");
        let lower = word.to_ascii_lowercase();
        let Some(&command) = NAMES.iter().find(|&&n| n == lower) else {
            return Err(CommandError::Unknown(word.to_string()));
        };
        let mut args = Args { command, words };

        let cmd = match command {
            "begin" => Command::BeginSelection {
                x: args.number("x")?,
                y: args.number("y")?,
            },
            "update" => Command::UpdateSelection {
                x: args.number("x")?,
                y: args.number("y")?,
            },
            "commit" => Command::CommitSelection,
            "cancel" => Command::CancelSelection,
            "reset" => Command::Reset,
            "preset" => Command::Preset(args.word("name")?.to_string()),
            "presets" => Command::ListPresets,
            "mono" => Command::ToggleMonochrome,
            "resize" => Command::Resize {
                width: args.number("width")?,
                height: args.number("height")?,
            },
            "iter" => Command::MaxIterations(args.number("n")?),
            "show" => Command::Show,
            _ => Command::Quit,
        };
        args.finish()?;
        Ok(cmd)
    }
}

struct Args<'a> {
    command: &'static str,
    words: std::str::SplitWhitespace<'a>,
}

impl<'a> Args<'a> {
    fn word(&mut self, argument: &'static str) -> Result<&'a str, CommandError> {
        self.words.next().ok_or(CommandError::MissingArgument {
            command: self.command,
            argument,
        })
    }

    fn number<T: FromStr>(&mut self, argument: &'static str) -> Result<T, CommandError> {
        let value = self.word(argument)?;
        value.parse().map_err(|_| CommandError::InvalidArgument {
            command: self.command,
            argument,
            value: value.to_string(),
        })
    }

    fn finish(mut self) -> Result<(), CommandError> {
        match self.words.next() {
            None => Ok(()),
            Some(extra) => Err(CommandError::TrailingInput {
                command: self.command,
                extra: extra.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_selection_gestures() {
        assert_eq!(
            "begin 10 12.5".parse::<Command>(),
            Ok(Command::BeginSelection { x: 10.0, y: 12.5 })
        );
        assert_eq!(
            "UPDATE 50 50".parse::<Command>(),
            Ok(Command::UpdateSelection { x: 50.0, y: 50.0 })
        );
        assert_eq!("commit".parse::<Command>(), Ok(Command::CommitSelection));
        assert_eq!("cancel".parse::<Command>(), Ok(Command::CancelSelection));
    }

    #[test]
    fn parses_view_commands() {
        assert_eq!("reset".parse::<Command>(), Ok(Command::Reset));
        assert_eq!(
            "preset wide".parse::<Command>(),
            Ok(Command::Preset("wide".into()))
        );
        assert_eq!("mono".parse::<Command>(), Ok(Command::ToggleMonochrome));
        assert_eq!(
            "resize 640 480".parse::<Command>(),
            Ok(Command::Resize {
                width: 640,
                height: 480
            })
        );
        assert_eq!("iter 500".parse::<Command>(), Ok(Command::MaxIterations(500)));
        assert_eq!("exit".parse::<Command>(), Ok(Command::Quit));
    }

    #[test]
    fn blank_and_comment_lines_are_skipped() {
        assert_eq!(parse_line(""), Ok(None));
        assert_eq!(parse_line("   "), Ok(None));
        assert_eq!(parse_line("# zoom in twice"), Ok(None));
        assert_eq!(parse_line("reset # back home"), Ok(Some(Command::Reset)));
    }

    #[test]
    fn errors() {
        assert_eq!(
            "fly".parse::<Command>(),
            Err(CommandError::Unknown("fly".into()))
        );
        assert_eq!(
            "begin 10".parse::<Command>(),
            Err(CommandError::MissingArgument {
                command: "begin",
                argument: "y"
            })
        );
        assert_eq!(
            "resize 640 tall".parse::<Command>(),
            Err(CommandError::InvalidArgument {
                command: "resize",
                argument: "height",
                value: "tall".into()
            })
        );
        assert!(matches!(
            "resize -1 10".parse::<Command>(),
            Err(CommandError::InvalidArgument { .. })
        ));
        assert_eq!(
            "preset wide extra".parse::<Command>(),
            Err(CommandError::TrailingInput {
                command: "preset",
                extra: "extra".into()
            })
        );
    }
}
