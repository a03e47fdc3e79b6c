use std::io::{BufRead, Write};

use super::{Selection, Shell, ShellResult, TOP_STATIONS};

const HELP: &str = "\
Commands:
  stations          list every station
  top [N]           list the N busiest stations (default 10)
  find <phrase>     list stations whose name contains the phrase
  station <name>    select a listed station
  stop <name>       select a stop of the selected station
  toggle-ada        flip the accessibility of the selected stop
  show              show the current selection
  help              show this help
  quit              leave";

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Stations,
    Top(i64),
    Find(String),
    Station(String),
    Stop(String),
    ToggleAda,
    Show,
    Help,
    Quit,
}

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum ParseError {
    #[error("Unknown command '{0}', try 'help'")]
    Unknown(String),

    #[error("'{0}' needs a name")]
    MissingArgument(&'static str),

    #[error("'{0}' is not a number")]
    NotANumber(String),
}

impl Command {
    /// Parses one input line, `None` for a blank line
    pub fn parse(line: &str) -> Result<Option<Command>, ParseError> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(None);
        }

        let (word, rest) = match line.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest.trim()),
            None => (line, ""),
        };

        let command = match word.to_lowercase().as_str() {
            "stations" => Command::Stations,
            "top" if rest.is_empty() => Command::Top(TOP_STATIONS),
            "top" => Command::Top(
                rest.parse()
                    .map_err(|_| ParseError::NotANumber(rest.to_string()))?,
            ),
            // an empty phrase lists everything
            "find" => Command::Find(rest.to_string()),
            "station" => Command::Station(required("station", rest)?),
            "stop" => Command::Stop(required("stop", rest)?),
            "toggle-ada" => Command::ToggleAda,
            "show" => Command::Show,
            "help" | "?" => Command::Help,
            "quit" | "exit" => Command::Quit,
            _ => return Err(ParseError::Unknown(word.to_string())),
        };
        Ok(Some(command))
    }
}

fn required(command: &'static str, rest: &str) -> Result<String, ParseError> {
    if rest.is_empty() {
        Err(ParseError::MissingArgument(command))
    } else {
        Ok(rest.to_string())
    }
}

fn apply(shell: &mut Shell, command: &Command) -> ShellResult<()> {
    match command {
        Command::Stations => shell.load_stations(),
        Command::Top(n) => shell.load_top_stations(*n),
        Command::Find(phrase) => shell.find_stations(phrase),
        Command::Station(name) => shell.select_station(name),
        Command::Stop(name) => shell.select_stop(name),
        Command::ToggleAda => shell.toggle_accessibility(),
        Command::Show | Command::Help | Command::Quit => Ok(()),
    }
}

fn describe(selection: &Selection) -> String {
    match selection {
        Selection::None => "Selected: nothing".to_string(),
        Selection::Station(station) => {
            format!("Selected: {} (station {})", station.name, station.id)
        }
        Selection::Stop { station, stop } => format!("Selected: {} at {}", stop, station.name),
    }
}

/// Reads commands from `input` until it ends or `quit` is entered, writing
/// the screen after each one
pub fn run<R: BufRead, W: Write>(shell: &mut Shell, input: R, output: &mut W) -> std::io::Result<()> {
    write!(output, "> ")?;
    output.flush()?;

    for line in input.lines() {
        let line = line?;

        match Command::parse(&line) {
            Ok(None) => {}
            Ok(Some(Command::Quit)) => break,
            Ok(Some(Command::Help)) => writeln!(output, "{}", HELP)?,
            Ok(Some(command)) => {
                log::debug!("Running {:?}", command);
                if let Err(e) = apply(shell, &command) {
                    writeln!(output, "Error: '{}'.", e)?;
                }
                if command == Command::Show {
                    writeln!(output, "{}", describe(shell.selection()))?;
                }
                write!(output, "{}", shell.screen())?;
            }
            Err(e) => writeln!(output, "Error: '{}'.", e)?,
        }

        write!(output, "> ")?;
        output.flush()?;
    }

    Ok(())
}
