//! Command language of the interactive session.
//!
//! Each input line is one command. A line that is not a known command word
//! is treated as a guess against the current game.

use std::str::FromStr;

use crate::domain::repositories::StatusFilter;
use crate::error::AppError;

/// One parsed session command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// `guess <text>` or a bare guess.
    Guess(String),
    /// `new [pool] [length]`
    New {
        pool: Option<String>,
        length: Option<usize>,
    },
    /// `games [all|solved|unsolved]`
    Games(StatusFilter),
    /// `use <key>`
    Use(String),
    /// `show [key]`
    Show(Option<String>),
    /// `history`
    History,
    /// `delete [key]`
    Delete(Option<String>),
    /// `clear`
    Clear,
    /// `help`
    Help,
    /// `quit` / `exit`
    Quit,
    /// Blank line.
    Nothing,
}

/// Usage text shown by `help`.
pub const HELP: &str = "\
Commands:
  <text> | guess <text>      submit a guess against the current game
  new [pool] [length]        start a new game
  games [all|solved|unsolved] list games, newest first
  use <key>                  switch to another game
  show [key]                 print a game as JSON
  history                    list guesses of the current game
  delete [key]               delete a game
  clear                      delete every game
  help                       show this help
  quit                       leave the session";

impl FromStr for Command {
    type Err = AppError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        let (word, rest) = line
            .split_once(char::is_whitespace)
            .map_or((line, ""), |(w, r)| (w, r.trim()));
        let arg = (!rest.is_empty()).then(|| rest.to_string());

        let command = match word.to_ascii_lowercase().as_str() {
            "" => Command::Nothing,
            "guess" => Command::Guess(
                arg.ok_or_else(|| AppError::invalid_property("text", "must not be empty"))?,
            ),
            "new" => parse_new(rest)?,
            "games" => Command::Games(match arg {
                Some(status) => status.parse()?,
                None => StatusFilter::All,
            }),
            "use" => Command::Use(
                arg.ok_or_else(|| AppError::invalid_property("key", "must not be empty"))?,
            ),
            "show" => Command::Show(arg),
            "history" => Command::History,
            "delete" => Command::Delete(arg),
            "clear" => Command::Clear,
            "help" | "?" => Command::Help,
            "quit" | "exit" => Command::Quit,
            _ => Command::Guess(line.to_string()),
        };

        Ok(command)
    }
}

/// `new` takes an optional pool followed by an optional length. A single
/// numeric argument is a length.
fn parse_new(rest: &str) -> Result<Command, AppError> {
    let args: Vec<&str> = rest.split_whitespace().collect();
    let parse_length = |s: &str| {
        s.parse::<usize>()
            .map_err(|_| AppError::invalid_property("length", "must be a number"))
    };

    let (pool, length) = match args.as_slice() {
        [] => (None, None),
        [only] if only.chars().all(|c| c.is_ascii_digit()) => (None, Some(parse_length(*only)?)),
        [pool] => (Some(pool.to_string()), None),
        [pool, length] => (Some(pool.to_string()), Some(parse_length(*length)?)),
        _ => {
            return Err(AppError::invalid_property(
                "pool",
                "must not contain whitespace, control, or undefined characters",
            ));
        }
    };

    Ok(Command::New { pool, length })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(line: &str) -> Command {
        line.parse().unwrap()
    }

    #[test]
    fn test_bare_text_is_a_guess() {
        assert_eq!(parse("ABCD"), Command::Guess("ABCD".to_string()));
        assert_eq!(parse("  ABCD  "), Command::Guess("ABCD".to_string()));
        assert_eq!(parse("guess DCBA"), Command::Guess("DCBA".to_string()));
    }

    #[test]
    fn test_guess_keeps_inner_text() {
        assert_eq!(parse("guess A BC"), Command::Guess("A BC".to_string()));
    }

    #[test]
    fn test_new_arguments() {
        assert_eq!(
            parse("new"),
            Command::New {
                pool: None,
                length: None
            }
        );
        assert_eq!(
            parse("new 6"),
            Command::New {
                pool: None,
                length: Some(6)
            }
        );
        assert_eq!(
            parse("new XYZ"),
            Command::New {
                pool: Some("XYZ".to_string()),
                length: None
            }
        );
        assert_eq!(
            parse("new 0123456789 5"),
            Command::New {
                pool: Some("0123456789".to_string()),
                length: Some(5)
            }
        );
        assert!("new ABC five".parse::<Command>().is_err());
        assert!("new A B C".parse::<Command>().is_err());
    }

    #[test]
    fn test_games_filter() {
        assert_eq!(parse("games"), Command::Games(StatusFilter::All));
        assert_eq!(parse("GAMES solved"), Command::Games(StatusFilter::Solved));
        assert!("games pending".parse::<Command>().is_err());
    }

    #[test]
    fn test_key_commands() {
        assert_eq!(parse("use abc"), Command::Use("abc".to_string()));
        assert!("use".parse::<Command>().is_err());
        assert_eq!(parse("show"), Command::Show(None));
        assert_eq!(parse("delete k"), Command::Delete(Some("k".to_string())));
    }

    #[test]
    fn test_simple_words() {
        assert_eq!(parse(""), Command::Nothing);
        assert_eq!(parse("history"), Command::History);
        assert_eq!(parse("clear"), Command::Clear);
        assert_eq!(parse("?"), Command::Help);
        assert_eq!(parse("exit"), Command::Quit);
    }
}
