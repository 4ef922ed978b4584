//! Console command parsing

use calc_core::MemoryKey;
use thiserror::Error;

/// Command parsing error
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CommandError {
    #[error("Unknown command: {0}")]
    UnknownCommand(String),

    #[error("Invalid syntax: {0}")]
    InvalidSyntax(String),
}

/// Console command, typed after a leading ':'
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Leave the console
    Quit,
    /// Advance the logical clock by milliseconds
    Tick(u64),
    /// Memory key
    Memory(MemoryKey),
    /// Simulate a successful calculation with `label=value` pairs
    Result(Vec<(String, String)>),
    /// Simulate a failed calculation
    Fail(String),
    /// Function id used for later simulated calculations
    Function(String),
}

/// Command parser
pub struct CommandParser;

impl CommandParser {
    /// Parse a command string (without the leading ':')
    pub fn parse(cmd: &str) -> Result<Command, CommandError> {
        let trimmed = cmd.trim();
        let (name, rest) = match trimmed.split_once(' ') {
            Some((name, rest)) => (name, rest.trim()),
            None => (trimmed, ""),
        };

        match name {
            "q" | "quit" => Ok(Command::Quit),
            "t" | "tick" => rest
                .parse()
                .map(Command::Tick)
                .map_err(|_| CommandError::InvalidSyntax(format!("Expected milliseconds: {}", rest))),
            "mc" => Ok(Command::Memory(MemoryKey::Clear)),
            "mr" => Ok(Command::Memory(MemoryKey::Recall)),
            "m+" => Ok(Command::Memory(MemoryKey::Add)),
            "m-" => Ok(Command::Memory(MemoryKey::Subtract)),
            "r" | "result" => Self::parse_entries(rest).map(Command::Result),
            "f" | "fail" if !rest.is_empty() => Ok(Command::Fail(rest.to_string())),
            "f" | "fail" => Err(CommandError::InvalidSyntax("Expected a description".to_string())),
            "fn" if !rest.is_empty() && !rest.contains(' ') => Ok(Command::Function(rest.to_string())),
            "fn" => Err(CommandError::InvalidSyntax(format!("Expected a function id: {}", rest))),
            "" => Err(CommandError::InvalidSyntax("Empty command".to_string())),
            _ => Err(CommandError::UnknownCommand(trimmed.to_string())),
        }
    }

    /// `label=value;label=value`
    fn parse_entries(rest: &str) -> Result<Vec<(String, String)>, CommandError> {
        let entries = rest
            .split(';')
            .filter(|part| !part.trim().is_empty())
            .map(|part| {
                part.split_once('=')
                    .map(|(label, value)| (label.trim().to_string(), value.trim().to_string()))
                    .ok_or_else(|| CommandError::InvalidSyntax(format!("Expected label=value: {}", part)))
            })
            .collect::<Result<Vec<_>, _>>()?;

        if entries.is_empty() {
            return Err(CommandError::InvalidSyntax("Empty result".to_string()));
        }
        Ok(entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_quit() {
        assert_eq!(CommandParser::parse("q"), Ok(Command::Quit));
        assert_eq!(CommandParser::parse(" quit "), Ok(Command::Quit));
    }

    #[test]
    fn test_parse_tick() {
        assert_eq!(CommandParser::parse("t 1500"), Ok(Command::Tick(1500)));
        assert!(matches!(
            CommandParser::parse("t soon"),
            Err(CommandError::InvalidSyntax(_))
        ));
    }

    #[test]
    fn test_parse_function() {
        assert_eq!(
            CommandParser::parse("fn P2"),
            Ok(Command::Function("P2".to_string()))
        );
        assert!(matches!(
            CommandParser::parse("fn"),
            Err(CommandError::InvalidSyntax(_))
        ));
    }

    #[test]
    fn test_parse_memory() {
        assert_eq!(
            CommandParser::parse("m+"),
            Ok(Command::Memory(MemoryKey::Add))
        );
        assert_eq!(
            CommandParser::parse("mc"),
            Ok(Command::Memory(MemoryKey::Clear))
        );
    }

    #[test]
    fn test_parse_result() {
        assert_eq!(
            CommandParser::parse("r PUSH Force=10 kN; PULL Force=8 kN"),
            Ok(Command::Result(vec![
                ("PUSH Force".to_string(), "10 kN".to_string()),
                ("PULL Force".to_string(), "8 kN".to_string()),
            ]))
        );
        assert!(CommandParser::parse("r").is_err());
        assert!(CommandParser::parse("r Force").is_err());
    }

    #[test]
    fn test_parse_fail() {
        assert_eq!(
            CommandParser::parse("f bore out of range"),
            Ok(Command::Fail("bore out of range".to_string()))
        );
        assert!(CommandParser::parse("f").is_err());
    }

    #[test]
    fn test_parse_unknown_command() {
        assert_eq!(
            CommandParser::parse("zap"),
            Err(CommandError::UnknownCommand("zap".to_string()))
        );
        assert_eq!(
            CommandParser::parse(""),
            Err(CommandError::InvalidSyntax("Empty command".to_string()))
        );
    }
}
