//! Interactive session.
//!
//! Reads one command per line from stdin. The session shares one HTTP client,
//! so the backend keeps the same cart for its whole lifetime.

use std::io::{self, Write};

use shopfront_core::ProductId;
use tokio::io::{AsyncBufReadExt, BufReader};

use super::{Action, CommandError, Session};

const PROMPT: &str = "shop> ";

const HELP: &str = "\
Commands:
  search <name>           search products by name
  add <id> [quantity]     add a product to the cart (quantity defaults to 1)
  checkout                check out the cart
  cart                    show the page again
  help                    show this help
  quit                    leave";

/// Run the read-eval-print loop until `quit` or end of input.
pub async fn run(session: &mut Session) -> Result<(), CommandError> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    prompt()?;
    while let Some(line) = lines.next_line().await? {
        match parse_line(&line) {
            Ok(None) => {}
            Ok(Some(Action::Quit)) => break,
            Ok(Some(action)) => session.perform(action).await?,
            Err(message) => {
                let mut stdout = io::stdout().lock();
                writeln!(stdout, "{message}")?;
            }
        }
        prompt()?;
    }
    Ok(())
}

fn prompt() -> io::Result<()> {
    let mut stdout = io::stdout().lock();
    write!(stdout, "{PROMPT}")?;
    stdout.flush()
}

pub fn write_help(out: &mut impl Write) -> io::Result<()> {
    writeln!(out, "{HELP}")
}

/// Parse one input line. Blank lines yield `Ok(None)`.
pub fn parse_line(line: &str) -> Result<Option<Action>, String> {
    let line = line.trim();
    let (command, rest) = line
        .split_once(char::is_whitespace)
        .map_or((line, ""), |(command, rest)| (command, rest.trim()));

    let action = match command.to_ascii_lowercase().as_str() {
        "" => return Ok(None),
        "search" | "s" => {
            if rest.is_empty() {
                return Err("usage: search <name>".to_string());
            }
            Action::Search(rest.to_string())
        }
        "add" | "a" => parse_add(rest)?,
        "checkout" => Action::Checkout,
        "cart" | "show" => Action::Show,
        "help" | "?" => Action::Help,
        "quit" | "exit" | "q" => Action::Quit,
        other => return Err(format!("unknown command '{other}', try 'help'")),
    };
    Ok(Some(action))
}

fn parse_add(args: &str) -> Result<Action, String> {
    let mut parts = args.split_whitespace();
    let product_id = parts
        .next()
        .ok_or_else(|| "usage: add <id> [quantity]".to_string())?
        .parse::<ProductId>()
        .map_err(|e| format!("invalid product id: {e}"))?;
    let quantity = parts
        .next()
        .map(str::parse::<u32>)
        .transpose()
        .map_err(|e| format!("invalid quantity: {e}"))?
        .unwrap_or(1);

    if parts.next().is_some() {
        return Err("usage: add <id> [quantity]".to_string());
    }
    Ok(Action::Add(product_id, quantity))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_search_keeps_spaces() {
        assert_eq!(
            parse_line("search  gaming keyboard ").unwrap(),
            Some(Action::Search("gaming keyboard".to_string()))
        );
    }

    #[test]
    fn test_parse_search_requires_query() {
        assert!(parse_line("search").is_err());
    }

    #[test]
    fn test_parse_add_defaults_quantity() {
        assert_eq!(
            parse_line("add 4").unwrap(),
            Some(Action::Add(ProductId::new(4), 1))
        );
        assert_eq!(
            parse_line("ADD 4 3").unwrap(),
            Some(Action::Add(ProductId::new(4), 3))
        );
    }

    #[test]
    fn test_parse_add_passes_zero_quantity_through() {
        // The backend decides whether 0 is acceptable
        assert_eq!(
            parse_line("add 1 0").unwrap(),
            Some(Action::Add(ProductId::new(1), 0))
        );
    }

    #[test]
    fn test_parse_add_rejects_bad_input() {
        assert!(parse_line("add").is_err());
        assert!(parse_line("add mug").is_err());
        assert!(parse_line("add 1 -2").is_err());
        assert!(parse_line("add 1 2 3").is_err());
    }

    #[test]
    fn test_parse_simple_commands() {
        assert_eq!(parse_line("checkout").unwrap(), Some(Action::Checkout));
        assert_eq!(parse_line("cart").unwrap(), Some(Action::Show));
        assert_eq!(parse_line("?").unwrap(), Some(Action::Help));
        assert_eq!(parse_line("exit").unwrap(), Some(Action::Quit));
        assert_eq!(parse_line("   ").unwrap(), None);
    }

    #[test]
    fn test_parse_unknown_command() {
        let err = parse_line("pay now").unwrap_err();
        assert!(err.contains("unknown command 'pay'"));
    }

    #[test]
    fn test_help_lists_commands() {
        let mut buf = Vec::new();
        write_help(&mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        for command in ["search", "add", "checkout", "cart", "quit"] {
            assert!(text.contains(command));
        }
    }
}
