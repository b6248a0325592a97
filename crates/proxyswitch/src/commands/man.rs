//! `proxyswitch man [command...]`: print a manual page generated at build time.

use crate::cli::ManArgs;
use crate::error::CliError;

mod pages {
    include!(concat!(env!("OUT_DIR"), "/man_pages.rs"));
}

/// Roff source for `proxyswitch` or `proxyswitch-<command path>`.
fn page(command: &[String]) -> Result<&'static str, CliError> {
    let name = if command.is_empty() {
        "proxyswitch".to_owned()
    } else {
        format!("proxyswitch-{}", command.join("-"))
    };
    pages::MAN_PAGES
        .iter()
        .find(|(page, _)| *page == name)
        .map(|(_, roff)| *roff)
        .ok_or_else(|| CliError::UnknownManPage {
            command: command.join(" "),
        })
}

pub fn handle(args: &ManArgs) -> Result<(), CliError> {
    print!("{}", page(&args.command)?);
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn path(words: &[&str]) -> Vec<String> {
        words.iter().map(|w| (*w).to_owned()).collect()
    }

    #[test]
    fn top_level_page_is_the_default() {
        let roff = page(&[]).unwrap();
        assert!(roff.contains(".TH proxyswitch 1"));
    }

    #[test]
    fn nested_commands_join_with_hyphens() {
        let toggle = page(&path(&["toggle"])).unwrap();
        assert!(toggle.contains(".TH proxyswitch-toggle "));
        assert!(toggle.contains("Flip the proxy"));
        assert!(page(&path(&["config", "show"])).is_ok());
    }

    #[test]
    fn unknown_command_is_a_usage_error() {
        let err = page(&path(&["bogus"])).unwrap_err();
        assert!(matches!(err, CliError::UnknownManPage { ref command } if command == "bogus"));
        assert_eq!(err.exit_code(), crate::error::exit_code::USAGE);
    }
}
