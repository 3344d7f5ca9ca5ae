use clap::{Parser, Subcommand};

use crate::commands::{reset, set, status, view};

#[derive(Parser)]
#[command(name = "skillfilter")]
#[command(about = "Skill-level content filter - show or hide beginner/intermediate/advanced content")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Open a page in the terminal viewer with its skill filter bar
    View(view::Args),

    /// Show stored and effective filters
    Status(status::Args),

    /// Show or hide one skill level
    Set(set::Args),

    /// Show every skill level
    ShowAll(set::BulkArgs),

    /// Hide every skill level
    HideAll(set::BulkArgs),

    /// Forget stored filters and fall back to defaults
    Reset(reset::Args),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_parses_set_command() {
        let cli = Cli::try_parse_from(["skillfilter", "set", "advanced", "on"]).unwrap();
        match cli.command {
            Commands::Set(args) => {
                assert_eq!(args.level, "advanced");
                assert_eq!(args.state, set::Toggle::On);
            }
            _ => panic!("expected set command"),
        }
    }

    #[test]
    fn cli_rejects_unknown_toggle() {
        assert!(Cli::try_parse_from(["skillfilter", "set", "advanced", "maybe"]).is_err());
    }

    #[test]
    fn cli_parses_view_with_config() {
        let cli =
            Cli::try_parse_from(["skillfilter", "view", "guide.yaml", "--config", "c.yaml"]).unwrap();
        match cli.command {
            Commands::View(args) => {
                assert_eq!(args.page.to_str(), Some("guide.yaml"));
                assert_eq!(args.config.unwrap().to_str(), Some("c.yaml"));
            }
            _ => panic!("expected view command"),
        }
    }

    #[test]
    fn cli_parses_bulk_commands() {
        assert!(matches!(
            Cli::try_parse_from(["skillfilter", "hide-all"]).unwrap().command,
            Commands::HideAll(_)
        ));
        assert!(matches!(
            Cli::try_parse_from(["skillfilter", "show-all"]).unwrap().command,
            Commands::ShowAll(_)
        ));
    }
}
