use crate::report::{run_review, ReviewArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use planset_qa::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Plan Set QA",
    about = "Score solar plan-set validation results from the command line or over HTTP",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Score a validation payload stored as JSON and print the review
    Review(ReviewArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Review(args) => run_review(args),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serve_is_the_default_command() {
        let cli = Cli::try_parse_from(["planset-qa"]).expect("parses");
        assert!(cli.command.is_none());
    }

    #[test]
    fn review_accepts_payload_and_flags() {
        let cli = Cli::try_parse_from([
            "planset-qa",
            "review",
            "payload.json",
            "--json",
            "--file-name",
            "Machuca, Naomi-1.pdf",
        ])
        .expect("parses");

        match cli.command {
            Some(Command::Review(args)) => {
                assert!(args.json);
                assert_eq!(args.payload.to_str(), Some("payload.json"));
                assert_eq!(args.file_name.as_deref(), Some("Machuca, Naomi-1.pdf"));
            }
            other => panic!("expected review command, got {other:?}"),
        }
    }

    #[test]
    fn serve_overrides_parse() {
        let cli = Cli::try_parse_from(["planset-qa", "serve", "--port", "8080"]).expect("parses");

        match cli.command {
            Some(Command::Serve(args)) => {
                assert_eq!(args.port, Some(8080));
                assert!(args.host.is_none());
            }
            other => panic!("expected serve command, got {other:?}"),
        }
    }
}
