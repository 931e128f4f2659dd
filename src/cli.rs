// Command tree. Built once by `Cli::parse()` in `main` and dispatched by
// `run`; every subcommand maps to one flow in `ui`.

use crate::ui;
use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "hostgo", version)]
#[command(about = "Cloud hosting for Go web applications", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Print debug logs to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Authenticate your hostgo account
    Login,
    /// Create a new app and bind it to the current directory
    ///
    /// A random name is chosen if no name is specified.
    Create {
        /// Preferred app name
        #[arg(short, long)]
        name: Option<String>,
    },
    /// Deploy or update the application
    ///
    /// Without an image reference the app is built with `go build` and the
    /// binary is uploaded.
    Deploy {
        /// Container image to deploy instead of building locally
        image: Option<String>,
    },
    /// Retrieve application logs
    #[command(alias = "log")]
    Logs,
    /// Scale application instances
    Scale {
        /// Number of instances to scale to
        #[arg(short, long, default_value_t = 0, allow_negative_numbers = true)]
        instances: i32,
    },
    /// Print running application instances
    Ps,
    /// Roll back to a previous deployment version
    Rollback {
        version: String,
    },
    /// Manage custom domains
    Domain {
        #[command(subcommand)]
        action: DomainCommand,
    },
    /// Manage attached resources such as databases
    Resource {
        #[command(subcommand)]
        action: ResourceCommand,
    },
    /// Print application environment variables, or change them
    Env(EnvArgs),
}

#[derive(Subcommand, Debug)]
pub enum DomainCommand {
    /// Attach a domain to the app
    Add { domain: String },
    /// Detach a domain from the app
    Remove { domain: String },
}

#[derive(Subcommand, Debug)]
pub enum ResourceCommand {
    /// Provision a resource
    Add { name: String },
    /// Remove a resource
    Remove { name: String },
    /// Download a database dump to `{app}-{name}.sql`
    Dump { name: String },
}

#[derive(Args, Debug)]
pub struct EnvArgs {
    #[command(subcommand)]
    pub action: Option<EnvCommand>,
}

#[derive(Subcommand, Debug)]
pub enum EnvCommand {
    /// Set a new environment variable or update an existing one
    Set {
        /// KEY=VALUE pairs
        #[arg(required = true)]
        pairs: Vec<String>,
    },
    /// Unset or delete environment variables
    Unset {
        #[arg(required = true)]
        keys: Vec<String>,
    },
}

pub fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Command::Login => ui::login(),
        Command::Create { name } => ui::create(name.as_deref()),
        Command::Deploy { image: Some(image) } => ui::deploy_image(&image),
        Command::Deploy { image: None } => ui::deploy_binary(),
        Command::Logs => ui::logs(),
        Command::Scale { instances } => ui::scale(instances),
        Command::Ps => ui::ps(),
        Command::Rollback { version } => ui::rollback(&version),
        Command::Domain { action } => match action {
            DomainCommand::Add { domain } => ui::add_domain(&domain),
            DomainCommand::Remove { domain } => ui::remove_domain(&domain),
        },
        Command::Resource { action } => match action {
            ResourceCommand::Add { name } => ui::provision_resource(&name),
            ResourceCommand::Remove { name } => ui::remove_resource(&name),
            ResourceCommand::Dump { name } => ui::dump_database(&name),
        },
        Command::Env(EnvArgs { action }) => match action {
            None => ui::list_env(),
            Some(EnvCommand::Set { pairs }) => ui::set_env(&pairs),
            Some(EnvCommand::Unset { keys }) => ui::unset_env(&keys),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn command_tree_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_nested_subcommands() {
        let cli = Cli::parse_from(["hostgo", "env", "set", "A=1", "B=2"]);
        match cli.command {
            Command::Env(EnvArgs {
                action: Some(EnvCommand::Set { pairs }),
            }) => assert_eq!(pairs, vec!["A=1", "B=2"]),
            other => panic!("unexpected command: {other:?}"),
        }

        let cli = Cli::parse_from(["hostgo", "env"]);
        assert!(matches!(cli.command, Command::Env(EnvArgs { action: None })));
    }

    #[test]
    fn scale_accepts_non_positive_counts_for_local_validation() {
        let cli = Cli::parse_from(["hostgo", "scale", "-i", "-1"]);
        assert!(matches!(cli.command, Command::Scale { instances: -1 }));
    }

    #[test]
    fn scale_without_count_defaults_to_zero() {
        let cli = Cli::parse_from(["hostgo", "scale"]);
        assert!(matches!(cli.command, Command::Scale { instances: 0 }));
    }

    #[test]
    fn deploy_image_is_optional() {
        let cli = Cli::parse_from(["hostgo", "deploy"]);
        assert!(matches!(cli.command, Command::Deploy { image: None }));
        let cli = Cli::parse_from(["hostgo", "-v", "deploy", "registry.example/app:1"]);
        assert!(cli.verbose);
        assert!(matches!(cli.command, Command::Deploy { image: Some(_) }));
    }
}
