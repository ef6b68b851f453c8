//! CLI argument definitions using the clap derive API.
//!
//! This module is the *only* place that knows about argument names, aliases,
//! help text, and value enums.  No business logic lives here.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use omrs_core::application::{DeployRequest, ModuleRequest, ProjectRequest, SetupRequest};
use omrs_core::domain::{DEFAULT_DB_USER, DatabaseConfig, ProjectKind};

pub mod global;
pub use global::{GlobalArgs, OutputFormat};

// ── Top-level CLI ─────────────────────────────────────────────────────────────

/// Main CLI entry-point.
#[derive(Debug, Parser)]
#[command(
    name    = "omrs",
    bin_name = "omrs",
    version  = env!("CARGO_PKG_VERSION"),
    author   = env!("CARGO_PKG_AUTHORS"),
    about    = "Set up, deploy and upgrade local servers",
    long_about = "omrs creates server directories from a platform version or a \
                  distribution manifest, upgrades them, and manages their modules.",
    after_help = "EXAMPLES:\n\
        \x20 omrs setup --server-id demo --platform 2.0.0 --h2\n\
        \x20 omrs deploy --server-id demo --distro referenceapplication:2.4\n\
        \x20 omrs install-module --server-id demo --artifact-id appui --module-version 1.7\n\
        \x20 omrs --batch-answers 'demo,1,2,y,n' setup",
    arg_required_else_help = true,
    subcommand_required    = true,
)]
pub struct Cli {
    /// Flags available on every subcommand.
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

// ── Subcommands ───────────────────────────────────────────────────────────────

/// All available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Create a new server.
    #[command(
        about = "Set up a new server",
        after_help = "EXAMPLES:\n\
            \x20 omrs setup\n\
            \x20 omrs setup --server-id demo --platform 2.0.0 --h2 --no-demo-data\n\
            \x20 omrs setup --server-id clinic --distro referenceapplication:2.4 \\\n\
            \x20     --db-uri jdbc:mysql://localhost:3306/@DBNAME@ --db-password secret"
    )]
    Setup(SetupArgs),

    /// Upgrade a server to a distribution or platform version.
    #[command(
        about = "Deploy a distribution or platform to a server",
        after_help = "EXAMPLES:\n\
            \x20 omrs deploy --server-id demo --distro referenceapplication:2.4\n\
            \x20 omrs deploy --server-id demo --platform 2.0.0 --yes\n\
            \x20 omrs deploy --distro ./my-distro.toml"
    )]
    Deploy(DeployArgs),

    /// Install or update a module on a server.
    #[command(
        about = "Install a module",
        after_help = "EXAMPLES:\n\
            \x20 omrs install-module --server-id demo --artifact-id appui --module-version 1.7\n\
            \x20 omrs install-module -s demo -g org.openmrs.module -a webservices.rest -m 2.12"
    )]
    InstallModule(InstallModuleArgs),

    /// Remove a module from a server.
    #[command(
        about = "Uninstall a module",
        after_help = "EXAMPLES:\n\
            \x20 omrs uninstall-module --server-id demo --artifact-id appui"
    )]
    UninstallModule(UninstallModuleArgs),

    /// Show a server's configuration.
    #[command(
        about = "Show server details",
        after_help = "EXAMPLES:\n\
            \x20 omrs info --server-id demo\n\
            \x20 omrs info --server-id demo --output-format json"
    )]
    Info(ServerArgs),

    /// List servers.
    #[command(
        visible_alias = "ls",
        about = "List servers",
        after_help = "EXAMPLES:\n\
            \x20 omrs list\n\
            \x20 omrs list --output-format json"
    )]
    List,

    /// Redeploy a project's build output to a server.
    #[command(
        about = "Watch a project",
        after_help = "EXAMPLES:\n\
            \x20 omrs watch --server-id demo --artifact-id appui --path ../appui\n\
            \x20 omrs watch --server-id demo --list"
    )]
    Watch(WatchArgs),

    /// Stop watching projects.
    #[command(
        about = "Stop watching a project",
        after_help = "EXAMPLES:\n\
            \x20 omrs unwatch --server-id demo appui\n\
            \x20 omrs unwatch --server-id demo org.openmrs.module:appui\n\
            \x20 omrs unwatch --server-id demo ../appui"
    )]
    Unwatch(UnwatchArgs),

    /// Generate a module project from an archetype.
    #[command(
        about = "Create a module project",
        after_help = "EXAMPLES:\n\
            \x20 omrs create-project\n\
            \x20 omrs create-project --kind platform --module-id appointments\n\
            \x20 omrs create-project --kind refapp --output-dir ~/src"
    )]
    CreateProject(CreateProjectArgs),

    /// Initialise an omrs configuration file.
    #[command(
        about = "Initialise configuration",
        after_help = "EXAMPLES:\n\
            \x20 omrs init           # default location\n\
            \x20 omrs init --force   # overwrite an existing file\n\
            \x20 omrs -c ./omrs.toml init"
    )]
    Init(InitArgs),

    /// Generate shell completion scripts.
    #[command(
        about = "Generate shell completions",
        after_help = "EXAMPLES:\n\
            \x20 omrs completions bash > ~/.local/share/bash-completion/completions/omrs\n\
            \x20 omrs completions zsh  > ~/.zfunc/_omrs\n\
            \x20 omrs completions fish > ~/.config/fish/completions/omrs.fish"
    )]
    Completions(CompletionsArgs),

    /// Manage the omrs configuration.
    #[command(
        about = "Configuration management",
        subcommand,
        after_help = "EXAMPLES:\n\
            \x20 omrs config get sdk.servers_path\n\
            \x20 omrs config set sdk.platform_versions 1.11.6,2.0.0\n\
            \x20 omrs config list"
    )]
    Config(ConfigCommands),
}

// ── shared ────────────────────────────────────────────────────────────────────

/// Selects an existing server; asked for when missing.
#[derive(Debug, Args)]
pub struct ServerArgs {
    #[arg(short = 's', long = "server-id", value_name = "ID", help = "Server id")]
    pub server_id: Option<String>,
}

// ── setup ─────────────────────────────────────────────────────────────────────

/// Arguments for `omrs setup`.
#[derive(Debug, Args)]
pub struct SetupArgs {
    #[arg(short = 's', long = "server-id", value_name = "ID", help = "Id of the new server")]
    pub server_id: Option<String>,

    /// Distribution manifest: a file path or `artifactId:version` coordinates.
    #[arg(
        short = 'd',
        long = "distro",
        value_name = "REFERENCE",
        conflicts_with = "platform",
        help = "Distribution manifest path or coordinates"
    )]
    pub distro: Option<String>,

    #[arg(
        short = 'p',
        long = "platform",
        value_name = "VERSION",
        help = "Platform version to install"
    )]
    pub platform: Option<String>,

    #[command(flatten)]
    pub database: DatabaseArgs,

    #[arg(
        long = "demo-data",
        conflicts_with = "no_demo_data",
        help = "Include demo data"
    )]
    pub demo_data: bool,

    #[arg(long = "no-demo-data", help = "Do not include demo data")]
    pub no_demo_data: bool,
}

/// Database options for `omrs setup`.
#[derive(Debug, Args)]
pub struct DatabaseArgs {
    #[arg(long = "h2", conflicts_with = "db_uri", help = "Use an embedded H2 database")]
    pub h2: bool,

    /// MySQL JDBC URI; `@DBNAME@` is replaced with the database name.
    #[arg(long = "db-uri", value_name = "URI", help = "MySQL JDBC URI")]
    pub db_uri: Option<String>,

    #[arg(
        long = "db-user",
        value_name = "USER",
        requires = "db_uri",
        help = "Database user"
    )]
    pub db_user: Option<String>,

    #[arg(
        long = "db-password",
        value_name = "PASSWORD",
        requires = "db_uri",
        help = "Database password"
    )]
    pub db_password: Option<String>,
}

impl DatabaseArgs {
    /// The configured database, or `None` to ask.
    pub fn to_config(&self) -> Option<DatabaseConfig> {
        if self.h2 {
            return Some(DatabaseConfig::h2());
        }
        self.db_uri.as_deref().map(|uri| {
            DatabaseConfig::mysql(
                uri,
                self.db_user.as_deref().unwrap_or(DEFAULT_DB_USER),
                self.db_password.as_deref().unwrap_or_default(),
            )
        })
    }
}

impl SetupArgs {
    pub fn into_request(self) -> SetupRequest {
        let include_demo_data = match (self.demo_data, self.no_demo_data) {
            (true, _) => Some(true),
            (_, true) => Some(false),
            _ => None,
        };
        SetupRequest {
            database: self.database.to_config(),
            server_id: self.server_id,
            distribution: self.distro,
            platform_version: self.platform,
            include_demo_data,
        }
    }
}

// ── deploy ────────────────────────────────────────────────────────────────────

/// Arguments for `omrs deploy`.
#[derive(Debug, Args)]
pub struct DeployArgs {
    #[arg(short = 's', long = "server-id", value_name = "ID", help = "Server id")]
    pub server_id: Option<String>,

    #[arg(
        short = 'd',
        long = "distro",
        value_name = "REFERENCE",
        conflicts_with = "platform",
        help = "Distribution manifest path or coordinates"
    )]
    pub distro: Option<String>,

    #[arg(
        short = 'p',
        long = "platform",
        value_name = "VERSION",
        help = "Platform version to deploy"
    )]
    pub platform: Option<String>,

    /// Apply the upgrade without asking for confirmation.
    #[arg(short = 'y', long = "yes", help = "Skip confirmation")]
    pub yes: bool,
}

impl DeployArgs {
    pub fn into_request(self) -> DeployRequest {
        DeployRequest {
            server_id: self.server_id,
            distribution: self.distro,
            platform_version: self.platform,
            assume_yes: self.yes,
        }
    }
}

// ── modules ───────────────────────────────────────────────────────────────────

/// Arguments for `omrs install-module`.
#[derive(Debug, Args)]
pub struct InstallModuleArgs {
    #[arg(short = 's', long = "server-id", value_name = "ID", help = "Server id")]
    pub server_id: Option<String>,

    #[arg(short = 'g', long = "group-id", value_name = "GROUP", help = "Module groupId")]
    pub group_id: Option<String>,

    /// Module artifactId; `-omod` is appended when missing.
    #[arg(
        short = 'a',
        long = "artifact-id",
        value_name = "ARTIFACT",
        help = "Module artifactId"
    )]
    pub artifact_id: Option<String>,

    #[arg(
        short = 'm',
        long = "module-version",
        value_name = "VERSION",
        help = "Module version"
    )]
    pub version: Option<String>,
}

impl InstallModuleArgs {
    pub fn into_request(self) -> ModuleRequest {
        ModuleRequest {
            server_id: self.server_id,
            group_id: self.group_id,
            artifact_id: self.artifact_id,
            version: self.version,
        }
    }
}

/// Arguments for `omrs uninstall-module`.
#[derive(Debug, Args)]
pub struct UninstallModuleArgs {
    #[arg(short = 's', long = "server-id", value_name = "ID", help = "Server id")]
    pub server_id: Option<String>,

    #[arg(
        short = 'a',
        long = "artifact-id",
        value_name = "ARTIFACT",
        help = "Module artifactId"
    )]
    pub artifact_id: Option<String>,
}

// ── watch ─────────────────────────────────────────────────────────────────────

/// Arguments for `omrs watch`.
#[derive(Debug, Args)]
pub struct WatchArgs {
    #[arg(short = 's', long = "server-id", value_name = "ID", help = "Server id")]
    pub server_id: Option<String>,

    /// Print the watched projects instead of adding one.
    #[arg(
        short = 'l',
        long = "list",
        conflicts_with_all = ["artifact_id", "group_id", "path"],
        help = "List watched projects"
    )]
    pub list: bool,

    #[arg(
        short = 'g',
        long = "group-id",
        value_name = "GROUP",
        default_value = omrs_core::domain::GROUP_MODULE,
        help = "Project groupId"
    )]
    pub group_id: String,

    #[arg(
        short = 'a',
        long = "artifact-id",
        value_name = "ARTIFACT",
        required_unless_present = "list",
        help = "Project artifactId"
    )]
    pub artifact_id: Option<String>,

    #[arg(
        long = "path",
        value_name = "DIR",
        default_value = ".",
        help = "Project directory"
    )]
    pub path: PathBuf,
}

/// Arguments for `omrs unwatch`.
#[derive(Debug, Args)]
pub struct UnwatchArgs {
    #[arg(short = 's', long = "server-id", value_name = "ID", help = "Server id")]
    pub server_id: Option<String>,

    /// `groupId:artifactId`, an artifact id, or a project path.
    #[arg(value_name = "PROJECT", help = "Project to stop watching")]
    pub selector: String,
}

// ── create-project ────────────────────────────────────────────────────────────

/// Arguments for `omrs create-project`.
#[derive(Debug, Args)]
pub struct CreateProjectArgs {
    #[arg(short = 'k', long = "kind", value_enum, help = "Kind of module")]
    pub kind: Option<ProjectKindArg>,

    #[arg(long = "module-id", value_name = "ID", help = "Module id")]
    pub module_id: Option<String>,

    #[arg(long = "module-name", value_name = "NAME", help = "Human-readable module name")]
    pub module_name: Option<String>,

    #[arg(long = "description", value_name = "TEXT", help = "Module description")]
    pub description: Option<String>,

    #[arg(short = 'g', long = "group-id", value_name = "GROUP", help = "Project groupId")]
    pub group_id: Option<String>,

    #[arg(long = "project-version", value_name = "VERSION", help = "Project version")]
    pub version: Option<String>,

    #[arg(long = "author", value_name = "NAME", help = "Module author")]
    pub author: Option<String>,

    /// Lowest platform (or Reference Application) version to support.
    #[arg(long = "min-version", value_name = "VERSION", help = "Minimum supported version")]
    pub min_version: Option<String>,

    #[arg(
        short = 'o',
        long = "output-dir",
        value_name = "DIR",
        default_value = ".",
        help = "Directory to generate the project in"
    )]
    pub output_dir: PathBuf,
}

impl CreateProjectArgs {
    pub fn into_request(self) -> ProjectRequest {
        ProjectRequest {
            kind: self.kind.map(Into::into),
            module_id: self.module_id,
            module_name: self.module_name,
            description: self.description,
            group_id: self.group_id,
            version: self.version,
            author: self.author,
            min_version: self.min_version,
            output_dir: self.output_dir,
        }
    }
}

/// Kinds of generated module.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ProjectKindArg {
    /// Module depending on the platform only.
    Platform,
    /// Module for the Reference Application.
    #[value(alias = "referenceapplication")]
    Refapp,
}

impl From<ProjectKindArg> for ProjectKind {
    fn from(kind: ProjectKindArg) -> Self {
        match kind {
            ProjectKindArg::Platform => ProjectKind::PlatformModule,
            ProjectKindArg::Refapp => ProjectKind::ReferenceApplicationModule,
        }
    }
}

// ── init ──────────────────────────────────────────────────────────────────────

/// Arguments for `omrs init`.
#[derive(Debug, Args)]
pub struct InitArgs {
    /// Overwrite an existing config file.
    #[arg(short = 'f', long = "force", help = "Overwrite existing configuration")]
    pub force: bool,
}

// ── completions ───────────────────────────────────────────────────────────────

/// Arguments for `omrs completions`.
#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Target shell.
    #[arg(value_enum, help = "Shell to generate completions for")]
    pub shell: Shell,
}

/// Supported shells for completion generation.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Elvish,
}

// ── config subcommands ────────────────────────────────────────────────────────

/// Subcommands for `omrs config`.
#[derive(Debug, Subcommand)]
pub enum ConfigCommands {
    /// Print the value of a configuration key.
    Get {
        /// Dotted key path, e.g. `sdk.servers_path`.
        key: String,
    },
    /// Set a configuration key to a value.
    Set {
        /// Dotted key path.
        key: String,
        /// New value; lists are comma-separated.
        value: String,
    },
    /// Print all configuration values.
    List,
    /// Print the path to the active configuration file.
    Path,
}

// ── tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use omrs_core::domain::DbDriver;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("omrs").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn setup_flags_build_a_complete_request() {
        let cli = parse(&[
            "setup",
            "--server-id",
            "demo",
            "--platform",
            "2.0.0",
            "--h2",
            "--no-demo-data",
        ]);
        let Commands::Setup(args) = cli.command else {
            panic!("expected setup");
        };
        let request = args.into_request();
        assert_eq!(request.server_id.as_deref(), Some("demo"));
        assert_eq!(request.platform_version.as_deref(), Some("2.0.0"));
        assert_eq!(request.database.unwrap().driver, DbDriver::H2);
        assert_eq!(request.include_demo_data, Some(false));
    }

    #[test]
    fn setup_without_flags_leaves_everything_to_prompts() {
        let Commands::Setup(args) = parse(&["setup"]).command else {
            panic!("expected setup");
        };
        let request = args.into_request();
        assert!(request.server_id.is_none());
        assert!(request.database.is_none());
        assert!(request.include_demo_data.is_none());
    }

    #[test]
    fn mysql_user_defaults_to_root() {
        let Commands::Setup(args) = parse(&[
            "setup",
            "--db-uri",
            "jdbc:mysql://localhost:3306/@DBNAME@",
        ])
        .command
        else {
            panic!("expected setup");
        };
        let database = args.database.to_config().unwrap();
        assert_eq!(database.driver, DbDriver::MySql);
        assert_eq!(database.user, "root");
        assert_eq!(database.password, "");
    }

    #[test]
    fn distro_conflicts_with_platform() {
        let result = Cli::try_parse_from([
            "omrs",
            "deploy",
            "--distro",
            "referenceapplication:2.4",
            "--platform",
            "2.0.0",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn deploy_yes_skips_confirmation() {
        let Commands::Deploy(args) = parse(&["deploy", "-s", "demo", "-y"]).command else {
            panic!("expected deploy");
        };
        assert!(args.into_request().assume_yes);
    }

    #[test]
    fn watch_requires_an_artifact_unless_listing() {
        assert!(Cli::try_parse_from(["omrs", "watch", "-s", "demo"]).is_err());
        assert!(Cli::try_parse_from(["omrs", "watch", "-s", "demo", "--list"]).is_ok());
    }

    #[test]
    fn batch_answers_are_global() {
        let cli = parse(&["info", "--batch-answers", "demo"]);
        assert_eq!(cli.global.batch_answers.as_deref(), Some("demo"));
    }

    #[test]
    fn project_kind_maps_to_domain() {
        let Commands::CreateProject(args) = parse(&["create-project", "--kind", "refapp"]).command
        else {
            panic!("expected create-project");
        };
        assert_eq!(
            args.into_request().kind,
            Some(ProjectKind::ReferenceApplicationModule)
        );
    }

    #[test]
    fn quiet_conflicts_with_verbose() {
        assert!(Cli::try_parse_from(["omrs", "-q", "-v", "list"]).is_err());
    }
}
