//! CLI command definitions and dispatch.

pub mod config;
pub mod info;
pub mod lifecycle;
pub mod version;
pub mod wait;

use std::path::PathBuf;

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use lxcbind_common::config::LxcConfig;
use lxcbind_common::constants::BIN_NAME;
use lxcbind_runtime::ContainerHandle;
use lxcbind_runtime::backend::{self, NativeLibrary};

/// lxcctl: drive liblxc containers through lxcbind.
#[derive(Parser, Debug)]
#[command(name = BIN_NAME, version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Command,

    /// Directory holding container definitions.
    #[arg(long, global = true, env = lxcbind_common::constants::LXC_PATH_ENV)]
    pub lxcpath: Option<PathBuf>,

    /// Soname or path of liblxc.
    #[arg(long, global = true, env = lxcbind_common::constants::LIBRARY_ENV)]
    pub library: Option<String>,

    /// JSON file with binding defaults.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Use the in-process simulation instead of liblxc (state does not
    /// persist across invocations).
    #[arg(long, global = true)]
    pub simulate: bool,

    /// Print machine-readable JSON.
    #[arg(long, global = true)]
    pub json: bool,
}

/// Available CLI subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Show a container's state, PID, and config path.
    Info(info::InfoArgs),
    /// Print a container's lifecycle state.
    State(info::InfoArgs),
    /// Create a container from a template.
    Create(lifecycle::CreateArgs),
    /// Start a container.
    Start(lifecycle::StartArgs),
    /// Kill a container.
    Stop(lifecycle::NameArgs),
    /// Gracefully shut a container down.
    Shutdown(lifecycle::ShutdownArgs),
    /// Freeze all processes of a container.
    Freeze(lifecycle::NameArgs),
    /// Thaw a frozen container.
    Unfreeze(lifecycle::NameArgs),
    /// Remove a container's storage.
    Destroy(lifecycle::NameArgs),
    /// Block until a container reaches a state.
    Wait(wait::WaitArgs),
    /// Read or change configuration items.
    Config(config::ConfigArgs),
    /// Print the native library version.
    Version,
}

/// Resolved settings and the native library shared by all commands.
pub struct Context {
    /// Effective binding configuration.
    pub config: LxcConfig,
    /// Whether JSON output was requested.
    pub json: bool,
    library: Box<dyn NativeLibrary>,
}

impl Context {
    /// Resolves configuration (file, then environment, then flags) and
    /// loads the backend.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file is invalid or liblxc cannot be
    /// loaded.
    pub fn from_cli(cli: &Cli) -> anyhow::Result<Self> {
        let mut config = match &cli.config {
            Some(path) => LxcConfig::load(path)
                .with_context(|| format!("reading {}", path.display()))?,
            None => LxcConfig::default(),
        }
        .with_env_overrides();
        if let Some(path) = &cli.lxcpath {
            config.lxc_path = Some(path.clone());
        }
        if let Some(library) = &cli.library {
            config.library.clone_from(library);
        }
        config.validate()?;

        let library = if cli.simulate {
            backend::simulated_library(&config)
        } else {
            backend::open_library(&config)?
        };
        tracing::debug!(backend = library.describe(), lxc_path = ?config.lxc_path, "context ready");
        Ok(Self {
            config,
            json: cli.json,
            library,
        })
    }

    /// Opens a handle to `name` under the configured lxcpath.
    ///
    /// # Errors
    ///
    /// Returns an error if the container object cannot be allocated.
    pub fn open(&self, name: &str) -> anyhow::Result<ContainerHandle> {
        ContainerHandle::open(self.library.as_ref(), name, self.config.lxc_path.as_deref())
            .with_context(|| format!("opening container {name}"))
    }

    /// The loaded native library.
    pub fn library(&self) -> &dyn NativeLibrary {
        self.library.as_ref()
    }
}

/// Dispatches the parsed CLI command to its handler.
///
/// # Errors
///
/// Returns an error if the command execution fails.
pub fn execute(cli: Cli) -> anyhow::Result<()> {
    let ctx = Context::from_cli(&cli)?;
    match cli.command {
        Command::Info(args) => info::execute_info(&ctx, &args),
        Command::State(args) => info::execute_state(&ctx, &args),
        Command::Create(args) => lifecycle::execute_create(&ctx, &args),
        Command::Start(args) => lifecycle::execute_start(&ctx, &args),
        Command::Stop(args) => lifecycle::execute_stop(&ctx, &args),
        Command::Shutdown(args) => lifecycle::execute_shutdown(&ctx, &args),
        Command::Freeze(args) => lifecycle::execute_freeze(&ctx, &args),
        Command::Unfreeze(args) => lifecycle::execute_unfreeze(&ctx, &args),
        Command::Destroy(args) => lifecycle::execute_destroy(&ctx, &args),
        Command::Wait(args) => wait::execute(&ctx, &args),
        Command::Config(args) => config::execute(&ctx, args),
        Command::Version => version::execute(&ctx),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn global_flags_parse_after_subcommand() {
        let cli = Cli::try_parse_from([
            "lxcctl", "state", "web", "--simulate", "--lxcpath", "/srv/lxc",
        ])
        .unwrap();
        assert!(cli.simulate);
        assert_eq!(cli.lxcpath, Some(PathBuf::from("/srv/lxc")));
        assert!(matches!(cli.command, Command::State(_)));
    }

    #[test]
    fn simulated_context_opens_handles() {
        let cli = Cli::try_parse_from(["lxcctl", "--simulate", "--lxcpath", "/srv/lxc", "version"])
            .unwrap();
        let ctx = Context::from_cli(&cli).unwrap();
        let handle = ctx.open("web").unwrap();
        assert_eq!(
            handle.config_file_path(),
            Some(PathBuf::from("/srv/lxc/web/config"))
        );
    }

    #[test]
    fn binary_name_comes_from_constants() {
        use clap::CommandFactory;
        assert_eq!(Cli::command().get_name(), BIN_NAME);
    }

    #[test]
    fn lxcpath_is_unset_without_flag_or_env() {
        if std::env::var_os(lxcbind_common::constants::LXC_PATH_ENV).is_some() {
            return;
        }
        let cli = Cli::try_parse_from(["lxcctl", "--simulate", "version"]).unwrap();
        let ctx = Context::from_cli(&cli).unwrap();
        assert_eq!(ctx.config.lxc_path, None);
    }
}
