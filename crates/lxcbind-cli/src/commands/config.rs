//! `lxcctl config`: read and change container configuration items.

use std::path::PathBuf;

use clap::{Args, Subcommand};

use super::Context;
use crate::output;

/// Arguments for the `config` command.
#[derive(Args, Debug)]
pub struct ConfigArgs {
    /// Container name.
    pub name: String,

    /// Configuration action.
    #[command(subcommand)]
    pub action: ConfigAction,
}

/// Configuration actions.
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Print the values of a key, one per line.
    Get {
        /// Configuration key, e.g. `lxc.utsname`.
        key: String,
    },
    /// Set a key; multi-valued keys append.
    Set {
        /// Configuration key.
        key: String,
        /// New value.
        value: String,
        /// Also write the result to the default config file.
        #[arg(long)]
        save: bool,
    },
    /// Remove every value of a key.
    Clear {
        /// Configuration key.
        key: String,
        /// Also write the result to the default config file.
        #[arg(long)]
        save: bool,
    },
    /// List the sub-keys under a prefix.
    Keys {
        /// Key prefix, e.g. `lxc.network`; empty lists everything.
        #[arg(default_value = "")]
        prefix: String,
    },
    /// Load a config file and save it as the container's configuration.
    Load {
        /// File to import.
        path: PathBuf,
    },
    /// Write the configuration to a file.
    Save {
        /// Destination; the container's own config file when omitted.
        path: Option<PathBuf>,
    },
}

/// Executes the `config` command.
///
/// Each invocation opens a fresh handle, so `set` and `clear` only persist
/// when `--save` is given.
///
/// # Errors
///
/// Returns an error if the key is rejected or the file cannot be accessed.
pub fn execute(ctx: &Context, args: ConfigArgs) -> anyhow::Result<()> {
    let mut handle = ctx.open(&args.name)?;
    match args.action {
        ConfigAction::Get { key } => {
            let values = handle.config_item(&key)?;
            output::emit(ctx.json, &values, |v| output::lines(v))?;
        }
        ConfigAction::Set { key, value, save } => {
            handle.set_config_item(&key, &value)?;
            if save {
                handle.save_config(None)?;
            }
        }
        ConfigAction::Clear { key, save } => {
            handle.clear_config_item(&key)?;
            if save {
                handle.save_config(None)?;
            }
        }
        ConfigAction::Keys { prefix } => {
            let keys = handle.config_keys(&prefix)?;
            output::emit(ctx.json, &keys, |k| output::lines(k))?;
        }
        ConfigAction::Load { path } => {
            handle.load_config(Some(&path))?;
            handle.save_config(None)?;
            println!("Loaded {} into {}", path.display(), args.name);
        }
        ConfigAction::Save { path } => {
            handle.save_config(path.as_deref())?;
            let written = path.or_else(|| handle.config_file_path());
            if let Some(written) = written {
                println!("Saved {}", written.display());
            }
        }
    }
    Ok(())
}
