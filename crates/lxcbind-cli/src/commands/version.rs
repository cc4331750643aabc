//! `lxcctl version`: report the binding and native library versions.

use serde::Serialize;

use super::Context;
use crate::output;

#[derive(Serialize)]
struct VersionInfo<'a> {
    lxcctl: &'a str,
    backend: &'a str,
    liblxc: Option<String>,
    default_lxc_path: Option<String>,
}

/// Executes the `version` command.
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub fn execute(ctx: &Context) -> anyhow::Result<()> {
    let library = ctx.library();
    let info = VersionInfo {
        lxcctl: env!("CARGO_PKG_VERSION"),
        backend: library.describe(),
        liblxc: library.version(),
        default_lxc_path: library.default_lxc_path(),
    };
    output::emit(ctx.json, &info, |i| {
        format!(
            "lxcctl {}\nliblxc {} ({})\nlxcpath {}",
            i.lxcctl,
            i.liblxc.as_deref().unwrap_or("unknown"),
            i.backend,
            i.default_lxc_path.as_deref().unwrap_or("-")
        )
    })
}
