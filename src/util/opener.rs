use anyhow::{Context, Result};

/// Hand a web, mail or phone link to whatever the desktop has registered
/// for it. The href goes to the handler as a single argument.
pub fn open_external(target: &str) -> Result<()> {
    ::opener::open(target).with_context(|| format!("Failed to open {target}"))
}
