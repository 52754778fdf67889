use clap::{ArgAction, Parser};

#[derive(Parser, Debug)]
#[command(name = "hostprep", version, about = "Bootstrap a server over ssh")]
pub(crate) struct Args {
    /// Host to bootstrap
    pub(crate) host: String,
    /// Remove non-essential packages on the target host
    #[arg(long)]
    pub(crate) clean: bool,
    /// Use a local http proxy. Useful when outgoing ports 80 and 443 are
    /// filtered.
    #[arg(long)]
    pub(crate) http_proxy: bool,
    /// Add this ssh key to root's authorized_keys
    #[arg(long)]
    pub(crate) key: Option<String>,
    /// Ask for connection password
    #[arg(short = 'k', long)]
    pub(crate) ask_pass: bool,
    /// Connect as this user
    #[arg(short, long, num_args = 0..=1)]
    user: Option<Option<String>>,
    /// Verbose mode (-vvv for more, -vvvv to enable connection debugging)
    #[arg(short, long = "verbose", action = ArgAction::Count)]
    pub(crate) verbosity: u8,
}

impl Args {
    /// Bare `-u` carries no value and means the same as no `-u` at all.
    pub(crate) fn user(&self) -> Option<String> {
        self.user.clone().flatten()
    }

    /// Rejects values that a subprocess would parse as options. The argv is
    /// never re-parsed by a shell, so this is the only injection surface.
    pub(crate) fn validate(&self) -> anyhow::Result<()> {
        if self.host.trim().is_empty() {
            anyhow::bail!("host cannot be empty");
        }
        if self.host.starts_with('-') {
            anyhow::bail!("host cannot start with '-': {}", self.host);
        }
        if let Some(user) = self.user().as_deref() {
            if user.trim().is_empty() {
                anyhow::bail!("user cannot be empty");
            }
            if user.starts_with('-') {
                anyhow::bail!("user cannot start with '-': {user}");
            }
        }
        Ok(())
    }
}
