//! Account subcommands: login, credits, status, logout.
//!
//! User-facing output uses writeln! to the given writer (stdout from the
//! binary), not debug output.

use std::io::Write;

use futlink_client::actions::set_account_info;
use futlink_client::{AccountAction, AccountStore, CancellationToken, Credentials, FutClient};

/// Account subcommand actions.
#[derive(clap::Subcommand, Debug)]
pub enum AccountCommand {
    /// Log in to the FUT web app.
    Login {
        /// Account email.
        #[arg(short, long)]
        email: String,
        /// Account password.
        #[arg(short, long, env = "FUTLINK_PASSWORD", hide_env_values = true)]
        password: String,
        /// Security question answer.
        #[arg(short, long, env = "FUTLINK_SECRET", hide_env_values = true)]
        secret: String,
        /// Platform (e.g. pc, ps4, xone, 360).
        #[arg(long)]
        platform: String,
    },
    /// Fetch the coin balance.
    Credits {
        /// Account email (defaults to the active account).
        #[arg(short, long)]
        email: Option<String>,
    },
    /// Show stored accounts.
    Status,
    /// Forget a stored account and its session.
    Logout {
        /// Account email (defaults to the active account).
        #[arg(short, long)]
        email: Option<String>,
    },
}

/// Execute an account subcommand against `store`.
pub async fn run<W: Write>(
    command: AccountCommand,
    client: &FutClient,
    store: &mut AccountStore,
    cancel: &CancellationToken,
    out: &mut W,
) -> anyhow::Result<()> {
    match command {
        AccountCommand::Login {
            email,
            password,
            secret,
            platform,
        } => {
            let credentials = Credentials {
                email,
                password,
                secret,
                platform,
            };
            login(client, store, &credentials, cancel, out).await
        }
        AccountCommand::Credits { email } => {
            credits(client, store, email.as_deref(), cancel, out).await
        }
        AccountCommand::Status => status(store, out),
        AccountCommand::Logout { email } => logout(store, email.as_deref(), out),
    }
}

async fn login<W: Write>(
    client: &FutClient,
    store: &mut AccountStore,
    credentials: &Credentials,
    cancel: &CancellationToken,
    out: &mut W,
) -> anyhow::Result<()> {
    let session = client
        .login_into(credentials, cancel, store)
        .await
        .map_err(|e| anyhow::anyhow!("Login failed: {e}"))?;

    writeln!(
        out,
        "Logged in as {} ({})",
        session.persona_name, session.email
    )?;
    if let Some(route) = &store.route {
        writeln!(out, "Route: {route}")?;
    }
    Ok(())
}

async fn credits<W: Write>(
    client: &FutClient,
    store: &mut AccountStore,
    email: Option<&str>,
    cancel: &CancellationToken,
    out: &mut W,
) -> anyhow::Result<()> {
    let session = match email {
        Some(email) => store.session_for(email)?,
        None => store.active_session()?,
    }
    .clone();

    let mut pending: Vec<AccountAction> = Vec::new();
    let credits = client
        .refresh_credits(&session, cancel, &mut pending)
        .await
        .map_err(|e| anyhow::anyhow!("Credits lookup failed: {e}"))?;

    // The balance belongs to the looked-up account, so switch to it first.
    store.apply(set_account_info("email", &session.email));
    for action in pending {
        store.apply(action);
    }

    writeln!(out, "{}: {credits} coins", session.email)?;
    Ok(())
}

fn status<W: Write>(store: &AccountStore, out: &mut W) -> anyhow::Result<()> {
    let mut any = false;
    for account in store.accounts() {
        any = true;
        let email = account.email().unwrap_or("<unknown>");
        let active = if store.account.email() == Some(email) {
            " (active)"
        } else {
            ""
        };
        writeln!(out, "{email}{active}")?;
        if let Some(name) = account.info.get("personaName") {
            writeln!(out, "  Persona: {name}")?;
        }
        if let Some(platform) = account.info.get("platform") {
            writeln!(out, "  Platform: {platform}")?;
        }
        match &account.session {
            Some(session) => writeln!(out, "  Session: {} @ {}", session.sid, session.host)?,
            None => writeln!(out, "  Session: none")?,
        }
        if let Some(credits) = account.credits {
            writeln!(out, "  Credits: {credits}")?;
        }
    }
    if !any {
        writeln!(out, "Not logged in")?;
    }
    Ok(())
}

fn logout<W: Write>(
    store: &mut AccountStore,
    email: Option<&str>,
    out: &mut W,
) -> anyhow::Result<()> {
    let email = email
        .map(str::to_string)
        .or_else(|| store.account.email().map(str::to_string))
        .ok_or_else(|| anyhow::anyhow!("Not logged in"))?;
    if store.remove(&email).is_some() {
        writeln!(out, "Logged out {email}")?;
    } else {
        writeln!(out, "No stored account for {email}")?;
    }
    Ok(())
}
