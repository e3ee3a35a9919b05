//! Session command handlers: login, logout, whoami.

use dialoguer::Input;
use secrecy::SecretString;
use serde::Serialize;

use pawmart_core::{AuthSession, Marketplace};

use crate::cli::{GlobalOpts, LoginArgs};
use crate::error::CliError;
use crate::output;

use super::util;

#[derive(Serialize)]
struct WhoAmI {
    email: Option<String>,
    name: Option<String>,
    role: Option<String>,
}

impl From<&AuthSession> for WhoAmI {
    fn from(session: &AuthSession) -> Self {
        let user = session.user.as_ref();
        Self {
            email: session.email().map(String::from),
            name: user.and_then(|u| u.text("name")),
            role: session.role().map(String::from),
        }
    }
}

fn detail(who: &WhoAmI) -> String {
    format!(
        "Name:   {}\nEmail:  {}\nRole:   {}",
        who.name.as_deref().unwrap_or("-"),
        who.email.as_deref().unwrap_or("-"),
        who.role.as_deref().unwrap_or("-"),
    )
}

fn prompt_err(e: impl std::fmt::Display) -> CliError {
    CliError::Validation {
        field: "interactive".into(),
        reason: format!("prompt failed: {e}"),
    }
}

// ── Handlers ────────────────────────────────────────────────────────

pub async fn login(
    market: &Marketplace,
    args: LoginArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let email = match args.email {
        Some(email) => email,
        None => Input::new()
            .with_prompt("Email")
            .interact_text()
            .map_err(prompt_err)?,
    };
    let password = match args.password {
        Some(password) => password,
        None => rpassword::prompt_password("Password: ").map_err(prompt_err)?,
    };
    if email.trim().is_empty() || password.is_empty() {
        return Err(CliError::Validation {
            field: "credentials".into(),
            reason: "email and password cannot be empty".into(),
        });
    }

    let session = util::fulfilled(
        market
            .auth()
            .login(email.trim(), &SecretString::from(password))
            .await?,
    )?;

    let who = WhoAmI::from(&session);
    let out = output::render_single(&global.output, &who, detail, |w| {
        w.email.clone().unwrap_or_default()
    })?;
    output::print_output(&out, global.quiet);
    Ok(())
}

pub async fn logout(market: &Marketplace) -> Result<(), CliError> {
    if !market.auth().is_authenticated() {
        return Err(CliError::NotAuthenticated);
    }
    market.auth().logout().await?;
    Ok(())
}

pub fn whoami(market: &Marketplace, global: &GlobalOpts) -> Result<(), CliError> {
    let session = market.auth().session().ok_or(CliError::NotAuthenticated)?;
    let who = WhoAmI::from(&session);
    let out = output::render_single(&global.output, &who, detail, |w| {
        w.email.clone().unwrap_or_default()
    })?;
    output::print_output(&out, global.quiet);
    Ok(())
}
