use anyhow::Result;
use dialoguer::{Input, Password};
use lifeos_core::api::{AuthApi, HttpBackend};
use owo_colors::{OwoColorize, Style};

use crate::cli::LoginCommand;

pub async fn login(backend: &HttpBackend, command: LoginCommand) -> Result<()> {
    let username = match command.username {
        Some(username) => username,
        None => Input::<String>::new().with_prompt("Username").interact_text()?,
    };
    let password = match command.password {
        Some(password) => password,
        None => Password::new().with_prompt("Password").interact()?,
    };

    let response = backend.login(&username, &password).await?;
    println!(
        "{} Signed in as {}",
        "✓".style(Style::new().green().bold()),
        response.username.bold()
    );
    Ok(())
}

pub async fn logout(backend: &HttpBackend) -> Result<()> {
    backend.logout().await?;
    println!("Signed out.");
    Ok(())
}
