use clap::Subcommand;
use serde_json::json;

use crate::api::AuthApi;
use crate::cli::utils::*;
use crate::cli::OutputFormat;

#[derive(Subcommand)]
pub enum AuthCommands {
    #[command(about = "Log in and store the session token")]
    Login {
        #[arg(help = "Account email")]
        email: String,

        #[arg(long, help = "Account password")]
        password: String,
    },

    #[command(about = "Drop the stored session token")]
    Logout,

    #[command(about = "Show whether a session token is stored")]
    Status,

    #[command(about = "Show the authenticated account")]
    Whoami,

    #[command(about = "Change the account password")]
    ChangePassword {
        #[arg(long, help = "Current password")]
        current: String,

        #[arg(long, help = "New password")]
        new: String,
    },
}

pub async fn handle(cmd: AuthCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    let gateway = connect()?;
    let auth = AuthApi::new(gateway.clone());

    match cmd {
        AuthCommands::Login { email, password } => {
            let user = auth.login(&email, &password).await?;
            output_success(
                &output_format,
                &format!("Logged in as {} ({})", user.email, user.role),
                Some(json!({ "user": user })),
            )
        }
        AuthCommands::Logout => {
            if auth.logout() {
                output_success(&output_format, "Logged out", None)
            } else {
                output_success(&output_format, "No session to log out of", None)
            }
        }
        AuthCommands::Status => {
            // Local check only; whoami is the network-verified variant.
            let logged_in = gateway.session().token().is_some();
            match output_format {
                OutputFormat::Json => {
                    println!(
                        "{}",
                        serde_json::to_string_pretty(&json!({ "logged_in": logged_in }))?
                    );
                }
                OutputFormat::Text => {
                    if logged_in {
                        println!("Logged in (token stored)");
                    } else {
                        println!("Not logged in");
                    }
                }
            }
            Ok(())
        }
        AuthCommands::Whoami => {
            let user = auth.me().await?;
            match output_format {
                OutputFormat::Json => {
                    println!("{}", serde_json::to_string_pretty(&json!({ "user": user }))?);
                }
                OutputFormat::Text => {
                    println!("{:<12} {}", "ID:", user.id);
                    println!("{:<12} {}", "Email:", user.email);
                    println!("{:<12} {}", "Role:", user.role);
                    if let Some(client_name) = &user.client_name {
                        println!("{:<12} {}", "Client:", client_name);
                    }
                    if let Some(last_login) = user.last_login {
                        println!("{:<12} {}", "Last login:", format_date(Some(last_login)));
                    }
                }
            }
            Ok(())
        }
        AuthCommands::ChangePassword { current, new } => {
            auth.change_password(&current, &new).await?;
            output_success(&output_format, "Password changed", None)
        }
    }
}
