use clap::{Args, Subcommand};

use crate::context::AppContext;
use crate::error::AppResult;
use crate::workflow::liff;

#[derive(Args, Debug, Clone)]
pub struct LineArgs {
    #[command(subcommand)]
    pub command: LineCommand,
}

#[derive(Subcommand, Debug, Clone)]
pub enum LineCommand {
    /// Show the LINE identity resolved for this session.
    Whoami {
        #[arg(long)]
        page_url: Option<String>,
    },
}

pub async fn run(ctx: &AppContext, command: LineCommand) -> AppResult<()> {
    match command {
        LineCommand::Whoami { page_url } => {
            let state = liff::initialize(
                ctx.messaging.as_deref(),
                &ctx.config.liff_id,
                page_url.as_deref(),
            )
            .await;

            if let Some(error) = state.error {
                println!("LIFF error: {error}");
                return Ok(());
            }
            if state.login_started {
                println!("Login started; run again once signed in.");
                return Ok(());
            }
            match state.context {
                Some(context) => {
                    println!("User id: {}", context.user_id);
                    println!("Display name: {}", context.display_name);
                    if !context.picture_url.is_empty() {
                        println!("Picture: {}", context.picture_url);
                    }
                    println!("Linked: {}", if context.is_linked { "yes" } else { "no" });
                }
                None => println!("No LINE identity available."),
            }
            Ok(())
        }
    }
}
