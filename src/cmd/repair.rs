use clap::{Args, Subcommand};

use crate::cmd::ticket::category_with_subcategory;
use crate::context::AppContext;
use crate::domain::repair::RepairForm;
use crate::error::AppResult;
use crate::workflow::repair::{self, Requester};

#[derive(Args, Debug, Clone)]
pub struct RepairArgs {
    #[command(subcommand)]
    pub command: RepairCommand,
}

#[derive(Subcommand, Debug, Clone)]
pub enum RepairCommand {
    /// Submit a repair request as an employee.
    Request(RepairRequestArgs),
    /// Show the status of your repair requests.
    Status {
        /// Page URL opened from LINE; its `lineId` parameter identifies you.
        #[arg(long)]
        page_url: Option<String>,
    },
}

#[derive(Args, Debug, Clone)]
pub struct RepairRequestArgs {
    #[arg(long)]
    pub location: String,
    #[arg(long)]
    pub equipment: String,
    #[arg(long)]
    pub description: String,
    #[arg(long, default_value = "HARDWARE")]
    pub category: String,
    #[arg(long)]
    pub subcategory: Option<String>,
    #[arg(long, default_value = "")]
    pub notes: String,
    /// Page URL opened from LINE; its `lineId` parameter identifies you.
    #[arg(long)]
    pub page_url: Option<String>,
}

pub async fn run(ctx: &AppContext, command: RepairCommand) -> AppResult<()> {
    match command {
        RepairCommand::Request(args) => {
            let (category, subcategory) =
                category_with_subcategory(&args.category, args.subcategory)?;
            let form = RepairForm {
                location: args.location,
                category,
                subcategory,
                equipment_name: args.equipment,
                description: args.description,
                notes: args.notes,
            };
            let outcome =
                repair::submit_repair_request(ctx, form, args.page_url.as_deref()).await?;
            report_identity(&outcome.requester);
            println!("Repair request submitted. IT staff will contact you shortly.");
            if !outcome.ticket.ticket_code.is_empty() {
                println!("Ticket: {}", outcome.ticket.ticket_code);
            }
            Ok(())
        }
        RepairCommand::Status { page_url } => {
            let (requester, tickets) = repair::repair_status(ctx, page_url.as_deref()).await?;
            report_identity(&requester);
            if tickets.is_empty() {
                println!("No repair requests found.");
            }
            for ticket in &tickets {
                println!(
                    "{} {} {} [{}]",
                    ticket.status.marker(),
                    ticket.ticket_code,
                    ticket.status.label(),
                    ticket.priority.label()
                );
                println!("   {} @ {}", ticket.equipment_name, ticket.location);
                if let Some(assignee) = &ticket.assignee {
                    println!("   Handled by {}", assignee.name);
                }
            }
            Ok(())
        }
    }
}

fn report_identity(requester: &Requester) {
    if let Some(error) = &requester.liff.error {
        eprintln!("Warning: {error}");
    }
    match (&requester.liff.context, &requester.line_id) {
        (Some(context), _) => println!("Requester: {} (user #{})", context.display_name, requester.user_id),
        (None, Some(line_id)) => println!("Requester: LINE {line_id} (user #{})", requester.user_id),
        (None, None) => println!("Requester: user #{}", requester.user_id),
    }
}
