use std::fs;
use std::path::{Path, PathBuf};

use clap::{Args, Subcommand};

use crate::context::AppContext;
use crate::domain::category::ProblemCategory;
use crate::domain::repair::{NewTicket, UploadFile};
use crate::domain::ticket::{Priority, Ticket, TicketStatus};
use crate::error::{AppError, AppResult};
use crate::workflow::ticket::{self, TicketEdit};

#[derive(Args, Debug, Clone)]
pub struct TicketArgs {
    #[command(subcommand)]
    pub command: TicketCommand,
}

#[derive(Subcommand, Debug, Clone)]
pub enum TicketCommand {
    /// List tickets, optionally filtered by status and search text.
    List {
        /// OPEN, IN_PROGRESS, WAITING_USER, DONE, CANCEL or ALL.
        #[arg(short, long, default_value = "ALL")]
        status: String,
        /// Case-insensitive match on ticket code or title.
        #[arg(short = 'q', long)]
        search: Option<String>,
    },
    /// Show a ticket with its attachments and history.
    Show { id: u64 },
    /// Update status, assignee or notes of a ticket.
    Update(UpdateTicketArgs),
    /// Open a new ticket, optionally with attachments.
    Create(CreateTicketArgs),
}

#[derive(Args, Debug, Clone)]
pub struct UpdateTicketArgs {
    pub id: u64,
    #[arg(long)]
    pub status: Option<String>,
    /// User id of the new assignee.
    #[arg(long)]
    pub assignee: Option<u64>,
    #[arg(long)]
    pub notes: Option<String>,
    /// Comment recorded with a status change.
    #[arg(long)]
    pub comment: Option<String>,
}

#[derive(Args, Debug, Clone)]
pub struct CreateTicketArgs {
    #[arg(long)]
    pub title: String,
    #[arg(long)]
    pub description: String,
    #[arg(long)]
    pub equipment: String,
    #[arg(long)]
    pub location: String,
    #[arg(long, default_value = "OTHER")]
    pub category: String,
    /// Defaults to the first subcategory of the category.
    #[arg(long)]
    pub subcategory: Option<String>,
    #[arg(long, default_value = "MEDIUM")]
    pub priority: String,
    /// File to attach; repeat for several files.
    #[arg(long = "file")]
    pub files: Vec<PathBuf>,
}

pub async fn run(ctx: &AppContext, command: TicketCommand) -> AppResult<()> {
    match command {
        TicketCommand::List { status, search } => {
            let filter = parse_status_filter(&status)?;
            let tickets = ticket::list_tickets(ctx, filter.as_ref(), search.as_deref()).await?;
            if tickets.is_empty() {
                println!("No tickets found.");
            }
            for ticket in &tickets {
                println!("{}", summary_line(ticket));
            }
            Ok(())
        }
        TicketCommand::Show { id } => {
            let ticket = ctx.helpdesk.get_ticket(id).await?;
            print_detail(&ticket);
            Ok(())
        }
        TicketCommand::Update(args) => {
            let edit = TicketEdit {
                status: args.status.as_deref().map(parse_status).transpose()?,
                assigned_to: args.assignee,
                notes: args.notes,
                comment: args.comment,
            };
            let ticket = ticket::update_ticket(ctx, args.id, edit).await?;
            println!("Ticket updated successfully");
            println!("{}", summary_line(&ticket));
            Ok(())
        }
        TicketCommand::Create(args) => {
            let new_ticket = new_ticket_from_args(args)?;
            let ticket = ticket::create_ticket(ctx, new_ticket).await?;
            println!("Ticket created successfully!");
            if ticket.ticket_code.is_empty() {
                println!("Ticket id: {}", ticket.id);
            } else {
                println!("{} (id {})", ticket.ticket_code, ticket.id);
            }
            Ok(())
        }
    }
}

pub fn parse_status(value: &str) -> AppResult<TicketStatus> {
    TicketStatus::from_str(value).ok_or_else(|| {
        let known = TicketStatus::KNOWN
            .iter()
            .map(TicketStatus::as_str)
            .collect::<Vec<_>>()
            .join(", ");
        AppError::Validation(format!("unknown status '{value}', expected one of {known}"))
    })
}

fn parse_status_filter(value: &str) -> AppResult<Option<TicketStatus>> {
    if value.trim().eq_ignore_ascii_case("all") {
        Ok(None)
    } else {
        parse_status(value).map(Some)
    }
}

fn parse_category(value: &str) -> AppResult<ProblemCategory> {
    ProblemCategory::from_str(value).ok_or_else(|| {
        let known = ProblemCategory::ALL
            .iter()
            .map(ProblemCategory::as_str)
            .collect::<Vec<_>>()
            .join(", ");
        AppError::Validation(format!(
            "unknown category '{value}', expected one of {known}"
        ))
    })
}

pub(crate) fn category_with_subcategory(
    category: &str,
    subcategory: Option<String>,
) -> AppResult<(ProblemCategory, String)> {
    let category = parse_category(category)?;
    let subcategory =
        subcategory.unwrap_or_else(|| category.default_subcategory().to_string());
    Ok((category, subcategory))
}

fn new_ticket_from_args(args: CreateTicketArgs) -> AppResult<NewTicket> {
    let (category, subcategory) = category_with_subcategory(&args.category, args.subcategory)?;
    let priority = Priority::from_str(&args.priority).ok_or_else(|| {
        AppError::Validation(format!(
            "unknown priority '{}', expected LOW, MEDIUM or HIGH",
            args.priority
        ))
    })?;
    let files = args
        .files
        .iter()
        .map(|path| read_upload(path))
        .collect::<AppResult<Vec<_>>>()?;

    Ok(NewTicket {
        title: args.title,
        description: args.description,
        equipment_name: args.equipment,
        location: args.location,
        category,
        subcategory,
        priority,
        files,
    })
}

fn read_upload(path: &Path) -> AppResult<UploadFile> {
    let file_name = path
        .file_name()
        .and_then(|name| name.to_str())
        .ok_or_else(|| AppError::Validation(format!("invalid file path {}", path.display())))?
        .to_string();
    let content = fs::read(path)?;
    Ok(UploadFile { file_name, content })
}

fn summary_line(ticket: &Ticket) -> String {
    format!(
        "#{:<5} {:<12} {:<13} {:<7} {}",
        ticket.id,
        ticket.ticket_code,
        ticket.status.label(),
        ticket.priority.as_str(),
        ticket.title
    )
}

fn print_detail(ticket: &Ticket) {
    println!("{} {}", ticket.ticket_code, ticket.title);
    println!("Status: {}", ticket.status.label());
    println!("Priority: {}", ticket.priority.label());
    println!(
        "Category: {} / {}",
        ticket.problem_category, ticket.problem_subcategory
    );
    println!("Equipment: {}", ticket.equipment_name);
    println!("Location: {}", ticket.location);
    if let Some(user) = &ticket.user {
        let email = user.email.as_deref().unwrap_or("-");
        println!("Reported by: {} <{}>", user.name, email);
        if let Some(department) = &user.department {
            println!("Department: {department}");
        }
        if let Some(phone) = &user.phone_number {
            println!("Phone: {phone}");
        }
    }
    match &ticket.assignee {
        Some(assignee) => println!("Assignee: {}", assignee.name),
        None => println!("Assignee: <unassigned>"),
    }
    if let Some(created) = &ticket.created_at {
        println!("Created: {created}");
    }
    if let Some(updated) = &ticket.updated_at {
        println!("Updated: {updated}");
    }
    println!();
    println!("{}", ticket.description);
    if let Some(notes) = ticket.notes.as_deref().filter(|notes| !notes.is_empty()) {
        println!();
        println!("Notes: {notes}");
    }

    if !ticket.attachments.is_empty() {
        println!();
        println!("Attachments:");
        for attachment in &ticket.attachments {
            println!("  {} ({})", attachment.filename, attachment.file_url);
        }
    }

    if !ticket.logs.is_empty() {
        println!();
        println!("History:");
        for log in &ticket.logs {
            let when = log.created_at.as_deref().unwrap_or("");
            println!("  {when} Status changed to {}", log.status.label());
            if let Some(comment) = log.comment.as_deref().filter(|c| !c.is_empty()) {
                println!("    {comment}");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_disables_status_filter() {
        assert_eq!(parse_status_filter("all").unwrap(), None);
        assert_eq!(
            parse_status_filter("done").unwrap(),
            Some(TicketStatus::Done)
        );
        assert!(parse_status_filter("closed").is_err());
    }

    #[test]
    fn subcategory_defaults_to_first_of_category() {
        let (category, subcategory) = category_with_subcategory("printer", None).unwrap();
        assert_eq!(category, ProblemCategory::Printer);
        assert_eq!(subcategory, "JAM");
        assert!(category_with_subcategory("plumbing", None).is_err());
    }

    #[test]
    fn reads_attachment_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("screen.png");
        fs::write(&path, b"png-bytes").unwrap();

        let upload = read_upload(&path).unwrap();
        assert_eq!(upload.file_name, "screen.png");
        assert_eq!(upload.content, b"png-bytes");
    }
}
