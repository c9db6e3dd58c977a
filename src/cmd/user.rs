use clap::{Args, Subcommand};

use crate::context::AppContext;
use crate::domain::user::{User, UserForm, UserRole};
use crate::error::{AppError, AppResult};
use crate::workflow::user;

#[derive(Args, Debug, Clone)]
pub struct UserArgs {
    #[command(subcommand)]
    pub command: UserCommand,
}

#[derive(Subcommand, Debug, Clone)]
pub enum UserCommand {
    /// List all users.
    List,
    /// Show a single user.
    Show { id: u64 },
    /// Create a user.
    Create(CreateUserArgs),
    /// Edit a user; omitted fields keep their stored values.
    Update(UpdateUserArgs),
}

#[derive(Args, Debug, Clone)]
pub struct CreateUserArgs {
    #[arg(long)]
    pub name: String,
    #[arg(long)]
    pub email: String,
    #[arg(long)]
    pub password: String,
    /// USER, IT or ADMIN.
    #[arg(long, default_value = "USER")]
    pub role: String,
    #[arg(long)]
    pub department: Option<String>,
    #[arg(long)]
    pub phone: Option<String>,
    #[arg(long)]
    pub line_id: Option<String>,
}

#[derive(Args, Debug, Clone)]
pub struct UpdateUserArgs {
    pub id: u64,
    #[arg(long)]
    pub name: Option<String>,
    #[arg(long)]
    pub email: Option<String>,
    #[arg(long)]
    pub password: Option<String>,
    #[arg(long)]
    pub role: Option<String>,
    #[arg(long)]
    pub department: Option<String>,
    #[arg(long)]
    pub phone: Option<String>,
    #[arg(long)]
    pub line_id: Option<String>,
}

pub async fn run(ctx: &AppContext, command: UserCommand) -> AppResult<()> {
    match command {
        UserCommand::List => {
            let users = ctx.helpdesk.list_users().await?;
            for user in &users {
                println!(
                    "#{:<5} {:<24} {:<6} {}",
                    user.id,
                    user.name,
                    user.role.as_str(),
                    user.email
                );
            }
            Ok(())
        }
        UserCommand::Show { id } => {
            print_user(&ctx.helpdesk.get_user(id).await?);
            Ok(())
        }
        UserCommand::Create(args) => {
            let form = UserForm {
                name: args.name,
                email: args.email,
                password: Some(args.password),
                role: parse_role(&args.role)?,
                department: args.department,
                phone_number: args.phone,
                line_id: args.line_id,
            };
            user::create_user(ctx, form).await?;
            println!("User created successfully");
            Ok(())
        }
        UserCommand::Update(args) => {
            let role = args.role.as_deref().map(parse_role).transpose()?;
            let id = args.id;
            let saved = user::update_user(ctx, id, |form| {
                if let Some(name) = args.name {
                    form.name = name;
                }
                if let Some(email) = args.email {
                    form.email = email;
                }
                if let Some(role) = role {
                    form.role = role;
                }
                if args.password.is_some() {
                    form.password = args.password;
                }
                if args.department.is_some() {
                    form.department = args.department;
                }
                if args.phone.is_some() {
                    form.phone_number = args.phone;
                }
                if args.line_id.is_some() {
                    form.line_id = args.line_id;
                }
            })
            .await?;
            println!("User updated successfully: {} <{}>", saved.name, saved.email);
            Ok(())
        }
    }
}

fn parse_role(value: &str) -> AppResult<UserRole> {
    UserRole::from_str(value).ok_or_else(|| {
        AppError::Validation(format!("unknown role '{value}', expected USER, IT or ADMIN"))
    })
}

fn print_user(user: &User) {
    println!("#{} {}", user.id, user.name);
    println!("Email: {}", user.email);
    println!("Role: {}", user.role.as_str());
    println!("Department: {}", user.department.as_deref().unwrap_or("-"));
    println!("Phone: {}", user.phone_number.as_deref().unwrap_or("-"));
    println!("LINE: {}", user.line_id.as_deref().unwrap_or("<not linked>"));
}
