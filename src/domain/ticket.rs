use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TicketStatus {
    #[default]
    Open,
    InProgress,
    WaitingUser,
    Done,
    Cancel,
    /// A status this client does not know about, kept verbatim.
    Other(String),
}

impl TicketStatus {
    pub const KNOWN: [TicketStatus; 5] = [
        TicketStatus::Open,
        TicketStatus::InProgress,
        TicketStatus::WaitingUser,
        TicketStatus::Done,
        TicketStatus::Cancel,
    ];

    pub fn as_str(&self) -> &str {
        match self {
            TicketStatus::Open => "OPEN",
            TicketStatus::InProgress => "IN_PROGRESS",
            TicketStatus::WaitingUser => "WAITING_USER",
            TicketStatus::Done => "DONE",
            TicketStatus::Cancel => "CANCEL",
            TicketStatus::Other(raw) => raw,
        }
    }

    pub fn from_str(value: &str) -> Option<Self> {
        match value.trim().to_uppercase().replace(['-', ' '], "_").as_str() {
            "OPEN" => Some(TicketStatus::Open),
            "IN_PROGRESS" => Some(TicketStatus::InProgress),
            "WAITING_USER" => Some(TicketStatus::WaitingUser),
            "DONE" => Some(TicketStatus::Done),
            "CANCEL" => Some(TicketStatus::Cancel),
            _ => None,
        }
    }

    pub fn label(&self) -> &str {
        match self {
            TicketStatus::Open => "Open",
            TicketStatus::InProgress => "In Progress",
            TicketStatus::WaitingUser => "Waiting User",
            TicketStatus::Done => "Completed",
            TicketStatus::Cancel => "Cancelled",
            TicketStatus::Other(raw) => raw,
        }
    }

    /// Short marker shown next to a ticket in the requester's status view.
    pub fn marker(&self) -> &'static str {
        match self {
            TicketStatus::InProgress => "⚙️",
            TicketStatus::WaitingUser => "⏳",
            TicketStatus::Done => "✅",
            TicketStatus::Cancel => "❌",
            TicketStatus::Open | TicketStatus::Other(_) => "📌",
        }
    }
}

impl From<String> for TicketStatus {
    fn from(value: String) -> Self {
        TicketStatus::from_str(&value).unwrap_or(TicketStatus::Other(value))
    }
}

impl From<TicketStatus> for String {
    fn from(status: TicketStatus) -> Self {
        status.as_str().to_string()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
    Other(String),
}

impl Priority {
    pub fn as_str(&self) -> &str {
        match self {
            Priority::Low => "LOW",
            Priority::Medium => "MEDIUM",
            Priority::High => "HIGH",
            Priority::Other(raw) => raw,
        }
    }

    pub fn from_str(value: &str) -> Option<Self> {
        match value.trim().to_uppercase().as_str() {
            "LOW" => Some(Priority::Low),
            "MEDIUM" => Some(Priority::Medium),
            "HIGH" => Some(Priority::High),
            _ => None,
        }
    }

    pub fn label(&self) -> &str {
        match self {
            Priority::Low => "Low",
            Priority::Medium => "Medium",
            Priority::High => "High",
            Priority::Other(raw) => raw,
        }
    }
}

impl From<String> for Priority {
    fn from(value: String) -> Self {
        Priority::from_str(&value).unwrap_or(Priority::Other(value))
    }
}

impl From<Priority> for String {
    fn from(priority: Priority) -> Self {
        priority.as_str().to_string()
    }
}

/// A ticket as returned by the helpdesk API. List endpoints return a
/// subset of the fields, so everything defaults.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Ticket {
    pub id: u64,
    pub ticket_code: String,
    pub title: String,
    pub description: String,
    pub status: TicketStatus,
    pub priority: Priority,
    pub equipment_name: String,
    pub location: String,
    pub problem_category: String,
    pub problem_subcategory: String,
    pub notes: Option<String>,
    pub user: Option<UserRef>,
    pub assignee: Option<UserRef>,
    pub attachments: Vec<Attachment>,
    pub logs: Vec<TicketLog>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

impl Ticket {
    pub fn assignee_id(&self) -> Option<u64> {
        self.assignee.as_ref().and_then(|assignee| assignee.id)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct UserRef {
    pub id: Option<u64>,
    pub name: String,
    pub email: Option<String>,
    pub department: Option<String>,
    pub phone_number: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Attachment {
    pub id: u64,
    pub filename: String,
    pub file_url: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TicketLog {
    pub id: u64,
    pub status: TicketStatus,
    pub comment: Option<String>,
    pub created_at: Option<String>,
}

/// Body of `PUT /api/tickets/{id}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TicketUpdate {
    pub status: TicketStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assigned_to: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Body of `PUT /api/tickets/{id}/status`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusChange {
    pub status: TicketStatus,
    pub comment: String,
}
