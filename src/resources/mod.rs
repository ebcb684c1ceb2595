//! Record types for the backend-managed resources
//!
//! The backend owns these shapes; the client only decodes them for display
//! and validates/sanitizes outgoing payloads against the matching schema.
//! Wire format is camelCase JSON.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One backend-managed entity type.
///
/// `path()` is the REST collection segment; cache invalidation after a
/// mutation is scoped to one of these.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    Programs,
    News,
    Partnerships,
    Events,
    Team,
    Faqs,
    Gallery,
    Contacts,
}

impl ResourceKind {
    pub const ALL: [ResourceKind; 8] = [
        ResourceKind::Programs,
        ResourceKind::News,
        ResourceKind::Partnerships,
        ResourceKind::Events,
        ResourceKind::Team,
        ResourceKind::Faqs,
        ResourceKind::Gallery,
        ResourceKind::Contacts,
    ];

    /// REST collection path segment
    pub fn path(&self) -> &'static str {
        match self {
            ResourceKind::Programs => "programs",
            ResourceKind::News => "news",
            ResourceKind::Partnerships => "partnerships",
            ResourceKind::Events => "events",
            ResourceKind::Team => "team",
            ResourceKind::Faqs => "faqs",
            ResourceKind::Gallery => "gallery",
            ResourceKind::Contacts => "contacts",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

impl FromStr for ResourceKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "programs" => Ok(ResourceKind::Programs),
            "news" => Ok(ResourceKind::News),
            "partnerships" => Ok(ResourceKind::Partnerships),
            "events" => Ok(ResourceKind::Events),
            "team" => Ok(ResourceKind::Team),
            "faqs" => Ok(ResourceKind::Faqs),
            "gallery" => Ok(ResourceKind::Gallery),
            "contacts" => Ok(ResourceKind::Contacts),
            other => Err(format!(
                "unknown resource: {} (expected one of programs, news, partnerships, events, team, faqs, gallery, contacts)",
                other
            )),
        }
    }
}

/// List endpoints return either a paginated envelope or a bare array.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ListPage<T> {
    Paged {
        items: Vec<T>,
        #[serde(rename = "totalPages", default)]
        total_pages: u32,
        #[serde(default)]
        total: Option<u64>,
    },
    Bare(Vec<T>),
}

impl<T> ListPage<T> {
    pub fn items(&self) -> &[T] {
        match self {
            ListPage::Paged { items, .. } => items,
            ListPage::Bare(items) => items,
        }
    }

    pub fn into_items(self) -> Vec<T> {
        match self {
            ListPage::Paged { items, .. } => items,
            ListPage::Bare(items) => items,
        }
    }

    pub fn total_pages(&self) -> u32 {
        match self {
            ListPage::Paged { total_pages, .. } => *total_pages,
            ListPage::Bare(_) => 1,
        }
    }

    pub fn len(&self) -> usize {
        self.items().len()
    }

    pub fn is_empty(&self) -> bool {
        self.items().is_empty()
    }
}

/// An exchange or study-abroad program listing
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Program {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub partner_university: String,
    #[serde(default)]
    pub country: Option<String>,
    pub duration: String,
    pub deadline: NaiveDate,
    pub application_link: String,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub active: bool,
    #[serde(default)]
    pub featured: bool,
}

/// A news article or announcement
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewsArticle {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub excerpt: Option<String>,
    pub content: String,
    pub category: String,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub published_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub published: bool,
    #[serde(default)]
    pub featured: bool,
}

/// A partner-university agreement
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Partnership {
    pub id: String,
    pub university: String,
    pub country: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub website_url: Option<String>,
    #[serde(default)]
    pub active: bool,
}

/// An office event (info session, fair, deadline reminder)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    pub date: NaiveDate,
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
    #[serde(default)]
    pub registration_link: Option<String>,
    #[serde(default)]
    pub published: bool,
}

/// A staff-directory entry
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamMember {
    pub id: String,
    pub name: String,
    pub role: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub photo_url: Option<String>,
    #[serde(default)]
    pub order: i32,
    #[serde(default)]
    pub active: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Faq {
    pub id: String,
    pub question: String,
    pub answer: String,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub order: i32,
    #[serde(default)]
    pub published: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GalleryItem {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub category: Option<String>,
    pub image_url: String,
    #[serde(default)]
    pub order: i32,
    #[serde(default)]
    pub featured: bool,
    #[serde(default)]
    pub active: bool,
}

/// A message submitted through the public contact form
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactMessage {
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub subject: Option<String>,
    pub message: String,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub read: bool,
}

/// One hit from the global search endpoint, spanning every resource kind
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchHit {
    pub id: String,
    /// Resource kind of the hit as reported by the backend
    #[serde(rename = "type")]
    pub kind: String,
    pub title: String,
    #[serde(default)]
    pub excerpt: Option<String>,
}
