//! Wire records for the five daemon panels. Deserialized from the
//! daemon's list endpoints and handed to the panel engine, which only ever
//! sees them through the `PanelRecord` trait.

use chrono::DateTime;
use chrono::Utc;
use serde::Deserialize;

use tether_core::PanelRecord;

fn format_time(ts: Option<DateTime<Utc>>) -> String {
    ts.map(|t| t.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| "-".to_string())
}

/// One row in a panel list plus the expanded detail view. The engine does
/// not render; this is the seam the TUI uses to turn records into text.
pub trait RecordRow: PanelRecord {
    fn row(&self) -> String;
    fn detail_lines(&self) -> Vec<String>;
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct IntegrationRecord {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub connected: bool,
    #[serde(default)]
    pub account: Option<String>,
}

impl PanelRecord for IntegrationRecord {
    fn id(&self) -> &str {
        &self.id
    }

    // Section 0 is "connected", section 1 is "available".
    fn section(&self) -> usize {
        usize::from(!self.connected)
    }

    fn field(&self, name: &str) -> Option<&str> {
        match name {
            "id" => Some(&self.id),
            "name" => Some(&self.name),
            "description" => Some(&self.description),
            "account" => self.account.as_deref(),
            _ => None,
        }
    }
}

impl RecordRow for IntegrationRecord {
    fn row(&self) -> String {
        match self.account.as_deref() {
            Some(account) => format!("{}  ({account})", self.name),
            None => self.name.clone(),
        }
    }

    fn detail_lines(&self) -> Vec<String> {
        vec![
            format!("id: {}", self.id),
            format!("name: {}", self.name),
            format!(
                "status: {}",
                if self.connected { "connected" } else { "available" }
            ),
            format!("account: {}", self.account.as_deref().unwrap_or("-")),
            String::new(),
            self.description.clone(),
        ]
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct MemoryRecord {
    pub id: String,
    pub text: String,
    /// Space-separated tag line as the daemon sends it.
    #[serde(default)]
    pub tags: String,
    #[serde(default)]
    pub pinned: bool,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl PanelRecord for MemoryRecord {
    fn id(&self) -> &str {
        &self.id
    }

    fn field(&self, name: &str) -> Option<&str> {
        match name {
            "id" => Some(&self.id),
            "text" => Some(&self.text),
            "tags" => Some(&self.tags),
            _ => None,
        }
    }
}

impl RecordRow for MemoryRecord {
    fn row(&self) -> String {
        let pin = if self.pinned { "* " } else { "  " };
        format!("{pin}{}", self.text.replace('\n', " "))
    }

    fn detail_lines(&self) -> Vec<String> {
        vec![
            format!("id: {}", self.id),
            format!(
                "tags: {}",
                if self.tags.is_empty() { "-" } else { self.tags.as_str() }
            ),
            format!("pinned: {}", self.pinned),
            format!("updated: {}", format_time(self.updated_at)),
            String::new(),
            self.text.clone(),
        ]
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct DocumentRecord {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub path: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub indexed_at: Option<DateTime<Utc>>,
}

impl PanelRecord for DocumentRecord {
    fn id(&self) -> &str {
        &self.id
    }

    fn field(&self, name: &str) -> Option<&str> {
        match name {
            "id" => Some(&self.id),
            "title" => Some(&self.title),
            "path" => Some(&self.path),
            _ => None,
        }
    }
}

impl RecordRow for DocumentRecord {
    fn row(&self) -> String {
        format!("{}  [{}]", self.title, self.status)
    }

    fn detail_lines(&self) -> Vec<String> {
        vec![
            format!("id: {}", self.id),
            format!("title: {}", self.title),
            format!("path: {}", self.path),
            format!("status: {}", self.status),
            format!("indexed: {}", format_time(self.indexed_at)),
        ]
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct BrowserTabRecord {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub status: String,
}

impl PanelRecord for BrowserTabRecord {
    fn id(&self) -> &str {
        &self.id
    }

    fn field(&self, name: &str) -> Option<&str> {
        match name {
            "id" => Some(&self.id),
            "title" => Some(&self.title),
            "url" => Some(&self.url),
            _ => None,
        }
    }
}

impl RecordRow for BrowserTabRecord {
    fn row(&self) -> String {
        format!("{}  {}", self.title, self.url)
    }

    fn detail_lines(&self) -> Vec<String> {
        vec![
            format!("id: {}", self.id),
            format!("title: {}", self.title),
            format!("url: {}", self.url),
            format!("status: {}", self.status),
        ]
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct PersonaRecord {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub active: bool,
}

impl PanelRecord for PersonaRecord {
    fn id(&self) -> &str {
        &self.id
    }

    fn field(&self, name: &str) -> Option<&str> {
        match name {
            "id" => Some(&self.id),
            "name" => Some(&self.name),
            "description" => Some(&self.description),
            _ => None,
        }
    }
}

impl RecordRow for PersonaRecord {
    fn row(&self) -> String {
        let mark = if self.active { "> " } else { "  " };
        format!("{mark}{}", self.name)
    }

    fn detail_lines(&self) -> Vec<String> {
        vec![
            format!("id: {}", self.id),
            format!("name: {}", self.name),
            format!("active: {}", self.active),
            String::new(),
            self.description.clone(),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn integration_sections_split_on_connection() {
        let connected: IntegrationRecord = serde_json::from_value(serde_json::json!({
            "id": "gmail", "name": "Gmail", "connected": true
        }))
        .unwrap();
        let available: IntegrationRecord = serde_json::from_value(serde_json::json!({
            "id": "slack", "name": "Slack"
        }))
        .unwrap();

        assert_eq!(connected.section(), 0);
        assert_eq!(available.section(), 1);
    }

    #[test]
    fn unknown_search_fields_resolve_to_none() {
        let record = MemoryRecord {
            id: "m1".into(),
            text: "remember the milk".into(),
            tags: "errand".into(),
            pinned: false,
            updated_at: None,
        };
        assert_eq!(record.field("text"), Some("remember the milk"));
        assert_eq!(record.field("title"), None);
    }

    #[test]
    fn records_tolerate_minimal_payloads() {
        let record: DocumentRecord =
            serde_json::from_value(serde_json::json!({"id": "d1", "title": "Notes"})).unwrap();
        assert_eq!(record.status, "");
        assert_eq!(record.indexed_at, None);
    }
}
