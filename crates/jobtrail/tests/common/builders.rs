//! Builders for test messages and configurations.

#![allow(dead_code)]

use std::collections::HashMap;

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use chrono::NaiveDate;

use jobtrail::config::{Config, DateRange, LabelAssignment, ParserType};
use jobtrail::email::{Header, MessageBody, MessagePart, RawMessage};
use jobtrail::record::ApplicationStatus;

pub const APPLIED: &str = "LinkedIn/Applied";
pub const VIEWED: &str = "LinkedIn/Viewed";
pub const REJECTED: &str = "LinkedIn/Rejected";

/// Milliseconds since the epoch for midday UTC on the given date.
pub fn internal_date(year: i32, month: u32, day: u32) -> String {
    let millis = NaiveDate::from_ymd_opt(year, month, day)
        .unwrap()
        .and_hms_opt(12, 0, 0)
        .unwrap()
        .and_utc()
        .timestamp_millis();
    millis.to_string()
}

/// Plain-text body of an "application sent" confirmation. An empty
/// location leaves the third line out.
pub fn applied_body(company: &str, title: &str, location: &str) -> String {
    format!("Your application was sent to {company}\n\n{title}\n{company}\n{location}\n")
}

/// HTML job card as found in viewed/rejected notifications.
pub fn job_card_html(company: &str, title: &str, location: &str) -> String {
    format!(
        r#"<html><body><table><tr><td>
<a href="https://example.com/jobs/view/1" style="color: #0a66c2; font-weight: 600;">{title}</a>
<p class="text-sm">{company} &middot; {location}</p>
</td></tr></table></body></html>"#
    )
}

fn leaf(mime_type: &str, content: &str) -> MessagePart {
    MessagePart {
        mime_type: mime_type.to_string(),
        body: MessageBody {
            data: Some(URL_SAFE_NO_PAD.encode(content)),
            size: content.len() as u64,
            ..Default::default()
        },
        ..Default::default()
    }
}

/// Builder for provider-shaped `RawMessage` payloads.
pub struct MessageBuilder {
    id: String,
    subject: Option<String>,
    date_header: Option<String>,
    internal_date: Option<String>,
    plain: Option<String>,
    html: Option<String>,
    attachments: Vec<(String, String)>,
}

impl MessageBuilder {
    pub fn new(id: &str) -> Self {
        Self {
            id: id.to_string(),
            subject: None,
            date_header: None,
            internal_date: Some(internal_date(2024, 2, 1)),
            plain: None,
            html: None,
            attachments: Vec::new(),
        }
    }

    pub fn subject(mut self, subject: &str) -> Self {
        self.subject = Some(subject.to_string());
        self
    }

    pub fn date_header(mut self, value: &str) -> Self {
        self.date_header = Some(value.to_string());
        self
    }

    pub fn internal_date(mut self, value: Option<String>) -> Self {
        self.internal_date = value;
        self
    }

    pub fn received(self, year: i32, month: u32, day: u32) -> Self {
        self.internal_date(Some(internal_date(year, month, day)))
    }

    pub fn plain(mut self, body: &str) -> Self {
        self.plain = Some(body.to_string());
        self
    }

    pub fn html(mut self, body: &str) -> Self {
        self.html = Some(body.to_string());
        self
    }

    /// Adds a file attachment; it must never be picked as a body.
    pub fn attachment(mut self, filename: &str, content: &str) -> Self {
        self.attachments
            .push((filename.to_string(), content.to_string()));
        self
    }

    pub fn build(self) -> RawMessage {
        let mut headers = Vec::new();
        if let Some(subject) = self.subject {
            headers.push(Header {
                name: "Subject".to_string(),
                value: subject,
            });
        }
        if let Some(date) = self.date_header {
            headers.push(Header {
                name: "Date".to_string(),
                value: date,
            });
        }

        let mut leaves = Vec::new();
        if let Some(plain) = &self.plain {
            leaves.push(leaf("text/plain", plain));
        }
        if let Some(html) = &self.html {
            leaves.push(leaf("text/html", html));
        }

        let single_body = leaves.len() == 1 && self.attachments.is_empty();
        let mut payload = if single_body {
            leaves.remove(0)
        } else {
            let mut parts = vec![MessagePart {
                mime_type: "multipart/alternative".to_string(),
                parts: leaves,
                ..Default::default()
            }];
            for (filename, content) in &self.attachments {
                let mut part = leaf("application/octet-stream", content);
                part.filename = filename.clone();
                parts.push(part);
            }
            MessagePart {
                mime_type: "multipart/mixed".to_string(),
                parts,
                ..Default::default()
            }
        };
        payload.headers = headers;

        RawMessage {
            id: self.id,
            internal_date: self.internal_date,
            payload,
            attachments: HashMap::new(),
        }
    }
}

/// Builder for `LabelAssignment` values.
pub struct AssignmentBuilder {
    label_name: String,
    status: ApplicationStatus,
    priority: i32,
    parser_type: ParserType,
}

impl AssignmentBuilder {
    pub fn new(label_name: &str) -> Self {
        Self {
            label_name: label_name.to_string(),
            status: ApplicationStatus::Applied,
            priority: 1,
            parser_type: ParserType::Applied,
        }
    }

    pub fn status(mut self, status: &str) -> Self {
        self.status = ApplicationStatus::from(status);
        self
    }

    pub fn priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    pub fn parser(mut self, parser_type: ParserType) -> Self {
        self.parser_type = parser_type;
        self
    }

    pub fn build(self) -> LabelAssignment {
        LabelAssignment::new(self.label_name, self.status, self.priority, self.parser_type)
    }
}

/// Builder for `Config` instances.
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// The standard three labels, one worker.
    pub fn new() -> Self {
        Self {
            config: Config {
                worker_count: 1,
                ..Config::default()
            },
        }
    }

    pub fn worker_count(mut self, count: usize) -> Self {
        self.config.worker_count = count;
        self
    }

    pub fn date_range(mut self, range: DateRange) -> Self {
        self.config.date_range = range;
        self
    }

    pub fn labels(mut self, labels: Vec<LabelAssignment>) -> Self {
        self.config.labels = labels;
        self
    }

    pub fn label(mut self, label: LabelAssignment) -> Self {
        self.config.labels.push(label);
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
