use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Variables substituted into a template, keyed by placeholder name.
pub type TemplateVars = BTreeMap<String, String>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TemplateKind {
    ApplicationSubmitted,
    ApplicationStatusUpdate,
    NewApplicationNotification,
}

impl TemplateKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TemplateKind::ApplicationSubmitted => "application_submitted",
            TemplateKind::ApplicationStatusUpdate => "application_status_update",
            TemplateKind::NewApplicationNotification => "new_application_notification",
        }
    }

    fn source(&self) -> (&'static str, &'static str) {
        match self {
            TemplateKind::ApplicationSubmitted => (
                "Application Received - {{internship_title}}",
                APPLICATION_SUBMITTED_BODY,
            ),
            TemplateKind::ApplicationStatusUpdate => (
                "Update on Your Application - {{internship_title}}",
                STATUS_UPDATE_BODY,
            ),
            TemplateKind::NewApplicationNotification => (
                "New Application Received - {{internship_title}}",
                NEW_APPLICATION_BODY,
            ),
        }
    }
}

impl FromStr for TemplateKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "application_submitted" => Ok(TemplateKind::ApplicationSubmitted),
            "application_status_update" => Ok(TemplateKind::ApplicationStatusUpdate),
            "new_application_notification" => Ok(TemplateKind::NewApplicationNotification),
            other => Err(format!("unknown email template: {}", other)),
        }
    }
}

impl fmt::Display for TemplateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

const APPLICATION_SUBMITTED_BODY: &str = r#"
<h2>Thank you for your application!</h2>
<p>Dear {{applicant_name}},</p>
<p>We have successfully received your application for the <strong>{{internship_title}}</strong> position at Getfly Technologies.</p>
<p>Your application is currently under review. We will get back to you within 5-7 business days.</p>
<p><strong>Application Details:</strong></p>
<ul>
  <li>Position: {{internship_title}}</li>
  <li>Department: {{department}}</li>
  <li>Application ID: #{{application_id}}</li>
</ul>
<p>If you have any questions, please feel free to contact us at contact@getflytechnologies.com</p>
<p>Best regards,<br>Getfly Technologies Team</p>
"#;

const STATUS_UPDATE_BODY: &str = r#"
<h2>Application Status Update</h2>
<p>Dear {{applicant_name}},</p>
<p>We wanted to update you on the status of your application for the <strong>{{internship_title}}</strong> position.</p>
<p><strong>Current Status:</strong> {{status}}</p>
{{#if message}}
<p><strong>Message:</strong> {{message}}</p>
{{/if}}
<p>If you have any questions, please contact us at contact@getflytechnologies.com</p>
<p>Best regards,<br>Getfly Technologies Team</p>
"#;

const NEW_APPLICATION_BODY: &str = r#"
<h2>New Application Received</h2>
<p>A new application has been submitted for the <strong>{{internship_title}}</strong> position.</p>
<p><strong>Applicant Details:</strong></p>
<ul>
  <li>Name: {{applicant_name}}</li>
  <li>Email: {{applicant_email}}</li>
  <li>University: {{university}}</li>
  <li>Major: {{major}}</li>
</ul>
<p>Please review the application in the admin panel.</p>
"#;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedEmail {
    pub subject: String,
    pub html: String,
    pub text: String,
}

pub fn render(kind: TemplateKind, vars: &TemplateVars) -> RenderedEmail {
    let (subject, body) = kind.source();
    let body = resolve_conditionals(body, vars);
    RenderedEmail {
        subject: substitute(subject, vars, false),
        html: substitute(&body, vars, true).trim().to_string(),
        text: tidy_text(&substitute(&strip_tags(&body), vars, false)),
    }
}

/// Keeps `{{#if name}}...{{/if}}` bodies whose variable is present and non-empty.
fn resolve_conditionals(template: &str, vars: &TemplateVars) -> String {
    const OPEN: &str = "{{#if ";
    const CLOSE: &str = "{{/if}}";

    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(start) = rest.find(OPEN) {
        out.push_str(&rest[..start]);
        let after = &rest[start + OPEN.len()..];
        let Some(name_end) = after.find("}}") else {
            out.push_str(&rest[start..]);
            return out;
        };
        let name = after[..name_end].trim();
        let inner = &after[name_end + 2..];
        let Some(end) = inner.find(CLOSE) else {
            out.push_str(&rest[start..]);
            return out;
        };
        if vars.get(name).is_some_and(|v| !v.is_empty()) {
            out.push_str(&inner[..end]);
        }
        rest = &inner[end + CLOSE.len()..];
    }
    out.push_str(rest);
    out
}

/// Replaces `{{name}}` placeholders; unknown names render as empty.
fn substitute(template: &str, vars: &TemplateVars, escape: bool) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(start) = rest.find("{{") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        let Some(end) = after.find("}}") else {
            out.push_str(&rest[start..]);
            return out;
        };
        let value = vars.get(after[..end].trim()).map(String::as_str).unwrap_or("");
        if escape {
            out.push_str(&escape_html(value));
        } else {
            out.push_str(value);
        }
        rest = &after[end + 2..];
    }
    out.push_str(rest);
    out
}

fn escape_html(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn strip_tags(html: &str) -> String {
    let mut out = String::with_capacity(html.len());
    let mut in_tag = false;
    for c in html.chars() {
        match c {
            '<' => in_tag = true,
            '>' if in_tag => in_tag = false,
            _ if !in_tag => out.push(c),
            _ => {}
        }
    }
    out
}

fn tidy_text(text: &str) -> String {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}
