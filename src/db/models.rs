//! Document Models - shapes stored in and read from the document store.

use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

/// Collection holding portfolio projects
pub const PROJECT_COLLECTION: &str = "project";

/// Collection holding contact-form submissions
pub const CONTACT_COLLECTION: &str = "contact";

/// Project as returned by `GET /api/projects`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub title: String,
    pub summary: String,
    pub tech: Vec<String>,
    pub thumbnail: Option<String>,
    pub live_url: Option<String>,
    pub github_url: Option<String>,
    pub case_study_url: Option<String>,
}

/// Project document exactly as persisted. Every field may be missing.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawProject {
    pub title: Option<String>,
    pub summary: Option<String>,
    pub tech: Option<Vec<String>>,
    pub thumbnail: Option<String>,
    pub live_url: Option<String>,
    pub github_url: Option<String>,
    pub case_study_url: Option<String>,
}

impl RawProject {
    /// Decode a stored document. Unknown keys (`_id`, timestamps) are ignored;
    /// wrongly-typed known keys are an error.
    pub fn from_document(document: serde_json::Value) -> Result<Self, serde_json::Error> {
        serde_json::from_value(document)
    }
}

impl From<RawProject> for Project {
    fn from(raw: RawProject) -> Self {
        Self {
            title: raw.title.unwrap_or_else(|| "Untitled".to_string()),
            summary: raw.summary.unwrap_or_default(),
            tech: raw.tech.unwrap_or_default(),
            thumbnail: raw.thumbnail,
            live_url: raw.live_url,
            github_url: raw.github_url,
            case_study_url: raw.case_study_url,
        }
    }
}

/// Contact-form submission, validated before it reaches a handler
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct Contact {
    #[validate(length(min = 2, message = "name must be at least 2 characters"))]
    pub name: String,
    #[validate(
        email(message = "email must be a valid email address"),
        custom(function = "dotted_domain")
    )]
    pub email: String,
    #[validate(length(
        min = 10,
        max = 2000,
        message = "message must be between 10 and 2000 characters"
    ))]
    pub message: String,
}

/// Reject single-label domains such as `a@b`, which the plain email check lets through.
fn dotted_domain(email: &str) -> Result<(), ValidationError> {
    match email.rsplit_once('@') {
        Some((_, domain))
            if !domain.contains('.') || domain.starts_with('.') || domain.ends_with('.') =>
        {
            Err(ValidationError::new("email_domain")
                .with_message("email domain must contain a dot".into()))
        }
        _ => Ok(()),
    }
}

/// Curated examples served whenever live project data is unavailable.
pub fn fallback_projects() -> Vec<Project> {
    vec![
        Project {
            title: "Edge Image Pipeline".to_string(),
            summary: "Resized and cached storefront media at the edge, cutting page weight \
                      by more than half."
                .to_string(),
            tech: vec![
                "AWS".to_string(),
                "CloudFront".to_string(),
                "Lambda@Edge".to_string(),
            ],
            thumbnail: Some("/projects/edge-images.jpg".to_string()),
            live_url: Some("https://example.com/edge-images".to_string()),
            github_url: None,
            case_study_url: None,
        },
        Project {
            title: "Theme Deploy Automation".to_string(),
            summary: "Zero-downtime theme releases with automatic rollback on failed checks."
                .to_string(),
            tech: vec!["GitHub Actions".to_string(), "Docker".to_string()],
            thumbnail: Some("/projects/theme-deploys.jpg".to_string()),
            live_url: None,
            github_url: Some("https://github.com/example/theme-deploys".to_string()),
            case_study_url: None,
        },
        Project {
            title: "SaaS Starter Kit".to_string(),
            summary: "Production-ready foundation with auth, billing and analytics wired in."
                .to_string(),
            tech: vec![
                "Next.js".to_string(),
                "PostgreSQL".to_string(),
                "Stripe".to_string(),
            ],
            thumbnail: Some("/projects/saas-starter.jpg".to_string()),
            live_url: Some("https://example.com/saas-starter".to_string()),
            github_url: Some("https://github.com/example/saas-starter".to_string()),
            case_study_url: None,
        },
    ]
}
