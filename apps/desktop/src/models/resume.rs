//! Wire-format types for the platform's resume API.
//!
//! Field names and JSON shapes match the server exactly. The content object
//! is always complete: every list field defaults to an empty sequence and is
//! always serialized, so rendering only ever branches on length.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Target language of a resume. The platform supports a fixed small set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ResumeLanguage {
    #[default]
    En,
    Ru,
    Fr,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SkillLevel {
    Beginner,
    Intermediate,
    Advanced,
    Expert,
}

impl SkillLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            SkillLevel::Beginner => "beginner",
            SkillLevel::Intermediate => "intermediate",
            SkillLevel::Advanced => "advanced",
            SkillLevel::Expert => "expert",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LanguageProficiency {
    Native,
    Fluent,
    Advanced,
    Intermediate,
    Basic,
}

impl LanguageProficiency {
    pub fn as_str(&self) -> &'static str {
        match self {
            LanguageProficiency::Native => "native",
            LanguageProficiency::Fluent => "fluent",
            LanguageProficiency::Advanced => "advanced",
            LanguageProficiency::Intermediate => "intermediate",
            LanguageProficiency::Basic => "basic",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PersonalInfo {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub location: String,
    pub linkedin: Option<String>,
    pub website: Option<String>,
    pub summary: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkExperience {
    pub company: String,
    pub position: String,
    pub location: Option<String>,
    pub start_date: String,
    pub end_date: Option<String>,
    /// Gates whether the end date is meaningful; the preview shows "Present"
    /// whenever this is set, regardless of any stored end date.
    pub is_current: bool,
    pub description: Option<String>,
    pub achievements: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Education {
    pub institution: String,
    pub degree: String,
    pub field_of_study: Option<String>,
    pub location: Option<String>,
    pub start_date: String,
    pub end_date: Option<String>,
    pub gpa: Option<String>,
    pub achievements: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Skill {
    pub name: String,
    pub level: Option<SkillLevel>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Language {
    pub name: String,
    pub proficiency: LanguageProficiency,
}

/// A resume's substantive text: personal info plus the four repeatable
/// sections. `Default` and deserialization of `{}` both yield the
/// fully-populated-but-empty shape.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResumeContent {
    pub personal_info: PersonalInfo,
    pub work_experience: Vec<WorkExperience>,
    pub education: Vec<Education>,
    pub skills: Vec<Skill>,
    pub languages: Vec<Language>,
}

/// The resume envelope as owned by the remote store. The client only ever
/// holds a transient, possibly-stale copy; `current_version` is
/// server-assigned and monotonically increasing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Resume {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub language: ResumeLanguage,
    pub template_id: String,
    pub content: ResumeContent,
    pub current_version: i32,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// One entry of the server-side version history.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResumeVersion {
    pub id: Uuid,
    pub resume_id: Uuid,
    pub version: i32,
    pub content: ResumeContent,
    /// "manual" or "ai_translation".
    pub source: String,
    pub created_at: NaiveDateTime,
}

/// Body of POST /api/v1/resumes/. New resumes always start untitled in
/// English with empty content (the server fills in the rest).
#[derive(Debug, Clone, Serialize)]
pub struct ResumeCreate {
    pub title: String,
    pub language: ResumeLanguage,
}

impl Default for ResumeCreate {
    fn default() -> Self {
        ResumeCreate {
            title: "Untitled Resume".to_string(),
            language: ResumeLanguage::En,
        }
    }
}

/// Body of PUT /api/v1/resumes/{id}. All fields optional; unset fields are
/// not serialized, so the debounced sync path sends exactly `{"content": …}`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ResumeUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<ResumeLanguage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub template_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<ResumeContent>,
}

impl ResumeUpdate {
    pub fn content(content: ResumeContent) -> Self {
        ResumeUpdate {
            content: Some(content),
            ..Default::default()
        }
    }

    pub fn title(title: String) -> Self {
        ResumeUpdate {
            title: Some(title),
            ..Default::default()
        }
    }
}
