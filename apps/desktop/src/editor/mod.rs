//! Editor session: the in-memory working copy of one resume's content.
//!
//! Every repeatable entry (experience, education, skill, language) gets a
//! stable session-local id at load or creation time, and all edit operations
//! key off that id rather than a list position, so removing an entry cannot
//! misdirect an edit addressed to its neighbor. Ids never reach the wire:
//! flushed snapshots are stripped of them, and server echoes never re-key
//! live entries.

use serde::Serialize;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::resume::{
    Education, Language, PersonalInfo, Resume, ResumeContent, ResumeLanguage, Skill, WorkExperience,
};

pub mod preview;
pub mod sync;

use sync::SyncHandle;

pub type EntryId = Uuid;

/// A repeatable entry wrapped with its session-local identity.
#[derive(Debug, Clone, Serialize)]
pub struct Keyed<T> {
    pub id: EntryId,
    #[serde(flatten)]
    pub value: T,
}

impl<T> Keyed<T> {
    fn new(value: T) -> Self {
        Keyed {
            id: Uuid::new_v4(),
            value,
        }
    }
}

fn key_all<T>(values: Vec<T>) -> Vec<Keyed<T>> {
    values.into_iter().map(Keyed::new).collect()
}

fn strip_keys<T: Clone>(entries: &[Keyed<T>]) -> Vec<T> {
    entries.iter().map(|e| e.value.clone()).collect()
}

fn update_entry<T>(entries: &mut [Keyed<T>], id: EntryId, value: T) -> Result<(), AppError> {
    match entries.iter_mut().find(|e| e.id == id) {
        Some(entry) => {
            entry.value = value;
            Ok(())
        }
        None => Err(AppError::NotFound(format!("No entry {id} in this section"))),
    }
}

fn remove_entry<T>(entries: &mut Vec<Keyed<T>>, id: EntryId) -> Result<(), AppError> {
    match entries.iter().position(|e| e.id == id) {
        Some(index) => {
            entries.remove(index);
            Ok(())
        }
        None => Err(AppError::NotFound(format!("No entry {id} in this section"))),
    }
}

/// Snapshot of the working copy sent to the webview for rendering, with
/// entry ids included so the page can address edits.
#[derive(Debug, Clone, Serialize)]
pub struct EditorView {
    pub resume_id: Uuid,
    pub title: String,
    pub language: ResumeLanguage,
    pub personal_info: PersonalInfo,
    pub work_experience: Vec<Keyed<WorkExperience>>,
    pub education: Vec<Keyed<Education>>,
    pub skills: Vec<Keyed<Skill>>,
    pub languages: Vec<Keyed<Language>>,
}

/// One open resume plus its sync controller. Mutations apply synchronously
/// to the working copy (the form always reflects the latest keystroke) and
/// enqueue a stripped snapshot with the controller; only the flush is
/// delayed.
pub struct EditorSession {
    resume_id: Uuid,
    title: String,
    language: ResumeLanguage,
    personal_info: PersonalInfo,
    work_experience: Vec<Keyed<WorkExperience>>,
    education: Vec<Keyed<Education>>,
    skills: Vec<Keyed<Skill>>,
    languages: Vec<Keyed<Language>>,
    sync: SyncHandle,
}

impl EditorSession {
    pub fn open(resume: Resume, sync: SyncHandle) -> Self {
        EditorSession {
            resume_id: resume.id,
            title: resume.title,
            language: resume.language,
            personal_info: resume.content.personal_info,
            work_experience: key_all(resume.content.work_experience),
            education: key_all(resume.content.education),
            skills: key_all(resume.content.skills),
            languages: key_all(resume.content.languages),
            sync,
        }
    }

    pub fn resume_id(&self) -> Uuid {
        self.resume_id
    }

    pub fn sync(&self) -> &SyncHandle {
        &self.sync
    }

    /// Flushes outstanding edits, then disposes the session. Dropping the
    /// session instead cancels any pending flush.
    pub async fn close(self) {
        self.sync.close().await;
    }

    /// The current content with session ids stripped — the shape that goes
    /// over the wire.
    pub fn snapshot(&self) -> ResumeContent {
        ResumeContent {
            personal_info: self.personal_info.clone(),
            work_experience: strip_keys(&self.work_experience),
            education: strip_keys(&self.education),
            skills: strip_keys(&self.skills),
            languages: strip_keys(&self.languages),
        }
    }

    pub fn view(&self) -> EditorView {
        EditorView {
            resume_id: self.resume_id,
            title: self.title.clone(),
            language: self.language,
            personal_info: self.personal_info.clone(),
            work_experience: self.work_experience.clone(),
            education: self.education.clone(),
            skills: self.skills.clone(),
            languages: self.languages.clone(),
        }
    }

    /// Title is saved through a discrete PUT, not the debounced path.
    pub fn set_title(&mut self, title: String) {
        self.title = title;
    }

    pub fn set_personal_info(&mut self, info: PersonalInfo) {
        self.personal_info = info;
        self.touch();
    }

    pub fn add_experience(&mut self, entry: WorkExperience) -> EntryId {
        let keyed = Keyed::new(entry);
        let id = keyed.id;
        self.work_experience.push(keyed);
        self.touch();
        id
    }

    pub fn update_experience(&mut self, id: EntryId, entry: WorkExperience) -> Result<(), AppError> {
        update_entry(&mut self.work_experience, id, entry)?;
        self.touch();
        Ok(())
    }

    pub fn remove_experience(&mut self, id: EntryId) -> Result<(), AppError> {
        remove_entry(&mut self.work_experience, id)?;
        self.touch();
        Ok(())
    }

    pub fn add_education(&mut self, entry: Education) -> EntryId {
        let keyed = Keyed::new(entry);
        let id = keyed.id;
        self.education.push(keyed);
        self.touch();
        id
    }

    pub fn update_education(&mut self, id: EntryId, entry: Education) -> Result<(), AppError> {
        update_entry(&mut self.education, id, entry)?;
        self.touch();
        Ok(())
    }

    pub fn remove_education(&mut self, id: EntryId) -> Result<(), AppError> {
        remove_entry(&mut self.education, id)?;
        self.touch();
        Ok(())
    }

    pub fn add_skill(&mut self, skill: Skill) -> EntryId {
        let keyed = Keyed::new(skill);
        let id = keyed.id;
        self.skills.push(keyed);
        self.touch();
        id
    }

    pub fn update_skill(&mut self, id: EntryId, skill: Skill) -> Result<(), AppError> {
        update_entry(&mut self.skills, id, skill)?;
        self.touch();
        Ok(())
    }

    pub fn remove_skill(&mut self, id: EntryId) -> Result<(), AppError> {
        remove_entry(&mut self.skills, id)?;
        self.touch();
        Ok(())
    }

    pub fn add_language(&mut self, language: Language) -> EntryId {
        let keyed = Keyed::new(language);
        let id = keyed.id;
        self.languages.push(keyed);
        self.touch();
        id
    }

    pub fn update_language(&mut self, id: EntryId, language: Language) -> Result<(), AppError> {
        update_entry(&mut self.languages, id, language)?;
        self.touch();
        Ok(())
    }

    pub fn remove_language(&mut self, id: EntryId) -> Result<(), AppError> {
        remove_entry(&mut self.languages, id)?;
        self.touch();
        Ok(())
    }

    fn touch(&self) {
        self.sync.enqueue(self.snapshot());
    }
}
