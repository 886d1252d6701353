//! Preview renderer: a pure mapping from resume content to the HTML fragment
//! shown in the read-only pane. No mutation, no network. A section renders
//! only if its sequence is non-empty, and a current position always shows
//! "Present" as its end date. All user text is escaped.

use crate::models::resume::{Education, Language, ResumeContent, Skill, WorkExperience};

pub fn render_preview(content: &ResumeContent) -> String {
    let mut html = String::from("<div class=\"resume-preview\">");

    render_header(&mut html, content);
    if !content.work_experience.is_empty() {
        render_experience_section(&mut html, &content.work_experience);
    }
    if !content.education.is_empty() {
        render_education_section(&mut html, &content.education);
    }
    if !content.skills.is_empty() {
        render_skills_section(&mut html, &content.skills);
    }
    if !content.languages.is_empty() {
        render_languages_section(&mut html, &content.languages);
    }

    html.push_str("</div>");
    html
}

fn render_header(html: &mut String, content: &ResumeContent) {
    let info = &content.personal_info;
    let full_name = format!("{} {}", info.first_name, info.last_name);
    html.push_str("<header class=\"preview-header\">");
    html.push_str(&format!("<h1>{}</h1>", escape_html(full_name.trim())));

    let contact: Vec<&str> = [&info.email, &info.phone, &info.location]
        .into_iter()
        .map(String::as_str)
        .filter(|part| !part.is_empty())
        .collect();
    if !contact.is_empty() {
        html.push_str("<div class=\"contact\">");
        for part in contact {
            html.push_str(&format!("<span>{}</span>", escape_html(part)));
        }
        html.push_str("</div>");
    }

    if let Some(summary) = &info.summary {
        if !summary.is_empty() {
            html.push_str(&format!("<p class=\"summary\">{}</p>", escape_html(summary)));
        }
    }
    html.push_str("</header>");
}

fn render_experience_section(html: &mut String, entries: &[WorkExperience]) {
    html.push_str("<section class=\"experience\"><h2>Work Experience</h2>");
    for exp in entries {
        html.push_str("<div class=\"entry\">");
        html.push_str(&format!("<h3>{}</h3>", escape_html(&exp.position)));
        html.push_str(&format!("<p class=\"org\">{}</p>", escape_html(&exp.company)));
        html.push_str(&format!(
            "<span class=\"dates\">{} - {}</span>",
            escape_html(&exp.start_date),
            escape_html(end_date_label(exp)),
        ));
        if let Some(description) = &exp.description {
            if !description.is_empty() {
                html.push_str(&format!(
                    "<p class=\"description\">{}</p>",
                    escape_html(description)
                ));
            }
        }
        if !exp.achievements.is_empty() {
            html.push_str("<ul>");
            for achievement in &exp.achievements {
                html.push_str(&format!("<li>{}</li>", escape_html(achievement)));
            }
            html.push_str("</ul>");
        }
        html.push_str("</div>");
    }
    html.push_str("</section>");
}

/// A current position always reads "Present", regardless of any stored end
/// date; otherwise the stored end date, blank when absent.
fn end_date_label(exp: &WorkExperience) -> &str {
    if exp.is_current {
        "Present"
    } else {
        exp.end_date.as_deref().unwrap_or("")
    }
}

fn render_education_section(html: &mut String, entries: &[Education]) {
    html.push_str("<section class=\"education\"><h2>Education</h2>");
    for edu in entries {
        html.push_str("<div class=\"entry\">");
        html.push_str(&format!("<h3>{}</h3>", escape_html(&edu.institution)));
        let degree = match &edu.field_of_study {
            Some(field) if !field.is_empty() => format!("{} in {}", edu.degree, field),
            _ => edu.degree.clone(),
        };
        html.push_str(&format!("<p class=\"org\">{}</p>", escape_html(&degree)));
        html.push_str(&format!(
            "<span class=\"dates\">{} - {}</span>",
            escape_html(&edu.start_date),
            escape_html(edu.end_date.as_deref().unwrap_or("")),
        ));
        if let Some(gpa) = &edu.gpa {
            if !gpa.is_empty() {
                html.push_str(&format!("<p class=\"gpa\">GPA: {}</p>", escape_html(gpa)));
            }
        }
        html.push_str("</div>");
    }
    html.push_str("</section>");
}

fn render_skills_section(html: &mut String, skills: &[Skill]) {
    html.push_str("<section class=\"skills\"><h2>Skills</h2><div class=\"tags\">");
    for skill in skills {
        html.push_str(&format!(
            "<span class=\"tag\">{}</span>",
            escape_html(&skill.name)
        ));
    }
    html.push_str("</div></section>");
}

fn render_languages_section(html: &mut String, languages: &[Language]) {
    html.push_str("<section class=\"languages\"><h2>Languages</h2><div class=\"tags\">");
    for language in languages {
        html.push_str(&format!(
            "<span>{} ({})</span>",
            escape_html(&language.name),
            language.proficiency.as_str(),
        ));
    }
    html.push_str("</div></section>");
}

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::resume::{LanguageProficiency, PersonalInfo, SkillLevel};

    fn content_with_name() -> ResumeContent {
        ResumeContent {
            personal_info: PersonalInfo {
                first_name: "Ada".to_string(),
                last_name: "Lovelace".to_string(),
                email: "ada@example.com".to_string(),
                ..Default::default()
            },
            ..Default::default()
        }
    }

    #[test]
    fn test_empty_sections_are_hidden() {
        let html = render_preview(&content_with_name());
        assert!(!html.contains("Work Experience"));
        assert!(!html.contains("Education"));
        assert!(!html.contains("Skills"));
        assert!(!html.contains("Languages"));
    }

    #[test]
    fn test_nonempty_sections_render() {
        let mut content = content_with_name();
        content.skills.push(Skill {
            name: "Rust".to_string(),
            level: Some(SkillLevel::Expert),
        });
        content.languages.push(Language {
            name: "French".to_string(),
            proficiency: LanguageProficiency::Fluent,
        });
        let html = render_preview(&content);
        assert!(html.contains("<h2>Skills</h2>"));
        assert!(html.contains("Rust"));
        assert!(html.contains("<h2>Languages</h2>"));
        assert!(html.contains("French (fluent)"));
    }

    #[test]
    fn test_current_position_shows_present_despite_stored_end_date() {
        let mut content = content_with_name();
        content.work_experience.push(WorkExperience {
            company: "Acme".to_string(),
            position: "Engineer".to_string(),
            start_date: "2020".to_string(),
            end_date: Some("2022".to_string()),
            is_current: true,
            ..Default::default()
        });
        let html = render_preview(&content);
        assert!(html.contains("2020 - Present"));
        assert!(!html.contains("2022"));
    }

    #[test]
    fn test_finished_position_shows_end_date() {
        let mut content = content_with_name();
        content.work_experience.push(WorkExperience {
            company: "Acme".to_string(),
            position: "Engineer".to_string(),
            start_date: "2020".to_string(),
            end_date: Some("2022".to_string()),
            is_current: false,
            ..Default::default()
        });
        assert!(render_preview(&content).contains("2020 - 2022"));
    }

    #[test]
    fn test_header_contact_line_skips_empty_parts() {
        let html = render_preview(&content_with_name());
        assert!(html.contains("<h1>Ada Lovelace</h1>"));
        assert!(html.contains("<span>ada@example.com</span>"));
        // Phone and location are empty and must not produce empty spans.
        assert_eq!(html.matches("<span>").count(), 1);
    }

    #[test]
    fn test_summary_renders_when_present() {
        let mut content = content_with_name();
        content.personal_info.summary = Some("Analyst & programmer".to_string());
        let html = render_preview(&content);
        assert!(html.contains("Analyst &amp; programmer"));
    }

    #[test]
    fn test_education_field_of_study_and_gpa() {
        let mut content = content_with_name();
        content.education.push(Education {
            institution: "MIT".to_string(),
            degree: "BSc".to_string(),
            field_of_study: Some("Computer Science".to_string()),
            start_date: "2015".to_string(),
            end_date: Some("2019".to_string()),
            gpa: Some("3.9".to_string()),
            ..Default::default()
        });
        let html = render_preview(&content);
        assert!(html.contains("BSc in Computer Science"));
        assert!(html.contains("GPA: 3.9"));
    }

    #[test]
    fn test_user_text_is_escaped() {
        let mut content = content_with_name();
        content.personal_info.first_name = "<script>alert(1)</script>".to_string();
        content.skills.push(Skill {
            name: "C++ & \"templates\"".to_string(),
            level: None,
        });
        let html = render_preview(&content);
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
        assert!(html.contains("C++ &amp; &quot;templates&quot;"));
    }

    #[test]
    fn test_achievements_render_as_list_items() {
        let mut content = content_with_name();
        content.work_experience.push(WorkExperience {
            company: "Acme".to_string(),
            position: "Engineer".to_string(),
            start_date: "2020".to_string(),
            is_current: true,
            achievements: vec!["Cut latency by 40%".to_string()],
            ..Default::default()
        });
        let html = render_preview(&content);
        assert!(html.contains("<li>Cut latency by 40%</li>"));
    }

    #[test]
    fn test_render_is_pure() {
        let content = content_with_name();
        assert_eq!(render_preview(&content), render_preview(&content));
    }
}
