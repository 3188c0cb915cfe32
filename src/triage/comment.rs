//! Advisory comment rendering for guide articles with structural problems.

use minijinja::{Environment, context};
use serde::Serialize;

use crate::error::TriageError;

use super::guide_checks::GuideFinding;

const TEMPLATE_NAME: &str = "guide-advisory";

/// Template for the comment posted when guide checks fail.
///
/// Variables: `author` (login, may be empty) and `issues`, a list of
/// `{ description, path }` records.
pub const GUIDE_ADVISORY_TEMPLATE: &str = "\
Hi{% if author %} @{{ author }}{% endif %},

Thanks for your contribution to the guide! We found a few problems with the \
file structure of this pull request:

| Issue | File |
| --- | --- |
{% for issue in issues -%}
| {{ issue.description }} | `{{ issue.path }}` |
{% endfor %}
Please update your pull request so each article lives at \
`guide/<language>/<topic>/index.md`, using only lowercase letters, digits, \
`-`, `.` and `_` in directory names. Thank you!
";

#[derive(Debug, Serialize)]
struct TemplateIssue<'a> {
    description: &'static str,
    path: &'a str,
}

/// Renders the advisory comment for `findings`, addressed to `author`.
///
/// # Errors
///
/// Returns [`TriageError::Template`] if the template fails to parse or
/// render.
pub fn render_guide_advisory(
    author: Option<&str>,
    findings: &[GuideFinding],
) -> Result<String, TriageError> {
    let mut environment = Environment::new();
    environment.set_auto_escape_callback(|_| minijinja::AutoEscape::None);

    environment
        .add_template(TEMPLATE_NAME, GUIDE_ADVISORY_TEMPLATE)
        .map_err(|error| TriageError::Template {
            message: format!("invalid template syntax: {error}"),
        })?;

    let issues: Vec<TemplateIssue<'_>> = findings
        .iter()
        .map(|finding| TemplateIssue {
            description: finding.issue.description(),
            path: &finding.path,
        })
        .collect();

    let template = environment
        .get_template(TEMPLATE_NAME)
        .map_err(|error| TriageError::Template {
            message: error.to_string(),
        })?;

    template
        .render(context! {
            author => author.unwrap_or_default(),
            issues => issues,
        })
        .map_err(|error| TriageError::Template {
            message: format!("template rendering failed: {error}"),
        })
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::render_guide_advisory;
    use crate::triage::guide_checks::{GuideFinding, GuideIssue};

    #[rstest]
    fn addresses_author_and_lists_every_issue() {
        let findings = [
            GuideFinding {
                issue: GuideIssue::NotIndexFile,
                path: "guide/english/css/notes.md".to_owned(),
            },
            GuideFinding {
                issue: GuideIssue::UppercaseDirectory,
                path: "guide/english/CSS/index.md".to_owned(),
            },
        ];

        let comment =
            render_guide_advisory(Some("camper"), &findings).expect("comment should render");

        assert!(comment.starts_with("Hi @camper,"), "comment: {comment}");
        assert!(comment.contains(
            "| Article files must be named `index.md` | `guide/english/css/notes.md` |"
        ));
        assert!(comment.contains("`guide/english/CSS/index.md`"));
    }

    #[rstest]
    fn omits_mention_without_author() {
        let findings = [GuideFinding {
            issue: GuideIssue::MissingLanguageFolder,
            path: "guide/css/index.md".to_owned(),
        }];

        let comment = render_guide_advisory(None, &findings).expect("comment should render");

        assert!(comment.starts_with("Hi,"), "comment: {comment}");
    }
}
