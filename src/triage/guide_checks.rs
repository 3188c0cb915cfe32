//! Path-structure checks for guide articles.

use crate::github::FileChange;

const GUIDE_ROOT: &str = "guide";
const ARTICLE_FILE_NAME: &str = "index.md";

/// Language folders a guide article may live under.
pub const GUIDE_LANGUAGES: [&str; 6] = [
    "arabic",
    "chinese",
    "english",
    "portuguese",
    "russian",
    "spanish",
];

/// A structural problem with a guide article path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum GuideIssue {
    /// The article is not inside one of [`GUIDE_LANGUAGES`].
    MissingLanguageFolder,
    /// The article file is not named `index.md`.
    NotIndexFile,
    /// A directory name contains an uppercase letter.
    UppercaseDirectory,
    /// A directory name contains a space.
    SpaceInDirectory,
    /// A directory name contains a character outside `a-z`, `0-9`, `-`, `.`
    /// and `_`.
    InvalidDirectoryCharacter,
}

impl GuideIssue {
    /// Human-readable explanation used in the advisory comment.
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::MissingLanguageFolder => "Articles must be placed inside a language folder",
            Self::NotIndexFile => "Article files must be named `index.md`",
            Self::UppercaseDirectory => "Directory names must not contain uppercase letters",
            Self::SpaceInDirectory => "Directory names must not contain spaces",
            Self::InvalidDirectoryCharacter => {
                "Directory names may only contain `a-z`, `0-9`, `-`, `.` and `_`"
            }
        }
    }
}

/// One issue found on one file.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct GuideFinding {
    /// The problem.
    pub issue: GuideIssue,
    /// Repository-relative path of the offending file.
    pub path: String,
}

/// Checks every non-removed file under `guide/`.
///
/// Findings are returned in file order, each file's issues in
/// [`GuideIssue`] order.
#[must_use]
pub fn check_guide_files(files: &[FileChange]) -> Vec<GuideFinding> {
    files
        .iter()
        .filter(|file| !file.is_removed())
        .flat_map(|file| {
            check_path(&file.path)
                .into_iter()
                .map(|issue| GuideFinding {
                    issue,
                    path: file.path.clone(),
                })
        })
        .collect()
}

fn check_path(path: &str) -> Vec<GuideIssue> {
    let mut segments = path.split('/');
    if segments.next() != Some(GUIDE_ROOT) {
        return Vec::new();
    }
    let rest: Vec<&str> = segments.collect();
    let Some((file_name, directories)) = rest.split_last() else {
        return Vec::new();
    };

    let mut issues = Vec::new();
    let in_language_folder = directories
        .first()
        .is_some_and(|language| GUIDE_LANGUAGES.contains(language));
    if !in_language_folder {
        issues.push(GuideIssue::MissingLanguageFolder);
    }
    if *file_name != ARTICLE_FILE_NAME {
        issues.push(GuideIssue::NotIndexFile);
    }
    if directories
        .iter()
        .any(|name| name.chars().any(char::is_uppercase))
    {
        issues.push(GuideIssue::UppercaseDirectory);
    }
    if directories.iter().any(|name| name.contains(' ')) {
        issues.push(GuideIssue::SpaceInDirectory);
    }
    if directories
        .iter()
        .any(|name| name.chars().any(|character| !is_allowed_directory_char(character)))
    {
        issues.push(GuideIssue::InvalidDirectoryCharacter);
    }
    issues
}

// Uppercase letters and spaces are reported by their own checks.
const fn is_allowed_directory_char(character: char) -> bool {
    matches!(character, 'a'..='z' | '0'..='9' | '-' | '.' | '_')
        || character.is_ascii_uppercase()
        || character == ' '
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::{GuideFinding, GuideIssue, check_guide_files};
    use crate::github::FileChange;

    fn issues_for(path: &str) -> Vec<GuideIssue> {
        check_guide_files(&[FileChange::new(path)])
            .into_iter()
            .map(|finding| finding.issue)
            .collect()
    }

    #[rstest]
    #[case::well_formed("guide/english/css/flexbox/index.md")]
    #[case::dots_and_underscores("guide/spanish/node.js/npm_scripts/index.md")]
    #[case::outside_guide("curriculum/challenges/english/Foo Bar.md")]
    fn accepts_valid_or_unrelated_paths(#[case] path: &str) {
        assert_eq!(issues_for(path), Vec::new());
    }

    #[rstest]
    #[case::no_language("guide/css/index.md", vec![GuideIssue::MissingLanguageFolder])]
    #[case::not_index("guide/english/css/flexbox.md", vec![GuideIssue::NotIndexFile])]
    #[case::uppercase("guide/english/CSS/index.md", vec![GuideIssue::UppercaseDirectory])]
    #[case::space("guide/english/css grid/index.md", vec![GuideIssue::SpaceInDirectory])]
    #[case::symbol("guide/english/c#/index.md", vec![GuideIssue::InvalidDirectoryCharacter])]
    #[case::several(
        "guide/My Article.md",
        vec![GuideIssue::MissingLanguageFolder, GuideIssue::NotIndexFile]
    )]
    fn reports_each_broken_rule(#[case] path: &str, #[case] expected: Vec<GuideIssue>) {
        assert_eq!(issues_for(path), expected);
    }

    #[rstest]
    fn removed_files_are_skipped() {
        let files = [FileChange {
            path: "guide/Bad Folder/readme.md".to_owned(),
            status: Some("removed".to_owned()),
        }];

        assert_eq!(check_guide_files(&files), Vec::new());
    }

    #[rstest]
    fn findings_carry_the_offending_path() {
        let files = [
            FileChange::new("guide/english/css/index.md"),
            FileChange::new("guide/english/css/notes.md"),
        ];

        assert_eq!(
            check_guide_files(&files),
            vec![GuideFinding {
                issue: GuideIssue::NotIndexFile,
                path: "guide/english/css/notes.md".to_owned(),
            }]
        );
    }
}
