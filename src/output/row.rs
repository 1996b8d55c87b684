//! output::row
//!
//! Projection of an item into the five output columns.

use chrono::{DateTime, Utc};

use crate::core::types::{Category, Item};

/// Creation time format understood by spreadsheet date parsing.
pub const CREATED_AT_FORMAT: &str = "%m/%d/%Y %H:%M:%S";

/// One output row.
///
/// Columns, in order: author link, category label, number link, title,
/// creation time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    pub author: String,
    pub category: &'static str,
    pub number: String,
    pub title: String,
    pub created_at: String,
}

impl Row {
    /// Project an item into a row.
    ///
    /// ```
    /// use chrono::{TimeZone, Utc};
    /// use ghexport::core::types::{Author, Category, Item};
    /// use ghexport::output::Row;
    ///
    /// let item = Item {
    ///     number: 7,
    ///     title: "Widgets jam".to_string(),
    ///     url: "https://github.com/acme/widgets/issues/7".to_string(),
    ///     created_at: Utc.with_ymd_and_hms(2024, 2, 1, 9, 5, 3).unwrap(),
    ///     author: Author {
    ///         login: "octocat".to_string(),
    ///         url: "https://github.com/octocat".to_string(),
    ///     },
    /// };
    ///
    /// let row = Row::project(Category::Issue, &item);
    /// assert_eq!(row.author, r#"=HYPERLINK("https://github.com/octocat", "octocat")"#);
    /// assert_eq!(row.category, "Issue");
    /// assert_eq!(row.number, r#"=HYPERLINK("https://github.com/acme/widgets/issues/7", "7")"#);
    /// assert_eq!(row.created_at, "02/01/2024 09:05:03");
    /// ```
    pub fn project(category: Category, item: &Item) -> Self {
        Self {
            author: spreadsheet_hyperlink(&item.author.login, &item.author.url),
            category: category.label(),
            number: spreadsheet_hyperlink(item.number, &item.url),
            title: item.title.clone(),
            created_at: format_created_at(item.created_at),
        }
    }

    /// Columns in output order.
    pub fn fields(&self) -> [&str; 5] {
        [
            self.author.as_str(),
            self.category,
            self.number.as_str(),
            self.title.as_str(),
            self.created_at.as_str(),
        ]
    }
}

/// Build a spreadsheet `HYPERLINK` formula.
///
/// Double quotes inside either argument are doubled, as formula string
/// literals require.
pub fn spreadsheet_hyperlink(value: impl std::fmt::Display, link: &str) -> String {
    format!(
        "=HYPERLINK(\"{}\", \"{}\")",
        link.replace('"', "\"\""),
        value.to_string().replace('"', "\"\"")
    )
}

/// Format a creation time for the output (UTC).
pub fn format_created_at(created_at: DateTime<Utc>) -> String {
    created_at.format(CREATED_AT_FORMAT).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::Author;
    use chrono::TimeZone;

    fn item() -> Item {
        Item {
            number: 42,
            title: "Fix \"quoted\" bug, now".to_string(),
            url: "https://github.com/acme/widgets/pull/42".to_string(),
            created_at: Utc.with_ymd_and_hms(2024, 1, 15, 23, 59, 1).unwrap(),
            author: Author {
                login: "alice".to_string(),
                url: "https://github.com/alice".to_string(),
            },
        }
    }

    #[test]
    fn project_pull_request() {
        let row = Row::project(Category::PullRequest, &item());
        assert_eq!(
            row.author,
            "=HYPERLINK(\"https://github.com/alice\", \"alice\")"
        );
        assert_eq!(row.category, "Pull Request");
        assert_eq!(
            row.number,
            "=HYPERLINK(\"https://github.com/acme/widgets/pull/42\", \"42\")"
        );
        assert_eq!(row.title, "Fix \"quoted\" bug, now");
        assert_eq!(row.created_at, "01/15/2024 23:59:01");
    }

    #[test]
    fn fields_in_column_order() {
        let row = Row::project(Category::Issue, &item());
        let fields = row.fields();
        assert_eq!(fields[1], "Issue");
        assert_eq!(fields[3], "Fix \"quoted\" bug, now");
        assert_eq!(fields[4], "01/15/2024 23:59:01");
    }

    #[test]
    fn hyperlink_doubles_quotes() {
        assert_eq!(
            spreadsheet_hyperlink("say \"hi\"", "https://x/?q=\"a\""),
            "=HYPERLINK(\"https://x/?q=\"\"a\"\"\", \"say \"\"hi\"\"\")"
        );
    }

    #[test]
    fn created_at_is_zero_padded() {
        let t = Utc.with_ymd_and_hms(2023, 3, 4, 5, 6, 7).unwrap();
        assert_eq!(format_created_at(t), "03/04/2023 05:06:07");
    }
}
