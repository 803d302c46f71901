use crate::verifier::ReportStatus;
use console::style;
use std::fmt::Display;

/// Green bold: success marks, completed steps
pub fn success<D: Display>(text: D) -> String {
    style(text).green().bold().to_string()
}

/// Red bold: failed steps, errors
pub fn failure<D: Display>(text: D) -> String {
    style(text).red().bold().to_string()
}

/// White bold: section headers, titles
pub fn header<D: Display>(text: D) -> String {
    style(text).white().bold().to_string()
}

/// Dim: secondary text, decorative lines
pub fn dim<D: Display>(text: D) -> String {
    style(text).dim().to_string()
}

/// Yellow: warnings, partial outcomes
pub fn yellow<D: Display>(text: D) -> String {
    style(text).yellow().to_string()
}

/// Green: data values
pub fn value<D: Display>(text: D) -> String {
    style(text).green().to_string()
}

/// Cyan bold: step numbers, bullet points
pub fn accent<D: Display>(text: D) -> String {
    style(text).cyan().bold().to_string()
}

/// Cyan: field labels
pub fn cyan<D: Display>(text: D) -> String {
    style(text).cyan().to_string()
}

/// Cyan underlined: URLs
pub fn url<D: Display>(text: D) -> String {
    style(text).cyan().underlined().to_string()
}

/// Upper-cased status, colored by outcome.
pub fn status_badge(status: ReportStatus) -> String {
    let label = status.to_string().to_uppercase();
    match status {
        ReportStatus::Success => success(label),
        ReportStatus::Partial => style(label).yellow().bold().to_string(),
        ReportStatus::Failed => failure(label),
    }
}
