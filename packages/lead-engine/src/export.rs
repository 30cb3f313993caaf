//! CSV serialization of lead lists.

use crate::types::lead::Lead;

/// Column headers, in output order.
pub const CSV_HEADERS: [&str; 8] = [
    "Business Name",
    "Email Address",
    "Phone Number",
    "Website URL",
    "Street Address",
    "Rating",
    "Reviews",
    "Description",
];

/// Render leads as CSV text.
///
/// Every cell is quoted with embedded quotes doubled; absent values are
/// empty cells. An empty slice yields an empty string.
pub fn to_csv(leads: &[Lead]) -> String {
    if leads.is_empty() {
        return String::new();
    }

    let mut lines = Vec::with_capacity(leads.len() + 1);
    lines.push(CSV_HEADERS.join(","));

    for lead in leads {
        let rating = lead.rating.map(|r| r.to_string()).unwrap_or_default();
        let reviews = lead.review_count.map(|r| r.to_string()).unwrap_or_default();
        let row = [
            lead.name.as_str(),
            lead.email.as_deref().unwrap_or(""),
            lead.phone.as_str(),
            lead.website.as_str(),
            lead.address.as_str(),
            rating.as_str(),
            reviews.as_str(),
            lead.description.as_str(),
        ];
        lines.push(row.iter().map(|cell| quote(cell)).collect::<Vec<_>>().join(","));
    }

    lines.join("\n")
}

fn quote(cell: &str) -> String {
    format!("\"{}\"", cell.replace('"', "\"\""))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_is_empty() {
        assert_eq!(to_csv(&[]), "");
    }

    #[test]
    fn test_rows_are_quoted() {
        let lead = Lead::new("Joe's \"Best\" Diner")
            .with_phone("(555) 123-4567")
            .with_address("12 Elm St, Duluth, MN 55802")
            .with_rating(4.5)
            .with_review_count(120);

        let csv = to_csv(&[lead]);
        let lines: Vec<_> = csv.lines().collect();

        assert_eq!(lines.len(), 2);
        assert_eq!(
            lines[0],
            "Business Name,Email Address,Phone Number,Website URL,Street Address,Rating,Reviews,Description"
        );
        assert_eq!(
            lines[1],
            r#""Joe's ""Best"" Diner","","(555) 123-4567","","12 Elm St, Duluth, MN 55802","4.5","120","""#
        );
    }
}
