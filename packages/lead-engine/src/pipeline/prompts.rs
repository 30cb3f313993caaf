//! LLM prompts for lead acquisition and outreach.
//!
//! Placeholders in braces are substituted in a single pass, so values
//! containing brace text are inserted verbatim.

/// Output contract shared by every batch prompt.
pub const BATCH_OUTPUT_RULES: &str = r#"CRITICAL OUTPUT RULES:
- Return ONLY a raw JSON array.
- Do not include markdown formatting (like ```json).
- Do not include any introductory or concluding text.
- Ensure the JSON is valid.

The JSON object structure must be exactly:
[
  {
    "name": "String",
    "phone": "String",
    "website": "String",
    "address": "String",
    "rating": Number or null,
    "reviewCount": Number or null,
    "description": "String",
    "email": "String or null"
  }
]"#;

/// First query of a session: full field specification.
pub const INITIAL_BATCH_PROMPT: &str = r#"Find {count} distinct local businesses matching the search term "{term}" in or near "{location}".
Use Google Maps to verify the details.

I act as a CRM database importer. I need you to extract precise details for each business found.

REQUIRED FIELDS FOR EACH BUSINESS:
1. Business Name (exact name from Maps)
2. Phone Number (format as (XXX) XXX-XXXX if possible)
3. Website URL (full valid URL, or empty string if none)
4. Full Street Address (including Zip Code)
5. Rating (numeric value, e.g., 4.5, or null)
6. Review Count (numeric value, e.g., 120, or null)
7. Description (A short 10-15 word summary of what they do)
8. Email Address (only if publicly listed, otherwise null)

{rules}"#;

/// Later queries: ask for more, relying on the conversation history.
pub const CONTINUATION_BATCH_PROMPT: &str = r#"Find {count} ADDITIONAL distinct businesses matching "{term}" in or near "{location}".
They must NOT appear anywhere in your previous answers in this conversation. Widen the search area slightly if needed.
Use the same fields as before.

{rules}"#;

/// Single-shot outreach email.
pub const OUTREACH_EMAIL_PROMPT: &str = r#"Write a short, friendly cold outreach email to the business "{business}", a {industry} business located in {location}.

The email should:
- Open with a specific, genuine observation about this kind of business
- Offer help in one or two sentences without hard selling
- End with a low-commitment call to action
- Stay under 150 words

CRITICAL OUTPUT RULES:
- Return ONLY a raw JSON object.
- Do not include markdown formatting or any other text.

The JSON object structure must be exactly:
{
  "subject": "String",
  "body": "String"
}"#;

/// One query in an acquisition session.
///
/// The first turn carries the full field specification; later turns only
/// ask for more unseen records with the same output contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchQuery<'a> {
    Initial {
        term: &'a str,
        location: &'a str,
        count: usize,
    },
    Continuation {
        term: &'a str,
        location: &'a str,
        count: usize,
    },
}

impl<'a> BatchQuery<'a> {
    /// Pick the variant for a loop round (round 0 is initial).
    pub fn for_round(round: usize, term: &'a str, location: &'a str, count: usize) -> Self {
        if round == 0 {
            BatchQuery::Initial {
                term,
                location,
                count,
            }
        } else {
            BatchQuery::Continuation {
                term,
                location,
                count,
            }
        }
    }

    pub fn count(&self) -> usize {
        match self {
            BatchQuery::Initial { count, .. } | BatchQuery::Continuation { count, .. } => *count,
        }
    }

    pub fn is_initial(&self) -> bool {
        matches!(self, BatchQuery::Initial { .. })
    }

    /// Render the message text.
    pub fn render(&self) -> String {
        let (template, term, location, count) = match *self {
            BatchQuery::Initial {
                term,
                location,
                count,
            } => (INITIAL_BATCH_PROMPT, term, location, count),
            BatchQuery::Continuation {
                term,
                location,
                count,
            } => (CONTINUATION_BATCH_PROMPT, term, location, count),
        };

        let count = count.to_string();
        fill_template(
            template,
            &[
                ("rules", BATCH_OUTPUT_RULES),
                ("count", count.as_str()),
                ("term", term),
                ("location", location),
            ],
        )
    }
}

/// Format the outreach email prompt.
pub fn format_outreach_prompt(business: &str, industry: &str, location: &str) -> String {
    fill_template(
        OUTREACH_EMAIL_PROMPT,
        &[
            ("business", business),
            ("industry", industry),
            ("location", location),
        ],
    )
}

/// Replace each `{key}` in `template` with its value. Substituted text is
/// never rescanned; unknown braces are kept as-is.
fn fill_template(template: &str, values: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find('{') {
        out.push_str(&rest[..start]);
        let tail = &rest[start + 1..];

        let hit = values.iter().find_map(|(key, value)| {
            tail.strip_prefix(key)?
                .strip_prefix('}')
                .map(|after| (*value, after))
        });

        match hit {
            Some((value, after)) => {
                out.push_str(value);
                rest = after;
            }
            None => {
                out.push('{');
                rest = tail;
            }
        }
    }

    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_for_round_picks_variant() {
        assert!(BatchQuery::for_round(0, "a", "b", 5).is_initial());
        assert!(!BatchQuery::for_round(1, "a", "b", 5).is_initial());
        assert_eq!(BatchQuery::for_round(3, "a", "b", 7).count(), 7);
    }

    #[test]
    fn test_initial_render() {
        let text = BatchQuery::for_round(0, "plumbers", "Austin, TX", 15).render();
        assert!(text.contains("Find 15 distinct local businesses"));
        assert!(text.contains("\"plumbers\""));
        assert!(text.contains("\"Austin, TX\""));
        assert!(text.contains("REQUIRED FIELDS"));
        assert!(text.contains("Return ONLY a raw JSON array"));
        assert!(!text.contains("{count}") && !text.contains("{rules}"));
    }

    #[test]
    fn test_continuation_render() {
        let text = BatchQuery::for_round(2, "plumbers", "Austin, TX", 8).render();
        assert!(text.contains("Find 8 ADDITIONAL"));
        assert!(text.contains("must NOT appear"));
        assert!(!text.contains("REQUIRED FIELDS"));
        assert!(text.contains("Return ONLY a raw JSON array"));
    }

    #[test]
    fn test_user_text_with_placeholder_names_is_literal() {
        let text = BatchQuery::for_round(0, "{location} {count}", "Austin, TX", 5).render();
        assert!(text.contains("matching the search term \"{location} {count}\" in or near \"Austin, TX\""));

        let text = format_outreach_prompt("{industry} Co", "bakery", "Duluth, MN");
        assert!(text.contains("\"{industry} Co\", a bakery business"));
    }

    #[test]
    fn test_fill_template_keeps_unknown_braces() {
        assert_eq!(
            fill_template("{a} {\"b\": 1} {a", &[("a", "x")]),
            "x {\"b\": 1} {a"
        );
    }

    #[test]
    fn test_outreach_prompt() {
        let text = format_outreach_prompt("Blue Door Bakery", "bakery", "Duluth, MN");
        assert!(text.contains("\"Blue Door Bakery\""));
        assert!(text.contains("a bakery business located in Duluth, MN"));
        assert!(text.contains("\"subject\""));
    }
}
