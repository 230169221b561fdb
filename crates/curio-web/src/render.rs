//! Page and terminal rendering of generation outcomes.

use std::fmt::Write as _;

use curio_core::{Error, PersonalizedContent, Section, SectionBody};

pub const PAGE_TITLE: &str = "Personalized Content Generator";
pub const SELECT_LABEL: &str = "Select a sample input or enter your own:";
pub const BUTTON_LABEL: &str = "Generate Personalized Content";
pub const BUSY_LABEL: &str = "Generating content...";
pub const NO_INPUT_WARNING: &str = "No valid search entries found in the input.";
pub const NO_RESULT_ERROR: &str =
    "The agent returned no result. Please check your prompt or LLM setup.";

/// What the results area shows after a submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Nothing submitted yet.
    Idle,
    Warning(String),
    Error(String),
    Content(PersonalizedContent),
}

impl Outcome {
    pub fn no_input() -> Self {
        Outcome::Warning(NO_INPUT_WARNING.to_string())
    }

    /// Collapse a run result into what the user sees. An empty reply gets
    /// its own message; every other failure shows its text verbatim.
    pub fn from_result(result: Result<PersonalizedContent, Error>) -> Self {
        match result {
            Ok(content) => Outcome::Content(content),
            Err(Error::EmptyResult) => Outcome::Error(NO_RESULT_ERROR.to_string()),
            Err(e) => Outcome::Error(generation_error(&e)),
        }
    }
}

pub fn generation_error(error: &Error) -> String {
    format!("An error occurred during content generation: {}", error)
}

pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

const STYLE: &str = "body{font-family:sans-serif;max-width:820px;margin:2rem auto;padding:0 1rem;color:#222}\
select{min-width:60%;padding:.3rem}button{padding:.4rem 1rem;margin-left:.5rem}\
.warning{background:#fff6d5;border:1px solid #e6c200;padding:.6rem}\
.error{background:#fde2e1;border:1px solid #d33;padding:.6rem}\
.busy{color:#555;font-style:italic}section{border-bottom:1px solid #ddd;padding:.5rem 0}dt{font-weight:bold;margin-top:.4rem}";

/// Render the whole page.
pub fn render_page(queries: &[String], selected: Option<&str>, outcome: &Outcome) -> String {
    let mut html = String::new();
    let _ = write!(
        html,
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
         <title>{title}</title>\n<style>{STYLE}</style>\n</head>\n<body>\n<h1>{title}</h1>\n",
        title = PAGE_TITLE
    );

    // Disable the button and show the busy line until the response arrives
    html.push_str(
        "<form method=\"post\" action=\"/generate\" \
         onsubmit=\"this.querySelector('button').disabled=true;\
         document.getElementById('busy').hidden=false;\">\n",
    );
    let _ = writeln!(html, "<label for=\"query\">{}</label><br>", SELECT_LABEL);
    html.push_str("<select id=\"query\" name=\"query\">\n");
    for query in queries {
        let escaped = escape_html(query);
        let marker = if selected == Some(query.as_str()) { " selected" } else { "" };
        let _ = writeln!(html, "<option value=\"{escaped}\"{marker}>{escaped}</option>");
    }
    html.push_str("</select>\n");
    let _ = writeln!(html, "<button type=\"submit\">{}</button>", BUTTON_LABEL);
    html.push_str("</form>\n");
    let _ = writeln!(html, "<p id=\"busy\" class=\"busy\" hidden>{}</p>", BUSY_LABEL);

    html.push_str("<div id=\"results\">\n");
    match outcome {
        Outcome::Idle => {}
        Outcome::Warning(message) => {
            let _ = writeln!(html, "<p class=\"warning\">{}</p>", escape_html(message));
        }
        Outcome::Error(message) => {
            let _ = writeln!(html, "<p class=\"error\">{}</p>", escape_html(message));
        }
        Outcome::Content(content) => {
            html.push_str("<h2>Generated Content:</h2>\n");
            for section in content.sections() {
                html.push_str(&render_section(&section));
            }
        }
    }
    html.push_str("</div>\n</body>\n</html>\n");
    html
}

fn render_section(section: &Section) -> String {
    let mut html = String::from("<section class=\"result-section\">\n");
    let _ = writeln!(html, "<h3>{}</h3>", escape_html(section.title));
    match &section.body {
        SectionBody::Text(text) => {
            let _ = writeln!(html, "<p>{}</p>", escape_html(text));
        }
        SectionBody::Rows(rows) => {
            html.push_str("<dl>\n");
            for (label, value) in rows {
                let _ = writeln!(
                    html,
                    "<div class=\"row\"><dt>{}</dt><dd>{}</dd></div>",
                    escape_html(label),
                    escape_html(value)
                );
            }
            html.push_str("</dl>\n");
        }
    }
    html.push_str("</section>\n");
    html
}

/// Plain-text rendering for the terminal.
pub fn render_plain(content: &PersonalizedContent) -> String {
    let mut out = String::new();
    for (i, section) in content.sections().iter().enumerate() {
        if i > 0 {
            out.push_str("---\n");
        }
        let _ = writeln!(out, "{}", section.title);
        match &section.body {
            SectionBody::Text(text) => {
                let _ = writeln!(out, "{}", text);
            }
            SectionBody::Rows(rows) => {
                for (label, value) in rows {
                    let _ = writeln!(out, "  {}: {}", label, value);
                }
            }
        }
    }
    out
}
