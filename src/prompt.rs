use crate::config::Template;
use crate::constants::MAX_LINE_LENGTH;

/// build the generation prompt from history, diff and allowed commit types
pub fn build(diff: &str, history: &[String], templates: &[Template]) -> String {
    let history_block = if history.is_empty() {
        "(no previous commits; write in English)".to_string()
    } else {
        history.join("\n")
    };

    let types_block = templates
        .iter()
        .map(|template| format!("{}: {}", template.prefix, template.description))
        .collect::<Vec<_>>()
        .join("\n");

    let instructions = format!(
        r#"
You write git commit messages. Read the staged changes below and write one
clear, specific commit message in conventional commit format.

LANGUAGE:
- work out which natural language the previous commit messages use
- write the entire message in that same language
- match their tone, style and terminology

FORMAT:
```
<type>: <description>

<body>
```
- header: at most {MAX_LINE_LENGTH} characters
- blank line between header and body
- body lines wrapped at {MAX_LINE_LENGTH} characters

TYPE:
- use exactly one of the commit types listed below
- never invent another type

GRAMMAR:
- present tense, imperative mood
- no period at the end of the header

BODY (required):
- explain why the change was made
- contrast with the previous behaviour
- use "- " bullet points when listing several items

EXAMPLE (in English; yours follows the language of previous commits):
fix: resolve memory leak in background worker

Worker kept temporary files after processing. Cleanup now runs even
when a task fails.
- remove files in a finally block
- log cleanup failures instead of ignoring them

OUTPUT:
return ONLY the commit message text, no preamble and no explanation
"#
    );

    format!(
        "{}\n\nPREVIOUS COMMITS:\n{}\n\nCOMMIT TYPES:\n{}\n\nSTAGED CHANGES:\n{}\n\nWrite the commit message now:",
        instructions.trim(),
        history_block,
        types_block,
        diff.trim_end()
    )
}

/// strip a surrounding markdown code fence, if the model added one
pub fn extract_message(response: &str) -> String {
    let trimmed = response.trim();
    if let Some(inner) = trimmed
        .strip_prefix("```")
        .and_then(|rest| rest.strip_suffix("```"))
    {
        // drop an info string such as ```text on the opening fence line
        let body = match inner.split_once('\n') {
            Some((info, body)) if !info.trim().contains(' ') => body,
            _ => inner,
        };
        return body.trim().to_string();
    }
    trimmed.to_string()
}
