use crate::constants::FALLBACK_EDITORS;
use crate::error::EditError;
use std::fs;
use std::io::Write;
use std::process::Command;
use tempfile::Builder;

/// pick an editor command: `VISUAL`, `EDITOR`, git's `core.editor`, then the
/// first fallback editor found on `PATH`
pub fn resolve_editor(
    env: impl Fn(&str) -> Option<String>,
    git_editor: Option<String>,
    on_path: impl Fn(&str) -> bool,
) -> Option<String> {
    let non_empty = |value: Option<String>| {
        value
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    };

    non_empty(env("VISUAL"))
        .or_else(|| non_empty(env("EDITOR")))
        .or_else(|| non_empty(git_editor))
        .or_else(|| {
            FALLBACK_EDITORS
                .iter()
                .find(|editor| on_path(editor))
                .map(|editor| (*editor).to_string())
        })
}

/// resolve an editor against the real environment and `PATH`
pub fn find_editor(git_editor: Option<String>) -> Option<String> {
    resolve_editor(
        |name| std::env::var(name).ok(),
        git_editor,
        |editor| which::which(editor).is_ok(),
    )
}

/// open `text` in `editor` and return the trimmed result
///
/// the message lives in a temporary file that is removed on every path out
/// of this function
pub fn edit_in(editor: &str, text: &str) -> Result<String, EditError> {
    let mut temp_file = Builder::new()
        .prefix("commit-msg-")
        .suffix(".txt")
        .tempfile()
        .map_err(EditError::TempFile)?;

    temp_file
        .write_all(text.as_bytes())
        .and_then(|()| temp_file.flush())
        .map_err(EditError::TempFile)?;

    let temp_path = temp_file.path().to_owned();

    // run through the shell so arguments in the editor setting work
    let quoted = shlex::try_quote(&temp_path.to_string_lossy())
        .map(|q| q.into_owned())
        .map_err(|e| EditError::TempFile(std::io::Error::other(e.to_string())))?;
    let editor_command = format!("{editor} {quoted}");
    tracing::debug!(command = %editor_command, "launching editor");

    let status = Command::new("sh")
        .arg("-c")
        .arg(&editor_command)
        .status()
        .map_err(|source| EditError::Launch {
            editor: editor.to_string(),
            source,
        })?;

    if !status.success() {
        return Err(EditError::EditorFailed {
            editor: editor.to_string(),
            status: status.to_string(),
        });
    }

    let edited = fs::read_to_string(&temp_path).map_err(EditError::ReadBack)?;
    let edited = edited.trim();
    if edited.is_empty() {
        return Err(EditError::EmptyMessage);
    }

    Ok(edited.to_string())
}
