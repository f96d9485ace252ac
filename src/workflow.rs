use crate::context::AppContext;
use crate::generator::TextModel;
use crate::git::GitRunner;
use crate::review::{self, ChoiceReader, MessageEditor, Outcome};
use crate::ui::Spinner;
use crate::{notice, status, warning};
use anyhow::{Context, Result};

#[derive(Debug, PartialEq, Eq)]
pub enum RunOutcome {
    Committed,
    Cancelled,
}

/// diff, generate, review, commit
///
/// git precondition errors pass through untouched so the caller can match
/// on them; only history lookup failures are downgraded
pub fn commit_staged<R: GitRunner, M: TextModel>(
    ctx: &AppContext<R, M>,
    input: &mut impl ChoiceReader,
    editor: &impl MessageEditor,
) -> Result<RunOutcome> {
    let diff = ctx.git.staged_diff(ctx.config.max_diff_bytes())?;

    let history = match ctx.git.recent_commits(ctx.config.history_len()) {
        Ok(history) => history,
        Err(e) => {
            warning!(
                "could not read commit history, continuing without it: {:#}",
                anyhow::Error::new(e)
            );
            Vec::new()
        }
    };
    tracing::debug!(
        diff_bytes = diff.len(),
        history = history.len(),
        "collected context"
    );

    let message = ctx
        .generator
        .generate(&diff, &history)
        .context("failed to generate commit message")?;

    let message = match review::review(message, input, editor)
        .context("failed to process commit action")?
    {
        Outcome::Accepted(message) => message,
        Outcome::Cancelled => {
            notice!("Commit cancelled");
            return Ok(RunOutcome::Cancelled);
        }
    };

    let spinner = Spinner::start("Committing changes...");
    ctx.git.commit(&message)?;
    spinner.finish();

    status!("Successfully committed changes!");
    Ok(RunOutcome::Committed)
}
