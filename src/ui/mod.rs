//! Terminal UI components (spinner, colors, prompt cancellation).

use anyhow::Result;
use inquire::InquireError;

mod spinner;
mod theme;

pub use spinner::Spinner;
pub use theme::Style;

const fn is_prompt_cancelled(err: &InquireError) -> bool {
    matches!(
        err,
        InquireError::OperationCanceled | InquireError::OperationInterrupted
    )
}

/// Runs an interactive flow, treating Ctrl+C or Escape as a quiet exit.
///
/// A cancelled prompt yields `T::default()` after a newline that tidies the
/// terminal. Any other error is returned unchanged.
pub fn handle_prompt_cancellation<T, F>(f: F) -> Result<T>
where
    T: Default,
    F: FnOnce() -> Result<T>,
{
    f().or_else(|e| {
        if e.downcast_ref::<InquireError>()
            .is_some_and(is_prompt_cancelled)
        {
            println!();
            Ok(T::default())
        } else {
            Err(e)
        }
    })
}
