use anyhow::Result;

use crate::assistant::{Language, fallback_response};

/// Prints the canned offline answer for `question`.
///
/// Without `--lang` the language follows the `LANG` environment variable.
pub fn print_fallback(question: &str, language: Option<&str>) -> Result<()> {
    let language = match language {
        Some(code) => code.parse()?,
        None => Language::from_env(),
    };
    println!("{}", fallback_response(question, language));
    Ok(())
}
