//! Yes/no confirmation gate in front of the writer.

use std::io::{self, BufRead, Write};

/// Asks `question` on `output` and reads one line from `input`.
///
/// `y` or `yes` (any case) approves. Anything else, including end of
/// input, declines.
///
/// ```
/// use std::io::Cursor;
/// use plugin_lint::prompt::confirm;
///
/// let mut out = Vec::new();
/// assert!(confirm("Apply?", Cursor::new("YES\n"), &mut out).unwrap());
/// assert!(!confirm("Apply?", Cursor::new(""), &mut out).unwrap());
/// ```
pub fn confirm<R: BufRead, W: Write>(question: &str, mut input: R, mut output: W) -> io::Result<bool> {
    write!(output, "{question} [y/N] ")?;
    output.flush()?;

    let mut answer = String::new();
    if input.read_line(&mut answer)? == 0 {
        return Ok(false);
    }
    let answer = answer.trim().to_ascii_lowercase();
    Ok(answer == "y" || answer == "yes")
}
