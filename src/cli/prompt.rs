//! Interactive console input.
//!
//! Generic over `BufRead`/`Write` so the prompts can be driven from tests.

use std::io::{self, BufRead, Write};

use crate::model::TagPlacement;

const PLACEMENT_QUESTION: &str = "Include featured artists in the 'TITLE' tag like iTunes or use 'ARTIST' tag instead?\nEnter your preferred tag (artist/title): ";

/// Ask for a placement until a valid answer is given.
///
/// End of input is an `UnexpectedEof` error, since no answer can follow.
pub fn prompt_placement<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
) -> io::Result<TagPlacement> {
    loop {
        write!(output, "{}", PLACEMENT_QUESTION)?;
        output.flush()?;

        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "no placement given (expected 'artist' or 'title')",
            ));
        }

        match line.parse::<TagPlacement>() {
            Ok(placement) => return Ok(placement),
            Err(_) => writeln!(output, "\nInvalid tag. Enter 'artist' or 'title'.")?,
        }
    }
}

/// Block until the user presses Enter (or input ends).
pub fn wait_for_enter<R: BufRead, W: Write>(input: &mut R, output: &mut W) -> io::Result<()> {
    write!(output, "\nPress Enter to exit.")?;
    output.flush()?;
    let mut line = String::new();
    input.read_line(&mut line)?;
    Ok(())
}
