use std::io::Write;

use crate::store::sync::{Conflict, Decision, Resolver};

/// Asks on stderr, reads the answer from stdin. Anything but an explicit yes
/// keeps the existing content.
pub struct StdinPrompt;

impl Resolver for StdinPrompt {
    fn resolve(&mut self, conflict: &Conflict) -> std::io::Result<Decision> {
        let question = match conflict {
            Conflict::Directory(_) => "already exists. Replace it with a link?",
            Conflict::File(_) => "differs from the incoming version. Overwrite?",
        };
        eprint!(
            "{} {question} [y/N/a(ll)/s(kip all)] ",
            conflict.path().display()
        );
        std::io::stderr().flush()?;

        let mut input = String::new();
        std::io::stdin().read_line(&mut input)?;
        Ok(parse_answer(&input))
    }
}

fn parse_answer(input: &str) -> Decision {
    match input.trim().to_ascii_lowercase().as_str() {
        "y" | "yes" => Decision::Overwrite,
        "a" | "all" => Decision::OverwriteAll,
        "s" | "skip all" => Decision::SkipAll,
        _ => Decision::Skip,
    }
}
