//! Self-checks for the parse/format pair
//!
//! Normalizing an input means parsing it and formatting the result. A
//! correct implementation reaches a fixed point after one normalization, and
//! any other txtar implementation should agree with it byte for byte.

use log::debug;

use crate::decoder::parse;
use crate::encoder::format;
use crate::error::Divergence;

/// Parse `input` and format it back.
pub fn normalize(input: &str) -> String {
    format(&parse(input))
}

/// Normalize `input` and confirm a second pass changes nothing.
///
/// Returns the normalized text.
pub fn check_idempotent(input: &str) -> Result<String, Divergence> {
    let once = normalize(input);
    let twice = normalize(&once);
    if once != twice {
        return Err(Divergence {
            reference: "renormalized".to_string(),
            input: input.to_string(),
            ours: once,
            theirs: twice,
        });
    }
    Ok(once)
}

/// Compare our normalization of `input` with another implementation's.
///
/// `reference` receives the raw input and returns its formatted output.
pub fn check_against<F>(input: &str, name: &str, reference: F) -> Result<String, Divergence>
where
    F: FnOnce(&str) -> String,
{
    let ours = normalize(input);
    let theirs = reference(input);
    if ours != theirs {
        debug!("IN ({}): {:?}", input.len(), input);
        debug!("OURS ({}): {:?}", ours.len(), ours);
        debug!("{} ({}): {:?}", name, theirs.len(), theirs);
        return Err(Divergence {
            reference: name.to_string(),
            input: input.to_string(),
            ours,
            theirs,
        });
    }
    Ok(ours)
}
