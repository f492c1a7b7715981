//! Declaration finding and member reordering for `stilo`.
//!
//! Ties the pipeline together: scan the buffer (`stilo_scan`), locate every
//! `class`/`mixin`/`enum` declaration with a braced body, classify each
//! body's members (`stilo_classify`), and re-emit the members in the
//! configured category order. Everything is line-granular; member text is
//! never reformatted, only moved.
//!
//! A scan failure aborts the whole buffer. A failure to resolve or classify
//! one declaration skips just that declaration, leaving its text untouched
//! and recording the reason in [`Organized::skipped`].

mod config;
mod declarations;
mod reorder;

use stilo_classify::{classify, ClassifyError};
use stilo_scan::{scan, ScanError};
use thiserror::Error;
use tracing::warn;

pub use config::{MemberCategory, Options, OptionsError};

/// Failure to organize a buffer.
#[derive(Debug, Error)]
pub enum OrganizeError {
    #[error(transparent)]
    Scan(#[from] ScanError),

    #[error(transparent)]
    Options(#[from] OptionsError),
}

/// Result of organizing one buffer.
#[derive(Clone, Debug)]
pub struct Organized {
    /// The rewritten buffer. Equal to the input when nothing moved.
    pub text: String,
    /// Declarations left untouched because classification failed, with the
    /// reason for each.
    pub skipped: Vec<(String, ClassifyError)>,
}

/// Organize every declaration in `source` according to `options`.
pub fn organize_source(source: &str, options: &Options) -> Result<Organized, OrganizeError> {
    let mut scanned = scan(source)?;
    let mut skipped = Vec::new();
    let declarations = declarations::find_declarations(source, &scanned, &mut skipped);
    let mut replacements = Vec::new();
    for decl in &declarations {
        match classify(
            source,
            &mut scanned.lines,
            &scanned.pairs,
            decl,
            options.group_and_sort_getter_methods,
        ) {
            Ok(classified) => {
                let body = reorder::reorder_body(&scanned.lines, decl, &classified, options);
                replacements.push((decl.body_lines.clone(), body));
            }
            Err(e) => {
                warn!(declaration = %decl.name, error = %e, "skipping declaration");
                skipped.push((decl.name.clone(), e));
            }
        }
    }

    let mut raws: Vec<String> = scanned.lines.iter().map(|l| l.raw.clone()).collect();
    // bodies are disjoint and in source order; splice back to front so
    // earlier ranges stay valid
    for (range, body) in replacements.into_iter().rev() {
        raws.splice(range, body);
    }
    Ok(Organized {
        text: raws.join("\n"),
        skipped,
    })
}
