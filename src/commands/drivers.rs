//! Driver catalog listing.
use std::io::Write;

use super::{ConfigEngine, Outcome, emit};
use crate::drivers::render_list;
use crate::error::EngineError;

/// Print the driver catalog.
///
/// # Errors
///
/// Returns an error if `out` cannot be written.
pub fn run(engine: &ConfigEngine<'_>, out: &mut dyn Write) -> Result<Outcome, EngineError> {
    emit(out, &render_list(engine.catalog))?;
    Ok(Outcome::DriversListed)
}
