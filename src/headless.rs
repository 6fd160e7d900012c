use std::io::Write;

use color_eyre::eyre::{Result, eyre};

use crate::system::source::CounterSource;
use crate::worker::Worker;

/// Sample `rounds` rounds and write each snapshot as one JSON line.
///
/// Skipped rounds are still written, carrying their error; running out of
/// failure budget stops the output with that error.
pub fn write_rounds<S: CounterSource, W: Write>(
    worker: &mut Worker<S>,
    rounds: u64,
    mut out: W,
) -> Result<()> {
    if rounds == 0 {
        return Err(eyre!("--headless needs at least one round"));
    }

    for _ in 0..rounds {
        let snapshot = worker.step()?;
        serde_json::to_writer(&mut out, &snapshot)?;
        writeln!(out)?;
    }
    out.flush()?;
    Ok(())
}
