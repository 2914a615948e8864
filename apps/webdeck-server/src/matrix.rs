use std::io::{self, Write};
use std::time::Duration;

use rand::distr::Alphanumeric;
use rand::Rng;

const GREEN: &str = "\x1b[92m";
const RESET: &str = "\x1b[0m";

pub(crate) const BURST_LINES: usize = 55;
pub(crate) const BURST_WIDTH: usize = 70;
pub(crate) const BURST_DELAY: Duration = Duration::from_millis(25);

pub(crate) fn burst_line<R: Rng + ?Sized>(rng: &mut R, width: usize) -> String {
    (0..width).map(|_| rng.sample(Alphanumeric) as char).collect()
}

/// Writes `lines` green rows of random alphanumerics, pausing `delay` after each.
///
/// Each row goes out in a single `write_all`, so a writer that locks per call
/// (such as `io::Stdout`) is only held for one row at a time.
pub(crate) fn burst<W: Write>(
    out: &mut W,
    lines: usize,
    width: usize,
    delay: Duration,
) -> io::Result<()> {
    let mut rng = rand::rng();
    for _ in 0..lines {
        let line = format!("{GREEN}{}{RESET}\n", burst_line(&mut rng, width));
        out.write_all(line.as_bytes())?;
        out.flush()?;
        if !delay.is_zero() {
            std::thread::sleep(delay);
        }
    }
    Ok(())
}

/// Runs the burst on the blocking pool so the request returns immediately.
pub(crate) fn spawn_burst() {
    tokio::task::spawn_blocking(|| {
        if let Err(err) = burst(&mut io::stdout(), BURST_LINES, BURST_WIDTH, BURST_DELAY) {
            tracing::debug!(target: "webdeck::http", error = %err, "matrix burst interrupted");
        }
    });
}
