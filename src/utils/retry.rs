use std::fmt::Display;
use std::time::Duration;

/// Runs `op` up to `attempts` times (at least once), sleeping `delay` between
/// failures. The last error is returned once attempts run out.
pub fn retry<T, E, F>(attempts: usize, delay: Duration, mut op: F) -> Result<T, E>
where
    E: Display,
    F: FnMut(usize) -> Result<T, E>,
{
    let attempts = attempts.max(1);
    let mut attempt = 1;
    loop {
        match op(attempt) {
            Ok(v) => return Ok(v),
            Err(err) => {
                log::warn!("attempt {attempt}/{attempts} failed: {err}");
                if attempt >= attempts {
                    return Err(err);
                }
            }
        }
        std::thread::sleep(delay);
        attempt += 1;
    }
}
