//! Bounded retry with exponential backoff.

use std::time::Duration;

/// wait before retry `retry` (1-based): 2s, 4s, 8s, ...
pub fn backoff_delay(retry: u32) -> Duration {
    Duration::from_secs(1u64 << retry.min(32))
}

/// run `attempt` once, then up to `max_retries` more times while it fails
///
/// `sleep` is called with `backoff_delay(k)` before retry `k`. the first
/// success is returned immediately. when every attempt fails the last error
/// is passed through `wrap_exhausted`.
pub fn retry_with_backoff<T, E>(
    max_retries: u32,
    mut attempt: impl FnMut(u32) -> Result<T, E>,
    sleep: impl Fn(Duration),
    wrap_exhausted: impl FnOnce(E) -> E,
) -> Result<T, E> {
    let mut retry = 0;
    loop {
        if retry > 0 {
            sleep(backoff_delay(retry));
        }

        match attempt(retry) {
            Ok(value) => return Ok(value),
            Err(e) if retry >= max_retries => return Err(wrap_exhausted(e)),
            Err(_) => retry += 1,
        }
    }
}
