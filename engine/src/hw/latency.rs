const NANOS_PER_SEC: i128 = 1_000_000_000;

/// Duration of `frames` at `sample_rate`, in nanoseconds, truncated.
pub fn frames_to_nanos(frames: i64, sample_rate: u32) -> i64 {
    if sample_rate == 0 {
        return 0;
    }
    let nanos = i128::from(frames) * NANOS_PER_SEC / i128::from(sample_rate);
    nanos.clamp(i128::from(i64::MIN), i128::from(i64::MAX)) as i64
}

/// Monotonic time at which the last frame of a buffer of `nframes` becomes audible.
///
/// `written - presented` is the backlog still queued in the device. A
/// negative backlog (timestamp racing ahead of the write counter) counts
/// as empty.
pub fn presentation_deadline(
    now_ns: i64,
    nframes: i64,
    frames_written: i64,
    frames_presented: i64,
    sample_rate: u32,
) -> i64 {
    let backlog = frames_written.saturating_sub(frames_presented).max(0);
    now_ns
        .saturating_add(frames_to_nanos(nframes, sample_rate))
        .saturating_add(frames_to_nanos(backlog, sample_rate))
}

#[cfg(unix)]
pub fn now_nanos() -> i64 {
    use nix::time::{ClockId, clock_gettime};

    match clock_gettime(ClockId::CLOCK_MONOTONIC) {
        Ok(ts) => (ts.tv_sec() as i64)
            .saturating_mul(1_000_000_000)
            .saturating_add(ts.tv_nsec() as i64),
        Err(_) => 0,
    }
}

#[cfg(not(unix))]
pub fn now_nanos() -> i64 {
    use std::sync::OnceLock;
    use std::time::Instant;

    static START: OnceLock<Instant> = OnceLock::new();
    let elapsed = START.get_or_init(Instant::now).elapsed();
    i64::try_from(elapsed.as_nanos()).unwrap_or(i64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn converts_frames_to_nanos() {
        assert_eq!(frames_to_nanos(48_000, 48_000), 1_000_000_000);
        assert_eq!(frames_to_nanos(480, 48_000), 10_000_000);
        assert_eq!(frames_to_nanos(1, 44_100), 22_675);
        assert_eq!(frames_to_nanos(100, 0), 0);
    }

    #[test]
    fn deadline_adds_buffer_and_backlog() {
        let deadline = presentation_deadline(5_000, 480, 9_600, 4_800, 48_000);
        assert_eq!(deadline, 5_000 + 10_000_000 + 100_000_000);
    }

    #[test]
    fn zero_latency_when_presented_equals_written() {
        let deadline = presentation_deadline(0, 192, 1_000, 1_000, 48_000);
        assert_eq!(deadline, frames_to_nanos(192, 48_000));
    }

    #[test]
    fn negative_backlog_is_ignored() {
        assert_eq!(
            presentation_deadline(0, 192, 1_000, 2_000, 48_000),
            presentation_deadline(0, 192, 1_000, 1_000, 48_000)
        );
    }

    #[test]
    fn deadline_is_strictly_increasing_in_frames() {
        for rate in [8_000, 44_100, 48_000, 96_000, 192_000, 384_000] {
            let mut last = presentation_deadline(1_000, 0, 4_096, 1_024, rate);
            for nframes in 1..2_048 {
                let next = presentation_deadline(1_000, nframes, 4_096, 1_024, rate);
                assert!(next > last, "rate {rate}, {nframes} frames");
                last = next;
            }
        }
    }

    #[test]
    fn clock_moves_forward() {
        let a = now_nanos();
        let b = now_nanos();
        assert!(b >= a);
    }
}
