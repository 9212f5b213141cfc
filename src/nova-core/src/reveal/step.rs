//! Reveal pacing.

use std::time::Duration;

/// Default delay between two reveal ticks (~60 updates per second).
pub const DEFAULT_TICK_INTERVAL: Duration = Duration::from_millis(16);

/// Returns how many characters a reveal advances per tick for a text of
/// `len` characters.
///
/// Longer replies move faster so the total reveal time stays roughly bounded.
///
/// | length        | step |
/// |---------------|------|
/// | > 1500        | 6    |
/// | 801 ..= 1500  | 4    |
/// | 301 ..= 800   | 2    |
/// | ..= 300       | 1    |
pub fn step_size_for(len: usize) -> usize {
    match len {
        l if l > 1500 => 6,
        l if l > 800 => 4,
        l if l > 300 => 2,
        _ => 1,
    }
}

/// Number of ticks needed to reveal `len` characters.
pub fn ticks_for(len: usize) -> usize {
    len.div_ceil(step_size_for(len))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_step_size_bands() {
        assert_eq!(step_size_for(2000), 6);
        assert_eq!(step_size_for(1000), 4);
        assert_eq!(step_size_for(500), 2);
        assert_eq!(step_size_for(100), 1);
    }

    #[test]
    fn test_step_size_band_edges() {
        assert_eq!(step_size_for(0), 1);
        assert_eq!(step_size_for(300), 1);
        assert_eq!(step_size_for(301), 2);
        assert_eq!(step_size_for(800), 2);
        assert_eq!(step_size_for(801), 4);
        assert_eq!(step_size_for(1500), 4);
        assert_eq!(step_size_for(1501), 6);
    }

    #[test]
    fn test_ticks_for() {
        assert_eq!(ticks_for(0), 0);
        assert_eq!(ticks_for(5), 5);
        assert_eq!(ticks_for(301), 151);
        assert_eq!(ticks_for(2000), 334);
    }
}
