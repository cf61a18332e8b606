//! Time and timeline coordinate helpers.

/// Minimum gap kept between the start and end of a rally, in seconds.
pub const MIN_RALLY_GAP: f64 = 0.1;

/// Distance from the viewport edge (px) at which the timeline re-centres on
/// the playhead while zoomed in.
pub const FOLLOW_SCROLL_MARGIN: f64 = 50.0;

/// Error returned by [`parse_time`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TimeParseError {
    #[error("expected M:SS or M:SS.s, got '{0}'")]
    Format(String),
    #[error("invalid minutes '{0}'")]
    Minutes(String),
    #[error("invalid seconds '{0}'")]
    Seconds(String),
}

/// Formats seconds as `M:SS.s` (or `M:SS` without the decimal).
pub fn format_time(seconds: f64, show_decimal: bool) -> String {
    let mins = (seconds / 60.0).floor();
    let secs = seconds % 60.0;

    if show_decimal {
        format!("{mins}:{secs:04.1}")
    } else {
        format!("{mins}:{:02}", secs.floor())
    }
}

/// Parses `M:SS` or `M:SS.s` into seconds.
pub fn parse_time(text: &str) -> Result<f64, TimeParseError> {
    let mut parts = text.split(':');
    let (Some(mins), Some(secs), None) = (parts.next(), parts.next(), parts.next()) else {
        return Err(TimeParseError::Format(text.to_string()));
    };

    let mins: u32 = mins
        .trim()
        .parse()
        .map_err(|_| TimeParseError::Minutes(mins.to_string()))?;
    let secs: f64 = secs
        .trim()
        .parse()
        .map_err(|_| TimeParseError::Seconds(secs.to_string()))?;
    if !secs.is_finite() {
        return Err(TimeParseError::Seconds(secs.to_string()));
    }

    Ok(f64::from(mins) * 60.0 + secs)
}

/// Rounds to `decimals` places, half away from zero.
pub fn round_to_decimal(seconds: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (seconds * factor).round() / factor
}

/// Rounds to the one-decimal resolution every stored time uses.
pub fn round_time(seconds: f64) -> f64 {
    round_to_decimal(seconds, 1)
}

/// Clamps `time` to `min` and, when given, `max`.
pub fn clamp_time(time: f64, min: f64, max: Option<f64>) -> f64 {
    if time < min {
        return min;
    }
    match max {
        Some(max) if time > max => max,
        _ => time,
    }
}

/// Converts a time to an x offset on a track of `track_width` pixels.
pub fn time_to_pixels(seconds: f64, track_width: f64, duration: f64) -> f64 {
    if duration <= 0.0 {
        return 0.0;
    }
    seconds / duration * track_width
}

/// Converts an x offset on the track back to a time.
pub fn pixels_to_time(pixels: f64, track_width: f64, duration: f64) -> f64 {
    if track_width <= 0.0 {
        return 0.0;
    }
    pixels / track_width * duration
}

/// Ruler tick spacing in seconds for a video of `duration` seconds.
pub fn tick_interval(duration: f64) -> u32 {
    if duration <= 60.0 {
        10
    } else if duration <= 300.0 {
        30
    } else if duration <= 600.0 {
        60
    } else {
        120
    }
}

/// Ruler tick positions in seconds, starting at zero.
pub fn generate_ticks(duration: f64) -> Vec<f64> {
    if !duration.is_finite() || duration < 0.0 {
        return Vec::new();
    }
    let interval = f64::from(tick_interval(duration));
    (0u32..)
        .map(|i| f64::from(i) * interval)
        .take_while(|t| *t <= duration)
        .collect()
}

/// New scroll offset that brings the playhead back into view, or `None`
/// if it is still comfortably inside the visible window.
pub fn follow_scroll(playhead_px: f64, scroll_left: f64, viewport_width: f64) -> Option<f64> {
    let scroll_right = scroll_left + viewport_width;
    if playhead_px < scroll_left + FOLLOW_SCROLL_MARGIN
        || playhead_px > scroll_right - FOLLOW_SCROLL_MARGIN
    {
        Some((playhead_px - viewport_width / 2.0).max(0.0))
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_time() {
        assert_eq!(format_time(65.3, true), "1:05.3");
        assert_eq!(format_time(5.0, true), "0:05.0");
        assert_eq!(format_time(125.9, false), "2:05");
        assert_eq!(format_time(0.0, false), "0:00");
    }

    #[test]
    fn test_parse_time() {
        assert!((parse_time("1:05.5").unwrap() - 65.5).abs() < 1e-9);
        assert!((parse_time("0:07").unwrap() - 7.0).abs() < 1e-9);
        assert!(matches!(parse_time("65"), Err(TimeParseError::Format(_))));
        assert!(matches!(parse_time("1:2:3"), Err(TimeParseError::Format(_))));
        assert!(matches!(parse_time("x:10"), Err(TimeParseError::Minutes(_))));
        assert!(matches!(parse_time("1:abc"), Err(TimeParseError::Seconds(_))));
    }

    #[test]
    fn test_round_half_away_from_zero() {
        assert!((round_time(0.25) - 0.3).abs() < 1e-9);
        assert!((round_time(1.04) - 1.0).abs() < 1e-9);
        assert!((round_time(-0.25) + 0.3).abs() < 1e-9);
        assert!((round_to_decimal(2.346, 2) - 2.35).abs() < 1e-9);
    }

    #[test]
    fn test_clamp_time() {
        assert!((clamp_time(-1.0, 0.0, None)).abs() < 1e-9);
        assert!((clamp_time(50.0, 0.0, Some(30.0)) - 30.0).abs() < 1e-9);
        assert!((clamp_time(12.0, 0.0, Some(30.0)) - 12.0).abs() < 1e-9);
    }

    #[test]
    fn test_pixel_conversion() {
        assert!((time_to_pixels(30.0, 600.0, 60.0) - 300.0).abs() < 1e-9);
        assert!((pixels_to_time(300.0, 600.0, 60.0) - 30.0).abs() < 1e-9);
        assert!(time_to_pixels(30.0, 600.0, 0.0).abs() < 1e-9);
        assert!(pixels_to_time(30.0, 0.0, 60.0).abs() < 1e-9);
    }

    #[test]
    fn test_ticks() {
        assert_eq!(tick_interval(45.0), 10);
        assert_eq!(tick_interval(300.0), 30);
        assert_eq!(tick_interval(601.0), 120);
        assert_eq!(generate_ticks(35.0), vec![0.0, 10.0, 20.0, 30.0]);
        assert_eq!(generate_ticks(60.0).len(), 7);
        assert!(generate_ticks(f64::NAN).is_empty());
    }

    #[test]
    fn test_follow_scroll() {
        // Playhead well inside the window
        assert_eq!(follow_scroll(400.0, 200.0, 800.0), None);
        // Past the right margin: centre on the playhead
        assert_eq!(follow_scroll(980.0, 200.0, 800.0), Some(580.0));
        // Left of the window near zero never scrolls negative
        assert_eq!(follow_scroll(10.0, 200.0, 800.0), Some(0.0));
    }
}
