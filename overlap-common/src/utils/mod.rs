use std::time::{Duration, Instant};

/// Returns a formatted string of elapsed time, e.g.
/// `1min 34.852s`
pub fn get_formatted_elapsed_time(instant: Instant) -> String {
    format_duration(instant.elapsed())
}

fn format_duration(dur: Duration) -> String {
    let minutes = dur.as_secs() / 60;
    let sub_sec = dur.as_secs() % 60;
    let sub_milli = dur.subsec_millis();
    if minutes > 0 {
        return format!("{}min {}.{:03}s", minutes, sub_sec, sub_milli);
    }
    format!("{}.{:03}s", sub_sec, sub_milli)
}

#[cfg(test)]
mod test {
    use super::format_duration;
    use std::time::Duration;

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(Duration::from_millis(1_250)), "1.250s");
        assert_eq!(format_duration(Duration::from_millis(94_852)), "1min 34.852s");
        assert_eq!(format_duration(Duration::from_millis(7)), "0.007s");
    }
}
