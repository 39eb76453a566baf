use std::time::Duration;

/// Parse a human duration such as `"30s"`, `"10m"`, `"1h"` or `"2d"`.
/// A bare number is read as seconds.
pub fn parse_duration(s: &str) -> Result<Duration, String> {
    let s = s.trim();
    if s.is_empty() {
        return Err("empty duration string".into());
    }

    let split = s
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(s.len());
    let (num_str, unit) = s.split_at(split);
    let num: u64 = num_str
        .parse()
        .map_err(|_| format!("invalid number in duration: {:?}", s))?;

    let scale: u64 = match unit {
        "" | "s" => 1,
        "m" => 60,
        "h" => 3600,
        "d" => 86400,
        "ms" => return Ok(Duration::from_millis(num)),
        _ => return Err(format!("unknown duration unit: {:?}", unit)),
    };
    let secs = num
        .checked_mul(scale)
        .ok_or_else(|| format!("duration out of range: {:?}", s))?;
    Ok(Duration::from_secs(secs))
}
