// Parser for `df -h` output.

use crate::models::{BlockDevice, bytes_to_mb};

/// Multiplier for each size suffix, powers of 1024.
const UNITS: [(char, f64); 7] = [
    ('B', 1.0),
    ('K', 1024.0),
    ('M', 1024.0 * 1024.0),
    ('G', 1024.0 * 1024.0 * 1024.0),
    ('T', 1024.0 * 1024.0 * 1024.0 * 1024.0),
    ('P', 1024.0 * 1024.0 * 1024.0 * 1024.0 * 1024.0),
    ('E', 1024.0 * 1024.0 * 1024.0 * 1024.0 * 1024.0 * 1024.0),
];

/// Converts a human-readable size such as `915G` or `6.2M` to bytes. Returns 0 when the
/// token is not `<number><unit>`.
pub fn human_to_bytes(size: &str) -> f64 {
    let size = size.trim();
    let parsed = size.chars().last().and_then(|unit| {
        let multiplier = UNITS
            .iter()
            .find(|(u, _)| u.eq_ignore_ascii_case(&unit))
            .map(|(_, m)| *m)?;
        let number = size[..size.len() - unit.len_utf8()].trim_end();
        if number.is_empty() || !number.chars().all(|c| c.is_ascii_digit() || c == '.') {
            return None;
        }
        number.parse::<f64>().ok().map(|n| n * multiplier)
    });
    parsed.unwrap_or_else(|| {
        tracing::debug!(size, "invalid human-readable size");
        0.0
    })
}

/// `NN%` to an integer in [0,100]; anything unparsable is 0.
fn parse_percent(s: &str) -> u8 {
    let digits: String = s
        .trim()
        .trim_end_matches('%')
        .chars()
        .take_while(|c| c.is_ascii_digit())
        .collect();
    digits.parse::<u64>().map(|p| p.min(100) as u8).unwrap_or(0)
}

/// Parses `df -h` rows whose filesystem starts with `device_prefix`. Rows with fewer than six
/// columns, other devices and zero-sized devices are skipped.
pub fn parse_df(output: &str, device_prefix: &str) -> Vec<BlockDevice> {
    let mut devices = Vec::new();
    for line in output.lines() {
        let parts: Vec<&str> = line.split_whitespace().collect();
        if parts.len() < 6 {
            if !line.trim().is_empty() {
                tracing::debug!(line, "skipping df row with too few columns");
            }
            continue;
        }
        let (filesystem, size, used, avail, capacity) =
            (parts[0], parts[1], parts[2], parts[3], parts[4]);
        if !filesystem.starts_with(device_prefix) {
            continue;
        }

        let total_bytes = human_to_bytes(size);
        if total_bytes <= 0.0 {
            tracing::debug!(filesystem, "skipping device with invalid size");
            continue;
        }

        devices.push(BlockDevice {
            path: filesystem.to_string(),
            mount_point: parts[5..].join(" "),
            total: bytes_to_mb(total_bytes),
            used: bytes_to_mb(human_to_bytes(used)),
            free: bytes_to_mb(human_to_bytes(avail)),
            percentage: parse_percent(capacity),
            human_size: size.to_string(),
            human_used: used.to_string(),
            human_free: avail.to_string(),
        });
    }
    devices
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn human_to_bytes_units() {
        assert_eq!(human_to_bytes("1.5G"), 1.5 * 1024.0 * 1024.0 * 1024.0);
        assert_eq!(human_to_bytes("512"), 0.0);
        assert_eq!(human_to_bytes("10k"), 10.0 * 1024.0);
        assert_eq!(human_to_bytes(" 2T "), 2.0 * 1024f64.powi(4));
        assert_eq!(human_to_bytes("0B"), 0.0);
    }

    #[test]
    fn human_to_bytes_rejects_garbage() {
        assert_eq!(human_to_bytes("bogus"), 0.0);
        assert_eq!(human_to_bytes("G"), 0.0);
        assert_eq!(human_to_bytes("-5G"), 0.0);
        assert_eq!(human_to_bytes("1.5X"), 0.0);
        assert_eq!(human_to_bytes(""), 0.0);
    }

    #[test]
    fn percent_is_clamped() {
        assert_eq!(parse_percent("92%"), 92);
        assert_eq!(parse_percent("250%"), 100);
        assert_eq!(parse_percent("-"), 0);
    }

    #[test]
    fn short_and_foreign_rows_are_discarded() {
        let out = "\
/dev/nvme0n1p2  915G  795G   74G  92% /
/dev/nvme0n1p1  511M
/dev/sda1       1.8T  1.2T  600G  67% /data
";
        let devices = parse_df(out, "/dev/nvme");
        assert_eq!(devices.len(), 1);
        assert_eq!(devices[0].path, "/dev/nvme0n1p2");
        assert_eq!(devices[0].total, 915 * 1024);
        assert_eq!(devices[0].percentage, 92);
    }

    #[test]
    fn zero_sized_device_is_discarded() {
        let devices = parse_df("/dev/nvme1n1 0 0 0 - /mnt/x\n", "/dev/nvme");
        assert!(devices.is_empty());
    }

    #[test]
    fn mount_point_with_spaces_is_rejoined() {
        let devices = parse_df("/dev/nvme1n1p1 100G 1G 99G 1% /mnt/my disk\n", "/dev/nvme");
        assert_eq!(devices[0].mount_point, "/mnt/my disk");
    }
}
