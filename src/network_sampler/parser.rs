// Header-driven parser for `sar -n DEV` summary rows.

use crate::error::ParseError;
use crate::models::InterfaceRate;

const IFACE_COLUMN: &str = "iface";
const RX_COLUMN: &str = "rxkb/s";
const TX_COLUMN: &str = "txkb/s";
const LOOPBACK: &str = "lo";

struct Columns {
    iface: usize,
    rx: usize,
    tx: Option<usize>,
}

impl Columns {
    /// Resolves column positions from a header row; `None` unless both interface and
    /// receive-rate columns are present.
    fn from_header(line: &str) -> Option<Self> {
        let lower = line.to_ascii_lowercase();
        if !lower.contains(IFACE_COLUMN) || !lower.contains(RX_COLUMN) {
            return None;
        }
        let headers: Vec<&str> = lower.split_whitespace().collect();
        Some(Self {
            iface: headers.iter().position(|h| *h == IFACE_COLUMN)?,
            rx: headers.iter().position(|h| h.contains(RX_COLUMN))?,
            tx: headers.iter().position(|h| h.contains(TX_COLUMN)),
        })
    }
}

/// Rates may use a comma decimal separator depending on locale; unparsable is 0.
fn parse_rate(s: Option<&&str>) -> f64 {
    s.and_then(|v| v.replace(',', ".").parse::<f64>().ok())
        .filter(|v| v.is_finite())
        .unwrap_or(0.0)
}

/// Parses the "Average" rows of a `sar -n DEV 1 1` report. Column order is taken from the
/// header, so reordering between sysstat versions is tolerated. Loopback is excluded.
pub fn parse_sar_average(output: &str) -> Result<Vec<InterfaceRate>, ParseError> {
    let rows: Vec<&str> = output
        .lines()
        .filter(|l| l.to_ascii_lowercase().contains("average"))
        .collect();

    let (header_idx, columns) = rows
        .iter()
        .enumerate()
        .find_map(|(i, l)| Columns::from_header(l).map(|c| (i, c)))
        .ok_or(ParseError::MissingHeader)?;

    let mut interfaces = Vec::new();
    for line in &rows[header_idx + 1..] {
        let cols: Vec<&str> = line.split_whitespace().collect();
        let Some(iface) = cols.get(columns.iface) else {
            continue;
        };
        if *iface == LOOPBACK || iface.eq_ignore_ascii_case(IFACE_COLUMN) {
            continue;
        }
        interfaces.push(InterfaceRate {
            iface: iface.to_string(),
            rx_kbs: parse_rate(cols.get(columns.rx)),
            tx_kbs: columns.tx.map_or(0.0, |tx| parse_rate(cols.get(tx))),
        });
    }
    Ok(interfaces)
}
