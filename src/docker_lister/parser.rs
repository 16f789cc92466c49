// Parser for `docker ps --format "table ..."` output.

use crate::models::DockerContainer;

const SHORT_ID_LEN: usize = 12;
const UNNAMED: &str = "<unnamed>";
const UNKNOWN: &str = "unknown";
const NO_PORTS: &str = "-";

fn short_id(id: &str) -> String {
    id.chars().take(SHORT_ID_LEN).collect()
}

fn parse_ports(ports: Option<&str>) -> Vec<String> {
    match ports.map(str::trim) {
        None | Some("") | Some(NO_PORTS) => Vec::new(),
        Some(p) => p
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(String::from)
            .collect(),
    }
}

fn or_placeholder(field: Option<&str>, placeholder: &str) -> String {
    field
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .unwrap_or(placeholder)
        .to_string()
}

/// A bare port number only counts once the row is long enough to also hold a status.
fn looks_like_ports(token: &str, word_count: usize) -> bool {
    token.contains(':')
        || token.contains('/')
        || token == NO_PORTS
        || (word_count > 5 && !token.is_empty() && token.bytes().all(|b| b.is_ascii_digit()))
}

/// Tab-delimited row: id, name, image, status, ports.
fn parse_tabbed(parts: &[&str]) -> DockerContainer {
    DockerContainer {
        id: short_id(parts[0]),
        name: or_placeholder(parts.get(1).copied(), UNNAMED),
        image: or_placeholder(parts.get(2).copied(), UNKNOWN),
        status: or_placeholder(parts.get(3).copied(), UNKNOWN),
        ports: parse_ports(parts.get(4).copied()),
    }
}

/// Whitespace fallback when tabs were lost: positional id/name/image, then the last token is
/// taken as ports only if it looks like a port mapping.
fn parse_whitespace(line: &str) -> Option<DockerContainer> {
    let words: Vec<&str> = line.split_whitespace().collect();
    if words.len() < 4 {
        return None;
    }
    let (status, ports) = match words.last() {
        Some(last) if words.len() >= 5 && looks_like_ports(last, words.len()) => {
            (words[3..words.len() - 1].join(" "), Some(*last))
        }
        _ => (words[3..].join(" "), None),
    };
    Some(DockerContainer {
        id: short_id(words[0]),
        name: words[1].to_string(),
        image: words[2].to_string(),
        status: or_placeholder(Some(status.as_str()), UNKNOWN),
        ports: parse_ports(ports),
    })
}

/// Parses a container table; the first line is the header. Rows that cannot be
/// interpreted are skipped.
pub fn parse_docker_ps(output: &str) -> Vec<DockerContainer> {
    output
        .trim()
        .lines()
        .skip(1)
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .filter_map(|line| {
            let parts: Vec<&str> = line
                .split('\t')
                .filter(|p| !p.trim().is_empty())
                .collect();
            if parts.len() >= 4 {
                Some(parse_tabbed(&parts))
            } else {
                let parsed = parse_whitespace(line);
                if parsed.is_none() {
                    tracing::debug!(line, "skipping unparsable container row");
                }
                parsed
            }
        })
        .collect()
}
