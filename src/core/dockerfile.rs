//! Dockerfile inspection.
//!
//! Only the `EXPOSE` instruction is interpreted; everything else in a
//! Dockerfile is opaque text to the role heuristics.

/// Ports listed by every `EXPOSE` instruction, in file order.
///
/// Accepts `EXPOSE 5000`, `EXPOSE 5000/tcp` and several ports per line. The
/// keyword is matched case-insensitively. Tokens that are not plain numbers
/// (for example `${PORT}`) are ignored.
pub fn exposed_ports(content: &str) -> Vec<u16> {
    content
        .lines()
        .filter_map(|line| {
            let mut tokens = line.split_whitespace();
            match tokens.next() {
                Some(keyword) if keyword.eq_ignore_ascii_case("EXPOSE") => Some(tokens),
                _ => None,
            }
        })
        .flatten()
        .filter_map(|token| {
            let port = token.split('/').next().unwrap_or(token);
            port.parse::<u16>().ok()
        })
        .collect()
}

/// First port of the first `EXPOSE` instruction.
pub fn first_exposed_port(content: &str) -> Option<u16> {
    exposed_ports(content).into_iter().next()
}

/// Whether an `EXPOSE` instruction lists the given port.
pub fn exposes(content: &str, port: u16) -> bool {
    exposed_ports(content).contains(&port)
}
