//! Terminal output: ANSI colorization and diagram printing.
//!
//! Colors: addresses and CIDRs green,
//! border rows and structural prefixes dim. `colored` handles tty
//! detection, so piped output stays plain unless `--color` forces an
//! override in main.

use crate::models::Segment;
use crate::output::diagram;
use colored::Colorize;
use lazy_static::lazy_static;
use regex::{Captures, Regex};
use std::error::Error;

lazy_static! {
    static ref IP_RE: Regex =
        Regex::new(r"[0-9]{1,3}\.[0-9]{1,3}\.[0-9]{1,3}\.[0-9]{1,3}(/[0-9]{1,2})?")
            .expect("Invalid Regex");
    static ref PREFIX_RE: Regex = Regex::new(r"^[ |]+").expect("Invalid Regex");
}

/// Colorize one diagram line.
///
/// Border rows (anything containing `--`) never carry addresses, so they
/// are dimmed whole. Other lines get their leading `|`-prefix dimmed and
/// any address or CIDR highlighted.
pub fn colorize(line: &str) -> String {
    if line.contains("--") {
        return line.bright_black().to_string();
    }
    let line = PREFIX_RE.replace(line, |caps: &Captures| {
        caps[0].bright_black().to_string()
    });
    IP_RE
        .replace_all(&line, |caps: &Captures| caps[0].green().to_string())
        .to_string()
}

/// Print all VPC diagrams to stdout, blank-line separated, in input order.
pub async fn print_diagrams(
    mut segments: Vec<Segment>,
    verbosity: u8,
) -> Result<(), Box<dyn Error>> {
    log::info!("#Start print_diagrams() vpc_count={}", segments.len());
    for (i, segment) in segments.iter_mut().enumerate() {
        if i > 0 {
            println!();
        }
        log::debug!("rendering {} depth={}", segment.cidr(), segment.max_depth());
        for line in diagram::build_table(segment, verbosity) {
            println!("{}", colorize(&line));
        }
    }
    Ok(())
}
