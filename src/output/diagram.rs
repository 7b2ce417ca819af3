//! ASCII tree diagram rendering for a segment trie.
//!
//! Each segment renders to a block of fixed-width lines opened and closed
//! by a horizontal border row. Sibling blocks are joined by merging the
//! closing border of the first with the opening border of the second, so
//! branches of different depths still share one seamless border.
//!
//! Border width is driven by `rest_depth`: the trie's `max_depth()` minus
//! the levels already consumed on the path from the root. Every level adds
//! a four-column band, which lines all leaves up at the same right edge.

use crate::models::Segment;

/// Fixed tail of every horizontal border row.
const SEPARATOR: &str = "----------------------------------------";

/// Continuation prefix for interior lines of a child block.
const PREFIX_BAR: &str = "|   ";
/// Branch connector prefixing the first or last line of a child block.
const PREFIX_BRANCH: &str = "+---";

/// Render one top-level segment as an ordered list of diagram lines.
///
/// Verbosity: 0 topology only, 1 adds `addr info1` host lines, 2 adds
/// `info2`. Missing half-ranges are materialized as `NotAllocated`
/// placeholder nodes while rendering, hence `&mut`.
pub fn build_table(segment: &mut Segment, verbosity: u8) -> Vec<String> {
    let rest_depth = segment.max_depth();
    build_segment_table(segment, verbosity, rest_depth)
}

fn border(rest_depth: usize) -> String {
    let mut line = String::from("+");
    for _ in 0..=rest_depth {
        line.push_str("----");
    }
    line.push_str(SEPARATOR);
    line
}

fn build_segment_table(segment: &mut Segment, verbosity: u8, rest_depth: usize) -> Vec<String> {
    let border1 = border(rest_depth);
    let mut lines = Vec::new();

    let label = segment.label().map(str::to_string);
    let sub_prefix_first = if label.is_some() { PREFIX_BAR } else { PREFIX_BRANCH };

    if let Some(label) = &label {
        lines.push(border1.clone());
        lines.push(format!("| {label}"));
        for host_line in build_host_lines(segment, verbosity) {
            lines.push(format!("{PREFIX_BAR}{host_line}"));
        }
    }

    if segment.has_children() {
        let child_depth = rest_depth.saturating_sub(1);
        let lower = build_segment_table(segment.get_or_create_child(0), verbosity, child_depth);
        let upper = build_segment_table(segment.get_or_create_child(1), verbosity, child_depth);
        let merged = merge_line_blocks(&lower, &upper);

        lines.push(format!("{sub_prefix_first}{}", merged[0]));
        for line in &merged[1..merged.len() - 1] {
            lines.push(format!("{PREFIX_BAR}{line}"));
        }
        lines.push(format!("{PREFIX_BRANCH}{}", merged[merged.len() - 1]));
    } else {
        lines.push(border1.clone());
    }

    // Pure gap: neither declared nor subdivided.
    if label.is_none() && !segment.has_children() {
        lines.push(format!("| {} NotAllocated", segment.cidr()));
        lines.push(border1);
    }

    lines
}

fn build_host_lines(segment: &Segment, verbosity: u8) -> Vec<String> {
    let mut lines = Vec::new();
    for host in segment.sorted_hosts() {
        if verbosity >= 2 {
            lines.push(format!("{} {} {}", host.addr, host.info1, host.info2));
        } else if verbosity >= 1 {
            lines.push(format!("{} {}", host.addr, host.info1));
        }
    }
    lines
}

/// Join two line blocks by overlaying the closing border row of the first
/// onto the opening border row of the second.
///
/// Per column: junction (`+`) beats line (`-`) beats blank. Both seam rows
/// are full-width border rows, so the blocks share one merged row.
pub fn merge_line_blocks(first: &[String], second: &[String]) -> Vec<String> {
    let seam_first = first.last().expect("first block is empty");
    let seam_second = second.first().expect("second block is empty");
    debug_assert_eq!(seam_first.len(), seam_second.len(), "seam rows differ in width");

    let merged: String = seam_first
        .chars()
        .zip(seam_second.chars())
        .map(|(a, b)| {
            if a == '+' || b == '+' {
                '+'
            } else if a == '-' || b == '-' {
                '-'
            } else {
                ' '
            }
        })
        .collect();

    let mut lines = Vec::with_capacity(first.len() + second.len() - 1);
    lines.extend_from_slice(&first[..first.len() - 1]);
    lines.push(merged);
    lines.extend_from_slice(&second[1..]);
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Ipv4, Segment};
    use std::net::Ipv4Addr;

    fn seg(cidr: &str, label: &str) -> Segment {
        Segment::new(Ipv4::new(cidr).unwrap(), Some(label.to_string()))
    }

    fn block(lines: &[&str]) -> Vec<String> {
        lines.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_merge_junction_beats_line() {
        let merged = merge_line_blocks(&block(&["+---"]), &block(&["+--+"]));
        assert_eq!(merged, block(&["+--+"]));
    }

    #[test]
    fn test_merge_line_beats_blank() {
        let merged = merge_line_blocks(&block(&["+-- "]), &block(&["+  -"]));
        assert_eq!(merged, block(&["+---"]));
    }

    #[test]
    fn test_merge_keeps_interior_lines() {
        let merged = merge_line_blocks(
            &block(&["+---", "| a", "+---"]),
            &block(&["+---", "| b", "+---"]),
        );
        assert_eq!(merged, block(&["+---", "| a", "+---", "| b", "+---"]));
    }

    #[test]
    fn test_leaf_block_opens_and_closes_with_border() {
        let mut leaf = seg("10.0.0.0/24", "10.0.0.0/24 subnet-1 az web");
        let lines = build_table(&mut leaf, 0);
        let expected_border = format!("+----{SEPARATOR}");
        assert_eq!(
            lines,
            block(&[
                &expected_border,
                "| 10.0.0.0/24 subnet-1 az web",
                &expected_border,
            ])
        );
    }

    #[test]
    fn test_two_siblings_exact_layout() {
        let mut root = seg("10.0.0.0/24", "root");
        root.insert(seg("10.0.0.0/25", "low")).unwrap();
        root.insert(seg("10.0.0.128/25", "high")).unwrap();

        let lines = build_table(&mut root, 0);
        assert_eq!(
            lines,
            block(&[
                &format!("+--------{SEPARATOR}"),
                "| root",
                &format!("|   +----{SEPARATOR}"),
                "|   | low",
                &format!("|   +----{SEPARATOR}"),
                "|   | high",
                &format!("+---+----{SEPARATOR}"),
            ])
        );
    }

    #[test]
    fn test_gap_sibling_renders_not_allocated() {
        let mut root = seg("10.0.0.0/24", "root");
        root.insert(seg("10.0.0.0/25", "low")).unwrap();

        let lines = build_table(&mut root, 0);
        assert!(lines.iter().any(|l| l.contains("| 10.0.0.128/25 NotAllocated")));
        // The declared half must not be flagged.
        assert!(!lines.iter().any(|l| l.contains("10.0.0.0/25 NotAllocated")));
    }

    #[test]
    fn test_border_rows_share_one_width() {
        let mut root = seg("10.0.0.0/16", "root");
        root.insert(seg("10.0.0.0/24", "a")).unwrap();
        root.insert(seg("10.0.2.0/24", "b")).unwrap();

        let lines = build_table(&mut root, 0);
        let width = lines[0].len();
        for line in &lines {
            if line.contains("----") {
                assert_eq!(line.len(), width, "ragged border row: {line}");
            }
        }
        // Every border row is built from border and prefix characters only.
        for line in lines.iter().filter(|l| l.contains("----")) {
            assert!(line.chars().all(|c| matches!(c, '+' | '-' | '|' | ' ')));
        }
    }

    #[test]
    fn test_host_lines_by_verbosity() {
        let mut leaf = seg("10.0.0.0/24", "leaf");
        leaf.add_host(
            Ipv4Addr::new(10, 0, 0, 5),
            "i-0abc".to_string(),
            "{\"x\":1}".to_string(),
        );

        let topology = build_table(&mut leaf.clone(), 0);
        assert!(!topology.iter().any(|l| l.contains("10.0.0.5")));

        let short = build_table(&mut leaf.clone(), 1);
        assert!(short.iter().any(|l| l == "|   10.0.0.5 i-0abc"));
        assert!(!short.iter().any(|l| l.contains("{\"x\":1}")));

        let long = build_table(&mut leaf, 2);
        assert!(long.iter().any(|l| l == "|   10.0.0.5 i-0abc {\"x\":1}"));
    }

    #[test]
    fn test_hosts_render_sorted_by_address() {
        let mut leaf = seg("10.0.0.0/24", "leaf");
        leaf.add_host(Ipv4Addr::new(10, 0, 0, 20), "late".to_string(), String::new());
        leaf.add_host(Ipv4Addr::new(10, 0, 0, 3), "early".to_string(), String::new());

        let lines = build_table(&mut leaf, 1);
        let early = lines.iter().position(|l| l.contains("10.0.0.3")).unwrap();
        let late = lines.iter().position(|l| l.contains("10.0.0.20")).unwrap();
        assert!(early < late);
    }
}
