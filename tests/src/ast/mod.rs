//! Whole-tree AST properties: span ordering (invariant #1) and the printer.

use crate::utils::parse;
use quixc_ast::print::print_to_string;

const SAMPLE: &str = r#"
struct Point {
    pub x: u32;
    pub y: u32;
}

fn add(x: u32, y: u32) -> u32 {
    return x + y;
}

pub fn distance_squared(p: Point) -> u32 {
    return add(p.x, p.y);
}
"#;

#[test]
fn every_node_has_a_well_ordered_span() {
    let (arena, _root, issues) = parse(SAMPLE);
    assert!(issues.is_empty());
    for (id, _node) in arena.iter() {
        let span = arena.span(id);
        assert!(
            span.lo <= span.hi,
            "node {id:?} has an inverted span ({}, {})",
            span.lo,
            span.hi
        );
    }
}

#[test]
fn a_parents_span_encloses_every_childs_span() {
    let (arena, _root, issues) = parse(SAMPLE);
    assert!(issues.is_empty());
    for (id, _node) in arena.iter() {
        let parent_span = arena.span(id);
        for child in arena.children(id) {
            let child_span = arena.span(child);
            assert!(
                parent_span.lo <= child_span.lo && child_span.hi <= parent_span.hi,
                "child {child:?} span ({}, {}) escapes parent {id:?} span ({}, {})",
                child_span.lo,
                child_span.hi,
                parent_span.lo,
                parent_span.hi
            );
        }
    }
}

#[test]
fn printing_a_parsed_source_file_mentions_every_top_level_name() {
    let (arena, root, issues) = parse(SAMPLE);
    assert!(issues.is_empty());
    let printed = print_to_string(&arena, root, false);
    assert!(printed.contains("Point"));
    assert!(printed.contains("add"));
    assert!(printed.contains("distance_squared"));
}

#[test]
fn debug_printing_includes_node_indices() {
    let (arena, root, _issues) = parse("const X: u32 = 1;");
    let plain = print_to_string(&arena, root, false);
    let debug = print_to_string(&arena, root, true);
    assert!(!plain.contains('#'));
    assert!(debug.contains('#'));
}
