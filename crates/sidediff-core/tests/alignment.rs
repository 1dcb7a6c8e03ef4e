use proptest::prelude::*;
use sidediff_core::{align_str, Aligner, DiffRow, LineKind, Side};

#[derive(Debug, Clone)]
enum Op {
    Context(String),
    Delete(String),
    Insert(String),
    Header,
    Noise,
}

impl Op {
    fn render(&self) -> String {
        match self {
            Op::Context(s) => format!(" {}", s),
            Op::Delete(s) => format!("-{}", s),
            Op::Insert(s) => format!("+{}", s),
            Op::Header => "@@ -1 +1 @@".to_string(),
            Op::Noise => "\\ No newline at end of file".to_string(),
        }
    }
}

fn op() -> impl Strategy<Value = Op> {
    // Content never starts with a marker that would turn `-`/`+` lines into metadata
    let text = "[a-z0-9 ]{0,8}";
    prop_oneof![
        text.prop_map(Op::Context),
        text.prop_map(Op::Delete),
        text.prop_map(Op::Insert),
        Just(Op::Header),
        Just(Op::Noise),
    ]
}

fn numbers(rows: &[DiffRow], side: Side) -> Vec<usize> {
    rows.iter()
        .filter_map(|row| row.side(side).and_then(|l| l.number))
        .collect()
}

fn side_content(rows: &[DiffRow], side: Side) -> Vec<String> {
    rows.iter()
        .filter_map(|row| row.side(side))
        .filter(|l| l.kind != LineKind::Header)
        .map(|l| l.content[1..].to_string())
        .collect()
}

proptest! {
    #[test]
    fn line_numbers_count_up_from_one(ops in prop::collection::vec(op(), 0..60)) {
        let diff: Vec<String> = ops.iter().map(Op::render).collect();
        let rows = align_str(&diff.join("\n"));

        for side in [Side::Old, Side::New] {
            let nums = numbers(&rows, side);
            let expected: Vec<usize> = (1..=nums.len()).collect();
            prop_assert_eq!(nums, expected);
        }
    }

    #[test]
    fn sides_never_hold_the_other_sides_changes(ops in prop::collection::vec(op(), 0..60)) {
        let diff: Vec<String> = ops.iter().map(Op::render).collect();
        let rows = align_str(&diff.join("\n"));

        for row in &rows {
            prop_assert!(row.old.as_ref().map_or(true, |l| l.kind != LineKind::Addition));
            prop_assert!(row.new.as_ref().map_or(true, |l| l.kind != LineKind::Deletion));
            prop_assert!(row.old.is_some() || row.new.is_some());
        }
    }

    #[test]
    fn each_side_reproduces_its_file(ops in prop::collection::vec(op(), 0..60)) {
        let diff: Vec<String> = ops.iter().map(Op::render).collect();
        let rows = align_str(&diff.join("\n"));

        let old_file: Vec<String> = ops.iter().filter_map(|op| match op {
            Op::Context(s) | Op::Delete(s) => Some(s.clone()),
            _ => None,
        }).collect();
        let new_file: Vec<String> = ops.iter().filter_map(|op| match op {
            Op::Context(s) | Op::Insert(s) => Some(s.clone()),
            _ => None,
        }).collect();

        prop_assert_eq!(side_content(&rows, Side::Old), old_file);
        prop_assert_eq!(side_content(&rows, Side::New), new_file);
    }

    #[test]
    fn flush_emits_max_of_pending_blocks(dels in 0usize..10, adds in 0usize..10) {
        let mut aligner = Aligner::new();
        for i in 0..dels {
            aligner.push_line(&format!("-d{}", i));
        }
        for i in 0..adds {
            aligner.push_line(&format!("+a{}", i));
        }
        prop_assert!(aligner.rows().is_empty());

        aligner.push_line(" ctx");
        let rows = aligner.finish();
        prop_assert_eq!(rows.len(), dels.max(adds) + 1);
        prop_assert_eq!(rows[rows.len() - 1].side(Side::Old).and_then(|l| l.number), Some(dels + 1));
        prop_assert_eq!(rows[rows.len() - 1].side(Side::New).and_then(|l| l.number), Some(adds + 1));
    }
}

#[test]
fn full_git_diff_output() {
    let diff = "\
diff --git a/src/lib.rs b/src/lib.rs
index 3b18e51..a4c2f19 100644
--- a/src/lib.rs
+++ b/src/lib.rs
@@ -1,4 +1,4 @@
 use std::io;
-fn old() {}
+fn new() {}
 
 fn keep() {}
@@ -10,2 +10,3 @@ fn keep() {}
 fn tail() {}
+fn extra() {}
\\ No newline at end of file
";
    let rows = align_str(diff);

    assert_eq!(rows.len(), 8);
    assert!(rows[0].is_header());
    assert_eq!(rows[2].old.as_ref().unwrap().content, "-fn old() {}");
    assert_eq!(rows[2].new.as_ref().unwrap().content, "+fn new() {}");
    assert_eq!(rows[3].old.as_ref().unwrap().content, " ");
    assert!(rows[5].is_header());
    // Numbering continues across hunks; headers never reset it
    assert_eq!(rows[6].old.as_ref().unwrap().number, Some(5));
    assert_eq!(rows[7].old, None);
    assert_eq!(rows[7].new.as_ref().unwrap().number, Some(6));
}

#[test]
fn rows_serialize_with_padding_as_null() {
    let rows = align_str("+a\n");
    let json = serde_json::to_value(&rows).unwrap();

    assert!(json[0]["old"].is_null());
    assert_eq!(json[0]["new"]["number"], 1);
    assert_eq!(json[0]["new"]["kind"], "Addition");
}
