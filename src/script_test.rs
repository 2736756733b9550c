#![allow(clippy::float_cmp)]

use canvas::doc::ElementKind;
use canvas::engine::EngineConfig;

use super::*;

fn pt(x: f64, y: f64) -> Point {
    Point::new(x, y)
}

// =============================================================
// parse
// =============================================================

#[test]
fn parse_reads_every_command() {
    let steps = parse("tool line\ndown 1 2\nmove 3.5 -4\nup\ntext Hello world\n").unwrap();
    assert_eq!(
        steps,
        vec![
            Step::Tool(Tool::Line),
            Step::Down(pt(1.0, 2.0)),
            Step::Move(pt(3.5, -4.0)),
            Step::Up,
            Step::Text("Hello world".to_owned()),
        ]
    );
}

#[test]
fn parse_skips_blank_lines_and_comments() {
    let steps = parse("# header\n\n   \ntool eraser  # trailing\n").unwrap();
    assert_eq!(steps, vec![Step::Tool(Tool::Eraser)]);
}

#[test]
fn parse_tool_names_are_case_insensitive() {
    let steps = parse("tool SELECT").unwrap();
    assert_eq!(steps, vec![Step::Tool(Tool::Select)]);
}

#[test]
fn parse_up_accepts_optional_coordinates() {
    let steps = parse("up\nup 5 5\nup 1 2 # released").unwrap();
    assert_eq!(steps, vec![Step::Up, Step::Up, Step::Up]);
}

#[test]
fn parse_up_rejects_trailing_garbage() {
    for src in ["up foo", "up 1", "up 1 2 3"] {
        let err = parse(src).unwrap_err();
        assert!(matches!(err, ScriptError::Coordinates { line: 1 }), "{src}: {err:?}");
    }
}

#[test]
fn parse_text_keeps_hash_characters() {
    let steps = parse("text C# rocks\ntext #1 # not a comment\n").unwrap();
    assert_eq!(
        steps,
        vec![Step::Text("C# rocks".to_owned()), Step::Text("#1 # not a comment".to_owned())]
    );
}

#[test]
fn parse_strips_trailing_comments_after_coordinates() {
    let steps = parse("down 1 2 # press\nmove 3 4#drag").unwrap();
    assert_eq!(steps, vec![Step::Down(pt(1.0, 2.0)), Step::Move(pt(3.0, 4.0))]);
}

#[test]
fn parse_rejects_unknown_command_with_line_number() {
    let err = parse("tool brush\njump 1 1").unwrap_err();
    match err {
        ScriptError::UnknownCommand { line, word } => {
            assert_eq!(line, 2);
            assert_eq!(word, "jump");
        }
        other => panic!("expected UnknownCommand, got {other:?}"),
    }
}

#[test]
fn parse_rejects_unknown_tool() {
    let err = parse("\n\ntool spray").unwrap_err();
    assert!(matches!(err, ScriptError::Tool { line: 3, .. }));
    assert!(err.to_string().contains("spray"));
}

#[test]
fn parse_rejects_bad_coordinates() {
    for src in ["down", "down 1", "down 1 two", "move 1 2 3"] {
        let err = parse(src).unwrap_err();
        assert!(matches!(err, ScriptError::Coordinates { line: 1 }), "{src}: {err:?}");
    }
}

#[test]
fn parse_rejects_empty_text() {
    let err = parse("text   ").unwrap_err();
    assert!(matches!(err, ScriptError::EmptyText { line: 1 }));
}

// =============================================================
// replay
// =============================================================

#[test]
fn replay_brush_gesture_creates_stroke() {
    let steps = parse("tool brush\ndown 10 10\nmove 20 10\nmove 30 10\nup").unwrap();
    let mut core = EngineCore::new();
    let summary = replay(&mut core, &steps);

    assert_eq!(summary, ReplaySummary { created: 1, updated: 0, deleted: 0 });
    assert_eq!(core.doc.len(), 1);
    let ElementKind::Stroke { points } = &core.doc.elements()[0].kind else {
        panic!("expected stroke");
    };
    assert_eq!(points, &vec![pt(10.0, 10.0), pt(20.0, 10.0), pt(30.0, 10.0)]);
}

#[test]
fn replay_counts_updates_and_deletes() {
    let src = "\
tool line
down 0 0
move 100 0
up
tool select
down 100 0
move 100 50
move 100 60
up
tool eraser
down 0 0
";
    let mut core = EngineCore::new();
    let summary = replay(&mut core, &parse(src).unwrap());

    assert_eq!(summary, ReplaySummary { created: 1, updated: 2, deleted: 1 });
    assert!(core.doc.is_empty());
}

#[test]
fn replay_text_answers_prompts_in_order() {
    let src = "\
text first
text second
tool text
down 10 10
down 50 50
";
    let mut core = EngineCore::new();
    let summary = replay(&mut core, &parse(src).unwrap());

    assert_eq!(summary.created, 2);
    let texts: Vec<&str> = core
        .doc
        .iter()
        .filter_map(|e| match &e.kind {
            ElementKind::Label { text, .. } => Some(text.as_str()),
            _ => None,
        })
        .collect();
    assert_eq!(texts, ["first", "second"]);
}

#[test]
fn replay_text_with_hash_reaches_the_label() {
    let steps = parse("text C# rocks\ntool text\ndown 10 10").unwrap();
    let mut core = EngineCore::new();
    replay(&mut core, &steps);

    let ElementKind::Label { text, .. } = &core.doc.elements()[0].kind else {
        panic!("expected label");
    };
    assert_eq!(text, "C# rocks");
}

#[test]
fn replay_text_without_answer_cancels() {
    let steps = parse("tool text\ndown 10 10").unwrap();
    let mut core = EngineCore::new();
    let summary = replay(&mut core, &steps);

    assert_eq!(summary, ReplaySummary::default());
    assert!(core.doc.is_empty());
}

#[test]
fn replay_single_click_brush_creates_nothing() {
    let steps = parse("tool brush\ndown 5 5\nup").unwrap();
    let mut core = EngineCore::new();
    assert_eq!(replay(&mut core, &steps).created, 0);
    assert!(core.doc.is_empty());
}

#[test]
fn replay_uses_core_config_color() {
    let steps = parse("tool line\ndown 0 0\nmove 1 1\nup").unwrap();
    let mut core = EngineCore::with_config(EngineConfig { color: "#f00".to_owned(), ..EngineConfig::default() });
    replay(&mut core, &steps);
    assert_eq!(core.doc.elements()[0].color, "#f00");
}
