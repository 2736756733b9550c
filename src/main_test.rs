use tempfile::TempDir;

use super::*;

const DOC: &str = r##"[
  {"type":"brush","points":[{"x":0,"y":0},{"x":5,"y":5}]},
  {"type":"line","points":[{"x":0,"y":0},{"x":10,"y":10}],"color":"#f00"},
  {"type":"text","text":"hi","x":1,"y":2}
]"##;

fn write(dir: &TempDir, name: &str, contents: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, contents).unwrap();
    path
}

fn output_of(run: impl FnOnce(&mut Vec<u8>) -> Result<(), CliError>) -> String {
    let mut out = Vec::new();
    run(&mut out).unwrap();
    String::from_utf8(out).unwrap()
}

// =============================================================
// inspect
// =============================================================

#[test]
fn inspect_prints_one_line_per_element() {
    let dir = TempDir::new().unwrap();
    let file = write(&dir, "doc.json", DOC);

    let text = output_of(|out| run_inspect(&file, out));
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(
        lines,
        [
            "0\tbrush\t#000\t2 points",
            "1\tline\t#f00\t(0, 0) -> (10, 10)",
            "2\ttext\t#000\t\"hi\" at (1, 2)",
        ]
    );
}

#[test]
fn inspect_empty_document_prints_nothing() {
    let dir = TempDir::new().unwrap();
    let file = write(&dir, "doc.json", "[]");
    assert!(output_of(|out| run_inspect(&file, out)).is_empty());
}

#[test]
fn inspect_rejects_malformed_document() {
    let dir = TempDir::new().unwrap();
    let file = write(&dir, "doc.json", r#"[{"type":"line","points":[]}]"#);
    let err = run_inspect(&file, &mut Vec::new()).unwrap_err();
    assert!(matches!(err, CliError::Document { .. }));
}

#[test]
fn inspect_missing_file_is_read_error() {
    let dir = TempDir::new().unwrap();
    let err = run_inspect(&dir.path().join("absent.json"), &mut Vec::new()).unwrap_err();
    assert!(matches!(err, CliError::Read { .. }));
}

// =============================================================
// hit
// =============================================================

#[test]
fn hit_prints_topmost_index() {
    let dir = TempDir::new().unwrap();
    let file = write(&dir, "doc.json", DOC);
    let config = EngineConfig::default();

    // Brush and line both start at the origin; the line is on top.
    let text = output_of(|out| run_hit(&config, &file, Point::new(0.0, -3.0), out));
    assert_eq!(text, "1\n");
}

#[test]
fn hit_prints_none_on_empty_space() {
    let dir = TempDir::new().unwrap();
    let file = write(&dir, "doc.json", DOC);
    let config = EngineConfig::default();

    let text = output_of(|out| run_hit(&config, &file, Point::new(200.0, 200.0), out));
    assert_eq!(text, "none\n");
}

#[test]
fn hit_uses_configured_tolerance() {
    let dir = TempDir::new().unwrap();
    let file = write(&dir, "doc.json", DOC);
    let tight = EngineConfig { tolerance: 1.0, ..EngineConfig::default() };

    let text = output_of(|out| run_hit(&tight, &file, Point::new(13.0, 10.0), out));
    assert_eq!(text, "none\n");
    let text = output_of(|out| run_hit(&EngineConfig::default(), &file, Point::new(13.0, 10.0), out));
    assert_eq!(text, "1\n");
}

// =============================================================
// replay
// =============================================================

#[test]
fn replay_input_clears_stored_selection_flags() {
    let dir = TempDir::new().unwrap();
    let input = write(
        &dir,
        "in.json",
        r#"[{"type":"line","points":[{"x":0,"y":0},{"x":10,"y":10}],"selected":true}]"#,
    );
    let script = write(&dir, "script.txt", "# nothing to do\n");

    let text = output_of(|out| run_replay(EngineConfig::default(), &script, Some(&input), None, out));
    let elements = persist::decode_document(&text).unwrap();
    assert_eq!(elements.len(), 1);
    assert!(!elements[0].selected);
}

#[test]
fn replay_appends_to_input_and_writes_output_file() {
    let dir = TempDir::new().unwrap();
    let input = write(&dir, "in.json", DOC);
    let script = write(&dir, "script.txt", "tool line\ndown 50 50\nmove 60 60\nup\n");
    let output = dir.path().join("out.json");

    let text = output_of(|out| run_replay(EngineConfig::default(), &script, Some(&input), Some(&output), out));
    assert!(text.is_empty());

    let elements = persist::decode_document(&fs::read_to_string(&output).unwrap()).unwrap();
    assert_eq!(elements.len(), 4);
    assert_eq!(elements[3].kind, ElementKind::Line { a: Point::new(50.0, 50.0), b: Point::new(60.0, 60.0) });
}

#[test]
fn replay_colors_new_elements_from_config() {
    let dir = TempDir::new().unwrap();
    let script = write(&dir, "script.txt", "tool brush\ndown 0 0\nmove 1 1\nup\n");
    let config = EngineConfig { color: "#0a0".to_owned(), ..EngineConfig::default() };

    let text = output_of(|out| run_replay(config, &script, None, None, out));
    let elements = persist::decode_document(&text).unwrap();
    assert_eq!(elements[0].color, "#0a0");
}

#[test]
fn replay_reports_script_errors_with_path() {
    let dir = TempDir::new().unwrap();
    let script = write(&dir, "script.txt", "tool brush\nwiggle\n");

    let err = run_replay(EngineConfig::default(), &script, None, None, &mut Vec::new()).unwrap_err();
    assert!(matches!(err, CliError::Script { .. }));
    assert!(err.to_string().contains("line 2"));
}

#[test]
fn replay_rejects_malformed_input_document() {
    let dir = TempDir::new().unwrap();
    let input = write(&dir, "in.json", "{not json");
    let script = write(&dir, "script.txt", "");

    let err = run_replay(EngineConfig::default(), &script, Some(&input), None, &mut Vec::new()).unwrap_err();
    assert!(matches!(err, CliError::Document { .. }));
}
