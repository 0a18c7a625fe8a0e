use plotkit_post::{
    merge_streams, InkPolicy, MacroContext, MacroSet, MergeParams, PassParams, PlotterProfile,
    PostError, BOUNDARY_ANNOTATION,
};

fn profile() -> PlotterProfile {
    PlotterProfile {
        pen_up_z: 0.0,
        pen_down_z: 8.0,
        default_feedrate: 1000.0,
    }
}

fn macros() -> MacroSet {
    let mut context = MacroContext::new();
    context.set("pen_up_z", 0.0);
    context.set("pen_down_z", 8.0);
    context.set("safe_z", 1.0);
    context.set("ink_x", 10.0);
    context.set("ink_y", -10.0);
    context.set("paper_x", 0.0);
    context.set("paper_y", 0.0);
    MacroSet {
        ink: vec![
            "G0 Z{pen_up_z}".to_string(),
            "G0 X{ink_x} Y{ink_y}".to_string(),
            "G1 Z{pen_down_z}".to_string(),
            "G4 P0.5".to_string(),
            "G0 Z{pen_up_z}".to_string(),
        ],
        paper: vec![
            "G0 Z{pen_up_z}".to_string(),
            "G0 X{paper_x} Y{paper_y}".to_string(),
            "G4 P1.0".to_string(),
        ],
        context,
    }
}

/// A stream of `n` strokes, one draw move each.
fn stream_with_draw_moves(n: usize) -> Vec<String> {
    let mut lines = Vec::new();
    for index in 0..n {
        lines.push(format!("G0 X{} Y{}", index, index));
        lines.push("G1 Z8".to_string());
        lines.push(format!("G1 X{} Y{}", index + 1, index));
        lines.push("G0 Z0".to_string());
    }
    lines
}

fn params(writing_interval: u32, drawing_interval: u32, insert_every_n_ink: u32) -> MergeParams {
    MergeParams {
        profile: profile(),
        macros: macros(),
        writing: PassParams {
            policy: InkPolicy::Stroke {
                interval: writing_interval,
            },
            insert_every_n_ink,
        },
        drawing: PassParams {
            policy: InkPolicy::Stroke {
                interval: drawing_interval,
            },
            insert_every_n_ink,
        },
    }
}

fn count_occurrences(lines: &[String], needle: &str) -> usize {
    lines.iter().filter(|line| line.contains(needle)).count()
}

#[test]
fn test_end_to_end_merge_scenario() {
    // Writing: stroke interval 80, exactly 80 draw moves, cadence 5.
    // Drawing: stroke interval 200, exactly 200 draw moves.
    let writing = stream_with_draw_moves(80);
    let drawing = stream_with_draw_moves(200);
    let output = merge_streams(&writing, &drawing, &params(80, 200, 5)).unwrap();

    // Writing pass: one ink macro at move 80, no cadence paper (1 % 5 != 0).
    assert_eq!(output.summary.writing.ink_insertions, 1);
    assert_eq!(output.summary.writing.paper_insertions, 0);
    assert_eq!(output.summary.writing.draw_moves, 80);

    // Drawing pass: counters restarted, one ink macro at move 200.
    assert_eq!(output.summary.drawing.ink_insertions, 1);
    assert_eq!(output.summary.drawing.paper_insertions, 0);
    assert_eq!(output.summary.drawing.draw_moves, 200);

    // Exactly one mandatory boundary paper macro.
    assert_eq!(output.summary.boundary_paper_insertions, 1);
    assert_eq!(count_occurrences(&output.lines, BOUNDARY_ANNOTATION), 1);

    assert_eq!(output.summary.ink_insertions(), 2);
    assert_eq!(output.summary.paper_insertions(), 1);
    assert_eq!(output.summary.total_lines, output.lines.len());
}

#[test]
fn test_boundary_macro_follows_writing_output() {
    let writing = stream_with_draw_moves(2);
    let drawing = stream_with_draw_moves(2);
    let output = merge_streams(&writing, &drawing, &params(10, 10, 0)).unwrap();

    let boundary_at = output
        .lines
        .iter()
        .position(|line| line.contains(BOUNDARY_ANNOTATION))
        .expect("boundary annotation missing");
    // The writing stream ends pen-up, so the boundary starts with its
    // annotation directly after the last writing line.
    assert_eq!(output.lines[boundary_at - 1], "G0 Z0");
    assert_eq!(output.lines[boundary_at + 1], "G0 Z0");
    assert_eq!(output.lines[boundary_at + 2], "G0 X0 Y0");
    assert_eq!(output.lines[boundary_at + 3], "G4 P1.0");
}

#[test]
fn test_boundary_fires_even_when_cadence_just_fired() {
    // Writing: interval 1 with cadence 1 -> the last ink insertion already
    // triggered a cadence paper macro at the very end of the stream. The
    // boundary macro must still fire once more.
    let writing = stream_with_draw_moves(1);
    let drawing = stream_with_draw_moves(1);
    let output = merge_streams(&writing, &drawing, &params(1, 10, 1)).unwrap();

    assert_eq!(output.summary.writing.paper_insertions, 1);
    assert_eq!(output.summary.boundary_paper_insertions, 1);
    assert_eq!(output.summary.paper_insertions(), 2);
    assert_eq!(count_occurrences(&output.lines, "paper change"), 2);
}

#[test]
fn test_ink_numbering_restarts_in_drawing_pass() {
    let writing = stream_with_draw_moves(2);
    let drawing = stream_with_draw_moves(2);
    let output = merge_streams(&writing, &drawing, &params(1, 1, 0)).unwrap();

    assert_eq!(output.summary.writing.ink_insertions, 2);
    assert_eq!(output.summary.drawing.ink_insertions, 2);
    // "#1" appears once per pass: the drawing pass starts from zero again.
    assert_eq!(count_occurrences(&output.lines, "ink change #1"), 2);
}

#[test]
fn test_marker_writing_with_stroke_drawing() {
    let marker = ";#AUTO_INK#";
    let mut writing = stream_with_draw_moves(3);
    writing.insert(0, marker.to_string());
    let drawing = stream_with_draw_moves(4);

    let mut params = params(1, 2, 0);
    params.writing.policy = InkPolicy::Marker {
        token: marker.to_string(),
    };
    let output = merge_streams(&writing, &drawing, &params).unwrap();

    assert_eq!(output.summary.writing.ink_insertions, 1);
    assert!(!output.lines.iter().any(|line| line.trim() == marker));
    assert_eq!(output.summary.drawing.ink_insertions, 2);
}

#[test]
fn test_empty_paper_macro_is_fatal_for_merge() {
    let mut params = params(10, 10, 0);
    params.macros.paper.clear();

    let writing = stream_with_draw_moves(1);
    let drawing = stream_with_draw_moves(1);
    let err = merge_streams(&writing, &drawing, &params).unwrap_err();
    assert!(matches!(err, PostError::EmptyMacro("paper_macro")));
}

#[test]
fn test_merge_validates_before_any_output() {
    // A bad drawing policy must fail the whole merge up front.
    let mut params = params(10, 10, 0);
    params.drawing.policy = InkPolicy::Stroke { interval: 0 };

    let writing = stream_with_draw_moves(1);
    let drawing = stream_with_draw_moves(1);
    let err = merge_streams(&writing, &drawing, &params).unwrap_err();
    assert!(matches!(err, PostError::InvalidStrokeInterval));
}
