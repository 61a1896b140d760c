//! Program execution end to end: control flow, subroutines, I/O, and
//! cancellation.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tibasic::{run_program, ErrorKind, HostIo, Interpreter, SilentIo, State, Value};

/// Recording collaborator for the I/O statements.
#[derive(Default)]
struct RecordingIo {
    lines: Vec<String>,
    inputs: Vec<String>,
    menu_choice: String,
}

impl HostIo for RecordingIo {
    fn display(&mut self, text: &str) {
        self.lines.push(text.to_string());
    }

    fn output(&mut self, row: i64, col: i64, text: &str) {
        self.lines.push(format!("@{row},{col} {text}"));
    }

    fn input(&mut self, _prompt: Option<&str>) -> String {
        if self.inputs.is_empty() {
            "0".into()
        } else {
            self.inputs.remove(0)
        }
    }

    fn pause(&mut self, _text: Option<&str>) {}

    fn get_key(&mut self) -> i64 {
        0
    }

    fn clear_home(&mut self) {
        self.lines.push("<clear>".into());
    }

    fn show_menu(&mut self, _title: &str, _options: &[(String, String)]) -> String {
        self.menu_choice.clone()
    }

    fn draw_line(&mut self, _x1: f64, _y1: f64, _x2: f64, _y2: f64) {}

    fn draw_circle(&mut self, _x: f64, _y: f64, _r: f64) {}

    fn draw_text(&mut self, _row: i64, _col: i64, _text: &str) {}

    fn plot_point(&mut self, _x: f64, _y: f64, _on: bool) {}

    fn clear_draw(&mut self) {}
}

fn var(state: &State, name: char) -> f64 {
    state.var(name).as_real().unwrap()
}

#[test]
fn for_loop_end_state() {
    let mut state = State::new();
    run_program(&mut state, "For(I,1,5):I→A:End").unwrap();
    assert_eq!(var(&state, 'A'), 5.0);
    assert_eq!(var(&state, 'I'), 6.0);
}

#[test]
fn for_loop_executes_floor_count_plus_one_times() {
    // start=a, end=b, step=d: floor((b-a)/d)+1 passes, exit at
    // a + (count)*d.
    let cases: [(f64, f64, f64); 6] = [
        (1.0, 5.0, 1.0),
        (0.0, 10.0, 2.0),
        (0.0, 9.0, 2.0),
        (5.0, 1.0, -1.0),
        (1.0, 1.0, 1.0),
        (0.0, 1.0, 0.25),
    ];
    for (a, b, d) in cases {
        let mut state = State::new();
        let src = format!(
            "0→N:For(I,{a},{b},{d}):N+1→N:End",
            a = a,
            b = b,
            d = format!("{d}").replace('-', "⁻"),
        );
        run_program(&mut state, &src).unwrap();
        let count = ((b - a) / d).floor() + 1.0;
        assert_eq!(var(&state, 'N'), count, "count for {src}");
        assert_eq!(var(&state, 'I'), a + count * d, "exit value for {src}");
    }
}

#[test]
fn while_and_repeat() {
    let mut state = State::new();
    run_program(&mut state, "1→A:While A<100:2A→A:End").unwrap();
    assert_eq!(var(&state, 'A'), 128.0);

    run_program(&mut state, "0→B:Repeat B>4:B+2→B:End").unwrap();
    assert_eq!(var(&state, 'B'), 6.0);
}

#[test]
fn if_without_else() {
    let mut state = State::new();
    run_program(&mut state, "5→A:If A>3:Then:1→B:End:2→C").unwrap();
    assert_eq!(var(&state, 'B'), 1.0);
    assert_eq!(var(&state, 'C'), 2.0);

    run_program(&mut state, "1→A:If A>3:Then:9→B:End:3→C").unwrap();
    assert_eq!(var(&state, 'B'), 1.0);
    assert_eq!(var(&state, 'C'), 3.0);
}

#[test]
fn goto_skips_structure() {
    let mut state = State::new();
    run_program(&mut state, "Goto 9:99→A:Lbl 9:1→A").unwrap();
    assert_eq!(var(&state, 'A'), 1.0);
}

#[test]
fn label_not_found() {
    let mut state = State::new();
    let err = run_program(&mut state, "Goto Q").unwrap_err();
    assert_eq!(err.kind, ErrorKind::LabelNotFound("Q".into()));
}

#[test]
fn expression_statements_update_ans() {
    let mut state = State::new();
    run_program(&mut state, "2+2:Ans*10").unwrap();
    assert_eq!(state.ans(), &Value::Real(40.0));
}

#[test]
fn subroutine_call_restores_flow() {
    let mut state = State::new();
    state.set_program("DOUBLE", "2A→A");
    run_program(&mut state, "3→A:prgmDOUBLE:prgmDOUBLE:A→B").unwrap();
    assert_eq!(var(&state, 'B'), 12.0);
}

#[test]
fn run_named_program() {
    let mut state = State::new();
    state.set_program("SQUARES", "{1,2,3}→L1:L1*L1→L1");
    let mut io = SilentIo;
    Interpreter::new(&mut state, &mut io)
        .run_named("SQUARES")
        .unwrap();
    assert_eq!(state.list("L1").unwrap(), vec![1.0, 4.0, 9.0]);
}

#[test]
fn missing_subroutine_is_undefined() {
    let mut state = State::new();
    let err = run_program(&mut state, "prgmGHOST").unwrap_err();
    assert_eq!(err.kind, ErrorKind::Undefined);
}

#[test]
fn display_and_menu_io() {
    let mut state = State::new();
    let mut io = RecordingIo {
        menu_choice: "B".into(),
        ..Default::default()
    };
    let src = "Disp \"START\":Menu(\"GO\",\"LEFT\",A,\"RIGHT\",B)\nLbl A:Disp \"L\":Stop\nLbl B:Disp \"R\"";
    Interpreter::new(&mut state, &mut io).run(src).unwrap();
    assert_eq!(io.lines, vec!["START", "R"]);
}

#[test]
fn input_drives_state() {
    let mut state = State::new();
    let mut io = RecordingIo {
        inputs: vec!["3+4".into()],
        ..Default::default()
    };
    Interpreter::new(&mut state, &mut io)
        .run("Input \"VAL?\",A:Disp A")
        .unwrap();
    assert_eq!(var(&state, 'A'), 7.0);
    assert_eq!(io.lines, vec!["7"]);
}

#[test]
fn cancellation_after_two_statements() {
    let mut state = State::new();
    let mut io = SilentIo;
    let cancel = Arc::new(AtomicBool::new(false));

    // The flag flips after the second statement finishes; the loop in
    // the program would otherwise never end.
    let flag = cancel.clone();
    let handle = std::thread::spawn(move || {
        std::thread::sleep(std::time::Duration::from_millis(30));
        flag.store(true, Ordering::Relaxed);
    });

    let mut interp = Interpreter::with_cancel(&mut state, &mut io, cancel);
    let err = interp.run("Lbl 1:1→A:Goto 1").unwrap_err();
    handle.join().unwrap();
    assert_eq!(err.kind, ErrorKind::Break);
    assert_eq!(var(&state, 'A'), 1.0);
}

#[test]
fn stored_slot_survives_for_plotting() {
    let mut state = State::new();
    run_program(&mut state, "\"3X+1\"→Y1:Y1(2)→A").unwrap();
    assert_eq!(var(&state, 'A'), 7.0);
    assert_eq!(state.slot_text(1).unwrap(), "3X+1");
}

#[test]
fn program_error_surfaces_to_caller() {
    let mut state = State::new();
    let err = run_program(&mut state, "1→A:{1,2}+{1}:9→A").unwrap_err();
    assert_eq!(err.kind, ErrorKind::DimMismatch);
    assert_eq!(var(&state, 'A'), 1.0);
}
