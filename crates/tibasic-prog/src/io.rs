//! The interpreter's host I/O capability.
//!
//! Every statement that touches the screen, keyboard, or drawing layer
//! goes through this trait; the interpreter itself never does I/O.
//! Implementations may block (the interpreter is driven on whatever
//! thread the embedder chooses).

/// Host capabilities the interpreter suspends on.
pub trait HostIo {
    fn display(&mut self, text: &str);
    fn output(&mut self, row: i64, col: i64, text: &str);
    /// Read one line of input, optionally under a prompt.
    fn input(&mut self, prompt: Option<&str>) -> String;
    fn pause(&mut self, text: Option<&str>);
    fn get_key(&mut self) -> i64;
    fn clear_home(&mut self);
    /// Present a menu; the returned string is the chosen Goto target.
    fn show_menu(&mut self, title: &str, options: &[(String, String)]) -> String;
    fn draw_line(&mut self, x1: f64, y1: f64, x2: f64, y2: f64);
    fn draw_circle(&mut self, x: f64, y: f64, r: f64);
    fn draw_text(&mut self, row: i64, col: i64, text: &str);
    fn plot_point(&mut self, x: f64, y: f64, on: bool);
    fn clear_draw(&mut self);
}

/// No-op collaborator: every operation does nothing and returns the
/// documented defaults (`"0"`, key 0, empty menu target).
#[derive(Default)]
pub struct SilentIo;

impl HostIo for SilentIo {
    fn display(&mut self, _text: &str) {}

    fn output(&mut self, _row: i64, _col: i64, _text: &str) {}

    fn input(&mut self, _prompt: Option<&str>) -> String {
        "0".to_string()
    }

    fn pause(&mut self, _text: Option<&str>) {}

    fn get_key(&mut self) -> i64 {
        0
    }

    fn clear_home(&mut self) {}

    fn show_menu(&mut self, _title: &str, _options: &[(String, String)]) -> String {
        String::new()
    }

    fn draw_line(&mut self, _x1: f64, _y1: f64, _x2: f64, _y2: f64) {}

    fn draw_circle(&mut self, _x: f64, _y: f64, _r: f64) {}

    fn draw_text(&mut self, _row: i64, _col: i64, _text: &str) {}

    fn plot_point(&mut self, _x: f64, _y: f64, _on: bool) {}

    fn clear_draw(&mut self) {}
}
