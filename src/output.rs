use serde::Serialize;
use std::io::{self, Write};

use table_state::{BoardPhase, HandPhase};

/// Read-only snapshot of the tracker after a tick. Rendering is the
/// caller's concern; this is also what an embedding process would
/// serialize.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackerStatus {
    pub fps: f64,
    pub hand_phase: HandPhase,
    pub hole_cards: Vec<String>,
    pub board_phase: BoardPhase,
    pub board_cards: Vec<String>,
}

/// In-place terminal status block, redrawn every tick with ANSI cursor
/// movement.
pub struct StatusRenderer {
    drawn: bool,
}

const LEFT_WIDTH: usize = 20;
const RIGHT_WIDTH: usize = 35;

impl StatusRenderer {
    pub fn new() -> Self {
        Self { drawn: false }
    }

    pub fn render(&mut self, status: &TrackerStatus) {
        const UP: &str = "\x1B[6A";
        const CLEAR_LINE: &str = "\x1B[0K";
        const HIDE_CURSOR: &str = "\x1B[?25l";

        let lines = [
            format!("{:-^width$}", " Texas Hold'em Tracker ", width = LEFT_WIDTH + RIGHT_WIDTH),
            status_line("FPS", &format!("{:.1}", status.fps)),
            status_line("Hand state", &status.hand_phase.to_string()),
            status_line("Hole cards", &status.hole_cards.join(" ")),
            status_line("Board state", &status.board_phase.to_string()),
            status_line("Community cards", &status.board_cards.join(" ")),
        ];

        let mut out = io::stdout().lock();
        let _ = write!(out, "{HIDE_CURSOR}");
        if self.drawn {
            let _ = write!(out, "{UP}");
        }
        self.drawn = true;
        for line in lines {
            let _ = writeln!(out, "{line}{CLEAR_LINE}");
        }
        let _ = out.flush();
    }
}

impl Default for StatusRenderer {
    fn default() -> Self {
        Self::new()
    }
}

fn status_line(label: &str, value: &str) -> String {
    format!("{:.<LEFT_WIDTH$}{:>RIGHT_WIDTH$}", label, value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_serializes_camel_case() {
        let status = TrackerStatus {
            fps: 9.5,
            hand_phase: HandPhase::Playing,
            hole_cards: vec!["As".to_string(), "Kd".to_string()],
            board_phase: BoardPhase::Flop,
            board_cards: vec!["2c".to_string(), "7h".to_string(), "Td".to_string()],
        };
        let json = serde_json::to_string(&status).unwrap();
        assert!(json.contains(r#""handPhase":"playing""#));
        assert!(json.contains(r#""boardPhase":"flop""#));
        assert!(json.contains(r#""holeCards":["As","Kd"]"#));
    }

    #[test]
    fn test_status_line_widths() {
        let line = status_line("FPS", "12.0");
        assert_eq!(line.len(), LEFT_WIDTH + RIGHT_WIDTH);
        assert!(line.starts_with("FPS..."));
        assert!(line.ends_with("12.0"));
    }
}
