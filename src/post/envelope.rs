//! Fixed startup/shutdown blocks wrapped around every posted program

use super::GCodeOutput;

pub const START_MARKER: &str = "START";
pub const TAPE_MARKER: &str = "%";

/// Spindle clamp, home U, home W, optional stop
pub const STARTUP_CODES: [&str; 4] = ["N01G50S2000", "N02G28U0", "N03G28W0", "N04M00"];

/// Spindle stop, home and clamp, end of program
pub const SHUTDOWN_CODES: [&str; 3] = ["M05S1500", "G28U0W0M40", "M99"];

/// Wrap an assembled body in the startup and shutdown blocks
pub fn wrap(program_number: &str, body: Vec<String>) -> GCodeOutput {
    let mut output = GCodeOutput::new();

    output.emit(START_MARKER);
    output.emit(TAPE_MARKER);
    output.emit(program_number);
    output.emit_all(STARTUP_CODES);
    output.emit("");

    output.emit_all(body);

    output.emit("");
    output.emit_all(SHUTDOWN_CODES);
    output.emit(TAPE_MARKER);

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_wrap() {
        let output = wrap("O0042", vec!["G01X1.".to_string()]);
        assert_eq!(
            output.lines,
            vec![
                "START",
                "%",
                "O0042",
                "N01G50S2000",
                "N02G28U0",
                "N03G28W0",
                "N04M00",
                "",
                "G01X1.",
                "",
                "M05S1500",
                "G28U0W0M40",
                "M99",
                "%",
            ]
        );
    }

    #[test]
    fn test_wrap_empty_body() {
        let output = wrap("O0000", Vec::new());
        assert_eq!(output.len(), 13);
        assert_eq!(output.lines[2], "O0000");
        assert_eq!(output.lines[8], "");
    }
}
