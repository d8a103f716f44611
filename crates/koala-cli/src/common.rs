use koala_syntax::error::{Error, ErrorKind, Fault};
use owo_colors::OwoColorize;

/// Prints `err` to stderr with a source excerpt and a hint when one applies.
pub fn render_error(source: &str, err: &Error) {
    eprintln!("{}: {}", err.kind.to_string().red().bold(), err.msg.red());
    if let (Some(line), Some(col)) = (err.line, err.col) {
        eprintln!("  --> line {}, column {}", line, col);
        if let Some(src_line) = source.lines().nth(line.saturating_sub(1)) {
            let line_num_str = format!("{:3} | ", line);
            eprintln!("     |");
            eprintln!("{}{}", line_num_str.bright_black(), src_line);

            let mut marker = " ".repeat(line_num_str.len() + col.saturating_sub(1));
            marker.push('^');
            eprintln!("{}{}", marker.red(), " error here".red());
            eprintln!("     |");
        }
    }
    provide_error_suggestions(err);
}

pub fn provide_error_suggestions(err: &Error) {
    if let Some((help, example)) = suggestion(err) {
        eprintln!("{}", format!("Help: {}", help).yellow());
        if let Some(example) = example {
            eprintln!("    {}", example.bright_black());
        }
    }
}

/// A hint and an optional example for the error, if we have one.
pub fn suggestion(err: &Error) -> Option<(&'static str, Option<&'static str>)> {
    let msg = err.msg.as_str();
    let hint = match err.kind {
        ErrorKind::Lex if msg.contains("Unterminated string") => {
            ("String is missing its closing quote.", Some("give(\"hello\");"))
        }
        ErrorKind::Lex => ("Only letters, digits, quotes, operators and ( ) { } [ ] , ; are allowed.", None),
        ErrorKind::Parse if msg.contains("';'") => ("Every simple statement ends with ';'.", Some("x = 1;")),
        ErrorKind::Parse => ("Syntax error detected. Check parentheses and braces are balanced.", None),
        ErrorKind::Compile if msg.contains("'return'") => {
            ("'return' can only be used inside a function.", Some("func f() { return 1; }"))
        }
        ErrorKind::Compile => return None,
        ErrorKind::Runtime(fault) => match fault {
            Fault::Undefined if msg.contains("function") => {
                ("Check the function name is spelled correctly and defined with 'func'.", None)
            }
            Fault::Undefined => ("Assign a value before using it.", Some("x = 0;")),
            Fault::Arity => ("Function called with the wrong number of arguments.", None),
            Fault::OutOfBounds => ("Arrays are 0-indexed; use len() to check the size.", Some("this (i < len(a)) give(a[i]);")),
            Fault::InvalidOperands => (
                "Operand kinds do not fit the operator: '+' joins two numbers, two texts or two arrays.",
                None,
            ),
            Fault::Arithmetic if msg.contains("division by zero") => {
                ("You cannot divide by zero. Check the divisor first.", None)
            }
            Fault::Arithmetic => ("The result does not fit in a 64-bit integer.", None),
            Fault::Io => ("The program tried to read with take() but no input was left.", None),
            Fault::Internal => ("Internal VM error. This is likely a compiler bug.", None),
        },
    };
    Some(hint)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_suggestions_follow_the_fault() {
        let err = Error::runtime(Fault::Undefined, "Undefined function 'nope'");
        assert!(suggestion(&err).unwrap().0.contains("func"));

        let err = Error::runtime(Fault::Arithmetic, "division by zero");
        assert!(suggestion(&err).unwrap().0.contains("divide by zero"));

        let err = Error::new(ErrorKind::Compile, "cannot redefine built-in 'len'");
        assert!(suggestion(&err).is_none());
    }
}
