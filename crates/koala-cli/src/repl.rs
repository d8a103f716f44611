use std::io::{self, Write};

use koala_bytecode::Program;
use koala_cli::common::render_error;
use koala_cli::compile_source;
use koala_compiler::Compiler;
use koala_lexer::Lexer;
use koala_syntax::token::TokenKind;
use koala_vm::Vm;
use owo_colors::OwoColorize;

pub fn start_repl() {
    println!("{}", "KoalaCode REPL. End statements with ';' or '}'. Type :help for help, :quit to exit.".bold().green());

    let mut compiler = Compiler::new();
    let mut vm = Vm::new();
    let mut last: Option<Program> = None;

    let mut buffer = String::new();
    loop {
        let prompt = if buffer.is_empty() { "koala> ".cyan().to_string() } else { "...   ".cyan().to_string() };
        print!("{}", prompt);
        let _ = io::stdout().flush();

        let mut line = String::new();
        let n = match io::stdin().read_line(&mut line) {
            Ok(n) => n,
            Err(_) => {
                println!("<input error>");
                break;
            }
        };
        if n == 0 {
            println!("\nGoodbye.");
            break;
        }
        let trimmed = line.trim_end();

        if buffer.is_empty() && trimmed.starts_with(':') {
            match trimmed {
                ":quit" | ":q" | ":exit" => {
                    println!("Goodbye.");
                    break;
                }
                ":help" | ":h" => print_help(),
                ":vars" => print_vars(&vm),
                ":funcs" => print_funcs(&compiler),
                ":dump" => match &last {
                    Some(program) => print!("{}", program.disassemble()),
                    None => println!("{}", "<nothing compiled yet>".dimmed()),
                },
                ":reset" => {
                    compiler.reset();
                    vm.reset();
                    last = None;
                    println!("{}", "State reset.".yellow());
                }
                _ => println!("{}", "Unknown command. Type :help.".red()),
            }
            continue;
        }

        buffer.push_str(&line);
        if !is_complete(&buffer) {
            continue;
        }

        match compile_source(&mut compiler, &buffer) {
            Ok(program) => {
                if let Err(e) = vm.run(&program) {
                    render_error(&buffer, &e);
                }
                last = Some(program);
            }
            Err(e) => render_error(&buffer, &e),
        }
        buffer.clear();
    }
}

fn print_help() {
    println!("{}", "Commands:".bold());
    println!("  {}   {}", ":help".yellow(), "Show this help");
    println!("  {}   {}", ":quit".yellow(), "Exit the REPL");
    println!("  {}   {}", ":vars".yellow(), "List top-level variables");
    println!("  {}  {}", ":funcs".yellow(), "List defined functions");
    println!("  {}   {}", ":dump".yellow(), "Show bytecode of the last input");
    println!("  {}  {}", ":reset".yellow(), "Forget all variables and functions");
    println!("Input runs once braces balance and it ends with ';' or '}}'.");
}

fn print_vars(vm: &Vm) {
    let vars = vm.globals_snapshot();
    if vars.is_empty() {
        println!("{}", "<no vars>".dimmed());
        return;
    }
    for (k, v) in vars {
        println!("{} = {}", k.yellow(), v.to_string().bright_blue());
    }
}

fn print_funcs(compiler: &Compiler) {
    let names = compiler.function_names();
    if names.is_empty() {
        println!("{}", "<no functions>".dimmed());
        return;
    }
    for n in names {
        println!("{}", n.yellow());
    }
}

/// True once the buffer can be handed to the parser: brackets balance and the
/// last token closes a statement.
fn is_complete(input: &str) -> bool {
    let tokens = match Lexer::new(input).tokenize() {
        Ok(t) => t,
        // an open string literal may continue on the next line
        Err(e) => return !e.msg.contains("Unterminated string"),
    };
    let mut depth = 0i32;
    let mut last = None;
    for tk in tokens.iter() {
        match &tk.kind {
            TokenKind::LParen | TokenKind::LBrace | TokenKind::LBracket => depth += 1,
            TokenKind::RParen | TokenKind::RBrace | TokenKind::RBracket => depth -= 1,
            TokenKind::Eof => continue,
            _ => {}
        }
        last = Some(&tk.kind);
    }
    depth <= 0 && matches!(last, Some(TokenKind::Semi) | Some(TokenKind::RBrace))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_complete() {
        assert!(is_complete("give(1);\n"));
        assert!(is_complete("func f(x) {\n return x;\n}\n"));
        assert!(!is_complete("func f(x) {\n"));
        assert!(!is_complete("func f(x) {\n return x;\n"));
        assert!(!is_complete("x = 1\n"));
        assert!(!is_complete("give(\"open\n"));
        assert!(!is_complete(""));
    }

    #[test]
    fn test_lex_errors_are_submitted() {
        assert!(is_complete("give(1 @ 2);\n"));
    }
}
