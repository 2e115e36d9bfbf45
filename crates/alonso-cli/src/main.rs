mod repl;

use std::fs;

use alonso_interpreter::Interpreter;
use alonso_lexer::Lexer;
use alonso_syntax::error::Error;
use alonso_syntax::token::TokenKind;
use owo_colors::OwoColorize;

fn render_error(kind: &str, err: &Error) {
    println!("{}: {}", kind.red().bold(), err.message());
}

/// Tokenize a fixed probe string and dump the stream, one token per line.
fn debug_lexer() {
    let mut lexer = Lexer::new("x = 5");
    loop {
        let token = lexer.next_token();
        println!("Token: {}, Value: '{}'", token.kind, token.lexeme);
        if token.kind == TokenKind::Eof {
            break;
        }
    }
}

fn run_file(path: &str) {
    if !path.ends_with(".alo") {
        println!("Error: Alonso files must have .alo extension");
        std::process::exit(1);
    }
    let src = match fs::read_to_string(path) {
        Ok(s) => s,
        Err(e) => {
            println!("Error reading file: {}", e);
            std::process::exit(1);
        }
    };
    let mut interpreter = Interpreter::new();
    if let Err(e) = interpreter.execute(&src) {
        render_error("Runtime error", &e);
        std::process::exit(1);
    }
}

fn main() {
    let args: Vec<String> = std::env::args().collect();

    if args.len() > 1 && args[1] == "debug-lexer" {
        debug_lexer();
        return;
    }

    if let Some(path) = args.get(1) {
        run_file(path);
    } else {
        repl::start();
    }
}
