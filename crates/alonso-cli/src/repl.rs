use std::io::{self, Write};

use alonso_interpreter::Interpreter;
use owo_colors::OwoColorize;

/// Interactive prompt. State lives in a single interpreter, so bindings
/// persist from line to line; every diagnostic is reported and the loop
/// continues.
pub fn start() {
    println!(
        "{}",
        "Welcome to Alonso - The F1 Programming Language!".bold().green()
    );
    println!("Type 'pit' to exit");

    let mut interpreter = Interpreter::new();

    loop {
        print!("{}", "alonso> ".cyan());
        let _ = io::stdout().flush();

        let mut line = String::new();
        let n = match io::stdin().read_line(&mut line) {
            Ok(n) => n,
            Err(_) => break,
        };
        if n == 0 {
            // EOF
            println!();
            break;
        }

        let line = line.trim();
        if line == "pit" {
            println!("Thanks for racing with Alonso!");
            break;
        }
        if line.is_empty() {
            continue;
        }

        if let Err(e) = interpreter.execute(line) {
            println!("{}: {}", "Error".red().bold(), e.message());
        }
    }
}
