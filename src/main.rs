use std::io::{self, BufRead, Write};

use clap::Parser as ClapParser;
use tally_lang::ExpressionEvaluator;

#[derive(ClapParser)]
#[command(name = "tally")]
#[command(about = "Tally - an expression evaluator with exact big-integer and high-precision decimal arithmetic")]
#[command(version)]
struct Cli {
    /// Expression to evaluate (reads from stdin if not provided)
    expression: Option<String>,

    /// Print the postfix (RPN) token sequence instead of evaluating
    #[arg(long)]
    postfix: bool,
}

fn main() {
    let cli = Cli::parse();
    let mut evaluator = ExpressionEvaluator::new();

    match cli.expression {
        Some(expression) => {
            if !run_line(&mut evaluator, &expression, cli.postfix) {
                std::process::exit(1);
            }
        }
        None => run_repl(&mut evaluator, cli.postfix),
    }
}

/// Evaluates (or reorders) one expression, printing the result or the
/// error. Returns false on failure.
fn run_line(evaluator: &mut ExpressionEvaluator, expression: &str, postfix: bool) -> bool {
    if postfix {
        match evaluator.postfix(expression) {
            Ok(rpn) => {
                let rendered: Vec<String> = rpn.iter().map(|t| t.to_string()).collect();
                println!("{}", rendered.join(" "));
                true
            }
            Err(e) => {
                eprintln!("{}", e);
                false
            }
        }
    } else {
        match evaluator.evaluate(expression) {
            Ok(result) => {
                println!("{}", result);
                true
            }
            Err(e) => {
                eprintln!("{}", e);
                false
            }
        }
    }
}

/// Read-eval-print loop. One evaluator instance lives for the whole
/// session, so variables and result(n) work across lines.
fn run_repl(evaluator: &mut ExpressionEvaluator, postfix: bool) {
    let interactive = atty::is(atty::Stream::Stdin);
    let stdin = io::stdin();

    loop {
        if interactive {
            print!("> ");
            let _ = io::stdout().flush();
        }

        let mut line = String::new();
        match stdin.lock().read_line(&mut line) {
            Ok(0) | Err(_) => break,
            Ok(_) => {}
        }

        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        run_line(evaluator, line, postfix);
    }
}
