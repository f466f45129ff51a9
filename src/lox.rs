//! API to control the interpreter.
//!
//! A [`Lox`] value is one interpreter session: it owns the evaluator, the
//! `had_error` / `had_runtime_error` flags and the expression-id counter.
//! All of that is per-session state, so several interpreters can coexist in
//! one process.

use std::io::Write;

use crate::error::LoxError;
use crate::expr::ExprId;
use crate::interpreter::Interpreter;
use crate::parser::Parser;
use crate::resolver::Resolver;
use crate::scanner::Scanner;
use crate::stmt::Stmt;

/// Tree-walk interpreter session.
///
/// # Example
///
/// Run the interpreter once to define a function, then again to call it
/// (the global environment persists across runs, which is what makes the
/// REPL useful):
///
/// ```
/// # use loxide::lox::Lox;
///
/// let mut output: Vec<u8> = Vec::new();
/// let mut lox = Lox::new(&mut output);
///
/// let func_def = r#"
///     fun max(x, y) {
///         if (x > y) {
///             return x;
///         } else {
///             return y;
///         }
///     }
/// "#;
/// lox.run(func_def.as_bytes());
///
/// lox.run("print max(10, 20);".as_bytes());
/// lox.run("print max(5, 4);".as_bytes());
///
/// assert!(!lox.had_error());
/// assert_eq!(output, b"20\n5\n");
/// ```
pub struct Lox<'out, W: Write> {
    interpreter: Interpreter<'out, W>,
    next_expr_id: ExprId,
    had_error: bool,
    had_runtime_error: bool,
}

impl<'out, W: Write> Lox<'out, W> {
    pub fn new(output: &'out mut W) -> Self {
        Lox {
            interpreter: Interpreter::new(output),
            next_expr_id: 0,
            had_error: false,
            had_runtime_error: false,
        }
    }

    /// Run one chunk of source: scan, parse, resolve, evaluate.
    ///
    /// Each stage gates the next: parse (and scan) errors skip resolution,
    /// resolution errors skip evaluation, and a runtime error aborts the
    /// rest of the statement list.  Diagnostics go to stderr; program
    /// output goes to the session's writer.
    pub fn run(&mut self, source: &[u8]) {
        let scanner: Scanner = Scanner::new(source.to_vec());

        // The id counter carries over so ids stay unique across REPL
        // lines; stale side-table entries from earlier closures must not
        // be clobbered.
        let mut parser: Parser = Parser::new(scanner, self.next_expr_id);
        let statements: Vec<Stmt> = parser.parse();
        self.next_expr_id = parser.next_expr_id();

        let parse_errors: Vec<LoxError> = parser.into_errors();

        if !parse_errors.is_empty() {
            self.report(&parse_errors);
            self.had_error = true;
            return;
        }

        let resolve_errors: Vec<LoxError> =
            Resolver::new(&mut self.interpreter).resolve(&statements);

        if !resolve_errors.is_empty() {
            self.report(&resolve_errors);
            self.had_error = true;
            return;
        }

        if let Err(error) = self.interpreter.interpret(&statements) {
            eprintln!("{}", error);
            self.had_runtime_error = true;
        }
    }

    pub fn had_error(&self) -> bool {
        self.had_error
    }

    pub fn had_runtime_error(&self) -> bool {
        self.had_runtime_error
    }

    /// Forget previous failures.  The REPL calls this between lines so one
    /// bad input doesn't poison the session.
    pub fn clear_errors(&mut self) {
        self.had_error = false;
        self.had_runtime_error = false;
    }

    fn report(&self, errors: &[LoxError]) {
        for error in errors {
            eprintln!("{}", error);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run_source(source: &str) -> (String, bool, bool) {
        let mut out: Vec<u8> = Vec::new();
        let mut lox = Lox::new(&mut out);

        lox.run(source.as_bytes());

        let had_error = lox.had_error();
        let had_runtime_error = lox.had_runtime_error();

        (
            String::from_utf8(out).expect("output is valid UTF-8"),
            had_error,
            had_runtime_error,
        )
    }

    #[test]
    fn print_expr() {
        assert_eq!(run_source("print 3 * 2;"), ("6\n".to_string(), false, false));
    }

    #[test]
    fn parse_error_sets_flag_and_skips_evaluation() {
        let (output, had_error, had_runtime_error) = run_source("print 1; print ;");

        assert_eq!(output, "");
        assert!(had_error);
        assert!(!had_runtime_error);
    }

    #[test]
    fn resolve_error_sets_flag_and_skips_evaluation() {
        let (output, had_error, had_runtime_error) = run_source("print 1; return 2;");

        assert_eq!(output, "");
        assert!(had_error);
        assert!(!had_runtime_error);
    }

    #[test]
    fn runtime_error_aborts_mid_list() {
        let (output, had_error, had_runtime_error) =
            run_source("print 1; print missing; print 2;");

        // Output up to the failing statement survives.
        assert_eq!(output, "1\n");
        assert!(!had_error);
        assert!(had_runtime_error);
    }

    #[test]
    fn definitions_persist_across_runs() {
        let mut out: Vec<u8> = Vec::new();
        let mut lox = Lox::new(&mut out);

        lox.run(b"var counter = 0;");
        lox.run(b"counter = counter + 1;");
        lox.run(b"print counter;");

        assert!(!lox.had_error());
        assert_eq!(out, b"1\n");
    }

    #[test]
    fn closures_keep_working_on_later_runs() {
        let mut out: Vec<u8> = Vec::new();
        let mut lox = Lox::new(&mut out);

        lox.run(b"fun make() { var n = 0; fun inc() { n = n + 1; print n; } return inc; } var bump = make();");
        lox.run(b"bump(); bump();");

        assert!(!lox.had_error());
        assert_eq!(out, b"1\n2\n");
    }

    #[test]
    fn clear_errors_resets_both_flags() {
        let mut out: Vec<u8> = Vec::new();
        let mut lox = Lox::new(&mut out);

        lox.run(b"print ;");
        assert!(lox.had_error());

        lox.clear_errors();
        assert!(!lox.had_error());
        assert!(!lox.had_runtime_error());

        lox.run(b"print 42;");
        assert!(!lox.had_error());
    }
}
