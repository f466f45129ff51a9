use std::fs::File;
use std::io;
use std::io::BufReader;
use std::io::Read;
use std::io::Write;
use std::path::PathBuf;

use loxide as lox;

use clap::Parser as ClapParser;
use clap::Subcommand;

use lox::ast_printer::AstPrinter;
use lox::lox::Lox;
use lox::parser::Parser;
use lox::scanner::Scanner;

#[derive(ClapParser, Debug)]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    commands: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Runs a Lox script to completion
    Run { filename: PathBuf },

    /// Starts an interactive read-evaluate-print loop
    Repl,

    /// Tokenizes the provided input from a given valid filepath
    Tokenize { filename: PathBuf },

    /// Parses the provided input and prints each statement in prefix form
    Parse { filename: PathBuf },
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let args: Cli = Cli::parse();

    match args.commands {
        Commands::Run { filename } => run_file(filename),

        Commands::Repl => run_prompt(),

        Commands::Tokenize { filename } => tokenize(filename),

        Commands::Parse { filename } => parse(filename),
    }
}

fn read_source(filename: &PathBuf) -> anyhow::Result<Vec<u8>> {
    let mut buf: Vec<u8> = Vec::new();
    let mut reader: BufReader<File> = BufReader::new(File::open(filename)?);
    reader.read_to_end(&mut buf)?;

    Ok(buf)
}

fn run_file(filename: PathBuf) -> anyhow::Result<()> {
    let buf: Vec<u8> = read_source(&filename)?;

    let mut stdout = io::stdout();
    let mut lox = Lox::new(&mut stdout);

    lox.run(&buf);

    if lox.had_error() {
        std::process::exit(65);
    }

    if lox.had_runtime_error() {
        std::process::exit(70);
    }

    Ok(())
}

fn run_prompt() -> anyhow::Result<()> {
    let stdin = io::stdin();
    let mut repl_stdout = io::stdout();
    let mut interp_stdout = io::stdout();

    let mut lox = Lox::new(&mut interp_stdout);

    let mut input = String::new();

    loop {
        repl_stdout.write_all(b"> ")?;
        repl_stdout.flush()?;

        input.clear();
        let nbytes: usize = stdin.read_line(&mut input)?;

        if nbytes == 0 {
            break;
        }

        lox.run(input.as_bytes());

        // A single bad line must not end the session.
        lox.clear_errors();
    }

    Ok(())
}

fn tokenize(filename: PathBuf) -> anyhow::Result<()> {
    let buf: Vec<u8> = read_source(&filename)?;

    let scanner: Scanner = Scanner::new(buf);
    let mut tokenized = true;

    for token in scanner {
        match token {
            Ok(token) => println!("{}", token),

            Err(e) => {
                tokenized = false;
                eprintln!("{}", e);
            }
        }
    }

    if !tokenized {
        std::process::exit(65);
    }

    Ok(())
}

fn parse(filename: PathBuf) -> anyhow::Result<()> {
    let buf: Vec<u8> = read_source(&filename)?;

    let mut parser: Parser = Parser::new(Scanner::new(buf), 0);
    let statements = parser.parse();
    let errors = parser.into_errors();

    for error in &errors {
        eprintln!("{}", error);
    }

    for stmt in &statements {
        println!("{}", AstPrinter::print_stmt(stmt));
    }

    if !errors.is_empty() {
        std::process::exit(65);
    }

    Ok(())
}
