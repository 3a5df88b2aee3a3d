//! CLI entrypoint: `<input>` defaults to `-` (REPL on stdin); `-o` sets the
//! compile-mode object file stem; `--IR` prints the final module to
//! stderr.

use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "fluxc", about = "A small expression-oriented numeric language compiler and REPL")]
struct Cli {
    /// Source file to compile, or '-' for an interactive REPL on stdin.
    #[arg(default_value = "-")]
    input: String,

    /// Object file stem ('.o' is appended if absent). Defaults to the
    /// input file's stem.
    #[arg(short = 'o', long = "output")]
    output: Option<String>,

    /// Print the final IR module to stderr after processing.
    #[arg(short = 'I', long = "IR")]
    print_ir: bool,
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();
    let exit_code = fluxc::run(&cli.input, cli.output.as_deref(), cli.print_ir);
    std::process::exit(exit_code);
}
