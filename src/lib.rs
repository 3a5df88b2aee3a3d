//! Orchestrates the read -> parse -> codegen -> {JIT | emit} loop described
//! by the driver contract: REPL mode on stdin, or compile mode against a
//! source file, retargeting and emitting an object file once the input is
//! exhausted.

pub mod session;

use std::fs::File;
use std::path::{Path, PathBuf};

use session::Session;

/// Runs the driver against `input` (`"-"` for REPL on stdin, a path
/// otherwise), writing an object file named from `output` (or the input's
/// stem) in compile mode. Returns the process exit code: `0` on success,
/// `1` on a host/backend failure per the error-handling design's fatal
/// tier.
pub fn run(input: &str, output: Option<&str>, print_ir: bool) -> i32 {
    if input == "-" {
        return run_repl(print_ir);
    }
    run_compile(input, output, print_ir)
}

fn run_repl(print_ir: bool) -> i32 {
    let mut session = match Session::repl(std::io::stdin()) {
        Ok(session) => session,
        Err(err) => {
            eprintln!("{err}");
            return 1;
        }
    };
    session.set_print_ir(print_ir);
    session.run();
    0
}

fn run_compile(input: &str, output: Option<&str>, print_ir: bool) -> i32 {
    let source = match File::open(input) {
        Ok(file) => file,
        Err(err) => {
            eprintln!("failed to open '{input}': {err}");
            return 1;
        }
    };

    let module_name = Path::new(input).file_stem().and_then(|s| s.to_str()).unwrap_or("module").to_string();

    let mut session = match Session::compile(source, &module_name) {
        Ok(session) => session,
        Err(err) => {
            eprintln!("{err}");
            return 1;
        }
    };
    session.set_print_ir(print_ir);
    session.run();

    let output_path = object_output_path(input, output);
    match session.emit_object_file(&output_path) {
        Ok(()) => 0,
        Err(err) => {
            eprintln!("{err}");
            1
        }
    }
}

/// The `-o` stem gets a `.o` suffix if it doesn't already have one; with no
/// `-o`, the input's own stem is used.
fn object_output_path(input: &str, output: Option<&str>) -> PathBuf {
    let stem = output.map(str::to_string).unwrap_or_else(|| {
        Path::new(input).file_stem().and_then(|s| s.to_str()).unwrap_or("a").to_string()
    });
    let mut path = PathBuf::from(stem);
    if path.extension().is_none() {
        path.set_extension("o");
    }
    path
}

// Re-exported so an embedder can drive a session directly instead of
// through the CLI entrypoint.
pub use session::Session as CompilerSession;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_output_path_uses_the_input_stem() {
        assert_eq!(object_output_path("avg.lang", None), PathBuf::from("avg.o"));
    }

    #[test]
    fn an_explicit_stem_gets_the_o_suffix_appended() {
        assert_eq!(object_output_path("avg.lang", Some("out")), PathBuf::from("out.o"));
    }

    #[test]
    fn an_explicit_suffix_is_left_alone() {
        assert_eq!(object_output_path("avg.lang", Some("out.o")), PathBuf::from("out.o"));
    }
}
