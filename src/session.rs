//! The read-parse-codegen driver: pulls one top-level item at a time from
//! the parser and dispatches it to codegen, either submitting the result
//! to the JIT (REPL mode) or accumulating it into a module destined for
//! object emission (compile mode).

use std::io::{Read, Write};
use std::path::Path;

use common::ast::core::Visitor;
use common::ast::function::{FunctionDef, TopLevelItem, ANONYMOUS_EXPR_NAME};
use common::error::ErrorType;
use integration::{Environment, JitEngine};
use ir::IrGenerator;
use parser::Parser;

/// `ready> ` is written before every top-level item in REPL mode, matching
/// the host-function design's REPL prompt contract.
const REPL_PROMPT: &str = "ready> ";

pub struct Session<R: Read> {
    parser: Parser<R>,
    ir: IrGenerator,
    jit: Option<JitEngine>,
    module_counter: usize,
    print_ir: bool,
}

impl<R: Read> Session<R> {
    /// A REPL session: each definition submits to the JIT immediately and
    /// each bare expression is evaluated on the spot.
    pub fn repl(source: R) -> Result<Self, ErrorType> {
        let environment = Environment::new("repl_module_0")?;
        Ok(Self {
            parser: Parser::new(source),
            ir: IrGenerator::new(environment),
            jit: Some(JitEngine::new()?),
            module_counter: 0,
            print_ir: false,
        })
    }

    /// A compile session: every item accumulates into one module, emitted
    /// as an object file once the input is exhausted.
    pub fn compile(source: R, module_name: &str) -> Result<Self, ErrorType> {
        let environment = Environment::new(module_name)?;
        Ok(Self {
            parser: Parser::new(source),
            ir: IrGenerator::new(environment),
            jit: None,
            module_counter: 0,
            print_ir: false,
        })
    }

    pub fn set_print_ir(&mut self, print_ir: bool) {
        self.print_ir = print_ir;
    }

    fn is_repl(&self) -> bool {
        self.jit.is_some()
    }

    /// Runs the parse/codegen loop to completion. In REPL mode this also
    /// drives JIT submission and evaluation; in compile mode it only
    /// populates the module, leaving emission to `emit_object_file`.
    pub fn run(&mut self) {
        loop {
            if self.is_repl() {
                eprint!("{REPL_PROMPT}");
                let _ = std::io::stderr().flush();
            }

            if self.parser.at_eof() {
                break;
            }

            match self.parser.parse_top_level_item() {
                Ok(None) => continue,
                Ok(Some(item)) => {
                    if let Err(err) = self.handle_item(item) {
                        log::warn!("codegen error: {err}");
                        eprintln!("{err}");
                    }
                }
                Err(errors) => {
                    for err in &errors {
                        log::warn!("parse error: {err}");
                        eprintln!("{err}");
                    }
                    self.parser.skip_token();
                }
            }
        }

        if self.print_ir {
            match self.ir.dump_module() {
                Ok(ir_text) => eprintln!("{ir_text}"),
                Err(err) => eprintln!("{err}"),
            }
        }
    }

    fn handle_item(&mut self, item: TopLevelItem) -> Result<(), ErrorType> {
        match item {
            TopLevelItem::Declaration(decl) => {
                log::debug!("registering native declaration '{}'", decl.name);
                self.ir.register_decl(&decl);
                Ok(())
            }
            TopLevelItem::Definition(def) if def.decl.name == ANONYMOUS_EXPR_NAME => {
                self.handle_top_level_expression(def)
            }
            TopLevelItem::Definition(def) => self.handle_function_definition(def),
        }
    }

    fn handle_function_definition(&mut self, def: FunctionDef) -> Result<(), ErrorType> {
        log::debug!("generating definition '{}'", def.decl.name);
        self.ir.generate_def(&def)?;
        self.submit_and_rotate_if_repl()
    }

    fn handle_top_level_expression(&mut self, def: FunctionDef) -> Result<(), ErrorType> {
        self.ir.generate_def(&def)?;

        let Some(jit) = self.jit.as_mut() else {
            // Compile mode still codegens bare expressions (they are part
            // of the module) but never evaluates them.
            return Ok(());
        };

        let fresh = Environment::new(&self.next_module_name())?;
        let old_environment = self.ir.rotate_environment(fresh);
        let tracker = jit.submit(old_environment)?;

        let thunk = unsafe { jit.get_function_address(ANONYMOUS_EXPR_NAME) }
            .ok_or_else(|| ErrorType::HostError { message: "failed to resolve evaluated expression".to_string() })?;
        let result = thunk();
        eprintln!("Evaluated to {result:.6}");

        jit.remove(tracker)
    }

    fn submit_and_rotate_if_repl(&mut self) -> Result<(), ErrorType> {
        let Some(jit) = self.jit.as_mut() else {
            return Ok(());
        };
        let fresh = Environment::new(&self.next_module_name())?;
        let old_environment = self.ir.rotate_environment(fresh);
        jit.submit(old_environment)?;
        Ok(())
    }

    fn next_module_name(&mut self) -> String {
        self.module_counter += 1;
        format!("repl_module_{}", self.module_counter)
    }

    /// Retargets the accumulated module to the host triple and writes it
    /// to `output_path`. Compile mode only.
    pub fn emit_object_file(&self, output_path: &Path) -> Result<(), ErrorType> {
        integration::emit_object_file(self.ir.environment(), output_path)
    }
}
