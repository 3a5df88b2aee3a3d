//! The IR generator: an AST walker that lowers `Expr`/`FunctionDecl`/
//! `FunctionDef` into SSA-form IR against a backend `Environment`.
//!
//! Carries the environment's module/builder/context handles, the current
//! function being emitted, a symbol environment mapping variable names to
//! stack-slot handles, and a function-declaration cache for forward
//! references. The "last value produced" scratch slot the design calls for
//! is just the `Result<Option<ValueTag>, ErrorType>` every visit returns —
//! Rust's `?` makes a dedicated field unnecessary.

use common::ast::function::{FunctionDecl, FunctionDef};
use common::error::ErrorType;
use integration::Environment;
use safe_llvm::ir::core::{FunctionTag, ValueTag};
use sts::{FunctionCache, SymbolEnvironment};

/// Walks the AST and emits IR into the current `Environment`.
pub struct IrGenerator {
    environment: Environment,
    function: Option<FunctionTag>,
    pub(crate) symbols: SymbolEnvironment<ValueTag>,
    pub(crate) functions: FunctionCache,
}

impl IrGenerator {
    pub fn new(environment: Environment) -> Self {
        Self { environment, function: None, symbols: SymbolEnvironment::new(), functions: FunctionCache::new() }
    }

    pub(crate) fn resource_pools(&self) -> std::sync::Arc<std::sync::Mutex<safe_llvm::ir::core::ResourcePools>> {
        self.environment.resource_pools()
    }

    pub(crate) fn context(&self) -> safe_llvm::ir::core::ContextTag {
        self.environment.context()
    }

    pub(crate) fn module(&self) -> safe_llvm::ir::core::ModuleTag {
        self.environment.module()
    }

    pub(crate) fn builder(&self) -> safe_llvm::ir::core::BuilderTag {
        self.environment.builder()
    }

    pub(crate) fn function(&self) -> Option<FunctionTag> {
        self.function
    }

    /// Swaps in a fresh `Environment` (a new module rotation in REPL mode),
    /// returning the old one so the driver can submit it to the JIT.
    /// `functions` — the forward-reference cache — survives the swap; the
    /// JIT resolves cross-module references through its own symbol table.
    pub fn rotate_environment(&mut self, environment: Environment) -> Environment {
        std::mem::replace(&mut self.environment, environment)
    }

    pub fn environment(&self) -> &Environment {
        &self.environment
    }

    /// Creates the IR function for `decl`: N binary64 parameters, binary64
    /// return, external linkage. Registers `decl` in the function cache.
    pub fn generate_decl(&mut self, decl: &FunctionDecl) -> Result<FunctionTag, ErrorType> {
        self.functions.register(decl.clone());

        let pools = self.resource_pools();
        let mut pools = pools.lock().map_err(|_| ErrorType::HostError { message: "resource pool mutex poisoned".to_string() })?;

        let float_type = pools
            .float_type(self.context())
            .ok_or_else(|| ErrorType::DevError { message: "failed to create binary64 type".to_string() })?;
        let param_types: Vec<_> = decl.args.iter().map(|_| float_type).collect();

        let fn_type = pools
            .create_function_type(Some(float_type), &param_types, false, self.context())
            .ok_or_else(|| ErrorType::DevError { message: format!("failed to create function type for '{}'", decl.name) })?;

        let function = pools
            .add_function_to_module(self.module(), &decl.name, fn_type)
            .ok_or_else(|| ErrorType::DevError { message: format!("failed to declare function '{}'", decl.name) })?;

        pools.name_parameters(function, &decl.args);

        Ok(function)
    }

    /// Materializes the IR declaration for `name` if it has not been
    /// emitted yet, looking it up in the function cache. Used for call
    /// sites and for the `unary@`/`binary@` operator-function lookups.
    pub fn resolve_function(&mut self, name: &str) -> Result<(FunctionTag, FunctionDecl), ErrorType> {
        let decl = self
            .functions
            .get(name)
            .cloned()
            .ok_or_else(|| ErrorType::DevError { message: format!("unknown function referenced: {name}") })?;

        let existing = {
            let pools = self.resource_pools();
            let pools = pools.lock().map_err(|_| ErrorType::HostError { message: "resource pool mutex poisoned".to_string() })?;
            pools.find_function(self.module(), name)
        };

        let function = match existing {
            Some(function) => function,
            None => self.generate_decl(&decl)?,
        };

        Ok((function, decl))
    }

    /// Generates a complete function body: declares (or reuses) the
    /// signature, creates the entry block, materializes parameters into
    /// assignable stack slots, visits the body, and runs the per-function
    /// optimizer. On failure the partially built function is erased from
    /// the module, matching the codegen-error taxonomy's recovery rule.
    pub fn generate_def(&mut self, def: &FunctionDef) -> Result<FunctionTag, ErrorType> {
        self.symbols = SymbolEnvironment::new();

        let existing = {
            let pools = self.resource_pools();
            let pools = pools.lock().map_err(|_| ErrorType::HostError { message: "resource pool mutex poisoned".to_string() })?;
            pools.find_function(self.module(), &def.decl.name)
        };

        let function = match existing {
            Some(function) => {
                self.functions.register(def.decl.clone());
                function
            }
            None => self.generate_decl(&def.decl)?,
        };
        self.function = Some(function);

        let result = self.generate_def_body(def, function);

        self.function = None;

        match result {
            Ok(value) => {
                self.finalize_body(function, value)?;
                Ok(function)
            }
            Err(err) => {
                self.erase_function(function);
                Err(err)
            }
        }
    }

    fn generate_def_body(&mut self, def: &FunctionDef, function: FunctionTag) -> Result<Option<ValueTag>, ErrorType> {
        use common::ast::core::Visitor;

        let entry_label = common::constants::DEFAULT_ENTRY_LABEL;
        let pools = self.resource_pools();
        {
            let mut pools = pools.lock().map_err(|_| ErrorType::HostError { message: "resource pool mutex poisoned".to_string() })?;
            let entry = pools
                .create_basic_block(self.context(), function, entry_label)
                .ok_or_else(|| ErrorType::DevError { message: "failed to create entry block".to_string() })?;
            pools.position_builder_at_end(self.builder(), entry);
        }

        for (index, arg) in def.decl.args.iter().enumerate() {
            let mut pools = pools.lock().map_err(|_| ErrorType::HostError { message: "resource pool mutex poisoned".to_string() })?;
            let float_type = pools
                .float_type(self.context())
                .ok_or_else(|| ErrorType::DevError { message: "failed to create binary64 type".to_string() })?;
            let incoming = pools
                .get_param(function, index)
                .ok_or_else(|| ErrorType::DevError { message: format!("missing parameter '{arg}'") })?;
            let slot = pools
                .init_var(self.builder(), arg, float_type, Some(incoming))
                .ok_or_else(|| ErrorType::DevError { message: format!("failed to allocate slot for '{arg}'") })?;
            self.symbols.shadow(arg, slot);
        }

        def.body.accept(self)
    }

    fn finalize_body(&mut self, function: FunctionTag, value: Option<ValueTag>) -> Result<(), ErrorType> {
        let value = value.ok_or_else(|| ErrorType::DevError { message: "function body produced no value".to_string() })?;

        let pools = self.resource_pools();
        {
            let mut pools = pools.lock().map_err(|_| ErrorType::HostError { message: "resource pool mutex poisoned".to_string() })?;
            pools
                .nonvoid_return(self.builder(), value)
                .ok_or_else(|| ErrorType::DevError { message: "failed to emit return".to_string() })?;
        }

        {
            let pools = pools.lock().map_err(|_| ErrorType::HostError { message: "resource pool mutex poisoned".to_string() })?;
            pools
                .verify_function(function)
                .map_err(|message| ErrorType::DevError { message: format!("function failed verification: {message}") })?;
        }

        integration::optimize_function(&self.environment, function)
    }

    fn erase_function(&mut self, function: FunctionTag) {
        if let Ok(pools) = self.resource_pools().lock() {
            let mut pools = pools;
            pools.erase_function(function);
        }
    }

    /// Renders the current module as text IR, for the driver's `-IR` flag.
    /// Printed once for the whole accumulated module rather than per node.
    pub fn dump_module(&self) -> Result<String, ErrorType> {
        let pools = self.resource_pools();
        let pools = pools.lock().map_err(|_| ErrorType::HostError { message: "resource pool mutex poisoned".to_string() })?;
        pools
            .print_module_to_string(self.module())
            .ok_or_else(|| ErrorType::HostError { message: "failed to render module IR".to_string() })
    }
}
