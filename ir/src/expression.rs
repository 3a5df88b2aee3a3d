//! Emission rules for every `Expr` variant (§4.4), implemented as a
//! `Visitor` over the shared AST so the generator plugs into `Expr::accept`
//! the same way a pretty-printer or any other AST walker would.

use common::ast::core::{Expr, Visitor};
use common::ast::function::{binary_name, unary_name, FunctionDecl};
use common::constants::{
    DEFAULT_AFTER_LOOP_LABEL, DEFAULT_ELSE_LABEL, DEFAULT_LOOP_LABEL, DEFAULT_LOOP_STEP, DEFAULT_MERGE_LABEL,
    DEFAULT_THEN_LABEL,
};
use common::error::ErrorType;
use safe_llvm::ir::core::ValueTag;

use crate::core::IrGenerator;

type VisitResult = Result<Option<ValueTag>, ErrorType>;

macro_rules! lock {
    ($gen:expr) => {
        $gen.resource_pools_handle()
            .lock()
            .map_err(|_| ErrorType::HostError { message: "resource pool mutex poisoned".to_string() })?
    };
}

impl IrGenerator {
    fn resource_pools_handle(&self) -> std::sync::Arc<std::sync::Mutex<safe_llvm::ir::core::ResourcePools>> {
        self.environment().resource_pools()
    }

    fn float_constant(&self, value: f64) -> VisitResult {
        let mut pools = lock!(self);
        let constant = pools
            .create_float(self.context(), value)
            .ok_or_else(|| ErrorType::DevError { message: "failed to create binary64 constant".to_string() })?;
        Ok(Some(constant))
    }

    fn call_function(&mut self, name: &str, args: &[ValueTag]) -> VisitResult {
        let (function, decl) = self.resolve_function(name)?;
        if decl.args.len() != args.len() {
            return Err(ErrorType::DevError {
                message: format!("'{name}' expects {} argument(s), got {}", decl.args.len(), args.len()),
            });
        }
        let mut pools = lock!(self);
        let call = pools
            .create_call(self.builder(), function, args, "calltmp")
            .ok_or_else(|| ErrorType::DevError { message: format!("failed to emit call to '{name}'") })?;
        Ok(Some(call))
    }
}

impl Visitor for IrGenerator {
    type Output = VisitResult;

    fn visit_number(&mut self, value: f64) -> Self::Output {
        self.float_constant(value)
    }

    fn visit_var_ref(&mut self, name: &str) -> Self::Output {
        let slot = self
            .symbols
            .get(name)
            .copied()
            .ok_or_else(|| ErrorType::DevError { message: format!("unknown variable: {name}") })?;
        let mut pools = lock!(self);
        let float_type = pools
            .float_type(self.context())
            .ok_or_else(|| ErrorType::DevError { message: "failed to create binary64 type".to_string() })?;
        let loaded = pools
            .get_var(self.builder(), float_type, slot, name)
            .ok_or_else(|| ErrorType::DevError { message: format!("failed to load '{name}'") })?;
        Ok(Some(loaded))
    }

    fn visit_call(&mut self, callee: &str, args: &[Expr]) -> Self::Output {
        let mut values = Vec::with_capacity(args.len());
        for arg in args {
            let value = arg
                .accept(self)?
                .ok_or_else(|| ErrorType::DevError { message: format!("argument to '{callee}' produced no value") })?;
            values.push(value);
        }
        self.call_function(callee, &values)
    }

    fn visit_unary(&mut self, op: char, operand: &Expr) -> Self::Output {
        let operand_value =
            operand.accept(self)?.ok_or_else(|| ErrorType::DevError { message: "unary operand produced no value".to_string() })?;
        self.call_function(&unary_name(op), &[operand_value])
    }

    fn visit_binary(&mut self, op: char, lhs: &Expr, rhs: &Expr) -> Self::Output {
        if op == '=' {
            return self.visit_assignment(lhs, rhs);
        }

        let lhs_value =
            lhs.accept(self)?.ok_or_else(|| ErrorType::DevError { message: "left operand produced no value".to_string() })?;
        let rhs_value =
            rhs.accept(self)?.ok_or_else(|| ErrorType::DevError { message: "right operand produced no value".to_string() })?;

        match op {
            '+' => {
                let mut pools = lock!(self);
                let value = pools
                    .build_fadd(self.builder(), lhs_value, rhs_value, "addtmp")
                    .ok_or_else(|| ErrorType::DevError { message: "failed to emit '+'".to_string() })?;
                Ok(Some(value))
            }
            '-' => {
                let mut pools = lock!(self);
                let value = pools
                    .build_fsub(self.builder(), lhs_value, rhs_value, "subtmp")
                    .ok_or_else(|| ErrorType::DevError { message: "failed to emit '-'".to_string() })?;
                Ok(Some(value))
            }
            '*' => {
                let mut pools = lock!(self);
                let value = pools
                    .build_fmul(self.builder(), lhs_value, rhs_value, "multmp")
                    .ok_or_else(|| ErrorType::DevError { message: "failed to emit '*'".to_string() })?;
                Ok(Some(value))
            }
            '<' => {
                let mut pools = lock!(self);
                let cmp = pools
                    .build_fcmp_ult(self.builder(), lhs_value, rhs_value, "cmptmp")
                    .ok_or_else(|| ErrorType::DevError { message: "failed to emit '<'".to_string() })?;
                let as_float = pools
                    .build_uitofp(self.builder(), self.context(), cmp, "booltmp")
                    .ok_or_else(|| ErrorType::DevError { message: "failed to convert comparison result".to_string() })?;
                Ok(Some(as_float))
            }
            other => self.call_function(&binary_name(other), &[lhs_value, rhs_value]),
        }
    }

    fn visit_if(&mut self, cond: &Expr, then_branch: &Expr, else_branch: &Expr) -> Self::Output {
        let function = self
            .function()
            .ok_or_else(|| ErrorType::DevError { message: "'when' used outside a function body".to_string() })?;

        let cond_value =
            cond.accept(self)?.ok_or_else(|| ErrorType::DevError { message: "condition produced no value".to_string() })?;

        let (then_block, else_block, merge_block) = {
            let mut pools = lock!(self);
            let current = pools
                .get_current_block(self.builder())
                .ok_or_else(|| ErrorType::DevError { message: "no current block".to_string() })?;
            let then_block = pools
                .create_basic_block_after(self.context(), function, current, DEFAULT_THEN_LABEL)
                .ok_or_else(|| ErrorType::DevError { message: "failed to create 'then' block".to_string() })?;
            let else_block = pools
                .create_basic_block_after(self.context(), function, then_block, DEFAULT_ELSE_LABEL)
                .ok_or_else(|| ErrorType::DevError { message: "failed to create 'otherwise' block".to_string() })?;
            let merge_block = pools
                .create_basic_block_after(self.context(), function, else_block, DEFAULT_MERGE_LABEL)
                .ok_or_else(|| ErrorType::DevError { message: "failed to create merge block".to_string() })?;

            let zero = pools
                .create_float(self.context(), 0.0)
                .ok_or_else(|| ErrorType::DevError { message: "failed to create comparison constant".to_string() })?;
            let bool_cond = pools
                .build_fcmp_une(self.builder(), cond_value, zero, "ifcond")
                .ok_or_else(|| ErrorType::DevError { message: "failed to evaluate 'when' condition".to_string() })?;
            pools.create_cond_br(self.builder(), bool_cond, then_block, else_block);
            (then_block, else_block, merge_block)
        };

        lock!(self).position_builder_at_end(self.builder(), then_block);
        let then_value =
            then_branch.accept(self)?.ok_or_else(|| ErrorType::DevError { message: "'then' branch produced no value".to_string() })?;
        let then_end = {
            let mut pools = lock!(self);
            pools.create_br(self.builder(), merge_block);
            pools.get_current_block(self.builder()).unwrap_or(then_block)
        };

        lock!(self).position_builder_at_end(self.builder(), else_block);
        let else_value = else_branch
            .accept(self)?
            .ok_or_else(|| ErrorType::DevError { message: "'otherwise' branch produced no value".to_string() })?;
        let else_end = {
            let mut pools = lock!(self);
            pools.create_br(self.builder(), merge_block);
            pools.get_current_block(self.builder()).unwrap_or(else_block)
        };

        let mut pools = lock!(self);
        pools.position_builder_at_end(self.builder(), merge_block);
        let float_type = pools
            .float_type(self.context())
            .ok_or_else(|| ErrorType::DevError { message: "failed to create binary64 type".to_string() })?;
        let phi = pools
            .create_phi(self.builder(), float_type, "whentmp")
            .ok_or_else(|| ErrorType::DevError { message: "failed to create merge phi".to_string() })?;
        pools.add_incoming(phi, then_value, then_end);
        pools.add_incoming(phi, else_value, else_end);
        Ok(Some(phi))
    }

    fn visit_loop(&mut self, var: &str, init: &Expr, cond: &Expr, step: Option<&Expr>, body: &Expr) -> Self::Output {
        let function = self
            .function()
            .ok_or_else(|| ErrorType::DevError { message: "'while' used outside a function body".to_string() })?;

        let init_value =
            init.accept(self)?.ok_or_else(|| ErrorType::DevError { message: "loop initializer produced no value".to_string() })?;

        let slot = {
            let mut pools = lock!(self);
            let float_type = pools
                .float_type(self.context())
                .ok_or_else(|| ErrorType::DevError { message: "failed to create binary64 type".to_string() })?;
            pools
                .init_var(self.builder(), var, float_type, Some(init_value))
                .ok_or_else(|| ErrorType::DevError { message: format!("failed to allocate slot for '{var}'") })?
        };
        let prior = self.symbols.shadow(var, slot);

        let (loop_block, after_block) = {
            let mut pools = lock!(self);
            let current = pools
                .get_current_block(self.builder())
                .ok_or_else(|| ErrorType::DevError { message: "no current block".to_string() })?;
            let loop_block = pools
                .create_basic_block_after(self.context(), function, current, DEFAULT_LOOP_LABEL)
                .ok_or_else(|| ErrorType::DevError { message: "failed to create loop block".to_string() })?;
            let after_block = pools
                .create_basic_block_after(self.context(), function, loop_block, DEFAULT_AFTER_LOOP_LABEL)
                .ok_or_else(|| ErrorType::DevError { message: "failed to create after-loop block".to_string() })?;
            pools.create_br(self.builder(), loop_block);
            pools.position_builder_at_end(self.builder(), loop_block);
            (loop_block, after_block)
        };

        let body_result = body.accept(self);
        if body_result.is_err() {
            self.symbols.restore(var, prior);
            return body_result;
        }

        // Step and advance the induction variable before testing the
        // continuation condition, so the branch-back decision sees the
        // post-increment value, not the one the body just ran with.
        let tail_result: VisitResult = (|| {
            let step_value = match step {
                Some(step_expr) => step_expr
                    .accept(self)?
                    .ok_or_else(|| ErrorType::DevError { message: "loop step produced no value".to_string() })?,
                None => self.float_constant(DEFAULT_LOOP_STEP)?.expect("a constant always produces a value"),
            };

            {
                let mut pools = lock!(self);
                let float_type = pools
                    .float_type(self.context())
                    .ok_or_else(|| ErrorType::DevError { message: "failed to create binary64 type".to_string() })?;
                let current = pools
                    .get_var(self.builder(), float_type, slot, var)
                    .ok_or_else(|| ErrorType::DevError { message: format!("failed to load '{var}'") })?;
                let next = pools
                    .build_fadd(self.builder(), current, step_value, "nextvar")
                    .ok_or_else(|| ErrorType::DevError { message: "failed to advance induction variable".to_string() })?;
                pools.reassign_var(self.builder(), slot, next);
            }

            let cond_value = cond
                .accept(self)?
                .ok_or_else(|| ErrorType::DevError { message: "loop condition produced no value".to_string() })?;

            let mut pools = lock!(self);
            let zero = pools
                .create_float(self.context(), 0.0)
                .ok_or_else(|| ErrorType::DevError { message: "failed to create comparison constant".to_string() })?;
            let bool_cond = pools
                .build_fcmp_une(self.builder(), cond_value, zero, "loopcond")
                .ok_or_else(|| ErrorType::DevError { message: "failed to evaluate loop condition".to_string() })?;
            pools.create_cond_br(self.builder(), bool_cond, loop_block, after_block);
            pools.position_builder_at_end(self.builder(), after_block);
            Ok(None)
        })();

        if let Err(err) = tail_result {
            self.symbols.restore(var, prior);
            return Err(err);
        }

        self.symbols.restore(var, prior);
        self.float_constant(0.0)
    }

    fn visit_var_def(&mut self, bindings: &[(String, Option<Expr>)], body: &Expr) -> Self::Output {
        let mut priors = Vec::with_capacity(bindings.len());

        for (name, init) in bindings {
            let init_value = match init {
                Some(expr) => expr
                    .accept(self)?
                    .ok_or_else(|| ErrorType::DevError { message: format!("initializer for '{name}' produced no value") })?,
                None => self.float_constant(0.0)?.expect("a constant always produces a value"),
            };

            let slot = {
                let mut pools = lock!(self);
                let float_type = pools
                    .float_type(self.context())
                    .ok_or_else(|| ErrorType::DevError { message: "failed to create binary64 type".to_string() })?;
                pools
                    .init_var(self.builder(), name, float_type, Some(init_value))
                    .ok_or_else(|| ErrorType::DevError { message: format!("failed to allocate slot for '{name}'") })?
            };
            priors.push((name.clone(), self.symbols.shadow(name, slot)));
        }

        let result = body.accept(self);

        for (name, prior) in priors.into_iter().rev() {
            self.symbols.restore(&name, prior);
        }

        result
    }

    fn register_decl(&mut self, decl: &FunctionDecl) {
        self.functions.register(decl.clone());
    }
}

impl IrGenerator {
    fn visit_assignment(&mut self, lhs: &Expr, rhs: &Expr) -> VisitResult {
        let name = match lhs {
            Expr::VarRef(name) => name.clone(),
            _ => return Err(ErrorType::DevError { message: "left side of '=' must be a variable".to_string() }),
        };
        let slot = self
            .symbols
            .get(&name)
            .copied()
            .ok_or_else(|| ErrorType::DevError { message: format!("unknown variable: {name}") })?;

        let value =
            rhs.accept(self)?.ok_or_else(|| ErrorType::DevError { message: "right side of '=' produced no value".to_string() })?;

        let mut pools = lock!(self);
        pools.reassign_var(self.builder(), slot, value);
        Ok(Some(value))
    }
}
