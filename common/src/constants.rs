//! Shared naming constants for generated basic blocks. Centralized here so
//! the IR generator's label strings stay consistent across `if` and `while`
//! lowering, matching the teacher's own `DEFAULT_*_LABEL` convention.

pub const DEFAULT_ENTRY_LABEL: &str = "entry";
pub const DEFAULT_THEN_LABEL: &str = "then";
pub const DEFAULT_ELSE_LABEL: &str = "otherwise";
pub const DEFAULT_MERGE_LABEL: &str = "whencont";
pub const DEFAULT_LOOP_LABEL: &str = "loop";
pub const DEFAULT_AFTER_LOOP_LABEL: &str = "afterloop";

/// The step applied to a loop's induction variable when none is given.
pub const DEFAULT_LOOP_STEP: f64 = 1.0;
