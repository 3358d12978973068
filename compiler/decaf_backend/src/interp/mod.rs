//! Reference interpreter for recorded modules.
//!
//! Executes a function of a [`Module`] directly from its blocks. Memory is
//! a list of regions (one per global and one per executed `alloca`);
//! pointers are `(region, offset)` pairs counted in elements. Stack regions
//! are released when the frame that allocated them returns.
//!
//! External declarations dispatch to host callbacks registered with
//! [`Interpreter::bind`]. A step budget bounds runaway loops.

mod memory;

use rustc_hash::FxHashMap;
use smallvec::SmallVec;

use crate::module::{GlobalKind, Inst, Module, Terminator, ValueDef};
use crate::{BinOp, BlockId, Const, FunctionId, IrType, UnOp, ValueId};

pub use self::memory::{Memory, Pointer};

/// A runtime value.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Value {
    I32(i32),
    Bool(bool),
    Ptr(Pointer),
}

impl Value {
    /// The all-zero value of `ty`.
    pub fn zero(ty: IrType) -> Self {
        match ty {
            IrType::I1 => Self::Bool(false),
            IrType::Ptr => Self::Ptr(Pointer::NULL),
            IrType::I32 | IrType::Void => Self::I32(0),
        }
    }

    pub fn as_i32(self) -> Option<i32> {
        match self {
            Self::I32(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_bool(self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(b),
            _ => None,
        }
    }

    pub fn as_ptr(self) -> Option<Pointer> {
        match self {
            Self::Ptr(p) => Some(p),
            _ => None,
        }
    }
}

impl From<Const> for Value {
    fn from(c: Const) -> Self {
        match c {
            Const::I32(v) => Self::I32(v),
            Const::Bool(b) => Self::Bool(b),
            Const::Null => Self::Ptr(Pointer::NULL),
        }
    }
}

/// Runtime failure.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ExecError {
    #[error("no function named `{0}`")]
    UnknownFunction(String),

    #[error("external function `{0}` has no host binding")]
    UnboundExtern(String),

    #[error("`{name}` expects {expected} arguments, got {found}")]
    ArityMismatch {
        name: String,
        expected: usize,
        found: usize,
    },

    #[error("step limit of {0} exceeded")]
    StepLimitExceeded(u64),

    #[error("call depth limit of {0} exceeded")]
    CallDepthExceeded(usize),

    #[error("stack slot limit of {0} exceeded")]
    StackSlotsExceeded(usize),

    #[error("block `{0}` has no terminator")]
    Unterminated(String),

    #[error("reached an unreachable block")]
    Unreachable,

    #[error("value used before it was defined")]
    UndefinedValue,

    #[error("phi has no incoming value for the predecessor block")]
    MissingPhiIncoming,

    #[error("null pointer dereference")]
    NullDereference,

    #[error("memory access at offset {offset} outside a region of {len} elements")]
    OutOfBounds { offset: i64, len: usize },

    #[error("division by zero")]
    DivisionByZero,

    #[error("type mismatch: {0}")]
    TypeMismatch(String),
}

/// Interpreter limits.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ExecOptions {
    /// Maximum number of executed instructions and terminators.
    pub step_limit: u64,
    /// Maximum nesting of calls to defined functions.
    pub max_call_depth: usize,
    /// Maximum number of live `alloca` slots across all active calls.
    pub max_stack_slots: usize,
}

impl Default for ExecOptions {
    fn default() -> Self {
        Self {
            step_limit: 1_000_000,
            max_call_depth: 256,
            max_stack_slots: 1 << 20,
        }
    }
}

impl ExecOptions {
    #[must_use]
    pub fn with_step_limit(mut self, limit: u64) -> Self {
        self.step_limit = limit;
        self
    }

    #[must_use]
    pub fn with_max_call_depth(mut self, depth: usize) -> Self {
        self.max_call_depth = depth;
        self
    }

    #[must_use]
    pub fn with_max_stack_slots(mut self, slots: usize) -> Self {
        self.max_stack_slots = slots;
        self
    }
}

/// Arguments of a host call, with read access to interpreter memory.
pub struct HostCall<'a> {
    args: &'a [Value],
    memory: &'a Memory,
}

impl HostCall<'_> {
    #[inline]
    pub fn args(&self) -> &[Value] {
        self.args
    }

    pub fn int_arg(&self, index: usize) -> Option<i32> {
        self.args.get(index).copied().and_then(Value::as_i32)
    }

    /// Read a NUL-terminated string argument.
    pub fn string_arg(&self, index: usize) -> Option<String> {
        let ptr = self.args.get(index).copied().and_then(Value::as_ptr)?;
        self.memory.c_string(ptr)
    }
}

type HostFn<'h> = Box<dyn FnMut(&HostCall<'_>) -> Option<Value> + 'h>;

/// Executes functions of one module.
pub struct Interpreter<'m, 'h> {
    module: &'m Module,
    options: ExecOptions,
    memory: Memory,
    /// Region holding each global, indexed by `GlobalId`.
    global_regions: Vec<u32>,
    host: FxHashMap<String, HostFn<'h>>,
    steps: u64,
    depth: usize,
}

/// Per-call SSA environment.
#[derive(Default)]
struct Frame {
    values: FxHashMap<ValueId, Value>,
}

impl<'m, 'h> Interpreter<'m, 'h> {
    pub fn new(module: &'m Module, options: ExecOptions) -> Self {
        let mut memory = Memory::default();
        let mut global_regions = Vec::with_capacity(module.globals.len());
        for global in &module.globals {
            let cells = match &global.kind {
                GlobalKind::Scalar { init, .. } => vec![Value::from(*init)],
                GlobalKind::Array { elem, len } => {
                    vec![Value::zero(*elem); usize::try_from(*len).unwrap_or(0)]
                }
                GlobalKind::Str(bytes) => bytes
                    .iter()
                    .map(|&b| Value::I32(i32::from(b)))
                    .chain(std::iter::once(Value::I32(0)))
                    .collect(),
            };
            global_regions.push(memory.allocate_global(cells));
        }
        Self {
            module,
            options,
            memory,
            global_regions,
            host: FxHashMap::default(),
            steps: 0,
            depth: 0,
        }
    }

    /// Register the host implementation of an external function.
    pub fn bind(
        &mut self,
        name: impl Into<String>,
        f: impl FnMut(&HostCall<'_>) -> Option<Value> + 'h,
    ) -> &mut Self {
        self.host.insert(name.into(), Box::new(f));
        self
    }

    /// Instructions and terminators executed so far.
    #[inline]
    pub fn steps(&self) -> u64 {
        self.steps
    }

    #[inline]
    pub fn memory(&self) -> &Memory {
        &self.memory
    }

    /// Current value of a scalar global.
    pub fn global_value(&self, name: &str) -> Option<Value> {
        self.global_element(name, 0)
    }

    /// Current value of one element of a global array.
    pub fn global_element(&self, name: &str, index: i64) -> Option<Value> {
        let global = self.module.global_by_name(name)?;
        let region = self.global_regions[global.id.index()];
        self.memory.read(Pointer::new(region, index)).ok()
    }

    /// Call the named function with `args`.
    pub fn run(&mut self, name: &str, args: &[Value]) -> Result<Option<Value>, ExecError> {
        let function = self
            .module
            .function_by_name(name)
            .ok_or_else(|| ExecError::UnknownFunction(name.to_owned()))?;
        self.call(function.id, args)
    }

    fn call(&mut self, callee: FunctionId, args: &[Value]) -> Result<Option<Value>, ExecError> {
        let function = self.module.function(callee);
        if function.params.len() != args.len() {
            return Err(ExecError::ArityMismatch {
                name: function.name.clone(),
                expected: function.params.len(),
                found: args.len(),
            });
        }

        let Some(entry) = function.entry_block() else {
            let host = self
                .host
                .get_mut(&function.name)
                .ok_or_else(|| ExecError::UnboundExtern(function.name.clone()))?;
            let result = host(&HostCall {
                args,
                memory: &self.memory,
            });
            return Ok(result);
        };

        if self.depth >= self.options.max_call_depth {
            return Err(ExecError::CallDepthExceeded(self.options.max_call_depth));
        }
        tracing::trace!(function = %function.name, depth = self.depth, "call");

        let mut frame = Frame::default();
        for (param, &arg) in function.params.iter().zip(args) {
            frame.values.insert(param.value, arg);
        }

        let mark = self.memory.mark();
        self.depth += 1;
        let result = self.execute(&mut frame, entry);
        self.depth -= 1;
        self.memory.release(mark);
        result
    }

    fn execute(&mut self, frame: &mut Frame, entry: BlockId) -> Result<Option<Value>, ExecError> {
        let mut block = entry;
        let mut prev: Option<BlockId> = None;
        loop {
            let data = self.module.block(block);

            // Phis read their inputs simultaneously on block entry.
            let mut merged: SmallVec<[(ValueId, Value); 2]> = SmallVec::new();
            for inst in &data.insts {
                if let Inst::Phi { dst, incoming, .. } = inst {
                    let (value, _) = incoming
                        .iter()
                        .find(|(_, from)| Some(*from) == prev)
                        .ok_or(ExecError::MissingPhiIncoming)?;
                    merged.push((*dst, self.operand(frame, *value)?));
                }
            }
            frame.values.extend(merged);

            for inst in &data.insts {
                if !matches!(inst, Inst::Phi { .. }) {
                    self.tick()?;
                    self.exec_inst(frame, inst)?;
                }
            }

            self.tick()?;
            match &data.terminator {
                None => return Err(ExecError::Unterminated(data.label.clone())),
                Some(Terminator::Br(target)) => {
                    prev = Some(block);
                    block = *target;
                }
                Some(Terminator::CondBr {
                    cond,
                    then_bb,
                    else_bb,
                }) => {
                    let taken = self.bool_operand(frame, *cond)?;
                    prev = Some(block);
                    block = if taken { *then_bb } else { *else_bb };
                }
                Some(Terminator::Unreachable) => return Err(ExecError::Unreachable),
                Some(Terminator::Ret(value)) => {
                    return value.map(|v| self.operand(frame, v)).transpose();
                }
            }
        }
    }

    fn exec_inst(&mut self, frame: &mut Frame, inst: &Inst) -> Result<(), ExecError> {
        match inst {
            Inst::Alloca { dst, ty } => {
                let limit = self.options.max_stack_slots;
                if self.memory.mark() - self.global_regions.len() >= limit {
                    return Err(ExecError::StackSlotsExceeded(limit));
                }
                let region = self
                    .memory
                    .allocate(vec![Value::zero(*ty)])
                    .ok_or(ExecError::StackSlotsExceeded(limit))?;
                frame.values.insert(*dst, Value::Ptr(Pointer::new(region, 0)));
            }
            Inst::Load { dst, ty, ptr } => {
                let ptr = self.ptr_operand(frame, *ptr)?;
                let value = self.memory.read(ptr)?;
                if !matches_type(value, *ty) {
                    return Err(ExecError::TypeMismatch(format!("load of {ty} found {value:?}")));
                }
                frame.values.insert(*dst, value);
            }
            Inst::Store { value, ptr } => {
                let value = self.operand(frame, *value)?;
                let ptr = self.ptr_operand(frame, *ptr)?;
                self.memory.write(ptr, value)?;
            }
            Inst::ElementPtr {
                dst, base, index, ..
            } => {
                let base = self.ptr_operand(frame, *base)?;
                let index = self.int_operand(frame, *index)?;
                frame
                    .values
                    .insert(*dst, Value::Ptr(base.offset_by(i64::from(index))));
            }
            Inst::Binary { dst, op, lhs, rhs } => {
                let lhs = self.operand(frame, *lhs)?;
                let rhs = self.operand(frame, *rhs)?;
                frame.values.insert(*dst, eval_binary(*op, lhs, rhs)?);
            }
            Inst::Unary { dst, op, operand } => {
                let value = match (op, self.operand(frame, *operand)?) {
                    (UnOp::Not, Value::Bool(b)) => Value::Bool(!b),
                    (UnOp::Not, Value::I32(v)) => Value::I32(!v),
                    (UnOp::Neg, Value::I32(v)) => Value::I32(v.wrapping_neg()),
                    (op, value) => {
                        return Err(ExecError::TypeMismatch(format!(
                            "{} of {value:?}",
                            op.mnemonic()
                        )))
                    }
                };
                frame.values.insert(*dst, value);
            }
            Inst::Zext { dst, value, .. } => {
                let widened = i32::from(self.bool_operand(frame, *value)?);
                frame.values.insert(*dst, Value::I32(widened));
            }
            Inst::Phi { .. } => {}
            Inst::Call { dst, callee, args } => {
                let args = args
                    .iter()
                    .map(|&a| self.operand(frame, a))
                    .collect::<Result<SmallVec<[Value; 4]>, _>>()?;
                let result = self.call(*callee, &args)?;
                if let Some(dst) = dst {
                    let value = result.ok_or_else(|| {
                        ExecError::TypeMismatch(format!(
                            "`{}` returned no value",
                            self.module.function(*callee).name
                        ))
                    })?;
                    frame.values.insert(*dst, value);
                }
            }
        }
        Ok(())
    }

    fn tick(&mut self) -> Result<(), ExecError> {
        self.steps += 1;
        if self.steps > self.options.step_limit {
            return Err(ExecError::StepLimitExceeded(self.options.step_limit));
        }
        Ok(())
    }

    // Operands

    fn operand(&self, frame: &Frame, value: ValueId) -> Result<Value, ExecError> {
        match &self.module.value(value).def {
            ValueDef::Const(c) => Ok(Value::from(*c)),
            ValueDef::Global(g) => Ok(Value::Ptr(Pointer::new(self.global_regions[g.index()], 0))),
            ValueDef::Param { .. } | ValueDef::Inst { .. } => frame
                .values
                .get(&value)
                .copied()
                .ok_or(ExecError::UndefinedValue),
        }
    }

    fn bool_operand(&self, frame: &Frame, value: ValueId) -> Result<bool, ExecError> {
        let v = self.operand(frame, value)?;
        v.as_bool()
            .ok_or_else(|| ExecError::TypeMismatch(format!("expected i1, found {v:?}")))
    }

    fn int_operand(&self, frame: &Frame, value: ValueId) -> Result<i32, ExecError> {
        let v = self.operand(frame, value)?;
        v.as_i32()
            .ok_or_else(|| ExecError::TypeMismatch(format!("expected i32, found {v:?}")))
    }

    fn ptr_operand(&self, frame: &Frame, value: ValueId) -> Result<Pointer, ExecError> {
        let v = self.operand(frame, value)?;
        v.as_ptr()
            .ok_or_else(|| ExecError::TypeMismatch(format!("expected ptr, found {v:?}")))
    }
}

fn matches_type(value: Value, ty: IrType) -> bool {
    matches!(
        (value, ty),
        (Value::I32(_), IrType::I32) | (Value::Bool(_), IrType::I1) | (Value::Ptr(_), IrType::Ptr)
    )
}

fn eval_binary(op: BinOp, lhs: Value, rhs: Value) -> Result<Value, ExecError> {
    let value = match (lhs, rhs) {
        (Value::I32(a), Value::I32(b)) => match op {
            BinOp::Add => Value::I32(a.wrapping_add(b)),
            BinOp::Sub => Value::I32(a.wrapping_sub(b)),
            BinOp::Mul => Value::I32(a.wrapping_mul(b)),
            BinOp::SDiv => Value::I32(a.checked_div(b).ok_or(ExecError::DivisionByZero)?),
            BinOp::SRem => Value::I32(a.checked_rem(b).ok_or(ExecError::DivisionByZero)?),
            BinOp::Shl => Value::I32(a.wrapping_shl(b.unsigned_abs())),
            BinOp::LShr => Value::I32(i32::from_ne_bytes(
                u32::from_ne_bytes(a.to_ne_bytes())
                    .wrapping_shr(b.unsigned_abs())
                    .to_ne_bytes(),
            )),
            BinOp::Eq => Value::Bool(a == b),
            BinOp::Ne => Value::Bool(a != b),
            BinOp::Sge => Value::Bool(a >= b),
            BinOp::Sle => Value::Bool(a <= b),
            BinOp::Sgt => Value::Bool(a > b),
            BinOp::Slt => Value::Bool(a < b),
        },
        (Value::Bool(a), Value::Bool(b)) => match op {
            BinOp::Eq => Value::Bool(a == b),
            BinOp::Ne => Value::Bool(a != b),
            _ => {
                return Err(ExecError::TypeMismatch(format!(
                    "`{}` on i1 operands",
                    op.mnemonic()
                )))
            }
        },
        _ => {
            return Err(ExecError::TypeMismatch(format!(
                "`{}` on {lhs:?} and {rhs:?}",
                op.mnemonic()
            )))
        }
    };
    Ok(value)
}
