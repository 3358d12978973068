//! Structural verification of function bodies.
//!
//! Checks the properties code generation relies on: every block ends in
//! exactly one terminator, control only flows between blocks of the same
//! function, returns match the signature, and phi nodes only name real
//! predecessors.

use crate::module::{EmitIssue, Inst, Module, Terminator, ValueDef};
use crate::{BlockId, FunctionId, IrType, ValueId};

/// A structural problem in a generated function.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum VerifyError {
    #[error("function `{function}` has no body")]
    NoBody { function: String },

    #[error("block `{block}` in `{function}` has no terminator")]
    Unterminated { function: String, block: String },

    #[error("instruction emitted after the terminator of block `{block}` in `{function}`")]
    EmitAfterTerminator { function: String, block: String },

    #[error("instruction emitted with no insertion point in `{function}`")]
    NoInsertionPoint { function: String },

    #[error("block `{block}` in `{function}` branches to a block of another function")]
    ForeignBlock { function: String, block: String },

    #[error("`{function}` uses a value defined in another function")]
    ForeignValue { function: String },

    #[error("return in `{function}` yields {found}, signature says {expected}")]
    ReturnTypeMismatch {
        function: String,
        expected: IrType,
        found: IrType,
    },

    #[error("phi in block `{block}` of `{function}` names `{incoming}`, which is not a predecessor")]
    PhiNotPredecessor {
        function: String,
        block: String,
        incoming: String,
    },

    #[error("phi after a non-phi instruction in block `{block}` of `{function}`")]
    PhiNotAtBlockStart { function: String, block: String },

    #[error("type mismatch in `{function}`: {message}")]
    TypeMismatch { function: String, message: String },

    #[error("call to `{callee}` in `{function}` does not match its signature")]
    CallSignatureMismatch { function: String, callee: String },
}

/// Verify one function of `module`.
pub fn verify_function(module: &Module, function: FunctionId) -> Result<(), VerifyError> {
    Verifier {
        module,
        function,
        name: &module.function(function).name,
    }
    .run()
}

/// Verify every defined function of `module`.
pub fn verify_module(module: &Module) -> Result<(), VerifyError> {
    for f in &module.functions {
        if !f.is_declaration() {
            verify_function(module, f.id)?;
        }
    }
    Ok(())
}

struct Verifier<'a> {
    module: &'a Module,
    function: FunctionId,
    name: &'a str,
}

impl Verifier<'_> {
    fn run(&self) -> Result<(), VerifyError> {
        let func = self.module.function(self.function);
        if func.is_declaration() {
            return Err(VerifyError::NoBody {
                function: self.name.to_owned(),
            });
        }
        self.check_issues()?;
        for &block in &func.blocks {
            self.check_block(block)?;
        }
        Ok(())
    }

    fn check_issues(&self) -> Result<(), VerifyError> {
        for (owner, issue) in &self.module.issues {
            if *owner != Some(self.function) {
                continue;
            }
            return Err(match issue {
                EmitIssue::AfterTerminator { block } => VerifyError::EmitAfterTerminator {
                    function: self.name.to_owned(),
                    block: self.label(*block),
                },
                EmitIssue::NoInsertionPoint => VerifyError::NoInsertionPoint {
                    function: self.name.to_owned(),
                },
            });
        }
        Ok(())
    }

    fn check_block(&self, block: BlockId) -> Result<(), VerifyError> {
        let data = self.module.block(block);
        let Some(terminator) = &data.terminator else {
            return Err(VerifyError::Unterminated {
                function: self.name.to_owned(),
                block: data.label.clone(),
            });
        };

        let mut seen_non_phi = false;
        for inst in &data.insts {
            if let Inst::Phi { incoming, .. } = inst {
                if seen_non_phi {
                    return Err(VerifyError::PhiNotAtBlockStart {
                        function: self.name.to_owned(),
                        block: data.label.clone(),
                    });
                }
                self.check_phi(block, incoming)?;
            } else {
                seen_non_phi = true;
            }
            self.check_inst(inst)?;
        }

        for target in terminator.successors() {
            if self.module.block(target).function != self.function {
                return Err(VerifyError::ForeignBlock {
                    function: self.name.to_owned(),
                    block: data.label.clone(),
                });
            }
        }
        self.check_terminator(terminator)
    }

    fn check_phi(&self, block: BlockId, incoming: &[(ValueId, BlockId)]) -> Result<(), VerifyError> {
        let preds = self.module.predecessors(self.function, block);
        for &(value, from) in incoming {
            self.check_value(value)?;
            if !preds.contains(&from) {
                return Err(VerifyError::PhiNotPredecessor {
                    function: self.name.to_owned(),
                    block: self.label(block),
                    incoming: self.label(from),
                });
            }
        }
        Ok(())
    }

    fn check_inst(&self, inst: &Inst) -> Result<(), VerifyError> {
        match inst {
            Inst::Alloca { .. } => Ok(()),
            Inst::Load { ptr, .. } => self.expect_type(*ptr, IrType::Ptr, "load address"),
            Inst::Store { value, ptr } => {
                self.check_value(*value)?;
                self.expect_type(*ptr, IrType::Ptr, "store address")
            }
            Inst::ElementPtr { base, index, .. } => {
                self.expect_type(*base, IrType::Ptr, "element base")?;
                self.expect_type(*index, IrType::I32, "element index")
            }
            Inst::Binary { lhs, rhs, op, .. } => {
                let lhs_ty = self.ty(*lhs)?;
                let rhs_ty = self.ty(*rhs)?;
                if lhs_ty == rhs_ty && lhs_ty != IrType::Void {
                    Ok(())
                } else {
                    Err(self.mismatch(format!(
                        "`{}` operands are {lhs_ty} and {rhs_ty}",
                        op.mnemonic()
                    )))
                }
            }
            Inst::Unary { operand, .. } => self.check_value(*operand),
            Inst::Zext { value, to, .. } => {
                let from = self.ty(*value)?;
                if from == IrType::I1 && *to == IrType::I32 {
                    Ok(())
                } else {
                    Err(self.mismatch(format!("zext from {from} to {to}")))
                }
            }
            Inst::Phi { .. } => Ok(()),
            Inst::Call { callee, args, .. } => self.check_call(*callee, args),
        }
    }

    fn check_call(&self, callee: FunctionId, args: &[ValueId]) -> Result<(), VerifyError> {
        let target = self.module.function(callee);
        let mismatch = || VerifyError::CallSignatureMismatch {
            function: self.name.to_owned(),
            callee: target.name.clone(),
        };
        if target.params.len() != args.len() {
            return Err(mismatch());
        }
        for (param, &arg) in target.params.iter().zip(args) {
            if self.ty(arg)? != param.ty {
                return Err(mismatch());
            }
        }
        Ok(())
    }

    fn check_terminator(&self, terminator: &Terminator) -> Result<(), VerifyError> {
        let expected = self.module.function(self.function).ret;
        match terminator {
            Terminator::Br(_) | Terminator::Unreachable => Ok(()),
            Terminator::CondBr { cond, .. } => self.expect_type(*cond, IrType::I1, "branch condition"),
            Terminator::Ret(value) => {
                let found = match value {
                    Some(v) => self.ty(*v)?,
                    None => IrType::Void,
                };
                if found == expected {
                    Ok(())
                } else {
                    Err(VerifyError::ReturnTypeMismatch {
                        function: self.name.to_owned(),
                        expected,
                        found,
                    })
                }
            }
        }
    }

    // Helpers

    fn check_value(&self, value: ValueId) -> Result<(), VerifyError> {
        self.ty(value).map(|_| ())
    }

    /// Type of `value`, rejecting values owned by another function.
    fn ty(&self, value: ValueId) -> Result<IrType, VerifyError> {
        let info = self.module.value(value);
        let owner = match info.def {
            ValueDef::Const(_) | ValueDef::Global(_) => None,
            ValueDef::Param { function, .. } => Some(function),
            ValueDef::Inst { block } => block.map(|b| self.module.block(b).function),
        };
        match owner {
            Some(f) if f != self.function => Err(VerifyError::ForeignValue {
                function: self.name.to_owned(),
            }),
            _ => Ok(info.ty),
        }
    }

    fn expect_type(&self, value: ValueId, expected: IrType, what: &str) -> Result<(), VerifyError> {
        let found = self.ty(value)?;
        if found == expected {
            Ok(())
        } else {
            Err(self.mismatch(format!("{what} is {found}, expected {expected}")))
        }
    }

    fn mismatch(&self, message: String) -> VerifyError {
        VerifyError::TypeMismatch {
            function: self.name.to_owned(),
            message,
        }
    }

    fn label(&self, block: BlockId) -> String {
        self.module.block(block).label.clone()
    }
}
