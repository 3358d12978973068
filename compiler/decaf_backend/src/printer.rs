//! Deterministic LLVM-flavoured text form of a [`Module`].

use std::fmt::{self, Write as _};

use crate::module::{Block, Function, Global, GlobalKind, Inst, Module, Terminator, ValueDef};
use crate::{IrType, UnOp, ValueId};

impl fmt::Display for Module {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "; ModuleID = '{}'", self.name)?;

        if !self.globals.is_empty() {
            writeln!(f)?;
            for global in &self.globals {
                write_global(f, global)?;
            }
        }

        for function in &self.functions {
            writeln!(f)?;
            Printer { module: self }.function(f, function)?;
        }
        Ok(())
    }
}

fn write_global(f: &mut fmt::Formatter<'_>, global: &Global) -> fmt::Result {
    match &global.kind {
        GlobalKind::Scalar { ty, init } => writeln!(f, "@{} = global {ty} {init}", global.name),
        GlobalKind::Array { elem, len } => writeln!(
            f,
            "@{} = global [{len} x {elem}] zeroinitializer",
            global.name
        ),
        GlobalKind::Str(bytes) => writeln!(
            f,
            "@{} = private constant [{} x i8] c\"{}\\00\"",
            global.name,
            bytes.len() + 1,
            escape_bytes(bytes)
        ),
    }
}

fn escape_bytes(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len());
    for &b in bytes {
        if b == b' ' || (b.is_ascii_graphic() && b != b'"' && b != b'\\') {
            out.push(char::from(b));
        } else {
            let _ = write!(out, "\\{b:02X}");
        }
    }
    out
}

struct Printer<'a> {
    module: &'a Module,
}

impl Printer<'_> {
    fn function(&self, f: &mut fmt::Formatter<'_>, function: &Function) -> fmt::Result {
        let keyword = if function.is_declaration() {
            "declare"
        } else {
            "define"
        };
        write!(f, "{keyword} {} @{}(", function.ret, function.name)?;
        for (i, param) in function.params.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            if function.is_declaration() {
                write!(f, "{}", param.ty)?;
            } else {
                write!(f, "{} {}", param.ty, self.operand(param.value))?;
            }
        }
        if function.is_declaration() {
            return writeln!(f, ")");
        }
        writeln!(f, ") {{")?;
        for (i, &block) in function.blocks.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            self.block(f, self.module.block(block))?;
        }
        writeln!(f, "}}")
    }

    fn block(&self, f: &mut fmt::Formatter<'_>, block: &Block) -> fmt::Result {
        writeln!(f, "{}:", block.label)?;
        for inst in &block.insts {
            f.write_str("  ")?;
            self.inst(f, inst)?;
            writeln!(f)?;
        }
        if let Some(terminator) = &block.terminator {
            f.write_str("  ")?;
            self.terminator(f, terminator)?;
            writeln!(f)?;
        }
        Ok(())
    }

    fn inst(&self, f: &mut fmt::Formatter<'_>, inst: &Inst) -> fmt::Result {
        match inst {
            Inst::Alloca { dst, ty } => write!(f, "{} = alloca {ty}", self.operand(*dst)),
            Inst::Load { dst, ty, ptr } => write!(
                f,
                "{} = load {ty}, ptr {}",
                self.operand(*dst),
                self.operand(*ptr)
            ),
            Inst::Store { value, ptr } => write!(
                f,
                "store {}, ptr {}",
                self.typed(*value),
                self.operand(*ptr)
            ),
            Inst::ElementPtr {
                dst,
                elem_ty,
                base,
                index,
            } => write!(
                f,
                "{} = getelementptr {elem_ty}, ptr {}, {}",
                self.operand(*dst),
                self.operand(*base),
                self.typed(*index)
            ),
            Inst::Binary { dst, op, lhs, rhs } => write!(
                f,
                "{} = {} {}, {}",
                self.operand(*dst),
                op.mnemonic(),
                self.typed(*lhs),
                self.operand(*rhs)
            ),
            Inst::Unary { dst, op, operand } => {
                let ty = self.ty(*operand);
                match op {
                    UnOp::Not => write!(
                        f,
                        "{} = xor {ty} {}, {}",
                        self.operand(*dst),
                        self.operand(*operand),
                        if ty == IrType::I1 { "true" } else { "-1" }
                    ),
                    UnOp::Neg => write!(
                        f,
                        "{} = sub {ty} 0, {}",
                        self.operand(*dst),
                        self.operand(*operand)
                    ),
                }
            }
            Inst::Zext { dst, value, to } => write!(
                f,
                "{} = zext {} to {to}",
                self.operand(*dst),
                self.typed(*value)
            ),
            Inst::Phi { dst, ty, incoming } => {
                write!(f, "{} = phi {ty} ", self.operand(*dst))?;
                for (i, (value, block)) in incoming.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(
                        f,
                        "[ {}, %{} ]",
                        self.operand(*value),
                        self.module.block(*block).label
                    )?;
                }
                Ok(())
            }
            Inst::Call { dst, callee, args } => {
                let target = self.module.function(*callee);
                if let Some(dst) = dst {
                    write!(f, "{} = ", self.operand(*dst))?;
                }
                write!(f, "call {} @{}(", target.ret, target.name)?;
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", self.typed(*arg))?;
                }
                f.write_str(")")
            }
        }
    }

    fn terminator(&self, f: &mut fmt::Formatter<'_>, terminator: &Terminator) -> fmt::Result {
        match terminator {
            Terminator::Br(target) => {
                write!(f, "br label %{}", self.module.block(*target).label)
            }
            Terminator::CondBr {
                cond,
                then_bb,
                else_bb,
            } => write!(
                f,
                "br {}, label %{}, label %{}",
                self.typed(*cond),
                self.module.block(*then_bb).label,
                self.module.block(*else_bb).label
            ),
            Terminator::Ret(Some(value)) => write!(f, "ret {}", self.typed(*value)),
            Terminator::Ret(None) => f.write_str("ret void"),
            Terminator::Unreachable => f.write_str("unreachable"),
        }
    }

    fn ty(&self, value: ValueId) -> IrType {
        self.module.value(value).ty
    }

    fn typed(&self, value: ValueId) -> String {
        format!("{} {}", self.ty(value), self.operand(value))
    }

    fn operand(&self, value: ValueId) -> String {
        let info = self.module.value(value);
        match (&info.def, &info.name) {
            (ValueDef::Const(c), _) => c.to_string(),
            (ValueDef::Global(_), Some(name)) => format!("@{name}"),
            (_, Some(name)) => format!("%{name}"),
            (_, None) => format!("%v{}", value.raw()),
        }
    }
}
