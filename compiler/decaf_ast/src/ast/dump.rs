//! Canonical textual dump.
//!
//! Every node renders as `Kind(field,field,...)` through `Display`, so
//! `node.to_string()` is the dump. Absent optional children and empty lists
//! render as `None`. Source lines never appear in the output.

use std::fmt;

use super::{
    Assign, Block, CallExpr, Expr, ExternFunction, FieldDecl, FieldSize, Method, MethodBody,
    Package, Program, Stmt, VarDef,
};

/// Renders an optional child, or `None`.
struct Opt<'a, T>(&'a Option<T>);

impl<T: fmt::Display> fmt::Display for Opt<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(inner) => inner.fmt(f),
            None => f.write_str("None"),
        }
    }
}

impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Program({},{})", self.externs, Opt(&self.package))
    }
}

impl fmt::Display for Package {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Package({},{},{})", self.name, self.fields, self.methods)
    }
}

impl fmt::Display for ExternFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ExternFunction({},{},{})",
            self.name, self.return_type, self.params
        )
    }
}

impl fmt::Display for FieldSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Scalar => f.write_str("Scalar"),
            Self::Array(len) => write!(f, "Array({len})"),
        }
    }
}

impl fmt::Display for FieldDecl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.init {
            Some(init) => write!(f, "AssignGlobalVar({},{},{init})", self.name, self.ty),
            None => write!(f, "FieldDecl({},{},{})", self.name, self.ty, self.size),
        }
    }
}

impl fmt::Display for VarDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.name {
            Some(name) => write!(f, "VarDef({name},{})", self.ty),
            None => write!(f, "VarDef({})", self.ty),
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Method({},{},{},{})",
            self.name, self.return_type, self.params, self.body
        )
    }
}

impl fmt::Display for MethodBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "MethodBlock({},{})", self.vars, self.stmts)
    }
}

impl fmt::Display for Block {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Block({},{})", self.vars, self.stmts)
    }
}

impl fmt::Display for Assign {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Scalar(a) => write!(f, "AssignVar({},{})", a.name, a.value),
            Self::Element(a) => {
                write!(f, "AssignArrayLoc({},{},{})", a.name, a.index, a.value)
            }
        }
    }
}

impl fmt::Display for Stmt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Block(block) => block.fmt(f),
            Self::If(s) => write!(
                f,
                "IfStmt({},{},{})",
                s.cond,
                s.then_block,
                Opt(&s.else_block)
            ),
            Self::While(s) => write!(f, "WhileStmt({},{})", s.cond, s.body),
            Self::For(s) => write!(
                f,
                "ForStmt({},{},{},{})",
                s.init, s.cond, s.step, s.body
            ),
            Self::Return(s) => write!(f, "ReturnStmt({})", Opt(&s.value)),
            Self::Break { .. } => f.write_str("BreakStmt"),
            Self::Continue { .. } => f.write_str("ContinueStmt"),
            Self::Assign(assign) => assign.fmt(f),
            Self::Call(call) => call.fmt(f),
        }
    }
}

impl fmt::Display for CallExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "MethodCall({},{})", self.name, self.args)
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Binary { op, lhs, rhs, .. } => write!(f, "BinaryExpr({op},{lhs},{rhs})"),
            Self::Unary { op, operand, .. } => write!(f, "UnaryExpr({op},{operand})"),
            Self::Variable { name, .. } => write!(f, "VariableExpr({name})"),
            Self::ElementAccess { name, index, .. } => write!(f, "ArrayLocExpr({name},{index})"),
            Self::Call(call) => call.fmt(f),
            Self::Constant(c) => c.fmt(f),
        }
    }
}
