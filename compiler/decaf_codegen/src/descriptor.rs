//! Symbol-table entries.

use decaf_ast::{TypeTag, VarDef};
use decaf_backend::{FunctionId, ValueId};
use smallvec::SmallVec;

/// What a bound name refers to.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum DescriptorKind {
    GlobalVariable,
    LocalVariable,
    Parameter,
    Function,
}

impl DescriptorKind {
    #[inline]
    pub fn is_variable(self) -> bool {
        !matches!(self, Self::Function)
    }
}

/// Backend handle behind a name.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Handle {
    /// Address of a scalar slot (stack slot or global).
    Slot(ValueId),
    /// Base address of a global array and its declared length.
    Array { base: ValueId, len: u32 },
    /// A declared function with its parameter types and names, in order.
    /// Extern parameters are unnamed.
    Function {
        id: FunctionId,
        params: SmallVec<[TypeTag; 4]>,
        names: SmallVec<[Option<String>; 4]>,
    },
}

/// Everything lowering needs to know about a bound name.
///
/// `ty` is the value type for variables and the return type for functions.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Descriptor {
    pub kind: DescriptorKind,
    pub ty: TypeTag,
    pub line: u32,
    pub handle: Handle,
}

impl Descriptor {
    pub fn scalar(kind: DescriptorKind, ty: TypeTag, slot: ValueId, line: u32) -> Self {
        Self {
            kind,
            ty,
            line,
            handle: Handle::Slot(slot),
        }
    }

    pub fn array(ty: TypeTag, base: ValueId, len: u32, line: u32) -> Self {
        Self {
            kind: DescriptorKind::GlobalVariable,
            ty,
            line,
            handle: Handle::Array { base, len },
        }
    }

    pub fn function(ret: TypeTag, id: FunctionId, params: &[VarDef], line: u32) -> Self {
        Self {
            kind: DescriptorKind::Function,
            ty: ret,
            line,
            handle: Handle::Function {
                id,
                params: params.iter().map(|p| p.ty).collect(),
                names: params.iter().map(|p| p.name.clone()).collect(),
            },
        }
    }
}
