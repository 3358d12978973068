//! Module-level declarations: externs, fields, method signatures.

use decaf_ast::{ConstValue, Constant, ExternFunction, FieldDecl, FieldSize, Method, TypeTag};
use decaf_backend::{Const, FunctionId, IrBuilder};
use smallvec::SmallVec;

use super::ir_type;
use crate::context::CodegenContext;
use crate::descriptor::{Descriptor, DescriptorKind};
use crate::CodegenError;

/// Declare a body-less function and bind it globally.
pub(super) fn declare_extern<B: IrBuilder + ?Sized>(
    cx: &mut CodegenContext<'_, B>,
    ext: &ExternFunction,
) -> Result<(), CodegenError> {
    let params: SmallVec<[(Option<&str>, _); 4]> =
        ext.params.iter().map(|p| (None, ir_type(p.ty))).collect();
    let id = cx
        .builder
        .declare_function(&ext.name, ir_type(ext.return_type), &params);
    tracing::debug!(name = %ext.name, params = params.len(), "declare extern");
    cx.scopes.bind(
        &ext.name,
        Descriptor::function(ext.return_type, id, ext.params.as_slice(), ext.line),
    )
}

/// Emit a global for a field declaration and bind it globally.
pub(super) fn declare_field<B: IrBuilder + ?Sized>(
    cx: &mut CodegenContext<'_, B>,
    field: &FieldDecl,
) -> Result<(), CodegenError> {
    let invalid_init = || CodegenError::InvalidInitializer {
        name: field.name.clone(),
        line: field.line,
    };
    let descriptor = match field.size {
        FieldSize::Array(0) => {
            return Err(CodegenError::InvalidArraySize {
                name: field.name.clone(),
                line: field.line,
            })
        }
        FieldSize::Array(len) => {
            if field.init.is_some() {
                return Err(invalid_init());
            }
            let base = cx.builder.global_array(&field.name, ir_type(field.ty), len);
            Descriptor::array(field.ty, base, len, field.line)
        }
        FieldSize::Scalar => {
            let init = match &field.init {
                Some(constant) => field_initializer(field.ty, constant).ok_or_else(invalid_init)?,
                None => Const::zero(ir_type(field.ty)).ok_or_else(invalid_init)?,
            };
            let slot = cx.builder.global_scalar(&field.name, ir_type(field.ty), init);
            Descriptor::scalar(DescriptorKind::GlobalVariable, field.ty, slot, field.line)
        }
    };
    tracing::debug!(name = %field.name, size = ?field.size, "declare field");
    cx.scopes.bind(&field.name, descriptor)
}

/// Initial value of a scalar field, widening a bool constant for an int field.
fn field_initializer(ty: TypeTag, constant: &Constant) -> Option<Const> {
    match (ty, constant.value()) {
        (TypeTag::Int32, ConstValue::Int(v)) => Some(Const::I32(*v)),
        (TypeTag::Int32, ConstValue::Bool(b)) => Some(Const::I32(i32::from(*b))),
        (TypeTag::Bool1, ConstValue::Bool(b)) => Some(Const::Bool(*b)),
        _ => None,
    }
}

/// Declare a method signature and bind it globally.
pub(super) fn declare_method<B: IrBuilder + ?Sized>(
    cx: &mut CodegenContext<'_, B>,
    method: &Method,
) -> Result<FunctionId, CodegenError> {
    let params: SmallVec<[(Option<&str>, _); 4]> = method
        .params
        .iter()
        .map(|p| (p.name.as_deref(), ir_type(p.ty)))
        .collect();
    let id = cx
        .builder
        .declare_function(&method.name, ir_type(method.return_type), &params);
    tracing::debug!(name = %method.name, params = params.len(), "declare method");
    cx.scopes.bind(
        &method.name,
        Descriptor::function(method.return_type, id, method.params.as_slice(), method.line),
    )?;
    Ok(id)
}
