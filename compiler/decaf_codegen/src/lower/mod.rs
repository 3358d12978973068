//! Program lowering.
//!
//! A program is lowered in a fixed order:
//!
//! 1. the module is named after the package
//! 2. extern declarations and global fields are bound in the global frame
//! 3. every method signature is declared (so calls may refer forward)
//! 4. every method body is generated and verified
//!
//! Statement and expression lowering live on [`FunctionLowerer`], split by
//! concern: `stmt`, `control_flow`, `expr`, `operators`, `calls`.

mod calls;
mod control_flow;
mod decls;
mod expr;
mod function;
mod operators;
mod stmt;

use decaf_ast::{Program, TypeTag};
use decaf_backend::{IrBuilder, IrType, Module, ModuleBuilder};

use crate::context::CodegenContext;
use crate::{CodegenError, CodegenOptions, CodegenOutput};

pub(crate) use function::FunctionLowerer;

/// Lower `program` through `builder`.
///
/// On success the builder holds one function per extern and method, one
/// global per field and string literal, and every defined function has
/// passed verification (unless disabled in `options`).
pub fn generate<B: IrBuilder + ?Sized>(
    program: &Program,
    builder: &mut B,
    options: &CodegenOptions,
) -> Result<CodegenOutput, CodegenError> {
    let package = program
        .package
        .as_ref()
        .ok_or(CodegenError::MissingPackage)?;
    let _span = tracing::debug_span!("codegen", package = %package.name).entered();

    builder.set_module_name(&package.name);
    let mut cx = CodegenContext::new(builder, *options);

    for ext in &program.externs {
        decls::declare_extern(&mut cx, ext)?;
    }
    for field in &package.fields {
        decls::declare_field(&mut cx, field)?;
    }

    // Pass 1: signatures.
    let mut declared = Vec::with_capacity(package.methods.len());
    for method in &package.methods {
        declared.push(decls::declare_method(&mut cx, method)?);
    }

    // Pass 2: bodies.
    for (method, id) in package.methods.iter().zip(declared) {
        function::define_method(&mut cx, method, id)?;
    }

    tracing::debug!(
        methods = package.methods.len(),
        warnings = cx.warnings.len(),
        "codegen finished"
    );
    Ok(CodegenOutput {
        warnings: cx.warnings,
    })
}

/// Lower `program` into a fresh in-memory [`Module`].
pub fn compile_to_module(
    program: &Program,
    options: &CodegenOptions,
) -> Result<(Module, CodegenOutput), CodegenError> {
    let mut builder = ModuleBuilder::new();
    let output = generate(program, &mut builder, options)?;
    Ok((builder.finish(), output))
}

/// Backend type of a Decaf type.
pub(crate) fn ir_type(ty: TypeTag) -> IrType {
    match ty {
        TypeTag::Int32 => IrType::I32,
        TypeTag::Bool1 => IrType::I1,
        TypeTag::StringPtr => IrType::Ptr,
        TypeTag::Void => IrType::Void,
    }
}

#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "tests lower known-good programs")]
mod tests;
