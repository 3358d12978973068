use pretty_assertions::assert_eq;

use super::ModuleBuilder;
use crate::module::{EmitIssue, Inst, Terminator};
use crate::{BinOp, Const, IrBuilder, IrType, VerifyError};

#[test]
fn blocks_get_unique_labels() {
    let mut b = ModuleBuilder::new();
    let f = b.declare_function("f", IrType::Void, &[]);
    let entry = b.append_block(f, "entry");
    let first = b.append_block(f, "if.end");
    let second = b.append_block(f, "if.end");
    let m = b.module();
    assert_eq!(m.block(entry).label, "entry");
    assert_eq!(m.block(first).label, "if.end");
    assert_eq!(m.block(second).label, "if.end1");
    assert_eq!(m.function(f).entry_block(), Some(entry));
}

#[test]
fn allocas_are_hoisted_to_entry() {
    let mut b = ModuleBuilder::new();
    let f = b.declare_function("f", IrType::Void, &[]);
    let entry = b.append_block(f, "entry");
    let body = b.append_block(f, "body");
    b.position_at_end(entry);
    let first = b.alloca(IrType::I32, "a");
    let zero = b.const_i32(0);
    b.store(zero, first);
    b.br(body);

    b.position_at_end(body);
    let late = b.alloca(IrType::I1, "late");
    b.ret(None);

    let m = b.module();
    let insts = &m.block(entry).insts;
    assert!(matches!(insts[0], Inst::Alloca { dst, .. } if dst == first));
    assert!(matches!(insts[1], Inst::Alloca { dst, .. } if dst == late));
    assert!(matches!(insts[2], Inst::Store { .. }));
    assert!(m.block(body).insts.is_empty());
    assert_eq!(b.verify_function(f), Ok(()));
}

#[test]
fn emitting_after_terminator_is_recorded() {
    let mut b = ModuleBuilder::new();
    let f = b.declare_function("f", IrType::Void, &[]);
    let entry = b.append_block(f, "entry");
    b.position_at_end(entry);
    b.ret(None);
    assert!(b.current_block_terminated());
    b.ret(None);

    assert_eq!(
        b.module().issues,
        vec![(Some(f), EmitIssue::AfterTerminator { block: entry })]
    );
    assert_eq!(
        b.module().block(entry).terminator,
        Some(Terminator::Ret(None))
    );
    assert!(matches!(
        b.verify_function(f),
        Err(VerifyError::EmitAfterTerminator { .. })
    ));
}

#[test]
fn no_insertion_point_counts_as_terminated() {
    let mut b = ModuleBuilder::new();
    assert!(b.current_block_terminated());
    assert_eq!(b.current_block(), None);
    let one = b.const_i32(1);
    let _ = b.binary(BinOp::Add, one, one, "sum");
    assert_eq!(b.module().issues, vec![(None, EmitIssue::NoInsertionPoint)]);
}

#[test]
fn value_types() {
    let mut b = ModuleBuilder::new();
    let f = b.declare_function("f", IrType::I1, &[(Some("n"), IrType::I32)]);
    let entry = b.append_block(f, "entry");
    b.position_at_end(entry);
    let n = b.function_param(f, 0).unwrap();
    let ten = b.const_i32(10);
    let sum = b.binary(BinOp::Add, n, ten, "sum");
    let cmp = b.binary(BinOp::Slt, sum, ten, "cmp");
    let wide = b.zext(cmp, IrType::I32);
    let slot = b.global_scalar("g", IrType::I32, Const::I32(3));
    assert_eq!(b.value_type(sum), IrType::I32);
    assert_eq!(b.value_type(cmp), IrType::I1);
    assert_eq!(b.value_type(wide), IrType::I32);
    assert_eq!(b.value_type(slot), IrType::Ptr);
    assert_eq!(b.function_param(f, 1), None);
}

#[test]
fn void_calls_have_no_value() {
    let mut b = ModuleBuilder::new();
    let print = b.declare_function("print_int", IrType::Void, &[(None, IrType::I32)]);
    let read = b.declare_function("read_int", IrType::I32, &[]);
    let main = b.declare_function("main", IrType::Void, &[]);
    let entry = b.append_block(main, "entry");
    b.position_at_end(entry);
    let v = b.call(read, &[]);
    assert!(v.is_some());
    assert_eq!(b.call(print, &[v.unwrap()]), None);
    b.ret(None);
    assert_eq!(b.verify_function(main), Ok(()));
    assert!(b.module().function(print).is_declaration());
}

#[test]
fn prints_module() {
    let mut b = ModuleBuilder::new();
    b.set_module_name("P");
    b.global_scalar("x", IrType::I32, Const::I32(0));
    b.global_array("a", IrType::I32, 4);
    let greeting = b.global_string("hi\n");
    let print = b.declare_function("print_string", IrType::Void, &[(None, IrType::Ptr)]);
    let f = b.declare_function("f", IrType::I32, &[(Some("n"), IrType::I32)]);
    let entry = b.append_block(f, "entry");
    let done = b.append_block(f, "done");
    b.position_at_end(entry);
    let slot = b.alloca(IrType::I32, "n.addr");
    let n = b.function_param(f, 0).unwrap();
    b.store(n, slot);
    b.call(print, &[greeting]);
    let loaded = b.load(IrType::I32, slot, "n");
    let zero = b.const_i32(0);
    let neg = b.binary(BinOp::Slt, loaded, zero, "neg");
    b.cond_br(neg, done, done);
    b.position_at_end(done);
    let merged = b.phi(IrType::I32, &[(loaded, entry)], "m");
    b.ret(Some(merged));

    let text = b.finish().to_string();
    assert_eq!(
        text,
        "; ModuleID = 'P'

@x = global i32 0
@a = global [4 x i32] zeroinitializer
@.str = private constant [4 x i8] c\"hi\\0A\\00\"

declare void @print_string(ptr)

define i32 @f(i32 %n) {
entry:
  %n.addr = alloca i32
  store i32 %n, ptr %n.addr
  call void @print_string(ptr @.str)
  %n1 = load i32, ptr %n.addr
  %neg = icmp slt i32 %n1, 0
  br i1 %neg, label %done, label %done

done:
  %m = phi i32 [ %n1, %entry ]
  ret i32 %m
}
"
    );
}

#[test]
fn params_record_their_position() {
    use crate::module::ValueDef;

    let mut b = ModuleBuilder::new();
    let f = b.declare_function(
        "f",
        IrType::Void,
        &[(Some("a"), IrType::I32), (None, IrType::I1), (Some("c"), IrType::Ptr)],
    );
    for index in 0..3 {
        let value = b.function_param(f, index).unwrap();
        assert_eq!(
            b.module().value(value).def,
            ValueDef::Param {
                function: f,
                index: u32::try_from(index).unwrap(),
            }
        );
    }
    assert_eq!(b.function_param(f, 3), None);
}
