use decaf_ast::{
    BinaryOp, Block, Expr, ExternFunction, FieldDecl, Method, MethodBody, Package, Program, Stmt,
    StmtList, TypeTag, UnaryOp, VarDef,
};
use decaf_backend::module::{GlobalKind, Inst};
use decaf_backend::{IrBuilder, ModuleBuilder};
use pretty_assertions::assert_eq;

use super::{compile_to_module, generate};
use crate::CodegenOptions;

fn package(fields: Vec<FieldDecl>, methods: Vec<Method>) -> Program {
    Program::new(StmtList::new(), Some(Package::new("P", fields, methods, 1)))
}

fn lower(program: &Program) -> String {
    let (module, output) = compile_to_module(program, &CodegenOptions::default()).unwrap();
    assert_eq!(output.warnings, vec![]);
    module.to_string()
}

/// `int abs(int n) { if (n < 0) { return -n; } else { return n; } }`
#[test]
fn if_else_with_returns_closes_the_join() {
    let body = Stmt::if_else(
        Expr::binary(BinaryOp::Lt, Expr::var("n", 2), Expr::int(0, 2), 2),
        Block::of(vec![Stmt::ret(
            Some(Expr::unary(UnaryOp::Negate, Expr::var("n", 3), 3)),
            3,
        )]),
        Some(Block::of(vec![Stmt::ret(Some(Expr::var("n", 5)), 5)])),
        2,
    );
    let program = package(
        vec![FieldDecl::scalar("x", TypeTag::Int32, 1)],
        vec![Method::new(
            "abs",
            TypeTag::Int32,
            vec![VarDef::named("n", TypeTag::Int32, 2)],
            MethodBody::new(vec![], vec![body]),
            2,
        )],
    );

    assert_eq!(
        lower(&program),
        "; ModuleID = 'P'

@x = global i32 0

define i32 @abs(i32 %n) {
entry:
  %n.addr = alloca i32
  store i32 %n, ptr %n.addr
  br label %if.cond

if.cond:
  %n1 = load i32, ptr %n.addr
  %lt = icmp slt i32 %n1, 0
  br i1 %lt, label %if.then, label %if.else

if.then:
  %n2 = load i32, ptr %n.addr
  %neg = sub i32 0, %n2
  ret i32 %neg

if.else:
  %n3 = load i32, ptr %n.addr
  ret i32 %n3

if.end:
  unreachable
}
"
    );
}

/// `bool both(bool a, bool b) { return a && b; }`
#[test]
fn and_evaluates_rhs_in_its_own_block() {
    let program = package(
        vec![],
        vec![Method::new(
            "both",
            TypeTag::Bool1,
            vec![
                VarDef::named("a", TypeTag::Bool1, 1),
                VarDef::named("b", TypeTag::Bool1, 1),
            ],
            MethodBody::new(
                vec![],
                vec![Stmt::ret(
                    Some(Expr::binary(
                        BinaryOp::And,
                        Expr::var("a", 2),
                        Expr::var("b", 2),
                        2,
                    )),
                    2,
                )],
            ),
            1,
        )],
    );

    assert_eq!(
        lower(&program),
        "; ModuleID = 'P'

define i1 @both(i1 %a, i1 %b) {
entry:
  %a.addr = alloca i1
  %b.addr = alloca i1
  store i1 %a, ptr %a.addr
  store i1 %b, ptr %b.addr
  %a1 = load i1, ptr %a.addr
  br i1 %a1, label %and.rhs, label %and.end

and.rhs:
  %b1 = load i1, ptr %b.addr
  br label %and.end

and.end:
  %and = phi i1 [ %a1, %entry ], [ %b1, %and.rhs ]
  ret i1 %and
}
"
    );
}

#[test]
fn nested_locals_live_in_the_entry_block() {
    // void f() { while (true) { int i; i = 1; break; } }
    let body = Stmt::while_loop(
        Expr::boolean(true, 2),
        Block::new(
            StmtList::from(vec![VarDef::named("i", TypeTag::Int32, 3)]),
            StmtList::from(vec![
                Stmt::assign("i", Expr::int(1, 4), 4),
                Stmt::Break { line: 5 },
            ]),
        ),
        2,
    );
    let program = package(
        vec![],
        vec![Method::new(
            "f",
            TypeTag::Void,
            vec![],
            MethodBody::new(vec![], vec![body]),
            1,
        )],
    );
    let (module, _) = compile_to_module(&program, &CodegenOptions::default()).unwrap();
    let f = module.function_by_name("f").unwrap();
    let entry = module.block(f.entry_block().unwrap());
    assert!(matches!(entry.insts.first(), Some(Inst::Alloca { .. })));

    let labels: Vec<&str> = f
        .blocks
        .iter()
        .map(|&b| module.block(b).label.as_str())
        .collect();
    assert_eq!(
        labels,
        vec!["entry", "while.cond", "while.body", "while.end"]
    );
}

#[test]
fn string_arguments_become_private_globals() {
    let program = Program::new(
        StmtList::from(vec![ExternFunction::new(
            "print_string",
            TypeTag::Void,
            &[TypeTag::StringPtr],
            1,
        )]),
        Some(Package::new(
            "P",
            vec![],
            vec![Method::new(
                "main",
                TypeTag::Void,
                vec![],
                MethodBody::new(
                    vec![],
                    vec![Stmt::Call(decaf_ast::CallExpr::new(
                        "print_string",
                        vec![Expr::Constant(
                            decaf_ast::Constant::string("\"hi\\n\"", 3).unwrap(),
                        )],
                        3,
                    ))],
                ),
                2,
            )],
            1,
        )),
    );
    let (module, _) = compile_to_module(&program, &CodegenOptions::default()).unwrap();
    assert_eq!(module.name, "P");
    assert_eq!(module.globals.len(), 1);
    assert_eq!(module.globals[0].kind, GlobalKind::Str(b"hi\n".to_vec()));
    assert!(module
        .function_by_name("print_string")
        .unwrap()
        .is_declaration());
}

#[test]
fn drives_a_trait_object_builder() {
    let program = package(
        vec![],
        vec![Method::new(
            "main",
            TypeTag::Int32,
            vec![],
            MethodBody::new(vec![], vec![Stmt::ret(Some(Expr::int(7, 2)), 2)]),
            1,
        )],
    );
    let mut builder = ModuleBuilder::new();
    let dyn_builder: &mut dyn IrBuilder = &mut builder;
    let output = generate(&program, dyn_builder, &CodegenOptions::default()).unwrap();
    assert!(!output.has_warnings());
    assert_eq!(builder.module().functions.len(), 1);
}
