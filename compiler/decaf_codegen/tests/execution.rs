//! End-to-end tests: lower a program, then run it on the reference
//! interpreter with host-side externs that record what they see.

#![expect(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]

use std::cell::RefCell;

use decaf_ast::{
    Assign, BinaryOp, Block, Constant, Expr, ExternFunction, FieldDecl, Method, MethodBody,
    Package, Program, Stmt, StmtList, TypeTag, UnaryOp, VarDef,
};
use decaf_backend::interp::{ExecError, ExecOptions, Interpreter, Value};
use decaf_backend::Module;
use decaf_codegen::{
    compile_to_module, CodegenOptions, CodegenWarning, JumpOutsideLoop, MissingReturn,
};
use pretty_assertions::assert_eq;

// Program construction

fn program(fields: Vec<FieldDecl>, methods: Vec<Method>) -> Program {
    let externs = vec![
        ExternFunction::new("print_int", TypeTag::Void, &[TypeTag::Int32], 1),
        ExternFunction::new("print_string", TypeTag::Void, &[TypeTag::StringPtr], 1),
        ExternFunction::new("side", TypeTag::Bool1, &[TypeTag::Int32], 1),
    ];
    Program::new(
        StmtList::from(externs),
        Some(Package::new("Test", fields, methods, 1)),
    )
}

fn method(
    name: &str,
    ret: TypeTag,
    params: Vec<VarDef>,
    vars: Vec<VarDef>,
    stmts: Vec<Stmt>,
) -> Method {
    Method::new(name, ret, params, MethodBody::new(vars, stmts), 1)
}

fn int_var(name: &str) -> VarDef {
    VarDef::named(name, TypeTag::Int32, 1)
}

fn var(name: &str) -> Expr {
    Expr::var(name, 1)
}

fn int(v: i32) -> Expr {
    Expr::int(v, 1)
}

fn bin(op: BinaryOp, lhs: Expr, rhs: Expr) -> Expr {
    Expr::binary(op, lhs, rhs, 1)
}

fn call(name: &str, args: Vec<Expr>) -> Expr {
    Expr::call(name, args, 1)
}

fn print_int(value: Expr) -> Stmt {
    Stmt::call("print_int", vec![value], 1)
}

fn block(stmts: Vec<Stmt>) -> Block {
    Block::of(stmts)
}

// Execution

struct Outcome {
    result: Result<Option<Value>, ExecError>,
    printed: Vec<String>,
}

fn execute(module: &Module, entry: &str, args: &[Value]) -> Outcome {
    let printed = RefCell::new(Vec::new());
    let result = {
        let mut interp = Interpreter::new(module, ExecOptions::default());
        interp
            .bind("print_int", |host| {
                printed
                    .borrow_mut()
                    .push(host.int_arg(0).unwrap().to_string());
                None
            })
            .bind("print_string", |host| {
                printed.borrow_mut().push(host.string_arg(0).unwrap());
                None
            })
            .bind("side", |host| {
                printed
                    .borrow_mut()
                    .push(format!("side({})", host.int_arg(0).unwrap()));
                Some(Value::Bool(true))
            });
        interp.run(entry, args)
    };
    Outcome {
        result,
        printed: printed.into_inner(),
    }
}

fn compile(program: &Program) -> Module {
    let (module, output) = compile_to_module(program, &CodegenOptions::default()).unwrap();
    assert_eq!(output.warnings, vec![]);
    module
}

// Tests

#[test]
fn short_circuit_skips_the_right_operand() {
    let empty = || block(vec![]);
    let main = method(
        "main",
        TypeTag::Void,
        vec![],
        vec![],
        vec![
            Stmt::if_else(
                bin(BinaryOp::And, Expr::boolean(false, 1), call("side", vec![int(1)])),
                empty(),
                None,
                1,
            ),
            Stmt::if_else(
                bin(BinaryOp::Or, Expr::boolean(true, 1), call("side", vec![int(2)])),
                empty(),
                None,
                1,
            ),
            Stmt::if_else(
                bin(BinaryOp::And, Expr::boolean(true, 1), call("side", vec![int(3)])),
                block(vec![print_int(int(1))]),
                None,
                1,
            ),
            Stmt::if_else(
                bin(BinaryOp::Or, Expr::boolean(false, 1), call("side", vec![int(4)])),
                block(vec![print_int(int(2))]),
                None,
                1,
            ),
        ],
    );
    let module = compile(&program(vec![], vec![main]));
    let outcome = execute(&module, "main", &[]);
    assert_eq!(outcome.result, Ok(None));
    assert_eq!(outcome.printed, vec!["side(3)", "1", "side(4)", "2"]);
}

#[test]
fn forward_and_recursive_calls() {
    // int main() { return fact(5); }
    // int fact(int n) { if (n < 2) { return 1; } return n * fact(n - 1); }
    let main = method(
        "main",
        TypeTag::Int32,
        vec![],
        vec![],
        vec![Stmt::ret(Some(call("fact", vec![int(5)])), 1)],
    );
    let fact = method(
        "fact",
        TypeTag::Int32,
        vec![int_var("n")],
        vec![],
        vec![
            Stmt::if_else(
                bin(BinaryOp::Lt, var("n"), int(2)),
                block(vec![Stmt::ret(Some(int(1)), 1)]),
                None,
                1,
            ),
            Stmt::ret(
                Some(bin(
                    BinaryOp::Mul,
                    var("n"),
                    call("fact", vec![bin(BinaryOp::Sub, var("n"), int(1))]),
                )),
                1,
            ),
        ],
    );
    let module = compile(&program(vec![], vec![main, fact]));
    assert_eq!(execute(&module, "main", &[]).result, Ok(Some(Value::I32(120))));
}

#[test]
fn missing_return_is_synthesized_with_a_warning() {
    let program = program(
        vec![],
        vec![
            method("zero", TypeTag::Int32, vec![], vec![], vec![]),
            method("yes", TypeTag::Bool1, vec![], vec![], vec![]),
        ],
    );
    let (module, output) = compile_to_module(&program, &CodegenOptions::default()).unwrap();
    assert_eq!(
        output.warnings,
        vec![
            CodegenWarning::SynthesizedReturn {
                method: "zero".to_owned(),
                line: 1,
            },
            CodegenWarning::SynthesizedReturn {
                method: "yes".to_owned(),
                line: 1,
            },
        ]
    );
    assert_eq!(execute(&module, "zero", &[]).result, Ok(Some(Value::I32(0))));
    assert_eq!(execute(&module, "yes", &[]).result, Ok(Some(Value::Bool(true))));

    let strict = CodegenOptions::default().with_missing_return(MissingReturn::Error);
    assert_eq!(
        compile_to_module(&program, &strict).unwrap_err(),
        decaf_codegen::CodegenError::MissingReturn {
            method: "zero".to_owned()
        }
    );
}

#[test]
fn bools_widen_into_int_destinations() {
    // int x; int widen() { x = 3 < 4; print_int(2 > 1); return x == 1; }
    let widen = method(
        "widen",
        TypeTag::Int32,
        vec![],
        vec![],
        vec![
            Stmt::assign("x", bin(BinaryOp::Lt, int(3), int(4)), 1),
            print_int(bin(BinaryOp::Gt, int(2), int(1))),
            Stmt::ret(Some(bin(BinaryOp::Eq, var("x"), int(1))), 1),
        ],
    );
    let module = compile(&program(
        vec![FieldDecl::scalar("x", TypeTag::Int32, 1)],
        vec![widen],
    ));
    let outcome = execute(&module, "widen", &[]);
    assert_eq!(outcome.result, Ok(Some(Value::I32(1))));
    assert_eq!(outcome.printed, vec!["1"]);
}

#[test]
fn continue_in_for_still_runs_the_step() {
    // int odd_sum() { int i; int s;
    //   for (i = 0; i < 10; i = i + 1) { if (i % 2 == 0) { continue; } s = s + i; }
    //   return s; }
    let body = block(vec![
        Stmt::if_else(
            bin(
                BinaryOp::Eq,
                bin(BinaryOp::Mod, var("i"), int(2)),
                int(0),
            ),
            block(vec![Stmt::Continue { line: 1 }]),
            None,
            1,
        ),
        Stmt::assign("s", bin(BinaryOp::Add, var("s"), var("i")), 1),
    ]);
    let odd_sum = method(
        "odd_sum",
        TypeTag::Int32,
        vec![],
        vec![int_var("i"), int_var("s")],
        vec![
            Stmt::for_loop(
                vec![Assign::scalar("i", int(0), 1)],
                bin(BinaryOp::Lt, var("i"), int(10)),
                vec![Assign::scalar("i", bin(BinaryOp::Add, var("i"), int(1)), 1)],
                body,
                1,
            ),
            Stmt::ret(Some(var("s")), 1),
        ],
    );
    let module = compile(&program(vec![], vec![odd_sum]));
    assert_eq!(
        execute(&module, "odd_sum", &[]).result,
        Ok(Some(Value::I32(25)))
    );
}

#[test]
fn break_leaves_the_innermost_loop() {
    // int count() { int i; int n;
    //   while (i < 3) { while (true) { n = n + 1; break; } i = i + 1; }
    //   return n; }
    let inner = Stmt::while_loop(
        Expr::boolean(true, 1),
        block(vec![
            Stmt::assign("n", bin(BinaryOp::Add, var("n"), int(1)), 1),
            Stmt::Break { line: 1 },
            // Unreachable after the break; never lowered.
            Stmt::assign("n", int(100), 1),
        ]),
        1,
    );
    let outer = Stmt::while_loop(
        bin(BinaryOp::Lt, var("i"), int(3)),
        block(vec![
            inner,
            Stmt::assign("i", bin(BinaryOp::Add, var("i"), int(1)), 1),
        ]),
        1,
    );
    let count = method(
        "count",
        TypeTag::Int32,
        vec![],
        vec![int_var("i"), int_var("n")],
        vec![outer, Stmt::ret(Some(var("n")), 1)],
    );
    let module = compile(&program(vec![], vec![count]));
    assert_eq!(execute(&module, "count", &[]).result, Ok(Some(Value::I32(3))));
}

#[test]
fn jump_outside_loop_policy() {
    let program = program(
        vec![],
        vec![method(
            "main",
            TypeTag::Void,
            vec![],
            vec![],
            vec![Stmt::Break { line: 7 }, print_int(int(9))],
        )],
    );
    assert_eq!(
        compile_to_module(&program, &CodegenOptions::default()).unwrap_err(),
        decaf_codegen::CodegenError::JumpOutsideLoop {
            keyword: "break",
            line: 7,
        }
    );

    let lenient = CodegenOptions::default().with_jump_outside_loop(JumpOutsideLoop::Ignore);
    let (module, output) = compile_to_module(&program, &lenient).unwrap();
    assert_eq!(
        output.warnings,
        vec![CodegenWarning::IgnoredJump {
            keyword: "break",
            line: 7,
        }]
    );
    assert_eq!(execute(&module, "main", &[]).printed, vec!["9"]);
}

#[test]
fn globals_arrays_and_strings() {
    // int total = 40; int sq[4];
    // void fill() { int i; for (i = 0; i < 4; i = i + 1) { sq[i] = i * i; }
    //   total = total + sq[3]; print_string("done"); }
    let fill = method(
        "fill",
        TypeTag::Void,
        vec![],
        vec![int_var("i")],
        vec![
            Stmt::for_loop(
                vec![Assign::scalar("i", int(0), 1)],
                bin(BinaryOp::Lt, var("i"), int(4)),
                vec![Assign::scalar("i", bin(BinaryOp::Add, var("i"), int(1)), 1)],
                block(vec![Stmt::assign_element(
                    "sq",
                    var("i"),
                    bin(BinaryOp::Mul, var("i"), var("i")),
                    1,
                )]),
                1,
            ),
            Stmt::assign(
                "total",
                bin(BinaryOp::Add, var("total"), Expr::element("sq", int(3), 1)),
                1,
            ),
            Stmt::call(
                "print_string",
                vec![Expr::Constant(Constant::string("\"done\"", 1).unwrap())],
                1,
            ),
        ],
    );
    let poke = method(
        "poke",
        TypeTag::Void,
        vec![int_var("at")],
        vec![],
        vec![Stmt::assign_element("sq", var("at"), int(1), 1)],
    );
    let module = compile(&program(
        vec![
            FieldDecl::initialized("total", TypeTag::Int32, Constant::int(40, 1), 1),
            FieldDecl::array("sq", TypeTag::Int32, 4, 1),
        ],
        vec![fill, poke],
    ));

    let printed = RefCell::new(Vec::new());
    let mut interp = Interpreter::new(&module, ExecOptions::default());
    interp.bind("print_string", |host| {
        printed.borrow_mut().push(host.string_arg(0).unwrap());
        None
    });
    assert_eq!(interp.run("fill", &[]), Ok(None));
    assert_eq!(interp.global_value("total"), Some(Value::I32(49)));
    assert_eq!(interp.global_element("sq", 2), Some(Value::I32(4)));
    assert_eq!(
        interp.run("poke", &[Value::I32(4)]),
        Err(ExecError::OutOfBounds { offset: 4, len: 4 })
    );
    drop(interp);
    assert_eq!(printed.into_inner(), vec!["done"]);
}

#[test]
fn block_locals_shadow_and_reset() {
    // int x = 1;
    // int main() { int x; x = 5; { int x; x = 7; print_int(x); } return x; }
    let main = method(
        "main",
        TypeTag::Int32,
        vec![],
        vec![int_var("x")],
        vec![
            Stmt::assign("x", int(5), 1),
            Stmt::Block(Block::new(
                StmtList::from(vec![int_var("x")]),
                StmtList::from(vec![Stmt::assign("x", int(7), 1), print_int(var("x"))]),
            )),
            Stmt::ret(Some(var("x")), 1),
        ],
    );
    let module = compile(&program(
        vec![FieldDecl::initialized("x", TypeTag::Int32, Constant::int(1, 1), 1)],
        vec![main],
    ));
    let outcome = execute(&module, "main", &[]);
    assert_eq!(outcome.result, Ok(Some(Value::I32(5))));
    assert_eq!(outcome.printed, vec!["7"]);
}

#[test]
fn bools_widen_into_array_elements() {
    // int a[3]; int elem() { a[1] = 1 < 2; return a[1]; }
    let elem = method(
        "elem",
        TypeTag::Int32,
        vec![],
        vec![],
        vec![
            Stmt::assign_element("a", int(1), bin(BinaryOp::Lt, int(1), int(2)), 1),
            Stmt::ret(Some(Expr::element("a", int(1), 1)), 1),
        ],
    );
    let module = compile(&program(
        vec![FieldDecl::array("a", TypeTag::Int32, 3, 1)],
        vec![elem],
    ));
    assert!(module.to_string().contains(" = zext i1 "));

    let mut interp = Interpreter::new(&module, ExecOptions::default());
    assert_eq!(interp.run("elem", &[]), Ok(Some(Value::I32(1))));
    assert_eq!(interp.global_element("a", 1), Some(Value::I32(1)));
    assert_eq!(interp.global_element("a", 0), Some(Value::I32(0)));
}

#[test]
fn bool_initializer_widens_for_int_field() {
    // int g = true; int read() { return g; }
    let read = method(
        "read",
        TypeTag::Int32,
        vec![],
        vec![],
        vec![Stmt::ret(Some(var("g")), 1)],
    );
    let module = compile(&program(
        vec![FieldDecl::initialized(
            "g",
            TypeTag::Int32,
            Constant::boolean(true, 1),
            1,
        )],
        vec![read],
    ));
    assert!(module.to_string().contains("@g = global i32 1"));

    let mut interp = Interpreter::new(&module, ExecOptions::default());
    assert_eq!(interp.global_value("g"), Some(Value::I32(1)));
    assert_eq!(interp.run("read", &[]), Ok(Some(Value::I32(1))));
}

#[test]
fn bare_return_in_non_void_method_follows_policy() {
    // bool early() { return; print_int(1); }
    let program = program(
        vec![],
        vec![Method::new(
            "early",
            TypeTag::Bool1,
            vec![],
            MethodBody::new(
                vec![],
                vec![Stmt::ret(None, 4), Stmt::call("print_int", vec![int(1)], 5)],
            ),
            3,
        )],
    );
    let (module, output) = compile_to_module(&program, &CodegenOptions::default()).unwrap();
    assert_eq!(
        output.warnings,
        vec![CodegenWarning::SynthesizedReturn {
            method: "early".to_owned(),
            line: 4,
        }]
    );
    // Nothing after the return is lowered.
    assert!(!module.to_string().contains("call void @print_int"));

    let outcome = execute(&module, "early", &[]);
    assert_eq!(outcome.result, Ok(Some(Value::Bool(true))));
    assert_eq!(outcome.printed, Vec::<String>::new());

    let strict = CodegenOptions::default().with_missing_return(MissingReturn::Error);
    assert_eq!(
        compile_to_module(&program, &strict).unwrap_err(),
        decaf_codegen::CodegenError::MissingReturn {
            method: "early".to_owned()
        }
    );
}

#[test]
fn shifts_are_logical_and_not_is_one_bit() {
    // int shifts() { return (-8 >> 28) + (3 << 2); }
    // bool flip() { return !(2 < 1); }
    // bool flop() { return !(1 < 2); }
    let shifts = method(
        "shifts",
        TypeTag::Int32,
        vec![],
        vec![],
        vec![Stmt::ret(
            Some(bin(
                BinaryOp::Add,
                bin(BinaryOp::Shr, int(-8), int(28)),
                bin(BinaryOp::Shl, int(3), int(2)),
            )),
            1,
        )],
    );
    let not_of = |name: &str, lhs: i32, rhs: i32| {
        method(
            name,
            TypeTag::Bool1,
            vec![],
            vec![],
            vec![Stmt::ret(
                Some(Expr::unary(
                    UnaryOp::Not,
                    bin(BinaryOp::Lt, int(lhs), int(rhs)),
                    1,
                )),
                1,
            )],
        )
    };
    let module = compile(&program(
        vec![],
        vec![shifts, not_of("flip", 2, 1), not_of("flop", 1, 2)],
    ));
    let text = module.to_string();
    assert!(text.contains("lshr i32"));
    assert!(!text.contains("ashr"));

    assert_eq!(execute(&module, "shifts", &[]).result, Ok(Some(Value::I32(27))));
    assert_eq!(execute(&module, "flip", &[]).result, Ok(Some(Value::Bool(true))));
    assert_eq!(execute(&module, "flop", &[]).result, Ok(Some(Value::Bool(false))));
}
