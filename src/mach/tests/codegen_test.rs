use super::*;

#[test]
fn test_header() {
    let gen = Generator::new(Constants::new());
    assert_eq!(
        gen.instructions(),
        &[Instruction::Header, Instruction::CreateFrame]
    );
    assert_eq!(gen.finish().unwrap(), ".IFJcode17\nCREATEFRAME\n");
}

#[test]
fn test_assignment() {
    let c = Constants::new();
    let mut gen = Generator::new(c.clone());
    gen.announce(GenState::Assignment).unwrap();
    gen.announce(GenState::Expression).unwrap();
    let postfix = vec![int(&c, 1, 1), int(&c, 1, 2), op(1, Operator::Plus)];
    gen.expression(postfix).unwrap();
    assert_eq!(gen.end().unwrap(), GenState::Expression);
    gen.token(&var(1, "x")).unwrap();
    assert_eq!(gen.end().unwrap(), GenState::Assignment);
    assert_eq!(
        gen.instructions()[2..],
        [
            Instruction::Pushs(Operand::Constant(Constant::Integer(1))),
            Instruction::Pushs(Operand::Constant(Constant::Integer(2))),
            Instruction::Adds,
            Instruction::Pops("x".into()),
        ]
    );
    assert_eq!(
        body(gen),
        vec!["PUSHS int@1", "PUSHS int@2", "ADDS", "POPS x"]
    );
}

#[test]
fn test_state_stack_is_lifo() {
    let mut gen = Generator::new(Constants::new());
    assert_eq!(gen.state(), None);
    gen.announce(GenState::Assignment).unwrap();
    gen.announce(GenState::FunctionCall).unwrap();
    gen.announce(GenState::Expression).unwrap();
    assert_eq!(gen.depth(), 3);
    assert_eq!(gen.state(), Some(GenState::Expression));
    assert_eq!(gen.end().unwrap(), GenState::Expression);
    assert_eq!(gen.end().unwrap(), GenState::FunctionCall);
    assert_eq!(gen.end().unwrap(), GenState::Assignment);
    assert_eq!(gen.end().unwrap_err().code(), ErrorCode::InternalError);
}

#[test]
fn test_labels_are_unique_and_drain() {
    let mut gen = Generator::new(Constants::new());
    let a = gen.new_label().unwrap();
    let b = gen.new_label().unwrap();
    assert_ne!(a, b);
    assert_eq!(gen.pending_labels(), 2);
    gen.announce(GenState::Condition).unwrap();
    gen.end().unwrap();
    gen.announce(GenState::Condition).unwrap();
    gen.end().unwrap();
    assert_eq!(gen.pending_labels(), 0);
    assert_eq!(body(gen), vec![format!("LABEL {}", b), format!("LABEL {}", a)]);
}

#[test]
fn test_unplaced_label() {
    let mut gen = Generator::new(Constants::new());
    gen.new_label().unwrap();
    assert_eq!(gen.finish().unwrap_err().text(), "UNPLACED LABEL");
}

#[test]
fn test_unclosed_construct() {
    let mut gen = Generator::new(Constants::new());
    gen.announce(GenState::Print).unwrap();
    assert_eq!(gen.finish().unwrap_err().text(), "UNCLOSED Print");
}

fn logic(operator: Operator) -> Vec<String> {
    let c = Constants::new();
    let mut gen = Generator::new(c.clone());
    gen.announce(GenState::Condition).unwrap();
    gen.announce(GenState::Logic).unwrap();
    gen.announce(GenState::Expression).unwrap();
    gen.expression(vec![var(1, "a")]).unwrap();
    gen.end().unwrap();
    gen.announce(GenState::Expression).unwrap();
    gen.expression(vec![var(1, "b")]).unwrap();
    gen.end().unwrap();
    gen.token(&op(1, operator)).unwrap();
    gen.end().unwrap();
    gen.end().unwrap();
    body(gen)
}

#[test]
fn test_logic_jumps() {
    let head = ["PUSHS a", "PUSHS b"];
    let expect = |tail: &[&str]| -> Vec<String> {
        head.iter().chain(tail).map(|s| s.to_string()).collect()
    };
    assert_eq!(
        logic(Operator::Equal),
        expect(&["JUMPIFEQS $aaaa", "LABEL $aaaa"])
    );
    assert_eq!(
        logic(Operator::NotEqual),
        expect(&["JUMPIFNEQS $aaaa", "LABEL $aaaa"])
    );
    assert_eq!(
        logic(Operator::Greater),
        expect(&["GTS", "PUSHS bool@true", "JUMPIFEQS $aaaa", "LABEL $aaaa"])
    );
    assert_eq!(
        logic(Operator::LessEqual),
        expect(&["GTS", "PUSHS bool@true", "JUMPIFNEQS $aaaa", "LABEL $aaaa"])
    );
    assert_eq!(
        logic(Operator::Less),
        expect(&["LTS", "PUSHS bool@true", "JUMPIFEQS $aaaa", "LABEL $aaaa"])
    );
    assert_eq!(
        logic(Operator::GreaterEqual),
        expect(&["LTS", "PUSHS bool@true", "JUMPIFNEQS $aaaa", "LABEL $aaaa"])
    );
}

#[test]
fn test_logic_rejects_arithmetic() {
    let mut gen = Generator::new(Constants::new());
    gen.announce(GenState::Logic).unwrap();
    let e = gen.token(&op(4, Operator::Plus)).unwrap_err();
    assert_eq!(e.code(), ErrorCode::InternalError);
    assert_eq!(e.line_number(), Some(4));
}

#[test]
fn test_cycle() {
    let c = Constants::new();
    let mut gen = Generator::new(c.clone());
    gen.announce(GenState::Cycle).unwrap();
    gen.announce(GenState::Logic).unwrap();
    gen.announce(GenState::Expression).unwrap();
    gen.expression(vec![var(1, "i")]).unwrap();
    gen.end().unwrap();
    gen.announce(GenState::Expression).unwrap();
    gen.expression(vec![int(&c, 1, 10)]).unwrap();
    gen.end().unwrap();
    gen.token(&op(1, Operator::GreaterEqual)).unwrap();
    gen.end().unwrap();
    assert_eq!(gen.end().unwrap(), GenState::Cycle);
    assert_eq!(
        body(gen),
        vec![
            "LABEL $aaaa",
            "PUSHS i",
            "PUSHS int@10",
            "LTS",
            "PUSHS bool@true",
            "JUMPIFNEQS $aaab",
            "JUMP $aaaa",
            "LABEL $aaab",
        ]
    );
}

#[test]
fn test_else_branch() {
    let mut gen = Generator::new(Constants::new());
    gen.announce(GenState::Condition).unwrap();
    gen.announce(GenState::Logic).unwrap();
    gen.announce(GenState::Expression).unwrap();
    gen.expression(vec![var(1, "a")]).unwrap();
    gen.end().unwrap();
    gen.announce(GenState::Expression).unwrap();
    gen.expression(vec![var(1, "b")]).unwrap();
    gen.end().unwrap();
    gen.token(&op(1, Operator::NotEqual)).unwrap();
    gen.end().unwrap();
    gen.else_branch().unwrap();
    gen.end().unwrap();
    assert_eq!(
        body(gen),
        vec![
            "PUSHS a",
            "PUSHS b",
            "JUMPIFNEQS $aaaa",
            "JUMP $aaab",
            "LABEL $aaaa",
            "LABEL $aaab",
        ]
    );
}

#[test]
fn test_else_outside_condition() {
    let mut gen = Generator::new(Constants::new());
    assert_eq!(
        gen.else_branch().unwrap_err().code(),
        ErrorCode::InternalError
    );
}

#[test]
fn test_declaration() {
    let mut gen = Generator::new(Constants::new());
    gen.announce(GenState::VariableDeclaration).unwrap();
    gen.token(&var(1, "s")).unwrap();
    gen.token(&Token::Keyword(1, Keyword::String)).unwrap();
    gen.end().unwrap();
    gen.announce(GenState::Input).unwrap();
    gen.token(&var(2, "s")).unwrap();
    gen.token(&Token::Keyword(2, Keyword::String)).unwrap();
    gen.end().unwrap();
    assert_eq!(
        body(gen),
        vec!["DEFVAR s", "PUSHS string@", "POPS s", "READ s string"]
    );
}

#[test]
fn test_second_name_in_declaration() {
    let mut gen = Generator::new(Constants::new());
    gen.announce(GenState::VariableDeclaration).unwrap();
    gen.token(&var(1, "a")).unwrap();
    let e = gen.token(&var(1, "b")).unwrap_err();
    assert_eq!(e.code(), ErrorCode::InternalError);
    assert_eq!(e.text(), "b HANDED WHILE a PENDING");
}

#[test]
fn test_nested_declaration_is_hoisted() {
    let c = Constants::new();
    let mut gen = Generator::new(c.clone());
    gen.announce(GenState::Cycle).unwrap();
    gen.announce(GenState::VariableDeclaration).unwrap();
    gen.token(&var(2, "t")).unwrap();
    gen.token(&Token::Keyword(2, Keyword::Double)).unwrap();
    gen.end().unwrap();
    gen.announce(GenState::Logic).unwrap();
    gen.announce(GenState::Expression).unwrap();
    gen.expression(vec![var(3, "t")]).unwrap();
    gen.end().unwrap();
    gen.announce(GenState::Expression).unwrap();
    gen.expression(vec![int(&c, 3, 1)]).unwrap();
    gen.end().unwrap();
    gen.token(&op(3, Operator::NotEqual)).unwrap();
    gen.end().unwrap();
    gen.end().unwrap();
    assert_eq!(
        body(gen),
        vec![
            "DEFVAR t",
            "PUSHS float@0.0",
            "POPS t",
            "LABEL $aaaa",
            "PUSHS float@0.0",
            "POPS t",
            "PUSHS t",
            "PUSHS int@1",
            "JUMPIFNEQS $aaab",
            "JUMP $aaaa",
            "LABEL $aaab",
        ]
    );
}

#[test]
fn test_input_without_type() {
    let mut gen = Generator::new(Constants::new());
    gen.announce(GenState::Input).unwrap();
    gen.token(&var(2, "n")).unwrap();
    let e = gen.end().unwrap_err();
    assert_eq!(e.code(), ErrorCode::InternalError);
    let mut gen = Generator::new(Constants::new());
    gen.announce(GenState::Input).unwrap();
    let e = gen.token(&Token::Keyword(2, Keyword::Integer)).unwrap_err();
    assert_eq!(e.code(), ErrorCode::InternalError);
}

#[test]
fn test_print() {
    let c = Constants::new();
    let mut gen = Generator::new(c.clone());
    gen.announce(GenState::Print).unwrap();
    gen.expression(vec![var(1, "x")]).unwrap();
    gen.expression(vec![int(&c, 1, 2), int(&c, 1, 3), op(1, Operator::Multiply)])
        .unwrap();
    gen.end().unwrap();
    assert_eq!(
        body(gen),
        vec![
            "DEFVAR $print",
            "PUSHS x",
            "POPS $print",
            "WRITE $print",
            "PUSHS int@2",
            "PUSHS int@3",
            "MULS",
            "POPS $print",
            "WRITE $print",
        ]
    );
}

#[test]
fn test_function_call() {
    let c = Constants::new();
    let mut gen = Generator::new(c.clone());
    gen.announce(GenState::Assignment).unwrap();
    gen.announce(GenState::FunctionCall).unwrap();
    gen.announce(GenState::Expression).unwrap();
    gen.expression(vec![int(&c, 1, 7)]).unwrap();
    gen.end().unwrap();
    gen.token(&var(1, "f")).unwrap();
    gen.end().unwrap();
    gen.token(&var(1, "y")).unwrap();
    gen.end().unwrap();
    assert_eq!(body(gen), vec!["PUSHS int@7", "CALL f", "POPS y"]);
}

#[test]
fn test_malformed_expression() {
    let c = Constants::new();
    for postfix in [
        vec![int(&c, 5, 1), op(5, Operator::Plus)],
        vec![int(&c, 5, 1), int(&c, 5, 2)],
        vec![],
        vec![var(5, "a"), var(5, "b"), op(5, Operator::Less)],
    ] {
        let mut gen = Generator::new(c.clone());
        gen.announce(GenState::Expression).unwrap();
        let e = gen.expression(postfix).unwrap_err();
        assert_eq!(e.code(), ErrorCode::InternalError);
        assert_eq!(e.text(), "MALFORMED EXPRESSION");
    }
}

#[test]
fn test_integer_division() {
    let c = Constants::new();
    let mut gen = Generator::new(c.clone());
    gen.announce(GenState::Expression).unwrap();
    let e = gen
        .expression(vec![int(&c, 3, 7), int(&c, 3, 2), op(3, Operator::DivideInt)])
        .unwrap_err();
    assert_eq!(e.code(), ErrorCode::SyntaxError);
    assert_eq!(e.line_number(), Some(3));
}

#[test]
fn test_expression_in_wrong_state() {
    let mut gen = Generator::new(Constants::new());
    gen.announce(GenState::Assignment).unwrap();
    let e = gen.expression(vec![var(1, "a")]).unwrap_err();
    assert_eq!(e.code(), ErrorCode::InternalError);
}
