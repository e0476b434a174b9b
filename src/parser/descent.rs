use super::ast::{
    BinaryOp, Block, Call, Compound, FunctionDecl, Node, Param, Program, RoutineKind, TypeName,
    TypeSpec, UnaryOp, Var, VarDecl,
};
use crate::error::{Error, Result};
use crate::lexer::{Lexer, Token, TokenKind};

/// Name given to programs written without a `PROGRAM name;` header
pub const DEFAULT_PROGRAM_NAME: &str = "main";

/// Recursive-descent parser for minipas
///
/// Pulls tokens from the [`Lexer`] on demand. Every rule aborts on the first
/// mismatch; there is no error recovery.
pub struct Parser {
    lexer: Lexer,
}

impl Parser {
    /// Creates a parser reading from the given lexer
    pub fn new(lexer: Lexer) -> Self {
        Parser { lexer }
    }

    /// Creates a parser over newline-stripped source lines
    pub fn from_lines<S: AsRef<str>>(lines: &[S]) -> Self {
        Parser::new(Lexer::new(lines))
    }

    /// Parses a complete program followed by end of input
    pub fn parse(&mut self) -> Result<Program> {
        let program = self.program()?;
        self.eat(TokenKind::Eof)?;
        Ok(program)
    }

    /// Parses a lone expression followed by end of input
    pub fn parse_expression(&mut self) -> Result<Node> {
        let node = self.expression()?;
        self.eat(TokenKind::Eof)?;
        Ok(node)
    }

    // program := (PROGRAM variable SEMI)? block DOT
    fn program(&mut self) -> Result<Program> {
        let name = if self.check(&TokenKind::Program)? {
            self.advance()?;
            let name = self.variable()?.name;
            self.eat(TokenKind::Semi)?;
            name
        } else {
            DEFAULT_PROGRAM_NAME.to_string()
        };

        let block = self.block()?;
        self.eat(TokenKind::Dot)?;
        Ok(Program { name, block })
    }

    // block := declarations compoundStatement
    fn block(&mut self) -> Result<Block> {
        let declarations = self.declarations()?;
        let body = self.compound_statement()?;
        Ok(Block { declarations, body })
    }

    // declarations := (VAR (variableDecl SEMI)+)? routineDecl*
    fn declarations(&mut self) -> Result<Vec<Node>> {
        let mut nodes = Vec::new();

        if self.check(&TokenKind::Var)? {
            self.advance()?;
            loop {
                nodes.extend(self.variable_declaration()?.into_iter().map(Node::VarDecl));
                self.eat(TokenKind::Semi)?;
                if !self.check_identifier()? {
                    break;
                }
            }
        }

        loop {
            let kind = match self.peek_kind()? {
                TokenKind::Function => RoutineKind::Function,
                TokenKind::Procedure => RoutineKind::Procedure,
                _ => break,
            };
            nodes.push(Node::FunctionDecl(self.routine_declaration(kind)?));
        }

        Ok(nodes)
    }

    // routineDecl := (FUNCTION | PROCEDURE) ID (LEFT_PAREN formalParams RIGHT_PAREN)?
    //                (COLON typeSpec)? SEMI block SEMI
    fn routine_declaration(&mut self, kind: RoutineKind) -> Result<FunctionDecl> {
        self.advance()?; // FUNCTION / PROCEDURE
        let name = self.variable()?.name;

        let mut params = Vec::new();
        if self.check(&TokenKind::LeftParen)? {
            self.advance()?;
            params = self.formal_parameter_list()?;
            self.eat(TokenKind::RightParen)?;
        }

        let mut return_type = None;
        if kind == RoutineKind::Function && self.check(&TokenKind::Colon)? {
            self.advance()?;
            return_type = Some(self.type_spec()?);
        }

        self.eat(TokenKind::Semi)?;
        let block = self.block()?;
        self.eat(TokenKind::Semi)?;

        Ok(FunctionDecl {
            name,
            kind,
            params,
            return_type,
            block,
        })
    }

    // variableDecl := ID (COMMA ID)* COLON typeSpec
    fn variable_declaration(&mut self) -> Result<Vec<VarDecl>> {
        let (vars, type_spec) = self.typed_names()?;
        Ok(vars
            .into_iter()
            .map(|var| VarDecl { var, type_spec })
            .collect())
    }

    // formalParams := formalParam (SEMI formalParam)*
    fn formal_parameter_list(&mut self) -> Result<Vec<Param>> {
        let mut params = self.formal_parameter()?;
        while self.check(&TokenKind::Semi)? {
            self.advance()?;
            params.extend(self.formal_parameter()?);
        }
        Ok(params)
    }

    // formalParam := ID (COMMA ID)* COLON typeSpec
    fn formal_parameter(&mut self) -> Result<Vec<Param>> {
        let (vars, type_spec) = self.typed_names()?;
        Ok(vars
            .into_iter()
            .map(|var| Param { var, type_spec })
            .collect())
    }

    fn typed_names(&mut self) -> Result<(Vec<Var>, TypeSpec)> {
        let mut vars = vec![self.variable()?];
        while self.check(&TokenKind::Comma)? {
            self.advance()?;
            vars.push(self.variable()?);
        }
        self.eat(TokenKind::Colon)?;
        let type_spec = self.type_spec()?;
        Ok((vars, type_spec))
    }

    // typeSpec := INTEGER | BOOLEAN
    fn type_spec(&mut self) -> Result<TypeSpec> {
        let name = match self.peek_kind()? {
            TokenKind::Integer => TypeName::Integer,
            TokenKind::Boolean => TypeName::Boolean,
            _ => return Err(self.expected_error("type")?),
        };
        self.advance()?;
        Ok(TypeSpec { name })
    }

    // compoundStatement := BEGIN statementList END
    fn compound_statement(&mut self) -> Result<Compound> {
        self.eat(TokenKind::Begin)?;
        let children = self.statement_list()?;
        self.eat(TokenKind::End)?;
        Ok(Compound { children })
    }

    // statementList := statement (SEMI statement)*
    fn statement_list(&mut self) -> Result<Vec<Node>> {
        let mut nodes = vec![self.statement()?];
        while self.check(&TokenKind::Semi)? {
            self.advance()?;
            nodes.push(self.statement()?);
        }

        // An identifier here means a statement separator is missing
        let next = self.lexer.peek(1)?;
        if let TokenKind::Identifier(name) = next.kind {
            return Err(Error::MissingSeparator {
                name,
                line: next.line,
                column: next.column,
            });
        }

        Ok(nodes)
    }

    // statement := compoundStatement | callStatement | assignment | empty
    fn statement(&mut self) -> Result<Node> {
        match self.peek_kind()? {
            TokenKind::Begin => Ok(Node::Compound(self.compound_statement()?)),
            TokenKind::Identifier(_) => {
                if self.is_call_ahead()? {
                    Ok(Node::Call(self.call()?))
                } else {
                    self.assignment()
                }
            }
            _ => Ok(Node::NoOp),
        }
    }

    // assignment := variable ASSIGN expression
    fn assignment(&mut self) -> Result<Node> {
        let target = self.variable()?;
        self.eat(TokenKind::Assign)?;
        let value = self.expression()?;
        Ok(Node::Assign {
            target,
            value: Box::new(value),
        })
    }

    // call := ID LEFT_PAREN (expression (COMMA expression)*)? RIGHT_PAREN
    fn call(&mut self) -> Result<Call> {
        let name = self.variable()?.name;
        self.eat(TokenKind::LeftParen)?;

        let mut args = Vec::new();
        if !self.check(&TokenKind::RightParen)? {
            args.push(self.expression()?);
            while self.check(&TokenKind::Comma)? {
                self.advance()?;
                args.push(self.expression()?);
            }
        }

        self.eat(TokenKind::RightParen)?;
        Ok(Call { name, args })
    }

    // expression := comparison
    fn expression(&mut self) -> Result<Node> {
        self.comparison()
    }

    // comparison := orExpr ((EQUAL | NOT_EQUAL) orExpr)*
    fn comparison(&mut self) -> Result<Node> {
        self.binary_tier(Self::or_expr, |kind| match kind {
            TokenKind::Equal => Some(BinaryOp::Eq),
            TokenKind::NotEqual => Some(BinaryOp::NotEq),
            _ => None,
        })
    }

    // orExpr := andExpr (OR andExpr)*
    fn or_expr(&mut self) -> Result<Node> {
        self.binary_tier(Self::and_expr, |kind| match kind {
            TokenKind::Or => Some(BinaryOp::Or),
            _ => None,
        })
    }

    // andExpr := relational (AND relational)*
    fn and_expr(&mut self) -> Result<Node> {
        self.binary_tier(Self::relational, |kind| match kind {
            TokenKind::And => Some(BinaryOp::And),
            _ => None,
        })
    }

    // relational := addSub ((LESS | LESS_EQUAL | GREATER | GREATER_EQUAL) addSub)*
    fn relational(&mut self) -> Result<Node> {
        self.binary_tier(Self::add_sub, |kind| match kind {
            TokenKind::Less => Some(BinaryOp::Lt),
            TokenKind::LessEqual => Some(BinaryOp::LtEq),
            TokenKind::Greater => Some(BinaryOp::Gt),
            TokenKind::GreaterEqual => Some(BinaryOp::GtEq),
            _ => None,
        })
    }

    // addSub := mulDiv ((PLUS | MINUS) mulDiv)*
    fn add_sub(&mut self) -> Result<Node> {
        self.binary_tier(Self::mul_div, |kind| match kind {
            TokenKind::Plus => Some(BinaryOp::Add),
            TokenKind::Minus => Some(BinaryOp::Sub),
            _ => None,
        })
    }

    // mulDiv := factor ((MULTIPLY | DIVIDE) factor)*
    fn mul_div(&mut self) -> Result<Node> {
        self.binary_tier(Self::factor, |kind| match kind {
            TokenKind::Multiply => Some(BinaryOp::Mul),
            TokenKind::Divide => Some(BinaryOp::Div),
            _ => None,
        })
    }

    /// Left-associative loop shared by every binary precedence tier
    fn binary_tier(
        &mut self,
        operand: fn(&mut Self) -> Result<Node>,
        operator: fn(&TokenKind) -> Option<BinaryOp>,
    ) -> Result<Node> {
        let mut node = operand(self)?;
        while let Some(op) = operator(&self.peek_kind()?) {
            self.advance()?;
            let right = operand(self)?;
            node = Node::binary(op, node, right);
        }
        Ok(node)
    }

    // factor := (PLUS | MINUS | NOT) factor | INTEGER_CONST | TRUE | FALSE
    //         | LEFT_PAREN expression RIGHT_PAREN | call | variable
    fn factor(&mut self) -> Result<Node> {
        let unary = match self.peek_kind()? {
            TokenKind::Plus => Some(UnaryOp::Plus),
            TokenKind::Minus => Some(UnaryOp::Minus),
            TokenKind::Not => Some(UnaryOp::Not),
            _ => None,
        };
        if let Some(op) = unary {
            self.advance()?;
            return Ok(Node::unary(op, self.factor()?));
        }

        match self.peek_kind()? {
            TokenKind::IntegerConst(n) => {
                self.advance()?;
                Ok(Node::Num(n))
            }
            TokenKind::True => {
                self.advance()?;
                Ok(Node::Boolean(true))
            }
            TokenKind::False => {
                self.advance()?;
                Ok(Node::Boolean(false))
            }
            TokenKind::LeftParen => {
                self.advance()?;
                let node = self.expression()?;
                self.eat(TokenKind::RightParen)?;
                Ok(node)
            }
            TokenKind::Identifier(_) => {
                if self.is_call_ahead()? {
                    Ok(Node::Call(self.call()?))
                } else {
                    Ok(Node::Var(self.variable()?))
                }
            }
            _ => Err(self.expected_error("expression")?),
        }
    }

    fn variable(&mut self) -> Result<Var> {
        let token = self.lexer.next_token()?;
        match token.kind {
            TokenKind::Identifier(name) => Ok(Var { name }),
            other => Err(Error::UnexpectedToken {
                expected: "identifier".to_string(),
                found: other.describe(),
                line: token.line,
                column: token.column,
            }),
        }
    }

    // Helper methods

    /// Consumes the next token, failing if it is not of the expected kind
    fn eat(&mut self, expected: TokenKind) -> Result<Token> {
        let token = self.lexer.next_token()?;
        if token.kind.same_kind(&expected) {
            Ok(token)
        } else {
            Err(Error::UnexpectedToken {
                expected: expected.describe(),
                found: token.kind.describe(),
                line: token.line,
                column: token.column,
            })
        }
    }

    fn advance(&mut self) -> Result<Token> {
        self.lexer.next_token()
    }

    fn peek_kind(&mut self) -> Result<TokenKind> {
        Ok(self.lexer.peek(1)?.kind)
    }

    fn check(&mut self, kind: &TokenKind) -> Result<bool> {
        Ok(self.peek_kind()?.same_kind(kind))
    }

    fn check_identifier(&mut self) -> Result<bool> {
        Ok(matches!(self.peek_kind()?, TokenKind::Identifier(_)))
    }

    /// Two-token lookahead: `ID (` starts a call
    fn is_call_ahead(&mut self) -> Result<bool> {
        Ok(self.lexer.peek(2)?.kind == TokenKind::LeftParen)
    }

    fn expected_error(&mut self, expected: &str) -> Result<Error> {
        let token = self.lexer.peek(1)?;
        Ok(Error::UnexpectedToken {
            expected: expected.to_string(),
            found: token.kind.describe(),
            line: token.line,
            column: token.column,
        })
    }
}
