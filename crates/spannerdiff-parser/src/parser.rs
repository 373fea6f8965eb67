use spannerdiff_core::{
    Column, Constraint, Index, ReferenceAction, RowDeletionPolicy, Schema, Table,
};

use crate::error::ParseError;
use crate::expr::{BinaryOp, Expr, IsPredicate, UnaryOp};
use crate::lexer::{Lexer, Pos};
use crate::stmt::{AlterTableOp, Statement};
use crate::token::Token;

/// Parses a concatenation of semicolon-terminated DDL statements into a
/// schema. Only `CREATE TABLE` and `CREATE [UNIQUE] [NULL_FILTERED] INDEX`
/// contribute; every other statement is skipped so dumps containing newer
/// constructs keep working. Empty or whitespace-only input yields an empty
/// schema.
pub fn parse_schema(ddls: &str) -> Result<Schema, ParseError> {
    let mut schema = Schema::new();
    for stmt in parse_statements(ddls)? {
        match stmt {
            Statement::CreateTable(table) => schema.insert_table(table),
            Statement::CreateIndex(index) => schema.insert_index(index),
            _ => {}
        }
    }
    Ok(schema)
}

/// Parses every statement in the input, including the `ALTER`/`DROP` forms
/// the generator itself emits.
pub fn parse_statements(ddls: &str) -> Result<Vec<Statement>, ParseError> {
    Parser::new(ddls)?.parse_all()
}

struct Parser {
    tokens: Vec<(Token, Pos)>,
    pos: usize,
}

impl Parser {
    fn new(input: &str) -> Result<Self, ParseError> {
        Ok(Parser {
            tokens: Lexer::new(input).tokenize()?,
            pos: 0,
        })
    }

    fn parse_all(&mut self) -> Result<Vec<Statement>, ParseError> {
        let mut statements = Vec::new();
        loop {
            while *self.peek() == Token::Semicolon {
                self.advance();
            }
            if *self.peek() == Token::Eof {
                return Ok(statements);
            }
            statements.push(self.parse_statement()?);
        }
    }

    fn parse_statement(&mut self) -> Result<Statement, ParseError> {
        if self.peek_kw("CREATE") {
            if self.peek_kw_at(1, "TABLE") {
                return self.parse_create_table();
            }
            if self.peek_kw_at(1, "INDEX")
                || self.peek_kw_at(1, "UNIQUE")
                || self.peek_kw_at(1, "NULL_FILTERED")
            {
                return self.parse_create_index();
            }
            return Ok(self.skip_statement());
        }
        if self.peek_kw("ALTER") && self.peek_kw_at(1, "TABLE") {
            return self.parse_alter_table();
        }
        if self.peek_kw("DROP") {
            if self.peek_kw_at(1, "TABLE") {
                self.advance();
                self.advance();
                self.skip_if_exists();
                let table = self.parse_object_name()?;
                self.end_statement()?;
                return Ok(Statement::DropTable { table });
            }
            if self.peek_kw_at(1, "INDEX") {
                self.advance();
                self.advance();
                self.skip_if_exists();
                let name = self.parse_object_name()?;
                self.end_statement()?;
                return Ok(Statement::DropIndex { name });
            }
            return Ok(self.skip_statement());
        }
        Ok(self.skip_statement())
    }

    // ---- CREATE TABLE -------------------------------------------------

    fn parse_create_table(&mut self) -> Result<Statement, ParseError> {
        self.advance(); // CREATE
        self.advance(); // TABLE
        self.skip_if_not_exists();
        let name = self.parse_object_name()?;
        let mut table = Table::new(name);

        self.expect(Token::LeftParen, "'('")?;
        let mut inline_pk: Vec<String> = Vec::new();
        let mut order = 0usize;
        loop {
            if *self.peek() == Token::RightParen {
                break;
            }
            if self.at_table_constraint() {
                self.parse_table_constraint(&mut table)?;
            } else {
                let (column, is_inline_pk) = self.parse_column_def(order)?;
                order += 1;
                if is_inline_pk {
                    inline_pk.push(column.name.clone());
                }
                table.columns.insert(column.name.clone(), column);
            }
            if !self.eat(&Token::Comma) {
                break;
            }
        }
        self.expect(Token::RightParen, "')'")?;

        if self.eat_kw("PRIMARY") {
            self.expect_kw("KEY")?;
            table.primary_key = self.parse_key_list()?;
        }
        if table.primary_key.is_empty() {
            table.primary_key = inline_pk;
        }

        while *self.peek() == Token::Comma {
            self.advance();
            if self.eat_kw("INTERLEAVE") {
                self.expect_kw("IN")?;
                self.expect_kw("PARENT")?;
                table.parent_table = Some(self.parse_object_name()?);
                if self.eat_kw("ON") {
                    self.expect_kw("DELETE")?;
                    table.on_delete = Some(self.parse_reference_action()?);
                }
            } else if self.eat_kw("ROW") {
                self.expect_kw("DELETION")?;
                self.expect_kw("POLICY")?;
                table.row_deletion_policy = Some(self.parse_row_deletion_policy()?);
            } else {
                return Err(self.error_here("expected INTERLEAVE or ROW DELETION POLICY"));
            }
        }

        self.end_statement()?;
        Ok(Statement::CreateTable(table))
    }

    fn at_table_constraint(&self) -> bool {
        if self.peek_kw("CONSTRAINT") && matches!(self.peek_at(1), Token::Ident(_)) {
            return true;
        }
        if self.peek_kw("FOREIGN") && self.peek_kw_at(1, "KEY") {
            return true;
        }
        if self.peek_kw("CHECK") && *self.peek_at(1) == Token::LeftParen {
            return true;
        }
        false
    }

    /// Parses one table constraint and inserts it. Unnamed constraints get
    /// a synthesized `CK_<table>_<n>` / `FK_<table>_<n>` name where n is
    /// the number of constraints seen so far.
    fn parse_table_constraint(&mut self, table: &mut Table) -> Result<(), ParseError> {
        let start = self.current_pos();
        let name = if self.eat_kw("CONSTRAINT") {
            Some(self.expect_ident("constraint name")?)
        } else {
            None
        };

        if self.eat_kw("CHECK") {
            self.expect(Token::LeftParen, "'('")?;
            let expr = self.parse_expr()?;
            self.expect(Token::RightParen, "')'")?;
            let name = name.unwrap_or_else(|| format!("CK_{}_{}", table.name, table.constraints.len()));
            table.constraints.insert(
                name.clone(),
                Constraint::Check {
                    name,
                    expr: format!("({})", expr.sql()),
                },
            );
            return Ok(());
        }

        if self.eat_kw("FOREIGN") {
            self.expect_kw("KEY")?;
            let columns = self.parse_name_list()?;
            self.expect_kw("REFERENCES")?;
            let ref_table = self.parse_object_name()?;
            let ref_columns = self.parse_name_list()?;
            let on_delete = if self.eat_kw("ON") {
                self.expect_kw("DELETE")?;
                Some(self.parse_reference_action()?)
            } else {
                None
            };
            if columns.len() != ref_columns.len() {
                return Err(ParseError::at(
                    start,
                    format!(
                        "foreign key declares {} columns but references {}",
                        columns.len(),
                        ref_columns.len()
                    ),
                ));
            }
            let name = name.unwrap_or_else(|| format!("FK_{}_{}", table.name, table.constraints.len()));
            table.constraints.insert(
                name.clone(),
                Constraint::ForeignKey {
                    name,
                    columns,
                    ref_table,
                    ref_columns,
                    on_delete,
                },
            );
            return Ok(());
        }

        Err(self.error_here("expected CHECK or FOREIGN KEY"))
    }

    fn parse_column_def(&mut self, order: usize) -> Result<(Column, bool), ParseError> {
        let name = self.expect_ident("column name")?;
        let r#type = self.parse_column_type()?;
        let mut column = Column {
            name,
            r#type,
            not_null: false,
            default_expr: None,
            options: None,
            order,
        };
        let mut inline_pk = false;
        loop {
            if self.peek_kw("NOT") && self.peek_kw_at(1, "NULL") {
                self.advance();
                self.advance();
                column.not_null = true;
            } else if self.eat_kw("DEFAULT") {
                self.expect(Token::LeftParen, "'('")?;
                let expr = self.parse_expr()?;
                self.expect(Token::RightParen, "')'")?;
                column.default_expr = Some(format!("({})", expr.sql()));
            } else if self.peek_kw("OPTIONS") {
                column.options = Some(self.parse_options_clause()?);
            } else if self.peek_kw("PRIMARY") && self.peek_kw_at(1, "KEY") {
                self.advance();
                self.advance();
                inline_pk = true;
            } else {
                break;
            }
        }
        Ok((column, inline_pk))
    }

    fn parse_column_type(&mut self) -> Result<String, ParseError> {
        let pos = self.current_pos();
        let word = self.expect_ident("column type")?;
        let upper = word.to_ascii_uppercase();
        match upper.as_str() {
            "BOOL" | "INT64" | "FLOAT64" | "DATE" | "TIMESTAMP" | "JSON" | "NUMERIC" => Ok(upper),
            "STRING" | "BYTES" => {
                self.expect(Token::LeftParen, "'('")?;
                let size = self.parse_type_size()?;
                self.expect(Token::RightParen, "')'")?;
                Ok(format!("{upper}({size})"))
            }
            "ARRAY" => {
                self.expect(Token::LessThan, "'<'")?;
                let inner_pos = self.current_pos();
                let inner = self.parse_column_type()?;
                if inner.starts_with("ARRAY<") {
                    return Err(ParseError::at(inner_pos, "arrays of arrays are not supported"));
                }
                self.expect(Token::GreaterThan, "'>'")?;
                Ok(format!("ARRAY<{inner}>"))
            }
            _ => Err(ParseError::at(pos, format!("unknown column type {word}"))),
        }
    }

    fn parse_type_size(&mut self) -> Result<String, ParseError> {
        match self.advance() {
            (Token::Number(n), _) => Ok(n),
            (Token::Ident(s), _) if s.eq_ignore_ascii_case("MAX") => Ok("MAX".to_string()),
            (token, pos) => Err(ParseError::at(
                pos,
                format!("expected a length or MAX, found {token}"),
            )),
        }
    }

    fn parse_options_clause(&mut self) -> Result<String, ParseError> {
        self.expect_kw("OPTIONS")?;
        self.expect(Token::LeftParen, "'('")?;
        let mut pairs = Vec::new();
        if *self.peek() != Token::RightParen {
            loop {
                let key = self.expect_ident("option name")?;
                self.expect(Token::Equal, "'='")?;
                let value = match self.advance() {
                    (Token::Ident(word), _) => {
                        // Keyword values are canonically lowercase.
                        if word.eq_ignore_ascii_case("true")
                            || word.eq_ignore_ascii_case("false")
                            || word.eq_ignore_ascii_case("null")
                        {
                            word.to_ascii_lowercase()
                        } else {
                            word
                        }
                    }
                    (Token::Number(n), _) => n,
                    (Token::String(s), _) => format!("\"{s}\""),
                    (token, pos) => {
                        return Err(ParseError::at(
                            pos,
                            format!("expected an option value, found {token}"),
                        ));
                    }
                };
                pairs.push(format!("{key}={value}"));
                if !self.eat(&Token::Comma) {
                    break;
                }
            }
        }
        self.expect(Token::RightParen, "')'")?;
        Ok(format!("OPTIONS ({})", pairs.join(", ")))
    }

    fn parse_row_deletion_policy(&mut self) -> Result<RowDeletionPolicy, ParseError> {
        self.expect(Token::LeftParen, "'('")?;
        self.expect_kw("OLDER_THAN")?;
        self.expect(Token::LeftParen, "'('")?;
        let column = self.expect_ident("column name")?;
        self.expect(Token::Comma, "','")?;
        self.expect_kw("INTERVAL")?;
        let num_days = match self.advance() {
            (Token::Number(n), pos) => n
                .parse::<i64>()
                .map_err(|_| ParseError::at(pos, format!("invalid day count {n}")))?,
            (token, pos) => {
                return Err(ParseError::at(pos, format!("expected a day count, found {token}")));
            }
        };
        self.expect_kw("DAY")?;
        self.expect(Token::RightParen, "')'")?;
        self.expect(Token::RightParen, "')'")?;
        Ok(RowDeletionPolicy { column, num_days })
    }

    fn parse_reference_action(&mut self) -> Result<ReferenceAction, ParseError> {
        if self.eat_kw("CASCADE") {
            return Ok(ReferenceAction::Cascade);
        }
        if self.eat_kw("NO") {
            self.expect_kw("ACTION")?;
            return Ok(ReferenceAction::NoAction);
        }
        Err(self.error_here("expected CASCADE or NO ACTION"))
    }

    // ---- CREATE INDEX -------------------------------------------------

    fn parse_create_index(&mut self) -> Result<Statement, ParseError> {
        self.advance(); // CREATE
        let unique = self.eat_kw("UNIQUE");
        let null_filtered = self.eat_kw("NULL_FILTERED");
        self.expect_kw("INDEX")?;
        self.skip_if_not_exists();
        let name = self.parse_object_name()?;
        self.expect_kw("ON")?;
        let table_name = self.parse_object_name()?;
        let columns = self.parse_key_list()?;
        let storing = if self.eat_kw("STORING") {
            self.parse_name_list()?
        } else {
            Vec::new()
        };
        // An index interleave clause is accepted but not modeled.
        if *self.peek() == Token::Comma {
            self.advance();
            self.expect_kw("INTERLEAVE")?;
            self.expect_kw("IN")?;
            self.parse_object_name()?;
        }
        self.end_statement()?;
        Ok(Statement::CreateIndex(Index {
            name,
            table_name,
            columns,
            unique,
            null_filtered,
            storing,
        }))
    }

    // ---- ALTER TABLE --------------------------------------------------

    fn parse_alter_table(&mut self) -> Result<Statement, ParseError> {
        self.advance(); // ALTER
        self.advance(); // TABLE
        let table = self.parse_object_name()?;

        if self.peek_kw("ADD") {
            if self.peek_kw_at(1, "COLUMN") {
                self.advance();
                self.advance();
                let (column, _) = self.parse_column_def(0)?;
                self.end_statement()?;
                return Ok(Statement::AlterTable {
                    table,
                    op: AlterTableOp::AddColumn(column),
                });
            }
            if self.peek_kw_at(1, "CONSTRAINT") {
                self.advance();
                let mut scratch = Table::new(table.clone());
                self.parse_table_constraint(&mut scratch)?;
                self.end_statement()?;
                if let Some(constraint) = scratch.constraints.into_values().next() {
                    return Ok(Statement::AlterTable {
                        table,
                        op: AlterTableOp::AddConstraint(constraint),
                    });
                }
                return Ok(Statement::Ignored);
            }
            return Ok(self.skip_statement());
        }

        if self.peek_kw("DROP") {
            if self.peek_kw_at(1, "COLUMN") {
                self.advance();
                self.advance();
                let column = self.expect_ident("column name")?;
                self.end_statement()?;
                return Ok(Statement::AlterTable {
                    table,
                    op: AlterTableOp::DropColumn(column),
                });
            }
            if self.peek_kw_at(1, "CONSTRAINT") {
                self.advance();
                self.advance();
                let name = self.expect_ident("constraint name")?;
                self.end_statement()?;
                return Ok(Statement::AlterTable {
                    table,
                    op: AlterTableOp::DropConstraint(name),
                });
            }
            return Ok(self.skip_statement());
        }

        if self.peek_kw("ALTER") && self.peek_kw_at(1, "COLUMN") {
            self.advance();
            self.advance();
            let column = self.expect_ident("column name")?;
            if self.peek_kw("SET") {
                // SET OPTIONS / SET DEFAULT forms are outside the subset.
                return Ok(self.skip_statement());
            }
            let new_type = self.parse_column_type()?;
            let mut not_null = false;
            let mut default_expr = None;
            loop {
                if self.peek_kw("NOT") && self.peek_kw_at(1, "NULL") {
                    self.advance();
                    self.advance();
                    not_null = true;
                } else if self.eat_kw("DEFAULT") {
                    self.expect(Token::LeftParen, "'('")?;
                    let expr = self.parse_expr()?;
                    self.expect(Token::RightParen, "')'")?;
                    default_expr = Some(format!("({})", expr.sql()));
                } else {
                    break;
                }
            }
            self.end_statement()?;
            return Ok(Statement::AlterTable {
                table,
                op: AlterTableOp::AlterColumn {
                    column,
                    new_type,
                    not_null,
                    default_expr,
                },
            });
        }

        Ok(self.skip_statement())
    }

    // ---- Expressions --------------------------------------------------

    fn parse_expr(&mut self) -> Result<Expr, ParseError> {
        self.parse_or()
    }

    fn parse_or(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_and()?;
        while self.eat_kw("OR") {
            let right = self.parse_and()?;
            left = Expr::Binary {
                left: Box::new(left),
                op: BinaryOp::Or,
                right: Box::new(right),
            };
        }
        Ok(left)
    }

    fn parse_and(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_not()?;
        while self.eat_kw("AND") {
            let right = self.parse_not()?;
            left = Expr::Binary {
                left: Box::new(left),
                op: BinaryOp::And,
                right: Box::new(right),
            };
        }
        Ok(left)
    }

    fn parse_not(&mut self) -> Result<Expr, ParseError> {
        if self.eat_kw("NOT") {
            let expr = self.parse_not()?;
            return Ok(Expr::Unary {
                op: UnaryOp::Not,
                expr: Box::new(expr),
            });
        }
        self.parse_comparison()
    }

    fn parse_comparison(&mut self) -> Result<Expr, ParseError> {
        let left = self.parse_additive()?;

        if self.eat_kw("IS") {
            let negated = self.eat_kw("NOT");
            let predicate = if self.eat_kw("NULL") {
                IsPredicate::Null
            } else if self.eat_kw("TRUE") {
                IsPredicate::True
            } else if self.eat_kw("FALSE") {
                IsPredicate::False
            } else {
                return Err(self.error_here("expected NULL, TRUE, or FALSE after IS"));
            };
            return Ok(Expr::Is {
                expr: Box::new(left),
                negated,
                predicate,
            });
        }

        if self.peek_kw("NOT") && self.peek_kw_at(1, "IN") {
            self.advance();
            self.advance();
            let list = self.parse_expr_list()?;
            return Ok(Expr::InList {
                expr: Box::new(left),
                negated: true,
                list,
            });
        }
        if self.eat_kw("IN") {
            let list = self.parse_expr_list()?;
            return Ok(Expr::InList {
                expr: Box::new(left),
                negated: false,
                list,
            });
        }
        if self.eat_kw("LIKE") {
            let right = self.parse_additive()?;
            return Ok(Expr::Binary {
                left: Box::new(left),
                op: BinaryOp::Like,
                right: Box::new(right),
            });
        }

        let op = match self.peek() {
            Token::Equal => BinaryOp::Eq,
            Token::NotEqual => BinaryOp::NotEq,
            Token::LessThan => BinaryOp::Lt,
            Token::LessThanOrEqual => BinaryOp::LtEq,
            Token::GreaterThan => BinaryOp::Gt,
            Token::GreaterThanOrEqual => BinaryOp::GtEq,
            _ => return Ok(left),
        };
        self.advance();
        let right = self.parse_additive()?;
        Ok(Expr::Binary {
            left: Box::new(left),
            op,
            right: Box::new(right),
        })
    }

    fn parse_additive(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_multiplicative()?;
        loop {
            let op = match self.peek() {
                Token::Plus => BinaryOp::Add,
                Token::Minus => BinaryOp::Sub,
                _ => return Ok(left),
            };
            self.advance();
            let right = self.parse_multiplicative()?;
            left = Expr::Binary {
                left: Box::new(left),
                op,
                right: Box::new(right),
            };
        }
    }

    fn parse_multiplicative(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_unary()?;
        loop {
            let op = match self.peek() {
                Token::Asterisk => BinaryOp::Mul,
                Token::Slash => BinaryOp::Div,
                Token::Percent => BinaryOp::Mod,
                _ => return Ok(left),
            };
            self.advance();
            let right = self.parse_unary()?;
            left = Expr::Binary {
                left: Box::new(left),
                op,
                right: Box::new(right),
            };
        }
    }

    fn parse_unary(&mut self) -> Result<Expr, ParseError> {
        let op = match self.peek() {
            Token::Minus => UnaryOp::Neg,
            Token::Plus => UnaryOp::Pos,
            _ => return self.parse_primary(),
        };
        self.advance();
        let expr = self.parse_unary()?;
        Ok(Expr::Unary {
            op,
            expr: Box::new(expr),
        })
    }

    fn parse_primary(&mut self) -> Result<Expr, ParseError> {
        match self.advance() {
            (Token::LeftParen, _) => {
                let inner = self.parse_expr()?;
                self.expect(Token::RightParen, "')'")?;
                Ok(Expr::Paren(Box::new(inner)))
            }
            (Token::Number(n), _) => Ok(Expr::Number(n)),
            (Token::String(s), _) => Ok(Expr::StringLit(s)),
            (Token::Ident(word), _) => {
                if word.eq_ignore_ascii_case("TRUE") {
                    return Ok(Expr::Bool(true));
                }
                if word.eq_ignore_ascii_case("FALSE") {
                    return Ok(Expr::Bool(false));
                }
                if word.eq_ignore_ascii_case("NULL") {
                    return Ok(Expr::Null);
                }
                if *self.peek() == Token::LeftParen {
                    self.advance();
                    let mut args = Vec::new();
                    if *self.peek() != Token::RightParen {
                        loop {
                            args.push(self.parse_expr()?);
                            if !self.eat(&Token::Comma) {
                                break;
                            }
                        }
                    }
                    self.expect(Token::RightParen, "')'")?;
                    return Ok(Expr::Function { name: word, args });
                }
                let mut path = vec![word];
                while *self.peek() == Token::Period {
                    self.advance();
                    path.push(self.expect_ident("identifier")?);
                }
                Ok(Expr::Ident(path))
            }
            (token, pos) => Err(ParseError::at(
                pos,
                format!("unexpected token in expression: {token}"),
            )),
        }
    }

    fn parse_expr_list(&mut self) -> Result<Vec<Expr>, ParseError> {
        self.expect(Token::LeftParen, "'('")?;
        let mut list = Vec::new();
        loop {
            list.push(self.parse_expr()?);
            if !self.eat(&Token::Comma) {
                break;
            }
        }
        self.expect(Token::RightParen, "')'")?;
        Ok(list)
    }

    // ---- Shared pieces ------------------------------------------------

    /// `( name [, name]* )`
    fn parse_name_list(&mut self) -> Result<Vec<String>, ParseError> {
        self.expect(Token::LeftParen, "'('")?;
        let mut names = Vec::new();
        loop {
            names.push(self.expect_ident("column name")?);
            if !self.eat(&Token::Comma) {
                break;
            }
        }
        self.expect(Token::RightParen, "')'")?;
        Ok(names)
    }

    /// Like `parse_name_list` but tolerates `ASC` / `DESC` suffixes, which
    /// are not modeled.
    fn parse_key_list(&mut self) -> Result<Vec<String>, ParseError> {
        self.expect(Token::LeftParen, "'('")?;
        let mut names = Vec::new();
        loop {
            names.push(self.expect_ident("column name")?);
            if self.peek_kw("ASC") || self.peek_kw("DESC") {
                self.advance();
            }
            if !self.eat(&Token::Comma) {
                break;
            }
        }
        self.expect(Token::RightParen, "')'")?;
        Ok(names)
    }

    /// A possibly-dotted object name; only the last segment identifies the
    /// object.
    fn parse_object_name(&mut self) -> Result<String, ParseError> {
        let mut name = self.expect_ident("name")?;
        while *self.peek() == Token::Period {
            self.advance();
            name = self.expect_ident("name")?;
        }
        Ok(name)
    }

    fn skip_if_not_exists(&mut self) {
        if self.peek_kw("IF") && self.peek_kw_at(1, "NOT") && self.peek_kw_at(2, "EXISTS") {
            self.advance();
            self.advance();
            self.advance();
        }
    }

    fn skip_if_exists(&mut self) {
        if self.peek_kw("IF") && self.peek_kw_at(1, "EXISTS") {
            self.advance();
            self.advance();
        }
    }

    fn skip_statement(&mut self) -> Statement {
        while !matches!(self.peek(), Token::Semicolon | Token::Eof) {
            self.advance();
        }
        Statement::Ignored
    }

    fn end_statement(&mut self) -> Result<(), ParseError> {
        match self.peek() {
            Token::Semicolon => {
                self.advance();
                Ok(())
            }
            Token::Eof => Ok(()),
            token => Err(self.error_here(format!("expected ';', found {token}"))),
        }
    }

    // ---- Token plumbing -----------------------------------------------

    fn peek(&self) -> &Token {
        self.peek_at(0)
    }

    fn peek_at(&self, n: usize) -> &Token {
        self.tokens
            .get(self.pos + n)
            .map(|(t, _)| t)
            .unwrap_or(&Token::Eof)
    }

    fn current_pos(&self) -> Pos {
        self.tokens
            .get(self.pos)
            .or_else(|| self.tokens.last())
            .map(|(_, p)| *p)
            .unwrap_or(Pos { line: 1, column: 1 })
    }

    fn advance(&mut self) -> (Token, Pos) {
        let entry = self
            .tokens
            .get(self.pos)
            .cloned()
            .unwrap_or((Token::Eof, Pos { line: 1, column: 1 }));
        if self.pos < self.tokens.len() {
            self.pos += 1;
        }
        entry
    }

    fn eat(&mut self, token: &Token) -> bool {
        if self.peek() == token {
            self.advance();
            return true;
        }
        false
    }

    fn expect(&mut self, token: Token, what: &str) -> Result<(), ParseError> {
        let (found, pos) = self.advance();
        if found == token {
            Ok(())
        } else {
            Err(ParseError::at(pos, format!("expected {what}, found {found}")))
        }
    }

    fn expect_ident(&mut self, what: &str) -> Result<String, ParseError> {
        match self.advance() {
            (Token::Ident(name), _) => Ok(name),
            (token, pos) => Err(ParseError::at(pos, format!("expected {what}, found {token}"))),
        }
    }

    fn peek_kw(&self, kw: &str) -> bool {
        self.peek_kw_at(0, kw)
    }

    fn peek_kw_at(&self, n: usize, kw: &str) -> bool {
        matches!(self.peek_at(n), Token::Ident(word) if word.eq_ignore_ascii_case(kw))
    }

    fn eat_kw(&mut self, kw: &str) -> bool {
        if self.peek_kw(kw) {
            self.advance();
            return true;
        }
        false
    }

    fn expect_kw(&mut self, kw: &str) -> Result<(), ParseError> {
        let (found, pos) = self.advance();
        match &found {
            Token::Ident(word) if word.eq_ignore_ascii_case(kw) => Ok(()),
            _ => Err(ParseError::at(pos, format!("expected {kw}, found {found}"))),
        }
    }

    fn error_here(&self, message: impl Into<String>) -> ParseError {
        ParseError::at(self.current_pos(), message)
    }
}
