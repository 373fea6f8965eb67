//! Expression tree for `DEFAULT (...)` and `CHECK (...)` clauses.
//!
//! Expressions are never evaluated; they are parsed so they can be
//! re-emitted in one canonical form (uppercase keywords, double-quoted
//! string literals, single spacing). Re-emission is what makes the
//! generator's output stable under re-parsing.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Not,
    Neg,
    Pos,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Or,
    And,
    Eq,
    NotEq,
    Lt,
    LtEq,
    Gt,
    GtEq,
    Like,
    Add,
    Sub,
    Mul,
    Div,
    Mod,
}

impl BinaryOp {
    fn as_sql(&self) -> &'static str {
        match self {
            BinaryOp::Or => "OR",
            BinaryOp::And => "AND",
            BinaryOp::Eq => "=",
            BinaryOp::NotEq => "!=",
            BinaryOp::Lt => "<",
            BinaryOp::LtEq => "<=",
            BinaryOp::Gt => ">",
            BinaryOp::GtEq => ">=",
            BinaryOp::Like => "LIKE",
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Mod => "%",
        }
    }
}

/// What an `IS` predicate tests against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IsPredicate {
    Null,
    True,
    False,
}

impl IsPredicate {
    fn as_sql(&self) -> &'static str {
        match self {
            IsPredicate::Null => "NULL",
            IsPredicate::True => "TRUE",
            IsPredicate::False => "FALSE",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expr {
    /// Possibly-dotted identifier path, original casing preserved.
    Ident(Vec<String>),
    Number(String),
    StringLit(String),
    Bool(bool),
    Null,
    Function {
        name: String,
        args: Vec<Expr>,
    },
    Unary {
        op: UnaryOp,
        expr: Box<Expr>,
    },
    Binary {
        left: Box<Expr>,
        op: BinaryOp,
        right: Box<Expr>,
    },
    Is {
        expr: Box<Expr>,
        negated: bool,
        predicate: IsPredicate,
    },
    InList {
        expr: Box<Expr>,
        negated: bool,
        list: Vec<Expr>,
    },
    Paren(Box<Expr>),
}

impl Expr {
    /// Canonical SQL text for this expression.
    pub fn sql(&self) -> String {
        match self {
            Expr::Ident(path) => path.join("."),
            Expr::Number(n) => n.clone(),
            Expr::StringLit(s) => format!("\"{}\"", s.replace('"', "\\\"")),
            Expr::Bool(true) => "TRUE".to_string(),
            Expr::Bool(false) => "FALSE".to_string(),
            Expr::Null => "NULL".to_string(),
            Expr::Function { name, args } => {
                let args: Vec<String> = args.iter().map(Expr::sql).collect();
                format!("{}({})", name, args.join(", "))
            }
            Expr::Unary { op, expr } => match op {
                UnaryOp::Not => format!("NOT {}", expr.sql()),
                UnaryOp::Neg => format!("-{}", expr.sql()),
                UnaryOp::Pos => format!("+{}", expr.sql()),
            },
            Expr::Binary { left, op, right } => {
                format!("{} {} {}", left.sql(), op.as_sql(), right.sql())
            }
            Expr::Is {
                expr,
                negated,
                predicate,
            } => {
                let not = if *negated { "NOT " } else { "" };
                format!("{} IS {}{}", expr.sql(), not, predicate.as_sql())
            }
            Expr::InList {
                expr,
                negated,
                list,
            } => {
                let not = if *negated { "NOT " } else { "" };
                let items: Vec<String> = list.iter().map(Expr::sql).collect();
                format!("{} {}IN ({})", expr.sql(), not, items.join(", "))
            }
            Expr::Paren(inner) => format!("({})", inner.sql()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn binary_and_comparison() {
        let expr = Expr::Binary {
            left: Box::new(Expr::Binary {
                left: Box::new(Expr::Ident(vec!["Price".into()])),
                op: BinaryOp::GtEq,
                right: Box::new(Expr::Number("0".into())),
            }),
            op: BinaryOp::And,
            right: Box::new(Expr::Binary {
                left: Box::new(Expr::Ident(vec!["Price".into()])),
                op: BinaryOp::LtEq,
                right: Box::new(Expr::Number("1000000".into())),
            }),
        };
        assert_eq!(expr.sql(), "Price >= 0 AND Price <= 1000000");
    }

    #[test]
    fn string_literals_use_double_quotes() {
        assert_eq!(Expr::StringLit("active".into()).sql(), "\"active\"");
        assert_eq!(Expr::StringLit("a\"b".into()).sql(), "\"a\\\"b\"");
    }

    #[test]
    fn function_call_without_args() {
        let expr = Expr::Function {
            name: "CURRENT_TIMESTAMP".into(),
            args: vec![],
        };
        assert_eq!(expr.sql(), "CURRENT_TIMESTAMP()");
    }

    #[test]
    fn is_and_in_predicates() {
        let is = Expr::Is {
            expr: Box::new(Expr::Ident(vec!["Email".into()])),
            negated: true,
            predicate: IsPredicate::Null,
        };
        assert_eq!(is.sql(), "Email IS NOT NULL");

        let in_list = Expr::InList {
            expr: Box::new(Expr::Ident(vec!["Status".into()])),
            negated: false,
            list: vec![
                Expr::StringLit("open".into()),
                Expr::StringLit("closed".into()),
            ],
        };
        assert_eq!(in_list.sql(), "Status IN (\"open\", \"closed\")");
    }
}
