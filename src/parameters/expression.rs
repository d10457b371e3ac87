//! Tie expressions.
//!
//! A tied parameter takes its value from an algebraic expression of other
//! parameters, e.g. `p[0] * 2` or `SHIFT0 + 1.5`. Expressions are parsed once
//! with nom and evaluated against the full parameter vector after every
//! update made by the solver.

use nom::{
    branch::alt,
    bytes::complete::tag,
    character::complete::{alpha1, alphanumeric1, char, digit1, multispace0},
    combinator::{map, map_res, opt, recognize, value},
    multi::{fold_many0, many0, separated_list0},
    number::complete::double,
    sequence::{delimited, pair, preceded},
    IResult, Parser,
};
use std::collections::HashMap;
use thiserror::Error;

/// Error that can occur during expression parsing or evaluation
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ExpressionError {
    #[error("Failed to parse expression '{input}': {message}")]
    ParseError { input: String, message: String },

    #[error("Undefined variable: {name}")]
    UndefinedVariable { name: String },

    #[error("Parameter index {index} out of range ({len} parameters)")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("Division by zero")]
    DivisionByZero,

    #[error("Invalid operation: {message}")]
    InvalidOperation { message: String },

    #[error("Undefined function: {name}")]
    UndefinedFunction { name: String },
}

type ExprResult<T> = Result<T, ExpressionError>;

/// Expression AST node
#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    Number(f64),

    /// Parameter referenced by display name (`AMP0`)
    Variable(String),

    /// Parameter referenced by flat index (`p[3]`)
    Index(usize),

    Neg(Box<Expression>),

    Binary(BinaryOp, Box<Expression>, Box<Expression>),

    Function(String, Vec<Expression>),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Pow,
}

/// Values that an expression can refer to.
pub trait EvaluationContext {
    fn by_index(&self, index: usize) -> ExprResult<f64>;

    fn by_name(&self, name: &str) -> ExprResult<f64>;
}

/// Evaluation context over a parameter vector and its display names.
#[derive(Debug, Clone)]
pub struct ParameterContext<'a> {
    values: &'a [f64],
    names: &'a HashMap<String, usize>,
}

impl<'a> ParameterContext<'a> {
    pub fn new(values: &'a [f64], names: &'a HashMap<String, usize>) -> Self {
        Self { values, names }
    }
}

impl EvaluationContext for ParameterContext<'_> {
    fn by_index(&self, index: usize) -> ExprResult<f64> {
        self.values
            .get(index)
            .copied()
            .ok_or(ExpressionError::IndexOutOfRange {
                index,
                len: self.values.len(),
            })
    }

    fn by_name(&self, name: &str) -> ExprResult<f64> {
        let index = self
            .names
            .get(name)
            .ok_or_else(|| ExpressionError::UndefinedVariable {
                name: name.to_string(),
            })?;
        self.by_index(*index)
    }
}

impl EvaluationContext for HashMap<String, f64> {
    fn by_index(&self, index: usize) -> ExprResult<f64> {
        Err(ExpressionError::IndexOutOfRange { index, len: 0 })
    }

    fn by_name(&self, name: &str) -> ExprResult<f64> {
        self.get(name)
            .copied()
            .ok_or_else(|| ExpressionError::UndefinedVariable {
                name: name.to_string(),
            })
    }
}

impl Expression {
    /// Parse an expression from a string
    pub fn parse(input: &str) -> ExprResult<Self> {
        match expr_parser(input.trim()) {
            Ok((remainder, expr)) if remainder.trim().is_empty() => Ok(expr),
            Ok((remainder, _)) => Err(ExpressionError::ParseError {
                input: input.to_string(),
                message: format!("unexpected trailing characters '{}'", remainder),
            }),
            Err(e) => Err(ExpressionError::ParseError {
                input: input.to_string(),
                message: format!("{:?}", e),
            }),
        }
    }

    /// Evaluate the expression with the given context
    pub fn evaluate<C: EvaluationContext>(&self, context: &C) -> ExprResult<f64> {
        match self {
            Self::Number(n) => Ok(*n),
            Self::Variable(name) => context.by_name(name),
            Self::Index(index) => context.by_index(*index),
            Self::Neg(expr) => Ok(-expr.evaluate(context)?),
            Self::Binary(op, left, right) => {
                let lhs = left.evaluate(context)?;
                let rhs = right.evaluate(context)?;

                match op {
                    BinaryOp::Add => Ok(lhs + rhs),
                    BinaryOp::Sub => Ok(lhs - rhs),
                    BinaryOp::Mul => Ok(lhs * rhs),
                    BinaryOp::Div if rhs == 0.0 => Err(ExpressionError::DivisionByZero),
                    BinaryOp::Div => Ok(lhs / rhs),
                    BinaryOp::Pow => Ok(lhs.powf(rhs)),
                }
            }
            Self::Function(name, args) => {
                let values = args
                    .iter()
                    .map(|arg| arg.evaluate(context))
                    .collect::<ExprResult<Vec<f64>>>()?;
                call_function(name, &values)
            }
        }
    }

    /// Parameter indices and names referenced by the expression.
    pub fn references(&self) -> (Vec<usize>, Vec<String>) {
        let mut indices = Vec::new();
        let mut names = Vec::new();
        self.collect_references(&mut indices, &mut names);
        indices.sort_unstable();
        indices.dedup();
        names.sort();
        names.dedup();
        (indices, names)
    }

    fn collect_references(&self, indices: &mut Vec<usize>, names: &mut Vec<String>) {
        match self {
            Self::Number(_) => {}
            Self::Variable(name) => names.push(name.clone()),
            Self::Index(index) => indices.push(*index),
            Self::Neg(expr) => expr.collect_references(indices, names),
            Self::Binary(_, left, right) => {
                left.collect_references(indices, names);
                right.collect_references(indices, names);
            }
            Self::Function(_, args) => {
                for arg in args {
                    arg.collect_references(indices, names);
                }
            }
        }
    }
}

fn call_function(name: &str, args: &[f64]) -> ExprResult<f64> {
    let one_arg = |f: fn(f64) -> f64| -> ExprResult<f64> {
        match args {
            [x] => Ok(f(*x)),
            _ => Err(ExpressionError::InvalidOperation {
                message: format!("{}() requires 1 argument, got {}", name, args.len()),
            }),
        }
    };

    match name {
        "sin" => one_arg(f64::sin),
        "cos" => one_arg(f64::cos),
        "tan" => one_arg(f64::tan),
        "exp" => one_arg(f64::exp),
        "log" | "ln" => one_arg(f64::ln),
        "log10" => one_arg(f64::log10),
        "sqrt" => one_arg(f64::sqrt),
        "abs" => one_arg(f64::abs),
        "max" | "min" if args.len() < 2 => Err(ExpressionError::InvalidOperation {
            message: format!("{}() requires at least 2 arguments, got {}", name, args.len()),
        }),
        "max" => Ok(args.iter().copied().fold(f64::NEG_INFINITY, f64::max)),
        "min" => Ok(args.iter().copied().fold(f64::INFINITY, f64::min)),
        _ => Err(ExpressionError::UndefinedFunction {
            name: name.to_string(),
        }),
    }
}

// Parser functions using nom

/// `c` surrounded by optional whitespace.
fn symbol<'a>(c: char) -> impl Parser<&'a str, Output = char, Error = nom::error::Error<&'a str>> {
    delimited(multispace0, char(c), multispace0)
}

fn identifier(input: &str) -> IResult<&str, &str> {
    recognize(pair(
        alt((alpha1, tag("_"))),
        many0(alt((alphanumeric1, tag("_")))),
    ))
    .parse(input)
}

fn number(input: &str) -> IResult<&str, Expression> {
    let (input, value) = double(input)?;
    Ok((input, Expression::Number(value)))
}

/// `p[<digits>]`
fn index_ref(input: &str) -> IResult<&str, Expression> {
    map_res(
        delimited(
            tag("p["),
            delimited(multispace0, digit1, multispace0),
            char(']'),
        ),
        |digits: &str| digits.parse::<usize>().map(Expression::Index),
    )
    .parse(input)
}

/// Comma-separated function arguments, possibly none.
fn args_list(input: &str) -> IResult<&str, Vec<Expression>> {
    separated_list0(symbol(','), expr_parser).parse(input)
}

/// Name, optionally followed by a parenthesized argument list.
fn name_or_call(input: &str) -> IResult<&str, Expression> {
    let (input, (name, args)) = pair(
        identifier,
        opt(preceded(
            multispace0,
            delimited(char('('), args_list, preceded(multispace0, char(')'))),
        )),
    )
    .parse(input)?;

    let expr = match args {
        Some(args) => Expression::Function(name.to_string(), args),
        None => Expression::Variable(name.to_string()),
    };
    Ok((input, expr))
}

fn parens(input: &str) -> IResult<&str, Expression> {
    delimited(char('('), expr_parser, symbol(')')).parse(input)
}

/// Names go before numbers so `nan` or `inf` never read as literals.
fn primary(input: &str) -> IResult<&str, Expression> {
    preceded(multispace0, alt((parens, index_ref, name_or_call, number))).parse(input)
}

fn unary(input: &str) -> IResult<&str, Expression> {
    alt((
        map(preceded(symbol('-'), unary), |expr| {
            Expression::Neg(Box::new(expr))
        }),
        power,
    ))
    .parse(input)
}

/// Right-associative `^` (or `**`), binding tighter than unary minus on its left.
fn power(input: &str) -> IResult<&str, Expression> {
    let pow_op = delimited(multispace0, alt((tag("**"), tag("^"))), multispace0);
    let (input, (base, exponent)) = pair(primary, opt(preceded(pow_op, unary))).parse(input)?;

    let expr = match exponent {
        Some(exponent) => Expression::Binary(BinaryOp::Pow, Box::new(base), Box::new(exponent)),
        None => base,
    };
    Ok((input, expr))
}

fn term(input: &str) -> IResult<&str, Expression> {
    let (input, first) = unary(input)?;
    fold_many0(
        pair(
            alt((
                value(BinaryOp::Mul, symbol('*')),
                value(BinaryOp::Div, symbol('/')),
            )),
            unary,
        ),
        move || first.clone(),
        |acc, (op, rhs)| Expression::Binary(op, Box::new(acc), Box::new(rhs)),
    )
    .parse(input)
}

fn expr_parser(input: &str) -> IResult<&str, Expression> {
    let (input, first) = term(input)?;
    fold_many0(
        pair(
            alt((
                value(BinaryOp::Add, symbol('+')),
                value(BinaryOp::Sub, symbol('-')),
            )),
            term,
        ),
        move || first.clone(),
        |acc, (op, rhs)| Expression::Binary(op, Box::new(acc), Box::new(rhs)),
    )
    .parse(input)
}
