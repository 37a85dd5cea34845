use crate::BinaryOp::*;
use crate::{BinaryOp, TruthTable};
use std::collections::{HashMap, HashSet};
use std::convert::TryFrom;
use std::fmt::{Display, Formatter};
use std::iter::Peekable;
use std::str::Chars;

/// **(internal)** A parsed `.bnet` update function whose variables are still referenced
/// by name, i.e. it has not been integrated into a `BooleanNetwork` yet.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub(crate) enum FnExpression {
    Const(bool),
    Var(String),
    Not(Box<FnExpression>),
    Binary(BinaryOp, Box<FnExpression>, Box<FnExpression>),
}

use FnExpression::*;

impl TryFrom<&str> for FnExpression {
    type Error = String;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let tokens = tokenize_function_group(&mut value.chars().peekable(), true)?;
        Ok(*(parse_update_function(&tokens)?))
    }
}

impl FnExpression {
    /// Write all variables that appear in the function to the given set.
    pub fn dump_variables(&self, result: &mut HashSet<String>) {
        match self {
            Binary(_, l, r) => {
                l.dump_variables(result);
                r.dump_variables(result)
            }
            Not(inner) => inner.dump_variables(result),
            Var(name) => {
                result.insert(name.clone());
            }
            Const(_) => {}
        }
    }

    /// Evaluate the expression, reading variable values using `valuation`.
    pub fn evaluate<F>(&self, valuation: &F) -> bool
    where
        F: Fn(&str) -> bool,
    {
        match self {
            Const(value) => *value,
            Var(name) => valuation(name),
            Not(inner) => !inner.evaluate(valuation),
            Binary(op, l, r) => op.apply(l.evaluate(valuation), r.evaluate(valuation)),
        }
    }

    /// Tabulate the expression over the given inputs: the `i`-th name in `inputs` is the
    /// `i`-th input of the resulting `TruthTable`.
    ///
    /// Fails if the expression uses a variable that is not an input.
    pub fn tabulate(&self, inputs: &[String]) -> Result<TruthTable, String> {
        let position: HashMap<&str, usize> = inputs
            .iter()
            .enumerate()
            .map(|(i, name)| (name.as_str(), i))
            .collect();
        let mut used = HashSet::new();
        self.dump_variables(&mut used);
        if let Some(unknown) = used.iter().find(|name| !position.contains_key(name.as_str())) {
            return Err(format!("Variable `{}` is not an input of the function.", unknown));
        }
        TruthTable::from_fn(inputs.len(), |values| {
            self.evaluate(&|name: &str| values[position[name]])
        })
    }
}

impl Display for FnExpression {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Const(value) => write!(f, "{}", u8::from(*value)),
            Var(name) => write!(f, "{}", name),
            Not(inner) => write!(f, "!{}", inner),
            Binary(op, l, r) => write!(f, "({} {} {})", l, op, r),
        }
    }
}

/// **(internal)** An enum of possible tokens occurring in a string representation of
/// a `.bnet` update function.
#[derive(Debug, Eq, PartialEq)]
enum Token {
    Not,                // '!'
    And,                // '&'
    Or,                 // '|'
    Xor,                // '^'
    Imp,                // '=>'
    Iff,                // '<=>'
    Name(String),       // 'name'
    Tokens(Vec<Token>), // A block of tokens inside parentheses
}

/// **(internal)** Process a peekable iterator of characters into a vector of `Token`s.
///
/// The outer method always consumes the opening parenthesis and the recursive call consumes the
/// closing parenthesis. Use `top_level` to indicate that there will be no closing parenthesis.
fn tokenize_function_group(
    data: &mut Peekable<Chars>,
    top_level: bool,
) -> Result<Vec<Token>, String> {
    let mut output = Vec::new();
    while let Some(c) = data.next() {
        match c {
            c if c.is_whitespace() => { /* Skip whitespace */ }
            // single char tokens
            '!' => output.push(Token::Not),
            '&' => output.push(Token::And),
            '|' => output.push(Token::Or),
            '^' => output.push(Token::Xor),
            '=' => {
                if Some('>') == data.next() {
                    output.push(Token::Imp);
                } else {
                    return Err("Expected '>' after '='.".to_string());
                }
            }
            '<' => {
                if Some('=') == data.next() {
                    if Some('>') == data.next() {
                        output.push(Token::Iff)
                    } else {
                        return Err("Expected '>' after '='.".to_string());
                    }
                } else {
                    return Err("Expected '=' after '<'.".to_string());
                }
            }
            ')' => {
                return if !top_level {
                    Ok(output)
                } else {
                    Err("Unexpected ')'.".to_string())
                };
            }
            '(' => {
                // start a nested token group
                let tokens = tokenize_function_group(data, false)?;
                output.push(Token::Tokens(tokens));
            }
            c if is_valid_in_name(c) => {
                // start of a variable name
                let mut name = vec![c];
                while let Some(c) = data.peek() {
                    if c.is_whitespace() || !is_valid_in_name(*c) {
                        break;
                    } else {
                        name.push(*c);
                        data.next(); // advance iterator
                    }
                }
                output.push(Token::Name(name.into_iter().collect()));
            }
            _ => return Err(format!("Unexpected '{}'.", c)),
        }
    }
    if top_level {
        Ok(output)
    } else {
        Err("Expected ')'.".to_string())
    }
}

/// **(internal)** Check if given char can appear in a name.
fn is_valid_in_name(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '.'
}

/// **(internal)** Parse a `FnExpression` using the recursive steps.
fn parse_update_function(data: &[Token]) -> Result<Box<FnExpression>, String> {
    iff(data)
}

/// **(internal)** Utility method to find first occurrence of a specific token in the token tree.
fn index_of_first(data: &[Token], token: Token) -> Option<usize> {
    data.iter().position(|t| *t == token)
}

/// **(internal)** Recursive parsing step 1: extract `<=>` operators.
fn iff(data: &[Token]) -> Result<Box<FnExpression>, String> {
    let iff_token = index_of_first(data, Token::Iff);
    Ok(if let Some(i) = iff_token {
        Box::new(Binary(Iff, imp(&data[..i])?, iff(&data[(i + 1)..])?))
    } else {
        imp(data)?
    })
}

/// **(internal)** Recursive parsing step 2: extract `=>` operators.
fn imp(data: &[Token]) -> Result<Box<FnExpression>, String> {
    let imp_token = index_of_first(data, Token::Imp);
    Ok(if let Some(i) = imp_token {
        Box::new(Binary(Imp, or(&data[..i])?, imp(&data[(i + 1)..])?))
    } else {
        or(data)?
    })
}

/// **(internal)** Recursive parsing step 3: extract `|` operators.
fn or(data: &[Token]) -> Result<Box<FnExpression>, String> {
    let or_token = index_of_first(data, Token::Or);
    Ok(if let Some(i) = or_token {
        Box::new(Binary(Or, and(&data[..i])?, or(&data[(i + 1)..])?))
    } else {
        and(data)?
    })
}

/// **(internal)** Recursive parsing step 4: extract `&` operators.
fn and(data: &[Token]) -> Result<Box<FnExpression>, String> {
    let and_token = index_of_first(data, Token::And);
    Ok(if let Some(i) = and_token {
        Box::new(Binary(And, xor(&data[..i])?, and(&data[(i + 1)..])?))
    } else {
        xor(data)?
    })
}

/// **(internal)** Recursive parsing step 5: extract `^` operators.
fn xor(data: &[Token]) -> Result<Box<FnExpression>, String> {
    let xor_token = index_of_first(data, Token::Xor);
    Ok(if let Some(i) = xor_token {
        Box::new(Binary(Xor, terminal(&data[..i])?, xor(&data[(i + 1)..])?))
    } else {
        terminal(data)?
    })
}

/// **(internal)** Recursive parsing step 6: extract terminals and negations.
fn terminal(data: &[Token]) -> Result<Box<FnExpression>, String> {
    if data.is_empty() {
        return Err("Expected formula, found nothing.".to_string());
    }
    if data[0] == Token::Not {
        return Ok(Box::new(Not(terminal(&data[1..])?)));
    }
    if data.len() == 1 {
        // This should be either a name or a parenthesis group, anything else does not make sense.
        match &data[0] {
            Token::Name(name) => {
                return if name == "true" || name == "1" {
                    Ok(Box::new(Const(true)))
                } else if name == "false" || name == "0" {
                    Ok(Box::new(Const(false)))
                } else {
                    Ok(Box::new(Var(name.clone())))
                };
            }
            Token::Tokens(inner) => return parse_update_function(inner),
            _ => {} // otherwise, fall through to the error at the end.
        }
    }
    Err(format!("Unexpected: {:?}. Expecting formula.", data))
}
