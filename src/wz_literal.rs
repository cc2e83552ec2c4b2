//! Parser for the ethics score payload.
//!
//! The agents log their scores as a Python dict literal, e.g.
//! `{'household': [0.5, 1, 2], "industry": (1.0, 0, 1)}`. Only what those
//! payloads use is accepted: string (or integer) keys mapping to flat
//! lists or tuples of numbers.

use indexmap::IndexMap;
use logos::Logos;

use crate::wz_interface::Number;

/// Category name to its score sequence, in payload order
pub type ScoreMap = IndexMap<String, Vec<Number>>;

#[derive(Logos, Debug, Clone, PartialEq)]
#[logos(skip r"[ \t\r\n]+")]
enum Token {
    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,
    #[token("[")]
    LBracket,
    #[token("]")]
    RBracket,
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token(":")]
    Colon,
    #[token(",")]
    Comma,

    #[regex(r"[+-]?[0-9]+", |lex| lex.slice().parse::<i64>().ok())]
    Int(i64),

    #[regex(r"[+-]?([0-9]+\.[0-9]*|\.[0-9]+)([eE][+-]?[0-9]+)?", |lex| lex.slice().parse::<f64>().ok())]
    #[regex(r"[+-]?[0-9]+[eE][+-]?[0-9]+", |lex| lex.slice().parse::<f64>().ok())]
    Float(f64),

    #[regex(r"'[^'\\]*'", |lex| unquote(lex.slice()))]
    #[regex(r#""[^"\\]*""#, |lex| unquote(lex.slice()))]
    Str(String),
}

fn unquote(quoted: &str) -> String {
    quoted[1..quoted.len() - 1].to_string()
}

/// Parse an ethics score payload into its categories
pub fn parse_scores(source: &str) -> Result<ScoreMap, String> {
    let mut tokens = Vec::new();
    for (token, span) in Token::lexer(source).spanned() {
        match token {
            Ok(token) => tokens.push(token),
            Err(()) => {
                return Err(format!(
                    "unexpected `{}` at offset {}",
                    &source[span.clone()],
                    span.start
                ))
            }
        }
    }

    let mut parser = Parser { tokens, pos: 0 };
    let scores = parser.mapping()?;
    if let Some(extra) = parser.peek() {
        return Err(format!("trailing {:?} after the mapping", extra));
    }
    Ok(scores)
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn bump(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos).cloned();
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn expect(&mut self, expected: Token) -> Result<(), String> {
        match self.bump() {
            Some(token) if token == expected => Ok(()),
            Some(token) => Err(format!("expected {:?}, found {:?}", expected, token)),
            None => Err(format!("expected {:?}, found end of input", expected)),
        }
    }

    fn mapping(&mut self) -> Result<ScoreMap, String> {
        self.expect(Token::LBrace)?;
        let mut scores = ScoreMap::new();

        loop {
            let key = match self.bump() {
                Some(Token::RBrace) => return Ok(scores),
                Some(Token::Str(key)) => key,
                Some(Token::Int(key)) => key.to_string(),
                Some(token) => return Err(format!("expected a category name, found {:?}", token)),
                None => return Err("unterminated mapping".to_string()),
            };
            self.expect(Token::Colon)?;
            let values = self.sequence()?;
            scores.insert(key, values);

            match self.bump() {
                Some(Token::Comma) => continue,
                Some(Token::RBrace) => return Ok(scores),
                Some(token) => return Err(format!("expected `,` or `}}`, found {:?}", token)),
                None => return Err("unterminated mapping".to_string()),
            }
        }
    }

    fn sequence(&mut self) -> Result<Vec<Number>, String> {
        let close = match self.bump() {
            Some(Token::LBracket) => Token::RBracket,
            Some(Token::LParen) => Token::RParen,
            Some(token) => return Err(format!("expected a list of scores, found {:?}", token)),
            None => return Err("missing score list".to_string()),
        };

        let mut values = Vec::new();
        loop {
            match self.bump() {
                Some(token) if token == close => return Ok(values),
                Some(Token::Int(v)) => values.push(Number::Int(v)),
                Some(Token::Float(v)) => values.push(Number::Float(v)),
                Some(token) => return Err(format!("expected a number, found {:?}", token)),
                None => return Err("unterminated score list".to_string()),
            }

            match self.bump() {
                Some(Token::Comma) => {}
                Some(token) if token == close => return Ok(values),
                Some(token) => return Err(format!("expected `,` in score list, found {:?}", token)),
                None => return Err("unterminated score list".to_string()),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_category() {
        let scores = parse_scores("{'A': [1, 0, 2]}").unwrap();
        assert_eq!(scores.len(), 1);
        assert_eq!(
            scores["A"],
            vec![Number::Int(1), Number::Int(0), Number::Int(2)]
        );
    }

    #[test]
    fn test_mixed_quotes_tuples_and_floats() {
        let scores = parse_scores(r#"{"household": (0.5, 1, 2.0), 'industry': [1e2, -3, .5],}"#).unwrap();
        let keys: Vec<_> = scores.keys().cloned().collect();
        assert_eq!(keys, vec!["household", "industry"]);
        assert_eq!(
            scores["household"],
            vec![Number::Float(0.5), Number::Int(1), Number::Float(2.0)]
        );
        assert_eq!(
            scores["industry"],
            vec![Number::Float(100.0), Number::Int(-3), Number::Float(0.5)]
        );
    }

    #[test]
    fn test_empty_mapping() {
        assert!(parse_scores(" {} ").unwrap().is_empty());
    }

    #[test]
    fn test_trailing_whitespace_and_newline() {
        let scores = parse_scores("{'A': [1, 0, 2]}\n").unwrap();
        assert_eq!(scores.len(), 1);
    }

    #[test]
    fn test_malformed_payloads() {
        assert!(parse_scores("").is_err());
        assert!(parse_scores("{'A': [1, 0, 2]").is_err());
        assert!(parse_scores("{'A' [1, 0, 2]}").is_err());
        assert!(parse_scores("{'A': [1, 'x', 2]}").is_err());
        assert!(parse_scores("{'A': [1, 0, 2)}").is_err());
        assert!(parse_scores("{'A': [1, 0, 2]} extra").is_err());
        assert!(parse_scores("{'A': [1; 0]}").is_err());
    }
}
