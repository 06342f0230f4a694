//! Tokenizer for the condition text that follows `eval:doc.`.
//!
//! Unquoted text between operators is one token, so values with inner
//! spaces (`status == Pending Approval`) survive as a single word.

use std::fmt;

use crate::error::ParseError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// Unquoted text, trimmed.
    Word(String),
    /// Quoted text with the quotes removed.
    Quoted(String),
    Eq,
    Ne,
    And,
    Or,
    LParen,
    RParen,
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Word(word) => f.write_str(word),
            Token::Quoted(text) => write!(f, "'{text}'"),
            Token::Eq => f.write_str("=="),
            Token::Ne => f.write_str("!="),
            Token::And => f.write_str("&&"),
            Token::Or => f.write_str("||"),
            Token::LParen => f.write_str("("),
            Token::RParen => f.write_str(")"),
        }
    }
}

fn flush_word(pending: &mut String, tokens: &mut Vec<Token>) {
    let word = pending.trim();
    if !word.is_empty() {
        tokens.push(Token::Word(word.to_string()));
    }
    pending.clear();
}

pub fn tokenize(input: &str) -> Result<Vec<Token>, ParseError> {
    let mut tokens = Vec::new();
    let mut pending = String::new();
    let mut chars = input.char_indices().peekable();

    while let Some((offset, ch)) = chars.next() {
        let next = chars.peek().map(|(_, c)| *c);
        let operator = match (ch, next) {
            ('=', Some('=')) => Some(Token::Eq),
            ('!', Some('=')) => Some(Token::Ne),
            ('&', Some('&')) => Some(Token::And),
            ('|', Some('|')) => Some(Token::Or),
            _ => None,
        };
        if let Some(token) = operator {
            chars.next();
            flush_word(&mut pending, &mut tokens);
            tokens.push(token);
            continue;
        }
        match ch {
            '(' => {
                flush_word(&mut pending, &mut tokens);
                tokens.push(Token::LParen);
            }
            ')' => {
                flush_word(&mut pending, &mut tokens);
                tokens.push(Token::RParen);
            }
            '\'' | '"' if pending.trim().is_empty() => {
                pending.clear();
                let mut text = String::new();
                let mut closed = false;
                for (_, inner) in chars.by_ref() {
                    if inner == ch {
                        closed = true;
                        break;
                    }
                    text.push(inner);
                }
                if !closed {
                    return Err(ParseError::UnterminatedString { offset });
                }
                tokens.push(Token::Quoted(text));
            }
            // Stray quotes inside a word are dropped.
            '\'' | '"' => {}
            _ => pending.push(ch),
        }
    }
    flush_word(&mut pending, &mut tokens);
    Ok(tokens)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn word(text: &str) -> Token {
        Token::Word(text.to_string())
    }

    #[test]
    fn splits_operators_and_words() {
        let tokens = tokenize("status == Open && priority != 'Low'").unwrap();
        assert_eq!(
            tokens,
            vec![
                word("status"),
                Token::Eq,
                word("Open"),
                Token::And,
                word("priority"),
                Token::Ne,
                Token::Quoted("Low".to_string()),
            ]
        );
    }

    #[test]
    fn keeps_inner_spaces_in_words() {
        let tokens = tokenize("job_status==Pending - Client Approval").unwrap();
        assert_eq!(
            tokens,
            vec![word("job_status"), Token::Eq, word("Pending - Client Approval")]
        );
    }

    #[test]
    fn parentheses_and_or() {
        let tokens = tokenize("(a==1||b==2)").unwrap();
        assert_eq!(tokens.first(), Some(&Token::LParen));
        assert_eq!(tokens.last(), Some(&Token::RParen));
        assert!(tokens.contains(&Token::Or));
    }

    #[test]
    fn empty_quoted_literal() {
        let tokens = tokenize(r#"name != """#).unwrap();
        assert_eq!(
            tokens,
            vec![word("name"), Token::Ne, Token::Quoted(String::new())]
        );
    }

    #[test]
    fn unterminated_quote_is_an_error() {
        assert_eq!(
            tokenize("a == 'open"),
            Err(ParseError::UnterminatedString { offset: 5 })
        );
    }

    #[test]
    fn stray_quote_inside_word_is_dropped() {
        let tokens = tokenize("note == don't").unwrap();
        assert_eq!(tokens[2], word("dont"));
    }
}
