//! A character-stream tokenizer with keyword recognition and comment
//! handling. Exposes a one-token lookahead: `current_token()` peeks at the
//! token already scanned, `advance()` scans and returns the next one.

pub mod token;

use std::io::{Bytes, Read};
use token::Token;

/// Tokenizes a byte source (a file or stdin) into a stream of `Token`s.
///
/// The lexer never signals an error of its own: malformed input becomes
/// either an unrecognized single-character token or a zero-valued number,
/// per the design's lenient-lexer contract.
pub struct Lexer<R: Read> {
    input: Bytes<R>,
    /// The one pending input character not yet consumed into a token.
    /// Primed to a space so the whitespace-skipping loop runs at least
    /// once on construction, matching the teacher's `LastChar = ' '` seed.
    last_char: char,
    current_token: Token,
}

/// Sentinel returned by `read_char` once the underlying source is exhausted.
const EOF_CHAR: char = '\0';

impl<R: Read> Lexer<R> {
    /// Creates a lexer over `source` and scans the first token so that
    /// `current_token()` is immediately valid.
    pub fn new(source: R) -> Self {
        let mut lexer = Lexer { input: source.bytes(), last_char: ' ', current_token: Token::DEFAULT };
        lexer.advance();
        lexer
    }

    /// The token most recently produced by `advance()`.
    pub fn current_token(&self) -> &Token {
        &self.current_token
    }

    /// Scans and returns the next token, replacing `current_token()`.
    pub fn advance(&mut self) -> Token {
        self.current_token = self.scan();
        self.current_token.clone()
    }

    fn read_char(&mut self) -> char {
        match self.input.next() {
            Some(Ok(byte)) => byte as char,
            _ => EOF_CHAR,
        }
    }

    fn scan(&mut self) -> Token {
        while self.last_char != EOF_CHAR && self.last_char.is_ascii_whitespace() {
            self.last_char = self.read_char();
        }

        if self.last_char.is_ascii_alphabetic() {
            let mut spelling = String::new();
            spelling.push(self.last_char);
            self.last_char = self.read_char();
            while self.last_char.is_ascii_alphanumeric() {
                spelling.push(self.last_char);
                self.last_char = self.read_char();
            }
            return Token::keyword(&spelling).unwrap_or(Token::IDENTIFIER(spelling));
        }

        if self.last_char.is_ascii_digit() || self.last_char == '.' {
            let mut lexeme = String::new();
            while self.last_char.is_ascii_digit() || self.last_char == '.' {
                lexeme.push(self.last_char);
                self.last_char = self.read_char();
            }
            // Leniently parsed: a malformed numeral (e.g. multiple dots)
            // falls back to 0.0 rather than failing the lex.
            let value = lexeme.parse::<f64>().unwrap_or(0.0);
            return Token::NUMBER(value);
        }

        if self.last_char == '#' {
            while self.last_char != EOF_CHAR && self.last_char != '\n' && self.last_char != '\r' {
                self.last_char = self.read_char();
            }
            if self.last_char != EOF_CHAR {
                return self.scan();
            }
        }

        if self.last_char == EOF_CHAR {
            return Token::EOF;
        }

        let current = self.last_char;
        self.last_char = self.read_char();
        Token::CHAR(current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(src: &str) -> Vec<Token> {
        let mut lexer = Lexer::new(src.as_bytes());
        let mut out = vec![lexer.current_token().clone()];
        loop {
            let tok = lexer.advance();
            let done = tok == Token::EOF;
            out.push(tok);
            if done {
                break;
            }
        }
        out
    }

    #[test]
    fn keywords_and_identifiers() {
        let toks = tokens("func when foo42");
        assert_eq!(
            toks,
            vec![
                Token::FUNC,
                Token::WHEN,
                Token::IDENTIFIER("foo42".to_string()),
                Token::EOF,
            ]
        );
    }

    #[test]
    fn numbers_are_lenient() {
        let toks = tokens("3.14 2.5.5");
        assert_eq!(toks[0], Token::NUMBER(3.14));
        // "2.5.5" is consumed as one lexeme and fails to parse as f64 -> 0.0
        assert_eq!(toks[1], Token::NUMBER(0.0));
    }

    #[test]
    fn comments_are_skipped() {
        let toks = tokens("1 # a comment\n2");
        assert_eq!(toks, vec![Token::NUMBER(1.0), Token::NUMBER(2.0), Token::EOF]);
    }

    #[test]
    fn single_char_operators() {
        let toks = tokens("a + b");
        assert_eq!(
            toks,
            vec![
                Token::IDENTIFIER("a".to_string()),
                Token::CHAR('+'),
                Token::IDENTIFIER("b".to_string()),
                Token::EOF,
            ]
        );
    }
}
