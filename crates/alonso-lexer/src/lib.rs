//! Alonso lexer: converts source text into tokens.
//!
//! The lexer never fails. Stray bytes, a lone `&` or `|`, and unterminated
//! strings are returned as `ILLEGAL` tokens so the parser can report them
//! with context.

use alonso_syntax::token::{Token, TokenKind};

/// Streaming character scanner that produces tokens with positions.
pub struct Lexer {
    src: Vec<char>,
    pos: usize,
    line: usize,
    col: usize,
}

impl Lexer {
    /// Create a new lexer over the given source string.
    pub fn new(input: &str) -> Self {
        Self {
            src: input.chars().collect(),
            pos: 0,
            line: 1,
            col: 1,
        }
    }

    fn peek(&self) -> Option<char> {
        self.src.get(self.pos).copied()
    }
    fn peek_next(&self) -> Option<char> {
        self.src.get(self.pos + 1).copied()
    }
    fn advance(&mut self) -> Option<char> {
        let ch = self.src.get(self.pos).copied();
        if let Some(c) = ch {
            self.pos += 1;
            if c == '\n' {
                self.line += 1;
                self.col = 1;
            } else {
                self.col += 1;
            }
        }
        ch
    }

    /// Spaces, tabs and carriage returns. Newlines are tokens, not
    /// whitespace.
    fn skip_whitespace(&mut self) {
        while let Some(c) = self.peek() {
            if c == ' ' || c == '\t' || c == '\r' {
                self.advance();
            } else {
                break;
            }
        }
    }

    /// `// …` through end of line, not including the newline.
    fn skip_comment(&mut self) {
        while let Some(c) = self.peek() {
            if c == '\n' {
                break;
            }
            self.advance();
        }
    }

    /// Produce the next token. Returns `Eof` forever once the input is
    /// exhausted.
    pub fn next_token(&mut self) -> Token {
        loop {
            self.skip_whitespace();
            if self.peek() == Some('/') && self.peek_next() == Some('/') {
                self.skip_comment();
                continue;
            }
            break;
        }

        let line = self.line;
        let col = self.col;

        let ch = match self.peek() {
            Some(c) => c,
            None => return Token::new(TokenKind::Eof, "", line, col),
        };

        match ch {
            '\n' => {
                self.advance();
                Token::new(TokenKind::Newline, "\n", line, col)
            }
            '=' => self.one_or_two('=', TokenKind::Assign, TokenKind::EqEq),
            '!' => self.one_or_two('=', TokenKind::Bang, TokenKind::NotEq),
            '<' => self.one_or_two('=', TokenKind::Less, TokenKind::LessEq),
            '>' => self.one_or_two('=', TokenKind::Greater, TokenKind::GreaterEq),
            '&' => self.two_or_illegal('&', TokenKind::AndAnd),
            '|' => self.two_or_illegal('|', TokenKind::OrOr),
            '+' => self.single(TokenKind::Plus),
            '-' => self.single(TokenKind::Minus),
            '*' => self.single(TokenKind::Star),
            '/' => self.single(TokenKind::Slash),
            '%' => self.single(TokenKind::Percent),
            ';' => self.single(TokenKind::Semicolon),
            ',' => self.single(TokenKind::Comma),
            '.' => self.single(TokenKind::Dot),
            '(' => self.single(TokenKind::LParen),
            ')' => self.single(TokenKind::RParen),
            '{' => self.single(TokenKind::LBrace),
            '}' => self.single(TokenKind::RBrace),
            '[' => self.single(TokenKind::LBracket),
            ']' => self.single(TokenKind::RBracket),
            '"' => self.read_string(),
            c if c.is_ascii_digit() => self.read_number(),
            c if c.is_alphabetic() || c == '_' => self.read_ident_or_keyword(),
            other => {
                self.advance();
                Token::new(TokenKind::Illegal, other, line, col)
            }
        }
    }

    fn single(&mut self, kind: TokenKind) -> Token {
        let (line, col) = (self.line, self.col);
        let ch = self.advance().unwrap_or_default();
        Token::new(kind, ch, line, col)
    }

    /// One- or two-character operator: consumes the second character when it
    /// matches `second`, falling back to the one-character form.
    fn one_or_two(&mut self, second: char, one: TokenKind, two: TokenKind) -> Token {
        let (line, col) = (self.line, self.col);
        let first = self.advance().unwrap_or_default();
        if self.peek() == Some(second) {
            self.advance();
            let mut lexeme = String::new();
            lexeme.push(first);
            lexeme.push(second);
            Token::new(two, lexeme, line, col)
        } else {
            Token::new(one, first, line, col)
        }
    }

    /// `&&` / `||` have no one-character form; a lone `&` or `|` is illegal.
    fn two_or_illegal(&mut self, second: char, two: TokenKind) -> Token {
        let (line, col) = (self.line, self.col);
        let first = self.advance().unwrap_or_default();
        if self.peek() == Some(second) {
            self.advance();
            let mut lexeme = String::new();
            lexeme.push(first);
            lexeme.push(second);
            Token::new(two, lexeme, line, col)
        } else {
            Token::new(TokenKind::Illegal, first, line, col)
        }
    }

    /// `"`-delimited run without escape processing. An unterminated string
    /// produces a single `ILLEGAL` token with a diagnostic lexeme.
    fn read_string(&mut self) -> Token {
        let (line, col) = (self.line, self.col);
        self.advance(); // opening quote
        let mut s = String::new();
        loop {
            match self.peek() {
                Some('"') => {
                    self.advance();
                    return Token::new(TokenKind::Str, s, line, col);
                }
                Some(c) => {
                    s.push(c);
                    self.advance();
                }
                None => {
                    return Token::new(TokenKind::Illegal, "unterminated string", line, col);
                }
            }
        }
    }

    /// A run of ASCII digits optionally containing `.` characters. Textual
    /// validation is the parser's job.
    fn read_number(&mut self) -> Token {
        let (line, col) = (self.line, self.col);
        let mut s = String::new();
        while let Some(c) = self.peek() {
            if c.is_ascii_digit() || c == '.' {
                s.push(c);
                self.advance();
            } else {
                break;
            }
        }
        Token::new(TokenKind::Number, s, line, col)
    }

    fn read_ident_or_keyword(&mut self) -> Token {
        let (line, col) = (self.line, self.col);
        let mut s = String::new();
        while let Some(c) = self.peek() {
            if c.is_alphanumeric() || c == '_' {
                s.push(c);
                self.advance();
            } else {
                break;
            }
        }
        let kind = match s.as_str() {
            "grid" => TokenKind::Grid,
            "pace" => TokenKind::Pace,
            "circuit" => TokenKind::Circuit,
            "else_circuit" => TokenKind::ElseCircuit,
            "loop" => TokenKind::Loop,
            "while_racing" => TokenKind::WhileRacing,
            "return_pit" => TokenKind::ReturnPit,
            "break_flag" => TokenKind::BreakFlag,
            "continue_race" => TokenKind::ContinueRace,
            "formation" => TokenKind::Formation,
            "garage" => TokenKind::Garage,
            "true" | "false" => TokenKind::Bool,
            _ => TokenKind::Ident,
        };
        Token::new(kind, s, line, col)
    }

    /// Tokenize the entire input into a vector of tokens ending with `Eof`.
    pub fn tokenize(&mut self) -> Vec<Token> {
        let mut tokens = Vec::new();
        loop {
            let tk = self.next_token();
            let done = tk.kind == TokenKind::Eof;
            tokens.push(tk);
            if done {
                break;
            }
        }
        tokens
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(input: &str) -> Vec<TokenKind> {
        Lexer::new(input).tokenize().into_iter().map(|t| t.kind).collect()
    }

    #[test]
    fn test_declaration_tokens() {
        let tokens = Lexer::new("grid lap = 5;").tokenize();
        let expected = [
            (TokenKind::Grid, "grid"),
            (TokenKind::Ident, "lap"),
            (TokenKind::Assign, "="),
            (TokenKind::Number, "5"),
            (TokenKind::Semicolon, ";"),
            (TokenKind::Eof, ""),
        ];
        assert_eq!(tokens.len(), expected.len());
        for (tk, (kind, lexeme)) in tokens.iter().zip(expected.iter()) {
            assert_eq!(tk.kind, *kind);
            assert_eq!(tk.lexeme, *lexeme);
        }
    }

    #[test]
    fn test_two_char_operators() {
        assert_eq!(
            kinds("== != <= >= && ||"),
            vec![
                TokenKind::EqEq,
                TokenKind::NotEq,
                TokenKind::LessEq,
                TokenKind::GreaterEq,
                TokenKind::AndAnd,
                TokenKind::OrOr,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_one_char_fallbacks() {
        assert_eq!(
            kinds("= ! < >"),
            vec![
                TokenKind::Assign,
                TokenKind::Bang,
                TokenKind::Less,
                TokenKind::Greater,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_lone_ampersand_and_pipe_are_illegal() {
        assert_eq!(kinds("&"), vec![TokenKind::Illegal, TokenKind::Eof]);
        assert_eq!(kinds("|"), vec![TokenKind::Illegal, TokenKind::Eof]);
        let tokens = Lexer::new("& 1").tokenize();
        assert_eq!(tokens[0].lexeme, "&");
    }

    #[test]
    fn test_unterminated_string() {
        let tokens = Lexer::new("\"no closing quote").tokenize();
        assert_eq!(tokens.len(), 2);
        assert_eq!(tokens[0].kind, TokenKind::Illegal);
        assert_eq!(tokens[0].lexeme, "unterminated string");
        assert_eq!(tokens[1].kind, TokenKind::Eof);
    }

    #[test]
    fn test_string_without_escapes() {
        let tokens = Lexer::new(r#""podium \n finish""#).tokenize();
        assert_eq!(tokens[0].kind, TokenKind::Str);
        assert_eq!(tokens[0].lexeme, r"podium \n finish");
    }

    #[test]
    fn test_newline_is_a_token() {
        assert_eq!(
            kinds("1\n2"),
            vec![
                TokenKind::Number,
                TokenKind::Newline,
                TokenKind::Number,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_comment_runs_to_end_of_line() {
        assert_eq!(
            kinds("1 // podium positions\n2"),
            vec![
                TokenKind::Number,
                TokenKind::Newline,
                TokenKind::Number,
                TokenKind::Eof,
            ]
        );
        // comment at end of input, no newline
        assert_eq!(kinds("// trailing"), vec![TokenKind::Eof]);
    }

    #[test]
    fn test_keywords() {
        assert_eq!(
            kinds("grid pace circuit else_circuit loop while_racing return_pit break_flag continue_race formation garage"),
            vec![
                TokenKind::Grid,
                TokenKind::Pace,
                TokenKind::Circuit,
                TokenKind::ElseCircuit,
                TokenKind::Loop,
                TokenKind::WhileRacing,
                TokenKind::ReturnPit,
                TokenKind::BreakFlag,
                TokenKind::ContinueRace,
                TokenKind::Formation,
                TokenKind::Garage,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_booleans() {
        let tokens = Lexer::new("true false").tokenize();
        assert_eq!(tokens[0].kind, TokenKind::Bool);
        assert_eq!(tokens[0].lexeme, "true");
        assert_eq!(tokens[1].kind, TokenKind::Bool);
        assert_eq!(tokens[1].lexeme, "false");
    }

    #[test]
    fn test_number_with_dots_is_lexed_whole() {
        // validation is deferred to the parser
        let tokens = Lexer::new("1.2.3").tokenize();
        assert_eq!(tokens[0].kind, TokenKind::Number);
        assert_eq!(tokens[0].lexeme, "1.2.3");
    }

    #[test]
    fn test_positions() {
        let tokens = Lexer::new("grid x\n  = 5").tokenize();
        // grid at 1:1, x at 1:6, newline at 1:7, = at 2:3, 5 at 2:5
        assert_eq!((tokens[0].line, tokens[0].col), (1, 1));
        assert_eq!((tokens[1].line, tokens[1].col), (1, 6));
        assert_eq!(tokens[2].kind, TokenKind::Newline);
        assert_eq!((tokens[2].line, tokens[2].col), (1, 7));
        assert_eq!((tokens[3].line, tokens[3].col), (2, 3));
        assert_eq!((tokens[4].line, tokens[4].col), (2, 5));
    }

    #[test]
    fn test_unknown_byte_is_single_illegal() {
        let tokens = Lexer::new("1 @ 2").tokenize();
        assert_eq!(tokens[1].kind, TokenKind::Illegal);
        assert_eq!(tokens[1].lexeme, "@");
        assert_eq!(tokens[2].kind, TokenKind::Number);
    }

    #[test]
    fn test_underscore_identifiers() {
        let tokens = Lexer::new("_pit_wall lap2").tokenize();
        assert_eq!(tokens[0].kind, TokenKind::Ident);
        assert_eq!(tokens[0].lexeme, "_pit_wall");
        assert_eq!(tokens[1].lexeme, "lap2");
    }
}
