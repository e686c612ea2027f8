use crate::error::Error;
use parcel_ast::{Location, LocationSpan, Token};
use std::path::PathBuf;
use std::sync::Arc;

/// Lexer
#[derive(Debug)]
pub struct Lexer<'a> {
    /// Reference to source code.
    pub src: &'a str,
    /// Path of the source (for error messages)
    filepath: Arc<PathBuf>,
    /// Current position
    pub cur: Cursor,
    /// A token starts from `cur`
    pub current_token: Token,
    /// Next position when `current_token` is consumed
    next_cur: Option<Cursor>,
}

#[derive(Debug, PartialEq, Eq, Clone, Default)]
pub struct Cursor {
    line: usize,
    col: usize,
    pos: usize, // Number of bytes from the begginning of the file
}

impl Cursor {
    pub fn new() -> Cursor {
        Cursor {
            line: 0,
            col: 0,
            pos: 0,
        }
    }

    /// Return the current char (None if eof)
    pub fn peek(&self, src: &str) -> Option<char> {
        src[self.pos..].chars().next()
    }

    /// Peek the second next character.
    pub fn peek2(&self, src: &str) -> Option<char> {
        let mut chars = src[self.pos..].chars();
        chars.next();
        chars.next()
    }

    /// Consume the current char and return it (None if eof)
    pub fn proceed(&mut self, src: &str) -> Option<char> {
        let c = src[self.pos..].chars().next()?;
        if c == '\n' {
            self.line += 1;
            self.col = 0
        } else {
            self.col += 1
        }
        self.pos += c.len_utf8();
        Some(c)
    }

    fn location(&self) -> Location {
        Location::new(self.line, self.col, self.pos)
    }
}

#[derive(Debug, PartialEq)]
enum CharType {
    Space,     // ' ', '\t', '\n', '\r'
    Comment,   // `//` or `/*`
    UpperWord, // identifier which starts with upper-case letter
    LowerWord, // keyword or identifier which starts with lower-case letter or '_'
    Number,    // '0'~'9'
    Symbol,    // '(', ';', etc.
    Eof,
}

impl<'a> Lexer<'a> {
    /// Create lexer and get the first token
    pub fn new(src: &'a str, filepath: &Arc<PathBuf>) -> Result<Lexer<'a>, Error> {
        let mut lexer = Lexer {
            src,
            filepath: filepath.clone(),
            cur: Cursor::new(),
            next_cur: None,
            current_token: Token::Bof,
        };
        lexer.read_token()?;
        Ok(lexer)
    }

    /// Returns pair of locations which are the beginning and the end of the
    /// current token.
    pub fn location_span(&self) -> LocationSpan {
        let begin = self.cur.location();
        let end = match &self.next_cur {
            Some(nc) => nc.location(),
            None => begin.clone(),
        };
        LocationSpan::new(&self.filepath, begin, end)
    }

    /// Remove the current token and read next
    pub fn consume_token(&mut self) -> Result<Token, Error> {
        if let Some(next_cur) = self.next_cur.take() {
            self.cur = next_cur;
        }
        let tok = std::mem::replace(&mut self.current_token, Token::Eof);
        self.read_token()?;
        Ok(tok)
    }

    /// Return the next token while keeping the current one
    pub fn peek_next(&mut self) -> Result<Token, Error> {
        let saved_cur = self.cur.clone();
        let saved_next = self.next_cur.clone();
        let saved_token = self.current_token.clone();
        self.consume_token()?;
        let next = std::mem::replace(&mut self.current_token, saved_token);
        self.cur = saved_cur;
        self.next_cur = saved_next;
        Ok(next)
    }

    /// Read a token and set it to `current_token`
    fn read_token(&mut self) -> Result<(), Error> {
        let c = self.cur.peek(self.src);
        let mut next_cur = self.cur.clone();
        let token = match self.char_type(c, self.cur.peek2(self.src)) {
            CharType::Space | CharType::Comment => self.read_space(&mut next_cur)?,
            CharType::UpperWord => self.read_upper_word(&mut next_cur),
            CharType::LowerWord => self.read_lower_word(&mut next_cur),
            CharType::Number => return Err(self.lex_error("unexpected number")),
            CharType::Symbol => self.read_symbol(&mut next_cur)?,
            CharType::Eof => Token::Eof,
        };
        self.current_token = token;
        self.next_cur = Some(next_cur);
        Ok(())
    }

    /// Read spaces and comments as one token
    fn read_space(&mut self, next_cur: &mut Cursor) -> Result<Token, Error> {
        loop {
            let c = next_cur.peek(self.src);
            match self.char_type(c, next_cur.peek2(self.src)) {
                CharType::Space => {
                    next_cur.proceed(self.src);
                }
                CharType::Comment => {
                    next_cur.proceed(self.src); // Skip the '/'
                    if next_cur.proceed(self.src) == Some('/') {
                        while let Some(c) = next_cur.proceed(self.src) {
                            if c == '\n' {
                                break;
                            }
                        }
                    } else {
                        self.skip_block_comment(next_cur)?;
                    }
                }
                _ => break,
            }
        }
        Ok(Token::Space)
    }

    fn skip_block_comment(&self, next_cur: &mut Cursor) -> Result<(), Error> {
        loop {
            match next_cur.proceed(self.src) {
                None => return Err(self.lex_error("found unterminated comment")),
                Some('*') if next_cur.peek(self.src) == Some('/') => {
                    next_cur.proceed(self.src);
                    return Ok(());
                }
                Some(_) => (),
            }
        }
    }

    fn read_word(&self, next_cur: &mut Cursor) -> &'a str {
        let begin = next_cur.pos;
        while let CharType::UpperWord | CharType::LowerWord | CharType::Number =
            self.char_type(next_cur.peek(self.src), None)
        {
            next_cur.proceed(self.src);
        }
        &self.src[begin..next_cur.pos]
    }

    fn read_upper_word(&self, next_cur: &mut Cursor) -> Token {
        Token::upper_word(self.read_word(next_cur))
    }

    // Read either of
    // - an identifier starting with a small letter or `_`
    // - a keyword (`class`, `public`, etc.)
    fn read_lower_word(&self, next_cur: &mut Cursor) -> Token {
        let s = self.read_word(next_cur);
        match s {
            "parcel" => Token::KwParcel,
            "class" => Token::KwClass,
            "inherits" => Token::KwInherits,
            "public" => Token::KwPublic,
            "final" => Token::KwFinal,
            "abstract" => Token::KwAbstract,
            "override" => Token::KwOverride,
            "nullable" => Token::KwNullable,
            "incremented" => Token::KwIncremented,
            "decremented" => Token::KwDecremented,
            "void" => Token::KwVoid,
            _ => Token::lower_word(s),
        }
    }

    fn read_symbol(&self, next_cur: &mut Cursor) -> Result<Token, Error> {
        let c1 = next_cur.proceed(self.src);
        let c2 = next_cur.peek(self.src);
        match c1 {
            Some('(') => Ok(Token::LParen),
            Some(')') => Ok(Token::RParen),
            Some('{') => Ok(Token::LBrace),
            Some('}') => Ok(Token::RBrace),
            Some(';') => Ok(Token::Semicolon),
            Some(',') => Ok(Token::Comma),
            Some('*') => Ok(Token::Star),
            Some('.') => Ok(Token::Dot),
            Some(':') => {
                if c2 == Some(':') {
                    next_cur.proceed(self.src);
                    Ok(Token::ColonColon)
                } else {
                    Err(self.lex_error("unknown symbol: :"))
                }
            }
            Some(c) => Err(self.lex_error(&format!("unknown symbol: {}", c))),
            None => Ok(Token::Eof),
        }
    }

    fn char_type(&self, cc: Option<char>, cc2: Option<char>) -> CharType {
        let Some(c) = cc else {
            return CharType::Eof;
        };
        match c {
            ' ' | '\t' | '\n' | '\r' => CharType::Space,
            '/' if cc2 == Some('/') || cc2 == Some('*') => CharType::Comment,
            '0'..='9' => CharType::Number,
            'A'..='Z' => CharType::UpperWord,
            'a'..='z' | '_' => CharType::LowerWord,
            _ => CharType::Symbol,
        }
    }

    fn lex_error(&self, msg: &str) -> Error {
        let begin = self.cur.location();
        let end = Location::new(begin.line, begin.col + 1, begin.pos + 1);
        Error::ParseError {
            msg: msg.to_string(),
            locs: LocationSpan::new(&self.filepath, begin, end),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(src: &str) -> Vec<Token> {
        let path = Arc::new(PathBuf::from("test.cfd"));
        let mut lexer = Lexer::new(src, &path).unwrap();
        let mut v = vec![];
        while lexer.current_token != Token::Eof {
            v.push(lexer.consume_token().unwrap());
        }
        v
    }

    #[test]
    fn test_keywords_and_words() {
        assert_eq!(
            tokens("class Dog inherits Hello::Animal"),
            vec![
                Token::KwClass,
                Token::Space,
                Token::upper_word("Dog"),
                Token::Space,
                Token::KwInherits,
                Token::Space,
                Token::upper_word("Hello"),
                Token::ColonColon,
                Token::upper_word("Animal"),
            ]
        );
    }

    #[test]
    fn test_comments_are_spaces() {
        assert_eq!(
            tokens("int32_t // comment\n/* block\n comment */ age;"),
            vec![
                Token::lower_word("int32_t"),
                Token::Space,
                Token::lower_word("age"),
                Token::Semicolon,
            ]
        );
    }

    #[test]
    fn test_unterminated_comment() {
        let path = Arc::new(PathBuf::from("test.cfd"));
        let mut lexer = Lexer::new("a /* b", &path).unwrap();
        assert!(lexer.consume_token().is_err());
    }

    #[test]
    fn test_peek_next() {
        let path = Arc::new(PathBuf::from("test.cfd"));
        let mut lexer = Lexer::new("Hash*", &path).unwrap();
        assert_eq!(lexer.peek_next().unwrap(), Token::Star);
        assert_eq!(lexer.current_token, Token::upper_word("Hash"));
    }

    #[test]
    fn test_unknown_symbol_location() {
        let path = Arc::new(PathBuf::from("test.cfd"));
        let mut lexer = Lexer::new("a\n  #", &path).unwrap();
        lexer.consume_token().unwrap();
        let err = lexer.consume_token().unwrap_err();
        assert_eq!(err.to_string(), "test.cfd:2: ParseError: unknown symbol: #");
    }
}
