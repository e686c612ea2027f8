use crate::error::Error;
use crate::Parser;
use parcel_ast::{LocationSpan, Token};

impl<'a> Parser<'a> {
    /// Generates error if the current token does not equal to `token`.
    /// Consumes the token if succeed.
    ///
    /// Note: Takes `Token` rather than `&Token` for convenience.
    pub(super) fn expect(&mut self, token: Token) -> Result<Token, Error> {
        if *self.current_token() == token {
            self.consume_token()
        } else {
            Err(parse_error!(
                self,
                "expected {} but got {}",
                describe(&token),
                describe(self.current_token())
            ))
        }
    }

    pub(super) fn skip_ws(&mut self) -> Result<(), Error> {
        while *self.current_token() == Token::Space {
            self.consume_token()?;
        }
        Ok(())
    }

    /// Consume the current token and return it
    pub(super) fn consume_token(&mut self) -> Result<Token, Error> {
        self.debug_log(&format!("consume_token {:?}", self.current_token()));
        self.lexer.consume_token()
    }

    /// Consume the current token if it equals to `token`.
    /// Return whether matched and consumed
    pub(super) fn consume(&mut self, token: Token) -> Result<bool, Error> {
        if self.current_token_is(token) {
            self.consume_token()?;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    /// Return true if the current token is `token`
    pub(super) fn current_token_is(&self, token: Token) -> bool {
        *self.current_token() == token
    }

    pub(super) fn current_token(&self) -> &Token {
        &self.lexer.current_token
    }

    /// Location of the current token
    pub(super) fn current_span(&self) -> LocationSpan {
        self.lexer.location_span()
    }

    pub(super) fn parseerror(&self, msg: &str) -> Error {
        self.parseerror_at(msg, self.current_span())
    }

    pub(super) fn parseerror_at(&self, msg: &str, locs: LocationSpan) -> Error {
        Error::ParseError {
            msg: msg.to_string(),
            locs,
        }
    }

    /// Print parser debug log
    pub(super) fn debug_log(&self, msg: &str) {
        log::trace!("{}{}", "  ".repeat(self.lv), msg);
    }
}

/// Human readable token name for error messages
pub(super) fn describe(token: &Token) -> String {
    match token {
        Token::Bof => "beginning of file".to_string(),
        Token::Eof => "end of file".to_string(),
        Token::Space => "space".to_string(),
        Token::UpperWord(s) | Token::LowerWord(s) => format!("`{}`", s),
        Token::LParen => "`(`".to_string(),
        Token::RParen => "`)`".to_string(),
        Token::LBrace => "`{`".to_string(),
        Token::RBrace => "`}`".to_string(),
        Token::Semicolon => "`;`".to_string(),
        Token::Comma => "`,`".to_string(),
        Token::Star => "`*`".to_string(),
        Token::Dot => "`.`".to_string(),
        Token::ColonColon => "`::`".to_string(),
        Token::KwParcel => "`parcel`".to_string(),
        Token::KwClass => "`class`".to_string(),
        Token::KwInherits => "`inherits`".to_string(),
        Token::KwPublic => "`public`".to_string(),
        Token::KwFinal => "`final`".to_string(),
        Token::KwAbstract => "`abstract`".to_string(),
        Token::KwOverride => "`override`".to_string(),
        Token::KwNullable => "`nullable`".to_string(),
        Token::KwIncremented => "`incremented`".to_string(),
        Token::KwDecremented => "`decremented`".to_string(),
        Token::KwVoid => "`void`".to_string(),
    }
}
