//! Parser for declaration units (`*.cfd`)
//!
//! Implementation rules
//! - Call `skip_ws` before calling other `parse_xx`

/// Create ParseError with `format!`
macro_rules! parse_error {
    ( $self:ident, $( $arg:expr ),* ) => ({
        let msg = format!( $( $arg ),* );
        $self.parseerror(&msg)
    })
}

mod base;
mod decl_parser;
mod error;
pub mod lexer;
mod loader;
mod reserved;
mod source_file;
pub use crate::error::Error;
use crate::lexer::Lexer;
pub use crate::loader::{load_dirs, Loader, DECL_EXTENSION};
pub use crate::source_file::SourceFile;
use parcel_ast::{ClassRecord, Token};

pub struct Parser<'a> {
    pub lexer: Lexer<'a>,
    /// For debug print
    pub lv: usize,
}

impl<'a> Parser<'a> {
    pub fn new(file: &'a SourceFile) -> Result<Parser<'a>, Error> {
        Ok(Parser {
            lexer: Lexer::new(&file.content, &file.path)?,
            lv: 0,
        })
    }

    pub fn parse_files(files: &[SourceFile]) -> Result<Vec<ClassRecord>, Error> {
        let mut records = vec![];
        for file in files {
            let mut parser = Parser::new(file)?;
            let mut record = parser.parse_unit()?;
            record.included = file.included;
            records.push(record);
        }
        log::debug!("parsed {} declaration units", records.len());
        Ok(records)
    }

    /// Parse a unit which consists of a parcel declaration and exactly one
    /// class
    pub fn parse_unit(&mut self) -> Result<ClassRecord, Error> {
        self.skip_ws()?;
        let parcel = self.parse_parcel_decl()?;
        self.skip_ws()?;
        if self.current_token_is(Token::Eof) {
            return Err(parse_error!(self, "no class is declared"));
        }
        let record = self.parse_class_decl(&parcel)?;
        self.skip_ws()?;
        match self.current_token() {
            Token::Eof => (),
            Token::KwClass | Token::KwPublic | Token::KwFinal => {
                return Err(parse_error!(
                    self,
                    "only one class can be declared in a file"
                ));
            }
            _ => self.expect_eof()?,
        }
        Ok(record)
    }

    pub fn expect_eof(&self) -> Result<(), Error> {
        if *self.current_token() != Token::Eof {
            return Err(parse_error!(
                self,
                "unexpected {}",
                crate::base::describe(self.current_token())
            ));
        }
        Ok(())
    }
}
