#[derive(Debug, PartialEq, Eq, Hash, Clone)]
pub enum Token {
    Bof,
    Eof,
    /// Spaces, newlines and comments
    Space,
    UpperWord(String),
    LowerWord(String),
    // Symbols
    LParen,     //  (
    RParen,     //  )
    LBrace,     //  {
    RBrace,     //  }
    Semicolon,  //  ;
    Comma,      //  ,
    Star,       //  *
    Dot,        //  .
    ColonColon, //  ::
    // Keywords
    KwParcel,
    KwClass,
    KwInherits,
    KwPublic,
    KwFinal,
    KwAbstract,
    KwOverride,
    KwNullable,
    KwIncremented,
    KwDecremented,
    KwVoid,
}

impl Token {
    pub fn upper_word(s: &str) -> Token {
        Token::UpperWord(s.to_string())
    }

    pub fn lower_word(s: &str) -> Token {
        Token::LowerWord(s.to_string())
    }

    /// Returns true if this token is a method/class modifier keyword
    pub fn is_modifier(&self) -> bool {
        matches!(
            self,
            Token::KwPublic | Token::KwFinal | Token::KwAbstract | Token::KwOverride
        )
    }

    /// Returns true if this token is a type modifier keyword
    pub fn is_type_modifier(&self) -> bool {
        matches!(
            self,
            Token::KwNullable | Token::KwIncremented | Token::KwDecremented
        )
    }
}
