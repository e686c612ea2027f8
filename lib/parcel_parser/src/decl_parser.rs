use crate::error::Error;
use crate::reserved;
use crate::Parser;
use parcel_ast::names::*;
use parcel_ast::*;
use std::collections::HashSet;

impl<'a> Parser<'a> {
    /// Parse `parcel Foo.Bar;`
    pub(super) fn parse_parcel_decl(&mut self) -> Result<ParcelName, Error> {
        self.lv += 1;
        self.debug_log("parse_parcel_decl");
        if !self.current_token_is(Token::KwParcel) {
            return Err(parse_error!(self, "expected `parcel` declaration"));
        }
        self.consume_token()?;
        self.skip_ws()?;
        let mut name = self.parse_word("parcel name")?;
        while self.consume(Token::Dot)? {
            name.push('.');
            name += &self.parse_word("parcel name")?;
        }
        self.skip_ws()?;
        self.expect(Token::Semicolon)?;
        self.lv -= 1;
        Ok(parcel_name(name))
    }

    fn parse_word(&mut self, what: &str) -> Result<String, Error> {
        match self.current_token() {
            Token::UpperWord(s) | Token::LowerWord(s) => {
                let s = s.clone();
                self.consume_token()?;
                Ok(s)
            }
            token => Err(parse_error!(
                self,
                "expected {} but got {}",
                what,
                crate::base::describe(token)
            )),
        }
    }

    /// Parse a class declaration
    /// `[public] [final] class Name [inherits Parent] { members } [;]`
    pub(super) fn parse_class_decl(&mut self, parcel: &ParcelName) -> Result<ClassRecord, Error> {
        self.lv += 1;
        self.debug_log("parse_class_decl");
        let mut modifiers = ClassModifiers::default();
        loop {
            match self.current_token() {
                Token::KwPublic => modifiers.public = true,
                Token::KwFinal => modifiers.is_final = true,
                Token::KwAbstract | Token::KwOverride => {
                    return Err(parse_error!(
                        self,
                        "{} cannot be applied to a class",
                        crate::base::describe(self.current_token())
                    ));
                }
                _ => break,
            }
            self.consume_token()?;
            self.skip_ws()?;
        }
        self.expect(Token::KwClass)?;
        self.skip_ws()?;
        let (name, locs) = self.parse_class_name()?;
        let last = name.rsplit("::").next().unwrap_or(&name);
        if let Err(msg) = reserved::check_class_name(parcel, last) {
            return Err(self.parseerror_at(&msg, locs));
        }
        let fullname = ClassFullname::qualify(&name, parcel);
        self.skip_ws()?;

        let (parent, parent_locs) = if self.consume(Token::KwInherits)? {
            self.skip_ws()?;
            let (parent, parent_locs) = self.parse_class_name()?;
            self.skip_ws()?;
            (Some(parent), Some(parent_locs))
        } else {
            (None, None)
        };

        self.expect(Token::LBrace)?;
        self.skip_ws()?;
        let mut attributes: Vec<AttributeDecl> = vec![];
        let mut methods: Vec<MethodDecl> = vec![];
        while !self.current_token_is(Token::RBrace) {
            match self.parse_member(parcel)? {
                Member::Attribute(attr) => {
                    if attributes.iter().any(|a| a.name == attr.name) {
                        return Err(self.parseerror_at(
                            &format!("duplicate attribute `{}` in {}", attr.name, fullname),
                            attr.locs,
                        ));
                    }
                    attributes.push(attr);
                }
                Member::Method(method) => {
                    if methods.iter().any(|m| m.name == method.name) {
                        return Err(self.parseerror_at(
                            &format!("duplicate method `{}` in {}", method.name, fullname),
                            method.locs,
                        ));
                    }
                    methods.push(method);
                }
            }
            self.skip_ws()?;
        }
        self.expect(Token::RBrace)?;
        self.skip_ws()?;
        self.consume(Token::Semicolon)?;
        self.lv -= 1;
        Ok(ClassRecord {
            parcel: parcel.clone(),
            fullname,
            parent,
            modifiers,
            attributes,
            methods,
            locs,
            parent_locs,
            included: false,
        })
    }

    /// Parse `Foo` or `Foo::Bar` (no spaces allowed)
    fn parse_class_name(&mut self) -> Result<(String, LocationSpan), Error> {
        let begin = self.current_span();
        let mut end = begin.clone();
        let mut name = match self.current_token() {
            Token::UpperWord(s) => s.clone(),
            token => {
                return Err(parse_error!(
                    self,
                    "expected class name but got {}",
                    crate::base::describe(token)
                ))
            }
        };
        self.consume_token()?;
        while self.consume(Token::ColonColon)? {
            end = self.current_span();
            match self.current_token() {
                Token::UpperWord(s) => {
                    name += "::";
                    name += s;
                }
                token => {
                    return Err(parse_error!(
                        self,
                        "expected class name after `::` but got {}",
                        crate::base::describe(token)
                    ))
                }
            }
            self.consume_token()?;
        }
        Ok((name, begin.merge(&end)))
    }

    /// Parse an attribute or a method
    fn parse_member(&mut self, parcel: &ParcelName) -> Result<Member, Error> {
        self.lv += 1;
        self.debug_log("parse_member");
        let first_span = self.current_span();
        let mut modifiers = MethodModifiers::default();
        let mut has_modifier = false;
        while self.current_token().is_modifier() {
            match self.current_token() {
                Token::KwPublic => modifiers.public = true,
                Token::KwFinal => modifiers.is_final = true,
                Token::KwAbstract => modifiers.is_abstract = true,
                Token::KwOverride => modifiers.is_override = true,
                _ => (),
            }
            has_modifier = true;
            self.consume_token()?;
            self.skip_ws()?;
        }
        let ty = self.parse_type()?;
        self.skip_ws()?;
        let name_span = self.current_span();
        let name = self.parse_word("member name")?;
        self.skip_ws()?;

        let member = if self.current_token_is(Token::LParen) {
            if modifiers.is_abstract && modifiers.is_final {
                return Err(self.parseerror_at(
                    &format!("method `{}` cannot be both abstract and final", name),
                    name_span,
                ));
            }
            if let Err(msg) = reserved::check_method_name(&name) {
                return Err(self.parseerror_at(&msg, name_span));
            }
            let params = self.parse_params(parcel)?;
            self.skip_ws()?;
            self.expect(Token::Semicolon)?;
            Member::Method(MethodDecl {
                name: method_name(name),
                ret_ty: ty,
                params,
                modifiers,
                locs: name_span,
            })
        } else {
            if has_modifier {
                return Err(self.parseerror_at(
                    &format!("modifiers cannot be applied to attribute `{}`", name),
                    first_span,
                ));
            }
            if ty == TypeExpr::Void {
                return Err(self.parseerror_at(
                    &format!("attribute `{}` cannot be void", name),
                    name_span,
                ));
            }
            if let Err(msg) = reserved::check_attribute_name(&name) {
                return Err(self.parseerror_at(&msg, name_span));
            }
            self.expect(Token::Semicolon)?;
            Member::Attribute(AttributeDecl {
                name,
                ty,
                locs: name_span,
            })
        };
        self.lv -= 1;
        Ok(member)
    }

    /// Parse `(Type name, ...)`
    fn parse_params(&mut self, parcel: &ParcelName) -> Result<Vec<ParamDecl>, Error> {
        self.expect(Token::LParen)?;
        self.skip_ws()?;
        let mut params: Vec<ParamDecl> = vec![];
        let mut names = HashSet::new();
        if self.consume(Token::RParen)? {
            return Ok(params);
        }
        loop {
            let ty = self.parse_type()?;
            if ty == TypeExpr::Void {
                return Err(parse_error!(self, "parameter cannot be void"));
            }
            self.skip_ws()?;
            let name_span = self.current_span();
            let name = self.parse_word("parameter name")?;
            if name == "self" {
                return Err(self.parseerror_at("`self` is implicit", name_span));
            }
            if let Err(msg) = reserved::check_param_name(parcel, &name) {
                return Err(self.parseerror_at(&msg, name_span));
            }
            if !names.insert(name.clone()) {
                return Err(
                    self.parseerror_at(&format!("duplicate parameter `{}`", name), name_span)
                );
            }
            params.push(ParamDecl { name, ty });
            self.skip_ws()?;
            if self.consume(Token::Comma)? {
                self.skip_ws()?;
                continue;
            }
            self.expect(Token::RParen)?;
            break;
        }
        Ok(params)
    }

    /// Parse a type (eg. `int32_t`, `nullable Hash*`, `void`)
    fn parse_type(&mut self) -> Result<TypeExpr, Error> {
        let begin = self.current_span();
        let mut nullable = false;
        let mut incremented = false;
        let mut decremented = false;
        while self.current_token().is_type_modifier() {
            match self.current_token() {
                Token::KwNullable => nullable = true,
                Token::KwIncremented => incremented = true,
                Token::KwDecremented => decremented = true,
                _ => (),
            }
            self.consume_token()?;
            self.skip_ws()?;
        }
        let has_modifier = nullable || incremented || decremented;
        match self.current_token().clone() {
            Token::KwVoid => {
                if has_modifier {
                    return Err(self.parseerror_at(
                        "type modifiers cannot be applied to void",
                        begin.merge(&self.current_span()),
                    ));
                }
                self.consume_token()?;
                Ok(TypeExpr::Void)
            }
            Token::LowerWord(s) => {
                let Some(prim) = Primitive::from_name(&s) else {
                    return Err(parse_error!(self, "unknown type `{}`", s));
                };
                if has_modifier {
                    return Err(self.parseerror_at(
                        &format!("type modifiers cannot be applied to primitive `{}`", s),
                        begin.merge(&self.current_span()),
                    ));
                }
                self.consume_token()?;
                Ok(TypeExpr::Primitive(prim))
            }
            Token::UpperWord(_) => {
                let (name, _) = self.parse_class_name()?;
                self.skip_ws()?;
                if !self.current_token_is(Token::Star) {
                    return Err(parse_error!(
                        self,
                        "expected `*` after object type `{}`",
                        name
                    ));
                }
                self.consume_token()?;
                Ok(TypeExpr::Object(ObjectTypeExpr {
                    name,
                    nullable,
                    incremented,
                    decremented,
                }))
            }
            token => Err(parse_error!(
                self,
                "expected type but got {}",
                crate::base::describe(&token)
            )),
        }
    }
}

enum Member {
    Attribute(AttributeDecl),
    Method(MethodDecl),
}
