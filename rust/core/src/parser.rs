// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! STEP reader using nom
//!
//! Reads files written by this crate back into tokens: used to inspect and
//! summarize output, not to load arbitrary IFC data.

use memchr::{memchr, memchr2};
use nom::{
    branch::alt,
    bytes::complete::{tag, take_while, take_while1},
    character::complete::{char, digit1, one_of},
    combinator::{map, map_res, opt, recognize},
    multi::separated_list0,
    sequence::{delimited, pair, preceded, terminated, tuple},
    IResult,
};
use rustc_hash::FxHashMap;

use crate::error::{Error, Result};
use crate::model::EntityId;
use crate::schema::IfcType;

/// STEP token, borrowing from the input
#[derive(Debug, Clone, PartialEq)]
pub enum Token<'a> {
    /// Entity reference: #123
    EntityRef(u32),
    /// String literal, still escaped; see [`decode_string`]
    String(&'a str),
    Integer(i64),
    Float(f64),
    /// Enum without dots: .ELEMENT. -> ELEMENT
    Enum(&'a str),
    List(Vec<Token<'a>>),
    /// Typed value: IFCPARAMETERVALUE(0.)
    TypedValue(&'a str, Vec<Token<'a>>),
    /// $
    Null,
    /// *
    Derived,
}

impl<'a> Token<'a> {
    pub fn as_entity_ref(&self) -> Option<EntityId> {
        match self {
            Token::EntityRef(id) => Some(EntityId(*id)),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self {
            Token::Float(f) => Some(*f),
            Token::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Token<'a>]> {
        match self {
            Token::List(items) => Some(items),
            _ => None,
        }
    }

    /// Decoded string content
    pub fn as_string(&self) -> Option<String> {
        match self {
            Token::String(raw) => Some(decode_string(raw)),
            _ => None,
        }
    }
}

/// One parsed `#id=TYPE(...);` line
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedEntity<'a> {
    pub id: EntityId,
    pub ifc_type: IfcType,
    pub args: Vec<Token<'a>>,
}

fn entity_ref(input: &str) -> IResult<&str, Token> {
    map(
        preceded(char('#'), map_res(digit1, |s: &str| s.parse::<u32>())),
        Token::EntityRef,
    )(input)
}

/// Body of a quoted string up to the closing quote; `''` is an escaped quote
fn quoted_body(input: &str) -> IResult<&str, &str> {
    let bytes = input.as_bytes();
    let mut i = 0;
    while let Some(offset) = memchr(b'\'', &bytes[i..]) {
        let at = i + offset;
        if bytes.get(at + 1) == Some(&b'\'') {
            i = at + 2;
        } else {
            return Ok((&input[at..], &input[..at]));
        }
    }
    Err(nom::Err::Error(nom::error::Error::new(input, nom::error::ErrorKind::Char)))
}

fn string_literal(input: &str) -> IResult<&str, Token> {
    map(delimited(char('\''), quoted_body, char('\'')), Token::String)(input)
}

fn integer(input: &str) -> IResult<&str, Token> {
    map_res(recognize(pair(opt(char('-')), digit1)), |s: &str| {
        s.parse::<i64>().map(Token::Integer)
    })(input)
}

/// Real with mandatory decimal point: 0., -1.5, 1.E-7
fn float(input: &str) -> IResult<&str, Token> {
    map_res(
        recognize(tuple((
            opt(one_of("+-")),
            digit1,
            char('.'),
            opt(digit1),
            opt(tuple((one_of("eE"), opt(one_of("+-")), digit1))),
        ))),
        |s: &str| fast_float::parse::<f64, _>(s).map(Token::Float),
    )(input)
}

fn enum_value(input: &str) -> IResult<&str, Token> {
    map(
        delimited(
            char('.'),
            take_while1(|c: char| c.is_ascii_alphanumeric() || c == '_'),
            char('.'),
        ),
        Token::Enum,
    )(input)
}

fn null(input: &str) -> IResult<&str, Token> {
    map(char('$'), |_| Token::Null)(input)
}

fn derived(input: &str) -> IResult<&str, Token> {
    map(char('*'), |_| Token::Derived)(input)
}

fn keyword(input: &str) -> IResult<&str, &str> {
    take_while1(|c: char| c.is_ascii_alphanumeric() || c == '_')(input)
}

fn ws(input: &str) -> IResult<&str, &str> {
    take_while(|c: char| c.is_whitespace())(input)
}

/// Comma-separated tokens in parentheses
fn arguments(input: &str) -> IResult<&str, Vec<Token>> {
    delimited(
        char('('),
        separated_list0(delimited(ws, char(','), ws), token),
        preceded(ws, char(')')),
    )(input)
}

fn typed_value(input: &str) -> IResult<&str, Token> {
    map(pair(keyword, arguments), |(name, args)| Token::TypedValue(name, args))(input)
}

fn list(input: &str) -> IResult<&str, Token> {
    map(arguments, Token::List)(input)
}

fn token(input: &str) -> IResult<&str, Token> {
    delimited(
        ws,
        alt((
            float, // before integer: a float starts like one
            integer,
            entity_ref,
            string_literal,
            enum_value,
            list,
            typed_value,
            null,
            derived,
        )),
        ws,
    )(input)
}

/// Parse one entity instance line
///
/// Example: `#12=IFCDIRECTION((0.,0.,1.));`
pub fn parse_entity(input: &str) -> Result<ParsedEntity<'_>> {
    let parsed: IResult<&str, (u32, &str, Vec<Token>)> = tuple((
        delimited(
            ws,
            preceded(char('#'), map_res(digit1, |s: &str| s.parse::<u32>())),
            ws,
        ),
        preceded(char('='), delimited(ws, keyword, ws)),
        terminated(arguments, tuple((ws, tag(";")))),
    ))(input);

    match parsed {
        Ok((_, (id, type_name, args))) => {
            let ifc_type = IfcType::from_str(type_name)
                .ok_or_else(|| Error::InvalidIfcType(type_name.to_string()))?;
            Ok(ParsedEntity {
                id: EntityId(id),
                ifc_type,
                args,
            })
        }
        Err(e) => Err(Error::parse(0, format!("Failed to parse entity: {}", e))),
    }
}

/// Undo STEP string escaping: `''`, `\\` and `\X2\...\X0\` runs
pub fn decode_string(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut rest = raw;
    while let Some(pos) = memchr2(b'\'', b'\\', rest.as_bytes()) {
        out.push_str(&rest[..pos]);
        let tail = &rest[pos..];
        if let Some(after) = tail.strip_prefix("''") {
            out.push('\'');
            rest = after;
        } else if let Some(after) = tail.strip_prefix("\\\\") {
            out.push('\\');
            rest = after;
        } else if let Some(after) = tail.strip_prefix("\\X2\\") {
            let end = after.find("\\X0\\").unwrap_or(after.len());
            let units: Vec<u16> = after[..end]
                .as_bytes()
                .chunks(4)
                .filter_map(|c| std::str::from_utf8(c).ok())
                .filter_map(|h| u16::from_str_radix(h, 16).ok())
                .collect();
            out.extend(char::decode_utf16(units).map(|r| r.unwrap_or(char::REPLACEMENT_CHARACTER)));
            rest = after.get(end + 4..).unwrap_or("");
        } else {
            out.push_str(&tail[..1]);
            rest = &tail[1..];
        }
    }
    out.push_str(rest);
    out
}

/// Schema name from the FILE_SCHEMA header entry
pub fn read_schema(content: &str) -> Option<&str> {
    let start = content.find("FILE_SCHEMA")?;
    let rest = &content[start..];
    let open = rest.find('\'')? + 1;
    let close = rest[open..].find('\'')? + open;
    Some(&rest[open..close])
}

/// Entity scanner over the DATA section
///
/// Finds entity boundaries without tokenizing attributes. Semicolons and
/// `#` inside string literals are skipped.
pub struct EntityScanner<'a> {
    content: &'a str,
    start: usize,
    position: usize,
}

impl<'a> EntityScanner<'a> {
    pub fn new(content: &'a str) -> Self {
        let start = content
            .find("DATA;")
            .map(|i| i + "DATA;".len())
            .unwrap_or(0);
        Self {
            content,
            start,
            position: start,
        }
    }

    /// End of the statement starting at `from`, skipping quoted strings
    fn statement_end(&self, from: usize) -> Option<usize> {
        let bytes = self.content.as_bytes();
        let mut i = from;
        loop {
            let offset = memchr2(b';', b'\'', &bytes[i..])?;
            let at = i + offset;
            if bytes[at] == b';' {
                return Some(at + 1);
            }
            // Skip the string body, '' included
            let (rest, _) = quoted_body(&self.content[at + 1..]).ok()?;
            i = self.content.len() - rest.len() + 1;
        }
    }

    /// Next entity as (id, type name, line start, line end)
    pub fn next_entity(&mut self) -> Option<(EntityId, &'a str, usize, usize)> {
        let bytes = self.content.as_bytes();
        let hash = memchr(b'#', &bytes[self.position..])?;
        let line_start = self.position + hash;
        let line_end = self.statement_end(line_start)?;
        self.position = line_end;

        let line = &self.content[line_start..line_end];
        let eq = line.find('=')?;
        let id = line[1..eq].trim().parse::<u32>().ok()?;
        let after_eq = line[eq + 1..].trim_start();
        let type_len = after_eq
            .find(|c: char| c == '(' || c.is_whitespace())
            .unwrap_or(after_eq.len());

        Some((EntityId(id), &after_eq[..type_len], line_start, line_end))
    }

    /// Slice of one entity line
    pub fn line(&self, start: usize, end: usize) -> &'a str {
        &self.content[start..end]
    }

    /// All entities of one type name (case-insensitive)
    pub fn find_by_type(&mut self, target_type: &str) -> Vec<(EntityId, usize, usize)> {
        let mut results = Vec::new();
        while let Some((id, type_name, start, end)) = self.next_entity() {
            if type_name.eq_ignore_ascii_case(target_type) {
                results.push((id, start, end));
            }
        }
        results
    }

    /// Entity count per type name
    pub fn count_by_type(&mut self) -> FxHashMap<String, usize> {
        let mut counts = FxHashMap::default();
        while let Some((_, type_name, _, _)) = self.next_entity() {
            *counts.entry(type_name.to_string()).or_insert(0) += 1;
        }
        counts
    }

    /// Restart at the beginning of the DATA section
    pub fn reset(&mut self) {
        self.position = self.start;
    }
}
