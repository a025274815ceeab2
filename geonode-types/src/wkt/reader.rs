use crate::cartesian::Coord;
use crate::error::GeonodeTypesError;
use crate::geometry::{
    Geom, GeometryCollection, GeometryType, LineString, MultiLineString, MultiPoint, MultiPolygon,
    Point, Polygon,
};

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Word(String),
    Number(f64),
    LeftParen,
    RightParen,
    Comma,
}

struct Tokenizer<'a> {
    text: &'a str,
    position: usize,
}

impl<'a> Tokenizer<'a> {
    fn new(text: &'a str) -> Self {
        Self { text, position: 0 }
    }

    fn error(&self, message: impl AsRef<str>) -> GeonodeTypesError {
        GeonodeTypesError::Parse(format!("{} at position {}", message.as_ref(), self.position))
    }

    fn skip_whitespace(&mut self) {
        let rest = &self.text[self.position..];
        self.position += rest.len() - rest.trim_start().len();
    }

    fn peek(&mut self) -> Result<Option<Token>, GeonodeTypesError> {
        let position = self.position;
        let token = self.next_token();
        self.position = position;
        token
    }

    fn next_token(&mut self) -> Result<Option<Token>, GeonodeTypesError> {
        self.skip_whitespace();
        let rest = &self.text[self.position..];
        let Some(first) = rest.chars().next() else {
            return Ok(None);
        };

        let single = match first {
            '(' => Some(Token::LeftParen),
            ')' => Some(Token::RightParen),
            ',' => Some(Token::Comma),
            _ => None,
        };
        if let Some(token) = single {
            self.position += 1;
            return Ok(Some(token));
        }

        if first.is_ascii_alphabetic() {
            let len = rest
                .find(|c: char| !c.is_ascii_alphanumeric() && c != '_')
                .unwrap_or(rest.len());
            self.position += len;
            return Ok(Some(Token::Word(rest[..len].to_ascii_uppercase())));
        }

        if first.is_ascii_digit() || matches!(first, '-' | '+' | '.') {
            let len = rest
                .find(|c: char| !(c.is_ascii_alphanumeric() || matches!(c, '-' | '+' | '.')))
                .unwrap_or(rest.len());
            let literal = &rest[..len];
            let value: f64 = literal
                .parse()
                .map_err(|_| self.error(format!("invalid number '{literal}'")))?;
            if !value.is_finite() {
                return Err(self.error(format!("non-finite number '{literal}'")));
            }
            self.position += len;
            return Ok(Some(Token::Number(value)));
        }

        Err(self.error(format!("unexpected character '{first}'")))
    }

    fn expect(&mut self, expected: Token) -> Result<(), GeonodeTypesError> {
        match self.next_token()? {
            Some(token) if token == expected => Ok(()),
            Some(token) => Err(self.error(format!("expected {expected:?}, found {token:?}"))),
            None => Err(self.error(format!("expected {expected:?}, found end of input"))),
        }
    }
}

/// Deepest allowed nesting of geometry collections.
pub const MAX_NESTING: usize = 256;

/// Recursive-descent parser over the tokens of a single WKT document.
struct Parser<'a> {
    tokens: Tokenizer<'a>,
    /// Number of geometry collections the parser is currently inside.
    depth: usize,
}

impl Parser<'_> {
    /// Consumes `EMPTY` or `(`. Returns true for `EMPTY`.
    fn open_or_empty(&mut self) -> Result<bool, GeonodeTypesError> {
        match self.tokens.next_token()? {
            Some(Token::Word(word)) if word == "EMPTY" => Ok(true),
            Some(Token::LeftParen) => Ok(false),
            Some(Token::Word(word)) if matches!(word.as_str(), "Z" | "M" | "ZM") => Err(self
                .tokens
                .error("Z and M ordinates are not supported")),
            Some(token) => Err(self
                .tokens
                .error(format!("expected '(' or EMPTY, found {token:?}"))),
            None => Err(self.tokens.error("unexpected end of input")),
        }
    }

    /// Parses `item (, item)* )` after an opening parenthesis.
    fn list<T>(
        &mut self,
        mut item: impl FnMut(&mut Self) -> Result<T, GeonodeTypesError>,
    ) -> Result<Vec<T>, GeonodeTypesError> {
        let mut items = vec![item(self)?];
        loop {
            match self.tokens.next_token()? {
                Some(Token::Comma) => items.push(item(self)?),
                Some(Token::RightParen) => return Ok(items),
                Some(token) => {
                    return Err(self
                        .tokens
                        .error(format!("expected ',' or ')', found {token:?}")))
                }
                None => return Err(self.tokens.error("unexpected end of input")),
            }
        }
    }

    fn number(&mut self) -> Result<f64, GeonodeTypesError> {
        match self.tokens.next_token()? {
            Some(Token::Number(value)) => Ok(value),
            Some(token) => Err(self.tokens.error(format!("expected number, found {token:?}"))),
            None => Err(self.tokens.error("unexpected end of input")),
        }
    }

    fn coord(&mut self) -> Result<Coord, GeonodeTypesError> {
        let x = self.number()?;
        let y = self.number()?;
        if let Some(Token::Number(_)) = self.tokens.peek()? {
            return Err(self.tokens.error("Z and M ordinates are not supported"));
        }
        Ok(Coord::new(x, y))
    }

    fn coords(&mut self) -> Result<Vec<Coord>, GeonodeTypesError> {
        self.list(Self::coord)
    }

    fn point_body(&mut self) -> Result<Point, GeonodeTypesError> {
        if self.open_or_empty()? {
            return Ok(Point::empty());
        }
        let coord = self.coord()?;
        self.tokens.expect(Token::RightParen)?;
        Ok(Point::new(coord))
    }

    fn line_body(&mut self) -> Result<LineString, GeonodeTypesError> {
        if self.open_or_empty()? {
            return Ok(LineString::default());
        }
        let coords = self.coords()?;
        if coords.len() < 2 {
            return Err(self
                .tokens
                .error("line string must have at least 2 points"));
        }
        Ok(LineString::new(coords))
    }

    fn ring(&mut self) -> Result<LineString, GeonodeTypesError> {
        self.tokens.expect(Token::LeftParen)?;
        let ring = LineString::new(self.coords()?);
        if ring.coords().len() < 4 {
            return Err(self.tokens.error("ring must have at least 4 points"));
        }
        if !ring.is_closed() {
            return Err(self.tokens.error("ring is not closed"));
        }
        Ok(ring)
    }

    fn polygon_body(&mut self) -> Result<Polygon, GeonodeTypesError> {
        if self.open_or_empty()? {
            return Ok(Polygon::empty());
        }
        let mut rings = self.list(Self::ring)?.into_iter();
        let exterior = rings.next().unwrap_or_default();
        Ok(Polygon::new(exterior, rings.collect()))
    }

    fn multi_point_member(&mut self) -> Result<Point, GeonodeTypesError> {
        match self.tokens.peek()? {
            Some(Token::Number(_)) => Ok(Point::new(self.coord()?)),
            _ => self.point_body(),
        }
    }

    fn geometry(&mut self) -> Result<Geom, GeonodeTypesError> {
        let keyword = match self.tokens.next_token()? {
            Some(Token::Word(word)) => word,
            Some(token) => {
                return Err(self
                    .tokens
                    .error(format!("expected geometry keyword, found {token:?}")))
            }
            None => return Err(self.tokens.error("empty input")),
        };
        let geometry_type = GeometryType::from_keyword(&keyword)
            .ok_or_else(|| self.tokens.error(format!("unknown geometry type '{keyword}'")))?;

        let geom = match geometry_type {
            GeometryType::Point => Geom::Point(self.point_body()?),
            GeometryType::LineString => Geom::LineString(self.line_body()?),
            GeometryType::Polygon => Geom::Polygon(self.polygon_body()?),
            GeometryType::MultiPoint => Geom::MultiPoint(MultiPoint::new(if self.open_or_empty()? {
                vec![]
            } else {
                self.list(Self::multi_point_member)?
            })),
            GeometryType::MultiLineString => {
                Geom::MultiLineString(MultiLineString::new(if self.open_or_empty()? {
                    vec![]
                } else {
                    self.list(Self::line_body)?
                }))
            }
            GeometryType::MultiPolygon => {
                Geom::MultiPolygon(MultiPolygon::new(if self.open_or_empty()? {
                    vec![]
                } else {
                    self.list(Self::polygon_body)?
                }))
            }
            GeometryType::GeometryCollection => {
                if self.depth == MAX_NESTING {
                    return Err(self.tokens.error(format!(
                        "geometry collections nested deeper than {MAX_NESTING} levels"
                    )));
                }
                self.depth += 1;
                let parts = if self.open_or_empty()? {
                    vec![]
                } else {
                    self.list(Self::geometry)?
                };
                self.depth -= 1;
                Geom::GeometryCollection(GeometryCollection::new(parts))
            }
        };

        Ok(geom)
    }
}

/// Parses a WKT document.
///
/// Keywords are case-insensitive. `MULTIPOINT` members may be written with or without parentheses.
/// Z/M ordinates, unclosed rings and non-finite numbers are rejected, as are collections nested deeper than
/// [`MAX_NESTING`].
pub fn read(text: &str) -> Result<Geom, GeonodeTypesError> {
    let mut parser = Parser {
        tokens: Tokenizer::new(text),
        depth: 0,
    };
    let geom = parser.geometry()?;
    match parser.tokens.next_token()? {
        None => Ok(geom),
        Some(token) => Err(parser
            .tokens
            .error(format!("unexpected trailing {token:?}"))),
    }
}

/// Parses extended WKT: an optional `SRID=<n>;` prefix followed by a WKT document.
pub fn read_ewkt(text: &str) -> Result<(Option<i32>, Geom), GeonodeTypesError> {
    let trimmed = text.trim_start();
    let Some(prefix) = trimmed
        .get(..5)
        .filter(|p| p.eq_ignore_ascii_case("SRID="))
    else {
        return Ok((None, read(text)?));
    };

    let rest = &trimmed[prefix.len()..];
    let (srid, wkt) = rest
        .split_once(';')
        .ok_or_else(|| GeonodeTypesError::Parse("missing ';' after SRID".into()))?;
    let srid = srid
        .trim()
        .parse::<i32>()
        .map_err(|_| GeonodeTypesError::Parse(format!("invalid SRID '{srid}'")))?;

    Ok((Some(srid), read(wkt)?))
}
