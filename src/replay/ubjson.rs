//! A minimal UBJSON reader for replay envelopes.
//!
//! Only reading is supported. Big-endian numbers, `N` no-ops, and the optimized
//! `$type#count` / `#count` container headers are handled. A strongly typed `uint8`
//! array is decoded straight into [`Value::Bytes`].

use indexmap::IndexMap;

use crate::ReplayErrorKind;

/// Containers nested deeper than this are rejected.
pub const MAX_DEPTH: usize = 64;

/// A parsed UBJSON value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// `Z`
    Null,
    /// `T` or `F`
    Bool(bool),
    /// Any integer marker, widened.
    Int(i64),
    /// `d` or `D`, widened.
    Float(f64),
    /// `S`, `C` or `H`. High-precision numbers are kept as their text.
    String(String),
    /// A `[$U#n` array.
    Bytes(Vec<u8>),
    /// `[` ... `]`
    Array(Vec<Value>),
    /// `{` ... `}`, in document order.
    Object(IndexMap<String, Value>),
}

impl Value {
    /// Looks up `key` if this is an object.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        match self {
            Self::Object(map) => map.get(key),
            _ => None,
        }
    }

    /// The string, if this is one.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// The integer, if this is one.
    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// The byte blob, if this is one.
    #[must_use]
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Self::Bytes(b) => Some(b),
            _ => None,
        }
    }

    /// The object entries, if this is an object.
    #[must_use]
    pub fn as_object(&self) -> Option<&IndexMap<String, Value>> {
        match self {
            Self::Object(map) => Some(map),
            _ => None,
        }
    }
}

/// Parses one value from the start of `bytes`. Trailing bytes are ignored.
///
/// # Errors
///
/// Any structural problem is reported as a [`ReplayErrorKind`].
pub fn parse(bytes: &[u8]) -> Result<Value, ReplayErrorKind> {
    let mut parser = Parser { bytes, pos: 0 };
    let marker = parser.marker()?;
    parser.value(marker, 0)
}

struct Parser<'a> {
    bytes: &'a [u8],
    pos: usize,
}

/// Header of an optimized container.
struct ContainerHeader {
    element: Option<u8>,
    count: Option<usize>,
}

impl Parser<'_> {
    fn take(&mut self, n: usize) -> Result<&[u8], ReplayErrorKind> {
        let end = self
            .pos
            .checked_add(n)
            .filter(|&end| end <= self.bytes.len())
            .ok_or(ReplayErrorKind::UnexpectedEnd { offset: self.pos })?;
        let slice = &self.bytes[self.pos..end];
        self.pos = end;
        Ok(slice)
    }

    fn array<const N: usize>(&mut self) -> Result<[u8; N], ReplayErrorKind> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.take(N)?);
        Ok(out)
    }

    fn byte(&mut self) -> Result<u8, ReplayErrorKind> {
        Ok(self.array::<1>()?[0])
    }

    fn peek(&self) -> Result<u8, ReplayErrorKind> {
        self.bytes
            .get(self.pos)
            .copied()
            .ok_or(ReplayErrorKind::UnexpectedEnd { offset: self.pos })
    }

    /// Next type marker, skipping no-ops.
    fn marker(&mut self) -> Result<u8, ReplayErrorKind> {
        loop {
            let marker = self.byte()?;
            if marker != b'N' {
                return Ok(marker);
            }
        }
    }

    fn integer(&mut self, marker: u8) -> Result<Option<i64>, ReplayErrorKind> {
        Ok(Some(match marker {
            b'i' => i64::from(i8::from_be_bytes(self.array()?)),
            b'U' => i64::from(self.byte()?),
            b'I' => i64::from(i16::from_be_bytes(self.array()?)),
            b'l' => i64::from(i32::from_be_bytes(self.array()?)),
            b'L' => i64::from_be_bytes(self.array()?),
            _ => return Ok(None),
        }))
    }

    fn length(&mut self) -> Result<usize, ReplayErrorKind> {
        let offset = self.pos;
        let marker = self.byte()?;
        let invalid = ReplayErrorKind::InvalidLength { offset };
        let value = self.integer(marker)?.ok_or(invalid)?;
        usize::try_from(value).map_err(|_| invalid)
    }

    fn string(&mut self) -> Result<String, ReplayErrorKind> {
        let len = self.length()?;
        let offset = self.pos;
        let bytes = self.take(len)?;
        String::from_utf8(bytes.to_vec()).map_err(|_| ReplayErrorKind::InvalidUtf8 { offset })
    }

    fn container_header(&mut self) -> Result<ContainerHeader, ReplayErrorKind> {
        let mut header = ContainerHeader {
            element: None,
            count: None,
        };
        if self.peek()? == b'$' {
            self.pos += 1;
            header.element = Some(self.byte()?);
            let offset = self.pos;
            if self.byte()? != b'#' {
                return Err(ReplayErrorKind::InvalidLength { offset });
            }
            header.count = Some(self.count(header.element)?);
        } else if self.peek()? == b'#' {
            self.pos += 1;
            header.count = Some(self.count(None)?);
        }
        Ok(header)
    }

    /// A container's declared element count.
    ///
    /// Every element of a valid container takes at least one byte, so a count larger
    /// than the remaining input is rejected, as is a typed container of valueless
    /// markers.
    fn count(&mut self, element: Option<u8>) -> Result<usize, ReplayErrorKind> {
        let offset = self.pos;
        let count = self.length()?;
        let remaining = self.bytes.len() - self.pos;
        let valueless = matches!(element, Some(b'Z' | b'N' | b'T' | b'F'));
        if count > remaining || (valueless && count > 0) {
            return Err(ReplayErrorKind::InvalidLength { offset });
        }
        Ok(count)
    }

    /// Reads the next element of a container, or `None` at its closing marker.
    fn element(
        &mut self,
        header: &ContainerHeader,
        close: u8,
        depth: usize,
    ) -> Result<Option<Value>, ReplayErrorKind> {
        let marker = match header.element {
            Some(marker) => marker,
            None => {
                let marker = self.marker()?;
                if header.count.is_none() && marker == close {
                    return Ok(None);
                }
                marker
            },
        };
        self.value(marker, depth).map(Some)
    }

    fn value(&mut self, marker: u8, depth: usize) -> Result<Value, ReplayErrorKind> {
        if let Some(int) = self.integer(marker)? {
            return Ok(Value::Int(int));
        }
        Ok(match marker {
            b'Z' | b'N' => Value::Null,
            b'T' => Value::Bool(true),
            b'F' => Value::Bool(false),
            b'd' => Value::Float(f64::from(f32::from_be_bytes(self.array()?))),
            b'D' => Value::Float(f64::from_be_bytes(self.array()?)),
            b'C' => Value::String(char::from(self.byte()?).to_string()),
            b'S' | b'H' => Value::String(self.string()?),
            b'[' => self.array_value(depth + 1)?,
            b'{' => self.object_value(depth + 1)?,
            _ => {
                return Err(ReplayErrorKind::UnknownMarker {
                    marker,
                    offset: self.pos - 1,
                })
            },
        })
    }

    fn array_value(&mut self, depth: usize) -> Result<Value, ReplayErrorKind> {
        if depth > MAX_DEPTH {
            return Err(ReplayErrorKind::NestingTooDeep { depth });
        }
        let header = self.container_header()?;
        if let (Some(b'U'), Some(count)) = (header.element, header.count) {
            return Ok(Value::Bytes(self.take(count)?.to_vec()));
        }

        let mut items = Vec::new();
        match header.count {
            Some(count) => {
                for _ in 0..count {
                    if let Some(item) = self.element(&header, b']', depth)? {
                        items.push(item);
                    }
                }
            },
            None => {
                while let Some(item) = self.element(&header, b']', depth)? {
                    items.push(item);
                }
            },
        }
        Ok(Value::Array(items))
    }

    fn object_value(&mut self, depth: usize) -> Result<Value, ReplayErrorKind> {
        if depth > MAX_DEPTH {
            return Err(ReplayErrorKind::NestingTooDeep { depth });
        }
        let header = self.container_header()?;
        let mut map = IndexMap::new();
        let mut remaining = header.count;
        loop {
            match remaining.as_mut() {
                Some(0) => break,
                Some(n) => *n -= 1,
                None => {
                    while self.peek()? == b'N' {
                        self.pos += 1;
                    }
                    if self.peek()? == b'}' {
                        self.pos += 1;
                        break;
                    }
                },
            }
            let key = self.string()?;
            let marker = match header.element {
                Some(marker) => marker,
                None => self.marker()?,
            };
            let value = self.value(marker, depth)?;
            map.insert(key, value);
        }
        Ok(Value::Object(map))
    }
}

#[cfg(test)]
#[allow(
    clippy::panic,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing
)]
mod tests {
    use super::*;

    #[test]
    fn scalars() {
        assert_eq!(parse(b"Z").unwrap(), Value::Null);
        assert_eq!(parse(b"T").unwrap(), Value::Bool(true));
        assert_eq!(parse(b"i\xff").unwrap(), Value::Int(-1));
        assert_eq!(parse(b"U\xff").unwrap(), Value::Int(255));
        assert_eq!(parse(b"I\x01\x00").unwrap(), Value::Int(256));
        assert_eq!(parse(b"l\x00\x01\x00\x00").unwrap(), Value::Int(65536));
        assert_eq!(parse(b"d\x3f\x80\x00\x00").unwrap(), Value::Float(1.0));
        assert_eq!(parse(b"SU\x02hi").unwrap(), Value::String("hi".into()));
        assert_eq!(parse(b"Ca").unwrap(), Value::String("a".into()));
        assert_eq!(parse(b"NNT").unwrap(), Value::Bool(true));
    }

    #[test]
    fn containers() {
        let doc = b"{U\x01a[i\x01i\x02]U\x01b{U\x01cT}}";
        let value = parse(doc).unwrap();
        assert_eq!(
            value.get("a"),
            Some(&Value::Array(vec![Value::Int(1), Value::Int(2)]))
        );
        assert_eq!(value.get("b").and_then(|b| b.get("c")), Some(&Value::Bool(true)));
    }

    #[test]
    fn optimized_containers() {
        assert_eq!(
            parse(b"[$U#U\x03\x01\x02\x03").unwrap(),
            Value::Bytes(vec![1, 2, 3])
        );
        assert_eq!(
            parse(b"[#U\x02TF").unwrap(),
            Value::Array(vec![Value::Bool(true), Value::Bool(false)])
        );
        let object = parse(b"{$i#U\x02U\x01x\x05U\x01y\x06").unwrap();
        assert_eq!(object.get("y"), Some(&Value::Int(6)));
    }

    #[test]
    fn malformed_documents() {
        assert_eq!(
            parse(b"SU\x05hi"),
            Err(ReplayErrorKind::UnexpectedEnd { offset: 3 })
        );
        assert_eq!(
            parse(b"X"),
            Err(ReplayErrorKind::UnknownMarker {
                marker: b'X',
                offset: 0
            })
        );
        assert_eq!(
            parse(b"Si\xff"),
            Err(ReplayErrorKind::InvalidLength { offset: 1 })
        );
        assert_eq!(
            parse(b"SU\x01\xff"),
            Err(ReplayErrorKind::InvalidUtf8 { offset: 3 })
        );
        assert!(parse(b"[T").is_err());
    }

    #[test]
    fn counts_are_bounded_by_the_input() {
        assert_eq!(
            parse(b"[$Z#l\x01\x00\x00\x00"),
            Err(ReplayErrorKind::InvalidLength { offset: 4 })
        );
        assert_eq!(
            parse(b"[$T#l\x7f\xff\xff\xff"),
            Err(ReplayErrorKind::InvalidLength { offset: 4 })
        );
        assert_eq!(
            parse(b"[#U\x05TF"),
            Err(ReplayErrorKind::InvalidLength { offset: 2 })
        );
        assert_eq!(
            parse(b"{#L\x00\x00\x00\x01\x00\x00\x00\x00}"),
            Err(ReplayErrorKind::InvalidLength { offset: 2 })
        );
        assert_eq!(parse(b"[$Z#U\x00").unwrap(), Value::Array(Vec::new()));
    }

    #[test]
    fn nesting_is_bounded() {
        let mut doc = vec![b'['; MAX_DEPTH + 1];
        doc.extend(vec![b']'; MAX_DEPTH + 1]);
        assert_eq!(
            parse(&doc),
            Err(ReplayErrorKind::NestingTooDeep {
                depth: MAX_DEPTH + 1
            })
        );

        let mut doc = vec![b'['; MAX_DEPTH];
        doc.extend(vec![b']'; MAX_DEPTH]);
        assert!(parse(&doc).is_ok());
    }
}
