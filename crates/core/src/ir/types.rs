/// Abstract column types as the host toolkit models them. Dialects map these
/// onto their native type syntax; types a backend cannot express are rejected
/// at compile time rather than silently rewritten.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataType {
    Boolean,
    SmallInt,
    Integer,
    BigInt,
    /// Floating point with an optional binary precision. Backends choose a
    /// narrow or wide representation based on the requested precision.
    Float {
        precision: Option<u32>,
    },
    Numeric {
        precision: Option<u32>,
        scale: Option<u32>,
    },
    Text,
    Varchar {
        length: Option<u32>,
    },
    Char {
        length: Option<u32>,
    },
    Binary {
        length: Option<u32>,
    },
    LargeBinary,
    Date,
    Time,
    DateTime,
    Timestamp,
    Json,
    /// An opaque serialized payload stored as raw bytes.
    Opaque,
    Array(Box<DataType>),
    Custom(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    String(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
    Bytes(Vec<u8>),
    Null,
}

impl Value {
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(flag) => Some(*flag),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(text) => Some(text.as_str()),
            _ => None,
        }
    }
}
