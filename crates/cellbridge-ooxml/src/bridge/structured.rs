//! The capability a value needs to be encoded into a workbook

use chrono::{DateTime, Utc};
use serde_json::Value as JsonValue;

use crate::value::Value;

/// What a value looks like to the encoder
pub enum Shape<'a> {
    /// A single tagged scalar
    Scalar(Value),
    /// Named fields of a record, in any order
    Fields(Vec<(&'a str, &'a dyn Structured)>),
    /// Elements of a sequence, in order
    Elements(Vec<&'a dyn Structured>),
}

/// A value that can describe its own shape.
///
/// ```
/// use cellbridge_ooxml::bridge::{Shape, Structured};
///
/// struct Person {
///     name: String,
///     age: i64,
/// }
///
/// impl Structured for Person {
///     fn shape(&self) -> Shape<'_> {
///         Shape::Fields(vec![("name", &self.name), ("age", &self.age)])
///     }
/// }
/// ```
pub trait Structured {
    fn shape(&self) -> Shape<'_>;
}

/// Bytes encoded as one binary scalar instead of a sequence of integers
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Binary(pub Vec<u8>);

impl Structured for Binary {
    fn shape(&self) -> Shape<'_> {
        Shape::Scalar(Value::Binary(self.0.clone()))
    }
}

impl Structured for Value {
    fn shape(&self) -> Shape<'_> {
        Shape::Scalar(self.clone())
    }
}

impl Structured for String {
    fn shape(&self) -> Shape<'_> {
        Shape::Scalar(Value::String(self.clone()))
    }
}

impl Structured for &str {
    fn shape(&self) -> Shape<'_> {
        Shape::Scalar(Value::String((*self).to_string()))
    }
}

impl Structured for bool {
    fn shape(&self) -> Shape<'_> {
        Shape::Scalar(Value::Boolean(*self))
    }
}

impl Structured for DateTime<Utc> {
    fn shape(&self) -> Shape<'_> {
        Shape::Scalar(Value::Timestamp(*self))
    }
}

macro_rules! structured_integer {
    ($($t:ty),*) => {
        $(
            impl Structured for $t {
                fn shape(&self) -> Shape<'_> {
                    Shape::Scalar(Value::Integer(i64::from(*self)))
                }
            }
        )*
    };
}

structured_integer!(i8, i16, i32, i64, u8, u16, u32);

macro_rules! structured_wide_integer {
    ($($t:ty),*) => {
        $(
            impl Structured for $t {
                fn shape(&self) -> Shape<'_> {
                    match i64::try_from(*self) {
                        Ok(i) => Shape::Scalar(Value::Integer(i)),
                        Err(_) => Shape::Scalar(Value::String(self.to_string())),
                    }
                }
            }
        )*
    };
}

structured_wide_integer!(u64, usize, isize);

impl Structured for f32 {
    fn shape(&self) -> Shape<'_> {
        Shape::Scalar(Value::Real(f64::from(*self)))
    }
}

impl Structured for f64 {
    fn shape(&self) -> Shape<'_> {
        Shape::Scalar(Value::Real(*self))
    }
}

impl<T: Structured> Structured for Option<T> {
    fn shape(&self) -> Shape<'_> {
        match self {
            Some(value) => value.shape(),
            None => Shape::Scalar(Value::Null),
        }
    }
}

impl<T: Structured> Structured for Vec<T> {
    fn shape(&self) -> Shape<'_> {
        Shape::Elements(self.iter().map(|item| item as &dyn Structured).collect())
    }
}

impl Structured for JsonValue {
    fn shape(&self) -> Shape<'_> {
        match self {
            JsonValue::Null => Shape::Scalar(Value::Null),
            JsonValue::Bool(b) => Shape::Scalar(Value::Boolean(*b)),
            JsonValue::Number(n) => match n.as_i64() {
                Some(i) => Shape::Scalar(Value::Integer(i)),
                None => match n.as_f64() {
                    Some(f) => Shape::Scalar(Value::Real(f)),
                    None => Shape::Scalar(Value::String(n.to_string())),
                },
            },
            JsonValue::String(s) => Shape::Scalar(Value::String(s.clone())),
            JsonValue::Array(items) => {
                Shape::Elements(items.iter().map(|item| item as &dyn Structured).collect())
            }
            JsonValue::Object(map) => Shape::Fields(
                map.iter()
                    .map(|(key, value)| (key.as_str(), value as &dyn Structured))
                    .collect(),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn scalar(value: &dyn Structured) -> Value {
        match value.shape() {
            Shape::Scalar(v) => v,
            _ => panic!("expected a scalar"),
        }
    }

    #[test]
    fn test_primitive_shapes() {
        assert_eq!(scalar(&42u8), Value::Integer(42));
        assert_eq!(scalar(&-3i32), Value::Integer(-3));
        assert_eq!(scalar(&1.5f64), Value::Real(1.5));
        assert_eq!(scalar(&"hi"), Value::String("hi".to_string()));
        assert_eq!(scalar(&None::<i64>), Value::Null);
        assert_eq!(scalar(&Some(true)), Value::Boolean(true));
        assert_eq!(scalar(&u64::MAX), Value::String(u64::MAX.to_string()));
        assert_eq!(scalar(&Binary(vec![1, 2])), Value::Binary(vec![1, 2]));
    }

    #[test]
    fn test_vec_is_elements() {
        let items = vec![1i64, 2, 3];
        match items.shape() {
            Shape::Elements(elements) => assert_eq!(elements.len(), 3),
            _ => panic!("expected elements"),
        }
    }

    #[test]
    fn test_json_object_fields() {
        let doc = json!({"name": "Alice", "age": 25, "ratio": 0.5, "tags": ["a"], "gone": null});
        let Shape::Fields(fields) = doc.shape() else {
            panic!("expected fields");
        };
        let lookup = |name: &str| {
            fields
                .iter()
                .find(|(k, _)| *k == name)
                .map(|(_, v)| *v)
                .unwrap()
        };
        assert_eq!(scalar(lookup("name")), Value::String("Alice".to_string()));
        assert_eq!(scalar(lookup("age")), Value::Integer(25));
        assert_eq!(scalar(lookup("ratio")), Value::Real(0.5));
        assert_eq!(scalar(lookup("gone")), Value::Null);
        assert!(matches!(lookup("tags").shape(), Shape::Elements(_)));
    }
}
