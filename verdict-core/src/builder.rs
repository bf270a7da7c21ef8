use verdict_value::Value;

use crate::status::{StatusMatcher, StatusRange};
use crate::{Error, Result};

/// What a single `expected_statuses` argument turned out to be.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArgumentShape {
    Integer(i64),
    Range(StatusRange),
    /// An object with both `min` and `max`, at least one of them not an integer.
    MalformedRange,
    Invalid,
}

impl ArgumentShape {
    /// Classifies by the value's runtime category only: a float holding a whole number is
    /// still a float. Fields other than `min`/`max` are ignored.
    #[must_use]
    pub fn classify(value: &Value) -> Self {
        if let Some(v) = value.as_integer() {
            return Self::Integer(v);
        }

        if !matches!(value, Value::Object(_)) {
            return Self::Invalid;
        }

        let (Some(min), Some(max)) = (value.field("min"), value.field("max")) else {
            return Self::Invalid;
        };

        match (min.as_integer(), max.as_integer()) {
            (Some(min), Some(max)) => Self::Range(StatusRange::new(min, max)),
            _ => Self::MalformedRange,
        }
    }
}

/// Builds a matcher from script arguments, failing on the first invalid one.
pub fn build_expected_statuses(args: &[Value]) -> Result<StatusMatcher> {
    if args.is_empty() {
        return Err(Error::NoArguments);
    }

    let mut exact = Vec::new();
    let mut ranges = Vec::new();

    for (idx, arg) in args.iter().enumerate() {
        let position = idx + 1;
        match ArgumentShape::classify(arg) {
            ArgumentShape::Integer(v) => exact.push(v),
            ArgumentShape::Range(r) => ranges.push(r),
            ArgumentShape::MalformedRange => {
                return Err(Error::RangeBoundsNotIntegers { position });
            }
            ArgumentShape::Invalid => return Err(Error::NotIntegerOrRange { position }),
        }
    }

    Ok(StatusMatcher::new(exact, ranges))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn range(min: Value, max: Value) -> Value {
        Value::object([("min", min), ("max", max)])
    }

    #[test]
    fn builds_exact_and_ranges_in_order() {
        let m = build_expected_statuses(&[
            Value::I64(200),
            Value::I64(300),
            range(Value::I64(200), Value::I64(300)),
        ])
        .unwrap_or_else(|err| panic!("build: {err}"));

        assert_eq!(m.exact(), &[200, 300]);
        assert_eq!(m.ranges(), &[StatusRange::new(200, 300)]);
    }

    #[test]
    fn extra_range_fields_are_ignored() {
        let plain = build_expected_statuses(&[
            Value::I64(200),
            Value::I64(300),
            range(Value::I64(200), Value::I64(300)),
        ])
        .unwrap_or_else(|err| panic!("build: {err}"));

        let extra = build_expected_statuses(&[
            Value::I64(200),
            Value::I64(300),
            Value::object([
                ("min", Value::I64(200)),
                ("max", Value::I64(300)),
                ("other", Value::from("attribute")),
            ]),
        ])
        .unwrap_or_else(|err| panic!("build: {err}"));

        assert_eq!(plain, extra);
    }

    #[test]
    fn duplicates_are_preserved() {
        let m = build_expected_statuses(&[Value::I64(200), Value::U64(200)])
            .unwrap_or_else(|err| panic!("build: {err}"));
        assert_eq!(m.exact(), &[200, 200]);
    }

    #[test]
    fn no_arguments() {
        let err = build_expected_statuses(&[]).err();
        assert_eq!(err, Some(Error::NoArguments));
        assert_eq!(err.map(|e| e.to_string()).as_deref(), Some("no arguments"));
    }

    #[test]
    fn string_status_is_rejected_at_its_position() {
        let err = build_expected_statuses(&[
            Value::I64(200),
            Value::from("300"),
            range(Value::I64(200), Value::I64(300)),
        ])
        .err();
        assert_eq!(err, Some(Error::NotIntegerOrRange { position: 2 }));
    }

    #[test]
    fn fractional_status_is_rejected() {
        let err = build_expected_statuses(&[
            Value::I64(200),
            Value::F64(300.5),
            range(Value::I64(200), Value::I64(300)),
        ])
        .err();
        assert_eq!(err, Some(Error::NotIntegerOrRange { position: 2 }));
    }

    #[test]
    fn whole_float_is_still_a_float() {
        let err = build_expected_statuses(&[Value::F64(200.0)]).err();
        assert_eq!(err, Some(Error::NotIntegerOrRange { position: 1 }));
    }

    #[test]
    fn non_integer_bounds_are_rejected() {
        let err = build_expected_statuses(&[
            Value::I64(200),
            Value::I64(300),
            range(Value::I64(200), Value::from("300")),
        ])
        .err();
        assert_eq!(err, Some(Error::RangeBoundsNotIntegers { position: 3 }));

        let err = build_expected_statuses(&[
            Value::I64(200),
            Value::I64(300),
            range(Value::I64(200), Value::F64(300.5)),
        ])
        .err();
        assert_eq!(err, Some(Error::RangeBoundsNotIntegers { position: 3 }));
    }

    #[test]
    fn object_missing_a_bound_is_not_a_range() {
        let err =
            build_expected_statuses(&[Value::object([("min", Value::I64(200))])]).err();
        assert_eq!(err, Some(Error::NotIntegerOrRange { position: 1 }));

        let err = build_expected_statuses(&[range(Value::I64(200), Value::Null)]).err();
        assert_eq!(err, Some(Error::NotIntegerOrRange { position: 1 }));
    }

    #[test]
    fn first_invalid_argument_wins() {
        let err = build_expected_statuses(&[
            Value::Bool(true),
            range(Value::from("a"), Value::I64(1)),
        ])
        .err();
        assert_eq!(err, Some(Error::NotIntegerOrRange { position: 1 }));
    }

    #[test]
    fn inverted_range_is_accepted() {
        let m = build_expected_statuses(&[range(Value::I64(400), Value::I64(200))])
            .unwrap_or_else(|err| panic!("build: {err}"));
        assert!(!m.matches(300));
    }

    #[test]
    fn classify_shapes() {
        assert_eq!(ArgumentShape::classify(&Value::I64(5)), ArgumentShape::Integer(5));
        assert_eq!(ArgumentShape::classify(&Value::Null), ArgumentShape::Invalid);
        assert_eq!(
            ArgumentShape::classify(&Value::Array(vec![Value::I64(1)])),
            ArgumentShape::Invalid
        );
        assert_eq!(
            ArgumentShape::classify(&range(Value::I64(1), Value::I64(2))),
            ArgumentShape::Range(StatusRange::new(1, 2))
        );
        assert_eq!(
            ArgumentShape::classify(&range(Value::Bool(true), Value::I64(2))),
            ArgumentShape::MalformedRange
        );
    }
}
