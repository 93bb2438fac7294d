use serde_json::Value;

/// Identity of a raw record: a non-zero integral number, or a string that
/// parses to one. Anything else means the record cannot be keyed.
pub fn record_id(record: &Value) -> Option<i64> {
    let object = record.as_object()?;
    let raw = object.get("id").or_else(|| object.get("Id"))?;

    let id = match raw {
        Value::Number(n) => n.as_i64().or_else(|| {
            n.as_f64()
                .filter(|f| f.fract() == 0.0 && f.abs() < i64::MAX as f64)
                .map(|f| f as i64)
        }),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    }?;

    (id != 0).then_some(id)
}

pub fn is_renderable(record: &Value) -> bool {
    record_id(record).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_non_objects_are_not_renderable() {
        for v in [json!(null), json!(7), json!("7"), json!([{"id": 7}]), json!(true)] {
            assert!(!is_renderable(&v), "{}", v);
        }
    }

    #[test]
    fn test_falsy_or_missing_id() {
        for v in [
            json!({}),
            json!({"id": null}),
            json!({"id": 0}),
            json!({"id": ""}),
            json!({"id": "0"}),
            json!({"id": false}),
            json!({"id": "abc"}),
            json!({"id": 1.5}),
            json!({"id": {"n": 1}}),
        ] {
            assert!(!is_renderable(&v), "{}", v);
        }
    }

    #[test]
    fn test_usable_ids() {
        assert_eq!(record_id(&json!({"id": 7})), Some(7));
        assert_eq!(record_id(&json!({"Id": 12})), Some(12));
        assert_eq!(record_id(&json!({"id": " 42 "})), Some(42));
        assert_eq!(record_id(&json!({"id": 3.0})), Some(3));
        assert_eq!(record_id(&json!({"id": -4})), Some(-4));
    }

    #[test]
    fn test_other_field_defects_do_not_invalidate() {
        let record = json!({"id": 9, "price": "abc", "timestamp": "never", "action": 5});
        assert!(is_renderable(&record));
    }
}
