//! Table-driven round-trip, exact-size and minimal-width checks.

use sanctum_zlmp::{
    decode, encode, size_of, AllocStrategy, Decoder, Encoder, Value, ZlmpError,
};

fn int_boundaries() -> Vec<(i64, usize)> {
    vec![
        (i64::MIN, 9),
        (-(1i64 << 31) - 1, 9),
        (-(1i64 << 31), 5),
        (-32769, 5),
        (-32768, 3),
        (-129, 3),
        (-128, 2),
        (-33, 2),
        (-32, 1),
        (-1, 1),
        (0, 1),
        (1, 1),
        (32, 1),
        (127, 1),
        (128, 3),
        ((1 << 15) - 1, 3),
        (1 << 15, 5),
        ((1i64 << 31) - 1, 5),
        (1i64 << 31, 9),
        (i64::MAX, 9),
    ]
}

fn float_samples() -> Vec<(f64, usize)> {
    vec![
        (0.0, 5),
        (-0.0, 5),
        (f64::NAN, 5),
        (f64::INFINITY, 5),
        (f64::NEG_INFINITY, 5),
        (1.5, 5),
        (0.1, 9),
        (f64::MIN_POSITIVE, 9),
        (16777217.0, 9),
    ]
}

fn nested(depth: usize) -> Value {
    let mut v = Value::map([("leaf", Value::Float(0.1))]);
    for level in 1..depth {
        v = Value::map([
            (Value::from(format!("level{}", level)), v),
            (Value::Int(level as i64), Value::Bool(level % 2 == 0)),
        ]);
    }
    v
}

fn samples() -> Vec<Value> {
    let mut values = vec![Value::Nil, Value::Bool(true), Value::Bool(false)];
    values.extend(int_boundaries().into_iter().map(|(i, _)| Value::Int(i)));
    values.extend(float_samples().into_iter().map(|(f, _)| Value::Float(f)));
    for len in [0usize, 31, 32, 255, 256, 65535, 65536] {
        values.push(Value::Bytes((0..len).map(|i| i as u8).collect()));
    }
    values.push(Value::Map(vec![]));
    values.push(Value::map([(Value::Nil, Value::Nil)]));
    values.push(nested(3));
    values
}

#[test]
fn test_round_trip_all_samples() {
    for v in samples() {
        let wire = encode(&v).unwrap();
        let back = decode(&wire).unwrap();
        assert!(back.equivalent(&v), "round trip failed for {:?}", v);
    }
}

#[test]
fn test_exact_size_law() {
    for v in samples() {
        let wire = encode(&v).unwrap();
        assert_eq!(wire.len(), size_of(&v).unwrap(), "size law failed for {:?}", v);
    }
}

#[test]
fn test_growable_round_trip() {
    let encoder = Encoder::new().with_strategy(AllocStrategy::Growable {
        initial_capacity: 4,
    });
    for v in samples() {
        let wire = encoder.encode(&v).unwrap();
        assert_eq!(wire, encode(&v).unwrap());
        assert!(Decoder::new().decode(wire.as_bytes()).unwrap().equivalent(&v));
    }
}

#[test]
fn test_minimal_width_law() {
    for (i, width) in int_boundaries() {
        assert_eq!(encode(&Value::Int(i)).unwrap().len(), width, "int {}", i);
    }
}

#[test]
fn test_float_precision_law() {
    for (f, width) in float_samples() {
        let wire = encode(&Value::Float(f)).unwrap();
        assert_eq!(wire.len(), width, "float {}", f);
        let tag = wire.as_bytes()[0];
        assert_eq!(tag, if width == 5 { 0xca } else { 0xcb });
    }
}

#[test]
fn test_signed_zero_survives() {
    let back = decode(&encode(&Value::Float(-0.0)).unwrap()).unwrap();
    match back {
        Value::Float(f) => assert!(f == 0.0 && f.is_sign_negative()),
        other => panic!("expected float, got {:?}", other),
    }
}

#[test]
fn test_concrete_scenarios() {
    assert_eq!(encode(&Value::Nil).unwrap().as_bytes(), &[0xc0]);
    assert_eq!(Decoder::new().decode(&[0xc0]).unwrap(), Value::Nil);
    assert_eq!(encode(&Value::Bool(true)).unwrap().as_bytes(), &[0xc3]);
    assert_eq!(encode(&Value::Bool(false)).unwrap().as_bytes(), &[0xc2]);
    assert_eq!(encode(&Value::Int(0)).unwrap().as_bytes(), &[0x00]);
    assert_eq!(encode(&Value::Int(-1)).unwrap().as_bytes(), &[0xff]);
    assert_eq!(encode(&Value::Int(127)).unwrap().as_bytes(), &[0x7f]);
    assert_eq!(
        encode(&Value::Int(128)).unwrap().as_bytes(),
        &[0xd1, 0x00, 0x80]
    );
    assert_eq!(
        encode(&Value::map([("a", 1)])).unwrap().as_bytes(),
        &[0xdf, 0x00, 0x00, 0x00, 0x01, 0xa1, 0x61, 0x01]
    );
}

#[test]
fn test_counter_energy_round_trip() {
    let energy = Value::map([("counter", 9)]);
    let back = decode(&encode(&energy).unwrap()).unwrap();
    assert_eq!(back.len(), Some(1));
    assert_eq!(back.get("counter"), Some(&Value::Int(9)));
}

#[test]
fn test_non_string_keys() {
    let v = Value::map([
        (Value::Int(1), Value::from("one")),
        (Value::Float(2.5), Value::Nil),
        (Value::Bool(true), Value::Int(-7)),
        (Value::map([("k", 1)]), Value::Bytes(vec![0; 40])),
    ]);
    let back = decode(&encode(&v).unwrap()).unwrap();
    assert!(back.equivalent(&v));
}

#[test]
fn test_corrupt_buffer_is_rejected_wholesale() {
    let mut wire = encode(&nested(3)).unwrap().as_bytes().to_vec();
    let last = wire.len() - 1;
    wire.truncate(last);
    let err = Decoder::new().decode(&wire).unwrap_err();
    assert!(matches!(err, ZlmpError::Truncated { .. }));
}
