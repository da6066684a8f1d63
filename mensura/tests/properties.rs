//! Properties that hold across the unit dictionary

use mensura::{Mensura, Number, NumberKind, Unit};
use mensura_core::RBig;
use mensura_units::convert::convert_rational;
use pretty_assertions::assert_eq;

const PAIRS: &[(&str, &str)] = &[
    ("meter", "foot"),
    ("celsius", "kelvin"),
    ("fahrenheit", "celsius"),
    ("kilometer_per_hour", "mile_per_hour"),
    ("square_mile", "hectare"),
    ("cubic_foot", "liter"),
    ("liter_per_100_kilometer", "mile_per_gallon"),
    ("kibibyte", "megabit"),
    ("pound_force_foot", "newton_meter"),
    ("year", "hour"),
];

fn exact(value: &Number) -> RBig {
    value.to_rational().unwrap()
}

#[test]
fn test_round_trip_is_exact() {
    let m = Mensura::new();
    let value = Number::from_ratio(1237, 7).unwrap();
    for (a, b) in PAIRS {
        let start = m.new_unit(a, value.clone());
        let there = m.convert(&start, b);
        let back = m.convert(&there, a);
        assert_eq!(exact(&back.value), exact(&value), "{} -> {} -> {}", a, b, a);
    }
}

#[test]
fn test_canonical_order_independence() {
    let m = Mensura::new();
    assert_eq!(m.parse("meter_kilogram"), m.parse("kilogram_meter"));
    assert_eq!(m.base_unit("meter_kilogram"), "kilogram_meter");
}

#[test]
fn test_power_folding() {
    let m = Mensura::new();
    assert_eq!(m.parse("meter_meter"), m.parse("square_meter"));
    assert_eq!(m.parse("meter_meter_meter"), m.parse("cubic_meter"));
}

#[test]
fn test_per_reduction() {
    let m = Mensura::new();
    assert_eq!(m.base_unit("square_meter_per_meter"), m.base_unit("meter"));
}

#[test]
fn test_self_conversion_keeps_kind() {
    let m = Mensura::new();
    let values = [
        Number::from_i64(3),
        Number::from_f64(2.5),
        Number::decimal("1.25").unwrap(),
        Number::from_ratio(1, 3).unwrap(),
    ];
    for value in values {
        let unit = m.new_unit("furlong", value.clone());
        let same = m.convert(&unit, "furlong");
        assert_eq!(same.value, value);
        assert_eq!(same.value.kind(), value.kind());
    }
}

#[test]
fn test_conversion_result_kinds() {
    let m = Mensura::new();
    assert_eq!(m.convert(&m.new_unit("foot", 3), "inch").value.kind(), NumberKind::Int);
    assert_eq!(m.convert(&m.new_unit("inch", 3), "foot").value.kind(), NumberKind::Rational);
    assert_eq!(m.convert(&m.new_unit("inch", 3.0), "foot").value.kind(), NumberKind::Float);
}

#[test]
fn test_compatibility_is_symmetric() {
    let m = Mensura::new();
    let names = ["meter", "foot", "second", "liter_per_100_kilometer", "mile_per_gallon", "hertz", "kelvin"];
    for a in names {
        for b in names {
            assert_eq!(m.compatible(a, b), m.compatible(b, a), "{} / {}", a, b);
        }
    }
    assert!(m.compatible("liter_per_100_kilometer", "mile_per_gallon"));
    assert!(!m.compatible("meter", "second"));
}

#[test]
fn test_decompose_conserves_value() {
    let m = Mensura::new();
    let cases: &[(&str, Number, &[&str])] = &[
        ("meter", Number::decimal("1.8").unwrap(), &["foot", "inch"]),
        ("second", Number::from_i64(100_000), &["day", "hour", "minute", "second"]),
        ("kilogram", Number::from_ratio(100, 3).unwrap(), &["stone", "pound", "ounce"]),
        ("celsius", Number::decimal("37.5").unwrap(), &["fahrenheit", "kelvin"]),
        ("kelvin", Number::from_i64(300), &["celsius", "fahrenheit"]),
        ("liter_per_100_kilometer", Number::from_i64(5), &["mile_per_gallon", "liter_per_100_kilometer"]),
    ];
    for (name, value, targets) in cases {
        let unit = m.new_unit(name, value.clone());
        let parts = m.decompose(&unit, targets);
        assert!(parts.iter().all(|p| !p.is_zero()));
        let total = parts
            .iter()
            .map(|p| convert_rational(exact(&p.value), &p.base_conversion, &unit.base_conversion).unwrap())
            .fold(RBig::ZERO, |acc, v| acc + v);
        assert_eq!(total, exact(value), "{} over {:?}", name, targets);
    }
}

#[test]
fn test_division_matches_parsed_unit() {
    let m = Mensura::new();
    let speed = m.div(&m.new_unit("meter", 10), &m.new_unit("second", 2));
    let parsed: Unit = m.new_unit("meter_per_second", 5);
    assert_eq!(speed.base_conversion, parsed.base_conversion);
    assert_eq!(speed.value, parsed.value);
}
