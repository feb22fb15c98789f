use envelope822::*;

const SAMPLE: &str = "Content-Type: text/plain\nContent-Length: 12\n\nfirst\nsecond";

#[test]
fn test_default_options() {
    let options = Options::default();
    assert_eq!(options.key_style, KeyStyle::Verbatim);
    assert!(!options.convert_dates);
    assert!(!options.convert_numbers);
    assert!(options.join_body);
    assert_eq!(options.join_newline, "\n");
    assert_eq!(options.body_field_name, "body");
    assert_eq!(options.line_break_pattern.as_str(), r"\r?\n");
    assert_eq!(options.header_pattern.as_str(), r"^(.*?): +(.*)$");
    assert_eq!(options.continuation_pattern.as_str(), r"^(\s.+)$");
}

#[test]
fn test_overrides_from_json() {
    let overrides =
        OptionsOverrides::from_json(r#"{"keys": "underscore", "numbers": true}"#).unwrap();
    assert_eq!(overrides.keys, Some(KeyStyle::Underscore));
    assert_eq!(overrides.numbers, Some(true));
    assert_eq!(overrides.dates, None);

    let options = overrides.resolve().unwrap();
    assert_eq!(options.key_style, KeyStyle::Underscore);
    assert!(options.convert_numbers);
    assert!(options.join_body);
    assert_eq!(options.body_field_name, "body");
}

#[test]
fn test_merge_keeps_base_fields() {
    let base = Options::default().with_dates(true).with_body_field("text");
    let overrides = OptionsOverrides {
        join: Some(false),
        ..OptionsOverrides::default()
    };
    let options = base.merged(&overrides).unwrap();

    assert!(options.convert_dates);
    assert!(!options.join_body);
    assert_eq!(options.body_field_name, "text");
}

#[test]
fn test_parse_with_overrides() {
    let overrides =
        OptionsOverrides::from_json(r#"{"keys": "underscore", "numbers": true, "join": false}"#)
            .unwrap();
    let msg = parse_with_overrides(SAMPLE, &overrides).unwrap();

    assert_eq!(msg.get_str("content_type"), Some("text/plain"));
    assert_eq!(msg.get_number("content_length"), Some(12.0));
    assert_eq!(
        msg.get_lines("body"),
        Some(&["first".to_string(), "second".to_string()][..])
    );
}

#[test]
fn test_pattern_overrides() {
    let overrides = OptionsOverrides::from_json(
        r#"{"breaks": ";", "header": "^(\\w+)=(.*)$", "body_key": "rest"}"#,
    )
    .unwrap();
    let msg = parse_with_overrides("a=1;b=2;;tail", &overrides).unwrap();

    assert_eq!(msg.get_str("a"), Some("1"));
    assert_eq!(msg.get_str("b"), Some("2"));
    assert_eq!(msg.get_str("rest"), Some("tail"));
}

#[test]
fn test_invalid_pattern_override() {
    let overrides = OptionsOverrides {
        header: Some("(".into()),
        ..OptionsOverrides::default()
    };
    let err = overrides.resolve().unwrap_err();
    assert!(matches!(err, OptionsError::Pattern { field: "header", .. }));

    let err = parse_with_overrides(SAMPLE, &overrides).unwrap_err();
    assert!(matches!(err, ParseFailure::Options(_)));
}

#[test]
fn test_unknown_override_field() {
    let err = OptionsOverrides::from_json(r#"{"colour": "blue"}"#).unwrap_err();
    assert!(matches!(err, OptionsError::Json(_)));
}

#[test]
fn test_overrides_surface_parse_errors() {
    let err = parse_with_overrides("garbage", &OptionsOverrides::default()).unwrap_err();
    assert!(matches!(
        err,
        ParseFailure::Parse(ParseError::MalformedHeader(ref line)) if line == "garbage"
    ));
}
