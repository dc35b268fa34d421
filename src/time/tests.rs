use super::*;

#[test]
fn simple_range() {
    let r = parse_hour_range("17h-18h").unwrap();
    assert_eq!(r.start, Time::from_hm(17, 0).unwrap());
    assert_eq!(r.end, Time::from_hm(18, 0).unwrap());
    assert_eq!(r.duration_minutes(), 60);
}

#[test]
fn range_with_minutes() {
    let r = parse_hour_range("8h30-9h45").unwrap();
    assert_eq!(r.start, Time::from_hm(8, 30).unwrap());
    assert_eq!(r.end, Time::from_hm(9, 45).unwrap());
    assert_eq!(r.duration_minutes(), 75);
}

#[test]
fn tolerates_internal_whitespace() {
    let r = parse_hour_range(" 17h - 18h ").unwrap();
    assert_eq!(r.start, Time::from_hm(17, 0).unwrap());
    assert_eq!(r.end, Time::from_hm(18, 0).unwrap());
}

#[test]
fn mixed_minute_presence() {
    let r = parse_hour_range("9h-10h30").unwrap();
    assert_eq!(r.start, Time::from_hm(9, 0).unwrap());
    assert_eq!(r.end, Time::from_hm(10, 30).unwrap());
}

#[test]
fn rejects_missing_dash() {
    assert!(matches!(
        parse_hour_range("17h18h"),
        Err(Error::InvalidHourRange(_))
    ));
}

#[test]
fn rejects_empty_range() {
    assert!(matches!(
        parse_hour_range("18h-17h"),
        Err(Error::EmptyHourRange(_))
    ));
    assert!(matches!(
        parse_hour_range("18h-18h"),
        Err(Error::EmptyHourRange(_))
    ));
}

#[test]
fn rejects_garbage() {
    assert!(parse_hour_range("not a range").is_err());
}
