use crate::errors::ModelError;
use crate::merchant::validate_code;
use crate::{Member, Merchant};

fn emails(m: &Merchant) -> Vec<&str> {
    m.members.iter().map(|m| m.email.as_str()).collect()
}

#[test]
fn push_appends_to_end() {
    let mut m = Merchant::new("acme");
    m.push_member(Member::new("a@x.com"));
    m.push_member(Member::new("b@x.com"));
    assert_eq!(emails(&m), ["a@x.com", "b@x.com"]);
    assert_eq!(m.find_member("b@x.com"), Some(1));
    assert!(m.contains_member("a@x.com"));
    assert!(!m.contains_member("c@x.com"));
}

#[test]
fn remove_swaps_last_into_freed_slot() {
    let mut m = Merchant::new("acme");
    for e in ["a@x.com", "b@x.com", "c@x.com", "d@x.com"] {
        m.push_member(Member::new(e));
    }
    let removed = m.remove_member("b@x.com").unwrap();
    assert_eq!(removed.email, "b@x.com");
    // order is not preserved: d takes b's place
    assert_eq!(emails(&m), ["a@x.com", "d@x.com", "c@x.com"]);
}

#[test]
fn remove_last_member_leaves_empty_list() {
    let mut m = Merchant::new("acme");
    m.push_member(Member::new("a@x.com"));
    m.remove_member("a@x.com").unwrap();
    assert!(m.members.is_empty());
}

#[test]
fn remove_only_first_duplicate() {
    let mut m = Merchant::new("acme");
    for e in ["a@x.com", "b@x.com", "a@x.com"] {
        m.push_member(Member::new(e));
    }
    m.remove_member("a@x.com").unwrap();
    assert_eq!(emails(&m), ["a@x.com", "b@x.com"]);
}

#[test]
fn remove_unknown_leaves_list_unchanged() {
    let mut m = Merchant::new("acme");
    m.push_member(Member::new("a@x.com"));
    let before = m.clone();
    let err = m.remove_member("zzz@x.com").unwrap_err();
    assert!(matches!(err, ModelError::MemberNotFound(ref e) if e == "zzz@x.com"));
    assert_eq!(m, before);
}

#[test]
fn only_blank_codes_are_rejected() {
    assert!(validate_code("acme-1").is_ok());
    assert!(validate_code("a/b").is_ok());
    assert!(validate_code("  ").is_err());
}

#[test]
fn emails_are_opaque() {
    let mut m = Merchant::new("acme");
    for e in ["bob", "", "x/y"] {
        m.push_member(Member::new(e));
    }
    assert!(m.contains_member(""));
    let removed = m.remove_member("bob").unwrap();
    assert_eq!(removed.email, "bob");
    assert_eq!(emails(&m), ["x/y", ""]);
}
