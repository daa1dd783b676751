use crate::errors::ModelError;
use crate::{Member, Merchant};
use anyhow::Result;

fn merchant_with(n: usize) -> Merchant {
    let mut m = Merchant::new(Merchant::generate_code());
    for i in 0..n {
        m.push_member(Member::new(format!("user{i}@example.com")));
    }
    m
}

#[test]
fn round_trip_preserves_members_and_order() -> Result<()> {
    for n in [0usize, 1, 2, 57] {
        let m = merchant_with(n);
        let decoded = Merchant::decode(&m.encode()?)?;
        assert_eq!(decoded, m);
        assert_eq!(decoded.members.len(), n);
    }
    Ok(())
}

#[test]
fn encoded_layout_has_code_and_members() -> Result<()> {
    let mut m = Merchant::new("acme");
    m.push_member(Member::new("a@x.com"));
    let value: serde_json::Value = serde_json::from_slice(&m.encode()?)?;
    assert_eq!(value, serde_json::json!({"code": "acme", "members": [{"email": "a@x.com"}]}));
    Ok(())
}

#[test]
fn empty_member_list_is_encoded_as_array() -> Result<()> {
    let value: serde_json::Value = serde_json::from_slice(&Merchant::new("empty").encode()?)?;
    assert_eq!(value["members"], serde_json::json!([]));
    Ok(())
}

#[test]
fn missing_members_field_decodes_as_empty() -> Result<()> {
    let m = Merchant::decode(br#"{"code":"legacy"}"#)?;
    assert_eq!(m.code, "legacy");
    assert!(m.members.is_empty());
    Ok(())
}

#[test]
fn garbage_fails_with_encoding_error() {
    let err = Merchant::decode(b"not json").unwrap_err();
    assert!(matches!(err, ModelError::Encoding(_)));
}

#[test]
fn generated_codes_are_distinct() {
    let codes: std::collections::HashSet<String> = (0..1000).map(|_| Merchant::generate_code()).collect();
    assert_eq!(codes.len(), 1000);
}
