//! Mapping of raw registry records into normalized provider records
//!
//! Registry payloads are loosely typed, so every accessor here falls back to a
//! default instead of failing. Normalization never errors.

use serde_json::Value;

use crate::registry::model::{Address, EnumerationKind, ProviderDetail, ProviderSummary, Taxonomy};

pub const UNKNOWN_ORGANIZATION: &str = "Unknown Organization";
const ZIP5_LEN: usize = 5;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PostalCodeFormat {
    /// Keep only the five digit ZIP prefix.
    #[default]
    Zip5,
    Full,
}

impl PostalCodeFormat {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "zip5" => Some(Self::Zip5),
            "full" => Some(Self::Full),
            _ => None,
        }
    }

    fn apply(self, postal_code: &str) -> String {
        match self {
            Self::Zip5 => postal_code.chars().take(ZIP5_LEN).collect(),
            Self::Full => postal_code.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NormalizeOptions {
    pub postal_code: PostalCodeFormat,
}

pub fn summarize(record: &Value, options: &NormalizeOptions) -> ProviderSummary {
    let kind = enumeration_kind(record);
    let taxonomy = primary_taxonomy(array_field(record, "taxonomies"));
    let address = primary_address(array_field(record, "addresses"))
        .map(|address| normalize_address(address, options))
        .unwrap_or_default();

    ProviderSummary {
        npi: provider_number(record),
        full_name: display_name(record.get("basic").unwrap_or(&Value::Null), kind),
        enumeration_type: kind,
        primary_taxonomy: taxonomy.and_then(|t| string_field(t, "code")).map(str::to_string),
        primary_specialty: taxonomy.and_then(|t| string_field(t, "desc")).map(str::to_string),
        primary_address: address,
    }
}

pub fn detail(record: &Value, options: &NormalizeOptions) -> ProviderDetail {
    let kind = enumeration_kind(record);

    ProviderDetail {
        npi: provider_number(record),
        full_name: display_name(record.get("basic").unwrap_or(&Value::Null), kind),
        enumeration_type: kind,
        addresses: array_field(record, "addresses")
            .iter()
            .map(|address| normalize_address(address, options))
            .collect(),
        taxonomies: array_field(record, "taxonomies")
            .iter()
            .map(normalize_taxonomy)
            .collect(),
    }
}

pub fn enumeration_kind(record: &Value) -> EnumerationKind {
    EnumerationKind::from_registry_code(string_field(record, "enumeration_type"))
}

pub fn display_name(basic: &Value, kind: EnumerationKind) -> String {
    if kind == EnumerationKind::Organization {
        return string_field(basic, "organization_name")
            .unwrap_or(UNKNOWN_ORGANIZATION)
            .to_string();
    }

    let first = string_field(basic, "first_name").unwrap_or_default();
    let last = string_field(basic, "last_name").unwrap_or_default();
    let mut name = format!("{first} {last}").trim().to_string();

    if let Some(credential) = string_field(basic, "credential")
        .map(str::trim)
        .filter(|credential| !credential.is_empty())
    {
        name.push_str(", ");
        name.push_str(credential);
    }

    name
}

/// First taxonomy flagged primary, else the first taxonomy listed.
pub fn primary_taxonomy(taxonomies: &[Value]) -> Option<&Value> {
    taxonomies
        .iter()
        .find(|taxonomy| taxonomy.get("primary").and_then(Value::as_bool) == Some(true))
        .or_else(|| taxonomies.first())
}

/// First LOCATION address, else the first address listed.
pub fn primary_address(addresses: &[Value]) -> Option<&Value> {
    addresses
        .iter()
        .find(|address| {
            string_field(address, "address_purpose")
                .is_some_and(|purpose| purpose.eq_ignore_ascii_case("LOCATION"))
        })
        .or_else(|| addresses.first())
}

fn normalize_address(address: &Value, options: &NormalizeOptions) -> Address {
    Address {
        line1: owned_field(address, "address_1"),
        line2: string_field(address, "address_2")
            .filter(|line| !line.trim().is_empty())
            .map(str::to_string),
        city: owned_field(address, "city"),
        state: owned_field(address, "state"),
        postal_code: options
            .postal_code
            .apply(string_field(address, "postal_code").unwrap_or_default()),
        country: string_field(address, "country_code")
            .unwrap_or("US")
            .to_string(),
    }
}

fn normalize_taxonomy(taxonomy: &Value) -> Taxonomy {
    Taxonomy {
        code: owned_field(taxonomy, "code"),
        description: string_field(taxonomy, "desc").map(str::to_string),
        primary: taxonomy
            .get("primary")
            .and_then(Value::as_bool)
            .unwrap_or(false),
        state: string_field(taxonomy, "state").map(str::to_string),
        license: string_field(taxonomy, "license").map(str::to_string),
    }
}

/// The registry has served `number` both as a string and as an integer.
fn provider_number(record: &Value) -> String {
    match record.get("number") {
        Some(Value::String(number)) => number.clone(),
        Some(Value::Number(number)) => number.to_string(),
        _ => String::new(),
    }
}

fn string_field<'a>(value: &'a Value, key: &str) -> Option<&'a str> {
    value.get(key).and_then(Value::as_str)
}

fn owned_field(value: &Value, key: &str) -> String {
    string_field(value, key).unwrap_or_default().to_string()
}

fn array_field<'a>(value: &'a Value, key: &str) -> &'a [Value] {
    value
        .get(key)
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or(&[])
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn individual_record() -> Value {
        json!({
            "number": "1234567890",
            "enumeration_type": "NPI-1",
            "basic": {
                "first_name": "John",
                "last_name": "Doe",
                "credential": "MD"
            },
            "taxonomies": [
                {"code": "207RC0000X", "desc": "Cardiology", "primary": true, "state": "CA", "license": "12345"}
            ],
            "addresses": [
                {
                    "address_purpose": "MAILING",
                    "address_1": "PO Box 1",
                    "city": "Elsewhere",
                    "state": "CA",
                    "postal_code": "900010000",
                    "country_code": "US"
                },
                {
                    "address_purpose": "LOCATION",
                    "address_1": "123 Main St",
                    "address_2": "",
                    "city": "Anytown",
                    "state": "CA",
                    "postal_code": "902101234",
                    "country_code": "US"
                }
            ]
        })
    }

    #[test]
    fn individual_name_includes_credential() {
        let name = display_name(
            &json!({"first_name": "John", "last_name": "Doe", "credential": "MD"}),
            EnumerationKind::Individual,
        );
        assert_eq!(name, "John Doe, MD");
    }

    #[test]
    fn individual_name_skips_empty_credential() {
        let name = display_name(
            &json!({"first_name": "John", "last_name": "Doe", "credential": ""}),
            EnumerationKind::Individual,
        );
        assert_eq!(name, "John Doe");
    }

    #[test]
    fn individual_name_is_trimmed_when_first_name_missing() {
        let name = display_name(&json!({"last_name": "Doe"}), EnumerationKind::Individual);
        assert_eq!(name, "Doe");
    }

    #[test]
    fn organization_name_defaults_when_absent() {
        assert_eq!(
            display_name(&json!({}), EnumerationKind::Organization),
            UNKNOWN_ORGANIZATION
        );
        assert_eq!(
            display_name(
                &json!({"organization_name": "General Hospital"}),
                EnumerationKind::Organization
            ),
            "General Hospital"
        );
    }

    #[test]
    fn primary_taxonomy_falls_back_to_first() {
        let taxonomies = vec![
            json!({"code": "A", "primary": false}),
            json!({"code": "B", "primary": false}),
        ];
        let selected = primary_taxonomy(&taxonomies).expect("fallback taxonomy");
        assert_eq!(selected["code"], "A");
    }

    #[test]
    fn primary_taxonomy_prefers_flagged_entry() {
        let taxonomies = vec![
            json!({"code": "A", "primary": false}),
            json!({"code": "B", "primary": true}),
        ];
        let selected = primary_taxonomy(&taxonomies).expect("primary taxonomy");
        assert_eq!(selected["code"], "B");

        let single = vec![json!({"code": "A", "primary": true})];
        assert_eq!(primary_taxonomy(&single).expect("taxonomy")["code"], "A");
    }

    #[test]
    fn primary_taxonomy_absent_for_empty_list() {
        assert!(primary_taxonomy(&[]).is_none());
    }

    #[test]
    fn summary_selects_location_address_and_truncates_zip() {
        let summary = summarize(&individual_record(), &NormalizeOptions::default());

        assert_eq!(summary.npi, "1234567890");
        assert_eq!(summary.full_name, "John Doe, MD");
        assert_eq!(summary.enumeration_type, EnumerationKind::Individual);
        assert_eq!(summary.primary_taxonomy.as_deref(), Some("207RC0000X"));
        assert_eq!(summary.primary_specialty.as_deref(), Some("Cardiology"));
        assert_eq!(summary.primary_address.line1, "123 Main St");
        assert_eq!(summary.primary_address.city, "Anytown");
        assert_eq!(summary.primary_address.postal_code, "90210");
        assert!(summary.primary_address.line2.is_none());
    }

    #[test]
    fn full_postal_code_format_keeps_zip_plus_four() {
        let options = NormalizeOptions {
            postal_code: PostalCodeFormat::Full,
        };
        let summary = summarize(&individual_record(), &options);
        assert_eq!(summary.primary_address.postal_code, "902101234");
    }

    #[test]
    fn summary_without_addresses_uses_empty_us_address() {
        let summary = summarize(
            &json!({"number": 9876543210u64, "enumeration_type": "NPI-2", "basic": {"organization_name": "General Hospital"}}),
            &NormalizeOptions::default(),
        );

        assert_eq!(summary.npi, "9876543210");
        assert_eq!(summary.enumeration_type, EnumerationKind::Organization);
        assert_eq!(summary.primary_address, Address::default());
        assert_eq!(summary.primary_address.country, "US");
        assert!(summary.primary_taxonomy.is_none());
    }

    #[test]
    fn address_without_location_purpose_uses_first() {
        let addresses = vec![
            json!({"address_purpose": "MAILING", "address_1": "first"}),
            json!({"address_purpose": "OTHER", "address_1": "second"}),
        ];
        let selected = primary_address(&addresses).expect("first address");
        assert_eq!(selected["address_1"], "first");
    }

    #[test]
    fn location_purpose_matches_case_insensitively() {
        let addresses = vec![
            json!({"address_purpose": "MAILING", "address_1": "mailing"}),
            json!({"address_purpose": "location", "address_1": "practice"}),
        ];
        let selected = primary_address(&addresses).expect("location address");
        assert_eq!(selected["address_1"], "practice");
    }

    #[test]
    fn malformed_record_normalizes_to_defaults() {
        let record = json!({
            "number": null,
            "basic": "not an object",
            "taxonomies": {"code": "X"},
            "addresses": [42, "nonsense"]
        });

        let summary = summarize(&record, &NormalizeOptions::default());
        assert_eq!(summary.npi, "");
        assert_eq!(summary.full_name, UNKNOWN_ORGANIZATION);
        assert!(summary.primary_taxonomy.is_none());
        assert_eq!(summary.primary_address.line1, "");

        let detail = detail(&json!("not even an object"), &NormalizeOptions::default());
        assert!(detail.addresses.is_empty());
        assert!(detail.taxonomies.is_empty());
    }

    #[test]
    fn detail_keeps_every_address_and_taxonomy_in_order() {
        let detail = detail(&individual_record(), &NormalizeOptions::default());

        assert_eq!(detail.addresses.len(), 2);
        assert_eq!(detail.addresses[0].line1, "PO Box 1");
        assert_eq!(detail.addresses[1].line1, "123 Main St");
        assert_eq!(detail.taxonomies.len(), 1);
        assert_eq!(
            detail.taxonomies[0],
            Taxonomy {
                code: "207RC0000X".to_string(),
                description: Some("Cardiology".to_string()),
                primary: true,
                state: Some("CA".to_string()),
                license: Some("12345".to_string()),
            }
        );
    }
}
