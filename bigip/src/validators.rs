//! Field validators for BigIP naming and value conventions.
//!
//! Every validator checks each value it is given and reports one error per
//! offending value, so a single plan shows all of them at once. Warnings are
//! part of the result shape but no rule currently emits any.

use regex::Regex;
use std::collections::BTreeSet;
use std::net::{IpAddr, Ipv6Addr};
use std::sync::OnceLock;

/// Input shapes a schema attribute can hand to a validator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Single(String),
    List(Vec<String>),
    /// Order-insensitive; iterated in sorted order.
    Set(BTreeSet<String>),
}

impl FieldValue {
    /// The values to check, in a deterministic order.
    pub fn values(&self) -> Vec<&str> {
        match self {
            FieldValue::Single(value) => vec![value.as_str()],
            FieldValue::List(values) => values.iter().map(String::as_str).collect(),
            FieldValue::Set(values) => values.iter().map(String::as_str).collect(),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Single(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Single(value)
    }
}

impl From<Vec<String>> for FieldValue {
    fn from(values: Vec<String>) -> Self {
        FieldValue::List(values)
    }
}

impl From<Vec<&str>> for FieldValue {
    fn from(values: Vec<&str>) -> Self {
        FieldValue::List(values.into_iter().map(str::to_string).collect())
    }
}

impl From<BTreeSet<String>> for FieldValue {
    fn from(values: BTreeSet<String>) -> Self {
        FieldValue::Set(values)
    }
}

/// Outcome of validating one field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Validation {
    pub warnings: Vec<String>,
    pub errors: Vec<String>,
}

impl Validation {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Scheme, host and optional port of a device address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceUri {
    pub scheme: String,
    pub host: String,
    pub port: Option<String>,
}

fn regex(cell: &'static OnceLock<Regex>, pattern: &str) -> &'static Regex {
    cell.get_or_init(|| Regex::new(pattern).expect("validator pattern must compile"))
}

// Character classes are spelled out to keep `\w` ASCII-only.
fn f5_name_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    regex(&RE, r"^/[0-9A-Za-z_.\-]+/[0-9A-Za-z_.\-:]+$")
}

fn f5_name_with_directory_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    regex(
        &RE,
        r"^/[0-9A-Za-z_.\-]+/[0-9A-Za-z_.\-:]+(/[0-9A-Za-z_.\-:]+)?$",
    )
}

fn partition_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    regex(&RE, r"^[^/\s]\S*$")
}

// `.port` is only a separator after an IPv6 node; everything else uses `:port`.
fn pool_member_path_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    regex(
        &RE,
        r"^/[0-9A-Za-z_.\-]+/(?:[0-9A-Za-z_.\-]+:[0-9]+|[0-9A-Za-z_.\-:]*:[0-9A-Za-z_.\-:]*\.[0-9]+)$",
    )
}

fn pool_member_host_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    regex(&RE, r"^[0-9A-Za-z_.\-]+:[0-9]+$")
}

fn pool_license_type_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    regex(&RE, r"(?i)^(utility|regkey)$")
}

fn assignment_type_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    regex(&RE, r"(?i)^(managed|unmanaged|unreachable)$")
}

fn device_uri_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    regex(&RE, r"^(?:(https?|s?ftp):)//([^:/\s]+)(?::([0-9]*))?")
}

/// Run `check` on every value; each `Some(message)` becomes an error.
fn check_each(value: &FieldValue, mut check: impl FnMut(&str) -> Option<String>) -> Validation {
    let errors = value.values().into_iter().filter_map(|v| check(v)).collect();
    Validation {
        warnings: Vec::new(),
        errors,
    }
}

fn check_literals(value: &FieldValue, allowed: &[&str], message: String) -> Validation {
    check_each(value, |v| {
        if allowed.contains(&v) {
            None
        } else {
            Some(message.clone())
        }
    })
}

/// Every element of `value` must appear in `allowed`.
pub fn validate_set_values(
    allowed: &BTreeSet<String>,
    value: &BTreeSet<String>,
    field: &str,
) -> Validation {
    let mut result = Validation::default();
    if !value.is_subset(allowed) {
        let listed: Vec<&str> = value.iter().map(String::as_str).collect();
        result.errors.push(format!(
            "{:?} can only contain [{}]",
            field,
            listed.join(" ")
        ));
    }
    result
}

/// `value` must equal one of `allowed`.
pub fn validate_string_value(allowed: &[&str], value: &str, field: &str) -> Validation {
    let mut result = Validation::default();
    if !allowed.contains(&value) {
        result.errors.push(format!(
            "{:?} must be one of [{}]",
            field,
            allowed.join(" ")
        ));
    }
    result
}

/// `/Partition/Name`
pub fn validate_f5_name(value: &FieldValue, field: &str) -> Validation {
    check_each(value, |v| {
        (!f5_name_re().is_match(v)).then(|| {
            format!(
                "{:?} must match /Partition/Name and contain letters, numbers or [._-:]. e.g. /Common/my-pool",
                field
            )
        })
    })
}

/// `/Partition/Name` or `/Partition/Directory/Name`
pub fn validate_f5_name_with_directory(value: &FieldValue, field: &str) -> Validation {
    check_each(value, |v| {
        (!f5_name_with_directory_re().is_match(v)).then(|| {
            format!(
                "{:?} must match /Partition/Name or /Partition/Directory/Name e.g. /Common/my-node or /Common/test/my-node",
                field
            )
        })
    })
}

/// A bare partition name: no leading `/`, no whitespace.
pub fn validate_partition_name(value: &FieldValue, field: &str) -> Validation {
    check_each(value, |v| {
        (!partition_re().is_match(v)).then(|| {
            format!(
                "{:?} name should not start with `/` or contain whitespace, e.g. Common or test-partition are valid",
                field
            )
        })
    })
}

/// Pool member in one of three shapes:
///
/// - `/Partition/Node:Port` or `/Partition/Node.Port` when it starts with `/`
/// - `IPv6.Port` when it has two or more colons and no leading `/`
/// - `host-or-ip:Port` otherwise
pub fn validate_pool_member_name(value: &FieldValue, field: &str) -> Validation {
    check_each(value, |v| pool_member_error(v, field))
}

fn pool_member_error(value: &str, field: &str) -> Option<String> {
    if value.starts_with('/') {
        if pool_member_path_re().is_match(value) {
            return None;
        }
        return Some(format!(
            "{:?} must match /Partition/Node_Name:Port and contain letters, numbers or [:._-]. e.g. /Common/node1:80",
            field
        ));
    }

    if value.matches(':').count() >= 2 {
        if is_ipv6_member(value) {
            return None;
        }
        return Some(format!(
            "{:?} must match IPv6-Address.Port e.g. 2001:db8::1.80",
            field
        ));
    }

    if pool_member_host_re().is_match(value) {
        return None;
    }
    Some(format!(
        "{:?} must match Node-address:Port and Node Address is IP/FQDN. e.g. 1.1.1.1:80/www.google.com:80",
        field
    ))
}

fn is_ipv6_member(value: &str) -> bool {
    match value.rsplit_once('.') {
        Some((address, port)) => {
            !port.is_empty()
                && port.bytes().all(|b| b.is_ascii_digit())
                && address.parse::<Ipv6Addr>().is_ok()
        }
        None => false,
    }
}

pub fn validate_enabled_disabled(value: &FieldValue, field: &str) -> Validation {
    check_literals(
        value,
        &["enabled", "disabled"],
        format!("{:?} must match as enabled or disabled", field),
    )
}

pub fn validate_req_pref_disabled(value: &FieldValue, field: &str) -> Validation {
    check_literals(
        value,
        &["required", "preferred", "disabled"],
        format!("{:?} must match as required, preferred, or disabled", field),
    )
}

pub fn validate_data_group_type(value: &FieldValue, field: &str) -> Validation {
    check_literals(
        value,
        &["string", "ip", "integer"],
        format!("{:?} must match as string, ip, or integer", field),
    )
}

/// `Utility` or `regkey`, any case
pub fn validate_pool_license_type(value: &FieldValue, field: &str) -> Validation {
    check_each(value, |v| {
        (!pool_license_type_re().is_match(v))
            .then(|| format!("{:?} must match as Utility (or) Regkey", field))
    })
}

/// `MANAGED`, `UNMANAGED` or `UNREACHABLE`, any case
pub fn validate_assignment_type(value: &FieldValue, field: &str) -> Validation {
    check_each(value, |v| {
        (!assignment_type_re().is_match(v))
            .then(|| format!("{:?} must match as MANAGED/UNMANAGED/UNREACHABLE", field))
    })
}

pub fn is_valid_ip(value: &str) -> bool {
    value.parse::<IpAddr>().is_ok()
}

/// Split an `http(s)://` or `(s)ftp://` address into its parts.
///
/// Returns `None` when the address has no such scheme. An empty port
/// (`https://host:`) is reported as no port.
pub fn device_uri(value: &str) -> Option<DeviceUri> {
    let captures = device_uri_re().captures(value)?;
    Some(DeviceUri {
        scheme: captures.get(1)?.as_str().to_string(),
        host: captures.get(2)?.as_str().to_string(),
        port: captures
            .get(3)
            .map(|m| m.as_str())
            .filter(|p| !p.is_empty())
            .map(str::to_string),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(values: &[&str]) -> BTreeSet<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn enabled_disabled_accepts_exact_literals() {
        for ok in ["enabled", "disabled"] {
            assert!(validate_enabled_disabled(&ok.into(), "state").is_valid());
        }
        for bad in ["Enabled", "on", ""] {
            let result = validate_enabled_disabled(&bad.into(), "state");
            assert_eq!(
                result.errors,
                vec![r#""state" must match as enabled or disabled"#]
            );
        }
    }

    #[test]
    fn f5_name_requires_partition_and_name() {
        assert!(validate_f5_name(&"/Common/my-pool".into(), "name").is_valid());
        assert!(validate_f5_name(&"/Common/pool_1.web:80".into(), "name").is_valid());

        for bad in ["Common/my-pool", "/Common", "/Common/dir/my-pool", "/Com:mon/pool"] {
            let result = validate_f5_name(&bad.into(), "name");
            assert_eq!(result.errors.len(), 1, "{} should be rejected", bad);
            assert!(result.errors[0].starts_with(r#""name" must match /Partition/Name"#));
        }
    }

    #[test]
    fn f5_name_rejects_non_ascii_word_characters() {
        assert!(!validate_f5_name(&"/Common/pöol".into(), "name").is_valid());
    }

    #[test]
    fn f5_name_with_directory_allows_one_directory() {
        for ok in ["/Common/my-node", "/Common/test/my-node"] {
            assert!(validate_f5_name_with_directory(&ok.into(), "name").is_valid());
        }
        for bad in ["/Common", "/Common/a/b/c", "Common/test/my-node"] {
            assert!(!validate_f5_name_with_directory(&bad.into(), "name").is_valid());
        }
    }

    #[test]
    fn partition_name_rules() {
        for ok in ["Common", "test-partition", "P"] {
            assert!(validate_partition_name(&ok.into(), "name").is_valid(), "{}", ok);
        }
        for bad in ["/Common", "my partition", " Common", ""] {
            assert!(!validate_partition_name(&bad.into(), "name").is_valid(), "{:?}", bad);
        }
    }

    #[test]
    fn pool_member_accepts_address_and_path_forms() {
        for ok in [
            "1.1.1.1:80",
            "www.example.com:443",
            "/Common/node1:80",
            "/Common/10.1.1.1:80",
            "/Common/2001:db8::1.80",
            "2001:db8::1.80",
        ] {
            let result = validate_pool_member_name(&ok.into(), "node");
            assert!(result.is_valid(), "{} rejected: {:?}", ok, result.errors);
        }
    }

    #[test]
    fn pool_member_rejects_missing_port() {
        let result = validate_pool_member_name(&"1.1.1.1".into(), "node");
        assert_eq!(result.errors.len(), 1);
        assert!(result.errors[0].contains("Node-address:Port"));

        for bad in [
            "/Common/node1",
            "/Common/10.1.1.1",
            "/Common/node.1",
            "/Common/web.example.com.8",
            "/Common/2001:db8::1:80",
        ] {
            let result = validate_pool_member_name(&bad.into(), "node");
            assert_eq!(result.errors.len(), 1, "{}", bad);
            assert!(result.errors[0].contains("/Partition/Node_Name:Port"));
        }
    }

    #[test]
    fn pool_member_ipv6_needs_dotted_port() {
        for bad in ["2001:db8::1", "2001:db8::1:80", "not:an:address.80"] {
            let result = validate_pool_member_name(&bad.into(), "node");
            assert_eq!(result.errors.len(), 1, "{}", bad);
            assert!(result.errors[0].contains("IPv6-Address.Port"));
        }
    }

    #[test]
    fn every_offending_value_is_reported() {
        let members = FieldValue::from(vec!["1.1.1.1:80", "bad", "/Common/node", "2.2.2.2:443"]);
        let result = validate_pool_member_name(&members, "members");
        assert_eq!(result.errors.len(), 2);
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn data_group_type_literals() {
        for ok in ["string", "ip", "integer"] {
            assert!(validate_data_group_type(&ok.into(), "type").is_valid());
        }
        assert_eq!(
            validate_data_group_type(&"bool".into(), "type").errors,
            vec![r#""type" must match as string, ip, or integer"#]
        );
    }

    #[test]
    fn req_pref_disabled_literals() {
        let values = FieldValue::from(set(&["required", "preferred", "disabled"]));
        assert!(validate_req_pref_disabled(&values, "mode").is_valid());
        assert!(!validate_req_pref_disabled(&"optional".into(), "mode").is_valid());
    }

    #[test]
    fn license_and_assignment_types_ignore_case() {
        for ok in ["Utility", "utility", "REGKEY", "regkey"] {
            assert!(validate_pool_license_type(&ok.into(), "license_type").is_valid());
        }
        assert!(!validate_pool_license_type(&"volume".into(), "license_type").is_valid());
        assert!(!validate_pool_license_type(&"x\nUtility".into(), "license_type").is_valid());

        for ok in ["MANAGED", "unmanaged", "Unreachable"] {
            assert!(validate_assignment_type(&ok.into(), "assignment_type").is_valid());
        }
        assert!(!validate_assignment_type(&"ORPHANED".into(), "assignment_type").is_valid());
    }

    #[test]
    fn set_values_reports_input_set_once() {
        let allowed = set(&["a", "b"]);

        let result = validate_set_values(&allowed, &set(&["c", "a"]), "vlans");
        assert_eq!(result.errors, vec![r#""vlans" can only contain [a c]"#]);

        assert!(validate_set_values(&allowed, &set(&["b"]), "vlans").is_valid());
        assert!(validate_set_values(&allowed, &BTreeSet::new(), "vlans").is_valid());
    }

    #[test]
    fn string_value_lists_allowed_literals() {
        let allowed = ["yes", "no"];
        assert!(validate_string_value(&allowed, "yes", "allow_snat").is_valid());
        assert_eq!(
            validate_string_value(&allowed, "maybe", "allow_snat").errors,
            vec![r#""allow_snat" must be one of [yes no]"#]
        );
    }

    #[test]
    fn set_input_is_checked_in_sorted_order() {
        let values = FieldValue::from(set(&["zeta", "Alpha", "enabled"]));
        assert_eq!(values.values(), vec!["Alpha", "enabled", "zeta"]);
        assert_eq!(validate_enabled_disabled(&values, "state").errors.len(), 2);
    }

    #[test]
    fn validators_are_idempotent() {
        let value = FieldValue::from(vec!["/Common/a", "b", "/Common/c/d"]);
        let first = validate_f5_name(&value, "pools");
        let second = validate_f5_name(&value, "pools");
        assert_eq!(first, second);
        assert_eq!(first.errors.len(), 2);
    }

    #[test]
    fn ip_literals() {
        for ok in ["10.0.0.1", "::1", "2001:db8::1", "::ffff:10.0.0.1"] {
            assert!(is_valid_ip(ok), "{}", ok);
        }
        for bad in ["10.0.0", "10.0.0.256", "example.com", "", "10.0.0.1/24"] {
            assert!(!is_valid_ip(bad), "{}", bad);
        }
    }

    #[test]
    fn device_uri_extracts_parts() {
        assert_eq!(
            device_uri("https://10.145.1.2:8443/mgmt/tm"),
            Some(DeviceUri {
                scheme: "https".to_string(),
                host: "10.145.1.2".to_string(),
                port: Some("8443".to_string()),
            })
        );
        assert_eq!(
            device_uri("sftp://files.example.com"),
            Some(DeviceUri {
                scheme: "sftp".to_string(),
                host: "files.example.com".to_string(),
                port: None,
            })
        );
        assert_eq!(device_uri("http://host:").and_then(|u| u.port), None);
    }

    #[test]
    fn device_uri_without_scheme_is_empty() {
        assert_eq!(device_uri("10.145.1.2:8443"), None);
        assert_eq!(device_uri("gopher://host"), None);
        assert_eq!(device_uri(""), None);
    }
}
