//! Attribute validators bound to each BigIP resource type.

use std::collections::BTreeSet;
use tfplug::{Diagnostic, Diagnostics, Dynamic, Validator};

use crate::validators::{self, FieldValue, Validation};

/// A field validator usable from a resource schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldRule {
    F5Name,
    F5NameWithDirectory,
    PartitionName,
    PoolMemberName,
    EnabledDisabled,
    RequiredPreferredDisabled,
    DataGroupType,
    PoolLicenseType,
    AssignmentType,
    IpAddress,
    /// A single string out of a fixed list
    OneOf(&'static [&'static str]),
    /// A set whose elements all come from a fixed list
    SubsetOf(&'static [&'static str]),
}

impl FieldRule {
    /// Apply the rule to a host value. Returns the actual type name when the
    /// value has a shape the rule cannot take.
    pub fn check(&self, value: &Dynamic, field: &str) -> Result<Validation, &'static str> {
        match self {
            FieldRule::OneOf(allowed) => match value {
                Dynamic::String(s) => Ok(validators::validate_string_value(allowed, s, field)),
                other => Err(other.type_name()),
            },
            FieldRule::SubsetOf(allowed) => {
                let allowed: BTreeSet<String> = allowed.iter().map(|s| s.to_string()).collect();
                // Sets decoded from JSON arrive as lists.
                let items: BTreeSet<String> = match field_value(value) {
                    Some(FieldValue::Set(items)) => items,
                    Some(FieldValue::List(items)) => items.into_iter().collect(),
                    _ => return Err(value.type_name()),
                };
                Ok(validators::validate_set_values(&allowed, &items, field))
            }
            FieldRule::IpAddress => match value {
                Dynamic::String(s) => {
                    let mut result = Validation::default();
                    if !validators::is_valid_ip(s) {
                        result.errors.push(format!(
                            "{:?} must be a valid IPv4 or IPv6 address",
                            field
                        ));
                    }
                    Ok(result)
                }
                other => Err(other.type_name()),
            },
            FieldRule::F5Name => with_values(value, field, validators::validate_f5_name),
            FieldRule::F5NameWithDirectory => {
                with_values(value, field, validators::validate_f5_name_with_directory)
            }
            FieldRule::PartitionName => {
                with_values(value, field, validators::validate_partition_name)
            }
            FieldRule::PoolMemberName => {
                with_values(value, field, validators::validate_pool_member_name)
            }
            FieldRule::EnabledDisabled => {
                with_values(value, field, validators::validate_enabled_disabled)
            }
            FieldRule::RequiredPreferredDisabled => {
                with_values(value, field, validators::validate_req_pref_disabled)
            }
            FieldRule::DataGroupType => {
                with_values(value, field, validators::validate_data_group_type)
            }
            FieldRule::PoolLicenseType => {
                with_values(value, field, validators::validate_pool_license_type)
            }
            FieldRule::AssignmentType => {
                with_values(value, field, validators::validate_assignment_type)
            }
        }
    }
}

fn with_values(
    value: &Dynamic,
    field: &str,
    validate: fn(&FieldValue, &str) -> Validation,
) -> Result<Validation, &'static str> {
    let values = field_value(value).ok_or(value.type_name())?;
    Ok(validate(&values, field))
}

impl Validator for FieldRule {
    fn validate(&self, value: &Dynamic, attribute_path: &str, diagnostics: &mut Diagnostics) {
        // Unset and not-yet-known values are checked once they have a value.
        if value.is_null() || value.is_unknown() {
            return;
        }

        match self.check(value, attribute_path) {
            Ok(result) => {
                for warning in result.warnings {
                    diagnostics.push(
                        Diagnostic::warning(warning, None::<String>).with_attribute(attribute_path),
                    );
                }
                for error in result.errors {
                    diagnostics.push(
                        Diagnostic::error(error, None::<String>).with_attribute(attribute_path),
                    );
                }
            }
            Err(actual) => diagnostics.push(
                Diagnostic::error(
                    format!("Unknown type {} in {}", actual, attribute_path),
                    Some(format!("{:?} cannot validate a {} value", self, actual)),
                )
                .with_attribute(attribute_path),
            ),
        }
    }
}

/// Strings, and lists or sets made only of strings.
pub fn field_value(value: &Dynamic) -> Option<FieldValue> {
    fn strings(items: &[Dynamic]) -> Option<Vec<String>> {
        items.iter().map(|item| item.as_string().cloned()).collect()
    }

    match value {
        Dynamic::String(s) => Some(FieldValue::Single(s.clone())),
        Dynamic::List(items) => strings(items).map(FieldValue::List),
        Dynamic::Set(items) => strings(items).map(|v| FieldValue::Set(v.into_iter().collect())),
        _ => None,
    }
}

const YES_NO: &[&str] = &["yes", "no"];

const LOAD_BALANCING_MODES: &[&str] = &[
    "round-robin",
    "ratio-member",
    "least-connections-member",
    "observed-member",
    "predictive-member",
    "ratio-node",
    "least-connections-node",
    "fastest-node",
    "observed-node",
    "predictive-node",
    "dynamic-ratio-node",
    "fastest-app-response",
    "least-sessions",
    "dynamic-ratio-member",
    "weighted-least-connections-member",
    "weighted-least-connections-node",
    "ratio-session",
    "ratio-least-connections-member",
    "ratio-least-connections-node",
];

const TM_OPTIONS: &[&str] = &[
    "dont-insert-empty-fragments",
    "no-ssl",
    "no-dtls",
    "no-tlsv1",
    "no-tlsv1.1",
    "no-tlsv1.2",
    "no-tlsv1.3",
    "single-dh-use",
    "cipher-server-preference",
    "no-session-resumption-on-renegotiation",
    "passive-close",
    "tls-rollback-bug",
];

type AttributeRules = &'static [(&'static str, FieldRule)];

const RESOURCES: &[(&str, AttributeRules)] = &[
    (
        "bigip_ltm_pool",
        &[
            ("name", FieldRule::F5Name),
            ("load_balancing_mode", FieldRule::OneOf(LOAD_BALANCING_MODES)),
            ("allow_nat", FieldRule::OneOf(YES_NO)),
            ("allow_snat", FieldRule::OneOf(YES_NO)),
        ],
    ),
    (
        "bigip_ltm_node",
        &[
            ("name", FieldRule::F5NameWithDirectory),
            ("state", FieldRule::OneOf(&["user-up", "user-down"])),
            ("session", FieldRule::OneOf(&["user-enabled", "user-disabled"])),
        ],
    ),
    (
        "bigip_ltm_pool_attachment",
        &[
            ("pool", FieldRule::F5NameWithDirectory),
            ("node", FieldRule::PoolMemberName),
        ],
    ),
    ("bigip_partition", &[("name", FieldRule::PartitionName)]),
    (
        "bigip_ltm_datagroup",
        &[
            ("name", FieldRule::F5Name),
            ("type", FieldRule::DataGroupType),
        ],
    ),
    (
        "bigip_ltm_virtual_server",
        &[
            ("name", FieldRule::F5Name),
            ("pool", FieldRule::F5Name),
            ("destination", FieldRule::IpAddress),
            ("ip_protocol", FieldRule::OneOf(&["tcp", "udp", "sctp", "any"])),
            ("state", FieldRule::EnabledDisabled),
            ("translate_address", FieldRule::EnabledDisabled),
            ("translate_port", FieldRule::EnabledDisabled),
        ],
    ),
    (
        "bigip_ltm_profile_client_ssl",
        &[
            ("name", FieldRule::F5Name),
            ("defaults_from", FieldRule::F5Name),
            ("renegotiation", FieldRule::EnabledDisabled),
            ("tm_options", FieldRule::SubsetOf(TM_OPTIONS)),
        ],
    ),
    (
        "bigip_common_license_manage_bigiq",
        &[
            ("license_type", FieldRule::PoolLicenseType),
            ("assignment_type", FieldRule::AssignmentType),
        ],
    ),
];

/// Attribute rules for a resource type, `None` for unknown types.
pub fn attribute_rules(resource_type: &str) -> Option<AttributeRules> {
    RESOURCES
        .iter()
        .find(|(name, _)| *name == resource_type)
        .map(|(_, rules)| *rules)
}

pub fn resource_types() -> impl Iterator<Item = &'static str> {
    RESOURCES.iter().map(|(name, _)| *name)
}
