//! # Identity Codec
//!
//! Parses and builds the opaque id strings the control plane uses as primary
//! keys. Every resource kind declares an [`IdTemplate`]: the fixed, ordered
//! list of literal markers and user-specified values that make up its id.
//!
//! ```text
//! /subscriptions/{subscriptionId}/resourceGroups/{resourceGroupName}/providers/Microsoft.Network/virtualHubs/{virtualHubName}
//!  ^ Static      ^ UserSpecified  ^ Static       ^ UserSpecified    ^ Static  ^ Provider          ^ Static    ^ UserSpecified
//! ```
//!
//! Literal markers are matched case-insensitively on parse (the API is not
//! consistent about `resourceGroups` vs `resourcegroups`), and `Display` always
//! emits the canonical casing, so `parse(x.to_string()) == x`.

use crate::framework::error::ReconcileError;
use std::fmt;
use std::hash::{Hash, Hasher};

/// One `/`-separated position in an id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Segment {
    /// A literal marker such as `resourceGroups`.
    Static {
        name: &'static str,
        value: &'static str,
    },
    /// A resource provider namespace such as `Microsoft.Network`.
    Provider {
        name: &'static str,
        value: &'static str,
    },
    /// A value supplied by the user (subscription, group, names).
    UserSpecified { name: &'static str },
}

impl Segment {
    pub const fn name(&self) -> &'static str {
        match self {
            Segment::Static { name, .. }
            | Segment::Provider { name, .. }
            | Segment::UserSpecified { name } => *name,
        }
    }
}

/// The fixed id layout for one resource kind.
#[derive(Debug)]
pub struct IdTemplate {
    /// Human readable kind, used in errors and as the lock namespace.
    pub kind: &'static str,
    pub segments: &'static [Segment],
    /// The container whose children must not be mutated concurrently.
    /// `None` means the resource is its own container.
    pub parent: Option<&'static IdTemplate>,
}

impl IdTemplate {
    pub fn user_segment_count(&self) -> usize {
        self.segments
            .iter()
            .filter(|s| matches!(s, Segment::UserSpecified { .. }))
            .count()
    }

    fn same_as(&self, other: &IdTemplate) -> bool {
        std::ptr::eq(self, other) || self.kind == other.kind
    }

    /// Example id with every user value replaced by its segment name.
    pub fn example(&self) -> String {
        let mut out = String::new();
        for segment in self.segments {
            out.push('/');
            match segment {
                Segment::Static { value, .. } | Segment::Provider { value, .. } => {
                    out.push_str(value)
                }
                Segment::UserSpecified { name } => {
                    out.push('{');
                    out.push_str(name);
                    out.push('}');
                }
            }
        }
        out
    }
}

/// A parsed or composed id. Immutable once built.
#[derive(Debug, Clone)]
pub struct ResourceIdentifier {
    template: &'static IdTemplate,
    values: Vec<String>,
}

impl ResourceIdentifier {
    /// Parses `raw` against `template`.
    pub fn parse(template: &'static IdTemplate, raw: &str) -> Result<Self, ReconcileError> {
        let malformed = |reason: String| ReconcileError::malformed(template.kind, raw, reason);

        let Some(rest) = raw.strip_prefix('/') else {
            return Err(malformed(format!(
                "expected an ID that starts with `/`, e.g. {}",
                template.example()
            )));
        };

        let parts: Vec<&str> = rest.split('/').collect();
        if parts.len() != template.segments.len() {
            return Err(malformed(format!(
                "expected {} segments but got {}, e.g. {}",
                template.segments.len(),
                parts.len(),
                template.example()
            )));
        }

        let mut values = Vec::with_capacity(template.user_segment_count());
        for (position, (segment, part)) in template.segments.iter().zip(parts).enumerate() {
            if part.is_empty() {
                return Err(malformed(format!(
                    "segment {position} ({}) was empty",
                    segment.name()
                )));
            }
            match segment {
                Segment::Static { value, .. } | Segment::Provider { value, .. } => {
                    if !part.eq_ignore_ascii_case(value) {
                        return Err(malformed(format!(
                            "expected segment {position} to be {value:?} but got {part:?}"
                        )));
                    }
                }
                Segment::UserSpecified { .. } => values.push(part.to_string()),
            }
        }

        Ok(Self { template, values })
    }

    /// Composes an id from the user-specified values, in template order.
    pub fn build<S: AsRef<str>>(
        template: &'static IdTemplate,
        values: &[S],
    ) -> Result<Self, ReconcileError> {
        let expected = template.user_segment_count();
        let values: Vec<String> = values.iter().map(|v| v.as_ref().to_string()).collect();
        if values.len() != expected {
            return Err(ReconcileError::malformed(
                template.kind,
                values.join("/"),
                format!("expected {expected} values but got {}", values.len()),
            ));
        }

        let names = template.segments.iter().filter_map(|s| match s {
            Segment::UserSpecified { name } => Some(*name),
            _ => None,
        });
        for (name, value) in names.zip(&values) {
            if value.is_empty() || value.contains('/') {
                return Err(ReconcileError::malformed(
                    template.kind,
                    values.join("/"),
                    format!("{name} must be a non-empty value without `/`, got {value:?}"),
                ));
            }
        }

        Ok(Self { template, values })
    }

    /// Builds an id of kind `template` underneath `self`.
    ///
    /// `self` must be of the template's parent kind.
    pub fn child<S: AsRef<str>>(
        &self,
        template: &'static IdTemplate,
        names: &[S],
    ) -> Result<Self, ReconcileError> {
        match template.parent {
            Some(parent) if parent.same_as(self.template) => {
                let mut values: Vec<&str> = self.values.iter().map(String::as_str).collect();
                values.extend(names.iter().map(|n| n.as_ref()));
                Self::build(template, &values[..])
            }
            _ => Err(ReconcileError::malformed(
                template.kind,
                self.to_string(),
                format!("a {} ID is not a parent of a {}", self.template.kind, template.kind),
            )),
        }
    }

    pub fn template(&self) -> &'static IdTemplate {
        self.template
    }

    pub fn kind(&self) -> &'static str {
        self.template.kind
    }

    /// The user-specified values in template order.
    pub fn values(&self) -> &[String] {
        &self.values
    }

    /// Looks up a user-specified value by segment name.
    pub fn segment(&self, name: &str) -> Option<&str> {
        self.template
            .segments
            .iter()
            .filter(|s| matches!(s, Segment::UserSpecified { .. }))
            .zip(&self.values)
            .find(|(s, _)| s.name() == name)
            .map(|(_, v)| v.as_str())
    }

    /// The last user-specified value, i.e. the resource's own name.
    pub fn name(&self) -> &str {
        self.values.last().map(String::as_str).unwrap_or_default()
    }

    /// The id of the container this resource lives in, if it has one.
    pub fn parent_id(&self) -> Option<ResourceIdentifier> {
        let parent = self.template.parent?;
        let count = parent.user_segment_count();
        Some(Self {
            template: parent,
            values: self.values[..count].to_vec(),
        })
    }

    /// The lock token for mutations of this resource.
    pub fn parent_key(&self) -> ParentKey {
        match self.parent_id() {
            Some(parent) => ParentKey::for_container(&parent),
            None => ParentKey::for_container(self),
        }
    }
}

impl fmt::Display for ResourceIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut values = self.values.iter();
        for segment in self.template.segments {
            match segment {
                Segment::Static { value, .. } | Segment::Provider { value, .. } => {
                    write!(f, "/{value}")?
                }
                Segment::UserSpecified { .. } => {
                    write!(f, "/{}", values.next().map(String::as_str).unwrap_or_default())?
                }
            }
        }
        Ok(())
    }
}

impl PartialEq for ResourceIdentifier {
    fn eq(&self, other: &Self) -> bool {
        self.template.same_as(other.template)
            && self.values.len() == other.values.len()
            && self
                .values
                .iter()
                .zip(&other.values)
                .all(|(a, b)| a.eq_ignore_ascii_case(b))
    }
}

impl Eq for ResourceIdentifier {}

impl Hash for ResourceIdentifier {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.template.kind.hash(state);
        for value in &self.values {
            value.to_ascii_lowercase().hash(state);
        }
    }
}

/// Names the shared container whose children are mutated under one lock.
///
/// Derived from a [`ResourceIdentifier`], never stored on its own. Ordered so
/// that a total lock order exists should an operation ever need two.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ParentKey {
    namespace: &'static str,
    path: String,
}

impl ParentKey {
    fn for_container(container: &ResourceIdentifier) -> Self {
        Self {
            namespace: container.kind(),
            path: container.to_string().to_ascii_lowercase(),
        }
    }

    pub fn namespace(&self) -> &'static str {
        self.namespace
    }
}

impl fmt::Display for ParentKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.namespace, self.path)
    }
}

/// Templates shared by more than one adapter.
pub mod templates {
    use super::{IdTemplate, Segment};

    pub const SUBSCRIPTIONS: Segment = Segment::Static {
        name: "staticSubscriptions",
        value: "subscriptions",
    };
    pub const SUBSCRIPTION_ID: Segment = Segment::UserSpecified {
        name: "subscriptionId",
    };
    pub const RESOURCE_GROUPS: Segment = Segment::Static {
        name: "staticResourceGroups",
        value: "resourceGroups",
    };
    pub const RESOURCE_GROUP_NAME: Segment = Segment::UserSpecified {
        name: "resourceGroupName",
    };
    pub const PROVIDERS: Segment = Segment::Static {
        name: "staticProviders",
        value: "providers",
    };
    pub const MICROSOFT_NETWORK: Segment = Segment::Provider {
        name: "staticMicrosoftNetwork",
        value: "Microsoft.Network",
    };

    pub static VIRTUAL_HUB: IdTemplate = IdTemplate {
        kind: "Virtual Hub",
        segments: &[
            SUBSCRIPTIONS,
            SUBSCRIPTION_ID,
            RESOURCE_GROUPS,
            RESOURCE_GROUP_NAME,
            PROVIDERS,
            MICROSOFT_NETWORK,
            Segment::Static {
                name: "staticVirtualHubs",
                value: "virtualHubs",
            },
            Segment::UserSpecified {
                name: "virtualHubName",
            },
        ],
        parent: None,
    };

    pub static NETWORK_WATCHER: IdTemplate = IdTemplate {
        kind: "Network Watcher",
        segments: &[
            SUBSCRIPTIONS,
            SUBSCRIPTION_ID,
            RESOURCE_GROUPS,
            RESOURCE_GROUP_NAME,
            PROVIDERS,
            MICROSOFT_NETWORK,
            Segment::Static {
                name: "staticNetworkWatchers",
                value: "networkWatchers",
            },
            Segment::UserSpecified {
                name: "networkWatcherName",
            },
        ],
        parent: None,
    };
}

#[cfg(test)]
mod tests {
    use super::templates::*;
    use super::*;

    static HUB_ROUTE_TABLE: IdTemplate = IdTemplate {
        kind: "Hub Route Table",
        segments: &[
            SUBSCRIPTIONS,
            SUBSCRIPTION_ID,
            RESOURCE_GROUPS,
            RESOURCE_GROUP_NAME,
            PROVIDERS,
            MICROSOFT_NETWORK,
            Segment::Static {
                name: "staticVirtualHubs",
                value: "virtualHubs",
            },
            Segment::UserSpecified {
                name: "virtualHubName",
            },
            Segment::Static {
                name: "staticHubRouteTables",
                value: "hubRouteTables",
            },
            Segment::UserSpecified {
                name: "hubRouteTableName",
            },
        ],
        parent: Some(&VIRTUAL_HUB),
    };

    const RAW: &str = "/subscriptions/0000/resourceGroups/rg1/providers/Microsoft.Network/virtualHubs/hub1/hubRouteTables/rt1";

    #[test]
    fn test_parse_round_trip() {
        let id = ResourceIdentifier::parse(&HUB_ROUTE_TABLE, RAW).unwrap();
        assert_eq!(id.to_string(), RAW);
        assert_eq!(ResourceIdentifier::parse(&HUB_ROUTE_TABLE, &id.to_string()).unwrap(), id);
        assert_eq!(id.segment("virtualHubName"), Some("hub1"));
        assert_eq!(id.name(), "rt1");
    }

    #[test]
    fn test_parse_accepts_lowercase_markers_and_canonicalizes() {
        let raw = RAW.replace("resourceGroups", "resourcegroups");
        let id = ResourceIdentifier::parse(&HUB_ROUTE_TABLE, &raw).unwrap();
        assert_eq!(id.to_string(), RAW);
    }

    #[test]
    fn test_equality_ignores_case() {
        let a = ResourceIdentifier::parse(&HUB_ROUTE_TABLE, RAW).unwrap();
        let b = ResourceIdentifier::parse(&HUB_ROUTE_TABLE, &RAW.replace("hub1", "HUB1")).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.parent_key(), b.parent_key());
    }

    #[test]
    fn test_parse_rejects_wrong_shape() {
        let cases = [
            "subscriptions/0000/resourceGroups/rg1",
            "/subscriptions/0000/resourceGroups/rg1/providers/Microsoft.Network/virtualHubs/hub1",
            "/subscriptions/0000/resourceGroups/rg1/providers/Microsoft.Network/virtualHubs/hub1/routeTables/rt1",
            "/subscriptions//resourceGroups/rg1/providers/Microsoft.Network/virtualHubs/hub1/hubRouteTables/rt1",
            "/subscriptions/0000/resourceGroups/rg1/providers/Microsoft.Network/virtualHubs/hub1/hubRouteTables/rt1/",
        ];
        for raw in cases {
            let err = ResourceIdentifier::parse(&HUB_ROUTE_TABLE, raw).unwrap_err();
            assert!(
                matches!(err, ReconcileError::MalformedIdentifier { .. }),
                "{raw}: {err:?}"
            );
        }
    }

    #[test]
    fn test_build_and_child_agree_with_parse() {
        let hub = ResourceIdentifier::build(&VIRTUAL_HUB, &["0000", "rg1", "hub1"]).unwrap();
        let child = hub.child(&HUB_ROUTE_TABLE, &["rt1"]).unwrap();
        assert_eq!(child, ResourceIdentifier::parse(&HUB_ROUTE_TABLE, RAW).unwrap());
        assert_eq!(child.parent_id(), Some(hub.clone()));
        assert_eq!(child.parent_key(), hub.parent_key());
    }

    #[test]
    fn test_build_rejects_partial_identifiers() {
        assert!(ResourceIdentifier::build(&VIRTUAL_HUB, &["0000", "rg1"]).is_err());
        assert!(ResourceIdentifier::build(&VIRTUAL_HUB, &["0000", "", "hub1"]).is_err());
        assert!(ResourceIdentifier::build(&VIRTUAL_HUB, &["0000", "rg/1", "hub1"]).is_err());
    }

    #[test]
    fn test_child_requires_matching_parent_kind() {
        let watcher =
            ResourceIdentifier::build(&NETWORK_WATCHER, &["0000", "rg1", "nw1"]).unwrap();
        assert!(watcher.child(&HUB_ROUTE_TABLE, &["rt1"]).is_err());
    }

    #[test]
    fn test_parent_keys_differ_per_container() {
        let a = ResourceIdentifier::parse(&HUB_ROUTE_TABLE, RAW).unwrap();
        let b = ResourceIdentifier::parse(&HUB_ROUTE_TABLE, &RAW.replace("hub1", "hub2")).unwrap();
        let sibling =
            ResourceIdentifier::parse(&HUB_ROUTE_TABLE, &RAW.replace("rt1", "rt2")).unwrap();
        assert_ne!(a.parent_key(), b.parent_key());
        assert_eq!(a.parent_key(), sibling.parent_key());
        assert_eq!(a.parent_key().namespace(), "Virtual Hub");
    }
}
