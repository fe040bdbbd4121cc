//! Newtype wrappers for string identifiers, providing compile-time type safety.
//!
//! All newtypes serialize/deserialize as plain strings so the emitted
//! assembly stays a flat JSON document.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Deref;

macro_rules! string_newtype {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Create a new instance from a string.
            pub fn new(s: impl Into<String>) -> Self {
                Self(s.into())
            }

            /// Return the inner string as a slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Consume self and return the inner `String`.
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl Deref for $name {
            type Target = str;
            fn deref(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl PartialEq<str> for $name {
            fn eq(&self, other: &str) -> bool {
                self.0 == other
            }
        }

        impl PartialEq<&str> for $name {
            fn eq(&self, other: &&str) -> bool {
                self.0 == *other
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(s)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_owned())
            }
        }
    };
}

string_newtype!(
    /// Logical identifier of a node in the resource graph (e.g. `vpc`,
    /// `emr_service_role`, `emr_cluster`). Unique within one assembly.
    ResourceId
);

string_newtype!(
    /// Identifier of a declared subnet, referenced by the cluster declaration.
    SubnetId
);

string_newtype!(
    /// Name of a service identity (role) or the instance profile wrapping one.
    RoleName
);

string_newtype!(
    /// Name of an S3 bucket referenced by a policy resource or log URI.
    BucketName
);

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    #[test]
    fn resource_ids_key_graph_lookups() {
        // The graph keys nodes by id; newtypes must hash/order like the
        // strings they wrap so lookups by either form agree.
        let mut nodes: BTreeMap<ResourceId, &str> = BTreeMap::new();
        nodes.insert(ResourceId::new("vpc"), "vpc");
        nodes.insert(ResourceId::new("emr_service_role"), "role");
        nodes.insert(ResourceId::new("emr_cluster"), "cluster");
        assert_eq!(nodes.get(&ResourceId::from("emr_cluster")), Some(&"cluster"));
        let order: Vec<&str> = nodes.keys().map(ResourceId::as_str).collect();
        assert_eq!(order, ["emr_cluster", "emr_service_role", "vpc"]);
    }

    #[test]
    fn subnet_id_matches_its_graph_node_id() {
        // A cluster declaration holds a SubnetId whose text is the id of a
        // subnet node; the two wrappers compare equal through their strings.
        let node = ResourceId::new("public_subnet_0");
        let reference = SubnetId::new(node.as_str());
        assert_eq!(reference, node.as_str());
        assert_eq!(ResourceId::from(reference.into_inner()), node);
    }

    #[test]
    fn role_name_survives_serialization_as_plain_string() {
        let name = RoleName::new("emr-node-role");
        let json = serde_json::to_string(&name).unwrap();
        assert_eq!(json, "\"emr-node-role\"");
        let back: RoleName = serde_json::from_str(&json).unwrap();
        assert_eq!(back, name);
    }

    #[test]
    fn bucket_name_renders_into_arns_and_uris() {
        let bucket = BucketName::new("scripts-bucket");
        assert_eq!(
            format!("arn:aws-cn:s3:::{bucket}/*"),
            "arn:aws-cn:s3:::scripts-bucket/*"
        );
        assert_eq!(format!("s3://{bucket}/"), "s3://scripts-bucket/");
    }
}
